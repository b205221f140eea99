//! Dotted numeric version tuples
//!
//! Only the leading `[0-9.]` run of a version string is considered, so
//! pre-release, post-release and local segments are truncated:
//! `1.0.0a1` and `1.0.0` compare equal.

use crate::domain::DependencyStatus;
use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;

static NUMERIC_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([\d.]+)").unwrap());

static PRERELEASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(a|b|rc|dev|alpha|beta)").unwrap());

/// Comparable numeric prefix of a version string
#[derive(Debug, Clone, Default)]
pub struct VersionTuple(Vec<u64>);

impl VersionTuple {
    /// Parse the leading numeric part of a version string. Never fails.
    pub fn parse(version: &str) -> Self {
        let Some(caps) = NUMERIC_PREFIX_RE.captures(version) else {
            return Self::default();
        };

        let parts = caps[1]
            .split('.')
            .filter(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
            .map(|part| part.parse::<u64>().unwrap_or(u64::MAX))
            .collect();

        Self(parts)
    }

    /// True when no numeric group was found
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The numeric groups
    pub fn parts(&self) -> &[u64] {
        &self.0
    }
}

impl Ord for VersionTuple {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.0.len().max(other.0.len());
        (0..len)
            .map(|i| {
                let a = self.0.get(i).copied().unwrap_or(0);
                let b = other.0.get(i).copied().unwrap_or(0);
                a.cmp(&b)
            })
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for VersionTuple {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for VersionTuple {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for VersionTuple {}

/// `a >= b` on version tuples
pub fn is_at_least(a: &str, b: &str) -> bool {
    VersionTuple::parse(a) >= VersionTuple::parse(b)
}

/// Classify a current minimum against a latest version
///
/// Either side empty yields `Unknown`.
pub fn compare_versions(current: &str, latest: &str) -> DependencyStatus {
    if current.is_empty() || latest.is_empty() {
        return DependencyStatus::Unknown;
    }
    if is_at_least(current, latest) {
        DependencyStatus::UpToDate
    } else {
        DependencyStatus::Outdated
    }
}

/// Whether a release string looks like a pre-release
///
/// Deliberately coarse: any `a`, `b`, `rc`, `dev`, `alpha` or `beta`
/// substring counts.
pub fn is_prerelease(version: &str) -> bool {
    PRERELEASE_RE.is_match(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        assert_eq!(VersionTuple::parse("1.2.3").parts(), &[1, 2, 3]);
    }

    #[test]
    fn test_parse_truncates_suffix() {
        assert_eq!(VersionTuple::parse("2.0.0rc1").parts(), &[2, 0, 0]);
        assert_eq!(VersionTuple::parse("1.0.post1").parts(), &[1, 0]);
    }

    #[test]
    fn test_parse_non_numeric() {
        assert!(VersionTuple::parse("abc").is_empty());
        assert!(VersionTuple::parse("").is_empty());
    }

    #[test]
    fn test_parse_skips_empty_groups() {
        assert_eq!(VersionTuple::parse("1..2").parts(), &[1, 2]);
    }

    #[test]
    fn test_parse_saturates_oversized_group() {
        let huge = VersionTuple::parse("1.99999999999999999999.3");
        assert_eq!(huge.parts(), &[1, u64::MAX, 3]);
        assert!(is_at_least("1.99999999999999999999", "1.5"));
        assert!(!is_at_least("1.5", "1.99999999999999999999"));
    }

    #[test]
    fn test_zero_padding_equality() {
        assert_eq!(VersionTuple::parse("1.0"), VersionTuple::parse("1.0.0"));
        assert!(VersionTuple::parse("1.0.1") > VersionTuple::parse("1.0"));
    }

    #[test]
    fn test_prerelease_equals_release() {
        assert!(is_at_least("1.0.0a1", "1.0.0"));
        assert!(is_at_least("1.0.0", "1.0.0a1"));
    }

    #[test]
    fn test_compare_versions() {
        assert_eq!(compare_versions("1.0", "2.0"), DependencyStatus::Outdated);
        assert_eq!(compare_versions("2.0", "2.0"), DependencyStatus::UpToDate);
        assert_eq!(compare_versions("3.0", "2.0"), DependencyStatus::UpToDate);
        assert_eq!(compare_versions("", "2.0"), DependencyStatus::Unknown);
        assert_eq!(compare_versions("1.0", ""), DependencyStatus::Unknown);
    }

    #[test]
    fn test_numeric_not_lexicographic() {
        assert!(is_at_least("1.10", "1.9"));
    }

    #[test]
    fn test_is_prerelease() {
        assert!(is_prerelease("2.0.0rc1"));
        assert!(is_prerelease("1.0a1"));
        assert!(is_prerelease("1.0.dev3"));
        assert!(is_prerelease("1.0B2"));
        assert!(!is_prerelease("1.5.0"));
        assert!(!is_prerelease("1.0.post1"));
    }
}
