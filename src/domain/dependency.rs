//! Dependency records produced by one extraction pass

use super::DependencyStatus;
use crate::parser::DependencySpecifier;
use serde::Serialize;

/// Literal `latest` value for a registry miss
pub const NOT_FOUND: &str = "not found";

/// Status and display latest computed together from registry data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Resulting status
    pub status: DependencyStatus,
    /// Display string: a version, an annotated version, or `not found`
    pub latest: String,
}

impl Classification {
    /// Creates a new classification
    pub fn new(status: DependencyStatus, latest: impl Into<String>) -> Self {
        Self {
            status,
            latest: latest.into(),
        }
    }
}

/// One dependency declaration together with its registry classification
///
/// The same package may appear once per declaration site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyRecord {
    /// Package name as declared
    pub name: String,
    /// Label of the manifest section that declared it
    pub source: String,
    /// Raw constraint text, may be empty
    pub constraint: String,
    /// Declared minimum version, may be empty
    pub minimum_version: String,
    /// Display latest, see [`Classification::latest`]
    pub latest: String,
    /// Classification status
    pub status: DependencyStatus,
    /// Declaration exactly as written in the manifest
    pub original_spec: String,
    /// Exclusive ceiling, may be empty
    pub upper_bound: String,
}

impl DependencyRecord {
    /// Build a record from a parsed specifier and its classification
    pub fn new(
        spec: DependencySpecifier,
        source: impl Into<String>,
        original_spec: impl Into<String>,
        classification: Classification,
    ) -> Self {
        Self {
            name: spec.name,
            source: source.into(),
            constraint: spec.constraint,
            minimum_version: spec.minimum_version,
            latest: classification.latest,
            status: classification.status,
            original_spec: original_spec.into(),
            upper_bound: spec.upper_bound,
        }
    }

    /// Version part of `latest` without any annotation
    pub fn latest_version(&self) -> &str {
        self.latest.split(' ').next().unwrap_or_default()
    }

    /// Returns true if a newer allowed version exists
    pub fn is_outdated(&self) -> bool {
        self.status == DependencyStatus::Outdated
    }

    /// Returns true if the registry lookup failed
    pub fn is_not_found(&self) -> bool {
        self.latest == NOT_FOUND
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn record(raw: &str, classification: Classification) -> DependencyRecord {
        DependencyRecord::new(
            parser::parse(raw),
            "[project].dependencies",
            raw,
            classification,
        )
    }

    #[test]
    fn test_new_copies_specifier_fields() {
        let rec = record(
            "pytest>=8.4.2,<9",
            Classification::new(DependencyStatus::Pinned, "10.0.0 (pinned <9)"),
        );
        assert_eq!(rec.name, "pytest");
        assert_eq!(rec.constraint, ">=8.4.2,<9");
        assert_eq!(rec.minimum_version, "8.4.2");
        assert_eq!(rec.upper_bound, "9");
        assert_eq!(rec.original_spec, "pytest>=8.4.2,<9");
        assert_eq!(rec.status, DependencyStatus::Pinned);
    }

    #[test]
    fn test_latest_version_strips_annotation() {
        let rec = record(
            "pytest>=8.4.2,<9",
            Classification::new(DependencyStatus::Outdated, "8.5.0 (max <9, absolute: 10.0.0)"),
        );
        assert_eq!(rec.latest_version(), "8.5.0");
        assert!(rec.is_outdated());
    }

    #[test]
    fn test_not_found() {
        let rec = record(
            "ghost>=1.0",
            Classification::new(DependencyStatus::Error, NOT_FOUND),
        );
        assert!(rec.is_not_found());
        assert!(!rec.is_outdated());
    }

    #[test]
    fn test_serializes_status_label() {
        let rec = record(
            "requests>=1.0.0",
            Classification::new(DependencyStatus::Outdated, "2.31.0"),
        );
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["status"], "outdated");
        assert_eq!(json["minimum_version"], "1.0.0");
    }
}
