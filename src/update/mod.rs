//! Dependency classification and update planning
//!
//! This module provides:
//! - Pure classification of a parsed declaration against registry data
//! - Concurrent extraction of records from a manifest view
//! - Rewriting of outdated declarations to a new lower bound

mod extractor;
mod rewrite;

pub use extractor::{DependencyExtractor, DEFAULT_CONCURRENCY};
pub use rewrite::SpecRewriter;

use crate::domain::{Classification, DependencyStatus, NOT_FOUND};
use crate::parser::{compare_versions, is_at_least, DependencySpecifier};
use crate::registry::RegistryPackageInfo;

/// Classify a declaration against what the registry reported
///
/// `None` means the registry lookup failed for any reason.
pub fn classify(spec: &DependencySpecifier, info: Option<&RegistryPackageInfo>) -> Classification {
    let Some(info) = info else {
        return Classification::new(DependencyStatus::Error, NOT_FOUND);
    };

    let absolute = info.latest();

    if spec.minimum_version.is_empty() {
        return Classification::new(DependencyStatus::Unknown, absolute);
    }

    let bound = spec.upper_bound.as_str();
    if !bound.is_empty() && is_at_least(absolute, bound) {
        let pinned = || {
            Classification::new(
                DependencyStatus::Pinned,
                format!("{} (pinned <{})", absolute, bound),
            )
        };

        return match info.latest_below(bound) {
            None => pinned(),
            Some(in_range) if is_at_least(&spec.minimum_version, &in_range) => pinned(),
            Some(in_range) => Classification::new(
                DependencyStatus::Outdated,
                format!("{} (max <{}, absolute: {})", in_range, bound, absolute),
            ),
        };
    }

    Classification::new(compare_versions(&spec.minimum_version, absolute), absolute)
}
