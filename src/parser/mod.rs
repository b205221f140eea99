//! Parsing of dependency declarations and version strings
//!
//! This module provides:
//! - PEP 508 style specifier parsing (name, constraint, minimum, upper bound)
//! - Dotted numeric version tuples and their comparison

pub mod specifier;
pub mod version;

pub use specifier::{is_direct_reference, normalize_name, parse, DependencySpecifier};
pub use version::{compare_versions, is_at_least, is_prerelease, VersionTuple};
