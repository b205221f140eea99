//! pyproject.toml reading, patching and writing
//!
//! This module provides functionality to:
//! - Locate the manifest for a project path
//! - Expose every dependency declaration site with its source label
//! - Patch declaration strings in place without reformatting the file

mod patcher;
mod pyproject_toml;
mod writer;

pub use patcher::ManifestPatcher;
pub use pyproject_toml::PyprojectReader;
pub use writer::{read_manifest, write_manifest, ManifestWriter, PatchOutcome, WriteResult};

use crate::error::ManifestError;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Manifest file name looked up inside a project directory
pub const MANIFEST_FILENAME: &str = "pyproject.toml";

/// One list of raw declaration strings and the label of its section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationSite {
    /// Human-readable section label, e.g. `[project].dependencies`
    pub source: String,
    /// Raw declarations in manifest order
    pub specifiers: Vec<String>,
}

impl DeclarationSite {
    /// Creates a new declaration site
    pub fn new(source: impl Into<String>, specifiers: Vec<String>) -> Self {
        Self {
            source: source.into(),
            specifiers,
        }
    }
}

/// Everything the extractor needs from a manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestView {
    /// Declaration sites in manifest traversal order
    pub sites: Vec<DeclarationSite>,
    /// Normalized names served from git, paths or URLs rather than the index
    pub non_registry: BTreeSet<String>,
}

impl ManifestView {
    /// Total number of raw declarations across all sites
    pub fn declaration_count(&self) -> usize {
        self.sites.iter().map(|s| s.specifiers.len()).sum()
    }
}

/// Resolve a project directory or manifest file to the manifest path
pub fn locate_manifest(path: &Path) -> Result<PathBuf, ManifestError> {
    let candidate = if path.is_dir() {
        path.join(MANIFEST_FILENAME)
    } else {
        path.to_path_buf()
    };

    if candidate.is_file() {
        Ok(candidate)
    } else {
        Err(ManifestError::not_found(candidate))
    }
}
