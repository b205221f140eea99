//! Manifest file writing and update operations
//!
//! This module provides:
//! - ManifestWriter for applying rewritten declarations to pyproject.toml
//! - Dry-run mode support (no actual file modifications)
//! - Per-dependency outcomes so a miss never aborts the batch

use crate::domain::DependencyRecord;
use crate::error::ManifestError;
use crate::manifest::ManifestPatcher;
use crate::update::SpecRewriter;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Writer for manifest files that applies version updates
pub struct ManifestWriter {
    /// Whether to run in dry-run mode (no file modifications)
    dry_run: bool,
}

/// Result of patching one declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchOutcome {
    /// Package name
    pub name: String,
    /// Declaration before the update
    pub original_spec: String,
    /// Declaration after the update
    pub new_spec: String,
    /// Whether the declaration was found in the manifest text
    pub applied: bool,
}

/// Result of applying updates to a manifest file
#[derive(Debug, Clone, Serialize)]
pub struct WriteResult {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Number of outdated records considered
    pub candidates: usize,
    /// Outcome for every attempted declaration, in record order
    pub patches: Vec<PatchOutcome>,
    /// Number of updates successfully applied
    pub updates_applied: usize,
    /// Whether the file was actually modified
    pub file_modified: bool,
    /// Whether this was a dry-run
    pub dry_run: bool,
}

impl WriteResult {
    /// Create a new WriteResult
    fn new(path: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            path: path.into(),
            candidates: 0,
            patches: Vec::new(),
            updates_applied: 0,
            file_modified: false,
            dry_run,
        }
    }

    /// Returns true if any updates were successfully applied
    pub fn has_updates(&self) -> bool {
        self.updates_applied > 0
    }

    /// Declarations that could not be located in the file
    pub fn misses(&self) -> impl Iterator<Item = &PatchOutcome> {
        self.patches.iter().filter(|p| !p.applied)
    }
}

impl ManifestWriter {
    /// Create a new ManifestWriter
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Check if this writer is in dry-run mode
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Rewrite every outdated record's declaration in the manifest at `path`
    ///
    /// The file is read once and written at most once. Records whose rewrite
    /// equals their original text are not attempted.
    pub fn apply_updates(
        &self,
        path: &Path,
        records: &[DependencyRecord],
    ) -> Result<WriteResult, ManifestError> {
        let mut result = WriteResult::new(path, self.dry_run);
        let outdated: Vec<&DependencyRecord> =
            records.iter().filter(|r| r.is_outdated()).collect();
        result.candidates = outdated.len();
        if outdated.is_empty() {
            return Ok(result);
        }

        let mut content = read_manifest(path)?;

        for record in outdated {
            if record.original_spec.is_empty() {
                continue;
            }

            let new_spec = SpecRewriter::rewrite(record);
            if new_spec == record.original_spec {
                continue;
            }

            let (patched, applied) = ManifestPatcher::apply(&content, record, &new_spec);
            if applied {
                content = patched;
                result.updates_applied += 1;
            } else {
                tracing::warn!(
                    package = %record.name,
                    spec = %record.original_spec,
                    "declaration not found in manifest"
                );
            }

            result.patches.push(PatchOutcome {
                name: record.name.clone(),
                original_spec: record.original_spec.clone(),
                new_spec,
                applied,
            });
        }

        // Write back to file if not in dry-run mode and there were changes
        if result.updates_applied > 0 && !self.dry_run {
            write_manifest(path, &content)?;
            result.file_modified = true;
        }

        Ok(result)
    }
}

/// Read a manifest file content safely
pub fn read_manifest(path: &Path) -> Result<String, ManifestError> {
    fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))
}

/// Write content to a manifest file
pub fn write_manifest(path: &Path, content: &str) -> Result<(), ManifestError> {
    fs::write(path, content).map_err(|e| ManifestError::write_error(path, e))
}
