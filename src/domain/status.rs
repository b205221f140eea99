//! Classification outcome of a single dependency declaration

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a dependency relative to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyStatus {
    /// Declared minimum is at or above the registry latest
    UpToDate,
    /// A newer version is allowed by the constraint
    Outdated,
    /// Held below an upper bound with nothing newer in range
    Pinned,
    /// No minimum declared, nothing to compare
    Unknown,
    /// Registry lookup failed
    Error,
}

impl DependencyStatus {
    /// Returns the status label
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyStatus::UpToDate => "up-to-date",
            DependencyStatus::Outdated => "outdated",
            DependencyStatus::Pinned => "pinned",
            DependencyStatus::Unknown => "unknown",
            DependencyStatus::Error => "error",
        }
    }

    /// Returns the fixed-width report icon
    pub fn icon(&self) -> &'static str {
        match self {
            DependencyStatus::UpToDate => "[ok]",
            DependencyStatus::Outdated => "[!!]",
            DependencyStatus::Pinned => "[==]",
            DependencyStatus::Unknown => "[??]",
            DependencyStatus::Error => "[XX]",
        }
    }
}

impl fmt::Display for DependencyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
