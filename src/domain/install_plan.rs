//! Installer plan entries

use serde::Serialize;

/// A package that must be installed or upgraded to satisfy its minimum
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallPlanEntry {
    /// Package name as declared
    pub name: String,
    /// Currently installed version, `None` when absent
    pub installed_version: Option<String>,
    /// Declared minimum version
    pub required_minimum: String,
}

impl InstallPlanEntry {
    /// Creates a new plan entry
    pub fn new(
        name: impl Into<String>,
        installed_version: Option<String>,
        required_minimum: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            installed_version,
            required_minimum: required_minimum.into(),
        }
    }

    /// Installer requirement argument, e.g. `requests>=2.31.0`
    pub fn requirement(&self) -> String {
        format!("{}>={}", self.name, self.required_minimum)
    }
}
