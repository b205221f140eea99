//! Package index access
//!
//! This module provides:
//! - HTTP client shared foundation
//! - PyPI JSON API adapter
//! - Bounded latest-release search over a release set

mod bounded;
mod client;
mod pypi;

pub use bounded::latest_below;
pub use client::{HttpClient, DEFAULT_TIMEOUT};
pub use pypi::{parse_package_info, PyPIAdapter, PYPI_API_URL};

use crate::error::RegistryError;
use async_trait::async_trait;

/// What the index knows about one package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryPackageInfo {
    /// Version the index advertises as current, if any
    pub latest_version: Option<String>,
    /// Every published release string; may be empty
    pub release_versions: Vec<String>,
}

impl RegistryPackageInfo {
    /// Creates package info from a latest version and release list
    pub fn new<I, S>(latest_version: impl Into<String>, releases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            latest_version: Some(latest_version.into()),
            release_versions: releases.into_iter().map(Into::into).collect(),
        }
    }

    /// Advertised latest, empty when the index omits it
    pub fn latest(&self) -> &str {
        self.latest_version.as_deref().unwrap_or_default()
    }

    /// Highest stable release strictly below `bound`
    pub fn latest_below(&self, bound: &str) -> Option<String> {
        latest_below(&self.release_versions, bound)
    }
}

/// Trait for package indexes
#[async_trait]
pub trait PackageRegistry: Send + Sync {
    /// Get the registry name
    fn registry_name(&self) -> &'static str;

    /// Fetch the latest version and release set for a package
    async fn fetch(&self, package: &str) -> Result<RegistryPackageInfo, RegistryError>;
}
