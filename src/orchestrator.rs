//! Check/update orchestrator
//!
//! This module provides:
//! - Workflow coordination: read manifest → query index → classify
//! - Manifest rewriting for outdated records (with dry-run support)
//! - Configuration for the registry transport and fetch concurrency

use crate::cli::CliArgs;
use crate::domain::DependencyRecord;
use crate::error::{ManifestError, RegistryError};
use crate::manifest::{ManifestWriter, PyprojectReader, WriteResult};
use crate::progress::Progress;
use crate::registry::{HttpClient, PackageRegistry, PyPIAdapter, DEFAULT_TIMEOUT, PYPI_API_URL};
use crate::update::{DependencyExtractor, DEFAULT_CONCURRENCY};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for the orchestrator
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Maximum concurrent index requests
    pub concurrency: usize,
    /// Per-request timeout
    pub timeout: Duration,
    /// Base URL of the JSON index
    pub index_url: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
            index_url: PYPI_API_URL.to_string(),
        }
    }
}

impl OrchestratorConfig {
    /// Build configuration from CLI arguments
    pub fn from_args(args: &CliArgs) -> Self {
        Self {
            concurrency: args.jobs,
            timeout: Duration::from_secs(args.timeout),
            index_url: args.index_url.clone(),
        }
    }
}

/// Orchestrator for the check and update workflow
pub struct Orchestrator {
    extractor: DependencyExtractor,
}

impl Orchestrator {
    /// Create an orchestrator talking to the configured index
    pub fn new(config: OrchestratorConfig) -> Result<Self, RegistryError> {
        let client = HttpClient::with_timeout(config.timeout)?;
        let registry = Arc::new(PyPIAdapter::with_base_url(client, config.index_url));
        Ok(Self::with_registry(registry, config.concurrency))
    }

    /// Create an orchestrator over any registry (for testing)
    pub fn with_registry(registry: Arc<dyn PackageRegistry>, concurrency: usize) -> Self {
        Self {
            extractor: DependencyExtractor::with_concurrency(registry, concurrency),
        }
    }

    /// Read the manifest at `path` and classify every declaration
    pub async fn check(
        &self,
        path: &Path,
        show_progress: bool,
    ) -> Result<Vec<DependencyRecord>, ManifestError> {
        let mut progress = Progress::new(show_progress);

        progress.spinner("Reading pyproject.toml...");
        let view = PyprojectReader::read(path);
        progress.finish_and_clear();
        let view = view?;

        let lookups = DependencyExtractor::lookup_count(&view);
        tracing::info!(
            manifest = %path.display(),
            declarations = view.declaration_count(),
            lookups,
            "checking dependencies"
        );

        progress.start(lookups as u64, "Checking dependencies");
        let records = self.extractor.extract(&view, &progress).await;
        progress.finish_and_clear();

        Ok(records)
    }

    /// Rewrite outdated declarations in the manifest at `path`
    pub fn apply_updates(
        &self,
        path: &Path,
        records: &[DependencyRecord],
        dry_run: bool,
    ) -> Result<WriteResult, ManifestError> {
        let result = ManifestWriter::new(dry_run).apply_updates(path, records)?;
        tracing::info!(
            manifest = %path.display(),
            applied = result.updates_applied,
            dry_run,
            "manifest update finished"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DependencyStatus;
    use crate::registry::RegistryPackageInfo;
    use async_trait::async_trait;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    struct StaticRegistry;

    #[async_trait]
    impl PackageRegistry for StaticRegistry {
        fn registry_name(&self) -> &'static str {
            "static"
        }

        async fn fetch(&self, package: &str) -> Result<RegistryPackageInfo, RegistryError> {
            match package {
                "requests" => Ok(RegistryPackageInfo::new("2.31.0", ["1.0.0", "2.31.0"])),
                "click" => Ok(RegistryPackageInfo::new("8.1.7", ["8.1.7"])),
                _ => Err(RegistryError::package_not_found(package, "static")),
            }
        }
    }

    fn write_manifest(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("pyproject.toml");
        fs::write(
            &path,
            "[project]\nname = \"demo\"\ndependencies = [\"requests>=1.0.0\", \"click>=8.1.7\"]\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn test_orchestrator_config_default() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.concurrency, 10);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.index_url, "https://pypi.org/pypi");
    }

    #[test]
    fn test_orchestrator_config_from_args() {
        let args = CliArgs::parse_from([
            "depcheck",
            "--jobs",
            "3",
            "--timeout",
            "5",
            "--index-url",
            "http://localhost:8080/pypi",
        ]);
        let config = OrchestratorConfig::from_args(&args);
        assert_eq!(config.concurrency, 3);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.index_url, "http://localhost:8080/pypi");
    }

    #[test]
    fn test_orchestrator_new() {
        assert!(Orchestrator::new(OrchestratorConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_check_classifies_records() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir);
        let orchestrator = Orchestrator::with_registry(Arc::new(StaticRegistry), 2);

        let records = orchestrator.check(&path, false).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].status, DependencyStatus::Outdated);
        assert_eq!(records[1].status, DependencyStatus::UpToDate);
    }

    #[tokio::test]
    async fn test_check_missing_manifest() {
        let dir = TempDir::new().unwrap();
        let orchestrator = Orchestrator::with_registry(Arc::new(StaticRegistry), 2);

        let err = orchestrator
            .check(&dir.path().join("pyproject.toml"), false)
            .await
            .unwrap_err();

        assert!(matches!(err, ManifestError::ReadError { .. }));
    }

    #[tokio::test]
    async fn test_apply_updates_then_recheck() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir);
        let orchestrator = Orchestrator::with_registry(Arc::new(StaticRegistry), 2);

        let records = orchestrator.check(&path, false).await.unwrap();
        let result = orchestrator.apply_updates(&path, &records, false).unwrap();
        assert_eq!(result.updates_applied, 1);
        assert!(result.file_modified);

        let records = orchestrator.check(&path, false).await.unwrap();
        assert!(records.iter().all(|r| r.status == DependencyStatus::UpToDate));
    }
}
