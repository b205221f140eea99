//! Dependency extraction: manifest view to classified records
//!
//! Registry lookups run concurrently behind a semaphore; records come back
//! in declaration order whatever order the lookups finish in.

use crate::domain::DependencyRecord;
use crate::manifest::ManifestView;
use crate::parser::{self, is_direct_reference, normalize_name, DependencySpecifier};
use crate::progress::Progress;
use crate::registry::{PackageRegistry, RegistryPackageInfo};
use crate::update::classify;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Default concurrency limit for registry requests
pub const DEFAULT_CONCURRENCY: usize = 10;

/// One declaration that needs a registry lookup
struct PendingDeclaration {
    source: String,
    original_spec: String,
    spec: DependencySpecifier,
}

/// Builds [`DependencyRecord`]s for every registry-served declaration
pub struct DependencyExtractor {
    registry: Arc<dyn PackageRegistry>,
    concurrency: usize,
}

impl DependencyExtractor {
    /// Create an extractor with the default concurrency
    pub fn new(registry: Arc<dyn PackageRegistry>) -> Self {
        Self::with_concurrency(registry, DEFAULT_CONCURRENCY)
    }

    /// Create an extractor allowing `concurrency` lookups in flight
    pub fn with_concurrency(registry: Arc<dyn PackageRegistry>, concurrency: usize) -> Self {
        Self {
            registry,
            concurrency: concurrency.max(1),
        }
    }

    /// Declarations that will be looked up, in manifest order
    ///
    /// Blank entries, direct URL references, unnamed entries and names served
    /// from outside the registry are dropped here and never fetched.
    fn pending(view: &ManifestView) -> Vec<PendingDeclaration> {
        let mut pending = Vec::new();

        for site in &view.sites {
            for raw in &site.specifiers {
                let original_spec = raw.trim();
                if original_spec.is_empty() || is_direct_reference(original_spec) {
                    continue;
                }

                let spec = parser::parse(original_spec);
                if spec.name.is_empty() {
                    continue;
                }

                if view.non_registry.contains(&normalize_name(&spec.name)) {
                    tracing::debug!(package = %spec.name, "skipping non-registry dependency");
                    continue;
                }

                pending.push(PendingDeclaration {
                    source: site.source.clone(),
                    original_spec: original_spec.to_string(),
                    spec,
                });
            }
        }

        pending
    }

    /// Number of registry lookups `extract` would perform
    pub fn lookup_count(view: &ManifestView) -> usize {
        Self::pending(view).len()
    }

    /// Classify every declaration in `view`
    pub async fn extract(&self, view: &ManifestView, progress: &Progress) -> Vec<DependencyRecord> {
        let pending = Self::pending(view);
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for (index, declaration) in pending.iter().enumerate() {
            let registry = Arc::clone(&self.registry);
            let semaphore = Arc::clone(&semaphore);
            let name = declaration.spec.name.clone();

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let info = match registry.fetch(&name).await {
                    Ok(info) => Some(info),
                    Err(e) => {
                        tracing::debug!(package = %name, error = %e, "registry lookup failed");
                        None
                    }
                };
                (index, info)
            });
        }

        let mut fetched: Vec<Option<RegistryPackageInfo>> = vec![None; pending.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, info)) => fetched[index] = info,
                Err(e) => tracing::warn!(error = %e, "registry lookup task failed"),
            }
            progress.inc();
        }

        pending
            .into_iter()
            .zip(fetched)
            .map(|(declaration, info)| {
                let classification = classify(&declaration.spec, info.as_ref());
                DependencyRecord::new(
                    declaration.spec,
                    declaration.source,
                    declaration.original_spec,
                    classification,
                )
            })
            .collect()
    }
}
