//! PyPI JSON API adapter
//!
//! Fetches package version information from PyPI or a compatible index.
//! API endpoint: https://pypi.org/pypi/{package}/json

use crate::error::RegistryError;
use crate::parser::normalize_name;
use crate::registry::{HttpClient, PackageRegistry, RegistryPackageInfo};
use async_trait::async_trait;
use serde_json::Value;

/// PyPI API base URL
pub const PYPI_API_URL: &str = "https://pypi.org/pypi";

const REGISTRY_NAME: &str = "PyPI";

/// PyPI adapter
pub struct PyPIAdapter {
    client: HttpClient,
    base_url: String,
}

impl PyPIAdapter {
    /// Create a new PyPI adapter
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, PYPI_API_URL)
    }

    /// Create an adapter for a PyPI-compatible index
    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Build the URL for a package
    fn build_url(&self, package: &str) -> String {
        format!("{}/{}/json", self.base_url, normalize_name(package))
    }
}

/// Decode a PyPI JSON document
///
/// A missing or non-string `info.version` leaves `latest_version` empty and a
/// missing or non-object `releases` leaves the release set empty. Only a
/// body that isn't a JSON object is rejected.
pub fn parse_package_info(
    package: &str,
    body: &Value,
) -> Result<RegistryPackageInfo, RegistryError> {
    let Some(document) = body.as_object() else {
        return Err(RegistryError::invalid_response(
            package,
            REGISTRY_NAME,
            "expected a JSON object",
        ));
    };

    let latest_version = document
        .get("info")
        .and_then(|info| info.get("version"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let release_versions = document
        .get("releases")
        .and_then(Value::as_object)
        .map(|releases| releases.keys().cloned().collect())
        .unwrap_or_default();

    Ok(RegistryPackageInfo {
        latest_version,
        release_versions,
    })
}

#[async_trait]
impl PackageRegistry for PyPIAdapter {
    fn registry_name(&self) -> &'static str {
        REGISTRY_NAME
    }

    async fn fetch(&self, package: &str) -> Result<RegistryPackageInfo, RegistryError> {
        let url = self.build_url(package);
        tracing::debug!(package, %url, "querying registry");

        let body: Value = self
            .client
            .get_json(&url, package, self.registry_name())
            .await?;

        parse_package_info(package, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pypi_adapter_registry_name() {
        let client = HttpClient::new().unwrap();
        let adapter = PyPIAdapter::new(client);
        assert_eq!(adapter.registry_name(), "PyPI");
    }

    #[test]
    fn test_build_url() {
        let client = HttpClient::new().unwrap();
        let adapter = PyPIAdapter::new(client);
        assert_eq!(
            adapter.build_url("requests"),
            "https://pypi.org/pypi/requests/json"
        );
    }

    #[test]
    fn test_build_url_normalizes_name() {
        let client = HttpClient::new().unwrap();
        let adapter = PyPIAdapter::new(client);
        assert_eq!(
            adapter.build_url("Flask_RESTful"),
            "https://pypi.org/pypi/flask-restful/json"
        );
    }

    #[test]
    fn test_build_url_custom_index() {
        let client = HttpClient::new().unwrap();
        let adapter = PyPIAdapter::with_base_url(client, "http://localhost:8080/pypi/");
        assert_eq!(
            adapter.build_url("rich"),
            "http://localhost:8080/pypi/rich/json"
        );
    }

    #[test]
    fn test_parse_package_info() {
        let body = json!({
            "info": { "version": "2.31.0" },
            "releases": { "2.30.0": [], "2.31.0": [], "3.0.0b1": [] }
        });
        let info = parse_package_info("requests", &body).unwrap();
        assert_eq!(info.latest_version.as_deref(), Some("2.31.0"));
        assert_eq!(info.release_versions.len(), 3);
    }

    #[test]
    fn test_parse_package_info_info_not_object() {
        let body = json!({ "info": "broken", "releases": {} });
        let info = parse_package_info("pkg", &body).unwrap();
        assert_eq!(info.latest_version, None);
        assert_eq!(info.latest(), "");
    }

    #[test]
    fn test_parse_package_info_missing_releases() {
        let body = json!({ "info": { "version": "1.0" }, "releases": [] });
        let info = parse_package_info("pkg", &body).unwrap();
        assert!(info.release_versions.is_empty());
    }

    #[test]
    fn test_parse_package_info_rejects_non_object() {
        let result = parse_package_info("pkg", &json!([1, 2, 3]));
        assert!(matches!(result, Err(RegistryError::InvalidResponse { .. })));
    }
}
