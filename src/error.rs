//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: reading, parsing and writing pyproject.toml
//! - RegistryError: package index communication (always downgraded to a status)
//! - InstallError: interpreter discovery and installer execution
//! - ConfigError: CLI configuration

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Package registry related errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Installer related errors
    #[error(transparent)]
    Install(#[from] InstallError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to manifest file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("manifest file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write manifest file
    #[error("failed to write manifest file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error
    #[error("failed to parse TOML in {path}: {message}")]
    TomlParseError { path: PathBuf, message: String },
}

/// Errors related to package registry communication
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Package not found in registry
    #[error("package '{package}' not found in {registry}")]
    PackageNotFound { package: String, registry: String },

    /// Network request failed
    #[error("failed to fetch package '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Invalid response from registry
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },
}

/// Errors related to the local Python environment and installer
#[derive(Error, Debug)]
pub enum InstallError {
    /// Querying the interpreter for its environment failed
    #[error("failed to query interpreter '{python}': {message}")]
    InterpreterQuery { python: String, message: String },

    /// The installer process could not be started
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid path
    #[error("invalid path '{path}': {message}")]
    InvalidPath { path: PathBuf, message: String },

    /// Conflicting options
    #[error("conflicting options: {message}")]
    ConflictingOptions { message: String },
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new TomlParseError
    pub fn toml_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::TomlParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl RegistryError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::InvalidResponse {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }
}

impl InstallError {
    /// Creates a new InterpreterQuery error
    pub fn interpreter_query(python: impl Into<String>, message: impl Into<String>) -> Self {
        InstallError::InterpreterQuery {
            python: python.into(),
            message: message.into(),
        }
    }

    /// Creates a new Spawn error
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        InstallError::Spawn {
            program: program.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_error_not_found() {
        let err = ManifestError::not_found("/path/to/pyproject.toml");
        let msg = format!("{}", err);
        assert!(msg.contains("manifest file not found"));
        assert!(msg.contains("pyproject.toml"));
    }

    #[test]
    fn test_manifest_error_toml_parse() {
        let err = ManifestError::toml_parse_error("/path/to/pyproject.toml", "invalid key");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to parse TOML"));
        assert!(msg.contains("invalid key"));
    }

    #[test]
    fn test_registry_error_package_not_found() {
        let err = RegistryError::package_not_found("nonexistent-package", "PyPI");
        let msg = format!("{}", err);
        assert!(msg.contains("package 'nonexistent-package' not found"));
        assert!(msg.contains("PyPI"));
    }

    #[test]
    fn test_registry_error_network() {
        let err = RegistryError::network_error("requests", "PyPI", "connection refused");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to fetch"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_registry_error_invalid_response() {
        let err = RegistryError::invalid_response("requests", "PyPI", "expected object");
        assert!(err.to_string().contains("invalid response from PyPI"));
    }

    #[test]
    fn test_registry_error_timeout() {
        let err = RegistryError::timeout("numpy", "PyPI");
        let msg = format!("{}", err);
        assert!(msg.contains("timeout"));
        assert!(msg.contains("numpy"));
    }

    #[test]
    fn test_install_error_messages() {
        let err = InstallError::interpreter_query("python3", "exit status 1");
        assert!(err.to_string().contains("python3"));

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = InstallError::spawn("python9", io);
        assert!(err.to_string().contains("failed to run 'python9'"));
    }

    #[test]
    fn test_config_error_conflicting_options() {
        let err = ConfigError::ConflictingOptions {
            message: "--quiet and --verbose cannot be used together".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("conflicting options"));
    }

    #[test]
    fn test_app_error_from_manifest_error() {
        let app_err: AppError = ManifestError::not_found("/path").into();
        assert!(app_err.to_string().contains("manifest file not found"));
    }

    #[test]
    fn test_app_error_from_install_error() {
        let app_err: AppError = InstallError::interpreter_query("py", "boom").into();
        assert!(app_err.to_string().contains("boom"));
    }

    #[test]
    fn test_error_debug_trait() {
        let err = ManifestError::not_found("/test");
        let debug = format!("{:?}", err);
        assert!(debug.contains("NotFound"));
    }
}
