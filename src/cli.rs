//! CLI argument parsing module for depcheck

use crate::error::ConfigError;
use crate::package_manager::DEFAULT_PYTHON;
use crate::registry::PYPI_API_URL;
use clap::Parser;
use std::path::PathBuf;

/// Parse a positive number of concurrent index requests
fn parse_jobs(s: &str) -> Result<usize, String> {
    let jobs: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid number of jobs: {}", s))?;
    if jobs == 0 {
        return Err("jobs must be at least 1".to_string());
    }
    Ok(jobs)
}

/// Check and update pyproject.toml dependencies against PyPI
#[derive(Parser, Debug, Clone)]
#[command(
    name = "depcheck",
    version,
    about = "Check and update pyproject.toml dependencies against PyPI"
)]
pub struct CliArgs {
    /// Project directory or path to pyproject.toml
    #[arg(default_value = ".")]
    pub path: PathBuf,

    // Mode options
    /// Rewrite outdated minimums and install missing or stale packages
    #[arg(short, long)]
    pub update: bool,

    /// Dry run mode - show what would change without writing or installing
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    // Output options
    /// Show all dependencies, including up-to-date ones
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    // Index options
    /// Base URL of the JSON package index
    #[arg(long, default_value = PYPI_API_URL)]
    pub index_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Maximum number of concurrent index requests
    #[arg(short, long, default_value = "10", value_parser = parse_jobs)]
    pub jobs: usize,

    // Install options
    /// Python interpreter whose environment is synchronized
    #[arg(long, default_value = DEFAULT_PYTHON)]
    pub python: String,
}

impl CliArgs {
    /// Reject option combinations that cannot be honored together
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quiet && self.verbose {
            return Err(ConfigError::ConflictingOptions {
                message: "--quiet and --verbose cannot be used together".to_string(),
            });
        }
        if !self.path.exists() {
            return Err(ConfigError::InvalidPath {
                path: self.path.clone(),
                message: "path does not exist".to_string(),
            });
        }
        if self.dry_run && !self.update {
            tracing::debug!("--dry-run has no effect without --update");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["depcheck"]);
        assert_eq!(args.path, PathBuf::from("."));
        assert!(!args.update);
        assert!(!args.dry_run);
        assert!(!args.verbose);
        assert!(!args.quiet);
        assert!(!args.json);
        assert_eq!(args.index_url, "https://pypi.org/pypi");
        assert_eq!(args.timeout, 10);
        assert_eq!(args.jobs, 10);
        assert_eq!(args.python, "python3");
    }

    #[test]
    fn test_path_argument() {
        let args = CliArgs::parse_from(["depcheck", "/some/project/pyproject.toml"]);
        assert_eq!(args.path, PathBuf::from("/some/project/pyproject.toml"));
    }

    #[test]
    fn test_update_flags() {
        let args = CliArgs::parse_from(["depcheck", "-u", "-n"]);
        assert!(args.update);
        assert!(args.dry_run);

        let args = CliArgs::parse_from(["depcheck", "--update", "--dry-run"]);
        assert!(args.update);
        assert!(args.dry_run);
    }

    #[test]
    fn test_verbose_flags() {
        assert!(CliArgs::parse_from(["depcheck", "-v"]).verbose);
        assert!(CliArgs::parse_from(["depcheck", "--verbose"]).verbose);
    }

    #[test]
    fn test_quiet_flags() {
        assert!(CliArgs::parse_from(["depcheck", "-q"]).quiet);
        assert!(CliArgs::parse_from(["depcheck", "--quiet"]).quiet);
    }

    #[test]
    fn test_index_options() {
        let args = CliArgs::parse_from([
            "depcheck",
            "--index-url",
            "http://127.0.0.1:9",
            "--timeout",
            "2",
            "-j",
            "1",
        ]);
        assert_eq!(args.index_url, "http://127.0.0.1:9");
        assert_eq!(args.timeout, 2);
        assert_eq!(args.jobs, 1);
    }

    #[test]
    fn test_zero_jobs_rejected() {
        assert!(CliArgs::try_parse_from(["depcheck", "--jobs", "0"]).is_err());
        assert!(CliArgs::try_parse_from(["depcheck", "--jobs", "many"]).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(CliArgs::try_parse_from(["depcheck", "--timeout", "0"]).is_err());
    }

    #[test]
    fn test_python_option() {
        let args = CliArgs::parse_from(["depcheck", "--python", "/opt/venv/bin/python"]);
        assert_eq!(args.python, "/opt/venv/bin/python");
    }

    #[test]
    fn test_validate_conflicting_verbosity() {
        let args = CliArgs::parse_from(["depcheck", "-q", "-v"]);
        assert!(matches!(
            args.validate(),
            Err(ConfigError::ConflictingOptions { .. })
        ));
    }

    #[test]
    fn test_validate_missing_path() {
        let args = CliArgs::parse_from(["depcheck", "/nonexistent/project"]);
        assert!(matches!(
            args.validate(),
            Err(ConfigError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_validate_ok() {
        assert!(CliArgs::parse_from(["depcheck", "-u", "-n", "--json"])
            .validate()
            .is_ok());
    }

    #[test]
    fn test_parse_jobs() {
        assert_eq!(parse_jobs("4"), Ok(4));
        assert!(parse_jobs("0").is_err());
        assert!(parse_jobs("-1").is_err());
    }
}
