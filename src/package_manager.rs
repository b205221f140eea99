//! Reconciling the local Python environment with declared minimums
//!
//! This module provides:
//! - Discovery of the target interpreter's prefix, site directories and version
//! - A local package inventory from the interpreter's own distribution metadata
//! - Planning and running one batched `pip install --upgrade`

use crate::domain::{DependencyRecord, InstallPlanEntry};
use crate::error::InstallError;
use crate::parser::{normalize_name, VersionTuple};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Interpreter used when none is given
pub const DEFAULT_PYTHON: &str = "python3";

/// PEP 668 marker file name
const EXTERNALLY_MANAGED: &str = "EXTERNALLY-MANAGED";

/// Printed as JSON by the interpreter on discovery
///
/// `distributions` follows `sys.path` order, so the first distribution seen
/// for a name wins, as with `importlib.metadata.version`.
const DISCOVERY_SCRIPT: &str = "\
import json, re, sys, sysconfig
paths = sysconfig.get_paths()
dists = {}
try:
    from importlib import metadata
    for dist in metadata.distributions():
        name = dist.metadata['Name']
        if name and dist.version:
            dists.setdefault(re.sub(r'[-_.]+', '-', name).lower(), dist.version)
except Exception:
    pass
print(json.dumps({
    'executable': sys.executable,
    'prefix': sys.prefix,
    'purelib': paths.get('purelib', ''),
    'platlib': paths.get('platlib', ''),
    'version': '%d.%d' % sys.version_info[:2],
    'platform': sys.platform,
    'distributions': dists,
}))";

/// Source of installed package versions
pub trait PackageInventory {
    /// Installed version of `name`, `None` when absent
    fn version_of(&self, name: &str) -> Option<String>;
}

impl PackageInventory for HashMap<String, String> {
    fn version_of(&self, name: &str) -> Option<String> {
        self.get(&normalize_name(name)).cloned()
    }
}

/// Runs an external command to completion
pub trait ProcessRunner {
    /// Run `argv` and return its exit code
    fn run(&self, argv: &[String]) -> Result<i32, InstallError>;
}

/// Runner that executes real commands, inheriting the terminal
#[derive(Debug, Default)]
pub struct SystemProcessRunner {
    /// Send the child's stdout to our stderr (keeps machine output clean)
    stdout_to_stderr: bool,
}

impl SystemProcessRunner {
    /// Create a new system process runner
    pub fn new() -> Self {
        Self::default()
    }

    /// Route the child's stdout to stderr
    pub fn with_stdout_to_stderr(mut self, enabled: bool) -> Self {
        self.stdout_to_stderr = enabled;
        self
    }
}

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, argv: &[String]) -> Result<i32, InstallError> {
        let Some((program, args)) = argv.split_first() else {
            return Err(InstallError::spawn(
                "",
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
            ));
        };

        let mut command = Command::new(program);
        command.args(args);
        if self.stdout_to_stderr {
            command.stdout(Stdio::from(std::io::stderr()));
        }

        tracing::info!(command = %argv.join(" "), "running installer");
        let status = command
            .status()
            .map_err(|e| InstallError::spawn(program.as_str(), e))?;

        // Killed by a signal: report a generic failure
        Ok(status.code().unwrap_or(1))
    }
}

/// Facts about the target interpreter
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PythonEnvironment {
    /// Absolute interpreter path
    pub executable: String,
    /// `sys.prefix`
    pub prefix: PathBuf,
    /// Pure-Python site directory
    pub purelib: PathBuf,
    /// Platform-specific site directory
    pub platlib: PathBuf,
    /// `major.minor`
    pub version: String,
    /// `sys.platform`
    pub platform: String,
    /// Installed distributions visible on `sys.path`, normalized name to version
    #[serde(default)]
    pub distributions: HashMap<String, String>,
}

impl PythonEnvironment {
    /// Query `python` for its environment
    pub fn discover(python: &str) -> Result<Self, InstallError> {
        let output = Command::new(python)
            .args(["-c", DISCOVERY_SCRIPT])
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| InstallError::spawn(python, e))?;

        if !output.status.success() {
            return Err(InstallError::interpreter_query(
                python,
                format!("exited with {}", output.status),
            ));
        }

        Self::from_json(python, &output.stdout)
    }

    /// Decode the discovery script output
    pub fn from_json(python: &str, bytes: &[u8]) -> Result<Self, InstallError> {
        serde_json::from_slice(bytes)
            .map_err(|e| InstallError::interpreter_query(python, e.to_string()))
    }

    /// Site directories to scan, without duplicates
    pub fn site_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = vec![self.purelib.clone()];
        if self.platlib != self.purelib {
            dirs.push(self.platlib.clone());
        }
        dirs
    }

    /// Whether pip needs `--break-system-packages` (PEP 668, Linux only)
    pub fn is_externally_managed(&self) -> bool {
        if !self.platform.starts_with("linux") {
            return false;
        }
        self.prefix.join(EXTERNALLY_MANAGED).exists()
            || self
                .prefix
                .join("lib")
                .join(format!("python{}", self.version))
                .join(EXTERNALLY_MANAGED)
                .exists()
    }

    /// `pip install --upgrade` command prefix for this interpreter
    pub fn pip_install_command(&self) -> Vec<String> {
        let mut command: Vec<String> = [
            self.executable.as_str(),
            "-m",
            "pip",
            "install",
            "--upgrade",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        if self.is_externally_managed() {
            command.push("--break-system-packages".to_string());
        }
        command
    }
}

/// Installed versions of the target interpreter
#[derive(Debug, Clone, Default)]
pub struct InstalledInventory {
    /// Normalized name to version
    versions: HashMap<String, String>,
}

impl InstalledInventory {
    /// Inventory reported by the interpreter's metadata
    ///
    /// Interpreters without `importlib.metadata` report nothing; their site
    /// directories are scanned instead.
    pub fn from_environment(environment: &PythonEnvironment) -> Self {
        if environment.distributions.is_empty() {
            tracing::debug!("no distribution metadata reported, scanning site directories");
            return Self::scan(&environment.site_dirs());
        }

        let mut inventory = Self::default();
        for (name, version) in &environment.distributions {
            inventory
                .versions
                .entry(normalize_name(name))
                .or_insert_with(|| version.clone());
        }
        inventory
    }

    /// Read `*.dist-info` / `*.egg-info` names; unreadable directories are skipped
    pub fn scan(dirs: &[PathBuf]) -> Self {
        let mut inventory = Self::default();
        for dir in dirs {
            let Ok(entries) = std::fs::read_dir(dir) else {
                tracing::debug!(dir = %dir.display(), "site directory not readable");
                continue;
            };
            for entry in entries.flatten() {
                if let Some((name, version)) = parse_metadata_dir(&entry.path()) {
                    inventory.versions.entry(name).or_insert(version);
                }
            }
        }
        inventory
    }

    /// Number of installed distributions found
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Returns true if nothing was found
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

impl PackageInventory for InstalledInventory {
    fn version_of(&self, name: &str) -> Option<String> {
        self.versions.version_of(name)
    }
}

/// `(normalized name, version)` from a metadata directory name
///
/// `foo_bar-1.2.3.dist-info` and `foo_bar-1.2.3-py3.12.egg-info` both give
/// `("foo-bar", "1.2.3")`.
fn parse_metadata_dir(path: &Path) -> Option<(String, String)> {
    let file_name = path.file_name()?.to_str()?;
    let stem = file_name
        .strip_suffix(".dist-info")
        .or_else(|| file_name.strip_suffix(".egg-info"))?;
    let (name, rest) = stem.split_once('-')?;
    let version = rest.split('-').next()?;
    if name.is_empty() || version.is_empty() {
        return None;
    }
    Some((normalize_name(name), version.to_string()))
}

/// Plans and runs installs for declared minimums
pub struct InstalledSyncer<'a> {
    inventory: &'a dyn PackageInventory,
    runner: &'a dyn ProcessRunner,
    install_command: Vec<String>,
}

impl<'a> InstalledSyncer<'a> {
    /// Create a syncer; `install_command` is the installer argv before requirements
    pub fn new(
        inventory: &'a dyn PackageInventory,
        runner: &'a dyn ProcessRunner,
        install_command: Vec<String>,
    ) -> Self {
        Self {
            inventory,
            runner,
            install_command,
        }
    }

    /// Records whose minimum is missing locally or newer than what's installed
    pub fn plan(&self, records: &[DependencyRecord]) -> Vec<InstallPlanEntry> {
        records
            .iter()
            .filter(|r| !r.minimum_version.is_empty())
            .filter_map(|r| {
                let installed = self.inventory.version_of(&r.name);
                let behind = match &installed {
                    None => true,
                    Some(v) => VersionTuple::parse(v) < VersionTuple::parse(&r.minimum_version),
                };
                behind.then(|| InstallPlanEntry::new(&r.name, installed, &r.minimum_version))
            })
            .collect()
    }

    /// Full installer argv for `plan`
    pub fn command_for(&self, plan: &[InstallPlanEntry]) -> Vec<String> {
        let mut argv = self.install_command.clone();
        argv.extend(plan.iter().map(InstallPlanEntry::requirement));
        argv
    }

    /// Run the plan
    ///
    /// Dry-run returns the number of entries without running anything; an
    /// empty plan returns 0 without running anything. Otherwise the
    /// installer's exit code is returned as is.
    pub fn apply(&self, plan: &[InstallPlanEntry], dry_run: bool) -> Result<i32, InstallError> {
        if dry_run {
            return Ok(plan.len() as i32);
        }
        if plan.is_empty() {
            return Ok(0);
        }
        self.runner.run(&self.command_for(plan))
    }
}
