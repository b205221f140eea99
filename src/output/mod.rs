//! Output formatting for check, update and install results
//!
//! This module provides:
//! - Text output for human-readable display
//! - JSON output for machine processing

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::{Report, TextFormatter};

use crate::domain::{DependencyRecord, InstallPlanEntry};
use crate::manifest::WriteResult;
use std::io::Write;
use std::path::Path;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for machine processing
    Json,
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Minimal output
    Quiet,
    /// Normal output
    #[default]
    Normal,
    /// Detailed output, including up-to-date dependencies
    Verbose,
}

/// Configuration for output formatting
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Output format (text, json)
    pub format: OutputFormat,
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Whether this is a dry-run
    pub dry_run: bool,
    /// Whether to use colors (when supported)
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            verbosity: Verbosity::default(),
            dry_run: false,
            color: true,
        }
    }
}

impl OutputConfig {
    /// Create a new output configuration
    pub fn new(format: OutputFormat, verbosity: Verbosity, dry_run: bool) -> Self {
        Self {
            format,
            verbosity,
            dry_run,
            color: true,
        }
    }

    /// Create configuration from CLI arguments
    pub fn from_cli(json: bool, verbose: bool, quiet: bool, dry_run: bool) -> Self {
        let format = if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };

        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };

        Self {
            format,
            verbosity,
            dry_run,
            color: true,
        }
    }

    /// Whether a progress display should be drawn
    pub fn shows_progress(&self) -> bool {
        self.format == OutputFormat::Text && self.verbosity != Verbosity::Quiet
    }

    /// Whether step failures go to stderr; JSON documents always go to stdout
    pub fn failures_to_stderr(&self) -> bool {
        self.format == OutputFormat::Text
    }
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Announce the manifest about to be checked
    fn format_check_start(&self, path: &Path, writer: &mut dyn Write) -> std::io::Result<()>;

    /// Write the dependency report and return its exit code
    fn format_report(
        &self,
        records: &[DependencyRecord],
        writer: &mut dyn Write,
    ) -> std::io::Result<i32>;

    /// Write the outcome of rewriting the manifest
    fn format_write_result(
        &self,
        result: &WriteResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()>;

    /// Write the packages the installer is about to bring up to date
    fn format_install_plan(
        &self,
        plan: &[InstallPlanEntry],
        writer: &mut dyn Write,
    ) -> std::io::Result<()>;

    /// Write the installer outcome
    fn format_install_result(
        &self,
        plan: &[InstallPlanEntry],
        exit_code: i32,
        writer: &mut dyn Write,
    ) -> std::io::Result<()>;
}

/// Create an output formatter based on configuration
pub fn create_formatter(config: OutputConfig) -> Box<dyn OutputFormatter> {
    match config.format {
        OutputFormat::Text => Box::new(TextFormatter::with_color(
            config.verbosity,
            config.dry_run,
            config.color,
        )),
        OutputFormat::Json => Box::new(JsonFormatter::new(config.dry_run)),
    }
}
