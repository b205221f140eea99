//! Text output formatter for human-readable display
//!
//! This module provides:
//! - The grouped dependency report with aligned columns
//! - Status icons and a per-status summary
//! - Update and install progress messages

use crate::domain::{DependencyRecord, DependencyStatus, InstallPlanEntry, ReportSummary};
use crate::manifest::WriteResult;
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Rendered report text and the exit code it implies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub text: String,
    pub exit_code: i32,
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether this is a dry-run
    dry_run: bool,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity, dry_run: bool) -> Self {
        Self {
            verbosity,
            dry_run,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, dry_run: bool, color: bool) -> Self {
        Self {
            verbosity,
            dry_run,
            color,
        }
    }

    fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    /// Get the dry-run prefix if applicable
    fn dry_run_prefix(&self) -> String {
        if !self.dry_run {
            String::new()
        } else if self.color {
            format!("{} ", "[DRY RUN]".cyan())
        } else {
            "[DRY RUN] ".to_string()
        }
    }

    /// Paint a status token; `text` is already padded so widths stay intact
    fn paint(&self, status: DependencyStatus, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        match status {
            DependencyStatus::UpToDate => text.green().to_string(),
            DependencyStatus::Outdated => text.yellow().bold().to_string(),
            DependencyStatus::Pinned => text.blue().to_string(),
            DependencyStatus::Unknown => text.dimmed().to_string(),
            DependencyStatus::Error => text.red().to_string(),
        }
    }

    /// Render the dependency report
    ///
    /// Records are grouped by source label; up-to-date records are hidden
    /// unless verbose. The summary always counts every record.
    pub fn render(&self, records: &[DependencyRecord]) -> Report {
        if records.is_empty() {
            return Report {
                text: "No dependencies found in pyproject.toml\n".to_string(),
                exit_code: 0,
            };
        }

        let verbose = self.verbosity == Verbosity::Verbose;
        let mut by_source: BTreeMap<&str, Vec<&DependencyRecord>> = BTreeMap::new();
        for record in records {
            by_source.entry(record.source.as_str()).or_default().push(record);
        }

        let mut lines: Vec<String> = Vec::new();

        for (source, group) in by_source {
            let mut shown: Vec<&DependencyRecord> = group
                .into_iter()
                .filter(|r| verbose || r.status != DependencyStatus::UpToDate)
                .collect();
            if shown.is_empty() {
                continue;
            }
            shown.sort_by_key(|r| r.name.to_lowercase());

            let name_width = shown.iter().map(|r| r.name.chars().count()).max().unwrap_or(0);
            let constraint_width = shown
                .iter()
                .map(|r| r.constraint.chars().count())
                .max()
                .unwrap_or(0);
            let latest_width = shown.iter().map(|r| r.latest.chars().count()).max().unwrap_or(0);

            lines.push(String::new());
            let header = format!("{}:", source);
            lines.push(if self.color {
                header.bold().to_string()
            } else {
                header
            });
            lines.push("-".repeat(source.chars().count() + 1));

            for record in shown {
                let constraint = if record.constraint.is_empty() {
                    "(any)"
                } else {
                    record.constraint.as_str()
                };
                lines.push(format!(
                    "  {} {:<nw$}  {:<cw$}  -> {:<lw$}  [{}]",
                    self.paint(record.status, record.status.icon()),
                    record.name,
                    constraint,
                    record.latest,
                    self.paint(record.status, record.status.as_str()),
                    nw = name_width,
                    cw = constraint_width,
                    lw = latest_width,
                ));
            }
        }

        let summary = ReportSummary::from_records(records);
        lines.push(String::new());
        lines.push(format!("Summary: {} dependencies checked", summary.total));
        lines.push(format!("  Up-to-date: {}", summary.up_to_date));
        lines.push(format!("  Pinned:     {}", summary.pinned));
        lines.push(format!("  Outdated:   {}", summary.outdated));
        lines.push(format!("  Unknown:    {}", summary.unknown));
        lines.push(format!("  Errors:     {}", summary.errors));

        if summary.has_outdated() && !verbose {
            lines.push(String::new());
            lines.push("Run with --verbose to see all dependencies".to_string());
        }

        let mut text = lines.join("\n");
        text.push('\n');

        Report {
            text,
            exit_code: summary.exit_code(),
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format_check_start(&self, path: &Path, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.is_quiet() {
            return Ok(());
        }
        writeln!(writer, "Checking dependencies in {}...", path.display())
    }

    fn format_report(
        &self,
        records: &[DependencyRecord],
        writer: &mut dyn Write,
    ) -> std::io::Result<i32> {
        let report = self.render(records);
        if !self.is_quiet() {
            write!(writer, "{}", report.text)?;
        }
        Ok(report.exit_code)
    }

    fn format_write_result(
        &self,
        result: &WriteResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if self.is_quiet() {
            return Ok(());
        }

        if result.candidates == 0 {
            return writeln!(writer, "All dependencies are up-to-date!");
        }

        let prefix = self.dry_run_prefix();
        writeln!(
            writer,
            "\n{}Updating {} dependencies:\n",
            prefix, result.candidates
        )?;

        for patch in &result.patches {
            if patch.applied {
                writeln!(
                    writer,
                    "  {}: {} -> {}",
                    patch.name, patch.original_spec, patch.new_spec
                )?;
            } else {
                let note = "Could not locate in file (manual update needed)";
                if self.color {
                    writeln!(writer, "  {}: {}", patch.name, note.red())?;
                } else {
                    writeln!(writer, "  {}: {}", patch.name, note)?;
                }
            }
        }

        if !result.has_updates() {
            writeln!(writer, "\nNo dependencies were updated")
        } else if result.dry_run {
            writeln!(
                writer,
                "\n{}Would update {} dependencies",
                prefix, result.updates_applied
            )
        } else {
            writeln!(
                writer,
                "\nUpdated {} dependencies in {}",
                result.updates_applied,
                result.path.display()
            )
        }
    }

    fn format_install_plan(
        &self,
        plan: &[InstallPlanEntry],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if self.is_quiet() {
            return Ok(());
        }

        if plan.is_empty() {
            return writeln!(
                writer,
                "\nAll installed packages match pyproject.toml requirements!"
            );
        }

        let prefix = self.dry_run_prefix();
        writeln!(writer, "\n{}Packages needing installation/update:\n", prefix)?;

        let mut entries: Vec<&InstallPlanEntry> = plan.iter().collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        for entry in entries {
            let installed = entry.installed_version.as_deref().unwrap_or("NOT INSTALLED");
            writeln!(
                writer,
                "  {}: {} -> >={}",
                entry.name, installed, entry.required_minimum
            )?;
        }

        if self.dry_run {
            writeln!(writer, "\n{}Would install/update {} packages", prefix, plan.len())
        } else {
            writeln!(writer, "\nInstalling/updating packages...")
        }
    }

    fn format_install_result(
        &self,
        plan: &[InstallPlanEntry],
        exit_code: i32,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if self.dry_run || plan.is_empty() {
            return Ok(());
        }

        if exit_code != 0 {
            let message = format!("pip install failed with exit code {}", exit_code);
            if self.color {
                writeln!(writer, "\n{}", message.red())
            } else {
                writeln!(writer, "\n{}", message)
            }
        } else if self.is_quiet() {
            Ok(())
        } else {
            writeln!(
                writer,
                "\nSuccessfully installed/updated {} packages",
                plan.len()
            )
        }
    }
}
