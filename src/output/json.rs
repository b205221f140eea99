//! JSON output formatter for machine processing
//!
//! This module provides:
//! - One JSON document per workflow step, tagged with a `kind` field
//! - The full record list (up-to-date included) with its summary

use crate::domain::{DependencyRecord, InstallPlanEntry, ReportSummary};
use crate::manifest::{PatchOutcome, WriteResult};
use crate::output::OutputFormatter;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Whether this is a dry-run
    dry_run: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    fn emit<T: Serialize>(value: &T, writer: &mut dyn Write) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }
}

/// JSON representation of the dependency report
#[derive(Serialize)]
struct JsonReport<'a> {
    kind: &'static str,
    dependencies: &'a [DependencyRecord],
    summary: ReportSummary,
    exit_code: i32,
}

/// JSON representation of a manifest update pass
#[derive(Serialize)]
struct JsonUpdates<'a> {
    kind: &'static str,
    path: String,
    dry_run: bool,
    updates_applied: usize,
    file_modified: bool,
    patches: &'a [PatchOutcome],
}

/// JSON representation of the install plan
#[derive(Serialize)]
struct JsonInstallPlan<'a> {
    kind: &'static str,
    dry_run: bool,
    packages: &'a [InstallPlanEntry],
}

/// JSON representation of the installer outcome
#[derive(Serialize)]
struct JsonInstallResult {
    kind: &'static str,
    packages: usize,
    exit_code: i32,
}

impl OutputFormatter for JsonFormatter {
    fn format_check_start(&self, _path: &Path, _writer: &mut dyn Write) -> std::io::Result<()> {
        Ok(())
    }

    fn format_report(
        &self,
        records: &[DependencyRecord],
        writer: &mut dyn Write,
    ) -> std::io::Result<i32> {
        let summary = ReportSummary::from_records(records);
        let exit_code = summary.exit_code();
        let output = JsonReport {
            kind: "report",
            dependencies: records,
            summary,
            exit_code,
        };
        Self::emit(&output, writer)?;
        Ok(exit_code)
    }

    fn format_write_result(
        &self,
        result: &WriteResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let output = JsonUpdates {
            kind: "updates",
            path: result.path.display().to_string(),
            dry_run: result.dry_run,
            updates_applied: result.updates_applied,
            file_modified: result.file_modified,
            patches: &result.patches,
        };
        Self::emit(&output, writer)
    }

    fn format_install_plan(
        &self,
        plan: &[InstallPlanEntry],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let output = JsonInstallPlan {
            kind: "install_plan",
            dry_run: self.dry_run,
            packages: plan,
        };
        Self::emit(&output, writer)
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
        let output = JsonInstallResult {
            kind: "install_result",
            packages: plan.len(),
            exit_code,
        };
        Self::emit(&output, writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Classification, DependencyStatus};
    use crate::parser;
    use std::path::PathBuf;

    fn record(raw: &str, status: DependencyStatus, latest: &str) -> DependencyRecord {
        DependencyRecord::new(
            parser::parse(raw),
            "[project].dependencies",
            raw,
            Classification::new(status, latest),
        )
    }

    fn parse_output(buf: Vec<u8>) -> serde_json::Value {
        serde_json::from_slice(&buf).unwrap()
    }

    #[test]
    fn test_format_report() {
        let formatter = JsonFormatter::new(false);
        let records = vec![
            record("requests>=1.0.0", DependencyStatus::Outdated, "2.31.0"),
            record("click>=8.1.7", DependencyStatus::UpToDate, "8.1.7"),
        ];

        let mut buf = Vec::new();
        let code = formatter.format_report(&records, &mut buf).unwrap();
        assert_eq!(code, 1);

        let json = parse_output(buf);
        assert_eq!(json["kind"], "report");
        assert_eq!(json["exit_code"], 1);
        assert_eq!(json["summary"]["total"], 2);
        assert_eq!(json["summary"]["outdated"], 1);
        assert_eq!(json["dependencies"].as_array().unwrap().len(), 2);
        assert_eq!(json["dependencies"][0]["name"], "requests");
        assert_eq!(json["dependencies"][0]["status"], "outdated");
        assert_eq!(json["dependencies"][1]["status"], "up-to-date");
    }

    #[test]
    fn test_format_report_empty() {
        let mut buf = Vec::new();
        let code = JsonFormatter::new(false).format_report(&[], &mut buf).unwrap();
        assert_eq!(code, 0);
        let json = parse_output(buf);
        assert_eq!(json["summary"]["total"], 0);
        assert!(json["dependencies"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_format_write_result() {
        let result = WriteResult {
            path: PathBuf::from("pyproject.toml"),
            candidates: 1,
            patches: vec![PatchOutcome {
                name: "requests".to_string(),
                original_spec: "requests>=1.0.0".to_string(),
                new_spec: "requests>=2.31.0".to_string(),
                applied: true,
            }],
            updates_applied: 1,
            file_modified: false,
            dry_run: true,
        };

        let mut buf = Vec::new();
        JsonFormatter::new(true)
            .format_write_result(&result, &mut buf)
            .unwrap();

        let json = parse_output(buf);
        assert_eq!(json["kind"], "updates");
        assert_eq!(json["dry_run"], true);
        assert_eq!(json["patches"][0]["new_spec"], "requests>=2.31.0");
        assert_eq!(json["patches"][0]["applied"], true);
    }

    #[test]
    fn test_format_install_plan() {
        let plan = vec![InstallPlanEntry::new("httpx", None, "0.27.0")];
        let mut buf = Vec::new();
        JsonFormatter::new(false)
            .format_install_plan(&plan, &mut buf)
            .unwrap();

        let json = parse_output(buf);
        assert_eq!(json["kind"], "install_plan");
        assert_eq!(json["packages"][0]["name"], "httpx");
        assert!(json["packages"][0]["installed_version"].is_null());
    }

    #[test]
    fn test_format_install_result_skipped_for_dry_run() {
        let plan = vec![InstallPlanEntry::new("httpx", None, "0.27.0")];
        let mut buf = Vec::new();
        JsonFormatter::new(true)
            .format_install_result(&plan, 0, &mut buf)
            .unwrap();
        assert!(buf.is_empty());

        JsonFormatter::new(false)
            .format_install_result(&plan, 2, &mut buf)
            .unwrap();
        assert_eq!(parse_output(buf)["exit_code"], 2);
    }
}
