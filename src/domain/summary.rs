//! Report summary counts

use super::{DependencyRecord, DependencyStatus};
use serde::Serialize;

/// Per-status counts over one extraction pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub up_to_date: usize,
    pub pinned: usize,
    pub outdated: usize,
    pub unknown: usize,
    pub errors: usize,
}

impl ReportSummary {
    /// Count every record, including those hidden from the report
    pub fn from_records(records: &[DependencyRecord]) -> Self {
        let mut summary = Self {
            total: records.len(),
            ..Default::default()
        };
        for record in records {
            match record.status {
                DependencyStatus::UpToDate => summary.up_to_date += 1,
                DependencyStatus::Pinned => summary.pinned += 1,
                DependencyStatus::Outdated => summary.outdated += 1,
                DependencyStatus::Unknown => summary.unknown += 1,
                DependencyStatus::Error => summary.errors += 1,
            }
        }
        summary
    }

    /// Returns true if any declaration can be advanced
    pub fn has_outdated(&self) -> bool {
        self.outdated > 0
    }

    /// Report exit code: 1 if anything is outdated
    pub fn exit_code(&self) -> i32 {
        if self.has_outdated() {
            1
        } else {
            0
        }
    }
}
