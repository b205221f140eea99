//! Core domain models for depcheck
//!
//! This module contains the fundamental types used throughout the application:
//! - Dependency status and its report icon
//! - Dependency records produced by extraction
//! - Report summary counts
//! - Installer plan entries

mod dependency;
mod install_plan;
mod status;
mod summary;

pub use dependency::{Classification, DependencyRecord, NOT_FOUND};
pub use install_plan::InstallPlanEntry;
pub use status::DependencyStatus;
pub use summary::ReportSummary;
