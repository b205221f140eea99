//! depcheck - pyproject.toml dependency checker and updater library
//!
//! This library provides the core functionality for checking the dependencies
//! declared in a Python `pyproject.toml` against PyPI:
//! - Parsing PEP 508 style declarations and dotted versions
//! - Classifying each declaration against the index
//! - Rewriting outdated minimums in place
//! - Bringing the local Python environment up to the declared minimums

pub mod cli;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod package_manager;
pub mod parser;
pub mod progress;
pub mod registry;
pub mod update;
