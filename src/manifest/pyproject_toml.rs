//! pyproject.toml reader for Python projects
//!
//! Handles:
//! - project.dependencies and project.optional-dependencies (PEP 621)
//! - build-system.requires (PEP 518)
//! - dependency-groups (PEP 735)
//! - tool.pdm.dev-dependencies
//! - tool.poetry.dependencies, dev-dependencies and group.*.dependencies
//! - tool.uv.dev-dependencies and tool.uv.sources

use crate::error::ManifestError;
use crate::manifest::{read_manifest, DeclarationSite, ManifestView};
use crate::parser::normalize_name;
use std::path::Path;
use toml::{Table, Value};

/// Source keys that take a package off the index
const NON_REGISTRY_KEYS: [&str; 4] = ["git", "path", "url", "workspace"];

/// Reader producing a [`ManifestView`] from pyproject.toml
pub struct PyprojectReader;

/// One poetry table entry after conversion
#[derive(Debug, PartialEq, Eq)]
enum PoetryEntry {
    Requirement(String),
    NonRegistry,
    Skip,
}

impl PyprojectReader {
    /// Read and parse the manifest at `path`
    pub fn read(path: &Path) -> Result<ManifestView, ManifestError> {
        let content = read_manifest(path)?;
        Self::parse(&content)
            .map_err(|message| ManifestError::toml_parse_error(path, message))
    }

    /// Parse manifest text into a view. The error is the TOML parser message.
    pub fn parse(content: &str) -> Result<ManifestView, String> {
        let doc: Table = toml::from_str(content).map_err(|e: toml::de::Error| e.to_string())?;
        let mut view = ManifestView::default();

        let project = doc.get("project");

        if let Some(deps) = project.and_then(|p| p.get("dependencies")) {
            push_site(&mut view, "[project].dependencies", string_list(deps));
        }

        if let Some(groups) = project
            .and_then(|p| p.get("optional-dependencies"))
            .and_then(Value::as_table)
        {
            for (group, deps) in groups {
                let source = format!("[project.optional-dependencies].{}", group);
                push_site(&mut view, source, string_list(deps));
            }
        }

        if let Some(requires) = doc.get("build-system").and_then(|b| b.get("requires")) {
            push_site(&mut view, "[build-system].requires", string_list(requires));
        }

        // PEP 735 `{include-group = ...}` tables are not declarations
        if let Some(groups) = doc.get("dependency-groups").and_then(Value::as_table) {
            for (group, deps) in groups {
                let source = format!("[dependency-groups].{}", group);
                push_site(&mut view, source, string_list(deps));
            }
        }

        let tool = doc.get("tool");

        if let Some(groups) = tool
            .and_then(|t| t.get("pdm"))
            .and_then(|p| p.get("dev-dependencies"))
            .and_then(Value::as_table)
        {
            for (group, deps) in groups {
                let source = format!("[tool.pdm.dev-dependencies].{}", group);
                push_site(&mut view, source, string_list(deps));
            }
        }

        let poetry = tool.and_then(|t| t.get("poetry"));

        if let Some(deps) = poetry
            .and_then(|p| p.get("dependencies"))
            .and_then(Value::as_table)
        {
            let specs = poetry_requirements(deps, &mut view);
            push_site(&mut view, "[tool.poetry.dependencies]", specs);
        }

        if let Some(deps) = poetry
            .and_then(|p| p.get("dev-dependencies"))
            .and_then(Value::as_table)
        {
            let specs = poetry_requirements(deps, &mut view);
            push_site(&mut view, "[tool.poetry.dev-dependencies]", specs);
        }

        if let Some(groups) = poetry
            .and_then(|p| p.get("group"))
            .and_then(Value::as_table)
        {
            for (group, body) in groups {
                if let Some(deps) = body.get("dependencies").and_then(Value::as_table) {
                    let specs = poetry_requirements(deps, &mut view);
                    let source = format!("[tool.poetry.group.{}.dependencies]", group);
                    push_site(&mut view, source, specs);
                }
            }
        }

        let uv = tool.and_then(|t| t.get("uv"));

        if let Some(deps) = uv.and_then(|u| u.get("dev-dependencies")) {
            push_site(&mut view, "[tool.uv.dev-dependencies]", string_list(deps));
        }

        if let Some(sources) = uv.and_then(|u| u.get("sources")).and_then(Value::as_table) {
            for (name, source) in sources {
                if is_non_registry_source(source) {
                    view.non_registry.insert(normalize_name(name));
                }
            }
        }

        Ok(view)
    }
}

fn push_site(view: &mut ManifestView, source: impl Into<String>, specifiers: Vec<String>) {
    if !specifiers.is_empty() {
        view.sites.push(DeclarationSite::new(source, specifiers));
    }
}

/// String entries of a TOML array; anything else is ignored
fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn has_non_registry_key(table: &Table) -> bool {
    NON_REGISTRY_KEYS.iter().any(|key| table.contains_key(*key))
}

/// `tool.uv.sources` entries may be a table or a list of tables
fn is_non_registry_source(source: &Value) -> bool {
    match source {
        Value::Table(table) => has_non_registry_key(table),
        Value::Array(entries) => entries
            .iter()
            .filter_map(Value::as_table)
            .any(has_non_registry_key),
        _ => false,
    }
}

fn poetry_requirements(deps: &Table, view: &mut ManifestView) -> Vec<String> {
    let mut specs = Vec::new();
    for (name, value) in deps {
        match poetry_entry(name, value) {
            PoetryEntry::Requirement(spec) => specs.push(spec),
            PoetryEntry::NonRegistry => {
                view.non_registry.insert(normalize_name(name));
            }
            PoetryEntry::Skip => {}
        }
    }
    specs
}

fn poetry_entry(name: &str, value: &Value) -> PoetryEntry {
    if name == "python" {
        return PoetryEntry::Skip;
    }

    match value {
        Value::String(version) => {
            PoetryEntry::Requirement(format!("{}{}", name, poetry_constraint(version)))
        }
        Value::Table(table) => {
            if has_non_registry_key(table) {
                return PoetryEntry::NonRegistry;
            }

            let constraint = table
                .get("version")
                .and_then(Value::as_str)
                .map(poetry_constraint)
                .unwrap_or_default();

            let extras = table
                .get("extras")
                .map(string_list)
                .filter(|extras| !extras.is_empty())
                .map(|extras| format!("[{}]", extras.join(",")))
                .unwrap_or_default();

            let markers = table
                .get("markers")
                .and_then(Value::as_str)
                .map(|m| format!("; {}", m))
                .unwrap_or_default();

            PoetryEntry::Requirement(format!("{}{}{}{}", name, extras, constraint, markers))
        }
        _ => PoetryEntry::Skip,
    }
}

/// Convert a poetry version requirement to PEP 440 operators
///
/// Caret and tilde become `>=`, a bare version becomes `==`, `*` drops the
/// constraint. Comma-separated parts are converted individually.
fn poetry_constraint(version: &str) -> String {
    version
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty() && *part != "*")
        .map(|part| {
            if let Some(rest) = part.strip_prefix('^') {
                format!(">={}", rest.trim())
            } else if part.starts_with("~=") {
                part.to_string()
            } else if let Some(rest) = part.strip_prefix('~') {
                format!(">={}", rest.trim())
            } else if part.starts_with(['<', '>', '=', '!']) {
                part.to_string()
            } else {
                format!("=={}", part)
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}
