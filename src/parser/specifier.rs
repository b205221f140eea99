//! PEP 508 style dependency specifier parsing
//!
//! Handles forms such as:
//! - `requests`
//! - `requests>=2.28.0`
//! - `pytest>=8.4.2,<9`
//! - `uvicorn[standard]>=0.30; python_version>='3.10'`

use regex::Regex;
use std::sync::LazyLock;

/// `<name> <operator-version pairs>` after markers and extras are removed
static SPECIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z0-9_.-]+)\s*((?:[><=!~]+\s*[\d.a-zA-Z*]+\s*,?\s*)+)?$").unwrap()
});

/// One `operator version` pair inside a constraint
pub(crate) static CONSTRAINT_PAIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([><=!~]+)\s*([\d.]+(?:a\d+|b\d+|rc\d+)?)").unwrap());

/// `name @ url` and `name[extra] @ url`
static DIRECT_REFERENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_.-]+\s*(?:\[[^\]]*\])?\s*@").unwrap());

static NAME_SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-_.]+").unwrap());

/// Parsed view of one raw dependency declaration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySpecifier {
    /// Package name as written
    pub name: String,
    /// Full constraint text, e.g. `>=8.4.2,<9`
    pub constraint: String,
    /// Version of the first lower-bound style operator
    pub minimum_version: String,
    /// Version of the first bare `<` operator
    pub upper_bound: String,
}

/// Operators that never define a minimum
fn is_ceiling_or_exclusion(op: &str) -> bool {
    matches!(op, "<" | "<=" | "!=")
}

/// Remove the first closed `[...]` block
pub(crate) fn strip_extras(text: &str) -> String {
    if let Some(open) = text.find('[') {
        if let Some(close_rel) = text[open..].find(']') {
            let close = open + close_rel;
            return format!("{}{}", &text[..open], &text[close + 1..]);
        }
    }
    text.to_string()
}

/// Parse a raw declaration string. Never fails.
///
/// Text that doesn't look like `name[constraint]` is returned whole as the
/// name with every other field empty.
pub fn parse(raw: &str) -> DependencySpecifier {
    let mut text = raw.trim();
    if text.is_empty() {
        return DependencySpecifier::default();
    }

    if let Some(idx) = text.find(';') {
        text = text[..idx].trim();
    }

    let text = strip_extras(text);

    let Some(caps) = SPECIFIER_RE.captures(&text) else {
        return DependencySpecifier {
            name: text,
            ..Default::default()
        };
    };

    let name = caps[1].trim().to_string();
    let constraint = caps
        .get(2)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    let mut minimum_version = String::new();
    let mut upper_bound = String::new();

    for pair in CONSTRAINT_PAIR_RE.captures_iter(&constraint) {
        let op = &pair[1];
        let version = &pair[2];
        if minimum_version.is_empty() && !is_ceiling_or_exclusion(op) {
            minimum_version = version.to_string();
        }
        if upper_bound.is_empty() && op == "<" {
            upper_bound = version.to_string();
        }
    }

    DependencySpecifier {
        name,
        constraint,
        minimum_version,
        upper_bound,
    }
}

/// Whether the declaration points at a URL instead of the registry
pub fn is_direct_reference(raw: &str) -> bool {
    DIRECT_REFERENCE_RE.is_match(raw.trim())
}

/// Registry-normalized package name: lowercase, separator runs become `-`
pub fn normalize_name(name: &str) -> String {
    NAME_SEPARATOR_RE
        .replace_all(name, "-")
        .to_lowercase()
}
