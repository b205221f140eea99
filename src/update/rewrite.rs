//! Rewriting outdated declarations to a new lower bound
//!
//! Upper bounds (`<`, `<=`) and exclusions (`!=`) are copied through
//! byte-for-byte; extras and environment markers are re-derived from the
//! original declaration text.

use crate::domain::DependencyRecord;
use crate::parser::specifier::CONSTRAINT_PAIR_RE;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static HAS_OPERATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[><=!~]").unwrap());

static PACKAGE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-zA-Z0-9_.-]+)").unwrap());

/// Computes replacement declaration strings
pub struct SpecRewriter;

impl SpecRewriter {
    /// New declaration for `record`, or its original text when there is
    /// nothing to advance to
    pub fn rewrite(record: &DependencyRecord) -> String {
        let original = record.original_spec.as_str();
        if original.is_empty() || record.latest.is_empty() || record.is_not_found() {
            return original.to_string();
        }

        let new_version = record.latest_version();

        let (body, marker) = match original.find(';') {
            Some(idx) => (original[..idx].trim(), &original[idx..]),
            None => (original, ""),
        };

        let extras = extras_block(body);

        let rewritten = CONSTRAINT_PAIR_RE.replace_all(body, |caps: &Captures| {
            let op = &caps[1];
            if matches!(op, "<" | "<=" | "!=") {
                caps[0].to_string()
            } else {
                format!("{}{}", op, new_version)
            }
        });

        let mut updated = rewritten.into_owned();

        if updated == body && !HAS_OPERATOR_RE.is_match(body) {
            updated = match PACKAGE_NAME_RE.captures(body) {
                Some(caps) => format!("{}{}>={}", &caps[1], extras, new_version),
                None => format!("{}>={}", body, new_version),
            };
        } else if !extras.is_empty() && !updated.contains(extras) {
            if let Some(name) = PACKAGE_NAME_RE.captures(&updated).map(|c| c[1].to_string()) {
                let rest = updated[name.len()..].to_string();
                updated = format!("{}{}{}", name, extras, rest);
            }
        }

        updated.push_str(marker);
        updated
    }
}

/// First closed `[...]` block, brackets included
fn extras_block(text: &str) -> &str {
    text.find('[')
        .and_then(|open| text[open..].find(']').map(|close| &text[open..=open + close]))
        .unwrap_or_default()
}
