//! Literal replacement of one quoted declaration in manifest text

use crate::domain::DependencyRecord;

/// Quote styles tried in order
const QUOTES: [char; 2] = ['"', '\''];

/// Replaces a dependency's quoted declaration string in manifest text
pub struct ManifestPatcher;

impl ManifestPatcher {
    /// Replace the record's declaration with `new_spec`
    pub fn apply(text: &str, record: &DependencyRecord, new_spec: &str) -> (String, bool) {
        Self::replace_quoted(text, &record.original_spec, new_spec)
    }

    /// Replace the first quoted occurrence of `original_spec` with `new_spec`
    ///
    /// Double quotes are tried before single quotes and the matched quote
    /// style is kept. Returns the text unchanged and `false` when the
    /// declaration can't be found.
    pub fn replace_quoted(text: &str, original_spec: &str, new_spec: &str) -> (String, bool) {
        for quote in QUOTES {
            let needle = format!("{quote}{original_spec}{quote}");
            if text.contains(&needle) {
                let replacement = format!("{quote}{new_spec}{quote}");
                return (text.replacen(&needle, &replacement, 1), true);
            }
        }
        (text.to_string(), false)
    }
}
