//! Highest stable release below an exclusive upper bound

use crate::parser::{is_prerelease, VersionTuple};

/// Greatest non-pre-release version strictly below `bound`
///
/// Versions with no numeric prefix are ignored. Returns `None` when nothing
/// qualifies, including for an empty release set.
pub fn latest_below<S: AsRef<str>>(releases: &[S], bound: &str) -> Option<String> {
    let ceiling = VersionTuple::parse(bound);

    releases
        .iter()
        .map(AsRef::as_ref)
        .filter(|v| !is_prerelease(v))
        .map(|v| (VersionTuple::parse(v), v))
        .filter(|(tuple, _)| !tuple.is_empty() && *tuple < ceiling)
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, v)| v.to_string())
}
