//! Exclusion filtering of discovered paths.

use std::path::PathBuf;

use crate::exclusions::ExclusionList;

/// Remove every path containing an excluded token.
///
/// Surviving paths keep their relative order.
pub fn filter_excluded(paths: Vec<PathBuf>, exclusions: &ExclusionList) -> Vec<PathBuf> {
    if exclusions.is_empty() {
        return paths;
    }

    let before = paths.len();
    let kept: Vec<PathBuf> = paths
        .into_iter()
        .filter(|path| !exclusions.contains(path))
        .collect();

    tracing::debug!(excluded = before - kept.len(), kept = kept.len(), "exclusions applied");
    kept
}
