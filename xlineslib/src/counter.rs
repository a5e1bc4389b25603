//! High-level line counting API.
//!
//! This module provides the entry points for counting a single file and for
//! running the whole pipeline over an origin path:
//! traverse, deduplicate, filter, count, aggregate.

use std::fs;
use std::path::Path;

use rayon::prelude::*;

use crate::error::XlinesError;
use crate::exclusions::ExclusionList;
use crate::report::Report;
use crate::source::{filter_excluded, traverse};
use crate::Result;

/// Options for counting lines.
#[derive(Debug, Clone)]
pub struct CountOptions {
    /// Tokens excluding matching paths
    pub exclusions: ExclusionList,
    /// Count blank lines too
    pub include_whitespace: bool,
}

impl Default for CountOptions {
    fn default() -> Self {
        Self {
            exclusions: ExclusionList::new(),
            include_whitespace: true,
        }
    }
}

impl CountOptions {
    /// Create new default options (no exclusions, blank lines counted).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the exclusion list.
    pub fn exclusions(mut self, exclusions: ExclusionList) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Choose whether blank lines are counted.
    pub fn include_whitespace(mut self, include: bool) -> Self {
        self.include_whitespace = include;
        self
    }
}

/// Count the lines of a single file.
///
/// Lines end at `\n`, `\r\n` or a lone `\r`. With `include_whitespace`
/// every line counts, including a final line without a terminator. Without it, lines that are exactly empty are left
/// out; lines holding only spaces or tabs still count.
///
/// Fails with [`XlinesError::UnreadableFile`] when the file cannot be read or
/// is not UTF-8 text.
///
/// # Example
///
/// ```rust,ignore
/// use xlineslib::count_lines;
///
/// let all = count_lines("src/main.rs", true)?;
/// let non_blank = count_lines("src/main.rs", false)?;
/// ```
pub fn count_lines(path: impl AsRef<Path>, include_whitespace: bool) -> Result<u64> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| XlinesError::UnreadableFile {
        path: path.to_path_buf(),
        source,
    })?;

    let count = if include_whitespace {
        split_lines(&contents).count()
    } else {
        split_lines(&contents).filter(|line| !line.is_empty()).count()
    };
    Ok(count as u64)
}

/// Lines of `text` ended by `\n`, `\r\n` or a lone `\r`.
///
/// A final terminator does not start another line.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.find(|c: char| c == '\n' || c == '\r') {
            Some(end) => {
                let line = &rest[..end];
                let terminator = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[end + terminator..];
                Some(line)
            }
            None => {
                let line = rest;
                rest = "";
                Some(line)
            }
        }
    })
}

/// Count every file under `origin`, minus the excluded ones.
///
/// Files are counted in parallel; the report keeps discovery order. Files
/// that cannot be read are skipped with a warning. Only a missing origin is
/// an error.
///
/// # Example
///
/// ```rust,ignore
/// use xlineslib::{count_origin, CountOptions, ExclusionList};
///
/// let options = CountOptions::new()
///     .exclusions(ExclusionList::from_tokens([".min.js"]))
///     .include_whitespace(false);
/// let report = count_origin(".", &options)?;
/// println!("{} lines in {} files", report.total, report.object_count());
/// ```
pub fn count_origin(origin: impl AsRef<Path>, options: &CountOptions) -> Result<Report> {
    let files = traverse(origin.as_ref())?;
    let files = filter_excluded(files, &options.exclusions);

    let outcomes: Vec<_> = files
        .into_par_iter()
        .map(|path| {
            let lines = count_lines(&path, options.include_whitespace);
            (path, lines)
        })
        .collect();

    let report = Report::from_outcomes(outcomes);
    Ok(match label_root(origin.as_ref()) {
        Some(root) => report.with_root(root),
        None => report,
    })
}

/// Directory that report labels are relative to: the origin itself, or its
/// parent when the origin is a file.
fn label_root(origin: &Path) -> Option<std::path::PathBuf> {
    let root = fs::canonicalize(origin).ok()?;
    if root.is_dir() {
        Some(root)
    } else {
        root.parent().map(Path::to_path_buf)
    }
}
