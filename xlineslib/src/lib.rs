//! # xlineslib
//!
//! Count the lines of every file under a directory, minus the ones a
//! persisted exclusion list rules out, and lay the result out as an aligned
//! report.
//!
//! ## Pipeline
//!
//! - **Traverse**: walk the origin (file or directory), prune version-control
//!   metadata directories, collect absolute paths once each
//! - **Filter**: drop paths containing any exclusion token (plain substring
//!   match, so extensions, file names and directory names all work)
//! - **Count**: lines per file, optionally leaving out empty lines
//! - **Aggregate**: per-object counts and a grand total
//! - **Lay out**: fixed-width table with header, rule and total line
//!
//! The library never prints; presentation belongs to the caller.
//!
//! ## Example
//!
//! ```rust
//! use xlineslib::{count_origin, render, CountOptions, ExclusionList, Layout};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! fs::write(dir.path().join("app.js"), "a();\n\nb();\n").unwrap();
//! fs::write(dir.path().join("app.min.js"), "a();b();\n").unwrap();
//!
//! let options = CountOptions::new()
//!     .exclusions(ExclusionList::from_tokens([".min.js"]))
//!     .include_whitespace(false);
//! let report = count_origin(dir.path(), &options).unwrap();
//!
//! assert_eq!(report.total, 2);
//! assert_eq!(report.object_count(), 1);
//! assert!(render(&report, &Layout::default()).contains("Total (1 objects):"));
//! ```

pub mod config;
pub mod counter;
pub mod error;
pub mod exclusions;
pub mod report;
pub mod source;

pub use config::{default_exclusions_path, Settings};
pub use counter::{count_lines, count_origin, CountOptions};
pub use error::XlinesError;
pub use exclusions::{normalize_token, ExclusionFile, ExclusionList};
pub use report::{
    aggregate, group_thousands, render, Layout, Report, ReportEntry, ReportTable, TableRow,
};
pub use source::{dedup, filter_excluded, traverse};

/// Result type for xlineslib operations
pub type Result<T> = std::result::Result<T, XlinesError>;
