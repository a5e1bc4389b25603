//! Source discovery: find the files to count.
//!
//! This module handles the first stage of the pipeline:
//!
//! - **Traversal**: walk an origin file or directory, pruning version-control
//!   metadata, and return each absolute path once
//! - **Filtering**: drop paths matched by the exclusion list
//!
//! ## Example
//!
//! ```rust,ignore
//! use xlineslib::source::{filter_excluded, traverse};
//! use xlineslib::ExclusionList;
//!
//! let files = traverse(".")?;
//! let files = filter_excluded(files, &ExclusionList::from_tokens([".lock"]));
//! ```

pub mod filter;
pub mod traverse;

pub use filter::filter_excluded;
pub use traverse::{dedup, traverse};
