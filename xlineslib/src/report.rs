//! Report aggregation and table layout.
//!
//! The data flow is:
//! 1. Counted files (path, line count or error)
//! 2. [`Report`]: counted entries, grand total, skipped files
//! 3. [`ReportTable`]: padded strings ready for display
//!
//! `ReportTable` only formats. It never colors; the CLI applies styles to the
//! label and value cells and keeps the computed padding.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::Result;

const HEADER_LABEL: &str = "object";
const HEADER_VALUE: &str = "line count";
const RULE_CHAR: char = '-';
/// Narrowest label column the builder accepts
const MIN_BASE_WIDTH: usize = 10;

/// One counted file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub path: PathBuf,
    pub lines: u64,
}

/// Aggregated line counts for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Directory labels are shown relative to, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    /// Counted files in discovery order
    pub entries: Vec<ReportEntry>,
    /// Sum of all entry line counts
    pub total: u64,
    /// Files that could not be counted
    pub skipped: Vec<PathBuf>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the directory labels are relative to.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Record a counted file.
    pub fn push(&mut self, path: PathBuf, lines: u64) {
        self.total += lines;
        self.entries.push(ReportEntry { path, lines });
    }

    /// Record a file that was skipped. It does not touch the totals.
    pub fn skip(&mut self, path: PathBuf) {
        self.skipped.push(path);
    }

    /// Number of files actually counted.
    pub fn object_count(&self) -> usize {
        self.entries.len()
    }

    /// Build a report from per-file outcomes, in the given order.
    ///
    /// Failed files are logged and listed in `skipped`; they contribute to
    /// neither the entries, the total nor the object count.
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = (PathBuf, Result<u64>)>,
    {
        let mut report = Self::new();
        for (path, outcome) in outcomes {
            match outcome {
                Ok(lines) => report.push(path, lines),
                Err(e) => {
                    tracing::warn!("skipping {e}");
                    report.skip(path);
                }
            }
        }
        report
    }

    fn label_for(&self, path: &Path) -> String {
        self.root
            .as_deref()
            .and_then(|root| path.strip_prefix(root).ok())
            .filter(|rel| !rel.as_os_str().is_empty())
            .unwrap_or(path)
            .to_string_lossy()
            .to_string()
    }
}

/// Count every file with `count_fn` and aggregate the results sequentially.
pub fn aggregate<F>(files: &[PathBuf], mut count_fn: F) -> Report
where
    F: FnMut(&Path) -> Result<u64>,
{
    Report::from_outcomes(files.iter().map(|path| (path.clone(), count_fn(path))))
}

/// Column layout of the rendered report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    /// Spaces before every line
    pub indent: usize,
    /// Width of the label (object) column
    pub base_width: usize,
    /// Width of the right-justified count column
    pub count_column_width: usize,
    /// Rows at or above this count are flagged for highlighting
    pub high_count_threshold: Option<u64>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            indent: 4,
            base_width: 60,
            count_column_width: 12,
            high_count_threshold: None,
        }
    }
}

impl Layout {
    /// Builder: set the label column width, at least 10.
    pub fn base_width(mut self, width: usize) -> Self {
        self.base_width = width.max(MIN_BASE_WIDTH);
        self
    }

    /// Builder: set the count column width.
    pub fn count_column_width(mut self, width: usize) -> Self {
        self.count_column_width = width;
        self
    }

    /// Builder: set the indentation.
    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Builder: set the highlight threshold.
    pub fn high_count_threshold(mut self, threshold: Option<u64>) -> Self {
        self.high_count_threshold = threshold;
        self
    }

    /// Full width of a table line, excluding the indent.
    pub fn total_width(&self) -> usize {
        self.base_width + self.count_column_width
    }
}

/// A single table line split into styleable parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub label: String,
    /// Padding between label and value
    pub gap: String,
    pub value: String,
    /// Count reached the layout's highlight threshold
    pub highlight: bool,
}

impl TableRow {
    /// Pad so that `value` ends at `width` characters. At least one space
    /// separates the two parts.
    fn spread(label: String, value: String, width: usize) -> Self {
        let used = label.chars().count() + value.chars().count();
        let gap = " ".repeat(width.saturating_sub(used).max(1));
        Self {
            label,
            gap,
            value,
            highlight: false,
        }
    }
}

impl fmt::Display for TableRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.label, self.gap, self.value)
    }
}

/// Table-ready report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    pub indent: String,
    /// Decorative rule above and below the header and the rows
    pub rule: String,
    pub header: TableRow,
    pub rows: Vec<TableRow>,
    /// `Total (<n> objects): <total>`
    pub footer: TableRow,
}

impl ReportTable {
    pub fn new(report: &Report, layout: &Layout) -> Self {
        let width = layout.total_width();
        let max_label = layout.base_width.saturating_sub(2);

        let rows = report
            .entries
            .iter()
            .map(|entry| {
                let label = truncate_label(&report.label_for(&entry.path), max_label);
                let mut row = TableRow::spread(label, group_thousands(entry.lines), width);
                row.highlight = layout
                    .high_count_threshold
                    .is_some_and(|threshold| entry.lines >= threshold);
                row
            })
            .collect();

        let footer = TableRow::spread(
            format!(
                "Total ({} objects):",
                group_thousands(report.object_count() as u64)
            ),
            group_thousands(report.total),
            width,
        );

        Self {
            indent: " ".repeat(layout.indent),
            rule: RULE_CHAR.to_string().repeat(width),
            header: TableRow::spread(HEADER_LABEL.to_string(), HEADER_VALUE.to_string(), width),
            rows,
            footer,
        }
    }
}

impl fmt::Display for ReportTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = &self.indent;
        writeln!(f, "{indent}{}", self.rule)?;
        writeln!(f, "{indent}{}", self.header)?;
        writeln!(f, "{indent}{}", self.rule)?;
        for row in &self.rows {
            writeln!(f, "{indent}{row}")?;
        }
        writeln!(f, "{indent}{}", self.rule)?;
        writeln!(f, "{indent}{}", self.footer)
    }
}

/// Render a report as plain, uncolored text.
pub fn render(report: &Report, layout: &Layout) -> String {
    ReportTable::new(report, layout).to_string()
}

/// Keep the tail of a label that does not fit, marking the cut with `..`.
fn truncate_label(label: &str, max_len: usize) -> String {
    let len = label.chars().count();
    if len <= max_len {
        return label.to_string();
    }
    // No room for the marker
    if max_len < 3 {
        return label.chars().skip(len - max_len).collect();
    }
    let keep = max_len.saturating_sub(2);
    let tail: String = label.chars().skip(len - keep).collect();
    format!("..{tail}")
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
