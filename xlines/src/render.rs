//! Colorized terminal output.
//!
//! Layout is computed by `xlineslib::ReportTable`; this module only styles
//! the cells. `console` drops the styling when stdout is not a terminal.

use std::io::{self, Write};

use console::{style, Style, StyledObject};
use xlineslib::{ExclusionList, Layout, Report, ReportTable, TableRow};

/// Prefix shown before a one-line user message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Ok,
    Warn,
    Fail,
}

impl MessageKind {
    fn prefix(self) -> StyledObject<&'static str> {
        match self {
            MessageKind::Info => style("INFO").cyan().bold(),
            MessageKind::Ok => style("ok").green().bold(),
            MessageKind::Warn => style("WARN").yellow().bold(),
            MessageKind::Fail => style("FAIL").red().bold(),
        }
    }
}

/// Report table styles
struct Theme {
    frame: Style,
    heading: Style,
    label: Style,
    count: Style,
    highlight: Style,
}

impl Theme {
    fn new() -> Self {
        Self {
            frame: Style::new().green().bold(),
            heading: Style::new().white().bright().bold(),
            label: Style::new().magenta().bright(),
            count: Style::new().bold(),
            highlight: Style::new().color256(208).bold(),
        }
    }
}

pub fn title(text: &str) -> StyledObject<&str> {
    style(text).white().bright().bold()
}

pub fn accent(text: &str) -> StyledObject<&str> {
    style(text).color256(208)
}

/// Write the report table to `out`.
pub fn write_report<W: Write>(out: &mut W, report: &Report, layout: &Layout) -> io::Result<()> {
    let theme = Theme::new();
    let table = ReportTable::new(report, layout);
    let indent = &table.indent;
    let rule = theme.frame.apply_to(&table.rule);

    writeln!(out)?;
    writeln!(out, "{indent}{rule}")?;
    write_row(out, indent, &table.header, &theme.heading, &theme.heading)?;
    writeln!(out, "{indent}{rule}")?;
    for row in &table.rows {
        let (label, count) = if row.highlight {
            (&theme.highlight, &theme.highlight)
        } else {
            (&theme.label, &theme.count)
        };
        write_row(out, indent, row, label, count)?;
    }
    writeln!(out, "{indent}{rule}")?;
    write_row(out, indent, &table.footer, &theme.heading, &theme.count)?;
    writeln!(out)
}

fn write_row<W: Write>(
    out: &mut W,
    indent: &str,
    row: &TableRow,
    label: &Style,
    value: &Style,
) -> io::Result<()> {
    writeln!(
        out,
        "{indent}{}{}{}",
        label.apply_to(&row.label),
        row.gap,
        value.apply_to(&row.value)
    )
}

/// Write the numbered exclusion list as shown by the configuration menu.
pub fn write_exclusions<W: Write>(out: &mut W, list: &ExclusionList) -> io::Result<()> {
    let tab = " ".repeat(15);
    write_message(out, MessageKind::Info, "File types excluded from line totals:")?;
    for (index, token) in list.tokens().iter().enumerate() {
        writeln!(out, "{tab}{:>3}{}  {token}", index + 1, style(")").magenta())?;
    }
    writeln!(out)
}

pub fn write_message<W: Write>(out: &mut W, kind: MessageKind, message: &str) -> io::Result<()> {
    writeln!(out, "    {}: {message}", kind.prefix())
}
