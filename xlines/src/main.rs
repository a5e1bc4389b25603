//! # xlines
//!
//! Count the number of lines of code in a project.
//!
//! ## Overview
//!
//! xlines walks a directory (or takes a single file), leaves out
//! version-control metadata and anything matching the persisted exclusion
//! list, and prints a per-file line count table with a grand total.
//!
//! ## Usage
//!
//! ```bash
//! # Count lines under the current directory
//! xlines
//!
//! # Count a project, leaving out empty lines
//! xlines ~/code/project --no-whitespace
//!
//! # Exclude extra tokens for this run only
//! xlines . -e vendor -e .snap
//!
//! # Highlight files with 500 lines or more
//! xlines . --threshold 500
//!
//! # Edit the persisted exclusion list
//! xlines configure
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::EnvFilter;
use xlineslib::{count_origin, CountOptions, Settings, XlinesError};

mod menu;
mod render;

/// Exit statuses for fatal conditions (sysexits.h on Unix)
#[cfg(unix)]
mod status {
    pub const NO_INPUT: u8 = 66;
    pub const CONFIG: u8 = 78;
}

#[cfg(not(unix))]
mod status {
    pub const NO_INPUT: u8 = 1;
    pub const CONFIG: u8 = 1;
}

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("xlines")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Count the number of lines of code in a project")
        .arg(
            Arg::new("path")
                .help("File or directory to count (defaults to current directory)")
                .default_value("."),
        )
        .arg(
            Arg::new("no-whitespace")
                .short('n')
                .long("no-whitespace")
                .action(ArgAction::SetTrue)
                .help("Leave empty lines out of the counts"),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .action(ArgAction::Append)
                .help("Exclude paths containing this token, for this run only"),
        )
        .arg(
            Arg::new("threshold")
                .short('t')
                .long("threshold")
                .value_parser(value_parser!(u64))
                .help("Highlight objects with at least this many lines"),
        )
        .arg(
            Arg::new("width")
                .short('w')
                .long("width")
                .value_parser(value_parser!(u64).range(10..))
                .help("Width of the object column"),
        )
        .arg(
            Arg::new("exclusions")
                .long("exclusions")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Exclusion list file (defaults to <config dir>/xlines/exclusions.list)"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .default_value("warn")
                .help("Log filter when RUST_LOG is unset (error, warn, info, debug, trace)"),
        )
        .subcommand(
            Command::new("configure").about("Add or remove entries of the exclusion list"),
        )
}

/// Logs go to stderr; stdout carries the report.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Resolve settings from matches
fn build_settings(matches: &ArgMatches) -> anyhow::Result<Settings> {
    let mut settings = match matches.get_one::<PathBuf>("exclusions") {
        Some(path) => Settings::with_exclusions(path),
        None => Settings::resolve()?,
    };

    if let Some(width) = matches.try_get_one::<u64>("width").ok().flatten() {
        settings.layout = settings.layout.base_width(*width as usize);
    }
    if let Some(threshold) = matches.try_get_one::<u64>("threshold").ok().flatten() {
        settings.layout = settings.layout.high_count_threshold(Some(*threshold));
    }
    Ok(settings)
}

/// Handler for the default count command
fn count_handler(matches: &ArgMatches, settings: &Settings) -> anyhow::Result<()> {
    let path = matches
        .get_one::<String>("path")
        .map(|s| s.as_str())
        .unwrap_or(".");

    let mut exclusions = settings.exclusions.load_or_empty();
    if let Some(extra) = matches.get_many::<String>("exclude") {
        exclusions.extend(extra);
    }

    let options = CountOptions::new()
        .exclusions(exclusions)
        .include_whitespace(!matches.get_flag("no-whitespace"));

    let report = count_origin(path, &options)?;
    tracing::info!(
        objects = report.object_count(),
        total = report.total,
        skipped = report.skipped.len(),
        "count complete"
    );

    let mut out = io::stdout().lock();
    render::write_report(&mut out, &report, &settings.layout)?;
    out.flush()?;
    Ok(())
}

/// Handler for the configure command
fn configure_handler(settings: &Settings) -> anyhow::Result<()> {
    let mut input = io::stdin().lock();
    let mut out = io::stdout().lock();
    menu::Menu::new(&settings.exclusions)
        .run(&mut input, &mut out)
        .context("configuration menu failed")
}

fn exit_status_for(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<XlinesError>() {
        Some(XlinesError::ConfigDirUnavailable) => status::CONFIG,
        Some(XlinesError::PathNotFound(_)) => status::NO_INPUT,
        _ => 1,
    }
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("configure", sub)) => configure_handler(&build_settings(sub)?),
        _ => count_handler(matches, &build_settings(matches)?),
    }
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();

    let level = matches
        .get_one::<String>("log-level")
        .map(|s| s.as_str())
        .unwrap_or("warn");
    init_logging(level);

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(exit_status_for(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_valid() {
        build_command().debug_assert();
    }

    #[test]
    fn test_settings_from_flags() {
        let matches = build_command()
            .try_get_matches_from([
                "xlines",
                "--exclusions",
                "/tmp/ex.list",
                "--width",
                "40",
                "--threshold",
                "250",
            ])
            .unwrap();
        let settings = build_settings(&matches).unwrap();

        assert_eq!(settings.exclusions.path(), std::path::Path::new("/tmp/ex.list"));
        assert_eq!(settings.layout.base_width, 40);
        assert_eq!(settings.layout.high_count_threshold, Some(250));
    }

    #[test]
    fn test_width_lower_bound() {
        let result = build_command().try_get_matches_from(["xlines", "--width", "3"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_configure_accepts_global_exclusions() {
        let matches = build_command()
            .try_get_matches_from(["xlines", "configure", "--exclusions", "/tmp/ex.list"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "configure");

        let settings = build_settings(sub).unwrap();
        assert_eq!(settings.exclusions.path(), std::path::Path::new("/tmp/ex.list"));
    }

    #[test]
    fn test_exit_codes() {
        let missing: anyhow::Error = XlinesError::PathNotFound(PathBuf::from("/x")).into();
        assert_eq!(exit_status_for(&missing), status::NO_INPUT);

        let no_config: anyhow::Error = XlinesError::ConfigDirUnavailable.into();
        assert_eq!(exit_status_for(&no_config), status::CONFIG);

        let other = anyhow::anyhow!("boom");
        assert_eq!(exit_status_for(&other), 1);
    }
}
