//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use profdiff_core::compare::SortKey;
use profdiff_core::views::ViewKind;

/// profdiff - compare two React DevTools profiler captures
///
/// Load a "before" and an "after" export and browse where renders went,
/// or write a report or SVG instead of opening the dashboard.
///
/// Examples:
///   profdiff --before before.json --after after.json
///   profdiff --after after.json --view rerenders
///   profdiff --before a.json --after b.json --report json
///   profdiff --before a.json --after b.json --svg comparison.svg --view comparison
///   profdiff --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Capture recorded before the change
    #[arg(short, long, value_name = "FILE")]
    pub before: Option<PathBuf>,

    /// Capture recorded after the change
    #[arg(short, long, value_name = "FILE")]
    pub after: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, profdiff.toml in the current directory is used
    /// when present.
    #[arg(short, long, value_name = "FILE", env = "PROFDIFF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Table order: renders, duration, improvement, name
    #[arg(short, long, value_name = "KEY")]
    pub sort: Option<SortKey>,

    /// Only show components whose name contains this text
    #[arg(short, long, value_name = "TEXT")]
    pub filter: Option<String>,

    /// Rows per table (0 shows every row)
    #[arg(short, long, value_name = "ROWS")]
    pub limit: Option<usize>,

    /// Expand tree paths under each component
    #[arg(long)]
    pub paths: bool,

    /// View to open (or export with --svg)
    #[arg(long, default_value = "overview", value_name = "VIEW")]
    pub view: ViewKind,

    /// Print a report to stdout instead of opening the dashboard
    #[arg(long, value_name = "FORMAT")]
    pub report: Option<ReportFormat>,

    /// Write the selected view as SVG instead of opening the dashboard
    #[arg(long, value_name = "FILE")]
    pub svg: Option<PathBuf>,

    /// SVG width in pixels
    #[arg(long, default_value = "1200", value_name = "PX")]
    pub width: f64,

    /// Use the light palette
    #[arg(long)]
    pub light: bool,

    /// Write logs to this file
    ///
    /// The dashboard owns the terminal, so without this flag it logs
    /// nowhere. Reports and exports log to stderr.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging (PROFDIFF_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,

    /// Generate a default profdiff.toml in the current directory
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for `--report`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Json,
    Text,
}

impl Args {
    /// Whether this run opens the terminal dashboard.
    pub fn interactive(&self) -> bool {
        self.report.is_none() && self.svg.is_none()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }
        if self.before.is_none() && self.after.is_none() {
            return Err("pass --before, --after, or both".to_string());
        }
        if self.report.is_some() && self.svg.is_some() {
            return Err("--report and --svg cannot be combined".to_string());
        }
        if !(self.width.is_finite() && self.width >= 200.0) {
            return Err("--width must be at least 200".to_string());
        }
        Ok(())
    }
}
