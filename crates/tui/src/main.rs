mod app;
mod cli;
mod config;
mod renderer;
mod report;

use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use profdiff_core::model::{Session, Slot};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::app::{App, load_file};
use crate::cli::{Args, ReportFormat};
use crate::config::Config;
use crate::report::Report;

fn main() -> Result<()> {
    let args = Args::parse();
    args.validate().map_err(|e| anyhow!(e))?;

    if args.init_config {
        return init_config();
    }

    init_logging(&args)?;

    let mut config = Config::resolve(args.config.as_deref())?;
    config.merge_with_args(&args);

    let mut session = Session::new(config.aggregate.clone());
    for (slot, path) in [(Slot::Before, &args.before), (Slot::After, &args.after)] {
        let Some(path) = path else {
            continue;
        };
        match load_file(&mut session, slot, path) {
            Ok(()) => {}
            // The dashboard shows parse failures in its status line.
            Err(err) if args.interactive() && path.exists() => {
                warn!(error = %format!("{err:#}"), "starting with a failed capture");
            }
            Err(err) => return Err(err),
        }
    }

    let mut state = config.display.view_state();
    if let Some(filter) = &args.filter {
        state.query.filter = filter.clone();
    }
    let dark = !args.light;

    if let Some(format) = args.report {
        let report = Report::build(&session, &state);
        let mut out = std::io::stdout().lock();
        match format {
            ReportFormat::Json => report.write_json(&mut out)?,
            ReportFormat::Text => report.write_text(&mut out)?,
        }
        out.flush()?;
        return Ok(());
    }

    if let Some(path) = &args.svg {
        return report::export_svg(path, args.view, &session, &state, args.width, dark);
    }

    info!(view = %args.view, "starting dashboard");
    let mut app = App::new(
        session,
        args.before.clone(),
        args.after.clone(),
        state,
        args.view,
        dark,
    );
    renderer::run(&mut app)
}

/// Write a default `profdiff.toml` into the current directory.
fn init_config() -> Result<()> {
    let path = Path::new(config::DEFAULT_PATH);
    if path.exists() {
        bail!(
            "{} already exists; remove it first or edit it manually",
            path.display()
        );
    }
    std::fs::write(path, Config::default_toml()?)
        .with_context(|| format!("failed to write {}", path.display()))?;
    writeln!(std::io::stdout(), "created {}", path.display())?;
    Ok(())
}

/// Install the global subscriber.
///
/// The dashboard owns the terminal, so it only logs to `--log-file`.
/// Reports and exports log to stderr.
fn init_logging(args: &Args) -> Result<()> {
    let default = if args.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("PROFDIFF_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    let (writer, ansi) = match &args.log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("failed to create log file: {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None if args.interactive() => (BoxMakeWriter::new(std::io::sink), false),
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to install logger: {e}"))
}
