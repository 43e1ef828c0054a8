//! LifeCloud headless editor
//!
//! Replays a JSON edit script against a fresh editing session and prints
//! the resulting project as JSON. Optionally hands the result to the
//! manifest exporter.

mod runner;
mod script;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use lc_app_state::EditorSession;
use lc_common::EditorConfig;
use lc_export::{begin_export, ExportMonitor, ExportState, ManifestExporter};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::runner::ScriptRunner;
use crate::script::EditScript;

/// Replay a timeline edit script and print the resulting project
#[derive(Parser, Debug)]
#[command(name = "lc-headless")]
#[command(version)]
struct Args {
    /// Edit script (JSON)
    script: PathBuf,

    /// Editor configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write an export manifest into this directory
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Seconds to wait for the export to finish
    #[arg(long, default_value = "30")]
    export_timeout: u64,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG takes precedence over --verbose.
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EditorConfig::default(),
    };
    let script = EditScript::load(&args.script)?;
    info!(
        script = %args.script.display(),
        commands = script.commands.len(),
        "Replaying edit script"
    );

    let mut session = EditorSession::try_new(config).context("Invalid editor config")?;
    let report = ScriptRunner::new(&mut session, &script).run()?;

    if let Some(dir) = &args.export_dir {
        let mut exporter = ManifestExporter::new(dir);
        let mut monitor = ExportMonitor::new();
        begin_export(&mut exporter, &mut monitor, report.snapshot.clone())
            .context("Failed to start export")?;
        match monitor.wait(Duration::from_secs(args.export_timeout)) {
            ExportState::Complete => {
                if let Some(output) = monitor.output() {
                    info!(output = %output.display(), "Export written");
                }
            }
            ExportState::Failed(reason) => anyhow::bail!("Export failed: {reason}"),
            other => {
                warn!(state = other.label(), "Export did not finish in time");
                monitor.cancel();
            }
        }
    }

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    println!("{json}");
    Ok(())
}
