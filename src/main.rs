//! campaign-import CLI - load a campaign-notes JSON export into SQLite

use anyhow::Context;
use campaign_import::config::{load_config, ImportConfig};
use campaign_import::output::{is_quiet, OutputMode};
use campaign_import::ui::{self, Icons, TableProgress};
use campaign_import::{import_file, ImportReport};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "campaign-import")]
#[command(version)]
#[command(about = "Import a campaign-notes JSON export into a SQLite database")]
#[command(long_about = r#"
Creates two tables in a new SQLite database and fills them from the export:
  • pages        one row per entry of the "pages" array
  • connections  one row per entry of the "conns" array

Both tables must not exist yet; importing twice into the same file fails.

Example usage:
  campaign-import campaign.json campaign.db
  campaign-import campaign.json campaign.db --format json
"#)]
struct Cli {
    /// Path to the campaign JSON export
    input: PathBuf,

    /// Path to the database file to create
    database: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Suppress progress and summary output
    #[arg(short, long)]
    quiet: bool,

    /// Output format (text, json)
    #[arg(short, long)]
    format: Option<OutputMode>,

    /// Path to a config file (defaults to ./campaign-import.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn init_logging(verbose: bool, config: &ImportConfig) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(config.log_level.as_deref().unwrap_or("info"))
        })
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn emit_report(mode: OutputMode, quiet: bool, report: &ImportReport, database: &Path) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            let data = serde_json::json!({
                "status": "ok",
                "command": "import",
                "database": database.display().to_string(),
                "report": report,
            });
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        OutputMode::Human if !quiet => {
            println!();
            ui::success("Import complete!");
            ui::status(Icons::DATABASE, "Database", &database.display().to_string());
            println!("{}", ui::report_table(report));
            if report.dangling_connections > 0 {
                ui::warn(&format!(
                    "{} connections point at page ids missing from the export",
                    report.dangling_connections
                ));
            }
            ui::timing(&format!("{:.2?}", report.elapsed));
        }
        OutputMode::Human => {}
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())
        .context("failed to load config")?
        .unwrap_or_default();

    init_logging(cli.verbose, &config);

    let mode = match cli.format {
        Some(mode) => mode,
        None => config
            .format
            .as_deref()
            .map(str::parse::<OutputMode>)
            .transpose()
            .map_err(anyhow::Error::msg)?
            .unwrap_or(OutputMode::Human),
    };
    let quiet = cli.quiet || config.quiet.unwrap_or(false) || is_quiet() || !mode.is_human();

    if !quiet {
        ui::header("Importing campaign notes");
        ui::status(Icons::FILE, "Input", &cli.input.display().to_string());
        ui::status(Icons::DATABASE, "Database", &cli.database.display().to_string());
        ui::phase("Loading tables");
    }

    let report = import_file(&cli.input, &cli.database, TableProgress::new(quiet))
        .with_context(|| {
            format!(
                "failed to import {} into {}",
                cli.input.display(),
                cli.database.display()
            )
        })?;

    emit_report(mode, quiet, &report, &cli.database)
}
