//! `storepulse` — load retail weekly sales and report store performance.
//!
//! # Usage
//!
//! ```text
//! storepulse --config storepulse.toml load --input sales.csv
//! storepulse analyze --format json --policy per-bucket
//! storepulse --store sales.db run --input sales.csv
//! ```

mod output;
mod pipeline;
mod settings;

use std::{
  fs::OpenOptions,
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use output::OutputFormat;
use settings::Settings;
use storepulse_core::InflationPolicy;
use storepulse_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::writer::MakeWriterExt as _};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "Retail store performance pipeline")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "storepulse.toml")]
  config: PathBuf,

  /// SQLite database path; overrides `store_path` from the config.
  #[arg(long)]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Extract, clean and validate a sales CSV, then replace the sales table.
  Load {
    /// CSV export to load; defaults to `input_file` from the config.
    #[arg(short, long)]
    input: Option<PathBuf>,
  },
  /// Print the store performance report for the loaded table.
  Analyze {
    #[command(flatten)]
    report: ReportArgs,
  },
  /// Load, then analyze.
  Run {
    #[arg(short, long)]
    input:  Option<PathBuf>,
    #[command(flatten)]
    report: ReportArgs,
  },
}

#[derive(Args)]
struct ReportArgs {
  #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
  format: OutputFormat,

  /// `dominant` or `per-bucket`; defaults to `inflation_policy` from the
  /// config.
  #[arg(long)]
  policy: Option<InflationPolicy>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  let settings = settings::load(&cli.config, cli.store.as_deref())?;
  init_tracing(settings.log_file.as_deref())?;

  let store = SqliteStore::open(&settings.store_path)
    .await
    .with_context(|| format!("failed to open database at {:?}", settings.store_path))?;
  tracing::info!(path = %settings.store_path.display(), "database connection established");

  match cli.command {
    Command::Load { input } => {
      let input = resolve_input(input, &settings)?;
      pipeline::load(&store, &input).await?;
    }
    Command::Analyze { report } => {
      print_report(&store, &settings, report).await?;
    }
    Command::Run { input, report } => {
      let input = resolve_input(input, &settings)?;
      pipeline::load(&store, &input).await?;
      print_report(&store, &settings, report).await?;
    }
  }

  Ok(())
}

async fn print_report(
  store: &SqliteStore,
  settings: &Settings,
  args: ReportArgs,
) -> anyhow::Result<()> {
  let policy = args.policy.unwrap_or(settings.inflation_policy);
  let report = pipeline::analyze(store, policy).await?;
  print!("{}", output::render(&report, args.format)?);
  Ok(())
}

fn resolve_input(flag: Option<PathBuf>, settings: &Settings) -> anyhow::Result<PathBuf> {
  flag
    .map(|p| settings::expand_tilde(&p))
    .or_else(|| settings.input_file.clone())
    .context("no input file: pass --input or set input_file in the config")
}

/// Log to stderr, and additionally to `log_file` when one is configured.
/// Stdout carries only the report.
fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<()> {
  let filter = EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy();

  match log_file {
    Some(path) => {
      let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
      tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::io::stderr.and(Arc::new(file)))
        .init();
    }
    None => tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_writer(std::io::stderr)
      .init(),
  }
  Ok(())
}
