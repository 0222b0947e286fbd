pub mod friendly_names;
pub mod game_log;
pub mod log_file;
pub mod render;
pub mod settings;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, ValueEnum};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::friendly_names::FriendlyNames;
use crate::settings::{FailurePolicy, RenderSettings};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Annotated event stream as a rich-text document
    #[default]
    Rtf,
    /// Parsed entries and per-kind counts as JSON
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "sc-log-parser",
    version,
    about = "Extracts kills, vehicle destructions and hits from a Star Citizen Game.log"
)]
pub struct Cli {
    /// Path to Game.log
    pub log_path: PathBuf,

    /// Friendly name table (JSON object of raw code -> display name)
    #[arg(long)]
    pub names: Option<PathBuf>,

    /// Extra name table whose entries win over the base table
    #[arg(long)]
    pub names_override: Option<PathBuf>,

    /// Settings file (JSON)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Write the document here instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Rtf)]
    pub format: OutputFormat,

    /// Stop at the first line with a known tag that cannot be parsed
    #[arg(long)]
    pub strict: bool,

    /// Render timestamps in UTC instead of local time
    #[arg(long)]
    pub utc: bool,

    #[arg(long, short)]
    pub verbose: bool,
}

pub fn run() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(error) = execute(&cli) {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn execute(cli: &Cli) -> anyhow::Result<()> {
    let settings = load_settings(cli)?;
    let raw_log = log_file::read_game_log(&cli.log_path)
        .context("Please check the Star Citizen Game.log path")?;

    let document = match cli.format {
        OutputFormat::Json => {
            let result = log_file::parse_game_log_text(&raw_log);
            tracing::info!(
                total_lines = result.total_lines,
                failed_lines = result.failed_lines,
                "Parsed game log"
            );
            serde_json::to_string_pretty(&result).context("Failed to serialize parse result")?
        }
        OutputFormat::Rtf => {
            let names = load_friendly_names(&settings, cli.names_override.as_deref())?;
            if cli.utc {
                render::render_log_in(&Utc, &raw_log, &names, settings.failure_policy)?
            } else {
                render::render_log(&raw_log, &names, settings.failure_policy)?
            }
        }
    };

    write_document(cli.output.as_deref(), &document)
}

fn load_settings(cli: &Cli) -> anyhow::Result<RenderSettings> {
    let mut settings = match cli.settings.as_deref() {
        Some(path) => RenderSettings::load(path)?,
        None => RenderSettings::default(),
    };

    if cli.strict {
        settings.failure_policy = FailurePolicy::Abort;
    }
    if let Some(names_path) = cli.names.as_ref() {
        settings.friendly_names_path = Some(names_path.clone());
    }

    Ok(settings)
}

fn load_friendly_names(
    settings: &RenderSettings,
    override_path: Option<&Path>,
) -> anyhow::Result<FriendlyNames> {
    let names = match settings.resolve_friendly_names_path() {
        Some((path, true)) => FriendlyNames::load(&path)?,
        Some((path, false)) => FriendlyNames::load_or_empty(&path),
        None => FriendlyNames::default(),
    };

    match override_path {
        Some(path) => {
            let overrides = FriendlyNames::load(path)?;
            tracing::debug!(
                override_path = %path.display(),
                override_entries = overrides.len(),
                "Applying friendly name overrides"
            );
            Ok(names.with_overrides(&overrides))
        }
        None => Ok(names),
    }
}

fn write_document(output: Option<&Path>, document: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => std::fs::write(path, document)
            .with_context(|| format!("Failed to write output '{}'", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(document.as_bytes())
                .and_then(|()| stdout.flush())
                .context("Failed to write output to stdout")
        }
    }
}
