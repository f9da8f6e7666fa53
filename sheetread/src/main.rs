use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rayon::prelude::*;
use sheetread_core::{ExcelReader, HeaderAlignment, ReadOptions, ReaderConfig};
use std::path::PathBuf;

mod formatter;
mod logging;

use formatter::FileOutcome;

#[derive(Parser)]
#[command(name = "sheetread")]
#[command(about = "Extract worksheet rows from Excel/ODS files as records", long_about = None)]
#[command(version)]
struct Cli {
    /// Paths to the Excel/ODS files to read
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Row holding column names (1-based); 0 reads without a header
    #[arg(long, value_name = "ROW")]
    header_row: Option<u32>,

    /// How header names line up with data columns
    #[arg(long, value_enum)]
    alignment: Option<Alignment>,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Log skipped cells and per-sheet details to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Alignment {
    /// Header scan skips the last column and drops empty header cells
    Compat,
    /// Header names stay aligned with their columns
    Positional,
}

impl From<Alignment> for HeaderAlignment {
    fn from(value: Alignment) -> Self {
        match value {
            Alignment::Compat => HeaderAlignment::Compat,
            Alignment::Positional => HeaderAlignment::Positional,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// JSON output for pipelines
    Json,
    /// Human-readable colored output
    Human,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    // Load configuration
    let config = if let Some(config_path) = &cli.config {
        ReaderConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        // Try to load default config from current directory if it exists
        let default_config_path = PathBuf::from("sheetread.toml");
        if default_config_path.exists() {
            ReaderConfig::from_file(&default_config_path).with_context(|| {
                format!(
                    "Failed to load config from {}",
                    default_config_path.display()
                )
            })?
        } else {
            ReaderConfig::default()
        }
    };

    config.validate().context("Invalid configuration")?;

    let options = ReadOptions {
        header_row: cli.header_row,
        header_alignment: cli.alignment.map(HeaderAlignment::from),
    };
    let reader = ExcelReader::with_config(config);
    tracing::debug!(files = cli.files.len(), "reading files");

    // Files are independent reads; results keep argument order
    let outcomes: Vec<FileOutcome> = cli
        .files
        .par_iter()
        .map(|path| FileOutcome {
            path: path.clone(),
            result: reader.read_file(path, &options),
        })
        .collect();

    match cli.format {
        OutputFormat::Json => formatter::print_json(&outcomes, cli.pretty)?,
        OutputFormat::Human => formatter::print_human(&outcomes),
    }

    let exit_code = if outcomes.iter().any(|o| o.result.is_err()) {
        1
    } else {
        0
    };

    std::process::exit(exit_code);
}
