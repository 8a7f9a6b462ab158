use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
use commands::inspect::handle_inspect;
use commands::query::{handle_extract, handle_gradient, ChannelArg, InstrumentArg};

/// CLI for the Calrea / iButton field-logger pipeline
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Convert a raw Calrea export into a calibrated CSV.
    Convert {
        /// Raw instrument export
        #[arg(long)]
        raw: PathBuf,
        /// Calibrated CSV to write (overwritten if present)
        #[arg(long)]
        out: PathBuf,
        /// TOML file with calibration constants
        #[arg(long)]
        calibration: Option<PathBuf>,
    },
    /// Average a channel over the window ending at a timestamp.
    Extract {
        #[arg(long, value_enum)]
        instrument: InstrumentArg,
        /// Calibrated Calrea CSV, or the iButton logger export saved
        /// as CSV (the .xlsx workbook itself is not readable)
        #[arg(long)]
        file: PathBuf,
        /// Window anchor, MM/DD/YYYY HH:MM
        #[arg(long)]
        at: String,
        /// Window length in minutes
        #[arg(long)]
        minutes: i64,
        #[arg(long)]
        calibration: Option<PathBuf>,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Least-squares rate of change over the window ending at a timestamp.
    Gradient {
        #[arg(long, value_enum)]
        instrument: InstrumentArg,
        /// Calibrated Calrea CSV, or the iButton logger export saved
        /// as CSV (the .xlsx workbook itself is not readable)
        #[arg(long)]
        file: PathBuf,
        /// Window anchor, MM/DD/YYYY HH:MM
        #[arg(long)]
        at: String,
        /// Window length in minutes
        #[arg(long)]
        minutes: i64,
        /// Calrea channel to fit (ignored for ibutton)
        #[arg(long, value_enum, default_value = "skin-temperature")]
        channel: ChannelArg,
        #[arg(long)]
        calibration: Option<PathBuf>,
        /// Emit JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// Detect a file's format and report its shape.
    Inspect {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            raw,
            out,
            calibration,
        } => commands::convert::handle_convert(&raw, &out, calibration.as_deref()),
        Commands::Extract {
            instrument,
            file,
            at,
            minutes,
            calibration,
            json,
        } => handle_extract(instrument, &file, &at, minutes, calibration.as_deref(), json),
        Commands::Gradient {
            instrument,
            file,
            at,
            minutes,
            channel,
            calibration,
            json,
        } => handle_gradient(
            instrument,
            &file,
            &at,
            minutes,
            channel,
            calibration.as_deref(),
            json,
        ),
        Commands::Inspect { file, json } => handle_inspect(&file, json),
    }
}
