//! CLI argument definitions for sheet intake.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use intake_cli::edits::EditSet;
use intake_ingest::DEFAULT_MAX_FILE_SIZE_MB;
use intake_model::WizardKind;
use intake_submit::Currency;

#[derive(Parser)]
#[command(
    name = "sheet-intake",
    version,
    about = "Map spreadsheet columns and submit sheets to the intake backend",
    long_about = "Map spreadsheet columns and submit sheets to the intake backend.\n\n\
                  Detects header rows, guesses the style, brand, MSRP and image columns,\n\
                  applies your corrections, and uploads each selected sheet as its own request."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show detected header rows, suggested mappings and validation.
    Inspect(InspectArgs),

    /// Apply mapping edits and report whether the selected sheets are ready.
    Map(MapArgs),

    /// Submit the selected sheets, one request per sheet.
    Submit(SubmitArgs),
}

#[derive(Args)]
pub struct SourceArgs {
    /// Excel workbook (.xlsx or .xls).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Upload wizard: google-images, reformat, image-link, crop, or data-warehouse[:MODE]
    /// where MODE is imagesAndMsrp, imagesOnly or msrpOnly.
    #[arg(long = "wizard", default_value = "google-images")]
    pub wizard: WizardKind,

    /// Reject workbooks larger than this many megabytes.
    #[arg(long = "max-file-size-mb", value_name = "MB", default_value_t = DEFAULT_MAX_FILE_SIZE_MB)]
    pub max_file_size_mb: usize,
}

#[derive(Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Number of raw rows to print per sheet.
    #[arg(long = "rows", value_name = "N", default_value_t = 0)]
    pub rows: usize,
}

#[derive(Args)]
pub struct MapArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub edits: EditSet,
}

#[derive(Args)]
pub struct SubmitArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub edits: EditSet,

    /// Recipient of the results.
    #[arg(long = "email", value_name = "EMAIL", conflicts_with = "page_url")]
    pub email: Option<String>,

    /// Page URL carrying the recipient as sendToEmail, email or userEmail.
    #[arg(long = "page-url", value_name = "URL")]
    pub page_url: Option<String>,

    /// TOML settings file.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Backend base URL (overrides the config file).
    #[arg(long = "server", value_name = "URL", env = "SHEET_INTAKE_SERVER_URL")]
    pub server: Option<String>,

    /// Price currency sent with MSRP submissions.
    #[arg(long = "currency", value_name = "CODE")]
    pub currency: Option<Currency>,

    #[arg(long = "icon-distro")]
    pub icon_distro: bool,

    #[arg(long = "ai-mode")]
    pub ai_mode: bool,

    #[arg(long = "skip-data-warehouse")]
    pub skip_data_warehouse: bool,

    #[arg(long = "new-distro")]
    pub new_distro: bool,

    /// Print the requests as curl commands instead of sending them.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
