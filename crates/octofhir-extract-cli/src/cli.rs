use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use octofhir_extract::Profile;
use octofhir_extract::output::OutputFormat;

#[derive(Parser)]
#[command(name = "octofhir-extract")]
#[command(about = "Flatten directories of FHIR Bundles into analysis tables")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to ./octofhir-extract.toml when present)
    #[arg(short, long, global = true, env = "OCTOFHIR_EXTRACT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (overrides logging.level; RUST_LOG wins over both)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract tables from a directory of Bundle files
    Extract(ExtractArgs),
    /// List the tables and columns each profile produces
    Tables(TablesArgs),
    /// Inspect configuration
    Config(ConfigArgs),
}

/// Output formats selectable on the command line.
#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Csv,
    Ndjson,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Ndjson => OutputFormat::Ndjson,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProfileArg {
    /// patients, encounters, conditions
    Detailed,
    /// patient_summary, condition_summary, medication_requests
    Summary,
    /// er_encounters
    #[value(alias = "er")]
    Emergency,
}

impl From<ProfileArg> for Profile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Detailed => Profile::Detailed,
            ProfileArg::Summary => Profile::Summary,
            ProfileArg::Emergency => Profile::Emergency,
        }
    }
}

#[derive(clap::Args)]
pub struct ExtractArgs {
    /// Directory containing Bundle JSON files
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    /// Directory to write tables into
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Output format
    #[arg(short, long)]
    pub format: Option<FormatArg>,
    /// Profile to extract (repeatable)
    #[arg(short, long = "profile")]
    pub profiles: Vec<ProfileArg>,
    /// Extract and report without writing any files
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(clap::Args)]
pub struct TablesArgs {
    /// Only list tables of this profile
    #[arg(short, long)]
    pub profile: Option<ProfileArg>,
    /// Print as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Load and validate the configuration
    Check,
}
