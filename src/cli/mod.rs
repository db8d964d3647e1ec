//! CLI implementation using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::output::Format;

/// retfilter - Static equivalent-mutant filtering for return-value mutations.
#[derive(Parser)]
#[command(name = "retfilter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project directory used for configuration discovery
    #[arg(short, long, default_value = ".")]
    pub path: PathBuf,

    /// Output format (default: from configuration, else text)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Number of parallel workers (default: number of CPUs)
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Filter equivalent mutations out of analysis unit files
    #[command(alias = "f")]
    Filter(FilterArgs),

    /// List interceptor features and whether they are enabled
    #[command(alias = "ls")]
    Features(FeaturesArgs),

    /// Write a default retfilter.toml into the project directory
    Init(InitArgs),
}

#[derive(Args)]
pub struct FeatureToggles {
    /// Feature toggles, e.g. `-FRETEQUIV` or `+FOO` (comma separated, applied after config)
    #[arg(long = "features", value_delimiter = ',', allow_hyphen_values = true)]
    pub settings: Vec<String>,
}

#[derive(Args)]
pub struct FilterArgs {
    /// Unit files (.json or .toml) or directories containing them.
    ///
    /// Files found inside a directory that do not hold unit lists are skipped
    /// with a warning. Files named directly must parse.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    #[command(flatten)]
    pub toggles: FeatureToggles,

    /// Exclude files matching pattern when walking directories
    #[arg(short, long)]
    pub exclude: Vec<String>,

    /// Only list filtered mutations
    #[arg(long)]
    pub hide_kept: bool,
}

#[derive(Args)]
pub struct FeaturesArgs {
    #[command(flatten)]
    pub toggles: FeatureToggles,
}

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Text,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => Format::Json,
            OutputFormat::Markdown => Format::Markdown,
            OutputFormat::Text => Format::Text,
        }
    }
}
