//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for harvest results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Identifier list and organisation table
    Table,
    /// Identifiers only, one per line
    Ids,
    /// JSON array of organisations
    Json,
    /// CSV with a header row
    Csv,
}

impl From<OutputFormat> for ror_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Table => ror_domain::OutputFormat::Table,
            OutputFormat::Ids => ror_domain::OutputFormat::Ids,
            OutputFormat::Json => ror_domain::OutputFormat::Json,
            OutputFormat::Csv => ror_domain::OutputFormat::Csv,
        }
    }
}

/// CLI arguments for ror-harvest
#[derive(Parser, Debug)]
#[command(name = "ror-harvest")]
#[command(author, version, about = "Extract ROR IDs from text and look them up in the ROR registry")]
#[command(long_about = r#"
ror-harvest finds Research Organization Registry (ROR) identifiers in free
text and resolves each one against the ROR API.

Identifiers are recognised as registry URLs (https://ror.org/03vek6s52) or
as bare nine-character tokens such as (00hx57361). Lookups run one at a
time; rate-limited requests wait five minutes and are retried.

Configuration files are loaded from (in priority order):
1. ROR_HARVEST_* environment variables
2. --config <path>        Explicit config file
3. ./ror-harvest.toml     Project-level config
4. ~/.config/ror-harvest/config.toml   Global config

Example:
  ror-harvest references.txt
  ror-harvest --text "see https://ror.org/03vek6s52" -o csv
  cat paper.md | ror-harvest --extract-only
  ror-harvest --sample --save --out-dir exports
"#)]
pub struct Cli {
    /// File to read text from (`-` or omitted reads stdin)
    #[arg(value_name = "FILE", conflicts_with_all = ["text", "sample"])]
    pub input: Option<PathBuf>,

    /// Scan this text instead of a file
    #[arg(short, long, conflicts_with = "sample")]
    pub text: Option<String>,

    /// Scan the built-in sample document
    #[arg(long)]
    pub sample: bool,

    /// Only extract identifiers, skip registry lookups
    #[arg(short = 'x', long)]
    pub extract_only: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Include id, url, type and status columns in JSON/CSV output
    #[arg(long)]
    pub extended: bool,

    /// Write ror-ids.txt and (after lookups) the JSON and CSV exports
    #[arg(short, long)]
    pub save: bool,

    /// Directory for --save
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Copy the identifier list to the clipboard
    #[arg(short, long)]
    pub copy: bool,

    /// Override the registry endpoint
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Whether input should come from stdin
    pub fn reads_stdin(&self) -> bool {
        self.text.is_none()
            && !self.sample
            && self.input.as_ref().is_none_or(|p| p.as_os_str() == "-")
    }
}
