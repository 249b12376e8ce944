use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::columns::Release;

#[derive(Debug, Parser)]
#[command(author, version, about = "Load and inspect GIAS establishment extracts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the registered columns of an extract release
    Columns(ColumnsArgs),
    /// Load an extract and preview the first rows in a formatted table
    Preview(PreviewArgs),
    /// Derive the SEND view of an extract
    Send(SendArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReleaseArg {
    /// Extracts published before September 2022
    Legacy,
    /// Extracts published from September 2022, with accreditation columns
    Current,
}

impl From<ReleaseArg> for Release {
    fn from(value: ReleaseArg) -> Self {
        match value {
            ReleaseArg::Legacy => Release::Legacy,
            ReleaseArg::Current => Release::Current,
        }
    }
}

/// Where an extract is read from. `--input` wins over `--resource`.
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Extract CSV file to load
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,
    /// Named resource looked up in the resource directories
    #[arg(short = 'r', long = "resource")]
    pub resource: Option<String>,
    /// Extra directory to search for resources (repeatable)
    #[arg(long = "resource-dir", action = clap::ArgAction::Append)]
    pub resource_dirs: Vec<PathBuf>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    /// Extract release whose column table to list
    #[arg(long, value_enum, default_value_t = ReleaseArg::Current)]
    pub release: ReleaseArg,
    /// Emit column descriptors as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Extract release the file follows
    #[arg(long, value_enum, default_value_t = ReleaseArg::Current)]
    pub release: ReleaseArg,
    /// Raw column names to keep (comma separated or repeatable)
    #[arg(short = 'C', long = "columns", value_delimiter = ',')]
    pub columns: Vec<String>,
    /// Raw column names to drop
    #[arg(long = "exclude-columns", value_delimiter = ',')]
    pub exclude_columns: Vec<String>,
    /// Keep raw header names instead of normalized ids
    #[arg(long = "raw-names")]
    pub raw_names: bool,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
}

#[derive(Debug, Args)]
pub struct SendArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Extract release the file follows
    #[arg(long, value_enum, default_value_t = ReleaseArg::Current)]
    pub release: ReleaseArg,
    /// Emit records keyed by URN as JSON instead of a table
    #[arg(long)]
    pub json: bool,
    /// Limit number of rows shown in the table output
    #[arg(long)]
    pub limit: Option<usize>,
}
