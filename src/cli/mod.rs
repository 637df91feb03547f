use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;

use pqwrite::compression::CompressionType;

mod config;
mod convert;
mod schema;

pub use config::Config;

/// pqwrite - stream JSON lines or CSV into Parquet files
#[derive(Parser)]
#[command(name = "pqwrite")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Page compression codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecArg {
    /// No compression
    Uncompressed,
    /// Snappy (fast)
    Snappy,
    /// Gzip (default level 6)
    Gzip,
    /// ZSTD (default level 3)
    Zstd,
}

impl CodecArg {
    /// Combine with an optional level into a codec setting
    pub fn with_level(self, level: Option<i32>) -> Result<CompressionType> {
        Ok(match (self, level) {
            (Self::Uncompressed, None) => CompressionType::Uncompressed,
            (Self::Snappy, None) => CompressionType::Snappy,
            (Self::Uncompressed | Self::Snappy, Some(_)) => {
                bail!("{:?} does not take a compression level", self)
            }
            (Self::Gzip, level) => {
                let level = level.unwrap_or(6);
                if level < 0 {
                    bail!("gzip level must be between 0 and 9, got {}", level);
                }
                CompressionType::Gzip(level as u32)
            }
            (Self::Zstd, level) => CompressionType::Zstd(level.unwrap_or(3)),
        })
    }
}

/// Input record format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// One JSON object per line
    Jsonl,
    /// Comma separated values with a header row (flat schemas only)
    Csv,
}

/// Options of the convert command
#[derive(clap::Args)]
pub struct ConvertArgs {
    /// Input file path (JSON lines or CSV)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output Parquet file path
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Schema definition file (`message name { ... }`)
    #[arg(short, long, value_name = "FILE")]
    pub schema: PathBuf,

    /// Input format (detected from the extension when omitted)
    #[arg(short, long, value_enum)]
    pub format: Option<InputFormat>,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Page compression codec
    #[arg(short = 'c', long, value_enum)]
    pub compression: Option<CodecArg>,

    /// Compression level (gzip 0-9, zstd 1-22)
    #[arg(long)]
    pub level: Option<i32>,

    /// Buffered bytes per row group before an automatic flush (0 = single row group)
    #[arg(short = 'r', long, value_name = "BYTES")]
    pub row_group_size: Option<u64>,

    /// Write version 2 data pages
    #[arg(long)]
    pub page_v2: bool,

    /// Creator string stored in the footer
    #[arg(long)]
    pub created_by: Option<String>,

    /// Footer metadata entry (repeatable)
    #[arg(short = 'm', long = "metadata", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub metadata: Vec<(String, String)>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert JSON lines or CSV records to a Parquet file
    Convert(ConvertArgs),

    /// Validate a schema definition and list its leaf columns
    Schema {
        /// Schema definition file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, _)) if key.is_empty() => Err(format!("empty key in `{}`", s)),
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Err(format!("expected KEY=VALUE, got `{}`", s)),
    }
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Convert(args) => convert::run(args),
        Commands::Schema { file } => schema::run(file),
    }
}
