//! # pqwrite
//!
//! A command-line tool for writing Parquet files from row-oriented input.
//!
//! ## Usage
//!
//! ```bash
//! # Convert JSON lines to Parquet with ZSTD pages
//! pqwrite convert events.jsonl events.parquet --schema events.schema -c zstd
//!
//! # CSV input, 64MB row groups, footer metadata
//! pqwrite convert trips.csv trips.parquet -s trips.schema -r 67108864 -m source=export
//!
//! # Check a schema definition
//! pqwrite schema events.schema
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
