//! # pqwrite - A Streaming Parquet File Writer
//!
//! `pqwrite` writes records into self-describing columnar files in the Apache
//! Parquet layout, without depending on Arrow:
//!
//! ```text
//! PAR1 | row group 1 | ... | row group N | footer | footer length (i32 LE) | PAR1
//! ```
//!
//! ## Key Features
//!
//! - **Schema driven**: schemas are written in the familiar `message { ... }`
//!   text syntax or built programmatically, including nested groups and
//!   repeated fields.
//!
//! - **Streaming**: records are buffered per row group and flushed once a
//!   configurable byte threshold is reached, so memory use stays bounded.
//!
//! - **Interoperable**: the output is readable by any standard Parquet reader
//!   (PLAIN values, RLE levels, Thrift compact footer).
//!
//! - **Configurable Compression**: Snappy, Gzip, ZSTD or uncompressed pages,
//!   in either the v1 or v2 data page layout.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pqwrite::prelude::*;
//! use pqwrite::record;
//!
//! let config = WriterConfig::default()
//!     .with_schema_text("message trip { required int64 id; optional binary city (UTF8); }")?
//!     .with_compression(CompressionType::Zstd(3))
//!     .with_max_row_group_size(64 * 1024 * 1024)
//!     .with_metadata("source", "example");
//!
//! let mut writer = FileWriter::new_file("trips.parquet", config)?;
//! writer.add_data(&record! { "id" => 1i64, "city" => "Lisbon" })?;
//! writer.add_data(&record! { "id" => 2i64 })?;
//!
//! let stats = writer.close()?;
//! println!("{}", stats);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`writer`]: the file writer orchestrator and its configuration
//! - [`schema`]: schema definitions, parsing and flattening
//! - [`record`]: the row-oriented value model and JSON / text conversion
//! - [`accumulator`]: record shredding into per-column buffers
//! - [`encoding`], [`compression`], [`page`]: page construction
//! - [`row_group`]: column chunk serialization
//! - [`format`]: footer and page header structures and their compact-protocol encoding
//! - [`sink`]: the position-tracking output adapter

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod accumulator;
pub mod compression;
pub mod encoding;
pub mod format;
pub mod page;
pub mod record;
pub mod row_group;
pub mod schema;
pub mod sink;
pub mod writer;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::accumulator::{Accumulator, EncodeError, SchemaAccumulator};
    pub use crate::compression::CompressionType;
    pub use crate::page::PageVersion;
    pub use crate::record::{record_from_json, ConvertError, Record, Value};
    pub use crate::schema::{
        ConvertedType, Field, PhysicalType, Repetition, SchemaDefinition, SchemaError,
    };
    pub use crate::writer::{
        ConfigError, FileWriter, Phase, WriterConfig, WriterError, WriterState, WriterStats,
    };
}
