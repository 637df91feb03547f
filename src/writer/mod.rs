//! # File writer
//!
//! [`FileWriter`] orchestrates a complete file:
//!
//! ```text
//! PAR1 | row group | row group | ... | footer | footer length (i32 LE) | PAR1
//! ```
//!
//! Records are handed to an [`Accumulator`](crate::accumulator::Accumulator).
//! When its byte estimate reaches the configured threshold the buffered data
//! is written out as a row group; `close` flushes the rest and appends the
//! footer.
//!
//! The writer is single-threaded and owns its sink until it is unwrapped.

mod config;
mod error;
mod stats;
mod writer_impl;

#[cfg(test)]
mod tests;

pub use config::{WriterConfig, DEFAULT_CREATED_BY};
pub use error::{ConfigError, Phase, WriterError};
pub use stats::WriterStats;
pub use writer_impl::{FileWriter, WriterState, MAGIC};
