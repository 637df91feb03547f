use std::fmt;

use crate::accumulator::EncodeError;
use crate::schema::SchemaError;

/// Invalid writer configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No schema was supplied
    #[error("a schema definition is required")]
    MissingSchema,

    /// The schema text could not be parsed or validated
    #[error("invalid schema: {0}")]
    InvalidSchema(#[from] SchemaError),

    /// Compression level out of range for the codec
    #[error("compression level {level} is out of range for {codec}")]
    InvalidCompressionLevel {
        /// Codec name
        codec: &'static str,
        /// Rejected level
        level: i64,
    },
}

/// Writer operation during which an error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Opening the output
    Open,
    /// Adding a record (including a flush it triggered)
    Add,
    /// Explicit row-group flush
    Flush,
    /// Final flush and footer
    Close,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Open => "open",
            Self::Add => "add",
            Self::Flush => "flush",
            Self::Close => "close",
        })
    }
}

/// Errors that can occur during writing
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    /// Flush requested with no buffered records; nothing changed
    #[error("no records buffered, nothing to flush")]
    EmptyFlush,

    /// The accumulator rejected a record; nothing changed
    #[error("record rejected: {0}")]
    Encoding(#[from] EncodeError),

    /// The sink failed
    #[error("I/O error during {phase}: {source}")]
    Io {
        /// Operation that failed
        phase: Phase,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration at construction
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The writer was already closed
    #[error("writer is closed")]
    Closed,

    /// An earlier I/O failure left partial output; the writer is unusable
    #[error("writer failed earlier and cannot be used")]
    Failed,

    /// Footer does not fit the 4-byte length field
    #[error("footer of {0} bytes exceeds the format limit")]
    FooterTooLarge(u64),
}

impl WriterError {
    /// Phase for I/O errors
    pub fn phase(&self) -> Option<Phase> {
        match self {
            Self::Io { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}
