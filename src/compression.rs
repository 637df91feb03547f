//! Page compression codecs.
//!
//! Each codec maps to its Parquet `CompressionCodec` id; the codec is chosen
//! once per writer and applied to every page body.

use std::fmt;
use std::io::{self, Write};

use flate2::write::GzEncoder;
use serde::Deserialize;

use crate::format::CompressionCodec;

/// Compression options for page bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(tag = "codec", content = "level", rename_all = "lowercase")]
pub enum CompressionType {
    /// No compression (fastest write, largest files)
    #[default]
    Uncompressed,
    /// Snappy raw blocks (fast, moderate ratio)
    Snappy,
    /// Gzip with the given level (0-9)
    Gzip(u32),
    /// ZSTD with the given level (1-22)
    Zstd(i32),
}

impl CompressionType {
    /// Maximum compression (slower write, smallest files)
    pub fn max_compression() -> Self {
        Self::Zstd(22)
    }

    /// Balanced compression
    pub fn balanced() -> Self {
        Self::Zstd(3)
    }

    /// Fast compression (faster write, larger files)
    pub fn fast() -> Self {
        Self::Snappy
    }

    /// Footer codec id
    pub fn to_thrift(&self) -> CompressionCodec {
        match self {
            Self::Uncompressed => CompressionCodec::UNCOMPRESSED,
            Self::Snappy => CompressionCodec::SNAPPY,
            Self::Gzip(_) => CompressionCodec::GZIP,
            Self::Zstd(_) => CompressionCodec::ZSTD,
        }
    }

    /// Whether page bodies are transformed at all
    pub fn is_compressed(&self) -> bool {
        !matches!(self, Self::Uncompressed)
    }

    /// Lowercase codec name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Uncompressed => "uncompressed",
            Self::Snappy => "snappy",
            Self::Gzip(_) => "gzip",
            Self::Zstd(_) => "zstd",
        }
    }

    /// Compress one page body
    pub fn compress(&self, input: &[u8]) -> io::Result<Vec<u8>> {
        match *self {
            Self::Uncompressed => Ok(input.to_vec()),
            Self::Snappy => snap::raw::Encoder::new()
                .compress_vec(input)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e)),
            Self::Gzip(level) => {
                let mut encoder = GzEncoder::new(
                    Vec::with_capacity(input.len() / 2),
                    flate2::Compression::new(level),
                );
                encoder.write_all(input)?;
                encoder.finish()
            }
            Self::Zstd(level) => zstd::bulk::compress(input, level),
        }
    }
}

impl fmt::Display for CompressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gzip(level) => write!(f, "gzip({})", level),
            Self::Zstd(level) => write!(f, "zstd({})", level),
            other => f.write_str(other.name()),
        }
    }
}
