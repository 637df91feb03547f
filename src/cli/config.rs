//! TOML configuration file support.
//!
//! Settings that are tedious to pass as flags can live in a config file:
//!
//! ```toml
//! # pqwrite.toml
//! [writer]
//! compression = "zstd"
//! compression_level = 9
//! max_row_group_size = 134217728
//! page_version = "v2"
//! created_by = "ingest-service"
//!
//! [metadata]
//! source = "nightly export"
//! ```
//!
//! Command-line flags take precedence over file values.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use pqwrite::page::PageVersion;

use super::CodecArg;

/// Root configuration structure for pqwrite.toml files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Writer settings.
    #[serde(default)]
    pub writer: WriterSection,

    /// Key/value metadata copied into the footer.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Configuration for the file writer.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WriterSection {
    /// Page compression codec.
    pub compression: Option<CodecArg>,

    /// Codec level (gzip 0-9, zstd 1-22).
    pub compression_level: Option<i32>,

    /// Buffered bytes per row group before an automatic flush.
    pub max_row_group_size: Option<u64>,

    /// Data page layout.
    pub page_version: Option<PageVersion>,

    /// Creator string for the footer.
    pub created_by: Option<String>,

    /// Footer format version.
    pub format_version: Option<i32>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [writer]
            compression = "zstd"
            compression_level = 15
            max_row_group_size = 200000
            page_version = "v2"
            created_by = "me"

            [metadata]
            owner = "data team"
            empty = ""
        "#;

        let config = Config::parse(toml).unwrap();
        assert_eq!(config.writer.compression, Some(CodecArg::Zstd));
        assert_eq!(config.writer.compression_level, Some(15));
        assert_eq!(config.writer.max_row_group_size, Some(200_000));
        assert_eq!(config.writer.page_version, Some(PageVersion::V2));
        assert_eq!(config.writer.created_by.as_deref(), Some("me"));
        assert_eq!(config.metadata["owner"], "data team");
        assert_eq!(config.metadata["empty"], "");
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse("[writer]\ncompression = \"snappy\"\n").unwrap();
        assert_eq!(config.writer.compression, Some(CodecArg::Snappy));
        assert_eq!(config.writer.max_row_group_size, None);
        assert!(config.metadata.is_empty());
    }

    #[test]
    fn test_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.writer.compression, None);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Config::parse("[writer]\nrow_group_rows = 5\n").is_err());
    }
}
