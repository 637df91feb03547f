use std::collections::HashMap;

use crate::compression::CompressionType;
use crate::page::PageVersion;
use crate::schema::SchemaDefinition;

use super::error::ConfigError;

/// Creator string written to the footer unless overridden
pub const DEFAULT_CREATED_BY: &str = concat!("pqwrite version ", env!("CARGO_PKG_VERSION"));

/// Configuration for a [`FileWriter`](super::FileWriter)
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// File format version written to the footer
    pub format_version: i32,

    /// Application that produced the file
    pub created_by: String,

    /// Compression applied to every page
    pub compression: CompressionType,

    /// Application metadata copied into the footer.
    /// An empty value is written as an absent value.
    pub key_value_metadata: HashMap<String, String>,

    /// Buffered byte estimate at which a row group is flushed automatically
    /// (0 = only flush manually and on close)
    pub max_row_group_size: u64,

    /// Schema of the records to write; required
    pub schema: Option<SchemaDefinition>,

    /// Data page layout
    pub page_version: PageVersion,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            format_version: 1,
            created_by: DEFAULT_CREATED_BY.to_string(),
            compression: CompressionType::Uncompressed,
            key_value_metadata: HashMap::new(),
            max_row_group_size: 0,
            schema: None,
            page_version: PageVersion::V1,
        }
    }
}

impl WriterConfig {
    /// Configuration optimized for fast writing (larger files)
    pub fn fast_write() -> Self {
        Self {
            compression: CompressionType::fast(),
            // 64MB row groups
            max_row_group_size: 64 * 1024 * 1024,
            ..Self::default()
        }
    }

    /// Configuration optimized for maximum compression (slower write)
    pub fn max_compression() -> Self {
        Self {
            compression: CompressionType::max_compression(),
            // Larger row groups compress better
            max_row_group_size: 256 * 1024 * 1024,
            page_version: PageVersion::V2,
            ..Self::default()
        }
    }

    /// Set the schema
    pub fn with_schema(mut self, schema: SchemaDefinition) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Parse and set the schema from its text form
    pub fn with_schema_text(self, text: &str) -> Result<Self, ConfigError> {
        Ok(self.with_schema(SchemaDefinition::parse(text)?))
    }

    /// Set the compression codec
    pub fn with_compression(mut self, compression: CompressionType) -> Self {
        self.compression = compression;
        self
    }

    /// Set the automatic flush threshold in bytes
    pub fn with_max_row_group_size(mut self, bytes: u64) -> Self {
        self.max_row_group_size = bytes;
        self
    }

    /// Set the data page layout
    pub fn with_page_version(mut self, page_version: PageVersion) -> Self {
        self.page_version = page_version;
        self
    }

    /// Set the creator string
    pub fn with_created_by(mut self, created_by: impl Into<String>) -> Self {
        self.created_by = created_by.into();
        self
    }

    /// Set the footer format version
    pub fn with_format_version(mut self, version: i32) -> Self {
        self.format_version = version;
        self
    }

    /// Add one key/value metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.key_value_metadata.insert(key.into(), value.into());
        self
    }

    /// Check option values that do not depend on the schema
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.compression {
            CompressionType::Gzip(level) if level > 9 => Err(ConfigError::InvalidCompressionLevel {
                codec: "gzip",
                level: i64::from(level),
            }),
            CompressionType::Zstd(level) if !(1..=22).contains(&level) => {
                Err(ConfigError::InvalidCompressionLevel {
                    codec: "zstd",
                    level: i64::from(level),
                })
            }
            _ => Ok(()),
        }
    }
}
