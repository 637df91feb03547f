use std::fmt;

/// Statistics from a completed write operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterStats {
    /// Number of records written to the file
    pub records_written: u64,
    /// Number of row groups written
    pub row_groups_written: usize,
    /// Total file size in bytes
    pub file_size_bytes: u64,
    /// Size of the encoded footer in bytes
    pub footer_size_bytes: u64,
}

impl fmt::Display for WriterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} records in {} row groups ({} bytes, footer {} bytes)",
            self.records_written, self.row_groups_written, self.file_size_bytes, self.footer_size_bytes
        )
    }
}
