use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use log::{debug, info, warn};

use crate::accumulator::{Accumulator, SchemaAccumulator};
use crate::compression::CompressionType;
use crate::format::{ColumnChunk, CompactEncode, FileMetaData, KeyValue, RowGroup, SchemaElement};
use crate::page::PageVersion;
use crate::record::Record;
use crate::row_group::write_row_group;
use crate::sink::PositionWriter;

use super::config::WriterConfig;
use super::error::{ConfigError, Phase, WriterError};
use super::stats::WriterStats;

/// File magic, written at the start and at the end of every file
pub const MAGIC: [u8; 4] = *b"PAR1";

/// Lifecycle of a [`FileWriter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    /// Constructed, no record accepted yet
    Created,
    /// At least one record accepted
    Writing,
    /// Footer written; no further operations allowed
    Closed,
    /// Partial output reached the sink; no further operations allowed
    Failed,
}

/// Streaming writer for a single columnar file
pub struct FileWriter<W: Write, A: Accumulator = SchemaAccumulator> {
    sink: PositionWriter<W>,
    accumulator: A,
    format_version: i32,
    created_by: String,
    compression: CompressionType,
    page_version: PageVersion,
    max_row_group_size: u64,
    key_value_metadata: Vec<KeyValue>,
    row_groups: Vec<RowGroup>,
    total_records: u64,
    state: WriterState,
}

impl FileWriter<BufWriter<File>> {
    /// Create a new writer to a file path
    pub fn new_file<P: AsRef<Path>>(path: P, config: WriterConfig) -> Result<Self, WriterError> {
        // Check the configuration before touching the filesystem
        config.validate()?;
        if config.schema.is_none() {
            return Err(ConfigError::MissingSchema.into());
        }
        let file = File::create(path).map_err(|source| WriterError::Io {
            phase: Phase::Open,
            source,
        })?;
        Self::new(BufWriter::new(file), config)
    }
}

impl<W: Write> FileWriter<W> {
    /// Create a new writer to any Write implementation, using the schema from `config`
    pub fn new(sink: W, mut config: WriterConfig) -> Result<Self, WriterError> {
        let schema = config.schema.take().ok_or(ConfigError::MissingSchema)?;
        Self::with_accumulator(sink, config, SchemaAccumulator::new(schema))
    }
}

impl<W: Write, A: Accumulator> FileWriter<W, A> {
    /// Create a writer around a caller-supplied accumulator
    ///
    /// The schema in `config`, if any, is ignored; the accumulator's schema is
    /// written to the footer.
    pub fn with_accumulator(sink: W, config: WriterConfig, accumulator: A) -> Result<Self, WriterError> {
        config.validate()?;

        let mut key_value_metadata: Vec<KeyValue> = config
            .key_value_metadata
            .into_iter()
            .map(|(key, value)| KeyValue {
                key,
                value: if value.is_empty() { None } else { Some(value) },
            })
            .collect();
        key_value_metadata.sort_by(|a, b| a.key.cmp(&b.key));

        Ok(Self {
            sink: PositionWriter::new(sink),
            accumulator,
            format_version: config.format_version,
            created_by: config.created_by,
            compression: config.compression,
            page_version: config.page_version,
            max_row_group_size: config.max_row_group_size,
            key_value_metadata,
            row_groups: Vec::new(),
            total_records: 0,
            state: WriterState::Created,
        })
    }

    /// Buffer one record, flushing a row group if the threshold is reached
    pub fn add_data(&mut self, record: &Record) -> Result<(), WriterError> {
        self.ensure_open()?;
        self.accumulator.add_record(record)?;
        self.state = WriterState::Writing;

        if self.max_row_group_size > 0 {
            let buffered = self.accumulator.buffered_size();
            if buffered >= self.max_row_group_size {
                debug!(
                    "Row group threshold reached ({} >= {} bytes), flushing",
                    buffered, self.max_row_group_size
                );
                self.flush(Phase::Add)?;
            }
        }
        Ok(())
    }

    /// Write all buffered records as a row group
    ///
    /// Fails with [`WriterError::EmptyFlush`] when nothing is buffered.
    pub fn flush_row_group(&mut self) -> Result<(), WriterError> {
        self.ensure_open()?;
        self.flush(Phase::Flush)
    }

    /// Flush remaining records and write the footer
    ///
    /// Subsequent calls return [`WriterError::Closed`]. The sink stays owned by
    /// the writer; use [`into_inner`](Self::into_inner) to get it back.
    pub fn close(&mut self) -> Result<WriterStats, WriterError> {
        self.ensure_open()?;
        if self.accumulator.num_records() > 0 {
            self.flush(Phase::Close)?;
        }

        let metadata = self.file_metadata();
        let start = self.sink.position();
        let footer_len = match self.write_footer(&metadata) {
            Ok(len) => len,
            Err(e) => return Err(self.io_failure(Phase::Close, start, e)),
        };
        let Ok(len) = i32::try_from(footer_len) else {
            self.state = WriterState::Failed;
            warn!("Footer of {} bytes is too large, output is unusable", footer_len);
            return Err(WriterError::FooterTooLarge(footer_len));
        };
        if let Err(e) = self.write_trailer(len) {
            return Err(self.io_failure(Phase::Close, start, e));
        }

        self.state = WriterState::Closed;
        let stats = WriterStats {
            records_written: self.total_records,
            row_groups_written: self.row_groups.len(),
            file_size_bytes: self.sink.position(),
            footer_size_bytes: footer_len,
        };
        info!("{}", stats);
        Ok(stats)
    }

    /// Buffered byte estimate of the current row group
    pub fn current_row_group_size(&self) -> u64 {
        self.accumulator.buffered_size()
    }

    /// Bytes written to the sink so far
    pub fn current_file_size(&self) -> u64 {
        self.sink.position()
    }

    /// Row groups flushed so far
    pub fn row_groups(&self) -> &[RowGroup] {
        &self.row_groups
    }

    /// Records in flushed row groups
    pub fn total_records(&self) -> u64 {
        self.total_records
    }

    /// Records buffered but not yet flushed
    pub fn buffered_records(&self) -> u64 {
        self.accumulator.num_records()
    }

    /// Current lifecycle state
    pub fn state(&self) -> WriterState {
        self.state
    }

    /// Flattened schema as written to the footer
    pub fn schema_elements(&self) -> Vec<SchemaElement> {
        self.accumulator.schema_elements()
    }

    /// Borrow the accumulator
    pub fn accumulator(&self) -> &A {
        &self.accumulator
    }

    /// Borrow the sink
    pub fn get_ref(&self) -> &W {
        self.sink.get_ref()
    }

    /// Unwrap, returning the sink
    pub fn into_inner(self) -> W {
        self.sink.into_inner()
    }

    /// Footer describing everything flushed so far
    pub(crate) fn file_metadata(&self) -> FileMetaData {
        FileMetaData {
            version: self.format_version,
            schema: self.accumulator.schema_elements(),
            num_rows: self.total_records as i64,
            row_groups: self.row_groups.clone(),
            key_value_metadata: Some(self.key_value_metadata.clone()),
            created_by: Some(self.created_by.clone()),
            column_orders: None,
            encryption_algorithm: None,
            footer_signing_key_metadata: None,
        }
    }

    fn ensure_open(&self) -> Result<(), WriterError> {
        match self.state {
            WriterState::Closed => Err(WriterError::Closed),
            WriterState::Failed => Err(WriterError::Failed),
            WriterState::Created | WriterState::Writing => Ok(()),
        }
    }

    fn flush(&mut self, phase: Phase) -> Result<(), WriterError> {
        let num_rows = self.accumulator.num_records();
        if num_rows == 0 {
            return Err(WriterError::EmptyFlush);
        }

        let start = self.sink.position();
        let columns = match self.write_columns() {
            Ok(columns) => columns,
            Err(e) => return Err(self.io_failure(phase, start, e)),
        };

        debug!(
            "Flushed row group {} ({} records, {} bytes)",
            self.row_groups.len(),
            num_rows,
            self.sink.position() - start
        );
        self.row_groups.push(RowGroup {
            columns,
            total_byte_size: 0,
            num_rows: num_rows as i64,
            sorting_columns: None,
            file_offset: None,
            total_compressed_size: None,
            ordinal: None,
        });
        self.total_records += num_rows;
        self.accumulator.reset();
        self.state = WriterState::Writing;
        Ok(())
    }

    fn write_columns(&mut self) -> io::Result<Vec<ColumnChunk>> {
        self.write_leading_magic()?;
        write_row_group(&mut self.sink, &self.accumulator, self.compression, self.page_version)
    }

    fn write_footer(&mut self, metadata: &FileMetaData) -> io::Result<u64> {
        let footer = metadata.to_compact_bytes()?;
        self.write_leading_magic()?;
        self.sink.write_all(&footer)?;
        Ok(footer.len() as u64)
    }

    fn write_trailer(&mut self, footer_len: i32) -> io::Result<()> {
        self.sink.write_i32::<LittleEndian>(footer_len)?;
        self.sink.write_all(&MAGIC)?;
        self.sink.flush()
    }

    fn write_leading_magic(&mut self) -> io::Result<()> {
        if self.sink.position() == 0 {
            self.sink.write_all(&MAGIC)?;
        }
        Ok(())
    }

    /// Classify a sink failure: once bytes have reached the sink the file can
    /// no longer be completed.
    fn io_failure(&mut self, phase: Phase, start: u64, source: io::Error) -> WriterError {
        if self.sink.position() != start {
            warn!(
                "I/O error during {} after {} bytes were written, writer is unusable: {}",
                phase,
                self.sink.position() - start,
                source
            );
            self.state = WriterState::Failed;
        }
        WriterError::Io { phase, source }
    }
}
