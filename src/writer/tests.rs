use std::io::{self, Write};

use parquet_format_safe::thrift::protocol::TCompactInputProtocol;

use super::*;
use crate::accumulator::{Accumulator, ColumnBuffer, EncodeError};
use crate::format::{FileMetaData, SchemaElement};
use crate::record::{Record, Value};
use crate::{record, schema::SchemaDefinition};

const SCHEMA: &str = "message test { required int64 id; required binary name (UTF8); }";

fn config() -> WriterConfig {
    WriterConfig::default().with_schema_text(SCHEMA).unwrap()
}

fn row(id: i64, name: &str) -> Record {
    record! { "id" => id, "name" => name }
}

fn footer_len(bytes: &[u8]) -> i32 {
    let n = bytes.len();
    i32::from_le_bytes([bytes[n - 8], bytes[n - 7], bytes[n - 6], bytes[n - 5]])
}

/// Rejects the first `failures` writes without accepting any bytes
struct FlakySink {
    data: Vec<u8>,
    failures: usize,
}

impl Write for FlakySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.failures > 0 {
            self.failures -= 1;
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "connection reset"));
        }
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Accepts `capacity` bytes, then fails every write
struct FullSink {
    data: Vec<u8>,
    capacity: usize,
}

impl Write for FullSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let room = self.capacity - self.data.len();
        if room == 0 {
            return Err(io::Error::new(io::ErrorKind::WriteZero, "disk full"));
        }
        let n = room.min(buf.len());
        self.data.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Counts records, reporting a fixed size per record and no columns
#[derive(Default)]
struct FixedSizeAccumulator {
    records: u64,
    bytes_per_record: u64,
}

impl Accumulator for FixedSizeAccumulator {
    fn add_record(&mut self, record: &Record) -> Result<(), EncodeError> {
        if let Some(key) = record.keys().next() {
            return Err(EncodeError::UnknownField(key.clone()));
        }
        self.records += 1;
        Ok(())
    }

    fn buffered_size(&self) -> u64 {
        self.records * self.bytes_per_record
    }

    fn num_records(&self) -> u64 {
        self.records
    }

    fn reset(&mut self) {
        self.records = 0;
    }

    fn schema_elements(&self) -> Vec<SchemaElement> {
        vec![SchemaElement {
            type_: None,
            type_length: None,
            repetition_type: None,
            name: "empty".to_string(),
            num_children: Some(0),
            converted_type: None,
            scale: None,
            precision: None,
            field_id: None,
            logical_type: None,
        }]
    }

    fn columns(&self) -> &[ColumnBuffer] {
        &[]
    }
}

#[test]
fn test_missing_schema_is_configuration_error() {
    let err = FileWriter::new(Vec::new(), WriterConfig::default()).err().unwrap();
    assert!(matches!(err, WriterError::Configuration(ConfigError::MissingSchema)));
}

#[test]
fn test_invalid_schema_text() {
    let err = WriterConfig::default().with_schema_text("message m { required int128 x; }");
    assert!(matches!(err, Err(ConfigError::InvalidSchema(_))));
}

#[test]
fn test_invalid_compression_level() {
    let config = config().with_compression(crate::compression::CompressionType::Zstd(40));
    let err = FileWriter::new(Vec::new(), config).err().unwrap();
    assert!(matches!(
        err,
        WriterError::Configuration(ConfigError::InvalidCompressionLevel { codec: "zstd", level: 40 })
    ));
}

#[test]
fn test_config_defaults() {
    let config = WriterConfig::default();
    assert_eq!(config.format_version, 1);
    assert_eq!(config.created_by, DEFAULT_CREATED_BY);
    assert!(config.created_by.starts_with("pqwrite version "));
    assert_eq!(config.max_row_group_size, 0);
    assert!(config.key_value_metadata.is_empty());
    assert!(config.schema.is_none());
}

#[test]
fn test_second_flush_is_empty() -> Result<(), WriterError> {
    let mut writer = FileWriter::new(Vec::new(), config())?;
    writer.add_data(&row(1, "a"))?;
    writer.flush_row_group()?;
    assert_eq!(writer.row_groups().len(), 1);
    let size = writer.current_file_size();

    assert!(matches!(writer.flush_row_group(), Err(WriterError::EmptyFlush)));
    assert_eq!(writer.row_groups().len(), 1);
    assert_eq!(writer.current_file_size(), size);
    assert_eq!(writer.state(), WriterState::Writing);
    Ok(())
}

#[test]
fn test_flush_on_fresh_writer_is_empty() {
    let mut writer = FileWriter::new(Vec::new(), config()).unwrap();
    assert!(matches!(writer.flush_row_group(), Err(WriterError::EmptyFlush)));
    assert_eq!(writer.current_file_size(), 0);
    assert_eq!(writer.state(), WriterState::Created);
}

#[test]
fn test_file_size_after_flush() -> Result<(), WriterError> {
    let mut writer = FileWriter::new(Vec::new(), config())?;
    for i in 0..5 {
        writer.add_data(&row(i, "abc"))?;
    }
    assert_eq!(writer.current_file_size(), 0);
    assert_eq!(writer.current_row_group_size(), 5 * (8 + 4 + 3));

    writer.flush_row_group()?;
    let chunk_bytes: i64 = writer.row_groups()[0]
        .columns
        .iter()
        .filter_map(|c| c.meta_data.as_ref())
        .map(|m| m.total_compressed_size)
        .sum();
    assert_eq!(writer.current_file_size(), 4 + chunk_bytes as u64);
    assert_eq!(writer.current_row_group_size(), 0);

    // buffering does not touch the sink
    writer.add_data(&row(9, "more"))?;
    assert_eq!(writer.current_file_size(), 4 + chunk_bytes as u64);
    assert_eq!(writer.get_ref().len() as u64, writer.current_file_size());
    Ok(())
}

#[test]
fn test_threshold_crossed_on_37th_record() -> Result<(), WriterError> {
    let mut writer = FileWriter::new(Vec::new(), config().with_max_row_group_size(1000))?;

    // 8 + 4 + 16 = 28 bytes, then 27 bytes per record: 28 + 36 * 27 = 1000
    writer.add_data(&row(1, "sixteen chars!!!"))?;
    for id in 2..=36 {
        writer.add_data(&row(id, "fifteen chars!!"))?;
    }
    assert_eq!(writer.current_row_group_size(), 973);
    assert!(writer.row_groups().is_empty());

    writer.add_data(&row(37, "fifteen chars!!"))?;
    assert_eq!(writer.row_groups().len(), 1);
    assert_eq!(writer.row_groups()[0].num_rows, 37);
    assert_eq!(writer.buffered_records(), 0);

    writer.add_data(&row(38, "fifteen chars!!"))?;
    assert_eq!(writer.buffered_records(), 1);

    let stats = writer.close()?;
    assert_eq!(stats.records_written, 38);
    assert_eq!(stats.row_groups_written, 2);
    assert_eq!(writer.row_groups()[1].num_rows, 1);
    Ok(())
}

#[test]
fn test_rejected_record_leaves_writer_unchanged() -> Result<(), WriterError> {
    let mut writer = FileWriter::new(Vec::new(), config())?;
    let err = writer.add_data(&record! { "id" => 1i64 }).unwrap_err();
    assert!(matches!(err, WriterError::Encoding(EncodeError::MissingRequired(_))));
    assert_eq!(writer.buffered_records(), 0);
    assert_eq!(writer.state(), WriterState::Created);

    writer.add_data(&row(1, "ok"))?;
    assert_eq!(writer.buffered_records(), 1);
    Ok(())
}

#[test]
fn test_key_value_metadata() -> Result<(), WriterError> {
    let config = config()
        .with_metadata("zeta", "x")
        .with_metadata("alpha", "");
    let writer = FileWriter::new(Vec::new(), config)?;

    let kv = writer.file_metadata().key_value_metadata.unwrap();
    assert_eq!(kv.len(), 2);
    assert_eq!(kv[0].key, "alpha");
    assert_eq!(kv[0].value, None);
    assert_eq!(kv[1].key, "zeta");
    assert_eq!(kv[1].value.as_deref(), Some("x"));
    Ok(())
}

#[test]
fn test_empty_key_value_list_is_written() -> Result<(), WriterError> {
    let mut writer = FileWriter::new(Vec::new(), config())?;
    assert_eq!(writer.file_metadata().key_value_metadata, Some(Vec::new()));
    writer.close()?;

    let bytes = writer.into_inner();
    let footer = &bytes[4..bytes.len() - 8];
    let mut slice = footer;
    let mut protocol = TCompactInputProtocol::new(&mut slice, usize::MAX);
    let decoded = FileMetaData::read_from_in_protocol(&mut protocol).unwrap();
    assert_eq!(decoded.key_value_metadata, Some(Vec::new()));
    assert_eq!(decoded.created_by.as_deref(), Some(DEFAULT_CREATED_BY));
    Ok(())
}

#[test]
fn test_close_framing() -> Result<(), WriterError> {
    let mut writer = FileWriter::new(Vec::new(), config())?;
    writer.add_data(&row(1, "a"))?;
    writer.add_data(&row(2, "b"))?;
    let stats = writer.close()?;
    assert_eq!(writer.state(), WriterState::Closed);

    let bytes = writer.into_inner();
    assert_eq!(&bytes[..4], b"PAR1");
    assert_eq!(&bytes[bytes.len() - 4..], b"PAR1");
    assert_eq!(footer_len(&bytes) as u64, stats.footer_size_bytes);
    assert_eq!(bytes.len() as u64, stats.file_size_bytes);
    assert_eq!(stats.records_written, 2);
    assert_eq!(stats.row_groups_written, 1);
    Ok(())
}

#[test]
fn test_close_without_records() -> Result<(), WriterError> {
    let mut writer = FileWriter::new(Vec::new(), config())?;
    let stats = writer.close()?;
    assert_eq!(stats.row_groups_written, 0);

    let bytes = writer.into_inner();
    assert_eq!(&bytes[..4], b"PAR1");
    assert_eq!(&bytes[bytes.len() - 4..], b"PAR1");
    assert_eq!(bytes.len(), 4 + footer_len(&bytes) as usize + 8);
    Ok(())
}

#[test]
fn test_operations_after_close() -> Result<(), WriterError> {
    let mut writer = FileWriter::new(Vec::new(), config())?;
    writer.add_data(&row(1, "a"))?;
    writer.close()?;
    let size = writer.current_file_size();

    assert!(matches!(writer.close(), Err(WriterError::Closed)));
    assert!(matches!(writer.add_data(&row(2, "b")), Err(WriterError::Closed)));
    assert!(matches!(writer.flush_row_group(), Err(WriterError::Closed)));
    assert_eq!(writer.current_file_size(), size);
    Ok(())
}

#[test]
fn test_flush_retry_after_failure_without_output() -> Result<(), WriterError> {
    let sink = FlakySink {
        data: Vec::new(),
        failures: 1,
    };
    let mut writer = FileWriter::new(sink, config())?;
    writer.add_data(&row(1, "a"))?;
    writer.add_data(&row(2, "b"))?;

    let err = writer.flush_row_group().unwrap_err();
    assert_eq!(err.phase(), Some(Phase::Flush));
    assert_eq!(writer.state(), WriterState::Writing);
    assert_eq!(writer.buffered_records(), 2);
    assert_eq!(writer.current_file_size(), 0);

    writer.flush_row_group()?;
    writer.close()?;
    let bytes = writer.into_inner().data;
    assert_eq!(&bytes[..4], b"PAR1");
    assert_eq!(&bytes[bytes.len() - 4..], b"PAR1");
    Ok(())
}

#[test]
fn test_partial_output_fails_writer() -> Result<(), WriterError> {
    let sink = FullSink {
        data: Vec::new(),
        capacity: 10,
    };
    let mut writer = FileWriter::new(sink, config())?;
    writer.add_data(&row(1, "a"))?;

    let err = writer.close().unwrap_err();
    assert_eq!(err.phase(), Some(Phase::Close));
    assert_eq!(writer.state(), WriterState::Failed);

    assert!(matches!(writer.add_data(&row(2, "b")), Err(WriterError::Failed)));
    assert!(matches!(writer.close(), Err(WriterError::Failed)));
    Ok(())
}

#[test]
fn test_auto_flush_failure_reports_add_phase() -> Result<(), WriterError> {
    let sink = FullSink {
        data: Vec::new(),
        capacity: 2,
    };
    let mut writer = FileWriter::new(sink, config().with_max_row_group_size(1))?;
    let err = writer.add_data(&row(1, "a")).unwrap_err();
    assert_eq!(err.phase(), Some(Phase::Add));
    assert_eq!(writer.state(), WriterState::Failed);
    Ok(())
}

#[test]
fn test_custom_accumulator() -> Result<(), WriterError> {
    let accumulator = FixedSizeAccumulator {
        records: 0,
        bytes_per_record: 10,
    };
    let config = WriterConfig::default().with_max_row_group_size(30);
    let mut writer = FileWriter::with_accumulator(Vec::new(), config, accumulator)?;

    for _ in 0..7 {
        writer.add_data(&Record::new())?;
    }
    assert!(writer
        .add_data(&record! { "x" => Value::Null })
        .is_err());

    let rows: Vec<i64> = writer.row_groups().iter().map(|rg| rg.num_rows).collect();
    assert_eq!(rows, vec![3, 3]);
    assert_eq!(writer.accumulator().num_records(), 1);
    assert_eq!(writer.schema_elements()[0].name, "empty");

    let stats = writer.close()?;
    assert_eq!(stats.records_written, 7);
    assert_eq!(stats.row_groups_written, 3);
    Ok(())
}

#[test]
fn test_stats_display() {
    let stats = WriterStats {
        records_written: 10,
        row_groups_written: 2,
        file_size_bytes: 512,
        footer_size_bytes: 100,
    };
    assert_eq!(
        stats.to_string(),
        "Wrote 10 records in 2 row groups (512 bytes, footer 100 bytes)"
    );
}

#[test]
fn test_presets() {
    assert!(WriterConfig::fast_write().compression.is_compressed());
    assert_eq!(
        WriterConfig::max_compression().page_version,
        crate::page::PageVersion::V2
    );
    assert!(WriterConfig::max_compression().validate().is_ok());
}

#[test]
fn test_schema_elements_of_schema_writer() -> Result<(), WriterError> {
    let schema = SchemaDefinition::parse(SCHEMA).unwrap();
    let writer = FileWriter::new(Vec::new(), WriterConfig::default().with_schema(schema.clone()))?;
    assert_eq!(writer.schema_elements(), schema.to_schema_elements());
    Ok(())
}
