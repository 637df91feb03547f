//! Row-group serializer.
//!
//! Writes one column chunk per leaf column of the accumulator, each a single
//! data page, and reports where every chunk landed in the file.

use std::io::{self, Write};

use crate::accumulator::Accumulator;
use crate::compression::CompressionType;
use crate::format::{ColumnChunk, ColumnMetaData, CompactEncode, Encoding, Statistics};
use crate::page::{encode_page, PageVersion};
use crate::sink::PositionWriter;

/// Write every buffered column of `accumulator` to `sink`
///
/// Returns the column chunk descriptors in schema order. Offsets are absolute
/// positions in the sink; sizes include the page header.
pub fn write_row_group<W, A>(
    sink: &mut PositionWriter<W>,
    accumulator: &A,
    compression: CompressionType,
    page_version: PageVersion,
) -> io::Result<Vec<ColumnChunk>>
where
    W: Write,
    A: Accumulator + ?Sized,
{
    let mut chunks = Vec::with_capacity(accumulator.columns().len());
    for column in accumulator.columns() {
        let descriptor = column.descriptor();
        let page = encode_page(column, compression, page_version)?;

        let header = page.header.to_compact_bytes()?;

        let offset = sink.position() as i64;
        sink.write_all(&header)?;
        sink.write_all(&page.body)?;

        let mut encodings = vec![Encoding::PLAIN];
        if descriptor.max_def_level > 0 || descriptor.max_rep_level > 0 {
            encodings.push(Encoding::RLE);
        }

        let meta_data = ColumnMetaData {
            type_: descriptor.physical_type.to_thrift(),
            encodings,
            path_in_schema: descriptor.path.clone(),
            codec: compression.to_thrift(),
            num_values: column.num_levels() as i64,
            total_uncompressed_size: header.len() as i64 + i64::from(page.uncompressed_size()),
            total_compressed_size: (header.len() + page.body.len()) as i64,
            key_value_metadata: None,
            data_page_offset: offset,
            index_page_offset: None,
            dictionary_page_offset: None,
            statistics: Some(Statistics {
                max: None,
                min: None,
                null_count: Some(column.null_count() as i64),
                distinct_count: None,
                max_value: None,
                min_value: None,
            }),
            encoding_stats: None,
            bloom_filter_offset: None,
        };
        chunks.push(ColumnChunk {
            file_path: None,
            file_offset: offset,
            meta_data: Some(meta_data),
            offset_index_offset: None,
            offset_index_length: None,
            column_index_offset: None,
            column_index_length: None,
            crypto_metadata: None,
            encrypted_column_metadata: None,
        });
    }

    Ok(chunks)
}
