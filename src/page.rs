//! Data page assembly.
//!
//! Every column chunk is written as a single data page. The page layout
//! depends on the [`PageVersion`] chosen for the writer.

use std::io;

use serde::Deserialize;

use crate::accumulator::ColumnBuffer;
use crate::compression::CompressionType;
use crate::encoding::{encode_levels, encode_plain};
use crate::format::{DataPageHeader, DataPageHeaderV2, Encoding, PageHeader, PageType};

/// Data page layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageVersion {
    /// DATA_PAGE: length-prefixed levels and values, compressed together
    #[default]
    V1,
    /// DATA_PAGE_V2: raw levels followed by separately compressed values
    V2,
}

/// A page ready to be written: header plus body bytes
#[derive(Debug, Clone)]
pub struct EncodedPage {
    /// Page header, serialized in front of the body
    pub header: PageHeader,
    /// Body bytes as written
    pub body: Vec<u8>,
}

impl EncodedPage {
    /// Body size before compression
    pub fn uncompressed_size(&self) -> i32 {
        self.header.uncompressed_page_size
    }
}

fn page_size(len: usize) -> io::Result<i32> {
    i32::try_from(len).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("page of {} bytes exceeds the format limit", len),
        )
    })
}

/// Encode all buffered data of `column` as one data page
pub fn encode_page(
    column: &ColumnBuffer,
    compression: CompressionType,
    version: PageVersion,
) -> io::Result<EncodedPage> {
    let descriptor = column.descriptor();
    let num_values = page_size(column.num_levels())?;

    let mut rep = Vec::new();
    encode_levels(column.rep_levels(), descriptor.max_rep_level, &mut rep);
    let mut def = Vec::new();
    encode_levels(column.def_levels(), descriptor.max_def_level, &mut def);
    let mut values = Vec::new();
    encode_plain(column, &mut values);

    match version {
        PageVersion::V1 => {
            let mut raw = Vec::with_capacity(rep.len() + def.len() + values.len() + 8);
            for (levels, max_level) in [(&rep, descriptor.max_rep_level), (&def, descriptor.max_def_level)] {
                if max_level > 0 {
                    raw.extend_from_slice(&(levels.len() as u32).to_le_bytes());
                    raw.extend_from_slice(levels);
                }
            }
            raw.extend_from_slice(&values);

            let body = compression.compress(&raw)?;
            Ok(EncodedPage {
                header: PageHeader {
                    type_: PageType::DATA_PAGE,
                    uncompressed_page_size: page_size(raw.len())?,
                    compressed_page_size: page_size(body.len())?,
                    crc: None,
                    data_page_header: Some(DataPageHeader {
                        num_values,
                        encoding: Encoding::PLAIN,
                        definition_level_encoding: Encoding::RLE,
                        repetition_level_encoding: Encoding::RLE,
                        statistics: None,
                    }),
                    index_page_header: None,
                    dictionary_page_header: None,
                    data_page_header_v2: None,
                },
                body,
            })
        }
        PageVersion::V2 => {
            let compressed = compression.compress(&values)?;
            let uncompressed = rep.len() + def.len() + values.len();

            let mut body = Vec::with_capacity(rep.len() + def.len() + compressed.len());
            body.extend_from_slice(&rep);
            body.extend_from_slice(&def);
            body.extend_from_slice(&compressed);

            Ok(EncodedPage {
                header: PageHeader {
                    type_: PageType::DATA_PAGE_V2,
                    uncompressed_page_size: page_size(uncompressed)?,
                    compressed_page_size: page_size(body.len())?,
                    crc: None,
                    data_page_header: None,
                    index_page_header: None,
                    dictionary_page_header: None,
                    data_page_header_v2: Some(DataPageHeaderV2 {
                        num_values,
                        num_nulls: page_size(column.null_count())?,
                        num_rows: page_size(column.num_rows())?,
                        encoding: Encoding::PLAIN,
                        definition_levels_byte_length: page_size(def.len())?,
                        repetition_levels_byte_length: page_size(rep.len())?,
                        is_compressed: Some(compression.is_compressed()),
                        statistics: None,
                    }),
                },
                body,
            })
        }
    }
}
