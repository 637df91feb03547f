//! Footer and page header metadata.
//!
//! The structures are the generated Parquet Thrift types from
//! `parquet-format-safe`, so field ids and enum values always match
//! `parquet.thrift`. This module adds the compact-protocol serialization the
//! writer needs on top of them.

use std::io;

use parquet_format_safe::thrift::protocol::TCompactOutputProtocol;

pub use parquet_format_safe::{
    ColumnChunk, ColumnMetaData, CompressionCodec, DataPageHeader, DataPageHeaderV2, Encoding,
    FieldRepetitionType, FileMetaData, KeyValue, PageHeader, PageType, RowGroup, SchemaElement,
    Statistics, Type,
};

/// Thrift annotation codes, distinct from [`crate::schema::ConvertedType`]
pub use parquet_format_safe::ConvertedType as ThriftConvertedType;

/// A Thrift structure that can be serialized with the compact protocol
pub trait CompactEncode {
    /// Serialize `self`, returning the encoded bytes
    fn to_compact_bytes(&self) -> io::Result<Vec<u8>>;
}

macro_rules! compact_encode {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl CompactEncode for $ty {
                fn to_compact_bytes(&self) -> io::Result<Vec<u8>> {
                    let mut bytes = Vec::new();
                    {
                        let mut protocol = TCompactOutputProtocol::new(&mut bytes);
                        self.write_to_out_protocol(&mut protocol).map_err(|e| {
                            io::Error::new(io::ErrorKind::InvalidData, e.to_string())
                        })?;
                    }
                    Ok(bytes)
                }
            }
        )+
    };
}

compact_encode!(FileMetaData, PageHeader, SchemaElement, KeyValue);

#[cfg(test)]
mod tests {
    use super::*;
    use parquet_format_safe::thrift::protocol::TCompactInputProtocol;

    #[test]
    fn test_key_value_absent_value() {
        let absent = KeyValue {
            key: "k".into(),
            value: None,
        };
        let bytes = absent.to_compact_bytes().unwrap();
        assert_eq!(bytes, vec![0x18, 0x01, b'k', 0x00]);

        let empty = KeyValue {
            key: "k".into(),
            value: Some(String::new()),
        };
        let bytes = empty.to_compact_bytes().unwrap();
        assert_eq!(bytes, vec![0x18, 0x01, b'k', 0x18, 0x00, 0x00]);
    }

    #[test]
    fn test_page_header_reads_back() {
        let header = PageHeader {
            type_: PageType::DATA_PAGE_V2,
            uncompressed_page_size: 10,
            compressed_page_size: 8,
            crc: None,
            data_page_header: None,
            index_page_header: None,
            dictionary_page_header: None,
            data_page_header_v2: Some(DataPageHeaderV2 {
                num_values: 3,
                num_nulls: 1,
                num_rows: 3,
                encoding: Encoding::PLAIN,
                definition_levels_byte_length: 2,
                repetition_levels_byte_length: 0,
                is_compressed: Some(false),
                statistics: None,
            }),
        };
        let bytes = header.to_compact_bytes().unwrap();

        let mut slice = bytes.as_slice();
        let mut protocol = TCompactInputProtocol::new(&mut slice, usize::MAX);
        let decoded = PageHeader::read_from_in_protocol(&mut protocol).unwrap();
        assert_eq!(decoded, header);
        assert!(slice.is_empty());
    }

    #[test]
    fn test_footer_reads_back() {
        let metadata = FileMetaData {
            version: 1,
            schema: vec![SchemaElement {
                type_: None,
                type_length: None,
                repetition_type: None,
                name: "m".into(),
                num_children: Some(0),
                converted_type: None,
                scale: None,
                precision: None,
                field_id: None,
                logical_type: None,
            }],
            num_rows: 0,
            row_groups: Vec::new(),
            key_value_metadata: Some(Vec::new()),
            created_by: Some("pqwrite".into()),
            column_orders: None,
            encryption_algorithm: None,
            footer_signing_key_metadata: None,
        };
        let bytes = metadata.to_compact_bytes().unwrap();

        let mut slice = bytes.as_slice();
        let mut protocol = TCompactInputProtocol::new(&mut slice, usize::MAX);
        let decoded = FileMetaData::read_from_in_protocol(&mut protocol).unwrap();
        assert_eq!(decoded, metadata);
    }
}
