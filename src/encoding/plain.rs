use crate::accumulator::{ColumnBuffer, ColumnValues};
use crate::schema::PhysicalType;

/// Append the PLAIN encoding of the column's non-null values to `out`
///
/// Booleans are bit-packed LSB first, numbers are little-endian, BYTE_ARRAY
/// values carry a 4-byte length prefix and FIXED_LEN_BYTE_ARRAY values are
/// written raw.
pub fn encode_plain(column: &ColumnBuffer, out: &mut Vec<u8>) {
    out.reserve(column.data_size() as usize);
    match column.values() {
        ColumnValues::Boolean(values) => {
            for chunk in values.chunks(8) {
                let byte = chunk
                    .iter()
                    .enumerate()
                    .fold(0u8, |acc, (i, &b)| acc | (u8::from(b) << i));
                out.push(byte);
            }
        }
        ColumnValues::Int32(values) => {
            for &v in values {
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
        ColumnValues::Int64(values) => {
            for &v in values {
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
        ColumnValues::Float(values) => {
            for &v in values {
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
        ColumnValues::Double(values) => {
            for &v in values {
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
        ColumnValues::Bytes(values) => {
            let prefixed = column.descriptor().physical_type == PhysicalType::ByteArray;
            for v in values {
                if prefixed {
                    out.extend_from_slice(&(v.len() as u32).to_le_bytes());
                }
                out.extend_from_slice(v);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Value;
    use crate::schema::ColumnDescriptor;

    fn column(physical_type: PhysicalType, values: Vec<Value>) -> ColumnBuffer {
        let mut column = ColumnBuffer::new(ColumnDescriptor {
            path: vec!["c".to_string()],
            physical_type,
            max_def_level: 1,
            max_rep_level: 0,
        });
        for v in values {
            if v.is_null() {
                column.push_null(0, 0);
            } else {
                column.push_value(&v, 1, 0).unwrap();
            }
        }
        column
    }

    fn encoded(column: &ColumnBuffer) -> Vec<u8> {
        let mut out = Vec::new();
        encode_plain(column, &mut out);
        out
    }

    #[test]
    fn test_booleans_are_bit_packed() {
        let values = [true, false, true, true, false, false, false, false, true]
            .into_iter()
            .map(Value::from)
            .collect();
        let col = column(PhysicalType::Boolean, values);
        assert_eq!(encoded(&col), vec![0b0000_1101, 0b0000_0001]);
        assert_eq!(col.data_size(), 2);
    }

    #[test]
    fn test_numbers_little_endian() {
        let col = column(PhysicalType::Int32, vec![Value::Int32(1), Value::Null, Value::Int32(-2)]);
        assert_eq!(encoded(&col), vec![1, 0, 0, 0, 0xfe, 0xff, 0xff, 0xff]);

        let col = column(PhysicalType::Double, vec![Value::Double(1.0)]);
        assert_eq!(encoded(&col), 1.0f64.to_le_bytes().to_vec());

        let col = column(PhysicalType::Int64, vec![Value::Int64(-1), Value::Int64(258)]);
        assert_eq!(
            encoded(&col),
            vec![0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 2, 1, 0, 0, 0, 0, 0, 0]
        );

        let col = column(PhysicalType::Float, vec![Value::Float(-0.5)]);
        assert_eq!(encoded(&col), vec![0, 0, 0, 0xbf]);
        assert_eq!(encoded(&col).len() as u64, col.data_size());
    }

    #[test]
    fn test_byte_arrays() {
        let col = column(PhysicalType::ByteArray, vec![Value::from("ab"), Value::from("")]);
        assert_eq!(encoded(&col), vec![2, 0, 0, 0, b'a', b'b', 0, 0, 0, 0]);
        assert_eq!(encoded(&col).len() as u64, col.data_size());

        let col = column(
            PhysicalType::FixedLenByteArray(2),
            vec![Value::from("ab"), Value::from("cd")],
        );
        assert_eq!(encoded(&col), b"abcd".to_vec());
        assert_eq!(col.data_size(), 4);
    }
}
