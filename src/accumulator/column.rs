use crate::record::Value;
use crate::schema::{ColumnDescriptor, PhysicalType};

use super::error::EncodeError;

/// Non-null values of one leaf column, typed by physical type
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    /// BOOLEAN values
    Boolean(Vec<bool>),
    /// INT32 values
    Int32(Vec<i32>),
    /// INT64 values
    Int64(Vec<i64>),
    /// FLOAT values
    Float(Vec<f32>),
    /// DOUBLE values
    Double(Vec<f64>),
    /// BYTE_ARRAY or FIXED_LEN_BYTE_ARRAY values
    Bytes(Vec<Vec<u8>>),
}

impl ColumnValues {
    fn for_type(physical: PhysicalType) -> Self {
        match physical {
            PhysicalType::Boolean => Self::Boolean(Vec::new()),
            PhysicalType::Int32 => Self::Int32(Vec::new()),
            PhysicalType::Int64 => Self::Int64(Vec::new()),
            PhysicalType::Float => Self::Float(Vec::new()),
            PhysicalType::Double => Self::Double(Vec::new()),
            PhysicalType::ByteArray | PhysicalType::FixedLenByteArray(_) => Self::Bytes(Vec::new()),
        }
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        match self {
            Self::Boolean(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::Int64(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Double(v) => v.len(),
            Self::Bytes(v) => v.len(),
        }
    }

    /// Whether no values are stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn truncate(&mut self, len: usize) {
        match self {
            Self::Boolean(v) => v.truncate(len),
            Self::Int32(v) => v.truncate(len),
            Self::Int64(v) => v.truncate(len),
            Self::Float(v) => v.truncate(len),
            Self::Double(v) => v.truncate(len),
            Self::Bytes(v) => v.truncate(len),
        }
    }
}

/// Buffer state to return to when a record is rejected halfway
#[derive(Debug, Clone, Copy)]
pub(crate) struct Checkpoint {
    levels: usize,
    values: usize,
    null_count: usize,
    byte_total: u64,
}

/// Buffered data of one leaf column for the current row group
///
/// Every entry has a definition and a repetition level; only entries whose
/// definition level equals the column maximum carry a value.
#[derive(Debug, Clone)]
pub struct ColumnBuffer {
    descriptor: ColumnDescriptor,
    values: ColumnValues,
    def_levels: Vec<i16>,
    rep_levels: Vec<i16>,
    null_count: usize,
    byte_total: u64,
}

impl ColumnBuffer {
    /// Empty buffer for `descriptor`
    pub fn new(descriptor: ColumnDescriptor) -> Self {
        Self {
            values: ColumnValues::for_type(descriptor.physical_type),
            descriptor,
            def_levels: Vec::new(),
            rep_levels: Vec::new(),
            null_count: 0,
            byte_total: 0,
        }
    }

    /// Column descriptor
    pub fn descriptor(&self) -> &ColumnDescriptor {
        &self.descriptor
    }

    /// Non-null values
    pub fn values(&self) -> &ColumnValues {
        &self.values
    }

    /// Definition level per entry
    pub fn def_levels(&self) -> &[i16] {
        &self.def_levels
    }

    /// Repetition level per entry
    pub fn rep_levels(&self) -> &[i16] {
        &self.rep_levels
    }

    /// Number of entries, nulls included
    pub fn num_levels(&self) -> usize {
        self.def_levels.len()
    }

    /// Number of null entries
    pub fn null_count(&self) -> usize {
        self.null_count
    }

    /// Number of records with an entry in this column
    pub fn num_rows(&self) -> usize {
        self.rep_levels.iter().filter(|&&r| r == 0).count()
    }

    /// Estimated PLAIN-encoded size of the buffered values
    pub fn data_size(&self) -> u64 {
        let n = self.values.len() as u64;
        match self.descriptor.physical_type {
            PhysicalType::Boolean => (n + 7) / 8,
            PhysicalType::Int32 | PhysicalType::Float => n * 4,
            PhysicalType::Int64 | PhysicalType::Double => n * 8,
            PhysicalType::ByteArray => n * 4 + self.byte_total,
            PhysicalType::FixedLenByteArray(_) => self.byte_total,
        }
    }

    /// Append a present value at the given levels
    pub fn push_value(&mut self, value: &Value, def: i16, rep: i16) -> Result<(), EncodeError> {
        let mismatch = || EncodeError::TypeMismatch {
            path: self.descriptor.dotted_path(),
            expected: self.descriptor.physical_type,
            found: value.kind(),
        };

        match (&mut self.values, value) {
            (ColumnValues::Boolean(v), Value::Boolean(b)) => v.push(*b),
            (ColumnValues::Int32(v), Value::Int32(n)) => v.push(*n),
            (ColumnValues::Int64(v), Value::Int64(n)) => v.push(*n),
            (ColumnValues::Int64(v), Value::Int32(n)) => v.push(i64::from(*n)),
            (ColumnValues::Float(v), Value::Float(f)) => v.push(*f),
            (ColumnValues::Double(v), Value::Double(f)) => v.push(*f),
            (ColumnValues::Double(v), Value::Float(f)) => v.push(f64::from(*f)),
            (ColumnValues::Bytes(v), Value::Bytes(bytes)) => {
                if let PhysicalType::FixedLenByteArray(width) = self.descriptor.physical_type {
                    if bytes.len() != width as usize {
                        return Err(EncodeError::FixedLengthMismatch {
                            path: self.descriptor.dotted_path(),
                            expected: width,
                            found: bytes.len(),
                        });
                    }
                }
                self.byte_total += bytes.len() as u64;
                v.push(bytes.clone());
            }
            _ => return Err(mismatch()),
        }

        self.def_levels.push(def);
        self.rep_levels.push(rep);
        Ok(())
    }

    /// Append a null (or empty list) entry at the given levels
    pub fn push_null(&mut self, def: i16, rep: i16) {
        self.def_levels.push(def);
        self.rep_levels.push(rep);
        self.null_count += 1;
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            levels: self.def_levels.len(),
            values: self.values.len(),
            null_count: self.null_count,
            byte_total: self.byte_total,
        }
    }

    pub(crate) fn rollback(&mut self, checkpoint: Checkpoint) {
        self.def_levels.truncate(checkpoint.levels);
        self.rep_levels.truncate(checkpoint.levels);
        self.values.truncate(checkpoint.values);
        self.null_count = checkpoint.null_count;
        self.byte_total = checkpoint.byte_total;
    }

    /// Drop all buffered entries
    pub fn clear(&mut self) {
        self.values.truncate(0);
        self.def_levels.clear();
        self.rep_levels.clear();
        self.null_count = 0;
        self.byte_total = 0;
    }
}
