//! # Record values
//!
//! Input to the writer is row oriented: a [`Record`] maps top-level field
//! names to [`Value`]s. Nested groups are themselves records and repeated
//! fields are lists. Fields missing from a record are treated as null.
//!
//! Records can also be built from JSON objects ([`record_from_json`]) or from
//! text cells ([`parse_text_value`]), both guided by the schema so that
//! numbers land in the right physical type.

mod error;
mod json;
mod text;

pub use error::ConvertError;
pub use json::record_from_json;
pub use text::parse_text_value;

use std::collections::HashMap;

/// One row: top-level field name to value
pub type Record = HashMap<String, Value>;

/// A single field value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value
    Null,
    /// BOOLEAN
    Boolean(bool),
    /// INT32
    Int32(i32),
    /// INT64
    Int64(i64),
    /// FLOAT
    Float(f32),
    /// DOUBLE
    Double(f64),
    /// BYTE_ARRAY or FIXED_LEN_BYTE_ARRAY
    Bytes(Vec<u8>),
    /// A nested group
    Group(Record),
    /// Values of a repeated field
    List(Vec<Value>),
}

impl Value {
    /// Short name of the variant, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Int32(_) => "int32",
            Self::Int64(_) => "int64",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::Bytes(_) => "bytes",
            Self::Group(_) => "group",
            Self::List(_) => "list",
        }
    }

    /// Whether this is [`Value::Null`]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Bytes(v.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Bytes(v.into_bytes())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Self::Group(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Self::Null)
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::List(iter.into_iter().map(Into::into).collect())
    }
}

/// Build a [`Record`] from `name => value` pairs
///
/// ```
/// use pqwrite::record;
/// use pqwrite::record::Value;
///
/// let r = record! { "id" => 1i64, "name" => "a" };
/// assert_eq!(r["id"], Value::Int64(1));
/// ```
#[macro_export]
macro_rules! record {
    () => { $crate::record::Record::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut r = $crate::record::Record::new();
        $( r.insert(::std::string::String::from($key), $crate::record::Value::from($value)); )+
        r
    }};
}
