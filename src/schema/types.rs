use std::fmt;

use crate::format::{FieldRepetitionType, ThriftConvertedType, Type};

/// Physical storage type of a leaf column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicalType {
    /// Single bit boolean
    Boolean,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// IEEE 754 single precision
    Float,
    /// IEEE 754 double precision
    Double,
    /// Variable length bytes
    ByteArray,
    /// Bytes of a fixed width
    FixedLenByteArray(i32),
}

impl PhysicalType {
    /// Footer type code
    pub fn to_thrift(&self) -> Type {
        match self {
            Self::Boolean => Type::BOOLEAN,
            Self::Int32 => Type::INT32,
            Self::Int64 => Type::INT64,
            Self::Float => Type::FLOAT,
            Self::Double => Type::DOUBLE,
            Self::ByteArray => Type::BYTE_ARRAY,
            Self::FixedLenByteArray(_) => Type::FIXED_LEN_BYTE_ARRAY,
        }
    }

    /// Width of a FIXED_LEN_BYTE_ARRAY, if this is one
    pub fn type_length(&self) -> Option<i32> {
        match self {
            Self::FixedLenByteArray(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for PhysicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => f.write_str("boolean"),
            Self::Int32 => f.write_str("int32"),
            Self::Int64 => f.write_str("int64"),
            Self::Float => f.write_str("float"),
            Self::Double => f.write_str("double"),
            Self::ByteArray => f.write_str("binary"),
            Self::FixedLenByteArray(n) => write!(f, "fixed_len_byte_array({})", n),
        }
    }
}

/// How often a field may occur in its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Repetition {
    /// Exactly once
    Required,
    /// Zero or one time
    Optional,
    /// Zero or more times
    Repeated,
}

impl Repetition {
    /// Footer repetition code
    pub fn to_thrift(&self) -> FieldRepetitionType {
        match self {
            Self::Required => FieldRepetitionType::REQUIRED,
            Self::Optional => FieldRepetitionType::OPTIONAL,
            Self::Repeated => FieldRepetitionType::REPEATED,
        }
    }

    pub(crate) fn from_keyword(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "required" => Some(Self::Required),
            "optional" => Some(Self::Optional),
            "repeated" => Some(Self::Repeated),
            _ => None,
        }
    }
}

impl fmt::Display for Repetition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Required => "required",
            Self::Optional => "optional",
            Self::Repeated => "repeated",
        })
    }
}

/// Logical annotation stored in the footer as a converted type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConvertedType {
    /// UTF-8 string (also spelled `STRING`)
    Utf8,
    /// Map group
    Map,
    /// Key/value group inside a map
    MapKeyValue,
    /// List group
    List,
    /// Enum stored as a string
    Enum,
    /// Days since the Unix epoch
    Date,
    /// Milliseconds since midnight
    TimeMillis,
    /// Milliseconds since the Unix epoch
    TimestampMillis,
    /// Microseconds since the Unix epoch
    TimestampMicros,
    /// JSON document stored as a string
    Json,
}

impl ConvertedType {
    /// Footer annotation code
    pub fn to_thrift(&self) -> ThriftConvertedType {
        match self {
            Self::Utf8 => ThriftConvertedType::UTF8,
            Self::Map => ThriftConvertedType::MAP,
            Self::MapKeyValue => ThriftConvertedType::MAP_KEY_VALUE,
            Self::List => ThriftConvertedType::LIST,
            Self::Enum => ThriftConvertedType::ENUM,
            Self::Date => ThriftConvertedType::DATE,
            Self::TimeMillis => ThriftConvertedType::TIME_MILLIS,
            Self::TimestampMillis => ThriftConvertedType::TIMESTAMP_MILLIS,
            Self::TimestampMicros => ThriftConvertedType::TIMESTAMP_MICROS,
            Self::Json => ThriftConvertedType::JSON,
        }
    }

    pub(crate) fn from_keyword(word: &str) -> Option<Self> {
        match word.to_ascii_uppercase().as_str() {
            "UTF8" | "STRING" => Some(Self::Utf8),
            "MAP" => Some(Self::Map),
            "MAP_KEY_VALUE" => Some(Self::MapKeyValue),
            "LIST" => Some(Self::List),
            "ENUM" => Some(Self::Enum),
            "DATE" => Some(Self::Date),
            "TIME_MILLIS" => Some(Self::TimeMillis),
            "TIMESTAMP_MILLIS" => Some(Self::TimestampMillis),
            "TIMESTAMP_MICROS" => Some(Self::TimestampMicros),
            "JSON" => Some(Self::Json),
            _ => None,
        }
    }

    /// Whether the annotation applies to a leaf of type `physical`
    pub(crate) fn accepts_primitive(&self, physical: PhysicalType) -> bool {
        match self {
            Self::Utf8 | Self::Enum | Self::Json => physical == PhysicalType::ByteArray,
            Self::Date | Self::TimeMillis => physical == PhysicalType::Int32,
            Self::TimestampMillis | Self::TimestampMicros => physical == PhysicalType::Int64,
            Self::Map | Self::MapKeyValue | Self::List => false,
        }
    }

    /// Whether the annotation applies to a group
    pub(crate) fn accepts_group(&self) -> bool {
        matches!(self, Self::Map | Self::MapKeyValue | Self::List)
    }
}

impl fmt::Display for ConvertedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Utf8 => "UTF8",
            Self::Map => "MAP",
            Self::MapKeyValue => "MAP_KEY_VALUE",
            Self::List => "LIST",
            Self::Enum => "ENUM",
            Self::Date => "DATE",
            Self::TimeMillis => "TIME_MILLIS",
            Self::TimestampMillis => "TIMESTAMP_MILLIS",
            Self::TimestampMicros => "TIMESTAMP_MICROS",
            Self::Json => "JSON",
        })
    }
}

/// Leaf or interior node payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// A leaf column
    Primitive(PhysicalType),
    /// A nested group of fields
    Group(Vec<Field>),
}

/// A named node of the schema tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name, unique among its siblings
    pub name: String,
    /// Repetition in the parent
    pub repetition: Repetition,
    /// Optional logical annotation
    pub converted_type: Option<ConvertedType>,
    /// Leaf type or children
    pub kind: FieldKind,
}

impl Field {
    /// A leaf column
    pub fn primitive(
        name: impl Into<String>,
        repetition: Repetition,
        physical_type: PhysicalType,
    ) -> Self {
        Self {
            name: name.into(),
            repetition,
            converted_type: None,
            kind: FieldKind::Primitive(physical_type),
        }
    }

    /// A required leaf column
    pub fn required(name: impl Into<String>, physical_type: PhysicalType) -> Self {
        Self::primitive(name, Repetition::Required, physical_type)
    }

    /// An optional leaf column
    pub fn optional(name: impl Into<String>, physical_type: PhysicalType) -> Self {
        Self::primitive(name, Repetition::Optional, physical_type)
    }

    /// A repeated leaf column
    pub fn repeated(name: impl Into<String>, physical_type: PhysicalType) -> Self {
        Self::primitive(name, Repetition::Repeated, physical_type)
    }

    /// A group of nested fields
    pub fn group(name: impl Into<String>, repetition: Repetition, children: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            repetition,
            converted_type: None,
            kind: FieldKind::Group(children),
        }
    }

    /// Attach a logical annotation
    pub fn with_converted_type(mut self, converted_type: ConvertedType) -> Self {
        self.converted_type = Some(converted_type);
        self
    }

    /// Children of a group; empty for leaves
    pub fn children(&self) -> &[Field] {
        match &self.kind {
            FieldKind::Group(children) => children,
            FieldKind::Primitive(_) => &[],
        }
    }

    /// Physical type of a leaf
    pub fn physical_type(&self) -> Option<PhysicalType> {
        match self.kind {
            FieldKind::Primitive(p) => Some(p),
            FieldKind::Group(_) => None,
        }
    }

    /// Number of leaf columns at or below this field
    pub fn leaf_count(&self) -> usize {
        match &self.kind {
            FieldKind::Primitive(_) => 1,
            FieldKind::Group(children) => children.iter().map(Field::leaf_count).sum(),
        }
    }
}

/// A leaf column as seen by the row-group serializer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Names from the top-level field down to the leaf
    pub path: Vec<String>,
    /// Leaf physical type
    pub physical_type: PhysicalType,
    /// Highest definition level a value of this column can have
    pub max_def_level: i16,
    /// Highest repetition level a value of this column can have
    pub max_rep_level: i16,
}

impl ColumnDescriptor {
    /// Path joined with dots
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }
}
