use crate::schema::PhysicalType;

/// A record was rejected by the accumulator
///
/// The record that caused the error is rolled back completely; nothing it
/// contained remains buffered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// A required field was missing or null
    #[error("required field `{0}` is missing")]
    MissingRequired(String),

    /// The record names a field that is not in the schema
    #[error("field `{0}` is not part of the schema")]
    UnknownField(String),

    /// A leaf value does not match the column type
    #[error("field `{path}`: expected {expected}, found {found}")]
    TypeMismatch {
        /// Dotted field path
        path: String,
        /// Column physical type
        expected: PhysicalType,
        /// Kind of the value supplied
        found: &'static str,
    },

    /// A fixed-width value had the wrong length
    #[error("field `{path}`: expected {expected} bytes, found {found}")]
    FixedLengthMismatch {
        /// Dotted field path
        path: String,
        /// Declared width
        expected: i32,
        /// Actual length
        found: usize,
    },

    /// A group field was given a non-group value
    #[error("field `{path}`: expected group, found {found}")]
    NotAGroup {
        /// Dotted field path
        path: String,
        /// Kind of the value supplied
        found: &'static str,
    },

    /// A repeated field was given a non-list value
    #[error("field `{path}`: expected list, found {found}")]
    NotAList {
        /// Dotted field path
        path: String,
        /// Kind of the value supplied
        found: &'static str,
    },

    /// A list element of a repeated field was null
    #[error("field `{0}`: repeated fields cannot contain null elements")]
    NullListElement(String),
}
