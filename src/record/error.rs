/// Errors converting external input (JSON, text) into record values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    /// Input was not shaped like the schema expects
    #[error("field `{path}`: expected {expected}, found {found}")]
    Mismatch {
        /// Dotted field path
        path: String,
        /// Expected input shape
        expected: String,
        /// Input actually seen
        found: String,
    },

    /// A number or flag could not be parsed
    #[error("field `{path}`: cannot parse `{input}` as {target}")]
    Parse {
        /// Dotted field path
        path: String,
        /// Raw input
        input: String,
        /// Target type
        target: String,
    },

    /// Value does not fit the column type
    #[error("field `{path}`: {value} is out of range for {target}")]
    OutOfRange {
        /// Dotted field path
        path: String,
        /// Offending value
        value: String,
        /// Target type
        target: String,
    },

    /// Input names a field the schema does not have
    #[error("unknown field `{0}`")]
    UnknownField(String),

    /// Text conversion does not handle nested fields
    #[error("field `{0}` is nested and cannot be read from a text cell")]
    Nested(String),
}
