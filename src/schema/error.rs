/// Errors raised while parsing or validating a schema definition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// The textual definition could not be parsed
    #[error("syntax error on line {line}: {message}")]
    Syntax {
        /// 1-based line of the offending token
        line: usize,
        /// What was expected or found
        message: String,
    },

    /// A field is structurally invalid
    #[error("invalid field `{path}`: {message}")]
    InvalidField {
        /// Dotted path of the field
        path: String,
        /// Reason the field was rejected
        message: String,
    },

    /// The schema declares no columns
    #[error("schema `{0}` has no fields")]
    Empty(String),
}
