//! Error types for query building and parsing

use thiserror::Error;

/// Query engine error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Malformed builder arguments (empty combinator lists, bad annotation names)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A `$`-prefixed identifier that is not a known system field
    #[error("Unknown system field: {0}")]
    UnknownSystemField(String),

    /// Operator, literal and field type do not fit together
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// Grammar violation in query text
    #[error("Syntax error at position {position}: {message}")]
    Syntax {
        /// Byte offset into the source text
        position: usize,
        /// What the parser expected or found
        message: String,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// AST could not be encoded for an external consumer
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

impl QueryError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a type mismatch error
    pub fn type_mismatch(msg: impl Into<String>) -> Self {
        Self::TypeMismatch(msg.into())
    }

    /// Create a syntax error at a byte offset
    pub fn syntax(position: usize, msg: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: msg.into(),
        }
    }

    /// Check if this error came from the grammar
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }

    /// Source position, for syntax errors
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Syntax { position, .. } => Some(*position),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for QueryError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
