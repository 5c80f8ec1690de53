//! Error types for gqldiff-core.

use thiserror::Error;

use crate::types::TypeKind;

/// Result type alias for gqldiff-core operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors that can occur while diffing or merging schemas.
///
/// Missing types, fields, values or arguments are never errors; they are
/// reported as [`Diff`](crate::Diff) records or resolved by merge precedence.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The call was made with a missing or malformed argument.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of what was wrong with the argument.
        message: String,
    },

    /// Two types sharing a name have kinds that cannot be merged.
    #[error("Cannot merge with different base type. {name}: this: {this_kind}, other: {other_kind}.")]
    TypeMismatch {
        /// Name of the type being merged.
        name: String,
        /// Kind of the type in this schema.
        this_kind: TypeKind,
        /// Kind of the type in the other schema.
        other_kind: TypeKind,
    },
}

impl SchemaError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        SchemaError::InvalidArgument {
            message: message.into(),
        }
    }
}

impl From<toml::de::Error> for SchemaError {
    fn from(err: toml::de::Error) -> Self {
        SchemaError::InvalidArgument {
            message: err.to_string(),
        }
    }
}
