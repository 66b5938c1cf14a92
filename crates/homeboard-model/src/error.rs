//! Model error types.

use thiserror::Error;

/// Errors raised when a value fails validation at the model boundary.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A record was given an empty id.
    #[error("record id must not be empty")]
    EmptyId,

    /// Two records in one collection share an id.
    #[error("duplicate record id: {id}")]
    DuplicateId { id: String },

    /// A named field does not exist on the resource.
    #[error("unknown field `{field}` for {resource}")]
    UnknownField {
        resource: &'static str,
        field: String,
    },

    /// A field value could not be converted into the resource shape.
    #[error("invalid value for {resource}")]
    InvalidFields {
        resource: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ModelError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyId => "Every record needs a non-empty id.".to_string(),
            Self::DuplicateId { id } => format!("A record with id '{id}' already exists."),
            Self::UnknownField { resource, field } => {
                format!("'{field}' is not a field of {resource}.")
            }
            Self::InvalidFields { resource, source } => {
                format!("The values given for {resource} are not valid: {source}")
            }
        }
    }
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
