use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Invalid page")]
    PageNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid value for '{field}': {message}")]
    InvalidField { field: String, message: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a validation failure attributed to a single input field.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }
}
