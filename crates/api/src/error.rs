use std::collections::BTreeMap;

use axum::http::header::RETRY_AFTER;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use byeolpedia_core::error::CoreError;
use serde_json::json;

/// Validation messages keyed by the request field they concern.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `byeolpedia_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Field-level failures reported by a `validator` derive.
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Several messages for one or more fields, e.g. every failed password rule.
    #[error("Validation failed")]
    InvalidFields(FieldErrors),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A route parameter that does not name an existing resource.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The caller has used up its request budget for the current window.
    #[error("Too many requests")]
    TooManyRequests { retry_after_secs: u64 },

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

struct ErrorBody {
    status: StatusCode,
    code: &'static str,
    message: String,
    fields: Option<FieldErrors>,
}

impl ErrorBody {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            fields: None,
        }
    }

    fn with_fields(mut self, fields: FieldErrors) -> Self {
        self.fields = Some(fields);
        self
    }

    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An internal error occurred",
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let retry_after = match &self {
            AppError::TooManyRequests { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        };

        let body = match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => ErrorBody::new(
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::PageNotFound => {
                    ErrorBody::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Invalid page")
                }
                CoreError::Validation(msg) => {
                    ErrorBody::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg)
                }
                CoreError::InvalidField { field, message } => {
                    ErrorBody::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message.clone())
                        .with_fields(BTreeMap::from([(field, vec![message])]))
                }
                CoreError::Conflict(msg) => ErrorBody::new(StatusCode::BAD_REQUEST, "CONFLICT", msg),
                CoreError::Unauthorized(msg) => {
                    ErrorBody::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg)
                }
                CoreError::Forbidden(msg) => ErrorBody::new(StatusCode::FORBIDDEN, "FORBIDDEN", msg),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    ErrorBody::internal()
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(&err),

            // --- Request validation ---
            AppError::Validation(errors) => ErrorBody::new(
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Invalid input",
            )
            .with_fields(validation_fields(&errors)),
            AppError::InvalidFields(fields) => ErrorBody::new(
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Invalid input",
            )
            .with_fields(fields),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => ErrorBody::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::NotFound(msg) => ErrorBody::new(StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::TooManyRequests { retry_after_secs } => ErrorBody::new(
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                format!("Request was throttled. Expected available in {retry_after_secs} seconds."),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                ErrorBody::internal()
            }
        };

        let mut json = json!({
            "error": body.message,
            "code": body.code,
        });
        if let Some(fields) = body.fields {
            json["fields"] = json!(fields);
        }

        let mut response = (body.status, axum::Json(json)).into_response();
        if let Some(secs) = retry_after {
            response.headers_mut().insert(RETRY_AFTER, secs.into());
        }
        response
    }
}

/// Flatten `validator` output into `{field: [messages]}`.
///
/// Rules without a custom message fall back to their code (e.g. `email`).
fn validation_fields(errors: &validator::ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("Invalid value ({})", e.code),
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// Classify a sqlx error into an HTTP response body.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map
///   to 400 `CONFLICT`, attributed to the field the constraint covers.
/// - Foreign key and check violations map to 400 `VALIDATION_ERROR`.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorBody {
    match err {
        sqlx::Error::RowNotFound => {
            ErrorBody::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found")
        }
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().as_deref() {
                // PostgreSQL unique constraint violation
                Some("23505") if constraint.starts_with("uq_") => {
                    let (field, message) = conflict_message(constraint);
                    let body = ErrorBody::new(StatusCode::BAD_REQUEST, "CONFLICT", message.clone());
                    match field {
                        Some(field) => {
                            body.with_fields(BTreeMap::from([(field.to_string(), vec![message])]))
                        }
                        None => body,
                    }
                }
                // Foreign key violation: the referenced row vanished mid-request.
                Some("23503") => ErrorBody::new(
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    "Referenced object does not exist",
                ),
                Some("23514") => ErrorBody::new(
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    format!("Value violates check constraint: {constraint}"),
                ),
                _ => {
                    tracing::error!(error = %db_err, "Database error");
                    ErrorBody::internal()
                }
            }
        }
        other => {
            tracing::error!(error = %other, "Database error");
            ErrorBody::internal()
        }
    }
}

fn conflict_message(constraint: &str) -> (Option<&'static str>, String) {
    match constraint {
        "uq_users_email" => (
            Some("email"),
            "A user with that email already exists.".to_string(),
        ),
        "uq_users_username" => (
            Some("username"),
            "A user with that username already exists.".to_string(),
        ),
        "uq_user_favorite_groups_user_group" => (
            Some("group"),
            "This group is already in your favorites.".to_string(),
        ),
        other => (
            None,
            format!("Duplicate value violates unique constraint: {other}"),
        ),
    }
}
