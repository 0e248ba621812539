use std::collections::BTreeMap;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

use crate::config::error::ConfigError;
use crate::error::DatabaseErrorConverter;

/// Field name to the list of messages describing why it was rejected.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Message returned to clients for every failure outside the domain taxonomy.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred.";

/// Application-wide error type.
///
/// The first group of variants is the domain taxonomy: each one has its HTTP
/// status and client-facing message fixed at the point of construction and is
/// rendered unchanged by the API layer. The technical variants below carry an
/// `anyhow` source for logging and are all reported to clients as a generic
/// 500 ("unexpected") response.
#[derive(Error, Debug)]
pub enum AppError {
    /// Login failed: unknown email or wrong password
    #[error("Unauthorized")]
    Unauthorized,

    /// The user store rejected the registration
    #[error("User not created.")]
    UserNotCreated,

    /// A protected route was called without a valid bearer token
    #[error("Unauthorized access. Please authenticate.")]
    Unauthenticated { reason: String },

    #[error("Vacation plan not found.")]
    NotFound,

    #[error("No vacation plan data available.")]
    NoDataAvailable,

    #[error("Vacation plan not created.")]
    NotCreated,

    #[error("Vacation plan not updated.")]
    NotUpdated,

    #[error("Vacation plan not deleted.")]
    NotDeleted,

    /// Request input failed validation before reaching a service
    #[error("The given data was invalid.")]
    ValidationFailed { errors: FieldErrors },

    /// Request body could not be read as JSON at all
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// The database refused a write because of a constraint
    #[error("Constraint violation during {operation}")]
    ConstraintViolation {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    /// Database operation error with operation context
    #[error("Database operation failed: {operation}")]
    Database {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    /// Connection pool error
    #[error("Connection pool error")]
    ConnectionPool {
        #[source]
        source: anyhow::Error,
    },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Builds a validation failure for a single field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.into(), vec![message.into()]);
        AppError::ValidationFailed { errors }
    }

    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            AppError::UserNotCreated
            | AppError::NotCreated
            | AppError::NotUpdated
            | AppError::NotDeleted
            | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound | AppError::NoDataAvailable => StatusCode::NOT_FOUND,
            AppError::ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ConstraintViolation { .. }
            | AppError::Database { .. }
            | AppError::ConnectionPool { .. }
            | AppError::Configuration { .. }
            | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether this error falls outside the domain taxonomy.
    pub fn is_unexpected(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Message that is safe to show to the client.
    pub fn client_message(&self) -> String {
        if self.is_unexpected() {
            UNEXPECTED_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(error: diesel::result::Error) -> Self {
        DatabaseErrorConverter::convert_diesel_error(error, "database operation")
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let key = match &error {
            ConfigError::ValidationError { field, .. } => field.clone(),
            _ => "configuration".to_string(),
        };
        AppError::Configuration {
            key,
            source: anyhow::Error::from(error),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, field_errors) in errors.field_errors() {
            let field = field.to_string();
            let messages = field_errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| default_message(&field, e))
                })
                .collect();
            fields.insert(field, messages);
        }
        AppError::ValidationFailed { errors: fields }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => AppError::validation("body", e.body_text()),
            other => AppError::BadRequest {
                message: other.body_text(),
            },
        }
    }
}

/// Client-facing message for a rule that was declared without one.
fn default_message(field: &str, error: &ValidationError) -> String {
    let param = |name: &str| error.params.get(name).map(|v| v.to_string());

    match error.code.as_ref() {
        "required" => format!("The {} field is required.", field),
        "length" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => {
                format!("The {} field must be between {} and {} characters.", field, min, max)
            }
            (Some(min), None) => format!("The {} field must be at least {} characters.", field, min),
            (None, Some(max)) => {
                format!("The {} field must not be greater than {} characters.", field, max)
            }
            (None, None) => format!("The {} field is invalid.", field),
        },
        "email" => format!("The {} field must be a valid email address.", field),
        "date_format" => format!("The {} field must match the format Y-m-d.", field),
        "after_or_equal" => format!("The {} field must be a date after or equal to today.", field),
        _ => format!("The {} field is invalid.", field),
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
