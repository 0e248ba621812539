//! Response envelopes shared by every endpoint.

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::FieldErrors;

/// Successful response: `{success: true, data, message}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    #[schema(example = true)]
    pub success: bool,
    pub data: T,
    pub message: String,
    /// Pagination metadata, present on list responses only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PaginationMeta>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: PaginationMeta) -> Self {
        self.meta = Some(meta);
        self
    }
}

/// Pagination metadata.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct PaginationMeta {
    /// Current page number (1-based)
    #[schema(example = 1)]
    pub page: u32,

    #[schema(example = 15)]
    pub per_page: u32,

    /// Total number of plans across all pages
    #[schema(example = 42)]
    pub total: u64,

    #[schema(example = 3)]
    pub last_page: u32,

    pub has_next: bool,
    pub has_prev: bool,
}

/// Failure response: `{success: false, message, errors}`.
///
/// `errors` is an empty array unless the request failed validation, in which
/// case it maps each field to its messages.
#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "success": false,
    "message": "The given data was invalid.",
    "errors": {"title": ["The title field is required."]}
}))]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[schema(value_type = Object)]
    pub errors: Value,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: Value::Array(Vec::new()),
        }
    }

    /// Attaches a field error map.
    pub fn with_field_errors(mut self, errors: &FieldErrors) -> Self {
        self.errors = serde_json::to_value(errors).unwrap_or_else(|_| Value::Array(Vec::new()));
        self
    }
}

/// Body returned when a protected route is called without a valid token.
#[derive(Debug, Serialize, ToSchema)]
pub struct UnauthenticatedResponse {
    #[schema(example = "Unauthorized access. Please authenticate.")]
    pub message: String,
    #[schema(example = true)]
    pub error: bool,
}

impl UnauthenticatedResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: true,
        }
    }
}
