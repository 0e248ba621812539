//! Error handler for converting AppError to HTTP responses.
//!
//! Domain errors are rendered with their fixed status and message; technical
//! errors are logged with their source chain and reported as a generic 500.

use std::error::Error as StdError;

use axum::{
    Json,
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::dto::{ErrorResponse, UnauthenticatedResponse};
use crate::error::{AppError, UNEXPECTED_ERROR_MESSAGE};

impl IntoResponse for AppError {
    /// Converts an AppError into an HTTP response.
    ///
    /// # Status Code Mapping
    /// - Unauthorized, Unauthenticated → 401
    /// - UserNotCreated, NotCreated, NotUpdated, NotDeleted, BadRequest → 400
    /// - NotFound, NoDataAvailable → 404
    /// - ValidationFailed → 422 with the field error map
    /// - ConstraintViolation, Database, ConnectionPool, Configuration, Internal → 500
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.is_unexpected() {
            tracing::error!(
                status = status.as_u16(),
                error = %self,
                cause = %source_chain(&self),
                "Request failed with an unexpected error"
            );
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        match self {
            AppError::Unauthenticated { .. } => {
                (status, Json(UnauthenticatedResponse::new(self.to_string()))).into_response()
            }
            AppError::ValidationFailed { ref errors } => {
                let body = ErrorResponse::new(self.client_message()).with_field_errors(errors);
                (status, Json(body)).into_response()
            }
            other => (status, Json(ErrorResponse::new(other.client_message()))).into_response(),
        }
    }
}

/// Joins the `source()` chain below `error` into one line.
fn source_chain(error: &dyn StdError) -> String {
    let mut causes = Vec::new();
    let mut current = error.source();
    while let Some(cause) = current {
        causes.push(cause.to_string());
        current = cause.source();
    }
    causes.join(": ")
}

/// Rewrites error responses produced outside the handlers into the JSON
/// envelope.
///
/// Covers framework responses such as unknown routes (404), wrong methods
/// (405) and request timeouts (408), which carry an empty or plain text body.
pub async fn global_error_handler(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));
    if is_json {
        return response;
    }

    let (mut parts, _body) = response.into_parts();
    let message = fallback_message(status);
    parts.headers.remove(header::CONTENT_TYPE);
    parts.headers.remove(header::CONTENT_LENGTH);

    let mut rewritten = (status, Json(ErrorResponse::new(message))).into_response();
    for (name, value) in parts.headers.iter() {
        rewritten.headers_mut().insert(name.clone(), value.clone());
    }
    rewritten
}

fn fallback_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::NOT_FOUND => "The requested resource was not found.",
        StatusCode::METHOD_NOT_ALLOWED => "HTTP method not allowed for this endpoint.",
        StatusCode::REQUEST_TIMEOUT => "The request timed out.",
        StatusCode::PAYLOAD_TOO_LARGE => "Request payload too large.",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "Unsupported media type.",
        s if s.is_server_error() => UNEXPECTED_ERROR_MESSAGE,
        _ => "The request could not be processed.",
    }
}
