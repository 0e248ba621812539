//! Authentication-related Data Transfer Objects

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::services::{IssuedToken, Registration};
use crate::utils::validate::not_blank;

/// Register request payload
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(required, custom(function = "not_blank"), length(max = 255))]
    #[schema(example = "Jane Doe", max_length = 255)]
    pub name: Option<String>,
    /// User's email address (unique)
    #[validate(required, email, length(max = 255))]
    #[schema(example = "jane@example.com", format = "email")]
    pub email: Option<String>,
    /// User's password (plain text, will be hashed)
    #[validate(required, length(min = 6, max = 128))]
    #[schema(example = "secret123", format = "password", min_length = 6, max_length = 128)]
    pub password: Option<String>,
}

impl RegisterRequest {
    /// Converts a validated request into service input.
    pub fn into_registration(self) -> Registration {
        Registration {
            name: self.name.unwrap_or_default().trim().to_string(),
            email: self.email.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
        }
    }
}

/// Login request payload
///
/// Fields carry no rules: missing or blank credentials fail verification
/// like any other mismatch and answer 401.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[schema(example = "jane@example.com", format = "email")]
    pub email: Option<String>,
    #[schema(example = "secret123", format = "password")]
    pub password: Option<String>,
}

impl LoginRequest {
    /// Email and password, absent fields read as empty strings.
    pub fn into_credentials(self) -> (String, String) {
        (
            self.email.unwrap_or_default().trim().to_string(),
            self.password.unwrap_or_default(),
        )
    }
}

/// Token issued on registration or login
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthTokenResponse {
    /// Bearer token for the `Authorization` header
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub token: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
}

impl From<IssuedToken> for AuthTokenResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            name: issued.name,
        }
    }
}
