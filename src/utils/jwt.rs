use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use crate::models::User;

/// JWT Claims structure containing user information and token metadata
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Display name
    pub name: String,
    pub email: String,
    /// Random token id; two tokens issued in the same second still differ
    pub jti: String,
    /// Issued at (timestamp)
    pub iat: i64,
    /// Expiration time (timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user
    ///
    /// # Arguments
    /// * `user` - The authenticated user
    /// * `expiration_hours` - Token validity duration in hours
    pub fn new(user: &User, expiration_hours: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours);

        Self {
            sub: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    /// Parses `sub` back into a user id.
    pub fn user_id(&self) -> AppResult<i32> {
        self.sub.parse().map_err(|_| AppError::Unauthenticated {
            reason: format!("Token subject is not a user id: {}", self.sub),
        })
    }
}

/// Issues and verifies bearer tokens.
pub trait TokenIssuer: Send + Sync {
    /// Issues a fresh token for `user`.
    fn issue(&self, user: &User) -> AppResult<String>;

    /// Checks signature and expiry and returns the claims.
    ///
    /// # Errors
    /// `AppError::Unauthenticated` for any invalid token
    fn verify(&self, token: &str) -> AppResult<Claims>;
}

/// HS256 token issuer.
#[derive(Clone)]
pub struct JwtTokenIssuer {
    secret: String,
    expiration_hours: i64,
}

impl JwtTokenIssuer {
    pub fn new(secret: impl Into<String>, expiration_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours,
        }
    }

    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(config.secret.clone(), config.token_expiration)
    }
}

impl TokenIssuer for JwtTokenIssuer {
    /// Generates a JWT token for a user
    ///
    /// # Arguments
    /// * `user` - The user the token is issued to
    ///
    /// # Returns
    /// The encoded JWT token string
    fn issue(&self, user: &User) -> AppResult<String> {
        let claims = Claims::new(user, self.expiration_hours);

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal {
            source: anyhow::anyhow!("Failed to generate JWT token: {}", e),
        })
    }

    /// Validates and decodes a JWT token
    ///
    /// # Arguments
    /// * `token` - The JWT token string to validate
    ///
    /// # Returns
    /// The decoded claims if the token is valid
    fn verify(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| {
            let reason = match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    "Token has expired".to_string()
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    "Invalid token signature".to_string()
                }
                jsonwebtoken::errors::ErrorKind::InvalidToken => "Invalid token".to_string(),
                _ => format!("Token validation failed: {}", e),
            };
            AppError::Unauthenticated { reason }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test_secret_key_for_jwt_testing_0123";

    fn user() -> User {
        let now = Utc::now().naive_utc();
        User {
            id: 7,
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let issuer = JwtTokenIssuer::new(TEST_SECRET, 24);
        let token = issuer.issue(&user()).unwrap();
        assert_eq!(token.matches('.').count(), 2);

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.user_id().unwrap(), 7);
        assert_eq!(claims.name, "Jane");
        assert_eq!(claims.email, "jane@example.com");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_each_issuance_is_distinct() {
        let issuer = JwtTokenIssuer::new(TEST_SECRET, 1);
        let first = issuer.issue(&user()).unwrap();
        let second = issuer.issue(&user()).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = JwtTokenIssuer::new(TEST_SECRET, 1).issue(&user()).unwrap();
        let other = JwtTokenIssuer::new("another_secret_key_for_jwt_testing", 1);

        match other.verify(&token) {
            Err(AppError::Unauthenticated { reason }) => {
                assert_eq!(reason, "Invalid token signature")
            }
            result => panic!("Expected Unauthenticated, got {:?}", result),
        }
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // Past the default 60 second leeway
        let issuer = JwtTokenIssuer::new(TEST_SECRET, -1);
        let token = issuer.issue(&user()).unwrap();

        match issuer.verify(&token) {
            Err(AppError::Unauthenticated { reason }) => assert_eq!(reason, "Token has expired"),
            result => panic!("Expected Unauthenticated, got {:?}", result),
        }
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let issuer = JwtTokenIssuer::new(TEST_SECRET, 1);
        assert!(matches!(
            issuer.verify("not-a-token"),
            Err(AppError::Unauthenticated { .. })
        ));
    }

    #[test]
    fn test_non_numeric_subject() {
        let mut claims = Claims::new(&user(), 1);
        claims.sub = "abc".to_string();
        assert!(matches!(
            claims.user_id(),
            Err(AppError::Unauthenticated { .. })
        ));
    }
}
