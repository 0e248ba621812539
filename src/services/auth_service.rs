//! Registration, login and bearer-token authentication.

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::NewUser;
use crate::repositories::UserRepository;
use crate::utils::{CredentialVerifier, TokenIssuer};

/// Token handed back after registration or login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub name: String,
}

/// Caller resolved from a valid bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// Fields accepted at registration, already validated.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    credentials: Arc<dyn CredentialVerifier>,
    tokens: Arc<dyn TokenIssuer>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        credentials: Arc<dyn CredentialVerifier>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            users,
            credentials,
            tokens,
        }
    }

    /// Creates an account and signs the new user in.
    ///
    /// # Arguments
    /// * `registration` - Name, email and plaintext password
    ///
    /// # Returns
    /// A fresh token, or `UserNotCreated` when the user could not be stored
    pub async fn register(&self, registration: Registration) -> AppResult<IssuedToken> {
        let password_hash = self.credentials.hash(&registration.password).await?;

        let new_user = NewUser {
            name: registration.name,
            email: registration.email,
            password_hash,
        };

        let user = match self.users.create(new_user).await {
            Ok(user) => user,
            Err(AppError::ConstraintViolation { operation, source }) => {
                tracing::warn!(operation = %operation, error = %source, "User registration rejected by store");
                return Err(AppError::UserNotCreated);
            }
            Err(e) => return Err(e),
        };

        tracing::info!(user_id = user.id, "User registered");
        Ok(IssuedToken {
            token: self.tokens.issue(&user)?,
            name: user.name,
        })
    }

    /// Checks credentials and issues a token.
    ///
    /// Unknown email and wrong password both yield `Unauthorized`.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<IssuedToken> {
        let user = self.users.find_by_email(email).await?;
        let hash = user.as_ref().map(|u| u.password_hash.as_str());

        if !self.credentials.verify(password, hash).await? {
            return Err(AppError::Unauthorized);
        }
        let user = user.ok_or(AppError::Unauthorized)?;

        tracing::info!(user_id = user.id, "User logged in");
        Ok(IssuedToken {
            token: self.tokens.issue(&user)?,
            name: user.name,
        })
    }

    /// Resolves the user behind a bearer token.
    ///
    /// # Errors
    /// `Unauthenticated` if the token is invalid or its user no longer exists
    pub async fn authenticate(&self, token: &str) -> AppResult<AuthUser> {
        let claims = self.tokens.verify(token)?;
        let user = self
            .users
            .find_by_id(claims.user_id()?)
            .await?
            .ok_or_else(|| AppError::Unauthenticated {
                reason: format!("Token subject {} no longer exists", claims.sub),
            })?;

        Ok(AuthUser {
            id: user.id,
            name: user.name,
            email: user.email,
        })
    }
}
