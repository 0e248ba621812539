use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;

use crate::error::{AppError, AppResult};

/// Hashes and checks user passwords.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Produces a salted hash of `password`.
    async fn hash(&self, password: &str) -> AppResult<String>;

    /// Checks `password` against a stored hash.
    ///
    /// A missing hash still costs one verification so callers cannot be timed
    /// into revealing whether an account exists.
    async fn verify(&self, password: &str, password_hash: Option<&str>) -> AppResult<bool>;
}

/// Argon2id implementation; hashing runs on the blocking thread pool.
#[derive(Clone)]
pub struct Argon2CredentialVerifier {
    dummy_hash: String,
}

impl Argon2CredentialVerifier {
    /// Creates the verifier and precomputes the hash used for unknown accounts.
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            dummy_hash: hash_password("vacation-planner-dummy-password")?,
        })
    }
}

#[async_trait]
impl CredentialVerifier for Argon2CredentialVerifier {
    async fn hash(&self, password: &str) -> AppResult<String> {
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::Internal {
                source: anyhow::Error::from(e),
            })?
    }

    async fn verify(&self, password: &str, password_hash: Option<&str>) -> AppResult<bool> {
        let password = password.to_string();
        let (candidate, known) = match password_hash {
            Some(hash) => (hash.to_string(), true),
            None => (self.dummy_hash.clone(), false),
        };

        let outcome = tokio::task::spawn_blocking(move || verify_password(&password, &candidate))
            .await
            .map_err(|e| AppError::Internal {
                source: anyhow::Error::from(e),
            })?;

        // A stored hash that cannot be parsed never matches.
        let matched = match outcome {
            Ok(matched) => matched,
            Err(e) => {
                tracing::warn!(error = %e, "Rejecting credentials with an unreadable password hash");
                false
            }
        };

        Ok(known && matched)
    }
}

/// Hash a password using Argon2id
///
/// # Arguments
/// * `password` - The plain text password to hash
///
/// # Returns
/// * `AppResult<String>` - The PHC-formatted hash string or an error
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal {
            source: anyhow::anyhow!("Failed to hash password: {}", e),
        })
}

/// Verify a password against a hash
///
/// # Arguments
/// * `password` - The plain text password to verify
/// * `password_hash` - The hashed password to verify against
///
/// # Returns
/// * `AppResult<bool>` - True if password matches, false otherwise
pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash).map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Stored password hash is malformed: {}", e),
    })?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
