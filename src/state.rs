//! Application state for Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use crate::config::JwtConfig;
use crate::db::AsyncDbPool;
use crate::error::AppResult;
use crate::repositories::Repositories;
use crate::services::Services;

/// Application state containing all shared services and resources.
///
/// Cloning is cheap since both Services and AsyncDbPool use Arc internally.
#[derive(Clone)]
pub struct AppState {
    /// All business logic services
    pub services: Services,
    /// Direct access to the database connection pool, used by health checks
    pub db_pool: AsyncDbPool,
}

impl AppState {
    /// Creates a new AppState from a database connection pool and JWT config.
    ///
    /// Initializes all repositories and services from the provided pool.
    ///
    /// # Arguments
    /// * `pool` - The async database connection pool
    /// * `jwt_config` - Token signing configuration
    ///
    /// # Example
    /// ```ignore
    /// let pool = establish_async_connection_pool(&settings.database).await?;
    /// let state = AppState::new(pool, &settings.jwt)?;
    /// ```
    pub fn new(pool: AsyncDbPool, jwt_config: &JwtConfig) -> AppResult<Self> {
        let repos = Repositories::new(pool.clone());
        let services = Services::new(repos, jwt_config)?;
        Ok(Self::from_parts(services, pool))
    }

    /// Assembles state from already wired services.
    pub fn from_parts(services: Services, db_pool: AsyncDbPool) -> Self {
        Self { services, db_pool }
    }
}
