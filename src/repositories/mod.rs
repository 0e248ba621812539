//! Repository layer for data access operations.
//!
//! Each store is reached through an async trait so services can be exercised
//! against mocks or the in-memory implementations used by router tests.

mod user_repo;
mod vacation_plan_repo;

#[cfg(test)]
pub(crate) mod memory;

pub use user_repo::{PgUserRepository, UserRepository};
pub use vacation_plan_repo::{PgVacationPlanRepository, VacationPlanRepository};

#[cfg(test)]
pub use user_repo::MockUserRepository;
#[cfg(test)]
pub use vacation_plan_repo::MockVacationPlanRepository;

use std::sync::Arc;

use crate::db::AsyncDbPool;

/// Aggregates all repositories for convenient access.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub vacation_plans: Arc<dyn VacationPlanRepository>,
}

impl Repositories {
    /// Creates the PostgreSQL-backed repositories.
    ///
    /// # Arguments
    /// * `pool` - The async database connection pool
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            vacation_plans: Arc::new(PgVacationPlanRepository::new(pool)),
        }
    }
}
