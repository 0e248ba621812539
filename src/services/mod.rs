//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories and handlers.

mod auth_service;
pub mod pdf;
mod vacation_plan_service;

pub use auth_service::{AuthService, AuthUser, IssuedToken, Registration};
pub use vacation_plan_service::{MAX_PER_PAGE, Page, PlanDocument, VacationPlanService};

use std::sync::Arc;

use crate::config::JwtConfig;
use crate::error::AppResult;
use crate::repositories::Repositories;
use crate::services::pdf::TemplatePdfRenderer;
use crate::utils::{Argon2CredentialVerifier, JwtTokenIssuer};

/// Aggregates all services for convenient access.
///
/// Cloning is cheap since every collaborator sits behind an `Arc`.
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub vacation_plans: VacationPlanService,
}

impl Services {
    /// Wires the services with the production collaborators.
    ///
    /// # Arguments
    /// * `repos` - Repositories the services read and write through
    /// * `jwt_config` - Signing secret and token lifetime
    pub fn new(repos: Repositories, jwt_config: &JwtConfig) -> AppResult<Self> {
        Ok(Self {
            auth: AuthService::new(
                repos.users,
                Arc::new(Argon2CredentialVerifier::new()?),
                Arc::new(JwtTokenIssuer::from_config(jwt_config)),
            ),
            vacation_plans: VacationPlanService::new(
                repos.vacation_plans,
                Arc::new(TemplatePdfRenderer),
            ),
        })
    }
}
