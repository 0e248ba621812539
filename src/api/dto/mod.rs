//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `auth` - Registration and login payloads
//! - `vacation_plan` - Vacation plan payloads and resource
//! - `response` - Success and failure envelopes
//! - `pagination` - List query parameters
//! - `health` - Health check responses

mod auth;
mod health;
mod pagination;
mod response;
mod vacation_plan;

pub use auth::{AuthTokenResponse, LoginRequest, RegisterRequest};
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use pagination::{DEFAULT_PER_PAGE, PaginationParams, PaginationQuery};
pub use response::{ApiResponse, ErrorResponse, PaginationMeta, UnauthenticatedResponse};
pub use vacation_plan::{
    CreateVacationPlanRequest, UpdateVacationPlanRequest, VacationPlanResponse,
};
