use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub const AUTH_TAG: &str = "Auth";
pub const VACATION_PLAN_TAG: &str = "Vacation Plans";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vacation Planner",
        description = "Vacation plan management API with token authentication",
    ),
    modifiers(&SecurityAddon),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::api::dto::UnauthenticatedResponse,
            crate::api::dto::PaginationMeta,
        )
    ),
    tags(
        (name = AUTH_TAG, description = "Registration and login endpoints"),
        (name = VACATION_PLAN_TAG, description = "Vacation plan endpoints; require a bearer token"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by /api/register or /api/login"))
                        .build(),
                ),
            )
        }
    }
}
