//! Registration and login handlers.

use axum::{Json, extract::State, http::StatusCode};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::AUTH_TAG;
use crate::api::dto::{
    ApiResponse, AuthTokenResponse, ErrorResponse, LoginRequest, RegisterRequest,
};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::ValidatedJson;

/// Creates the authentication routes
///
/// # Routes
/// - `POST /register` - Create an account and get a token
/// - `POST /login` - Exchange credentials for a token
pub fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(register))
        .routes(routes!(login))
}

/// POST /api/register - Register new user
#[utoipa::path(
    post,
    path = "/register",
    tag = AUTH_TAG,
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = ApiResponse<AuthTokenResponse>),
        (status = 400, description = "User could not be stored", body = ErrorResponse),
        (status = 422, description = "Invalid registration data", body = ErrorResponse)
    )
)]
async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthTokenResponse>>)> {
    let issued = state
        .services
        .auth
        .register(payload.into_registration())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            AuthTokenResponse::from(issued),
            "User registered successfully.",
        )),
    ))
}

/// POST /api/login - Authenticate user
#[utoipa::path(
    post,
    path = "/login",
    tag = AUTH_TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthTokenResponse>),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthTokenResponse>>> {
    let (email, password) = payload.into_credentials();
    let issued = state.services.auth.login(&email, &password).await?;

    Ok(Json(ApiResponse::ok(
        AuthTokenResponse::from(issued),
        "User logged in successfully.",
    )))
}
