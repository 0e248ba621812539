//! Bearer token authentication middleware.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;

/// Authentication middleware for protected routes.
///
/// Resolves the caller from `Authorization: Bearer <token>` and stores the
/// resulting [`AuthUser`](crate::services::AuthUser) in request extensions,
/// where handlers can read it with `Extension<AuthUser>`.
///
/// # Errors
/// Returns 401 before any handler runs if the header is missing, is not a
/// bearer token, or the token does not resolve to an existing user. Each
/// rejection is logged at warn level with the client address, URL and user
/// agent.
///
/// # Example
/// ```ignore
/// OpenApiRouter::new()
///     .routes(routes!(list_plans))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
/// ```
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let result = match bearer_token(&request) {
        Some(token) => state.services.auth.authenticate(token).await,
        None => Err(AppError::Unauthenticated {
            reason: "Missing bearer token".to_string(),
        }),
    };

    match result {
        Ok(user) => {
            request.extensions_mut().insert(user);
            Ok(next.run(request).await)
        }
        Err(error) => {
            log_rejection(&request, &error);
            match error {
                AppError::Unauthenticated { .. } => Err(error),
                // Store outages stay 500s.
                other if other.is_unexpected() => Err(other),
                other => Err(AppError::Unauthenticated {
                    reason: other.to_string(),
                }),
            }
        }
    }
}

fn bearer_token(request: &Request) -> Option<&str> {
    let value = request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?;

    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

fn log_rejection(request: &Request, error: &AppError) {
    let client_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");
    let reason = match error {
        AppError::Unauthenticated { reason } => reason.clone(),
        other => other.to_string(),
    };

    tracing::warn!(
        ip = %client_ip,
        url = %request.uri(),
        user_agent = %user_agent,
        reason = %reason,
        "Unauthenticated access attempt"
    );
}
