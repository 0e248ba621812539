//! Router configuration for the API.
//!
//! This module provides centralized route registration and middleware
//! configuration for the application.

use std::time::Duration;

use axum::{Router, http::StatusCode, middleware};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{
    auth_middleware, global_error_handler, logging_middleware, request_id_middleware,
};
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs first):
/// 1. CORS
/// 2. Request ID - generates/propagates request IDs
/// 3. Logging - logs requests with request IDs
/// 4. Error envelope - wraps framework error responses in JSON
/// 5. Request timeout
///
/// The vacation plan routes additionally run the bearer token middleware.
///
/// # Routes
/// - `/api/register`, `/api/login` - Authentication
/// - `/api/vacation-plan` - Vacation plan CRUD and PDF export
/// - `/health` - Health checks
/// - `/swagger-ui`, `/api-docs/openapi.json` - API documentation
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let protected = handlers::vacation_plans::vacation_plan_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let api_routes = OpenApiRouter::new()
        .merge(handlers::auth::auth_routes())
        .merge(protected);

    let (router, openapi) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", api_routes)
        .merge(handlers::health::health_routes())
        .split_for_parts();

    let router = router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi));

    with_common_layers(router, request_timeout).with_state(state)
}

/// Wraps `router` in the middleware stack shared by every route.
fn with_common_layers<S>(router: Router<S>, request_timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(middleware::from_fn(global_error_handler))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use axum::response::Response;
    use chrono::{Duration as Days, Utc};
    use diesel_async::AsyncPgConnection;
    use diesel_async::pooled_connection::AsyncDieselConnectionManager;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::db::AsyncDbPool;
    use crate::repositories::memory::{InMemoryUserRepository, InMemoryVacationPlanRepository};
    use crate::services::pdf::TemplatePdfRenderer;
    use crate::services::{AuthService, Services, VacationPlanService};
    use crate::utils::{Argon2CredentialVerifier, JwtTokenIssuer};

    const SECRET: &str = "router_test_secret_key_0123456789abc";

    /// Router over in-memory stores; the pool is never connected.
    fn test_app() -> Router {
        let services = Services {
            auth: AuthService::new(
                Arc::new(InMemoryUserRepository::default()),
                Arc::new(Argon2CredentialVerifier::new().unwrap()),
                Arc::new(JwtTokenIssuer::new(SECRET, 24)),
            ),
            vacation_plans: VacationPlanService::new(
                Arc::new(InMemoryVacationPlanRepository::default()),
                Arc::new(TemplatePdfRenderer),
            ),
        };
        let manager =
            AsyncDieselConnectionManager::<AsyncPgConnection>::new("postgres://localhost/unused");
        let pool: AsyncDbPool = AsyncDbPool::builder().build_unchecked(manager);

        create_router(AppState::from_parts(services, pool), Duration::from_secs(30))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn register(app: &Router) -> String {
        let response = send(
            app,
            Method::POST,
            "/api/register",
            None,
            Some(json!({"name": "Jane", "email": "jane@example.com", "password": "secret123"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        json_body(response).await["data"]["token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    fn upcoming(days: i64) -> String {
        (Utc::now().date_naive() + Days::days(days))
            .format("%Y-%m-%d")
            .to_string()
    }

    fn hawaii() -> Value {
        json!({
            "title": "Trip to Hawaii",
            "description": "A fun trip to Hawaii",
            "date": upcoming(30),
            "location": "Hawaii",
            "participants": ["John", "Jane"]
        })
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let app = test_app();
        let token = register(&app).await;
        assert!(!token.is_empty());

        let response = send(
            &app,
            Method::POST,
            "/api/login",
            None,
            Some(json!({"email": "jane@example.com", "password": "secret123"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "User logged in successfully.");
        assert_eq!(body["data"]["name"], "Jane");
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() {
        let app = test_app();
        register(&app).await;

        let response = send(
            &app,
            Method::POST,
            "/api/login",
            None,
            Some(json!({"email": "jane@example.com", "password": "nope-nope"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["message"], "Unauthorized");
    }

    #[tokio::test]
    async fn test_login_with_missing_or_blank_credentials() {
        let app = test_app();
        register(&app).await;

        for payload in [
            json!({"email": "jane@example.com"}),
            json!({"email": "", "password": ""}),
            json!({}),
        ] {
            let response = send(&app, Method::POST, "/api/login", None, Some(payload)).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            let body = json_body(response).await;
            assert_eq!(body["message"], "Unauthorized");
            assert_eq!(body["errors"], json!([]));
        }
    }

    #[tokio::test]
    async fn test_duplicate_registration() {
        let app = test_app();
        register(&app).await;

        let response = send(
            &app,
            Method::POST,
            "/api/register",
            None,
            Some(json!({"name": "Jane", "email": "jane@example.com", "password": "secret123"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["message"], "User not created.");
    }

    #[tokio::test]
    async fn test_registration_validation() {
        let app = test_app();
        let response = send(
            &app,
            Method::POST,
            "/api/register",
            None,
            Some(json!({"email": "jane@example.com"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["errors"]["name"], json!(["The name field is required."]));
        assert_eq!(
            body["errors"]["password"],
            json!(["The password field is required."])
        );
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        let app = test_app();

        for (method, uri) in [
            (Method::GET, "/api/vacation-plan"),
            (Method::POST, "/api/vacation-plan"),
            (Method::GET, "/api/vacation-plan/1"),
            (Method::PUT, "/api/vacation-plan/1"),
            (Method::DELETE, "/api/vacation-plan/1"),
            (Method::GET, "/api/vacation-plan/1/generate-pdf"),
        ] {
            let response = send(&app, method, uri, None, None).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
            assert_eq!(
                json_body(response).await,
                json!({"message": "Unauthorized access. Please authenticate.", "error": true})
            );
        }

        let response = send(&app, Method::GET, "/api/vacation-plan", Some("forged"), None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_empty_list_is_not_found() {
        let app = test_app();
        let token = register(&app).await;

        let response = send(&app, Method::GET, "/api/vacation-plan", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "No vacation plan data available.");
    }

    #[tokio::test]
    async fn test_plan_lifecycle() {
        let app = test_app();
        let token = register(&app).await;

        let response = send(
            &app,
            Method::POST,
            "/api/vacation-plan",
            Some(&token),
            Some(hawaii()),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = json_body(response).await;
        assert_eq!(created["message"], "Vacation plan created successfully.");
        assert_eq!(created["data"]["id"], 1);
        assert_eq!(created["data"]["participants"], json!(["John", "Jane"]));

        let response = send(&app, Method::GET, "/api/vacation-plan/1", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["data"], created["data"]);

        let response = send(
            &app,
            Method::PUT,
            "/api/vacation-plan/1",
            Some(&token),
            Some(json!({"date": "2023-12-31", "location": "Bahamas"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated = json_body(response).await;
        assert_eq!(updated["data"]["date"], "2023-12-31");
        assert_eq!(updated["data"]["location"], "Bahamas");
        assert_eq!(updated["data"]["title"], "Trip to Hawaii");

        let response = send(&app, Method::GET, "/api/vacation-plan", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let listed = json_body(response).await;
        assert_eq!(listed["data"].as_array().unwrap().len(), 1);
        assert_eq!(listed["meta"]["per_page"], 15);
        assert_eq!(listed["meta"]["total"], 1);

        let response = send(&app, Method::DELETE, "/api/vacation-plan/1", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(to_bytes(response.into_body(), usize::MAX).await.unwrap().is_empty());

        let response = send(&app, Method::GET, "/api/vacation-plan/1", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["message"], "Vacation plan not found.");
    }

    #[tokio::test]
    async fn test_create_validation() {
        let app = test_app();
        let token = register(&app).await;

        let response = send(
            &app,
            Method::POST,
            "/api/vacation-plan",
            Some(&token),
            Some(json!({"title": "", "date": "2000-01-01", "location": "x".repeat(300)})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["message"], "The given data was invalid.");
        assert_eq!(body["errors"]["title"], json!(["The title field is required."]));
        assert_eq!(
            body["errors"]["description"],
            json!(["The description field is required."])
        );
        assert_eq!(
            body["errors"]["date"],
            json!(["The date field must be a date after or equal to today."])
        );
        assert_eq!(
            body["errors"]["location"],
            json!(["The location field must not be greater than 255 characters."])
        );
    }

    #[tokio::test]
    async fn test_update_validation_after_lookup() {
        let app = test_app();
        let token = register(&app).await;
        send(&app, Method::POST, "/api/vacation-plan", Some(&token), Some(hawaii())).await;

        let response = send(
            &app,
            Method::PUT,
            "/api/vacation-plan/1",
            Some(&token),
            Some(json!({"date": "not-a-date"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            json_body(response).await["errors"]["date"],
            json!(["The date field must match the format Y-m-d."])
        );

        let response = send(
            &app,
            Method::PUT,
            "/api/vacation-plan/1",
            Some(&token),
            Some(json!({"participants": "John"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_malformed_bodies() {
        let app = test_app();
        let token = register(&app).await;

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/vacation-plan")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["success"], false);

        let mut plan = hawaii();
        plan["participants"] = json!("John");
        let response = send(&app, Method::POST, "/api/vacation-plan", Some(&token), Some(plan)).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_pagination_parameters() {
        let app = test_app();
        let token = register(&app).await;

        let response = send(
            &app,
            Method::GET,
            "/api/vacation-plan?per_page=101",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            json_body(response).await["errors"]["per_page"],
            json!(["The per_page field must not be greater than 100."])
        );

        for _ in 0..3 {
            send(&app, Method::POST, "/api/vacation-plan", Some(&token), Some(hawaii())).await;
        }
        let response = send(
            &app,
            Method::GET,
            "/api/vacation-plan?per_page=2&page=2",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["data"][0]["id"], 3);
        assert_eq!(body["meta"]["last_page"], 2);
        assert_eq!(body["meta"]["has_prev"], true);
        assert_eq!(body["meta"]["has_next"], false);
    }

    #[tokio::test]
    async fn test_missing_plans() {
        let app = test_app();
        let token = register(&app).await;

        for (method, uri, body) in [
            (Method::GET, "/api/vacation-plan/42", None),
            (Method::GET, "/api/vacation-plan/abc", None),
            (Method::PUT, "/api/vacation-plan/42", Some(json!({"title": "New"}))),
            (Method::PUT, "/api/vacation-plan/42", Some(json!({"date": "not-a-date"}))),
            (Method::PUT, "/api/vacation-plan/42", Some(json!({"participants": "John"}))),
            (Method::DELETE, "/api/vacation-plan/42", None),
            (Method::GET, "/api/vacation-plan/42/generate-pdf", None),
        ] {
            let response = send(&app, method, uri, Some(&token), body).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_generate_pdf() {
        let app = test_app();
        let token = register(&app).await;
        send(&app, Method::POST, "/api/vacation-plan", Some(&token), Some(hawaii())).await;

        let response = send(
            &app,
            Method::GET,
            "/api/vacation-plan/1/generate-pdf",
            Some(&token),
            None,
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"vacation_plan_1.pdf\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
    }

    #[tokio::test]
    async fn test_operational_routes() {
        let app = test_app();

        let response = send(&app, Method::GET, "/health/live", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));

        let response = send(&app, Method::GET, "/api-docs/openapi.json", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let doc = json_body(response).await;
        assert!(doc["paths"]["/api/vacation-plan/{id}"].is_object());
        assert!(doc["paths"]["/api/login"].is_object());

        let response = send(&app, Method::GET, "/api/nowhere", None, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_slow_request_times_out() {
        let slow = Router::new().route(
            "/slow",
            axum::routing::get(|| async {
                tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                "done"
            }),
        );
        let app = with_common_layers(slow, std::time::Duration::from_millis(20));

        let request = Request::builder().uri("/slow").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert!(response.headers().contains_key("x-request-id"));
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "The request timed out.");
    }
}
