//! Pagination query parameters for list endpoints.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::dto::PaginationMeta;
use crate::error::{AppError, AppResult, FieldErrors};
use crate::services::{MAX_PER_PAGE, Page};

pub const DEFAULT_PER_PAGE: u32 = 15;

/// Raw query string values, checked by [`PaginationParams`].
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// Page number (1-based)
    #[param(value_type = Option<u32>, minimum = 1, example = 1)]
    pub page: Option<String>,

    /// Number of plans per page (max 100)
    #[param(value_type = Option<u32>, minimum = 1, maximum = 100, example = 15)]
    pub per_page: Option<String>,
}

/// Validated pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationParams {
    pub page: u32,
    pub per_page: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl TryFrom<PaginationQuery> for PaginationParams {
    type Error = AppError;

    fn try_from(query: PaginationQuery) -> AppResult<Self> {
        let mut errors = FieldErrors::new();

        let page = parse_bounded(&mut errors, "page", query.page.as_deref(), 1, None);
        let per_page = parse_bounded(
            &mut errors,
            "per_page",
            query.per_page.as_deref(),
            DEFAULT_PER_PAGE,
            Some(MAX_PER_PAGE),
        );

        if !errors.is_empty() {
            return Err(AppError::ValidationFailed { errors });
        }
        Ok(Self { page, per_page })
    }
}

/// Parses an integer that must be at least 1 and at most `max`; records a
/// message under `field` and returns `default` when it is not.
fn parse_bounded(
    errors: &mut FieldErrors,
    field: &str,
    raw: Option<&str>,
    default: u32,
    max: Option<u32>,
) -> u32 {
    let raw = match raw.map(str::trim) {
        None | Some("") => return default,
        Some(raw) => raw,
    };

    let message = match raw.parse::<i64>() {
        Err(_) => format!("The {} field must be an integer.", field),
        Ok(value) if value < 1 => format!("The {} field must be at least 1.", field),
        Ok(value) => match max {
            Some(max) if value > i64::from(max) => {
                format!("The {} field must not be greater than {}.", field, max)
            }
            _ => return u32::try_from(value).unwrap_or(u32::MAX),
        },
    };

    errors.entry(field.to_string()).or_default().push(message);
    default
}

impl<S> FromRequestParts<S> for PaginationParams
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> AppResult<Self> {
        let Query(query) = Query::<PaginationQuery>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest {
                message: e.body_text(),
            })?;
        Self::try_from(query)
    }
}

impl<T> From<&Page<T>> for PaginationMeta {
    fn from(page: &Page<T>) -> Self {
        Self {
            page: page.page,
            per_page: page.per_page,
            total: page.total,
            last_page: page.last_page(),
            has_next: page.has_next(),
            has_prev: page.has_prev(),
        }
    }
}
