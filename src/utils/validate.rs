use std::borrow::Cow;

use axum::extract::{FromRequest, FromRequestParts, Json, Path, Request};
use axum::http::request::Parts;
use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};

/// Calendar date format accepted in request bodies.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// JSON body that has passed its `Validate` rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> AppResult<Self> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Vacation plan id taken from the `{id}` path segment.
///
/// Anything that is not a positive integer cannot name a stored plan, so it is
/// rejected as `NotFound` rather than as a malformed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanId(pub i32);

impl<S> FromRequestParts<S> for PlanId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> AppResult<Self> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound)?;

        parse_plan_id(&raw).map(PlanId).ok_or(AppError::NotFound)
    }
}

fn parse_plan_id(raw: &str) -> Option<i32> {
    raw.parse::<i32>().ok().filter(|id| *id > 0)
}

fn rule(code: &'static str) -> ValidationError {
    ValidationError::new(code)
}

/// Rejects strings that are empty once trimmed; reported as `required`.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(rule("required"));
    }
    Ok(())
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Accepts any well-formed `YYYY-MM-DD` date.
pub fn date_format(value: &str) -> Result<(), ValidationError> {
    parse_date(value)
        .map(|_| ())
        .ok_or_else(|| rule("date_format"))
}

/// Accepts a well-formed date that is today (UTC) or later.
pub fn upcoming_date(value: &str) -> Result<(), ValidationError> {
    let date = parse_date(value).ok_or_else(|| rule("date_format"))?;

    if date < Utc::now().date_naive() {
        let mut error = rule("after_or_equal");
        error.add_param(Cow::from("date"), &"today");
        return Err(error);
    }
    Ok(())
}
