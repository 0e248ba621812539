//! Vacation plan request and response DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{NewVacationPlan, VacationPlan, VacationPlanChanges};
use crate::utils::validate::{DATE_FORMAT, date_format, not_blank, parse_date, upcoming_date};

/// Create request payload.
///
/// Fields are optional at the serde level so a missing field is reported by
/// the validation rules instead of as a parse failure.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateVacationPlanRequest {
    #[validate(required, custom(function = "not_blank"), length(max = 255))]
    #[schema(example = "Trip to Hawaii", max_length = 255)]
    pub title: Option<String>,

    #[validate(required, custom(function = "not_blank"))]
    #[schema(example = "A fun trip to Hawaii")]
    pub description: Option<String>,

    /// Calendar date (`YYYY-MM-DD`), today or later
    #[validate(required, custom(function = "upcoming_date"))]
    #[schema(example = "2030-12-25", format = Date)]
    pub date: Option<String>,

    #[validate(required, custom(function = "not_blank"), length(max = 255))]
    #[schema(example = "Hawaii", max_length = 255)]
    pub location: Option<String>,

    #[schema(example = json!(["John", "Jane"]))]
    pub participants: Option<Vec<String>>,
}

impl CreateVacationPlanRequest {
    /// Converts a request that already passed `validate()`.
    ///
    /// The date is parsed again, so a request that skipped validation still
    /// cannot produce a plan without a date.
    pub fn into_new_plan(self) -> Option<NewVacationPlan> {
        let date = self.date.as_deref().and_then(parse_date)?;
        Some(NewVacationPlan {
            title: self.title?.trim().to_string(),
            description: self.description?.trim().to_string(),
            date,
            location: self.location?.trim().to_string(),
            participants: self.participants.unwrap_or_default(),
        })
    }
}

/// Partial update payload; every field is optional.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateVacationPlanRequest {
    #[validate(custom(function = "not_blank"), length(max = 255))]
    #[schema(example = "Trip to the Bahamas", max_length = 255)]
    pub title: Option<String>,

    #[validate(custom(function = "not_blank"))]
    pub description: Option<String>,

    /// Calendar date (`YYYY-MM-DD`); not checked against today
    #[validate(custom(function = "date_format"))]
    #[schema(example = "2023-12-31", format = Date)]
    pub date: Option<String>,

    #[validate(custom(function = "not_blank"), length(max = 255))]
    #[schema(example = "Bahamas", max_length = 255)]
    pub location: Option<String>,

    pub participants: Option<Vec<String>>,
}

impl UpdateVacationPlanRequest {
    /// Converts a validated request into a changeset.
    pub fn into_changes(self) -> VacationPlanChanges {
        VacationPlanChanges {
            title: self.title.map(|t| t.trim().to_string()),
            description: self.description.map(|d| d.trim().to_string()),
            date: self.date.as_deref().and_then(parse_date),
            location: self.location.map(|l| l.trim().to_string()),
            participants: self.participants,
        }
    }
}

/// Vacation plan resource.
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct VacationPlanResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Trip to Hawaii")]
    pub title: String,
    #[schema(example = "A fun trip to Hawaii")]
    pub description: String,
    #[schema(example = "2030-12-25", format = Date)]
    pub date: String,
    #[schema(example = "Hawaii")]
    pub location: String,
    #[schema(example = json!(["John", "Jane"]))]
    pub participants: Vec<String>,
}

impl From<VacationPlan> for VacationPlanResponse {
    fn from(plan: VacationPlan) -> Self {
        Self {
            id: plan.id,
            title: plan.title,
            description: plan.description,
            date: plan.date.format(DATE_FORMAT).to_string(),
            location: plan.location,
            participants: plan.participants,
        }
    }
}
