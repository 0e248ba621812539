use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

/// Vacation plan as stored in the `vacation_plans` table.
#[derive(Debug, Queryable, Selectable, Clone, PartialEq)]
#[diesel(table_name = crate::schema::vacation_plans)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct VacationPlan {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub location: String,
    pub participants: Vec<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Validated fields for a plan that does not exist yet.
#[derive(Debug, Insertable, Clone, PartialEq)]
#[diesel(table_name = crate::schema::vacation_plans)]
pub struct NewVacationPlan {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub location: String,
    pub participants: Vec<String>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, AsChangeset, Clone, Default, PartialEq)]
#[diesel(table_name = crate::schema::vacation_plans)]
pub struct VacationPlanChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub location: Option<String>,
    pub participants: Option<Vec<String>>,
}

impl VacationPlanChanges {
    /// Returns true when no field would be written.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.location.is_none()
            && self.participants.is_none()
    }

    /// Merges the present fields over `plan`.
    pub fn apply_to(&self, plan: &mut VacationPlan) {
        if let Some(title) = &self.title {
            plan.title = title.clone();
        }
        if let Some(description) = &self.description {
            plan.description = description.clone();
        }
        if let Some(date) = self.date {
            plan.date = date;
        }
        if let Some(location) = &self.location {
            plan.location = location.clone();
        }
        if let Some(participants) = &self.participants {
            plan.participants = participants.clone();
        }
    }
}
