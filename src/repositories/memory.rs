//! In-memory repositories backing router-level tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::{AppError, AppResult};
use crate::models::{NewUser, NewVacationPlan, User, VacationPlan, VacationPlanChanges};
use crate::repositories::{UserRepository, VacationPlanRepository};

fn poisoned() -> AppError {
    AppError::Internal {
        source: anyhow::anyhow!("in-memory store lock poisoned"),
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut users = self.users.lock().map_err(|_| poisoned())?;
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::ConstraintViolation {
                operation: "insert user".to_string(),
                source: anyhow::anyhow!("duplicate key value violates unique constraint"),
            });
        }

        let now = Utc::now().naive_utc();
        let user = User {
            id: users.len() as i32 + 1,
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.lock().map_err(|_| poisoned())?;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let users = self.users.lock().map_err(|_| poisoned())?;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryVacationPlanRepository {
    state: Mutex<PlanTable>,
}

#[derive(Default)]
struct PlanTable {
    next_id: i32,
    rows: Vec<VacationPlan>,
}

#[async_trait]
impl VacationPlanRepository for InMemoryVacationPlanRepository {
    async fn paginate(&self, offset: i64, limit: i64) -> AppResult<(Vec<VacationPlan>, i64)> {
        let table = self.state.lock().map_err(|_| poisoned())?;
        let items = table
            .rows
            .iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();
        Ok((items, table.rows.len() as i64))
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<VacationPlan>> {
        let table = self.state.lock().map_err(|_| poisoned())?;
        Ok(table.rows.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, new_plan: NewVacationPlan) -> AppResult<Option<VacationPlan>> {
        let mut table = self.state.lock().map_err(|_| poisoned())?;
        table.next_id += 1;

        let now = Utc::now().naive_utc();
        let plan = VacationPlan {
            id: table.next_id,
            title: new_plan.title,
            description: new_plan.description,
            date: new_plan.date,
            location: new_plan.location,
            participants: new_plan.participants,
            created_at: now,
            updated_at: now,
        };
        table.rows.push(plan.clone());
        Ok(Some(plan))
    }

    async fn update(
        &self,
        id: i32,
        changes: VacationPlanChanges,
    ) -> AppResult<Option<VacationPlan>> {
        let mut table = self.state.lock().map_err(|_| poisoned())?;
        Ok(table.rows.iter_mut().find(|p| p.id == id).map(|plan| {
            changes.apply_to(plan);
            plan.updated_at = Utc::now().naive_utc();
            plan.clone()
        }))
    }

    async fn delete(&self, id: i32) -> AppResult<usize> {
        let mut table = self.state.lock().map_err(|_| poisoned())?;
        let before = table.rows.len();
        table.rows.retain(|p| p.id != id);
        Ok(before - table.rows.len())
    }
}
