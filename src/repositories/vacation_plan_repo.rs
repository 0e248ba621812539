//! Vacation plan repository for async database operations.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult, DatabaseErrorConverter};
use crate::models::{NewVacationPlan, VacationPlan, VacationPlanChanges};

/// Persistence contract for vacation plans.
///
/// The `Option`/row-count results are the store's own success signal; the
/// service layer decides what a missing row means.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VacationPlanRepository: Send + Sync {
    /// Returns one page ordered by id together with the total number of plans.
    async fn paginate(&self, offset: i64, limit: i64) -> AppResult<(Vec<VacationPlan>, i64)>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<VacationPlan>>;

    /// Inserts a plan; `None` when the store returned no row.
    async fn create(&self, new_plan: NewVacationPlan) -> AppResult<Option<VacationPlan>>;

    /// Applies `changes`; `None` when no row was written.
    async fn update(&self, id: i32, changes: VacationPlanChanges)
    -> AppResult<Option<VacationPlan>>;

    /// Removes a plan and returns the number of affected rows.
    async fn delete(&self, id: i32) -> AppResult<usize>;
}

/// PostgreSQL implementation holding an async connection pool.
#[derive(Clone)]
pub struct PgVacationPlanRepository {
    pool: AsyncDbPool,
}

impl PgVacationPlanRepository {
    /// Creates a new PgVacationPlanRepository with the given connection pool.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VacationPlanRepository for PgVacationPlanRepository {
    /// Loads a page of plans.
    ///
    /// # Arguments
    /// * `page_offset` - Number of rows to skip
    /// * `page_limit` - Maximum number of rows to return
    ///
    /// # Returns
    /// The rows of the page and the total row count
    async fn paginate(
        &self,
        page_offset: i64,
        page_limit: i64,
    ) -> AppResult<(Vec<VacationPlan>, i64)> {
        use crate::schema::vacation_plans::dsl::*;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AppError::ConnectionPool {
                source: anyhow::Error::from(e),
            })?;

        let total: i64 = vacation_plans
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "count vacation plans"))?;

        let items = vacation_plans
            .order(id.asc())
            .offset(page_offset)
            .limit(page_limit)
            .select(VacationPlan::as_select())
            .load(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "list vacation plans"))?;

        Ok((items, total))
    }

    async fn find_by_id(&self, plan_id: i32) -> AppResult<Option<VacationPlan>> {
        use crate::schema::vacation_plans::dsl::*;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AppError::ConnectionPool {
                source: anyhow::Error::from(e),
            })?;

        vacation_plans
            .find(plan_id)
            .select(VacationPlan::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "find vacation plan"))
    }

    async fn create(&self, new_plan: NewVacationPlan) -> AppResult<Option<VacationPlan>> {
        use crate::schema::vacation_plans::dsl::*;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AppError::ConnectionPool {
                source: anyhow::Error::from(e),
            })?;

        diesel::insert_into(vacation_plans)
            .values(&new_plan)
            .returning(VacationPlan::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "insert vacation plan"))
    }

    /// Updates the present fields and bumps `updated_at`.
    ///
    /// # Arguments
    /// * `plan_id` - The plan to update
    /// * `changes` - Fields to overwrite
    ///
    /// # Returns
    /// The post-update row, or `None` if no row matched
    async fn update(
        &self,
        plan_id: i32,
        changes: VacationPlanChanges,
    ) -> AppResult<Option<VacationPlan>> {
        use crate::schema::vacation_plans::dsl::*;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AppError::ConnectionPool {
                source: anyhow::Error::from(e),
            })?;

        diesel::update(vacation_plans.find(plan_id))
            .set((&changes, updated_at.eq(diesel::dsl::now)))
            .returning(VacationPlan::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "update vacation plan"))
    }

    async fn delete(&self, plan_id: i32) -> AppResult<usize> {
        use crate::schema::vacation_plans::dsl::*;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AppError::ConnectionPool {
                source: anyhow::Error::from(e),
            })?;

        diesel::delete(vacation_plans.find(plan_id))
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "delete vacation plan"))
    }
}
