//! Vacation plan service for business logic operations.
//!
//! Wraps the repository with the existence and success checks that turn store
//! outcomes into domain errors.

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{NewVacationPlan, VacationPlan, VacationPlanChanges};
use crate::repositories::VacationPlanRepository;
use crate::services::pdf::PdfRenderer;

/// Largest page size a caller may request.
pub const MAX_PER_PAGE: u32 = 100;

/// One page of results plus what is needed to navigate the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Current page number (1-based)
    pub page: u32,
    pub per_page: u32,
    /// Total number of items across all pages
    pub total: u64,
}

impl<T> Page<T> {
    /// Number of the final page; at least 1.
    pub fn last_page(&self) -> u32 {
        let per_page = u64::from(self.per_page.max(1));
        (self.total.div_ceil(per_page)).max(1) as u32
    }

    pub fn has_next(&self) -> bool {
        self.page < self.last_page()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// Rendered plan document ready to be sent as an attachment.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Vacation plan service for handling plan-related business logic.
///
/// Cloning is cheap; the repository and renderer are shared behind `Arc`.
#[derive(Clone)]
pub struct VacationPlanService {
    repo: Arc<dyn VacationPlanRepository>,
    renderer: Arc<dyn PdfRenderer>,
}

impl VacationPlanService {
    /// Creates a new VacationPlanService.
    pub fn new(repo: Arc<dyn VacationPlanRepository>, renderer: Arc<dyn PdfRenderer>) -> Self {
        Self { repo, renderer }
    }

    /// Lists plans ordered by id.
    ///
    /// # Arguments
    /// * `page` - Page number (1-based)
    /// * `per_page` - Page size, clamped to `1..=MAX_PER_PAGE`
    ///
    /// # Returns
    /// The requested page, or `NoDataAvailable` when it holds no plans
    pub async fn list_plans(&self, page: u32, per_page: u32) -> AppResult<Page<VacationPlan>> {
        let page = page.max(1);
        let per_page = per_page.clamp(1, MAX_PER_PAGE);
        let offset = i64::from(page - 1) * i64::from(per_page);

        let (items, total) = self.repo.paginate(offset, i64::from(per_page)).await?;
        if items.is_empty() {
            return Err(AppError::NoDataAvailable);
        }

        Ok(Page {
            items,
            page,
            per_page,
            total: total.max(0) as u64,
        })
    }

    /// Stores a new plan.
    ///
    /// # Arguments
    /// * `new_plan` - Already validated plan fields
    ///
    /// # Returns
    /// The stored plan with its assigned id, or `NotCreated`
    pub async fn create_plan(&self, new_plan: NewVacationPlan) -> AppResult<VacationPlan> {
        match self.repo.create(new_plan).await {
            Ok(Some(plan)) => {
                tracing::info!(plan_id = plan.id, "Vacation plan created");
                Ok(plan)
            }
            Ok(None) => Err(AppError::NotCreated),
            Err(AppError::ConstraintViolation { operation, source }) => {
                tracing::warn!(operation = %operation, error = %source, "Vacation plan rejected by store");
                Err(AppError::NotCreated)
            }
            Err(e) => Err(e),
        }
    }

    /// Gets a plan by its id.
    ///
    /// # Returns
    /// The plan if found, or `NotFound`
    pub async fn get_plan(&self, id: i32) -> AppResult<VacationPlan> {
        self.repo.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    /// Applies a partial update.
    ///
    /// # Arguments
    /// * `id` - The plan's id
    /// * `changes` - Fields to overwrite; absent fields keep their value
    ///
    /// # Returns
    /// The plan as stored after the update
    pub async fn update_plan(&self, id: i32, changes: VacationPlanChanges) -> AppResult<VacationPlan> {
        let current = self.get_plan(id).await?;
        if changes.is_empty() {
            return Ok(current);
        }

        match self.repo.update(id, changes).await {
            Ok(Some(plan)) => {
                tracing::info!(plan_id = id, "Vacation plan updated");
                Ok(plan)
            }
            Ok(None) => Err(AppError::NotUpdated),
            Err(AppError::ConstraintViolation { operation, source }) => {
                tracing::warn!(operation = %operation, error = %source, "Vacation plan update rejected by store");
                Err(AppError::NotUpdated)
            }
            Err(e) => Err(e),
        }
    }

    /// Deletes a plan.
    ///
    /// # Returns
    /// `NotFound` when the plan does not exist, `NotDeleted` when no row was removed
    pub async fn delete_plan(&self, id: i32) -> AppResult<()> {
        self.get_plan(id).await?;

        let affected = self.repo.delete(id).await?;
        if affected == 0 {
            return Err(AppError::NotDeleted);
        }

        tracing::info!(plan_id = id, "Vacation plan deleted");
        Ok(())
    }

    /// Renders a plan as a PDF document named `vacation_plan_{id}.pdf`.
    pub async fn render_plan_pdf(&self, id: i32) -> AppResult<PlanDocument> {
        let plan = self.get_plan(id).await?;
        let bytes = self.renderer.render(&plan)?;

        Ok(PlanDocument {
            filename: format!("vacation_plan_{}.pdf", plan.id),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockVacationPlanRepository;
    use crate::repositories::memory::InMemoryVacationPlanRepository;
    use crate::services::pdf::TemplatePdfRenderer;
    use chrono::NaiveDate;
    use mockall::predicate::eq;
    use proptest::prelude::*;

    fn hawaii() -> NewVacationPlan {
        NewVacationPlan {
            title: "Trip to Hawaii".to_string(),
            description: "A fun trip to Hawaii".to_string(),
            date: NaiveDate::from_ymd_opt(2023, 12, 25).unwrap(),
            location: "Hawaii".to_string(),
            participants: vec!["John".to_string(), "Jane".to_string()],
        }
    }

    fn stored(id: i32, new_plan: NewVacationPlan) -> VacationPlan {
        let now = chrono::Utc::now().naive_utc();
        VacationPlan {
            id,
            title: new_plan.title,
            description: new_plan.description,
            date: new_plan.date,
            location: new_plan.location,
            participants: new_plan.participants,
            created_at: now,
            updated_at: now,
        }
    }

    fn service_with(repo: impl VacationPlanRepository + 'static) -> VacationPlanService {
        VacationPlanService::new(Arc::new(repo), Arc::new(TemplatePdfRenderer))
    }

    fn in_memory() -> VacationPlanService {
        service_with(InMemoryVacationPlanRepository::default())
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let service = in_memory();

        let created = service.create_plan(hawaii()).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.title, "Trip to Hawaii");
        assert_eq!(created.participants, vec!["John", "Jane"]);

        let fetched = service.get_plan(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_missing_plan_is_not_found() {
        let service = in_memory();

        assert!(matches!(service.get_plan(9).await, Err(AppError::NotFound)));
        assert!(matches!(
            service.update_plan(9, VacationPlanChanges::default()).await,
            Err(AppError::NotFound)
        ));
        assert!(matches!(service.delete_plan(9).await, Err(AppError::NotFound)));
        assert!(matches!(
            service.render_plan_pdf(9).await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_list_empty_store() {
        let service = in_memory();
        assert!(matches!(
            service.list_plans(1, 15).await,
            Err(AppError::NoDataAvailable)
        ));
    }

    #[tokio::test]
    async fn test_list_pages() {
        let service = in_memory();
        for _ in 0..5 {
            service.create_plan(hawaii()).await.unwrap();
        }

        let page = service.list_plans(2, 2).await.unwrap();
        assert_eq!(page.items.iter().map(|p| p.id).collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(page.total, 5);
        assert_eq!(page.last_page(), 3);
        assert!(page.has_next());
        assert!(page.has_prev());

        assert!(matches!(
            service.list_plans(4, 2).await,
            Err(AppError::NoDataAvailable)
        ));
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let service = in_memory();
        let created = service.create_plan(hawaii()).await.unwrap();

        let changes = VacationPlanChanges {
            date: Some(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()),
            location: Some("Bahamas".to_string()),
            ..Default::default()
        };
        let updated = service.update_plan(created.id, changes).await.unwrap();

        assert_eq!(updated.date, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(updated.location, "Bahamas");
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.participants, created.participants);
        assert_eq!(service.get_plan(created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_empty_update_returns_current() {
        let mut repo = MockVacationPlanRepository::new();
        let plan = stored(1, hawaii());
        let expected = plan.clone();
        repo.expect_find_by_id()
            .with(eq(1))
            .returning(move |_| Ok(Some(plan.clone())));
        repo.expect_update().never();

        let service = service_with(repo);
        let result = service.update_plan(1, VacationPlanChanges::default()).await;
        assert_eq!(result.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_delete_then_get() {
        let service = in_memory();
        let created = service.create_plan(hawaii()).await.unwrap();

        service.delete_plan(created.id).await.unwrap();
        assert!(matches!(
            service.get_plan(created.id).await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_store_signals_failure() {
        let mut repo = MockVacationPlanRepository::new();
        repo.expect_create().returning(|_| Ok(None));
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(stored(id, hawaii()))));
        repo.expect_update().returning(|_, _| Ok(None));
        repo.expect_delete().returning(|_| Ok(0));

        let service = service_with(repo);
        let changes = VacationPlanChanges {
            title: Some("New".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            service.create_plan(hawaii()).await,
            Err(AppError::NotCreated)
        ));
        assert!(matches!(
            service.update_plan(1, changes).await,
            Err(AppError::NotUpdated)
        ));
        assert!(matches!(service.delete_plan(1).await, Err(AppError::NotDeleted)));
    }

    #[tokio::test]
    async fn test_constraint_violation_is_not_created() {
        let mut repo = MockVacationPlanRepository::new();
        repo.expect_create().returning(|_| {
            Err(AppError::ConstraintViolation {
                operation: "insert vacation plan".to_string(),
                source: anyhow::anyhow!("value too long"),
            })
        });

        let service = service_with(repo);
        assert!(matches!(
            service.create_plan(hawaii()).await,
            Err(AppError::NotCreated)
        ));
    }

    #[tokio::test]
    async fn test_database_errors_propagate() {
        let mut repo = MockVacationPlanRepository::new();
        repo.expect_paginate().returning(|_, _| {
            Err(AppError::Database {
                operation: "paginate vacation plans".to_string(),
                source: anyhow::anyhow!("connection reset"),
            })
        });

        let service = service_with(repo);
        assert!(matches!(
            service.list_plans(1, 15).await,
            Err(AppError::Database { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_clamps_page_size() {
        let mut repo = MockVacationPlanRepository::new();
        repo.expect_paginate()
            .with(eq(0), eq(100))
            .returning(|_, _| Ok((vec![stored(1, hawaii())], 1)));

        let service = service_with(repo);
        let page = service.list_plans(0, 500).await.unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 100);
    }

    #[tokio::test]
    async fn test_render_plan_pdf() {
        let service = in_memory();
        let created = service.create_plan(hawaii()).await.unwrap();

        let document = service.render_plan_pdf(created.id).await.unwrap();
        assert_eq!(document.filename, "vacation_plan_1.pdf");
        assert!(document.bytes.starts_with(b"%PDF-"));
    }

    fn date_strategy() -> impl Strategy<Value = NaiveDate> {
        (0i64..3650).prop_map(|days| {
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(days)
        })
    }

    fn new_plan_strategy() -> impl Strategy<Value = NewVacationPlan> {
        (
            "[A-Za-z][A-Za-z ]{0,39}",
            "[A-Za-z0-9 .,]{1,120}",
            date_strategy(),
            "[A-Za-z][A-Za-z ]{0,29}",
            prop::collection::vec("[A-Z][a-z]{1,11}", 1..6),
        )
            .prop_map(|(title, description, date, location, participants)| NewVacationPlan {
                title,
                description,
                date,
                location,
                participants,
            })
    }

    fn changes_strategy() -> impl Strategy<Value = VacationPlanChanges> {
        (
            prop::option::of("[A-Za-z][A-Za-z ]{0,39}"),
            prop::option::of("[A-Za-z0-9 .,]{1,120}"),
            prop::option::of(date_strategy()),
            prop::option::of("[A-Za-z][A-Za-z ]{0,29}"),
            prop::option::of(prop::collection::vec("[A-Z][a-z]{1,11}", 1..6)),
        )
            .prop_map(|(title, description, date, location, participants)| VacationPlanChanges {
                title,
                description,
                date,
                location,
                participants,
            })
    }

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(future)
    }

    proptest! {
        #[test]
        fn prop_created_plan_reads_back_unchanged(new_plan in new_plan_strategy()) {
            let fetched = block_on(async {
                let service = in_memory();
                let created = service.create_plan(new_plan.clone()).await.unwrap();
                service.get_plan(created.id).await.unwrap()
            });

            prop_assert_eq!(fetched.title, new_plan.title);
            prop_assert_eq!(fetched.description, new_plan.description);
            prop_assert_eq!(fetched.date, new_plan.date);
            prop_assert_eq!(fetched.location, new_plan.location);
            prop_assert_eq!(fetched.participants, new_plan.participants);
        }

        #[test]
        fn prop_update_merges_over_prior_state(
            new_plan in new_plan_strategy(),
            changes in changes_strategy(),
        ) {
            let (mut expected, fetched) = block_on(async {
                let service = in_memory();
                let prior = service.create_plan(new_plan).await.unwrap();
                service.update_plan(prior.id, changes.clone()).await.unwrap();
                (prior.clone(), service.get_plan(prior.id).await.unwrap())
            });

            changes.apply_to(&mut expected);
            expected.updated_at = fetched.updated_at;
            prop_assert_eq!(fetched, expected);
        }

        #[test]
        fn prop_last_page_covers_total(total in 0u64..10_000, per_page in 1u32..=100) {
            let page = Page::<()> { items: vec![], page: 1, per_page, total };
            let last = u64::from(page.last_page());
            prop_assert!(last >= 1);
            prop_assert!(last * u64::from(per_page) >= total);
            prop_assert!(total == 0 || (last - 1) * u64::from(per_page) < total);
        }
    }
}
