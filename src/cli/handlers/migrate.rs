//! Migrate command handler
//!
//! Applies, previews or reverts the embedded schema migrations.

use crate::config::Settings;
use crate::db::{pending_migrations, revert_migrations, run_pending_migrations};
use crate::error::AppResult;

/// Handler for the migrate command
pub struct MigrateCommandHandler {
    config: Settings,
}

impl MigrateCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Execute the migrate command
    ///
    /// # Arguments
    /// * `dry_run` - List pending migrations without applying them
    /// * `rollback` - Number of most recent migrations to revert
    ///
    /// # Errors
    /// - Database configuration or connection errors
    /// - Migration execution errors
    /// - `ValidationFailed` when asked to revert more migrations than are applied
    pub async fn execute(&self, dry_run: bool, rollback: Option<u32>) -> AppResult<()> {
        self.config.database.validate()?;
        let url = &self.config.database.url;

        if dry_run {
            let pending = pending_migrations(url).await?;
            if pending.is_empty() {
                println!("✓ No pending migrations found - database is up to date");
            } else {
                println!("Found {} pending migration(s):", pending.len());
                for name in &pending {
                    println!("  - {}", name);
                }
                println!("\nRun without --dry-run to apply these migrations");
            }
            return Ok(());
        }

        if let Some(steps) = rollback {
            println!("Rolling back {} migration(s)...", steps);
            let reverted = revert_migrations(url, steps).await?;
            tracing::info!(reverted, "Migrations reverted");
            println!("✓ Rolled back {} migration(s)", reverted);
            return Ok(());
        }

        println!("Running database migrations...");
        let applied = run_pending_migrations(url).await?;
        tracing::info!(count = applied.len(), "Migrations applied");
        if applied.is_empty() {
            println!("✓ No migrations to apply - database is already up to date");
        } else {
            println!("✓ Applied {} migration(s):", applied.len());
            for version in &applied {
                println!("  - {}", version);
            }
        }

        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[tokio::test]
    async fn test_missing_database_url_is_rejected() {
        let handler = MigrateCommandHandler::new(Settings::default());
        assert!(matches!(
            handler.execute(false, None).await,
            Err(AppError::Configuration { .. })
        ));
    }

    #[tokio::test]
    async fn test_zero_rollback_steps_rejected_before_connecting() {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/vacation_unused".to_string();
        let handler = MigrateCommandHandler::new(config);

        assert!(matches!(
            handler.execute(false, Some(0)).await,
            Err(AppError::ValidationFailed { .. })
        ));
    }
}
