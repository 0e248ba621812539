//! Serve command handler
//!
//! Validates configuration for `--dry-run`, otherwise starts the HTTP server.

use crate::config::{Environment, Settings};
use crate::error::AppResult;
use crate::server::Server;

/// Handler for the serve command
pub struct ServeCommandHandler {
    config: Settings,
    environment: Environment,
}

impl ServeCommandHandler {
    pub fn new(config: Settings, environment: Environment) -> Self {
        Self {
            config,
            environment,
        }
    }

    /// Execute the serve command
    ///
    /// # Arguments
    /// * `dry_run` - If true, validates configuration and exits without starting the server
    ///
    /// # Errors
    /// - Configuration validation errors
    /// - Server startup and runtime errors (if not dry-run)
    pub async fn execute(self, dry_run: bool) -> AppResult<()> {
        if dry_run {
            return self.validate_only();
        }

        self.config.validate()?;
        Server::new(self.config, self.environment).run().await?;
        Ok(())
    }

    /// Validate configuration without starting the server
    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;

        println!("✓ Configuration is valid ({})", self.environment);
        println!("✓ Server would bind to: {}", self.config.server.address());
        println!(
            "✓ Request timeout: {}s",
            self.config.server.request_timeout
        );
        println!(
            "✓ Database pool: {}-{} connections",
            self.config.database.min_connections, self.config.database.max_connections
        );
        println!(
            "✓ Tokens expire after {} hour(s)",
            self.config.jwt.token_expiration
        );
        println!("Dry run completed successfully - configuration is ready for deployment");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
