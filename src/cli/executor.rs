//! Dispatches a parsed command to its handler.

use super::handlers::{MigrateCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::{Environment, Settings};
use crate::error::{AppError, AppResult};

/// Port numbers below this need elevated privileges on most systems.
const PRIVILEGED_PORT_LIMIT: u16 = 1024;

/// Execute a CLI command with the given settings
///
/// Running without a subcommand is the same as `serve`.
///
/// # Arguments
/// * `cli` - Parsed CLI arguments
/// * `settings` - Merged and validated settings
/// * `environment` - Environment the settings were loaded for
///
/// # Errors
/// Returns argument validation errors or whatever the handler fails with
pub async fn execute_command(
    cli: &Cli,
    settings: Settings,
    environment: Environment,
) -> AppResult<()> {
    validate_command_args(cli)?;

    match &cli.command {
        Some(Commands::Serve { dry_run, .. }) => {
            warn_on_privileged_port(&settings);
            ServeCommandHandler::new(settings, environment)
                .execute(*dry_run)
                .await
        }
        None => {
            warn_on_privileged_port(&settings);
            ServeCommandHandler::new(settings, environment)
                .execute(false)
                .await
        }
        Some(Commands::Migrate { dry_run, rollback }) => {
            MigrateCommandHandler::new(settings)
                .execute(*dry_run, *rollback)
                .await
        }
    }
}

fn validate_command_args(cli: &Cli) -> AppResult<()> {
    cli.validate()
        .map_err(|reason| AppError::validation("cli_arguments", reason))
}

fn warn_on_privileged_port(settings: &Settings) {
    if settings.server.port < PRIVILEGED_PORT_LIMIT {
        tracing::warn!(
            port = settings.server.port,
            "Binding to a privileged port typically requires root privileges"
        );
    }
}
