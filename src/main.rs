use clap::Parser;

use vacation_planner::cli::{Cli, execute_command, init_logger_from_settings, load_and_merge_config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (settings, environment) = load_and_merge_config(&cli)?;
    init_logger_from_settings(&settings)?;

    tracing::debug!(version = vacation_planner::pkg_version(), "Configuration loaded");

    execute_command(&cli, settings, environment).await?;
    Ok(())
}
