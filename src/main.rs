use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use taskmate::cli::{self, Cli};
use taskmate::{Config, Database, Profile};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    // Tracing is opt-in via RUST_LOG
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| EnvFilter::try_new(raw.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new("off"));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Determine profile: --dev flag enables dev mode, otherwise use prod
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    // Load configuration with the determined profile
    let config = Config::load_with_profile(profile)?;
    let user_id = cli.user.unwrap_or(config.default_user_id);

    // Initialize database
    let db_path = config.get_database_path();
    let db_path = db_path
        .to_str()
        .ok_or_else(|| color_eyre::eyre::eyre!("Database path contains invalid UTF-8"))?;
    let db = Database::new(db_path)?;

    // Dispatch to the command handler
    cli::dispatch(
        cli.command,
        &db,
        user_id,
        db_path,
        Duration::from_secs(config.sweep_interval_secs.max(1)),
    )?;

    Ok(())
}
