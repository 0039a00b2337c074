mod cli;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use rusqlite::Connection;

use cli::args::{Cli, Commands};
use cli::handlers;
use ramadan_faith::config::AppConfig;
use ramadan_faith::db::{ProfileRepo, run_migrations};
use ramadan_faith::goals::service::roll_period_scores;
use ramadan_faith::models::UserId;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Loading config")?;
    let user = UserId::new(cli.user.clone().unwrap_or_else(|| config.user.id.clone()));

    // Ensure data directory exists and open DB
    AppConfig::ensure_data_dir()?;
    let db_path = AppConfig::db_path()?;
    let conn = Connection::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;

    // Enable WAL mode for better concurrent access
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    // Run migrations on every startup
    run_migrations(&conn)?;

    ProfileRepo::get_or_create(&conn, &user, &config.user.name)?;
    if let Err(e) = roll_period_scores(&conn, &user, Local::now().date_naive()) {
        log::warn!("Could not roll period scores: {:#}", e);
    }

    match cli.command {
        Some(Commands::Times { at, month }) => {
            handlers::handle_times(&config, at.as_deref(), month)?;
        }
        Some(Commands::Schedule) => {
            handlers::handle_schedule()?;
        }
        Some(Commands::Quran { action }) => {
            handlers::handle_quran(&conn, &config, &user, &action)?;
        }
        Some(Commands::Azkar { action }) => {
            handlers::handle_azkar(&conn, &config, &user, &action)?;
        }
        Some(Commands::Profile { action }) => {
            handlers::handle_profile(&conn, &config, &user, action.as_ref())?;
        }
        // No subcommand → home view: prayer countdown
        None => {
            handlers::handle_times(&config, None, None)?;
        }
    }

    Ok(())
}
