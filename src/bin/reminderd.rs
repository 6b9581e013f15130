use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use std::sync::Arc;
use tokio::sync::watch;

use courtside::core::Config;
use courtside::notify::HttpMailer;
use courtside::scheduler::ReminderScheduler;
use courtside::store::SqliteStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting pickup reminder daemon...");

    let store = Arc::new(SqliteStore::open(&config.database_path)?);
    info!("Opened reservation database at {}", config.database_path);

    let mailer = Arc::new(HttpMailer::new(
        config.mail_api_url.clone(),
        config.mail_api_token.clone(),
        config.mail_sender.clone(),
    )?);

    let scheduler = ReminderScheduler::new(store, mailer, &config);

    // Ctrl-C flips the watch channel; an in-flight tick finishes first.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let loop_handle = tokio::spawn(scheduler.run(shutdown_rx));

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
    }
    info!("Shutdown signal received");

    // Send only fails once the scheduler task has already exited.
    let _ = shutdown_tx.send(true);
    if let Err(e) = loop_handle.await {
        error!("Scheduler task ended abnormally: {e}");
    }

    info!("Pickup reminder daemon stopped");
    Ok(())
}
