//! Jobs command - Email queue management.
//!
//! - `work`: start the email worker
//! - `list`: show queued jobs by status
//! - `clear`: remove failed and killed jobs
//!
//! ## Usage
//!
//! ```bash
//! cargo run -- jobs work
//! cargo run -- jobs list
//! cargo run -- jobs clear
//! ```

use apalis_sql::mysql::MysqlStorage;
use apalis_sql::sqlx::mysql::MySqlPoolOptions;
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};

use crate::cli::args::{JobsAction, JobsArgs};
use crate::config::{Config, EMAIL_WORKER_NAME, JOB_POOL_MAX_CONNECTIONS};
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, SmtpMailer};
use crate::jobs::{email_job_handler, EmailJob};

/// Execute the jobs command
pub async fn execute(args: JobsArgs, config: Config) -> AppResult<()> {
    match args.action {
        JobsAction::Work => run_worker(&config).await,
        JobsAction::List => list_jobs(&config).await,
        JobsAction::Clear => clear_failed_jobs(&config).await,
    }
}

/// Open the job pool and make sure the queue tables exist.
pub async fn email_storage(config: &Config) -> AppResult<MysqlStorage<EmailJob>> {
    let pool = MySqlPoolOptions::new()
        .max_connections(JOB_POOL_MAX_CONNECTIONS)
        .connect(&config.database_url)
        .await
        .map_err(|e| AppError::internal(format!("Failed to connect job pool: {}", e)))?;

    MysqlStorage::setup(&pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to setup job storage: {}", e)))?;

    Ok(MysqlStorage::new(pool))
}

/// Start the email worker
///
/// Delivers queued mail through the configured SMTP relay, or logs it
/// when no relay is configured.
async fn run_worker(config: &Config) -> AppResult<()> {
    use apalis::prelude::*;

    let mailer = SmtpMailer::from_settings(&config.mail)?;
    if mailer.is_log_only() {
        tracing::warn!("SMTP_HOST not set, emails will be logged instead of sent");
    }

    let storage = email_storage(config).await?;

    tracing::info!(worker = EMAIL_WORKER_NAME, "Job worker started. Press Ctrl+C to stop.");

    let worker = WorkerBuilder::new(EMAIL_WORKER_NAME)
        .data(mailer)
        .backend(storage)
        .build_fn(email_job_handler);

    let monitor = Monitor::new().register(worker);

    tokio::select! {
        result = monitor.run() => {
            if let Err(e) = result {
                tracing::error!("Worker error: {}", e);
                return Err(AppError::internal(format!("Worker failed: {}", e)));
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping worker...");
        }
    }

    tracing::info!("Job worker stopped.");
    Ok(())
}

/// Whether the queue table has been created in the current schema.
async fn queue_exists(db: &DatabaseConnection) -> AppResult<bool> {
    let row = db
        .query_one(Statement::from_string(
            db.get_database_backend(),
            "SELECT COUNT(*) AS found FROM information_schema.tables \
             WHERE table_schema = DATABASE() AND table_name = 'jobs'"
                .to_string(),
        ))
        .await?;

    Ok(row
        .and_then(|r| r.try_get::<i64>("", "found").ok())
        .map(|found| found > 0)
        .unwrap_or(false))
}

/// List jobs by status
async fn list_jobs(config: &Config) -> AppResult<()> {
    let db = Database::connect(config).await?;
    let conn = db.connection();

    if !queue_exists(conn).await? {
        println!("\n=== Job Queue Status ===");
        println!("Job queue not initialized.");
        println!("Run 'jobs work' or 'serve' first to create the queue tables.");
        println!("========================\n");
        return db.close().await.map_err(AppError::from);
    }

    let rows = conn
        .query_all(Statement::from_string(
            conn.get_database_backend(),
            "SELECT status, COUNT(*) AS count FROM jobs GROUP BY status".to_string(),
        ))
        .await?;

    println!("\n=== Job Queue Status ===");
    if rows.is_empty() {
        println!("Queue is empty.");
    }
    for row in rows {
        if let (Ok(status), Ok(count)) = (
            row.try_get::<String>("", "status"),
            row.try_get::<i64>("", "count"),
        ) {
            println!("{:<9} {}", format!("{}:", status), count);
        }
    }
    println!("========================\n");

    db.close().await?;
    Ok(())
}

/// Clear failed and killed jobs from the queue
async fn clear_failed_jobs(config: &Config) -> AppResult<()> {
    let db = Database::connect(config).await?;
    let conn = db.connection();

    if !queue_exists(conn).await? {
        println!("Job queue not initialized. Nothing to clear.");
        return db.close().await.map_err(AppError::from);
    }

    let result = conn
        .execute(Statement::from_string(
            conn.get_database_backend(),
            "DELETE FROM jobs WHERE status IN ('Failed', 'Killed')".to_string(),
        ))
        .await?;

    println!(
        "Cleared {} failed job(s) from the queue.",
        result.rows_affected()
    );

    db.close().await?;
    Ok(())
}
