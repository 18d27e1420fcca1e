use std::{future::Future, time::Duration};

use anyhow::Result;
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    config::DbConfig,
    error::{AppError, AppResult},
};

pub type DbPool = PgPool;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// How often and how patiently the connector retries at startup.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 10,
            delay: Duration::from_secs(2),
        }
    }
}

/// Opens the shared pool, retrying per `policy`. The pool lives until the
/// service shuts down; nothing after startup is retried.
pub async fn connect_with_retry(config: &DbConfig, policy: RetryPolicy) -> Result<DbPool> {
    let options = config.connect_options();
    let pool = retry(policy, || {
        PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options.clone())
    })
    .await?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        database = %config.database,
        "connected to database"
    );
    Ok(pool)
}

pub async fn retry<T, E, F, Fut>(policy: RetryPolicy, mut connect: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;
    loop {
        match connect().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt >= attempts => {
                return Err(anyhow::Error::new(err).context(format!(
                    "unable to connect to database after {attempts} attempts"
                )));
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "unable to connect to database (attempt {attempt}/{attempts})"
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
        }
    }
}

pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Runs one database call under the request deadline.
pub async fn with_deadline<T, F>(limit: Duration, query: F) -> AppResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, query).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(AppError::Timeout(limit)),
    }
}
