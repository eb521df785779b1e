//! Database pool and migrations
//!
//! The server may start before PostgreSQL accepts connections (compose,
//! k8s), so [`connect`] retries with a doubling delay before giving up.

use crate::config::DatabaseConfig;
use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

const APPLICATION_NAME: &str = "recipe-api";
const IDLE_TIMEOUT: Duration = Duration::from_secs(600);
const MAX_LIFETIME: Duration = Duration::from_secs(1800);
const INITIAL_RETRY_DELAY: Duration = Duration::from_millis(500);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(8);

/// Delay before retry number `attempt` (1-based)
fn retry_delay(attempt: u32) -> Duration {
    let factor = 1u32 << attempt.saturating_sub(1).min(16);
    INITIAL_RETRY_DELAY
        .saturating_mul(factor)
        .min(MAX_RETRY_DELAY)
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections.min(config.max_connections))
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(IDLE_TIMEOUT)
        .max_lifetime(MAX_LIFETIME)
        .test_before_acquire(true)
}

/// Open the connection pool, retrying up to `connect_retries` times
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool> {
    let options = PgConnectOptions::from_str(&config.url)
        .context("Invalid database URL")?
        .application_name(APPLICATION_NAME);

    let mut attempt = 0;
    loop {
        match pool_options(config).connect_with(options.clone()).await {
            Ok(pool) => {
                info!(
                    max = config.max_connections,
                    min = config.min_connections,
                    "Database pool created"
                );
                return Ok(pool);
            }
            Err(e) if attempt < config.connect_retries => {
                attempt += 1;
                let delay = retry_delay(attempt);
                warn!(
                    attempt,
                    retries = config.connect_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Database not reachable, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e).context("Failed to connect to database"),
        }
    }
}

/// Apply the embedded migrations
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run migrations")?;
    info!("Database migrations completed");
    Ok(())
}

/// Round-trip a trivial query
pub async fn health_check(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(|e| {
            warn!("Database health check failed: {}", e);
            e.into()
        })
}
