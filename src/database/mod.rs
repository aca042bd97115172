pub mod reports;
pub mod schema;

use anyhow::{Context, Result};
use log;
use sqlx::{pool::PoolOptions, MySql, Pool};
use std::time::Duration;

const MAX_RETRIES: u32 = 10;
const INITIAL_RETRY_DELAY_SECS: u64 = 2;
const MAX_RETRY_DELAY_SECS: u64 = 30;

pub async fn create_pool(config: &crate::config::Config) -> Result<Pool<MySql>> {
    let database_url = format!(
        "mysql://{}:{}@{}:{}/{}?parseTime=true&multiStatements=true&charset=utf8mb4&collation=utf8mb4_unicode_ci",
        config.db_user, config.db_password, config.db_host, config.db_port, config.db_name
    );
    log::info!(
        "Database URL constructed (password hidden): mysql://{}:***@{}:{}/{}",
        config.db_user,
        config.db_host,
        config.db_port,
        config.db_name
    );

    let mut last_error = None;

    for attempt in 1..=MAX_RETRIES {
        log::info!("Connection attempt {} of {}", attempt, MAX_RETRIES);

        let pool_options = PoolOptions::<MySql>::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800));

        match pool_options.connect(&database_url).await {
            Ok(pool) => match sqlx::query("SELECT 1").fetch_one(&pool).await {
                Ok(_) => {
                    log::info!(
                        "Database connected successfully to {}:{}/{}",
                        config.db_host,
                        config.db_port,
                        config.db_name
                    );
                    return Ok(pool);
                }
                Err(e) => {
                    log::warn!("Connection pool created but test query failed: {}. Retrying...", e);
                    last_error = Some(anyhow::anyhow!("{}", e));
                }
            },
            Err(e) => {
                log::warn!("Connection attempt {} failed: {}", attempt, e);
                last_error = Some(anyhow::anyhow!("{}", e));
            }
        }

        if attempt < MAX_RETRIES {
            // Exponential backoff: 2s, 4s, 8s, 16s, 30s (capped), 30s, ...
            let delay_secs = std::cmp::min(
                INITIAL_RETRY_DELAY_SECS * (1u64 << (attempt - 1)),
                MAX_RETRY_DELAY_SECS,
            );
            log::info!("Waiting {} seconds before next attempt...", delay_secs);
            tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("Failed to connect after {} attempts", MAX_RETRIES)))
        .context("Failed to establish database connection after all retries")
}
