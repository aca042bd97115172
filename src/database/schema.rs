use anyhow::Result;
use sqlx::{MySql, Pool};
use tracing::info;

pub async fn initialize_schema(pool: &Pool<MySql>) -> Result<()> {
    info!("Initializing database schema...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS incident_reports (
            id VARCHAR(36) NOT NULL PRIMARY KEY,
            reporter_id VARCHAR(256) NOT NULL,
            reporter_name VARCHAR(256) NOT NULL,
            reporter_email VARCHAR(256) NOT NULL,
            incident_type VARCHAR(32) NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            address TEXT NOT NULL,
            latitude DOUBLE NULL,
            longitude DOUBLE NULL,
            photos TEXT NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'pending',
            priority VARCHAR(16) NOT NULL DEFAULT 'low',
            government_response TEXT NULL,
            resolved_at TIMESTAMP NULL,
            verified BOOLEAN NOT NULL DEFAULT FALSE,
            community_votes INT UNSIGNED NOT NULL DEFAULT 0,
            upvotes INT UNSIGNED NOT NULL DEFAULT 0,
            downvotes INT UNSIGNED NOT NULL DEFAULT 0,
            flags INT UNSIGNED NOT NULL DEFAULT 0,
            flag_reasons TEXT NOT NULL,
            related_reports TEXT NOT NULL,
            is_duplicate BOOLEAN NOT NULL DEFAULT FALSE,
            reporter_reputation INT NOT NULL DEFAULT 100,
            ts TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            last_updated TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
            INDEX idx_reporter_id (reporter_id),
            INDEX idx_status (status),
            INDEX idx_incident_type (incident_type),
            INDEX idx_ts (ts)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully");
    Ok(())
}
