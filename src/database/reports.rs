use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use sqlx::{MySql, Pool, Row};

use crate::models::{
    AccuracyBlock, Coordinates, IncidentReport, IncidentType, Priority, ReportStanding,
    ReportStatus, ReportSummary, StatusCount, TypeCount,
};

fn report_from_row(row: &sqlx::mysql::MySqlRow) -> Result<IncidentReport> {
    let incident_type: String = row.get("incident_type");
    let status: String = row.get("status");
    let priority: String = row.get("priority");
    let photos: String = row.get("photos");
    let flag_reasons: String = row.get("flag_reasons");
    let related_reports: String = row.get("related_reports");
    let latitude: Option<f64> = row.get("latitude");
    let longitude: Option<f64> = row.get("longitude");

    let coordinates = match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => Some(Coordinates {
            latitude,
            longitude,
        }),
        _ => None,
    };

    Ok(IncidentReport {
        id: row.get("id"),
        reporter_id: row.get("reporter_id"),
        reporter_name: row.get("reporter_name"),
        reporter_email: row.get("reporter_email"),
        incident_type: IncidentType::parse(&incident_type)
            .ok_or_else(|| anyhow!("Unknown incident type in database: {}", incident_type))?,
        title: row.get("title"),
        description: row.get("description"),
        address: row.get("address"),
        coordinates,
        photos: serde_json::from_str(&photos).unwrap_or_default(),
        status: ReportStatus::parse(&status)
            .ok_or_else(|| anyhow!("Unknown report status in database: {}", status))?,
        priority: Priority::parse(&priority)
            .ok_or_else(|| anyhow!("Unknown priority in database: {}", priority))?,
        government_response: row.get("government_response"),
        resolved_at: row.get("resolved_at"),
        verified: row.get("verified"),
        accuracy: AccuracyBlock {
            community_votes: row.get("community_votes"),
            upvotes: row.get("upvotes"),
            downvotes: row.get("downvotes"),
            flags: row.get("flags"),
            flag_reasons: serde_json::from_str(&flag_reasons).unwrap_or_default(),
        },
        related_reports: serde_json::from_str(&related_reports).unwrap_or_default(),
        is_duplicate: row.get("is_duplicate"),
        reporter_reputation: row.get("reporter_reputation"),
        timestamp: row.get("ts"),
        last_updated: row.get("last_updated"),
    })
}

/// Inserts the skeleton row for a freshly submitted report. Photos are empty
/// at this point; the evidence attachment step patches them in later.
pub async fn insert_report(pool: &Pool<MySql>, report: &IncidentReport) -> Result<()> {
    sqlx::query(
        "INSERT INTO incident_reports
         (id, reporter_id, reporter_name, reporter_email, incident_type, title, description,
          address, latitude, longitude, photos, status, priority, verified,
          community_votes, upvotes, downvotes, flags, flag_reasons, related_reports,
          is_duplicate, reporter_reputation)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&report.id)
    .bind(&report.reporter_id)
    .bind(&report.reporter_name)
    .bind(&report.reporter_email)
    .bind(report.incident_type.as_str())
    .bind(&report.title)
    .bind(&report.description)
    .bind(&report.address)
    .bind(report.coordinates.map(|c| c.latitude))
    .bind(report.coordinates.map(|c| c.longitude))
    .bind(serde_json::to_string(&report.photos)?)
    .bind(report.status.as_str())
    .bind(report.priority.as_str())
    .bind(report.verified)
    .bind(report.accuracy.community_votes)
    .bind(report.accuracy.upvotes)
    .bind(report.accuracy.downvotes)
    .bind(report.accuracy.flags)
    .bind(serde_json::to_string(&report.accuracy.flag_reasons)?)
    .bind(serde_json::to_string(&report.related_reports)?)
    .bind(report.is_duplicate)
    .bind(report.reporter_reputation)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_report(pool: &Pool<MySql>, id: &str) -> Result<Option<IncidentReport>> {
    let row = sqlx::query("SELECT * FROM incident_reports WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => Ok(Some(report_from_row(&row)?)),
        None => Ok(None),
    }
}

#[derive(Debug, Default)]
pub struct ReportFilter {
    pub status: Option<ReportStatus>,
    pub incident_type: Option<IncidentType>,
    pub reporter_id: Option<String>,
}

fn filter_clause(filter: &ReportFilter) -> (String, Vec<String>) {
    let mut clauses = Vec::new();
    let mut binds = Vec::new();

    if let Some(status) = filter.status {
        clauses.push("status = ?");
        binds.push(status.as_str().to_string());
    }
    if let Some(incident_type) = filter.incident_type {
        clauses.push("incident_type = ?");
        binds.push(incident_type.as_str().to_string());
    }
    if let Some(reporter_id) = &filter.reporter_id {
        clauses.push("reporter_id = ?");
        binds.push(reporter_id.clone());
    }

    let clause = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };
    (clause, binds)
}

pub async fn list_reports(
    pool: &Pool<MySql>,
    filter: &ReportFilter,
    limit: u64,
    offset: u64,
) -> Result<Vec<IncidentReport>> {
    let (clause, binds) = filter_clause(filter);
    let query = format!(
        "SELECT * FROM incident_reports{} ORDER BY ts DESC LIMIT ? OFFSET ?",
        clause
    );

    let mut query_builder = sqlx::query(&query);
    for bind in &binds {
        query_builder = query_builder.bind(bind);
    }
    query_builder = query_builder.bind(limit as i64).bind(offset as i64);

    let rows = query_builder.fetch_all(pool).await?;

    let mut reports = Vec::with_capacity(rows.len());
    for row in rows {
        reports.push(report_from_row(&row)?);
    }
    Ok(reports)
}

pub async fn count_reports(pool: &Pool<MySql>, filter: &ReportFilter) -> Result<u64> {
    let (clause, binds) = filter_clause(filter);
    let query = format!("SELECT COUNT(*) FROM incident_reports{}", clause);

    let mut query_builder = sqlx::query_scalar::<_, i64>(&query);
    for bind in &binds {
        query_builder = query_builder.bind(bind);
    }

    let count = query_builder.fetch_one(pool).await?;
    Ok(count as u64)
}

/// Government review update. Sets `resolved_at` when the new status is
/// resolved and clears it otherwise. Last write wins; there is no
/// optimistic-concurrency token.
pub async fn update_status(
    pool: &Pool<MySql>,
    id: &str,
    status: ReportStatus,
    priority: Option<Priority>,
    government_response: Option<&str>,
) -> Result<bool> {
    let resolved_at: Option<DateTime<Utc>> = if status == ReportStatus::Resolved {
        Some(Utc::now())
    } else {
        None
    };

    let result = sqlx::query(
        "UPDATE incident_reports
         SET status = ?,
             priority = COALESCE(?, priority),
             government_response = COALESCE(?, government_response),
             resolved_at = ?
         WHERE id = ?",
    )
    .bind(status.as_str())
    .bind(priority.map(|p| p.as_str()))
    .bind(government_response)
    .bind(resolved_at)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Patches the photo URL list after evidence attachment completes.
pub async fn update_photos(pool: &Pool<MySql>, id: &str, urls: &[String]) -> Result<()> {
    sqlx::query("UPDATE incident_reports SET photos = ? WHERE id = ?")
        .bind(serde_json::to_string(urls)?)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Full candidate pool for the duplicate-detection cache.
pub async fn fetch_summaries(pool: &Pool<MySql>) -> Result<Vec<ReportSummary>> {
    let rows = sqlx::query(
        "SELECT id, reporter_id, incident_type, title, description, address,
                latitude, longitude, ts
         FROM incident_reports",
    )
    .fetch_all(pool)
    .await?;

    let mut summaries = Vec::with_capacity(rows.len());
    for row in rows {
        let incident_type: String = row.get("incident_type");
        let latitude: Option<f64> = row.get("latitude");
        let longitude: Option<f64> = row.get("longitude");
        summaries.push(ReportSummary {
            id: row.get("id"),
            reporter_id: row.get("reporter_id"),
            incident_type: IncidentType::parse(&incident_type)
                .ok_or_else(|| anyhow!("Unknown incident type in database: {}", incident_type))?,
            title: row.get("title"),
            description: row.get("description"),
            address: row.get("address"),
            coordinates: match (latitude, longitude) {
                (Some(latitude), Some(longitude)) => Some(Coordinates {
                    latitude,
                    longitude,
                }),
                _ => None,
            },
            created_at: row.get("ts"),
        });
    }
    Ok(summaries)
}

/// A reporter's full history, reduced to the fields reputation scoring needs.
pub async fn fetch_reporter_history(
    pool: &Pool<MySql>,
    reporter_id: &str,
) -> Result<Vec<ReportStanding>> {
    let rows = sqlx::query(
        "SELECT verified, status, upvotes, downvotes, flags
         FROM incident_reports WHERE reporter_id = ?",
    )
    .bind(reporter_id)
    .fetch_all(pool)
    .await?;

    let mut history = Vec::with_capacity(rows.len());
    for row in rows {
        let status: String = row.get("status");
        history.push(ReportStanding {
            verified: row.get("verified"),
            status: ReportStatus::parse(&status)
                .ok_or_else(|| anyhow!("Unknown report status in database: {}", status))?,
            upvotes: row.get("upvotes"),
            downvotes: row.get("downvotes"),
            flags: row.get("flags"),
        });
    }
    Ok(history)
}

pub async fn count_by_status(pool: &Pool<MySql>) -> Result<Vec<StatusCount>> {
    let rows = sqlx::query(
        "SELECT status, COUNT(*) AS count FROM incident_reports GROUP BY status",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| StatusCount {
            status: row.get("status"),
            count: row.get("count"),
        })
        .collect())
}

pub async fn count_by_type(pool: &Pool<MySql>) -> Result<Vec<TypeCount>> {
    let rows = sqlx::query(
        "SELECT incident_type, COUNT(*) AS count FROM incident_reports GROUP BY incident_type",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| TypeCount {
            incident_type: row.get("incident_type"),
            count: row.get("count"),
        })
        .collect())
}

pub async fn count_total(pool: &Pool<MySql>) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM incident_reports")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
