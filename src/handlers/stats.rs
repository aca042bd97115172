use axum::{extract::State, http::StatusCode, response::Json};
use log;

use crate::app_state::AppState;
use crate::database::reports;
use crate::models::StatsResponse;

/// Aggregate counts for the portal dashboards.
pub async fn get_stats(
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, (StatusCode, String)> {
    let total_reports = match reports::count_total(&state.pool).await {
        Ok(total) => total,
        Err(e) => {
            log::error!("Failed to count reports: {}", e);
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    let by_status = match reports::count_by_status(&state.pool).await {
        Ok(counts) => counts,
        Err(e) => {
            log::error!("Failed to count reports by status: {}", e);
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    let by_type = match reports::count_by_type(&state.pool).await {
        Ok(counts) => counts,
        Err(e) => {
            log::error!("Failed to count reports by type: {}", e);
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    Ok(Json(StatsResponse {
        total_reports,
        by_status,
        by_type,
    }))
}
