use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use log;

use crate::app_state::AppState;
use crate::database::reports;
use crate::models::ReputationResponse;
use crate::services::reputation::reputation_score;

/// Recomputes the reporter's score from their full history on every call.
/// The value stored on each report is a point-in-time snapshot and may
/// differ.
pub async fn get_reputation(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ReputationResponse>, (StatusCode, String)> {
    match reports::fetch_reporter_history(&state.pool, &user_id).await {
        Ok(history) => {
            let reputation = reputation_score(&history);
            Ok(Json(ReputationResponse {
                user_id,
                reputation,
                report_count: history.len(),
            }))
        }
        Err(e) => {
            log::error!("Failed to fetch report history for {}: {}", user_id, e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
