use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use log;
use serde::Deserialize;

use crate::app_state::AppState;
use crate::database::reports::{self, ReportFilter};
use crate::models::{
    CheckDuplicatesRequest, CheckDuplicatesResponse, ConfirmationRequiredResponse, IncidentType,
    ListReportsResponse, ReportStatus, SubmitReportRequest, SubmitReportResponse,
    UpdateStatusRequest,
};
use crate::services::duplicates::{find_similar, warning_summary, Draft, WARNING_LIMIT};
use crate::services::submission::{self, SubmissionOutcome, SubmitFailure};

pub async fn submit_report(
    State(state): State<AppState>,
    Json(request): Json<SubmitReportRequest>,
) -> Response {
    match submission::submit(&state, request).await {
        Ok(SubmissionOutcome::Created(report)) => {
            let response = SubmitReportResponse {
                id: report.id,
                status: report.status,
                priority: report.priority,
                reporter_reputation: report.reporter_reputation,
                related_reports: report.related_reports,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Ok(SubmissionOutcome::ConfirmationRequired { gate, similar }) => {
            let response = ConfirmationRequiredResponse {
                gate: gate.as_str().to_string(),
                message: gate.message().to_string(),
                similar_reports: similar.iter().take(WARNING_LIMIT).map(warning_summary).collect(),
            };
            (StatusCode::CONFLICT, Json(response)).into_response()
        }
        Err(SubmitFailure::Invalid(e)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response()
        }
        Err(SubmitFailure::Internal(e)) => {
            log::error!("Failed to submit report: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to submit report".to_string(),
            )
                .into_response()
        }
    }
}

pub async fn check_duplicates(
    State(state): State<AppState>,
    Json(request): Json<CheckDuplicatesRequest>,
) -> Json<CheckDuplicatesResponse> {
    let draft = Draft {
        reporter_id: &request.reporter_id,
        incident_type: request.incident_type,
        title: &request.title,
        description: &request.description,
        coordinates: request.coordinates,
    };
    let matches = find_similar(
        &state.duplicate_policy,
        &draft,
        &state.cache.get_candidates(),
        Utc::now(),
    );

    Json(CheckDuplicatesResponse {
        total_matches: matches.len(),
        similar_reports: matches.iter().take(WARNING_LIMIT).map(warning_summary).collect(),
    })
}

#[derive(Debug, Deserialize)]
pub struct ListReportsQuery {
    pub status: Option<String>,
    pub incident_type: Option<String>,
    pub reporter_id: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

pub async fn list_reports(
    State(state): State<AppState>,
    Query(params): Query<ListReportsQuery>,
) -> Result<Json<ListReportsResponse>, (StatusCode, String)> {
    let status = match &params.status {
        Some(value) => Some(
            ReportStatus::parse(value)
                .ok_or_else(|| (StatusCode::BAD_REQUEST, format!("Unknown status: {}", value)))?,
        ),
        None => None,
    };
    let incident_type = match &params.incident_type {
        Some(value) => Some(IncidentType::parse(value).ok_or_else(|| {
            (StatusCode::BAD_REQUEST, format!("Unknown incident type: {}", value))
        })?),
        None => None,
    };

    let filter = ReportFilter {
        status,
        incident_type,
        reporter_id: params.reporter_id.clone(),
    };
    let limit = params.limit.unwrap_or(20).min(100); // Cap at 100
    let offset = params.offset.unwrap_or(0);

    let total = match reports::count_reports(&state.pool, &filter).await {
        Ok(count) => count,
        Err(e) => {
            log::error!("Failed to count reports: {}", e);
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    let items = match reports::list_reports(&state.pool, &filter, limit, offset).await {
        Ok(items) => items,
        Err(e) => {
            log::error!("Failed to list reports: {}", e);
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    Ok(Json(ListReportsResponse {
        reports: items,
        total,
        limit,
        offset,
    }))
}

pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match reports::get_report(&state.pool, &id).await {
        Ok(Some(report)) => (StatusCode::OK, Json(report)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, format!("No report with id {}", id)).into_response(),
        Err(e) => {
            log::error!("Failed to fetch report {}: {}", id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

pub async fn update_report_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Response {
    let updated = match reports::update_status(
        &state.pool,
        &id,
        request.status,
        request.priority,
        request.government_response.as_deref(),
    )
    .await
    {
        Ok(updated) => updated,
        Err(e) => {
            log::error!("Failed to update report {}: {}", id, e);
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    if !updated {
        return (StatusCode::NOT_FOUND, format!("No report with id {}", id)).into_response();
    }

    match reports::get_report(&state.pool, &id).await {
        Ok(Some(report)) => (StatusCode::OK, Json(report)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, format!("No report with id {}", id)).into_response(),
        Err(e) => {
            log::error!("Failed to fetch report {} after update: {}", id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

pub async fn get_evidence_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match state.evidence.state_of(&id) {
        Some(attachment) => (StatusCode::OK, Json(attachment)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            format!("No evidence attachment tracked for report {}", id),
        )
            .into_response(),
    }
}
