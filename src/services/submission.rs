use base64::Engine;
use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::models::{
    AccuracyBlock, IncidentReport, PhotoPayload, ReportStatus, ReportSummary, SubmitReportRequest,
};
use crate::database::reports;
use crate::services::duplicates::{find_similar, Draft};
use crate::services::evidence::{attach_evidence, DecodedPhoto};
use crate::services::priority::priority_for;
use crate::services::reputation::reputation_score;

#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("GPS coordinates are required")]
    MissingCoordinates,
    #[error("Coordinates are out of range")]
    InvalidCoordinates,
    #[error("Invalid photo payload: {0}")]
    InvalidPhoto(String),
}

#[derive(Error, Debug)]
pub enum SubmitFailure {
    #[error(transparent)]
    Invalid(#[from] SubmissionError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// An advisory interruption the submitter can override by acknowledging it.
/// Not an error: the draft is unchanged and resubmission with the matching
/// acknowledgement proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    NoPhotos,
    PossibleDuplicate,
}

impl Gate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gate::NoPhotos => "no-photos",
            Gate::PossibleDuplicate => "possible-duplicate",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Gate::NoPhotos => {
                "Reports with photos have higher credibility. Continue without photos?"
            }
            Gate::PossibleDuplicate => {
                "Similar reports were found nearby. Is this a different incident?"
            }
        }
    }
}

pub enum SubmissionOutcome {
    ConfirmationRequired {
        gate: Gate,
        similar: Vec<ReportSummary>,
    },
    Created(IncidentReport),
}

/// Field validation in the fixed order: title, description, address, then
/// coordinate presence and range. First failure blocks submission.
pub fn validate(request: &SubmitReportRequest) -> Result<(), SubmissionError> {
    if request.title.trim().is_empty() {
        return Err(SubmissionError::MissingField("title"));
    }
    if request.description.trim().is_empty() {
        return Err(SubmissionError::MissingField("description"));
    }
    if request.address.trim().is_empty() {
        return Err(SubmissionError::MissingField("address"));
    }
    match request.coordinates {
        None => Err(SubmissionError::MissingCoordinates),
        Some(coordinates) if !coordinates.is_valid() => Err(SubmissionError::InvalidCoordinates),
        Some(_) => Ok(()),
    }
}

/// First unacknowledged gate, in order: the no-photo confirmation, then the
/// duplicate confirmation. None means the submission may proceed.
pub fn blocked_gate(request: &SubmitReportRequest, similar: &[ReportSummary]) -> Option<Gate> {
    if request.photos.is_empty() && !request.acknowledge_no_photos {
        return Some(Gate::NoPhotos);
    }
    if !similar.is_empty() && !request.acknowledge_duplicates {
        return Some(Gate::PossibleDuplicate);
    }
    None
}

fn decode_photos(payloads: &[PhotoPayload]) -> Result<Vec<DecodedPhoto>, SubmissionError> {
    let engine = base64::engine::general_purpose::STANDARD;
    payloads
        .iter()
        .map(|payload| {
            let bytes = engine
                .decode(&payload.data_base64)
                .map_err(|e| SubmissionError::InvalidPhoto(format!("{}: {}", payload.file_name, e)))?;
            Ok(DecodedPhoto {
                file_name: payload.file_name.clone(),
                content_type: payload.content_type.clone(),
                bytes,
            })
        })
        .collect()
}

/// The submission pipeline: validate, re-run the duplicate check against the
/// current candidate snapshot, apply confirmation gates, snapshot reputation
/// and priority, insert the skeleton row, then hand photos to the background
/// evidence attachment. Row creation is a single attempt; a failure surfaces
/// once and the draft is preserved by the caller.
pub async fn submit(
    state: &AppState,
    request: SubmitReportRequest,
) -> Result<SubmissionOutcome, SubmitFailure> {
    validate(&request)?;

    let draft = Draft {
        reporter_id: &request.reporter_id,
        incident_type: request.incident_type,
        title: &request.title,
        description: &request.description,
        coordinates: request.coordinates,
    };
    let similar = find_similar(
        &state.duplicate_policy,
        &draft,
        &state.cache.get_candidates(),
        Utc::now(),
    );

    if let Some(gate) = blocked_gate(&request, &similar) {
        return Ok(SubmissionOutcome::ConfirmationRequired { gate, similar });
    }

    let photos = decode_photos(&request.photos)?;

    let history = reports::fetch_reporter_history(&state.pool, &request.reporter_id)
        .await
        .map_err(SubmitFailure::Internal)?;
    let reputation = reputation_score(&history);
    let priority = priority_for(
        request.incident_type,
        photos.len(),
        request.coordinates.is_some(),
        reputation,
    );

    let now = Utc::now();
    let report = IncidentReport {
        id: Uuid::new_v4().to_string(),
        reporter_id: request.reporter_id.clone(),
        reporter_name: request.reporter_name.clone(),
        reporter_email: request.reporter_email.clone(),
        incident_type: request.incident_type,
        title: request.title.clone(),
        description: request.description.clone(),
        address: request.address.clone(),
        coordinates: request.coordinates,
        photos: Vec::new(),
        status: ReportStatus::Pending,
        priority,
        government_response: None,
        resolved_at: None,
        verified: false,
        accuracy: AccuracyBlock::default(),
        related_reports: similar.iter().map(|s| s.id.clone()).collect(),
        is_duplicate: false,
        reporter_reputation: reputation,
        timestamp: Some(now),
        last_updated: Some(now),
    };

    reports::insert_report(&state.pool, &report)
        .await
        .map_err(SubmitFailure::Internal)?;
    log::info!(
        "Created incident report {} (type={}, priority={}, {} related)",
        report.id,
        report.incident_type.as_str(),
        report.priority.as_str(),
        report.related_reports.len()
    );

    let summary = ReportSummary {
        id: report.id.clone(),
        reporter_id: report.reporter_id.clone(),
        incident_type: report.incident_type,
        title: report.title.clone(),
        description: report.description.clone(),
        address: report.address.clone(),
        coordinates: report.coordinates,
        created_at: report.timestamp,
    };
    state.cache.upsert(summary.clone());

    if let Some(publisher) = &state.publisher {
        if let Err(e) = publisher.publish_report_submitted(&summary).await {
            log::error!("Failed to publish report.submitted for {}: {}", report.id, e);
        }
    }

    if !photos.is_empty() {
        state.evidence.mark_pending(&report.id);
        tokio::spawn(attach_evidence(
            state.pool.clone(),
            state.blob_store.clone(),
            state.evidence.clone(),
            report.id.clone(),
            photos,
        ));
    }

    Ok(SubmissionOutcome::Created(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CandidateCache;
    use crate::models::{Coordinates, IncidentType};
    use crate::services::duplicates::DuplicatePolicy;
    use chrono::Duration;

    fn request() -> SubmitReportRequest {
        SubmitReportRequest {
            reporter_id: "citizen-1".to_string(),
            reporter_name: "Maria Santos".to_string(),
            reporter_email: "maria@example.com".to_string(),
            incident_type: IncidentType::IllegalDumping,
            title: "Trash dumped near river".to_string(),
            description: "Large pile of plastic waste near the river bank".to_string(),
            address: "Riverside Drive".to_string(),
            coordinates: Some(Coordinates {
                latitude: 14.5995,
                longitude: 120.9842,
            }),
            photos: Vec::new(),
            acknowledge_no_photos: false,
            acknowledge_duplicates: false,
        }
    }

    #[test]
    fn test_validation_order_title_before_coordinates() {
        let mut r = request();
        r.title = String::new();
        r.coordinates = None;
        assert!(matches!(validate(&r), Err(SubmissionError::MissingField("title"))));
    }

    #[test]
    fn test_missing_coordinates_rejected() {
        let mut r = request();
        r.coordinates = None;
        assert!(matches!(validate(&r), Err(SubmissionError::MissingCoordinates)));
    }

    #[test]
    fn test_out_of_range_coordinates_rejected() {
        let mut r = request();
        r.coordinates = Some(Coordinates {
            latitude: 95.0,
            longitude: 0.0,
        });
        assert!(matches!(validate(&r), Err(SubmissionError::InvalidCoordinates)));
    }

    #[test]
    fn test_whitespace_fields_count_as_empty() {
        let mut r = request();
        r.address = "   ".to_string();
        assert!(matches!(validate(&r), Err(SubmissionError::MissingField("address"))));
    }

    #[test]
    fn test_no_photo_gate_surfaces_before_duplicate_gate() {
        let r = request();
        let cache = CandidateCache::new();
        cache.upsert(ReportSummary {
            id: "existing-1".to_string(),
            reporter_id: "citizen-2".to_string(),
            incident_type: IncidentType::IllegalDumping,
            title: r.title.clone(),
            description: r.description.clone(),
            address: "Riverside Drive".to_string(),
            coordinates: Some(Coordinates {
                latitude: 14.6000,
                longitude: 120.9850,
            }),
            created_at: Some(Utc::now() - Duration::days(2)),
        });

        let draft = Draft {
            reporter_id: &r.reporter_id,
            incident_type: r.incident_type,
            title: &r.title,
            description: &r.description,
            coordinates: r.coordinates,
        };
        let similar = find_similar(
            &DuplicatePolicy::default(),
            &draft,
            &cache.get_candidates(),
            Utc::now(),
        );
        assert!(!similar.is_empty());

        // Both gates apply; the no-photo confirmation comes first.
        assert_eq!(blocked_gate(&r, &similar), Some(Gate::NoPhotos));

        // Acknowledging photos exposes the duplicate gate.
        let mut r = r;
        r.acknowledge_no_photos = true;
        assert_eq!(blocked_gate(&r, &similar), Some(Gate::PossibleDuplicate));

        // Acknowledging both clears the way.
        r.acknowledge_duplicates = true;
        assert_eq!(blocked_gate(&r, &similar), None);
    }

    #[test]
    fn test_acknowledged_gates_do_not_retrigger() {
        let mut r = request();
        r.acknowledge_no_photos = true;
        assert_eq!(blocked_gate(&r, &[]), None);
    }

    #[test]
    fn test_photos_skip_the_no_photo_gate() {
        let mut r = request();
        r.photos.push(PhotoPayload {
            file_name: "dump.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            data_base64: "aGVsbG8=".to_string(),
        });
        assert_eq!(blocked_gate(&r, &[]), None);
    }

    #[test]
    fn test_decode_photos_rejects_bad_base64() {
        let payloads = vec![PhotoPayload {
            file_name: "dump.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            data_base64: "not base64!!".to_string(),
        }];
        assert!(matches!(
            decode_photos(&payloads),
            Err(SubmissionError::InvalidPhoto(_))
        ));
    }

    #[test]
    fn test_decode_photos_roundtrip() {
        let payloads = vec![PhotoPayload {
            file_name: "dump.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            data_base64: "aGVsbG8=".to_string(),
        }];
        let decoded = decode_photos(&payloads).unwrap();
        assert_eq!(decoded[0].bytes, b"hello");
    }
}
