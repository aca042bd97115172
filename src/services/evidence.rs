use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use serde::Serialize;
use sqlx::{MySql, Pool};

use crate::database::reports;
use crate::storage::BlobStore;

/// Per-report progress of the background photo attachment step. The report
/// row already exists by the time an entry appears here; a Failed entry means
/// the report persists without its photos, never that it was rolled back.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum AttachmentState {
    Pending,
    Attached { urls: Vec<String> },
    Failed { error: String },
}

#[derive(Clone)]
pub struct EvidenceTracker {
    states: Arc<RwLock<HashMap<String, AttachmentState>>>,
}

impl EvidenceTracker {
    pub fn new() -> Self {
        Self {
            states: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn mark_pending(&self, report_id: &str) {
        self.set(report_id, AttachmentState::Pending);
    }

    pub fn mark_attached(&self, report_id: &str, urls: Vec<String>) {
        self.set(report_id, AttachmentState::Attached { urls });
    }

    pub fn mark_failed(&self, report_id: &str, error: String) {
        self.set(report_id, AttachmentState::Failed { error });
    }

    pub fn state_of(&self, report_id: &str) -> Option<AttachmentState> {
        self.states
            .read()
            .unwrap_or_else(|e| panic!("Failed to acquire lock on evidence states: {}", e))
            .get(report_id)
            .cloned()
    }

    fn set(&self, report_id: &str, state: AttachmentState) {
        self.states
            .write()
            .unwrap_or_else(|e| panic!("Failed to acquire lock on evidence states: {}", e))
            .insert(report_id.to_string(), state);
    }
}

impl Default for EvidenceTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// A photo decoded out of the submission request, ready for upload.
#[derive(Debug, Clone)]
pub struct DecodedPhoto {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Second phase of submission: upload every photo, then patch the report's
/// photo URL list. Any failure is logged and recorded in the tracker; the
/// already-created report is left in place without photos.
pub async fn attach_evidence(
    pool: Pool<MySql>,
    store: Arc<dyn BlobStore>,
    tracker: EvidenceTracker,
    report_id: String,
    photos: Vec<DecodedPhoto>,
) {
    let mut urls = Vec::with_capacity(photos.len());

    for (index, photo) in photos.into_iter().enumerate() {
        let key = format!("reports/{}/photo-{}-{}", report_id, index, photo.file_name);
        match store.upload(&key, &photo.content_type, photo.bytes).await {
            Ok(url) => urls.push(url),
            Err(e) => {
                log::error!("Photo upload failed for report {}: {}", report_id, e);
                tracker.mark_failed(&report_id, e.to_string());
                return;
            }
        }
    }

    if let Err(e) = reports::update_photos(&pool, &report_id, &urls).await {
        log::error!("Failed to patch photo URLs for report {}: {}", report_id, e);
        tracker.mark_failed(&report_id, e.to_string());
        return;
    }

    log::info!("Attached {} photos to report {}", urls.len(), report_id);
    tracker.mark_attached(&report_id, urls);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_transitions() {
        let tracker = EvidenceTracker::new();
        assert!(tracker.state_of("r1").is_none());

        tracker.mark_pending("r1");
        assert!(matches!(tracker.state_of("r1"), Some(AttachmentState::Pending)));

        tracker.mark_attached("r1", vec!["url-1".to_string()]);
        match tracker.state_of("r1") {
            Some(AttachmentState::Attached { urls }) => assert_eq!(urls, vec!["url-1"]),
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[test]
    fn test_tracker_records_failure() {
        let tracker = EvidenceTracker::new();
        tracker.mark_pending("r2");
        tracker.mark_failed("r2", "upload timed out".to_string());
        match tracker.state_of("r2") {
            Some(AttachmentState::Failed { error }) => assert_eq!(error, "upload timed out"),
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[test]
    fn test_tracker_is_per_report() {
        let tracker = EvidenceTracker::new();
        tracker.mark_pending("a");
        tracker.mark_failed("b", "boom".to_string());
        assert!(matches!(tracker.state_of("a"), Some(AttachmentState::Pending)));
        assert!(matches!(tracker.state_of("b"), Some(AttachmentState::Failed { .. })));
    }
}
