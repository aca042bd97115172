use std::sync::Arc;

use sqlx::MySqlPool;

use crate::cache::CandidateCache;
use crate::rabbitmq::ReportEventPublisher;
use crate::services::duplicates::DuplicatePolicy;
use crate::services::evidence::EvidenceTracker;
use crate::storage::BlobStore;

#[derive(Clone)]
pub struct AppState {
    pub pool: MySqlPool,
    pub cache: CandidateCache,
    pub evidence: EvidenceTracker,
    pub blob_store: Arc<dyn BlobStore>,
    pub publisher: Option<Arc<ReportEventPublisher>>,
    pub duplicate_policy: DuplicatePolicy,
}
