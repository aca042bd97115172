use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ReportSummary;

/// Emitted after a report row is created; consumed by every service holding
/// a candidate cache, including this one.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ReportSubmittedEvent {
    pub report: ReportSummary,
    pub timestamp: DateTime<Utc>,
}
