use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncidentType {
    IllegalDumping,
    Pollution,
    TreeCutting,
    WaterContamination,
    AirPollution,
    Other,
}

impl IncidentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentType::IllegalDumping => "illegal-dumping",
            IncidentType::Pollution => "pollution",
            IncidentType::TreeCutting => "tree-cutting",
            IncidentType::WaterContamination => "water-contamination",
            IncidentType::AirPollution => "air-pollution",
            IncidentType::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "illegal-dumping" => Some(IncidentType::IllegalDumping),
            "pollution" => Some(IncidentType::Pollution),
            "tree-cutting" => Some(IncidentType::TreeCutting),
            "water-contamination" => Some(IncidentType::WaterContamination),
            "air-pollution" => Some(IncidentType::AirPollution),
            "other" => Some(IncidentType::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Investigating,
    Resolved,
    Rejected,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Investigating => "investigating",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(ReportStatus::Pending),
            "investigating" => Some(ReportStatus::Investigating),
            "resolved" => Some(ReportStatus::Resolved),
            "rejected" => Some(ReportStatus::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            "urgent" => Some(Priority::Urgent),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Community trust counters, all zero at creation. Mutated by the voting
/// surface, which lives outside this service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccuracyBlock {
    pub community_votes: u32,
    pub upvotes: u32,
    pub downvotes: u32,
    pub flags: u32,
    pub flag_reasons: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentReport {
    pub id: String,
    pub reporter_id: String,
    pub reporter_name: String,
    pub reporter_email: String,
    pub incident_type: IncidentType,
    pub title: String,
    pub description: String,
    pub address: String,
    pub coordinates: Option<Coordinates>,
    pub photos: Vec<String>,
    pub status: ReportStatus,
    pub priority: Priority,
    pub government_response: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub verified: bool,
    pub accuracy: AccuracyBlock,
    pub related_reports: Vec<String>,
    pub is_duplicate: bool,
    pub reporter_reputation: i32,
    pub timestamp: Option<DateTime<Utc>>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// The subset of a report that duplicate detection needs. Held in the
/// candidate cache for every report in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub id: String,
    pub reporter_id: String,
    pub incident_type: IncidentType,
    pub title: String,
    pub description: String,
    pub address: String,
    pub coordinates: Option<Coordinates>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Fields of a historical report that feed reputation scoring.
#[derive(Debug, Clone)]
pub struct ReportStanding {
    pub verified: bool,
    pub status: ReportStatus,
    pub upvotes: u32,
    pub downvotes: u32,
    pub flags: u32,
}

impl From<&IncidentReport> for ReportStanding {
    fn from(report: &IncidentReport) -> Self {
        Self {
            verified: report.verified,
            status: report.status,
            upvotes: report.accuracy.upvotes,
            downvotes: report.accuracy.downvotes,
            flags: report.accuracy.flags,
        }
    }
}

// Request/Response DTOs

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoPayload {
    pub file_name: String,
    pub content_type: String,
    pub data_base64: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitReportRequest {
    pub reporter_id: String,
    pub reporter_name: String,
    pub reporter_email: String,
    pub incident_type: IncidentType,
    pub title: String,
    pub description: String,
    pub address: String,
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub photos: Vec<PhotoPayload>,
    #[serde(default)]
    pub acknowledge_no_photos: bool,
    #[serde(default)]
    pub acknowledge_duplicates: bool,
}

#[derive(Debug, Serialize)]
pub struct SimilarReportSummary {
    pub id: String,
    pub title: String,
    pub created_at: Option<DateTime<Utc>>,
    pub description_excerpt: String,
    pub address: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitReportResponse {
    pub id: String,
    pub status: ReportStatus,
    pub priority: Priority,
    pub reporter_reputation: i32,
    pub related_reports: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ConfirmationRequiredResponse {
    pub gate: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub similar_reports: Vec<SimilarReportSummary>,
}

#[derive(Debug, Deserialize)]
pub struct CheckDuplicatesRequest {
    pub reporter_id: String,
    pub incident_type: IncidentType,
    pub title: String,
    pub description: String,
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Serialize)]
pub struct CheckDuplicatesResponse {
    pub similar_reports: Vec<SimilarReportSummary>,
    pub total_matches: usize,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ReportStatus,
    pub priority: Option<Priority>,
    pub government_response: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReputationResponse {
    pub user_id: String,
    pub reputation: i32,
    pub report_count: usize,
}

#[derive(Debug, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct TypeCount {
    pub incident_type: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_reports: i64,
    pub by_status: Vec<StatusCount>,
    pub by_type: Vec<TypeCount>,
}

#[derive(Debug, Serialize)]
pub struct ListReportsResponse {
    pub reports: Vec<IncidentReport>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}
