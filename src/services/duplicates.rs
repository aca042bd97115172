use chrono::{DateTime, Duration, Utc};

use crate::models::{Coordinates, IncidentType, ReportSummary, SimilarReportSummary};
use crate::services::geo::haversine_km;
use crate::services::similarity::jaccard;

const EXCERPT_LEN: usize = 120;
pub const WARNING_LIMIT: usize = 3;

/// Policy constants for the matching predicate. Defaults mirror the platform
/// policy: 0.5 km radius, title Jaccard > 0.7, description Jaccard > 0.6,
/// 7-day trailing window.
#[derive(Debug, Clone, Copy)]
pub struct DuplicatePolicy {
    pub radius_km: f64,
    pub title_threshold: f64,
    pub description_threshold: f64,
    pub window_days: i64,
}

impl Default for DuplicatePolicy {
    fn default() -> Self {
        Self {
            radius_km: 0.5,
            title_threshold: 0.7,
            description_threshold: 0.6,
            window_days: 7,
        }
    }
}

/// A draft under duplicate check. Borrowed view so both the synchronous
/// check endpoint and the submission path can build one cheaply.
#[derive(Debug, Clone, Copy)]
pub struct Draft<'a> {
    pub reporter_id: &'a str,
    pub incident_type: IncidentType,
    pub title: &'a str,
    pub description: &'a str,
    pub coordinates: Option<Coordinates>,
}

/// True when the candidate is "similar" to the draft: different author, same
/// incident type, created inside the trailing window, and close in space or
/// near-identical in title or description text.
pub fn is_similar(
    policy: &DuplicatePolicy,
    draft: &Draft<'_>,
    candidate: &ReportSummary,
    now: DateTime<Utc>,
) -> bool {
    if candidate.reporter_id == draft.reporter_id {
        return false;
    }
    if candidate.incident_type != draft.incident_type {
        return false;
    }

    // A candidate without a creation timestamp is treated as from the epoch,
    // which always falls outside the window.
    let created_at = candidate.created_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    if now.signed_duration_since(created_at) > Duration::days(policy.window_days) {
        return false;
    }

    if let (Some(a), Some(b)) = (draft.coordinates, candidate.coordinates) {
        if haversine_km(a, b) <= policy.radius_km {
            return true;
        }
    }

    jaccard(draft.title, &candidate.title) > policy.title_threshold
        || jaccard(draft.description, &candidate.description) > policy.description_threshold
}

/// Scans the candidate pool and returns every match, newest first, so the
/// first WARNING_LIMIT entries are the ones surfaced in the warning.
pub fn find_similar(
    policy: &DuplicatePolicy,
    draft: &Draft<'_>,
    candidates: &[ReportSummary],
    now: DateTime<Utc>,
) -> Vec<ReportSummary> {
    let mut matches: Vec<ReportSummary> = candidates
        .iter()
        .filter(|candidate| is_similar(policy, draft, candidate, now))
        .cloned()
        .collect();

    matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    matches
}

/// Warning payload for a matched report: title, date, description excerpt,
/// address.
pub fn warning_summary(report: &ReportSummary) -> SimilarReportSummary {
    let excerpt: String = report.description.chars().take(EXCERPT_LEN).collect();
    SimilarReportSummary {
        id: report.id.clone(),
        title: report.title.clone(),
        created_at: report.created_at,
        description_excerpt: excerpt,
        address: report.address.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft<'a>() -> Draft<'a> {
        Draft {
            reporter_id: "citizen-1",
            incident_type: IncidentType::IllegalDumping,
            title: "Trash dumped near river",
            description: "Large pile of plastic waste near the river bank",
            coordinates: Some(Coordinates {
                latitude: 14.5995,
                longitude: 120.9842,
            }),
        }
    }

    fn candidate(days_ago: i64, now: DateTime<Utc>) -> ReportSummary {
        ReportSummary {
            id: "existing-1".to_string(),
            reporter_id: "citizen-2".to_string(),
            incident_type: IncidentType::IllegalDumping,
            title: "Trash dumped near river".to_string(),
            description: "Large pile of plastic waste near the river bank".to_string(),
            address: "Riverside Drive".to_string(),
            coordinates: Some(Coordinates {
                latitude: 14.6000,
                longitude: 120.9850,
            }),
            created_at: Some(now - Duration::days(days_ago)),
        }
    }

    #[test]
    fn test_nearby_same_type_recent_report_matches() {
        let now = Utc::now();
        let matches = find_similar(&DuplicatePolicy::default(), &draft(), &[candidate(2, now)], now);
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_six_day_old_candidate_inside_window() {
        let now = Utc::now();
        assert!(is_similar(
            &DuplicatePolicy::default(),
            &draft(),
            &candidate(6, now),
            now
        ));
    }

    #[test]
    fn test_eight_day_old_candidate_outside_window() {
        let now = Utc::now();
        assert!(!is_similar(
            &DuplicatePolicy::default(),
            &draft(),
            &candidate(8, now),
            now
        ));
    }

    #[test]
    fn test_missing_timestamp_treated_as_epoch() {
        let now = Utc::now();
        let mut c = candidate(1, now);
        c.created_at = None;
        assert!(!is_similar(&DuplicatePolicy::default(), &draft(), &c, now));
    }

    #[test]
    fn test_own_reports_never_flagged() {
        let now = Utc::now();
        let mut c = candidate(1, now);
        c.reporter_id = "citizen-1".to_string();
        assert!(!is_similar(&DuplicatePolicy::default(), &draft(), &c, now));
    }

    #[test]
    fn test_no_cross_type_matching() {
        let now = Utc::now();
        let mut c = candidate(1, now);
        c.incident_type = IncidentType::AirPollution;
        assert!(!is_similar(&DuplicatePolicy::default(), &draft(), &c, now));
    }

    #[test]
    fn test_distant_report_with_different_text_does_not_match() {
        let now = Utc::now();
        let mut c = candidate(1, now);
        c.coordinates = Some(Coordinates {
            latitude: 15.5,
            longitude: 121.9,
        });
        c.title = "Overflowing bins at market".to_string();
        c.description = "Garbage collection skipped this street for weeks".to_string();
        assert!(!is_similar(&DuplicatePolicy::default(), &draft(), &c, now));
    }

    #[test]
    fn test_title_similarity_alone_matches_without_coordinates() {
        let now = Utc::now();
        let mut c = candidate(1, now);
        c.coordinates = None;
        c.description = "Completely different wording in this field".to_string();
        // Identical title: Jaccard 1.0 > 0.7.
        assert!(is_similar(&DuplicatePolicy::default(), &draft(), &c, now));
    }

    #[test]
    fn test_matches_sorted_newest_first() {
        let now = Utc::now();
        let mut older = candidate(5, now);
        older.id = "older".to_string();
        let mut newer = candidate(1, now);
        newer.id = "newer".to_string();

        let matches = find_similar(
            &DuplicatePolicy::default(),
            &draft(),
            &[older, newer],
            now,
        );
        assert_eq!(matches[0].id, "newer");
        assert_eq!(matches[1].id, "older");
    }

    #[test]
    fn test_warning_summary_excerpts_description() {
        let now = Utc::now();
        let mut c = candidate(1, now);
        c.description = "x".repeat(300);
        let summary = warning_summary(&c);
        assert_eq!(summary.description_excerpt.len(), 120);
        assert_eq!(summary.address, "Riverside Drive");
    }
}
