use crate::models::{IncidentType, Priority};

/// Deterministic triage for a new draft: type severity plus evidence plus
/// reporter credibility, mapped onto a priority band. Thresholds are policy
/// constants, not derived from data.
pub fn priority_for(
    incident_type: IncidentType,
    photo_count: usize,
    has_coordinates: bool,
    reputation: i32,
) -> Priority {
    let mut score = type_weight(incident_type);

    if photo_count > 0 {
        score += 2;
    }
    if photo_count >= 3 {
        score += 1;
    }
    if has_coordinates {
        score += 1;
    }

    if reputation >= 90 {
        score += 1;
    } else if reputation < 50 {
        score -= 2;
    }

    match score {
        s if s >= 7 => Priority::Urgent,
        s if s >= 5 => Priority::High,
        s if s >= 3 => Priority::Medium,
        _ => Priority::Low,
    }
}

fn type_weight(incident_type: IncidentType) -> i32 {
    match incident_type {
        IncidentType::WaterContamination => 4,
        IncidentType::IllegalDumping | IncidentType::AirPollution => 3,
        IncidentType::TreeCutting => 2,
        IncidentType::Pollution | IncidentType::Other => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_water_contamination_with_full_evidence_is_urgent() {
        // 4 (type) + 2 (photos) + 1 (>=3 photos) + 1 (coords) + 1 (rep >= 90) = 9
        let p = priority_for(IncidentType::WaterContamination, 3, true, 95);
        assert_eq!(p, Priority::Urgent);
    }

    #[test]
    fn test_low_reputation_tree_cutting_is_low() {
        // 2 (type) + 0 (no photos) + 1 (coords) - 2 (rep < 50) = 1
        let p = priority_for(IncidentType::TreeCutting, 0, true, 40);
        assert_eq!(p, Priority::Low);
    }

    #[test]
    fn test_illegal_dumping_no_evidence_is_medium() {
        // 3 (type) + 1 (coords) = 4
        let p = priority_for(IncidentType::IllegalDumping, 0, true, 75);
        assert_eq!(p, Priority::Medium);
    }

    #[test]
    fn test_band_boundaries() {
        // Score exactly 7: urgent.
        assert_eq!(
            priority_for(IncidentType::WaterContamination, 1, true, 75),
            Priority::Urgent
        );
        // Score exactly 5: high.
        assert_eq!(
            priority_for(IncidentType::TreeCutting, 1, true, 75),
            Priority::High
        );
        // Score exactly 3: medium.
        assert_eq!(
            priority_for(IncidentType::Other, 1, true, 75),
            Priority::Medium
        );
        // Score 0: low.
        assert_eq!(
            priority_for(IncidentType::Other, 0, false, 75),
            Priority::Low
        );
    }

    #[test]
    fn test_more_photos_never_lowers_the_band() {
        for t in [
            IncidentType::IllegalDumping,
            IncidentType::Pollution,
            IncidentType::TreeCutting,
            IncidentType::WaterContamination,
            IncidentType::AirPollution,
            IncidentType::Other,
        ] {
            for rep in [0, 40, 75, 90, 100] {
                let none = priority_for(t, 0, true, rep);
                let many = priority_for(t, 3, true, rep);
                assert!(many >= none, "type={:?} rep={}", t, rep);
            }
        }
    }

    #[test]
    fn test_low_reputation_never_raises_the_band() {
        for t in [IncidentType::WaterContamination, IncidentType::Other] {
            for photos in [0, 1, 3] {
                let trusted = priority_for(t, photos, true, 75);
                let distrusted = priority_for(t, photos, true, 40);
                assert!(distrusted <= trusted, "type={:?} photos={}", t, photos);
            }
        }
    }
}
