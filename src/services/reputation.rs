use crate::models::{ReportStanding, ReportStatus};

const BASE_SCORE: i32 = 100;
const VERIFIED_BONUS: i32 = 10;
const REJECTED_PENALTY: i32 = 20;
const DOWNVOTED_PENALTY: i32 = 5;
const FLAGGED_PENALTY: i32 = 15;
const FLAG_THRESHOLD: u32 = 3;

/// Reporter credibility score over their full report history, clamped to
/// [0,100]. An empty history scores exactly 100: new reporters start with
/// full trust. Recomputed from history on every call, never stored as a
/// running counter.
pub fn reputation_score(history: &[ReportStanding]) -> i32 {
    let mut score = BASE_SCORE;

    for report in history {
        if report.verified {
            score += VERIFIED_BONUS;
        }
        if report.status == ReportStatus::Rejected {
            score -= REJECTED_PENALTY;
        }
        if report.downvotes > report.upvotes {
            score -= DOWNVOTED_PENALTY;
        }
        if report.flags > FLAG_THRESHOLD {
            score -= FLAGGED_PENALTY;
        }
    }

    score.clamp(0, 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standing(verified: bool, status: ReportStatus) -> ReportStanding {
        ReportStanding {
            verified,
            status,
            upvotes: 0,
            downvotes: 0,
            flags: 0,
        }
    }

    #[test]
    fn test_empty_history_scores_exactly_100() {
        assert_eq!(reputation_score(&[]), 100);
    }

    #[test]
    fn test_rejected_plus_verified_nets_90() {
        let history = vec![
            standing(false, ReportStatus::Rejected),
            standing(true, ReportStatus::Resolved),
        ];
        assert_eq!(reputation_score(&history), 90);
    }

    #[test]
    fn test_verified_reports_clamped_at_100() {
        let history = vec![standing(true, ReportStatus::Resolved); 5];
        assert_eq!(reputation_score(&history), 100);
    }

    #[test]
    fn test_heavy_rejection_clamped_at_zero() {
        let history = vec![standing(false, ReportStatus::Rejected); 10];
        assert_eq!(reputation_score(&history), 0);
    }

    #[test]
    fn test_downvote_majority_penalty() {
        let history = vec![ReportStanding {
            verified: false,
            status: ReportStatus::Pending,
            upvotes: 1,
            downvotes: 3,
            flags: 0,
        }];
        assert_eq!(reputation_score(&history), 95);
    }

    #[test]
    fn test_flag_penalty_only_above_threshold() {
        let at_threshold = vec![ReportStanding {
            verified: false,
            status: ReportStatus::Pending,
            upvotes: 0,
            downvotes: 0,
            flags: 3,
        }];
        assert_eq!(reputation_score(&at_threshold), 100);

        let over_threshold = vec![ReportStanding {
            verified: false,
            status: ReportStatus::Pending,
            upvotes: 0,
            downvotes: 0,
            flags: 4,
        }];
        assert_eq!(reputation_score(&over_threshold), 85);
    }

    #[test]
    fn test_adding_rejected_never_increases_score() {
        let mut history = vec![
            standing(true, ReportStatus::Resolved),
            standing(false, ReportStatus::Pending),
        ];
        let before = reputation_score(&history);
        history.push(standing(false, ReportStatus::Rejected));
        assert!(reputation_score(&history) <= before);
    }

    #[test]
    fn test_adding_verified_never_decreases_score() {
        let mut history = vec![standing(false, ReportStatus::Rejected); 3];
        let before = reputation_score(&history);
        history.push(standing(true, ReportStatus::Resolved));
        assert!(reputation_score(&history) >= before);
    }
}
