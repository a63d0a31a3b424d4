use serde::{Deserialize, Serialize};

use super::domain::UnitId;

/// Scores at or above this value flag the category. The boundary itself counts as risk.
pub const RISK_THRESHOLD: f64 = 0.5;

/// A successful vote from one unit: its at-risk probability and historical performance weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitVote {
    pub unit: UnitId,
    pub probability: f64,
    pub weight: f64,
}

/// Combined evidence for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub score: f64,
    pub at_risk: bool,
}

pub fn is_at_risk(score: f64) -> bool {
    score >= RISK_THRESHOLD
}

/// Performance-weighted mean of the votes, `Σ(p·w) / Σ(w)`.
///
/// Returns `None` when there are no votes. A single vote passes through untouched. When every
/// weight is zero the votes carry no track record to rank them, so the unweighted mean is used.
pub fn weighted_score(votes: &[UnitVote]) -> Option<CategoryScore> {
    let score = match votes {
        [] => return None,
        [only] => only.probability,
        _ => {
            let total_weight: f64 = votes.iter().map(|vote| vote.weight).sum();
            if total_weight > 0.0 {
                votes
                    .iter()
                    .map(|vote| vote.probability * vote.weight)
                    .sum::<f64>()
                    / total_weight
            } else {
                votes.iter().map(|vote| vote.probability).sum::<f64>() / votes.len() as f64
            }
        }
    };

    let score = score.clamp(0.0, 1.0);
    Some(CategoryScore {
        score,
        at_risk: is_at_risk(score),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(unit: &str, probability: f64, weight: f64) -> UnitVote {
        UnitVote {
            unit: UnitId::from(unit),
            probability,
            weight,
        }
    }

    #[test]
    fn no_votes_means_no_evidence() {
        assert_eq!(weighted_score(&[]), None);
    }

    #[test]
    fn single_vote_passes_through_for_any_weight() {
        for weight in [0.0, 0.3, 0.7, 1.0, 12.5] {
            let result = weighted_score(&[vote("only", 0.3, weight)]).expect("score");
            assert_eq!(result.score, 0.3);
            assert!(!result.at_risk);
        }
    }

    #[test]
    fn exact_half_is_at_risk() {
        let result =
            weighted_score(&[vote("a", 0.8, 1.0), vote("b", 0.2, 1.0)]).expect("score");
        assert_eq!(result.score, 0.5);
        assert!(result.at_risk);
    }

    #[test]
    fn weights_follow_track_record_not_headcount() {
        let result = weighted_score(&[
            vote("strong", 0.9, 3.0),
            vote("weak_a", 0.1, 0.5),
            vote("weak_b", 0.1, 0.5),
        ])
        .expect("score");
        // (2.7 + 0.05 + 0.05) / 4.0
        assert!((result.score - 0.7).abs() < 1e-12);
        assert!(result.at_risk);
    }

    #[test]
    fn two_unit_motor_scenario() {
        let result =
            weighted_score(&[vote("motor_a", 0.6, 0.9), vote("motor_b", 0.3, 0.7)]).expect("score");
        assert!((result.score - 0.46875).abs() < 1e-12);
        assert!(!result.at_risk);
    }

    #[test]
    fn zero_total_weight_falls_back_to_plain_mean() {
        let result =
            weighted_score(&[vote("a", 0.9, 0.0), vote("b", 0.3, 0.0)]).expect("score");
        assert!((result.score - 0.6).abs() < 1e-12);
        assert!(result.at_risk);
    }
}
