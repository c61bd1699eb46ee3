//! Wilson score ranking
//!
//! The default display order of statements uses the lower bound of the
//! Wilson score confidence interval for the share of agree votes. A statement
//! with few votes is pulled toward a modest score instead of jumping to the
//! top on a lucky 2-of-2, without needing an arbitrary minimum-vote cutoff.

use crate::core::ids::StatementId;
use crate::discussion::vote::VoteTally;
use serde::{Deserialize, Serialize};

/// z for a two-sided 95% confidence interval
pub const Z_95: f64 = 1.96;

/// Ranking parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingParams {
    /// Standard-normal quantile of the confidence level
    pub z: f64,
}

impl Default for RankingParams {
    fn default() -> Self {
        Self { z: Z_95 }
    }
}

/// Lower bound of the Wilson score interval for `agree / (agree + disagree)`
///
/// Returns 0 when there are no decisive votes.
///
/// # Example
///
/// ```
/// use agora_domain::ranking::wilson::{wilson_lower_bound, Z_95};
///
/// assert_eq!(wilson_lower_bound(0, 0, Z_95), 0.0);
/// // 2 of 2 is far less convincing than 200 of 200
/// assert!(wilson_lower_bound(2, 0, Z_95) < wilson_lower_bound(200, 0, Z_95));
/// ```
pub fn wilson_lower_bound(agree: u64, disagree: u64, z: f64) -> f64 {
    let n = (agree + disagree) as f64;
    if n == 0.0 {
        return 0.0;
    }

    let p = agree as f64 / n;
    let z2 = z * z;
    let centre = p + z2 / (2.0 * n);
    let margin = z * ((p * (1.0 - p) + z2 / (4.0 * n)) / n).sqrt();

    ((centre - margin) / (1.0 + z2 / n)).clamp(0.0, 1.0)
}

/// A statement with its default-order score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedStatement {
    pub statement_id: StatementId,
    pub agree: u64,
    pub disagree: u64,
    pub score: f64,
}

/// Orders statements by Wilson score, independent of any clustering
#[derive(Debug, Clone, Copy, Default)]
pub struct StatementRanker {
    params: RankingParams,
}

impl StatementRanker {
    pub fn new(params: RankingParams) -> Self {
        Self { params }
    }

    pub fn score(&self, tally: &VoteTally) -> f64 {
        wilson_lower_bound(tally.agree, tally.disagree, self.params.z)
    }

    /// Highest score first; ties go to the statement with more decisive
    /// votes, then to the lower id
    pub fn rank<'a>(
        &self,
        tallies: impl IntoIterator<Item = (StatementId, &'a VoteTally)>,
    ) -> Vec<RankedStatement> {
        let mut ranked: Vec<RankedStatement> = tallies
            .into_iter()
            .map(|(statement_id, tally)| RankedStatement {
                statement_id,
                agree: tally.agree,
                disagree: tally.disagree,
                score: self.score(tally),
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| (b.agree + b.disagree).cmp(&(a.agree + a.disagree)))
                .then_with(|| a.statement_id.cmp(&b.statement_id))
        });
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_votes_scores_zero() {
        assert_eq!(wilson_lower_bound(0, 0, Z_95), 0.0);
    }

    #[test]
    fn test_unanimous_below_one_and_converging() {
        let mut previous = 0.0;
        for n in [1u64, 5, 50, 500, 5_000, 500_000] {
            let score = wilson_lower_bound(n, 0, Z_95);
            assert!(score < 1.0);
            assert!(score > previous);
            previous = score;
        }
        assert!(previous > 0.999);
    }

    #[test]
    fn test_more_disagree_strictly_lowers_score() {
        for agree in [1u64, 3, 10, 40] {
            let mut previous = wilson_lower_bound(agree, 0, Z_95);
            for disagree in 1..60 {
                let score = wilson_lower_bound(agree, disagree, Z_95);
                assert!(score < previous, "agree={agree} disagree={disagree}");
                previous = score;
            }
        }
    }

    #[test]
    fn test_higher_share_strictly_raises_score_at_fixed_n() {
        for n in [5u64, 20, 100] {
            let mut previous = -1.0;
            for agree in 0..=n {
                let score = wilson_lower_bound(agree, n - agree, Z_95);
                assert!(score > previous || (agree == 0 && score == 0.0));
                previous = score;
            }
        }
    }

    #[test]
    fn test_known_value() {
        // 8 of 10 at 95%: lower bound ≈ 0.4902
        let score = wilson_lower_bound(8, 2, Z_95);
        assert!((score - 0.4902).abs() < 1e-3, "got {score}");
    }

    #[test]
    fn test_rank_orders_by_score_then_volume_then_id() {
        let tallies = [
            (StatementId(1), VoteTally::new(2, 0, 0)),
            (StatementId(2), VoteTally::new(90, 10, 5)),
            (StatementId(3), VoteTally::new(0, 0, 4)),
            (StatementId(4), VoteTally::new(0, 3, 0)),
            (StatementId(5), VoteTally::new(9, 1, 0)),
        ];
        let ranked = StatementRanker::default().rank(tallies.iter().map(|(id, t)| (*id, t)));
        let order: Vec<u64> = ranked.iter().map(|r| r.statement_id.0).collect();

        // 4 and 3 both score 0; 4 has more decisive votes
        assert_eq!(order, vec![2, 5, 1, 4, 3]);
        assert_eq!(ranked[4].score, 0.0);
    }

    #[test]
    fn test_unsure_is_ignored() {
        let ranker = StatementRanker::default();
        assert_eq!(
            ranker.score(&VoteTally::new(5, 5, 0)),
            ranker.score(&VoteTally::new(5, 5, 100))
        );
    }
}
