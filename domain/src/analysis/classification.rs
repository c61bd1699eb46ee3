//! Statement classification
//!
//! Every statement with enough votes gets an overall agreement rate and one
//! rate per opinion group. From those the classifier derives three
//! independent, non-exclusive tags:
//!
//! | Tag       | Rule                                                              |
//! |-----------|-------------------------------------------------------------------|
//! | Consensus | overall rate ≥ 0.70 and every group's rate ≥ 0.60                 |
//! | Bridge    | mean group rate ≥ 0.65 and variance of group rates < 0.15         |
//! | Divisive  | controversy score `1 - 2·|rate - 0.5|` ≥ 0.70                     |
//!
//! The numbers above are the defaults of [`ClassificationThresholds`]. Each
//! tagged statement keeps the scores that earned it the tag.

use super::config::ClassificationThresholds;
use super::matrix::VoteMatrix;
use crate::core::ids::StatementId;
use crate::discussion::vote::VoteTally;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Absorbs floating-point noise when comparing rates against thresholds
const RATE_EPSILON: f64 = 1e-9;

/// How evenly a statement splits the room: 1.0 at 50/50, 0.0 at unanimity
///
/// # Example
///
/// ```
/// use agora_domain::analysis::classification::controversy_score;
///
/// assert_eq!(controversy_score(0.5), 1.0);
/// assert_eq!(controversy_score(1.0), 0.0);
/// assert_eq!(controversy_score(0.0), 0.0);
/// ```
pub fn controversy_score(agreement_rate: f64) -> f64 {
    (1.0 - 2.0 * (agreement_rate - 0.5).abs()).clamp(0.0, 1.0)
}

fn at_least(value: f64, threshold: f64) -> bool {
    value >= threshold - RATE_EPSILON
}

/// Non-exclusive classification tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementTag {
    Consensus,
    Bridge,
    Divisive,
}

impl std::fmt::Display for StatementTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatementTag::Consensus => write!(f, "consensus"),
            StatementTag::Bridge => write!(f, "bridge"),
            StatementTag::Divisive => write!(f, "divisive"),
        }
    }
}

/// Raw agreement figures of one statement
#[derive(Debug, Clone, PartialEq)]
pub struct StatementScores {
    pub statement_id: StatementId,
    pub overall: VoteTally,
    pub overall_rate: f64,
    /// Indexed by cluster; `None` when the cluster cast no vote on it
    pub per_cluster_rates: Vec<Option<f64>>,
}

impl StatementScores {
    pub fn controversy_score(&self) -> f64 {
        controversy_score(self.overall_rate)
    }

    /// Mean and population variance over the clusters that voted, if at
    /// least two did
    pub fn cluster_spread(&self) -> Option<(f64, f64)> {
        let rates: Vec<f64> = self.per_cluster_rates.iter().flatten().copied().collect();
        if rates.len() < 2 {
            return None;
        }
        let count = rates.len() as f64;
        let mean = rates.iter().sum::<f64>() / count;
        let variance = rates.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / count;
        Some((mean, variance))
    }
}

/// Statement agreed on overall and inside every opinion group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusStatement {
    pub statement_id: StatementId,
    pub overall_rate: f64,
    pub per_cluster_rates: Vec<Option<f64>>,
}

/// Statement that otherwise-opposed groups agree on alike
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeStatement {
    pub statement_id: StatementId,
    pub mean_rate: f64,
    pub variance: f64,
}

/// Statement that splits the population close to evenly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivisiveStatement {
    pub statement_id: StatementId,
    pub controversy_score: f64,
}

/// The three categorized lists, each ordered by statement id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub consensus: Vec<ConsensusStatement>,
    pub bridge: Vec<BridgeStatement>,
    pub divisive: Vec<DivisiveStatement>,
    /// Statements below the vote floor that were left out
    pub skipped: usize,
}

/// Tags statements from the vote matrix and the cluster labels
#[derive(Debug, Clone, Copy, Default)]
pub struct StatementClassifier {
    thresholds: ClassificationThresholds,
}

impl StatementClassifier {
    pub fn new(thresholds: ClassificationThresholds) -> Self {
        Self { thresholds }
    }

    /// Agreement figures for every statement that clears the vote floor
    ///
    /// `labels` holds one cluster index per matrix row.
    pub fn score(
        &self,
        matrix: &VoteMatrix,
        labels: &[usize],
        cluster_count: usize,
    ) -> Vec<StatementScores> {
        (0..matrix.n_statements())
            .filter_map(|col| {
                let mut overall = VoteTally::default();
                let mut per_cluster = vec![VoteTally::default(); cluster_count];

                for (row, label) in labels.iter().enumerate() {
                    if let Some(vote) = matrix.get(row, col) {
                        overall.record(vote);
                        if let Some(tally) = per_cluster.get_mut(*label) {
                            tally.record(vote);
                        }
                    }
                }

                if overall.total() < self.thresholds.min_statement_votes {
                    return None;
                }

                Some(StatementScores {
                    statement_id: matrix.statements()[col],
                    overall,
                    overall_rate: overall.agreement_rate()?,
                    per_cluster_rates: per_cluster.iter().map(VoteTally::agreement_rate).collect(),
                })
            })
            .collect()
    }

    /// Tags earned by one scored statement
    pub fn tags(&self, scores: &StatementScores) -> Vec<StatementTag> {
        let mut tags = Vec::new();
        if self.is_consensus(scores) {
            tags.push(StatementTag::Consensus);
        }
        if self.bridge_spread(scores).is_some() {
            tags.push(StatementTag::Bridge);
        }
        if self.is_divisive(scores) {
            tags.push(StatementTag::Divisive);
        }
        tags
    }

    pub fn classify(
        &self,
        matrix: &VoteMatrix,
        labels: &[usize],
        cluster_count: usize,
    ) -> Classification {
        let scored = self.score(matrix, labels, cluster_count);
        let mut classification = Classification {
            skipped: matrix.n_statements() - scored.len(),
            ..Default::default()
        };

        for scores in scored {
            if let Some((mean_rate, variance)) = self.bridge_spread(&scores) {
                classification.bridge.push(BridgeStatement {
                    statement_id: scores.statement_id,
                    mean_rate,
                    variance,
                });
            }
            if self.is_divisive(&scores) {
                classification.divisive.push(DivisiveStatement {
                    statement_id: scores.statement_id,
                    controversy_score: scores.controversy_score(),
                });
            }
            if self.is_consensus(&scores) {
                classification.consensus.push(ConsensusStatement {
                    statement_id: scores.statement_id,
                    overall_rate: scores.overall_rate,
                    per_cluster_rates: scores.per_cluster_rates,
                });
            }
        }

        debug!(
            consensus = classification.consensus.len(),
            bridge = classification.bridge.len(),
            divisive = classification.divisive.len(),
            skipped = classification.skipped,
            "Classified statements"
        );

        classification
    }

    fn is_consensus(&self, scores: &StatementScores) -> bool {
        at_least(scores.overall_rate, self.thresholds.consensus_overall)
            && !scores.per_cluster_rates.is_empty()
            && scores
                .per_cluster_rates
                .iter()
                .all(|rate| rate.is_some_and(|r| at_least(r, self.thresholds.consensus_per_cluster)))
    }

    fn bridge_spread(&self, scores: &StatementScores) -> Option<(f64, f64)> {
        scores.cluster_spread().filter(|(mean, variance)| {
            at_least(*mean, self.thresholds.bridge_mean) && *variance < self.thresholds.bridge_variance
        })
    }

    fn is_divisive(&self, scores: &StatementScores) -> bool {
        at_least(scores.controversy_score(), self.thresholds.divisive_controversy)
    }
}
