//! Analysis result value object
//!
//! [`ConsensusAnalysisResult`] is created once per run and never mutated.
//! A later run produces a new value that supersedes it; callers own
//! persistence and retention.

use super::classification::{BridgeStatement, ConsensusStatement, DivisiveStatement};
use super::clustering::CandidateScore;
use super::matrix::MatrixShape;
use crate::core::error::{AnalysisWarning, DegenerateResultWarning};
use crate::core::ids::{StatementId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Numbers that explain how the result came about, for logs and debugging
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisDiagnostics {
    /// Silhouette of every evaluated cluster count
    pub candidates: Vec<CandidateScore>,
    /// Share of variance captured by the x and y axes
    pub explained_variance: [f64; 2],
    /// Fraction of the matrix without votes
    pub sparsity: f64,
    /// Statements left unclassified for having too few votes
    pub skipped_statements: usize,
}

/// Immutable output of one consensus analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusAnalysisResult {
    cluster_count: usize,
    /// Silhouette coefficient of the selected clustering, in [-1, 1]
    quality_score: f64,
    clusters: BTreeMap<UserId, usize>,
    coordinates: BTreeMap<UserId, [f64; 2]>,
    consensus_statements: Vec<ConsensusStatement>,
    bridge_statements: Vec<BridgeStatement>,
    divisive_statements: Vec<DivisiveStatement>,
    matrix_shape: MatrixShape,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<AnalysisWarning>,
    #[serde(default)]
    diagnostics: AnalysisDiagnostics,
}

/// Parts handed to [`ConsensusAnalysisResult::assemble`]
#[derive(Debug, Clone)]
pub struct ResultParts {
    pub cluster_count: usize,
    pub quality_score: f64,
    pub clusters: BTreeMap<UserId, usize>,
    pub coordinates: BTreeMap<UserId, [f64; 2]>,
    pub consensus_statements: Vec<ConsensusStatement>,
    pub bridge_statements: Vec<BridgeStatement>,
    pub divisive_statements: Vec<DivisiveStatement>,
    pub matrix_shape: MatrixShape,
    pub diagnostics: AnalysisDiagnostics,
}

impl ConsensusAnalysisResult {
    /// Assemble the final value, attaching a [`DegenerateResultWarning`] when
    /// the quality score falls below `degenerate_quality`
    pub fn assemble(parts: ResultParts, degenerate_quality: f64) -> Self {
        let mut warnings = Vec::new();
        if parts.quality_score < degenerate_quality {
            warnings.push(AnalysisWarning::DegenerateResult(DegenerateResultWarning {
                quality_score: parts.quality_score,
                threshold: degenerate_quality,
            }));
        }

        Self {
            cluster_count: parts.cluster_count,
            quality_score: parts.quality_score,
            clusters: parts.clusters,
            coordinates: parts.coordinates,
            consensus_statements: parts.consensus_statements,
            bridge_statements: parts.bridge_statements,
            divisive_statements: parts.divisive_statements,
            matrix_shape: parts.matrix_shape,
            warnings,
            diagnostics: parts.diagnostics,
        }
    }

    pub fn cluster_count(&self) -> usize {
        self.cluster_count
    }

    pub fn quality_score(&self) -> f64 {
        self.quality_score
    }

    /// User → cluster index
    pub fn clusters(&self) -> &BTreeMap<UserId, usize> {
        &self.clusters
    }

    /// User → projected `[x, y]`, for visualization only
    pub fn coordinates(&self) -> &BTreeMap<UserId, [f64; 2]> {
        &self.coordinates
    }

    pub fn consensus_statements(&self) -> &[ConsensusStatement] {
        &self.consensus_statements
    }

    pub fn bridge_statements(&self) -> &[BridgeStatement] {
        &self.bridge_statements
    }

    pub fn divisive_statements(&self) -> &[DivisiveStatement] {
        &self.divisive_statements
    }

    pub fn matrix_shape(&self) -> MatrixShape {
        self.matrix_shape
    }

    pub fn warnings(&self) -> &[AnalysisWarning] {
        &self.warnings
    }

    pub fn diagnostics(&self) -> &AnalysisDiagnostics {
        &self.diagnostics
    }

    pub fn cluster_of(&self, user: UserId) -> Option<usize> {
        self.clusters.get(&user).copied()
    }

    /// Number of users per cluster, indexed by cluster
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.cluster_count];
        for cluster in self.clusters.values() {
            if let Some(size) = sizes.get_mut(*cluster) {
                *size += 1;
            }
        }
        sizes
    }

    /// The degenerate-result warning, if one was attached
    pub fn degenerate_warning(&self) -> Option<&DegenerateResultWarning> {
        self.warnings.iter().find_map(|w| match w {
            AnalysisWarning::DegenerateResult(d) => Some(d),
        })
    }

    /// Whether the opinion groups are reliable enough to present
    pub fn has_clear_groups(&self) -> bool {
        self.degenerate_warning().is_none()
    }

    pub fn is_consensus(&self, statement: StatementId) -> bool {
        self.consensus_statements
            .iter()
            .any(|s| s.statement_id == statement)
    }

    pub fn is_bridge(&self, statement: StatementId) -> bool {
        self.bridge_statements
            .iter()
            .any(|s| s.statement_id == statement)
    }

    pub fn is_divisive(&self, statement: StatementId) -> bool {
        self.divisive_statements
            .iter()
            .any(|s| s.statement_id == statement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(quality_score: f64) -> ResultParts {
        let clusters: BTreeMap<UserId, usize> =
            [(UserId(1), 0), (UserId(2), 0), (UserId(3), 1)].into_iter().collect();
        let coordinates = clusters
            .keys()
            .map(|u| (*u, [u.0 as f64, 0.0]))
            .collect();
        ResultParts {
            cluster_count: 2,
            quality_score,
            clusters,
            coordinates,
            consensus_statements: vec![ConsensusStatement {
                statement_id: StatementId(4),
                overall_rate: 0.9,
                per_cluster_rates: vec![Some(1.0), None],
            }],
            bridge_statements: vec![],
            divisive_statements: vec![DivisiveStatement {
                statement_id: StatementId(5),
                controversy_score: 1.0,
            }],
            matrix_shape: MatrixShape {
                users: 3,
                statements: 2,
            },
            diagnostics: AnalysisDiagnostics::default(),
        }
    }

    #[test]
    fn test_low_quality_attaches_warning() {
        let result = ConsensusAnalysisResult::assemble(parts(0.05), 0.2);
        assert!(!result.has_clear_groups());
        let warning = result.degenerate_warning().unwrap();
        assert_eq!(warning.quality_score, 0.05);
        assert_eq!(warning.threshold, 0.2);
    }

    #[test]
    fn test_good_quality_has_no_warning() {
        let result = ConsensusAnalysisResult::assemble(parts(0.8), 0.2);
        assert!(result.has_clear_groups());
        assert!(result.warnings().is_empty());
    }

    #[test]
    fn test_accessors() {
        let result = ConsensusAnalysisResult::assemble(parts(0.8), 0.2);
        assert_eq!(result.cluster_sizes(), vec![2, 1]);
        assert_eq!(result.cluster_of(UserId(3)), Some(1));
        assert!(result.is_consensus(StatementId(4)));
        assert!(result.is_divisive(StatementId(5)));
        assert!(!result.is_bridge(StatementId(4)));
    }

    #[test]
    fn test_serialized_layout() {
        let result = ConsensusAnalysisResult::assemble(parts(0.8), 0.2);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["cluster_count"], 2);
        assert_eq!(json["clusters"]["3"], 1);
        assert_eq!(json["coordinates"]["2"][0], 2.0);
        assert_eq!(json["consensus_statements"][0]["statement_id"], 4);
        assert!(json["consensus_statements"][0]["per_cluster_rates"][1].is_null());
        assert_eq!(json["divisive_statements"][0]["controversy_score"], 1.0);
        assert_eq!(json["matrix_shape"]["users"], 3);
        assert!(json.get("warnings").is_none());

        let back: ConsensusAnalysisResult = serde_json::from_value(json).unwrap();
        assert_eq!(back.clusters(), result.clusters());
        assert_eq!(back.matrix_shape(), result.matrix_shape());
    }
}
