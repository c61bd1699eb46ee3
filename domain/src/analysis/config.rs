//! Tunable constants of the analysis pipeline.
//!
//! The defaults are design constants carried over from the product; they are
//! not known to be optimal, so every one of them can be overridden from the
//! configuration file.
//!
//! - [`MatrixPreconditions`]: minimum data before clustering is attempted
//! - [`ClusteringParams`]: candidate cluster counts and quality floor
//! - [`ClassificationThresholds`]: consensus / bridge / divisive cut-offs

use serde::{Deserialize, Serialize};

/// Minimum amount of data required before the matrix is analyzed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixPreconditions {
    pub min_users: usize,
    pub min_statements: usize,
    pub min_votes: usize,
}

impl Default for MatrixPreconditions {
    fn default() -> Self {
        Self {
            min_users: 7,
            min_statements: 7,
            min_votes: 50,
        }
    }
}

/// Parameters of the cluster-count search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringParams {
    /// Smallest candidate k
    pub min_clusters: usize,
    /// Largest candidate k (further capped by `users - 1`)
    pub max_clusters: usize,
    /// Silhouette below which a [`DegenerateResultWarning`](crate::DegenerateResultWarning) is attached
    pub degenerate_quality: f64,
}

impl Default for ClusteringParams {
    fn default() -> Self {
        Self {
            min_clusters: 2,
            max_clusters: 5,
            degenerate_quality: 0.2,
        }
    }
}

/// Cut-offs used to tag statements
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationThresholds {
    /// Minimum overall agreement rate for consensus
    pub consensus_overall: f64,
    /// Minimum agreement rate inside every cluster for consensus
    pub consensus_per_cluster: f64,
    /// Minimum mean per-cluster agreement rate for a bridge
    pub bridge_mean: f64,
    /// Per-cluster agreement variance must stay strictly below this for a bridge
    pub bridge_variance: f64,
    /// Minimum controversy score for a divisive statement
    pub divisive_controversy: f64,
    /// Statements with fewer votes are not classified at all
    pub min_statement_votes: u64,
}

impl Default for ClassificationThresholds {
    fn default() -> Self {
        Self {
            consensus_overall: 0.70,
            consensus_per_cluster: 0.60,
            bridge_mean: 0.65,
            bridge_variance: 0.15,
            divisive_controversy: 0.70,
            min_statement_votes: 3,
        }
    }
}

/// Complete configuration of a [`ConsensusEngine`](super::engine::ConsensusEngine)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub preconditions: MatrixPreconditions,
    pub clustering: ClusteringParams,
    pub thresholds: ClassificationThresholds,
}

impl AnalysisConfig {
    // ==================== Builder Methods ====================

    pub fn with_preconditions(mut self, preconditions: MatrixPreconditions) -> Self {
        self.preconditions = preconditions;
        self
    }

    pub fn with_clustering(mut self, clustering: ClusteringParams) -> Self {
        self.clustering = clustering;
        self
    }

    pub fn with_thresholds(mut self, thresholds: ClassificationThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }
}
