//! Consensus analysis pipeline
//!
//! ```text
//! votes ─▶ VoteMatrixBuilder ─▶ DimensionalityReducer ─▶ ClusterSelector
//!                  │                                           │
//!                  └──────────────▶ StatementClassifier ◀──────┘
//!                                          │
//!                                          ▼
//!                               ConsensusAnalysisResult
//! ```
//!
//! The engine is stateless: it reads one immutable snapshot and returns one
//! immutable result. It performs no I/O and takes time roughly proportional
//! to `users × statements` plus `users²` for clustering, so callers should
//! run it off their request threads.

use super::classification::StatementClassifier;
use super::clustering::ClusterSelector;
use super::config::AnalysisConfig;
use super::matrix::VoteMatrixBuilder;
use super::reduction::DimensionalityReducer;
use super::result::{AnalysisDiagnostics, ConsensusAnalysisResult, ResultParts};
use crate::core::error::{AnalysisError, InsufficientDataError, Precondition};
use crate::core::ids::StatementId;
use crate::discussion::snapshot::DiscussionSnapshot;
use crate::discussion::vote::VoteRecord;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Runs the full analysis for one discussion snapshot
#[derive(Debug, Clone, Default)]
pub struct ConsensusEngine {
    config: AnalysisConfig,
    reducer: DimensionalityReducer,
}

impl ConsensusEngine {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            reducer: DimensionalityReducer::default(),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn analyze(
        &self,
        snapshot: &DiscussionSnapshot,
    ) -> Result<ConsensusAnalysisResult, AnalysisError> {
        debug!(
            discussion = %snapshot.discussion_id,
            votes = snapshot.vote_count(),
            statements = snapshot.statements.len(),
            "Analyzing discussion snapshot"
        );
        self.analyze_votes(&snapshot.votes, &snapshot.live_statement_ids())
    }

    /// Analyze raw vote records against a set of live statement ids
    pub fn analyze_votes(
        &self,
        votes: &[VoteRecord],
        live_statements: &BTreeSet<StatementId>,
    ) -> Result<ConsensusAnalysisResult, AnalysisError> {
        let matrix = VoteMatrixBuilder::new(self.config.preconditions).build(votes, live_statements)?;

        // Every candidate k needs at least one more user than groups
        let min_users = self.config.clustering.min_clusters + 1;
        if matrix.users().len() < min_users {
            return Err(InsufficientDataError {
                precondition: Precondition::MinUsers,
                required: min_users,
                actual: matrix.users().len(),
            }
            .into());
        }

        let projection = self.reducer.project(&matrix);

        let selection = ClusterSelector::new(self.config.clustering).select(&projection.coordinates);

        let classification = StatementClassifier::new(self.config.thresholds).classify(
            &matrix,
            &selection.labels,
            selection.cluster_count,
        );

        let users = matrix.users();
        let clusters = users
            .iter()
            .zip(&selection.labels)
            .map(|(user, label)| (*user, *label))
            .collect();
        let coordinates = users
            .iter()
            .zip(&projection.coordinates)
            .map(|(user, xy)| (*user, *xy))
            .collect();

        let result = ConsensusAnalysisResult::assemble(
            ResultParts {
                cluster_count: selection.cluster_count,
                quality_score: selection.quality_score,
                clusters,
                coordinates,
                consensus_statements: classification.consensus,
                bridge_statements: classification.bridge,
                divisive_statements: classification.divisive,
                matrix_shape: matrix.shape(),
                diagnostics: AnalysisDiagnostics {
                    candidates: selection.candidates,
                    explained_variance: projection.explained_variance,
                    sparsity: matrix.sparsity(),
                    skipped_statements: classification.skipped,
                },
            },
            self.config.clustering.degenerate_quality,
        );

        for warning in result.warnings() {
            warn!("{}", warning);
        }

        info!(
            users = result.matrix_shape().users,
            statements = result.matrix_shape().statements,
            clusters = result.cluster_count(),
            quality = result.quality_score(),
            consensus = result.consensus_statements().len(),
            bridge = result.bridge_statements().len(),
            divisive = result.divisive_statements().len(),
            "Consensus analysis complete"
        );

        Ok(result)
    }
}
