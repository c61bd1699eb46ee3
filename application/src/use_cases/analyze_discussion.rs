//! Analyze Discussion use case
//!
//! Loads a snapshot, runs the consensus engine on the blocking pool, ranks
//! the statements and optionally appends the result to the history.

use crate::ports::progress::{AnalysisPhase, AnalysisProgressNotifier, NoProgress};
use crate::ports::result_store::{AnalysisRecord, AnalysisResultStore, ResultStoreError};
use crate::ports::snapshot_source::{SnapshotError, VoteSnapshotSource};
use agora_domain::{
    AnalysisError, ConsensusAnalysisResult, ConsensusEngine, DiscussionId, DiscussionSnapshot,
    InsufficientDataError, RankedStatement, StatementId, StatementRanker,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during an analysis run
///
/// `Clone` so that callers sharing one in-flight run all receive the error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyzeDiscussionError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Store(#[from] ResultStoreError),

    #[error("Analysis worker failed: {0}")]
    Worker(String),
}

impl AnalyzeDiscussionError {
    /// The unmet precondition, when the run failed for lack of data
    pub fn insufficient_data(&self) -> Option<&InsufficientDataError> {
        match self {
            AnalyzeDiscussionError::Analysis(AnalysisError::InsufficientData(e)) => Some(e),
            _ => None,
        }
    }
}

/// Input for the AnalyzeDiscussion use case
#[derive(Debug, Clone)]
pub struct AnalyzeDiscussionInput {
    pub discussion_id: DiscussionId,
    /// Append the result to the store, if one is configured
    pub persist: bool,
}

impl AnalyzeDiscussionInput {
    pub fn new(discussion_id: impl Into<DiscussionId>) -> Self {
        Self {
            discussion_id: discussion_id.into(),
            persist: true,
        }
    }

    pub fn without_persist(mut self) -> Self {
        self.persist = false;
        self
    }
}

/// Everything one run produces
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub discussion_id: DiscussionId,
    /// Number of votes in the analyzed snapshot
    pub vote_count: usize,
    pub result: Arc<ConsensusAnalysisResult>,
    /// Statements in default display order
    pub rankings: Vec<RankedStatement>,
    /// Statement id → text, for display
    pub statement_texts: BTreeMap<StatementId, String>,
}

/// Use case for analyzing one discussion
pub struct AnalyzeDiscussionUseCase<S: VoteSnapshotSource + 'static> {
    source: Arc<S>,
    engine: Arc<ConsensusEngine>,
    ranker: StatementRanker,
    store: Option<Arc<dyn AnalysisResultStore>>,
}

impl<S: VoteSnapshotSource + 'static> AnalyzeDiscussionUseCase<S> {
    pub fn new(source: Arc<S>, engine: ConsensusEngine) -> Self {
        Self {
            source,
            engine: Arc::new(engine),
            ranker: StatementRanker::default(),
            store: None,
        }
    }

    pub fn with_ranker(mut self, ranker: StatementRanker) -> Self {
        self.ranker = ranker;
        self
    }

    pub fn with_store(mut self, store: Arc<dyn AnalysisResultStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: AnalyzeDiscussionInput,
    ) -> Result<AnalysisOutcome, AnalyzeDiscussionError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: AnalyzeDiscussionInput,
        progress: &dyn AnalysisProgressNotifier,
    ) -> Result<AnalysisOutcome, AnalyzeDiscussionError> {
        info!("Starting analysis of discussion {}", input.discussion_id);

        progress.on_phase_start(AnalysisPhase::LoadSnapshot);
        let snapshot = self.source.load_snapshot(&input.discussion_id).await;
        progress.on_phase_complete(AnalysisPhase::LoadSnapshot, snapshot.is_ok());

        self.execute_on_snapshot(input, snapshot?, progress).await
    }

    /// Execute the use case on a snapshot the caller already loaded
    ///
    /// The source is not consulted, so the analyzed votes are exactly the
    /// ones the caller inspected.
    pub async fn execute_on_snapshot(
        &self,
        input: AnalyzeDiscussionInput,
        snapshot: DiscussionSnapshot,
        progress: &dyn AnalysisProgressNotifier,
    ) -> Result<AnalysisOutcome, AnalyzeDiscussionError> {
        let snapshot = Arc::new(snapshot);
        let vote_count = snapshot.vote_count();

        progress.on_phase_start(AnalysisPhase::Analyze);
        let analyzed = self.analyze_blocking(Arc::clone(&snapshot)).await;
        progress.on_phase_complete(AnalysisPhase::Analyze, analyzed.is_ok());
        let result = Arc::new(analyzed?);

        progress.on_phase_start(AnalysisPhase::Rank);
        let rankings = rank_snapshot(&self.ranker, &snapshot);
        progress.on_phase_complete(AnalysisPhase::Rank, true);

        match (&self.store, input.persist) {
            (Some(store), true) => {
                progress.on_phase_start(AnalysisPhase::Persist);
                let record = AnalysisRecord::new(
                    input.discussion_id.clone(),
                    vote_count,
                    result.as_ref().clone(),
                );
                let stored = store.append(&record).await;
                progress.on_phase_complete(AnalysisPhase::Persist, stored.is_ok());
                stored?;
            }
            _ => debug!("Skipping result persistence"),
        }

        Ok(AnalysisOutcome {
            discussion_id: input.discussion_id,
            vote_count,
            result,
            rankings,
            statement_texts: statement_texts(&snapshot),
        })
    }

    /// The engine is CPU-bound, keep it off the async workers
    async fn analyze_blocking(
        &self,
        snapshot: Arc<DiscussionSnapshot>,
    ) -> Result<ConsensusAnalysisResult, AnalyzeDiscussionError> {
        let engine = Arc::clone(&self.engine);
        let result = tokio::task::spawn_blocking(move || engine.analyze(&snapshot))
            .await
            .map_err(|e| AnalyzeDiscussionError::Worker(e.to_string()))??;
        Ok(result)
    }
}

/// Rank the statements of a snapshot by their upstream counters
pub(crate) fn rank_snapshot(
    ranker: &StatementRanker,
    snapshot: &DiscussionSnapshot,
) -> Vec<RankedStatement> {
    let counts = snapshot.statement_counts();
    ranker.rank(counts.iter().map(|(id, tally)| (*id, tally)))
}

pub(crate) fn statement_texts(snapshot: &DiscussionSnapshot) -> BTreeMap<StatementId, String> {
    snapshot
        .statements
        .iter()
        .map(|s| (s.id, s.text.clone()))
        .collect()
}
