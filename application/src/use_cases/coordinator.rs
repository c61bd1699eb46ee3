//! Analysis coordinator
//!
//! Deduplicates concurrent analyses of the same discussion: a caller that
//! arrives while a run is in flight awaits that run instead of starting a
//! second one. Runs for different discussions proceed independently.
//!
//! Deduplication only saves work. Two overlapping runs would still produce
//! equal results because the engine is deterministic.

use super::analyze_discussion::{
    AnalysisOutcome, AnalyzeDiscussionError, AnalyzeDiscussionInput, AnalyzeDiscussionUseCase,
};
use crate::ports::snapshot_source::VoteSnapshotSource;
use agora_domain::DiscussionId;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::debug;

type SharedRun = Shared<BoxFuture<'static, Result<AnalysisOutcome, AnalyzeDiscussionError>>>;

struct InFlight {
    generation: u64,
    run: SharedRun,
}

/// Runs analyses, sharing in-flight runs per discussion
pub struct AnalysisCoordinator<S: VoteSnapshotSource + 'static> {
    use_case: Arc<AnalyzeDiscussionUseCase<S>>,
    in_flight: Mutex<HashMap<DiscussionId, InFlight>>,
    next_generation: AtomicU64,
}

impl<S: VoteSnapshotSource + 'static> AnalysisCoordinator<S> {
    pub fn new(use_case: Arc<AnalyzeDiscussionUseCase<S>>) -> Self {
        Self {
            use_case,
            in_flight: Mutex::new(HashMap::new()),
            next_generation: AtomicU64::new(0),
        }
    }

    /// Analyze a discussion, joining a run that is already in progress
    pub async fn analyze(
        &self,
        discussion_id: DiscussionId,
    ) -> Result<AnalysisOutcome, AnalyzeDiscussionError> {
        let (generation, run) = self.join_or_start(&discussion_id).await;
        let outcome = run.await;

        let mut in_flight = self.in_flight.lock().await;
        if in_flight
            .get(&discussion_id)
            .is_some_and(|entry| entry.generation == generation)
        {
            in_flight.remove(&discussion_id);
        }

        outcome
    }

    /// Number of discussions currently being analyzed
    pub async fn in_flight_count(&self) -> usize {
        self.in_flight.lock().await.len()
    }

    async fn join_or_start(&self, discussion_id: &DiscussionId) -> (u64, SharedRun) {
        let mut in_flight = self.in_flight.lock().await;
        if let Some(entry) = in_flight.get(discussion_id) {
            debug!("Joining in-flight analysis of {}", discussion_id);
            return (entry.generation, entry.run.clone());
        }

        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let use_case = Arc::clone(&self.use_case);
        let input = AnalyzeDiscussionInput::new(discussion_id.clone());
        let run = async move { use_case.execute(input).await }.boxed().shared();

        in_flight.insert(
            discussion_id.clone(),
            InFlight {
                generation,
                run: run.clone(),
            },
        );
        (generation, run)
    }
}
