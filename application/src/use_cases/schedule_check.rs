//! Schedule check use case
//!
//! Evaluates the recalculation policy against the analysis history.

use crate::ports::result_store::{AnalysisResultStore, ResultStoreError};
use agora_domain::{DiscussionId, RecalculationPolicy};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

/// Outcome of a schedule check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleDecision {
    pub due: bool,
    /// When the discussion was last analyzed, if ever
    pub last_run: Option<DateTime<Utc>>,
    /// Votes counted as new for this decision
    pub new_votes: u64,
}

/// Decides whether a discussion should be analyzed again
pub struct ScheduleCheck {
    policy: RecalculationPolicy,
    store: Arc<dyn AnalysisResultStore>,
}

impl ScheduleCheck {
    pub fn new(policy: RecalculationPolicy, store: Arc<dyn AnalysisResultStore>) -> Self {
        Self { policy, store }
    }

    pub fn policy(&self) -> &RecalculationPolicy {
        &self.policy
    }

    /// Check against the current time
    ///
    /// Without an explicit `new_votes`, votes added since the last recorded
    /// run are derived from `current_vote_count`.
    pub async fn check(
        &self,
        discussion: &DiscussionId,
        current_vote_count: usize,
        new_votes: Option<u64>,
    ) -> Result<ScheduleDecision, ResultStoreError> {
        self.check_at(discussion, current_vote_count, new_votes, Utc::now())
            .await
    }

    pub async fn check_at(
        &self,
        discussion: &DiscussionId,
        current_vote_count: usize,
        new_votes: Option<u64>,
        now: DateTime<Utc>,
    ) -> Result<ScheduleDecision, ResultStoreError> {
        let latest = self.store.latest(discussion).await?;
        let last_run = latest.as_ref().map(|r| r.recorded_at);
        let new_votes = new_votes.unwrap_or_else(|| {
            let previous = latest.as_ref().map_or(0, |r| r.vote_count);
            current_vote_count.saturating_sub(previous) as u64
        });

        let due = self.policy.should_recalculate(last_run, new_votes, now);
        debug!(
            discussion = %discussion,
            new_votes,
            due,
            "Checked recalculation schedule"
        );

        Ok(ScheduleDecision {
            due,
            last_run,
            new_votes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::result_store::{AnalysisRecord, NoResultStore};
    use crate::use_cases::fixtures::{InMemoryStore, two_camps};
    use agora_domain::ConsensusEngine;
    use chrono::Duration;

    async fn store_with_run(vote_count: usize, recorded_at: DateTime<Utc>) -> Arc<InMemoryStore> {
        let result = ConsensusEngine::default().analyze(&two_camps("d")).unwrap();
        let mut record = AnalysisRecord::new(DiscussionId::new("d"), vote_count, result);
        record.recorded_at = recorded_at;
        let store = Arc::new(InMemoryStore::default());
        store.append(&record).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_never_analyzed_with_enough_votes() {
        let check = ScheduleCheck::new(RecalculationPolicy::default(), Arc::new(NoResultStore));
        let decision = check.check(&DiscussionId::new("d"), 60, None).await.unwrap();

        assert!(decision.due);
        assert_eq!(decision.last_run, None);
        assert_eq!(decision.new_votes, 60);
    }

    #[tokio::test]
    async fn test_new_votes_derived_from_history() {
        let now = Utc::now();
        let store = store_with_run(100, now - Duration::hours(8)).await;
        let check = ScheduleCheck::new(RecalculationPolicy::default(), store);

        let decision = check
            .check_at(&DiscussionId::new("d"), 105, None, now)
            .await
            .unwrap();
        assert_eq!(decision.new_votes, 5);
        assert!(!decision.due);

        let decision = check
            .check_at(&DiscussionId::new("d"), 130, None, now)
            .await
            .unwrap();
        assert!(decision.due);
    }

    #[tokio::test]
    async fn test_recent_run_is_not_due() {
        let now = Utc::now();
        let store = store_with_run(100, now - Duration::hours(2)).await;
        let check = ScheduleCheck::new(RecalculationPolicy::default(), store);

        let decision = check
            .check_at(&DiscussionId::new("d"), 500, Some(400), now)
            .await
            .unwrap();
        assert!(!decision.due);
        assert_eq!(decision.new_votes, 400);
        assert!(decision.last_run.is_some());
    }
}
