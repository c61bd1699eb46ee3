//! In-memory adapters and snapshots shared by the use case tests

use crate::ports::result_store::{AnalysisRecord, AnalysisResultStore, ResultStoreError};
use crate::ports::snapshot_source::{SnapshotError, VoteSnapshotSource};
use agora_domain::{DiscussionId, DiscussionSnapshot, Statement, VoteChoice, VoteRecord};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Snapshot source backed by a map, counting every load
#[derive(Default)]
pub struct InMemorySource {
    snapshots: HashMap<DiscussionId, DiscussionSnapshot>,
    delay: Option<Duration>,
    loads: AtomicUsize,
}

impl InMemorySource {
    pub fn with(mut self, snapshot: DiscussionSnapshot) -> Self {
        self.snapshots.insert(snapshot.discussion_id.clone(), snapshot);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VoteSnapshotSource for InMemorySource {
    async fn load_snapshot(
        &self,
        discussion: &DiscussionId,
    ) -> Result<DiscussionSnapshot, SnapshotError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.snapshots
            .get(discussion)
            .cloned()
            .ok_or_else(|| SnapshotError::NotFound(discussion.clone()))
    }
}

/// Result store backed by a vector
#[derive(Default)]
pub struct InMemoryStore {
    pub records: Mutex<Vec<AnalysisRecord>>,
}

#[async_trait]
impl AnalysisResultStore for InMemoryStore {
    async fn append(&self, record: &AnalysisRecord) -> Result<(), ResultStoreError> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn latest(
        &self,
        discussion: &DiscussionId,
    ) -> Result<Option<AnalysisRecord>, ResultStoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|r| &r.discussion_id == discussion)
            .cloned())
    }
}

/// 10 users in two mirrored camps over statements 1-10, everyone agreeing
/// with statement 0. Statement counters are filled in from the votes.
pub fn two_camps(discussion: &str) -> DiscussionSnapshot {
    let mut votes = Vec::new();
    for user in 1..=10u64 {
        votes.push(VoteRecord::new(user, 0, VoteChoice::Agree));
        for statement in 1..=10u64 {
            let vote = if (user <= 5) == (statement <= 5) {
                VoteChoice::Agree
            } else {
                VoteChoice::Disagree
            };
            votes.push(VoteRecord::new(user, statement, vote));
        }
    }
    with_counts(discussion, 0..=10, votes)
}

/// Three users, four statements: far below every precondition
pub fn too_small(discussion: &str) -> DiscussionSnapshot {
    let votes = vec![
        VoteRecord::new(1, 1, VoteChoice::Agree),
        VoteRecord::new(2, 1, VoteChoice::Agree),
        VoteRecord::new(3, 1, VoteChoice::Disagree),
        VoteRecord::new(1, 2, VoteChoice::Disagree),
        VoteRecord::new(2, 3, VoteChoice::Unsure),
    ];
    with_counts(discussion, 1..=4, votes)
}

fn with_counts(
    discussion: &str,
    statement_ids: impl IntoIterator<Item = u64>,
    votes: Vec<VoteRecord>,
) -> DiscussionSnapshot {
    let now = Utc::now();
    let mut snapshot = DiscussionSnapshot::new(
        discussion,
        statement_ids
            .into_iter()
            .map(|id| Statement::new(id, format!("statement {id}"), now))
            .collect(),
        votes,
    );
    let tallies = snapshot.tallies_from_votes();
    for statement in &mut snapshot.statements {
        statement.counts = tallies.get(&statement.id).copied().unwrap_or_default();
    }
    snapshot
}
