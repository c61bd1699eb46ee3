//! JSON file snapshot source
//!
//! Reads `<root>/<discussion>.json`:
//!
//! ```json
//! {
//!   "statements": [
//!     {"id": 1, "text": "More bike lanes", "created_at": "2026-03-01T09:00:00Z",
//!      "counts": {"agree": 12, "disagree": 3, "unsure": 1}},
//!     {"id": 2, "text": "Close the bridge", "created_at": "2026-03-01T09:05:00Z",
//!      "deleted": true}
//!   ],
//!   "deleted_users": [17],
//!   "votes": [{"user_id": 4, "statement_id": 1, "vote": "agree"}]
//! }
//! ```
//!
//! Soft-deleted statements and users are dropped here, together with their
//! votes, so the engine only ever sees live data. Votes on statements the
//! file does not list are kept and rejected by the engine as unknown.
//! Statements without `counts` get their counters recounted from the live
//! votes.

use agora_application::{SnapshotError, VoteSnapshotSource};
use agora_domain::{
    DiscussionId, DiscussionSnapshot, Statement, StatementId, UserId, VoteRecord, VoteTally,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct SnapshotFile {
    statements: Vec<StatementEntry>,
    #[serde(default)]
    deleted_users: Vec<UserId>,
    #[serde(default)]
    votes: Vec<VoteRecord>,
}

#[derive(Debug, Deserialize)]
struct StatementEntry {
    id: StatementId,
    text: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    counts: Option<VoteTally>,
    #[serde(default)]
    deleted: bool,
}

impl SnapshotFile {
    fn into_snapshot(self, discussion: &DiscussionId) -> DiscussionSnapshot {
        let deleted_users: BTreeSet<UserId> = self.deleted_users.into_iter().collect();
        let deleted_statements: BTreeSet<StatementId> = self
            .statements
            .iter()
            .filter(|s| s.deleted)
            .map(|s| s.id)
            .collect();

        // Votes on unlisted statements pass through for the engine to reject
        let total_votes = self.votes.len();
        let votes: Vec<VoteRecord> = self
            .votes
            .into_iter()
            .filter(|v| {
                !deleted_statements.contains(&v.statement_id) && !deleted_users.contains(&v.user_id)
            })
            .collect();
        if votes.len() < total_votes {
            debug!(
                discussion = %discussion,
                dropped = total_votes - votes.len(),
                "Dropped votes on deleted statements or by deleted users"
            );
        }

        let mut snapshot = DiscussionSnapshot::new(discussion.clone(), Vec::new(), votes);
        let recounted = snapshot.tallies_from_votes();
        snapshot.statements = self
            .statements
            .into_iter()
            .filter(|s| !s.deleted)
            .map(|s| {
                let counts = s
                    .counts
                    .unwrap_or_else(|| recounted.get(&s.id).copied().unwrap_or_default());
                Statement::new(s.id, s.text, s.created_at).with_counts(counts)
            })
            .collect();
        snapshot
    }
}

/// Loads snapshots from JSON files in a directory
pub struct JsonSnapshotSource {
    root: PathBuf,
}

impl JsonSnapshotSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing a discussion, or `None` for ids that would escape the root
    pub fn path_for(&self, discussion: &DiscussionId) -> Option<PathBuf> {
        let id = discussion.as_str();
        let valid = !id.is_empty()
            && id != "."
            && id != ".."
            && !id.contains(['/', '\\'])
            && !id.starts_with('.');
        valid.then(|| self.root.join(format!("{id}.json")))
    }
}

#[async_trait]
impl VoteSnapshotSource for JsonSnapshotSource {
    async fn load_snapshot(
        &self,
        discussion: &DiscussionId,
    ) -> Result<DiscussionSnapshot, SnapshotError> {
        let path = self
            .path_for(discussion)
            .ok_or_else(|| SnapshotError::Malformed {
                discussion: discussion.clone(),
                message: "invalid discussion id".to_string(),
            })?;

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => SnapshotError::NotFound(discussion.clone()),
                _ => SnapshotError::Io(format!("{}: {}", path.display(), e)),
            })?;

        let file: SnapshotFile =
            serde_json::from_str(&content).map_err(|e| SnapshotError::Malformed {
                discussion: discussion.clone(),
                message: e.to_string(),
            })?;

        let snapshot = file.into_snapshot(discussion);
        debug!(
            discussion = %discussion,
            path = %path.display(),
            statements = snapshot.statements.len(),
            votes = snapshot.vote_count(),
            "Loaded snapshot"
        );
        Ok(snapshot)
    }
}
