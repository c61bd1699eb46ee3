//! Vote snapshot source port
//!
//! Defines how the application layer obtains the immutable vote snapshot of
//! a discussion. Adapters live in the infrastructure layer.

use agora_domain::{DiscussionId, DiscussionSnapshot};
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while loading a snapshot
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("Discussion not found: {0}")]
    NotFound(DiscussionId),

    #[error("Malformed snapshot for discussion {discussion}: {message}")]
    Malformed {
        discussion: DiscussionId,
        message: String,
    },

    #[error("Snapshot I/O error: {0}")]
    Io(String),
}

/// Source of discussion snapshots
///
/// The returned snapshot must already exclude soft-deleted statements and
/// users; the engine treats everything it receives as live.
#[async_trait]
pub trait VoteSnapshotSource: Send + Sync {
    /// Load the current snapshot of a discussion
    async fn load_snapshot(
        &self,
        discussion: &DiscussionId,
    ) -> Result<DiscussionSnapshot, SnapshotError>;
}
