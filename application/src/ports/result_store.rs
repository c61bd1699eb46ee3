//! Analysis result store port
//!
//! Results are immutable values. A store only ever appends: a newer record
//! for the same discussion supersedes the older ones, nothing is rewritten.

use agora_domain::{ConsensusAnalysisResult, DiscussionId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while reading or writing analysis records
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResultStoreError {
    #[error("Result store I/O error: {0}")]
    Io(String),

    #[error("Malformed analysis record: {0}")]
    Malformed(String),
}

/// One completed analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub discussion_id: DiscussionId,
    /// When the run finished
    pub recorded_at: DateTime<Utc>,
    /// Number of votes in the analyzed snapshot
    pub vote_count: usize,
    pub result: ConsensusAnalysisResult,
}

impl AnalysisRecord {
    /// Create a record stamped with the current UTC time
    pub fn new(
        discussion_id: DiscussionId,
        vote_count: usize,
        result: ConsensusAnalysisResult,
    ) -> Self {
        Self {
            discussion_id,
            recorded_at: Utc::now(),
            vote_count,
            result,
        }
    }
}

/// Append-only history of analysis results
#[async_trait]
pub trait AnalysisResultStore: Send + Sync {
    /// Append a record
    async fn append(&self, record: &AnalysisRecord) -> Result<(), ResultStoreError>;

    /// The most recent record of a discussion, if it was ever analyzed
    async fn latest(
        &self,
        discussion: &DiscussionId,
    ) -> Result<Option<AnalysisRecord>, ResultStoreError>;
}

/// Store that keeps nothing, for when history is disabled
pub struct NoResultStore;

#[async_trait]
impl AnalysisResultStore for NoResultStore {
    async fn append(&self, _record: &AnalysisRecord) -> Result<(), ResultStoreError> {
        Ok(())
    }

    async fn latest(
        &self,
        _discussion: &DiscussionId,
    ) -> Result<Option<AnalysisRecord>, ResultStoreError> {
        Ok(None)
    }
}
