//! Statement entity

use super::vote::VoteTally;
use crate::core::ids::StatementId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short, user-submitted proposition that participants vote on
///
/// The counters are denormalized upstream and consumed read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub id: StatementId,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// Upstream-maintained agree/disagree/unsure counters
    #[serde(default)]
    pub counts: VoteTally,
}

impl Statement {
    pub fn new(id: impl Into<StatementId>, text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            created_at,
            counts: VoteTally::default(),
        }
    }

    pub fn with_counts(mut self, counts: VoteTally) -> Self {
        self.counts = counts;
        self
    }
}
