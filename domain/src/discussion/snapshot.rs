//! Immutable vote snapshot of one discussion
//!
//! The snapshot is the only input of an analysis run. The caller is
//! responsible for excluding soft-deleted statements and users before
//! building it.

use super::statement::Statement;
use super::vote::{VoteRecord, VoteTally};
use crate::core::ids::{DiscussionId, StatementId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Statements and current votes of one discussion at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscussionSnapshot {
    pub discussion_id: DiscussionId,
    /// Live (non-deleted) statements
    pub statements: Vec<Statement>,
    /// Current votes, at most one per (user, statement)
    pub votes: Vec<VoteRecord>,
}

impl DiscussionSnapshot {
    pub fn new(
        discussion_id: impl Into<DiscussionId>,
        statements: Vec<Statement>,
        votes: Vec<VoteRecord>,
    ) -> Self {
        Self {
            discussion_id: discussion_id.into(),
            statements,
            votes,
        }
    }

    /// Ids of all live statements
    pub fn live_statement_ids(&self) -> BTreeSet<StatementId> {
        self.statements.iter().map(|s| s.id).collect()
    }

    /// Per-statement tallies recomputed from the vote records
    pub fn tallies_from_votes(&self) -> BTreeMap<StatementId, VoteTally> {
        let mut tallies: BTreeMap<StatementId, VoteTally> = BTreeMap::new();
        for vote in &self.votes {
            tallies.entry(vote.statement_id).or_default().record(vote.vote);
        }
        tallies
    }

    /// Per-statement tallies taken from the upstream counters
    pub fn statement_counts(&self) -> Vec<(StatementId, VoteTally)> {
        self.statements.iter().map(|s| (s.id, s.counts)).collect()
    }

    pub fn vote_count(&self) -> usize {
        self.votes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discussion::vote::VoteChoice;
    use chrono::Utc;

    #[test]
    fn test_tallies_from_votes() {
        let now = Utc::now();
        let snapshot = DiscussionSnapshot::new(
            "d1",
            vec![Statement::new(1, "a", now), Statement::new(2, "b", now)],
            vec![
                VoteRecord::new(1, 1, VoteChoice::Agree),
                VoteRecord::new(2, 1, VoteChoice::Disagree),
                VoteRecord::new(3, 1, VoteChoice::Agree),
                VoteRecord::new(1, 2, VoteChoice::Unsure),
            ],
        );

        let tallies = snapshot.tallies_from_votes();
        assert_eq!(tallies[&StatementId(1)], VoteTally::new(2, 1, 0));
        assert_eq!(tallies[&StatementId(2)], VoteTally::new(0, 0, 1));
        assert_eq!(snapshot.live_statement_ids().len(), 2);
        assert_eq!(snapshot.vote_count(), 4);
    }
}
