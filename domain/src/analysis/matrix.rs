//! Vote matrix construction
//!
//! Turns raw `(user, statement, vote)` triples into a dense users × statements
//! grid. A cell is `None` when the user never voted on the statement, which is
//! deliberately different from an explicit [`VoteChoice::Unsure`].

use super::config::MatrixPreconditions;
use crate::core::error::{AnalysisError, InsufficientDataError, Precondition};
use crate::core::ids::{StatementId, UserId};
use crate::discussion::vote::{VoteChoice, VoteRecord, VoteTally};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::debug;

/// Dimensions of a vote matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixShape {
    pub users: usize,
    pub statements: usize,
}

/// Users × statements vote grid
///
/// Rows are distinct voting users in ascending id order, columns are the
/// statements that received at least one vote, also in ascending id order.
/// Every row has at least one non-missing cell by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct VoteMatrix {
    users: Vec<UserId>,
    statements: Vec<StatementId>,
    user_index: BTreeMap<UserId, usize>,
    statement_index: BTreeMap<StatementId, usize>,
    /// Row-major cells
    cells: Vec<Option<VoteChoice>>,
    vote_count: usize,
}

impl VoteMatrix {
    pub fn shape(&self) -> MatrixShape {
        MatrixShape {
            users: self.users.len(),
            statements: self.statements.len(),
        }
    }

    pub fn n_users(&self) -> usize {
        self.users.len()
    }

    pub fn n_statements(&self) -> usize {
        self.statements.len()
    }

    /// Row index → user id
    pub fn users(&self) -> &[UserId] {
        &self.users
    }

    /// Column index → statement id
    pub fn statements(&self) -> &[StatementId] {
        &self.statements
    }

    pub fn user_index(&self, user: UserId) -> Option<usize> {
        self.user_index.get(&user).copied()
    }

    pub fn statement_index(&self, statement: StatementId) -> Option<usize> {
        self.statement_index.get(&statement).copied()
    }

    /// Cell at `(row, col)`; `None` means "never voted"
    pub fn get(&self, row: usize, col: usize) -> Option<VoteChoice> {
        self.cells[row * self.statements.len() + col]
    }

    pub fn row(&self, row: usize) -> &[Option<VoteChoice>] {
        let width = self.statements.len();
        &self.cells[row * width..(row + 1) * width]
    }

    pub fn vote_count(&self) -> usize {
        self.vote_count
    }

    /// Fraction of cells without a vote (0.0 = dense, 1.0 = empty)
    pub fn sparsity(&self) -> f64 {
        if self.cells.is_empty() {
            return 1.0;
        }
        1.0 - self.vote_count as f64 / self.cells.len() as f64
    }

    /// Tally of one column over all rows
    pub fn column_tally(&self, col: usize) -> VoteTally {
        let mut tally = VoteTally::default();
        for row in 0..self.users.len() {
            if let Some(vote) = self.get(row, col) {
                tally.record(vote);
            }
        }
        tally
    }
}

/// Builds a [`VoteMatrix`] from raw vote records
///
/// Contract violations (votes on statements outside the live set, duplicate
/// votes) fail fast before the minimum-data preconditions are checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct VoteMatrixBuilder {
    preconditions: MatrixPreconditions,
}

impl VoteMatrixBuilder {
    pub fn new(preconditions: MatrixPreconditions) -> Self {
        Self { preconditions }
    }

    pub fn build<'a>(
        &self,
        votes: impl IntoIterator<Item = &'a VoteRecord>,
        live_statements: &BTreeSet<StatementId>,
    ) -> Result<VoteMatrix, AnalysisError> {
        let mut seen: HashSet<(UserId, StatementId)> = HashSet::new();
        let mut records: Vec<&VoteRecord> = Vec::new();

        for vote in votes {
            if !live_statements.contains(&vote.statement_id) {
                return Err(AnalysisError::UnknownStatement {
                    user_id: vote.user_id,
                    statement_id: vote.statement_id,
                });
            }
            if !seen.insert((vote.user_id, vote.statement_id)) {
                return Err(AnalysisError::DuplicateVote {
                    user_id: vote.user_id,
                    statement_id: vote.statement_id,
                });
            }
            records.push(vote);
        }

        let users: Vec<UserId> = records
            .iter()
            .map(|v| v.user_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let statements: Vec<StatementId> = records
            .iter()
            .map(|v| v.statement_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        self.check(Precondition::MinUsers, self.preconditions.min_users, users.len())?;
        self.check(
            Precondition::MinStatements,
            self.preconditions.min_statements,
            statements.len(),
        )?;
        self.check(Precondition::MinVotes, self.preconditions.min_votes, records.len())?;

        let user_index: BTreeMap<UserId, usize> =
            users.iter().enumerate().map(|(i, u)| (*u, i)).collect();
        let statement_index: BTreeMap<StatementId, usize> =
            statements.iter().enumerate().map(|(i, s)| (*s, i)).collect();

        let width = statements.len();
        let mut cells = vec![None; users.len() * width];
        for vote in &records {
            let row = user_index[&vote.user_id];
            let col = statement_index[&vote.statement_id];
            cells[row * width + col] = Some(vote.vote);
        }

        let matrix = VoteMatrix {
            users,
            statements,
            user_index,
            statement_index,
            cells,
            vote_count: records.len(),
        };

        debug!(
            users = matrix.n_users(),
            statements = matrix.n_statements(),
            votes = matrix.vote_count(),
            sparsity = matrix.sparsity(),
            "Built vote matrix"
        );

        Ok(matrix)
    }

    fn check(
        &self,
        precondition: Precondition,
        required: usize,
        actual: usize,
    ) -> Result<(), InsufficientDataError> {
        if actual < required {
            return Err(InsufficientDataError {
                precondition,
                required,
                actual,
            });
        }
        Ok(())
    }
}
