//! Domain error and warning types

use super::ids::{StatementId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which minimum-data precondition of the vote matrix was not met
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precondition {
    /// Too few distinct voting users
    MinUsers,
    /// Too few statements with at least one vote
    MinStatements,
    /// Too few votes in total
    MinVotes,
}

impl Precondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Precondition::MinUsers => "voting users",
            Precondition::MinStatements => "voted-on statements",
            Precondition::MinVotes => "votes",
        }
    }
}

impl fmt::Display for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The snapshot is too small to cluster meaningfully.
///
/// Recoverable by the caller (wait for more participation). Retrying on the
/// same snapshot yields the same error.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[error("insufficient data: need at least {required} {precondition}, found {actual}")]
pub struct InsufficientDataError {
    pub precondition: Precondition,
    pub required: usize,
    pub actual: usize,
}

/// Errors raised by a consensus analysis run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error(transparent)]
    InsufficientData(#[from] InsufficientDataError),

    /// Contract violation: the caller passed a vote for a statement that is
    /// not in the live statement set.
    #[error("vote by user {user_id} references unknown statement {statement_id}")]
    UnknownStatement {
        user_id: UserId,
        statement_id: StatementId,
    },

    /// Contract violation: more than one current vote for the same pair.
    #[error("user {user_id} has more than one vote on statement {statement_id}")]
    DuplicateVote {
        user_id: UserId,
        statement_id: StatementId,
    },
}

impl AnalysisError {
    /// Whether waiting for more votes could make this error go away
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, AnalysisError::InsufficientData(_))
    }

    /// Whether this error is a programming error on the caller's side
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            AnalysisError::UnknownStatement { .. } | AnalysisError::DuplicateVote { .. }
        )
    }
}

/// Clustering finished but the groups are statistically unreliable.
///
/// Non-fatal: it travels with the result so the presentation layer can
/// decide to show "no clear opinion groups".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DegenerateResultWarning {
    pub quality_score: f64,
    pub threshold: f64,
}

impl fmt::Display for DegenerateResultWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cluster quality {:.3} is below {:.3}; opinion groups may be unreliable",
            self.quality_score, self.threshold
        )
    }
}

/// Non-fatal signals attached to an analysis result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisWarning {
    DegenerateResult(DegenerateResultWarning),
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisWarning::DegenerateResult(w) => w.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_display() {
        let err = InsufficientDataError {
            precondition: Precondition::MinUsers,
            required: 7,
            actual: 6,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data: need at least 7 voting users, found 6"
        );
    }

    #[test]
    fn test_error_classification() {
        let insufficient: AnalysisError = InsufficientDataError {
            precondition: Precondition::MinVotes,
            required: 50,
            actual: 12,
        }
        .into();
        assert!(insufficient.is_insufficient_data());
        assert!(!insufficient.is_contract_violation());

        let unknown = AnalysisError::UnknownStatement {
            user_id: UserId(1),
            statement_id: StatementId(99),
        };
        assert!(unknown.is_contract_violation());
        assert!(!unknown.is_insufficient_data());
    }

    #[test]
    fn test_warning_serializes_with_kind_tag() {
        let warning = AnalysisWarning::DegenerateResult(DegenerateResultWarning {
            quality_score: 0.1,
            threshold: 0.2,
        });
        let json = serde_json::to_value(warning).unwrap();
        assert_eq!(json["kind"], "degenerate_result");
        assert_eq!(json["threshold"], 0.2);
    }
}
