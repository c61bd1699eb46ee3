//! Vote types for a discussion
//!
//! Participants answer each statement with one of three choices. These are
//! the raw inputs of the analysis pipeline.

use crate::core::ids::{StatementId, UserId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A participant's position on a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    Agree,
    Disagree,
    Unsure,
}

impl VoteChoice {
    /// Numeric encoding used by the vote matrix: +1 / -1 / 0
    pub fn score(&self) -> f64 {
        match self {
            VoteChoice::Agree => 1.0,
            VoteChoice::Disagree => -1.0,
            VoteChoice::Unsure => 0.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VoteChoice::Agree => "agree",
            VoteChoice::Disagree => "disagree",
            VoteChoice::Unsure => "unsure",
        }
    }
}

impl std::fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "agree" | "+1" | "1" => Ok(VoteChoice::Agree),
            "disagree" | "-1" => Ok(VoteChoice::Disagree),
            "unsure" | "pass" | "0" => Ok(VoteChoice::Unsure),
            other => Err(format!(
                "Unknown vote: {}. Valid: agree, disagree, unsure",
                other
            )),
        }
    }
}

/// One current vote of a user on a statement
///
/// # Example
///
/// ```
/// use agora_domain::{VoteChoice, VoteRecord};
///
/// let vote = VoteRecord::new(1, 10, VoteChoice::Agree);
/// assert_eq!(vote.user_id.0, 1);
/// assert_eq!(vote.statement_id.0, 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub user_id: UserId,
    pub statement_id: StatementId,
    pub vote: VoteChoice,
}

impl VoteRecord {
    pub fn new(
        user_id: impl Into<UserId>,
        statement_id: impl Into<StatementId>,
        vote: VoteChoice,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            statement_id: statement_id.into(),
            vote,
        }
    }
}

/// Aggregated vote counts for one statement (or one statement within a group)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    #[serde(default)]
    pub agree: u64,
    #[serde(default)]
    pub disagree: u64,
    #[serde(default)]
    pub unsure: u64,
}

impl VoteTally {
    pub fn new(agree: u64, disagree: u64, unsure: u64) -> Self {
        Self {
            agree,
            disagree,
            unsure,
        }
    }

    /// Count one more vote
    pub fn record(&mut self, vote: VoteChoice) {
        match vote {
            VoteChoice::Agree => self.agree += 1,
            VoteChoice::Disagree => self.disagree += 1,
            VoteChoice::Unsure => self.unsure += 1,
        }
    }

    /// All votes, unsure included
    pub fn total(&self) -> u64 {
        self.agree + self.disagree + self.unsure
    }

    /// Votes that took a side
    pub fn decisive(&self) -> u64 {
        self.agree + self.disagree
    }

    /// `agree / (agree + disagree + unsure)`, or `None` without votes
    pub fn agreement_rate(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some(self.agree as f64 / total as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_scores() {
        assert_eq!(VoteChoice::Agree.score(), 1.0);
        assert_eq!(VoteChoice::Disagree.score(), -1.0);
        assert_eq!(VoteChoice::Unsure.score(), 0.0);
    }

    #[test]
    fn test_parse_vote_choice() {
        assert_eq!("agree".parse::<VoteChoice>().ok(), Some(VoteChoice::Agree));
        assert_eq!("Disagree".parse::<VoteChoice>().ok(), Some(VoteChoice::Disagree));
        assert_eq!("pass".parse::<VoteChoice>().ok(), Some(VoteChoice::Unsure));
        assert!("maybe".parse::<VoteChoice>().is_err());
    }

    #[test]
    fn test_vote_record_json() {
        let json = r#"{"user_id": 4, "statement_id": 9, "vote": "unsure"}"#;
        let record: VoteRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record, VoteRecord::new(4, 9, VoteChoice::Unsure));
    }

    #[test]
    fn test_tally_agreement_rate() {
        let mut tally = VoteTally::default();
        assert_eq!(tally.agreement_rate(), None);

        tally.record(VoteChoice::Agree);
        tally.record(VoteChoice::Agree);
        tally.record(VoteChoice::Disagree);
        tally.record(VoteChoice::Unsure);

        assert_eq!(tally.total(), 4);
        assert_eq!(tally.decisive(), 3);
        assert_eq!(tally.agreement_rate(), Some(0.5));
    }
}
