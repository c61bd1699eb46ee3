//! Discussion data consumed by the analysis
//!
//! Statements, votes and the immutable snapshot that bundles them. All of it
//! is produced by the surrounding application and read-only here.

pub mod snapshot;
pub mod statement;
pub mod vote;

pub use snapshot::DiscussionSnapshot;
pub use statement::Statement;
pub use vote::{VoteChoice, VoteRecord, VoteTally};
