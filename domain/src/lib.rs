//! Domain layer for agora
//!
//! This crate contains the analysis engine, its entities and value objects.
//! It has no dependencies on infrastructure or presentation concerns and
//! performs no I/O.
//!
//! # Core Concepts
//!
//! ## Opinion groups
//!
//! Participants vote agree / disagree / unsure on short statements. The
//! votes form a sparse user × statement matrix which is projected onto two
//! axes and clustered into 2 to 5 opinion groups.
//!
//! ## Statement classes
//!
//! - **Consensus**: broadly agreed overall and inside every group
//! - **Bridge**: agreed at a similar level across groups
//! - **Divisive**: the vote is split close to 50/50
//!
//! ## Ranking
//!
//! Independently of groups, statements are ordered by the Wilson score lower
//! bound of their agreement share.

pub mod analysis;
pub mod config;
pub mod core;
pub mod discussion;
pub mod ranking;
pub mod schedule;

// Re-export commonly used types
pub use analysis::{
    AnalysisConfig, AnalysisDiagnostics, BridgeStatement, ClassificationThresholds,
    ClusteringParams, ConsensusAnalysisResult, ConsensusEngine, ConsensusStatement,
    DivisiveStatement, MatrixPreconditions, MatrixShape,
};
pub use config::OutputFormat;
pub use core::{
    error::{
        AnalysisError, AnalysisWarning, DegenerateResultWarning, InsufficientDataError,
        Precondition,
    },
    ids::{DiscussionId, StatementId, UserId},
};
pub use discussion::{DiscussionSnapshot, Statement, VoteChoice, VoteRecord, VoteTally};
pub use ranking::{RankedStatement, RankingParams, StatementRanker};
pub use schedule::RecalculationPolicy;
