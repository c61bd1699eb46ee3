//! Application layer for agora
//!
//! This crate contains use cases and port definitions.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    progress::{AnalysisPhase, AnalysisProgressNotifier, NoProgress},
    result_store::{AnalysisRecord, AnalysisResultStore, NoResultStore, ResultStoreError},
    snapshot_source::{SnapshotError, VoteSnapshotSource},
};
pub use use_cases::analyze_discussion::{
    AnalysisOutcome, AnalyzeDiscussionError, AnalyzeDiscussionInput, AnalyzeDiscussionUseCase,
};
pub use use_cases::coordinator::AnalysisCoordinator;
pub use use_cases::rank_statements::{RankStatementsUseCase, RankingOutcome};
pub use use_cases::schedule_check::{ScheduleCheck, ScheduleDecision};
