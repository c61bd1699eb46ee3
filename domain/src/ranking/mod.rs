//! Default statement ordering
//!
//! Independent of opinion groups: only per-statement agree/disagree counts
//! feed the score.

pub mod wilson;

pub use wilson::{RankedStatement, RankingParams, StatementRanker, wilson_lower_bound};
