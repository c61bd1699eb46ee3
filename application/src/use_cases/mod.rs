//! Use cases (application services)

pub mod analyze_discussion;
pub mod coordinator;
pub mod rank_statements;
pub mod schedule_check;

#[cfg(test)]
pub(crate) mod fixtures;
