//! Core domain concepts shared across all subdomains.
//!
//! - [`ids`]: user, statement and discussion identifiers
//! - [`error::AnalysisError`]: errors raised by an analysis run
//! - [`error::AnalysisWarning`]: non-fatal signals carried by a result

pub mod error;
pub mod ids;
