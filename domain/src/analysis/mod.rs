//! Opinion-group analysis
//!
//! Everything that turns a discussion snapshot into a
//! [`ConsensusAnalysisResult`]:
//!
//! - [`matrix`] builds the user × statement vote matrix and enforces the
//!   minimum-data preconditions
//! - [`reduction`] projects users onto two principal axes
//! - [`clustering`] groups users and picks the number of groups
//! - [`classification`] tags consensus, bridge and divisive statements
//! - [`engine`] wires the stages together

pub mod classification;
pub mod clustering;
pub mod config;
pub mod engine;
pub mod matrix;
pub mod reduction;
pub mod result;

pub use classification::{
    BridgeStatement, Classification, ConsensusStatement, DivisiveStatement, StatementClassifier,
    StatementScores, StatementTag, controversy_score,
};
pub use clustering::{CandidateScore, ClusterSelection, ClusterSelector, Dendrogram};
pub use config::{AnalysisConfig, ClassificationThresholds, ClusteringParams, MatrixPreconditions};
pub use engine::ConsensusEngine;
pub use matrix::{MatrixShape, VoteMatrix, VoteMatrixBuilder};
pub use reduction::{DimensionalityReducer, Projection};
pub use result::{AnalysisDiagnostics, ConsensusAnalysisResult};
