//! Analysis history, persisted as append-only JSONL.
//!
//! Provides [`JsonlAnalysisHistory`], which implements the
//! [`AnalysisResultStore`](agora_application::AnalysisResultStore) port.

mod jsonl_history;

pub use jsonl_history::JsonlAnalysisHistory;
