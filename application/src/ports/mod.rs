//! Port definitions (interfaces for external adapters)

pub mod progress;
pub mod result_store;
pub mod snapshot_source;
