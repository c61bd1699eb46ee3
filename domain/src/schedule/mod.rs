//! Recalculation scheduling

pub mod policy;

pub use policy::RecalculationPolicy;
