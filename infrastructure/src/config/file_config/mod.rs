//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! The analysis sections deserialize straight into the domain parameter
//! types, which already carry their defaults.

mod output;
mod schedule;

pub use output::FileOutputConfig;
pub use schedule::FileScheduleConfig;

use agora_domain::{
    AnalysisConfig, ClassificationThresholds, ClusteringParams, MatrixPreconditions,
    RankingParams, RecalculationPolicy,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("{field} must be within [0, 1], got {value}")]
    RateOutOfRange { field: &'static str, value: f64 },

    #[error("clustering.min_clusters must be at least 2, got {0}")]
    TooFewClusters(usize),

    #[error("clustering.max_clusters ({max}) is below clustering.min_clusters ({min})")]
    EmptyClusterRange { min: usize, max: usize },

    #[error(
        "preconditions.min_users ({min_users}) must exceed clustering.min_clusters ({min_clusters})"
    )]
    TooFewUsersForClusters {
        min_users: usize,
        min_clusters: usize,
    },

    #[error("ranking.z must be positive, got {0}")]
    InvalidZ(f64),

    #[error("schedule.interval_hours cannot be 0")]
    ZeroInterval,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Minimum data before opinion groups are computed
    pub preconditions: MatrixPreconditions,
    /// Statement classification cut-offs
    pub thresholds: ClassificationThresholds,
    /// Cluster-count search
    pub clustering: ClusteringParams,
    /// Default statement order
    pub ranking: RankingParams,
    /// Recalculation policy
    pub schedule: FileScheduleConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let t = &self.thresholds;
        let rates = [
            ("thresholds.consensus_overall", t.consensus_overall),
            ("thresholds.consensus_per_cluster", t.consensus_per_cluster),
            ("thresholds.bridge_mean", t.bridge_mean),
            ("thresholds.bridge_variance", t.bridge_variance),
            ("thresholds.divisive_controversy", t.divisive_controversy),
        ];
        for (field, value) in rates {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigValidationError::RateOutOfRange { field, value });
            }
        }

        if self.clustering.min_clusters < 2 {
            return Err(ConfigValidationError::TooFewClusters(
                self.clustering.min_clusters,
            ));
        }
        if self.clustering.max_clusters < self.clustering.min_clusters {
            return Err(ConfigValidationError::EmptyClusterRange {
                min: self.clustering.min_clusters,
                max: self.clustering.max_clusters,
            });
        }

        if self.preconditions.min_users <= self.clustering.min_clusters {
            return Err(ConfigValidationError::TooFewUsersForClusters {
                min_users: self.preconditions.min_users,
                min_clusters: self.clustering.min_clusters,
            });
        }

        if self.ranking.z.is_nan() || self.ranking.z <= 0.0 {
            return Err(ConfigValidationError::InvalidZ(self.ranking.z));
        }

        if self.schedule.interval_hours == 0 {
            return Err(ConfigValidationError::ZeroInterval);
        }

        Ok(())
    }

    /// Engine configuration assembled from the analysis sections
    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig::default()
            .with_preconditions(self.preconditions)
            .with_clustering(self.clustering)
            .with_thresholds(self.thresholds)
    }

    pub fn recalculation_policy(&self) -> RecalculationPolicy {
        self.schedule.to_policy()
    }
}
