//! Recalculation schedule from TOML (`[schedule]` section)

use agora_domain::RecalculationPolicy;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Raw schedule configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileScheduleConfig {
    /// Minimum hours between two analyses of the same discussion
    pub interval_hours: u64,
    /// Minimum new votes before a discussion is analyzed again
    pub min_new_votes: u64,
}

impl Default for FileScheduleConfig {
    fn default() -> Self {
        let policy = RecalculationPolicy::default();
        Self {
            interval_hours: policy.min_interval.num_hours().unsigned_abs(),
            min_new_votes: policy.min_new_votes,
        }
    }
}

impl FileScheduleConfig {
    pub fn to_policy(&self) -> RecalculationPolicy {
        let interval = i64::try_from(self.interval_hours)
            .ok()
            .and_then(Duration::try_hours)
            .unwrap_or(Duration::MAX);
        RecalculationPolicy::new(interval, self.min_new_votes)
    }
}
