//! Recalculation policy
//!
//! Deciding *when* to re-run the analysis is the caller's business; the
//! engine itself has no schedule. The policy is a pure predicate so it can
//! be evaluated anywhere without touching global state.

use chrono::{DateTime, Duration, Utc};

/// When a discussion is due for a fresh analysis
///
/// # Example
///
/// ```
/// use agora_domain::RecalculationPolicy;
/// use chrono::{Duration, Utc};
///
/// let policy = RecalculationPolicy::default(); // every 6 hours, 10+ new votes
/// let now = Utc::now();
///
/// assert!(policy.should_recalculate(None, 25, now));
/// assert!(!policy.should_recalculate(Some(now - Duration::hours(1)), 25, now));
/// assert!(policy.should_recalculate(Some(now - Duration::hours(7)), 25, now));
/// assert!(!policy.should_recalculate(Some(now - Duration::hours(7)), 3, now));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecalculationPolicy {
    /// Minimum time between two runs
    pub min_interval: Duration,
    /// Minimum number of votes cast since the last run
    pub min_new_votes: u64,
}

impl Default for RecalculationPolicy {
    fn default() -> Self {
        Self {
            min_interval: Duration::hours(6),
            min_new_votes: 10,
        }
    }
}

impl RecalculationPolicy {
    pub fn new(min_interval: Duration, min_new_votes: u64) -> Self {
        Self {
            min_interval,
            min_new_votes,
        }
    }

    /// Whether a new run is warranted
    ///
    /// Never without enough new votes; always for a discussion that was never
    /// analyzed; otherwise once the minimum interval has elapsed.
    pub fn should_recalculate(
        &self,
        last_run_time: Option<DateTime<Utc>>,
        new_vote_count: u64,
        now: DateTime<Utc>,
    ) -> bool {
        if new_vote_count < self.min_new_votes {
            return false;
        }
        match last_run_time {
            None => true,
            Some(last) => now - last >= self.min_interval,
        }
    }

    /// [`should_recalculate`](Self::should_recalculate) against the current time
    pub fn should_recalculate_now(
        &self,
        last_run_time: Option<DateTime<Utc>>,
        new_vote_count: u64,
    ) -> bool {
        self.should_recalculate(last_run_time, new_vote_count, Utc::now())
    }
}
