//! Progress notification port
//!
//! Defines the interface for reporting progress during an analysis run.

use std::fmt;

/// Stages of one analysis run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisPhase {
    /// Fetching the discussion snapshot
    LoadSnapshot,
    /// Building the matrix, projecting, clustering and classifying
    Analyze,
    /// Computing the default statement order
    Rank,
    /// Appending the result to the history
    Persist,
}

impl AnalysisPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisPhase::LoadSnapshot => "Loading snapshot",
            AnalysisPhase::Analyze => "Analyzing opinion groups",
            AnalysisPhase::Rank => "Ranking statements",
            AnalysisPhase::Persist => "Saving result",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            AnalysisPhase::LoadSnapshot => "📥",
            AnalysisPhase::Analyze => "🧭",
            AnalysisPhase::Rank => "📊",
            AnalysisPhase::Persist => "💾",
        }
    }
}

impl fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Callback for progress updates during an analysis run
///
/// Implementations live in the presentation layer.
pub trait AnalysisProgressNotifier: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: AnalysisPhase);

    /// Called when a phase ends, successfully or not
    fn on_phase_complete(&self, phase: AnalysisPhase, success: bool);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl AnalysisProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: AnalysisPhase) {}
    fn on_phase_complete(&self, _phase: AnalysisPhase, _success: bool) {}
}
