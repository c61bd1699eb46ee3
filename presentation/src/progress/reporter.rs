//! Progress reporting for analysis runs

use agora_application::{AnalysisPhase, AnalysisProgressNotifier};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with a spinner per phase
pub struct ProgressReporter {
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            phase_bar: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, phase: AnalysisPhase) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(format!("{} {}", phase.emoji(), phase.as_str()));
        pb.set_message("...");
        pb.enable_steady_tick(Duration::from_millis(80));

        if let Ok(mut slot) = self.phase_bar.lock()
            && let Some(previous) = slot.replace(pb)
        {
            previous.finish_and_clear();
        }
    }

    fn on_phase_complete(&self, _phase: AnalysisPhase, success: bool) {
        let Some(pb) = self.phase_bar.lock().ok().and_then(|mut slot| slot.take()) else {
            return;
        };
        if success {
            pb.finish_with_message(format!("{}", "done".green()));
        } else {
            pb.finish_with_message(format!("{}", "failed".red()));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl AnalysisProgressNotifier for SimpleProgress {
    fn on_phase_start(&self, phase: AnalysisPhase) {
        eprintln!("{} {}", "->".cyan(), phase.as_str().bold());
    }

    fn on_phase_complete(&self, phase: AnalysisPhase, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), phase);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), phase);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_survives_full_cycle() {
        let reporter = ProgressReporter::new();
        for phase in [
            AnalysisPhase::LoadSnapshot,
            AnalysisPhase::Analyze,
            AnalysisPhase::Rank,
        ] {
            reporter.on_phase_start(phase);
            reporter.on_phase_complete(phase, true);
        }
        assert!(reporter.phase_bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_complete_without_start_is_ignored() {
        let reporter = ProgressReporter::new();
        reporter.on_phase_complete(AnalysisPhase::Persist, false);
        assert!(reporter.phase_bar.lock().unwrap().is_none());
    }
}
