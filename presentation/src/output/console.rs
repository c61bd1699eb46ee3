//! Console output formatter for analysis results

use agora_application::{AnalysisOutcome, RankingOutcome, ScheduleDecision};
use agora_domain::{
    ConsensusAnalysisResult, DiscussionId, InsufficientDataError, RankedStatement, StatementId,
};
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;

/// Longest statement text shown before truncation
const TEXT_WIDTH: usize = 70;

#[derive(Serialize)]
struct JsonReport<'a> {
    discussion_id: &'a DiscussionId,
    vote_count: usize,
    result: &'a ConsensusAnalysisResult,
    rankings: &'a [RankedStatement],
}

#[derive(Serialize)]
struct JsonRankings<'a> {
    discussion_id: &'a DiscussionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    insufficient_data: Option<&'a InsufficientDataError>,
    rankings: &'a [RankedStatement],
}

/// Formats analysis results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete analysis outcome
    pub fn format(outcome: &AnalysisOutcome) -> String {
        let result = &outcome.result;
        let texts = &outcome.statement_texts;
        let mut output = String::new();

        output.push_str(&Self::header("Opinion Group Analysis"));
        output.push('\n');
        output.push_str(&Self::overview(outcome));

        if let Some(warning) = result.degenerate_warning() {
            output.push_str(&format!("\n{} {}\n", "Warning:".yellow().bold(), warning));
        }

        // Groups
        output.push_str(&Self::section_header("Opinion Groups"));
        for (cluster, size) in result.cluster_sizes().iter().enumerate() {
            output.push_str(&format!(
                "  {} {} participant{}\n",
                format!("Group {}:", Self::group_label(cluster)).yellow().bold(),
                size,
                if *size == 1 { "" } else { "s" }
            ));
        }

        // Consensus
        output.push_str(&Self::section_header("Consensus"));
        if result.consensus_statements().is_empty() {
            output.push_str(&format!("  {}\n", "(none)".dimmed()));
        }
        for statement in result.consensus_statements() {
            output.push_str(&format!(
                "  {} {}\n      {} {}  {}\n",
                "*".green(),
                Self::statement_line(statement.statement_id, texts),
                "overall".dimmed(),
                Self::percent(statement.overall_rate),
                Self::group_rates(&statement.per_cluster_rates)
            ));
        }

        // Bridges
        output.push_str(&Self::section_header("Bridges"));
        if result.bridge_statements().is_empty() {
            output.push_str(&format!("  {}\n", "(none)".dimmed()));
        }
        for statement in result.bridge_statements() {
            output.push_str(&format!(
                "  {} {}\n      {} {}  {} {:.3}\n",
                "~".cyan(),
                Self::statement_line(statement.statement_id, texts),
                "mean".dimmed(),
                Self::percent(statement.mean_rate),
                "variance".dimmed(),
                statement.variance
            ));
        }

        // Divisive
        output.push_str(&Self::section_header("Divisive"));
        if result.divisive_statements().is_empty() {
            output.push_str(&format!("  {}\n", "(none)".dimmed()));
        }
        for statement in result.divisive_statements() {
            output.push_str(&format!(
                "  {} {}\n      {} {:.2}\n",
                "!".red(),
                Self::statement_line(statement.statement_id, texts),
                "controversy".dimmed(),
                statement.controversy_score
            ));
        }

        output.push_str(&Self::section_header("Ranking"));
        output.push_str(&Self::ranking_lines(&outcome.rankings, texts));

        output.push_str(&Self::footer());
        output
    }

    /// Headline numbers only
    pub fn format_summary(outcome: &AnalysisOutcome) -> String {
        let result = &outcome.result;
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== Agora Summary ===".cyan().bold()
        ));
        output.push_str(&Self::overview(outcome));
        output.push_str(&format!(
            "\n{} {}  {} {}  {} {}\n",
            "Consensus:".green().bold(),
            result.consensus_statements().len(),
            "Bridges:".cyan().bold(),
            result.bridge_statements().len(),
            "Divisive:".red().bold(),
            result.divisive_statements().len()
        ));
        if let Some(warning) = result.degenerate_warning() {
            output.push_str(&format!("{} {}\n", "Warning:".yellow().bold(), warning));
        }
        if let Some(top) = outcome.rankings.first() {
            output.push_str(&format!(
                "{} {}\n",
                "Top statement:".bold(),
                Self::statement_line(top.statement_id, &outcome.statement_texts)
            ));
        }

        output
    }

    /// Format as JSON
    pub fn format_json(outcome: &AnalysisOutcome) -> String {
        let report = JsonReport {
            discussion_id: &outcome.discussion_id,
            vote_count: outcome.vote_count,
            result: &outcome.result,
            rankings: &outcome.rankings,
        };
        serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Default statement order only
    pub fn format_rankings(rankings: &[RankedStatement], texts: &BTreeMap<StatementId, String>) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n", "=== Statement Ranking ===".cyan().bold()));
        output.push_str(&Self::ranking_lines(rankings, texts));
        output
    }

    /// Rankings as JSON, optionally noting why no groups were computed
    pub fn format_rankings_json(
        outcome: &RankingOutcome,
        insufficient: Option<&InsufficientDataError>,
    ) -> String {
        let report = JsonRankings {
            discussion_id: &outcome.discussion_id,
            insufficient_data: insufficient,
            rankings: &outcome.rankings,
        };
        serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Friendly notice for discussions that are still too small to group
    pub fn format_insufficient(discussion: &DiscussionId, error: &InsufficientDataError) -> String {
        format!(
            "{} {}\n{}\n",
            "Not enough data yet for opinion groups in".yellow().bold(),
            discussion.as_str().bold(),
            format!(
                "  Need at least {} {}, found {}. Statements are still ranked below.",
                error.required, error.precondition, error.actual
            )
            .dimmed()
        )
    }

    /// Notice for a skipped run
    pub fn format_not_due(discussion: &DiscussionId, decision: &ScheduleDecision) -> String {
        let last_run = decision
            .last_run
            .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "never".to_string());
        format!(
            "{} {} (last run: {}, new votes: {})\n",
            "Not due for recalculation:".yellow().bold(),
            discussion,
            last_run,
            decision.new_votes
        )
    }

    fn overview(outcome: &AnalysisOutcome) -> String {
        let result = &outcome.result;
        let shape = result.matrix_shape();
        format!(
            "{} {}\n{} {} participants, {} statements, {} votes\n{} {} (quality {:.2})\n",
            "Discussion:".cyan().bold(),
            outcome.discussion_id,
            "Data:".cyan().bold(),
            shape.users,
            shape.statements,
            outcome.vote_count,
            "Groups:".cyan().bold(),
            result.cluster_count(),
            result.quality_score()
        )
    }

    fn ranking_lines(rankings: &[RankedStatement], texts: &BTreeMap<StatementId, String>) -> String {
        let mut output = String::new();
        for (position, ranked) in rankings.iter().enumerate() {
            output.push_str(&format!(
                "  {:>3}. {}  {}\n",
                position + 1,
                format!("{:.3}", ranked.score).bold(),
                Self::statement_line(ranked.statement_id, texts)
            ));
            output.push_str(&format!(
                "        {}\n",
                format!("{} agree / {} disagree", ranked.agree, ranked.disagree).dimmed()
            ));
        }
        output
    }

    fn statement_line(id: StatementId, texts: &BTreeMap<StatementId, String>) -> String {
        match texts.get(&id) {
            Some(text) => format!("#{} {}", id, Self::truncate(text, TEXT_WIDTH)),
            None => format!("#{}", id),
        }
    }

    fn group_rates(rates: &[Option<f64>]) -> String {
        rates
            .iter()
            .enumerate()
            .map(|(cluster, rate)| {
                let value = rate.map_or_else(|| "-".to_string(), Self::percent);
                format!("{} {}", Self::group_label(cluster), value)
            })
            .collect::<Vec<_>>()
            .join("  ")
    }

    fn group_label(cluster: usize) -> char {
        (b'A' + (cluster % 26) as u8) as char
    }

    fn percent(rate: f64) -> String {
        format!("{:.0}%", rate * 100.0)
    }

    fn truncate(text: &str, max_chars: usize) -> String {
        if text.chars().count() <= max_chars {
            return text.to_string();
        }
        let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut.trim_end())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_domain::{
        ConsensusEngine, DiscussionSnapshot, Precondition, Statement, StatementRanker, VoteChoice,
        VoteRecord,
    };
    use chrono::Utc;
    use std::sync::Arc;

    fn outcome() -> AnalysisOutcome {
        let now = Utc::now();
        let mut votes = Vec::new();
        for user in 1..=10u64 {
            votes.push(VoteRecord::new(user, 0, VoteChoice::Agree));
            for statement in 1..=10u64 {
                let vote = if (user <= 5) == (statement <= 5) {
                    VoteChoice::Agree
                } else {
                    VoteChoice::Disagree
                };
                votes.push(VoteRecord::new(user, statement, vote));
            }
        }
        let statements = (0..=10u64)
            .map(|id| Statement::new(id, format!("Proposal number {id}"), now))
            .collect();
        let snapshot = DiscussionSnapshot::new("town-hall", statements, votes);

        let result = ConsensusEngine::default().analyze(&snapshot).unwrap();
        let tallies = snapshot.tallies_from_votes();
        let rankings = StatementRanker::default().rank(tallies.iter().map(|(id, t)| (*id, t)));
        AnalysisOutcome {
            discussion_id: snapshot.discussion_id.clone(),
            vote_count: snapshot.vote_count(),
            result: Arc::new(result),
            rankings,
            statement_texts: snapshot
                .statements
                .iter()
                .map(|s| (s.id, s.text.clone()))
                .collect(),
        }
    }

    #[test]
    fn test_full_output_lists_sections() {
        let output = ConsoleFormatter::format(&outcome());
        assert!(output.contains("Opinion Groups"));
        assert!(output.contains("Consensus"));
        assert!(output.contains("Divisive"));
        assert!(output.contains("#0 Proposal number 0"));
        assert!(output.contains("10 agree / 0 disagree"));
    }

    #[test]
    fn test_summary_mentions_top_statement() {
        let output = ConsoleFormatter::format_summary(&outcome());
        assert!(output.contains("town-hall"));
        assert!(output.contains("#0 Proposal number 0"));
    }

    #[test]
    fn test_json_output_is_valid() {
        let outcome = outcome();
        let json: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_json(&outcome)).unwrap();
        assert_eq!(json["discussion_id"], "town-hall");
        assert_eq!(json["vote_count"], 110);
        assert_eq!(json["result"]["cluster_count"], 2);
        assert_eq!(json["rankings"][0]["statement_id"], 0);
    }

    #[test]
    fn test_rankings_json_carries_insufficient_data() {
        let outcome = RankingOutcome {
            discussion_id: DiscussionId::new("new"),
            rankings: vec![],
            statement_texts: BTreeMap::new(),
        };
        let error = InsufficientDataError {
            precondition: Precondition::MinVotes,
            required: 50,
            actual: 12,
        };
        let json: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_rankings_json(&outcome, Some(&error)))
                .unwrap();
        assert_eq!(json["insufficient_data"]["precondition"], "min_votes");
        assert_eq!(json["insufficient_data"]["actual"], 12);
    }

    #[test]
    fn test_insufficient_notice() {
        let error = InsufficientDataError {
            precondition: Precondition::MinUsers,
            required: 7,
            actual: 3,
        };
        let output = ConsoleFormatter::format_insufficient(&DiscussionId::new("new"), &error);
        assert!(output.contains("Need at least 7 voting users, found 3"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(ConsoleFormatter::truncate("short", 10), "short");
        assert_eq!(ConsoleFormatter::truncate("abcdefghijkl", 8), "abcde...");
    }

    #[test]
    fn test_group_rates() {
        assert_eq!(
            ConsoleFormatter::group_rates(&[Some(1.0), None, Some(0.6)]),
            "A 100%  B -  C 60%"
        );
    }
}
