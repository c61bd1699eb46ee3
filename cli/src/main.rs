//! CLI entrypoint for agora
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use agora_application::{
    AnalysisProgressNotifier, AnalysisResultStore, AnalyzeDiscussionInput,
    AnalyzeDiscussionUseCase, NoProgress, RankStatementsUseCase, ScheduleCheck,
    VoteSnapshotSource,
};
use agora_domain::{ConsensusEngine, DiscussionId, StatementRanker};
use agora_infrastructure::{ConfigLoader, FileConfig, JsonSnapshotSource, JsonlAnalysisHistory};
use agora_presentation::{Cli, ConsoleFormatter, OutputFormat, ProgressReporter};
use anyhow::{Result, anyhow, bail};
use clap::Parser;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let discussion = match &cli.discussion {
        Some(d) => DiscussionId::new(d.as_str()),
        None => bail!("Discussion is required. Use --show-config to inspect configuration."),
    };

    // Load configuration
    let config: FileConfig = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow!("Invalid configuration: {e}"))?
    };
    config.validate()?;

    if !config.output.color {
        colored::control::set_override(false);
    }
    let format = cli
        .output
        .or(config.output.format.map(OutputFormat::from))
        .unwrap_or(OutputFormat::Full);

    info!("Starting agora for discussion {}", discussion);

    // === Dependency Injection ===
    let source = Arc::new(JsonSnapshotSource::new(&cli.data_dir));
    let history = cli
        .history
        .as_ref()
        .map(JsonlAnalysisHistory::open)
        .transpose()?
        .map(Arc::new);

    // The snapshot read for the schedule check is the one analyzed
    let mut preloaded = None;
    if cli.if_due
        && let Some(history) = &history
    {
        let current_votes = match cli.new_votes {
            Some(_) => 0,
            None => {
                let snapshot = source.load_snapshot(&discussion).await?;
                let votes = snapshot.vote_count();
                preloaded = Some(snapshot);
                votes
            }
        };
        let check = ScheduleCheck::new(
            config.recalculation_policy(),
            Arc::clone(history) as Arc<dyn AnalysisResultStore>,
        );
        let decision = check.check(&discussion, current_votes, cli.new_votes).await?;
        if !decision.due {
            print!("{}", ConsoleFormatter::format_not_due(&discussion, &decision));
            return Ok(());
        }
        debug!("Discussion {} is due for recalculation", discussion);
    }

    let ranker = StatementRanker::new(config.ranking);
    let mut use_case =
        AnalyzeDiscussionUseCase::new(Arc::clone(&source), ConsensusEngine::new(config.analysis_config()))
            .with_ranker(ranker);
    if let Some(history) = &history {
        use_case = use_case.with_store(Arc::clone(history) as Arc<dyn AnalysisResultStore>);
    }

    // Execute with or without progress reporting
    let input = AnalyzeDiscussionInput::new(discussion.clone());
    let progress: Box<dyn AnalysisProgressNotifier> = if cli.quiet {
        Box::new(NoProgress)
    } else {
        Box::new(ProgressReporter::new())
    };
    let outcome = match preloaded.clone() {
        Some(snapshot) => {
            use_case
                .execute_on_snapshot(input, snapshot, progress.as_ref())
                .await
        }
        None => use_case.execute_with_progress(input, progress.as_ref()).await,
    };

    match outcome {
        Ok(outcome) => {
            let output = match format {
                OutputFormat::Full => ConsoleFormatter::format(&outcome),
                OutputFormat::Summary => ConsoleFormatter::format_summary(&outcome),
                OutputFormat::Json => ConsoleFormatter::format_json(&outcome),
                OutputFormat::Rankings => {
                    ConsoleFormatter::format_rankings(&outcome.rankings, &outcome.statement_texts)
                }
            };
            println!("{}", output);
        }
        Err(e) => {
            // Too little data is an expected state of young discussions
            let Some(insufficient) = e.insufficient_data() else {
                return Err(e.into());
            };
            let ranking = RankStatementsUseCase::new(source, ranker);
            let ranked = match &preloaded {
                Some(snapshot) => ranking.rank_loaded(snapshot),
                None => ranking.execute(&discussion).await?,
            };
            if format == OutputFormat::Json {
                println!(
                    "{}",
                    ConsoleFormatter::format_rankings_json(&ranked, Some(insufficient))
                );
            } else {
                print!("{}", ConsoleFormatter::format_insufficient(&discussion, insufficient));
                println!(
                    "{}",
                    ConsoleFormatter::format_rankings(&ranked.rankings, &ranked.statement_texts)
                );
            }
        }
    }

    Ok(())
}
