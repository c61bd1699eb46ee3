//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for analysis results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Opinion groups, classified statements and rankings
    Full,
    /// Headline numbers only
    Summary,
    /// The raw result as JSON
    Json,
    /// Default statement order only
    Rankings,
}

impl From<agora_domain::OutputFormat> for OutputFormat {
    fn from(format: agora_domain::OutputFormat) -> Self {
        match format {
            agora_domain::OutputFormat::Full => OutputFormat::Full,
            agora_domain::OutputFormat::Summary => OutputFormat::Summary,
            agora_domain::OutputFormat::Json => OutputFormat::Json,
            agora_domain::OutputFormat::Rankings => OutputFormat::Rankings,
        }
    }
}

/// CLI arguments for agora
#[derive(Parser, Debug)]
#[command(name = "agora")]
#[command(author, version, about = "Opinion groups and common ground in discussion votes")]
#[command(long_about = r#"
Agora analyzes the agree / disagree / unsure votes of one discussion.

The analysis has three steps:
1. Projection: every participant is placed on a 2D opinion map
2. Grouping: participants are clustered into 2 to 5 opinion groups
3. Classification: statements are tagged as consensus, bridge or divisive

Statements are also ranked by the Wilson score of their agreement share,
which works for discussions of any size.

Snapshots are read from <DATA_DIR>/<DISCUSSION>.json.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./agora.toml        Project-level config
3. ~/.config/agora/config.toml   Global config

Example:
  agora town-hall
  agora town-hall --data-dir ./snapshots --output summary
  agora town-hall --history runs.jsonl --if-due
"#)]
pub struct Cli {
    /// The discussion to analyze (not required with --show-config)
    pub discussion: Option<String>,

    /// Directory containing discussion snapshot files
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Output format (defaults to the config file, then "full")
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Append the result to this JSONL history file
    #[arg(long, value_name = "FILE")]
    pub history: Option<PathBuf>,

    /// Only analyze when the recalculation policy says the discussion is due
    #[arg(long, requires = "history")]
    pub if_due: bool,

    /// Votes cast since the last run (derived from the history when omitted)
    #[arg(long, value_name = "N", requires = "if_due")]
    pub new_votes: Option<u64>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["agora", "town-hall"]).unwrap();
        assert_eq!(cli.discussion.as_deref(), Some("town-hall"));
        assert_eq!(cli.data_dir, PathBuf::from("."));
        assert_eq!(cli.output, None);
        assert!(!cli.if_due);
    }

    #[test]
    fn test_parse_full() {
        let cli = Cli::try_parse_from([
            "agora",
            "town-hall",
            "--data-dir",
            "snapshots",
            "--output",
            "rankings",
            "--history",
            "runs.jsonl",
            "--if-due",
            "--new-votes",
            "12",
            "-vv",
            "-q",
        ])
        .unwrap();
        assert_eq!(cli.output, Some(OutputFormat::Rankings));
        assert_eq!(cli.history, Some(PathBuf::from("runs.jsonl")));
        assert_eq!(cli.new_votes, Some(12));
        assert_eq!(cli.verbose, 2);
        assert!(cli.quiet);
    }

    #[test]
    fn test_if_due_requires_history() {
        assert!(Cli::try_parse_from(["agora", "town-hall", "--if-due"]).is_err());
    }

    #[test]
    fn test_domain_format_conversion() {
        assert_eq!(
            OutputFormat::from(agora_domain::OutputFormat::Summary),
            OutputFormat::Summary
        );
    }
}
