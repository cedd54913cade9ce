//! pawsearch - typeahead search for pet adoption listings
//!
//! One-shot matching commands plus an interactive driver for a full
//! suggestion session.

use clap::{Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;
use pawsearch_core::{exit_codes, ErrorCode};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod context;
mod remote;

use commands::{did_you_mean, distance, history, interactive, search};
use context::Context;

/// Typeahead search for pet adoption listings
#[derive(Parser)]
#[command(name = "pawsearch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a pawsearch.toml configuration file
    #[arg(short, long, global = true, env = "PAWSEARCH_CONFIG")]
    config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Vocabulary file (JSON array, or one term per line)
    #[arg(long, global = true)]
    vocab: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the vocabulary against a query
    Match {
        /// Text to match
        query: String,

        /// Maximum results (defaults to typeahead.max_suggestions)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Show relevance scores
        #[arg(short, long)]
        scores: bool,
    },

    /// Suggest corrections for a misspelled query
    DidYouMean {
        /// Misspelled text
        query: String,

        /// Maximum guesses (defaults to typeahead.max_did_you_mean)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Edit distance and similarity between two strings
    Distance {
        a: String,
        b: String,
    },

    /// Inspect or clear persisted search history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Drive a suggestion session from stdin
    Interactive {
        /// JSON file standing in for the remote suggestion service
        #[arg(short, long)]
        remote: Option<PathBuf>,

        /// Artificial latency for the remote source, in milliseconds
        #[arg(long, default_value = "0")]
        remote_delay: u64,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// Show remembered searches, most recent first
    List {
        /// Storage key (defaults to typeahead.history_key)
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Forget all remembered searches
    Clear {
        /// Storage key (defaults to typeahead.history_key)
        #[arg(short, long)]
        key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let ctx = match Context::load(cli.config.as_deref(), cli.vocab.clone(), cli.format) {
        Ok(ctx) => ctx,
        Err(e) => return report(&e, cli.format),
    };

    let level = if cli.verbose {
        "pawsearch=debug,pawsearch_typeahead=debug,pawsearch_core=debug".to_string()
    } else {
        ctx.config.schema.logging.level.clone()
    };
    let telemetry = pawsearch_telemetry::TelemetryConfig {
        log_level: level,
        json: ctx.config.schema.logging.json,
        ..Default::default()
    };
    if let Err(e) = pawsearch_telemetry::init_with_config(telemetry) {
        eprintln!("{} {}", "Warning:".yellow().bold(), e);
    }

    let result = match cli.command {
        Commands::Match { query, limit, scores } => search::run(&ctx, &query, limit, scores),
        Commands::DidYouMean { query, limit } => did_you_mean::run(&ctx, &query, limit),
        Commands::Distance { a, b } => distance::run(&ctx, &a, &b),
        Commands::History { action } => match action {
            HistoryAction::List { key } => history::list(&ctx, key.as_deref()),
            HistoryAction::Clear { key } => history::clear(&ctx, key.as_deref()),
        },
        Commands::Interactive { remote, remote_delay } => {
            interactive::run(&ctx, remote.as_deref(), remote_delay, cli.verbose).await
        }
    };

    match result {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => report(&e, cli.format),
    }
}

/// Print an error and map it to an exit code.
fn report(e: &anyhow::Error, format: OutputFormat) -> ExitCode {
    let core = e.downcast_ref::<pawsearch_core::Error>();

    match (format, core) {
        (OutputFormat::Json, Some(core)) => match serde_json::to_string_pretty(&core.to_report()) {
            Ok(json) => eprintln!("{}", json),
            Err(_) => eprintln!("{} {}", "Error:".red().bold(), e),
        },
        _ => eprintln!("{} {:#}", "Error:".red().bold(), e),
    }

    let code = match core.map(|e| e.code) {
        Some(
            ErrorCode::ConfigError
            | ErrorCode::ConfigNotFound
            | ErrorCode::ConfigParseError
            | ErrorCode::InvalidConfigValue
            | ErrorCode::EmptyVocabulary,
        ) => exit_codes::CONFIG_ERROR,
        Some(ErrorCode::StorageUnavailable | ErrorCode::CorruptValue) => {
            exit_codes::STORAGE_ERROR
        }
        _ => exit_codes::FAILURE,
    };
    ExitCode::from(code as u8)
}
