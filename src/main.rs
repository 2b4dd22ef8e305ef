//! clipsieve main entry point
//!
//! This is the command-line interface for the clipsieve comment crawler.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use url::Url;

use clipsieve::config::{load_config_or_default, Config};
use clipsieve::crawler::{Orchestrator, SnapshotHost, StepOutcome};
use clipsieve::extract::extract_comments;
use clipsieve::output::{load_status, print_status, ARTIFACT_FILE_NAME};
use clipsieve::state::{clear_run, persist_phase, persist_query, CrawlQuery, Phase};
use clipsieve::storage::{open_store, SqliteStore};

/// clipsieve: a keyword-filtering comment crawler
///
/// clipsieve discovers items for a search term, visits them one by one, and
/// collects the comments matching a set of filter keywords into a single
/// tab-separated artifact. Progress is persisted between executions, so an
/// interrupted run picks up where it left off.
#[derive(Parser, Debug)]
#[command(name = "clipsieve")]
#[command(version = "0.2.0")]
#[command(about = "A keyword-filtering comment crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file; defaults apply when it is absent
    #[arg(
        short,
        long,
        value_name = "CONFIG",
        default_value = "clipsieve.toml",
        global = true
    )]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Persist a query and arm the run for discovery
    Start {
        /// Search term for discovering items
        term: String,

        /// Filter keyword, repeatable; falls back to the configured defaults
        #[arg(short = 'k', long = "keyword", value_name = "KEYWORD")]
        keywords: Vec<String>,

        /// Cap on harvested items; falls back to the configured default
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Execute the state machine until the run is at rest
    Run {
        /// Directory of captured page snapshots
        #[arg(long, value_name = "DIR", default_value = "./pages")]
        pages: PathBuf,

        /// Upper bound on executions before giving up
        #[arg(long, default_value_t = 64)]
        max_executions: usize,
    },

    /// Execute exactly one step of the state machine
    Step {
        /// Directory of captured page snapshots
        #[arg(long, value_name = "DIR", default_value = "./pages")]
        pages: PathBuf,
    },

    /// Show the persisted run state
    Status,

    /// Remove all persisted run state
    Clear,

    /// Extract matched comments from a single captured page
    Extract {
        /// Captured page file
        page: PathBuf,

        /// Filter keyword, repeatable
        #[arg(short = 'k', long = "keyword", value_name = "KEYWORD", required = true)]
        keywords: Vec<String>,

        /// Item URL recorded on each match
        #[arg(long, value_name = "URL")]
        url: Option<Url>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    let (config, config_hash) = load_config_or_default(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;
    match &config_hash {
        Some(hash) => tracing::info!(
            "Configuration loaded from {} (hash: {})",
            cli.config.display(),
            hash
        ),
        None => tracing::info!(
            "No configuration file at {}, using defaults",
            cli.config.display()
        ),
    }

    match cli.command {
        Command::Start {
            term,
            keywords,
            limit,
        } => handle_start(&config, term, keywords, limit),
        Command::Run {
            pages,
            max_executions,
        } => handle_run(&config, &pages, max_executions).await,
        Command::Step { pages } => handle_step(&config, &pages).await,
        Command::Status => handle_status(&config),
        Command::Clear => handle_clear(&config),
        Command::Extract {
            page,
            keywords,
            url,
        } => handle_extract(&config, &page, keywords, url),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("clipsieve=info,warn"),
            1 => EnvFilter::new("clipsieve=debug,info"),
            2 => EnvFilter::new("clipsieve=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Opens the run store configured in `[store]`
fn open_run_store(config: &Config) -> anyhow::Result<SqliteStore> {
    open_store(Path::new(&config.store.path), config.store_retention())
        .with_context(|| format!("failed to open run store at {}", config.store.path))
}

/// Handles the start command: validates and persists the query
fn handle_start(
    config: &Config,
    term: String,
    keywords: Vec<String>,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let keywords = if keywords.is_empty() {
        config.query.filter_keywords.clone()
    } else {
        keywords
    };
    let limit = limit.unwrap_or(config.query.item_limit);

    let query = CrawlQuery {
        search_term: term,
        filter_keywords: keywords,
        item_limit: limit,
    };
    query.validate()?;

    let mut store = open_run_store(config)?;
    persist_query(&mut store, &query)?;
    persist_phase(&mut store, Phase::Discovering)?;

    println!(
        "✓ Run armed: term '{}', keywords [{}], item limit {}",
        query.search_term,
        query.filter_keywords.join(", "),
        query.item_limit
    );
    println!("  Execute 'clipsieve run' to crawl");

    Ok(())
}

/// Handles the run command: executes the state machine to rest
async fn handle_run(config: &Config, pages: &Path, max_executions: usize) -> anyhow::Result<()> {
    let store = open_run_store(config)?;
    let host = SnapshotHost::new(pages, Path::new(&config.output.artifact_dir))?;
    let mut orchestrator = Orchestrator::new(store, host, config.clone())?;

    let outcome = orchestrator.run_to_rest(max_executions).await?;
    report_outcome(config, &outcome);

    Ok(())
}

/// Handles the step command: executes a single state-machine step
async fn handle_step(config: &Config, pages: &Path) -> anyhow::Result<()> {
    let store = open_run_store(config)?;
    let host = SnapshotHost::new(pages, Path::new(&config.output.artifact_dir))?;
    let mut orchestrator = Orchestrator::new(store, host, config.clone())?;

    let outcome = orchestrator.execute().await?;
    report_outcome(config, &outcome);

    Ok(())
}

/// Handles the status command: prints the persisted run state
fn handle_status(config: &Config) -> anyhow::Result<()> {
    let store = open_run_store(config)?;
    let status = load_status(&store)?;
    print_status(&status);
    Ok(())
}

/// Handles the clear command: removes every persisted key
fn handle_clear(config: &Config) -> anyhow::Result<()> {
    let mut store = open_run_store(config)?;
    clear_run(&mut store)?;
    println!("✓ Run state cleared");
    Ok(())
}

/// Handles the extract command: one-shot extraction from a captured page
fn handle_extract(
    config: &Config,
    page: &Path,
    keywords: Vec<String>,
    url: Option<Url>,
) -> anyhow::Result<()> {
    let html = std::fs::read_to_string(page)
        .with_context(|| format!("failed to read {}", page.display()))?;

    let source_url = match url {
        Some(url) => url,
        None => Url::parse(&format!("https://{}/", config.platform.domain))?,
    };

    let records = extract_comments(&html, &keywords, &source_url, &config.extract_options())?;
    tracing::info!("{} comments matched in {}", records.len(), page.display());

    for record in &records {
        print!("{}", record.to_tsv_line());
    }

    Ok(())
}

/// Prints how an execution (or a whole run) ended
fn report_outcome(config: &Config, outcome: &StepOutcome) {
    match outcome {
        StepOutcome::Completed => {
            let path = Path::new(&config.output.artifact_dir).join(ARTIFACT_FILE_NAME);
            let artifact = std::fs::read_to_string(&path).unwrap_or_default();
            let lines: Vec<&str> = artifact.lines().collect();

            println!("✓ Run complete: {} matched comments", lines.len());
            println!("✓ Artifact written to {}", path.display());
            for line in lines.iter().take(3) {
                println!("    {}", line);
            }
            if lines.len() > 3 {
                println!("    ... and {} more", lines.len() - 3);
            }
        }
        StepOutcome::Idle => {
            println!("Run is idle. Arm a query with 'clipsieve start' first.");
        }
        StepOutcome::Reset => {
            println!("Run was reset to idle: no items were found or the persisted state was unusable.");
        }
        StepOutcome::Navigated { target } => {
            println!("Navigation requested to {}. Execute again to continue.", target);
        }
    }
}
