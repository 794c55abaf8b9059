//! Shelfscrape main entry point
//!
//! This is the command-line interface for the Shelfscrape book-metadata scraper.

use anyhow::Context;
use clap::Parser;
use shelfscrape::config::{load_config_with_hash, validate, Config};
use shelfscrape::runner::{
    retry_only, scrape, Interrupt, InterruptCause, OperatorAnswers, RetryOutcome, RunOutcome,
    TerminalOperator,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Shelfscrape: a resumable book-metadata scraper
///
/// Shelfscrape reads the URLs from a sitemap, fetches each book page, and
/// writes the author and title to a CSV file. Failed URLs are logged for a
/// later retry, and progress is checkpointed so an interrupted run can be
/// resumed.
#[derive(Parser, Debug)]
#[command(name = "shelfscrape")]
#[command(version = "1.0.0")]
#[command(about = "A resumable book-metadata scraper", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Resume from a saved checkpoint without asking
    #[arg(long, conflicts_with = "fresh")]
    resume: bool,

    /// Discard any saved checkpoint without asking
    #[arg(long, conflicts_with = "resume")]
    fresh: bool,

    /// Sitemap to read on a fresh start (skips the prompt)
    #[arg(long, value_name = "PATH")]
    sitemap: Option<PathBuf>,

    /// 1-based position to start at on a fresh start (skips the prompt)
    #[arg(long, value_name = "N")]
    start: Option<usize>,

    /// Retry failed URLs after the run without asking
    #[arg(long, conflicts_with = "no_retry")]
    retry: bool,

    /// Never retry failed URLs after the run
    #[arg(long, conflicts_with = "retry")]
    no_retry: bool,

    /// Only reprocess the URLs in the failure log, then exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    retry_only: bool,

    /// Validate config and show what would be scraped without fetching anything
    #[arg(long, conflicts_with_all = ["retry_only", "stats"])]
    dry_run: bool,

    /// Show statistics from the result files and exit
    #[arg(long, conflicts_with_all = ["retry_only", "dry_run"])]
    stats: bool,
}

impl Cli {
    fn answers(&self) -> OperatorAnswers {
        OperatorAnswers {
            resume: flag_pair(self.resume, self.fresh),
            sitemap: self.sitemap.clone(),
            start: self.start,
            retry: flag_pair(self.retry, self.no_retry),
        }
    }
}

/// Maps a `--x`/`--no-x` pair to a preset answer
fn flag_pair(yes: bool, no: bool) -> Option<bool> {
    match (yes, no) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(cli.config.as_deref())?;

    if cli.dry_run {
        handle_dry_run(&config, cli.sitemap.as_deref())?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.retry_only {
        handle_retry_only(config, cli.answers()).await?;
    } else {
        handle_scrape(config, cli.answers()).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shelfscrape=info,warn"),
            1 => EnvFilter::new("shelfscrape=debug,info"),
            2 => EnvFilter::new("shelfscrape=trace,debug"),
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

/// Loads the config file if one was given, otherwise the defaults
fn load_configuration(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        let config = Config::default();
        validate(&config).context("default configuration is invalid")?;
        return Ok(config);
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Handles the --dry-run mode: validates config and shows what would be scraped
fn handle_dry_run(config: &Config, sitemap: Option<&Path>) -> anyhow::Result<()> {
    use shelfscrape::sitemap::read_sitemap;

    println!("=== Shelfscrape Dry Run ===\n");

    println!("Scraper Configuration:");
    println!("  Request timeout: {}s", config.scraper.request_timeout);
    println!("  Request delay: {}ms", config.scraper.request_delay);
    println!(
        "  Checkpoint interval: {} URLs",
        config.scraper.checkpoint_interval
    );
    println!("  User agent: {}", config.scraper.user_agent);

    println!("\nSelectors:");
    println!("  Author: {}", config.selectors.author);
    println!("  Title: {}", config.selectors.title);

    println!("\nOutput:");
    println!("  Results: {}", config.output.csv_path);
    println!("  Failure log: {}", config.output.error_log_path);
    println!("  Checkpoint: {}", config.output.progress_path);

    let sitemap = sitemap
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&config.input.default_sitemap));
    println!("\nSitemap: {}", sitemap.display());

    let urls = read_sitemap(&sitemap);
    for url in urls.iter().take(5) {
        println!("  - {}", url);
    }
    if urls.len() > 5 {
        println!("  ... and {} more", urls.len() - 5);
    }

    println!("\n✓ Configuration is valid");
    if urls.is_empty() {
        println!("✗ No URLs found in {}", sitemap.display());
    } else {
        println!("✓ Would scrape {} URLs", urls.len());
    }

    Ok(())
}

/// Handles the --stats mode: shows statistics from the result files
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    use shelfscrape::output::{load_statistics, print_statistics, ResultSink};
    use shelfscrape::storage::{JsonProgressStore, ProgressStore};

    println!("Results: {}", config.output.csv_path);
    println!("Failure log: {}\n", config.output.error_log_path);

    let sink = ResultSink::from_config(&config.output);
    let stats =
        load_statistics(sink.csv(), sink.errors()).context("failed to read result files")?;
    print_statistics(&stats);

    println!();
    let progress = JsonProgressStore::new(&config.output.progress_path);
    match progress.load() {
        Some(checkpoint) => {
            println!("Checkpoint: {}", config.output.progress_path);
            println!("  Sitemap: {}", checkpoint.source_path);
            println!(
                "  Processed: {}/{} URLs",
                checkpoint.current_index, checkpoint.total_urls
            );
            if let Some(saved_at) = checkpoint.saved_at() {
                println!("  Saved at: {}", saved_at.format("%Y-%m-%d %H:%M:%S UTC"));
            }
        }
        None => println!("Checkpoint: none"),
    }

    Ok(())
}

/// Handles the --retry-only mode: reprocesses the failure log
async fn handle_retry_only(config: Config, answers: OperatorAnswers) -> anyhow::Result<()> {
    let outcome = retry_only(config, TerminalOperator::new(answers), Interrupt::ctrl_c().await)
        .await
        .context("retry failed")?;
    report_retry(&outcome);
    Ok(())
}

/// Handles the main scrape operation
async fn handle_scrape(config: Config, answers: OperatorAnswers) -> anyhow::Result<()> {
    let outcome = scrape(config, TerminalOperator::new(answers), Interrupt::ctrl_c().await)
        .await
        .context("scrape failed")?;

    match outcome {
        RunOutcome::Completed { stats, retry } => {
            tracing::info!(
                "Scrape completed: {} succeeded, {} failed",
                stats.succeeded,
                stats.failed
            );
            if let Some(retry) = retry {
                report_retry(&retry);
            }
        }
        RunOutcome::Interrupted {
            checkpoint, cause, ..
        } => {
            if let InterruptCause::Failed(reason) = &cause {
                tracing::error!("Scrape stopped: {}", reason);
            }
            match checkpoint {
                Some(checkpoint) => println!(
                    "\nProgress saved. Run again to continue from position {}/{}.",
                    checkpoint.resume_position(),
                    checkpoint.total_urls
                ),
                None => println!("\nProgress could not be saved."),
            }
        }
        RunOutcome::Aborted { reason } => {
            println!("\nNothing to do: {}", reason);
        }
    }

    Ok(())
}

fn report_retry(outcome: &RetryOutcome) {
    if outcome.interrupted {
        println!(
            "\nRetry stopped after {}/{} URLs; the rest stay in the failure log.",
            outcome.stats.processed, outcome.planned
        );
    } else if outcome.planned > 0 {
        tracing::info!(
            "Retry recovered {} of {} URLs",
            outcome.stats.succeeded,
            outcome.planned
        );
    }
}
