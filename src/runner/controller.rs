//! Run controller - main scrape orchestration logic
//!
//! This module contains the loop that drives a run:
//! - Deciding between a fresh start and resuming a checkpoint
//! - Walking the sitemap URLs and recording each result
//! - Checkpointing periodically and on interruption
//! - Reprocessing the failure log on request

use crate::config::Config;
use crate::extractor::{build_http_client, extract_book, BookRecord, BookSelectors};
use crate::output::{print_run_summary, ErrorLogEntry, ResultSink, RunStats};
use crate::runner::interrupt::Interrupt;
use crate::runner::prompt::Operator;
use crate::sitemap::{fingerprint, read_sitemap};
use crate::state::RunPhase;
use crate::storage::{JsonProgressStore, ProgressCheckpoint, ProgressStore};
use crate::{Result, ScrapeError};
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Every URL from the start position was processed
    Completed {
        stats: RunStats,
        retry: Option<RetryOutcome>,
    },

    /// The loop stopped early; the checkpoint is left in place
    Interrupted {
        /// Checkpoint written on the way out, `None` if writing it failed
        checkpoint: Option<ProgressCheckpoint>,
        stats: RunStats,
        cause: InterruptCause,
    },

    /// Nothing could be processed (missing or empty sitemap)
    Aborted { reason: String },
}

/// Why a run was interrupted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterruptCause {
    /// The operator pressed Ctrl-C
    Operator,
    /// A result could not be written
    Failed(String),
}

/// Result of a retry pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryOutcome {
    /// URLs in the failure log when the pass started
    pub planned: usize,
    pub stats: RunStats,
    /// True if the pass was stopped before reaching every URL
    pub interrupted: bool,
}

/// URLs to walk and where to begin
#[derive(Debug, Clone)]
struct RunPlan {
    urls: Vec<String>,
    /// 0-based index of the first URL to process
    start: usize,
    source: PathBuf,
}

enum LaunchDecision {
    Process(RunPlan),
    Abort(String),
}

/// Drives a single scrape run
pub struct RunController<O: Operator> {
    config: Config,
    client: Client,
    selectors: BookSelectors,
    sink: ResultSink,
    progress: Box<dyn ProgressStore>,
    operator: O,
    interrupt: Interrupt,
    phase: RunPhase,
}

impl<O: Operator> RunController<O> {
    /// Creates a controller from the configuration
    ///
    /// # Returns
    ///
    /// * `Ok(RunController)` - Ready to run
    /// * `Err(ScrapeError)` - The HTTP client or the selectors could not be built
    pub fn new(config: Config, operator: O, interrupt: Interrupt) -> Result<Self> {
        let client = build_http_client(&config.scraper)?;
        let selectors = BookSelectors::from_config(&config.selectors)?;
        let sink = ResultSink::from_config(&config.output);
        let progress = Box::new(JsonProgressStore::new(&config.output.progress_path));

        Ok(Self {
            config,
            client,
            selectors,
            sink,
            progress,
            operator,
            interrupt,
            phase: RunPhase::Launch,
        })
    }

    /// Current phase of the run
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn sink(&self) -> &ResultSink {
        &self.sink
    }

    pub fn progress(&self) -> &dyn ProgressStore {
        self.progress.as_ref()
    }

    pub fn operator(&self) -> &O {
        &self.operator
    }

    /// Runs the full launch → process → (retry) sequence
    pub async fn run(&mut self) -> Result<RunOutcome> {
        let plan = match self.plan_launch()? {
            LaunchDecision::Process(plan) => plan,
            LaunchDecision::Abort(reason) => {
                tracing::error!("{}", reason);
                return Ok(RunOutcome::Aborted { reason });
            }
        };

        self.transition(RunPhase::Processing)?;
        let stats = match self.process(&plan).await? {
            RunOutcome::Completed { stats, .. } => stats,
            interrupted => return Ok(interrupted),
        };

        let planned = plan.urls.len() - plan.start;
        print_run_summary("Scraping complete", &stats, planned);
        println!("  Results: {}", self.sink.csv().path().display());
        if stats.failed > 0 {
            println!("  Failed URLs: {}", self.sink.errors().path().display());
        }

        let retry = if stats.failed > 0 && self.operator.confirm_retry(stats.failed)? {
            Some(self.retry_failures().await?)
        } else {
            None
        };

        Ok(RunOutcome::Completed { stats, retry })
    }

    /// Reprocesses every URL in the failure log once
    ///
    /// Each result is appended to the CSV file. Afterwards the failure log
    /// holds only the URLs that failed again, with their new messages.
    pub async fn retry_failures(&mut self) -> Result<RetryOutcome> {
        self.transition(RunPhase::Retrying)?;

        let entries = self.sink.errors().entries()?;
        if entries.is_empty() {
            tracing::info!("No failed URLs to retry");
            self.transition(RunPhase::Done)?;
            return Ok(RetryOutcome::default());
        }

        tracing::info!("Retrying {} failed URLs", entries.len());
        let delay = self.request_delay();
        let mut stats = RunStats::default();
        let mut still_failing = Vec::new();

        for (n, entry) in entries.iter().enumerate() {
            tracing::info!("Retry {}/{}: {}", n + 1, entries.len(), entry.url);

            let Some(record) = self.fetch_or_interrupt(&entry.url).await else {
                return self.stop_retry(&entries, n, still_failing, stats);
            };

            let is_first = !self.sink.csv().exists();
            self.sink.csv().write(&record, is_first)?;
            stats.record(&record);
            log_record(&record);

            if record.has_error {
                still_failing.push(ErrorLogEntry::new(&record.url, &record.status));
            }

            if self.pause_or_interrupt(delay).await {
                return self.stop_retry(&entries, n + 1, still_failing, stats);
            }
        }

        self.sink.errors().rewrite(&still_failing)?;
        self.transition(RunPhase::Done)?;

        print_run_summary("Retry complete", &stats, entries.len());
        Ok(RetryOutcome {
            planned: entries.len(),
            stats,
            interrupted: false,
        })
    }

    /// Decides between resuming and a fresh start
    fn plan_launch(&mut self) -> Result<LaunchDecision> {
        if let Some(checkpoint) = self.progress.load() {
            if self.operator.confirm_resume(&checkpoint)? {
                self.transition(RunPhase::Resuming)?;
                return self.plan_resume(checkpoint);
            }

            tracing::info!("Discarding saved checkpoint");
            self.progress.clear()?;
        }

        self.transition(RunPhase::FreshStart)?;
        self.plan_fresh_start()
    }

    fn plan_resume(&mut self, checkpoint: ProgressCheckpoint) -> Result<LaunchDecision> {
        let source = checkpoint.source();
        if !source.exists() {
            self.progress.clear()?;
            return self.abort(format!("Sitemap file '{}' not found", source.display()));
        }

        let urls = read_sitemap(&source);
        if urls.is_empty() {
            return self.abort(format!("No URLs found in sitemap '{}'", source.display()));
        }

        if let (Some(saved), Some(current)) = (&checkpoint.sitemap_sha256, fingerprint(&source)) {
            if *saved != current {
                tracing::warn!(
                    "Sitemap {} changed since the checkpoint was saved; positions may have shifted",
                    source.display()
                );
            }
        }
        if checkpoint.total_urls != urls.len() {
            tracing::warn!(
                "Checkpoint expected {} URLs but the sitemap now has {}",
                checkpoint.total_urls,
                urls.len()
            );
        }

        let start = checkpoint.current_index.min(urls.len());
        tracing::info!(
            "Resuming {} at position {}/{}",
            source.display(),
            start + 1,
            urls.len()
        );

        Ok(LaunchDecision::Process(RunPlan {
            urls,
            start,
            source,
        }))
    }

    fn plan_fresh_start(&mut self) -> Result<LaunchDecision> {
        let default = PathBuf::from(&self.config.input.default_sitemap);
        let source = self.operator.sitemap_path(&default)?;
        if !source.exists() {
            return self.abort(format!("Sitemap file '{}' not found", source.display()));
        }

        tracing::info!("Reading sitemap {}", source.display());
        let urls = read_sitemap(&source);
        if urls.is_empty() {
            return self.abort(format!("No URLs found in sitemap '{}'", source.display()));
        }
        tracing::info!("Found {} URLs", urls.len());

        let position = self.operator.start_position(urls.len())?;
        let start = position.clamp(1, urls.len()) - 1;

        // A fresh run does not inherit failures from earlier runs
        self.sink.errors().clear()?;

        Ok(LaunchDecision::Process(RunPlan {
            urls,
            start,
            source,
        }))
    }

    /// Walks the planned URLs
    async fn process(&mut self, plan: &RunPlan) -> Result<RunOutcome> {
        let total = plan.urls.len();
        let planned = total - plan.start;
        let interval = self.config.scraper.checkpoint_interval.max(1) as usize;
        let delay = self.request_delay();

        let mut stats = RunStats::default();
        let mut write_header = !self.sink.csv().exists();

        tracing::info!("Starting at position {}/{}", plan.start + 1, total);

        for index in plan.start..total {
            let url = &plan.urls[index];
            tracing::info!("Processing {}/{}: {}", index + 1, total, url);

            let Some(record) = self.fetch_or_interrupt(url).await else {
                return self.interrupt_at(index, plan, stats, InterruptCause::Operator);
            };

            if let Err(e) = self.sink.record(&record, write_header) {
                tracing::error!("Failed to record result for {}: {}", url, e);
                return self.interrupt_at(index, plan, stats, InterruptCause::Failed(e.to_string()));
            }
            write_header = false;
            stats.record(&record);
            log_record(&record);

            tracing::info!(
                "Progress: {}/{} | Succeeded: {} | Failed: {}",
                stats.processed,
                planned,
                stats.succeeded,
                stats.failed
            );

            if (index + 1) % interval == 0 {
                if let Err(e) = self.progress.save(index + 1, total, &plan.source) {
                    tracing::warn!("Failed to save checkpoint at {}: {}", index + 1, e);
                }
            }

            if self.pause_or_interrupt(delay).await {
                return self.interrupt_at(index + 1, plan, stats, InterruptCause::Operator);
            }
        }

        self.progress.clear()?;
        self.transition(RunPhase::Done)?;

        Ok(RunOutcome::Completed { stats, retry: None })
    }

    /// Extracts one URL unless the interrupt fires first
    async fn fetch_or_interrupt(&mut self, url: &str) -> Option<BookRecord> {
        tokio::select! {
            biased;
            _ = self.interrupt.triggered() => None,
            record = extract_book(&self.client, url, &self.selectors) => Some(record),
        }
    }

    /// Waits out the request delay; returns true if interrupted meanwhile
    async fn pause_or_interrupt(&mut self, delay: Duration) -> bool {
        tokio::select! {
            biased;
            _ = self.interrupt.triggered() => true,
            _ = tokio::time::sleep(delay) => false,
        }
    }

    /// Saves the checkpoint and ends the run early
    ///
    /// `completed` is the number of leading URLs fully processed.
    fn interrupt_at(
        &mut self,
        completed: usize,
        plan: &RunPlan,
        stats: RunStats,
        cause: InterruptCause,
    ) -> Result<RunOutcome> {
        self.transition(RunPhase::Interrupted)?;

        let checkpoint = match self.progress.save(completed, plan.urls.len(), &plan.source) {
            Ok(checkpoint) => Some(checkpoint),
            Err(e) => {
                tracing::error!("Failed to save checkpoint: {}", e);
                None
            }
        };

        tracing::warn!(
            "Stopped after {} URLs in this run; next run can resume at position {}/{}",
            stats.processed,
            completed + 1,
            plan.urls.len()
        );

        Ok(RunOutcome::Interrupted {
            checkpoint,
            stats,
            cause,
        })
    }

    /// Ends a retry pass early without losing any pending failure
    ///
    /// The failure log keeps the URLs that failed again plus every URL from
    /// `next` onward with its previous message.
    fn stop_retry(
        &mut self,
        entries: &[ErrorLogEntry],
        next: usize,
        mut still_failing: Vec<ErrorLogEntry>,
        stats: RunStats,
    ) -> Result<RetryOutcome> {
        self.transition(RunPhase::Interrupted)?;

        still_failing.extend_from_slice(&entries[next..]);
        self.sink.errors().rewrite(&still_failing)?;

        tracing::warn!(
            "Retry stopped after {}/{} URLs; {} remain in the failure log",
            stats.processed,
            entries.len(),
            still_failing.len()
        );

        Ok(RetryOutcome {
            planned: entries.len(),
            stats,
            interrupted: true,
        })
    }

    fn abort(&mut self, reason: String) -> Result<LaunchDecision> {
        self.transition(RunPhase::Done)?;
        Ok(LaunchDecision::Abort(reason))
    }

    fn request_delay(&self) -> Duration {
        Duration::from_millis(self.config.scraper.request_delay)
    }

    fn transition(&mut self, next: RunPhase) -> Result<()> {
        if !self.phase.can_transition_to(next) {
            return Err(ScrapeError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!("Run phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }
}

fn log_record(record: &BookRecord) {
    if record.has_error {
        tracing::warn!("  ✗ {}", record.status);
    } else {
        tracing::info!("  ✓ Author: {} | Title: {}", record.author, record.title);
    }
}
