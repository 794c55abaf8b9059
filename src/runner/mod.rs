//! Runner module for driving a scrape
//!
//! This module contains the run lifecycle, including:
//! - Launch decisions (resume a checkpoint or start fresh)
//! - The per-URL processing loop with periodic checkpoints
//! - Cooperative interruption on Ctrl-C
//! - The failure retry pass

mod controller;
mod interrupt;
mod prompt;

pub use controller::{InterruptCause, RetryOutcome, RunController, RunOutcome};
pub use interrupt::{Interrupt, InterruptHandle};
pub use prompt::{parse_start_position, Operator, OperatorAnswers, TerminalOperator};

use crate::config::Config;
use crate::Result;

/// Runs a complete scrape
///
/// This is the main entry point for a run. It will:
/// 1. Consult the checkpoint and ask whether to resume
/// 2. Read the sitemap and pick a start position
/// 3. Fetch and record every URL from there on
/// 4. Offer to retry the failures
///
/// # Arguments
///
/// * `config` - The scraper configuration
/// * `operator` - Source of the launch and retry decisions
/// * `interrupt` - Stops the run cleanly when fired
///
/// # Returns
///
/// * `Ok(RunOutcome)` - How the run ended
/// * `Err(ScrapeError)` - Setup failed or an output could not be written
pub async fn scrape<O: Operator>(
    config: Config,
    operator: O,
    interrupt: Interrupt,
) -> Result<RunOutcome> {
    let mut controller = RunController::new(config, operator, interrupt)?;
    controller.run().await
}

/// Reprocesses the failure log without a full run
pub async fn retry_only<O: Operator>(
    config: Config,
    operator: O,
    interrupt: Interrupt,
) -> Result<RetryOutcome> {
    let mut controller = RunController::new(config, operator, interrupt)?;
    controller.retry_failures().await
}
