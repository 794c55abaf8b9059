//! Operator interaction
//!
//! The run controller asks four questions: resume or not, which sitemap,
//! where to start, and whether to retry failures. [`TerminalOperator`] asks
//! them on the terminal unless the answer was already given on the command
//! line.

use crate::storage::ProgressCheckpoint;
use crate::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};
use std::path::{Path, PathBuf};

/// Source of the operator's decisions
pub trait Operator {
    /// Asked when a checkpoint exists; `true` resumes from it
    fn confirm_resume(&mut self, checkpoint: &ProgressCheckpoint) -> Result<bool>;

    /// Sitemap to read on a fresh start
    fn sitemap_path(&mut self, default: &Path) -> Result<PathBuf>;

    /// 1-based start position within `1..=url_count`
    fn start_position(&mut self, url_count: usize) -> Result<usize>;

    /// Asked after a run that had failures; `true` starts a retry pass
    fn confirm_retry(&mut self, failures: usize) -> Result<bool>;
}

/// Answers supplied up front, e.g. from command-line flags
#[derive(Debug, Clone, Default)]
pub struct OperatorAnswers {
    pub resume: Option<bool>,
    pub sitemap: Option<PathBuf>,
    pub start: Option<usize>,
    pub retry: Option<bool>,
}

/// Prompts on the terminal for anything not in [`OperatorAnswers`]
#[derive(Debug, Clone, Default)]
pub struct TerminalOperator {
    answers: OperatorAnswers,
}

impl TerminalOperator {
    pub fn new(answers: OperatorAnswers) -> Self {
        Self { answers }
    }
}

impl Operator for TerminalOperator {
    fn confirm_resume(&mut self, checkpoint: &ProgressCheckpoint) -> Result<bool> {
        println!("Found saved progress:");
        println!("  Sitemap: {}", checkpoint.source_path);
        println!(
            "  Processed: {}/{} URLs",
            checkpoint.current_index, checkpoint.total_urls
        );
        if let Some(saved_at) = checkpoint.saved_at() {
            println!("  Saved at: {}", saved_at.format("%Y-%m-%d %H:%M:%S UTC"));
        }

        if let Some(resume) = self.answers.resume {
            return Ok(resume);
        }

        let resume = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "Continue from position {}?",
                checkpoint.resume_position()
            ))
            .default(true)
            .interact()?;
        Ok(resume)
    }

    fn sitemap_path(&mut self, default: &Path) -> Result<PathBuf> {
        if let Some(path) = &self.answers.sitemap {
            return Ok(path.clone());
        }

        let input: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Sitemap XML file")
            .default(default.display().to_string())
            .interact_text()?;

        let input = input.trim();
        if input.is_empty() {
            Ok(default.to_path_buf())
        } else {
            Ok(PathBuf::from(input))
        }
    }

    fn start_position(&mut self, url_count: usize) -> Result<usize> {
        if let Some(start) = self.answers.start {
            match parse_start_position(&start.to_string(), url_count) {
                Ok(position) => return Ok(position),
                Err(reason) => tracing::warn!("Ignoring --start {}: {}", start, reason),
            }
        }

        let input: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Start at URL number (1-{})", url_count))
            .default("1".to_string())
            .validate_with(|input: &String| -> std::result::Result<(), String> {
                parse_start_position(input, url_count).map(|_| ())
            })
            .interact_text()?;

        Ok(parse_start_position(&input, url_count).unwrap_or(1))
    }

    fn confirm_retry(&mut self, failures: usize) -> Result<bool> {
        if let Some(retry) = self.answers.retry {
            return Ok(retry);
        }

        let retry = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Retry the {} failed URLs?", failures))
            .default(true)
            .interact()?;
        Ok(retry)
    }
}

/// Parses a 1-based start position
///
/// Empty input means position 1. Anything outside `1..=url_count` is rejected
/// with a message suitable for re-prompting.
pub fn parse_start_position(input: &str, url_count: usize) -> std::result::Result<usize, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(1);
    }

    let position: i64 = input
        .parse()
        .map_err(|_| "Please enter a valid number".to_string())?;

    if position < 1 {
        return Err("Position must be greater than 0".to_string());
    }

    let position = position as usize;
    if position > url_count {
        return Err(format!(
            "Start position ({}) is greater than the number of URLs ({})",
            position, url_count
        ));
    }

    Ok(position)
}
