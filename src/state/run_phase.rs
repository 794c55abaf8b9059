/// Run phase definitions for the scrape controller
///
/// This module defines every phase a run passes through and which moves
/// between them are legal.
use std::fmt;

/// Represents the current phase of a scrape run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunPhase {
    // ===== Entry =====
    /// Nothing decided yet; the checkpoint has not been consulted
    Launch,

    // ===== Setup States =====
    /// New run: sitemap and start position come from the operator
    FreshStart,

    /// Continuing from a saved checkpoint
    Resuming,

    // ===== Work States =====
    /// Walking the sitemap URLs
    Processing,

    /// Reprocessing the URLs in the failure log
    Retrying,

    // ===== Terminal States =====
    /// Stopped early; the checkpoint is kept for a later resume
    Interrupted,

    /// Finished normally
    Done,
}

impl RunPhase {
    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: RunPhase) -> bool {
        use RunPhase::*;
        matches!(
            (self, next),
            (Launch, FreshStart | Resuming | Retrying)
                | (FreshStart, Processing | Done)
                | (Resuming, Processing | Done)
                | (Processing, Done | Interrupted)
                | (Done, Retrying)
                | (Retrying, Done | Interrupted)
        )
    }

    /// Returns true if the run may end in this phase
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Interrupted)
    }

    /// Returns true if URLs are being fetched in this phase
    pub fn is_working(&self) -> bool {
        matches!(self, Self::Processing | Self::Retrying)
    }

    /// Short lowercase name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Launch => "launch",
            Self::FreshStart => "fresh_start",
            Self::Resuming => "resuming",
            Self::Processing => "processing",
            Self::Retrying => "retrying",
            Self::Interrupted => "interrupted",
            Self::Done => "done",
        }
    }

    /// Returns all possible run phases
    pub fn all_phases() -> Vec<Self> {
        vec![
            Self::Launch,
            Self::FreshStart,
            Self::Resuming,
            Self::Processing,
            Self::Retrying,
            Self::Interrupted,
            Self::Done,
        ]
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
