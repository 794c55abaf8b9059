//! State module for tracking run progress
//!
//! # Components
//!
//! - `RunPhase`: the phase of a run (fresh start, resuming, processing,
//!   retrying, interrupted, done) and its legal transitions

mod run_phase;

pub use run_phase::RunPhase;
