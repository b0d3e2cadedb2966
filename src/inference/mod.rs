//! Defines the importance sampling engine and the configuration and statistics of its batches

use std::time::Duration;

mod config;
mod importance_sampling;

pub use self::config::{CancellationToken, FailurePolicy, SamplerConfig};
pub use self::importance_sampling::ImportanceSamplingEngine;


/// Accounting for one inference batch
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunStats {

    /// Number of traces asked for
    pub requested: usize,

    /// Number of traces that finished and are part of the result
    pub completed: usize,

    /// Number of traces dropped because the model failed (best-effort batches only)
    pub failed: usize,

    /// Number of traces never started because the batch was cancelled or timed out
    pub skipped: usize,

    /// `true` if the batch stopped early; the result then holds only the finished traces
    pub cancelled: bool,

    /// Wall clock time of the batch
    pub elapsed: Duration

}

impl RunStats {

    /// Fold the statistics of another batch into these
    pub fn merge(&mut self, other: &RunStats) {
        self.requested += other.requested;
        self.completed += other.completed;
        self.failed += other.failed;
        self.skipped += other.skipped;
        self.cancelled |= other.cancelled;
        self.elapsed += other.elapsed;
    }

}
