//! Configuration of an inference batch

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;


/// What to do when a single run of the model fails
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailurePolicy {

    /// Stop dispatching runs and fail the batch. The error returned is that of the lowest-indexed
    /// run that started and failed; in parallel batches a lower-indexed run may have been skipped
    /// before it could fail.
    Abort,

    /// Drop failed runs from the result and count them in `RunStats::failed`
    BestEffort

}

impl Default for FailurePolicy {
    fn default() -> Self {
        FailurePolicy::Abort
    }
}


/// A handle with which a batch can be cancelled from another thread. Clones share one flag.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {

    pub fn new() -> Self {
        CancellationToken::default()
    }

    /// Request cancellation. Runs already in flight complete; runs not yet started are skipped.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

}


/// Builder-style settings for an `ImportanceSamplingEngine`
#[derive(Clone, Debug)]
pub struct SamplerConfig {
    pub(crate) seed: Option<u64>,
    pub(crate) policy: FailurePolicy,
    pub(crate) parallel: bool,
    pub(crate) threads: Option<usize>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) cancellation: Option<CancellationToken>
}

impl Default for SamplerConfig {
    fn default() -> Self {
        SamplerConfig {
            seed: None,
            policy: FailurePolicy::default(),
            parallel: true,
            threads: None,
            timeout: None,
            cancellation: None
        }
    }
}

impl SamplerConfig {

    pub fn new() -> Self {
        SamplerConfig::default()
    }

    /// Fix the master seed. Each trace derives its own seed from it, so a fixed seed and trace
    /// count always give the same samples.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run traces on the calling thread when `false`
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Run on a dedicated pool of `threads` workers instead of the global pool
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Skip every run not started within `timeout` of the batch start
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

}
