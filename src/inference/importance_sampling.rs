//! Defines an `ImportanceSamplingEngine` for approximate inference using particle-based
//! approximations.
//!
//! Implementation of Importance Sampling via Normalized Likelihood Weighting, described in Koller &
//! Friedman 12.2.3.3. The proposal is the model's prior; every particle is one complete run of the
//! model, so particles are independent and are generated in parallel.

use crate::distribution::Value;
use crate::empirical::Empirical;
use crate::model::Model;
use crate::samplers::{ForwardSampler, LikelihoodWeightedSampler, WeightedSample, WeightedSampler};
use crate::util::{self, AugurError, Result};
use super::{CancellationToken, FailurePolicy, RunStats, SamplerConfig};

use rand::Rng;
use rayon::prelude::*;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;


/// What became of one trace of a batch
enum Outcome<T> {
    Done(WeightedSample<T>),
    Failed(AugurError),
    Skipped
}


/// An inference engine that approximates the distribution of a model's return value by a set of
/// weighted samples
pub struct ImportanceSamplingEngine<'a, M: 'a> {

    /// The model over which to perform inference
    model: &'a M,

    config: SamplerConfig

}

impl<'a, M> ImportanceSamplingEngine<'a, M> {

    pub fn new(model: &'a M) -> Self {
        ImportanceSamplingEngine { model, config: SamplerConfig::default() }
    }

    pub fn with_config(mut self, config: SamplerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Simulate the model's prior: `num_traces` unconditioned runs, each with weight one.
    ///
    /// Observe statements still score their values but do not weight the samples.
    pub fn run_prior<I, O>(&self, num_traces: usize, inputs: &I) -> Result<Empirical<O>>
        where M: Model<I, O> + Sync,
              I: ?Sized + Sync,
              O: Send
    {
        let sampler = ForwardSampler::new(self.model, inputs);
        self.run("prior", num_traces, &sampler)
    }

    /// Approximate the posterior given `observation` by likelihood weighting.
    ///
    /// Observations are bound in order to the observe calls of each run (see
    /// `Context::observe_next`), and run `i` is weighted by `exp` of its summed observation
    /// log-likelihood.
    ///
    /// # Errors
    /// * `AugurError::DegenerateInference` if traces completed but every weight is zero
    /// * `AugurError::NonFiniteWeight` if a run's log-likelihood is NaN or its weight overflows
    /// * `AugurError::ModelExecution` if a run failed (under `FailurePolicy::Abort`)
    /// * `AugurError::Cancelled` if the batch was cancelled before any trace finished
    pub fn run_posterior<I, O, V>(&self, num_traces: usize, observation: &[V], inputs: &I) -> Result<Empirical<O>>
        where M: Model<I, O> + Sync,
              I: ?Sized + Sync,
              O: Send,
              V: Clone + Into<Value>
    {
        let observations: Arc<[Value]> = observation.iter().cloned().map(Into::into).collect();
        let sampler = LikelihoodWeightedSampler::new(self.model, inputs, observations);

        let result = self.run("posterior", num_traces, &sampler)?;

        if !result.is_empty() && result.weights().iter().all(|&w| w == 0.0) {
            log::warn!(target: "inference", "every one of {} traces has zero weight", result.len());
            return Err(AugurError::DegenerateInference { traces: result.len() });
        }

        Ok(result)
    }

    /// Draw `num_traces` weighted samples from `sampler` and collect them in trace order
    fn run<O, S>(&self, mode: &str, num_traces: usize, sampler: &S) -> Result<Empirical<O>>
        where S: WeightedSampler<O> + Sync,
              O: Send
    {
        let seed = match self.config.seed {
            Some(seed) => seed,
            None => {
                let seed = rand::thread_rng().gen();
                log::debug!(target: "inference", "no seed configured, using {}", seed);
                seed
            }
        };

        log::info!(target: "inference", "{} batch: {} traces, seed {}", mode, num_traces, seed);

        let start = Instant::now();
        let deadline = self.config.timeout.map(|t| start + t);
        let token = self.config.cancellation.as_ref();
        let policy = self.config.policy;
        let abort = AtomicBool::new(false);

        let stopped = || {
            token.map_or(false, CancellationToken::is_cancelled) || deadline.map_or(false, |d| Instant::now() >= d)
        };

        let run_one = |index: usize| -> Outcome<O> {
            if abort.load(Ordering::Relaxed) || stopped() {
                return Outcome::Skipped;
            }

            match sampler.weighted_sample(index, util::split_seed(seed, index as u64)) {
                Ok(sample) => Outcome::Done(sample),
                Err(e) => {
                    log::debug!(target: "inference", "trace {} failed: {}", index, e);
                    if policy == FailurePolicy::Abort {
                        abort.store(true, Ordering::Relaxed);
                    }
                    Outcome::Failed(e)
                }
            }
        };

        let outcomes: Vec<Outcome<O>> = if !self.config.parallel {
            (0..num_traces).map(run_one).collect()
        } else if let Some(threads) = self.config.threads {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| AugurError::General(format!("could not build thread pool: {}", e)))?;
            pool.install(|| (0..num_traces).into_par_iter().map(run_one).collect())
        } else {
            (0..num_traces).into_par_iter().map(run_one).collect()
        };

        let mut values = Vec::with_capacity(num_traces);
        let mut weights = Vec::with_capacity(num_traces);
        let mut first_error = None;
        let mut failed = 0;
        let mut skipped = 0;

        for outcome in outcomes {
            match outcome {
                Outcome::Done(sample) => {
                    values.push(sample.value);
                    weights.push(sample.weight);
                },
                Outcome::Failed(e) => {
                    failed += 1;
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                },
                Outcome::Skipped => skipped += 1
            }
        }

        let elapsed = start.elapsed();

        if let Some(e) = first_error {
            if policy == FailurePolicy::Abort || values.is_empty() {
                log::warn!(target: "inference", "{} batch failed after {:?}: {}", mode, elapsed, e);
                return Err(e);
            }
            log::warn!(target: "inference", "dropped {} failed traces, first failure: {}", failed, e);
        }

        let cancelled = skipped > 0;
        if cancelled {
            log::warn!(target: "inference", "{} batch stopped early, {} traces skipped", mode, skipped);
            if values.is_empty() {
                return Err(AugurError::Cancelled);
            }
        }

        let stats = RunStats { requested: num_traces, completed: values.len(), failed, skipped, cancelled, elapsed };

        let secs = elapsed.as_secs_f64();
        let throughput = if secs > 0.0 { stats.completed as f64 / secs } else { 0.0 };
        log::info!(target: "inference", "{} batch finished: {}/{} traces in {:?} ({:.0} traces/s)",
                   mode, stats.completed, num_traces, elapsed, throughput);

        Ok(Empirical::new(values, weights)?.with_stats(stats))
    }

}
