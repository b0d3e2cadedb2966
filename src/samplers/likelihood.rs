//! Defines a sampler for likelihood weighted particle generation.
//!
//! The proposal is the model's own prior: latent choices are drawn forward, observations are
//! bound to the supplied values, and each particle is weighted by the product of the observation
//! likelihoods.

use crate::distribution::Value;
use crate::executor::Executor;
use crate::model::Model;
use crate::trace::Trace;
use crate::util::{AugurError, Result};
use super::{WeightedSample, WeightedSampler};

use std::sync::Arc;


/// A stateless sampler that conditions a `Model` on observations by likelihood weighting
pub struct LikelihoodWeightedSampler<'a, M: 'a, I: 'a + ?Sized> {

    /// Runs the model on its inputs
    executor: Executor<'a, M, I>,

    /// The observations on which to condition, shared by every run
    observations: Arc<[Value]>

}


impl<'a, M, I: ?Sized> LikelihoodWeightedSampler<'a, M, I> {

    pub fn new(model: &'a M, input: &'a I, observations: Arc<[Value]>) -> Self {
        LikelihoodWeightedSampler { executor: Executor::new(model, input), observations }
    }

    /// Run the model once, conditioned on the observations, and return the full trace
    pub fn trace<O>(&self, seed: u64) -> Result<Trace<O>>
        where M: Model<I, O>
    {
        self.executor.run(seed, Some(self.observations.clone()))
    }

}


impl<'a, M, I, O> WeightedSampler<O> for LikelihoodWeightedSampler<'a, M, I>
    where M: Model<I, O>,
          I: ?Sized
{

    /// # Errors
    /// * `AugurError::NonFiniteWeight` if the log-likelihood is NaN or the weight overflows.
    ///   A log-likelihood of `-inf` is a legitimate zero weight.
    fn weighted_sample(&self, index: usize, seed: u64) -> Result<WeightedSample<O>> {
        let trace = self.trace(seed)?;
        let log_weight = trace.log_likelihood();
        let weight = log_weight.exp();

        if log_weight.is_nan() || !weight.is_finite() {
            return Err(AugurError::NonFiniteWeight { index, log_weight });
        }

        Ok(WeightedSample { value: trace.into_result(), weight, log_weight })
    }

}
