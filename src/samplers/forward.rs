//! Defines a simple forward sampler: runs a `Model` unconditioned and gives every sample unit
//! weight. This characterizes the pure generative process (the prior).

use crate::executor::Executor;
use crate::model::Model;
use crate::trace::Trace;
use crate::util::Result;
use super::{WeightedSample, WeightedSampler};


/// A simple, stateless sampler for the prior of a `Model`
pub struct ForwardSampler<'a, M: 'a, I: 'a + ?Sized> {

    /// Runs the model on its inputs
    executor: Executor<'a, M, I>

}


impl<'a, M, I: ?Sized> ForwardSampler<'a, M, I> {

    pub fn new(model: &'a M, input: &'a I) -> Self {
        ForwardSampler { executor: Executor::new(model, input) }
    }

    /// Run the model once and return the full trace
    pub fn trace<O>(&self, seed: u64) -> Result<Trace<O>>
        where M: Model<I, O>
    {
        self.executor.run(seed, None)
    }

}


impl<'a, M, I, O> WeightedSampler<O> for ForwardSampler<'a, M, I>
    where M: Model<I, O>,
          I: ?Sized
{

    fn weighted_sample(&self, _index: usize, seed: u64) -> Result<WeightedSample<O>> {
        let trace = self.trace(seed)?;

        Ok(WeightedSample { value: trace.into_result(), weight: 1.0, log_weight: 0.0 })
    }

}
