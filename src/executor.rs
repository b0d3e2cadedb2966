//! The Program Executor: runs a `Model` once, threading the `sample` and `observe` primitives
//! through a private `TraceRecorder`, and seals the run into a `Trace`.

use crate::distribution::{Dist, Distribution, Value};
use crate::model::Model;
use crate::trace::{Trace, TraceRecorder};
use crate::util::{AugurError, Result};

use ndarray::prelude as nd;
use ndarray_rand::RandomExt;
use rand::distributions::Distribution as RandDistribution;
use rand::rngs::StdRng;
use rand::SeedableRng;

use std::any::Any;
use std::convert::TryFrom;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;


/// The execution context of a single run.
///
/// The context is the only channel through which a model draws random values or conditions on
/// data. It owns the run's random number generator and trace recorder; nothing in it is shared
/// with other runs.
pub struct Context {

    /// Private random source, seeded per trace
    rng: StdRng,

    /// Accumulates the choices and the observation log-likelihood of this run
    recorder: TraceRecorder,

    /// Externally supplied observations, bound positionally to the run's observe calls.
    /// `None` in prior mode.
    observations: Option<Arc<[Value]>>,

    /// How many of `observations` have been consumed by `observe_next`
    bound: usize

}

impl Context {

    pub(crate) fn new(seed: u64, observations: Option<Arc<[Value]>>) -> Self {
        Context {
            rng: StdRng::seed_from_u64(seed),
            recorder: TraceRecorder::new(),
            observations,
            bound: 0
        }
    }

    /// Draw a value from `dist` and record it as the next choice of this run.
    pub fn sample<D>(&mut self, dist: &D) -> D::Value
        where D: Distribution + Clone + Into<Dist>,
              D::Value: Clone + Into<Value>
    {
        self.draw(None, dist)
    }

    /// Same as `sample`, keeping `label` on the choice's address for later lookup.
    pub fn sample_labelled<D>(&mut self, label: &str, dist: &D) -> D::Value
        where D: Distribution + Clone + Into<Dist>,
              D::Value: Clone + Into<Value>
    {
        self.draw(Some(String::from(label)), dist)
    }

    /// Draw `n` independent values from `dist` in one call. Each value is recorded as its own
    /// choice, at consecutive addresses.
    pub fn sample_n<D>(&mut self, dist: &D, n: usize) -> nd::Array1<D::Value>
        where D: Distribution + RandDistribution<<D as Distribution>::Value> + Clone + Into<Dist>,
              D::Value: Clone + Into<Value>
    {
        let draws: nd::Array1<D::Value> = nd::Array1::random_using(n, dist.clone(), &mut self.rng);

        for v in draws.iter() {
            let lp = dist.log_prob(v);
            self.recorder.record_choice(None, dist.clone().into(), v.clone().into(), lp);
        }

        draws
    }

    /// Condition the run on `value` having been drawn from `dist`: adds `dist.log_prob(value)` to
    /// the run's observation log-likelihood.
    ///
    /// The value comes from the model itself, so this never consumes one of the externally
    /// supplied observations.
    pub fn observe<D>(&mut self, dist: &D, value: D::Value)
        where D: Distribution + Clone + Into<Dist>,
              D::Value: Into<Value>
    {
        let lp = dist.log_prob(&value);
        let dist: Dist = dist.clone().into();
        log::trace!(target: "executor", "observe #{} under {}: log density {}", self.recorder.num_observations(), dist.family(), lp);
        self.recorder.record_observation(dist, value.into(), lp);
    }

    /// Condition on the next externally supplied observation.
    ///
    /// The k-th `observe_next` call of a run is bound to the k-th supplied observation; the bound
    /// value is scored under `dist` and returned. In prior mode there is nothing to bind, so a value
    /// is drawn from `dist` instead, which simulates the observed variable forward.
    ///
    /// # Errors
    /// * `AugurError::ModelExecution` if all supplied observations have already been consumed, or
    ///   the bound value is not of the kind `dist` produces
    pub fn observe_next<D>(&mut self, dist: &D) -> Result<D::Value>
        where D: Distribution + Clone + Into<Dist>,
              D::Value: Clone + Into<Value> + TryFrom<Value, Error = AugurError>
    {
        let position = self.bound;

        let value = match self.observations {
            Some(ref obs) => {
                let bound = obs.get(position).cloned().ok_or_else(|| {
                    AugurError::ModelExecution(format!(
                        "model made observe_next call #{} but only {} observations were supplied", position + 1, obs.len()
                    ))
                })?;
                self.bound += 1;
                <D::Value as TryFrom<Value>>::try_from(bound)?
            },
            None => Distribution::sample(dist, &mut self.rng)
        };

        self.observe(dist, value.clone());
        Ok(value)
    }

    /// The observations bound to this run (empty in prior mode)
    pub fn observations(&self) -> &[Value] {
        match self.observations {
            Some(ref obs) => &obs[..],
            None => &[]
        }
    }

    /// `true` if this run is conditioned on externally supplied observations
    pub fn is_conditioned(&self) -> bool {
        self.observations.is_some()
    }

    /// The observation log-likelihood accumulated so far in this run
    pub fn log_likelihood(&self) -> f64 {
        self.recorder.log_likelihood()
    }

    fn draw<D>(&mut self, label: Option<String>, dist: &D) -> D::Value
        where D: Distribution + Clone + Into<Dist>,
              D::Value: Clone + Into<Value>
    {
        let value = Distribution::sample(dist, &mut self.rng);
        let lp = dist.log_prob(&value);
        self.recorder.record_choice(label, dist.clone().into(), value.clone().into(), lp);

        value
    }

    /// Seal the run. When observations are bound, every one of them must have been consumed by
    /// `observe_next`.
    fn finish<T>(self, result: T) -> Result<Trace<T>> {
        if let Some(ref obs) = self.observations {
            if self.bound != obs.len() {
                return Err(AugurError::ModelExecution(format!(
                    "model made {} observe_next calls but {} observations were supplied", self.bound, obs.len()
                )));
            }
        }

        Ok(self.recorder.finish(result))
    }

}


/// Runs a `Model` on fixed inputs, one independent trace per call.
pub struct Executor<'a, M: 'a, I: 'a + ?Sized> {
    model: &'a M,
    input: &'a I
}

impl<'a, M, I: ?Sized> Executor<'a, M, I> {

    pub fn new(model: &'a M, input: &'a I) -> Self {
        Executor { model, input }
    }

    /// Execute the model once.
    ///
    /// # Args
    /// * `seed`: seed of this run's private random source
    /// * `observations`: the observations to bind to the run's observe calls, or `None` to run
    ///   the model forward
    ///
    /// # Returns
    /// the completed `Trace`, including the model's return value
    ///
    /// # Errors
    /// * whatever error the model returned
    /// * `AugurError::ModelExecution` if the model panicked or its observe calls did not line up
    ///   with `observations`
    pub fn run<O>(&self, seed: u64, observations: Option<Arc<[Value]>>) -> Result<Trace<O>>
        where M: Model<I, O>
    {
        let mut ctx = Context::new(seed, observations);

        // a panicking model only loses its own context
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.model.run(&mut ctx, self.input)));

        let result = match outcome {
            Ok(result) => result?,
            Err(payload) => {
                return Err(AugurError::ModelExecution(format!("model panicked: {}", panic_message(&*payload))));
            }
        };

        let trace = ctx.finish(result)?;
        log::trace!(target: "executor", "trace complete: {} choices, {} observations, log likelihood {}",
                    trace.choices().len(), trace.observations().len(), trace.log_likelihood());

        Ok(trace)
    }

}


fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        String::from(*s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("unknown panic payload")
    }
}
