//! Defines a `Trace` - one complete recorded execution of a generative model - and the
//! `TraceRecorder` that accumulates it while the model runs.

use crate::distribution::{Dist, Value};

use std::fmt;


/// The address of a stochastic choice: its position among the `sample` calls of a single run.
///
/// Addresses are local to one execution. Since control flow may depend on earlier draws, the
/// choice at position 3 in one trace need not correspond to the choice at position 3 in another.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Address {

    /// Zero-based position of the `sample` call within the run
    pub position: usize,

    /// An optional user supplied label
    pub label: Option<String>

}

impl fmt::Display for Address {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.label {
            Some(ref l) => write!(f, "{}#{}", l, self.position),
            None => write!(f, "#{}", self.position)
        }
    }

}


/// A single `sample` call: where it happened, what it was drawn from, what came out, and the prior
/// log-probability of that value.
#[derive(Clone, Debug, PartialEq)]
pub struct Choice {
    pub address: Address,
    pub distribution: Dist,
    pub value: Value,
    pub log_prob: f64
}


/// A single `observe` call. `position` counts observe calls within the run, which is also the
/// index of the externally supplied observation the call is bound to.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    pub position: usize,
    pub distribution: Dist,
    pub value: Value,
    pub log_prob: f64
}


/// A completed execution of a model.
///
/// # Invariants
/// A `Trace` is only produced by `TraceRecorder::finish` and cannot be modified afterwards.
/// `log_likelihood` is exactly the sum of the `log_prob` of every `Observation`.
#[derive(Clone, Debug)]
pub struct Trace<T> {
    choices: Vec<Choice>,
    observations: Vec<Observation>,
    log_likelihood: f64,
    result: T
}

impl<T> Trace<T> {

    /// The stochastic choices, in the order they were made
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    /// The observations, in the order they were made
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Lookup the choice at the given position
    pub fn choice(&self, position: usize) -> Option<&Choice> {
        self.choices.get(position)
    }

    /// All choices recorded under `label`, in order
    pub fn labelled<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a Choice> + 'a {
        self.choices.iter().filter(move |c| c.address.label.as_ref().map(|l| l == label).unwrap_or(false))
    }

    /// The sum of the observation log-densities accumulated during the run
    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    /// The sum of the prior log-probabilities of every choice
    pub fn log_prior(&self) -> f64 {
        self.choices.iter().map(|c| c.log_prob).sum()
    }

    /// `log_prior + log_likelihood`
    pub fn log_joint(&self) -> f64 {
        self.log_prior() + self.log_likelihood
    }

    /// The value returned by the model
    pub fn result(&self) -> &T {
        &self.result
    }

    /// Consume the trace, keeping only the model's return value
    pub fn into_result(self) -> T {
        self.result
    }

}


/// Accumulates the choices and observations of one run. Each run owns its own recorder.
#[derive(Debug, Default)]
pub struct TraceRecorder {
    choices: Vec<Choice>,
    observations: Vec<Observation>,
    log_likelihood: f64
}

impl TraceRecorder {

    pub fn new() -> Self {
        TraceRecorder::default()
    }

    /// Record a `sample` call, assigning it the next address
    pub fn record_choice(&mut self, label: Option<String>, distribution: Dist, value: Value, log_prob: f64) -> &Address {
        let address = Address { position: self.choices.len(), label };
        self.choices.push(Choice { address, distribution, value, log_prob });

        &self.choices[self.choices.len() - 1].address
    }

    /// Record an `observe` call and add its log-density to the likelihood accumulator
    pub fn record_observation(&mut self, distribution: Dist, value: Value, log_prob: f64) {
        let position = self.observations.len();
        self.log_likelihood += log_prob;
        self.observations.push(Observation { position, distribution, value, log_prob });
    }

    /// The number of `sample` calls recorded so far
    pub fn num_choices(&self) -> usize {
        self.choices.len()
    }

    /// The number of `observe` calls recorded so far
    pub fn num_observations(&self) -> usize {
        self.observations.len()
    }

    /// The log-likelihood accumulated so far
    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    /// Seal the recorded run together with the model's return value
    pub fn finish<T>(self, result: T) -> Trace<T> {
        Trace {
            choices: self.choices,
            observations: self.observations,
            log_likelihood: self.log_likelihood,
            result
        }
    }

}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::{Categorical, Distribution, Normal};

    #[test]
    fn addresses_are_positional() {
        let cat = Categorical::new(&[0.5, 0.5]).unwrap();
        let mut rec = TraceRecorder::new();

        for i in 0..4 {
            let label = if i % 2 == 0 { Some(String::from("even")) } else { None };
            let address = rec.record_choice(label, cat.clone().into(), Value::Index(0), cat.log_prob(&0)).clone();
            assert_eq!(address.position, i);
        }

        let trace = rec.finish(());
        assert_eq!(trace.choices().len(), 4);
        assert_eq!(trace.labelled("even").count(), 2);
        assert_eq!(trace.choice(3).unwrap().address.to_string(), "#3");
        assert_eq!(trace.choice(2).unwrap().address.to_string(), "even#2");
        assert!(trace.choice(4).is_none());
        assert!((trace.log_prior() - 4.0 * 0.5f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn likelihood_accumulates() {
        let d = Normal::new(0.0, 1.0).unwrap();
        let mut rec = TraceRecorder::new();
        assert_eq!(rec.log_likelihood(), 0.0);

        rec.record_observation(d.into(), Value::Real(0.0), d.log_prob(&0.0));
        rec.record_observation(d.into(), Value::Real(1.0), d.log_prob(&1.0));
        assert_eq!(rec.num_observations(), 2);

        let trace = rec.finish(7);
        let expected = d.log_prob(&0.0) + d.log_prob(&1.0);
        assert!((trace.log_likelihood() - expected).abs() < 1e-12);
        assert_eq!(trace.observations()[1].position, 1);
        assert_eq!(trace.log_prior(), 0.0);
        assert!((trace.log_joint() - expected).abs() < 1e-12);
        assert_eq!(trace.into_result(), 7);
    }
}
