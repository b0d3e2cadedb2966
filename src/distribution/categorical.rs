//! A distribution over a finite set of outcomes `0..k`.

use super::Distribution;
use crate::util::{AugurError, Result};

use rand::distributions::Distribution as RandDistribution;
use rand::Rng;


/// A `Categorical` over `k` outcomes. The weights passed to `new` need not sum to one; they are
/// normalized on construction, so `Categorical::new(&[1.0, 1.0, 1.0])` is the uniform distribution
/// over three outcomes.
#[derive(Clone, Debug, PartialEq)]
pub struct Categorical {

    /// The normalized probability of each outcome
    probs: Vec<f64>,

    /// Running sum of `probs`, used to map a single uniform draw onto an outcome
    cumulative: Vec<f64>,

    /// The largest outcome with non-zero probability
    last: usize

}

impl Categorical {

    /// Construct a `Categorical` from (possibly unnormalized) outcome weights.
    ///
    /// # Errors
    /// * `AugurError::DistributionParameter` if `weights` is empty, contains a negative or
    ///   non-finite entry, or sums to zero
    pub fn new(weights: &[f64]) -> Result<Self> {
        if weights.is_empty() {
            return Err(AugurError::DistributionParameter(
                String::from("categorical requires at least one outcome")
            ));
        }

        if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(AugurError::DistributionParameter(
                format!("categorical weights must be finite and non-negative, found {}", w)
            ));
        }

        let z: f64 = weights.iter().sum();
        if z <= 0.0 || !z.is_finite() {
            return Err(AugurError::DistributionParameter(
                format!("categorical weights must have a positive finite sum, found {}", z)
            ));
        }

        let probs: Vec<f64> = weights.iter().map(|w| w / z).collect();
        let cumulative: Vec<f64> = probs.iter()
                                        .scan(0.0, |acc, p| { *acc += p; Some(*acc) })
                                        .collect();
        let last = probs.iter().rposition(|&p| p > 0.0).unwrap_or(0);

        Ok(Categorical { probs, cumulative, last })
    }

    /// The number of outcomes
    pub fn len(&self) -> usize {
        self.probs.len()
    }

    /// The normalized outcome probabilities
    pub fn probs(&self) -> &[f64] {
        &self.probs
    }

}

impl Distribution for Categorical {
    type Value = usize;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let u: f64 = rng.gen();

        // the first outcome whose cumulative probability exceeds u. Rounding may leave the final
        // cumulative value a hair under 1.0, hence the clamp.
        let idx = self.cumulative.partition_point(|&c| c <= u);
        idx.min(self.last)
    }

    fn log_prob(&self, value: &usize) -> f64 {
        match self.probs.get(*value) {
            Some(p) => p.ln(),
            None => f64::NEG_INFINITY
        }
    }

}

impl RandDistribution<usize> for Categorical {

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        <Self as Distribution>::sample(self, rng)
    }

}
