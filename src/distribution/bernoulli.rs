//! The Bernoulli distribution over `{false, true}`.

use super::Distribution;
use crate::util::{AugurError, Result};

use rand::distributions::Distribution as RandDistribution;
use rand::Rng;


#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bernoulli {

    /// Probability of `true`
    p: f64

}

impl Bernoulli {

    /// Construct a `Bernoulli` with success probability `p`.
    ///
    /// # Errors
    /// * `AugurError::DistributionParameter` if `p` is not in `[0, 1]`
    pub fn new(p: f64) -> Result<Self> {
        if !(p >= 0.0 && p <= 1.0) {
            return Err(AugurError::DistributionParameter(format!("bernoulli probability must lie in [0, 1], found {}", p)));
        }

        Ok(Bernoulli { p })
    }

    pub fn p(&self) -> f64 {
        self.p
    }

}

impl Distribution for Bernoulli {
    type Value = bool;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.gen_bool(self.p)
    }

    fn log_prob(&self, value: &bool) -> f64 {
        if *value {
            self.p.ln()
        } else {
            (1.0 - self.p).ln()
        }
    }

}

impl RandDistribution<bool> for Bernoulli {

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        <Self as Distribution>::sample(self, rng)
    }

}
