//! The Normal (Gaussian) distribution.

use super::Distribution;
use crate::util::{AugurError, Result};

use rand::distributions::Distribution as RandDistribution;
use rand::Rng;
use rand_distr::StandardNormal;

use std::f64::consts::PI;


/// A Normal distribution with a location and a strictly positive scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Normal {
    loc: f64,
    scale: f64
}

impl Normal {

    /// Construct a `Normal`.
    ///
    /// # Errors
    /// * `AugurError::DistributionParameter` if `loc` is not finite or `scale` is not a finite,
    ///   strictly positive number
    pub fn new(loc: f64, scale: f64) -> Result<Self> {
        if !loc.is_finite() {
            return Err(AugurError::DistributionParameter(format!("normal location must be finite, found {}", loc)));
        }

        if !(scale.is_finite() && scale > 0.0) {
            return Err(AugurError::DistributionParameter(format!("normal scale must be finite and positive, found {}", scale)));
        }

        Ok(Normal { loc, scale })
    }

    pub fn loc(&self) -> f64 {
        self.loc
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

}

impl Distribution for Normal {
    type Value = f64;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let z: f64 = rng.sample(StandardNormal);
        self.loc + self.scale * z
    }

    fn log_prob(&self, value: &f64) -> f64 {
        let z = (value - self.loc) / self.scale;
        -0.5 * z * z - self.scale.ln() - 0.5 * (2.0 * PI).ln()
    }

}

impl RandDistribution<f64> for Normal {

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        <Self as Distribution>::sample(self, rng)
    }

}
