//! The continuous uniform distribution on `[low, high)`.

use super::Distribution;
use crate::util::{AugurError, Result};

use rand::distributions::Distribution as RandDistribution;
use rand::Rng;


#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Uniform {
    low: f64,
    high: f64
}

impl Uniform {

    /// Construct a `Uniform` over `[low, high)`.
    ///
    /// # Errors
    /// * `AugurError::DistributionParameter` unless both bounds are finite and `low < high`
    pub fn new(low: f64, high: f64) -> Result<Self> {
        if !(low.is_finite() && high.is_finite() && low < high) {
            return Err(AugurError::DistributionParameter(
                format!("uniform requires finite bounds with low < high, found [{}, {})", low, high)
            ));
        }

        Ok(Uniform { low, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

}

impl Distribution for Uniform {
    type Value = f64;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u: f64 = rng.gen();
        self.low + (self.high - self.low) * u
    }

    fn log_prob(&self, value: &f64) -> f64 {
        if *value >= self.low && *value < self.high {
            -(self.high - self.low).ln()
        } else {
            f64::NEG_INFINITY
        }
    }

}

impl RandDistribution<f64> for Uniform {

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        <Self as Distribution>::sample(self, rng)
    }

}


#[cfg(test)]
mod tests {
    use super::*;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn support() {
        let d = Uniform::new(-1.0, 3.0).unwrap();
        assert!((d.log_prob(&0.0) - (-(4f64).ln())).abs() < 1e-12);
        assert_eq!(d.log_prob(&3.0), f64::NEG_INFINITY);
        assert_eq!(d.log_prob(&-1.5), f64::NEG_INFINITY);

        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            let x = Distribution::sample(&d, &mut rng);
            assert!(x >= -1.0 && x < 3.0);
        }
    }

    #[test]
    fn invalid_bounds() {
        assert!(Uniform::new(1.0, 1.0).is_err());
        assert!(Uniform::new(2.0, 1.0).is_err());
        assert!(Uniform::new(f64::NEG_INFINITY, 1.0).is_err());
    }
}
