//! Defines the `WeightedSampler` trait - an object that turns one seeded run of a `Model` into a
//! weighted sample of its return value.

use crate::util::Result;

pub mod forward;
pub mod likelihood;

pub use self::forward::ForwardSampler;
pub use self::likelihood::LikelihoodWeightedSampler;


/// A sample (the model's return value) and the associated importance weight.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightedSample<T> {

    /// The value returned by the model
    pub value: T,

    /// `exp(log_weight)`
    pub weight: f64,

    /// The natural log of the weight, kept for diagnostics since `weight` may underflow
    pub log_weight: f64

}


/// Samplers are stateless between calls: every call with the same seed yields the same sample,
/// which is what lets the engine run them from many threads at once.
pub trait WeightedSampler<T> {

    /// Draw one independent weighted sample.
    ///
    /// # Args
    /// * `index`: the position of this sample in its batch, used for error reporting
    /// * `seed`: the seed of the run's private random source
    fn weighted_sample(&self, index: usize, seed: u64) -> Result<WeightedSample<T>>;

}
