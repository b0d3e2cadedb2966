//! Defines the `Error` type for the augur library, along with small numeric helpers shared by the
//! executor and the inference engine.

use ndarray::prelude as nd;
use thiserror::Error;

use std::result;

pub type Result<T> = result::Result<T, AugurError>;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum AugurError {

    /// The user's model failed, panicked, or made observe calls that do not line up with the
    /// supplied observations
    #[error("model execution failed: {0}")]
    ModelExecution(String),

    /// A distribution was constructed with invalid parameters
    #[error("invalid distribution parameters: {0}")]
    DistributionParameter(String),

    /// Every importance weight in a non-empty batch was exactly zero
    #[error("degenerate inference: all {traces} importance weights are zero")]
    DegenerateInference { traces: usize },

    /// A statistic was requested from an `Empirical` with no samples
    #[error("empirical distribution has no samples")]
    EmptyDistribution,

    /// The batch was cancelled (or timed out) before any trace completed
    #[error("inference cancelled before any trace completed")]
    Cancelled,

    /// A trace accumulated a log-likelihood that does not map to a finite weight
    #[error("trace {index} produced a non-finite importance weight (log weight {log_weight})")]
    NonFiniteWeight { index: usize, log_weight: f64 },

    /// Weights handed to an `Empirical` were negative, non-finite, or did not match the values
    #[error("invalid weights: {0}")]
    InvalidWeight(String),

    /// A general error with the given description
    #[error("{0}")]
    General(String)

}

impl AugurError {

    /// Shorthand for a `ModelExecution` error, for use inside user models
    pub fn model<S: Into<String>>(msg: S) -> Self {
        AugurError::ModelExecution(msg.into())
    }

}


/// Derive the seed of trace `index` from the batch's master seed.
///
/// This is SplitMix64 applied to `master + (index + 1) * gamma`, so every trace gets a well mixed,
/// independent stream no matter which worker runs it or in which order.
pub fn split_seed(master: u64, index: u64) -> u64 {
    const GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

    let mut z = master.wrapping_add(index.wrapping_add(1).wrapping_mul(GAMMA));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}


/// One-hot encoding of `index` in a vector of length `k`. Handy for turning discrete model
/// outputs into something `Empirical::mean` can average.
pub fn one_hot(k: usize, index: usize) -> nd::Array1<f64> {
    let mut v = nd::Array1::zeros(k);
    if index < k {
        v[index] = 1.0;
    }
    v
}
