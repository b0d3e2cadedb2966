//! `augur` runs generative models written as ordinary Rust functions and approximates the
//! distribution of their return values by importance sampling.
//!
//! A model draws random values with `Context::sample` and conditions on data with
//! `Context::observe`. The `ImportanceSamplingEngine` executes the model many times, each run on
//! its own seeded random source, and collects the weighted results into an `Empirical`
//! distribution.

pub mod distribution;
pub mod empirical;
pub mod executor;
pub mod inference;
pub mod model;
pub mod samplers;
pub mod trace;
pub mod util;

pub use crate::distribution::{Bernoulli, Categorical, Dist, Distribution, Normal, Uniform, Value};
pub use crate::empirical::Empirical;
pub use crate::executor::{Context, Executor};
pub use crate::inference::{CancellationToken, FailurePolicy, ImportanceSamplingEngine, RunStats, SamplerConfig};
pub use crate::model::Model;
pub use crate::trace::{Address, Choice, Observation, Trace};
pub use crate::util::{AugurError, Result};
