//! Defines the `Distribution` trait - a parametric family that can draw values and evaluate the
//! log-density of a value - along with the tagged `Dist` variant used to record which family a
//! choice was drawn from.

use crate::util::{AugurError, Result};

use rand::Rng;

use std::convert::TryFrom;
use std::fmt;

mod bernoulli;
mod categorical;
mod normal;
mod uniform;

pub use self::bernoulli::Bernoulli;
pub use self::categorical::Categorical;
pub use self::normal::Normal;
pub use self::uniform::Uniform;


/// The capability every family exposes to the `Context`.
pub trait Distribution {

    /// The native type of the values drawn from this family
    type Value;

    /// Draw a value using the given source of randomness
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Value;

    /// The log-density (or log-mass) of `value`. Values outside the support yield
    /// `f64::NEG_INFINITY`.
    fn log_prob(&self, value: &Self::Value) -> f64;

}


/// A value drawn from (or scored against) some `Dist`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {

    /// An outcome index of a `Categorical`
    Index(usize),

    /// A real number, from a continuous family
    Real(f64),

    /// A `Bernoulli` outcome
    Bool(bool)

}

impl Value {

    fn kind(&self) -> &'static str {
        match *self {
            Value::Index(_) => "index",
            Value::Real(_) => "real",
            Value::Bool(_) => "bool",
        }
    }

}

impl fmt::Display for Value {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::Index(i) => write!(f, "{}", i),
            Value::Real(x) => write!(f, "{}", x),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }

}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Index(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl TryFrom<Value> for usize {
    type Error = AugurError;

    fn try_from(v: Value) -> Result<Self> {
        match v {
            Value::Index(i) => Ok(i),
            other => Err(AugurError::ModelExecution(format!("expected an index value, found {} ({})", other.kind(), other)))
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = AugurError;

    fn try_from(v: Value) -> Result<Self> {
        match v {
            Value::Real(x) => Ok(x),
            other => Err(AugurError::ModelExecution(format!("expected a real value, found {} ({})", other.kind(), other)))
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = AugurError;

    fn try_from(v: Value) -> Result<Self> {
        match v {
            Value::Bool(b) => Ok(b),
            other => Err(AugurError::ModelExecution(format!("expected a bool value, found {} ({})", other.kind(), other)))
        }
    }
}


/// A `Dist` is one of the supported families. Each `Choice` in a `Trace` keeps the `Dist` it was
/// drawn from so that the trace can be re-scored or inspected after the run.
#[derive(Clone, Debug, PartialEq)]
pub enum Dist {
    Categorical(Categorical),
    Normal(Normal),
    Uniform(Uniform),
    Bernoulli(Bernoulli)
}

impl Dist {

    /// A short name of the family, used in log output
    pub fn family(&self) -> &'static str {
        match *self {
            Dist::Categorical(_) => "categorical",
            Dist::Normal(_) => "normal",
            Dist::Uniform(_) => "uniform",
            Dist::Bernoulli(_) => "bernoulli",
        }
    }

}

impl Distribution for Dist {
    type Value = Value;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Value {
        match *self {
            Dist::Categorical(ref d) => Value::Index(Distribution::sample(d, rng)),
            Dist::Normal(ref d) => Value::Real(Distribution::sample(d, rng)),
            Dist::Uniform(ref d) => Value::Real(Distribution::sample(d, rng)),
            Dist::Bernoulli(ref d) => Value::Bool(Distribution::sample(d, rng)),
        }
    }

    /// A value of the wrong kind for the family has zero density.
    fn log_prob(&self, value: &Value) -> f64 {
        match (self, *value) {
            (&Dist::Categorical(ref d), Value::Index(i)) => d.log_prob(&i),
            (&Dist::Normal(ref d), Value::Real(x)) => d.log_prob(&x),
            (&Dist::Uniform(ref d), Value::Real(x)) => d.log_prob(&x),
            (&Dist::Bernoulli(ref d), Value::Bool(b)) => d.log_prob(&b),
            _ => f64::NEG_INFINITY
        }
    }

}

impl From<Categorical> for Dist {
    fn from(d: Categorical) -> Self {
        Dist::Categorical(d)
    }
}

impl From<Normal> for Dist {
    fn from(d: Normal) -> Self {
        Dist::Normal(d)
    }
}

impl From<Uniform> for Dist {
    fn from(d: Uniform) -> Self {
        Dist::Uniform(d)
    }
}

impl From<Bernoulli> for Dist {
    fn from(d: Bernoulli) -> Self {
        Dist::Bernoulli(d)
    }
}
