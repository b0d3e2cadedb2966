//! Defines a `Model`, a generative procedure over named inputs whose stochastic choices and
//! observations are routed through an explicit `Context`.

use crate::executor::Context;
use crate::util::Result;


/// The `Model` trait represents a probabilistic program.
///
/// A model is run once per trace. It may call `Context::sample` and `Context::observe` in any
/// order and branch on earlier draws; the only requirement is that all randomness goes through the
/// `Context` so that the run is reproducible from its seed.
///
/// Any closure `Fn(&mut Context, &I) -> Result<O>` is a `Model<I, O>`.
pub trait Model<I: ?Sized, O> {

    /// Execute the model once
    ///
    /// # Args
    /// * `ctx`: the execution context of this run
    /// * `input`: the model's inputs
    ///
    /// # Returns
    /// the model's return value, or the error that aborted the run
    fn run(&self, ctx: &mut Context, input: &I) -> Result<O>;

}

impl<F, I, O> Model<I, O> for F
    where F: Fn(&mut Context, &I) -> Result<O>,
          I: ?Sized
{
    fn run(&self, ctx: &mut Context, input: &I) -> Result<O> {
        self(ctx, input)
    }
}
