//! Provides an example of how to use augur to simulate and condition a hidden Markov model.
//!
//! Run with `RUST_LOG=inference=info cargo run --example hmm` to see batch timings.

use augur as a;
use augur::util::one_hot;

use ndarray::prelude as nd;

const TRANSITIONS: [[f64; 3]; 3] = [
    [0.1, 0.5, 0.4],
    [0.2, 0.2, 0.6],
    [0.15, 0.15, 0.7]
];

const EMISSION_MEANS: [f64; 3] = [-1.0, 1.0, 0.0];

/// A hidden Markov chain over three states. The return value holds one one-hot row per step, so
/// the mean of many runs is the per-step state distribution.
fn hmm(ctx: &mut a::Context, steps: &usize) -> a::Result<nd::Array2<f64>> {
    let initial = a::Categorical::new(&[1.0, 1.0, 1.0])?;
    let transitions = TRANSITIONS.iter()
                                 .map(|row| a::Categorical::new(row))
                                 .collect::<a::Result<Vec<_>>>()?;
    let emissions = EMISSION_MEANS.iter()
                                  .map(|&m| a::Normal::new(m, 1.0))
                                  .collect::<a::Result<Vec<_>>>()?;

    let mut states: nd::Array2<f64> = nd::Array2::zeros((steps + 1, 3));
    let mut state = ctx.sample(&initial);
    states.row_mut(0).assign(&one_hot(3, state));

    for t in 0..*steps {
        state = ctx.sample(&transitions[state]);
        ctx.observe_next(&emissions[state])?;
        states.row_mut(t + 1).assign(&one_hot(3, state));
    }

    Ok(states)
}

fn main() -> a::Result<()> {
    env_logger::init();

    /////////////////////////////////////////////////////
    // Step 1: Compile some evidence
    let observation = [0.9, 0.8, 0.7, 0.0, -0.025, -5.0, -2.0, -0.1, 0.0, 0.13, 0.45, 6.0, 0.2, 0.3, -1.0, -1.0];
    let steps = observation.len();

    /////////////////////////////////////////////////////
    // Step 2: Build an inference engine
    let config = a::SamplerConfig::new().with_seed(42);
    let engine = a::ImportanceSamplingEngine::new(&hmm).with_config(config);

    /////////////////////////////////////////////////////
    // Step 3: Simulate the prior
    let prior = engine.run_prior(5000, &steps)?;
    report("prior", &prior)?;

    /////////////////////////////////////////////////////
    // Step 4: Condition on the evidence
    let posterior = engine.run_posterior(5000, &observation, &steps)?;
    report("posterior", &posterior)?;
    println!("effective sample size: {:.1}", posterior.effective_sample_size()?);

    Ok(())
}

fn report(name: &str, dist: &a::Empirical<nd::Array2<f64>>) -> a::Result<()> {
    let marginals = dist.mean()?;

    println!("{} ({} traces in {:?})", name, dist.stats().completed, dist.stats().elapsed);
    for (t, row) in marginals.rows().into_iter().enumerate() {
        println!("  step {:>2}: [{:.3}, {:.3}, {:.3}]", t, row[0], row[1], row[2]);
    }

    Ok(())
}
