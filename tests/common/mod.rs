//! Shared fixtures: a three state hidden Markov model and its exact smoothing marginals

#![allow(dead_code)]

use augur::util::one_hot;
use augur::{Categorical, Context, Normal, Result};

use ndarray::prelude as nd;

pub const NUM_STATES: usize = 3;

pub const TRANSITIONS: [[f64; 3]; 3] = [
    [0.1, 0.5, 0.4],
    [0.2, 0.2, 0.6],
    [0.15, 0.15, 0.7]
];

pub const EMISSION_MEANS: [f64; 3] = [-1.0, 1.0, 0.0];

pub const OBSERVATIONS: [f64; 16] = [
    0.9, 0.8, 0.7, 0.0, -0.025, -5.0, -2.0, -0.1, 0.0, 0.13, 0.45, 6.0, 0.2, 0.3, -1.0, -1.0
];

/// The hidden Markov chain: a uniformly drawn initial state, then `steps` transitions each
/// followed by a unit-variance normal observation. Returns the visited states one-hot encoded, one
/// row per step (including the initial state), so the weighted mean is the per-step marginal.
pub fn hmm(ctx: &mut Context, steps: &usize) -> Result<nd::Array2<f64>> {
    let initial = Categorical::new(&[1.0; NUM_STATES])?;
    let transitions = TRANSITIONS.iter()
                                 .map(|row| Categorical::new(row))
                                 .collect::<Result<Vec<_>>>()?;
    let emissions = EMISSION_MEANS.iter()
                                  .map(|&m| Normal::new(m, 1.0))
                                  .collect::<Result<Vec<_>>>()?;

    let mut states: nd::Array2<f64> = nd::Array2::zeros((steps + 1, NUM_STATES));

    let mut state = ctx.sample_labelled("state", &initial);
    states.row_mut(0).assign(&one_hot(NUM_STATES, state));

    for t in 0..*steps {
        state = ctx.sample_labelled("state", &transitions[state]);
        ctx.observe_next(&emissions[state])?;
        states.row_mut(t + 1).assign(&one_hot(NUM_STATES, state));
    }

    Ok(states)
}

fn density(x: f64, mean: f64) -> f64 {
    (-0.5 * (x - mean).powi(2)).exp() / (2.0 * std::f64::consts::PI).sqrt()
}

/// Exact posterior marginals of every state of `hmm` given `obs`, by the forward-backward
/// recursion. Row `t` is `P(state_t | obs)`.
pub fn forward_backward(obs: &[f64]) -> nd::Array2<f64> {
    let n = obs.len();
    let k = NUM_STATES;

    let mut alpha: nd::Array2<f64> = nd::Array2::zeros((n + 1, k));
    alpha.row_mut(0).fill(1.0 / k as f64);
    for t in 0..n {
        for j in 0..k {
            let pred: f64 = (0..k).map(|i| alpha[[t, i]] * TRANSITIONS[i][j]).sum();
            alpha[[t + 1, j]] = pred * density(obs[t], EMISSION_MEANS[j]);
        }
        let s = alpha.row(t + 1).sum();
        alpha.row_mut(t + 1).mapv_inplace(|a| a / s);
    }

    let mut beta: nd::Array2<f64> = nd::Array2::ones((n + 1, k));
    for t in (0..n).rev() {
        for i in 0..k {
            beta[[t, i]] = (0..k).map(|j| TRANSITIONS[i][j] * density(obs[t], EMISSION_MEANS[j]) * beta[[t + 1, j]])
                                 .sum();
        }
        let s = beta.row(t).sum();
        beta.row_mut(t).mapv_inplace(|b| b / s);
    }

    let mut post = alpha * beta;
    for mut row in post.rows_mut() {
        let s = row.sum();
        row.mapv_inplace(|p| p / s);
    }

    post
}

/// Sum over steps of the euclidean distance between two per-step distributions
pub fn summed_l2(a: &nd::Array2<f64>, b: &nd::Array2<f64>) -> f64 {
    (a - b).rows()
           .into_iter()
           .map(|r| r.dot(&r).sqrt())
           .sum()
}
