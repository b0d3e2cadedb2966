//! Defines an `Empirical` distribution: a finite set of weighted samples, queried by weighted
//! statistics and weighted draws rather than by a closed-form density.

use crate::inference::RunStats;
use crate::util::{AugurError, Result};

use indexmap::IndexMap;
use itertools::Itertools;
use rand::Rng;

use std::hash::Hash;
use std::ops::{Add, Mul, Sub};


/// A weighted sample set.
///
/// Weights are stored raw (unnormalized) and normalized lazily by each query.
///
/// # Invariants
/// * every weight is finite and non-negative
/// * `values.len() == weights.len()`
/// * the distribution never changes after construction
#[derive(Clone, Debug)]
pub struct Empirical<T> {

    values: Vec<T>,

    weights: Vec<f64>,

    /// Running sum of `weights`; a draw maps a single uniform through this
    cumulative: Vec<f64>,

    /// The largest index with a non-zero weight
    last: usize,

    /// The sum of all weights
    total: f64,

    /// How the batch that produced these samples went
    stats: RunStats

}


impl<T> Empirical<T> {

    /// Construct an `Empirical` from values and their (unnormalized) weights.
    ///
    /// # Errors
    /// * `AugurError::InvalidWeight` if the lengths differ, a weight is negative or not finite, or
    ///   the weights sum past the largest finite `f64`
    pub fn new(values: Vec<T>, weights: Vec<f64>) -> Result<Self> {
        if values.len() != weights.len() {
            return Err(AugurError::InvalidWeight(
                format!("{} values but {} weights", values.len(), weights.len())
            ));
        }

        if let Some((i, w)) = weights.iter().find_position(|w| !w.is_finite() || **w < 0.0) {
            return Err(AugurError::InvalidWeight(
                format!("weight {} is {}, weights must be finite and non-negative", i, w)
            ));
        }

        let cumulative: Vec<f64> = weights.iter()
                                          .scan(0.0, |acc, w| { *acc += w; Some(*acc) })
                                          .collect();
        let total = cumulative.last().cloned().unwrap_or(0.0);
        if !total.is_finite() {
            return Err(AugurError::InvalidWeight(
                format!("weights sum to {}, the total weight must be finite", total)
            ));
        }
        let last = weights.iter().rposition(|&w| w > 0.0).unwrap_or(0);

        Ok(Empirical { values, weights, cumulative, last, total, stats: RunStats::default() })
    }

    /// Construct an `Empirical` in which every value has weight one
    pub fn unweighted(values: Vec<T>) -> Self {
        let n = values.len();
        let cumulative: Vec<f64> = (1..=n).map(|i| i as f64).collect();

        Empirical {
            values,
            weights: vec![1.0; n],
            cumulative,
            last: n.saturating_sub(1),
            total: n as f64,
            stats: RunStats::default()
        }
    }

    pub(crate) fn with_stats(mut self, stats: RunStats) -> Self {
        self.stats = stats;
        self
    }

    /// The number of samples
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// The raw, unnormalized weights
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn total_weight(&self) -> f64 {
        self.total
    }

    /// Statistics of the inference batch that produced this distribution. Default for
    /// distributions built by hand.
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Iterate over `(value, raw weight)` pairs in sample order
    pub fn iter(&self) -> impl Iterator<Item = (&T, f64)> {
        self.values.iter().zip_eq(self.weights.iter().cloned())
    }

    /// Fails unless there is at least one sample and some weight to normalize by
    fn check(&self) -> Result<()> {
        if self.values.is_empty() {
            Err(AugurError::EmptyDistribution)
        } else if self.total <= 0.0 {
            Err(AugurError::DegenerateInference { traces: self.values.len() })
        } else {
            Ok(())
        }
    }

    /// The weights scaled to sum to one
    pub fn normalized_weights(&self) -> Result<Vec<f64>> {
        self.check()?;
        Ok(self.weights.iter().map(|w| w / self.total).collect())
    }

    /// Kish's effective sample size `(Σ w)² / Σ w²`. Equal to `len()` for an unweighted set.
    pub fn effective_sample_size(&self) -> Result<f64> {
        self.check()?;
        let sq: f64 = self.weights.iter().map(|w| (w / self.total) * (w / self.total)).sum();
        Ok(1.0 / sq)
    }

    /// Draw one value, with probability proportional to its weight.
    ///
    /// A single uniform draw on `[0, total)` is mapped through the cumulative weights, so the
    /// result is repeatable given a seeded `rng`. Zero-weight samples are never returned.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&T> {
        self.check()?;

        let u = rng.gen::<f64>() * self.total;
        let idx = self.cumulative.partition_point(|&c| c <= u).min(self.last);

        Ok(&self.values[idx])
    }

    /// The weighted mean of `f(value)`
    pub fn expectation<F>(&self, f: F) -> Result<f64>
        where F: Fn(&T) -> f64
    {
        self.check()?;

        Ok(self.iter()
               .filter(|&(_, w)| w > 0.0)
               .map(|(v, w)| f(v) * (w / self.total))
               .sum())
    }

    /// The distribution of `f(value)`: same weights, transformed values
    pub fn map<U, F>(&self, f: F) -> Empirical<U>
        where F: FnMut(&T) -> U
    {
        Empirical {
            values: self.values.iter().map(f).collect(),
            weights: self.weights.clone(),
            cumulative: self.cumulative.clone(),
            last: self.last,
            total: self.total,
            stats: self.stats.clone()
        }
    }

}


impl<T: Clone> Empirical<T> {

    /// Draw `n` values with replacement, as an unweighted `Empirical`
    pub fn resample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<Empirical<T>> {
        let mut values = Vec::with_capacity(n);
        for _ in 0..n {
            values.push(self.sample(rng)?.clone());
        }

        Ok(Empirical::unweighted(values))
    }

    /// Concatenate several distributions, e.g. the results of independent batches. Weights are
    /// kept as they are, so batches run in the same mode combine into one valid sample set.
    pub fn combine(parts: &[Empirical<T>]) -> Result<Empirical<T>> {
        let mut values = Vec::new();
        let mut weights = Vec::new();
        let mut stats = RunStats::default();

        for part in parts {
            values.extend(part.values.iter().cloned());
            weights.extend(part.weights.iter().cloned());
            stats.merge(&part.stats);
        }

        Ok(Empirical::new(values, weights)?.with_stats(stats))
    }

    /// The weighted mean. For array values this is computed elementwise.
    ///
    /// # Errors
    /// * `AugurError::EmptyDistribution` if there are no samples
    /// * `AugurError::DegenerateInference` if every weight is zero
    pub fn mean(&self) -> Result<T>
        where T: Add<Output = T> + Mul<f64, Output = T>
    {
        self.check()?;

        let mut acc: Option<T> = None;
        for (v, w) in self.iter().filter(|&(_, w)| w > 0.0) {
            let term = v.clone() * (w / self.total);
            acc = Some(match acc {
                Some(a) => a + term,
                None => term
            });
        }

        acc.ok_or(AugurError::DegenerateInference { traces: self.values.len() })
    }

    /// The weighted variance `Σ w (x - mean)² / Σ w`, elementwise for array values.
    pub fn variance(&self) -> Result<T>
        where T: Add<Output = T> + Sub<Output = T> + Mul<f64, Output = T> + Mul<T, Output = T>
    {
        let mean = self.mean()?;

        let mut acc: Option<T> = None;
        for (v, w) in self.iter().filter(|&(_, w)| w > 0.0) {
            let d = v.clone() - mean.clone();
            let term = (d.clone() * d) * (w / self.total);
            acc = Some(match acc {
                Some(a) => a + term,
                None => term
            });
        }

        acc.ok_or(AugurError::DegenerateInference { traces: self.values.len() })
    }

}


impl<T: Clone + Eq + Hash> Empirical<T> {

    /// The normalized weight of every distinct value, in order of first appearance
    pub fn frequencies(&self) -> Result<IndexMap<T, f64>> {
        self.check()?;

        let mut freq: IndexMap<T, f64> = IndexMap::new();
        for (v, w) in self.iter() {
            *freq.entry(v.clone()).or_insert(0.0) += w / self.total;
        }

        Ok(freq)
    }

    /// The value carrying the most weight. Ties go to the value that appeared first.
    pub fn mode(&self) -> Result<T> {
        let freq = self.frequencies()?;

        let best = freq.into_iter().fold(None, |best: Option<(T, f64)>, (v, p)| {
            match best {
                Some((b, bp)) if bp >= p => Some((b, bp)),
                _ => Some((v, p))
            }
        });

        best.map(|(v, _)| v).ok_or(AugurError::EmptyDistribution)
    }

}


#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::prelude as nd;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn weighted_mean() {
        let e = Empirical::new(vec![1.0, 2.0, 4.0], vec![1.0, 1.0, 2.0]).unwrap();
        assert!((e.mean().unwrap() - 2.75).abs() < 1e-12);
        assert_eq!(e.total_weight(), 4.0);

        // variance: (1.75^2 + 0.75^2 + 2 * 1.25^2) / 4
        let expected = (3.0625 + 0.5625 + 2.0 * 1.5625) / 4.0;
        assert!((e.variance().unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn elementwise_mean() {
        let values = vec![
            nd::arr1(&[1.0, 0.0, 0.0]),
            nd::arr1(&[0.0, 1.0, 0.0]),
            nd::arr1(&[0.0, 1.0, 0.0])
        ];
        let e = Empirical::new(values, vec![2.0, 1.0, 1.0]).unwrap();

        let m = e.mean().unwrap();
        assert!((m[0] - 0.5).abs() < 1e-12);
        assert!((m[1] - 0.5).abs() < 1e-12);
        assert_eq!(m[2], 0.0);

        let v = e.variance().unwrap();
        assert!((v[0] - 0.25).abs() < 1e-12);
        assert_eq!(v[2], 0.0);
    }

    #[test]
    fn empty_distribution() {
        let e: Empirical<f64> = Empirical::new(vec![], vec![]).unwrap();
        assert!(e.is_empty());
        assert_eq!(e.mean(), Err(AugurError::EmptyDistribution));
        assert_eq!(e.variance(), Err(AugurError::EmptyDistribution));

        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(e.sample(&mut rng), Err(AugurError::EmptyDistribution));
        assert!(e.effective_sample_size().is_err());

        let e: Empirical<u32> = Empirical::new(vec![], vec![]).unwrap();
        assert_eq!(e.frequencies(), Err(AugurError::EmptyDistribution));
        assert_eq!(e.mode(), Err(AugurError::EmptyDistribution));
    }

    #[test]
    fn degenerate_distribution() {
        let e = Empirical::new(vec![1.0, 2.0], vec![0.0, 0.0]).unwrap();
        assert_eq!(e.mean(), Err(AugurError::DegenerateInference { traces: 2 }));

        let mut rng = StdRng::seed_from_u64(0);
        assert!(e.sample(&mut rng).is_err());
    }

    #[test]
    fn invalid_weights() {
        assert!(Empirical::new(vec![1.0], vec![]).is_err());
        assert!(Empirical::new(vec![1.0], vec![-1.0]).is_err());
        assert!(Empirical::new(vec![1.0], vec![f64::NAN]).is_err());
        assert!(Empirical::new(vec![1.0], vec![f64::INFINITY]).is_err());
    }

    #[test]
    fn overflowing_total_weight() {
        match Empirical::new(vec![1.0, 3.0], vec![1e308, 1e308]) {
            Err(AugurError::InvalidWeight(_)) => (),
            other => panic!("unexpected result {:?}", other.map(|e| e.total_weight()))
        }

        let half = Empirical::new(vec![1.0], vec![1e308]).unwrap();
        assert!(Empirical::combine(&[half.clone(), half]).is_err());
    }

    #[test]
    fn single_entry_always_drawn() {
        let e = Empirical::new(vec![42], vec![0.3]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..1000 {
            assert_eq!(*e.sample(&mut rng).unwrap(), 42);
        }
    }

    #[test]
    fn zero_weight_entries_never_drawn() {
        let e = Empirical::new(vec![0, 1, 2, 3], vec![0.0, 1.0, 0.0, 3.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        let mut counts = [0usize; 4];
        for _ in 0..10_000 {
            counts[*e.sample(&mut rng).unwrap()] += 1;
        }

        assert_eq!(counts[0], 0);
        assert_eq!(counts[2], 0);
        assert!((counts[3] as f64 / 10_000.0 - 0.75).abs() < 0.03);
    }

    #[test]
    fn sampling_is_repeatable() {
        let e = Empirical::new(vec![1, 2, 3], vec![1.0, 2.0, 3.0]).unwrap();

        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..20).map(|_| *e.sample(&mut rng).unwrap()).collect::<Vec<_>>()
        };

        assert_eq!(draw(5), draw(5));
    }

    #[test]
    fn effective_sample_size() {
        let e = Empirical::unweighted(vec![1.0, 2.0, 3.0, 4.0]);
        assert!((e.effective_sample_size().unwrap() - 4.0).abs() < 1e-12);

        let e = Empirical::new(vec![1.0, 2.0, 3.0, 4.0], vec![1.0, 0.0, 0.0, 0.0]).unwrap();
        assert!((e.effective_sample_size().unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn frequencies_and_mode() {
        let e = Empirical::new(vec!['a', 'b', 'a', 'c'], vec![1.0, 3.0, 1.0, 1.0]).unwrap();

        let freq = e.frequencies().unwrap();
        assert_eq!(freq.keys().cloned().collect::<Vec<_>>(), vec!['a', 'b', 'c']);
        assert!((freq[&'a'] - 2.0 / 6.0).abs() < 1e-12);
        assert!((freq[&'b'] - 0.5).abs() < 1e-12);
        assert_eq!(e.mode().unwrap(), 'b');

        // ties resolve to the first value seen
        let e = Empirical::unweighted(vec![3, 1, 1, 3]);
        assert_eq!(e.mode().unwrap(), 3);
    }

    #[test]
    fn map_keeps_weights() {
        let e = Empirical::new(vec![1.0, 2.0], vec![3.0, 1.0]).unwrap();
        let squared = e.map(|x| x * x);

        assert_eq!(squared.weights(), e.weights());
        assert!((squared.mean().unwrap() - 1.75).abs() < 1e-12);
        assert!((e.expectation(|x| x * x).unwrap() - 1.75).abs() < 1e-12);
    }

    #[test]
    fn resample_and_combine() {
        let e = Empirical::new(vec![0, 1], vec![0.0, 1.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let r = e.resample(50, &mut rng).unwrap();
        assert_eq!(r.len(), 50);
        assert!(r.values().iter().all(|&v| v == 1));

        let c = Empirical::combine(&[e.clone(), r]).unwrap();
        assert_eq!(c.len(), 52);
        assert_eq!(c.total_weight(), 51.0);
    }
}
