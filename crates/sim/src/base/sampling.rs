//! Weighted sampling.
//!
//! Every weighted choice in the simulator goes through [`WeightedSampler`]:
//! community selection by coverage, individual selection by length,
//! n-member community filling, and the final-gap choice of the packer.
//!
//! The weights are turned into a running cumulative sum once. Each draw
//! takes a single uniform value in `[0, total)` and returns the first
//! index whose cumulative weight is strictly greater than the draw.

use crate::errors::{Result, SimError};
use rand::Rng;

/// Cumulative-weight table for repeated proportional draws.
#[derive(Debug, Clone)]
pub struct WeightedSampler {
    cumulative: Vec<f64>,
    total: f64,
}

impl WeightedSampler {
    /// Build a sampler from non-negative weights.
    ///
    /// # Errors
    /// `InvalidArgument` if `weights` is empty, contains a negative or
    /// non-finite weight, or sums to zero.
    pub fn new(weights: &[f64]) -> Result<Self> {
        if weights.is_empty() {
            return Err(SimError::InvalidArgument(
                "cannot sample from an empty weight list".into(),
            ));
        }
        if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(SimError::InvalidArgument(format!(
                "weights must be finite and non-negative, got {w}"
            )));
        }

        let cumulative: Vec<f64> = weights
            .iter()
            .scan(0.0, |acc, &w| {
                *acc += w;
                Some(*acc)
            })
            .collect();
        let total = cumulative[cumulative.len() - 1];

        if total <= 0.0 {
            return Err(SimError::InvalidArgument(
                "weights sum to zero".into(),
            ));
        }

        Ok(Self { cumulative, total })
    }

    /// Sum of all weights.
    #[inline]
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Number of weighted slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    /// Draw one index with probability `weight[k] / total`.
    pub fn sample_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let draw = rng.random::<f64>() * self.total;
        let idx = self.cumulative.partition_point(|&c| c <= draw);
        if idx < self.cumulative.len() {
            return idx;
        }

        // Rounding pushed the draw onto the total; fall back to the last
        // slot that actually carries weight.
        let last = self.cumulative.len() - 1;
        (1..=last)
            .rev()
            .find(|&i| self.cumulative[i] > self.cumulative[i - 1])
            .unwrap_or(0)
    }

    /// Draw one item of `items` using this sampler's weights.
    ///
    /// # Errors
    /// `InvalidArgument` if `items` and the weights differ in length.
    pub fn sample<'a, T, R: Rng + ?Sized>(&self, items: &'a [T], rng: &mut R) -> Result<&'a T> {
        if items.len() != self.cumulative.len() {
            return Err(SimError::InvalidArgument(format!(
                "{} items but {} weights",
                items.len(),
                self.cumulative.len()
            )));
        }
        Ok(&items[self.sample_index(rng)])
    }
}

/// Choose one item from `items` proportionally to `weights`.
///
/// Convenience wrapper for one-off draws; build a [`WeightedSampler`]
/// directly when drawing repeatedly from the same weights.
///
/// # Errors
/// `InvalidArgument` if the lists differ in length or the weights are not
/// a valid distribution.
pub fn choose_weighted<'a, T, R: Rng + ?Sized>(
    items: &'a [T],
    weights: &[f64],
    rng: &mut R,
) -> Result<&'a T> {
    if items.len() != weights.len() {
        return Err(SimError::InvalidArgument(format!(
            "{} items but {} weights",
            items.len(),
            weights.len()
        )));
    }
    WeightedSampler::new(weights)?.sample(items, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_frequencies_match_weights() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let items = ['A', 'B', 'C', 'D'];
        let weights = [1.0, 4.0, 3.0, 2.0];
        let sampler = WeightedSampler::new(&weights).unwrap();

        let n = 100_000;
        let mut counts = [0usize; 4];
        for _ in 0..n {
            let item = sampler.sample(&items, &mut rng).unwrap();
            let idx = items.iter().position(|c| c == item).unwrap();
            counts[idx] += 1;
        }

        let expected = [0.1, 0.4, 0.3, 0.2];
        for (count, p) in counts.iter().zip(expected.iter()) {
            let freq = *count as f64 / n as f64;
            assert!((freq - p).abs() < 0.01, "freq {freq} vs expected {p}");
        }
    }

    #[test]
    fn test_unnormalized_weights() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        let sampler = WeightedSampler::new(&[250.0, 750.0]).unwrap();
        assert_eq!(sampler.total(), 1000.0);

        let n = 20_000;
        let ones = (0..n).filter(|_| sampler.sample_index(&mut rng) == 1).count();
        let freq = ones as f64 / n as f64;
        assert!((freq - 0.75).abs() < 0.02);
    }

    #[test]
    fn test_zero_weight_never_chosen() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let sampler = WeightedSampler::new(&[0.0, 1.0, 0.0]).unwrap();
        for _ in 0..1000 {
            assert_eq!(sampler.sample_index(&mut rng), 1);
        }
    }

    #[test]
    fn test_all_zero_weights_rejected() {
        let err = WeightedSampler::new(&[0.0, 0.0]).unwrap_err();
        assert!(matches!(err, SimError::InvalidArgument(_)));
    }

    #[test]
    fn test_empty_and_negative_rejected() {
        assert!(WeightedSampler::new(&[]).is_err());
        assert!(WeightedSampler::new(&[1.0, -0.5]).is_err());
        assert!(WeightedSampler::new(&[1.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let err = choose_weighted(&[1, 2, 3], &[1.0, 1.0], &mut rng).unwrap_err();
        assert!(matches!(err, SimError::InvalidArgument(_)));
    }

    #[test]
    fn test_choose_weighted_generic_items() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let items = vec!["short".to_string(), "long".to_string()];
        let chosen = choose_weighted(&items, &[0.0, 2.0], &mut rng).unwrap();
        assert_eq!(chosen, "long");
    }
}
