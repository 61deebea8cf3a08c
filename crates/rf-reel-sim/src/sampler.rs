//! Weighted index sampling over a cumulative threshold table

use crate::error::{SimError, SimResult};
use crate::random::RandomSource;

/// Maps uniform draws onto weighted indices
///
/// Index `i` owns the half-open draw range
/// `[cumulative[i] - weight[i], cumulative[i])`, so a zero weight owns an
/// empty range and is never selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedSampler {
    /// Running partial sums of the weights
    cumulative: Vec<u64>,
}

impl WeightedSampler {
    /// Build the cumulative table for `weights`
    pub fn new(weights: &[u64]) -> SimResult<Self> {
        if weights.is_empty() {
            return Err(SimError::config("weight sequence is empty"));
        }

        let mut cumulative = Vec::with_capacity(weights.len());
        let mut running = 0u64;
        for (index, &weight) in weights.iter().enumerate() {
            running = running.checked_add(weight).ok_or_else(|| {
                SimError::config(format!("weight total overflows at index {index}"))
            })?;
            cumulative.push(running);
        }

        if running == 0 {
            return Err(SimError::config("weight total is zero"));
        }

        Ok(Self { cumulative })
    }

    /// Sum of all weights
    pub fn total_weight(&self) -> u64 {
        // Non-empty by construction
        self.cumulative.last().copied().unwrap_or(0)
    }

    /// Number of weighted entries
    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    /// The cumulative threshold table
    pub fn cumulative(&self) -> &[u64] {
        &self.cumulative
    }

    /// Original weight at `index`
    pub fn weight(&self, index: usize) -> Option<u64> {
        let upper = *self.cumulative.get(index)?;
        let lower = if index == 0 { 0 } else { self.cumulative[index - 1] };
        Some(upper - lower)
    }

    /// Selection probability of `index` (`weight / total`)
    pub fn probability(&self, index: usize) -> f64 {
        self.weight(index)
            .map(|w| w as f64 / self.total_weight() as f64)
            .unwrap_or(0.0)
    }

    /// Smallest index whose threshold strictly exceeds `draw`
    ///
    /// Returns `None` when `draw >= total_weight()`.
    #[inline]
    pub fn index_for(&self, draw: u64) -> Option<usize> {
        let index = self.cumulative.partition_point(|&threshold| threshold <= draw);
        (index < self.cumulative.len()).then_some(index)
    }

    /// Draw a weighted index
    #[inline]
    pub fn sample_index<R: RandomSource + ?Sized>(&self, random: &mut R) -> SimResult<usize> {
        let draw = random.next(self.total_weight())?;
        self.index_for(draw).ok_or_else(|| {
            SimError::argument(format!(
                "draw {draw} outside weight total {}",
                self.total_weight()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ChaChaSource, SequenceSource};

    /// Reference linear scan
    fn linear_index(weights: &[u64], draw: u64) -> Option<usize> {
        let mut running = 0;
        for (i, w) in weights.iter().enumerate() {
            running += w;
            if draw < running {
                return Some(i);
            }
        }
        None
    }

    #[test]
    fn test_cumulative_table() {
        let sampler = WeightedSampler::new(&[1, 2, 3]).unwrap();
        assert_eq!(sampler.cumulative(), &[1, 3, 6]);
        assert_eq!(sampler.total_weight(), 6);
        assert_eq!(sampler.weight(1), Some(2));
        assert_eq!(sampler.weight(3), None);
        assert_eq!(sampler.index_for(4), Some(2));
        assert_eq!(sampler.index_for(6), None);
    }

    #[test]
    fn test_invalid_weights() {
        assert!(WeightedSampler::new(&[]).unwrap_err().is_configuration());
        assert!(WeightedSampler::new(&[0, 0]).unwrap_err().is_configuration());
        assert!(
            WeightedSampler::new(&[u64::MAX, 1])
                .unwrap_err()
                .is_configuration()
        );
    }

    #[test]
    fn test_zero_weight_unreachable() {
        let weights = [0, 3, 0, 0, 2, 0];
        let sampler = WeightedSampler::new(&weights).unwrap();
        for draw in 0..sampler.total_weight() {
            let index = sampler.index_for(draw).unwrap();
            assert!(weights[index] > 0, "draw {draw} hit zero weight {index}");
        }
        assert_eq!(sampler.probability(0), 0.0);
    }

    #[test]
    fn test_matches_linear_scan() {
        let weights = [4, 0, 5, 1, 0, 7, 3];
        let sampler = WeightedSampler::new(&weights).unwrap();
        for draw in 0..=sampler.total_weight() {
            assert_eq!(sampler.index_for(draw), linear_index(&weights, draw));
        }
    }

    #[test]
    fn test_sample_uses_single_draw() {
        let sampler = WeightedSampler::new(&[4, 5]).unwrap();
        let mut source = SequenceSource::new(vec![3, 4, 8]);
        assert_eq!(sampler.sample_index(&mut source).unwrap(), 0);
        assert_eq!(sampler.sample_index(&mut source).unwrap(), 1);
        assert_eq!(sampler.sample_index(&mut source).unwrap(), 1);
        assert_eq!(source.draws(), 3);
    }

    #[test]
    fn test_frequencies_converge() {
        let weights = [1, 0, 3, 6];
        let sampler = WeightedSampler::new(&weights).unwrap();
        let mut source = ChaChaSource::seeded(2024);
        let draws = 200_000;
        let mut hits = [0u64; 4];
        for _ in 0..draws {
            hits[sampler.sample_index(&mut source).unwrap()] += 1;
        }

        assert_eq!(hits[1], 0);
        for (i, &count) in hits.iter().enumerate() {
            let observed = count as f64 / draws as f64;
            approx::assert_abs_diff_eq!(observed, sampler.probability(i), epsilon = 0.01);
        }
    }
}
