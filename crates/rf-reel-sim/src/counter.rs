//! Outcome frequency accumulation

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::evaluator::OutcomeValue;

/// Counts of outcome values for one shard
///
/// Counts only grow. Shards combine with [`merge`](Self::merge), which is
/// commutative and associative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyCounter {
    counts: HashMap<OutcomeValue, u64>,
    total: u64,
}

impl FrequencyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `value`
    #[inline]
    pub fn record(&mut self, value: OutcomeValue) {
        *self.counts.entry(value).or_insert(0) += 1;
        self.total += 1;
    }

    /// Fold another shard's counts into this one
    pub fn merge(&mut self, other: FrequencyCounter) {
        for (value, count) in other.counts {
            *self.counts.entry(value).or_insert(0) += count;
        }
        self.total += other.total;
    }

    /// Owned form of [`merge`](Self::merge)
    pub fn merged(mut self, other: FrequencyCounter) -> Self {
        self.merge(other);
        self
    }

    /// Count recorded for `value`
    pub fn get(&self, value: OutcomeValue) -> u64 {
        self.counts.get(&value).copied().unwrap_or(0)
    }

    /// Total recorded occurrences
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct values seen
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Ordered copy of the current counts
    pub fn snapshot(&self) -> FrequencyTable {
        FrequencyTable {
            counts: self.counts.iter().map(|(&v, &c)| (v, c)).collect(),
        }
    }
}

/// Outcome value → occurrence count, ascending by value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrequencyTable {
    counts: BTreeMap<OutcomeValue, u64>,
}

impl FrequencyTable {
    pub fn get(&self, value: OutcomeValue) -> u64 {
        self.counts.get(&value).copied().unwrap_or(0)
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// `(value, count)` pairs in ascending value order
    pub fn iter(&self) -> impl Iterator<Item = (OutcomeValue, u64)> + '_ {
        self.counts.iter().map(|(&v, &c)| (v, c))
    }

    /// Fraction of all occurrences taken by `value`
    pub fn share(&self, value: OutcomeValue) -> f64 {
        let total = self.total();
        if total > 0 {
            self.get(value) as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Count-weighted mean outcome value
    pub fn mean(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let weighted: f64 = self.iter().map(|(v, c)| v as f64 * c as f64).sum();
        Some(weighted / total as f64)
    }
}

impl FromIterator<(OutcomeValue, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (OutcomeValue, u64)>>(iter: I) -> Self {
        let mut counts = BTreeMap::new();
        for (value, count) in iter {
            *counts.entry(value).or_insert(0) += count;
        }
        Self { counts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(values: &[OutcomeValue]) -> FrequencyCounter {
        let mut c = FrequencyCounter::new();
        for &v in values {
            c.record(v);
        }
        c
    }

    #[test]
    fn test_record() {
        let c = counter(&[3, 7, 3, 3, -1]);
        assert_eq!(c.get(3), 3);
        assert_eq!(c.get(7), 1);
        assert_eq!(c.get(42), 0);
        assert_eq!(c.total(), 5);
        assert_eq!(c.distinct(), 3);
    }

    #[test]
    fn test_merge_commutative() {
        let a = counter(&[1, 2, 2, 5]);
        let b = counter(&[2, 5, 5, 9]);
        let ab = a.clone().merged(b.clone());
        let ba = b.merged(a);
        assert_eq!(ab.snapshot(), ba.snapshot());
        assert_eq!(ab.get(5), 3);
        assert_eq!(ab.total(), 8);
    }

    #[test]
    fn test_merge_associative() {
        let a = counter(&[1, 1, 4]);
        let b = counter(&[4, 6]);
        let c = counter(&[6, 6, 1, 8]);
        let left = a.clone().merged(b.clone()).merged(c.clone());
        let right = a.merged(b.merged(c));
        assert_eq!(left.snapshot(), right.snapshot());
    }

    #[test]
    fn test_merge_empty_is_identity() {
        let a = counter(&[2, 3, 3]);
        let merged = a.clone().merged(FrequencyCounter::new());
        assert_eq!(merged.snapshot(), a.snapshot());
    }

    #[test]
    fn test_snapshot_ordering_and_stats() {
        let table = counter(&[5, -2, 5, 10]).snapshot();
        let values: Vec<OutcomeValue> = table.iter().map(|(v, _)| v).collect();
        assert_eq!(values, vec![-2, 5, 10]);
        assert_eq!(table.total(), 4);
        approx::assert_relative_eq!(table.share(5), 0.5);
        approx::assert_relative_eq!(table.mean().unwrap(), 4.5);
        assert_eq!(FrequencyTable::default().mean(), None);
    }

    #[test]
    fn test_table_json() {
        let table: FrequencyTable = [(3, 2), (11, 1)].into_iter().collect();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"3":2,"11":1}"#);
        let back: FrequencyTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
