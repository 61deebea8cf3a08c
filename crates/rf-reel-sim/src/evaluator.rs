//! Spin evaluation rules
//!
//! An evaluator reduces one [`SpinResult`] to a single [`OutcomeValue`]. The
//! stock rule, [`CoordinateEvaluator`], picks symbols at fixed `(reel, row)`
//! positions and folds them with an [`Aggregator`], which covers diagonals,
//! paylines and arbitrary position sets.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::reel::Layout;
use crate::spinner::SpinResult;

/// Scalar outcome of one trial
pub type OutcomeValue = i64;

/// `(reel, row)` position in a spun grid
pub type Coordinate = (usize, usize);

/// Reduces a spin to an outcome value
pub trait OutcomeEvaluator: Sync {
    fn evaluate(&self, spin: &SpinResult) -> SimResult<OutcomeValue>;

    /// Check that every spin produced under `layout` can be evaluated
    fn validate(&self, layout: &Layout) -> SimResult<()>;
}

/// How selected symbols fold into one value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregator {
    #[default]
    Sum,
    Product,
    Min,
    Max,
}

impl Aggregator {
    fn identity(self) -> Option<OutcomeValue> {
        match self {
            Self::Sum => Some(0),
            Self::Product => Some(1),
            Self::Min | Self::Max => None,
        }
    }

    #[inline]
    fn fold(self, acc: Option<OutcomeValue>, value: OutcomeValue) -> OutcomeValue {
        match (self, acc) {
            (_, None) => value,
            (Self::Sum, Some(a)) => a.saturating_add(value),
            (Self::Product, Some(a)) => a.saturating_mul(value),
            (Self::Min, Some(a)) => a.min(value),
            (Self::Max, Some(a)) => a.max(value),
        }
    }
}

/// Folds the symbols at a fixed ordered coordinate set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateEvaluator {
    pub coordinates: Vec<Coordinate>,
    #[serde(default)]
    pub aggregator: Aggregator,
}

impl CoordinateEvaluator {
    pub fn new(coordinates: Vec<Coordinate>, aggregator: Aggregator) -> Self {
        Self {
            coordinates,
            aggregator,
        }
    }

    /// Sum of the symbols at the given coordinates
    pub fn sum(coordinates: Vec<Coordinate>) -> Self {
        Self::new(coordinates, Aggregator::Sum)
    }

    /// Top-left to bottom-right diagonal over `len` reels, summed
    pub fn diagonal(len: usize) -> Self {
        Self::sum((0..len).map(|i| (i, i)).collect())
    }

    /// Horizontal line across `reels` reels at `row`, summed
    pub fn row(row: usize, reels: usize) -> Self {
        Self::sum((0..reels).map(|reel| (reel, row)).collect())
    }

    pub fn with_aggregator(mut self, aggregator: Aggregator) -> Self {
        self.aggregator = aggregator;
        self
    }
}

impl Default for CoordinateEvaluator {
    fn default() -> Self {
        Self::diagonal(3)
    }
}

impl OutcomeEvaluator for CoordinateEvaluator {
    #[inline]
    fn evaluate(&self, spin: &SpinResult) -> SimResult<OutcomeValue> {
        if self.coordinates.is_empty() {
            return Err(SimError::config("evaluator has no coordinates"));
        }
        let mut acc = self.aggregator.identity();
        for &(reel, row) in &self.coordinates {
            let symbol = spin.symbol_at(reel, row).ok_or_else(|| {
                SimError::config(format!(
                    "coordinate ({reel}, {row}) outside spin of {} reels",
                    spin.reel_count()
                ))
            })?;
            acc = Some(self.aggregator.fold(acc, OutcomeValue::from(symbol)));
        }
        acc.ok_or_else(|| SimError::config("evaluator has no coordinates"))
    }

    fn validate(&self, layout: &Layout) -> SimResult<()> {
        if self.coordinates.is_empty() {
            return Err(SimError::config("evaluator has no coordinates"));
        }
        if let Some(&(reel, row)) = self
            .coordinates
            .iter()
            .find(|&&(reel, row)| !layout.contains(reel, row))
        {
            return Err(SimError::config(format!(
                "coordinate ({reel}, {row}) outside layout {:?}",
                layout.sizes()
            )));
        }
        Ok(())
    }
}
