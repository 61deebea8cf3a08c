//! Reel set spinning

use serde::{Deserialize, Serialize};

use crate::error::SimResult;
use crate::random::RandomSource;
use crate::reel::{Layout, ReelSet, Symbol};

/// Windowed symbols of one spin (reels × rows)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinResult {
    /// One window per reel, top row first
    pub grid: Vec<Vec<Symbol>>,
}

impl SpinResult {
    pub fn new(grid: Vec<Vec<Symbol>>) -> Self {
        Self { grid }
    }

    /// Number of reels
    pub fn reel_count(&self) -> usize {
        self.grid.len()
    }

    /// Window of reel `reel`
    pub fn window(&self, reel: usize) -> Option<&[Symbol]> {
        self.grid.get(reel).map(Vec::as_slice)
    }

    /// Symbol at `(reel, row)`
    pub fn symbol_at(&self, reel: usize, row: usize) -> Option<Symbol> {
        self.grid.get(reel)?.get(row).copied()
    }
}

/// Spins every reel of a reel set
///
/// Start positions are drawn in reel index order, one draw per reel, so a
/// deterministic source always yields the same grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReelSetSpinner;

impl ReelSetSpinner {
    pub fn new() -> Self {
        Self
    }

    pub fn spin<R: RandomSource + ?Sized>(
        &self,
        reel_set: &ReelSet,
        layout: &Layout,
        random: &mut R,
    ) -> SimResult<SpinResult> {
        layout.check_reel_set(reel_set)?;

        let mut grid = Vec::with_capacity(reel_set.len());
        for (reel, &size) in reel_set.reels().iter().zip(layout.sizes()) {
            let start = reel.random_start_position(random)?;
            grid.push(reel.extract_window(size, start)?);
        }
        Ok(SpinResult::new(grid))
    }
}
