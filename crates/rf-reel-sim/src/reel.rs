//! Reels, reel sets, layouts and circular window extraction

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::random::RandomSource;

/// Symbol identifier
pub type Symbol = u32;

/// A circular reel strip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reel {
    symbols: Vec<Symbol>,
}

impl Reel {
    /// Create a reel; empty strips are rejected
    pub fn new(symbols: Vec<Symbol>) -> SimResult<Self> {
        if symbols.is_empty() {
            return Err(SimError::config("reel has no symbols"));
        }
        Ok(Self { symbols })
    }

    /// Symbols in strip order
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Strip length
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// `size` symbols starting at `start`, wrapping past the strip end
    ///
    /// A `size` larger than the strip repeats symbols.
    pub fn extract_window(&self, size: usize, start: usize) -> SimResult<Vec<Symbol>> {
        let len = self.symbols.len();
        if start >= len {
            return Err(SimError::argument(format!(
                "start position {start} outside reel of length {len}"
            )));
        }

        let mut window = Vec::with_capacity(size);
        let mut position = start;
        for _ in 0..size {
            window.push(self.symbols[position]);
            position += 1;
            if position == len {
                position = 0;
            }
        }
        Ok(window)
    }

    /// Uniform stop position in `[0, len)`
    #[inline]
    pub fn random_start_position<R: RandomSource + ?Sized>(&self, random: &mut R) -> SimResult<usize> {
        let position = random.next(self.symbols.len() as u64)?;
        Ok(position as usize)
    }
}

impl TryFrom<Vec<Symbol>> for Reel {
    type Error = SimError;

    fn try_from(symbols: Vec<Symbol>) -> SimResult<Self> {
        Self::new(symbols)
    }
}

/// One complete set of reels, selected as a unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReelSet {
    reels: Vec<Reel>,
}

impl ReelSet {
    pub fn new(reels: Vec<Reel>) -> SimResult<Self> {
        if reels.is_empty() {
            return Err(SimError::config("reel set has no reels"));
        }
        Ok(Self { reels })
    }

    /// Build from raw strips, validating every reel
    pub fn from_strips(strips: Vec<Vec<Symbol>>) -> SimResult<Self> {
        let reels = strips
            .into_iter()
            .enumerate()
            .map(|(index, strip)| {
                Reel::new(strip).map_err(|_| SimError::config(format!("reel {index} has no symbols")))
            })
            .collect::<SimResult<Vec<_>>>()?;
        Self::new(reels)
    }

    pub fn reels(&self) -> &[Reel] {
        &self.reels
    }

    pub fn reel(&self, index: usize) -> Option<&Reel> {
        self.reels.get(index)
    }

    /// Number of reels
    pub fn len(&self) -> usize {
        self.reels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reels.is_empty()
    }
}

/// Visible window size per reel position
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layout {
    sizes: Vec<usize>,
}

impl Layout {
    pub fn new(sizes: Vec<usize>) -> Self {
        Self { sizes }
    }

    /// Same window size on every reel
    pub fn uniform(reels: usize, rows: usize) -> Self {
        Self {
            sizes: vec![rows; reels],
        }
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Window size of reel `index`
    pub fn window(&self, index: usize) -> Option<usize> {
        self.sizes.get(index).copied()
    }

    /// Number of reel positions
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Does a spin under this layout have a symbol at `(reel, row)`?
    pub fn contains(&self, reel: usize, row: usize) -> bool {
        self.window(reel).is_some_and(|size| row < size)
    }

    /// Fail unless `reel_set` has exactly one reel per layout entry
    pub fn check_reel_set(&self, reel_set: &ReelSet) -> SimResult<()> {
        if reel_set.len() != self.sizes.len() {
            return Err(SimError::config(format!(
                "layout has {} positions but reel set has {} reels",
                self.sizes.len(),
                reel_set.len()
            )));
        }
        Ok(())
    }
}

impl From<Vec<usize>> for Layout {
    fn from(sizes: Vec<usize>) -> Self {
        Self::new(sizes)
    }
}
