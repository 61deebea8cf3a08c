//! # rf-reel-sim — Reel Outcome Simulator
//!
//! Estimates the outcome distribution of a reel-based slot mechanism by
//! running millions of independent trials.
//!
//! ## Features
//!
//! - **Weighted Reel Sets**: One reel set chosen per trial by integer weight
//! - **Circular Windows**: Each reel shows a wrapped window from a random stop
//! - **Configurable Evaluation**: Coordinate sets folded by sum/product/min/max
//! - **Sharded Execution**: Parallel shards with private RNGs and counters
//! - **Reproducible Runs**: Seeded ChaCha streams, one per shard
//!
//! ## Architecture
//!
//! ```text
//! SimulationDriver
//!     │
//!     ├── WeightedSampler  (reel set selection)
//!     ├── ReelSetSpinner   (Reel::extract_window per reel)
//!     ├── OutcomeEvaluator (SpinResult → OutcomeValue)
//!     └── FrequencyCounter (per shard, merged once)
//!           │
//!           v
//!     SimulationReport → FrequencyTable
//! ```

pub mod config;
pub mod counter;
pub mod driver;
pub mod error;
pub mod evaluator;
pub mod random;
pub mod reel;
pub mod sampler;
pub mod spinner;

pub use config::*;
pub use counter::*;
pub use driver::*;
pub use error::*;
pub use evaluator::*;
pub use random::*;
pub use reel::*;
pub use sampler::*;
pub use spinner::*;
