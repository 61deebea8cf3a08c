//! Simulation configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::evaluator::{CoordinateEvaluator, OutcomeEvaluator};
use crate::reel::{Layout, ReelSet, Symbol};
use crate::sampler::WeightedSampler;

/// Shard count for seeded runs that leave `shards` unset
///
/// Seeded results depend on the shard split, so it must not follow the
/// machine's thread count.
pub const DEFAULT_SEEDED_SHARDS: usize = 16;

/// Everything a run needs, as plain data
///
/// `weights[i]` governs how often `reel_sets[i]` is selected. Every reel set
/// must have one reel per `layout` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Selection weight per reel set
    pub weights: Vec<u64>,
    /// Candidate reel sets (set → reel → strip)
    pub reel_sets: Vec<Vec<Vec<Symbol>>>,
    /// Window size per reel position
    pub layout: Layout,
    /// Outcome rule
    #[serde(default)]
    pub evaluator: CoordinateEvaluator,
    /// Number of trials
    pub trials: u64,
    /// Master seed (None = OS entropy)
    #[serde(default)]
    pub seed: Option<u64>,
    /// Worker shard count (None = `DEFAULT_SEEDED_SHARDS` when seeded,
    /// otherwise the rayon thread count)
    #[serde(default)]
    pub shards: Option<usize>,
}

/// Validated reel data ready for spinning
#[derive(Debug, Clone)]
pub struct ReelModel {
    pub sampler: WeightedSampler,
    pub reel_sets: Vec<ReelSet>,
    pub layout: Layout,
}

impl ReelModel {
    /// Validate `weights`, `reel_sets` and `layout` against each other
    pub fn new(weights: &[u64], reel_sets: &[Vec<Vec<Symbol>>], layout: &Layout) -> SimResult<Self> {
        let sampler = WeightedSampler::new(weights)?;

        if weights.len() != reel_sets.len() {
            return Err(SimError::config(format!(
                "{} weights for {} reel sets",
                weights.len(),
                reel_sets.len()
            )));
        }

        let reel_sets = reel_sets
            .iter()
            .enumerate()
            .map(|(index, strips)| {
                let set = ReelSet::from_strips(strips.clone())
                    .map_err(|e| SimError::config(format!("reel set {index}: {e}")))?;
                layout
                    .check_reel_set(&set)
                    .map_err(|e| SimError::config(format!("reel set {index}: {e}")))?;
                Ok(set)
            })
            .collect::<SimResult<Vec<_>>>()?;

        Ok(Self {
            sampler,
            reel_sets,
            layout: layout.clone(),
        })
    }
}

impl SimulationConfig {
    /// Two reel sets weighted 4:5, four five-symbol reels each, 3-row
    /// windows, summed diagonal, ten million trials.
    pub fn reference() -> Self {
        let plain = vec![1, 2, 3, 4, 5];
        let mut first = vec![plain.clone(); 4];
        first[0] = vec![9, 2, 3, 4, 5];
        let second = vec![plain; 4];

        Self {
            weights: vec![4, 5],
            reel_sets: vec![first, second],
            layout: Layout::uniform(4, 3),
            evaluator: CoordinateEvaluator::diagonal(3),
            trials: 10_000_000,
            seed: None,
            shards: None,
        }
    }

    /// Builder: set trial count
    pub fn with_trials(mut self, trials: u64) -> Self {
        self.trials = trials;
        self
    }

    /// Builder: set seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder: set worker shard count
    pub fn with_shards(mut self, shards: usize) -> Self {
        self.shards = Some(shards);
        self
    }

    /// Builder: set outcome rule
    pub fn with_evaluator(mut self, evaluator: CoordinateEvaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Shard count actually used for a run
    pub fn resolved_shards(&self) -> SimResult<usize> {
        match self.shards {
            Some(0) => Err(SimError::config("shard count must be positive")),
            Some(n) => Ok(n),
            None if self.seed.is_some() => Ok(DEFAULT_SEEDED_SHARDS),
            None => Ok(rayon::current_num_threads().max(1)),
        }
    }

    /// Validated reel data
    pub fn model(&self) -> SimResult<ReelModel> {
        ReelModel::new(&self.weights, &self.reel_sets, &self.layout)
    }

    /// Run every fail-fast check, including the configured evaluator
    pub fn validate(&self) -> SimResult<()> {
        self.model()?;
        self.resolved_shards()?;
        self.evaluator.validate(&self.layout)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn from_json_str(json: &str) -> SimResult<Self> {
        serde_json::from_str(json).map_err(|e| SimError::Parse(e.to_string()))
    }

    pub fn from_yaml_str(yaml: &str) -> SimResult<Self> {
        serde_yml::from_str(yaml).map_err(|e| SimError::Parse(e.to_string()))
    }

    /// Load a `.json`, `.yaml` or `.yml` file
    pub fn from_path(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            other => Err(SimError::Parse(format!(
                "unsupported config extension {other:?} for {}",
                path.display()
            ))),
        }
    }

    pub fn to_json(&self) -> SimResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SimError::Parse(e.to_string()))
    }
}
