//! Simulation driver — sharded parallel trial execution
//!
//! A driver moves through `Configured → Running → Completed` exactly once.
//! Each shard owns its random source and frequency counter; shard counters
//! are merged after every shard has finished.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{ReelModel, SimulationConfig};
use crate::counter::{FrequencyCounter, FrequencyTable};
use crate::error::{SimError, SimResult};
use crate::evaluator::{CoordinateEvaluator, OutcomeEvaluator};
use crate::random::{RandomSource, SeededSourceFactory, SourceFactory};
use crate::spinner::ReelSetSpinner;

/// Driver lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriverState {
    Configured,
    Running,
    Completed,
}

/// Cooperative cancellation flag, checked between trials
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check if cancelled
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Final output of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Outcome value → count; sums to `trials_completed`
    pub table: FrequencyTable,
    pub trials_requested: u64,
    pub trials_completed: u64,
    pub shards: usize,
    pub seed: Option<u64>,
    /// Stopped early by a cancellation request
    pub cancelled: bool,
    pub elapsed_ms: u64,
    /// Selections per reel set, index-aligned with the weights
    pub reel_set_hits: Vec<u64>,
}

impl SimulationReport {
    /// Observed selection share of reel set `index`
    pub fn reel_set_share(&self, index: usize) -> f64 {
        match (self.reel_set_hits.get(index), self.trials_completed) {
            (Some(&hits), total) if total > 0 => hits as f64 / total as f64,
            _ => 0.0,
        }
    }
}

/// One shard's partial results
struct ShardOutcome {
    counter: FrequencyCounter,
    reel_set_hits: Vec<u64>,
    trials: u64,
    cancelled: bool,
}

/// Runs the configured number of trials and tabulates outcomes
pub struct SimulationDriver<E = CoordinateEvaluator, F = SeededSourceFactory> {
    config: SimulationConfig,
    evaluator: E,
    factory: F,
    state: DriverState,
    report: Option<SimulationReport>,
}

impl SimulationDriver {
    /// Driver using the config's own evaluator rule and seed
    pub fn from_config(config: SimulationConfig) -> Self {
        let evaluator = config.evaluator.clone();
        let factory = SeededSourceFactory::new(config.seed);
        Self::new(config, evaluator, factory)
    }
}

impl<E: OutcomeEvaluator, F: SourceFactory> SimulationDriver<E, F> {
    pub fn new(config: SimulationConfig, evaluator: E, factory: F) -> Self {
        Self {
            config,
            evaluator,
            factory,
            state: DriverState::Configured,
            report: None,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Report of a completed run
    pub fn report(&self) -> Option<&SimulationReport> {
        self.report.as_ref()
    }

    /// Frequency table of a completed run
    pub fn table(&self) -> Option<&FrequencyTable> {
        self.report.as_ref().map(|r| &r.table)
    }

    pub fn into_report(self) -> Option<SimulationReport> {
        self.report
    }

    /// Run to completion
    pub fn run(&mut self) -> SimResult<&SimulationReport> {
        self.run_with_cancel(&CancellationToken::new())
    }

    /// Run until finished or until `cancel` is set
    ///
    /// Configuration is validated before any trial executes.
    pub fn run_with_cancel(&mut self, cancel: &CancellationToken) -> SimResult<&SimulationReport> {
        if self.state != DriverState::Configured {
            return Err(SimError::argument(format!(
                "driver is {:?}; a new driver is required for another run",
                self.state
            )));
        }

        let model = self.config.model()?;
        let shards = self.config.resolved_shards()?;
        self.evaluator.validate(&model.layout)?;

        self.state = DriverState::Running;
        let trials = self.config.trials;
        let start = Instant::now();
        log::info!(
            "Starting simulation: {} trials, {} reel sets, {} shards",
            trials,
            model.reel_sets.len(),
            shards
        );

        let base = trials / shards as u64;
        let extra = trials % shards as u64;
        let evaluator = &self.evaluator;
        let factory = &self.factory;
        let model = &model;

        let outcomes = (0..shards as u64)
            .into_par_iter()
            .map(|shard| {
                let shard_trials = base + u64::from(shard < extra);
                let mut source = factory.source_for_shard(shard);
                let outcome = run_shard(model, evaluator, &mut source, shard_trials, cancel)?;
                log::debug!("Shard {} finished {} trials", shard, outcome.trials);
                Ok(outcome)
            })
            .collect::<SimResult<Vec<ShardOutcome>>>();

        let outcomes = match outcomes {
            Ok(outcomes) => outcomes,
            Err(e) => {
                // Partial shard results are discarded
                self.state = DriverState::Configured;
                return Err(e);
            }
        };

        let mut counter = FrequencyCounter::new();
        let mut reel_set_hits = vec![0u64; model.reel_sets.len()];
        let mut trials_completed = 0;
        let mut cancelled = false;
        for outcome in outcomes {
            counter.merge(outcome.counter);
            for (total, hits) in reel_set_hits.iter_mut().zip(outcome.reel_set_hits) {
                *total += hits;
            }
            trials_completed += outcome.trials;
            cancelled |= outcome.cancelled;
        }

        let elapsed = start.elapsed();
        if cancelled {
            log::warn!(
                "Simulation cancelled after {} of {} trials",
                trials_completed,
                trials
            );
        }
        log::info!(
            "Simulation finished: {} trials, {} distinct outcomes in {:.2?}",
            trials_completed,
            counter.distinct(),
            elapsed
        );

        self.state = DriverState::Completed;
        Ok(&*self.report.insert(SimulationReport {
            table: counter.snapshot(),
            trials_requested: trials,
            trials_completed,
            shards,
            seed: self.config.seed,
            cancelled,
            elapsed_ms: elapsed.as_millis() as u64,
            reel_set_hits,
        }))
    }
}

/// Run `trials` trials on one shard's private source and counter
fn run_shard<E, R>(
    model: &ReelModel,
    evaluator: &E,
    source: &mut R,
    trials: u64,
    cancel: &CancellationToken,
) -> SimResult<ShardOutcome>
where
    E: OutcomeEvaluator + ?Sized,
    R: RandomSource + ?Sized,
{
    let spinner = ReelSetSpinner::new();
    let mut counter = FrequencyCounter::new();
    let mut reel_set_hits = vec![0u64; model.reel_sets.len()];
    let mut completed = 0;
    let mut cancelled = false;

    for _ in 0..trials {
        if cancel.is_cancelled() {
            cancelled = true;
            break;
        }

        let index = model.sampler.sample_index(source)?;
        let spin = spinner.spin(&model.reel_sets[index], &model.layout, source)?;
        counter.record(evaluator.evaluate(&spin)?);
        reel_set_hits[index] += 1;
        completed += 1;
    }

    Ok(ShardOutcome {
        counter,
        reel_set_hits,
        trials: completed,
        cancelled,
    })
}

/// Validate `config` and run it with its own evaluator and seed
pub fn run_simulation(config: SimulationConfig) -> SimResult<SimulationReport> {
    let mut driver = SimulationDriver::from_config(config);
    driver.run()?;
    driver
        .into_report()
        .ok_or_else(|| SimError::argument("simulation produced no report"))
}
