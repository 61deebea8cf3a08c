//! End-to-End Simulation Tests
//!
//! Runs the full trial pipeline through the public API:
//! - Seeded reproducibility
//! - Table totals
//! - Fail-fast configuration
//! - Config file loading

use std::io::Write;

use rf_reel_sim::{
    Aggregator, CoordinateEvaluator, DriverState, SimError, SimulationConfig, SimulationDriver,
    run_simulation,
};

fn reference(trials: u64, seed: u64) -> SimulationConfig {
    SimulationConfig::reference()
        .with_trials(trials)
        .with_seed(seed)
        .with_shards(4)
}

// ═══════════════════════════════════════════════════════════════════════════════
// REPRODUCIBILITY
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_same_seed_same_table() {
    let first = run_simulation(reference(10, 1234)).unwrap();
    let second = run_simulation(reference(10, 1234)).unwrap();
    assert_eq!(first.table, second.table);
    assert_eq!(first.reel_set_hits, second.reel_set_hits);
    assert_eq!(first.table.total(), 10);
}

#[test]
fn test_seeded_default_shards_ignore_pool_size() {
    let mut config = reference(5_000, 77);
    config.shards = None;

    let run_on = |threads: usize| {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap();
        pool.install(|| run_simulation(config.clone())).unwrap()
    };

    let narrow = run_on(1);
    let wide = run_on(4);
    assert_eq!(narrow.table, wide.table);
    assert_eq!(narrow.reel_set_hits, wide.reel_set_hits);
    assert_eq!(narrow.table.total(), 5_000);
}

#[test]
fn test_different_seed_different_table() {
    let first = run_simulation(reference(10_000, 1)).unwrap();
    let second = run_simulation(reference(10_000, 2)).unwrap();
    assert_ne!(first.table, second.table);
}

// ═══════════════════════════════════════════════════════════════════════════════
// DISTRIBUTION
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_totals_match_trial_count() {
    for trials in [0, 1, 7, 333] {
        let report = run_simulation(reference(trials, 5)).unwrap();
        assert_eq!(report.table.total(), trials);
        assert_eq!(report.trials_completed, trials);
        assert_eq!(report.reel_set_hits.iter().sum::<u64>(), trials);
    }
}

#[test]
fn test_reference_outcome_range() {
    let report = run_simulation(reference(50_000, 77)).unwrap();

    // Diagonal of three symbols from 1..=5, plus 9 on the first reel of set 0
    for (value, _) in report.table.iter() {
        assert!((3..=19).contains(&value), "unexpected outcome {value}");
    }
    // Only set 0 can show a 9 at (0, 0)
    assert!(report.table.get(19) > 0);

    approx::assert_abs_diff_eq!(report.reel_set_share(0), 4.0 / 9.0, epsilon = 0.01);
    approx::assert_abs_diff_eq!(report.reel_set_share(1), 5.0 / 9.0, epsilon = 0.01);
}

#[test]
fn test_max_aggregator_run() {
    let config = reference(2_000, 8)
        .with_evaluator(CoordinateEvaluator::row(1, 4).with_aggregator(Aggregator::Max));
    let report = run_simulation(config).unwrap();
    for (value, _) in report.table.iter() {
        assert!((1..=9).contains(&value));
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_zero_weights_fail_fast() {
    let mut config = reference(10, 1);
    config.weights = vec![0, 0];

    let mut driver = SimulationDriver::from_config(config);
    let err = driver.run().unwrap_err();
    assert!(matches!(err, SimError::InvalidConfiguration(_)));
    assert_eq!(driver.state(), DriverState::Configured);
    assert!(driver.report().is_none());
}

#[test]
fn test_load_yaml_file() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(
        file,
        r#"
weights: [1, 3]
reel_sets:
  - [[1, 1], [2, 2], [3, 3]]
  - [[4], [5], [6]]
layout: [1, 1, 1]
evaluator:
  coordinates: [[0, 0], [2, 0]]
  aggregator: sum
trials: 400
seed: 11
shards: 2
"#
    )
    .unwrap();

    let config = SimulationConfig::from_path(file.path()).unwrap();
    let report = run_simulation(config).unwrap();
    assert_eq!(report.table.total(), 400);
    // Set 0 always gives 1 + 3, set 1 always gives 4 + 6
    assert_eq!(report.table.len(), 2);
    assert_eq!(report.table.get(4), report.reel_set_hits[0]);
    assert_eq!(report.table.get(10), report.reel_set_hits[1]);
}

#[test]
fn test_load_json_file() {
    let config = reference(25, 3);
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(config.to_json().unwrap().as_bytes()).unwrap();

    let loaded = SimulationConfig::from_path(file.path()).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_unknown_extension() {
    let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    assert!(matches!(
        SimulationConfig::from_path(file.path()),
        Err(SimError::Parse(_))
    ));
}
