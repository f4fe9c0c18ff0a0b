//! Integration tests for the demo suite.
//!
//! Every scenario is run under both composition modes with the default
//! demo settings and must land within the demo's tolerance.

use tessera_demos::scenarios::{self, Composition};
use tessera_sim::{Executor, SimulatorConfig};

/// Test that every scenario passes under both modes.
#[test]
fn test_all_scenarios_pass() {
    let executor = Executor::default();
    for scenario in scenarios::all().unwrap() {
        for mode in [Composition::Combine, Composition::Extend] {
            let report = scenarios::run(&scenario, mode, &executor, 1024, 78).unwrap();
            assert!(
                report.passed(41),
                "{} ({mode}) deviated by {}",
                scenario.name,
                report.max_deviation
            );
        }
    }
}

/// Test that both modes produce the same counts for the same seed.
#[test]
fn test_modes_agree() {
    let executor = Executor::new(SimulatorConfig {
        parallel_shots: true,
        ..SimulatorConfig::default()
    });
    for scenario in scenarios::all().unwrap() {
        let combine = scenarios::run(&scenario, Composition::Combine, &executor, 256, 3).unwrap();
        let extend = scenarios::run(&scenario, Composition::Extend, &executor, 256, 3).unwrap();
        assert_eq!(combine.counts, extend.counts);
        assert_eq!(combine.fidelity, extend.fidelity);
    }
}

/// Test that the deterministic scenario has no deviation at all.
#[test]
fn test_different_registers_exact() {
    let scenario = scenarios::different_registers().unwrap();
    let report = scenarios::run(&scenario, Composition::Extend, &Executor::default(), 100, 0)
        .unwrap();
    assert_eq!(report.max_deviation, 0);
    assert_eq!(report.counts.get("11"), 100);
}
