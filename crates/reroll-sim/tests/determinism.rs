//! Determinism verification tests
//!
//! Simulated runs must produce identical results given the same seed.

use std::cell::RefCell;
use std::rc::Rc;

use reroll_core::sandbox::MemoryStats;
use reroll_core::{LogNotifier, RerollConfig, Services};
use reroll_events::OutcomeKind;
use reroll_sim::{simulate, OfferRoller, ScenarioOptions, SimulationReport, SimulationSettings};

fn run(seed: u64, config: RerollConfig) -> SimulationReport {
    let settings = SimulationSettings {
        scenario: ScenarioOptions {
            seed,
            ..ScenarioOptions::default()
        },
        max_ticks: 100_000,
        ..SimulationSettings::default()
    };
    simulate(&settings, Services::new(config, LogNotifier, MemoryStats::default())).unwrap()
}

/// Test that the same seed produces the same offers
#[test]
fn test_roller_determinism() {
    let mut first = OfferRoller::new(42);
    let mut second = OfferRoller::new(42);

    let offers1: Vec<_> = (0..100).map(|_| first.roll()).collect();
    let offers2: Vec<_> = (0..100).map(|_| second.roll()).collect();

    assert_eq!(offers1, offers2, "Offer sequences should be identical with same seed");
}

/// Test that different seeds produce different offers
#[test]
fn test_roller_different_seeds() {
    let mut first = OfferRoller::new(42);
    let mut second = OfferRoller::new(43);

    let offers1: Vec<_> = (0..20).map(|_| first.roll()).collect();
    let offers2: Vec<_> = (0..20).map(|_| second.roll()).collect();

    assert_ne!(offers1, offers2, "Different seeds should produce different offers");
}

/// Test that a whole run replays identically
#[test]
fn test_simulation_determinism() {
    let config = || {
        let mut config = RerollConfig::default();
        config.general.max_attempts = 5;
        config
    };

    let report1 = run(1234, config());
    let report2 = run(1234, config());

    assert_eq!(report1, report2, "Simulated runs should be identical with same seed");
    assert!(report1.cut_off_in.is_none());
    assert!(report1.outcome.attempts <= 5);
    assert_eq!(report1.break_starts as u32, report1.outcome.attempts);
}

/// Test that a permissive filter ends the run without aborting
#[test]
fn test_simulation_ends_in_match_or_exhaustion() {
    let mut config = RerollConfig::default();
    config.general.max_attempts = 200;
    config.filters.ceilings.books = 64;
    config.filters.target_property = "minecraft:unbreaking".to_string();

    let report = run(7, config);

    match report.outcome.kind {
        OutcomeKind::Success => {
            let offer = report.outcome.matched_offer.as_ref().unwrap();
            assert!(offer.property_level("minecraft:unbreaking").is_some());
        }
        OutcomeKind::Exhausted => assert_eq!(report.outcome.attempts, 200),
        OutcomeKind::Aborted => panic!("unexpected abort: {}", report.outcome.reason),
    }
}

/// Test that statistics are recorded once per simulated run
#[test]
fn test_statistics_recorded_once() {
    let stats = Rc::new(RefCell::new(MemoryStats::default()));
    let mut config = RerollConfig::default();
    config.general.max_attempts = 2;
    config.filters.target_property = "minecraft:not_in_catalog".to_string();

    let settings = SimulationSettings::default();
    let services = Services::new(config, LogNotifier, stats.clone());
    let report = simulate(&settings, services).unwrap();

    assert_eq!(stats.borrow().total(), 1);
    assert_eq!(report.outcome.kind, OutcomeKind::Exhausted);
}

/// Test that running out of ticks still yields one outcome
#[test]
fn test_tick_budget_stops_run() {
    let settings = SimulationSettings {
        max_ticks: 10,
        ..SimulationSettings::default()
    };
    let services = Services::with_config(RerollConfig::default());

    let report = simulate(&settings, services).unwrap();

    assert_eq!(report.ticks, 10);
    assert!(report.cut_off_in.is_some());
    assert_eq!(report.outcome.reason, "stopped by user");
}
