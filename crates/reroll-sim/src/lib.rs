//! Trade reroll simulator.
//!
//! Drives an [`Orchestrator`] against a seeded sandbox world at a fixed tick
//! cadence.

pub mod console;
pub mod logging;
pub mod roller;
pub mod scenario;
pub mod stats;

use reroll_core::{Orchestrator, RunState, Services, StartError, StopReason};
use reroll_core::sandbox::SandboxWorld;
use reroll_events::{RunOutcome, SimTime};
use serde::Serialize;
use thiserror::Error;

pub use console::ConsoleNotifier;
pub use roller::OfferRoller;
pub use scenario::{Scenario, ScenarioOptions};
pub use stats::{RunTotals, StatisticsTracker, StatsError};

/// Why a simulation produced no report.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("run refused: {0}")]
    Start(#[from] StartError),
    #[error("run ended without an outcome")]
    NoOutcome,
}

/// How long to simulate and at which cadence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationSettings {
    pub scenario: ScenarioOptions,
    pub max_ticks: u64,
    pub tick_ms: u64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            scenario: ScenarioOptions::default(),
            max_ticks: 20_000,
            tick_ms: reroll_events::TICK_MS,
        }
    }
}

/// What a simulated run did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub outcome: RunOutcome,
    pub ticks: u64,
    /// State the run was in when the tick budget ran out, if it did.
    pub cut_off_in: Option<RunState>,
    pub break_starts: usize,
    pub placements: u32,
    pub interactions: u32,
}

/// Runs one reroll to completion, or until the tick budget is spent.
pub fn simulate(
    settings: &SimulationSettings,
    services: Services,
) -> Result<SimulationReport, SimError> {
    let Scenario { world, target } = Scenario::build(&settings.scenario);
    let mut orch = Orchestrator::new(world, services);

    let mut now = SimTime::ZERO;
    orch.start(target, now)?;

    let mut ticks = 0;
    while orch.is_running() && ticks < settings.max_ticks {
        now = now.plus_millis(settings.tick_ms);
        orch.world_mut().step(now);
        orch.tick(now);
        ticks += 1;
    }

    let cut_off_in = orch.is_running().then(|| orch.state());
    if let Some(state) = cut_off_in {
        tracing::warn!("Tick budget of {} spent in {}", settings.max_ticks, state);
    }
    let outcome = orch
        .stop(StopReason::UserRequested)
        .or_else(|| orch.take_outcome())
        .ok_or(SimError::NoOutcome)?;

    Ok(report(outcome, ticks, cut_off_in, orch.world()))
}

fn report(
    outcome: RunOutcome,
    ticks: u64,
    cut_off_in: Option<RunState>,
    world: &SandboxWorld,
) -> SimulationReport {
    SimulationReport {
        outcome,
        ticks,
        cut_off_in,
        break_starts: world.break_starts(),
        placements: world.placements(),
        interactions: world.interactions(),
    }
}
