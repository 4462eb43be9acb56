//! The run state machine.
//!
//! An [`Orchestrator`] owns one run at a time. The host calls
//! [`Orchestrator::tick`] on a fixed cadence; each tick inspects the time spent
//! in the active state, optionally issues one action through the
//! [`ActionExecutor`], and transitions. Every terminal path goes through
//! [`Orchestrator::stop`], which emits exactly one [`RunOutcome`].

mod phases;
pub mod state;

use reroll_events::{OutcomeKind, RunOutcome, SimTime, TargetId};

use crate::config::OperationMode;
use crate::error::{RunError, StartError};
use crate::executor::ActionExecutor;
use crate::ports::World;
use crate::services::{Notification, Services};
use crate::trade::TradeEvaluator;

pub use state::{JobSite, RunState, RunStatus, StopReason};

use state::{Phase, Run};

/// What a state handler decided for this tick.
pub(crate) enum Step {
    Stay,
    Go(Phase),
    Stop(StopReason),
}

/// Drives one reroll run against an injected world.
pub struct Orchestrator<W: World> {
    executor: ActionExecutor<W>,
    services: Services,
    run: Option<Run>,
    clock: SimTime,
    last_outcome: Option<RunOutcome>,
}

impl<W: World> Orchestrator<W> {
    pub fn new(world: W, services: Services) -> Self {
        Self {
            executor: ActionExecutor::new(world),
            services,
            run: None,
            clock: SimTime::ZERO,
            last_outcome: None,
        }
    }

    pub fn world(&self) -> &W {
        self.executor.world()
    }

    pub fn world_mut(&mut self) -> &mut W {
        self.executor.world_mut()
    }

    pub fn executor(&self) -> &ActionExecutor<W> {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut ActionExecutor<W> {
        &mut self.executor
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    pub fn state(&self) -> RunState {
        self.run.as_ref().map_or(RunState::Idle, Run::state)
    }

    /// Attempts of the active run, zero when idle.
    pub fn attempts(&self) -> u32 {
        self.run.as_ref().map_or(0, |run| run.attempts)
    }

    pub fn last_outcome(&self) -> Option<&RunOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn take_outcome(&mut self) -> Option<RunOutcome> {
        self.last_outcome.take()
    }

    pub fn status(&self) -> Option<RunStatus> {
        self.run.as_ref().map(|run| RunStatus {
            target: run.target,
            state: run.state(),
            attempts: run.attempts,
            max_attempts: run.config.general.max_attempts,
            job_site: run.job_site.map(|site| site.pos),
            time_in_state_ms: run.elapsed(self.clock),
            matched: run.matched.is_some(),
        })
    }

    /// Begins a run against `target`.
    ///
    /// Reads the configuration once and freezes it for the run. A workstation
    /// already standing near the target becomes the job site and the run starts
    /// by verifying the target's claim; otherwise one is placed first.
    pub fn start(&mut self, target: TargetId, now: SimTime) -> Result<(), StartError> {
        self.clock = now;
        if self.run.is_some() {
            tracing::warn!("Reroll already in progress");
            return Err(StartError::AlreadyRunning);
        }

        let config = self.services.config.load();
        let sound = config.general.sound_notifications;
        if !config.general.enabled {
            self.services.notifier.notify(
                Notification::warning("Reroller is disabled! Enable it in the config.")
                    .with_sound_enabled(sound),
            );
            return Err(StartError::Disabled);
        }
        if config.general.mode == OperationMode::Manual {
            self.services.notifier.notify(Notification::info(
                "Manual mode - use highlights to identify good offers",
            ));
            return Err(StartError::ManualMode);
        }

        let world = self.executor.world();
        if !world.is_ready() {
            return Err(StartError::ContextUnavailable("client not ready".to_string()));
        }
        let snapshot = world
            .target(target)
            .filter(|snapshot| snapshot.alive)
            .ok_or_else(|| StartError::TargetMissing(target.to_string()))?;

        self.executor.reset_for_run();

        let reach = &config.reach;
        let existing = self.executor.find_job_site_near(
            snapshot.block_pos(),
            reach.job_site_search,
            reach.job_site_search_height,
        );
        let existing = existing.and_then(|pos| {
            self.executor
                .world()
                .block_at(pos)
                .workstation()
                .map(|kind| JobSite { pos, kind })
        });

        let phase = match existing {
            Some(site) => {
                tracing::info!(
                    "Found existing job site {} at {}, verifying the claim first",
                    site.kind,
                    site.pos
                );
                self.executor.remember(site.pos, site.kind);
                Phase::WaitingForTarget
            }
            None => {
                tracing::info!("No job site found, will place one");
                Phase::initial_placement(&config, now)
            }
        };

        tracing::info!("=== Starting reroll for target {} ===", target);
        self.services
            .notifier
            .notify(Notification::info("Starting trade reroll..."));

        let criteria = config.criteria();
        let evaluator = TradeEvaluator::new(&config.filters);
        let run = Run {
            target,
            job_site: existing,
            attempts: 0,
            last_attempt_at: now,
            claim_losses: 0,
            empty_views: 0,
            view_reopens: 0,
            matched: None,
            config,
            criteria,
            evaluator,
            phase,
            entered_at: now,
            action_started: false,
        };
        tracing::info!(">>> STATE TRANSITION: {} -> {}", RunState::Idle, run.state());
        self.run = Some(run);
        Ok(())
    }

    /// Ends the active run. Returns the outcome, or `None` when idle.
    pub fn stop(&mut self, reason: StopReason) -> Option<RunOutcome> {
        let mut run = self.run.take()?;

        self.executor.cancel_break();
        self.executor.halt_movement();

        let success = reason == StopReason::Matched;
        let keep_view = success && run.config.general.reveal_view_only_on_match;
        if !keep_view && self.executor.world().open_view() == Some(run.target) {
            self.executor.close_view();
        }

        let kind = reason.outcome_kind();
        let reason_text = match &reason {
            StopReason::MaxAttemptsReached => format!("max attempts reached ({})", run.attempts),
            StopReason::Matched => match &run.matched {
                Some(offer) => format!("matching offer found: {}", offer),
                None => reason.to_string(),
            },
            other => other.to_string(),
        };

        let sound = run.config.general.sound_notifications;
        let notification = match kind {
            OutcomeKind::Success => Notification::success(format!(
                "Found matching trade! Attempts: {}",
                run.attempts
            )),
            OutcomeKind::Exhausted => Notification::warning(format!(
                "Max attempts reached ({})",
                run.attempts
            )),
            OutcomeKind::Aborted => match reason {
                StopReason::UserRequested | StopReason::SemiAutoHandoff => Notification::info(
                    format!("Reroll stopped ({}). Attempts: {}", reason_text, run.attempts),
                ),
                _ => Notification::error(format!(
                    "Reroll stopped: {}. Attempts: {}",
                    reason_text, run.attempts
                )),
            },
        };
        self.services
            .notifier
            .notify(notification.with_sound_enabled(sound));

        if kind == OutcomeKind::Success {
            self.services.stats.record_success(run.attempts);
        } else {
            self.services.stats.record_failure(run.attempts);
        }

        match kind {
            OutcomeKind::Success => tracing::info!(
                "Run for {} succeeded after {} attempts",
                run.target,
                run.attempts
            ),
            _ => tracing::warn!(
                "Run for {} ended in {} after {} attempts: {}",
                run.target,
                kind,
                run.attempts,
                reason_text
            ),
        }
        tracing::info!(">>> STATE TRANSITION: {} -> {}", run.state(), RunState::Idle);

        let outcome = RunOutcome {
            target: run.target,
            kind,
            attempts: run.attempts,
            reason: reason_text,
            matched_offer: run.matched.take(),
            ended_at: self.clock,
        };
        self.last_outcome = Some(outcome.clone());
        Some(outcome)
    }

    pub fn emergency_stop(&mut self) -> Option<RunOutcome> {
        tracing::warn!("Emergency stop activated");
        self.stop(StopReason::EmergencyStop)
    }

    /// Advances the active run by one tick. No-op when idle.
    pub fn tick(&mut self, now: SimTime) {
        self.clock = now;
        let Some(mut run) = self.run.take() else {
            return;
        };

        if run.matched.is_some() {
            self.run = Some(run);
            self.stop(StopReason::Matched);
            return;
        }

        tracing::debug!(
            "Tick: state={}, time={}ms, attempts={}/{}",
            run.state(),
            run.elapsed(now),
            run.attempts,
            run.config.general.max_attempts
        );

        let step = match self.check_context(&run) {
            Err(err) => Step::Stop(StopReason::Failed(err)),
            Ok(()) => self.step(&mut run, now),
        };

        self.run = Some(run);
        match step {
            Step::Stay => {}
            Step::Go(phase) => self.transition(phase, now),
            Step::Stop(reason) => {
                self.stop(reason);
            }
        }
    }

    fn check_context(&self, run: &Run) -> Result<(), RunError> {
        let world = self.executor.world();
        if !world.is_ready() {
            return Err(RunError::context("client not ready"));
        }
        match world.target(run.target) {
            None => Err(RunError::target_lost("target is no longer loaded")),
            Some(snapshot) if !snapshot.alive => Err(RunError::target_lost("target died")),
            Some(_) => Ok(()),
        }
    }

    fn transition(&mut self, phase: Phase, now: SimTime) {
        if let Some(run) = self.run.as_mut() {
            let from = run.state();
            run.enter(phase, now);
            tracing::info!(">>> STATE TRANSITION: {} -> {}", from, run.state());
        }
    }

    fn notify(&mut self, sound: bool, notification: Notification) {
        self.services
            .notifier
            .notify(notification.with_sound_enabled(sound));
    }
}
