//! Run context: the active state with its payload, and what a run reports.

use reroll_events::{BlockPos, CapturedOffer, OutcomeKind, SimTime, TargetId, Workstation};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{AcceptanceCriteria, RerollConfig};
use crate::error::RunError;
use crate::retry::{RetryBudget, RetryPolicy};
use crate::trade::TradeEvaluator;

/// Which step of the break/replace/inspect loop is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    InitialPlacement,
    WaitingToBreak,
    BreakingBlock,
    WaitingForDrop,
    PickingUpItem,
    ReplacingBlock,
    WaitingForTarget,
    OpeningNegotiation,
    CheckingOffers,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Idle => "Idle",
            RunState::InitialPlacement => "InitialPlacement",
            RunState::WaitingToBreak => "WaitingToBreak",
            RunState::BreakingBlock => "BreakingBlock",
            RunState::WaitingForDrop => "WaitingForDrop",
            RunState::PickingUpItem => "PickingUpItem",
            RunState::ReplacingBlock => "ReplacingBlock",
            RunState::WaitingForTarget => "WaitingForTarget",
            RunState::OpeningNegotiation => "OpeningNegotiation",
            RunState::CheckingOffers => "CheckingOffers",
        };
        f.write_str(name)
    }
}

/// Per-state payload. Only the fields a state needs exist while it is active.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Phase {
    InitialPlacement {
        tries: RetryBudget,
        next_try_at: SimTime,
        placed: Option<(BlockPos, SimTime)>,
    },
    WaitingToBreak,
    BreakingBlock,
    WaitingForDrop,
    PickingUpItem {
        notice_sent: bool,
    },
    ReplacingBlock {
        failures: RetryBudget,
        verify_failures: u32,
        next_try_at: SimTime,
        placed: Option<(BlockPos, SimTime)>,
    },
    WaitingForTarget,
    OpeningNegotiation,
    CheckingOffers {
        captured_at: Option<SimTime>,
    },
}

impl Phase {
    pub(crate) fn state(&self) -> RunState {
        match self {
            Phase::InitialPlacement { .. } => RunState::InitialPlacement,
            Phase::WaitingToBreak => RunState::WaitingToBreak,
            Phase::BreakingBlock => RunState::BreakingBlock,
            Phase::WaitingForDrop => RunState::WaitingForDrop,
            Phase::PickingUpItem { .. } => RunState::PickingUpItem,
            Phase::ReplacingBlock { .. } => RunState::ReplacingBlock,
            Phase::WaitingForTarget => RunState::WaitingForTarget,
            Phase::OpeningNegotiation => RunState::OpeningNegotiation,
            Phase::CheckingOffers { .. } => RunState::CheckingOffers,
        }
    }

    pub(crate) fn initial_placement(config: &RerollConfig, now: SimTime) -> Phase {
        let timings = &config.timings;
        Phase::InitialPlacement {
            tries: RetryPolicy::fixed(timings.initial_placement_tries, timings.place_backoff_ms)
                .budget(),
            next_try_at: now,
            placed: None,
        }
    }

    pub(crate) fn replacing_block(config: &RerollConfig, now: SimTime) -> Phase {
        let timings = &config.timings;
        Phase::ReplacingBlock {
            failures: RetryPolicy::fixed(timings.max_place_failures, timings.place_backoff_ms)
                .budget(),
            verify_failures: 0,
            next_try_at: now,
            placed: None,
        }
    }

    pub(crate) fn picking_up() -> Phase {
        Phase::PickingUpItem { notice_sent: false }
    }

    pub(crate) fn checking_offers() -> Phase {
        Phase::CheckingOffers { captured_at: None }
    }
}

/// The workstation the run is rerolling against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSite {
    pub pos: BlockPos,
    pub kind: Workstation,
}

/// Everything one run owns. Exists only while a run is active.
pub(crate) struct Run {
    pub target: TargetId,
    pub job_site: Option<JobSite>,
    pub attempts: u32,
    pub last_attempt_at: SimTime,
    pub claim_losses: u32,
    pub empty_views: u32,
    pub view_reopens: u32,
    /// Latched once an offer matches; never cleared within the run.
    pub matched: Option<CapturedOffer>,
    pub config: RerollConfig,
    pub criteria: AcceptanceCriteria,
    pub evaluator: TradeEvaluator,
    pub phase: Phase,
    pub entered_at: SimTime,
    /// One-shot action flag of the active state.
    pub action_started: bool,
}

impl Run {
    pub fn state(&self) -> RunState {
        self.phase.state()
    }

    pub fn elapsed(&self, now: SimTime) -> u64 {
        now.since(self.entered_at)
    }

    pub fn enter(&mut self, phase: Phase, now: SimTime) {
        self.phase = phase;
        self.entered_at = now;
        self.action_started = false;
    }
}

/// Why a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// An offer matched the acceptance criteria.
    Matched,
    MaxAttemptsReached,
    InventoryFull,
    /// Semi-auto mode hands back to the user after the break.
    SemiAutoHandoff,
    UserRequested,
    EmergencyStop,
    Failed(RunError),
}

impl StopReason {
    pub fn outcome_kind(&self) -> OutcomeKind {
        match self {
            StopReason::Matched => OutcomeKind::Success,
            StopReason::MaxAttemptsReached => OutcomeKind::Exhausted,
            _ => OutcomeKind::Aborted,
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Matched => write!(f, "matching offer found"),
            StopReason::MaxAttemptsReached => write!(f, "max attempts reached"),
            StopReason::InventoryFull => write!(f, "inventory full"),
            StopReason::SemiAutoHandoff => {
                write!(f, "job site broken, replace it manually to continue")
            }
            StopReason::UserRequested => write!(f, "stopped by user"),
            StopReason::EmergencyStop => write!(f, "emergency stop"),
            StopReason::Failed(err) => write!(f, "{}", err),
        }
    }
}

/// Snapshot of the active run for an overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStatus {
    pub target: TargetId,
    pub state: RunState,
    pub attempts: u32,
    pub max_attempts: u32,
    pub job_site: Option<BlockPos>,
    pub time_in_state_ms: u64,
    pub matched: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_reason_outcome_kinds() {
        assert_eq!(StopReason::Matched.outcome_kind(), OutcomeKind::Success);
        assert_eq!(
            StopReason::MaxAttemptsReached.outcome_kind(),
            OutcomeKind::Exhausted
        );
        assert_eq!(StopReason::UserRequested.outcome_kind(), OutcomeKind::Aborted);
        assert_eq!(
            StopReason::Failed(RunError::target_lost("died")).outcome_kind(),
            OutcomeKind::Aborted
        );
    }

    #[test]
    fn test_phase_payload_defaults() {
        let config = RerollConfig::default();
        let now = SimTime::from_millis(250);

        match Phase::replacing_block(&config, now) {
            Phase::ReplacingBlock {
                failures,
                verify_failures,
                next_try_at,
                placed,
            } => {
                assert_eq!(failures.max_failures(), 50);
                assert_eq!(verify_failures, 0);
                assert_eq!(next_try_at, now);
                assert!(placed.is_none());
            }
            other => panic!("unexpected phase {:?}", other),
        }
        assert_eq!(Phase::checking_offers().state(), RunState::CheckingOffers);
    }

    #[test]
    fn test_state_serialization() {
        assert_eq!(
            serde_json::to_string(&RunState::WaitingForTarget).unwrap(),
            r#""waiting_for_target""#
        );
    }
}
