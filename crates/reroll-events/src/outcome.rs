//! Terminal run outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::offer::CapturedOffer;
use crate::timestamp::SimTime;
use crate::world::TargetId;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// A captured offer satisfied the acceptance criteria.
    Success,
    /// The run was stopped by an error, the user, or a configured pause.
    Aborted,
    /// The attempt budget ran out without a match.
    Exhausted,
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeKind::Success => write!(f, "success"),
            OutcomeKind::Aborted => write!(f, "aborted"),
            OutcomeKind::Exhausted => write!(f, "exhausted"),
        }
    }
}

/// Emitted exactly once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub target: TargetId,
    pub kind: OutcomeKind,
    pub attempts: u32,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_offer: Option<CapturedOffer>,
    pub ended_at: SimTime,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.kind == OutcomeKind::Success
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} after {} attempts: {}",
            self.kind, self.attempts, self.reason
        )
    }
}
