//! Error taxonomy for a run.

use thiserror::Error;

/// Coarse classification of run errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ContextUnavailable,
    ActionRejected,
    VerificationTimeout,
    ResourceExhausted,
    TargetLost,
}

/// Anything that can end or disturb a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    /// A required external handle (player, world, job site) is missing.
    #[error("context unavailable: {0}")]
    ContextUnavailable(String),
    /// An issued action did not apply.
    #[error("{action} rejected: {reason}")]
    ActionRejected { action: &'static str, reason: String },
    /// An expected world change was not observed in time.
    #[error("{what} not observed within {after_ms}ms")]
    VerificationTimeout { what: String, after_ms: u64 },
    /// Nothing left to place.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),
    /// The target died, unloaded or disappeared.
    #[error("target lost: {0}")]
    TargetLost(String),
}

impl RunError {
    pub fn context(reason: impl Into<String>) -> Self {
        RunError::ContextUnavailable(reason.into())
    }

    pub fn rejected(action: &'static str, reason: impl Into<String>) -> Self {
        RunError::ActionRejected {
            action,
            reason: reason.into(),
        }
    }

    pub fn timeout(what: impl Into<String>, after_ms: u64) -> Self {
        RunError::VerificationTimeout {
            what: what.into(),
            after_ms,
        }
    }

    pub fn exhausted(reason: impl Into<String>) -> Self {
        RunError::ResourceExhausted(reason.into())
    }

    pub fn target_lost(reason: impl Into<String>) -> Self {
        RunError::TargetLost(reason.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RunError::ContextUnavailable(_) => ErrorKind::ContextUnavailable,
            RunError::ActionRejected { .. } => ErrorKind::ActionRejected,
            RunError::VerificationTimeout { .. } => ErrorKind::VerificationTimeout,
            RunError::ResourceExhausted(_) => ErrorKind::ResourceExhausted,
            RunError::TargetLost(_) => ErrorKind::TargetLost,
        }
    }

    /// Whether a bounded retry may clear the condition.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::ActionRejected | ErrorKind::VerificationTimeout
        )
    }
}

/// Why `start()` refused to begin a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartError {
    #[error("a run is already active")]
    AlreadyRunning,
    #[error("automation is disabled")]
    Disabled,
    #[error("manual mode forbids automatic action")]
    ManualMode,
    #[error("context unavailable: {0}")]
    ContextUnavailable(String),
    #[error("target {0} is not loaded or not alive")]
    TargetMissing(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_kinds() {
        assert!(RunError::rejected("place", "occupied").is_retryable());
        assert!(RunError::timeout("claim", 8_000).is_retryable());
        assert!(!RunError::exhausted("no workstation").is_retryable());
        assert!(!RunError::target_lost("died").is_retryable());
        assert!(!RunError::context("no player").is_retryable());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            RunError::rejected("place", "permanently blocked").to_string(),
            "place rejected: permanently blocked"
        );
        assert_eq!(
            RunError::timeout("job site claim", 8_000).to_string(),
            "job site claim not observed within 8000ms"
        );
    }
}
