//! Core automation logic: the run state machine, physical actions, offer
//! capture and acceptance.

pub mod config;
pub mod error;
pub mod executor;
pub mod orchestrator;
pub mod ports;
pub mod retry;
pub mod services;
pub mod trade;

#[cfg(feature = "sandbox")]
pub mod sandbox;

pub use config::{AcceptanceCriteria, ConfigError, ConfigSource, OperationMode, RerollConfig};
pub use error::{ErrorKind, RunError, StartError};
pub use executor::{ActionExecutor, BreakProgress, PickupConfirmation, PickupResult};
pub use orchestrator::{JobSite, Orchestrator, RunState, RunStatus, StopReason};
pub use ports::{ActionError, ActionPort, Movement, ProbeError, World, WorldProbe};
pub use retry::{RetryBudget, RetryDecision, RetryPolicy};
pub use services::{
    LogNotifier, Notification, NotificationLevel, Notifier, NullStats, Services, SoundCue,
    StatsRecorder,
};
pub use trade::{TradeCapture, TradeEvaluator, TradeJudge};
