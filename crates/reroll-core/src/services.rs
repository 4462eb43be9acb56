//! Passive collaborators the engine reports to.
//!
//! Delivery channels, persistence and rendering belong to the host. The engine
//! only calls these narrow interfaces.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::{ConfigSource, RerollConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
    Success,
}

/// Optional sound accompanying a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Success,
    Error,
}

/// A user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub text: String,
    pub sound: Option<SoundCue>,
}

impl Notification {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            text: text.into(),
            sound: None,
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            text: text.into(),
            sound: None,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            text: text.into(),
            sound: Some(SoundCue::Error),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            text: text.into(),
            sound: Some(SoundCue::Success),
        }
    }

    /// Drops the sound cue unless sounds are enabled.
    pub fn with_sound_enabled(mut self, enabled: bool) -> Self {
        if !enabled {
            self.sound = None;
        }
        self
    }
}

/// Delivers notifications to the user.
pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

/// Records terminal run statistics.
pub trait StatsRecorder {
    fn record_success(&mut self, attempts: u32);
    fn record_failure(&mut self, attempts: u32);
}

impl<T: Notifier> Notifier for Rc<RefCell<T>> {
    fn notify(&mut self, notification: Notification) {
        self.borrow_mut().notify(notification);
    }
}

impl<T: StatsRecorder> StatsRecorder for Rc<RefCell<T>> {
    fn record_success(&mut self, attempts: u32) {
        self.borrow_mut().record_success(attempts);
    }

    fn record_failure(&mut self, attempts: u32) {
        self.borrow_mut().record_failure(attempts);
    }
}

/// Notifier that only logs.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => tracing::error!("{}", notification.text),
            NotificationLevel::Warning => tracing::warn!("{}", notification.text),
            NotificationLevel::Info | NotificationLevel::Success => {
                tracing::info!("{}", notification.text)
            }
        }
    }
}

/// Recorder that discards statistics.
#[derive(Debug, Default)]
pub struct NullStats;

impl StatsRecorder for NullStats {
    fn record_success(&mut self, _attempts: u32) {}
    fn record_failure(&mut self, _attempts: u32) {}
}

/// The collaborators handed to the orchestrator.
pub struct Services {
    pub config: Box<dyn ConfigSource>,
    pub notifier: Box<dyn Notifier>,
    pub stats: Box<dyn StatsRecorder>,
}

impl Services {
    pub fn new(
        config: impl ConfigSource + 'static,
        notifier: impl Notifier + 'static,
        stats: impl StatsRecorder + 'static,
    ) -> Self {
        Self {
            config: Box::new(config),
            notifier: Box::new(notifier),
            stats: Box::new(stats),
        }
    }

    /// Static configuration, log-only notifications, no statistics.
    pub fn with_config(config: RerollConfig) -> Self {
        Self::new(config, LogNotifier, NullStats)
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Collect(Vec<Notification>);

    impl Notifier for Collect {
        fn notify(&mut self, notification: Notification) {
            self.0.push(notification);
        }
    }

    #[test]
    fn test_shared_notifier_handle() {
        let shared = Rc::new(RefCell::new(Collect::default()));
        let mut handle = shared.clone();

        handle.notify(Notification::info("hello"));

        assert_eq!(shared.borrow().0.len(), 1);
        assert_eq!(shared.borrow().0[0].text, "hello");
    }

    #[test]
    fn test_sound_cue_respects_setting() {
        assert_eq!(Notification::success("found").sound, Some(SoundCue::Success));
        assert_eq!(
            Notification::error("lost").with_sound_enabled(false).sound,
            None
        );
        assert_eq!(Notification::info("hi").sound, None);
    }
}
