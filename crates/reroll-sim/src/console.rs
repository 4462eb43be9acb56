//! Notifications routed to the log with the configured display style.

use reroll_core::config::NotificationStyle;
use reroll_core::{Notification, NotificationLevel, Notifier, SoundCue};

/// Prints notifications through `tracing`, prefixed by where a client would
/// show them.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    style: NotificationStyle,
    delivered: usize,
}

impl ConsoleNotifier {
    pub fn new(style: NotificationStyle) -> Self {
        Self {
            style,
            delivered: 0,
        }
    }

    pub fn delivered(&self) -> usize {
        self.delivered
    }
}

/// The line a notification is shown as.
pub fn format_notification(style: NotificationStyle, notification: &Notification) -> String {
    let prefix = match style {
        NotificationStyle::Chat => "[Chat]",
        NotificationStyle::ActionBar => "[Action Bar]",
        NotificationStyle::Overlay => "[Overlay]",
    };
    match notification.sound {
        Some(SoundCue::Success) => format!("{} {} (♪ success)", prefix, notification.text),
        Some(SoundCue::Error) => format!("{} {} (♪ error)", prefix, notification.text),
        None => format!("{} {}", prefix, notification.text),
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, notification: Notification) {
        let line = format_notification(self.style, &notification);
        match notification.level {
            NotificationLevel::Error => tracing::error!("{}", line),
            NotificationLevel::Warning => tracing::warn!("{}", line),
            NotificationLevel::Info | NotificationLevel::Success => tracing::info!("{}", line),
        }
        self.delivered += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_prefix_and_sound() {
        let line = format_notification(
            NotificationStyle::Chat,
            &Notification::success("Found matching trade! Attempts: 3"),
        );
        assert_eq!(line, "[Chat] Found matching trade! Attempts: 3 (♪ success)");

        let quiet = Notification::error("lost").with_sound_enabled(false);
        assert_eq!(
            format_notification(NotificationStyle::Overlay, &quiet),
            "[Overlay] lost"
        );
    }

    #[test]
    fn test_counts_deliveries() {
        let mut notifier = ConsoleNotifier::new(NotificationStyle::ActionBar);
        notifier.notify(Notification::info("a"));
        notifier.notify(Notification::warning("b"));
        assert_eq!(notifier.delivered(), 2);
    }
}
