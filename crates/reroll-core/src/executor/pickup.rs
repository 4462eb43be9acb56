//! Stuck detection while walking to a dropped item.

use reroll_events::{SimTime, Vec3};

/// Length of one progress observation window.
pub const PROGRESS_WINDOW_MS: u64 = 500;

/// Minimum distance gain per window that counts as progress.
const MIN_DISTANCE_GAIN: f64 = 0.1;

/// Minimum displacement per window that counts as movement.
const MIN_DISPLACEMENT: f64 = 0.1;

/// Stuck windows tolerated before a jump is issued.
pub const STUCK_WINDOWS_BEFORE_JUMP: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Checkpoint {
    at: SimTime,
    position: Vec3,
    distance: f64,
}

/// Tracks approach progress toward a dropped item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PickupTracker {
    checkpoint: Option<Checkpoint>,
    stuck_windows: u32,
}

impl PickupTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one observation. Closes a window once it has lasted longer than
    /// [`PROGRESS_WINDOW_MS`]: the window is stuck when the player neither got
    /// closer nor moved.
    pub fn observe(&mut self, now: SimTime, position: Vec3, distance: f64) {
        let Some(checkpoint) = self.checkpoint else {
            self.checkpoint = Some(Checkpoint {
                at: now,
                position,
                distance,
            });
            self.stuck_windows = 0;
            return;
        };

        if now.since(checkpoint.at) <= PROGRESS_WINDOW_MS {
            return;
        }

        let closer = distance < checkpoint.distance - MIN_DISTANCE_GAIN;
        let moved = position.distance(checkpoint.position) >= MIN_DISPLACEMENT;
        if !closer && !moved {
            self.stuck_windows += 1;
            tracing::debug!(
                "Player appears stuck ({} windows), distance {:.2}",
                self.stuck_windows,
                distance
            );
        } else {
            self.stuck_windows = 0;
        }

        self.checkpoint = Some(Checkpoint {
            at: now,
            position,
            distance,
        });
    }

    pub fn should_jump(&self) -> bool {
        self.stuck_windows >= STUCK_WINDOWS_BEFORE_JUMP
    }

    /// Clears the stuck count after a jump was issued.
    pub fn jumped(&mut self) {
        self.stuck_windows = 0;
    }

    pub fn stuck_windows(&self) -> u32 {
        self.stuck_windows
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: u64) -> SimTime {
        SimTime::from_millis(ms)
    }

    #[test]
    fn test_stationary_player_becomes_stuck() {
        let mut tracker = PickupTracker::new();
        let pos = Vec3::new(0.0, 64.0, 0.0);

        tracker.observe(at(0), pos, 5.0);
        tracker.observe(at(550), pos, 5.0);
        assert_eq!(tracker.stuck_windows(), 1);
        assert!(!tracker.should_jump());

        tracker.observe(at(1_100), pos, 5.0);
        assert!(tracker.should_jump());

        tracker.jumped();
        assert!(!tracker.should_jump());
    }

    #[test]
    fn test_observations_within_window_are_ignored() {
        let mut tracker = PickupTracker::new();
        let pos = Vec3::new(0.0, 64.0, 0.0);

        tracker.observe(at(0), pos, 5.0);
        for ms in (50..=500).step_by(50) {
            tracker.observe(at(ms), pos, 5.0);
        }
        assert_eq!(tracker.stuck_windows(), 0);
    }

    #[test]
    fn test_progress_resets_stuck_count() {
        let mut tracker = PickupTracker::new();
        let pos = Vec3::new(0.0, 64.0, 0.0);

        tracker.observe(at(0), pos, 5.0);
        tracker.observe(at(600), pos, 5.0);
        assert_eq!(tracker.stuck_windows(), 1);

        tracker.observe(at(1_200), Vec3::new(1.0, 64.0, 0.0), 4.0);
        assert_eq!(tracker.stuck_windows(), 0);
    }

    #[test]
    fn test_moving_sideways_is_not_stuck() {
        let mut tracker = PickupTracker::new();

        tracker.observe(at(0), Vec3::new(0.0, 64.0, 0.0), 5.0);
        tracker.observe(at(600), Vec3::new(0.0, 64.0, 0.5), 5.0);

        assert_eq!(tracker.stuck_windows(), 0);
    }

    #[test]
    fn test_reset_forgets_checkpoint() {
        let mut tracker = PickupTracker::new();
        let pos = Vec3::new(0.0, 64.0, 0.0);

        tracker.observe(at(0), pos, 5.0);
        tracker.observe(at(600), pos, 5.0);
        tracker.reset();
        tracker.observe(at(1_200), pos, 5.0);

        assert_eq!(tracker.stuck_windows(), 0);
        assert_eq!(tracker, {
            let mut fresh = PickupTracker::new();
            fresh.observe(at(1_200), pos, 5.0);
            fresh
        });
    }
}
