//! Simulation Time
//!
//! The automation engine is driven on a fixed external cadence. Time is
//! carried as milliseconds since an arbitrary epoch chosen by the driver.
//!
//! # Example
//!
//! ```
//! use reroll_events::SimTime;
//!
//! let start = SimTime::from_millis(1_000);
//! let later = start.plus_millis(250);
//! assert_eq!(later.since(start), 250);
//! assert_eq!(start.since(later), 0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Nominal length of one tick in milliseconds.
pub const TICK_MS: u64 = 50;

/// A point in simulation time, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimTime(u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    /// Time of the given tick at the nominal cadence.
    pub const fn from_tick(tick: u64) -> Self {
        Self(tick * TICK_MS)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Milliseconds elapsed since `earlier`, saturating at zero.
    pub const fn since(self, earlier: SimTime) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    pub const fn plus_millis(self, ms: u64) -> Self {
        Self(self.0.saturating_add(ms))
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t+{}ms", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tick_uses_nominal_cadence() {
        assert_eq!(SimTime::from_tick(20).as_millis(), 1_000);
    }

    #[test]
    fn test_serializes_as_plain_number() {
        let json = serde_json::to_string(&SimTime::from_millis(1_234)).unwrap();
        assert_eq!(json, "1234");
    }

    #[test]
    fn test_display() {
        assert_eq!(SimTime::from_millis(50).to_string(), "t+50ms");
    }
}
