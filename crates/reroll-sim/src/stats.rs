//! Run statistics with all-time totals persisted as JSON.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use reroll_core::StatsRecorder;

/// Errors that can occur while loading or saving statistics.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Counters over a set of runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunTotals {
    pub runs: u64,
    pub successes: u64,
    pub failures: u64,
    /// Attempts summed over successful runs.
    pub attempts_to_success: u64,
    /// Attempts summed over every run.
    pub total_attempts: u64,
    /// Fewest attempts any successful run needed.
    pub best_attempts: Option<u32>,
}

impl RunTotals {
    fn record(&mut self, success: bool, attempts: u32) {
        self.runs += 1;
        self.total_attempts += attempts as u64;
        if success {
            self.successes += 1;
            self.attempts_to_success += attempts as u64;
            self.best_attempts = Some(self.best_attempts.map_or(attempts, |best| best.min(attempts)));
        } else {
            self.failures += 1;
        }
    }

    /// Average attempts per successful run.
    pub fn average_attempts(&self) -> f64 {
        if self.successes == 0 {
            0.0
        } else {
            self.attempts_to_success as f64 / self.successes as f64
        }
    }

    pub fn success_rate(&self) -> f64 {
        if self.runs == 0 {
            0.0
        } else {
            self.successes as f64 / self.runs as f64
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StatsFile {
    #[serde(default)]
    all_time: RunTotals,
}

/// Session and all-time statistics. All-time totals are written to disk
/// after every record when a path is set.
#[derive(Debug, Default)]
pub struct StatisticsTracker {
    path: Option<PathBuf>,
    session: RunTotals,
    all_time: RunTotals,
}

impl StatisticsTracker {
    /// Tracker that never touches the disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads all-time totals from `path`. A missing file starts fresh.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StatsError> {
        let path = path.into();
        let all_time = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str::<StatsFile>(&content)?.all_time
        } else {
            tracing::info!("No statistics at {}, starting fresh", path.display());
            RunTotals::default()
        };

        Ok(Self {
            path: Some(path),
            session: RunTotals::default(),
            all_time,
        })
    }

    pub fn session(&self) -> &RunTotals {
        &self.session
    }

    pub fn all_time(&self) -> &RunTotals {
        &self.all_time
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn save(&self) -> Result<(), StatsError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = StatsFile {
            all_time: self.all_time.clone(),
        };
        fs::write(path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }

    /// Clears the session counters; all-time totals are kept.
    pub fn reset_session(&mut self) {
        self.session = RunTotals::default();
    }

    fn record(&mut self, success: bool, attempts: u32) {
        self.session.record(success, attempts);
        self.all_time.record(success, attempts);
        if let Err(err) = self.save() {
            tracing::warn!("Could not save statistics: {}", err);
        }
    }
}

impl StatsRecorder for StatisticsTracker {
    fn record_success(&mut self, attempts: u32) {
        self.record(true, attempts);
    }

    fn record_failure(&mut self, attempts: u32) {
        self.record(false, attempts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_totals_track_best_and_average() {
        let mut tracker = StatisticsTracker::in_memory();
        tracker.record_success(12);
        tracker.record_success(4);
        tracker.record_failure(100);

        let session = tracker.session();
        assert_eq!(session.runs, 3);
        assert_eq!(session.successes, 2);
        assert_eq!(session.failures, 1);
        assert_eq!(session.best_attempts, Some(4));
        assert_eq!(session.total_attempts, 116);
        assert!((session.average_attempts() - 8.0).abs() < f64::EPSILON);
        assert!((session.success_rate() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_time_totals_persist_across_sessions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stats").join("reroll.json");

        let mut first = StatisticsTracker::load(&path).unwrap();
        first.record_success(7);
        first.record_failure(3);
        assert!(path.exists());

        let mut second = StatisticsTracker::load(&path).unwrap();
        assert_eq!(second.session().runs, 0);
        assert_eq!(second.all_time().runs, 2);
        assert_eq!(second.all_time().best_attempts, Some(7));

        second.record_success(2);
        second.reset_session();
        assert_eq!(second.session(), &RunTotals::default());
        assert_eq!(second.all_time().best_attempts, Some(2));
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reroll.json");
        fs::write(&path, "{ not json").unwrap();

        let err = StatisticsTracker::load(&path).unwrap_err();
        assert!(matches!(err, StatsError::Json(_)));
    }
}
