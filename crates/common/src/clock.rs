//! Clock utilities for time-threshold selection.
//!
//! The selector compares capture times against "now minus threshold".
//! "Now" comes from a [`Clock`] so runs can be pinned to a fixed instant.

use chrono::{DateTime, Duration, Utc};

/// Source of the current wall-clock time.
pub trait Clock {
    /// Current time in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}

/// The earliest capture time excluded by a threshold of `hours` before `now`.
///
/// Snapshots qualify only when captured strictly after this instant.
/// Thresholds reaching past the representable range saturate to
/// [`DateTime::<Utc>::MIN_UTC`], which admits every snapshot.
pub fn threshold_cutoff(now: DateTime<Utc>, hours: u32) -> DateTime<Utc> {
    Duration::try_hours(i64::from(hours))
        .and_then(|threshold| now.checked_sub_signed(threshold))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Minutes elapsed from `earlier` to `later` (negative if reversed).
pub fn minutes_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_seconds() as f64 / 60.0
}
