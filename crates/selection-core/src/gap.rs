//! Gap auditor: detect long intervals between consecutive frames of a group.
//!
//! Gaps are advisory. They are reported to the run log and never change
//! which frames are rendered.

use chrono::{DateTime, Duration, Utc};

use goesgif_common::clock::minutes_between;

/// Default gap threshold in minutes.
pub const DEFAULT_GAP_THRESHOLD_MINUTES: u32 = 45;

/// An interval between consecutive frames that exceeded the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gap {
    pub previous: DateTime<Utc>,
    pub current: DateTime<Utc>,
}

impl Gap {
    pub fn duration(&self) -> Duration {
        self.current - self.previous
    }

    pub fn minutes(&self) -> f64 {
        minutes_between(self.previous, self.current)
    }

    /// Run-log line for this gap.
    pub fn log_line(&self) -> String {
        format!("  ⚠ Gap detected: {:.1} min between frames", self.minutes())
    }
}

/// Watches the capture times of one group, in order.
#[derive(Debug, Clone)]
pub struct GapAuditor {
    threshold: Duration,
    previous: Option<DateTime<Utc>>,
}

impl Default for GapAuditor {
    fn default() -> Self {
        Self::new(DEFAULT_GAP_THRESHOLD_MINUTES)
    }
}

impl GapAuditor {
    pub fn new(threshold_minutes: u32) -> Self {
        Self {
            threshold: Duration::minutes(i64::from(threshold_minutes)),
            previous: None,
        }
    }

    /// Record the next capture time. Returns a gap when the interval since
    /// the previous one is strictly longer than the threshold.
    pub fn observe(&mut self, captured_at: DateTime<Utc>) -> Option<Gap> {
        let gap = self.previous.and_then(|previous| {
            (captured_at - previous > self.threshold).then_some(Gap {
                previous,
                current: captured_at,
            })
        });
        self.previous = Some(captured_at);
        gap
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, m, s).unwrap()
    }

    #[test]
    fn test_first_frame_never_gaps() {
        let mut auditor = GapAuditor::default();
        assert_eq!(auditor.observe(at(0, 0, 0)), None);
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut auditor = GapAuditor::default();
        auditor.observe(at(0, 0, 0));
        // Exactly 2700 s is not a gap.
        assert_eq!(auditor.observe(at(0, 45, 0)), None);
        // 2701 s is.
        let gap = auditor.observe(at(1, 30, 1)).unwrap();
        assert_eq!(gap.duration().num_seconds(), 2701);
    }

    #[test]
    fn test_ninety_minute_gap_line() {
        let mut auditor = GapAuditor::default();
        assert!(auditor.observe(at(0, 0, 0)).is_none());
        assert!(auditor.observe(at(0, 30, 0)).is_none());
        let gap = auditor.observe(at(2, 0, 0)).unwrap();
        assert_eq!(gap.previous, at(0, 30, 0));
        assert_eq!(gap.log_line(), "  ⚠ Gap detected: 90.0 min between frames");
    }

    #[test]
    fn test_minutes_have_one_decimal() {
        let gap = Gap {
            previous: at(0, 0, 0),
            current: at(0, 50, 6),
        };
        assert_eq!(gap.log_line(), "  ⚠ Gap detected: 50.1 min between frames");
        let gap = Gap {
            previous: at(0, 0, 0),
            current: at(0, 50, 30),
        };
        assert_eq!(gap.log_line(), "  ⚠ Gap detected: 50.5 min between frames");
    }

    #[test]
    fn test_custom_threshold() {
        let mut auditor = GapAuditor::new(10);
        assert_eq!(auditor.threshold(), Duration::minutes(10));
        auditor.observe(at(0, 0, 0));
        assert!(auditor.observe(at(0, 11, 0)).is_some());
        assert!(auditor.observe(at(0, 20, 0)).is_none());
    }
}
