//! Timezone resolution for the timestamp overlay.
//!
//! The pipeline receives a [`TimezoneResolver`] instead of reaching for a
//! process-wide database, so callers and tests can substitute their own.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::error::TimezoneError;

/// Resolves a user-supplied identifier into a timezone.
pub trait TimezoneResolver {
    fn resolve(&self, identifier: &str) -> Result<Tz, TimezoneError>;
}

/// Resolver backed by the IANA database compiled into `chrono-tz`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TzDatabase;

impl TimezoneResolver for TzDatabase {
    fn resolve(&self, identifier: &str) -> Result<Tz, TimezoneError> {
        let trimmed = identifier.trim();
        if trimmed.is_empty() {
            return Err(TimezoneError::NotFound {
                identifier: identifier.to_string(),
            });
        }

        trimmed
            .parse::<Tz>()
            .ok()
            .or_else(|| Tz::from_str_insensitive(trimmed).ok())
            .ok_or_else(|| TimezoneError::NotFound {
                identifier: trimmed.to_string(),
            })
    }
}

/// Format a capture time for the overlay in the given timezone.
///
/// Produces `YYYY-MM-DD HH:MM:SS ABBR`, followed by the IANA name in
/// parentheses when it differs from the abbreviation.
pub fn overlay_label(captured_at: DateTime<Utc>, tz: Tz) -> String {
    let local = captured_at.with_timezone(&tz);
    let abbreviation = local.format("%Z").to_string();
    let stamp = local.format("%Y-%m-%d %H:%M:%S").to_string();
    if abbreviation == tz.name() {
        format!("{stamp} {abbreviation}")
    } else {
        format!("{stamp} {abbreviation} ({})", tz.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_resolve_known_zone() {
        let tz = TzDatabase.resolve("America/Los_Angeles").unwrap();
        assert_eq!(tz, chrono_tz::America::Los_Angeles);
        assert_eq!(TzDatabase.resolve("UTC").unwrap(), chrono_tz::UTC);
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        assert_eq!(
            TzDatabase.resolve("america/new_york").unwrap(),
            chrono_tz::America::New_York
        );
    }

    #[test]
    fn test_resolve_unknown_zone() {
        let err = TzDatabase.resolve("Mars/Olympus_Mons").unwrap_err();
        assert_eq!(
            err,
            TimezoneError::NotFound {
                identifier: "Mars/Olympus_Mons".to_string()
            }
        );
        assert!(matches!(
            TzDatabase.resolve("  "),
            Err(TimezoneError::NotFound { .. })
        ));
    }

    #[test]
    fn test_overlay_label_utc() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(overlay_label(at, chrono_tz::UTC), "2024-01-01 00:00:00 UTC");
    }

    #[test]
    fn test_overlay_label_converts_to_local() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let label = overlay_label(at, chrono_tz::America::Los_Angeles);
        assert_eq!(label, "2023-12-31 16:00:00 PST (America/Los_Angeles)");
    }
}
