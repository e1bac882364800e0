//! Filename classifier.
//!
//! Snapshot files are named
//! `<SATELLITE>_<REGION>_<CHANNEL>[_enhanced][_...]_<YYYYMMDDTHHMMSSZ>.jpg`,
//! where the satellite token starts with `GOES` followed by at least two
//! digits. Anything else is not a snapshot and is reported as
//! [`Classification::NotApplicable`], never as an error.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::{NaiveDateTime, TimeZone, Utc};
use regex::Regex;

use crate::snapshot::{Region, SnapshotDescriptor};

/// Marker segment for enhanced channel variants.
pub const ENHANCED_MARKER: &str = "enhanced";

const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Outcome of classifying one filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Matched(SnapshotDescriptor),
    NotApplicable(Rejection),
}

/// Why a filename is not a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The path has no UTF-8 file name.
    NoFileName,
    /// Does not start with `GOES` and two digits.
    NotGoes,
    /// Starts like a snapshot but lacks region, channel or timestamp segments.
    Pattern,
    /// The embedded timestamp is not a real date/time.
    Timestamp,
}

impl Classification {
    pub fn matched(self) -> Option<SnapshotDescriptor> {
        match self {
            Self::Matched(snapshot) => Some(snapshot),
            Self::NotApplicable(_) => None,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matched(_))
    }
}

fn snapshot_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?P<satellite>GOES\d{2}[^_]*)_(?P<region>[^_]+)_(?P<channel>[^_]+)(?P<extra>(?:_[^_]+)*?)_(?P<timestamp>\d{8}T\d{6}Z)\.jpg$",
        )
        .expect("snapshot filename pattern is a valid regex")
    })
}

/// Classify the file at `path` by its file name.
pub fn classify(path: &Path) -> Classification {
    match path.file_name().and_then(|name| name.to_str()) {
        Some(name) => classify_name(name, path.to_path_buf()),
        None => Classification::NotApplicable(Rejection::NoFileName),
    }
}

/// Classify a bare file name; `path` is carried into the descriptor as-is.
pub fn classify_name(name: &str, path: PathBuf) -> Classification {
    if !has_goes_prefix(name) {
        return Classification::NotApplicable(Rejection::NotGoes);
    }

    let Some(caps) = snapshot_pattern().captures(name) else {
        return Classification::NotApplicable(Rejection::Pattern);
    };

    let Ok(naive) = NaiveDateTime::parse_from_str(&caps["timestamp"], TIMESTAMP_FORMAT) else {
        return Classification::NotApplicable(Rejection::Timestamp);
    };

    let channel_token = &caps["channel"];
    let marker_follows = caps["extra"]
        .split('_')
        .nth(1)
        .is_some_and(|segment| segment == ENHANCED_MARKER);
    let enhanced = marker_follows || channel_token == ENHANCED_MARKER;
    let channel = if marker_follows {
        format!("{channel_token}_{ENHANCED_MARKER}")
    } else {
        channel_token.to_string()
    };

    Classification::Matched(SnapshotDescriptor {
        path,
        satellite: caps["satellite"].to_string(),
        region: Region::parse(&caps["region"]),
        channel,
        enhanced,
        captured_at: Utc.from_utc_datetime(&naive),
    })
}

fn has_goes_prefix(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() > 6 && name.starts_with("GOES") && bytes[4..6].iter().all(u8::is_ascii_digit)
}
