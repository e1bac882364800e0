//! Snapshot descriptors and region identifiers.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::group::GroupKey;

/// Imaging region (scan mode) embedded in a snapshot filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    /// `FD`
    FullDisk,
    /// `M1`
    Mesoscale1,
    /// `M2`
    Mesoscale2,
    /// Any other region token, kept verbatim.
    Other(String),
}

impl Region {
    pub fn parse(token: &str) -> Self {
        match token {
            "FD" => Self::FullDisk,
            "M1" => Self::Mesoscale1,
            "M2" => Self::Mesoscale2,
            other => Self::Other(other.to_string()),
        }
    }

    /// The filename token for this region.
    pub fn as_str(&self) -> &str {
        match self {
            Self::FullDisk => "FD",
            Self::Mesoscale1 => "M1",
            Self::Mesoscale2 => "M2",
            Self::Other(token) => token,
        }
    }

    pub fn is_full_disk(&self) -> bool {
        matches!(self, Self::FullDisk)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One qualifying satellite image on disk.
///
/// Created once by the classifier and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotDescriptor {
    /// Location of the source image.
    pub path: PathBuf,

    /// Satellite identifier, e.g. `GOES18`.
    pub satellite: String,

    /// Imaging region.
    pub region: Region,

    /// Channel token. Carries an `_enhanced` suffix for enhanced variants.
    pub channel: String,

    /// Whether this is an enhanced variant of the channel.
    pub enhanced: bool,

    /// Capture time parsed from the filename.
    pub captured_at: DateTime<Utc>,
}

impl SnapshotDescriptor {
    /// The animation group this snapshot belongs to.
    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            satellite: self.satellite.clone(),
            region: self.region.clone(),
            channel: self.channel.clone(),
        }
    }

    /// Whether this snapshot belongs to the group identified by `key`.
    pub fn belongs_to(&self, key: &GroupKey) -> bool {
        self.satellite == key.satellite && self.region == key.region && self.channel == key.channel
    }
}
