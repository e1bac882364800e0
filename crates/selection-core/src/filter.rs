//! Selection filters parsed from user-facing strings.
//!
//! Every filter accepts the sentinel `all`. Lists are comma-separated;
//! blank entries are ignored.

use std::collections::BTreeSet;

use goesgif_common::error::{GoesgifError, GoesgifResult};
use goesgif_snapshot_model::snapshot::SnapshotDescriptor;

const ALL: &str = "all";

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Satellite allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SatelliteFilter {
    All,
    Only(BTreeSet<String>),
}

impl SatelliteFilter {
    pub fn parse(raw: &str) -> GoesgifResult<Self> {
        if raw.trim() == ALL {
            return Ok(Self::All);
        }
        let ids: BTreeSet<String> = split_list(raw).into_iter().collect();
        if ids.is_empty() {
            return Err(GoesgifError::config(format!(
                "satellite list '{raw}' names no satellites (use 'all' or e.g. 'GOES18,GOES19')"
            )));
        }
        Ok(Self::Only(ids))
    }

    pub fn accepts(&self, satellite: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(ids) => ids.contains(satellite),
        }
    }
}

/// Region filter: `all` or an exact region token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionFilter {
    All,
    Exact(String),
}

impl RegionFilter {
    pub fn parse(raw: &str) -> GoesgifResult<Self> {
        match raw.trim() {
            ALL => Ok(Self::All),
            "" => Err(GoesgifError::config(
                "region must be 'all' or a region such as FD, M1, M2",
            )),
            region => Ok(Self::Exact(region.to_string())),
        }
    }

    pub fn accepts(&self, region: &str) -> bool {
        match self {
            Self::All => true,
            Self::Exact(wanted) => wanted == region,
        }
    }
}

/// Channel filter: `all` or substrings matched against the channel token.
///
/// Matching is by substring, so `13` also accepts `13_enhanced`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelFilter {
    All,
    AnyOf(Vec<String>),
}

impl ChannelFilter {
    pub fn parse(raw: &str) -> GoesgifResult<Self> {
        if raw.trim() == ALL {
            return Ok(Self::All);
        }
        let channels = split_list(raw);
        if channels.is_empty() {
            return Err(GoesgifError::config(format!(
                "channel list '{raw}' names no channels (use 'all' or e.g. '02,13')"
            )));
        }
        Ok(Self::AnyOf(channels))
    }

    pub fn accepts(&self, channel: &str) -> bool {
        match self {
            Self::All => true,
            Self::AnyOf(patterns) => patterns.iter().any(|p| channel.contains(p.as_str())),
        }
    }
}

/// Region, channel and enhanced-variant acceptance applied during partitioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionFilter {
    pub region: RegionFilter,
    pub channels: ChannelFilter,
    pub include_enhanced: bool,
}

impl Default for PartitionFilter {
    fn default() -> Self {
        Self {
            region: RegionFilter::All,
            channels: ChannelFilter::All,
            include_enhanced: false,
        }
    }
}

impl PartitionFilter {
    pub fn parse(region: &str, channels: &str, include_enhanced: bool) -> GoesgifResult<Self> {
        Ok(Self {
            region: RegionFilter::parse(region)?,
            channels: ChannelFilter::parse(channels)?,
            include_enhanced,
        })
    }

    /// Enhanced snapshots are rejected unless included, even when the
    /// channel filter names them.
    pub fn accepts(&self, snapshot: &SnapshotDescriptor) -> bool {
        if snapshot.enhanced && !self.include_enhanced {
            return false;
        }
        self.region.accepts(snapshot.region.as_str()) && self.channels.accepts(&snapshot.channel)
    }
}
