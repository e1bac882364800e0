//! Group keys and chronologically ordered snapshot groups.

use std::fmt;

use crate::snapshot::{Region, SnapshotDescriptor};

/// Identifies one output animation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub satellite: String,
    pub region: Region,
    pub channel: String,
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.satellite, self.region, self.channel)
    }
}

/// Snapshots sharing a [`GroupKey`], ordered by capture time.
///
/// A group is never empty and its capture times never decrease.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    key: GroupKey,
    snapshots: Vec<SnapshotDescriptor>,
}

impl Group {
    /// Start a group from its first snapshot.
    pub fn new(first: SnapshotDescriptor) -> Self {
        Self {
            key: first.group_key(),
            snapshots: vec![first],
        }
    }

    /// Append a snapshot.
    ///
    /// The snapshot is handed back if it belongs to another group or was
    /// captured before the current last snapshot.
    pub fn push(&mut self, snapshot: SnapshotDescriptor) -> Result<(), SnapshotDescriptor> {
        if !snapshot.belongs_to(&self.key) {
            return Err(snapshot);
        }
        if snapshot.captured_at < self.last().captured_at {
            return Err(snapshot);
        }
        self.snapshots.push(snapshot);
        Ok(())
    }

    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    pub fn snapshots(&self) -> &[SnapshotDescriptor] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false: groups are never empty.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn first(&self) -> &SnapshotDescriptor {
        &self.snapshots[0]
    }

    pub fn last(&self) -> &SnapshotDescriptor {
        &self.snapshots[self.snapshots.len() - 1]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SnapshotDescriptor> {
        self.snapshots.iter()
    }
}

impl<'a> IntoIterator for &'a Group {
    type Item = &'a SnapshotDescriptor;
    type IntoIter = std::slice::Iter<'a, SnapshotDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.snapshots.iter()
    }
}
