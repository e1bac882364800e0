//! Group partitioner: bucket ordered snapshots into animation groups.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use goesgif_snapshot_model::group::{Group, GroupKey};
use goesgif_snapshot_model::snapshot::SnapshotDescriptor;

use crate::filter::PartitionFilter;

/// Split `snapshots` into groups keyed by (satellite, region, channel).
///
/// Snapshots rejected by `filter` are dropped. Groups are returned in the
/// order their first snapshot was seen, and each group keeps arrival order.
pub fn partition<I>(snapshots: I, filter: &PartitionFilter) -> Vec<Group>
where
    I: IntoIterator<Item = SnapshotDescriptor>,
{
    let mut accepted: Vec<SnapshotDescriptor> = snapshots
        .into_iter()
        .filter(|snapshot| filter.accepts(snapshot))
        .collect();
    // Stable; a no-op for selector output.
    accepted.sort_by_key(|snapshot| snapshot.captured_at);

    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();

    for snapshot in accepted {
        match index.entry(snapshot.group_key()) {
            Entry::Occupied(slot) => {
                if let Err(rejected) = groups[*slot.get()].push(snapshot) {
                    tracing::warn!(
                        path = %rejected.path.display(),
                        "Dropping snapshot that does not fit its group"
                    );
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(groups.len());
                groups.push(Group::new(snapshot));
            }
        }
    }

    tracing::debug!(groups = groups.len(), "Partitioned selection");
    groups
}
