//! goesgif Selection Core
//!
//! Decides which snapshots become frames, and in which animation:
//! - **Selector:** Walk the input tree, classify files, apply time and satellite filters
//! - **Filters:** Region, channel and enhanced-variant acceptance
//! - **Partition:** Bucket the ordered selection into per-(satellite, region, channel) groups
//! - **Gap Auditor:** Flag unusually long intervals between consecutive frames
//!
//! Apart from the directory walk, everything here is pure computation.

pub mod filter;
pub mod gap;
pub mod partition;
pub mod selector;

pub use filter::{ChannelFilter, PartitionFilter, RegionFilter, SatelliteFilter};
pub use gap::{Gap, GapAuditor};
pub use partition::partition;
pub use selector::{select_from_paths, select_snapshots, SelectionCriteria};
