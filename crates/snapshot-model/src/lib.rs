//! goesgif Snapshot Model
//!
//! Defines the core data contracts shared by the selection and render stages:
//! - **Snapshot:** A classified satellite image file (satellite, region, channel, capture time)
//! - **Classifier:** Turns a filename into a snapshot, or explains why it does not qualify
//! - **Group:** The unit of animation, keyed by (satellite, region, channel)
//!
//! All capture times are UTC with second precision.

pub mod classify;
pub mod group;
pub mod snapshot;

pub use classify::*;
pub use group::*;
pub use snapshot::*;
