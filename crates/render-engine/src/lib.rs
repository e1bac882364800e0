//! goesgif Render Engine
//!
//! Turns selected snapshot groups into animated GIFs, one group at a time
//! and one frame at a time.
//!
//! # Pipeline Architecture
//!
//! ```text
//! input tree ──► Selector ──► Partitioner ──► per group:
//!                                               │
//!                       decode source ◄─────────┘
//!                             │
//!                             ├── Crop (closeup, full disk only)
//!                             ├── Resize
//!                             ├── Timestamp Overlay
//!                             ▼
//!                     Animation Assembler ──► output_<sat>_<region>_<channel>.gif
//!                             │
//!                        Gap Auditor ──► run log
//! ```

pub mod assembler;
pub mod compositor;
pub mod layout;
pub mod pipeline;
pub mod run_log;

pub use pipeline::*;
