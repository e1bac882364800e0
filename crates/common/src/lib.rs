//! goesgif Common Utilities
//!
//! Shared infrastructure for all goesgif crates:
//! - Error types and result aliases
//! - Clock and timezone resolution
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod timezone;

pub use clock::*;
pub use config::*;
pub use error::*;
pub use timezone::*;
