//! # engine-inspect
//!
//! Reads a single engine message from disk, decodes it with the strict
//! decoder and renders every field. Optionally replays the validated message
//! through the unchecked decoder to time the hot path.
//!
//! The binary is a thin wrapper; the pieces live here so they can be tested
//! without touching the file system or the process environment.

pub mod buffer;
pub mod config;
pub mod report;

pub use buffer::AlignedBuffer;
pub use config::{load_config, InspectConfig};
pub use report::{render, replay, ReplayStats};
