// src/storage/mod.rs

//! Durable progress state.
//!
//! The checkpoint file and the per-set completion markers are the only
//! durable state; the in-memory hierarchy is rebuilt from URLs on every run.

pub mod checkpoint;

pub use checkpoint::{CheckpointStore, FsCheckpoint};
