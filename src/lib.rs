// src/lib.rs

//! galpull Library
//!
//! Crawls a paginated image-gallery site (listing pages → sets → per-set
//! pagination chains) and bulk-downloads resolved images with checkpointed,
//! resumable progress.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
