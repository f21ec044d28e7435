// src/pipeline/mod.rs

//! Pipeline orchestration.

mod run;

pub use run::{RunStats, run_crawl};
