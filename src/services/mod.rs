// src/services/mod.rs

//! Crawl, resolve, and download services.

pub mod download;
pub mod extract;
pub mod listing;
pub mod pagination;
pub mod resolver;

pub use download::{DownloadOutcome, DownloadStats, Downloader};
pub use listing::ListingCrawler;
pub use pagination::PaginationCrawler;
pub use resolver::ImageResolver;
