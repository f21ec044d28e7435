// src/models/mod.rs

//! Domain models for the crawler application.

mod config;
mod gallery;
mod selectors;

// Re-export all public types
pub use config::{Config, CrawlerConfig, DownloadConfig, SiteConfig};
pub use gallery::{GallerySet, ImageStub, ListingPage, ResolvedImage, sanitize_title};
pub use selectors::GallerySelectors;
