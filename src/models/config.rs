// src/models/config.rs

//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::GallerySelectors;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Target site settings
    #[serde(default)]
    pub site: SiteConfig,

    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Download behavior and output locations
    #[serde(default)]
    pub download: DownloadConfig,

    /// CSS selector schema for the site's markup
    #[serde(default)]
    pub selectors: GallerySelectors,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.site.root_url.trim().is_empty() {
            return Err(AppError::validation("site.root_url is empty"));
        }
        url::Url::parse(&self.site.root_url)
            .map_err(|e| AppError::validation(format!("site.root_url is not a valid URL: {e}")))?;
        if self.site.last_page == 0 {
            return Err(AppError::validation("site.last_page must be > 0"));
        }
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::validation("crawler.max_concurrent must be > 0"));
        }
        if self.download.pool_size == 0 {
            return Err(AppError::validation("download.pool_size must be > 0"));
        }
        if self.download.timeout_secs == 0 {
            return Err(AppError::validation("download.timeout_secs must be > 0"));
        }
        if self.download.output_dir.trim().is_empty() {
            return Err(AppError::validation("download.output_dir is empty"));
        }
        if self.download.checkpoint_file.trim().is_empty() {
            return Err(AppError::validation("download.checkpoint_file is empty"));
        }
        for (name, value) in self.selectors.required_fields() {
            if value.trim().is_empty() {
                return Err(AppError::validation(format!("{name} is empty")));
            }
        }
        Ok(())
    }
}

/// Target site settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Root URL of the gallery site; listing pages and relative links
    /// resolve against it
    #[serde(default)]
    pub root_url: String,

    /// Last listing-page number to crawl (pages 1..=last_page)
    #[serde(default = "defaults::last_page")]
    pub last_page: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root_url: String::new(),
            last_page: defaults::last_page(),
        }
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Maximum concurrent requests per crawl stage (chain walking and
    /// detail resolution each stay within this bound)
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Retries for a failed text fetch before giving up
    #[serde(default = "defaults::retry_attempts")]
    pub retry_attempts: u32,

    /// Base backoff between retries in milliseconds (doubles per attempt)
    #[serde(default = "defaults::retry_backoff")]
    pub retry_backoff_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_concurrent: defaults::max_concurrent(),
            retry_attempts: defaults::retry_attempts(),
            retry_backoff_ms: defaults::retry_backoff(),
        }
    }
}

/// Download behavior and output locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Directory that receives one subdirectory per set
    #[serde(default = "defaults::output_dir")]
    pub output_dir: String,

    /// Append-only checkpoint file of completed listing pages
    #[serde(default = "defaults::checkpoint_file")]
    pub checkpoint_file: String,

    /// Concurrent downloads within one set
    #[serde(default = "defaults::pool_size")]
    pub pool_size: usize,

    /// Per-download timeout in seconds
    #[serde(default = "defaults::download_timeout")]
    pub timeout_secs: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_dir: defaults::output_dir(),
            checkpoint_file: defaults::checkpoint_file(),
            pool_size: defaults::pool_size(),
            timeout_secs: defaults::download_timeout(),
        }
    }
}

/// Default configuration values.
mod defaults {
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; galpull/0.1)".to_string()
    }

    pub fn timeout() -> u64 {
        20
    }

    pub fn max_concurrent() -> usize {
        8
    }

    pub fn retry_attempts() -> u32 {
        2
    }

    pub fn retry_backoff() -> u64 {
        500
    }

    pub fn last_page() -> u32 {
        1
    }

    pub fn output_dir() -> String {
        "dl".to_string()
    }

    pub fn checkpoint_file() -> String {
        "done.txt".to_string()
    }

    pub fn pool_size() -> usize {
        20
    }

    pub fn download_timeout() -> u64 {
        120
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            site: SiteConfig {
                root_url: "https://example.com".to_string(),
                last_page: 3,
            },
            ..Config::default()
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_root() {
        let config = Config::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_root_url() {
        let mut config = valid_config();
        config.site.root_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_pool() {
        let mut config = valid_config();
        config.download.pool_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [site]
            root_url = "https://example.com"
            last_page = 10

            [selectors]
            gallery_entry = "div.gallery"
            "#,
        )
        .expect("partial config should parse");

        assert_eq!(config.site.last_page, 10);
        assert_eq!(config.download.pool_size, 20);
        assert_eq!(config.selectors.gallery_entry, "div.gallery");
        assert_eq!(config.selectors.attr_name, "href");
    }
}
