// src/services/listing.rs

//! Listing-page crawler.

use scraper::Html;
use url::Url;

use crate::error::Result;
use crate::models::{Config, ListingPage};
use crate::services::extract;
use crate::utils::http::Fetcher;

/// Turns one numbered listing page into a sequence of set stubs.
pub struct ListingCrawler<'a> {
    fetcher: &'a Fetcher,
    config: &'a Config,
}

impl<'a> ListingCrawler<'a> {
    pub fn new(fetcher: &'a Fetcher, config: &'a Config) -> Self {
        Self { fetcher, config }
    }

    /// Fetch one listing page and extract its gallery entries.
    ///
    /// A page with zero entries is valid and returned empty.
    pub async fn crawl(&self, number: u32) -> Result<ListingPage> {
        let mut page = ListingPage::new(number, &self.config.site.root_url);
        log::debug!("Fetching listing page {} ({})", number, page.url);

        let html = self.fetcher.fetch_text(&page.url).await?;
        let base = Url::parse(&page.url)?;

        // Html is not Send; parse and extract before the next await point.
        page.sets = {
            let document = Html::parse_document(&html);
            extract::gallery_entries(&document, &self.config.selectors, &base)?
        };

        if page.sets.is_empty() {
            log::debug!("No sets found on listing page {}", number);
        }
        Ok(page)
    }
}
