// src/services/pagination.rs

//! Pagination-chain crawler for one set.

use std::collections::HashSet;

use scraper::Html;
use url::Url;

use crate::error::Result;
use crate::models::{GallerySelectors, GallerySet};
use crate::services::extract;
use crate::utils::http::Fetcher;

/// Walks a set's "next page" chain and collects image stubs.
pub struct PaginationCrawler<'a> {
    fetcher: &'a Fetcher,
    selectors: &'a GallerySelectors,
}

impl<'a> PaginationCrawler<'a> {
    pub fn new(fetcher: &'a Fetcher, selectors: &'a GallerySelectors) -> Self {
        Self { fetcher, selectors }
    }

    /// Collect image stubs for the whole chain starting at the set's
    /// first-page URL.
    ///
    /// The walk is iterative over a visited-URL set: a "next page" target
    /// that was already seen ends the chain, so cyclic or self-referential
    /// markup terminates. A fetch failure mid-chain keeps the stubs
    /// collected so far.
    pub async fn collect_images(&self, set: &mut GallerySet) -> Result<()> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut current = set.url.clone();

        while visited.insert(current.clone()) {
            let html = match self.fetcher.fetch_text(&current).await {
                Ok(html) => html,
                Err(e) => {
                    log::warn!(
                        "Failed to fetch set page {current}: {e}. Ending chain for '{}'.",
                        set.title
                    );
                    break;
                }
            };
            let base = Url::parse(&current)?;

            let next = {
                let document = Html::parse_document(&html);
                set.images
                    .extend(extract::image_links(&document, self.selectors, &base)?);
                extract::next_page(&document, self.selectors, &base)?
            };

            match next {
                Some(url) => current = url,
                None => break,
            }
        }

        log::debug!(
            "Set '{}': {} image stubs across {} page(s)",
            set.title,
            set.images.len(),
            visited.len()
        );
        Ok(())
    }
}
