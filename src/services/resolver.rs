// src/services/resolver.rs

//! Image resolver: detail page → binary URL + numeric identifier.

use futures::stream::{self, StreamExt};
use scraper::Html;
use url::Url;

use crate::models::{GallerySelectors, GallerySet, ImageStub};
use crate::services::extract;
use crate::utils::http::Fetcher;

/// Resolves image stubs by fetching their detail pages.
pub struct ImageResolver<'a> {
    fetcher: &'a Fetcher,
    selectors: &'a GallerySelectors,
}

impl<'a> ImageResolver<'a> {
    pub fn new(fetcher: &'a Fetcher, selectors: &'a GallerySelectors) -> Self {
        Self { fetcher, selectors }
    }

    /// Resolve every stub across `sets`, up to `concurrency` detail fetches
    /// in flight for the whole batch.
    ///
    /// Stubs from all sets share one bounded stream, so the request bound
    /// holds page-wide rather than multiplying per set. Already-resolved
    /// stubs are left untouched. Stubs whose detail page lacks the expected
    /// fields stay unresolved; the downloader skips them.
    pub async fn resolve_sets(&self, sets: &mut [GallerySet], concurrency: usize) {
        let mut pending = Vec::new();
        for (index, set) in sets.iter_mut().enumerate() {
            for stub in std::mem::take(&mut set.images) {
                pending.push((index, stub));
            }
        }

        // buffered() preserves input order, so each set gets its images
        // back in the order they were collected.
        let resolved: Vec<(usize, ImageStub)> = stream::iter(pending)
            .map(|(index, stub)| async move { (index, self.resolve_image(stub).await) })
            .buffered(concurrency.max(1))
            .collect()
            .await;

        for (index, stub) in resolved {
            sets[index].images.push(stub);
        }
    }

    async fn resolve_image(&self, mut stub: ImageStub) -> ImageStub {
        if stub.is_resolved() {
            return stub;
        }

        let html = match self.fetcher.fetch_text(&stub.page_url).await {
            Ok(html) => html,
            Err(e) => {
                log::warn!("Failed to fetch detail page {}: {e}", stub.page_url);
                return stub;
            }
        };
        let Ok(base) = Url::parse(&stub.page_url) else {
            return stub;
        };

        let resolved = {
            let document = Html::parse_document(&html);
            extract::image_detail(&document, self.selectors, &base)
        };

        match resolved {
            Ok(Some(image)) => stub.resolve(image),
            Ok(None) => log::debug!("No image data on detail page {}", stub.page_url),
            Err(e) => log::warn!("Extraction failed for {}: {e}", stub.page_url),
        }
        stub
    }
}
