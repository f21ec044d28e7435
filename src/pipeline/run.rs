// src/pipeline/run.rs

//! Crawl-and-download orchestrator.

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};

use crate::error::Result;
use crate::models::{Config, GallerySet};
use crate::services::{
    DownloadStats, Downloader, ImageResolver, ListingCrawler, PaginationCrawler,
};
use crate::storage::CheckpointStore;
use crate::utils::http::Fetcher;

/// Summary of one crawl-and-download run.
#[derive(Debug)]
pub struct RunStats {
    /// Pages that reached their checkpoint this run
    pub pages_processed: usize,

    /// Pages that failed and will be retried next run
    pub pages_failed: usize,

    /// Sets swept by the downloader this run
    pub sets_processed: usize,

    /// Sets skipped because their completion marker already existed
    pub sets_skipped: usize,

    /// Image download tallies across all sets
    pub downloads: DownloadStats,

    pub started: DateTime<Utc>,
    pub finished: DateTime<Utc>,
}

/// Run the full pipeline over every listing page not yet checkpointed.
///
/// Pages run strictly one at a time. Per page: crawl the listing →
/// pagination-crawl sets concurrently → resolve all their images under the
/// same request bound → download set by set under the bounded pool → append
/// the checkpoint. A page that fails anywhere before its checkpoint is
/// reprocessed in full on the next run.
pub async fn run_crawl(config: &Config, checkpoint: &dyn CheckpointStore) -> Result<RunStats> {
    let started = Utc::now();
    let fetcher = Fetcher::new(&config.crawler)?;

    let done = checkpoint.load().await?;
    let pending: Vec<u32> = (1..=config.site.last_page)
        .filter(|n| !done.contains(n))
        .collect();

    log::info!(
        "{} of {} listing page(s) pending ({} already checkpointed)",
        pending.len(),
        config.site.last_page,
        done.len()
    );

    let mut stats = RunStats {
        pages_processed: 0,
        pages_failed: 0,
        sets_processed: 0,
        sets_skipped: 0,
        downloads: DownloadStats::default(),
        started,
        finished: started,
    };

    for number in pending {
        match process_page(config, &fetcher, number, &mut stats).await {
            Ok(()) => {
                checkpoint.append(number).await?;
                stats.pages_processed += 1;
                log::info!("Listing page {number} checkpointed");
            }
            Err(e) => {
                stats.pages_failed += 1;
                log::warn!("Listing page {number} failed and will be retried next run: {e}");
            }
        }
    }

    stats.finished = Utc::now();
    log_summary(&stats);
    Ok(stats)
}

/// Process one listing page up to (but not including) its checkpoint append.
async fn process_page(
    config: &Config,
    fetcher: &Fetcher,
    number: u32,
    stats: &mut RunStats,
) -> Result<()> {
    let listing = ListingCrawler::new(fetcher, config);
    let downloader = Downloader::new(fetcher, &config.download);

    let mut page = listing.crawl(number).await?;
    log::info!("Listing page {}: {} set(s)", number, page.sets.len());

    // Sets whose marker exists are skipped before any chain crawling or
    // image resolution.
    let (done_already, todo): (Vec<GallerySet>, Vec<GallerySet>) = page
        .sets
        .drain(..)
        .partition(|set| downloader.is_complete(set));
    for set in &done_already {
        log::debug!("Set '{}' already complete, skipping", set.title);
    }
    stats.sets_skipped += done_already.len();

    let chain_crawler = PaginationCrawler::new(fetcher, &config.selectors);
    let resolver = ImageResolver::new(fetcher, &config.selectors);
    let concurrency = config.crawler.max_concurrent.max(1);

    // Stage 1: walk pagination chains concurrently across sets. Each set
    // owns its own stubs, so there is no shared mutable state.
    let sets: Vec<Result<GallerySet>> = stream::iter(todo)
        .map(|mut set| {
            let chain_crawler = &chain_crawler;
            async move {
                chain_crawler.collect_images(&mut set).await?;
                Ok(set)
            }
        })
        .buffer_unordered(concurrency)
        .collect()
        .await;
    let mut sets = sets.into_iter().collect::<Result<Vec<_>>>()?;

    // Stage 2: resolve detail pages for all sets under the same request
    // bound, so in-flight requests never exceed `max_concurrent` per stage.
    resolver.resolve_sets(&mut sets, concurrency).await;

    // Stage 3: download one set at a time to bound peak connections.
    for set in &sets {
        let set_stats = downloader.download_set(set).await?;
        stats.downloads.merge(&set_stats);
        stats.sets_processed += 1;
    }

    Ok(())
}

fn log_summary(stats: &RunStats) {
    let elapsed = (stats.finished - stats.started).num_seconds();
    log::info!(
        "Run complete in {}s: {} page(s) checkpointed, {} failed; {} set(s) swept, {} skipped",
        elapsed,
        stats.pages_processed,
        stats.pages_failed,
        stats.sets_processed,
        stats.sets_skipped
    );
    log::info!(
        "Images: {} downloaded, {} already present, {} unresolved, {} failed",
        stats.downloads.downloaded,
        stats.downloads.skipped_existing,
        stats.downloads.skipped_unresolved,
        stats.downloads.failed
    );
}
