//! Harvest orchestration
//!
//! `harvest_timeline` is the pagination controller: it fulfills "give me the
//! n most recent posts for one account" with repeated bounded fetches.
//! `harvest_all` spawns one task per account, shares the rate budget across
//! them, and waits for every task before reporting totals.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::budget::RateBudget;
use crate::error::FetchError;
use crate::export::Exporter;
use crate::sanitize::sanitize;
use crate::source::{ContentMode, TimelineSource, MAX_PAGE_SIZE};
use crate::types::{Account, HarvestResult, TweetRecord};

/// Per-run harvest settings shared by every account.
#[derive(Debug, Clone, Copy)]
pub struct HarvestOptions {
    /// Number of most recent posts requested per account.
    pub count: u32,
    pub mode: ContentMode,
    /// Cap on accounts harvested at once. `None` starts every account
    /// immediately.
    pub jobs: Option<usize>,
}

/// Totals for one finished run. Reported even when some accounts partially
/// failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub elapsed: Duration,
    /// Cumulative page fetches reserved across all accounts.
    pub pages: u64,
    pub accounts_ok: usize,
    pub accounts_failed: usize,
}

/// Fetch the `count` most recent posts for one account.
///
/// The loop is driven by quota consumed, not items received: each iteration
/// spends a 200-item page from the requested count, so an account with fewer
/// posts than requested still sees ceil(count / 200) fetches. The page quota
/// is reserved against the shared budget up front, before the first fetch.
///
/// A failed page is logged and treated as empty; the cursor keeps pointing
/// at the last item actually seen, so later pages continue from there and
/// nothing already collected is lost.
pub async fn harvest_timeline(
    source: &dyn TimelineSource,
    budget: &RateBudget,
    account: &Account,
    count: u32,
    mode: ContentMode,
) -> HarvestResult {
    let pages = count.div_ceil(MAX_PAGE_SIZE);
    budget.reserve(pages).await;

    let mut records: Vec<TweetRecord> = Vec::new();
    let mut last_id: Option<i64> = None;
    let mut remaining = i64::from(count);
    let mut page_size = count.min(MAX_PAGE_SIZE);

    while remaining > 0 {
        let max_id = last_id.map(|id| id - 1);
        match source.fetch_page(&account.handle, page_size, max_id, mode).await {
            Ok(page) => {
                for tweet in page {
                    if let Some(previous) = last_id {
                        if tweet.id >= previous {
                            warn!(
                                handle = %account.handle,
                                id = tweet.id,
                                "dropping out-of-order item"
                            );
                            continue;
                        }
                    }
                    last_id = Some(tweet.id);
                    records.push(TweetRecord {
                        id: tweet.id,
                        created_at: tweet.created_at,
                        text: sanitize(&tweet.text),
                    });
                }
            }
            Err(FetchError::EmptyResponse) => {
                warn!(handle = %account.handle, "no usable payload, continuing with empty page");
            }
            Err(FetchError::Transport(reason)) => {
                warn!(handle = %account.handle, %reason, "page fetch failed, continuing");
            }
        }
        remaining -= i64::from(MAX_PAGE_SIZE);
        page_size = remaining.clamp(0, i64::from(MAX_PAGE_SIZE)) as u32;
    }

    HarvestResult {
        handle: account.handle.clone(),
        records,
    }
}

/// Harvest every account concurrently and export each result.
///
/// One task per account; no task's outcome affects another. Export failures
/// are logged with the offending handle and counted in the summary.
pub async fn harvest_all(
    source: Arc<dyn TimelineSource>,
    budget: Arc<RateBudget>,
    exporter: Arc<dyn Exporter>,
    accounts: Vec<Account>,
    options: HarvestOptions,
) -> RunSummary {
    let started = Instant::now();
    let limiter = options.jobs.map(|width| Arc::new(Semaphore::new(width.max(1))));

    let mut tasks = Vec::with_capacity(accounts.len());
    for account in accounts {
        let source = Arc::clone(&source);
        let budget = Arc::clone(&budget);
        let exporter = Arc::clone(&exporter);
        let limiter = limiter.clone();
        let HarvestOptions { count, mode, .. } = options;

        tasks.push(tokio::spawn(async move {
            // The semaphore is never closed, so acquisition only fails if it
            // was dropped, in which case running unthrottled is fine.
            let _permit = match &limiter {
                Some(semaphore) => Arc::clone(semaphore).acquire_owned().await.ok(),
                None => None,
            };

            let result = harvest_timeline(source.as_ref(), budget.as_ref(), &account, count, mode).await;
            info!(
                handle = %account.handle,
                records = result.records.len(),
                "harvest complete"
            );
            match exporter.export(&account, &result) {
                Ok(path) => {
                    info!(handle = %account.handle, path = %path.display(), "export written");
                    true
                }
                Err(error) => {
                    warn!(handle = %account.handle, %error, "export failed");
                    false
                }
            }
        }));
    }

    let mut accounts_ok = 0;
    let mut accounts_failed = 0;
    for outcome in join_all(tasks).await {
        match outcome {
            Ok(true) => accounts_ok += 1,
            Ok(false) => accounts_failed += 1,
            Err(error) => {
                warn!(%error, "harvest task panicked");
                accounts_failed += 1;
            }
        }
    }

    RunSummary {
        elapsed: started.elapsed(),
        pages: budget.total(),
        accounts_ok,
        accounts_failed,
    }
}
