//! Mock timeline source for testing
//!
//! Serves pages from a pre-seeded, newest-first timeline and can inject
//! per-call failures. Call parameters are recorded so tests can verify
//! pagination cursors and page sizes without network access.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::sleep;

use crate::error::FetchError;
use crate::source::{ContentMode, TimelineSource};
use crate::types::RawTweet;

/// One recorded page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub handle: String,
    pub page_size: u32,
    pub max_id: Option<i64>,
    pub mode: ContentMode,
}

/// Configurable mock timeline.
pub struct MockTimeline {
    tweets: Vec<RawTweet>,
    failures: HashMap<usize, FetchError>,
    delay: Duration,
    calls: Mutex<Vec<PageRequest>>,
}

impl MockTimeline {
    /// Mock serving the given timeline. Tweets must be newest first with
    /// strictly decreasing ids.
    pub fn with_timeline(tweets: Vec<RawTweet>) -> Self {
        Self {
            tweets,
            failures: HashMap::new(),
            delay: Duration::from_millis(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Mock with `count` generated original posts, ids descending from
    /// `newest_id`.
    pub fn with_generated(count: usize, newest_id: i64) -> Self {
        Self::with_timeline(generate_timeline(count, newest_id))
    }

    /// Fail the nth fetch_page call (0-based) with the given error.
    pub fn fail_on_call(mut self, call_index: usize, error: FetchError) -> Self {
        self.failures.insert(call_index, error);
        self
    }

    /// Simulate network latency on every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// All requests received so far, in order.
    pub fn calls(&self) -> Vec<PageRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

/// Build a newest-first timeline of `count` original posts with ids
/// descending one by one from `newest_id`.
pub fn generate_timeline(count: usize, newest_id: i64) -> Vec<RawTweet> {
    (0..count)
        .map(|offset| {
            let id = newest_id - offset as i64;
            RawTweet {
                id,
                created_at: format!("Mon Jan 01 00:00:{:02} +0000 2024", offset % 60),
                text: format!("post {id}"),
                is_reply: false,
                is_retweet: false,
            }
        })
        .collect()
}

#[async_trait]
impl TimelineSource for MockTimeline {
    async fn fetch_page(
        &self,
        handle: &str,
        page_size: u32,
        max_id: Option<i64>,
        mode: ContentMode,
    ) -> Result<Vec<RawTweet>, FetchError> {
        let call_index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(PageRequest {
                handle: handle.to_string(),
                page_size,
                max_id,
                mode,
            });
            calls.len() - 1
        };

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        if let Some(error) = self.failures.get(&call_index) {
            return Err(error.clone());
        }

        let include_all = mode.includes_replies_and_reposts();
        let page = self
            .tweets
            .iter()
            .filter(|t| max_id.map_or(true, |bound| t.id <= bound))
            .filter(|t| include_all || (!t.is_reply && !t.is_retweet))
            .take(page_size as usize)
            .cloned()
            .collect();
        Ok(page)
    }
}
