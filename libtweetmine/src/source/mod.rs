//! Timeline sources
//!
//! A timeline source issues one bounded API call for one account: given a
//! handle, a page size, and an optional "older than" cursor, it returns the
//! matching posts newest-first. The real implementation talks to the Twitter
//! v1.1 REST API; a configurable mock is available for tests.

use async_trait::async_trait;

use crate::error::FetchError;
use crate::types::RawTweet;

pub mod mock;
pub mod oauth;
pub mod twitter;

/// Largest page the provider will serve in one call.
pub const MAX_PAGE_SIZE: u32 = 200;

/// Which posts a harvest includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentMode {
    /// Original posts only.
    Normal,
    /// Replies and reposts included.
    Extended,
}

impl ContentMode {
    pub fn includes_replies_and_reposts(self) -> bool {
        matches!(self, ContentMode::Extended)
    }
}

/// One bounded page fetch against an account's timeline.
#[async_trait]
pub trait TimelineSource: Send + Sync {
    /// Fetch up to `page_size` posts (1..=200) for `handle`, newest first.
    ///
    /// `max_id` is an inclusive upper bound on post ids; `None` starts from
    /// the newest post. Errors describe a single failed page: the caller is
    /// expected to log and continue with an empty batch rather than abort
    /// the account.
    async fn fetch_page(
        &self,
        handle: &str,
        page_size: u32,
        max_id: Option<i64>,
        mode: ContentMode,
    ) -> Result<Vec<RawTweet>, FetchError>;
}
