//! Core types for TweetMine

use serde::{Deserialize, Serialize};

/// A harvested account: public handle plus an optional display name.
/// Immutable once read from input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub handle: String,
    pub name: Option<String>,
}

impl Account {
    /// Account known only by its handle (single mode).
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            name: None,
        }
    }

    /// Account with a display name (list-file mode).
    pub fn named(name: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            name: Some(name.into()),
        }
    }
}

/// One fetched post, exactly as the page fetcher produced it.
///
/// Identifiers are assigned monotonically by the provider: within one
/// account's timeline they strictly decrease as posts get older.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTweet {
    pub id: i64,
    pub created_at: String,
    pub text: String,
    pub is_reply: bool,
    pub is_retweet: bool,
}

/// Export-ready form of a [`RawTweet`]: same id and timestamp, sanitized
/// text. Only `created_at` and `text` are serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TweetRecord {
    pub id: i64,
    pub created_at: String,
    pub text: String,
}

/// Ordered results for one account, newest first, ids strictly decreasing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestResult {
    pub handle: String,
    pub records: Vec<TweetRecord>,
}
