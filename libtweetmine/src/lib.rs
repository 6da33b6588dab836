//! TweetMine - rate-aware timeline harvester
//!
//! This library turns a "fetch the N most recent posts for account X" request
//! into a sequence of bounded page fetches against a social-media API, tracks
//! a process-wide request budget across concurrently harvested accounts, and
//! writes each account's results to a dated CSV file.

pub mod budget;
pub mod credentials;
pub mod error;
pub mod export;
pub mod harvest;
pub mod input;
pub mod logging;
pub mod sanitize;
pub mod source;
pub mod types;

// Re-export commonly used types
pub use budget::RateBudget;
pub use credentials::Credentials;
pub use error::{Result, TweetMineError};
pub use harvest::{harvest_all, harvest_timeline, HarvestOptions, RunSummary};
pub use source::ContentMode;
pub use types::{Account, HarvestResult, RawTweet, TweetRecord};
