//! Error types for TweetMine

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TweetMineError>;

#[derive(Error, Debug)]
pub enum TweetMineError {
    #[error("credential error: {0}")]
    Credentials(#[from] CredentialError),

    #[error("input error: {0}")]
    Input(#[from] InputError),

    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("export error: {0}")]
    Export(#[from] ExportError),
}

impl TweetMineError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            TweetMineError::Credentials(_) => 2,
            TweetMineError::Input(_) => 3,
            TweetMineError::Fetch(_) => 1,
            TweetMineError::Export(_) => 1,
        }
    }
}

/// Failure of a single page fetch.
///
/// Both variants are recovered locally by the pagination loop: the failed
/// page is treated as empty and harvesting continues with whatever was
/// already collected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("provider returned no usable payload")]
    EmptyResponse,
}

/// Missing or unreadable API credentials. Fatal before any harvest starts.
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("credential file not found at {path}; run `tweet-creds set` first")]
    NotFound { path: PathBuf },

    #[error("failed to read credential file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse credential file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("credential field '{0}' is missing or empty")]
    MissingField(&'static str),

    #[error("failed to serialize credentials: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to write credential file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config directory could not be determined")]
    NoConfigDir,
}

/// Malformed account list. Fatal for the whole run since no accounts could
/// be determined.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to read account list {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed account list row {row}: {reason}")]
    MalformedRow { row: u64, reason: String },

    #[error("account list {0} contains no accounts")]
    Empty(PathBuf),
}

/// Failure while writing one account's results. Isolated per account.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),
}
