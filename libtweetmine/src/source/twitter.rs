//! Twitter v1.1 user-timeline client

use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::credentials::Credentials;
use crate::error::FetchError;
use crate::source::oauth::OauthSigner;
use crate::source::{ContentMode, TimelineSource};
use crate::types::RawTweet;

const DEFAULT_BASE_URL: &str = "https://api.twitter.com/1.1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeline source backed by the `statuses/user_timeline` endpoint.
#[derive(Debug, Clone)]
pub struct TwitterTimeline {
    client: reqwest::Client,
    signer: OauthSigner,
    base_url: String,
}

impl TwitterTimeline {
    pub fn new(credentials: &Credentials) -> Result<Self, FetchError> {
        Self::with_base_url(credentials, DEFAULT_BASE_URL)
    }

    /// Client pointed at a custom base URL, used by tests against a local
    /// mock server.
    pub fn with_base_url(
        credentials: &Credentials,
        base_url: impl Into<String>,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            signer: OauthSigner::new(credentials),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

/// Wire shape of one timeline entry. `full_text` is present in extended
/// tweet mode, `text` otherwise.
#[derive(Debug, Deserialize)]
struct ApiTweet {
    id: i64,
    created_at: String,
    #[serde(default)]
    full_text: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    in_reply_to_status_id: Option<i64>,
    #[serde(default)]
    retweeted_status: Option<serde_json::Value>,
}

impl From<ApiTweet> for RawTweet {
    fn from(tweet: ApiTweet) -> Self {
        let is_retweet = tweet.retweeted_status.is_some();
        RawTweet {
            id: tweet.id,
            created_at: tweet.created_at,
            text: tweet.full_text.or(tweet.text).unwrap_or_default(),
            is_reply: tweet.in_reply_to_status_id.is_some(),
            is_retweet,
        }
    }
}

#[async_trait::async_trait]
impl TimelineSource for TwitterTimeline {
    async fn fetch_page(
        &self,
        handle: &str,
        page_size: u32,
        max_id: Option<i64>,
        mode: ContentMode,
    ) -> Result<Vec<RawTweet>, FetchError> {
        let extended = mode.includes_replies_and_reposts();
        let mut params: Vec<(&str, String)> = vec![
            ("screen_name", handle.to_string()),
            ("count", page_size.to_string()),
            ("trim_user", "true".to_string()),
            ("tweet_mode", "extended".to_string()),
            ("exclude_replies", (!extended).to_string()),
            ("include_rts", extended.to_string()),
        ];
        if let Some(id) = max_id {
            params.push(("max_id", id.to_string()));
        }

        let url = format!("{}/statuses/user_timeline.json", self.base_url);
        let authorization = self.signer.authorization_header("GET", &url, &params);

        debug!(handle, page_size, ?max_id, "fetching timeline page");
        let response = self
            .client
            .get(&url)
            .query(&params)
            .header(AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Transport(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        if body.trim().is_empty() {
            return Err(FetchError::EmptyResponse);
        }

        let tweets: Vec<ApiTweet> =
            serde_json::from_str(&body).map_err(|_| FetchError::EmptyResponse)?;
        Ok(tweets.into_iter().map(RawTweet::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_tweet_maps_flags_and_text() {
        let json = r#"{
            "id": 850007368138018817,
            "created_at": "Thu Apr 06 15:28:43 +0000 2017",
            "full_text": "a long post body",
            "in_reply_to_status_id": 850006245121695744,
            "retweeted_status": null
        }"#;
        let tweet: ApiTweet = serde_json::from_str(json).unwrap();
        let raw = RawTweet::from(tweet);
        assert_eq!(raw.id, 850007368138018817);
        assert_eq!(raw.text, "a long post body");
        assert!(raw.is_reply);
        assert!(!raw.is_retweet);
    }

    #[test]
    fn api_tweet_falls_back_to_compat_text() {
        let json = r#"{
            "id": 1,
            "created_at": "Thu Apr 06 15:28:43 +0000 2017",
            "text": "compat body"
        }"#;
        let tweet: ApiTweet = serde_json::from_str(json).unwrap();
        let raw = RawTweet::from(tweet);
        assert_eq!(raw.text, "compat body");
        assert!(!raw.is_reply);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let creds = Credentials::from_parts("ck", "cs", "at", "ts");
        let client = TwitterTimeline::with_base_url(&creds, "http://localhost:9999/").unwrap();
        assert_eq!(client.base_url, "http://localhost:9999");
    }
}
