//! OAuth 1.0a request signing (HMAC-SHA1)
//!
//! The timeline API authenticates every request with an OAuth 1.0a
//! `Authorization` header built from the four user credentials. Signing
//! follows RFC 5849: percent-encode and sort all parameters, build the
//! signature base string, and HMAC-SHA1 it with the two secrets.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::Sha1;

use crate::credentials::Credentials;

type HmacSha1 = Hmac<Sha1>;

/// Everything except ALPHA / DIGIT / `-` / `.` / `_` / `~` gets encoded
/// (RFC 5849 section 3.6).
const ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, ENCODE_SET).to_string()
}

/// Signs requests with a fixed set of credentials.
#[derive(Debug, Clone)]
pub struct OauthSigner {
    consumer_key: String,
    consumer_secret: String,
    access_token: String,
    token_secret: String,
}

impl OauthSigner {
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            consumer_key: credentials.consumer_key.clone(),
            consumer_secret: credentials.consumer_secret.clone(),
            access_token: credentials.access_token.clone(),
            token_secret: credentials.token_secret.clone(),
        }
    }

    /// Build the `Authorization` header value for one request.
    ///
    /// `params` must contain exactly the query parameters that will be sent
    /// with the request; the signature covers them.
    pub fn authorization_header(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, String)],
    ) -> String {
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        let timestamp = chrono::Utc::now().timestamp();
        self.header_with(method, url, params, &nonce, timestamp)
    }

    fn header_with(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, String)],
        nonce: &str,
        timestamp: i64,
    ) -> String {
        let timestamp = timestamp.to_string();
        let oauth_params = self.oauth_params(nonce, &timestamp);
        let signature = self.signature(method, url, params, &oauth_params);

        let mut header_params: Vec<(&str, &str)> = oauth_params.to_vec();
        header_params.push(("oauth_signature", signature.as_str()));
        header_params.sort();

        let fields: Vec<String> = header_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect();
        format!("OAuth {}", fields.join(", "))
    }

    fn oauth_params<'a>(&'a self, nonce: &'a str, timestamp: &'a str) -> [(&'a str, &'a str); 6] {
        [
            ("oauth_consumer_key", self.consumer_key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", timestamp),
            ("oauth_token", self.access_token.as_str()),
            ("oauth_version", "1.0"),
        ]
    }

    fn signature(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, String)],
        oauth_params: &[(&str, &str)],
    ) -> String {
        // All parameters, percent-encoded then sorted by encoded key/value.
        let mut pairs: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| (percent_encode(k), percent_encode(v)))
            .chain(
                oauth_params
                    .iter()
                    .map(|(k, v)| (percent_encode(k), percent_encode(v))),
            )
            .collect();
        pairs.sort();

        let param_string = pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        let base = format!(
            "{}&{}&{}",
            method.to_uppercase(),
            percent_encode(url),
            percent_encode(&param_string)
        );

        let key = format!(
            "{}&{}",
            percent_encode(&self.consumer_secret),
            percent_encode(&self.token_secret)
        );
        // HMAC-SHA1 accepts keys of any length.
        let mut mac = HmacSha1::new_from_slice(key.as_bytes()).unwrap();
        mac.update(base.as_bytes());
        BASE64.encode(mac.finalize().into_bytes())
    }
}
