//! HTTP GET with bounded retry for Discord API calls.
//!
//! Discord occasionally answers with 5xx errors or drops connections under load. Every
//! Discord lookup goes through `RetryingFetcher`, which retries a fixed number of times
//! with a fixed delay and leaves the interpretation of the final response to the caller.

use std::time::Duration;

use dioxus_logger::tracing;
use reqwest::{
    header::{HeaderMap, HeaderValue, InvalidHeaderValue, AUTHORIZATION},
    Response,
};
use serde::de::DeserializeOwned;

use crate::server::error::upstream::{UpstreamError, UpstreamSource};

/// Number of attempts used for Discord guild list lookups.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Fixed wait between two attempts. No exponential backoff and no jitter.
pub const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Credential used to authorize a Discord API request.
#[derive(Clone, Copy)]
pub enum Credential<'a> {
    /// OAuth2 access token of the logged in user, sent as `Bearer`.
    User(&'a str),
    /// Bot token, sent as `Bot`.
    Bot(&'a str),
}

impl Credential<'_> {
    /// Builds the request headers carrying this credential.
    ///
    /// The `Authorization` value is marked sensitive so it never shows up in debug output.
    ///
    /// # Returns
    /// - `Ok(HeaderMap)` - Headers with the `Authorization` entry set
    /// - `Err(InvalidHeaderValue)` - Token contains characters not allowed in a header
    pub fn headers(&self) -> Result<HeaderMap, InvalidHeaderValue> {
        let value = match self {
            Self::User(token) => format!("Bearer {}", token),
            Self::Bot(token) => format!("Bot {}", token),
        };

        let mut value = HeaderValue::from_str(&value)?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);

        Ok(headers)
    }
}

/// Performs GET requests with bounded retry and a fixed delay.
///
/// Cheap to clone, the underlying `reqwest::Client` shares its connection pool.
#[derive(Clone)]
pub struct RetryingFetcher {
    client: reqwest::Client,
}

impl RetryingFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Sends a GET request, retrying failed attempts up to `max_attempts` times.
    ///
    /// An attempt fails when the response status is not 2xx or when no response is
    /// obtained at all. Between attempts the fetcher waits `RETRY_DELAY`. A
    /// `max_attempts` of 0 behaves like 1.
    ///
    /// # Arguments
    /// - `url` - Absolute URL to request
    /// - `headers` - Headers sent with every attempt
    /// - `max_attempts` - Upper bound on the number of requests sent
    ///
    /// # Returns
    /// - `Ok(Response)` - First successful response, or the failing response of the last attempt
    /// - `Err(reqwest::Error)` - The last attempt produced no response
    pub async fn fetch(
        &self,
        url: &str,
        headers: HeaderMap,
        max_attempts: u32,
    ) -> Result<Response, reqwest::Error> {
        let max_attempts = max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.client.get(url).headers(headers.clone()).send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => {
                    tracing::warn!(
                        "Attempt {}/{} for {} failed with status {}",
                        attempt,
                        max_attempts,
                        url,
                        response.status()
                    );

                    if attempt >= max_attempts {
                        return Ok(response);
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        "Attempt {}/{} for {} failed with network error: {}",
                        attempt,
                        max_attempts,
                        url,
                        e
                    );

                    if attempt >= max_attempts {
                        return Err(e);
                    }
                }
            }

            tokio::time::sleep(RETRY_DELAY).await;
            attempt += 1;
        }
    }

    /// Fetches and decodes a JSON document, mapping every failure to an `UpstreamError`.
    ///
    /// # Arguments
    /// - `url` - Absolute URL to request
    /// - `headers` - Headers sent with every attempt, usually from `Credential::headers`
    /// - `max_attempts` - Upper bound on the number of requests sent
    /// - `upstream` - Which Discord lookup this is, reported in errors
    ///
    /// # Returns
    /// - `Ok(T)` - Decoded response body
    /// - `Err(UpstreamError::Network)` - Last attempt produced no response
    /// - `Err(UpstreamError::Status)` - Last attempt returned a non-success status
    /// - `Err(UpstreamError::Decode)` - Body did not match `T`
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: HeaderMap,
        max_attempts: u32,
        upstream: UpstreamSource,
    ) -> Result<T, UpstreamError> {
        let response = self
            .fetch(url, headers, max_attempts)
            .await
            .map_err(|error| UpstreamError::Network { upstream, error })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status { upstream, status });
        }

        response
            .json::<T>()
            .await
            .map_err(|error| UpstreamError::Decode { upstream, error })
    }
}
