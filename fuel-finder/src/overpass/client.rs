//! Overpass API HTTP client.
//!
//! Sends one POST per attempt with the query as a plain-text body and
//! parses the `elements` array. Transient failures are retried according to
//! the configured [`RetryPolicy`].

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};

use super::error::OverpassError;
use super::query::OverpassQuery;
use super::retry::{Delay, RetryPolicy, TokioDelay, retry_with_backoff};
use super::source::ElementSource;
use super::types::{OverpassResponse, RawElement};

/// Default public Overpass endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum characters of a response body kept in error diagnostics.
const BODY_EXCERPT_CHARS: usize = 500;

/// Configuration for the Overpass client.
#[derive(Debug, Clone)]
pub struct OverpassConfig {
    /// Interpreter endpoint URL
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Retry behaviour for transient failures
    pub retry: RetryPolicy,
}

impl OverpassConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retry: RetryPolicy::default(),
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

/// Overpass API client.
///
/// Stateless between calls; safe to call repeatedly and to share.
#[derive(Debug, Clone)]
pub struct OverpassClient<D = TokioDelay> {
    http: reqwest::Client,
    endpoint: String,
    retry: RetryPolicy,
    delay: D,
}

impl OverpassClient<TokioDelay> {
    /// Create a client that sleeps on the tokio timer between retries.
    pub fn new(config: OverpassConfig) -> Result<Self, OverpassError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("fuel-finder/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint,
            retry: config.retry,
            delay: TokioDelay,
        })
    }
}

impl<D: Delay> OverpassClient<D> {
    /// Replace the delay used between retries.
    pub fn with_delay<D2: Delay>(self, delay: D2) -> OverpassClient<D2> {
        OverpassClient {
            http: self.http,
            endpoint: self.endpoint,
            retry: self.retry,
            delay,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Make a single request, without retrying.
    pub async fn fetch_once(&self, query: &OverpassQuery) -> Result<Vec<RawElement>, OverpassError> {
        tracing::debug!(endpoint = %self.endpoint, filter = ?query.filter(), "querying Overpass");

        let response = self
            .http
            .post(&self.endpoint)
            .body(query.as_str().to_owned())
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OverpassError::Api {
                status: status.as_u16(),
                message: body.chars().take(BODY_EXCERPT_CHARS).collect(),
            });
        }

        let body = response.text().await?;
        parse_elements(&body)
    }
}

impl<D: Delay> ElementSource for OverpassClient<D> {
    async fn fetch(&self, query: &OverpassQuery) -> Result<Vec<RawElement>, OverpassError> {
        retry_with_backoff(&self.retry, &self.delay, || self.fetch_once(query)).await
    }
}

/// Parse an Overpass JSON body into its elements.
pub fn parse_elements(body: &str) -> Result<Vec<RawElement>, OverpassError> {
    let response: OverpassResponse =
        serde_json::from_str(body).map_err(|e| OverpassError::Malformed {
            message: e.to_string(),
            body: Some(body.chars().take(BODY_EXCERPT_CHARS).collect()),
        })?;
    Ok(response.elements)
}
