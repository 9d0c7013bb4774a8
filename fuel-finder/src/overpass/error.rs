//! Overpass client error types.

/// Errors from fetching elements.
#[derive(Debug, thiserror::Error)]
pub enum OverpassError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response arrived but could not be parsed
    #[error("malformed response: {message}")]
    Malformed {
        message: String,
        body: Option<String>,
    },

    /// Every attempt failed with a transient error
    #[error("giving up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<OverpassError>,
    },

    /// Local fixture data could not be loaded
    #[error("fixture error: {0}")]
    Fixture(String),
}

impl OverpassError {
    /// Whether another attempt could plausibly succeed.
    ///
    /// Timeouts, connection failures, 5xx, 429 and 408 are transient.
    /// Everything else, including unparseable bodies, is fatal.
    pub fn is_transient(&self) -> bool {
        match self {
            OverpassError::Http(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.is_request()
                    || e.status().is_some_and(|s| s.is_server_error())
            }
            OverpassError::Api { status, .. } => is_transient_status(*status),
            OverpassError::Malformed { .. }
            | OverpassError::RetriesExhausted { .. }
            | OverpassError::Fixture(_) => false,
        }
    }
}

fn is_transient_status(status: u16) -> bool {
    status >= 500 || status == 429 || status == 408
}
