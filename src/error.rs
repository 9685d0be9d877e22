//! Error types for the scrape-and-paginate pipeline.
//!
//! Every fallible operation in the crate returns [`FeedError`]. Fetch failures
//! carry a [`FetchFailure`] cause so callers can tell a timeout from an HTTP
//! status from a transport problem without string matching.

use reqwest::StatusCode;
use thiserror::Error;

/// Why an upstream page could not be retrieved.
#[derive(Error, Debug)]
pub enum FetchFailure {
    #[error("request timed out")]
    Timeout,

    #[error("upstream responded with {0}")]
    Status(StatusCode),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl FetchFailure {
    /// Classify a `reqwest` error, pulling timeouts and status codes out of
    /// the generic transport bucket.
    pub fn classify(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchFailure::Timeout
        } else if let Some(status) = e.status() {
            FetchFailure::Status(status)
        } else {
            FetchFailure::Transport(e)
        }
    }
}

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("failed to fetch {url}: {cause}")]
    FetchFailed {
        url: String,
        #[source]
        cause: FetchFailure,
    },

    #[error("page body is not an HTML document: {0}")]
    ParseFailed(String),

    #[error("page load aborted: {0}")]
    LoadAborted(String),

    #[error("invalid upstream URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Client(#[source] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FeedError {
    pub fn fetch_failed(url: impl Into<String>, cause: FetchFailure) -> Self {
        FeedError::FetchFailed {
            url: url.into(),
            cause,
        }
    }

    /// True for the two errors a page load can end with.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            FeedError::FetchFailed { .. } | FeedError::ParseFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failed_display_includes_url_and_cause() {
        let err = FeedError::fetch_failed(
            "https://m.business-gazeta.ru/category/472/2",
            FetchFailure::Status(StatusCode::BAD_GATEWAY),
        );
        let msg = err.to_string();
        assert!(msg.contains("/category/472/2"));
        assert!(msg.contains("502"));
        assert!(err.is_load_failure());
    }

    #[test]
    fn test_parse_failed_is_load_failure() {
        assert!(FeedError::ParseFailed("empty body".into()).is_load_failure());
        assert!(!FeedError::LoadAborted("panicked".into()).is_load_failure());
    }

    #[test]
    fn test_timeout_display() {
        let err = FeedError::fetch_failed("https://example.com", FetchFailure::Timeout);
        assert_eq!(err.to_string(), "failed to fetch https://example.com: request timed out");
    }
}
