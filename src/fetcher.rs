//! HTML fetcher for the upstream category listing.
//!
//! The listing is paginated by path suffix:
//!
//! ```text
//! https://m.business-gazeta.ru/category/472      page 1
//! https://m.business-gazeta.ru/category/472/3    page 3
//! ```
//!
//! [`PageFetcher`] is the seam between the pagination controller and the
//! network; [`HttpFetcher`] is the `reqwest` implementation used by the binary.

use crate::error::{FeedError, FetchFailure};
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Upstream category listing. Not configurable.
pub const UPSTREAM_CATEGORY_URL: &str = "https://m.business-gazeta.ru/category/472";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Source of raw listing HTML, one page at a time.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the raw HTML of listing page `page` (`None` for the first page).
    async fn fetch_page(&self, page: Option<u32>) -> Result<String, FeedError>;
}

/// Build the listing URL for `page` on top of `base`.
///
/// Absent pages and pages below 2 map to the base URL itself.
pub fn page_url_from(base: &Url, page: Option<u32>) -> Url {
    match page {
        Some(n) if n >= 2 => {
            let mut url = base.clone();
            let path = format!("{}/{}", base.path().trim_end_matches('/'), n);
            url.set_path(&path);
            url
        }
        _ => base.clone(),
    }
}

/// Build the upstream listing URL for `page`.
pub fn page_url(page: Option<u32>) -> Result<Url, FeedError> {
    let base = Url::parse(UPSTREAM_CATEGORY_URL)?;
    Ok(page_url_from(&base, page))
}

/// `reqwest`-backed [`PageFetcher`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base: Url,
}

impl HttpFetcher {
    /// Create a fetcher for the upstream listing with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, FeedError> {
        Self::with_base(page_url(None)?, timeout)
    }

    pub(crate) fn with_base(base: Url, timeout: Duration) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(FeedError::Client)?;
        Ok(Self { client, base })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch_page(&self, page: Option<u32>) -> Result<String, FeedError> {
        let url = page_url_from(&self.base, page);
        let t0 = Instant::now();

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FeedError::fetch_failed(url.as_str(), FetchFailure::classify(e)))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "Upstream returned non-success status");
            return Err(FeedError::fetch_failed(
                url.as_str(),
                FetchFailure::Status(status),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FeedError::fetch_failed(url.as_str(), FetchFailure::classify(e)))?;

        info!(
            %url,
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched listing page"
        );
        debug!(preview = %crate::utils::truncate_for_log(&body, 200), "Listing body");
        Ok(body)
    }
}
