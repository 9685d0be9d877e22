//! Bounded pagination over the upstream listing.
//!
//! The controller owns the [`FeedStore`] and the page cursor. A "load next"
//! runs in its own tokio task: fetch the next page, wait out the settle delay,
//! extract. The task never sees the feed; results are applied by
//! [`PaginationController::settle`], on the controller's side, so a cancelled
//! or torn-down load cannot mutate the feed.
//!
//! ```text
//!            trigger_next                 settle (ok, page < max)
//!   Idle ────────────────────▶ Loading ─────────────────────────▶ Idle
//!     │                         │   │
//!     │ next page > max         │   └── settle (ok, page == max) ──▶ Exhausted
//!     ▼                         └── settle (error) / cancel ──────▶ Idle
//!   Exhausted
//! ```

use crate::error::FeedError;
use crate::extractor::extract_articles;
use crate::feed::FeedStore;
use crate::fetcher::PageFetcher;
use crate::models::Article;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

/// Highest listing page the controller will ever request.
pub const MAX_PAGE: u32 = 5;

/// Pause between fetching a page and applying it to the feed.
pub const SETTLE_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone)]
pub struct PaginationOptions {
    /// Last page to load; clamped to [`MAX_PAGE`].
    pub max_page: u32,
    pub settle_delay: Duration,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            max_page: MAX_PAGE,
            settle_delay: SETTLE_DELAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Exhausted,
}

/// Outcome of [`PaginationController::trigger_next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// A load for `page` was started.
    Started { page: u32 },
    /// A load for `page` is already in flight; nothing new was started.
    Busy { page: u32 },
    /// The next page would exceed the maximum; nothing was started.
    Exhausted,
}

/// A page successfully applied to the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLoad {
    pub page: u32,
    pub appended: usize,
}

type LoadResult = Result<Option<Vec<Article>>, FeedError>;

/// The single in-flight load. Dropping it cancels the load.
struct PendingLoad {
    page: u32,
    cancel: CancellationToken,
    handle: JoinHandle<LoadResult>,
}

impl Drop for PendingLoad {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.handle.abort();
    }
}

pub struct PaginationController<F> {
    fetcher: Arc<F>,
    feed: FeedStore,
    page: u32,
    max_page: u32,
    settle_delay: Duration,
    state: LoadState,
    pending: Option<PendingLoad>,
}

impl<F> PaginationController<F>
where
    F: PageFetcher + 'static,
{
    /// Fetch the first listing page and build a controller seeded with it.
    #[instrument(level = "info", skip_all)]
    pub async fn open(fetcher: Arc<F>, options: PaginationOptions) -> Result<Self, FeedError> {
        let html = fetcher.fetch_page(None).await?;
        Self::from_initial_html(fetcher, &html, options)
    }

    /// Build a controller whose feed is seeded from already-fetched page-1 HTML.
    pub fn from_initial_html(
        fetcher: Arc<F>,
        html: &str,
        options: PaginationOptions,
    ) -> Result<Self, FeedError> {
        let max_page = options.max_page.clamp(1, MAX_PAGE);
        let mut feed = FeedStore::new();
        feed.initialize(extract_articles(html)?);
        info!(count = feed.len(), max_page, "Feed initialized from first page");

        Ok(Self {
            fetcher,
            feed,
            page: 1,
            max_page,
            settle_delay: options.settle_delay,
            state: if max_page <= 1 {
                LoadState::Exhausted
            } else {
                LoadState::Idle
            },
            pending: None,
        })
    }

    /// Start loading the next page without waiting for it.
    pub fn trigger_next(&mut self) -> Trigger {
        if let Some(pending) = &self.pending {
            debug!(page = pending.page, "Load already in flight");
            return Trigger::Busy { page: pending.page };
        }

        let next = self.page + 1;
        if next > self.max_page {
            debug!(page = self.page, max_page = self.max_page, "No more pages");
            self.state = LoadState::Exhausted;
            return Trigger::Exhausted;
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_load(
            Arc::clone(&self.fetcher),
            next,
            self.settle_delay,
            cancel.clone(),
        ));
        self.pending = Some(PendingLoad {
            page: next,
            cancel,
            handle,
        });
        self.state = LoadState::Loading;
        info!(page = next, "Loading next page");
        Trigger::Started { page: next }
    }

    /// Wait for the in-flight load and apply it to the feed.
    ///
    /// Returns `Ok(None)` when nothing was in flight or the load was
    /// cancelled. On error the cursor and feed are left as they were.
    #[instrument(level = "info", skip_all)]
    pub async fn settle(&mut self) -> Result<Option<PageLoad>, FeedError> {
        let Some(pending) = self.pending.as_mut() else {
            return Ok(None);
        };
        let page = pending.page;
        let joined = (&mut pending.handle).await;
        self.pending = None;

        match joined {
            Ok(Ok(Some(articles))) => {
                let appended = articles.len();
                self.feed.append(articles);
                self.page = page;
                self.state = if page >= self.max_page {
                    LoadState::Exhausted
                } else {
                    LoadState::Idle
                };
                info!(page, appended, total = self.feed.len(), "Applied page to feed");
                Ok(Some(PageLoad { page, appended }))
            }
            Ok(Ok(None)) => {
                self.state = LoadState::Idle;
                debug!(page, "Load was cancelled");
                Ok(None)
            }
            Ok(Err(e)) => {
                self.state = LoadState::Idle;
                warn!(page, error = %e, "Page load failed; cursor unchanged");
                Err(e)
            }
            Err(join_err) if join_err.is_cancelled() => {
                self.state = LoadState::Idle;
                debug!(page, "Load task aborted");
                Ok(None)
            }
            Err(join_err) => {
                self.state = LoadState::Idle;
                error!(page, error = %join_err, "Load task panicked");
                Err(FeedError::LoadAborted(join_err.to_string()))
            }
        }
    }

    /// Trigger the next page and wait for it to be applied.
    pub async fn load_next(&mut self) -> Result<Option<PageLoad>, FeedError> {
        match self.trigger_next() {
            Trigger::Exhausted => Ok(None),
            Trigger::Started { .. } | Trigger::Busy { .. } => self.settle().await,
        }
    }

    /// Cancel the in-flight load, if any. Returns whether one was cancelled.
    pub fn cancel_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                info!(page = pending.page, "Cancelling pending load");
                self.state = LoadState::Idle;
                true
            }
            None => false,
        }
    }

    /// End the session, cancelling any pending load, and hand back the feed.
    pub fn teardown(self) -> FeedStore {
        let Self { feed, pending, .. } = self;
        if let Some(pending) = pending {
            info!(page = pending.page, "Session torn down with a load pending");
        }
        feed
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn max_page(&self) -> u32 {
        self.max_page
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn feed(&self) -> &FeedStore {
        &self.feed
    }

    /// True once the cursor sits on the last page; "load next" is pointless.
    pub fn is_exhausted(&self) -> bool {
        self.page >= self.max_page
    }
}

/// Body of one load task: fetch, settle delay, extract.
async fn run_load<F>(
    fetcher: Arc<F>,
    page: u32,
    settle_delay: Duration,
    cancel: CancellationToken,
) -> LoadResult
where
    F: PageFetcher + 'static,
{
    let work = async {
        let t0 = Instant::now();
        let html = fetcher.fetch_page(Some(page)).await?;
        sleep(settle_delay).await;
        let articles = extract_articles(&html)?;
        debug!(
            page,
            count = articles.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Load task finished"
        );
        Ok(Some(articles))
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Ok(None),
        res = work => res,
    }
}
