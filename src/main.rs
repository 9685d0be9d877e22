//! # Gazeta Feed
//!
//! Scrapes the paginated Business Gazeta category listing into an ordered
//! infinite-scroll feed, then exports it as JSON and Markdown.
//!
//! ## Usage
//!
//! ```sh
//! gazeta_feed -p 3 -j ./json -m ./markdown
//! ```
//!
//! ## Architecture
//!
//! 1. **First page**: fetch page 1 and seed the feed from it
//! 2. **Load next**: fetch the next page, wait out the settle delay, extract
//!    the article cards and append them, one page at a time, up to page 5
//! 3. **Output**: write the feed snapshot to JSON and Markdown
//!
//! Ctrl-C during a load tears the session down; the pending page is dropped
//! and the feed is exported as it stood.

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::Cli;
use gazeta_feed::outputs::{json, markdown};
use gazeta_feed::utils::ensure_writable_dir;
use gazeta_feed::{FeedSnapshot, HttpFetcher, PaginationController, PaginationOptions};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("gazeta_feed starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // Early check: output dirs must be writable before we spend time fetching
    for dir in [&args.json_output_dir, &args.markdown_output_dir]
        .into_iter()
        .flatten()
    {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "Output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e.into());
        }
    }

    let fetcher = Arc::new(HttpFetcher::new(Duration::from_secs(args.timeout_secs))?);
    let options = PaginationOptions {
        max_page: args.pages,
        settle_delay: Duration::from_millis(args.settle_delay_ms),
    };

    // ---- First page ----
    let mut controller = match PaginationController::open(fetcher, options).await {
        Ok(controller) => controller,
        Err(e) => {
            error!(error = %e, "Failed to load the first listing page");
            return Err(e.into());
        }
    };
    info!(count = controller.feed().len(), "First page loaded");

    // ---- Load next, until exhausted, failed, or interrupted ----
    let mut shutdown = std::pin::pin!(tokio::signal::ctrl_c());
    while !controller.is_exhausted() {
        tokio::select! {
            res = controller.load_next() => match res {
                Ok(Some(load)) => {
                    info!(page = load.page, appended = load.appended, total = controller.feed().len(), "Page loaded");
                }
                Ok(None) => break,
                Err(e) if e.is_load_failure() => {
                    error!(page = controller.page() + 1, error = %e, "Page load failed; stopping");
                    break;
                }
                Err(e) => {
                    error!(page = controller.page() + 1, error = %e, "Page load aborted; stopping");
                    break;
                }
            },
            _ = &mut shutdown => {
                warn!(page = controller.page(), "Interrupted; tearing down session");
                break;
            }
        }
    }

    let pages_loaded = controller.page();
    let feed = controller.teardown();

    // ---- Output ----
    let now = Local::now();
    let snapshot = FeedSnapshot {
        local_date: now.date_naive().to_string(),
        local_time: now.time().format("%H:%M:%S").to_string(),
        pages_loaded,
        articles: feed.into_articles(),
    };

    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = json::write_feed(&snapshot, dir).await {
            error!(error = %e, "Failed to write feed JSON");
        }
    }
    if let Some(dir) = &args.markdown_output_dir {
        if let Err(e) = markdown::write_feed(&snapshot, dir).await {
            error!(error = %e, "Failed to write feed Markdown");
        }
    }
    if args.json_output_dir.is_none() && args.markdown_output_dir.is_none() {
        for article in &snapshot.articles {
            println!("{:>16}  {}", article.id, article.title);
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        pages_loaded,
        articles = snapshot.articles.len(),
        "Execution complete"
    );

    Ok(())
}
