//! Command-line interface definitions for Gazeta Feed.
//!
//! All arguments can be provided via command-line flags or environment
//! variables. The upstream listing itself is fixed and not configurable.

use clap::Parser;

/// Command-line arguments for the Gazeta Feed application.
///
/// # Examples
///
/// ```sh
/// # Load all five pages and print a summary
/// gazeta_feed
///
/// # Load two pages without the artificial delay and export both formats
/// gazeta_feed -p 2 --settle-delay-ms 0 -j ./json -m ./markdown
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for the feed JSON
    #[arg(short, long, env = "FEED_JSON_DIR")]
    pub json_output_dir: Option<String>,

    /// Output directory for the feed Markdown
    #[arg(short, long, env = "FEED_MARKDOWN_DIR")]
    pub markdown_output_dir: Option<String>,

    /// Number of listing pages to load, including the first
    #[arg(short, long, env = "FEED_PAGES", default_value_t = 5,
          value_parser = clap::value_parser!(u32).range(1..=5))]
    pub pages: u32,

    /// Delay in milliseconds between fetching a page and applying it
    #[arg(long, env = "FEED_SETTLE_DELAY_MS", default_value_t = 1500)]
    pub settle_delay_ms: u64,

    /// Per-request HTTP timeout in seconds
    #[arg(long, env = "FEED_TIMEOUT_SECS", default_value_t = 15,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,
}
