//! Exports of the finished feed.
//!
//! # Submodules
//!
//! - [`json`]: writes a [`crate::models::FeedSnapshot`] for API consumption
//! - [`markdown`]: renders the feed as article cards for reading
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2026-10-18/
//!     ├── feed_091500.json
//!     └── feed_181203.json
//!
//! markdown_output_dir/
//! └── 2026-10-18_feed.md
//! ```

pub mod json;
pub mod markdown;
