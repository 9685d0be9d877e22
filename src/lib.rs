//! Scrape-and-paginate core for the Business Gazeta news feed.
//!
//! - [`fetcher`]: raw listing HTML per page index
//! - [`extractor`]: article cards out of listing HTML
//! - [`pagination`]: the bounded "load next" state machine
//! - [`feed`]: the accumulated, ordered article list
//!
//! [`outputs`] and [`images`] serve presentation consumers such as the
//! `gazeta_feed` binary.

pub mod error;
pub mod extractor;
pub mod feed;
pub mod fetcher;
pub mod images;
pub mod models;
pub mod outputs;
pub mod pagination;
pub mod sanitize;
pub mod utils;

pub use error::{FeedError, FetchFailure};
pub use feed::FeedStore;
pub use fetcher::{HttpFetcher, PageFetcher};
pub use models::{Article, FeedSnapshot, IdSource};
pub use pagination::{LoadState, PageLoad, PaginationController, PaginationOptions, Trigger};
