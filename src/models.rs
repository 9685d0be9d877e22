//! Data models for scraped articles and feed exports.
//!
//! - [`Article`]: one news card scraped from a listing page
//! - [`IdSource`]: where an article's id came from
//! - [`FeedSnapshot`]: the accumulated feed at the end of a session, as exported

use serde::{Deserialize, Serialize};

/// Where an [`Article::id`] came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdSource {
    /// Parsed from the card's `id` attribute.
    #[default]
    Upstream,
    /// Derived from the card contents because the upstream id was unusable.
    Surrogate,
}

/// A news item scraped from one article card of a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Upstream numeric id, or a content-derived surrogate.
    pub id: i64,
    /// Headline, taken from the title anchor's `title` attribute.
    pub title: String,
    /// Banner image URL, taken from the lazy-load `data-src` attribute.
    pub banner: String,
    /// Subtitle markup, sanitized against the inline allow-list.
    pub content: String,
    #[serde(default)]
    pub id_source: IdSource,
}

/// The feed as it stood when the session ended.
///
/// Serialized to JSON by [`crate::outputs::json`] and rendered by
/// [`crate::outputs::markdown`].
#[derive(Debug, Serialize, Deserialize)]
pub struct FeedSnapshot {
    /// The render date in `YYYY-MM-DD` format.
    pub local_date: String,
    /// The render time in `HH:MM:SS` format.
    pub local_time: String,
    /// Highest listing page applied to the feed.
    pub pages_loaded: u32,
    pub articles: Vec<Article>,
}
