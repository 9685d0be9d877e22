//! In-memory feed of scraped articles.

use crate::models::Article;

/// Ordered, append-only collection of articles for one session.
///
/// Owned by a single [`crate::pagination::PaginationController`]; there is no
/// removal operation and no interior mutability.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FeedStore {
    articles: Vec<Article>,
}

impl FeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current contents.
    pub fn initialize(&mut self, articles: Vec<Article>) {
        self.articles = articles;
    }

    /// Append `articles` after all existing entries, keeping their order.
    pub fn append(&mut self, articles: Vec<Article>) {
        self.articles.extend(articles);
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn into_articles(self) -> Vec<Article> {
        self.articles
    }
}
