//! Article extraction from listing-page HTML.
//!
//! A listing page is a sequence of article cards:
//!
//! ```html
//! <div class="article-news" id="123">
//!   <div class="article-news__title"><a title="Headline" href="...">Headline</a></div>
//!   <img class="article-news__img" data-src="https://stcdn.business-online.ru/..." />
//!   <div class="article-news__subtitle"><a href="...">Subtitle <b>markup</b></a></div>
//! </div>
//! ```
//!
//! Cards missing a title, banner, or content are skipped; the rest are
//! returned in document order.

use crate::error::FeedError;
use crate::models::{Article, IdSource};
use crate::sanitize::sanitize_fragment;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

static CARD: Lazy<Selector> = Lazy::new(|| Selector::parse(".article-news").unwrap());
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse(".article-news__title a").unwrap());
static BANNER: Lazy<Selector> = Lazy::new(|| Selector::parse(".article-news__img").unwrap());
static SUBTITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".article-news__subtitle a").unwrap());
static LEADING_INT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*([+-]?\d+)").unwrap());

/// Largest integer a JSON consumer can hold without losing precision.
const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Extract all well-formed article cards from `html`, in document order.
///
/// # Errors
///
/// [`FeedError::ParseFailed`] when the body is empty or whitespace-only.
/// Anything else goes through the lenient HTML parser; a document with no
/// matching cards is not an error and yields an empty vector.
#[instrument(level = "info", skip_all, fields(bytes = html.len()))]
pub fn extract_articles(html: &str) -> Result<Vec<Article>, FeedError> {
    if html.trim().is_empty() {
        return Err(FeedError::ParseFailed("empty body".to_string()));
    }

    let document = Html::parse_document(html);
    if !document.errors.is_empty() {
        debug!(parse_errors = document.errors.len(), "Recovered from HTML parse errors");
    }

    let mut articles = Vec::new();
    let mut candidates = 0usize;
    for (index, card) in document.select(&CARD).enumerate() {
        candidates += 1;
        match extract_card(card) {
            Some(article) => articles.push(article),
            None => debug!(index, "Skipping incomplete article card"),
        }
    }

    info!(
        candidates,
        count = articles.len(),
        skipped = candidates - articles.len(),
        "Extracted articles"
    );
    Ok(articles)
}

fn extract_card(card: ElementRef<'_>) -> Option<Article> {
    let title = card
        .select(&TITLE)
        .next()
        .and_then(|a| a.value().attr("title"))
        .map(str::trim)
        .filter(|t| !t.is_empty())?;

    let banner = card
        .select(&BANNER)
        .next()
        .and_then(|img| img.value().attr("data-src"))
        .map(str::trim)
        .filter(|b| !b.is_empty())?;

    let content = card
        .select(&SUBTITLE)
        .next()
        .map(|a| sanitize_fragment(&a.inner_html()))
        .filter(|c| !c.trim().is_empty())?;

    let (id, id_source) = match card.value().id().and_then(parse_leading_int) {
        Some(id) => (id, IdSource::Upstream),
        None => (surrogate_id(title, banner, &content), IdSource::Surrogate),
    };

    Some(Article {
        id,
        title: title.to_string(),
        banner: banner.to_string(),
        content,
        id_source,
    })
}

/// Parse the leading integer of an id attribute (`"123"`, `" 42-news"`).
///
/// Zero is treated as unusable, like a missing id.
fn parse_leading_int(raw: &str) -> Option<i64> {
    LEADING_INT
        .captures(raw)
        .and_then(|caps| caps[1].parse::<i64>().ok())
        .filter(|id| *id != 0)
}

/// Deterministic stand-in id derived from the card contents.
fn surrogate_id(title: &str, banner: &str, content: &str) -> i64 {
    let mut hasher = Sha256::new();
    for part in [title, banner, content] {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    let digest = hasher.finalize();
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(prefix) & MAX_SAFE_INTEGER) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: Option<&str>, title: Option<&str>, banner: Option<&str>, content: Option<&str>) -> String {
        let id_attr = id.map(|i| format!(" id=\"{i}\"")).unwrap_or_default();
        let title_attr = title.map(|t| format!(" title=\"{t}\"")).unwrap_or_default();
        let banner_attr = banner.map(|b| format!(" data-src=\"{b}\"")).unwrap_or_default();
        let subtitle = content
            .map(|c| format!("<div class=\"article-news__subtitle\"><a href=\"/n\">{c}</a></div>"))
            .unwrap_or_default();
        format!(
            "<div class=\"article-news\"{id_attr}>\
               <div class=\"article-news__title\"><a href=\"/n\"{title_attr}>t</a></div>\
               <img class=\"article-news__img\"{banner_attr} src=\"/placeholder.png\">\
               {subtitle}\
             </div>"
        )
    }

    fn page(cards: &[String]) -> String {
        format!(
            "<!DOCTYPE html><html><head><title>Listing</title></head><body><main>{}</main></body></html>",
            cards.concat()
        )
    }

    #[test]
    fn test_single_card_example() {
        let html = page(&[card(Some("7"), Some("A"), Some("/x.jpg"), Some("<b>hi</b>"))]);
        let articles = extract_articles(&html).unwrap();

        assert_eq!(
            articles,
            vec![Article {
                id: 7,
                title: "A".to_string(),
                banner: "/x.jpg".to_string(),
                content: "<b>hi</b>".to_string(),
                id_source: IdSource::Upstream,
            }]
        );
    }

    #[test]
    fn test_missing_banner_yields_nothing() {
        let html = page(&[card(Some("7"), Some("A"), None, Some("<b>hi</b>"))]);
        assert!(extract_articles(&html).unwrap().is_empty());
    }

    #[test]
    fn test_preserves_document_order() {
        let cards: Vec<String> = (1..=4)
            .map(|i| {
                card(
                    Some(&i.to_string()),
                    Some(&format!("Title {i}")),
                    Some(&format!("/img/{i}.jpg")),
                    Some(&format!("Body {i}")),
                )
            })
            .collect();
        let articles = extract_articles(&page(&cards)).unwrap();

        assert_eq!(articles.len(), 4);
        let ids: Vec<i64> = articles.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(articles[2].title, "Title 3");
    }

    #[test]
    fn test_invalid_cards_filtered_independently() {
        let html = page(&[
            card(Some("1"), Some("One"), Some("/1.jpg"), Some("one")),
            card(Some("2"), None, Some("/2.jpg"), Some("two")),
            card(Some("3"), Some("Three"), Some("/3.jpg"), Some("three")),
            card(Some("4"), Some("Four"), Some("/4.jpg"), None),
            card(Some("5"), Some("   "), Some("/5.jpg"), Some("five")),
            card(Some("6"), Some("Six"), Some("/6.jpg"), Some("six")),
        ]);
        let articles = extract_articles(&html).unwrap();

        let ids: Vec<i64> = articles.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 3, 6]);
    }

    #[test]
    fn test_content_empty_after_sanitizing_is_skipped() {
        let html = page(&[card(
            Some("9"),
            Some("T"),
            Some("/t.jpg"),
            Some("<script>alert(1)</script>"),
        )]);
        assert!(extract_articles(&html).unwrap().is_empty());
    }

    #[test]
    fn test_content_is_sanitized() {
        let html = page(&[card(
            Some("9"),
            Some("T"),
            Some("/t.jpg"),
            Some("<b onmouseover=\"x()\">bold</b><img src=\"y\" onerror=\"z()\">"),
        )]);
        let articles = extract_articles(&html).unwrap();
        assert_eq!(articles[0].content, "<b>bold</b>");
    }

    #[test]
    fn test_non_numeric_id_gets_surrogate() {
        let html = page(&[
            card(Some("news-block"), Some("A"), Some("/a.jpg"), Some("a")),
            card(None, Some("B"), Some("/b.jpg"), Some("b")),
        ]);
        let articles = extract_articles(&html).unwrap();

        assert_eq!(articles.len(), 2);
        for article in &articles {
            assert_eq!(article.id_source, IdSource::Surrogate);
            assert!(article.id >= 0 && (article.id as u64) <= MAX_SAFE_INTEGER);
        }
        assert_ne!(articles[0].id, articles[1].id);
    }

    #[test]
    fn test_surrogate_id_is_deterministic() {
        let html = page(&[card(None, Some("A"), Some("/a.jpg"), Some("a"))]);
        let first = extract_articles(&html).unwrap();
        let second = extract_articles(&html).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_id_falls_back_to_surrogate() {
        let html = page(&[card(Some("0"), Some("A"), Some("/a.jpg"), Some("a"))]);
        let articles = extract_articles(&html).unwrap();
        assert_eq!(articles[0].id_source, IdSource::Surrogate);
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("123"), Some(123));
        assert_eq!(parse_leading_int("  42abc"), Some(42));
        assert_eq!(parse_leading_int("-5"), Some(-5));
        assert_eq!(parse_leading_int("abc42"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("0"), None);
        assert_eq!(parse_leading_int("99999999999999999999"), None);
    }

    #[test]
    fn test_no_cards_is_empty_not_error() {
        let html = "<html><body><p>Nothing to see here</p></body></html>";
        assert!(extract_articles(html).unwrap().is_empty());
    }

    #[test]
    fn test_empty_body_is_parse_failed() {
        assert!(matches!(
            extract_articles("   \n"),
            Err(FeedError::ParseFailed(_))
        ));
    }

    #[test]
    fn test_stray_nul_does_not_fail_the_page() {
        let html = format!(
            "{}\u{0}",
            page(&[card(Some("7"), Some("Kept"), Some("https://stcdn.business-online.ru/7.jpg"), Some("lead"))])
        );
        let articles = extract_articles(&html).unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].id, 7);

        assert!(extract_articles("\u{0}\u{1}PNG").unwrap().is_empty());
    }
}
