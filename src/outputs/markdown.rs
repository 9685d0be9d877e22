//! Markdown rendering of the feed as a column of article cards.
//!
//! Each card shows the headline, the banner, the sanitized subtitle markup and
//! the render timestamp. Banners outside the image allow-list are linked
//! instead of embedded, or shown as plain text when the URL is not http(s)
//! or relative. Titles are escaped for both HTML and Markdown.

use crate::error::FeedError;
use crate::images::is_allowed_banner;
use crate::models::{Article, FeedSnapshot};
use crate::sanitize::is_safe_href;
use std::fmt::Write;
use tokio::fs;
use tracing::{info, instrument};

/// Render the whole feed.
pub fn feed_to_markdown(snapshot: &FeedSnapshot) -> String {
    let mut md = String::new();
    let _ = writeln!(
        md,
        "# News feed for {} (pages loaded: {})\n",
        snapshot.local_date, snapshot.pages_loaded
    );

    if snapshot.articles.is_empty() {
        md.push_str("_No articles._\n");
        return md;
    }

    for article in &snapshot.articles {
        write_card(&mut md, article, snapshot);
    }
    md
}

fn write_card(md: &mut String, article: &Article, snapshot: &FeedSnapshot) {
    let title = escape_inline(article.title.trim());
    let _ = writeln!(md, "## {}\n", title);

    if is_allowed_banner(&article.banner) {
        let _ = writeln!(md, "![{}]({})\n", title, article.banner);
    } else if is_linkable(&article.banner) {
        let _ = writeln!(md, "[Banner image]({})\n", article.banner);
    } else {
        let _ = writeln!(md, "Banner image: {}\n", escape_inline(&article.banner));
    }

    let _ = writeln!(md, "<p>{}</p>\n", article.content);
    let _ = writeln!(md, "_{} {}_\n", snapshot.local_date, snapshot.local_time);
    md.push_str("---\n\n");
}

/// Escape upstream text for inline Markdown: HTML specials become entities,
/// Markdown control characters get a backslash.
fn escape_inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\\' | '`' | '*' | '_' | '[' | ']' | '(' | ')' | '#' | '!' | '|' | '~' => {
                out.push('\\');
                out.push(c);
            }
            '\n' | '\r' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}

/// A banner URL that may become a Markdown link destination as-is.
fn is_linkable(url: &str) -> bool {
    !url.is_empty()
        && is_safe_href(url)
        && !url.contains(|c: char| c.is_whitespace() || matches!(c, '(' | ')' | '<' | '>'))
}

/// Render and write the feed to `{markdown_output_dir}/{date}_feed.md`.
#[instrument(level = "info", skip_all, fields(%markdown_output_dir))]
pub async fn write_feed(
    snapshot: &FeedSnapshot,
    markdown_output_dir: &str,
) -> Result<String, FeedError> {
    let path = format!(
        "{}/{}_feed.md",
        markdown_output_dir.trim_end_matches('/'),
        snapshot.local_date
    );
    fs::write(&path, feed_to_markdown(snapshot)).await?;
    info!(%path, articles = snapshot.articles.len(), "Wrote feed Markdown");
    Ok(path)
}
