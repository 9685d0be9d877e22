//! Allow-list sanitizer for article subtitle markup.
//!
//! Upstream subtitles carry light inline formatting. Only the tags in
//! [`ALLOWED_TAGS`] survive; anything in [`DROPPED_TAGS`] is removed together
//! with its content; every other element is unwrapped so its text is kept.
//! Attributes are dropped except `href` and `title` on anchors, and `href`
//! must be http(s) or relative.

use scraper::{ElementRef, Html, Node};

const ALLOWED_TAGS: &[&str] = &[
    "a", "b", "strong", "i", "em", "u", "s", "br", "p", "span", "sub", "sup", "small", "mark",
];

const DROPPED_TAGS: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "template", "noscript", "svg", "math",
];

const VOID_TAGS: &[&str] = &["br"];

/// Sanitize an HTML fragment, returning markup safe to render verbatim.
pub fn sanitize_fragment(markup: &str) -> String {
    let fragment = Html::parse_fragment(markup);
    let mut out = String::with_capacity(markup.len());
    write_children(fragment.root_element(), &mut out);
    out
}

fn write_children(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => escape_text(&text.text, out),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    write_element(child, out);
                }
            }
            _ => {}
        }
    }
}

fn write_element(element: ElementRef<'_>, out: &mut String) {
    let name = element.value().name().to_ascii_lowercase();

    if DROPPED_TAGS.contains(&name.as_str()) {
        return;
    }
    if !ALLOWED_TAGS.contains(&name.as_str()) {
        write_children(element, out);
        return;
    }

    out.push('<');
    out.push_str(&name);
    if name == "a" {
        for (attr, value) in element.value().attrs() {
            let keep = match attr {
                "href" => is_safe_href(value),
                "title" => true,
                _ => false,
            };
            if keep {
                out.push(' ');
                out.push_str(attr);
                out.push_str("=\"");
                escape_attr(value, out);
                out.push('"');
            }
        }
    }
    out.push('>');

    if VOID_TAGS.contains(&name.as_str()) {
        return;
    }
    write_children(element, out);
    out.push_str("</");
    out.push_str(&name);
    out.push('>');
}

/// True for http(s) and relative URLs; anything with another scheme is unsafe.
pub fn is_safe_href(href: &str) -> bool {
    let href = href.trim();
    match href.split_once(':') {
        // A colon after a path separator or query is not a scheme.
        Some((scheme, _)) if !scheme.contains(['/', '?', '#']) => {
            scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
        }
        _ => true,
    }
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_inline_formatting() {
        assert_eq!(sanitize_fragment("<b>hi</b>"), "<b>hi</b>");
        assert_eq!(
            sanitize_fragment("plain <em>and</em> <strong>bold</strong>"),
            "plain <em>and</em> <strong>bold</strong>"
        );
    }

    #[test]
    fn test_drops_script_with_content() {
        assert_eq!(
            sanitize_fragment("before<script>alert(1)</script>after"),
            "beforeafter"
        );
    }

    #[test]
    fn test_unwraps_unknown_tags() {
        assert_eq!(
            sanitize_fragment("<div class=\"x\"><b>kept</b> text</div>"),
            "<b>kept</b> text"
        );
    }

    #[test]
    fn test_strips_event_handlers_and_unsafe_hrefs() {
        assert_eq!(
            sanitize_fragment("<b onclick=\"steal()\">x</b>"),
            "<b>x</b>"
        );
        assert_eq!(
            sanitize_fragment("<a href=\"javascript:alert(1)\" title=\"t\">x</a>"),
            "<a title=\"t\">x</a>"
        );
        assert_eq!(
            sanitize_fragment("<a href=\"https://example.com/a?b=1&amp;c=2\">x</a>"),
            "<a href=\"https://example.com/a?b=1&amp;c=2\">x</a>"
        );
    }

    #[test]
    fn test_relative_href_kept() {
        assert_eq!(
            sanitize_fragment("<a href=\"/news/1\">x</a>"),
            "<a href=\"/news/1\">x</a>"
        );
    }

    #[test]
    fn test_escapes_text_and_void_tags() {
        assert_eq!(sanitize_fragment("a &lt; b<br>c"), "a &lt; b<br>c");
        assert_eq!(sanitize_fragment("Tom &amp; Jerry"), "Tom &amp; Jerry");
    }

    #[test]
    fn test_drops_comments() {
        assert_eq!(sanitize_fragment("a<!-- hidden -->b"), "ab");
    }
}
