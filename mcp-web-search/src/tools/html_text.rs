//! Plain-text extraction from HTML pages

use regex::Regex;
use std::sync::LazyLock;

static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title\b[^>]*>(.*?)</title\s*>").expect("valid regex"));

// The regex crate has no backreferences, so each element gets its own arm
static NON_CONTENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>|<noscript\b[^>]*>.*?</noscript\s*>",
    )
    .expect("valid regex")
});

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));

/// Suffix appended to text cut at the character limit.
pub const TRUNCATION_MARKER: char = '…';

/// Title and readable text of a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageText {
    pub title: Option<String>,
    pub text: String,
}

/// Extract the title and the visible text of an HTML document.
///
/// Script, style and noscript elements are dropped with their content, tags
/// become word breaks, entities are decoded and whitespace runs collapse to
/// a single space. Text longer than `max_chars` characters is cut and
/// suffixed with [`TRUNCATION_MARKER`].
pub fn extract(html: &str, max_chars: usize) -> PageText {
    PageText {
        title: extract_title(html),
        text: truncate_chars(&extract_text(html), max_chars),
    }
}

/// Text of the first `<title>` element, if it has any.
pub fn extract_title(html: &str) -> Option<String> {
    let raw = TITLE.captures(html)?.get(1)?.as_str();
    let title = html_escape::decode_html_entities(raw).trim().to_string();
    (!title.is_empty()).then_some(title)
}

/// Visible text with whitespace collapsed.
pub fn extract_text(html: &str) -> String {
    let without_code = NON_CONTENT.replace_all(html, " ");
    let without_comments = COMMENT.replace_all(&without_code, " ");
    let without_tags = TAG.replace_all(&without_comments, " ");
    let decoded = html_escape::decode_html_entities(&without_tags);

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep at most `max_chars` characters, marking the cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => {
            let mut truncated = text[..byte_index].to_string();
            truncated.push(TRUNCATION_MARKER);
            truncated
        }
        None => text.to_string(),
    }
}
