//! HTML to plain text

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Node};

/// Elements whose whole subtree is presentation noise
const NOISE_ELEMENTS: &[&str] = &["script", "style", "nav", "footer", "iframe", "noscript"];

static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Visible text of an HTML document.
///
/// Every text node outside the noise elements is trimmed, empty ones are
/// dropped, and the rest are joined with newlines.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut parts: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map_or(false, |el| NOISE_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    parts.join("\n")
}

/// Collapse every run of three or more newlines into one blank line
pub fn collapse_blank_lines(text: &str) -> String {
    BLANK_RUNS.replace_all(text, "\n\n").into_owned()
}

/// First `max_chars` characters, cut wherever that lands
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte, _)) => text[..byte].to_string(),
        None => text.to_string(),
    }
}

/// Full extraction: text, newline normalization, truncation
pub fn extract_text(html: &str, max_chars: usize) -> String {
    let text = collapse_blank_lines(&html_to_text(html));
    truncate_chars(&text, max_chars)
}
