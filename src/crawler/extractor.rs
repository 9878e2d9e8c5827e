//! HTML extraction into normalized document records
//!
//! Extraction is best-effort and infallible: malformed markup degrades to
//! an empty [`Document`] rather than failing the pipeline. Script, style,
//! and iframe subtrees are excluded before any text is collected, so
//! executable and style content never leaks into the body.

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use std::collections::HashSet;
use url::Url;

/// Elements whose subtrees never contribute text
const STRIPPED_TAGS: &[&str] = &["script", "style", "iframe"];

/// A normalized, immutable document record handed to the sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    /// The canonical source URL
    pub url: String,

    /// First `<title>` text, absent if missing or empty
    pub title: Option<String>,

    /// Keywords from `meta[name=keywords]`, deduplicated, order-preserving
    pub keywords: Vec<String>,

    /// Sanitized body text: paragraph text nodes, whitespace-joined
    pub body: String,
}

/// Extracts a document from HTML content
///
/// # Extraction Rules
///
/// - Title: text of the first `<title>` element, trimmed; `None` if empty.
/// - Keywords: the `content` attributes of every `meta[name=keywords]`
///   element, comma-split, trimmed, empty entries dropped, first
///   occurrence wins.
/// - Body: text of `<p>` elements with script/style/iframe descendants
///   skipped, inner whitespace collapsed, paragraphs joined by spaces.
///
/// # Arguments
///
/// * `html` - The HTML content (may be malformed or empty)
/// * `source_url` - The canonical URL the content was fetched from
pub fn extract(html: &str, source_url: &Url) -> Document {
    let document = Html::parse_document(html);

    Document {
        url: source_url.to_string(),
        title: extract_title(&document),
        keywords: extract_keywords(&document),
        body: extract_body(&document),
    }
}

/// Extracts the page title
fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts deduplicated, order-preserving keywords
fn extract_keywords(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse(r#"meta[name="keywords"]"#) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut keywords = Vec::new();

    for element in document.select(&selector) {
        let Some(content) = element.value().attr("content") else {
            continue;
        };

        for keyword in content.split(',') {
            let keyword = keyword.trim();
            if keyword.is_empty() {
                continue;
            }
            if seen.insert(keyword.to_string()) {
                keywords.push(keyword.to_string());
            }
        }
    }

    keywords
}

/// Extracts the sanitized body text from paragraph elements
fn extract_body(document: &Html) -> String {
    let Ok(selector) = Selector::parse("p") else {
        return String::new();
    };

    let mut paragraphs = Vec::new();

    for element in document.select(&selector) {
        let mut raw = String::new();
        collect_text(element, &mut raw);

        let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if !text.is_empty() {
            paragraphs.push(text);
        }
    }

    paragraphs.join(" ")
}

/// Collects descendant text, skipping stripped subtrees
///
/// Exclusion happens during traversal, before any text is gathered, so a
/// `<script>` nested inside a paragraph contributes nothing.
fn collect_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if STRIPPED_TAGS.contains(&child_element.value().name()) {
                continue;
            }
            collect_text(child_element, out);
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        }
    }
}
