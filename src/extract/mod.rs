//! Link extraction: one HTML document in, filtered download candidates out.
//!
//! The extractor walks every hyperlink on the page, resolves relative
//! targets against the page URL, applies extension/pattern filtering,
//! deduplicates on the resolved URL, and derives a sanitized display
//! name for each surviving link. Document order is preserved so listing
//! output is deterministic.

mod error;
mod filter;

pub use error::ExtractError;
pub use filter::{FilterCriteria, FilterMode, KNOWN_EXTENSIONS};

use std::collections::HashSet;

use scraper::{Html, Selector};
use tracing::{debug, trace};
use url::Url;

use crate::naming::{MAX_FILENAME_CHARS, sanitize_filename, truncate_preserving_extension};

/// One downloadable link discovered on the page.
///
/// Created once per distinct resolved URL during extraction and
/// immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Human-readable filename derived from the anchor text (or the URL
    /// path segment), sanitized and extension-corrected.
    pub name: String,
    /// Absolute resolved URL, unique within one extraction run.
    pub url: String,
}

/// Parses the target page URL, which must be absolute.
///
/// # Errors
///
/// Returns [`ExtractError::InvalidBaseUrl`] when the string is not a
/// parseable absolute URL.
pub fn parse_base_url(raw: &str) -> Result<Url, ExtractError> {
    Url::parse(raw).map_err(|e| ExtractError::invalid_base_url(raw, e))
}

/// Extracts filtered, deduplicated download candidates from an HTML page.
///
/// Hyperlinks with empty, fragment-only (`#...`), or `javascript:` hrefs
/// are ignored, as are links whose relative target cannot be resolved
/// against `base_url` (skipped silently, never fatal). The first
/// occurrence of a resolved URL wins; later duplicates are dropped.
///
/// The parser recovers from arbitrarily malformed markup, so extraction
/// itself cannot fail; fatal conditions (bad base URL, bad include
/// pattern) are caught when constructing the inputs.
///
/// # Panics
///
/// Panics if the static `a[href]` selector fails to parse. This should
/// never happen in practice.
#[must_use]
#[allow(clippy::expect_used)]
pub fn extract(html: &str, base_url: &Url, criteria: &FilterCriteria) -> Vec<Candidate> {
    let document = Html::parse_document(html);
    let anchors = Selector::parse("a[href]").expect("static selector must parse");

    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates = Vec::new();

    for anchor in document.select(&anchors) {
        let Some(href) = anchor.value().attr("href").map(str::trim) else {
            continue;
        };
        if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
            continue;
        }

        // Unresolvable relative URLs are a per-link condition, not fatal.
        let Ok(resolved) = base_url.join(href) else {
            trace!(href, "skipping unresolvable link");
            continue;
        };

        if !criteria.accepts(&resolved) {
            continue;
        }

        let resolved_str = resolved.to_string();
        if !seen.insert(resolved_str.clone()) {
            continue;
        }

        let name = derive_display_name(&anchor.text().collect::<String>(), &resolved);
        candidates.push(Candidate {
            name,
            url: resolved_str,
        });
    }

    debug!(count = candidates.len(), "extraction complete");
    candidates
}

/// Derives the display name for a link: trimmed anchor text, else the
/// percent-decoded last path segment; sanitized, with the detected
/// extension appended when missing. The length cap is re-applied after
/// the append so it holds for the final name too.
fn derive_display_name(anchor_text: &str, resolved: &Url) -> String {
    let text = anchor_text.trim();
    let base = if text.is_empty() {
        last_path_segment(resolved)
    } else {
        text.to_string()
    };

    let mut name = sanitize_filename(&base);

    if let Some(ext) = filter::path_extension(resolved) {
        if !name.to_lowercase().ends_with(&ext) {
            name.push_str(&ext);
            name = truncate_preserving_extension(&name, MAX_FILENAME_CHARS);
        }
    }

    name
}

fn last_path_segment(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            urlencoding::decode(segment).map_or_else(|_| segment.to_string(), |d| d.into_owned())
        })
        .unwrap_or_default()
}
