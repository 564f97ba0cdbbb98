//! Error types for the extraction pipeline.
//!
//! All variants are fatal to the whole run and surface before any page
//! content is processed: the base URL is parsed and the include pattern
//! compiled up front, so a bad pattern never wastes a page fetch.

use thiserror::Error;

/// Errors that can occur while preparing a link extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The page URL could not be parsed as an absolute URL.
    #[error("invalid page URL {url}: {source}")]
    InvalidBaseUrl {
        /// The unparseable URL string.
        url: String,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },

    /// The include pattern is not a valid regular expression.
    #[error("invalid include pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// The rejected pattern string.
        pattern: String,
        /// The underlying regex compile error.
        #[source]
        source: regex::Error,
    },
}

impl ExtractError {
    /// Creates an invalid base URL error.
    pub fn invalid_base_url(url: impl Into<String>, source: url::ParseError) -> Self {
        Self::InvalidBaseUrl {
            url: url.into(),
            source,
        }
    }

    /// Creates an invalid include pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }
}
