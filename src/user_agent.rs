//! Default User-Agent string for page and file requests.
//!
//! Many document hosts serve different content (or refuse outright) when
//! they see a non-browser User-Agent, so the default identifies as a
//! mainstream browser. Override with `--ua` for good-citizen crawling.

/// Default User-Agent sent with every request (page fetch and downloads).
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
