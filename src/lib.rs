//! link-dl Core Library
//!
//! This library provides the core functionality for the link-dl tool,
//! which discovers downloadable-file links on a single web page and
//! fetches them concurrently with readable, collision-free filenames.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`extract`] - HTML link extraction, URL resolution, and filtering
//! - [`naming`] - Filename sanitization and unique on-disk name allocation
//! - [`fetch`] - HTTP client wrapper with streaming download support
//! - [`download`] - Bounded-concurrency download engine

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
pub mod extract;
pub mod fetch;
pub mod naming;
pub mod user_agent;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use download::{
    DEFAULT_PARALLEL, DownloadEngine, DownloadOutcome, DownloadSummary, EngineError,
};
pub use extract::{Candidate, ExtractError, FilterCriteria, FilterMode, extract, parse_base_url};
pub use fetch::{FetchClient, FetchError};
pub use naming::{UniqueNameAllocator, sanitize_filename};
pub use user_agent::DEFAULT_USER_AGENT;
