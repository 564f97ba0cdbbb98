//! Bounded-concurrency download engine.
//!
//! The engine fetches a candidate list in parallel under a semaphore
//! cap, allocating a unique on-disk filename per item before writing,
//! and reports one outcome per candidate plus an aggregate tally.

mod engine;

pub use engine::{
    DEFAULT_PARALLEL, DownloadEngine, DownloadOutcome, DownloadSummary, EngineError,
};
