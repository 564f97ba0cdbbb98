//! Download engine for concurrent fetch-and-save of extracted candidates.
//!
//! # Concurrency Model
//!
//! - Each candidate runs in its own Tokio task
//! - A semaphore permit is acquired before a task is spawned, so at most
//!   `parallel` fetches are in flight
//! - Permits are released automatically when tasks complete (RAII)
//! - Completion order is arbitrary; the aggregate tally is exact
//!   regardless of interleaving
//!
//! # Failure Semantics
//!
//! Failures are independent: one candidate's failure never aborts
//! others, and there are no retries. The engine itself only fails on
//! infrastructure errors (closed semaphore), never on per-candidate
//! download errors.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::extract::Candidate;
use crate::fetch::{FetchClient, FetchError};
use crate::naming::UniqueNameAllocator;

/// Minimum allowed parallelism value.
const MIN_PARALLEL: usize = 1;

/// Maximum allowed parallelism value.
const MAX_PARALLEL: usize = 100;

/// Default number of concurrent downloads if not specified.
pub const DEFAULT_PARALLEL: usize = 5;

/// Error type for download engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid parallelism value provided.
    #[error("invalid parallelism value {value}: must be between {MIN_PARALLEL} and {MAX_PARALLEL}")]
    InvalidParallelism {
        /// The invalid value that was provided.
        value: usize,
    },

    /// Semaphore was closed unexpectedly.
    #[error("semaphore closed unexpectedly")]
    SemaphoreClosed,
}

/// Result of one candidate's download attempt.
#[derive(Debug)]
pub struct DownloadOutcome {
    /// Final on-disk filename allocated for this candidate.
    pub filename: String,
    /// The candidate's resolved URL.
    pub url: String,
    /// The failure, if the download did not succeed.
    pub error: Option<FetchError>,
}

impl DownloadOutcome {
    /// Returns true when the download completed successfully.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate success/failure counts for a download run.
///
/// Uses atomic counters so concurrent tasks can update the tally without
/// extra locking.
#[derive(Debug, Default)]
pub struct DownloadSummary {
    success: AtomicUsize,
    failed: AtomicUsize,
}

impl DownloadSummary {
    fn new() -> Self {
        Self::default()
    }

    /// Returns the number of successful downloads.
    #[must_use]
    pub fn success(&self) -> usize {
        self.success.load(Ordering::SeqCst)
    }

    /// Returns the number of failed downloads.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Returns the total number of candidates processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.success() + self.failed()
    }

    fn increment_success(&self) {
        self.success.fetch_add(1, Ordering::SeqCst);
    }

    fn increment_failed(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Concurrent download engine with a fixed parallelism cap.
#[derive(Debug)]
pub struct DownloadEngine {
    semaphore: Arc<Semaphore>,
    parallel: usize,
}

impl DownloadEngine {
    /// Creates an engine with the given parallelism cap (1-100).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidParallelism`] if the value is outside
    /// the valid range.
    pub fn new(parallel: usize) -> Result<Self, EngineError> {
        if !(MIN_PARALLEL..=MAX_PARALLEL).contains(&parallel) {
            return Err(EngineError::InvalidParallelism { value: parallel });
        }
        debug!(parallel, "creating download engine");
        Ok(Self {
            semaphore: Arc::new(Semaphore::new(parallel)),
            parallel,
        })
    }

    /// Returns the configured parallelism cap.
    #[must_use]
    pub fn parallel(&self) -> usize {
        self.parallel
    }

    /// Downloads every candidate into `output_dir`, at most `parallel` at
    /// a time, invoking `report` once per candidate as it completes.
    ///
    /// Per candidate: acquire a pool slot, ask the allocator for a final
    /// filename, stream the body to `output_dir/final_name`, and record
    /// the outcome. Completion order is arbitrary.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SemaphoreClosed`] if the semaphore is closed.
    /// Individual download failures do NOT cause this method to error;
    /// they are reported through `report` and counted in the summary.
    pub async fn run<F>(
        &self,
        candidates: Vec<Candidate>,
        client: &FetchClient,
        allocator: &Arc<UniqueNameAllocator>,
        output_dir: &Path,
        report: F,
    ) -> Result<DownloadSummary, EngineError>
    where
        F: Fn(&DownloadOutcome) + Send + Sync + 'static,
    {
        let summary = Arc::new(DownloadSummary::new());
        let report = Arc::new(report);
        let mut handles = Vec::with_capacity(candidates.len());

        info!(
            candidates = candidates.len(),
            parallel = self.parallel,
            "starting downloads"
        );

        for candidate in candidates {
            // Blocks here when the pool is saturated.
            let permit = self
                .semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| EngineError::SemaphoreClosed)?;

            let client = client.clone();
            let allocator = Arc::clone(allocator);
            let summary = Arc::clone(&summary);
            let report = Arc::clone(&report);
            let output_dir = output_dir.to_path_buf();

            handles.push(tokio::spawn(async move {
                // Permit is dropped when this block exits (RAII).
                let _permit = permit;

                let filename = allocator.allocate(&output_dir, &candidate.name);
                let target = output_dir.join(&filename);

                let outcome = match client.download_to_path(&candidate.url, &target).await {
                    Ok(bytes) => {
                        debug!(filename = %filename, bytes, "download completed");
                        summary.increment_success();
                        DownloadOutcome {
                            filename,
                            url: candidate.url,
                            error: None,
                        }
                    }
                    Err(e) => {
                        warn!(filename = %filename, url = %candidate.url, error = %e, "download failed");
                        summary.increment_failed();
                        DownloadOutcome {
                            filename,
                            url: candidate.url,
                            error: Some(e),
                        }
                    }
                };

                report(&outcome);
            }));
        }

        for handle in handles {
            // Task panics are logged but don't fail the batch.
            if let Err(e) = handle.await {
                warn!(error = %e, "download task panicked");
            }
        }

        info!(
            success = summary.success(),
            failed = summary.failed(),
            "downloads complete"
        );

        // All tasks are done, so we should have sole ownership of the
        // summary. If not, rebuild it from the atomic values.
        match Arc::try_unwrap(summary) {
            Ok(summary) => Ok(summary),
            Err(shared) => {
                let rebuilt = DownloadSummary::new();
                rebuilt.success.store(shared.success(), Ordering::SeqCst);
                rebuilt.failed.store(shared.failed(), Ordering::SeqCst);
                Ok(rebuilt)
            }
        }
    }
}
