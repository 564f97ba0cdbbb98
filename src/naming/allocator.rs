//! Concurrent-safe allocation of unique on-disk filenames.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use super::split_extension;

/// Hands out final filenames that are guaranteed unique within one run
/// and against files already present in the target directory.
///
/// The allocator keeps a per-base-name request counter and the set of
/// names already handed out behind one mutex. Each allocation performs
/// the whole check-and-reserve step inside the critical section, so two
/// workers can never be handed the same name even before either file
/// hits the disk. Only the naming decision is serialized; the transfer
/// itself happens outside the lock.
///
/// The numbered search resumes from the in-run counter rather than from
/// 1, mirroring the on-disk probe order: `name.pdf`, `name_2.pdf`,
/// `name_3.pdf`, ...
#[derive(Debug, Default)]
pub struct UniqueNameAllocator {
    state: Mutex<AllocatorState>,
}

#[derive(Debug, Default)]
struct AllocatorState {
    counters: HashMap<String, u64>,
    reserved: HashSet<String>,
}

impl UniqueNameAllocator {
    /// Creates an allocator with no names reserved.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a filename for `desired` that collides neither with a name
    /// handed out earlier in this run nor with a file already in `dir`.
    ///
    /// The first request for a base name returns it unchanged when no such
    /// file exists on disk and the name has not been handed out before.
    /// All other requests search `{stem}_{n}{ext}` for increasing `n`
    /// until an unused name is found. Every returned name is recorded, so
    /// a later direct request for a numbered name cannot re-claim it while
    /// its transfer is still in flight.
    ///
    /// External writers racing the directory between the existence check
    /// and the file creation are out of scope.
    #[must_use]
    pub fn allocate(&self, dir: &Path, desired: &str) -> String {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let count = state.counters.get(desired).copied().unwrap_or(0);
        state.counters.insert(desired.to_string(), count + 1);

        if count == 0 && !state.reserved.contains(desired) && !dir.join(desired).exists() {
            state.reserved.insert(desired.to_string());
            return desired.to_string();
        }

        let (stem, ext) = split_extension(desired);
        let mut n = count + 1;
        loop {
            let candidate = format!("{stem}_{n}{ext}");
            if !state.reserved.contains(&candidate) && !dir.join(&candidate).exists() {
                debug!(desired, final_name = %candidate, "resolved name collision");
                state.reserved.insert(candidate.clone());
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_first_allocation_returns_name_unchanged() {
        let dir = TempDir::new().unwrap();
        let allocator = UniqueNameAllocator::new();
        assert_eq!(allocator.allocate(dir.path(), "report.pdf"), "report.pdf");
    }

    #[test]
    fn test_repeat_allocations_are_pairwise_distinct() {
        let dir = TempDir::new().unwrap();
        let allocator = UniqueNameAllocator::new();

        let mut names = HashSet::new();
        for _ in 0..5 {
            assert!(names.insert(allocator.allocate(dir.path(), "report.pdf")));
        }
        assert!(names.contains("report.pdf"));
        assert!(names.contains("report_2.pdf"));
    }

    #[test]
    fn test_pre_existing_file_forces_numbered_name() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("report.pdf"), b"existing").unwrap();

        let allocator = UniqueNameAllocator::new();
        assert_eq!(allocator.allocate(dir.path(), "report.pdf"), "report_1.pdf");
    }

    #[test]
    fn test_numbered_search_skips_existing_suffixes() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("report.pdf"), b"1").unwrap();
        std::fs::write(dir.path().join("report_1.pdf"), b"2").unwrap();
        std::fs::write(dir.path().join("report_2.pdf"), b"3").unwrap();

        let allocator = UniqueNameAllocator::new();
        assert_eq!(allocator.allocate(dir.path(), "report.pdf"), "report_3.pdf");
    }

    #[test]
    fn test_handed_out_numbered_name_cannot_be_reclaimed() {
        let dir = TempDir::new().unwrap();
        let allocator = UniqueNameAllocator::new();

        assert_eq!(allocator.allocate(dir.path(), "report.pdf"), "report.pdf");
        assert_eq!(allocator.allocate(dir.path(), "report.pdf"), "report_2.pdf");

        // Nothing is on disk yet, so only the reservation record can stop
        // a direct request for the numbered name from colliding.
        assert_eq!(
            allocator.allocate(dir.path(), "report_2.pdf"),
            "report_2_1.pdf"
        );
    }

    #[test]
    fn test_allocation_without_extension() {
        let dir = TempDir::new().unwrap();
        let allocator = UniqueNameAllocator::new();

        assert_eq!(allocator.allocate(dir.path(), "README"), "README");
        assert_eq!(allocator.allocate(dir.path(), "README"), "README_2");
    }

    #[test]
    fn test_distinct_base_names_do_not_interfere() {
        let dir = TempDir::new().unwrap();
        let allocator = UniqueNameAllocator::new();

        assert_eq!(allocator.allocate(dir.path(), "a.pdf"), "a.pdf");
        assert_eq!(allocator.allocate(dir.path(), "b.pdf"), "b.pdf");
    }

    #[test]
    fn test_concurrent_allocations_never_collide() {
        let dir = TempDir::new().unwrap();
        let allocator = Arc::new(UniqueNameAllocator::new());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let allocator = Arc::clone(&allocator);
            let dir_path = dir.path().to_path_buf();
            handles.push(std::thread::spawn(move || {
                (0..10)
                    .map(|_| allocator.allocate(&dir_path, "shared.xlsx"))
                    .collect::<Vec<_>>()
            }));
        }

        let mut all = HashSet::new();
        for handle in handles {
            for name in handle.join().unwrap() {
                assert!(all.insert(name.clone()), "duplicate name handed out: {name}");
            }
        }
        assert_eq!(all.len(), 80);
    }
}
