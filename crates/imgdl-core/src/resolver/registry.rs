//! Run-scoped collision set shared by all workers.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{resolve, FilenameCandidate, ResponseMeta};

/// Names already allocated in the output directory for this run.
///
/// Passed explicitly to the fetchers; every resolution and its registration
/// happen under one lock acquisition, so two workers can never receive the
/// same name.
#[derive(Debug, Default)]
pub struct NameRegistry {
    claimed: Mutex<HashSet<String>>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-seeded with every entry name already in `dir`, so files
    /// from earlier runs are never overwritten.
    pub fn from_dir(dir: &Path) -> io::Result<Self> {
        let mut claimed = HashSet::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            claimed.insert(entry.file_name().to_string_lossy().into_owned());
        }
        tracing::debug!(dir = %dir.display(), existing = claimed.len(), "seeded name registry");
        Ok(Self {
            claimed: Mutex::new(claimed),
        })
    }

    /// Resolve a name for `url` and register it atomically.
    pub fn claim(&self, url: &str, meta: &ResponseMeta) -> FilenameCandidate {
        let mut claimed = self.lock();
        let candidate = resolve(url, meta, &claimed);
        claimed.insert(candidate.file_name());
        candidate
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains(name)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        // The set stays consistent even if a holder panicked mid-insert.
        self.claimed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
