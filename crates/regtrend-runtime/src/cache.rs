//! Read-through dataset cache for the dashboard.
//!
//! [`DatasetCache::get`] parses the interchange file once and hands back the
//! same [`Dataset`] until the file's length or modification time changes.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use regtrend_core::error::{RegtrendError, Result};
use regtrend_data::dataset::Dataset;

// ── FileSignature ─────────────────────────────────────────────────────────────

/// Cheap identity of a file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSignature {
    pub len: u64,
    /// `None` on platforms without modification times.
    pub modified: Option<SystemTime>,
}

impl FileSignature {
    pub fn of(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path).map_err(|source| RegtrendError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

// ── DatasetCache ──────────────────────────────────────────────────────────────

/// Memoizes the parsed interchange file.
///
/// # Example
/// ```no_run
/// use regtrend_runtime::cache::DatasetCache;
///
/// let mut cache = DatasetCache::new("data/processed/vehicle_data.csv");
/// let rows = cache.get().map(|ds| ds.len()).unwrap_or(0);
/// println!("{rows} classified rows");
/// ```
pub struct DatasetCache {
    path: PathBuf,
    entry: Option<(FileSignature, Dataset)>,
    /// Number of times the file has actually been parsed.
    loads: usize,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entry: None,
            loads: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the dataset, reparsing only when the file signature changed.
    ///
    /// A failed reload leaves the previous entry in place.
    pub fn get(&mut self) -> Result<&Dataset> {
        let sig = FileSignature::of(&self.path)?;

        let entry = match self.entry.take() {
            Some(entry) if entry.0 == sig => {
                tracing::debug!("reusing cached dataset");
                entry
            }
            stale => match Dataset::load(&self.path) {
                Ok(dataset) => {
                    self.loads += 1;
                    tracing::debug!(loads = self.loads, "dataset cache refreshed");
                    (sig, dataset)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "dataset reload failed");
                    self.entry = stale;
                    return Err(e);
                }
            },
        };

        Ok(&self.entry.insert(entry).1)
    }

    /// The dataset from the last successful load, without touching disk.
    pub fn cached(&self) -> Option<&Dataset> {
        self.entry.as_ref().map(|(_, ds)| ds)
    }

    /// Forget the cached dataset so the next [`get`](Self::get) reparses.
    pub fn invalidate(&mut self) {
        self.entry = None;
        tracing::debug!("cache invalidated");
    }

    pub fn load_count(&self) -> usize {
        self.loads
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
