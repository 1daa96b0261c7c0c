use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use serde::Deserialize;

use super::error::LoadError;
use super::loader::load_bundle;
use super::model::DatasetBundle;
use crate::config::DashboardConfig;

// ---------------------------------------------------------------------------
// Invalidation policy
// ---------------------------------------------------------------------------

/// When a cached bundle is considered stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidationPolicy {
    /// Load once; only an explicit [`DatasetCache::invalidate`] reloads.
    Never,
    /// Reload when the modification time of any source file changes.
    #[default]
    ModifiedTime,
}

// ---------------------------------------------------------------------------
// DatasetCache
// ---------------------------------------------------------------------------

struct CacheEntry {
    bundle: Arc<DatasetBundle>,
    /// Modification time of each source, taken just before the load.
    stamps: Vec<Option<SystemTime>>,
}

/// Explicit replacement for a process-wide memoized load.
///
/// Nothing is read until the first [`get_or_load`](Self::get_or_load). The
/// bundle is handed out behind an `Arc` and never mutated; a reload builds a
/// fresh one.
pub struct DatasetCache {
    config: DashboardConfig,
    entry: Option<CacheEntry>,
    /// Source stamps of the last load that failed, cleared by a success.
    failed: Option<Vec<Option<SystemTime>>>,
}

impl DatasetCache {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            entry: None,
            failed: None,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Drop the cached bundle; the next access reloads.
    pub fn invalidate(&mut self) {
        self.failed = None;
        if self.entry.take().is_some() {
            log::debug!("dataset cache invalidated");
        }
    }

    /// Whether the cached bundle is missing or out of date.
    pub fn is_stale(&self) -> bool {
        match (&self.entry, self.config.invalidation) {
            (None, _) => true,
            (Some(_), InvalidationPolicy::Never) => false,
            (Some(entry), InvalidationPolicy::ModifiedTime) => entry.stamps != self.stamps(),
        }
    }

    /// Whether a background poll should load again.
    ///
    /// Same as [`is_stale`](Self::is_stale), except that after a failed load
    /// nothing is retried until a source file changes.
    pub fn needs_refresh(&self) -> bool {
        match &self.failed {
            Some(stamps) if self.entry.is_none() => *stamps != self.stamps(),
            _ => self.is_stale(),
        }
    }

    /// Return the cached bundle, loading it first if it is missing or stale.
    ///
    /// A failed load leaves the cache empty.
    pub fn get_or_load(&mut self) -> Result<Arc<DatasetBundle>, LoadError> {
        if !self.is_stale() {
            if let Some(entry) = &self.entry {
                return Ok(Arc::clone(&entry.bundle));
            }
        }

        if self.entry.take().is_some() {
            log::info!("source files changed, reloading datasets");
        }

        // Stamps first: a write racing the load shows up as stale next time.
        let stamps = self.stamps();
        let bundle = match load_bundle(&self.config) {
            Ok(bundle) => Arc::new(bundle),
            Err(e) => {
                self.failed = Some(stamps);
                return Err(e);
            }
        };
        self.failed = None;
        self.entry = Some(CacheEntry {
            bundle: Arc::clone(&bundle),
            stamps,
        });
        Ok(bundle)
    }

    fn paths(&self) -> Vec<PathBuf> {
        self.config.source_paths()
    }

    fn stamps(&self) -> Vec<Option<SystemTime>> {
        self.paths()
            .iter()
            .map(|p| std::fs::metadata(p).and_then(|m| m.modified()).ok())
            .collect()
    }
}
