//! Time-bounded cache in front of a [`CodeIndex`].
//!
//! Entries are immutable snapshots keyed by the absolute form of the indexed
//! path. A refresh swaps the whole entry, so a reader sees either the old
//! node list or the new one, never a mix. Two requests missing on the same
//! key may both parse; the later write wins.

use crate::indexer::CodeIndex;
use crate::model::Node;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug)]
struct CacheEntry {
    nodes: Arc<Vec<Node>>,
    stored_at: Instant,
}

pub struct CachedIndexer<I> {
    inner: I,
    ttl: Duration,
    entries: DashMap<PathBuf, Arc<CacheEntry>>,
}

impl<I: CodeIndex> CachedIndexer<I> {
    pub fn new(inner: I, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: DashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Drop the entry for `path`, if any.
    pub fn invalidate(&self, path: &Path) -> bool {
        self.entries.remove(&cache_key(path)).is_some()
    }

    /// Drop every expired entry and return how many were removed.
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| self.is_fresh(entry));
        before.saturating_sub(self.entries.len())
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        entry.stored_at.elapsed() < self.ttl
    }

    fn lookup(&self, key: &Path) -> Option<Arc<Vec<Node>>> {
        // Clone the entry out so the shard lock is released immediately.
        let entry = self.entries.get(key).map(|entry| Arc::clone(entry.value()))?;
        if self.is_fresh(&entry) {
            return Some(Arc::clone(&entry.nodes));
        }
        // Another request may have refreshed the key in between.
        self.entries.remove_if(key, |_, current| !self.is_fresh(current));
        None
    }
}

impl<I: CodeIndex> CodeIndex for CachedIndexer<I> {
    fn index(&self, path: &Path) -> Arc<Vec<Node>> {
        let key = cache_key(path);
        if let Some(nodes) = self.lookup(&key) {
            debug!(path = %key.display(), "cache hit");
            return nodes;
        }
        debug!(path = %key.display(), "cache miss");
        // Parse outside any map lock; misses on other keys proceed in parallel.
        let nodes = self.inner.index(&key);
        let entry = Arc::new(CacheEntry {
            nodes: Arc::clone(&nodes),
            stored_at: Instant::now(),
        });
        let purged = self.purge_expired();
        if purged > 0 {
            debug!(purged, "dropped expired cache entries");
        }
        self.entries.insert(key, entry);
        nodes
    }
}

/// Absolute, platform-normalized cache key for `path`.
pub fn cache_key(path: &Path) -> PathBuf {
    let abs = crate::util::absolute_path(path);
    if cfg!(windows) {
        PathBuf::from(abs.to_string_lossy().to_lowercase())
    } else {
        abs
    }
}
