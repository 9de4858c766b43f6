//! Per-namespace cache store
//!
//! A store lives for one unit of work: it is opened against a source catalog,
//! answers lookups from the entries persisted by earlier runs, records new
//! values on misses, and is finalized exactly once. Finalizing publishes the
//! whole record through [`commit`](super::commit::commit) when anything
//! changed, or when no cache file existed yet.
//!
//! Entries persisted for a different source modification time are discarded
//! on open; the source catalog is treated as immutable between mtime changes.

use crate::cache::codec::{self, CacheRecord};
use crate::cache::commit;
use crate::cache::context::{CacheContext, WriteSuppression};
use crate::cache::identity::{CacheFileIdentity, CacheKey};
use crate::error::{PomodoroError, PomodoroResult};
use std::collections::btree_map::Entry;
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// What [`CacheStore::finalize`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// Nothing to write
    Unchanged,
    /// A write was due but writes are suppressed for this run
    Suppressed,
    /// The record was published
    Published,
    /// The write failed; the previous cache file is untouched
    Failed,
}

/// In-memory cache for one (source catalog, namespace) pair
#[derive(Debug)]
pub struct CacheStore {
    path: PathBuf,
    record: CacheRecord,
    /// Set by the first recorded miss
    dirty: bool,
    /// A persisted record existed but was stale or unreadable
    invalidated: bool,
    file_existed: bool,
    suppression: WriteSuppression,
    finalized: bool,
}

impl CacheStore {
    /// Open the store for `namespace` backed by the catalog at `source`
    ///
    /// Fails only when the source catalog itself cannot be read. Any problem
    /// with the cache file results in an empty store.
    pub fn open(ctx: &CacheContext, source: &Path, namespace: &str) -> PomodoroResult<Self> {
        let mtime = source_mtime(source)?;
        let identity = CacheFileIdentity::new(ctx.deployment(), namespace, source);
        let path = identity.path_in(ctx.dir());

        let mut store = Self {
            path,
            record: CacheRecord::new(mtime, namespace),
            dirty: false,
            invalidated: false,
            file_existed: false,
            suppression: ctx.suppression().clone(),
            finalized: false,
        };
        store.load();
        Ok(store)
    }

    fn load(&mut self) {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No cache file at {}", self.path.display());
                return;
            }
            Err(e) => {
                warn!("Failed to read cache file {}: {}", self.path.display(), e);
                self.file_existed = true;
                self.invalidated = true;
                return;
            }
        };
        self.file_existed = true;

        match codec::decode(&bytes) {
            Ok(persisted)
                if persisted.source_mtime == self.record.source_mtime
                    && persisted.namespace == self.record.namespace =>
            {
                debug!(
                    "Loaded {} entries from {}",
                    persisted.entries.len(),
                    self.path.display()
                );
                self.record = persisted;
            }
            Ok(persisted) => {
                debug!(
                    "Cache file {} is stale (mtime {} != {}), starting empty",
                    self.path.display(),
                    persisted.source_mtime,
                    self.record.source_mtime
                );
                self.invalidated = true;
            }
            Err(e) => {
                warn!("Discarding cache file {}: {}", self.path.display(), e);
                self.invalidated = true;
            }
        }
    }

    /// Cached value for `key`
    pub fn lookup(&self, key: &CacheKey) -> Option<&str> {
        self.record.entries.get(key.as_str()).map(String::as_str)
    }

    /// Record a computed value
    ///
    /// An existing entry is never replaced, and storing one again does not
    /// mark the store dirty.
    pub fn store(&mut self, key: CacheKey, value: String) {
        if let Entry::Vacant(slot) = self.record.entries.entry(key.as_str().to_owned()) {
            slot.insert(value);
            self.dirty = true;
        }
    }

    /// Whether finalizing would write the cache file
    pub fn should_persist(&self) -> bool {
        self.dirty || self.invalidated || (self.record.entries.is_empty() && !self.file_existed)
    }

    /// Publish the record if needed and close the store
    pub fn finalize(mut self) -> FinalizeOutcome {
        self.persist()
    }

    fn persist(&mut self) -> FinalizeOutcome {
        if self.finalized {
            return FinalizeOutcome::Unchanged;
        }
        self.finalized = true;

        if !self.should_persist() {
            return FinalizeOutcome::Unchanged;
        }

        if self.suppression.is_suppressed() {
            debug!("Cache writes suppressed, not writing {}", self.path.display());
            return FinalizeOutcome::Suppressed;
        }

        let result = codec::encode(&self.record).and_then(|bytes| commit::commit(&self.path, &bytes));
        match result {
            Ok(()) => FinalizeOutcome::Published,
            Err(e) => {
                warn!("Cache for {} not saved: {}", self.record.namespace, e);
                FinalizeOutcome::Failed
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn namespace(&self) -> &str {
        &self.record.namespace
    }

    pub fn source_mtime(&self) -> i64 {
        self.record.source_mtime
    }

    pub fn len(&self) -> usize {
        self.record.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record.entries.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

impl Drop for CacheStore {
    fn drop(&mut self) {
        if !self.finalized {
            self.persist();
        }
    }
}

/// Modification time of a readable source catalog, in whole seconds
pub fn source_mtime(source: &Path) -> PomodoroResult<i64> {
    let unreadable = |source_err| PomodoroError::SourceUnreadable {
        path: source.to_path_buf(),
        source: source_err,
    };

    let file = File::open(source).map_err(unreadable)?;
    let modified = file
        .metadata()
        .and_then(|m| m.modified())
        .map_err(unreadable)?;

    Ok(epoch_seconds(modified))
}

fn epoch_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs() as i64,
        Err(e) => -(e.duration().as_secs() as i64),
    }
}
