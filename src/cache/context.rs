//! Resolved cache settings shared by every store in a process

use crate::config::Config;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Environment variable overriding the configured cache directory
pub const CACHE_DIR_ENV: &str = "POMODORO_CACHE_DIR";

/// Switch that stops stores from publishing on finalize
///
/// Clones share the same flag. Maintenance operations raise it so that
/// stores finalized later in the same run do not recreate what was removed.
#[derive(Debug, Clone, Default)]
pub struct WriteSuppression(Arc<AtomicBool>);

impl WriteSuppression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress all further cache writes for this run
    pub fn suppress(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_suppressed(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Cache directory, deployment identity and write switch for one process
#[derive(Debug, Clone)]
pub struct CacheContext {
    dir: PathBuf,
    deployment: String,
    suppression: WriteSuppression,
}

impl CacheContext {
    /// Build a context for an explicit directory
    pub fn new(dir: impl Into<PathBuf>, deployment: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            deployment: deployment.into(),
            suppression: WriteSuppression::new(),
        }
    }

    /// Resolve the cache directory
    ///
    /// An explicit `dir_override` wins, then `POMODORO_CACHE_DIR`, then
    /// `cache.dir`. If the chosen directory cannot be created the platform
    /// temporary directory is used instead.
    pub fn resolve(config: &Config, dir_override: Option<PathBuf>) -> Self {
        let configured = dir_override
            .or_else(|| {
                std::env::var_os(CACHE_DIR_ENV)
                    .filter(|v| !v.is_empty())
                    .map(PathBuf::from)
            })
            .or_else(|| config.cache.dir.clone());

        let dir = match configured {
            Some(dir) => match std::fs::create_dir_all(&dir) {
                Ok(()) => dir,
                Err(e) => {
                    warn!(
                        "Cannot use cache directory {}: {}; falling back to temp dir",
                        dir.display(),
                        e
                    );
                    Self::default_dir()
                }
            },
            None => Self::default_dir(),
        };

        debug!("Cache directory: {}", dir.display());
        Self::new(dir, config.cache.deployment_identity.clone())
    }

    /// Platform default cache directory
    pub fn default_dir() -> PathBuf {
        let dir = std::env::temp_dir().join("pomodoro");
        if let Err(e) = std::fs::create_dir_all(&dir) {
            warn!("Failed to create {}: {}", dir.display(), e);
        }
        dir
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    pub fn suppression(&self) -> &WriteSuppression {
        &self.suppression
    }
}
