//! Cache key and cache file naming
//!
//! Both are SHA256 digests over a JSON encoding of their inputs, so compound
//! arguments (text + context, text + count + context) cannot collide by
//! concatenation.

use serde::Serialize;
use serde_json::json;
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};

/// File extension of published cache files
pub const CACHE_EXTENSION: &str = "mocache";

/// Suffix appended to a cache file path while it is being written
pub const CANDIDATE_SUFFIX: &str = ".test";

/// Separator between the readable namespace prefix and the digest
const NAME_SEPARATOR: &str = "--";

/// Longest namespace prefix kept in a file name
const MAX_PREFIX_LEN: usize = 64;

/// Fixed-length key into a cache entry map
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Compute the key for `args` looked up in `namespace`
    pub fn compute<A: Serialize + ?Sized>(args: &A, namespace: &str) -> Self {
        Self(digest(&json!([args, namespace])))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Location of the cache file for one (deployment, namespace, source) triple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheFileIdentity {
    file_name: String,
}

impl CacheFileIdentity {
    pub fn new(deployment: &str, namespace: &str, source: &Path) -> Self {
        let hash = digest(&json!([deployment, namespace, source.to_string_lossy()]));
        Self {
            file_name: format!(
                "{}{}{}.{}",
                sanitize_namespace(namespace),
                NAME_SEPARATOR,
                &hash[..32],
                CACHE_EXTENSION
            ),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Path of the published cache file inside `dir`
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(&self.file_name)
    }
}

/// Reduce a namespace to characters safe in a file name on every platform
pub fn sanitize_namespace(namespace: &str) -> String {
    let cleaned: String = namespace
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .take(MAX_PREFIX_LEN)
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "default".to_string()
    } else {
        cleaned.to_string()
    }
}

/// File name prefix shared by every cache file of `namespace`
pub fn namespace_prefix(namespace: &str) -> String {
    format!("{}{}", sanitize_namespace(namespace), NAME_SEPARATOR)
}

/// Path of the in-progress candidate for `target`
pub fn candidate_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_os_string();
    name.push(CANDIDATE_SUFFIX);
    PathBuf::from(name)
}

fn digest(value: &serde_json::Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.to_string().as_bytes());
    hex::encode(hasher.finalize())
}
