//! On-disk cache file format
//!
//! A cache file is a TOML document binding, in order, the source catalog
//! modification time, the namespace and the entry table, followed by a
//! comment line carrying the end marker:
//!
//! ```text
//! mtime = 1000
//! namespace = "my-plugin"
//!
//! [entries]
//! 3b0c...e1 = "Bonjour"
//! # POMODORO_END_e867edfb-4a36-4643-8ad4-b95507068e44
//! ```
//!
//! The marker is the last byte sequence in the file (no trailing newline) so
//! a writer can confirm completion by reading only the tail.

use crate::error::{DecodeError, PomodoroResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cache file end marker
pub const SENTINEL: &str = "POMODORO_END_e867edfb-4a36-4643-8ad4-b95507068e44";

/// Comment delimiter that keeps the marker inert when the file is parsed
const SENTINEL_PREFIX: &str = "# ";

/// Persisted cache record for one (source catalog, namespace) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Modification time of the source catalog, seconds since the epoch
    #[serde(rename = "mtime")]
    pub source_mtime: i64,

    /// Namespace the entries belong to
    pub namespace: String,

    /// Cache key -> translated string
    #[serde(default)]
    pub entries: BTreeMap<String, String>,
}

impl CacheRecord {
    /// Create an empty record
    pub fn new(source_mtime: i64, namespace: impl Into<String>) -> Self {
        Self {
            source_mtime,
            namespace: namespace.into(),
            entries: BTreeMap::new(),
        }
    }
}

/// Serialize a record followed by the end marker
pub fn encode(record: &CacheRecord) -> PomodoroResult<Vec<u8>> {
    let mut out = toml::to_string(record)?;
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(SENTINEL_PREFIX);
    out.push_str(SENTINEL);
    Ok(out.into_bytes())
}

/// Parse a cache file
///
/// The end marker is checked before parsing: a file without it was not
/// written to completion and is rejected even if the remainder parses.
pub fn decode(bytes: &[u8]) -> Result<CacheRecord, DecodeError> {
    let text = std::str::from_utf8(bytes).map_err(|_| DecodeError::NotUtf8)?;

    let body = text
        .strip_suffix(SENTINEL)
        .and_then(|rest| rest.strip_suffix(SENTINEL_PREFIX))
        .ok_or(DecodeError::MissingSentinel)?;

    // The marker has to sit on its own line, outside any value
    if !body.is_empty() && !body.ends_with('\n') {
        return Err(DecodeError::MissingSentinel);
    }

    toml::from_str(body).map_err(|e| DecodeError::Malformed {
        line: e.span().map_or(1, |span| line_of(body, span.start)),
        message: e.message().trim().to_string(),
    })
}

/// Whether `tail` is exactly the end marker
pub fn is_sentinel(tail: &[u8]) -> bool {
    tail == SENTINEL.as_bytes()
}

fn line_of(text: &str, offset: usize) -> usize {
    let end = offset.min(text.len());
    text.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}
