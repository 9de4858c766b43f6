//! Verified, atomic publication of cache files
//!
//! A candidate is written next to the target (`<target>.test`) under an
//! exclusive lock, its tail is read back and compared against the end
//! marker, and only then is it renamed over the target. A crash or a full
//! disk leaves at most a stale candidate behind; the published file is
//! either the previous version or the complete new one.

use crate::cache::codec::{self, SENTINEL};
use crate::cache::identity::candidate_path;
use crate::error::{PomodoroError, PomodoroResult};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::{debug, info, warn};

/// Publish `bytes` at `target`
///
/// Returns [`PomodoroError::CommitVerification`] when the written candidate
/// does not end with the marker. The target is left untouched in that case.
pub fn commit(target: &Path, bytes: &[u8]) -> PomodoroResult<()> {
    let candidate = candidate_path(target);

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            PomodoroError::io(format!("creating cache directory {}", parent.display()), e)
        })?;
    }

    if let Err(e) = write_locked(&candidate, bytes) {
        discard(&candidate);
        return Err(PomodoroError::io(
            format!("writing cache candidate {}", candidate.display()),
            e,
        ));
    }

    match has_end_marker(&candidate) {
        Ok(true) => {}
        Ok(false) => {
            warn!("{} is missing its end marker, discarding", candidate.display());
            discard(&candidate);
            return Err(PomodoroError::CommitVerification {
                path: candidate,
            });
        }
        Err(e) => {
            discard(&candidate);
            return Err(PomodoroError::io(
                format!("verifying cache candidate {}", candidate.display()),
                e,
            ));
        }
    }

    fs::rename(&candidate, target).map_err(|e| {
        discard(&candidate);
        PomodoroError::io(
            format!("publishing {} -> {}", candidate.display(), target.display()),
            e,
        )
    })?;

    info!("Published cache file {} ({} bytes)", target.display(), bytes.len());
    Ok(())
}

/// Write the candidate while holding an exclusive lock on it
fn write_locked(candidate: &Path, bytes: &[u8]) -> std::io::Result<()> {
    // Truncate only after the lock is held so a concurrent writer is not clobbered mid-write
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(candidate)?;
    file.lock_exclusive()?;

    let result = (|| -> std::io::Result<()> {
        file.set_len(0)?;
        file.write_all(bytes)?;
        file.sync_all()
    })();

    let _ = FileExt::unlock(&file);
    result
}

/// Read back the last marker-length bytes of `path`
fn has_end_marker(path: &Path) -> std::io::Result<bool> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    let marker_len = SENTINEL.len() as u64;
    if len < marker_len {
        return Ok(false);
    }

    file.seek(SeekFrom::End(-(marker_len as i64)))?;
    let mut tail = Vec::with_capacity(SENTINEL.len());
    file.read_to_end(&mut tail)?;
    Ok(codec::is_sentinel(&tail))
}

fn discard(candidate: &Path) {
    match fs::remove_file(candidate) {
        Ok(()) => debug!("Removed candidate {}", candidate.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove candidate {}: {}", candidate.display(), e),
    }
}
