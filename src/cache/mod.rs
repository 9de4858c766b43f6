//! Persistent translation cache
//!
//! One cache file per (deployment, namespace, source catalog). Files are
//! replaced wholesale on every publish, never patched in place.
//!
//! # Lifecycle
//!
//! | Step | Module | Description |
//! |------|--------|-------------|
//! | Open | `store` | Load the file, drop it if the source mtime moved |
//! | Lookup | `store` | Serve hits, record misses, mark dirty |
//! | Finalize | `store` | Publish when dirty, stale, or never written |
//! | Publish | `commit` | Write `.test` candidate, verify marker, rename |

pub mod codec;
pub mod commit;
pub mod context;
pub mod identity;
pub mod store;

pub use codec::{CacheRecord, SENTINEL};
pub use context::{CacheContext, WriteSuppression};
pub use identity::{CacheFileIdentity, CacheKey};
pub use store::{CacheStore, FinalizeOutcome};
