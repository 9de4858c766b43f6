//! Pomodoro - memoized translation lookups
//!
//! Caches the results of message-catalog lookups on disk, one file per
//! namespace and catalog, so repeated runs skip parsing the catalog.
//! Cache files are invalidated when the catalog's modification time changes
//! and are published atomically at the end of each unit of work.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod hook;
pub mod maintenance;
pub mod translate;
pub mod ui;

pub use cache::{CacheContext, CacheStore, FinalizeOutcome};
pub use error::{DecodeError, PomodoroError, PomodoroResult};
pub use hook::Translations;
pub use translate::{CatalogLoader, Lookup, TranslationMemoizer, Translator};
