//! Configuration schema for Pomodoro
//!
//! Configuration is stored at `~/.config/pomodoro/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Cache settings
    pub cache: CacheConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding cache files (default: platform temp dir)
    pub dir: Option<PathBuf>,

    /// Identifies this install so environments sharing a filesystem do not
    /// share cache files (e.g. the site URL)
    pub deployment_identity: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: None,
            deployment_identity: "default".to_string(),
        }
    }
}
