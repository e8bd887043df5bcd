//! Editor configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no
//! file at all) yields the stock editor behaviour.
//!
//! ```toml
//! [history]
//! max_size = 50
//!
//! [autosave]
//! delay_ms = 2000
//! enabled = true
//! ```

use crate::history::DEFAULT_MAX_HISTORY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use studio_core::{StudioError, StudioResult};

/// Environment variable naming a config file to load
pub const CONFIG_ENV_VAR: &str = "SCHEMA_STUDIO_CONFIG";

/// Default autosave debounce delay
pub const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 2000;

// ============================================================================
// EditorConfig
// ============================================================================

/// Top-level editor configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Undo/redo settings
    pub history: HistoryConfig,

    /// Autosave settings
    pub autosave: AutosaveConfig,
}

/// Undo/redo settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of snapshots kept
    pub max_size: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_HISTORY,
        }
    }
}

/// Autosave settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutosaveConfig {
    /// Quiet period after the last change before a save is attempted
    pub delay_ms: u64,

    /// Whether autosave runs at all
    pub enabled: bool,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_AUTOSAVE_DELAY_MS,
            enabled: true,
        }
    }
}

impl AutosaveConfig {
    /// The debounce delay as a `Duration`
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl EditorConfig {
    /// Parse a TOML document
    pub fn from_toml(source: &str) -> StudioResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| StudioError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> StudioResult<String> {
        toml::to_string_pretty(self).map_err(|e| StudioError::InvalidConfig(e.to_string()))
    }

    /// Load a config file
    pub fn load(path: impl AsRef<Path>) -> StudioResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| StudioError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&source)
    }

    /// Load from an explicit path, else from `SCHEMA_STUDIO_CONFIG`, else
    /// fall back to defaults
    pub fn discover(explicit: Option<&Path>) -> StudioResult<Self> {
        let from_env = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> StudioResult<()> {
        if self.history.max_size == 0 {
            return Err(StudioError::InvalidConfig(
                "history.max_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Override the history bound
    pub fn with_max_history(mut self, max_size: usize) -> Self {
        self.history.max_size = max_size;
        self
    }

    /// Override the autosave delay
    pub fn with_autosave_delay(mut self, delay_ms: u64) -> Self {
        self.autosave.delay_ms = delay_ms;
        self
    }

    /// Turn autosave on or off
    pub fn with_autosave_enabled(mut self, enabled: bool) -> Self {
        self.autosave.enabled = enabled;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
