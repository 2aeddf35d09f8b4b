//! Application configuration and export presets.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, ExportResult};

/// Environment variable naming the engine binary. Takes precedence over the
/// config file.
pub const ENGINE_BINARY_ENV: &str = "GDMOVIE_GODOT";

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "GDMOVIE_CONFIG";

/// Engine binary looked up on `PATH` when nothing else is configured.
pub const DEFAULT_ENGINE_BINARY: &str = "godot";

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Engine executable used for movie rendering.
    #[serde(default)]
    pub engine_binary: Option<PathBuf>,

    /// Named export presets.
    #[serde(default)]
    pub presets: BTreeMap<String, ExportPreset>,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Raw option values of a named export preset.
///
/// Values are stored as the user wrote them; typing and range checks
/// happen when a request is built from the preset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExportPreset {
    /// Fixed frame rate, `0` lets the engine pace itself.
    #[serde(default)]
    pub fps: u32,

    /// Forced render resolution as `[width, height]`, `[0, 0]` for none.
    #[serde(default)]
    pub resolution_override: [u32; 2],

    /// Arguments passed to the engine unfiltered.
    #[serde(default)]
    pub additional_arguments: Vec<String>,

    /// Logging tier: -1 quiet, 0 unset, 1 print fps, 2 verbose.
    #[serde(default)]
    pub verbosity: i64,

    /// Keep the engine console open after it exits.
    #[serde(default)]
    pub keep_open: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "gdmovie=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> ExportResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            ExportError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            ExportError::config(format!("failed to parse {}: {e}", path.display()))
        })
    }

    /// Look up a preset by name.
    pub fn preset(&self, name: &str) -> Option<&ExportPreset> {
        self.presets.get(name)
    }

    /// Resolve the engine binary: explicit override, then environment,
    /// then config file, then `godot` on `PATH`.
    pub fn resolve_engine_binary(&self, explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        if let Some(value) = std::env::var_os(ENGINE_BINARY_ENV).filter(|v| !v.is_empty()) {
            return PathBuf::from(value);
        }
        self.engine_binary
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ENGINE_BINARY))
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("gdmovie").join("config.json")
}
