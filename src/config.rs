// ABOUTME: Configuration loading for ctxfork.
// ABOUTME: Reads ~/.ctxfork/config.toml, falling back to defaults for anything missing.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::session::{DEFAULT_CONTEXT_DIR, MAX_OPEN_FILES};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub capture: CaptureConfig,
    pub storage: StorageConfig,
}

/// What the collector looks at.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// File extensions (without the dot) treated as candidate open files.
    pub extensions: Vec<String>,
    /// Cap on candidate open files; values above 10 are clamped on load.
    pub max_open_files: usize,
    /// Number of commits requested from `git log`.
    pub recent_commits: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            extensions: ["py", "js", "md", "rs", "ts"]
                .into_iter()
                .map(String::from)
                .collect(),
            max_open_files: MAX_OPEN_FILES,
            recent_commits: 5,
        }
    }
}

/// Where records are written.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Name of the context directory inside the workspace root.
    pub dir_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir_name: DEFAULT_CONTEXT_DIR.to_string(),
        }
    }
}

impl Config {
    /// Load config from ~/.ctxfork/config.toml, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from an explicit path (for testing).
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Parse TOML config text and clamp out-of-range values.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        config.capture.max_open_files = config.capture.max_open_files.min(MAX_OPEN_FILES);
        Ok(config)
    }

    /// Path to the config file.
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".ctxfork")
            .join("config.toml")
    }
}
