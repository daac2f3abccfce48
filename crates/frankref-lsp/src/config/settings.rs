//! Configuration Settings
//!
//! Defines the configuration structures and how they are located on disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// File names probed, in order, when discovering settings in a workspace root
pub const CONFIG_FILE_NAMES: [&str; 2] = ["frankref.toml", ".frankref.toml"];

/// Errors raised while loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level settings structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Which files make up the workspace
    pub workspace: WorkspaceSettings,
    /// Which reference checks run
    pub rules: RuleSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load settings from an explicit file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Find a config file in `root`, falling back to defaults when there is none
    pub fn discover(root: &Path) -> Result<Self, ConfigError> {
        for name in CONFIG_FILE_NAMES {
            let candidate = root.join(name);
            if candidate.is_file() {
                debug!("Loading settings from {}", candidate.display());
                return Self::from_file(&candidate);
            }
        }
        Ok(Self::default())
    }
}

/// Workspace configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorkspaceSettings {
    /// Glob patterns (relative to the root) of configuration files
    pub include: Vec<String>,
    /// Glob patterns excluded from the scan (dependency and build output dirs)
    pub exclude: Vec<String>,
    /// Editor language ids the server validates
    pub language_ids: Vec<String>,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            include: vec!["**/*.xml".to_string()],
            exclude: vec![
                "**/node_modules/**".to_string(),
                "**/target/**".to_string(),
                "**/.git/**".to_string(),
            ],
            language_ids: vec!["xml".to_string()],
        }
    }
}

impl WorkspaceSettings {
    /// Check if documents of this language id are validated
    pub fn accepts_language(&self, language_id: &str) -> bool {
        self.language_ids.iter().any(|id| id == language_id)
    }
}

/// Per-rule switches
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuleSettings {
    /// `<Forward path>` must match a `name` in the same document
    pub forward_path: bool,
    /// `<FrankSender target>` must match an Adapter in the workspace
    pub frank_sender_target: bool,
    /// `javaListener` must match a JavaListener in the workspace
    pub java_listener: bool,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            forward_path: true,
            frank_sender_target: true,
            java_listener: true,
        }
    }
}
