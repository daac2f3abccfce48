//! Configuration Engine
//!
//! Provides workspace-configurable settings for frankref.
//!
//! # Configuration File
//!
//! Settings are loaded from `frankref.toml` (or `.frankref.toml`) in the
//! workspace root:
//!
//! ```toml
//! [workspace]
//! include = ["**/*.xml"]
//! exclude = ["**/node_modules/**", "**/target/**"]
//! language_ids = ["xml"]
//!
//! [rules]
//! forward_path = true
//! frank_sender_target = true
//! java_listener = true
//! ```

mod settings;


pub use settings::{ConfigError, RuleSettings, Settings, WorkspaceSettings, CONFIG_FILE_NAMES};
