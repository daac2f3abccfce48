//! Workspace file enumeration
//!
//! Lists the configuration files of a workspace and reads them in parallel.
//! A file that cannot be read contributes nothing; it never aborts the load.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use frankref_core::{Document, DocumentId};
use ignore::overrides::{Override, OverrideBuilder};
use ignore::WalkBuilder;
use rayon::prelude::*;
use thiserror::Error;
use tower_lsp::lsp_types::Url;
use tracing::{debug, warn};

use crate::config::WorkspaceSettings;

/// Errors that prevent enumerating a workspace at all
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("workspace root {0} is not a directory")]
    NotADirectory(PathBuf),
    #[error("invalid file pattern {pattern:?}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: ignore::Error,
    },
}

/// File enumeration capability
pub trait WorkspaceFiles: Send + Sync {
    /// Paths of every configuration file in the workspace
    fn list_files(&self) -> Result<Vec<PathBuf>, WorkspaceError>;

    /// Read the full text of one file
    fn read_text(&self, path: &Path) -> io::Result<String>;
}

/// A loaded workspace file
#[derive(Debug, Clone)]
pub struct WorkspaceFile {
    pub path: PathBuf,
    pub document: Document,
}

/// Identifier used for a file on disk: its `file://` URI when it has one
pub fn document_id(path: &Path) -> DocumentId {
    match Url::from_file_path(path) {
        Ok(uri) => DocumentId::from(uri.to_string()),
        Err(()) => DocumentId::from(path.display().to_string()),
    }
}

/// List and read every workspace file, reading in parallel
pub fn load_documents(files: &dyn WorkspaceFiles) -> Result<Vec<WorkspaceFile>, WorkspaceError> {
    let paths = files.list_files()?;

    let loaded: Vec<WorkspaceFile> = paths
        .par_iter()
        .filter_map(|path| match files.read_text(path) {
            Ok(text) => Some(WorkspaceFile {
                path: path.clone(),
                document: Document::new(document_id(path), text),
            }),
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        })
        .collect();

    debug!("Loaded {} of {} workspace files", loaded.len(), paths.len());
    Ok(loaded)
}

/// Gitignore-aware directory walker
pub struct DiskFiles {
    root: PathBuf,
    include: Vec<String>,
    exclude: Vec<String>,
}

impl DiskFiles {
    /// Walk `root` with the default include/exclude patterns
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::from_settings(root, &WorkspaceSettings::default())
    }

    /// Walk `root` with the patterns from the workspace settings
    pub fn from_settings(root: impl Into<PathBuf>, settings: &WorkspaceSettings) -> Self {
        Self {
            root: root.into(),
            include: settings.include.clone(),
            exclude: settings.exclude.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check whether a file under the root belongs to the workspace
    ///
    /// Applies the include/exclude patterns only; ignore files are not consulted.
    pub fn includes(&self, path: &Path) -> Result<bool, WorkspaceError> {
        if !path.starts_with(&self.root) {
            return Ok(false);
        }
        Ok(self.overrides()?.matched(path, false).is_whitelist())
    }

    fn overrides(&self) -> Result<Override, WorkspaceError> {
        let mut builder = OverrideBuilder::new(&self.root);

        let invalid = |pattern: &str, source| WorkspaceError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        };

        for pattern in &self.include {
            builder
                .add(pattern)
                .map_err(|source| invalid(pattern, source))?;
        }
        // Override globs prefixed with `!` exclude; later globs take precedence
        for pattern in &self.exclude {
            builder
                .add(&format!("!{pattern}"))
                .map_err(|source| invalid(pattern, source))?;
        }

        builder.build().map_err(|source| invalid("<overrides>", source))
    }
}

impl WorkspaceFiles for DiskFiles {
    fn list_files(&self) -> Result<Vec<PathBuf>, WorkspaceError> {
        if !self.root.is_dir() {
            return Err(WorkspaceError::NotADirectory(self.root.clone()));
        }

        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .overrides(self.overrides()?)
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping workspace entry: {}", e);
                    continue;
                }
            };
            if entry.file_type().is_some_and(|t| t.is_file()) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        Ok(files)
    }

    fn read_text(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

/// In-memory workspace (useful for testing and benchmarks)
#[derive(Debug, Default)]
pub struct MemoryFiles {
    files: BTreeMap<PathBuf, Option<String>>,
}

impl MemoryFiles {
    /// Create an empty in-memory workspace
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with content
    pub fn add(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), Some(content.into()));
        self
    }

    /// Add a file whose reads fail
    pub fn add_unreadable(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.insert(path.into(), None);
        self
    }
}

impl WorkspaceFiles for MemoryFiles {
    fn list_files(&self) -> Result<Vec<PathBuf>, WorkspaceError> {
        Ok(self.files.keys().cloned().collect())
    }

    fn read_text(&self, path: &Path) -> io::Result<String> {
        match self.files.get(path) {
            Some(Some(content)) => Ok(content.clone()),
            Some(None) => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "file is not readable",
            )),
            None => Err(io::Error::from(io::ErrorKind::NotFound)),
        }
    }
}
