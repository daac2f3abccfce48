//! Validation Session
//!
//! Owns the state an orchestrator needs between events: the open documents
//! with their versions, the workspace index and the published registry.
//!
//! Every validation pass remembers the document version and registry
//! generation it ran against. A pass is only worth publishing while both are
//! still current; anything older has been or will be superseded by a newer
//! pass for the same document.

use std::collections::HashMap;
use std::sync::Arc;

use frankref_core::{Diagnostic, Document, DocumentId};
use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::validation::ValidationEngine;
use crate::workspace::index::WorkspaceIndex;
use crate::workspace::registry::{RegistrySnapshot, SharedRegistry};

/// An editor buffer
#[derive(Debug, Clone)]
struct OpenDocument {
    version: i32,
    document: Arc<Document>,
}

/// Result of validating one document snapshot
#[derive(Debug, Clone)]
pub struct ValidationPass {
    /// The validated snapshot
    pub document: Arc<Document>,
    /// Editor version of the snapshot
    pub version: i32,
    /// Registry generation the pass resolved against
    pub generation: u64,
    pub diagnostics: Vec<Diagnostic>,
}

/// Shared orchestration state
pub struct Session {
    engine: RwLock<Arc<ValidationEngine>>,
    index: Mutex<WorkspaceIndex>,
    registry: SharedRegistry,
    open: RwLock<HashMap<DocumentId, OpenDocument>>,
}

impl Session {
    /// Create a session around a validation engine
    pub fn new(engine: ValidationEngine) -> Self {
        let index = WorkspaceIndex::with_scanner(engine.scanner());
        Self {
            engine: RwLock::new(Arc::new(engine)),
            index: Mutex::new(index),
            registry: SharedRegistry::new(),
            open: RwLock::new(HashMap::new()),
        }
    }

    /// Swap the validation engine (e.g. after loading settings)
    pub fn set_engine(&self, engine: ValidationEngine) {
        *self.engine.write() = Arc::new(engine);
    }

    /// The currently published registry
    pub fn registry(&self) -> Arc<RegistrySnapshot> {
        self.registry.load()
    }

    /// Replace the on-disk part of the workspace
    ///
    /// Open documents keep their editor text. Always publishes a new
    /// registry snapshot.
    pub fn seed(&self, documents: Vec<Document>) -> u64 {
        let mut index = self.index.lock();
        let open = self.open.read();

        let mut documents: Vec<Document> = documents
            .into_iter()
            .filter(|document| !open.contains_key(&document.id))
            .collect();
        documents.extend(open.values().map(|o| o.document.as_ref().clone()));

        index.replace_all(&documents);
        let generation = self.registry.publish(index.registry());
        debug!(
            "Seeded {} documents, registry generation {}",
            index.document_count(),
            generation
        );
        generation
    }

    /// Record an opened or edited buffer
    ///
    /// Returns `None` when the event is older than what is already stored,
    /// otherwise whether the registry changed.
    pub fn update(&self, document: Document, version: i32) -> Option<bool> {
        // Lock order: index, then open
        let mut index = self.index.lock();
        {
            let mut open = self.open.write();
            if let Some(current) = open.get(&document.id) {
                if current.version > version {
                    debug!(
                        "Ignoring stale version {} of {} (have {})",
                        version, document.id, current.version
                    );
                    return None;
                }
            }
            open.insert(
                document.id.clone(),
                OpenDocument {
                    version,
                    document: Arc::new(document.clone()),
                },
            );
        }

        let changed = index.update(&document);
        Some(self.publish_if(&index, changed))
    }

    /// Forget a buffer; `on_disk` is the file's saved content if it still exists
    pub fn close(&self, id: &DocumentId, on_disk: Option<Document>) -> bool {
        let mut index = self.index.lock();
        self.open.write().remove(id);
        let changed = match &on_disk {
            Some(document) => index.update(document),
            None => index.remove(id),
        };
        self.publish_if(&index, changed)
    }

    /// A workspace file changed on disk; ignored while the file is open
    pub fn file_changed(&self, document: Document) -> bool {
        let mut index = self.index.lock();
        if self.is_open(&document.id) {
            return false;
        }
        let changed = index.update(&document);
        self.publish_if(&index, changed)
    }

    /// A workspace file was deleted; ignored while the file is open
    pub fn file_deleted(&self, id: &DocumentId) -> bool {
        let mut index = self.index.lock();
        if self.is_open(id) {
            return false;
        }
        let changed = index.remove(id);
        self.publish_if(&index, changed)
    }

    /// Check if a document is open
    pub fn is_open(&self, id: &DocumentId) -> bool {
        self.open.read().contains_key(id)
    }

    /// Identifiers of every open document
    pub fn open_documents(&self) -> Vec<DocumentId> {
        let mut ids: Vec<DocumentId> = self.open.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Validate the current snapshot of an open document
    pub fn validate(&self, id: &DocumentId) -> Option<ValidationPass> {
        let snapshot = self.open.read().get(id).cloned()?;
        let registry = self.registry.load();
        let engine = Arc::clone(&self.engine.read());

        let diagnostics = engine.validate(&snapshot.document, &registry.names);
        Some(ValidationPass {
            document: snapshot.document,
            version: snapshot.version,
            generation: registry.generation,
            diagnostics,
        })
    }

    /// Check whether a pass still reflects the newest text and registry
    pub fn is_current(&self, pass: &ValidationPass) -> bool {
        let version_current = self
            .open
            .read()
            .get(&pass.document.id)
            .is_some_and(|open| open.version == pass.version);
        version_current && self.registry.generation() == pass.generation
    }

    /// Publish the index's registry if names changed; caller holds the index lock
    fn publish_if(&self, index: &WorkspaceIndex, changed: bool) -> bool {
        if !changed {
            return false;
        }
        let generation = self.registry.publish(index.registry());
        debug!("Published registry generation {}", generation);
        true
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ValidationEngine::new())
    }
}
