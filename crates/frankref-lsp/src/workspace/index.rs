//! Workspace Index
//!
//! Keeps every document's own contribution to the registry so one document
//! can be re-scanned without touching the others.

use std::collections::HashMap;
use std::sync::Arc;

use frankref_core::{DeclarationKind, Document, DocumentId, PatternScanner, Scanner};
use rayon::prelude::*;
use tracing::debug;

use super::registry::NameRegistry;

/// Per-document declaration contributions
pub struct WorkspaceIndex {
    scanner: Arc<dyn Scanner>,
    contributions: HashMap<DocumentId, NameRegistry>,
}

impl WorkspaceIndex {
    /// Create an empty index using the pattern scanner
    pub fn new() -> Self {
        Self::with_scanner(Arc::new(PatternScanner))
    }

    /// Create an empty index using a custom scanner
    pub fn with_scanner(scanner: Arc<dyn Scanner>) -> Self {
        Self {
            scanner,
            contributions: HashMap::new(),
        }
    }

    /// Index a whole document set; files are scanned in parallel
    pub fn build(documents: &[Document]) -> Self {
        let mut index = Self::new();
        index.replace_all(documents);
        index
    }

    /// Drop every contribution and index `documents` from scratch
    pub fn replace_all(&mut self, documents: &[Document]) {
        let scanner = self.scanner.as_ref();
        self.contributions = documents
            .par_iter()
            .map(|document| (document.id.clone(), contribution(scanner, document)))
            .collect();

        debug!("Indexed {} documents", self.contributions.len());
    }

    /// Re-scan one document; returns true if its declared names changed
    pub fn update(&mut self, document: &Document) -> bool {
        let fresh = contribution(self.scanner.as_ref(), document);
        let previous = self
            .contributions
            .insert(document.id.clone(), fresh.clone())
            .unwrap_or_default();
        previous != fresh
    }

    /// Forget a document; returns true if it had declared anything
    pub fn remove(&mut self, id: &DocumentId) -> bool {
        self.contributions
            .remove(id)
            .is_some_and(|previous| !previous.is_empty())
    }

    /// Check if the document is indexed
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.contributions.contains_key(id)
    }

    /// Number of indexed documents
    pub fn document_count(&self) -> usize {
        self.contributions.len()
    }

    /// Union of all contributions
    pub fn registry(&self) -> NameRegistry {
        self.contributions
            .values()
            .fold(NameRegistry::new(), |mut registry, contribution| {
                registry.merge(contribution);
                registry
            })
    }
}

impl Default for WorkspaceIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// The workspace-wide names one document declares
fn contribution(scanner: &dyn Scanner, document: &Document) -> NameRegistry {
    NameRegistry::from_declarations(
        DeclarationKind::WORKSPACE
            .into_iter()
            .flat_map(|kind| scanner.declarations(document, kind)),
    )
}
