//! Name Registry
//!
//! Stores the declared names of the workspace, keyed by declaration kind.
//! Readers always go through a [`RegistrySnapshot`]; a rebuilt registry is
//! swapped in whole so nobody observes a half-merged one.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use arc_swap::ArcSwap;
use frankref_core::{Declaration, DeclarationKind};

/// Deduplicated declared names per workspace-wide declaration kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameRegistry {
    names: HashMap<DeclarationKind, HashSet<String>>,
}

impl NameRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect declarations into a registry, dropping document-local kinds
    pub fn from_declarations(declarations: impl IntoIterator<Item = Declaration>) -> Self {
        let mut registry = Self::new();
        for declaration in declarations {
            registry.insert(declaration.kind, declaration.name);
        }
        registry
    }

    /// Add a name; returns false for duplicates and for kinds that are not pooled
    pub fn insert(&mut self, kind: DeclarationKind, name: impl Into<String>) -> bool {
        if !kind.is_workspace_wide() {
            return false;
        }
        self.names.entry(kind).or_default().insert(name.into())
    }

    /// Union `other` into this registry
    pub fn merge(&mut self, other: &NameRegistry) {
        for (kind, names) in &other.names {
            self.names
                .entry(*kind)
                .or_default()
                .extend(names.iter().cloned());
        }
    }

    /// Check whether `name` is declared with `kind`
    pub fn lookup(&self, kind: DeclarationKind, name: &str) -> bool {
        self.names
            .get(&kind)
            .is_some_and(|names| names.contains(name))
    }

    /// All names of a kind, sorted
    pub fn names(&self, kind: DeclarationKind) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .names
            .get(&kind)
            .map(|names| names.iter().map(String::as_str).collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }

    /// Total number of names over all kinds
    pub fn len(&self) -> usize {
        self.names.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A published registry together with its publication number
#[derive(Debug, Default)]
pub struct RegistrySnapshot {
    /// Increases by one with every publish
    pub generation: u64,
    pub names: NameRegistry,
}

/// The registry shared between the indexer and validation passes
pub struct SharedRegistry {
    current: ArcSwap<RegistrySnapshot>,
}

impl SharedRegistry {
    /// Create a shared registry holding an empty snapshot (generation 0)
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(RegistrySnapshot::default()),
        }
    }

    /// The current snapshot
    pub fn load(&self) -> Arc<RegistrySnapshot> {
        self.current.load_full()
    }

    /// Generation of the current snapshot
    pub fn generation(&self) -> u64 {
        self.current.load().generation
    }

    /// Swap in a new registry, returning its generation
    ///
    /// Publishers must be serialized (the session publishes while holding
    /// its index lock).
    pub fn publish(&self, names: NameRegistry) -> u64 {
        let generation = self.generation() + 1;
        self.current
            .store(Arc::new(RegistrySnapshot { generation, names }));
        generation
    }
}

impl Default for SharedRegistry {
    fn default() -> Self {
        Self::new()
    }
}
