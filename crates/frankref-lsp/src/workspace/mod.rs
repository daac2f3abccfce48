//! Workspace Intelligence Module
//!
//! Tracks which names every workspace document declares and publishes the
//! union as an immutable registry snapshot.
//!
//! # Components
//!
//! - `registry`: The name registry and the atomically swapped shared snapshot
//! - `index`: Per-document declaration contributions
//! - `loader`: Enumerates and reads workspace files

pub mod index;
pub mod loader;
pub mod registry;

#[cfg(test)]
mod tests;

pub use index::WorkspaceIndex;
pub use loader::{
    document_id, load_documents, DiskFiles, MemoryFiles, WorkspaceError, WorkspaceFile,
    WorkspaceFiles,
};
pub use registry::{NameRegistry, RegistrySnapshot, SharedRegistry};
