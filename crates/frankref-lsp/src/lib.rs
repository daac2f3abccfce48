//! frankref Language Server Protocol implementation
//!
//! This library checks cross-references in Frank!Framework configuration
//! files and reports unresolved ones to editors:
//! - `<Forward path="...">` must match a `name` in the same file
//! - `<FrankSender target="...">` must match an Adapter anywhere in the workspace
//! - `javaListener="..."` must match a JavaListener anywhere in the workspace
//!
//! # Library Usage
//!
//! ```
//! use frankref_core::Document;
//! use frankref_lsp::{ValidationEngine, WorkspaceIndex};
//!
//! let docs = vec![
//!     Document::new("file:///a.xml", r#"<Adapter name="A"/>"#),
//!     Document::new("file:///b.xml", r#"<FrankSender target="A"/>"#),
//! ];
//! let index = WorkspaceIndex::build(&docs);
//! let engine = ValidationEngine::new();
//!
//! assert!(engine.validate(&docs[1], &index.registry()).is_empty());
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Start the language server (typically called by an editor)
//! frankref-lsp
//!
//! # With debug logging
//! RUST_LOG=debug frankref-lsp
//! ```

pub mod config;
pub mod server;
pub mod session;
pub mod validation;
pub mod workspace;

// Re-export main entry point
pub use server::run_server;

// Re-export commonly used types
pub use config::Settings;
pub use session::{Session, ValidationPass};
pub use validation::{ReferenceRule, ValidationEngine};
pub use workspace::{NameRegistry, SharedRegistry, WorkspaceIndex};
