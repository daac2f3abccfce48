//! frankref-core - Cross-reference scanning for Frank!Framework configurations
//!
//! Core library for frankref, providing the document model, the declaration
//! and reference scanners, and the diagnostic type the validation engine
//! reports with.
//!
//! # Example
//!
//! ```
//! use frankref_core::{scan_references, Document, ReferenceKind};
//!
//! let doc = Document::new(
//!     "file:///Configuration.xml",
//!     r#"<FrankSender name="call" target="OtherAdapter"/>"#,
//! );
//!
//! let targets: Vec<String> = scan_references(&doc, ReferenceKind::FrankSenderTarget)
//!     .map(|r| r.target)
//!     .collect();
//! assert_eq!(targets, vec!["OtherAdapter"]);
//! ```

pub mod diagnostics;
pub mod model;
pub mod scan;
pub mod text;

// Re-export main types and functions
pub use diagnostics::{Diagnostic, Severity, Span};
pub use model::{Declaration, DeclarationKind, Document, DocumentId, Reference, ReferenceKind};
pub use scan::{scan_declarations, scan_references, PatternScanner, Scanner};
pub use text::{LineIndex, LinePosition};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
