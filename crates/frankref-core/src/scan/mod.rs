//! Pattern-based scanners
//!
//! Documents may be malformed while they are being edited, so nothing here
//! parses XML. Each scanner pattern-matches the constructs it cares about and
//! silently skips anything it cannot make sense of.
//!
//! Consumers go through the [`Scanner`] trait so a structural parser can be
//! swapped in without touching the validation engine.

mod declarations;
mod references;
mod tag;

pub use declarations::{scan_declarations, Declarations};
pub use references::{scan_references, References};

use crate::model::{Declaration, DeclarationKind, Document, Reference, ReferenceKind};

/// Source of declarations and references for a document
pub trait Scanner: Send + Sync {
    /// Declarations of `kind` in document order
    fn declarations<'d>(
        &self,
        document: &'d Document,
        kind: DeclarationKind,
    ) -> Box<dyn Iterator<Item = Declaration> + 'd>;

    /// References of `kind` in document order
    fn references<'d>(
        &self,
        document: &'d Document,
        kind: ReferenceKind,
    ) -> Box<dyn Iterator<Item = Reference> + 'd>;
}

/// The regex-backed scanner
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternScanner;

impl Scanner for PatternScanner {
    fn declarations<'d>(
        &self,
        document: &'d Document,
        kind: DeclarationKind,
    ) -> Box<dyn Iterator<Item = Declaration> + 'd> {
        Box::new(scan_declarations(document, kind))
    }

    fn references<'d>(
        &self,
        document: &'d Document,
        kind: ReferenceKind,
    ) -> Box<dyn Iterator<Item = Reference> + 'd> {
        Box::new(scan_references(document, kind))
    }
}
