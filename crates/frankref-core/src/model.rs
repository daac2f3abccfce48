//! Data model shared by the scanners and the validation engine

use std::fmt;
use std::sync::Arc;

use crate::diagnostics::Span;

/// Stable identifier of a document (URI or path)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(Arc<str>);

impl DocumentId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A snapshot of a document's text
///
/// The engine only ever reads documents; whoever owns the editor buffer or
/// file hands in a fresh snapshot for every pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<DocumentId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// What a declaration declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeclarationKind {
    /// `<Adapter name="...">`
    Adapter,
    /// `<JavaListener name="...">`
    JavaListener,
    /// Any element carrying a `name` attribute
    GenericName,
}

impl DeclarationKind {
    /// Kinds that are pooled into the workspace registry
    pub const WORKSPACE: [DeclarationKind; 2] =
        [DeclarationKind::Adapter, DeclarationKind::JavaListener];

    /// Element name the declaration must sit on, `None` for any element
    pub fn element(self) -> Option<&'static str> {
        match self {
            DeclarationKind::Adapter => Some("Adapter"),
            DeclarationKind::JavaListener => Some("JavaListener"),
            DeclarationKind::GenericName => None,
        }
    }

    pub fn is_workspace_wide(self) -> bool {
        !matches!(self, DeclarationKind::GenericName)
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclarationKind::Adapter => write!(f, "Adapter"),
            DeclarationKind::JavaListener => write!(f, "JavaListener"),
            DeclarationKind::GenericName => write!(f, "name"),
        }
    }
}

/// What a reference points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReferenceKind {
    /// `<Forward path="...">`
    ForwardPath,
    /// `<FrankSender target="...">`
    FrankSenderTarget,
    /// `javaListener="..."` on any element
    JavaListenerAttr,
}

impl ReferenceKind {
    pub const ALL: [ReferenceKind; 3] = [
        ReferenceKind::ForwardPath,
        ReferenceKind::FrankSenderTarget,
        ReferenceKind::JavaListenerAttr,
    ];

    /// Rule code reported alongside diagnostics for this kind
    pub fn code(self) -> &'static str {
        match self {
            ReferenceKind::ForwardPath => "FRANK001",
            ReferenceKind::FrankSenderTarget => "FRANK002",
            ReferenceKind::JavaListenerAttr => "FRANK003",
        }
    }
}

/// A declared name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub name: String,
    /// The whole declaring tag
    pub span: Span,
    pub source: DocumentId,
}

/// An attribute value that must match some declared name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub kind: ReferenceKind,
    pub target: String,
    /// Token to highlight when the reference does not resolve
    pub span: Span,
    pub source: DocumentId,
}
