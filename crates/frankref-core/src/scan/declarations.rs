//! Declaration scanner

use regex::Regex;
use std::sync::OnceLock;

use super::tag::{attribute_value, tag_regex};
use crate::diagnostics::Span;
use crate::model::{Declaration, DeclarationKind, Document};
use crate::text::CharCursor;

fn declaration_tag(kind: DeclarationKind) -> &'static Regex {
    static ADAPTER_RE: OnceLock<Regex> = OnceLock::new();
    static JAVA_LISTENER_RE: OnceLock<Regex> = OnceLock::new();
    static ANY_ELEMENT_RE: OnceLock<Regex> = OnceLock::new();

    let cell = match kind {
        DeclarationKind::Adapter => &ADAPTER_RE,
        DeclarationKind::JavaListener => &JAVA_LISTENER_RE,
        DeclarationKind::GenericName => &ANY_ELEMENT_RE,
    };
    cell.get_or_init(|| tag_regex(kind.element()))
}

/// Lazy iterator over the declarations of one kind in a document
///
/// Cloning forks the scan at its current position; call
/// [`scan_declarations`] again for a fresh pass.
#[derive(Debug, Clone)]
pub struct Declarations<'d> {
    document: &'d Document,
    kind: DeclarationKind,
    pos: usize,
    cursor: CharCursor,
}

/// Scan `document` for declarations of `kind`, in document order
pub fn scan_declarations(document: &Document, kind: DeclarationKind) -> Declarations<'_> {
    Declarations {
        document,
        kind,
        pos: 0,
        cursor: CharCursor::default(),
    }
}

impl Iterator for Declarations<'_> {
    type Item = Declaration;

    fn next(&mut self) -> Option<Declaration> {
        let document = self.document;
        let text = document.text.as_str();
        let pattern = declaration_tag(self.kind);

        while let Some(tag) = pattern.find_at(text, self.pos) {
            self.pos = tag.end();

            let Some(name) = attribute_value(tag.as_str(), "name") else {
                continue;
            };

            let start = self.cursor.char_offset(text, tag.start());
            let end = self.cursor.char_offset(text, tag.end());
            return Some(Declaration {
                kind: self.kind,
                name: name.to_string(),
                span: Span::new(start, end),
                source: document.id.clone(),
            });
        }

        None
    }
}
