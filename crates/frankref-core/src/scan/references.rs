//! Reference scanner

use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

use super::tag::{attribute_value, tag_regex};
use crate::diagnostics::Span;
use crate::model::{Document, Reference, ReferenceKind};
use crate::text::CharCursor;

fn forward_tag() -> &'static Regex {
    static FORWARD_RE: OnceLock<Regex> = OnceLock::new();
    FORWARD_RE.get_or_init(|| tag_regex(Some("Forward")))
}

fn frank_sender_tag() -> &'static Regex {
    static FRANK_SENDER_RE: OnceLock<Regex> = OnceLock::new();
    FRANK_SENDER_RE.get_or_init(|| tag_regex(Some("FrankSender")))
}

fn java_listener_attr() -> &'static Regex {
    static JAVA_LISTENER_RE: OnceLock<Regex> = OnceLock::new();
    JAVA_LISTENER_RE.get_or_init(|| {
        Regex::new(r#"\bjavaListener\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
    })
}

/// Lazy iterator over the references of one kind in a document
#[derive(Debug, Clone)]
pub struct References<'d> {
    document: &'d Document,
    kind: ReferenceKind,
    pos: usize,
    cursor: CharCursor,
}

/// Scan `document` for references of `kind`, in document order
pub fn scan_references(document: &Document, kind: ReferenceKind) -> References<'_> {
    References {
        document,
        kind,
        pos: 0,
        cursor: CharCursor::default(),
    }
}

impl<'d> References<'d> {
    /// Next candidate token after `self.pos`, with its target if it has one
    fn next_candidate(&self) -> Option<(Range<usize>, Option<&'d str>)> {
        let document: &'d Document = self.document;
        let text = document.text.as_str();

        match self.kind {
            ReferenceKind::ForwardPath => {
                let tag = forward_tag().find_at(text, self.pos)?;
                Some((tag.range(), attribute_value(tag.as_str(), "path")))
            }
            ReferenceKind::FrankSenderTarget => {
                let tag = frank_sender_tag().find_at(text, self.pos)?;
                Some((tag.range(), attribute_value(tag.as_str(), "target")))
            }
            ReferenceKind::JavaListenerAttr => {
                let caps = java_listener_attr().captures_at(text, self.pos)?;
                let token = caps.get(0)?;
                let value = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str());
                Some((token.range(), value))
            }
        }
    }
}

impl Iterator for References<'_> {
    type Item = Reference;

    fn next(&mut self) -> Option<Reference> {
        let document = self.document;
        let text = document.text.as_str();

        loop {
            let (range, target) = self.next_candidate()?;
            self.pos = range.end;

            // Tags without the referencing attribute are not references
            let Some(target) = target else {
                continue;
            };

            let start = self.cursor.char_offset(text, range.start);
            let end = self.cursor.char_offset(text, range.end);
            return Some(Reference {
                kind: self.kind,
                target: target.to_string(),
                span: Span::new(start, end),
                source: document.id.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str, kind: ReferenceKind) -> Vec<Reference> {
        let doc = Document::new("file:///test.xml", text);
        scan_references(&doc, kind).collect()
    }

    fn slice(text: &str, span: Span) -> String {
        text.chars().skip(span.start).take(span.len()).collect()
    }

    #[test]
    fn test_forward_path_references() {
        let text = r#"<Forward name="success" path="READY"/>
<Forward name="exception" path='ERROR'/>"#;
        let refs = scan(text, ReferenceKind::ForwardPath);

        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].target, "READY");
        assert_eq!(refs[1].target, "ERROR");
        assert_eq!(
            slice(text, refs[0].span),
            r#"<Forward name="success" path="READY"/>"#
        );
    }

    #[test]
    fn test_forward_without_path_is_excluded() {
        let text = r#"<Forward name="success"/><Forward/><Forward path="x"/>"#;
        let refs = scan(text, ReferenceKind::ForwardPath);

        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].target, "x");
    }

    #[test]
    fn test_frank_sender_multiline_tag() {
        let text = "<SenderPipe name=\"call\">\n  <FrankSender\n    name=\"s\"\n    target=\"Other\"\n  />\n</SenderPipe>";
        let refs = scan(text, ReferenceKind::FrankSenderTarget);

        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].target, "Other");
        assert_eq!(
            slice(text, refs[0].span),
            "<FrankSender\n    name=\"s\"\n    target=\"Other\"\n  />"
        );
    }

    #[test]
    fn test_frank_sender_without_target_is_excluded() {
        let text = r#"<FrankSender name="s"/>"#;
        assert!(scan(text, ReferenceKind::FrankSenderTarget).is_empty());
    }

    #[test]
    fn test_java_listener_attribute_token() {
        let text = r#"<IbisJavaSender name="x" javaListener="Listen"/>"#;
        let refs = scan(text, ReferenceKind::JavaListenerAttr);

        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].target, "Listen");
        assert_eq!(slice(text, refs[0].span), r#"javaListener="Listen""#);
    }

    #[test]
    fn test_java_listener_empty_value() {
        let refs = scan(r#"<Sender javaListener=""/>"#, ReferenceKind::JavaListenerAttr);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].target, "");
    }

    #[test]
    fn test_java_listener_requires_word_boundary() {
        let refs = scan(
            r#"<Sender myjavaListener="a" javaListener='b'/>"#,
            ReferenceKind::JavaListenerAttr,
        );
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].target, "b");
    }

    #[test]
    fn test_references_in_document_order() {
        let text = r#"<Forward path="a"/><Forward path="b"/><Forward path="c"/>"#;
        let refs = scan(text, ReferenceKind::ForwardPath);

        let starts: Vec<usize> = refs.iter().map(|r| r.span.start).collect();
        let mut sorted = starts.clone();
        sorted.sort();
        assert_eq!(starts, sorted);
        assert_eq!(refs.len(), 3);
    }

    #[test]
    fn test_spans_are_character_offsets() {
        let text = "<!-- café -->\n<Forward path=\"x\"/>";
        let refs = scan(text, ReferenceKind::ForwardPath);

        assert_eq!(refs[0].span.start, 14);
        assert_eq!(slice(text, refs[0].span), "<Forward path=\"x\"/>");
    }
}
