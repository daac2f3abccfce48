//! Tag and attribute patterns
//!
//! A tag runs from `<Name` to the first `>` outside a quoted attribute value;
//! a `<` before that means the tag was never closed and it is skipped.

use regex::Regex;
use std::sync::OnceLock;

/// Build the pattern for opening or self-closing tags of `element`,
/// or of any element when `None`.
pub(crate) fn tag_regex(element: Option<&str>) -> Regex {
    let name = match element {
        Some(element) => regex::escape(element),
        None => r"[\p{L}_][\w.:-]*".to_string(),
    };
    Regex::new(&format!(
        r#"<{name}(?:\s(?:[^<>"']|"[^"<]*"|'[^'<]*')*)?/?>"#
    ))
    .unwrap()
}

fn attribute_re() -> &'static Regex {
    static ATTR_RE: OnceLock<Regex> = OnceLock::new();
    ATTR_RE.get_or_init(|| {
        Regex::new(r#"(?:^|\s)([\p{L}_:][\w.:-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
    })
}

/// Value of the first attribute called exactly `name` in a matched tag
pub(crate) fn attribute_value<'t>(tag: &'t str, name: &str) -> Option<&'t str> {
    // Skip `<ElementName` so the element name itself never reads as an attribute
    let attributes = tag
        .find(char::is_whitespace)
        .map_or("", |start| &tag[start..]);

    attribute_re()
        .captures_iter(attributes)
        .find(|caps| &caps[1] == name)
        .and_then(|caps| caps.get(2).or_else(|| caps.get(3)))
        .map(|value| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_regex_matches_element() {
        let re = tag_regex(Some("Adapter"));
        assert!(re.is_match(r#"<Adapter name="a">"#));
        assert!(re.is_match(r#"<Adapter name="a"/>"#));
        assert!(re.is_match("<Adapter>"));
        assert!(!re.is_match(r#"<AdapterGroup name="a">"#));
        assert!(!re.is_match("</Adapter>"));
    }

    #[test]
    fn test_tag_regex_spans_lines() {
        let re = tag_regex(Some("FrankSender"));
        let text = "<FrankSender\n    name=\"s\"\n    target=\"t\"\n/>";
        assert_eq!(re.find(text).unwrap().as_str(), text);
    }

    #[test]
    fn test_tag_regex_skips_unterminated() {
        let re = tag_regex(Some("Adapter"));
        assert!(!re.is_match("<Adapter name=\"a\"\n<Receiver/>"));
    }

    #[test]
    fn test_any_element_regex() {
        let re = tag_regex(None);
        assert!(re.is_match(r#"<pipe name="p"/>"#));
        assert!(re.is_match(r#"<ns:Pipe name="p">"#));
        assert!(!re.is_match("<!-- comment -->"));
        assert!(!re.is_match("<?xml version=\"1.0\"?>"));
    }

    #[test]
    fn test_tag_regex_allows_gt_in_quoted_values() {
        let re = tag_regex(Some("Adapter"));
        let text = r#"<Adapter description="a -> b" name='x>y'/>"#;
        assert_eq!(re.find(text).unwrap().as_str(), text);
        assert_eq!(attribute_value(text, "name"), Some("x>y"));
    }

    #[test]
    fn test_any_element_regex_unicode_names() {
        let re = tag_regex(None);
        assert!(re.is_match(r#"<Übung name="X"/>"#));
        assert_eq!(attribute_value(r#"<Übung äußerlich="1" name="X"/>"#, "name"), Some("X"));
    }

    #[test]
    fn test_attribute_value_any_position() {
        let tag = r#"<Adapter description="first" name="Main" active="true">"#;
        assert_eq!(attribute_value(tag, "name"), Some("Main"));
        assert_eq!(attribute_value(tag, "active"), Some("true"));
        assert_eq!(attribute_value(tag, "missing"), None);
    }

    #[test]
    fn test_attribute_value_quotes_and_empty() {
        assert_eq!(attribute_value("<Forward path='x'/>", "path"), Some("x"));
        assert_eq!(attribute_value(r#"<Forward path=""/>"#, "path"), Some(""));
        assert_eq!(
            attribute_value(r#"<Forward path = "spaced" />"#, "path"),
            Some("spaced")
        );
    }

    #[test]
    fn test_attribute_value_exact_name() {
        let tag = r#"<Pipe classname="x" name2="y">"#;
        assert_eq!(attribute_value(tag, "name"), None);
    }

    #[test]
    fn test_attribute_value_ignores_quoted_lookalikes() {
        let tag = r#"<Forward description="see path='decoy'" path="real"/>"#;
        assert_eq!(attribute_value(tag, "path"), Some("real"));
    }
}
