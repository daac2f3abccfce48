//! Reference rules

use std::collections::HashSet;

use frankref_core::{DeclarationKind, Diagnostic, Document, ReferenceKind, Scanner};

use super::ReferenceRule;
use crate::workspace::registry::NameRegistry;

/// Rule: `<Forward path="X">` needs an element with `name="X"` in the same document.
///
/// Forward names are local to a configuration; a match in another file does
/// not count.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardPathRule;

impl ReferenceRule for ForwardPathRule {
    fn kind(&self) -> ReferenceKind {
        ReferenceKind::ForwardPath
    }

    fn description(&self) -> &'static str {
        "Forward paths must match a name declared in the same document"
    }

    fn check(
        &self,
        document: &Document,
        scanner: &dyn Scanner,
        _registry: &NameRegistry,
    ) -> Vec<Diagnostic> {
        let mut references = scanner
            .references(document, ReferenceKind::ForwardPath)
            .peekable();
        if references.peek().is_none() {
            return Vec::new();
        }

        let local_names: HashSet<String> = scanner
            .declarations(document, DeclarationKind::GenericName)
            .map(|d| d.name)
            .collect();

        references
            .filter(|r| !local_names.contains(&r.target))
            .map(|r| {
                Diagnostic::warning(
                    r.span,
                    format!(
                        "Forward tag with path=\"{}\" has no matching name tag.",
                        r.target
                    ),
                )
                .with_rule(ReferenceKind::ForwardPath)
            })
            .collect()
    }
}

/// Rule: a reference must name a declaration somewhere in the workspace.
pub struct RegistryRule {
    kind: ReferenceKind,
    declares: DeclarationKind,
    description: &'static str,
}

impl RegistryRule {
    /// `<FrankSender target="X">` needs an `<Adapter name="X">`
    pub fn frank_sender_target() -> Self {
        Self {
            kind: ReferenceKind::FrankSenderTarget,
            declares: DeclarationKind::Adapter,
            description: "FrankSender targets must match an Adapter in the workspace",
        }
    }

    /// `javaListener="X"` needs a `<JavaListener name="X">`
    pub fn java_listener() -> Self {
        Self {
            kind: ReferenceKind::JavaListenerAttr,
            declares: DeclarationKind::JavaListener,
            description: "javaListener references must match a JavaListener in the workspace",
        }
    }

    fn message(&self, target: &str) -> String {
        format!("{} with name=\"{}\" not found.", self.declares, target)
    }
}

impl ReferenceRule for RegistryRule {
    fn kind(&self) -> ReferenceKind {
        self.kind
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn check(
        &self,
        document: &Document,
        scanner: &dyn Scanner,
        registry: &NameRegistry,
    ) -> Vec<Diagnostic> {
        scanner
            .references(document, self.kind)
            .filter(|r| !registry.lookup(self.declares, &r.target))
            .map(|r| Diagnostic::warning(r.span, self.message(&r.target)).with_rule(self.kind))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frankref_core::PatternScanner;

    #[test]
    fn test_registry_rule_messages() {
        assert_eq!(
            RegistryRule::frank_sender_target().message("X"),
            "Adapter with name=\"X\" not found."
        );
        assert_eq!(
            RegistryRule::java_listener().message("L"),
            "JavaListener with name=\"L\" not found."
        );
    }

    #[test]
    fn test_forward_rule_skips_declaration_scan_without_forwards() {
        let doc = Document::new("file:///a.xml", r#"<Exit name="READY"/>"#);
        let diagnostics = ForwardPathRule.check(&doc, &PatternScanner, &NameRegistry::new());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_forward_matches_its_own_name() {
        // A forward's own name attribute counts as a declaration
        let doc = Document::new("file:///a.xml", r#"<Forward name="loop" path="loop"/>"#);
        let diagnostics = ForwardPathRule.check(&doc, &PatternScanner, &NameRegistry::new());
        assert!(diagnostics.is_empty());
    }
}
