//! Validation Engine Module
//!
//! Checks every reference in a document against the declarations it must
//! resolve to and reports the ones that do not.
//!
//! # Architecture
//!
//! - `ReferenceRule`: Trait for one kind of reference check
//! - `ValidationEngine`: Runs all registered rules over a document
//! - `rules`: The forward, frank sender and java listener rules
//!
//! Resolution scope differs per rule: forwards resolve inside their own
//! document, sender targets and listener references against the workspace
//! registry.

pub mod rules;


use std::sync::Arc;

use frankref_core::{Diagnostic, Document, PatternScanner, ReferenceKind, Scanner};
use tracing::debug;

use crate::config::RuleSettings;
use crate::workspace::registry::NameRegistry;

pub use rules::{ForwardPathRule, RegistryRule};

/// Trait for implementing reference rules
pub trait ReferenceRule: Send + Sync {
    /// The reference kind this rule checks
    fn kind(&self) -> ReferenceKind;

    /// Get the rule's unique identifier
    fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// Get a human-readable description of the rule
    fn description(&self) -> &'static str;

    /// Report every unresolved reference of this rule's kind in `document`
    fn check(
        &self,
        document: &Document,
        scanner: &dyn Scanner,
        registry: &NameRegistry,
    ) -> Vec<Diagnostic>;
}

/// The engine that runs all reference rules over a document
pub struct ValidationEngine {
    scanner: Arc<dyn Scanner>,
    rules: Vec<Box<dyn ReferenceRule>>,
}

impl ValidationEngine {
    /// Create an engine with every rule enabled
    pub fn new() -> Self {
        Self::with_settings(&RuleSettings::default())
    }

    /// Create an engine with the rules enabled in `settings`
    pub fn with_settings(settings: &RuleSettings) -> Self {
        let mut engine = Self::empty();
        if settings.forward_path {
            engine.add_rule(Box::new(ForwardPathRule));
        }
        if settings.frank_sender_target {
            engine.add_rule(Box::new(RegistryRule::frank_sender_target()));
        }
        if settings.java_listener {
            engine.add_rule(Box::new(RegistryRule::java_listener()));
        }
        engine
    }

    /// Create an empty engine (for custom rule sets)
    pub fn empty() -> Self {
        Self {
            scanner: Arc::new(PatternScanner),
            rules: Vec::new(),
        }
    }

    /// Replace the scanner used to find references
    pub fn with_scanner(mut self, scanner: Arc<dyn Scanner>) -> Self {
        self.scanner = scanner;
        self
    }

    /// Add a custom rule to the engine
    pub fn add_rule(&mut self, rule: Box<dyn ReferenceRule>) {
        self.rules.push(rule);
    }

    /// The scanner shared with the workspace index
    pub fn scanner(&self) -> Arc<dyn Scanner> {
        Arc::clone(&self.scanner)
    }

    /// Validate one document against a registry snapshot
    ///
    /// Diagnostics come back ordered by start offset; for equal offsets
    /// they keep rule order.
    pub fn validate(&self, document: &Document, registry: &NameRegistry) -> Vec<Diagnostic> {
        let mut diagnostics: Vec<Diagnostic> = self
            .rules
            .iter()
            .flat_map(|rule| rule.check(document, self.scanner.as_ref(), registry))
            .collect();
        diagnostics.sort_by_key(|d| d.range.start);

        debug!(
            "Validated {}: {} unresolved references",
            document.id,
            diagnostics.len()
        );
        diagnostics
    }

    /// Get all registered rule descriptions
    pub fn rule_descriptions(&self) -> Vec<(&'static str, &'static str)> {
        self.rules
            .iter()
            .map(|r| (r.code(), r.description()))
            .collect()
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}
