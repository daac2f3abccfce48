//! Reference diagnostics
//!
//! This module provides the value type the validation engine hands to its
//! reporting sink: a range into the validated document, a severity and a
//! message.

use serde::{Deserialize, Serialize};

use crate::model::ReferenceKind;

/// A diagnostic produced by a validation pass
///
/// Diagnostics are pure output values. The serialized shape
/// (`range`, `severity`, `message`) is the compatibility contract with
/// external reporting sinks, so the producing rule is kept out of it.
///
/// # Example
///
/// ```
/// use frankref_core::diagnostics::{Diagnostic, Severity, Span};
///
/// let diag = Diagnostic::warning(Span::new(10, 25), "Adapter with name=\"X\" not found.");
/// assert_eq!(diag.severity, Severity::Warning);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Character range in the originating document
    pub range: Span,

    /// Severity level of the diagnostic
    pub severity: Severity,

    /// The diagnostic message
    pub message: String,

    /// Reference kind whose check produced this diagnostic
    #[serde(skip)]
    pub rule: Option<ReferenceKind>,
}

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Informational hint, does not indicate a problem
    Hint,

    /// Informational message
    Info,

    /// Warning, indicates a potential issue
    Warning,

    /// Error, indicates a problem that should be fixed
    Error,
}

/// A source location span
///
/// Half-open `[start, end)` range of character (Unicode scalar value)
/// offsets into a document's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    /// Start offset (inclusive)
    pub start: usize,

    /// End offset (exclusive)
    pub end: usize,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(range: Span, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            range,
            severity,
            message: message.into(),
            rule: None,
        }
    }

    /// Create a warning diagnostic
    pub fn warning(range: Span, message: impl Into<String>) -> Self {
        Self::new(range, Severity::Warning, message)
    }

    /// Record the reference kind that produced this diagnostic
    pub fn with_rule(mut self, rule: ReferenceKind) -> Self {
        self.rule = Some(rule);
        self
    }

    /// Rule code of the producing check, if known
    pub fn code(&self) -> Option<&'static str> {
        self.rule.map(ReferenceKind::code)
    }

    /// Check if this is an error-level diagnostic
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }

    /// Check if this is a warning-level diagnostic
    pub fn is_warning(&self) -> bool {
        matches!(self.severity, Severity::Warning)
    }
}

impl Span {
    /// Create a new span from start and end offsets
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Get the length of the span
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the span is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if this span contains an offset
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Hint => write!(f, "hint"),
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: severity[code]: message
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code() {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}
