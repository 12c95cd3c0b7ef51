use std::{cell::RefCell, fmt::Display};

use tracing::debug;

use crate::Span;

use super::errors::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Note,
    Error,
}

/// A message attached to a source range.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn error(message: impl Display, span: Span) -> Self {
        Diagnostic {
            severity: Severity::Error,
            message: message.to_string(),
            span,
        }
    }

    pub fn note(message: impl Display, span: Span) -> Self {
        Diagnostic {
            severity: Severity::Note,
            message: message.to_string(),
            span,
        }
    }
}

impl From<&Error> for Diagnostic {
    fn from(error: &Error) -> Self {
        let position = error.get_position().clone();
        Diagnostic::error(
            error,
            Span {
                start: position.clone(),
                end: position,
            },
        )
    }
}

/// Receives every diagnostic produced while compiling sources.
pub trait ErrorsObserver {
    fn notify_error(&self, diagnostic: Diagnostic);
}

/// Observer that keeps diagnostics in arrival order.
#[derive(Debug, Default)]
pub struct DiagnosticsCollector {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl DiagnosticsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Messages of all diagnostics with the given severity.
    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.severity == severity)
            .map(|d| d.message.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.diagnostics.borrow_mut().clear();
    }
}

impl ErrorsObserver for DiagnosticsCollector {
    fn notify_error(&self, diagnostic: Diagnostic) {
        debug!(severity = ?diagnostic.severity, file = %diagnostic.span.file(), "{}", diagnostic.message);
        self.diagnostics.borrow_mut().push(diagnostic);
    }
}
