//! Unit tests for error handling.
//!
//! This module contains tests for error types and diagnostics collection.

use crate::errors::diagnostics::{Diagnostic, DiagnosticsCollector, ErrorsObserver, Severity};
use crate::errors::errors::{Error, ErrorImpl, ErrorTip, SemaError};
use crate::{Position, Span};
use std::rc::Rc;

fn span_at(offset: u32) -> Span {
    let file = Rc::new("test.cmsl".to_string());
    Span {
        start: Position(offset, Rc::clone(&file)),
        end: Position(offset + 1, file),
    }
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        Position(10, Rc::new("test.cmsl".to_string())),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().0, 10);
    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_unexpected_token_tip() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "}".to_string(),
        },
        Position(0, Rc::new("test.cmsl".to_string())),
    );

    let tip = error.get_tip().to_string();
    assert!(tip.contains("`}`"));
    assert!(error.to_string().starts_with("unexpected token"));
}

#[test]
fn test_sema_error_messages() {
    assert_eq!(
        SemaError::ExpectedBool {
            got: "int".to_string()
        }
        .to_string(),
        "expected bool value, got int"
    );
    assert_eq!(
        SemaError::GenericParameterCount {
            name: "list".to_string(),
            got: 2
        }
        .to_string(),
        "list<> expects 1 generic parameter, got 2"
    );
    assert_eq!(
        SemaError::WrongExternType {
            got: "version".to_string()
        }
        .to_string(),
        "wrong generic type of an extern<>. Got 'version', expected 'bool', 'int', 'double' or 'string'"
    );
    assert_eq!(
        SemaError::TypeNotFound {
            name: "foo".to_string()
        }
        .to_string(),
        "foo type not found."
    );
}

#[test]
fn test_collector_counts_only_errors() {
    let collector = DiagnosticsCollector::new();
    collector.notify_error(Diagnostic::error(SemaError::TypeRedefinition, span_at(3)));
    collector.notify_error(Diagnostic::note(SemaError::PreviouslyDefinedHere, span_at(0)));

    assert_eq!(collector.error_count(), 1);
    assert!(collector.has_errors());
    assert_eq!(collector.messages(Severity::Note), vec!["previously defined here"]);
    assert_eq!(collector.diagnostics().len(), 2);

    collector.clear();
    assert!(!collector.has_errors());
}

#[test]
fn test_diagnostic_from_syntax_error() {
    let error = Error::new(
        ErrorImpl::NumberParseError {
            token: "99999999999999999999".to_string(),
        },
        Position(7, Rc::new("test.cmsl".to_string())),
    );

    let diagnostic = Diagnostic::from(&error);
    assert_eq!(diagnostic.severity, Severity::Error);
    assert_eq!(diagnostic.span.start.0, 7);
    assert!(diagnostic.message.contains("error parsing number"));
}
