//! Unit tests for declarative files.

use std::rc::Rc;

use super::{
    compiler::compile_declarative_source,
    parser::parse_component,
    sema::{check_component, ComponentKind, DeclValue},
};
use crate::{
    errors::diagnostics::{DiagnosticsCollector, Severity},
    lexer::lexer::tokenize,
    sema::{builtin_context::create_builtin_context, functions::FunctionBody, registry::Registry},
};

fn check(source: &str) -> (Option<super::sema::Component>, DiagnosticsCollector) {
    let tokens = tokenize(source.to_string(), Some("CMakeLists.dcmsl".to_string())).unwrap();
    let node = parse_component(tokens, Rc::new("CMakeLists.dcmsl".to_string())).unwrap();
    let errs = DiagnosticsCollector::new();
    let component = check_component(&node, &errs);
    (component, errs)
}

#[test]
fn test_parse_both_assignment_spellings() {
    let tokens = tokenize(
        "library { name = \"foo\"; files: [\"a.cpp\", \"b.cpp\",]; }".to_string(),
        None,
    )
    .unwrap();
    let node = parse_component(tokens, Rc::new("x".to_string())).unwrap();

    assert_eq!(node.name.value, "library");
    assert_eq!(node.properties.len(), 2);
    assert_eq!(node.properties[1].name.value, "files");
}

#[test]
fn test_parse_rejects_trailing_tokens() {
    let tokens = tokenize("library { } library { }".to_string(), None).unwrap();
    assert!(parse_component(tokens, Rc::new("x".to_string())).is_err());
}

#[test]
fn test_check_library() {
    let (component, errs) = check(
        "library { name = \"foo\"; files = [\"foo.cpp\"]; include_dirs = [\"include\"]; }",
    );
    let component = component.expect("component should check");

    assert!(!errs.has_errors());
    assert_eq!(component.kind, ComponentKind::Library);
    assert_eq!(component.name(), "foo");
    assert_eq!(component.strings("files"), vec!["foo.cpp"]);
    assert_eq!(component.strings("include_dirs"), vec!["include"]);
    assert!(component.strings("link_to").is_empty());
}

#[test]
fn test_check_errors() {
    let (component, errs) = check("widget { name = \"foo\"; }");
    assert!(component.is_none());
    assert_eq!(
        errs.messages(Severity::Error),
        vec!["unknown component type 'widget'"]
    );

    let (_, errs) = check("library { name = \"foo\"; colour = \"red\"; }");
    assert_eq!(
        errs.messages(Severity::Error),
        vec!["component 'library' has no property 'colour'"]
    );

    let (_, errs) = check("library { name = 1; files = []; }");
    assert_eq!(
        errs.messages(Severity::Error),
        vec!["property 'name' expects 'string', got 'int'"]
    );

    let (_, errs) = check("executable { name = \"app\"; }");
    assert_eq!(
        errs.messages(Severity::Error),
        vec!["component 'executable' requires property 'files'"]
    );

    let (_, errs) = check("library { name = \"foo\"; files = [\"a\", 1]; }");
    assert_eq!(
        errs.messages(Severity::Error),
        vec!["all values of a list property must have the same type"]
    );
}

#[test]
fn test_value_type_names() {
    assert_eq!(DeclValue::Int(1).type_name(), "int");
    assert_eq!(
        DeclValue::List(vec![DeclValue::String("a".into())]).type_name(),
        "list<string>"
    );
}

#[test]
fn test_compile_creates_function() {
    let mut registry = Registry::new();
    let (builtins, _) = create_builtin_context(&mut registry);
    let errs = DiagnosticsCollector::new();

    let function = compile_declarative_source(
        "executable { name = \"app\"; files = [\"main.cpp\"]; }".to_string(),
        "CMakeLists.dcmsl",
        &mut registry,
        &builtins,
        &errs,
    )
    .expect("declarative file should compile");

    let function = registry.function(function);
    assert_eq!(function.return_type, Some(builtins.executable));
    assert!(function.params().is_empty());
    assert!(matches!(function.body, FunctionBody::ComponentCreation(_)));
}

#[test]
fn test_compile_reports_syntax_errors() {
    let mut registry = Registry::new();
    let (builtins, _) = create_builtin_context(&mut registry);
    let errs = DiagnosticsCollector::new();

    let function = compile_declarative_source(
        "library { name = ; }".to_string(),
        "CMakeLists.dcmsl",
        &mut registry,
        &builtins,
        &errs,
    );

    assert!(function.is_none());
    assert_eq!(errs.error_count(), 1);
}
