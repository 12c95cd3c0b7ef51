//! Unit tests for the parser module.
//!
//! This module contains tests for parsing various language constructs including:
//! - Variable and function declarations
//! - Expressions and operator precedence
//! - Control flow statements
//! - Classes, enums, namespaces and imports
//! - Initializer lists and designated initializers

use std::rc::Rc;

use super::parser::parse;
use crate::{
    ast::ast::{Expr, Stmt, TranslationUnit},
    errors::errors::Error,
    lexer::lexer::tokenize,
};

fn parse_source(source: &str) -> Result<TranslationUnit, Error> {
    let tokens = tokenize(source.to_string(), Some("test.cmsl".to_string()))?;
    parse(tokens, Rc::new("test.cmsl".to_string()))
}

fn first_fn_body(unit: &TranslationUnit) -> &Vec<Stmt> {
    match &unit.body[0] {
        Stmt::FnDecl(f) => &f.body.body,
        other => panic!("expected a function, got {:?}", other),
    }
}

#[test]
fn test_parse_variable_declaration() {
    let unit = parse_source("int x = 42;").unwrap();

    let Stmt::VarDecl(decl) = &unit.body[0] else {
        panic!("expected a variable declaration");
    };
    assert_eq!(decl.ty.to_string(), "int");
    assert_eq!(decl.name.value, "x");
    assert!(matches!(decl.initialization, Some(Expr::Int(ref i)) if i.value == 42));
    assert!(!decl.exported);
}

#[test]
fn test_parse_generic_and_reference_types() {
    let unit = parse_source("list<list<string>> a; cmake::library& lib = x;").unwrap();

    let Stmt::VarDecl(first) = &unit.body[0] else {
        panic!("expected a variable declaration");
    };
    assert_eq!(first.ty.to_string(), "list<list<string>>");

    let Stmt::VarDecl(second) = &unit.body[1] else {
        panic!("expected a variable declaration");
    };
    assert_eq!(second.ty.to_string(), "cmake::library&");
    assert!(second.ty.is_reference);
    assert_eq!(second.ty.primary_name(), "library");
}

#[test]
fn test_parse_function_declaration() {
    let unit = parse_source("int add(int a, int& b) { return a + b; }").unwrap();

    let Stmt::FnDecl(f) = &unit.body[0] else {
        panic!("expected a function declaration");
    };
    assert_eq!(f.name.value, "add");
    assert_eq!(f.params.len(), 2);
    assert!(f.params[1].ty.is_reference);
    assert!(matches!(f.body.body[0], Stmt::Return(_)));
}

#[test]
fn test_parse_auto_function() {
    let unit = parse_source("auto f() { return 1; }").unwrap();

    let Stmt::FnDecl(f) = &unit.body[0] else {
        panic!("expected a function declaration");
    };
    assert!(f.return_type.is_auto());
}

#[test]
fn test_parse_precedence() {
    let unit = parse_source("int main() { 1 + 2 * 3 == 7; }").unwrap();

    let Stmt::Expression(stmt) = &first_fn_body(&unit)[0] else {
        panic!("expected an expression statement");
    };
    let Expr::Binary(eq) = &stmt.expression else {
        panic!("expected a binary expression");
    };
    assert_eq!(eq.operator.value, "==");

    let Expr::Binary(plus) = eq.lhs.as_ref() else {
        panic!("expected a binary expression");
    };
    assert_eq!(plus.operator.value, "+");
    assert!(matches!(plus.rhs.as_ref(), Expr::Binary(b) if b.operator.value == "*"));
}

#[test]
fn test_parse_assignment_is_right_associative() {
    let unit = parse_source("int main() { a = b = 3; }").unwrap();

    let Stmt::Expression(stmt) = &first_fn_body(&unit)[0] else {
        panic!("expected an expression statement");
    };
    let Expr::Binary(outer) = &stmt.expression else {
        panic!("expected a binary expression");
    };
    assert!(matches!(outer.lhs.as_ref(), Expr::Id(_)));
    assert!(matches!(outer.rhs.as_ref(), Expr::Binary(b) if b.operator.value == "="));
}

#[test]
fn test_parse_less_than_is_not_generic() {
    let unit = parse_source("int main() { while (i < 5) { i = i + 1; } }").unwrap();

    let Stmt::While(w) = &first_fn_body(&unit)[0] else {
        panic!("expected a while loop");
    };
    assert!(matches!(&w.condition, Expr::Binary(b) if b.operator.value == "<"));
}

#[test]
fn test_parse_generic_constructor_call() {
    let unit = parse_source("int main() { auto e = extern<int>(\"X\"); }").unwrap();

    let Stmt::VarDecl(decl) = &first_fn_body(&unit)[0] else {
        panic!("expected a variable declaration");
    };
    let Some(Expr::Call(call)) = &decl.initialization else {
        panic!("expected a call");
    };
    assert_eq!(call.callee.to_string(), "extern<int>");
    assert_eq!(call.args.len(), 1);
}

#[test]
fn test_parse_member_calls_chain() {
    let unit =
        parse_source("int main() { cmake::project(\"foo\").add_library(\"lib\", {\"a.cpp\"}); }")
            .unwrap();

    let Stmt::Expression(stmt) = &first_fn_body(&unit)[0] else {
        panic!("expected an expression statement");
    };
    let Expr::MemberCall(call) = &stmt.expression else {
        panic!("expected a member call");
    };
    assert_eq!(call.name.value, "add_library");
    assert!(matches!(call.lhs.as_ref(), Expr::Call(c) if c.callee.to_string() == "cmake::project"));
    assert!(matches!(&call.args[1], Expr::InitializerList(l) if l.values.len() == 1));
}

#[test]
fn test_parse_if_else_chain() {
    let source = "int main() { if (a) { } else if (b) { } else { } }";
    let unit = parse_source(source).unwrap();

    let Stmt::If(stmt) = &first_fn_body(&unit)[0] else {
        panic!("expected an if statement");
    };
    assert_eq!(stmt.ifs.len(), 2);
    assert!(stmt.else_body.is_some());
}

#[test]
fn test_parse_for_loop() {
    let unit = parse_source("int main() { for (int i = 0; i < 3; ++i) { break; } }").unwrap();

    let Stmt::For(stmt) = &first_fn_body(&unit)[0] else {
        panic!("expected a for loop");
    };
    assert!(matches!(stmt.init.as_deref(), Some(Stmt::VarDecl(_))));
    assert!(stmt.condition.is_some());
    assert!(matches!(&stmt.iteration, Some(Expr::Unary(_))));
    assert!(matches!(stmt.body.body[0], Stmt::Break(_)));
}

#[test]
fn test_parse_empty_for_loop() {
    let unit = parse_source("int main() { for (;;) { break; } }").unwrap();

    let Stmt::For(stmt) = &first_fn_body(&unit)[0] else {
        panic!("expected a for loop");
    };
    assert!(stmt.init.is_none());
    assert!(stmt.condition.is_none());
    assert!(stmt.iteration.is_none());
}

#[test]
fn test_parse_class_with_base_and_constructor() {
    let source = "class D : B { int v; D(int x) { v = x; } int get() { return v; } };";
    let unit = parse_source(source).unwrap();

    let Stmt::ClassDecl(class) = &unit.body[0] else {
        panic!("expected a class");
    };
    assert_eq!(class.name.value, "D");
    assert_eq!(class.base.as_ref().map(|b| b.to_string()), Some("B".to_string()));
    assert_eq!(class.members.len(), 3);
}

#[test]
fn test_parse_enum() {
    let unit = parse_source("enum color { red, green, blue };").unwrap();

    let Stmt::EnumDecl(e) = &unit.body[0] else {
        panic!("expected an enum");
    };
    let names: Vec<_> = e.enumerators.iter().map(|t| t.value.as_str()).collect();
    assert_eq!(names, vec!["red", "green", "blue"]);
}

#[test]
fn test_parse_namespace_and_export() {
    let source = "namespace a::b { export int x = 1; export class C {} }";
    let unit = parse_source(source).unwrap();

    let Stmt::Namespace(ns) = &unit.body[0] else {
        panic!("expected a namespace");
    };
    assert_eq!(ns.names.len(), 2);
    assert!(matches!(&ns.body[0], Stmt::VarDecl(v) if v.exported));
    assert!(matches!(&ns.body[1], Stmt::ClassDecl(c) if c.exported));
}

#[test]
fn test_parse_import() {
    let unit = parse_source("import \"foo/bar.cmsl\";").unwrap();

    let Stmt::Import(import) = &unit.body[0] else {
        panic!("expected an import");
    };
    assert_eq!(import.path.value, "foo/bar.cmsl");
}

#[test]
fn test_parse_designated_initializers_both_spellings() {
    let unit = parse_source("P a = {.x = 1, .y = 2}; P b = {x: 1, y: 2};").unwrap();

    for stmt in &unit.body {
        let Stmt::VarDecl(decl) = stmt else {
            panic!("expected a variable declaration");
        };
        let Some(Expr::DesignatedInitializers(init)) = &decl.initialization else {
            panic!("expected designated initializers");
        };
        assert_eq!(init.initializers.len(), 2);
        assert_eq!(init.initializers[1].name.value, "y");
    }
}

#[test]
fn test_parse_ternary() {
    let unit = parse_source("int x = a ? 1 : 2;").unwrap();

    let Stmt::VarDecl(decl) = &unit.body[0] else {
        panic!("expected a variable declaration");
    };
    assert!(matches!(decl.initialization, Some(Expr::Ternary(_))));
}

#[test]
fn test_parse_missing_semicolon_fails() {
    assert!(parse_source("int x = 1").is_err());
}

#[test]
fn test_parse_unclosed_block_fails() {
    assert!(parse_source("int main() { return 1;").is_err());
}

#[test]
fn test_parse_export_without_declaration_fails() {
    assert!(parse_source("export 1 + 2;").is_err());
}
