//! Unit tests for semantic analysis.
//!
//! Covers the registry and generic types, the qualified contexts, overload
//! resolution and the diagnostics and casts produced by the builder.

use std::rc::Rc;

use super::{
    builder::{BuildResult, SemaBuilder},
    builtin_context::{create_builtin_context, BuiltinTypes},
    dumper::dump,
    generic_type_factory::{GenericFamily, GenericTypeFactory},
    handlers::NoopHandlers,
    overload_resolution::OverloadResolution,
    qualified_contexts::{MergeDecision, QualifiedContext},
    registry::Registry,
};
use crate::{
    errors::diagnostics::{DiagnosticsCollector, Severity},
    lexer::lexer::tokenize,
    parser::parser::parse,
};

struct Built {
    registry: Registry,
    builtins: BuiltinTypes,
    result: Option<BuildResult>,
    errs: DiagnosticsCollector,
}

fn build(source: &str) -> Built {
    let tokens = tokenize(source.to_string(), Some("test.cmsl".to_string())).unwrap();
    let unit = parse(tokens, Rc::new("test.cmsl".to_string())).unwrap();

    let mut registry = Registry::new();
    let (builtins, contexts) = create_builtin_context(&mut registry);
    let errs = DiagnosticsCollector::new();
    let mut handlers = NoopHandlers;

    let result =
        SemaBuilder::new(&mut registry, &errs, builtins, contexts, &mut handlers).build(&unit);

    Built {
        registry,
        builtins,
        result,
        errs,
    }
}

fn errors_of(source: &str) -> Vec<String> {
    let built = build(source);
    assert!(built.result.is_none(), "expected the build to fail");
    built.errs.messages(Severity::Error)
}

fn dump_of(source: &str) -> String {
    let built = build(source);
    let result = built
        .result
        .unwrap_or_else(|| panic!("build failed: {:?}", built.errs.diagnostics()));
    dump(&built.registry, &result.unit)
}

#[test]
fn test_generic_types_are_memoized() {
    let mut registry = Registry::new();
    let (builtins, _) = create_builtin_context(&mut registry);

    let first = GenericTypeFactory::new(&mut registry, &builtins)
        .create_homogeneous_generic(GenericFamily::List, builtins.int);
    let count = registry.type_count();
    let second = GenericTypeFactory::new(&mut registry, &builtins)
        .create_homogeneous_generic(GenericFamily::List, builtins.int);

    assert_eq!(first, second);
    assert_eq!(registry.type_count(), count);
    assert_eq!(registry.type_name(first), "list<int>");
}

#[test]
fn test_reference_types_are_memoized() {
    let mut registry = Registry::new();
    let (builtins, _) = create_builtin_context(&mut registry);

    let reference = registry.create_reference(builtins.int);
    assert_eq!(registry.create_reference(builtins.int), reference);
    assert_eq!(registry.create_reference(reference), reference);
    assert_eq!(registry.type_name(reference), "int&");
    assert_eq!(registry.decayed(reference), builtins.int);
}

#[test]
fn test_library_derives_from_target() {
    let mut registry = Registry::new();
    let (builtins, _) = create_builtin_context(&mut registry);

    assert!(registry.is_derived_from(builtins.library, builtins.target));
    assert!(!registry.is_derived_from(builtins.target, builtins.library));
}

#[test]
fn test_qualified_context_innermost_wins() {
    let mut ctx: QualifiedContext<u32> = QualifiedContext::new();
    ctx.register("x", 1, false);
    ctx.enter_local_ctx();
    ctx.register("x", 2, false);

    assert_eq!(ctx.find(&["x".to_string()]), Some(2));
    assert_eq!(ctx.find_all(&["x".to_string()]), vec![vec![2], vec![1]]);

    ctx.leave_ctx();
    assert_eq!(ctx.find(&["x".to_string()]), Some(1));
}

#[test]
fn test_qualified_context_named_scopes_are_reentered() {
    let mut ctx: QualifiedContext<u32> = QualifiedContext::new();
    ctx.enter_global_ctx("foo", false);
    ctx.register("a", 1, false);
    ctx.leave_ctx();
    ctx.enter_global_ctx("foo", false);
    ctx.register("b", 2, false);
    ctx.leave_ctx();

    assert_eq!(ctx.find(&["foo".to_string(), "a".to_string()]), Some(1));
    assert_eq!(ctx.find(&["foo".to_string(), "b".to_string()]), Some(2));
    assert_eq!(ctx.find(&["a".to_string()]), None);
}

#[test]
fn test_qualified_context_export_and_merge() {
    let mut module: QualifiedContext<u32> = QualifiedContext::new();
    module.register("hidden", 1, false);
    module.enter_global_ctx("ns", false);
    module.register("shown", 2, true);
    module.leave_ctx();

    let exported = module.collect_exported_stuff();
    assert_eq!(exported.find(&["hidden".to_string()]), None);

    let mut importer: QualifiedContext<u32> = QualifiedContext::new();
    importer
        .merge_imported_stuff(&exported, |_, _| MergeDecision::Conflict)
        .unwrap();
    assert_eq!(
        importer.find(&["ns".to_string(), "shown".to_string()]),
        Some(2)
    );

    // Imported entries are not exported again
    let reexported = importer.collect_exported_stuff();
    assert_eq!(reexported.find(&["ns".to_string(), "shown".to_string()]), None);

    let result = importer.merge_imported_stuff(&exported, |_, _| MergeDecision::Conflict);
    assert_eq!(result, Err(String::from("shown")));
}

#[test]
fn test_overload_scores() {
    let mut registry = Registry::new();
    let (b, _) = create_builtin_context(&mut registry);
    let int_ref = registry.create_reference(b.int);

    assert_eq!(OverloadResolution::score(&registry, b.int, b.int), Some(3));
    assert_eq!(OverloadResolution::score(&registry, int_ref, b.int), Some(2));
    assert_eq!(
        OverloadResolution::score(&registry, b.target, b.library),
        Some(1)
    );
    assert_eq!(OverloadResolution::score(&registry, b.int, b.string), None);
}

#[test]
fn test_builds_simple_program() {
    let built = build("int main() { int a = 1 + 2 * 3; return a; }");
    let result = built.result.expect("build should succeed");

    assert!(result.main.is_some());
    assert!(!built.errs.has_errors());
}

#[test]
fn test_auto_variable_takes_initializer_type() {
    let dump = dump_of("int main() { auto x = 5; return x; }");
    assert!(dump.contains("variable_declaration int x"), "{}", dump);
}

#[test]
fn test_reference_declaration_inserts_cast() {
    let dump = dump_of("int main() { int x = 1; int& r = x; int y = r; return y; }");

    assert!(dump.contains("variable_declaration int& r"), "{}", dump);
    assert!(dump.contains("cast_to_reference int&"), "{}", dump);
    assert!(dump.contains("cast_to_value int"), "{}", dump);
}

#[test]
fn test_derived_to_base_reference_cast() {
    let dump = dump_of(
        "void use(cmake::target& t) {}\n\
         int main() { cmake::project p = cmake::project(\"p\"); \
         auto lib = p.add_library(\"l\", {\"a.cpp\"}); use(lib); return 0; }",
    );
    assert!(dump.contains("cast_to_reference_to_base cmake::target&"), "{}", dump);
}

#[test]
fn test_auto_return_type_is_deduced() {
    let built = build("auto f() { return 1; } int main() { int x = f(); return x; }");
    assert!(built.result.is_some(), "{:?}", built.errs.diagnostics());
}

#[test]
fn test_inconsistent_auto_deduction() {
    let built = build("auto f(bool b) { if (b) { return 1; } return \"a\"; }");

    assert!(built.result.is_none());
    assert_eq!(
        built.errs.messages(Severity::Error),
        vec!["inconsistent deduction for auto return type"]
    );
    assert_eq!(
        built.errs.messages(Severity::Note),
        vec!["deduced as 'int'", "deduced as 'string'"]
    );
}

#[test]
fn test_recursive_auto_call() {
    assert_eq!(
        errors_of("auto f() { return f(); }"),
        vec!["recursively calling function with 'auto' return type is forbidden"]
    );
}

#[test]
fn test_not_found_errors() {
    assert_eq!(
        errors_of("int main() { return y; }"),
        vec!["'y' identifier not found"]
    );
    assert_eq!(
        errors_of("int main() { return g(); }"),
        vec!["'g' function not found"]
    );
    assert_eq!(
        errors_of("int main() { int x = 1; return x.foo(); }"),
        vec!["int does not have member function foo"]
    );
}

#[test]
fn test_break_outside_loop() {
    assert_eq!(
        errors_of("int main() { break; return 0; }"),
        vec!["break can be used only inside a loop"]
    );
    assert!(build("int main() { while (true) { break; } return 0; }")
        .result
        .is_some());
}

#[test]
fn test_variable_errors() {
    assert_eq!(
        errors_of("int main() { void v; return 0; }"),
        vec!["Variable can not be of void type"]
    );
    assert_eq!(
        errors_of("int main() { auto v; return 0; }"),
        vec!["Declaration of a variable with 'auto' type requires an initializer"]
    );
    assert_eq!(
        errors_of("int main() { int& r; return 0; }"),
        vec!["Declaration of a reference variable requires an initializer"]
    );
    assert_eq!(
        errors_of("int main() { export int x = 1; return 0; }"),
        vec!["exporting local variables is not allowed"]
    );
}

#[test]
fn test_type_redefinition_has_note() {
    let built = build("class A {}; class A {};");

    assert_eq!(built.errs.messages(Severity::Error), vec!["type redefinition"]);
    assert_eq!(built.errs.messages(Severity::Note), vec!["previously defined here"]);
}

#[test]
fn test_function_redefinition() {
    let built = build("int f(int a) { return a; } int f(int b) { return b; }");

    assert_eq!(built.errs.messages(Severity::Error), vec!["function redefinition"]);
    assert_eq!(
        built.errs.messages(Severity::Note),
        vec!["previous definition is here"]
    );

    // Overloads with different parameters are fine
    assert!(build("int f(int a) { return a; } int f(string s) { return 1; }")
        .result
        .is_some());
}

#[test]
fn test_enumerator_redefinition() {
    assert_eq!(
        errors_of("enum color { red, red };"),
        vec!["enumerator redefinition"]
    );
}

#[test]
fn test_ambiguous_call_lists_candidates() {
    let built = build(
        "class B {}; class D : B {};\n\
         void f(B& b, D d) {} void f(D d, B& b) {}\n\
         int main() { D d; f(d, d); return 0; }",
    );

    assert_eq!(
        built.errs.messages(Severity::Error),
        vec!["ambiguous call to 'f'"]
    );
    assert_eq!(built.errs.messages(Severity::Note).len(), 2);
}

#[test]
fn test_condition_must_be_bool() {
    assert_eq!(
        errors_of("int main() { if (1) { } return 0; }"),
        vec!["expected bool value, got int"]
    );
}

#[test]
fn test_ternary_operand_types() {
    assert_eq!(
        errors_of("int main() { auto x = true ? 1 : \"a\"; return 0; }"),
        vec!["incompatible operand types. int and string"]
    );
}

#[test]
fn test_initializer_list_errors() {
    assert_eq!(
        errors_of("int main() { auto l = {1, \"a\"}; return 0; }"),
        vec!["all values of initializer list must have the same type"]
    );
}

#[test]
fn test_initializer_list_type() {
    let built = build("int main() { auto l = {1, 2}; return l.size(); }");
    let result = built.result.expect("build should succeed");
    let text = dump(&built.registry, &result.unit);

    assert!(text.contains("variable_declaration list<int> l"), "{}", text);
    assert!(built.registry.generic_type("list<int>").is_some());
}

#[test]
fn test_operator_not_supported() {
    assert_eq!(
        errors_of("int main() { bool b = true - false; return 0; }"),
        vec!["bool doesn't support operator -"]
    );
}

#[test]
fn test_designated_initializers() {
    let text = dump_of(
        "class P { int x; string s; };\n\
         int main() { P p = { .x = 1, s: \"a\" }; return p.x; }",
    );
    assert!(text.contains("designated_initializers P"), "{}", text);

    assert_eq!(
        errors_of("class P { int x; }; int main() { P p = { .y = 1 }; return 0; }"),
        vec!["P does not have member y"]
    );
    assert_eq!(
        errors_of("int main() { auto p = { .y = 1 }; return 0; }"),
        vec!["designated initializers require an explicit type"]
    );
}

#[test]
fn test_generic_errors() {
    assert_eq!(
        errors_of("list<int, int> l;"),
        vec!["list<> expects 1 generic parameter, got 2"]
    );
    assert_eq!(errors_of("list<foo> l;"), vec!["value type not found"]);
    assert_eq!(
        errors_of("extern<version> e = extern<version>(\"X\");"),
        vec!["wrong generic type of an extern<>. Got 'version', expected 'bool', 'int', 'double' or 'string'"]
    );
    assert_eq!(errors_of("int<int> i;"), vec!["'int' is not a generic type."]);
}

#[test]
fn test_import_without_handler_fails() {
    assert_eq!(errors_of("import \"other.cmsl\";"), vec!["Importing failed"]);
}

#[test]
fn test_add_subdirectory_requires_literal() {
    assert_eq!(
        errors_of("int main() { string d = \"x\"; add_subdirectory(d); return 0; }"),
        vec!["add_subdirectory expects a string literal as the directory name"]
    );
}

#[test]
fn test_namespaced_function_call() {
    let built = build(
        "namespace foo::bar { int f() { return 1; } }\n\
         int main() { return foo::bar::f(); }",
    );
    assert!(built.result.is_some(), "{:?}", built.errs.diagnostics());
}

#[test]
fn test_enum_constants_resolve() {
    let text = dump_of(
        "enum color { red, green };\n\
         int main() { color c = color::green; return 0; }",
    );
    assert!(text.contains("enum_constant color 1"), "{}", text);

    let built = build("int main() { cmake::visibility v = cmake::visibility::public; return 0; }");
    assert!(built.result.is_some(), "{:?}", built.errs.diagnostics());
    assert!(built.registry.ty(built.builtins.visibility).is_enum());
}
