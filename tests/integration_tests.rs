//! Integration tests for end-to-end execution.
//!
//! These tests drive the whole pipeline, from source text through
//! tokenization, parsing, semantic analysis and interpretation, against a
//! recording build-system facade.

use cmsl::{
    config::Config,
    errors::diagnostics::Severity,
    exec::{
        facade::{CmakeFacade, FacadeCall, RecordingFacade, Visibility},
        source_executor::{InMemorySources, SourceExecutor},
    },
};

fn executor(sources: InMemorySources) -> SourceExecutor {
    SourceExecutor::new(Config::default(), Box::new(sources))
}

fn run(source: &str) -> (Option<i64>, RecordingFacade) {
    let mut facade = RecordingFacade::default();
    let mut executor = executor(InMemorySources::new());
    let result = executor.execute(source, &mut facade);
    assert!(
        !executor.has_errors(),
        "compilation failed:\n{}",
        executor.format_diagnostics()
    );
    (result, facade)
}

fn run_files(files: &[(&str, &str)]) -> (Option<i64>, RecordingFacade, SourceExecutor) {
    let sources = files
        .iter()
        .fold(InMemorySources::new(), |sources, (path, text)| {
            sources.with_file(path, text)
        });

    let mut facade = RecordingFacade::default();
    let mut executor = executor(sources);
    let result = executor.execute_file("CMakeLists.cmsl".as_ref(), &mut facade);
    (result, facade, executor)
}

fn errors_of(source: &str) -> Vec<String> {
    let mut facade = RecordingFacade::default();
    let mut executor = executor(InMemorySources::new());
    assert_eq!(executor.execute(source, &mut facade), None);
    assert!(facade.calls().is_empty(), "nothing should run");

    executor
        .diagnostics()
        .into_iter()
        .filter(|d| d.severity == Severity::Error)
        .map(|d| d.message)
        .collect()
}

#[test]
fn test_while_loop_scenario() {
    let (result, _) = run("int main(){ int i = 1; while (i < 5) { i = i + 1; } return i; }");
    assert_eq!(result, Some(5));
}

#[test]
fn test_class_member_scenario() {
    let (result, _) = run("class P { int v; }; int main() { P p; p.v = 7; return p.v; }");
    assert_eq!(result, Some(7));
}

#[test]
fn test_add_library_scenario() {
    let (result, facade) = run(
        "int main() {\n\
            auto lib = cmake::project(\"foo\").add_library(\"name\", {\"a.cpp\", \"b.cpp\"});\n\
            cmake::message(lib.name());\n\
            return 0;\n\
        }",
    );

    assert_eq!(result, Some(0));
    let libraries: Vec<_> = facade
        .calls()
        .iter()
        .filter(|call| matches!(call, FacadeCall::AddLibrary { .. }))
        .collect();
    assert_eq!(
        libraries,
        vec![&FacadeCall::AddLibrary {
            name: String::from("name"),
            sources: vec![String::from("a.cpp"), String::from("b.cpp")],
        }]
    );
    assert_eq!(facade.messages(), vec!["name"]);
}

#[test]
fn test_builtin_operators() {
    let (result, facade) = run(
        "int main() {\n\
            cmake::message((int(3) + int(4)).to_string());\n\
            cmake::message(\"ab\" + \"cd\");\n\
            double d = 1.0 / 4.0;\n\
            cmake::message(d.to_string());\n\
            bool b = true && !false;\n\
            cmake::message(b.to_string());\n\
            bool less = version(1, 2) < version(1, 10);\n\
            cmake::message(less.to_string());\n\
            bool ordered = \"abc\" < \"abd\";\n\
            cmake::message(ordered.to_string());\n\
            return 17 % 5;\n\
        }",
    );

    assert_eq!(result, Some(2));
    assert_eq!(
        facade.messages(),
        vec!["7", "abcd", "0.25", "true", "true", "true"]
    );
}

#[test]
fn test_auto_variable_drops_reference() {
    let (result, _) = run(
        "int main() { int x = 1; int& r = x; auto copy = r; copy = 9; return x; }",
    );
    assert_eq!(result, Some(1));
}

#[test]
fn test_auto_return_type_is_deduced() {
    let mut facade = RecordingFacade::default();
    let mut executor = executor(InMemorySources::new());
    let program = executor
        .compile_source("auto twice(int v) { if (v > 0) { return v * 2; } return 0; } int main() { return twice(21); }")
        .expect("program should compile");

    let twice = program
        .registry
        .functions_in_context(program.builtins.global_context, "twice")[0];
    assert_eq!(
        program.registry.function(twice).return_type,
        Some(program.builtins.int)
    );
    assert_eq!(executor.run(&program, &mut facade), Some(42));
}

#[test]
fn test_inconsistent_auto_return_type() {
    assert_eq!(
        errors_of("auto f(bool b) { if (b) { return 1; } return \"a\"; } int main() { return 0; }"),
        vec!["inconsistent deduction for auto return type"]
    );
}

#[test]
fn test_unknown_names_prevent_execution() {
    assert_eq!(
        errors_of("int main() { cmake::message(\"x\"); return g(); }"),
        vec!["'g' function not found"]
    );
    assert_eq!(
        errors_of("int main() { cmake::message(\"x\"); return y; }"),
        vec!["'y' identifier not found"]
    );
}

#[test]
fn test_break_leaves_innermost_loop() {
    let (result, _) = run(
        "int main() {\n\
            int rounds = 0;\n\
            int steps = 0;\n\
            while (rounds < 4) {\n\
                rounds += 1;\n\
                while (true) {\n\
                    steps += 1;\n\
                    if (steps % 2 == 0) { break; }\n\
                }\n\
            }\n\
            return rounds * 100 + steps;\n\
        }",
    );
    assert_eq!(result, Some(408));
}

#[test]
fn test_break_outside_loop_is_rejected() {
    assert_eq!(
        errors_of("int main() { break; return 0; }"),
        vec!["break can be used only inside a loop"]
    );
}

#[test]
fn test_reference_variable_writes_through() {
    let (result, _) = run("int main() { int x = 1; int& r = x; r = 5; return x; }");
    assert_eq!(result, Some(5));
}

#[test]
fn test_returned_reference_aliases_argument() {
    let (result, _) = run(
        "int& f(int& p) { p = 10; return p; }\n\
         int main() { int x = 1; int& r = f(x); r = 20; return x; }",
    );
    assert_eq!(result, Some(20));
}

#[test]
fn test_import_round_trip() {
    let (result, _, executor) = run_files(&[
        (
            "CMakeLists.cmsl",
            "import \"shapes.cmsl\";\n\
             int main() { T t; t.v = 4; return f(t); }",
        ),
        (
            "shapes.cmsl",
            "export class T { int v; };\n\
             export int f(T t) { return t.v * 3; }",
        ),
    ]);

    assert_eq!(result, Some(12), "{}", executor.format_diagnostics());
}

#[test]
fn test_failed_import_is_reported() {
    let (result, _, executor) = run_files(&[(
        "CMakeLists.cmsl",
        "import \"missing.cmsl\"; int main() { return 0; }",
    )]);

    assert_eq!(result, None);
    let errors: Vec<_> = executor.diagnostics().into_iter().map(|d| d.message).collect();
    assert!(errors.contains(&String::from("could not read 'missing.cmsl'")), "{:?}", errors);
}

#[test]
fn test_add_subdirectory_with_script() {
    let (result, facade, executor) = run_files(&[
        (
            "CMakeLists.cmsl",
            "int main() {\n\
                cmake::project p = cmake::project(\"app\");\n\
                auto lib = add_subdirectory(\"lib\", p);\n\
                auto exe = p.add_executable(\"app\", {\"main.cpp\"});\n\
                exe.link_to(lib);\n\
                return 0;\n\
            }",
        ),
        (
            "lib/CMakeLists.cmsl",
            "cmake::library main(cmake::project& p) {\n\
                cmake::message(cmake::current_source_dir());\n\
                return p.add_library(\"core\", {\"core.cpp\"});\n\
            }",
        ),
    ]);

    assert_eq!(result, Some(0), "{}", executor.format_diagnostics());
    assert_eq!(facade.messages(), vec!["./lib"]);

    let structural: Vec<_> = facade
        .calls()
        .iter()
        .filter(|call| !matches!(call, FacadeCall::Message(_)))
        .cloned()
        .collect();
    assert_eq!(
        structural,
        vec![
            FacadeCall::RegisterProject(String::from("app")),
            FacadeCall::GoIntoSubdirectory(String::from("lib")),
            FacadeCall::AddLibrary {
                name: String::from("core"),
                sources: vec![String::from("core.cpp")],
            },
            FacadeCall::GoDirectoryUp,
            FacadeCall::AddExecutable {
                name: String::from("app"),
                sources: vec![String::from("main.cpp")],
            },
            FacadeCall::TargetLinkLibrary {
                target: String::from("app"),
                visibility: Visibility::Private,
                library: String::from("core"),
            },
        ]
    );
}

#[test]
fn test_add_subdirectory_with_declarative_file() {
    let (result, facade, executor) = run_files(&[
        (
            "CMakeLists.cmsl",
            "int main() {\n\
                auto lib = add_subdirectory(\"util\");\n\
                cmake::message(lib.name());\n\
                return 0;\n\
            }",
        ),
        (
            "util/CMakeLists.dcmsl",
            "library {\n\
                name = \"util\";\n\
                files = [\"util.cpp\"];\n\
                include_dirs = [\"include\"];\n\
            }",
        ),
    ]);

    assert_eq!(result, Some(0), "{}", executor.format_diagnostics());
    assert_eq!(facade.messages(), vec!["util"]);
    assert!(facade.calls().contains(&FacadeCall::AddLibrary {
        name: String::from("util"),
        sources: vec![String::from("util.cpp")],
    }));
}

#[test]
fn test_add_subdirectory_with_old_script() {
    let (result, facade, _) = run_files(&[
        (
            "CMakeLists.cmsl",
            "int main() { add_subdirectory(\"legacy\"); return 0; }",
        ),
        ("legacy/CMakeLists.txt", "add_library(legacy legacy.cpp)"),
    ]);

    assert_eq!(result, Some(0));
    assert_eq!(
        facade.calls(),
        &[FacadeCall::AddSubdirectoryWithOldScript(String::from("legacy"))]
    );
}

#[test]
fn test_missing_subdirectory_is_reported() {
    let (result, _, executor) = run_files(&[(
        "CMakeLists.cmsl",
        "int main() { add_subdirectory(\"nowhere\"); return 0; }",
    )]);

    assert_eq!(result, None);
    let errors: Vec<_> = executor.diagnostics().into_iter().map(|d| d.message).collect();
    assert!(
        errors.contains(&String::from("failed to add subdirectory 'nowhere'")),
        "{:?}",
        errors
    );
}

#[test]
fn test_fatal_error_stops_later_statements() {
    let (result, facade) = run(
        "int count = 0;\n\
         void step() { count += 1; if (count == 2) { cmake::fatal_error(\"second step\"); } }\n\
         int main() {\n\
             while (true) { step(); cmake::message(count.to_string()); }\n\
             return 0;\n\
         }",
    );

    assert_eq!(result, None);
    assert_eq!(facade.messages(), vec!["1"]);
    assert!(facade.did_fatal_error_occur());
}
