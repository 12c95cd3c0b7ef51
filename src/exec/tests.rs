//! Unit tests for the interpreter, the builtins and the module loader.

use super::{
    facade::{CmakeFacade, FacadeCall, RecordingFacade, Visibility},
    instance::{create_default, Instance, InstanceValue, Version},
    source_executor::{normalize, InMemorySources, SourceExecutor},
};
use crate::{
    config::Config,
    errors::diagnostics::Severity,
    sema::{builtin_context::create_builtin_context, registry::Registry},
};

fn executor(sources: InMemorySources) -> SourceExecutor {
    SourceExecutor::new(Config::default(), Box::new(sources))
}

fn run_with(source: &str, facade: &mut RecordingFacade) -> Option<i64> {
    let mut executor = executor(InMemorySources::new());
    let result = executor.execute(source, facade);
    assert!(
        !executor.has_errors(),
        "compilation failed: {:?}",
        executor.diagnostics()
    );
    result
}

fn run(source: &str) -> (Option<i64>, RecordingFacade) {
    let mut facade = RecordingFacade::default();
    let result = run_with(source, &mut facade);
    (result, facade)
}

fn returns(source: &str) -> i64 {
    let (result, facade) = run(source);
    result.unwrap_or_else(|| panic!("run failed: {:?}", facade.calls()))
}

fn fatal_errors(facade: &RecordingFacade) -> Vec<String> {
    facade
        .calls()
        .iter()
        .filter_map(|call| match call {
            FacadeCall::FatalError(what) => Some(what.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_instance_alias_and_copy() {
    let mut registry = Registry::new();
    let (builtins, _) = create_builtin_context(&mut registry);

    let owned = Instance::new(builtins.int, InstanceValue::Int(1));
    let alias = owned.alias();
    let copy = owned.deep_copy();

    alias.set_value(InstanceValue::Int(5));
    assert_eq!(owned.as_int(), 5);
    assert_eq!(copy.as_int(), 1);
    assert!(alias.is_reference());
    assert!(!alias.clone().into_owned().is_reference());
}

#[test]
fn test_list_deep_copy_does_not_share_elements() {
    let mut registry = Registry::new();
    let (builtins, _) = create_builtin_context(&mut registry);

    let element = Instance::new(builtins.int, InstanceValue::Int(1));
    let list = Instance::new(builtins.int, InstanceValue::List(vec![element]));
    let copy = list.deep_copy();

    list.as_list()[0].set_value(InstanceValue::Int(2));
    assert_eq!(copy.as_list()[0].as_int(), 1);
}

#[test]
fn test_default_instances() {
    let mut registry = Registry::new();
    let (builtins, _) = create_builtin_context(&mut registry);

    assert_eq!(create_default(&registry, builtins.int).as_int(), 0);
    assert_eq!(create_default(&registry, builtins.string).as_string(), "");
    assert_eq!(
        create_default(&registry, builtins.version).as_version(),
        Version::default()
    );
    let int_ref = registry.create_reference(builtins.int);
    assert_eq!(create_default(&registry, int_ref).ty(), builtins.int);
}

#[test]
fn test_version_ordering_and_display() {
    assert!(Version::new(3, 10, 0, 0) > Version::new(3, 9, 9, 9));
    assert_eq!(Version::new(1, 2, 3, 4).to_string(), "1.2.3.4");
}

#[test]
fn test_recording_facade_directories() {
    let mut facade = RecordingFacade::new("/src");
    facade.go_into_subdirectory("lib");
    assert_eq!(facade.current_source_dir(), "/src/lib");
    assert_eq!(facade.current_binary_dir(), "/src/build/lib");
    facade.go_directory_up();
    assert_eq!(facade.current_source_dir(), "/src");
    assert!(!facade.did_fatal_error_occur());
    facade.fatal_error("boom");
    assert!(facade.did_fatal_error_occur());
}

#[test]
fn test_visibility_from_enum_value() {
    assert_eq!(Visibility::from_enum_value(0), Visibility::Private);
    assert_eq!(Visibility::from_enum_value(1), Visibility::Public);
    assert_eq!(Visibility::from_enum_value(2), Visibility::Interface);
}

#[test]
fn test_normalize_paths() {
    assert_eq!(normalize("./a/../b/c.cmsl".as_ref()), normalize("b/c.cmsl".as_ref()));
    assert_eq!(normalize("../x".as_ref()).to_str(), Some("../x"));
}

#[test]
fn test_int_arithmetic() {
    assert_eq!(returns("int main() { return 7 / 2 + 7 % 2 * 10 - -1; }"), 14);
    assert_eq!(
        returns("int main() { int a = 5; a += 3; a *= 2; a -= 1; ++a; --a; --a; return a; }"),
        14
    );
}

#[test]
fn test_double_and_bool_operators() {
    assert_eq!(
        returns("int main() { double d = 1.5; d *= 2.0; if (d == 3.0 && !(d < 1.0)) { return 1; } return 0; }"),
        1
    );
    assert_eq!(returns("int main() { return int(2.9) + int(true); }"), 3);
}

#[test]
fn test_string_functions() {
    let (result, facade) = run(
        "int main() {\n\
            string s = \"Hello\";\n\
            s += \", world\";\n\
            cmake::message(s.upper());\n\
            cmake::message(s.substr(7));\n\
            cmake::message(s.substr(0, 5).lower());\n\
            s.replace(0, 5, \"Bye\");\n\
            cmake::message(s);\n\
            s.insert(0, \">\");\n\
            s.erase(1, 3);\n\
            cmake::message(s);\n\
            cmake::message(string(\"ab\", 3));\n\
            return s.find(\"world\") + s.find_last(\"o\") * 100 + s.find(\"missing\") * 10000;\n\
        }",
    );

    assert_eq!(
        facade.messages(),
        vec!["HELLO, WORLD", "world", "hello", "Bye, world", ">, world", "ababab"]
    );
    assert_eq!(result, Some(3 + 4 * 100 - 10000));
}

#[test]
fn test_string_predicates() {
    assert_eq!(
        returns(
            "int main() { string s = \"abc.cpp\";\n\
             if (s.ends_with(\".cpp\") && s.starts_with(\"ab\") && s.contains(\"c.c\") && !s.empty()) {\n\
                 return s.size();\n\
             }\n\
             return 0; }"
        ),
        7
    );
    assert_eq!(
        returns("int main() { string s = \"  x  \"; return s.find_not_of(\" \") * 10 + s.find_last_not_of(\" \"); }"),
        22
    );
}

#[test]
fn test_to_string_conversions() {
    let (_, facade) = run(
        "int main() {\n\
            int i = 42;\n\
            bool b = true;\n\
            double d = 2.5;\n\
            version v = version(1, 2);\n\
            cmake::visibility vis = cmake::visibility::interface;\n\
            cmake::message(i.to_string());\n\
            cmake::message(b.to_string());\n\
            cmake::message(d.to_string());\n\
            cmake::message(v.to_string());\n\
            cmake::message(vis.to_string());\n\
            return 0;\n\
        }",
    );

    assert_eq!(
        facade.messages(),
        vec!["42", "true", "2.5", "1.2.0.0", "interface"]
    );
}

#[test]
fn test_version_comparisons() {
    assert_eq!(
        returns(
            "int main() { version v = version(3, 10, 2);\n\
             if (v > version(3, 9) && v <= version(3, 10, 2) && v != version(3)) { return v.minor(); }\n\
             return 0; }"
        ),
        10
    );
}

#[test]
fn test_list_functions() {
    let (result, facade) = run(
        "int main() {\n\
            list<int> l = {3, 1, 2};\n\
            l.push_back(5);\n\
            l.push_front(4);\n\
            l += 6;\n\
            l.sort();\n\
            l.at(0) = 10;\n\
            l.pop_back();\n\
            l.erase(1);\n\
            cmake::message(l.front().to_string() + \" \" + l.back().to_string());\n\
            cmake::message(l.min().to_string() + \" \" + l.max().to_string());\n\
            auto sub = l.sublist(1, 2);\n\
            l.reverse();\n\
            return sub.size() * 100 + l.size() * 10 + l.find(10);\n\
        }",
    );

    assert_eq!(facade.messages(), vec!["10 5", "3 10"]);
    assert_eq!(result, Some(200 + 40 + 3));
}

#[test]
fn test_list_remove() {
    assert_eq!(
        returns(
            "int main() { list<int> l = {1, 2, 1, 3, 1};\n\
             int removed = l.remove_last(1, 2);\n\
             return removed * 10 + l.size(); }"
        ),
        23
    );
    assert_eq!(
        returns("int main() { list<int> l = {1, 2, 1}; return l.remove(1); }"),
        2
    );
}

#[test]
fn test_list_index_out_of_range_is_fatal() {
    let (result, facade) = run(
        "int main() { list<int> l = {1}; int x = l.at(3); cmake::message(\"after\"); return x; }",
    );

    assert_eq!(result, None);
    assert_eq!(fatal_errors(&facade), vec!["list index 3 is out of range"]);
    assert!(facade.messages().is_empty());
}

#[test]
fn test_division_by_zero_is_fatal() {
    let (result, facade) = run("int main() { int z = 0; return 1 / z; }");
    assert_eq!(result, None);
    assert_eq!(fatal_errors(&facade), vec!["division by zero"]);
}

#[test]
fn test_pop_from_empty_list_is_fatal() {
    let (result, facade) = run("int main() { list<string> l; l.pop_back(); return 0; }");
    assert_eq!(result, None);
    assert_eq!(fatal_errors(&facade), vec!["pop from an empty list"]);
}

#[test]
fn test_oversized_string_is_fatal() {
    let (result, facade) = run(
        "int main() { string s = string(\"ab\", 9223372036854775807); cmake::message(\"after\"); return 0; }",
    );

    assert_eq!(result, None);
    assert_eq!(
        fatal_errors(&facade),
        vec!["string size 9223372036854775807 exceeds the limit of 67108864"]
    );
    assert!(facade.messages().is_empty());
}

#[test]
fn test_oversized_resize_is_fatal() {
    let (result, facade) =
        run("int main() { list<int> l; l.resize(4611686018427387904); return 0; }");
    assert_eq!(result, None);
    assert_eq!(
        fatal_errors(&facade),
        vec!["list size 4611686018427387904 exceeds the limit of 67108864"]
    );

    let (result, facade) = run("int main() { string s; s.resize(-1); return 0; }");
    assert_eq!(result, None);
    assert_eq!(fatal_errors(&facade), vec!["string size -1 is negative"]);
}

#[test]
fn test_call_depth_limit() {
    let mut facade = RecordingFacade::default();
    let mut executor = SourceExecutor::new(
        Config::default().with_max_call_depth(16),
        Box::new(InMemorySources::new()),
    );

    let result = executor.execute(
        "int f(int n) { return f(n + 1); } int main() { return f(0); }",
        &mut facade,
    );

    assert_eq!(result, None);
    assert_eq!(fatal_errors(&facade), vec!["maximum call depth exceeded"]);
}

const COUNT_DOWN: &str = "int f(int n) { if (n == 0) { return 0; } return f(n - 1) + 1; }";

#[test]
fn test_recursion_near_default_call_depth() {
    let depth = Config::default().max_call_depth as i64 - 2;
    let source = format!("{} int main() {{ return f({}); }}", COUNT_DOWN, depth);
    assert_eq!(returns(&source), depth);
}

#[test]
fn test_recursion_past_default_call_depth_is_fatal() {
    let depth = Config::default().max_call_depth * 4;
    let source = format!("{} int main() {{ return f({}); }}", COUNT_DOWN, depth);

    let (result, facade) = run(&source);
    assert_eq!(result, None);
    assert_eq!(fatal_errors(&facade), vec!["maximum call depth exceeded"]);
}

#[test]
fn test_deep_recursion_on_stack_sized_thread() {
    let config = Config::default().with_max_call_depth(1000);
    let stack_size = config.required_stack_size();
    let source = format!("{} int main() {{ return f(990); }}", COUNT_DOWN);

    let worker = std::thread::Builder::new()
        .stack_size(stack_size)
        .spawn(move || {
            let mut facade = RecordingFacade::default();
            let mut executor = SourceExecutor::new(config, Box::new(InMemorySources::new()));
            executor.execute(&source, &mut facade)
        })
        .unwrap();

    assert_eq!(worker.join().unwrap(), Some(990));
}

#[test]
fn test_recursion() {
    assert_eq!(
        returns("int fib(int n) { if (n < 2) { return n; } return fib(n - 1) + fib(n - 2); } int main() { return fib(10); }"),
        55
    );
}

#[test]
fn test_for_loop_and_break() {
    assert_eq!(
        returns(
            "int main() { int sum = 0;\n\
             for (int i = 0; i < 100; ++i) { if (i == 5) { break; } sum += i; }\n\
             return sum; }"
        ),
        10
    );
}

#[test]
fn test_nested_break_leaves_only_inner_loop() {
    assert_eq!(
        returns(
            "int main() { int outer = 0; int inner = 0;\n\
             while (outer < 3) { outer += 1;\n\
                 while (true) { inner += 1; if (inner > 0) { break; } }\n\
             }\n\
             return outer * 10 + inner; }"
        ),
        33
    );
}

#[test]
fn test_else_if_chain() {
    let source = |n: i32| {
        format!(
            "int main() {{ int n = {}; if (n == 1) {{ return 10; }} else if (n == 2) {{ return 20; }} else {{ return 30; }} }}",
            n
        )
    };

    assert_eq!(returns(&source(1)), 10);
    assert_eq!(returns(&source(2)), 20);
    assert_eq!(returns(&source(3)), 30);
}

#[test]
fn test_ternary() {
    assert_eq!(returns("int main() { int a = 4; return a > 3 ? a * 2 : a; }"), 8);
}

#[test]
fn test_global_variables_initialized_before_main() {
    assert_eq!(
        returns("int base = 40; int twice(int v) { return v * 2; } int two = twice(1); int main() { return base + two; }"),
        42
    );
}

#[test]
fn test_class_members_and_methods() {
    assert_eq!(
        returns(
            "class counter {\n\
                 int value;\n\
                 void add(int v) { value += v; }\n\
                 void add_twice(int v) { add(v); add(v); }\n\
                 int get() { return value; }\n\
             };\n\
             int main() { counter c; c.add_twice(3); c.add(1); return c.get(); }"
        ),
        7
    );
}

#[test]
fn test_constructor_call() {
    assert_eq!(
        returns(
            "class point { int a; int b; point(int x, int y) { a = x; b = y; } };\n\
             int main() { point p = point(2, 5); return p.a * 10 + p.b; }"
        ),
        25
    );
}

#[test]
fn test_class_copy_is_independent() {
    assert_eq!(
        returns(
            "class P { int v; };\n\
             int main() { P a; a.v = 1; P b = a; b.v = 2; return a.v * 10 + b.v; }"
        ),
        12
    );
}

#[test]
fn test_derived_class_sliced_into_base() {
    assert_eq!(
        returns(
            "class B { int x; };\n\
             class D : B { int y; };\n\
             int get(B b) { return b.x; }\n\
             int main() { D d; d.x = 3; d.y = 4; return get(d); }"
        ),
        3
    );
}

#[test]
fn test_assign_through_base_reference_keeps_derived_members() {
    assert_eq!(
        returns(
            "class B { int b; };\n\
             class D : B { int d; };\n\
             int main() { D x; x.d = 3; B& r = x; B y; y.b = 9; r = y; return x.d + x.b; }"
        ),
        12
    );
}

#[test]
fn test_designated_initializers() {
    assert_eq!(
        returns("class P { int x; string s; }; int main() { P p = { .x = 4, s: \"ab\" }; return p.x + p.s.size(); }"),
        6
    );
}

#[test]
fn test_enums() {
    assert_eq!(
        returns(
            "enum color { red, green, blue };\n\
             int main() { color c = color::red; c = color::blue; if (c == color::blue) { return 1; } return 0; }"
        ),
        1
    );
}

#[test]
fn test_extern_defines() {
    let mut facade = RecordingFacade::default()
        .with_define("JOBS", "8")
        .with_define("NAME", "app");

    let result = run_with(
        "int main() {\n\
            extern<int> jobs = extern<int>(\"JOBS\");\n\
            extern<string> name = extern<string>(\"NAME\");\n\
            extern<bool> missing = extern<bool>(\"MISSING\");\n\
            cmake::message(name.value());\n\
            if (missing.has_value()) { return -1; }\n\
            return jobs.value();\n\
        }",
        &mut facade,
    );

    assert_eq!(result, Some(8));
    assert_eq!(facade.messages(), vec!["app"]);
}

#[test]
fn test_extern_without_value_is_fatal() {
    let (result, facade) =
        run("int main() { extern<int> e = extern<int>(\"NOPE\"); return e.value(); }");
    assert_eq!(result, None);
    assert_eq!(
        fatal_errors(&facade),
        vec!["extern value accessed, but no value was provided"]
    );
}

#[test]
fn test_options_prefer_command_line_values() {
    let mut facade = RecordingFacade::default().with_option("WITH_TESTS", false);

    let result = run_with(
        "int main() {\n\
            bool tests = cmake::option(\"WITH_TESTS\", \"build tests\", true);\n\
            bool docs = cmake::option(\"WITH_DOCS\", \"build docs\", true);\n\
            return int(tests) * 10 + int(docs);\n\
        }",
        &mut facade,
    );

    assert_eq!(result, Some(1));
    assert!(facade.calls().contains(&FacadeCall::RegisterOption {
        name: String::from("WITH_TESTS"),
        description: String::from("build tests"),
        value: false,
    }));
}

#[test]
fn test_old_style_variables() {
    let (_, facade) = run(
        "int main() {\n\
            cmake::set_old_style_variable(\"CMAKE_CXX_STANDARD\", \"17\");\n\
            cmake::message(cmake::get_old_style_variable(\"CMAKE_CXX_STANDARD\"));\n\
            cmake::message(cmake::get_old_style_variable(\"UNSET\"));\n\
            return 0;\n\
        }",
    );

    assert_eq!(facade.messages(), vec!["17", ""]);
}

#[test]
fn test_minimum_required() {
    let (result, facade) = run("int main() { cmake::minimum_required(version(3, 0)); return 1; }");
    assert_eq!(result, Some(1));
    assert!(fatal_errors(&facade).is_empty());

    let (result, facade) = run("int main() { cmake::minimum_required(version(99)); return 1; }");
    assert_eq!(result, None);
    assert_eq!(fatal_errors(&facade).len(), 1);
}

#[test]
fn test_target_functions() {
    let (_, facade) = run(
        "int main() {\n\
            cmake::project p = cmake::project(\"demo\");\n\
            auto lib = p.add_library(\"core\", {\"core.cpp\"});\n\
            auto exe = p.add_executable(\"app\", {\"main.cpp\"});\n\
            exe.link_to(lib);\n\
            lib.include_directories({\"include\"}, cmake::visibility::public);\n\
            lib.compile_definitions({\"FOO=1\"});\n\
            exe.compile_options({\"-Wall\"}, cmake::visibility::interface);\n\
            exe.add_sources({\"extra.cpp\"});\n\
            cmake::install(exe);\n\
            cmake::enable_ctest();\n\
            cmake::add_test(exe);\n\
            return 0;\n\
        }",
    );

    let strings = |values: &[&str]| values.iter().map(|v| v.to_string()).collect::<Vec<_>>();
    assert_eq!(
        facade.calls(),
        &[
            FacadeCall::RegisterProject(String::from("demo")),
            FacadeCall::AddLibrary {
                name: String::from("core"),
                sources: strings(&["core.cpp"]),
            },
            FacadeCall::AddExecutable {
                name: String::from("app"),
                sources: strings(&["main.cpp"]),
            },
            FacadeCall::TargetLinkLibrary {
                target: String::from("app"),
                visibility: Visibility::Private,
                library: String::from("core"),
            },
            FacadeCall::TargetIncludeDirectories {
                target: String::from("core"),
                visibility: Visibility::Public,
                dirs: strings(&["include"]),
            },
            FacadeCall::TargetCompileDefinitions {
                target: String::from("core"),
                visibility: Visibility::Private,
                definitions: strings(&["FOO=1"]),
            },
            FacadeCall::TargetCompileOptions {
                target: String::from("app"),
                visibility: Visibility::Interface,
                options: strings(&["-Wall"]),
            },
            FacadeCall::TargetSources {
                target: String::from("app"),
                visibility: Visibility::Private,
                sources: strings(&["extra.cpp"]),
            },
            FacadeCall::Install {
                target: String::from("app"),
                destination: String::from("bin"),
            },
            FacadeCall::EnableCtest,
            FacadeCall::AddTest(String::from("app")),
        ]
    );
}

#[test]
fn test_fatal_error_stops_execution() {
    let (result, facade) = run(
        "int main() { cmake::message(\"before\"); cmake::fatal_error(\"stop\"); cmake::message(\"after\"); return 0; }",
    );

    assert_eq!(result, None);
    assert_eq!(facade.messages(), vec!["before"]);
    assert_eq!(fatal_errors(&facade), vec!["stop"]);
}

#[test]
fn test_import_is_relative_to_importing_script() {
    let sources = InMemorySources::new()
        .with_file("CMakeLists.cmsl", "import \"lib/a.cmsl\"; int main() { return a(); }")
        .with_file("lib/a.cmsl", "import \"b.cmsl\"; export int a() { return b() + 1; }")
        .with_file("lib/b.cmsl", "export int b() { return 41; }");

    let mut facade = RecordingFacade::default();
    let mut executor = executor(sources);
    let result = executor.execute_file("CMakeLists.cmsl".as_ref(), &mut facade);

    assert_eq!(result, Some(42), "{:?}", executor.diagnostics());
}

#[test]
fn test_circular_import_is_reported() {
    let sources = InMemorySources::new()
        .with_file("CMakeLists.cmsl", "import \"a.cmsl\"; int main() { return 0; }")
        .with_file("a.cmsl", "import \"b.cmsl\";")
        .with_file("b.cmsl", "import \"a.cmsl\";");

    let mut facade = RecordingFacade::default();
    let mut executor = executor(sources);
    let result = executor.execute_file("CMakeLists.cmsl".as_ref(), &mut facade);

    assert_eq!(result, None);
    let errors: Vec<_> = executor
        .diagnostics()
        .into_iter()
        .filter(|d| d.severity == Severity::Error)
        .map(|d| d.message)
        .collect();
    assert!(errors.contains(&String::from("circular import of 'a.cmsl'")), "{:?}", errors);
}

#[test]
fn test_imported_statics_are_initialized() {
    let sources = InMemorySources::new()
        .with_file("CMakeLists.cmsl", "import \"values.cmsl\"; int main() { return answer; }")
        .with_file("values.cmsl", "export int answer = 6 * 7;");

    let mut facade = RecordingFacade::default();
    let mut executor = executor(sources);
    let result = executor.execute_file("CMakeLists.cmsl".as_ref(), &mut facade);

    assert_eq!(result, Some(42), "{:?}", executor.diagnostics());
}

#[test]
fn test_missing_file_is_reported() {
    let mut facade = RecordingFacade::default();
    let mut executor = executor(InMemorySources::new());

    assert_eq!(executor.execute_file("nope.cmsl".as_ref(), &mut facade), None);
    assert_eq!(
        executor.diagnostics()[0].message,
        "could not read 'nope.cmsl'"
    );
}

#[test]
fn test_main_is_required() {
    let mut facade = RecordingFacade::default();
    let mut executor = executor(InMemorySources::new());

    assert_eq!(executor.execute("int f() { return 1; }", &mut facade), None);
    assert_eq!(executor.diagnostics()[0].message, "main function not found");
}

#[test]
fn test_format_diagnostics_shows_source_line() {
    let mut facade = RecordingFacade::default();
    let mut executor = executor(InMemorySources::new());

    executor.execute("int main() {\n    return y;\n}", &mut facade);
    let rendered = executor.format_diagnostics();

    assert!(rendered.contains("'y' identifier not found"), "{}", rendered);
    assert!(rendered.contains("2 | return y;"), "{}", rendered);
}
