//! The builtin types, the `cmake` namespace and their functions.
//!
//! Built in two phases: every type is created first, then member functions
//! are added, so signatures can mention any builtin type.

use tracing::debug;

use crate::Span;

use super::{
    builtin_function_kind::BuiltinFunctionKind as K,
    context::{ContextId, ContextKind},
    generic_type_factory::{GenericFamily, GenericTypeFactory},
    qualified_contexts::{EnumValueInfo, QualifiedContexts},
    registry::Registry,
    types::{SemaType, TargetKind, TypeId, TypeKind},
};

/// Handles to the builtin types every phase needs.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinTypes {
    pub global_context: ContextId,
    pub cmake_context: ContextId,
    pub void: TypeId,
    pub bool: TypeId,
    pub int: TypeId,
    pub double: TypeId,
    pub string: TypeId,
    pub version: TypeId,
    pub project: TypeId,
    pub target: TypeId,
    pub library: TypeId,
    pub executable: TypeId,
    pub visibility: TypeId,
    pub designated_initializer: TypeId,
}

fn builtin_type(
    registry: &mut Registry,
    parent: ContextId,
    name: &str,
    primary_name: &str,
    kind: TypeKind,
    base: Option<TypeId>,
) -> TypeId {
    let context_kind = match kind {
        TypeKind::Enum { .. } => ContextKind::Enum,
        _ => ContextKind::Class,
    };
    let context = registry.create_context(context_kind, name, Some(parent));

    registry.create_type(SemaType {
        name: String::from(name),
        primary_name: String::from(primary_name),
        kind,
        context,
        members: vec![],
        base,
        builtin: true,
        span: Span::null(),
    })
}

/// Creates the builtin registry entries and the symbol tables every
/// translation unit starts from.
pub fn create_builtin_context(registry: &mut Registry) -> (BuiltinTypes, QualifiedContexts) {
    debug!("creating builtin context");

    let global = registry.create_context(ContextKind::Namespace, "", None);
    let cmake = registry.create_context(ContextKind::Namespace, "cmake", Some(global));

    let void = builtin_type(registry, global, "void", "void", TypeKind::Void, None);
    let bool = builtin_type(registry, global, "bool", "bool", TypeKind::Bool, None);
    let int = builtin_type(registry, global, "int", "int", TypeKind::Int, None);
    let double = builtin_type(registry, global, "double", "double", TypeKind::Double, None);
    let string = builtin_type(registry, global, "string", "string", TypeKind::String, None);
    let version = builtin_type(registry, global, "version", "version", TypeKind::Version, None);

    let project = builtin_type(
        registry,
        cmake,
        "cmake::project",
        "project",
        TypeKind::Project,
        None,
    );
    let target = builtin_type(
        registry,
        cmake,
        "cmake::target",
        "target",
        TypeKind::Target(TargetKind::Target),
        None,
    );
    let library = builtin_type(
        registry,
        cmake,
        "cmake::library",
        "library",
        TypeKind::Target(TargetKind::Library),
        Some(target),
    );
    let executable = builtin_type(
        registry,
        cmake,
        "cmake::executable",
        "executable",
        TypeKind::Target(TargetKind::Executable),
        Some(target),
    );
    let visibility = builtin_type(
        registry,
        cmake,
        "cmake::visibility",
        "visibility",
        TypeKind::Enum {
            enumerators: vec![
                String::from("private"),
                String::from("public"),
                String::from("interface"),
            ],
        },
        None,
    );
    let designated_initializer = builtin_type(
        registry,
        global,
        "designated initializer",
        "designated initializer",
        TypeKind::DesignatedInitializer,
        None,
    );

    let builtins = BuiltinTypes {
        global_context: global,
        cmake_context: cmake,
        void,
        bool,
        int,
        double,
        string,
        version,
        project,
        target,
        library,
        executable,
        visibility,
        designated_initializer,
    };

    add_bool_functions(registry, &builtins);
    add_int_functions(registry, &builtins);
    add_double_functions(registry, &builtins);
    add_string_functions(registry, &builtins);
    add_version_functions(registry, &builtins);
    add_enum_functions(registry, &builtins, visibility);

    let string_list = GenericTypeFactory::new(registry, &builtins)
        .create_homogeneous_generic(GenericFamily::List, string);
    add_project_functions(registry, &builtins, string_list);
    add_target_functions(registry, &builtins, string_list);
    add_cmake_functions(registry, &builtins, string_list);

    let contexts = create_builtin_qualified_contexts(registry, &builtins);
    (builtins, contexts)
}

fn create_builtin_qualified_contexts(registry: &mut Registry, b: &BuiltinTypes) -> QualifiedContexts {
    let mut contexts = QualifiedContexts::default();

    for ty in [b.void, b.bool, b.int, b.double, b.string, b.version] {
        contexts
            .types
            .register(&registry.ty(ty).primary_name.clone(), ty, false);
    }

    contexts.enter_global_ctx("cmake", false);
    for ty in [b.project, b.target, b.library, b.executable, b.visibility] {
        contexts
            .types
            .register(&registry.ty(ty).primary_name.clone(), ty, false);
    }

    for function in registry.context(b.cmake_context).functions.clone() {
        let name = registry.function(function).name().to_string();
        contexts.functions.register(&name, function, false);
    }

    contexts.enums.enter_global_ctx("visibility", false);
    for (value, name) in ["private", "public", "interface"].iter().enumerate() {
        let index = registry.generate_index();
        contexts.enums.register(
            name,
            EnumValueInfo {
                ty: b.visibility,
                value: value as u32,
                index,
            },
            false,
        );
    }
    contexts.enums.leave_ctx();

    contexts.leave_ctx();
    contexts
}

/// `=`, `==`, `!=` and `to_string()` of an enum type.
pub fn add_enum_functions(registry: &mut Registry, b: &BuiltinTypes, ty: TypeId) {
    let ctx = registry.ty(ty).context;
    let ty_ref = registry.create_reference(ty);

    registry.add_builtin_function(ctx, "=", &[ty], ty_ref, K::EnumOperatorEqual);
    registry.add_builtin_function(ctx, "==", &[ty], b.bool, K::EnumOperatorEqualEqual);
    registry.add_builtin_function(ctx, "!=", &[ty], b.bool, K::EnumOperatorNotEqual);
    registry.add_builtin_function(ctx, "to_string", &[], b.string, K::EnumToString);
}

fn add_bool_functions(r: &mut Registry, b: &BuiltinTypes) {
    let ctx = r.ty(b.bool).context;
    let bool_ref = r.create_reference(b.bool);

    r.add_builtin_function(ctx, "bool", &[], b.bool, K::BoolCtor);
    r.add_builtin_function(ctx, "bool", &[b.bool], b.bool, K::BoolCtorBool);
    r.add_builtin_function(ctx, "bool", &[b.int], b.bool, K::BoolCtorInt);
    r.add_builtin_function(ctx, "=", &[b.bool], bool_ref, K::BoolOperatorEqual);
    r.add_builtin_function(ctx, "==", &[b.bool], b.bool, K::BoolOperatorEqualEqual);
    r.add_builtin_function(ctx, "!=", &[b.bool], b.bool, K::BoolOperatorNotEqual);
    r.add_builtin_function(ctx, "&&", &[b.bool], b.bool, K::BoolOperatorAndAnd);
    r.add_builtin_function(ctx, "||", &[b.bool], b.bool, K::BoolOperatorPipePipe);
    r.add_builtin_function(ctx, "!", &[], b.bool, K::BoolOperatorUnaryExclaim);
    r.add_builtin_function(ctx, "to_string", &[], b.string, K::BoolToString);
}

fn add_int_functions(r: &mut Registry, b: &BuiltinTypes) {
    let ctx = r.ty(b.int).context;
    let int_ref = r.create_reference(b.int);
    let int = b.int;

    r.add_builtin_function(ctx, "int", &[], int, K::IntCtor);
    r.add_builtin_function(ctx, "int", &[b.bool], int, K::IntCtorBool);
    r.add_builtin_function(ctx, "int", &[int], int, K::IntCtorInt);
    r.add_builtin_function(ctx, "int", &[b.double], int, K::IntCtorDouble);
    r.add_builtin_function(ctx, "to_string", &[], b.string, K::IntToString);
    r.add_builtin_function(ctx, "+", &[int], int, K::IntOperatorPlus);
    r.add_builtin_function(ctx, "-", &[int], int, K::IntOperatorMinus);
    r.add_builtin_function(ctx, "-", &[], int, K::IntOperatorUnaryMinus);
    r.add_builtin_function(ctx, "*", &[int], int, K::IntOperatorStar);
    r.add_builtin_function(ctx, "/", &[int], int, K::IntOperatorSlash);
    r.add_builtin_function(ctx, "%", &[int], int, K::IntOperatorPercent);
    r.add_builtin_function(ctx, "=", &[int], int_ref, K::IntOperatorEqual);
    r.add_builtin_function(ctx, "+=", &[int], int_ref, K::IntOperatorPlusEqual);
    r.add_builtin_function(ctx, "-=", &[int], int_ref, K::IntOperatorMinusEqual);
    r.add_builtin_function(ctx, "*=", &[int], int_ref, K::IntOperatorStarEqual);
    r.add_builtin_function(ctx, "/=", &[int], int_ref, K::IntOperatorSlashEqual);
    r.add_builtin_function(ctx, "%=", &[int], int_ref, K::IntOperatorPercentEqual);
    r.add_builtin_function(ctx, "++", &[], int_ref, K::IntOperatorPlusPlus);
    r.add_builtin_function(ctx, "--", &[], int_ref, K::IntOperatorMinusMinus);
    r.add_builtin_function(ctx, "<", &[int], b.bool, K::IntOperatorLess);
    r.add_builtin_function(ctx, "<=", &[int], b.bool, K::IntOperatorLessEqual);
    r.add_builtin_function(ctx, ">", &[int], b.bool, K::IntOperatorGreater);
    r.add_builtin_function(ctx, ">=", &[int], b.bool, K::IntOperatorGreaterEqual);
    r.add_builtin_function(ctx, "==", &[int], b.bool, K::IntOperatorEqualEqual);
    r.add_builtin_function(ctx, "!=", &[int], b.bool, K::IntOperatorNotEqual);
}

fn add_double_functions(r: &mut Registry, b: &BuiltinTypes) {
    let ctx = r.ty(b.double).context;
    let double_ref = r.create_reference(b.double);
    let double = b.double;

    r.add_builtin_function(ctx, "double", &[], double, K::DoubleCtor);
    r.add_builtin_function(ctx, "double", &[double], double, K::DoubleCtorDouble);
    r.add_builtin_function(ctx, "double", &[b.int], double, K::DoubleCtorInt);
    r.add_builtin_function(ctx, "+", &[double], double, K::DoubleOperatorPlus);
    r.add_builtin_function(ctx, "-", &[double], double, K::DoubleOperatorMinus);
    r.add_builtin_function(ctx, "-", &[], double, K::DoubleOperatorUnaryMinus);
    r.add_builtin_function(ctx, "*", &[double], double, K::DoubleOperatorStar);
    r.add_builtin_function(ctx, "/", &[double], double, K::DoubleOperatorSlash);
    r.add_builtin_function(ctx, "=", &[double], double_ref, K::DoubleOperatorEqual);
    r.add_builtin_function(ctx, "+=", &[double], double_ref, K::DoubleOperatorPlusEqual);
    r.add_builtin_function(ctx, "-=", &[double], double_ref, K::DoubleOperatorMinusEqual);
    r.add_builtin_function(ctx, "*=", &[double], double_ref, K::DoubleOperatorStarEqual);
    r.add_builtin_function(ctx, "/=", &[double], double_ref, K::DoubleOperatorSlashEqual);
    r.add_builtin_function(ctx, "<", &[double], b.bool, K::DoubleOperatorLess);
    r.add_builtin_function(ctx, "<=", &[double], b.bool, K::DoubleOperatorLessEqual);
    r.add_builtin_function(ctx, ">", &[double], b.bool, K::DoubleOperatorGreater);
    r.add_builtin_function(ctx, ">=", &[double], b.bool, K::DoubleOperatorGreaterEqual);
    r.add_builtin_function(ctx, "==", &[double], b.bool, K::DoubleOperatorEqualEqual);
    r.add_builtin_function(ctx, "!=", &[double], b.bool, K::DoubleOperatorNotEqual);
    r.add_builtin_function(ctx, "to_string", &[], b.string, K::DoubleToString);
}

fn add_string_functions(r: &mut Registry, b: &BuiltinTypes) {
    let ctx = r.ty(b.string).context;
    let string_ref = r.create_reference(b.string);
    let (string, int, bool, void) = (b.string, b.int, b.bool, b.void);

    r.add_builtin_function(ctx, "string", &[], string, K::StringCtor);
    r.add_builtin_function(ctx, "string", &[string], string, K::StringCtorString);
    r.add_builtin_function(ctx, "string", &[string, int], string, K::StringCtorStringCount);
    r.add_builtin_function(ctx, "empty", &[], bool, K::StringEmpty);
    r.add_builtin_function(ctx, "size", &[], int, K::StringSize);
    r.add_builtin_function(ctx, "==", &[string], bool, K::StringOperatorEqualEqual);
    r.add_builtin_function(ctx, "!=", &[string], bool, K::StringOperatorNotEqual);
    r.add_builtin_function(ctx, "<", &[string], bool, K::StringOperatorLess);
    r.add_builtin_function(ctx, "<=", &[string], bool, K::StringOperatorLessEqual);
    r.add_builtin_function(ctx, ">", &[string], bool, K::StringOperatorGreater);
    r.add_builtin_function(ctx, ">=", &[string], bool, K::StringOperatorGreaterEqual);
    r.add_builtin_function(ctx, "+", &[string], string, K::StringOperatorPlus);
    r.add_builtin_function(ctx, "=", &[string], string_ref, K::StringOperatorEqual);
    r.add_builtin_function(ctx, "+=", &[string], string_ref, K::StringOperatorPlusEqual);
    r.add_builtin_function(ctx, "clear", &[], void, K::StringClear);
    r.add_builtin_function(ctx, "insert", &[int, string], void, K::StringInsertPosStr);
    r.add_builtin_function(ctx, "erase", &[int], void, K::StringErasePos);
    r.add_builtin_function(ctx, "erase", &[int, int], void, K::StringErasePosCount);
    r.add_builtin_function(ctx, "starts_with", &[string], bool, K::StringStartsWith);
    r.add_builtin_function(ctx, "ends_with", &[string], bool, K::StringEndsWith);
    r.add_builtin_function(ctx, "replace", &[int, int, string], void, K::StringReplacePosCountStr);
    r.add_builtin_function(ctx, "substr", &[int], string, K::StringSubstrPos);
    r.add_builtin_function(ctx, "substr", &[int, int], string, K::StringSubstrPosCount);
    r.add_builtin_function(ctx, "resize", &[int], void, K::StringResizeNewsize);
    r.add_builtin_function(ctx, "resize", &[int, string], void, K::StringResizeNewsizeFill);
    r.add_builtin_function(ctx, "find", &[string], int, K::StringFindStr);
    r.add_builtin_function(ctx, "find", &[string, int], int, K::StringFindStrPos);
    r.add_builtin_function(ctx, "find_not_of", &[string], int, K::StringFindNotOfStr);
    r.add_builtin_function(ctx, "find_not_of", &[string, int], int, K::StringFindNotOfStrPos);
    r.add_builtin_function(ctx, "find_last", &[string], int, K::StringFindLastStr);
    r.add_builtin_function(ctx, "find_last_not_of", &[string], int, K::StringFindLastNotOfStr);
    r.add_builtin_function(ctx, "contains", &[string], bool, K::StringContains);
    r.add_builtin_function(ctx, "lower", &[], string, K::StringLower);
    r.add_builtin_function(ctx, "make_lower", &[], void, K::StringMakeLower);
    r.add_builtin_function(ctx, "upper", &[], string, K::StringUpper);
    r.add_builtin_function(ctx, "make_upper", &[], void, K::StringMakeUpper);
}

fn add_version_functions(r: &mut Registry, b: &BuiltinTypes) {
    let ctx = r.ty(b.version).context;
    let version_ref = r.create_reference(b.version);
    let (version, int, bool) = (b.version, b.int, b.bool);

    r.add_builtin_function(ctx, "version", &[int], version, K::VersionCtorMajor);
    r.add_builtin_function(ctx, "version", &[int, int], version, K::VersionCtorMajorMinor);
    r.add_builtin_function(ctx, "version", &[int, int, int], version, K::VersionCtorMajorMinorPatch);
    r.add_builtin_function(
        ctx,
        "version",
        &[int, int, int, int],
        version,
        K::VersionCtorMajorMinorPatchTweak,
    );
    r.add_builtin_function(ctx, "=", &[version], version_ref, K::VersionOperatorEqual);
    r.add_builtin_function(ctx, "==", &[version], bool, K::VersionOperatorEqualEqual);
    r.add_builtin_function(ctx, "!=", &[version], bool, K::VersionOperatorNotEqual);
    r.add_builtin_function(ctx, "<", &[version], bool, K::VersionOperatorLess);
    r.add_builtin_function(ctx, "<=", &[version], bool, K::VersionOperatorLessEqual);
    r.add_builtin_function(ctx, ">", &[version], bool, K::VersionOperatorGreater);
    r.add_builtin_function(ctx, ">=", &[version], bool, K::VersionOperatorGreaterEqual);
    r.add_builtin_function(ctx, "major", &[], int, K::VersionMajor);
    r.add_builtin_function(ctx, "minor", &[], int, K::VersionMinor);
    r.add_builtin_function(ctx, "patch", &[], int, K::VersionPatch);
    r.add_builtin_function(ctx, "tweak", &[], int, K::VersionTweak);
    r.add_builtin_function(ctx, "to_string", &[], b.string, K::VersionToString);
}

fn add_project_functions(r: &mut Registry, b: &BuiltinTypes, string_list: TypeId) {
    let ctx = r.ty(b.project).context;
    let project_ref = r.create_reference(b.project);

    r.add_builtin_function(ctx, "project", &[b.string], b.project, K::ProjectCtorName);
    r.add_builtin_function(ctx, "name", &[], b.string, K::ProjectName);
    r.add_builtin_function(
        ctx,
        "add_executable",
        &[b.string, string_list],
        b.executable,
        K::ProjectAddExecutable,
    );
    r.add_builtin_function(
        ctx,
        "add_library",
        &[b.string, string_list],
        b.library,
        K::ProjectAddLibrary,
    );
    r.add_builtin_function(ctx, "=", &[b.project], project_ref, K::ProjectOperatorEqual);
}

fn add_target_functions(r: &mut Registry, b: &BuiltinTypes, string_list: TypeId) {
    let ctx = r.ty(b.target).context;
    let target_ref = r.create_reference(b.target);
    let (void, vis) = (b.void, b.visibility);

    r.add_builtin_function(ctx, "name", &[], b.string, K::TargetName);
    r.add_builtin_function(ctx, "link_to", &[target_ref], void, K::TargetLinkTo);
    r.add_builtin_function(ctx, "link_to", &[target_ref, vis], void, K::TargetLinkToVisibility);
    r.add_builtin_function(ctx, "include_directories", &[string_list], void, K::TargetIncludeDirectories);
    r.add_builtin_function(
        ctx,
        "include_directories",
        &[string_list, vis],
        void,
        K::TargetIncludeDirectoriesVisibility,
    );
    r.add_builtin_function(ctx, "compile_definitions", &[string_list], void, K::TargetCompileDefinitions);
    r.add_builtin_function(
        ctx,
        "compile_definitions",
        &[string_list, vis],
        void,
        K::TargetCompileDefinitionsVisibility,
    );
    r.add_builtin_function(ctx, "compile_options", &[string_list], void, K::TargetCompileOptions);
    r.add_builtin_function(
        ctx,
        "compile_options",
        &[string_list, vis],
        void,
        K::TargetCompileOptionsVisibility,
    );
    r.add_builtin_function(ctx, "add_sources", &[string_list], void, K::TargetAddSources);
    r.add_builtin_function(
        ctx,
        "add_sources",
        &[string_list, vis],
        void,
        K::TargetAddSourcesVisibility,
    );
    r.add_builtin_function(ctx, "=", &[b.target], target_ref, K::TargetOperatorEqual);

    for derived in [b.library, b.executable] {
        let ctx = r.ty(derived).context;
        let derived_ref = r.create_reference(derived);
        r.add_builtin_function(ctx, "=", &[derived], derived_ref, K::TargetOperatorEqual);
    }
}

fn add_cmake_functions(r: &mut Registry, b: &BuiltinTypes, string_list: TypeId) {
    let ctx = b.cmake_context;
    let (void, string, bool) = (b.void, b.string, b.bool);
    let target_ref = r.create_reference(b.target);
    let executable_ref = r.create_reference(b.executable);

    r.add_builtin_function(ctx, "message", &[string], void, K::CmakeMessage);
    r.add_builtin_function(ctx, "warning", &[string], void, K::CmakeWarning);
    r.add_builtin_function(ctx, "error", &[string], void, K::CmakeError);
    r.add_builtin_function(ctx, "fatal_error", &[string], void, K::CmakeFatalError);
    r.add_builtin_function(ctx, "minimum_required", &[b.version], void, K::CmakeMinimumRequired);
    r.add_builtin_function(ctx, "cmake_version", &[], b.version, K::CmakeGetCmakeVersion);
    r.add_builtin_function(ctx, "install", &[target_ref], void, K::CmakeInstall);
    r.add_builtin_function(ctx, "install", &[target_ref, string], void, K::CmakeInstallDestination);
    r.add_builtin_function(ctx, "enable_ctest", &[], void, K::CmakeEnableCtest);
    r.add_builtin_function(ctx, "add_test", &[executable_ref], void, K::CmakeAddTest);
    r.add_builtin_function(ctx, "current_source_dir", &[], string, K::CmakeCurrentSourceDir);
    r.add_builtin_function(ctx, "current_binary_dir", &[], string, K::CmakeCurrentBinaryDir);
    r.add_builtin_function(ctx, "root_source_dir", &[], string, K::CmakeRootSourceDir);
    r.add_builtin_function(ctx, "option", &[string, string, bool], bool, K::CmakeOption);
    r.add_builtin_function(ctx, "set_old_style_variable", &[string, string], void, K::CmakeSetOldStyleVariable);
    r.add_builtin_function(ctx, "get_old_style_variable", &[string], string, K::CmakeGetOldStyleVariable);
    r.add_builtin_function(ctx, "make_directory", &[string], void, K::CmakeMakeDirectory);
    r.add_builtin_function(ctx, "add_custom_command", &[string_list, string], void, K::CmakeAddCustomCommand);
    r.add_builtin_function(ctx, "add_custom_target", &[string, string_list], void, K::CmakeAddCustomTarget);
    r.add_builtin_function(ctx, "set_property", &[string, string], void, K::CmakeSetProperty);
    r.add_builtin_function(ctx, "ctest_command", &[], string, K::CmakeCtestCommand);
    r.add_builtin_function(ctx, "system_name", &[], string, K::CmakeSystemName);
    r.add_builtin_function(ctx, "cxx_compiler_name", &[], string, K::CmakeCxxCompilerName);
}
