//! The build-system side of the interpreter.
//!
//! Every side effect a script can have goes through [`CmakeFacade`]. The
//! interpreter never looks at build-system state directly, it only asks the
//! facade and polls [`CmakeFacade::did_fatal_error_occur`] after anything
//! that may have failed.

use std::collections::HashMap;

use tracing::{error, info, warn};

use super::instance::Version;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Private,
    Public,
    Interface,
}

impl Visibility {
    /// Maps a `cmake::visibility` enumerator value.
    pub fn from_enum_value(value: u32) -> Visibility {
        match value {
            1 => Visibility::Public,
            2 => Visibility::Interface,
            _ => Visibility::Private,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CxxCompilerId {
    Clang,
    Gcc,
    Msvc,
}

impl CxxCompilerId {
    pub fn name(&self) -> &'static str {
        match self {
            CxxCompilerId::Clang => "clang",
            CxxCompilerId::Gcc => "gcc",
            CxxCompilerId::Msvc => "msvc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemId {
    Windows,
    Unix,
}

impl SystemId {
    pub fn name(&self) -> &'static str {
        match self {
            SystemId::Windows => "windows",
            SystemId::Unix => "unix",
        }
    }
}

pub trait CmakeFacade {
    fn cmake_version(&self) -> Version;

    fn message(&mut self, what: &str);
    fn warning(&mut self, what: &str);
    fn error(&mut self, what: &str);
    fn fatal_error(&mut self, what: &str);
    fn did_fatal_error_occur(&self) -> bool;

    fn register_project(&mut self, name: &str);
    fn install(&mut self, target: &str, destination: &str);

    fn current_binary_dir(&self) -> String;
    fn current_source_dir(&self) -> String;
    fn root_source_dir(&self) -> String;

    fn add_custom_command(&mut self, command: &[String], output: &str);
    fn add_custom_target(&mut self, name: &str, command: &[String]);
    fn make_directory(&mut self, dir: &str);

    fn add_executable(&mut self, name: &str, sources: &[String]);
    fn add_library(&mut self, name: &str, sources: &[String]);
    fn target_link_library(&mut self, target: &str, visibility: Visibility, library: &str);
    fn target_include_directories(&mut self, target: &str, visibility: Visibility, dirs: &[String]);
    fn target_compile_definitions(
        &mut self,
        target: &str,
        visibility: Visibility,
        definitions: &[String],
    );
    fn target_compile_options(&mut self, target: &str, visibility: Visibility, options: &[String]);
    fn target_sources(&mut self, target: &str, visibility: Visibility, sources: &[String]);

    /// Hands a directory with an old-style listfile over to the build tool.
    fn add_subdirectory_with_old_script(&mut self, dir: &str);
    fn go_into_subdirectory(&mut self, dir: &str);
    fn go_directory_up(&mut self);
    fn prepare_for_add_subdirectory_with_script(&mut self, dir: &str);
    fn finalize_after_add_subdirectory_with_script(&mut self);

    fn enable_ctest(&mut self);
    fn add_test(&mut self, test_executable: &str);
    fn ctest_command(&self) -> String;

    fn cxx_compiler_info(&self) -> CxxCompilerId;
    fn system_info(&self) -> SystemId;

    /// Value of `-D name=value` given on the command line.
    fn try_get_extern_define(&self, name: &str) -> Option<String>;
    fn set_property(&mut self, name: &str, value: &str);

    /// Value given for an option on the command line, if any.
    fn get_option_value(&self, name: &str) -> Option<bool>;
    fn register_option(&mut self, name: &str, description: &str, value: bool);

    fn set_old_style_variable(&mut self, name: &str, value: &str);
    fn get_old_style_variable(&self, name: &str) -> Option<String>;
}

/// A facade side effect, as recorded by [`RecordingFacade`].
#[derive(Debug, Clone, PartialEq)]
pub enum FacadeCall {
    Message(String),
    Warning(String),
    Error(String),
    FatalError(String),
    RegisterProject(String),
    Install {
        target: String,
        destination: String,
    },
    AddCustomCommand {
        command: Vec<String>,
        output: String,
    },
    AddCustomTarget {
        name: String,
        command: Vec<String>,
    },
    MakeDirectory(String),
    AddExecutable {
        name: String,
        sources: Vec<String>,
    },
    AddLibrary {
        name: String,
        sources: Vec<String>,
    },
    TargetLinkLibrary {
        target: String,
        visibility: Visibility,
        library: String,
    },
    TargetIncludeDirectories {
        target: String,
        visibility: Visibility,
        dirs: Vec<String>,
    },
    TargetCompileDefinitions {
        target: String,
        visibility: Visibility,
        definitions: Vec<String>,
    },
    TargetCompileOptions {
        target: String,
        visibility: Visibility,
        options: Vec<String>,
    },
    TargetSources {
        target: String,
        visibility: Visibility,
        sources: Vec<String>,
    },
    AddSubdirectoryWithOldScript(String),
    GoIntoSubdirectory(String),
    GoDirectoryUp,
    EnableCtest,
    AddTest(String),
    SetProperty {
        name: String,
        value: String,
    },
    RegisterOption {
        name: String,
        description: String,
        value: bool,
    },
    SetOldStyleVariable {
        name: String,
        value: String,
    },
}

/// Facade that performs nothing and records every side effect in order.
///
/// Directory queries are answered from a stack of directory names rooted at
/// `root_source_dir`, so nested `add_subdirectory` calls report the
/// directories a real build tool would.
#[derive(Debug)]
pub struct RecordingFacade {
    calls: Vec<FacadeCall>,
    root_source_dir: String,
    root_binary_dir: String,
    directories: Vec<String>,
    defines: HashMap<String, String>,
    options: HashMap<String, bool>,
    old_style_variables: HashMap<String, String>,
    fatal_error_occurred: bool,
}

impl Default for RecordingFacade {
    fn default() -> Self {
        RecordingFacade::new(".")
    }
}

impl RecordingFacade {
    pub fn new(root_source_dir: &str) -> Self {
        RecordingFacade {
            calls: vec![],
            root_source_dir: String::from(root_source_dir),
            root_binary_dir: format!("{}/build", root_source_dir),
            directories: vec![],
            defines: HashMap::new(),
            options: HashMap::new(),
            old_style_variables: HashMap::new(),
            fatal_error_occurred: false,
        }
    }

    /// Adds a `-D name=value` definition.
    pub fn with_define(mut self, name: &str, value: &str) -> Self {
        self.defines.insert(String::from(name), String::from(value));
        self
    }

    pub fn with_option(mut self, name: &str, value: bool) -> Self {
        self.options.insert(String::from(name), value);
        self
    }

    pub fn calls(&self) -> &[FacadeCall] {
        &self.calls
    }

    pub fn messages(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                FacadeCall::Message(what) => Some(what.as_str()),
                _ => None,
            })
            .collect()
    }

    fn relative_dir(&self) -> String {
        self.directories
            .iter()
            .map(|dir| format!("/{}", dir))
            .collect()
    }

    fn record(&mut self, call: FacadeCall) {
        self.calls.push(call);
    }
}

impl CmakeFacade for RecordingFacade {
    fn cmake_version(&self) -> Version {
        Version::new(3, 16, 0, 0)
    }

    fn message(&mut self, what: &str) {
        info!(target: "cmsl::script", "{}", what);
        self.record(FacadeCall::Message(String::from(what)));
    }

    fn warning(&mut self, what: &str) {
        warn!(target: "cmsl::script", "{}", what);
        self.record(FacadeCall::Warning(String::from(what)));
    }

    fn error(&mut self, what: &str) {
        error!(target: "cmsl::script", "{}", what);
        self.record(FacadeCall::Error(String::from(what)));
    }

    fn fatal_error(&mut self, what: &str) {
        error!(target: "cmsl::script", fatal = true, "{}", what);
        self.fatal_error_occurred = true;
        self.record(FacadeCall::FatalError(String::from(what)));
    }

    fn did_fatal_error_occur(&self) -> bool {
        self.fatal_error_occurred
    }

    fn register_project(&mut self, name: &str) {
        self.record(FacadeCall::RegisterProject(String::from(name)));
    }

    fn install(&mut self, target: &str, destination: &str) {
        self.record(FacadeCall::Install {
            target: String::from(target),
            destination: String::from(destination),
        });
    }

    fn current_binary_dir(&self) -> String {
        format!("{}{}", self.root_binary_dir, self.relative_dir())
    }

    fn current_source_dir(&self) -> String {
        format!("{}{}", self.root_source_dir, self.relative_dir())
    }

    fn root_source_dir(&self) -> String {
        self.root_source_dir.clone()
    }

    fn add_custom_command(&mut self, command: &[String], output: &str) {
        self.record(FacadeCall::AddCustomCommand {
            command: command.to_vec(),
            output: String::from(output),
        });
    }

    fn add_custom_target(&mut self, name: &str, command: &[String]) {
        self.record(FacadeCall::AddCustomTarget {
            name: String::from(name),
            command: command.to_vec(),
        });
    }

    fn make_directory(&mut self, dir: &str) {
        self.record(FacadeCall::MakeDirectory(String::from(dir)));
    }

    fn add_executable(&mut self, name: &str, sources: &[String]) {
        self.record(FacadeCall::AddExecutable {
            name: String::from(name),
            sources: sources.to_vec(),
        });
    }

    fn add_library(&mut self, name: &str, sources: &[String]) {
        self.record(FacadeCall::AddLibrary {
            name: String::from(name),
            sources: sources.to_vec(),
        });
    }

    fn target_link_library(&mut self, target: &str, visibility: Visibility, library: &str) {
        self.record(FacadeCall::TargetLinkLibrary {
            target: String::from(target),
            visibility,
            library: String::from(library),
        });
    }

    fn target_include_directories(&mut self, target: &str, visibility: Visibility, dirs: &[String]) {
        self.record(FacadeCall::TargetIncludeDirectories {
            target: String::from(target),
            visibility,
            dirs: dirs.to_vec(),
        });
    }

    fn target_compile_definitions(
        &mut self,
        target: &str,
        visibility: Visibility,
        definitions: &[String],
    ) {
        self.record(FacadeCall::TargetCompileDefinitions {
            target: String::from(target),
            visibility,
            definitions: definitions.to_vec(),
        });
    }

    fn target_compile_options(&mut self, target: &str, visibility: Visibility, options: &[String]) {
        self.record(FacadeCall::TargetCompileOptions {
            target: String::from(target),
            visibility,
            options: options.to_vec(),
        });
    }

    fn target_sources(&mut self, target: &str, visibility: Visibility, sources: &[String]) {
        self.record(FacadeCall::TargetSources {
            target: String::from(target),
            visibility,
            sources: sources.to_vec(),
        });
    }

    fn add_subdirectory_with_old_script(&mut self, dir: &str) {
        self.record(FacadeCall::AddSubdirectoryWithOldScript(String::from(dir)));
    }

    fn go_into_subdirectory(&mut self, dir: &str) {
        self.directories.push(String::from(dir));
        self.record(FacadeCall::GoIntoSubdirectory(String::from(dir)));
    }

    fn go_directory_up(&mut self) {
        self.directories.pop();
        self.record(FacadeCall::GoDirectoryUp);
    }

    fn prepare_for_add_subdirectory_with_script(&mut self, dir: &str) {
        self.go_into_subdirectory(dir);
    }

    fn finalize_after_add_subdirectory_with_script(&mut self) {
        self.go_directory_up();
    }

    fn enable_ctest(&mut self) {
        self.record(FacadeCall::EnableCtest);
    }

    fn add_test(&mut self, test_executable: &str) {
        self.record(FacadeCall::AddTest(String::from(test_executable)));
    }

    fn ctest_command(&self) -> String {
        String::from("ctest")
    }

    fn cxx_compiler_info(&self) -> CxxCompilerId {
        CxxCompilerId::Clang
    }

    fn system_info(&self) -> SystemId {
        if cfg!(windows) {
            SystemId::Windows
        } else {
            SystemId::Unix
        }
    }

    fn try_get_extern_define(&self, name: &str) -> Option<String> {
        self.defines.get(name).cloned()
    }

    fn set_property(&mut self, name: &str, value: &str) {
        self.record(FacadeCall::SetProperty {
            name: String::from(name),
            value: String::from(value),
        });
    }

    fn get_option_value(&self, name: &str) -> Option<bool> {
        self.options.get(name).copied()
    }

    fn register_option(&mut self, name: &str, description: &str, value: bool) {
        self.record(FacadeCall::RegisterOption {
            name: String::from(name),
            description: String::from(description),
            value,
        });
    }

    fn set_old_style_variable(&mut self, name: &str, value: &str) {
        self.old_style_variables
            .insert(String::from(name), String::from(value));
        self.record(FacadeCall::SetOldStyleVariable {
            name: String::from(name),
            value: String::from(value),
        });
    }

    fn get_old_style_variable(&self, name: &str) -> Option<String> {
        self.old_style_variables.get(name).cloned()
    }
}
