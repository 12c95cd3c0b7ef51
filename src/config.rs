//! Runtime configuration of a script run.

use std::path::PathBuf;

/// Stack a spawned Rust thread gets unless asked for more.
pub const DEFAULT_THREAD_STACK_SIZE: usize = 2 * 1024 * 1024;

/// Native stack one script call may take: the interpreter recurses through
/// the call, its block, its statements and their nested expressions.
pub const STACK_PER_SCRIPT_CALL: usize = 24 * 1024;

/// Settings shared by the module loader and the interpreter.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory `cmake::root_source_dir()` reports and relative paths start from.
    pub source_root: PathBuf,
    /// Script looked up by `add_subdirectory`.
    pub script_file_name: String,
    /// Declarative file looked up by `add_subdirectory` when there is no script.
    pub declarative_file_name: String,
    /// Old-style CMake listfile, the last fallback of `add_subdirectory`.
    pub old_script_file_name: String,
    /// Deepest script call chain before a run is stopped with a fatal error.
    pub max_call_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_root: PathBuf::from("."),
            script_file_name: String::from("CMakeLists.cmsl"),
            declarative_file_name: String::from("CMakeLists.dcmsl"),
            old_script_file_name: String::from("CMakeLists.txt"),
            max_call_depth: DEFAULT_THREAD_STACK_SIZE / STACK_PER_SCRIPT_CALL,
        }
    }
}

impl Config {
    pub fn with_source_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.source_root = root.into();
        self
    }

    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Native stack a thread needs to run scripts up to `max_call_depth`.
    pub fn required_stack_size(&self) -> usize {
        self.max_call_depth
            .saturating_mul(STACK_PER_SCRIPT_CALL)
            .max(DEFAULT_THREAD_STACK_SIZE)
    }
}
