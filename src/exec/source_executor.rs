//! Compiles a script together with everything it imports or adds as a
//! subdirectory, and runs it.
//!
//! Paths of imports, subdirectories and declarative files are relative to
//! the directory of the script that names them.

use std::{
    collections::HashMap,
    fs,
    path::{Component as PathComponent, Path, PathBuf},
    rc::Rc,
};

use tracing::{debug, info};

use crate::{
    config::Config,
    decl::compiler::compile_declarative_source,
    errors::{
        diagnostics::{Diagnostic, DiagnosticsCollector, ErrorsObserver},
        errors::SemaError,
    },
    format_diagnostic,
    lexer::lexer::tokenize,
    parser::parser::parse,
    sema::{
        builder::{BuildResult, SemaBuilder},
        builtin_context::{create_builtin_context, BuiltinTypes},
        dumper::dump,
        functions::FunctionId,
        handlers::{AddSubdirectoryHandler, AddSubdirectoryResult, ImportHandler},
        qualified_contexts::QualifiedContexts,
        registry::Registry,
        sema_nodes::TranslationUnitNode,
    },
    Span,
};

use super::{execution::Execution, facade::CmakeFacade, instance::Instance};

/// Where source files come from.
pub trait SourceProvider {
    fn read(&self, path: &Path) -> Option<String>;

    fn exists(&self, path: &Path) -> bool {
        self.read(path).is_some()
    }
}

#[derive(Debug, Default)]
pub struct FileSystemSources;

impl SourceProvider for FileSystemSources {
    fn read(&self, path: &Path) -> Option<String> {
        fs::read_to_string(path).ok()
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Sources kept in memory, keyed by normalized path.
#[derive(Debug, Default)]
pub struct InMemorySources {
    files: HashMap<PathBuf, String>,
}

impl InMemorySources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl AsRef<Path>, content: &str) -> Self {
        self.files
            .insert(normalize(path.as_ref()), String::from(content));
        self
    }
}

impl SourceProvider for InMemorySources {
    fn read(&self, path: &Path) -> Option<String> {
        self.files.get(&normalize(path)).cloned()
    }
}

/// Resolves `.` and `..` without touching the file system.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            PathComponent::CurDir => {}
            PathComponent::ParentDir => {
                let at_root = matches!(
                    normalized.components().next_back(),
                    None | Some(PathComponent::ParentDir)
                );
                if at_root {
                    normalized.push("..");
                } else {
                    normalized.pop();
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
}

/// A compiled file other than the one being run.
#[derive(Debug)]
pub struct Module {
    pub path: PathBuf,
    pub unit: TranslationUnitNode,
}

/// A compiled script, ready to run.
#[derive(Debug)]
pub struct Program {
    pub registry: Registry,
    pub builtins: BuiltinTypes,
    /// Imported and subdirectory modules in load order
    pub modules: Vec<Module>,
    pub unit: TranslationUnitNode,
    pub main: FunctionId,
}

impl Program {
    /// Initialises statics and globals, then calls `main`.
    pub fn run(&self, facade: &mut dyn CmakeFacade, max_call_depth: usize) -> Option<Instance> {
        info!(file = %self.unit.file, "running");

        let mut execution = Execution::new(facade, &self.registry, self.builtins, max_call_depth);
        for module in &self.modules {
            execution.initialize_statics(&module.unit)?;
        }
        execution.initialize_globals(&self.unit)?;

        execution.call(self.main, vec![])
    }

    pub fn dump(&self) -> String {
        dump(&self.registry, &self.unit)
    }
}

/// Implements the builder callbacks by compiling neighbouring files.
struct ModuleLoader<'s> {
    config: &'s Config,
    sources: &'s dyn SourceProvider,
    errs: Rc<DiagnosticsCollector>,
    source_texts: &'s mut HashMap<String, String>,
    builtins: BuiltinTypes,
    builtin_contexts: QualifiedContexts,
    /// Exports of already imported files
    imports: HashMap<PathBuf, QualifiedContexts>,
    /// Files being built, innermost last
    in_progress: Vec<PathBuf>,
    modules: Vec<Module>,
}

impl ModuleLoader<'_> {
    fn current_dir(&self) -> PathBuf {
        self.in_progress
            .last()
            .and_then(|path| path.parent())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.source_root.clone())
    }

    fn error(&self, error: SemaError, span: &Span) {
        self.errs.notify_error(Diagnostic::error(error, span.clone()));
    }

    fn read(&mut self, path: &Path, span: &Span) -> Option<String> {
        match self.sources.read(path) {
            Some(source) => {
                self.source_texts
                    .insert(path.display().to_string(), source.clone());
                Some(source)
            }
            None => {
                self.error(
                    SemaError::SourceNotFound {
                        path: path.display().to_string(),
                    },
                    span,
                );
                None
            }
        }
    }

    fn build_file(&mut self, registry: &mut Registry, path: &Path, span: &Span) -> Option<BuildResult> {
        let source = self.read(path, span)?;
        self.build_source(registry, path, source)
    }

    fn build_source(
        &mut self,
        registry: &mut Registry,
        path: &Path,
        source: String,
    ) -> Option<BuildResult> {
        let file = path.display().to_string();
        debug!(file = %file, "compiling");

        let parsed = tokenize(source, Some(file.clone()))
            .and_then(|tokens| parse(tokens, Rc::new(file.clone())));
        let unit = match parsed {
            Ok(unit) => unit,
            Err(error) => {
                self.errs.notify_error(Diagnostic::from(&error));
                return None;
            }
        };

        let errs = Rc::clone(&self.errs);
        let contexts = self.builtin_contexts.clone();
        let builtins = self.builtins;

        self.in_progress.push(path.to_path_buf());
        let result = SemaBuilder::new(registry, &*errs, builtins, contexts, self).build(&unit);
        self.in_progress.pop();

        result
    }
}

impl ImportHandler for ModuleLoader<'_> {
    fn handle_import(
        &mut self,
        registry: &mut Registry,
        path: &str,
        span: &Span,
    ) -> Option<QualifiedContexts> {
        let path = normalize(&self.current_dir().join(path));

        if self.in_progress.contains(&path) {
            self.error(
                SemaError::CircularImport {
                    path: path.display().to_string(),
                },
                span,
            );
            return None;
        }

        if let Some(exported) = self.imports.get(&path) {
            return Some(exported.clone());
        }

        let result = self.build_file(registry, &path, span)?;
        debug!(path = %path.display(), "imported");

        self.imports.insert(path.clone(), result.exported.clone());
        self.modules.push(Module {
            path,
            unit: result.unit,
        });
        Some(result.exported)
    }
}

impl AddSubdirectoryHandler for ModuleLoader<'_> {
    fn handle_add_subdirectory(
        &mut self,
        registry: &mut Registry,
        name: &str,
        span: &Span,
    ) -> AddSubdirectoryResult {
        let dir = normalize(&self.current_dir().join(name));

        let script = dir.join(&self.config.script_file_name);
        if self.sources.exists(&script) {
            let Some(result) = self.build_file(registry, &script, span) else {
                return AddSubdirectoryResult::Failed;
            };
            let Some(main) = result.main else {
                self.error(SemaError::MainNotFound, span);
                return AddSubdirectoryResult::Failed;
            };

            self.modules.push(Module {
                path: script,
                unit: result.unit,
            });
            return AddSubdirectoryResult::ContainsScript { main };
        }

        let declarative = dir.join(&self.config.declarative_file_name);
        if self.sources.exists(&declarative) {
            return match self.handle_declarative_file(registry, &declarative, span) {
                Some(creation) => AddSubdirectoryResult::ContainsDeclarativeScript { creation },
                None => AddSubdirectoryResult::Failed,
            };
        }

        if self
            .sources
            .exists(&dir.join(&self.config.old_script_file_name))
        {
            return AddSubdirectoryResult::ContainsOldScript;
        }

        AddSubdirectoryResult::Failed
    }

    fn handle_add_declarative_file(
        &mut self,
        registry: &mut Registry,
        name: &str,
        span: &Span,
    ) -> Option<FunctionId> {
        let path = normalize(&self.current_dir().join(name));
        self.handle_declarative_file(registry, &path, span)
    }
}

impl ModuleLoader<'_> {
    fn handle_declarative_file(
        &mut self,
        registry: &mut Registry,
        path: &Path,
        span: &Span,
    ) -> Option<FunctionId> {
        let source = self.read(path, span)?;
        let file = path.display().to_string();
        compile_declarative_source(source, &file, registry, &self.builtins, &*self.errs)
    }
}

/// Entry point of the library: compiles scripts and runs them.
pub struct SourceExecutor {
    config: Config,
    sources: Box<dyn SourceProvider>,
    errs: Rc<DiagnosticsCollector>,
    source_texts: HashMap<String, String>,
}

impl SourceExecutor {
    pub fn new(config: Config, sources: Box<dyn SourceProvider>) -> Self {
        SourceExecutor {
            config,
            sources,
            errs: Rc::new(DiagnosticsCollector::new()),
            source_texts: HashMap::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Diagnostics of every compilation so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.errs.diagnostics()
    }

    pub fn has_errors(&self) -> bool {
        self.errs.has_errors()
    }

    /// Diagnostics rendered with the source lines they point at.
    pub fn format_diagnostics(&self) -> String {
        self.errs
            .diagnostics()
            .iter()
            .map(|diagnostic| {
                let source = self
                    .source_texts
                    .get(diagnostic.span.file())
                    .map(String::as_str)
                    .unwrap_or_default();
                format_diagnostic(diagnostic, source)
            })
            .collect()
    }

    /// Compiles the script at `path`, relative to the source root.
    pub fn compile_file(&mut self, path: &Path) -> Option<Program> {
        let path = normalize(&self.config.source_root.join(path));
        let Some(source) = self.sources.read(&path) else {
            self.errs.notify_error(Diagnostic::error(
                SemaError::SourceNotFound {
                    path: path.display().to_string(),
                },
                Span::null(),
            ));
            return None;
        };
        self.compile_source_at(&path, source)
    }

    /// Compiles `source` as the script of the source root.
    pub fn compile_source(&mut self, source: &str) -> Option<Program> {
        let path = normalize(&self.config.source_root.join(&self.config.script_file_name));
        self.compile_source_at(&path, String::from(source))
    }

    fn compile_source_at(&mut self, path: &Path, source: String) -> Option<Program> {
        self.source_texts
            .insert(path.display().to_string(), source.clone());

        let mut registry = Registry::new();
        let (builtins, builtin_contexts) = create_builtin_context(&mut registry);

        let mut loader = ModuleLoader {
            config: &self.config,
            sources: &*self.sources,
            errs: Rc::clone(&self.errs),
            source_texts: &mut self.source_texts,
            builtins,
            builtin_contexts,
            imports: HashMap::new(),
            in_progress: vec![],
            modules: vec![],
        };

        let result = loader.build_source(&mut registry, path, source)?;
        let modules = loader.modules;

        let Some(main) = result.main else {
            self.errs
                .notify_error(Diagnostic::error(SemaError::MainNotFound, result.unit.span));
            return None;
        };

        Some(Program {
            registry,
            builtins,
            modules,
            unit: result.unit,
            main,
        })
    }

    /// Compiles and runs the script at `path`. Returns what `main` returned,
    /// or `None` when compilation failed or a fatal error stopped the run.
    pub fn execute_file(&mut self, path: &Path, facade: &mut dyn CmakeFacade) -> Option<i64> {
        let program = self.compile_file(path)?;
        self.run(&program, facade)
    }

    pub fn execute(&mut self, source: &str, facade: &mut dyn CmakeFacade) -> Option<i64> {
        let program = self.compile_source(source)?;
        self.run(&program, facade)
    }

    pub fn run(&self, program: &Program, facade: &mut dyn CmakeFacade) -> Option<i64> {
        let result = program.run(facade, self.config.max_call_depth)?;
        Some(result.as_int())
    }
}
