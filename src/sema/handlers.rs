//! Callbacks the builder uses to reach other files.

use crate::Span;

use super::{functions::FunctionId, qualified_contexts::QualifiedContexts, registry::Registry};

#[derive(Debug, Clone, PartialEq)]
pub enum AddSubdirectoryResult {
    /// The directory has a script; `main` is its entry point
    ContainsScript { main: FunctionId },
    /// The directory has a declarative file compiled into `creation`
    ContainsDeclarativeScript { creation: FunctionId },
    /// Only an old-style listfile, handled by the build tool itself
    ContainsOldScript,
    Failed,
}

pub trait AddSubdirectoryHandler {
    fn handle_add_subdirectory(
        &mut self,
        registry: &mut Registry,
        name: &str,
        span: &Span,
    ) -> AddSubdirectoryResult;

    /// Compiles a declarative file into its creation function.
    fn handle_add_declarative_file(
        &mut self,
        registry: &mut Registry,
        name: &str,
        span: &Span,
    ) -> Option<FunctionId>;
}

pub trait ImportHandler {
    /// Builds the imported file and returns its exported symbols.
    fn handle_import(
        &mut self,
        registry: &mut Registry,
        path: &str,
        span: &Span,
    ) -> Option<QualifiedContexts>;
}

pub trait SemaHandlers: AddSubdirectoryHandler + ImportHandler {}

impl<T: AddSubdirectoryHandler + ImportHandler> SemaHandlers for T {}

/// Handlers for a single file with no neighbours.
#[derive(Debug, Default)]
pub struct NoopHandlers;

impl AddSubdirectoryHandler for NoopHandlers {
    fn handle_add_subdirectory(
        &mut self,
        _registry: &mut Registry,
        _name: &str,
        _span: &Span,
    ) -> AddSubdirectoryResult {
        AddSubdirectoryResult::Failed
    }

    fn handle_add_declarative_file(
        &mut self,
        _registry: &mut Registry,
        _name: &str,
        _span: &Span,
    ) -> Option<FunctionId> {
        None
    }
}

impl ImportHandler for NoopHandlers {
    fn handle_import(
        &mut self,
        _registry: &mut Registry,
        _path: &str,
        _span: &Span,
    ) -> Option<QualifiedContexts> {
        None
    }
}
