//! Builds the typed sema tree out of a parsed translation unit.
//!
//! The builder is split across files the same way the parser is:
//!
//! - `builder.rs`: state, scope guards, type resolution and cast insertion
//! - `builder_decl.rs`: global declarations (functions, classes, enums,
//!   namespaces, imports)
//! - `builder_stmt.rs`: statements inside function bodies
//! - `builder_expr.rs`: expressions, calls and operators
//!
//! Every fallible step reports its diagnostics to the errors observer and
//! returns `None`; callers stop building the enclosing construct.

use std::{
    collections::HashSet,
    ops::{Deref, DerefMut},
};

use tracing::debug;

use crate::{
    ast::{ast::TranslationUnit, types::TypeRepresentation},
    errors::{
        diagnostics::{Diagnostic, ErrorsObserver},
        errors::SemaError,
    },
    Span,
};

use super::{
    builtin_context::BuiltinTypes,
    context::ContextId,
    functions::FunctionId,
    generic_type_factory::GenericTypeFactory,
    handlers::SemaHandlers,
    overload_resolution::OverloadResolution,
    qualified_contexts::QualifiedContexts,
    registry::Registry,
    sema_nodes::{ExprKind, ExprNode, TranslationUnitNode},
    types::TypeId,
};

/// Bookkeeping for the function whose body is being built.
#[derive(Debug)]
pub(super) struct FunctionParsingState {
    pub function: FunctionId,
    /// Decayed types of every `return`, used to deduce `auto`
    pub return_types: Vec<(TypeId, Span)>,
}

/// Output of a successful build.
#[derive(Debug)]
pub struct BuildResult {
    pub unit: TranslationUnitNode,
    pub exported: QualifiedContexts,
    pub main: Option<FunctionId>,
}

pub struct SemaBuilder<'a> {
    pub(super) registry: &'a mut Registry,
    pub(super) errs: &'a dyn ErrorsObserver,
    pub(super) builtins: BuiltinTypes,
    pub(super) contexts: QualifiedContexts,
    pub(super) handlers: &'a mut dyn SemaHandlers,
    /// Namespace or class whose functions are being declared
    pub(super) sema_context: ContextId,
    pub(super) namespace_path: Vec<String>,
    pub(super) function_stack: Vec<FunctionParsingState>,
    pub(super) loop_depth: usize,
}

/// Leaves scopes entered through the builder when dropped, on every exit
/// path.
pub(super) struct ScopeGuard<'b, 'a> {
    builder: &'b mut SemaBuilder<'a>,
    depth: usize,
    saved_context: ContextId,
    saved_namespace_len: usize,
}

impl<'a> Deref for ScopeGuard<'_, 'a> {
    type Target = SemaBuilder<'a>;

    fn deref(&self) -> &Self::Target {
        self.builder
    }
}

impl DerefMut for ScopeGuard<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.builder
    }
}

impl Drop for ScopeGuard<'_, '_> {
    fn drop(&mut self) {
        for _ in 0..self.depth {
            self.builder.contexts.leave_ctx();
        }
        self.builder.sema_context = self.saved_context;
        self.builder.namespace_path.truncate(self.saved_namespace_len);
    }
}

impl<'a> SemaBuilder<'a> {
    /// `contexts` is the symbol table the unit starts from, usually a clone
    /// of the builtin one.
    pub fn new(
        registry: &'a mut Registry,
        errs: &'a dyn ErrorsObserver,
        builtins: BuiltinTypes,
        contexts: QualifiedContexts,
        handlers: &'a mut dyn SemaHandlers,
    ) -> Self {
        SemaBuilder {
            registry,
            errs,
            builtins,
            contexts,
            handlers,
            sema_context: builtins.global_context,
            namespace_path: vec![],
            function_stack: vec![],
            loop_depth: 0,
        }
    }

    pub fn build(mut self, unit: &TranslationUnit) -> Option<BuildResult> {
        let file = unit.span.file().to_string();
        debug!(file = %file, "building sema tree");

        let mut nodes = vec![];
        for stmt in &unit.body {
            nodes.push(self.build_global_stmt(stmt)?);
        }

        let main = self.contexts.functions.find(&[String::from("main")]);

        Some(BuildResult {
            unit: TranslationUnitNode {
                file,
                nodes,
                span: unit.span.clone(),
            },
            exported: self.contexts.collect_exported_stuff(),
            main,
        })
    }

    pub(super) fn error(&self, error: SemaError, span: &Span) {
        self.errs.notify_error(Diagnostic::error(error, span.clone()));
    }

    pub(super) fn note(&self, note: SemaError, span: &Span) {
        self.errs.notify_error(Diagnostic::note(note, span.clone()));
    }

    pub(super) fn local_scope(&mut self) -> ScopeGuard<'_, 'a> {
        self.contexts.enter_local_ctx();
        self.guard(1)
    }

    /// Enters the named scopes in `names`, one inside the other.
    pub(super) fn global_scope(
        &mut self,
        names: &[String],
        exported: bool,
        context: ContextId,
    ) -> ScopeGuard<'_, 'a> {
        let saved_context = self.sema_context;
        let saved_namespace_len = self.namespace_path.len();

        for name in names {
            self.contexts.enter_global_ctx(name, exported);
            self.namespace_path.push(name.clone());
        }
        self.sema_context = context;

        ScopeGuard {
            depth: names.len(),
            saved_context,
            saved_namespace_len,
            builder: self,
        }
    }

    fn guard(&mut self, depth: usize) -> ScopeGuard<'_, 'a> {
        ScopeGuard {
            depth,
            saved_context: self.sema_context,
            saved_namespace_len: self.namespace_path.len(),
            builder: self,
        }
    }

    /// `name` prefixed with the enclosing namespaces.
    pub(super) fn qualified_type_name(&self, name: &str) -> String {
        let mut names = self.namespace_path.clone();
        names.push(String::from(name));
        names.join("::")
    }

    pub(super) fn type_name(&self, ty: TypeId) -> String {
        self.registry.type_name(ty).to_string()
    }

    pub(super) fn is_void(&self, ty: TypeId) -> bool {
        self.registry.ty(self.registry.decayed(ty)).is_void()
    }

    /// Resolves a spelled type. `auto` must be handled by the caller.
    pub(super) fn resolve_type(&mut self, repr: &TypeRepresentation) -> Option<TypeId> {
        let ty = if repr.is_generic() {
            GenericTypeFactory::new(self.registry, &self.builtins).create_generic(
                &repr.without_reference(),
                &self.contexts.types,
                self.errs,
            )?
        } else {
            match self.contexts.types.find(&repr.qualified_names()) {
                Some(ty) => ty,
                None => {
                    self.error(
                        SemaError::TypeNotFound {
                            name: repr.without_reference().to_string(),
                        },
                        &repr.span,
                    );
                    return None;
                }
            }
        };

        if repr.is_reference {
            Some(self.registry.create_reference(ty))
        } else {
            Some(ty)
        }
    }

    /// Whether `expr` can initialize a value of type `target`.
    pub(super) fn is_convertible(&self, target: TypeId, expr: &ExprNode) -> bool {
        OverloadResolution::score(self.registry, target, expr.ty).is_some()
    }

    /// Wraps `expr` in the cast that turns it into a `target`.
    pub(super) fn convert_to_cast_node_if_need(
        &mut self,
        target: TypeId,
        expr: ExprNode,
    ) -> Option<ExprNode> {
        if self.registry.ty(expr.ty).is_designated_initializer() {
            return self.resolve_designated_initializers(target, expr);
        }

        if self.registry.same_type(target, expr.ty) {
            return Some(expr);
        }

        let target_is_reference = self.registry.ty(target).is_reference();
        let target_decayed = self.registry.decayed(target);
        let expr_decayed = self.registry.decayed(expr.ty);
        let span = expr.span.clone();
        let expr = Box::new(expr);

        let kind = if !self.registry.same_type(target_decayed, expr_decayed) {
            if target_is_reference {
                ExprKind::CastToReferenceToBase(expr)
            } else {
                ExprKind::CastToBaseValue(expr)
            }
        } else if target_is_reference {
            ExprKind::CastToReference(expr)
        } else {
            ExprKind::CastToValue(expr)
        };

        Some(ExprNode::new(kind, target, span))
    }

    /// Binds `{.member = value}` to the members of `target`.
    fn resolve_designated_initializers(
        &mut self,
        target: TypeId,
        expr: ExprNode,
    ) -> Option<ExprNode> {
        let class = self.registry.decayed(target);
        let ExprKind::UnresolvedDesignatedInitializers(initializers) = expr.kind else {
            return Some(expr);
        };

        if !self.registry.ty(class).is_class() {
            self.error(
                SemaError::IncompatibleInitialization {
                    expected: self.type_name(target),
                    got: self.type_name(self.builtins.designated_initializer),
                },
                &expr.span,
            );
            return None;
        }

        let mut seen = HashSet::new();
        let mut resolved = vec![];

        for initializer in initializers {
            let Some(member) = self.registry.find_member(class, &initializer.name) else {
                self.error(
                    SemaError::MemberNotFound {
                        ty: self.type_name(class),
                        member: initializer.name.clone(),
                    },
                    &initializer.span,
                );
                return None;
            };

            if !seen.insert(member.index) {
                self.error(
                    SemaError::MemberInitializedTwice {
                        member: initializer.name.clone(),
                    },
                    &initializer.span,
                );
                return None;
            }

            if !self.is_convertible(member.ty, &initializer.value) {
                self.error(
                    SemaError::IncompatibleInitialization {
                        expected: self.type_name(member.ty),
                        got: self.type_name(initializer.value.ty),
                    },
                    &initializer.span,
                );
                return None;
            }

            let value = self.convert_to_cast_node_if_need(member.ty, initializer.value)?;
            resolved.push((member.index, value));
        }

        Some(ExprNode::new(
            ExprKind::DesignatedInitializers(resolved),
            class,
            expr.span,
        ))
    }
}
