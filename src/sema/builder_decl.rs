use std::{collections::HashSet, rc::Rc};

use tracing::{debug, trace};

use crate::{
    ast::{
        ast::Stmt,
        statements::{ClassDeclStmt, ClassMember, EnumDeclStmt, FnDeclStmt, ImportStmt, NamespaceStmt},
    },
    errors::errors::SemaError,
};

use super::{
    builder::{FunctionParsingState, SemaBuilder},
    builtin_context::add_enum_functions,
    builtin_function_kind::BuiltinFunctionKind,
    context::ContextKind,
    functions::{FunctionBody, FunctionId, FunctionSignature, ParamDeclaration, SemaFunction},
    qualified_contexts::{EnumValueInfo, IdInfo},
    sema_nodes::{BlockNode, ClassNode, FunctionDefinitionNode, NamespaceNode, SemaNode},
    types::{MemberInfo, SemaType, TypeId, TypeKind},
};

impl<'a> SemaBuilder<'a> {
    pub(super) fn build_global_stmt(&mut self, stmt: &Stmt) -> Option<SemaNode> {
        match stmt {
            Stmt::VarDecl(decl) => self
                .build_variable_declaration(decl)
                .map(SemaNode::VariableDeclaration),
            Stmt::FnDecl(decl) => {
                let function = self.build_function_declaration(decl)?;
                self.build_function_body(function, decl)
                    .map(SemaNode::FunctionDefinition)
            }
            Stmt::ClassDecl(decl) => self.build_class(decl),
            Stmt::EnumDecl(decl) => self.build_enum(decl),
            Stmt::Namespace(decl) => self.build_namespace(decl),
            Stmt::Import(decl) => self.build_import(decl),
            other => {
                self.error(SemaError::StatementNotAllowed, other.get_span());
                None
            }
        }
    }

    /// Registers the function so its body, and everything after it, can
    /// call it.
    pub(super) fn build_function_declaration(&mut self, decl: &FnDeclStmt) -> Option<FunctionId> {
        let name = decl.name.value.clone();

        let return_type = if decl.return_type.is_auto() {
            None
        } else {
            Some(self.resolve_type(&decl.return_type)?)
        };

        let mut params = vec![];
        for param in &decl.params {
            let ty = self.resolve_type(&param.ty)?;
            if self.is_void(ty) {
                self.error(SemaError::VoidVariable, &param.name.span);
                return None;
            }

            params.push(ParamDeclaration {
                ty,
                name: param.name.value.clone(),
                index: self.registry.generate_index(),
            });
        }

        for existing in self.contexts.functions.find_all_in_current_scope(&name) {
            let existing_params = self.registry.function(existing).params();
            let same_params = existing_params.len() == params.len()
                && existing_params
                    .iter()
                    .zip(&params)
                    .all(|(a, b)| self.registry.same_type(a.ty, b.ty));

            if same_params {
                self.error(SemaError::FunctionRedefinition, &decl.name.span);
                self.note(
                    SemaError::PreviousDefinitionIsHere,
                    &self.registry.function(existing).signature.span,
                );
                return None;
            }
        }

        let function = self.registry.create_function(SemaFunction {
            signature: FunctionSignature {
                name: name.clone(),
                params,
                span: decl.name.span.clone(),
            },
            return_type,
            context: self.sema_context,
            body: FunctionBody::User(None),
        });
        self.contexts
            .functions
            .register(&name, function, decl.exported);

        trace!(name = %name, "declared function");
        Some(function)
    }

    pub(super) fn build_function_body(
        &mut self,
        function: FunctionId,
        decl: &FnDeclStmt,
    ) -> Option<FunctionDefinitionNode> {
        self.function_stack.push(FunctionParsingState {
            function,
            return_types: vec![],
        });
        let saved_loop_depth = std::mem::replace(&mut self.loop_depth, 0);

        let body = self.build_function_block(function, decl);

        self.loop_depth = saved_loop_depth;
        let state = self.function_stack.pop()?;
        let mut body = body?;

        if self.registry.function(function).return_type.is_none() {
            let deduced = self.deduce_return_type(&state, decl)?;
            self.registry.function_mut(function).return_type = Some(deduced);
        }

        if !matches!(body.nodes.last(), Some(SemaNode::Return(_))) {
            body.nodes
                .push(SemaNode::ImplicitReturn(decl.body.span.clone()));
        }

        let body = Rc::new(body);
        self.registry.function_mut(function).body = FunctionBody::User(Some(Rc::clone(&body)));

        Some(FunctionDefinitionNode {
            function,
            body,
            span: decl.span.clone(),
        })
    }

    fn build_function_block(&mut self, function: FunctionId, decl: &FnDeclStmt) -> Option<BlockNode> {
        let mut scope = self.local_scope();

        let params = scope.registry.function(function).params().to_vec();
        for param in params {
            scope.contexts.ids.register(
                &param.name,
                IdInfo {
                    ty: param.ty,
                    index: param.index,
                },
                false,
            );
        }

        scope.build_block(&decl.body)
    }

    /// Every `return` of an `auto` function must produce the same type.
    fn deduce_return_type(&self, state: &FunctionParsingState, decl: &FnDeclStmt) -> Option<TypeId> {
        let Some((deduced, _)) = state.return_types.first() else {
            return Some(self.builtins.void);
        };

        let consistent = state
            .return_types
            .iter()
            .all(|(ty, _)| self.registry.same_type(*ty, *deduced));

        if !consistent {
            self.error(SemaError::InconsistentAutoDeduction, &decl.name.span);
            for (ty, span) in &state.return_types {
                self.note(
                    SemaError::DeducedAs {
                        ty: self.type_name(*ty),
                    },
                    span,
                );
            }
            return None;
        }

        Some(*deduced)
    }

    /// Reports a redefinition of a type name in the current scope.
    fn check_type_redefinition(&self, name: &crate::lexer::tokens::Token) -> Option<()> {
        if let Some(existing) = self.contexts.types.find_in_current_scope(&name.value) {
            self.error(SemaError::TypeRedefinition, &name.span);
            self.note(SemaError::PreviouslyDefinedHere, &self.registry.ty(existing).span);
            return None;
        }
        Some(())
    }

    pub(super) fn build_class(&mut self, decl: &ClassDeclStmt) -> Option<SemaNode> {
        let name = decl.name.value.clone();
        self.check_type_redefinition(&decl.name)?;

        let base = match &decl.base {
            Some(repr) => {
                let base = self.resolve_type(repr)?;
                let base = self.registry.decayed(base);
                if !self.registry.ty(base).is_class() {
                    self.error(
                        SemaError::InvalidBaseType {
                            name: self.type_name(base),
                        },
                        &repr.span,
                    );
                    return None;
                }
                Some(base)
            }
            None => None,
        };

        let context = self
            .registry
            .create_context(ContextKind::Class, &name, Some(self.sema_context));
        let ty = self.registry.create_type(SemaType {
            name: self.qualified_type_name(&name),
            primary_name: name.clone(),
            kind: TypeKind::Class,
            context,
            members: vec![],
            base,
            builtin: false,
            span: decl.name.span.clone(),
        });
        self.contexts.types.register(&name, ty, decl.exported);

        let ty_ref = self.registry.create_reference(ty);
        self.registry.add_builtin_function(
            context,
            "=",
            &[ty],
            ty_ref,
            BuiltinFunctionKind::UserTypeOperatorEqual,
        );

        debug!(class = %name, "building class");

        let mut scope = self.global_scope(&[name], false, context);
        scope.build_class_body(ty, base, decl)
    }

    fn build_class_body(
        &mut self,
        ty: TypeId,
        base: Option<TypeId>,
        decl: &ClassDeclStmt,
    ) -> Option<SemaNode> {
        if let Some(base) = base {
            self.register_base_members(base);
        }

        let mut members = vec![];
        for member in &decl.members {
            let ClassMember::Variable(var) = member else {
                continue;
            };

            if var.ty.is_auto() {
                self.error(SemaError::AutoWithoutInitializer, &var.span);
                return None;
            }

            let member_type = self.resolve_type(&var.ty)?;
            if self.is_void(member_type) {
                self.error(SemaError::VoidVariable, &var.name.span);
                return None;
            }
            if self.registry.ty(member_type).is_reference() {
                self.error(SemaError::ReferenceWithoutInitializer, &var.span);
                return None;
            }
            if self.registry.same_type(member_type, ty) {
                self.error(
                    SemaError::IncompleteMemberType {
                        ty: self.type_name(ty),
                    },
                    &var.ty.span,
                );
                return None;
            }

            let index = self.registry.generate_index();
            self.contexts.ids.register(
                &var.name.value,
                IdInfo {
                    ty: member_type,
                    index,
                },
                false,
            );
            members.push(MemberInfo {
                name: var.name.value.clone(),
                ty: member_type,
                index,
            });
        }
        self.registry.ty_mut(ty).members = members;

        // Declarations first so methods can call each other in any order
        let mut functions = vec![];
        for member in &decl.members {
            if let ClassMember::Function(function) = member {
                functions.push((self.build_function_declaration(function)?, function));
            }
        }

        let mut definitions = vec![];
        for (function, function_decl) in functions {
            definitions.push(self.build_function_body(function, function_decl)?);
        }

        Some(SemaNode::Class(ClassNode {
            ty,
            functions: definitions,
            span: decl.span.clone(),
        }))
    }

    /// Makes members and methods of the base chain visible unqualified
    /// inside the derived class.
    fn register_base_members(&mut self, base: TypeId) {
        for member in self.registry.all_members(base) {
            self.contexts.ids.register(
                &member.name,
                IdInfo {
                    ty: member.ty,
                    index: member.index,
                },
                false,
            );
        }

        let mut current = Some(base);
        while let Some(ty) = current {
            let sema_type = self.registry.ty(ty);
            let constructor = sema_type.primary_name.clone();
            let functions = self.registry.context(sema_type.context).functions.clone();
            current = sema_type.base;

            for function in functions {
                let name = self.registry.function(function).name().to_string();
                if name != "=" && name != constructor {
                    self.contexts.functions.register(&name, function, false);
                }
            }
        }
    }

    pub(super) fn build_enum(&mut self, decl: &EnumDeclStmt) -> Option<SemaNode> {
        let name = decl.name.value.clone();
        self.check_type_redefinition(&decl.name)?;

        let mut seen = HashSet::new();
        for enumerator in &decl.enumerators {
            if !seen.insert(enumerator.value.as_str()) {
                self.error(SemaError::EnumeratorRedefinition, &enumerator.span);
                return None;
            }
        }

        let context = self
            .registry
            .create_context(ContextKind::Enum, &name, Some(self.sema_context));
        let ty = self.registry.create_type(SemaType {
            name: self.qualified_type_name(&name),
            primary_name: name.clone(),
            kind: TypeKind::Enum {
                enumerators: decl.enumerators.iter().map(|e| e.value.clone()).collect(),
            },
            context,
            members: vec![],
            base: None,
            builtin: false,
            span: decl.name.span.clone(),
        });
        self.contexts.types.register(&name, ty, decl.exported);
        add_enum_functions(self.registry, &self.builtins, ty);

        self.contexts.enums.enter_global_ctx(&name, decl.exported);
        for (value, enumerator) in decl.enumerators.iter().enumerate() {
            let index = self.registry.generate_index();
            self.contexts.enums.register(
                &enumerator.value,
                EnumValueInfo {
                    ty,
                    value: value as u32,
                    index,
                },
                decl.exported,
            );
        }
        self.contexts.enums.leave_ctx();

        Some(SemaNode::Enum {
            ty,
            span: decl.span.clone(),
        })
    }

    pub(super) fn build_namespace(&mut self, decl: &NamespaceStmt) -> Option<SemaNode> {
        let names: Vec<String> = decl.names.iter().map(|t| t.value.clone()).collect();
        let name = names.join("::");

        let context =
            self.registry
                .create_context(ContextKind::Namespace, &name, Some(self.sema_context));

        let mut scope = self.global_scope(&names, false, context);
        let mut nodes = vec![];
        for stmt in &decl.body {
            nodes.push(scope.build_global_stmt(stmt)?);
        }

        Some(SemaNode::Namespace(NamespaceNode {
            name,
            nodes,
            span: decl.span.clone(),
        }))
    }

    pub(super) fn build_import(&mut self, decl: &ImportStmt) -> Option<SemaNode> {
        let path = decl.path.value.clone();
        debug!(path = %path, "importing");

        let Some(imported) = self
            .handlers
            .handle_import(self.registry, &path, &decl.span)
        else {
            self.error(SemaError::ImportFailed, &decl.span);
            return None;
        };

        if let Err(name) = self.contexts.merge_imported_stuff(&imported, self.registry) {
            self.error(SemaError::ImportConflict { name }, &decl.span);
            return None;
        }

        Some(SemaNode::Import {
            path,
            span: decl.span.clone(),
        })
    }
}
