use tracing::trace;

use crate::{
    ast::{
        ast::{Expr, Stmt},
        statements::{BlockStmt, ForStmt, IfStmt, ReturnStmt, VarDeclStmt, WhileStmt},
    },
    errors::errors::SemaError,
    Span,
};

use super::{
    builder::SemaBuilder,
    qualified_contexts::IdInfo,
    sema_nodes::{
        BlockNode, ConditionalNode, ExprNode, ForNode, IfElseNode, ReturnNode, SemaNode,
        VariableDeclarationNode, WhileNode,
    },
};

impl<'a> SemaBuilder<'a> {
    /// A `{ ... }` body in its own local scope.
    pub(super) fn build_block(&mut self, block: &BlockStmt) -> Option<BlockNode> {
        let mut scope = self.local_scope();

        let mut nodes = vec![];
        for stmt in &block.body {
            nodes.push(scope.build_stmt(stmt)?);
        }

        Some(BlockNode {
            nodes,
            span: block.span.clone(),
        })
    }

    pub(super) fn build_stmt(&mut self, stmt: &Stmt) -> Option<SemaNode> {
        match stmt {
            Stmt::Expression(stmt) => self.build_expr(&stmt.expression).map(SemaNode::Expression),
            Stmt::VarDecl(decl) => self
                .build_variable_declaration(decl)
                .map(SemaNode::VariableDeclaration),
            Stmt::Block(block) => self.build_block(block).map(SemaNode::Block),
            Stmt::If(stmt) => self.build_if_else(stmt),
            Stmt::While(stmt) => self.build_while(stmt),
            Stmt::For(stmt) => self.build_for(stmt),
            Stmt::Break(stmt) => self.build_break(&stmt.span),
            Stmt::Return(stmt) => self.build_return(stmt),
            Stmt::FnDecl(_)
            | Stmt::ClassDecl(_)
            | Stmt::EnumDecl(_)
            | Stmt::Namespace(_)
            | Stmt::Import(_) => {
                self.error(SemaError::DeclarationNotAllowed, stmt.get_span());
                None
            }
        }
    }

    pub(super) fn build_variable_declaration(
        &mut self,
        decl: &VarDeclStmt,
    ) -> Option<VariableDeclarationNode> {
        if decl.exported && !(self.function_stack.is_empty() && self.contexts.ids.is_in_global_ctx()) {
            self.error(SemaError::ExportingLocalVariable, &decl.span);
            return None;
        }

        // The variable is not visible in its own initializer
        let initialization = match &decl.initialization {
            Some(init) => Some(self.build_expr(init)?),
            None => None,
        };

        let ty = if decl.ty.is_auto() {
            let Some(init) = &initialization else {
                self.error(SemaError::AutoWithoutInitializer, &decl.span);
                return None;
            };

            if self.registry.ty(init.ty).is_designated_initializer() {
                self.error(SemaError::DesignatedInitializerWithoutType, &init.span);
                return None;
            }

            let decayed = self.registry.decayed(init.ty);
            if decl.ty.is_reference {
                self.registry.create_reference(decayed)
            } else {
                decayed
            }
        } else {
            self.resolve_type(&decl.ty)?
        };

        if self.is_void(ty) {
            self.error(SemaError::VoidVariable, &decl.name.span);
            return None;
        }

        let initialization = match initialization {
            Some(init) => {
                if !self.is_convertible(ty, &init) {
                    self.error(
                        SemaError::IncompatibleInitialization {
                            expected: self.type_name(ty),
                            got: self.type_name(init.ty),
                        },
                        &init.span,
                    );
                    return None;
                }
                Some(self.convert_to_cast_node_if_need(ty, init)?)
            }
            None if self.registry.ty(ty).is_reference() => {
                self.error(SemaError::ReferenceWithoutInitializer, &decl.span);
                return None;
            }
            None => None,
        };

        let index = self.registry.generate_index();
        self.contexts
            .ids
            .register(&decl.name.value, IdInfo { ty, index }, decl.exported);

        trace!(name = %decl.name.value, ty = %self.type_name(ty), "declared variable");

        Some(VariableDeclarationNode {
            ty,
            name: decl.name.value.clone(),
            index,
            initialization,
            span: decl.span.clone(),
        })
    }

    fn build_condition(&mut self, condition: &Expr) -> Option<ExprNode> {
        let condition = self.build_expr(condition)?;

        if !self
            .registry
            .same_type(self.registry.decayed(condition.ty), self.builtins.bool)
        {
            self.error(
                SemaError::ExpectedBool {
                    got: self.type_name(condition.ty),
                },
                &condition.span,
            );
            return None;
        }

        let bool = self.builtins.bool;
        self.convert_to_cast_node_if_need(bool, condition)
    }

    fn build_if_else(&mut self, stmt: &IfStmt) -> Option<SemaNode> {
        let mut ifs = vec![];
        for conditional in &stmt.ifs {
            let condition = self.build_condition(&conditional.condition)?;
            let body = self.build_block(&conditional.body)?;
            ifs.push(ConditionalNode { condition, body });
        }

        let else_body = match &stmt.else_body {
            Some(body) => Some(self.build_block(body)?),
            None => None,
        };

        Some(SemaNode::IfElse(IfElseNode {
            ifs,
            else_body,
            span: stmt.span.clone(),
        }))
    }

    fn build_loop_body(&mut self, body: &BlockStmt) -> Option<BlockNode> {
        self.loop_depth += 1;
        let body = self.build_block(body);
        self.loop_depth -= 1;
        body
    }

    fn build_while(&mut self, stmt: &WhileStmt) -> Option<SemaNode> {
        let condition = self.build_condition(&stmt.condition)?;
        let body = self.build_loop_body(&stmt.body)?;

        Some(SemaNode::While(WhileNode {
            condition,
            body,
            span: stmt.span.clone(),
        }))
    }

    fn build_for(&mut self, stmt: &ForStmt) -> Option<SemaNode> {
        let mut scope = self.local_scope();

        let init = match &stmt.init {
            Some(init) => Some(Box::new(scope.build_stmt(init)?)),
            None => None,
        };
        let condition = match &stmt.condition {
            Some(condition) => Some(scope.build_condition(condition)?),
            None => None,
        };
        let iteration = match &stmt.iteration {
            Some(iteration) => Some(scope.build_expr(iteration)?),
            None => None,
        };
        let body = scope.build_loop_body(&stmt.body)?;

        Some(SemaNode::For(ForNode {
            init,
            condition,
            iteration,
            body,
            span: stmt.span.clone(),
        }))
    }

    fn build_break(&mut self, span: &Span) -> Option<SemaNode> {
        if self.loop_depth == 0 {
            self.error(SemaError::BreakOutsideLoop, span);
            return None;
        }

        Some(SemaNode::Break(span.clone()))
    }

    fn build_return(&mut self, stmt: &ReturnStmt) -> Option<SemaNode> {
        let value = match &stmt.value {
            Some(value) => Some(self.build_expr(value)?),
            None => None,
        };

        let Some(state) = self.function_stack.last() else {
            self.error(SemaError::StatementNotAllowed, &stmt.span);
            return None;
        };
        let function = state.function;

        let return_type = self.registry.function(function).return_type;
        let Some(expected) = return_type else {
            // `auto`, remember what was returned for the deduction
            let returned = match &value {
                Some(value) => self.registry.decayed(value.ty),
                None => self.builtins.void,
            };
            if let Some(state) = self.function_stack.last_mut() {
                state.return_types.push((returned, stmt.span.clone()));
            }

            let value = match value {
                Some(value) => Some(self.convert_to_cast_node_if_need(returned, value)?),
                None => None,
            };
            return Some(SemaNode::Return(ReturnNode {
                value,
                span: stmt.span.clone(),
            }));
        };

        let value = match value {
            Some(value) => {
                if !self.is_convertible(expected, &value) {
                    self.error(
                        SemaError::ReturnTypeMismatch {
                            expected: self.type_name(expected),
                            got: self.type_name(value.ty),
                        },
                        &value.span,
                    );
                    return None;
                }
                Some(self.convert_to_cast_node_if_need(expected, value)?)
            }
            None if !self.is_void(expected) => {
                self.error(
                    SemaError::ReturnTypeMismatch {
                        expected: self.type_name(expected),
                        got: String::from("void"),
                    },
                    &stmt.span,
                );
                return None;
            }
            None => None,
        };

        Some(SemaNode::Return(ReturnNode {
            value,
            span: stmt.span.clone(),
        }))
    }
}
