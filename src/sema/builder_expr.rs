use tracing::trace;

use crate::{
    ast::{
        ast::Expr,
        expressions::{
            BinaryExpr, CallExpr, DesignatedInitializersExpr, IdExpr, InitializerListExpr,
            MemberAccessExpr, MemberCallExpr, TernaryExpr, UnaryExpr,
        },
    },
    errors::errors::SemaError,
    Span,
};

use super::{
    builder::SemaBuilder,
    context::ContextKind,
    functions::FunctionId,
    generic_type_factory::{GenericFamily, GenericTypeFactory},
    handlers::AddSubdirectoryResult,
    overload_resolution::OverloadResolution,
    sema_nodes::{ExprKind, ExprNode, UnresolvedInitializer},
    types::TypeId,
};

const ADD_SUBDIRECTORY: &str = "add_subdirectory";
const ADD_DECLARATIVE_FILE: &str = "add_declarative_file";

impl<'a> SemaBuilder<'a> {
    pub(super) fn build_expr(&mut self, expr: &Expr) -> Option<ExprNode> {
        match expr {
            Expr::Bool(e) => Some(ExprNode::new(
                ExprKind::BoolValue(e.value),
                self.builtins.bool,
                e.span.clone(),
            )),
            Expr::Int(e) => Some(ExprNode::new(
                ExprKind::IntValue(e.value),
                self.builtins.int,
                e.span.clone(),
            )),
            Expr::Double(e) => Some(ExprNode::new(
                ExprKind::DoubleValue(e.value),
                self.builtins.double,
                e.span.clone(),
            )),
            Expr::String(e) => Some(ExprNode::new(
                ExprKind::StringValue(e.value.clone()),
                self.builtins.string,
                e.span.clone(),
            )),
            Expr::Id(e) => self.build_id(e),
            Expr::Binary(e) => self.build_binary(e),
            Expr::Unary(e) => self.build_unary(e),
            Expr::Ternary(e) => self.build_ternary(e),
            Expr::MemberAccess(e) => self.build_member_access(e),
            Expr::Call(e) => self.build_call(e),
            Expr::MemberCall(e) => self.build_member_call(e),
            Expr::InitializerList(e) => self.build_initializer_list(e),
            Expr::DesignatedInitializers(e) => self.build_designated_initializers(e),
        }
    }

    fn build_id(&mut self, expr: &IdExpr) -> Option<ExprNode> {
        let names = expr.qualified_names();

        if let Some(info) = self.contexts.ids.find(&names) {
            return Some(ExprNode::new(
                ExprKind::Id {
                    index: info.index,
                    name: expr.full_name(),
                },
                info.ty,
                expr.span.clone(),
            ));
        }

        if let Some(info) = self.contexts.enums.find(&names) {
            return Some(ExprNode::new(
                ExprKind::EnumConstant { value: info.value },
                info.ty,
                expr.span.clone(),
            ));
        }

        self.error(
            SemaError::IdentifierNotFound {
                name: expr.full_name(),
            },
            &expr.span,
        );
        None
    }

    fn build_args(&mut self, args: &[Expr]) -> Option<Vec<ExprNode>> {
        args.iter().map(|arg| self.build_expr(arg)).collect()
    }

    /// Picks the overload for `args` among `lookup`.
    fn choose_function(
        &self,
        lookup: &[Vec<FunctionId>],
        args: &[ExprNode],
        name: &str,
        span: &Span,
    ) -> Option<FunctionId> {
        OverloadResolution::new(self.registry, self.errs, name, span).choose(lookup, args)
    }

    /// Casts every argument to the type of its parameter.
    fn convert_args(&mut self, function: FunctionId, args: Vec<ExprNode>) -> Option<Vec<ExprNode>> {
        let params: Vec<TypeId> = self
            .registry
            .function(function)
            .params()
            .iter()
            .map(|p| p.ty)
            .collect();

        params
            .into_iter()
            .zip(args)
            .map(|(param, arg)| self.convert_to_cast_node_if_need(param, arg))
            .collect()
    }

    /// The return type of a resolved call. Functions returning `auto` can
    /// only be called once their body has been built.
    pub(super) fn function_return_type(&self, function: FunctionId, span: &Span) -> Option<TypeId> {
        if let Some(ty) = self.registry.function(function).return_type {
            return Some(ty);
        }

        if self.function_stack.iter().any(|s| s.function == function) {
            self.error(SemaError::RecursiveAutoCall, span);
        } else {
            self.error(SemaError::AutoUsedBeforeDefinition, span);
        }
        None
    }

    fn build_binary(&mut self, expr: &BinaryExpr) -> Option<ExprNode> {
        let lhs = self.build_expr(&expr.lhs)?;
        let rhs = self.build_expr(&expr.rhs)?;
        let op = expr.operator.value.clone();

        let lookup = self.registry.find_member_functions(lhs.ty, &op);
        if lookup.is_empty() {
            self.error(
                SemaError::OperatorNotSupported {
                    ty: self.type_name(lhs.ty),
                    op,
                },
                &expr.operator.span,
            );
            return None;
        }

        let args = vec![rhs];
        let function = self.choose_function(&lookup, &args, &op, &expr.span)?;
        let ty = self.function_return_type(function, &expr.span)?;
        let rhs = self.convert_args(function, args)?.pop()?;

        Some(ExprNode::new(
            ExprKind::BinaryOperator {
                lhs: Box::new(lhs),
                op,
                function,
                rhs: Box::new(rhs),
            },
            ty,
            expr.span.clone(),
        ))
    }

    fn build_unary(&mut self, expr: &UnaryExpr) -> Option<ExprNode> {
        let operand = self.build_expr(&expr.expr)?;
        let op = expr.operator.value.clone();

        let lookup: Vec<Vec<FunctionId>> = self
            .registry
            .find_member_functions(operand.ty, &op)
            .into_iter()
            .map(|scope| {
                scope
                    .into_iter()
                    .filter(|f| self.registry.function(*f).params().is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|scope| !scope.is_empty())
            .collect();

        if lookup.is_empty() {
            self.error(
                SemaError::OperatorNotSupported {
                    ty: self.type_name(operand.ty),
                    op,
                },
                &expr.operator.span,
            );
            return None;
        }

        let function = self.choose_function(&lookup, &[], &op, &expr.span)?;
        let ty = self.function_return_type(function, &expr.span)?;

        Some(ExprNode::new(
            ExprKind::UnaryOperator {
                op,
                function,
                expr: Box::new(operand),
            },
            ty,
            expr.span.clone(),
        ))
    }

    fn build_ternary(&mut self, expr: &TernaryExpr) -> Option<ExprNode> {
        let condition = self.build_expr(&expr.condition)?;
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
        let condition = self.convert_to_cast_node_if_need(bool, condition)?;

        let true_value = self.build_expr(&expr.true_value)?;
        let false_value = self.build_expr(&expr.false_value)?;

        let (true_value, false_value) = if self.registry.same_type(true_value.ty, false_value.ty) {
            (true_value, false_value)
        } else {
            let decayed = self.registry.decayed(true_value.ty);
            if !self
                .registry
                .same_type(decayed, self.registry.decayed(false_value.ty))
            {
                self.error(
                    SemaError::IncompatibleOperands {
                        lhs: self.type_name(true_value.ty),
                        rhs: self.type_name(false_value.ty),
                    },
                    &expr.span,
                );
                return None;
            }
            (
                self.convert_to_cast_node_if_need(decayed, true_value)?,
                self.convert_to_cast_node_if_need(decayed, false_value)?,
            )
        };

        let ty = true_value.ty;
        Some(ExprNode::new(
            ExprKind::Ternary {
                condition: Box::new(condition),
                true_value: Box::new(true_value),
                false_value: Box::new(false_value),
            },
            ty,
            expr.span.clone(),
        ))
    }

    fn build_member_access(&mut self, expr: &MemberAccessExpr) -> Option<ExprNode> {
        let lhs = self.build_expr(&expr.lhs)?;

        let Some(member) = self.registry.find_member(lhs.ty, &expr.member.value) else {
            self.error(
                SemaError::MemberNotFound {
                    ty: self.type_name(lhs.ty),
                    member: expr.member.value.clone(),
                },
                &expr.member.span,
            );
            return None;
        };

        Some(ExprNode::new(
            ExprKind::ClassMemberAccess {
                lhs: Box::new(lhs),
                member: member.name,
                member_index: member.index,
            },
            member.ty,
            expr.span.clone(),
        ))
    }

    fn build_member_call(&mut self, expr: &MemberCallExpr) -> Option<ExprNode> {
        let lhs = self.build_expr(&expr.lhs)?;
        let name = &expr.name.value;

        let lookup = self.registry.find_member_functions(lhs.ty, name);
        if lookup.is_empty() {
            self.error(
                SemaError::MemberFunctionNotFound {
                    ty: self.type_name(lhs.ty),
                    function: name.clone(),
                },
                &expr.name.span,
            );
            return None;
        }

        let args = self.build_args(&expr.args)?;
        let function = self.choose_function(&lookup, &args, name, &expr.span)?;
        let ty = self.function_return_type(function, &expr.span)?;
        let args = self.convert_args(function, args)?;

        Some(ExprNode::new(
            ExprKind::MemberFunctionCall {
                lhs: Box::new(lhs),
                function,
                args,
            },
            ty,
            expr.span.clone(),
        ))
    }

    fn build_call(&mut self, expr: &CallExpr) -> Option<ExprNode> {
        let callee = &expr.callee;

        if callee.names.len() == 1 && !callee.is_generic() {
            match callee.primary_name() {
                ADD_SUBDIRECTORY => return self.build_add_subdirectory(expr),
                ADD_DECLARATIVE_FILE => return self.build_add_declarative_file(expr),
                _ => {}
            }
        }

        if callee.is_generic() {
            let ty = self.resolve_type(&callee.without_reference())?;
            return self.build_constructor_call(ty, expr);
        }

        if let Some(ty) = self.contexts.types.find(&callee.qualified_names()) {
            return self.build_constructor_call(ty, expr);
        }

        self.build_function_call(expr)
    }

    fn build_constructor_call(&mut self, ty: TypeId, expr: &CallExpr) -> Option<ExprNode> {
        let ty = self.registry.decayed(ty);
        let name = self.registry.ty(ty).primary_name.clone();
        let args = self.build_args(&expr.args)?;

        let lookup = self.registry.find_member_functions(ty, &name);
        if lookup.is_empty() {
            if self.registry.ty(ty).is_class() && args.is_empty() {
                return Some(ExprNode::new(
                    ExprKind::ConstructorCall {
                        function: None,
                        args,
                    },
                    ty,
                    expr.span.clone(),
                ));
            }

            self.error(
                SemaError::NoMatchingFunction {
                    name: self.type_name(ty),
                },
                &expr.span,
            );
            return None;
        }

        let function = self.choose_function(&lookup, &args, &name, &expr.span)?;
        let args = self.convert_args(function, args)?;

        trace!(ty = %self.type_name(ty), "constructor call");

        Some(ExprNode::new(
            ExprKind::ConstructorCall {
                function: Some(function),
                args,
            },
            ty,
            expr.span.clone(),
        ))
    }

    fn build_function_call(&mut self, expr: &CallExpr) -> Option<ExprNode> {
        let names = expr.callee.qualified_names();
        let full_name = names.join("::");

        let lookup = self.contexts.functions.find_all(&names);
        if lookup.is_empty() {
            self.error(SemaError::FunctionNotFound { name: full_name }, &expr.span);
            return None;
        }

        let args = self.build_args(&expr.args)?;
        let function = self.choose_function(&lookup, &args, &full_name, &expr.span)?;
        let ty = self.function_return_type(function, &expr.span)?;
        let args = self.convert_args(function, args)?;

        let context = self.registry.function(function).context;
        let kind = if self.registry.context(context).kind == ContextKind::Class {
            ExprKind::ImplicitMemberFunctionCall { function, args }
        } else {
            ExprKind::FunctionCall { function, args }
        };

        Some(ExprNode::new(kind, ty, expr.span.clone()))
    }

    /// The directory or file name argument, which must be a string literal.
    fn literal_name_argument(&self, expr: &CallExpr, function: &str) -> Option<String> {
        match expr.args.first() {
            Some(Expr::String(name)) => Some(name.value.clone()),
            _ => {
                self.error(
                    SemaError::ExpectedDirectoryName {
                        function: String::from(function),
                    },
                    &expr.span,
                );
                None
            }
        }
    }

    fn build_add_subdirectory(&mut self, expr: &CallExpr) -> Option<ExprNode> {
        let dir_name = self.literal_name_argument(expr, ADD_SUBDIRECTORY)?;
        let args = self.build_args(&expr.args[1..])?;

        let result =
            self.handlers
                .handle_add_subdirectory(self.registry, &dir_name, &expr.span);

        match result {
            AddSubdirectoryResult::ContainsScript { main } => {
                let function = self.choose_function(&[vec![main]], &args, "main", &expr.span)?;
                let ty = self.function_return_type(function, &expr.span)?;
                let args = self.convert_args(function, args)?;

                Some(ExprNode::new(
                    ExprKind::AddSubdirectory {
                        dir_name,
                        function,
                        args,
                    },
                    ty,
                    expr.span.clone(),
                ))
            }
            AddSubdirectoryResult::ContainsDeclarativeScript { creation } => {
                let ty = self.function_return_type(creation, &expr.span)?;
                Some(ExprNode::new(
                    ExprKind::AddSubdirectoryWithDeclarativeScript {
                        dir_name,
                        function: creation,
                    },
                    ty,
                    expr.span.clone(),
                ))
            }
            AddSubdirectoryResult::ContainsOldScript => Some(ExprNode::new(
                ExprKind::AddSubdirectoryWithOldScript { dir_name },
                self.builtins.void,
                expr.span.clone(),
            )),
            AddSubdirectoryResult::Failed => {
                self.error(SemaError::AddSubdirectoryFailed { name: dir_name }, &expr.span);
                None
            }
        }
    }

    fn build_add_declarative_file(&mut self, expr: &CallExpr) -> Option<ExprNode> {
        let file_name = self.literal_name_argument(expr, ADD_DECLARATIVE_FILE)?;

        let Some(function) =
            self.handlers
                .handle_add_declarative_file(self.registry, &file_name, &expr.span)
        else {
            self.error(
                SemaError::AddDeclarativeFileFailed { name: file_name },
                &expr.span,
            );
            return None;
        };

        let ty = self.function_return_type(function, &expr.span)?;
        Some(ExprNode::new(
            ExprKind::AddDeclarativeFile {
                file_name,
                function,
            },
            ty,
            expr.span.clone(),
        ))
    }

    fn build_initializer_list(&mut self, expr: &InitializerListExpr) -> Option<ExprNode> {
        let values = self.build_args(&expr.values)?;

        let Some(first) = values.first() else {
            self.error(SemaError::EmptyInitializerList, &expr.span);
            return None;
        };

        let value_type = self.registry.decayed(first.ty);
        let homogeneous = values.iter().all(|v| {
            self.registry
                .same_type(self.registry.decayed(v.ty), value_type)
        });
        if !homogeneous {
            self.error(SemaError::InitializerListTypeMismatch, &expr.span);
            return None;
        }

        let list = GenericTypeFactory::new(self.registry, &self.builtins)
            .create_homogeneous_generic(GenericFamily::List, value_type);

        let values = values
            .into_iter()
            .map(|v| self.convert_to_cast_node_if_need(value_type, v))
            .collect::<Option<Vec<_>>>()?;

        Some(ExprNode::new(
            ExprKind::InitializerList(values),
            list,
            expr.span.clone(),
        ))
    }

    fn build_designated_initializers(&mut self, expr: &DesignatedInitializersExpr) -> Option<ExprNode> {
        let mut initializers = vec![];
        for initializer in &expr.initializers {
            let value = self.build_expr(&initializer.value)?;
            initializers.push(UnresolvedInitializer {
                name: initializer.name.value.clone(),
                value,
                span: initializer.name.span.clone(),
            });
        }

        Some(ExprNode::new(
            ExprKind::UnresolvedDesignatedInitializers(initializers),
            self.builtins.designated_initializer,
            expr.span.clone(),
        ))
    }
}
