use tracing::trace;

use crate::sema::sema_nodes::{ExprKind, ExprNode};

use super::{
    execution::Execution,
    instance::{create_default, Instance, InstanceValue},
};

impl Execution<'_> {
    /// Evaluates an expression, `None` once a fatal error was reported.
    pub fn evaluate(&mut self, expr: &ExprNode) -> Option<Instance> {
        let result = self.evaluate_kind(expr);
        if self.facade.did_fatal_error_occur() {
            return None;
        }
        result
    }

    fn evaluate_args(&mut self, args: &[ExprNode]) -> Option<Vec<Instance>> {
        args.iter().map(|arg| self.evaluate(arg)).collect()
    }

    fn evaluate_kind(&mut self, expr: &ExprNode) -> Option<Instance> {
        let registry = self.registry;

        match &expr.kind {
            ExprKind::BoolValue(value) => Some(Instance::new(expr.ty, InstanceValue::Bool(*value))),
            ExprKind::IntValue(value) => Some(Instance::new(expr.ty, InstanceValue::Int(*value))),
            ExprKind::DoubleValue(value) => {
                Some(Instance::new(expr.ty, InstanceValue::Double(*value)))
            }
            ExprKind::StringValue(value) => {
                Some(Instance::new(expr.ty, InstanceValue::String(value.clone())))
            }
            ExprKind::EnumConstant { value } => {
                Some(Instance::new(expr.ty, InstanceValue::EnumConstant(*value)))
            }
            ExprKind::Id { index, name } => match self.lookup(*index) {
                Some(instance) => Some(instance.alias()),
                None => {
                    self.fatal(&format!("'{}' is used before it was initialized", name));
                    None
                }
            },
            ExprKind::BinaryOperator {
                lhs, function, rhs, ..
            } => {
                let lhs = self.evaluate(lhs)?;
                let rhs = self.evaluate(rhs)?;
                self.call_member(lhs, *function, vec![rhs])
            }
            ExprKind::UnaryOperator { function, expr, .. } => {
                let operand = self.evaluate(expr)?;
                self.call_member(operand, *function, vec![])
            }
            ExprKind::Ternary {
                condition,
                true_value,
                false_value,
            } => {
                if self.evaluate(condition)?.as_bool() {
                    self.evaluate(true_value)
                } else {
                    self.evaluate(false_value)
                }
            }
            ExprKind::ClassMemberAccess {
                lhs,
                member,
                member_index,
            } => {
                let lhs = self.evaluate(lhs)?;
                match lhs.member(*member_index) {
                    Some(value) => Some(value.alias()),
                    None => {
                        self.fatal(&format!("instance has no member '{}'", member));
                        None
                    }
                }
            }
            ExprKind::FunctionCall { function, args } => {
                let args = self.evaluate_args(args)?;
                self.call(*function, args)
            }
            ExprKind::MemberFunctionCall {
                lhs,
                function,
                args,
            } => {
                let this = self.evaluate(lhs)?;
                let args = self.evaluate_args(args)?;
                self.call_member(this, *function, args)
            }
            ExprKind::ImplicitMemberFunctionCall { function, args } => {
                let this = self
                    .callstack
                    .last()
                    .and_then(|frame| frame.this().map(Instance::alias));
                let Some(this) = this else {
                    self.fatal("member function called without an instance");
                    return None;
                };
                let args = self.evaluate_args(args)?;
                self.call_member(this, *function, args)
            }
            ExprKind::ConstructorCall { function, args } => {
                let args = self.evaluate_args(args)?;
                match function {
                    None => Some(create_default(registry, expr.ty)),
                    Some(function) if registry.function(*function).is_builtin() => {
                        self.call(*function, args)
                    }
                    Some(function) => {
                        let instance = create_default(registry, expr.ty);
                        self.call_member(instance.alias(), *function, args)?;
                        Some(instance)
                    }
                }
            }
            ExprKind::AddSubdirectory {
                dir_name,
                function,
                args,
            } => {
                let args = self.evaluate_args(args)?;
                trace!(dir = %dir_name, "entering subdirectory script");

                self.facade.prepare_for_add_subdirectory_with_script(dir_name);
                let result = self.call(*function, args);
                self.facade.finalize_after_add_subdirectory_with_script();
                result
            }
            ExprKind::AddSubdirectoryWithDeclarativeScript { dir_name, function } => {
                self.facade.go_into_subdirectory(dir_name);
                let result = self.call(*function, vec![]);
                self.facade.go_directory_up();
                result
            }
            ExprKind::AddSubdirectoryWithOldScript { dir_name } => {
                self.facade.add_subdirectory_with_old_script(dir_name);
                Some(Instance::void(expr.ty))
            }
            ExprKind::AddDeclarativeFile { function, .. } => self.call(*function, vec![]),
            ExprKind::CastToReference(inner) => Some(self.evaluate(inner)?.alias()),
            ExprKind::CastToReferenceToBase(inner) => {
                let base = registry.decayed(expr.ty);
                Some(self.evaluate(inner)?.alias_as(base))
            }
            ExprKind::CastToValue(inner) => {
                let value = self.evaluate(inner)?;
                let copy = match &value {
                    Instance::Reference {
                        base: Some(base), ..
                    } => value.sliced_copy(registry, *base),
                    _ => value.deep_copy(),
                };
                Some(copy)
            }
            ExprKind::CastToBaseValue(inner) => {
                let base = registry.decayed(expr.ty);
                Some(self.evaluate(inner)?.sliced_copy(registry, base))
            }
            ExprKind::InitializerList(values) => {
                let values = self
                    .evaluate_args(values)?
                    .into_iter()
                    .map(Instance::into_owned)
                    .collect();
                Some(Instance::new(expr.ty, InstanceValue::List(values)))
            }
            ExprKind::DesignatedInitializers(initializers) => {
                let instance = create_default(registry, expr.ty);
                for (index, value) in initializers {
                    let value = self.evaluate(value)?.into_owned();
                    instance.set_member(*index, value);
                }
                Some(instance)
            }
            ExprKind::UnresolvedDesignatedInitializers(_) => {
                self.fatal("designated initializers without a target type");
                None
            }
        }
    }
}
