//! Human readable dump of a sema tree, one node per line.
//!
//! ```text
//! translation_unit main.cmsl
//!   variable_declaration int& r
//!     cast_to_reference int&
//!       id x: int
//! ```

use std::fmt::Write;

use super::{
    functions::FunctionId,
    registry::Registry,
    sema_nodes::{BlockNode, ExprKind, ExprNode, SemaNode, TranslationUnitNode},
    types::TypeId,
};

pub fn dump(registry: &Registry, unit: &TranslationUnitNode) -> String {
    let mut dumper = Dumper {
        registry,
        out: String::new(),
        depth: 0,
    };

    dumper.line(format_args!("translation_unit {}", unit.file));
    dumper.nested(|d| {
        for node in &unit.nodes {
            d.node(node);
        }
    });
    dumper.out
}

struct Dumper<'a> {
    registry: &'a Registry,
    out: String,
    depth: usize,
}

impl<'a> Dumper<'a> {
    fn line(&mut self, text: std::fmt::Arguments) {
        let _ = writeln!(self.out, "{:indent$}{}", "", text, indent = self.depth * 2);
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.depth += 1;
        f(self);
        self.depth -= 1;
    }

    fn type_name(&self, ty: TypeId) -> &'a str {
        self.registry.type_name(ty)
    }

    fn function_name(&self, function: FunctionId) -> &'a str {
        self.registry.function(function).name()
    }

    fn block(&mut self, name: &str, block: &BlockNode) {
        self.line(format_args!("{}", name));
        self.nested(|d| {
            for node in &block.nodes {
                d.node(node);
            }
        });
    }

    fn node(&mut self, node: &SemaNode) {
        match node {
            SemaNode::Expression(expr) => self.expr(expr),
            SemaNode::VariableDeclaration(decl) => {
                self.line(format_args!(
                    "variable_declaration {} {}",
                    self.type_name(decl.ty),
                    decl.name
                ));
                if let Some(init) = &decl.initialization {
                    self.nested(|d| d.expr(init));
                }
            }
            SemaNode::Return(ret) => {
                self.line(format_args!("return"));
                if let Some(value) = &ret.value {
                    self.nested(|d| d.expr(value));
                }
            }
            SemaNode::ImplicitReturn(_) => self.line(format_args!("implicit_return")),
            SemaNode::IfElse(node) => {
                self.line(format_args!("if_else"));
                self.nested(|d| {
                    for conditional in &node.ifs {
                        d.line(format_args!("if"));
                        d.nested(|d| {
                            d.expr(&conditional.condition);
                            d.block("block", &conditional.body);
                        });
                    }
                    if let Some(else_body) = &node.else_body {
                        d.block("else", else_body);
                    }
                });
            }
            SemaNode::While(node) => {
                self.line(format_args!("while"));
                self.nested(|d| {
                    d.expr(&node.condition);
                    d.block("block", &node.body);
                });
            }
            SemaNode::For(node) => {
                self.line(format_args!("for"));
                self.nested(|d| {
                    if let Some(init) = &node.init {
                        d.node(init);
                    }
                    if let Some(condition) = &node.condition {
                        d.expr(condition);
                    }
                    if let Some(iteration) = &node.iteration {
                        d.expr(iteration);
                    }
                    d.block("block", &node.body);
                });
            }
            SemaNode::Break(_) => self.line(format_args!("break")),
            SemaNode::Block(block) => self.block("block", block),
            SemaNode::FunctionDefinition(def) => {
                let registry = self.registry;
                let function = registry.function(def.function);
                let params = function
                    .params()
                    .iter()
                    .map(|p| format!("{} {}", self.type_name(p.ty), p.name))
                    .collect::<Vec<_>>()
                    .join(", ");
                let return_type = function
                    .return_type
                    .map(|ty| self.type_name(ty).to_string())
                    .unwrap_or_else(|| String::from("auto"));

                self.line(format_args!(
                    "function {} {}({})",
                    return_type,
                    function.name(),
                    params
                ));
                self.nested(|d| {
                    for node in &def.body.nodes {
                        d.node(node);
                    }
                });
            }
            SemaNode::Class(class) => {
                let registry = self.registry;
                self.line(format_args!("class {}", registry.ty(class.ty).name));
                self.nested(|d| {
                    for member in &registry.ty(class.ty).members {
                        d.line(format_args!(
                            "member {} {}",
                            d.type_name(member.ty),
                            member.name
                        ));
                    }
                    for function in &class.functions {
                        d.node(&SemaNode::FunctionDefinition(function.clone()));
                    }
                });
            }
            SemaNode::Enum { ty, .. } => {
                self.line(format_args!("enum {}", self.type_name(*ty)))
            }
            SemaNode::Namespace(ns) => {
                self.line(format_args!("namespace {}", ns.name));
                self.nested(|d| {
                    for node in &ns.nodes {
                        d.node(node);
                    }
                });
            }
            SemaNode::Import { path, .. } => self.line(format_args!("import \"{}\"", path)),
        }
    }

    fn expr(&mut self, expr: &ExprNode) {
        let ty = self.type_name(expr.ty);

        match &expr.kind {
            ExprKind::BoolValue(value) => self.line(format_args!("bool_value {}", value)),
            ExprKind::IntValue(value) => self.line(format_args!("int_value {}", value)),
            ExprKind::DoubleValue(value) => self.line(format_args!("double_value {}", value)),
            ExprKind::StringValue(value) => self.line(format_args!("string_value {:?}", value)),
            ExprKind::EnumConstant { value } => {
                self.line(format_args!("enum_constant {} {}", ty, value))
            }
            ExprKind::Id { name, .. } => self.line(format_args!("id {}: {}", name, ty)),
            ExprKind::BinaryOperator { lhs, op, rhs, .. } => {
                self.line(format_args!("binary_operator {}: {}", op, ty));
                self.nested(|d| {
                    d.expr(lhs);
                    d.expr(rhs);
                });
            }
            ExprKind::UnaryOperator { op, expr, .. } => {
                self.line(format_args!("unary_operator {}: {}", op, ty));
                self.nested(|d| d.expr(expr));
            }
            ExprKind::Ternary {
                condition,
                true_value,
                false_value,
            } => {
                self.line(format_args!("ternary: {}", ty));
                self.nested(|d| {
                    d.expr(condition);
                    d.expr(true_value);
                    d.expr(false_value);
                });
            }
            ExprKind::ClassMemberAccess { lhs, member, .. } => {
                self.line(format_args!("member_access {}: {}", member, ty));
                self.nested(|d| d.expr(lhs));
            }
            ExprKind::FunctionCall { function, args } => {
                self.line(format_args!("function_call {}: {}", self.function_name(*function), ty));
                self.nested(|d| args.iter().for_each(|a| d.expr(a)));
            }
            ExprKind::MemberFunctionCall { lhs, function, args } => {
                self.line(format_args!(
                    "member_function_call {}: {}",
                    self.function_name(*function),
                    ty
                ));
                self.nested(|d| {
                    d.expr(lhs);
                    args.iter().for_each(|a| d.expr(a));
                });
            }
            ExprKind::ImplicitMemberFunctionCall { function, args } => {
                self.line(format_args!(
                    "implicit_member_function_call {}: {}",
                    self.function_name(*function),
                    ty
                ));
                self.nested(|d| args.iter().for_each(|a| d.expr(a)));
            }
            ExprKind::ConstructorCall { args, .. } => {
                self.line(format_args!("constructor_call {}", ty));
                self.nested(|d| args.iter().for_each(|a| d.expr(a)));
            }
            ExprKind::AddSubdirectory { dir_name, args, .. } => {
                self.line(format_args!("add_subdirectory \"{}\": {}", dir_name, ty));
                self.nested(|d| args.iter().for_each(|a| d.expr(a)));
            }
            ExprKind::AddSubdirectoryWithDeclarativeScript { dir_name, .. } => self.line(
                format_args!("add_subdirectory_with_declarative_script \"{}\": {}", dir_name, ty),
            ),
            ExprKind::AddSubdirectoryWithOldScript { dir_name } => {
                self.line(format_args!("add_subdirectory_with_old_script \"{}\"", dir_name))
            }
            ExprKind::AddDeclarativeFile { file_name, .. } => {
                self.line(format_args!("add_declarative_file \"{}\": {}", file_name, ty))
            }
            ExprKind::CastToReference(inner) => self.cast("cast_to_reference", ty, inner),
            ExprKind::CastToReferenceToBase(inner) => {
                self.cast("cast_to_reference_to_base", ty, inner)
            }
            ExprKind::CastToValue(inner) => self.cast("cast_to_value", ty, inner),
            ExprKind::CastToBaseValue(inner) => self.cast("cast_to_base_value", ty, inner),
            ExprKind::InitializerList(values) => {
                self.line(format_args!("initializer_list {}", ty));
                self.nested(|d| values.iter().for_each(|v| d.expr(v)));
            }
            ExprKind::DesignatedInitializers(values) => {
                self.line(format_args!("designated_initializers {}", ty));
                self.nested(|d| {
                    for (index, value) in values {
                        d.line(format_args!("member #{}", index));
                        d.nested(|d| d.expr(value));
                    }
                });
            }
            ExprKind::UnresolvedDesignatedInitializers(values) => {
                self.line(format_args!("unresolved_designated_initializers"));
                self.nested(|d| {
                    for initializer in values {
                        d.line(format_args!(".{}", initializer.name));
                        d.nested(|d| d.expr(&initializer.value));
                    }
                });
            }
        }
    }

    fn cast(&mut self, name: &str, ty: &str, inner: &ExprNode) {
        self.line(format_args!("{} {}", name, ty));
        self.nested(|d| d.expr(inner));
    }
}
