use std::rc::Rc;

use crate::{decl::sema::Component, Span};

use super::{
    builtin_function_kind::BuiltinFunctionKind, context::ContextId, sema_nodes::BlockNode,
    types::TypeId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionId(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub struct ParamDeclaration {
    pub ty: TypeId,
    pub name: String,
    pub index: u32,
}

#[derive(Debug, Clone)]
pub struct FunctionSignature {
    pub name: String,
    pub params: Vec<ParamDeclaration>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum FunctionBody {
    /// Filled once the body has been analysed, so the function can be
    /// referenced from inside itself.
    User(Option<Rc<BlockNode>>),
    Builtin(BuiltinFunctionKind),
    ComponentCreation(Rc<Component>),
}

#[derive(Debug, Clone)]
pub struct SemaFunction {
    pub signature: FunctionSignature,
    /// `None` while an `auto` return type is being deduced
    pub return_type: Option<TypeId>,
    pub context: ContextId,
    pub body: FunctionBody,
}

impl SemaFunction {
    pub fn name(&self) -> &str {
        &self.signature.name
    }

    pub fn params(&self) -> &[ParamDeclaration] {
        &self.signature.params
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.body, FunctionBody::Builtin(_))
    }
}
