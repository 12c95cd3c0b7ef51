//! The typed tree the interpreter walks.
//!
//! Every expression carries its resolved type and every call its resolved
//! function, so nothing is looked up by name at execution time. Nodes keep
//! the span of the syntax they were built from.

use std::rc::Rc;

use crate::Span;

use super::{functions::FunctionId, types::TypeId};

#[derive(Debug, Clone)]
pub struct ExprNode {
    pub kind: ExprKind,
    pub ty: TypeId,
    pub span: Span,
}

impl ExprNode {
    pub fn new(kind: ExprKind, ty: TypeId, span: Span) -> Self {
        ExprNode { kind, ty, span }
    }
}

#[derive(Debug, Clone)]
pub struct UnresolvedInitializer {
    pub name: String,
    pub value: ExprNode,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    BoolValue(bool),
    IntValue(i64),
    DoubleValue(f64),
    StringValue(String),
    EnumConstant {
        value: u32,
    },
    Id {
        index: u32,
        name: String,
    },
    BinaryOperator {
        lhs: Box<ExprNode>,
        op: String,
        function: FunctionId,
        rhs: Box<ExprNode>,
    },
    UnaryOperator {
        op: String,
        function: FunctionId,
        expr: Box<ExprNode>,
    },
    Ternary {
        condition: Box<ExprNode>,
        true_value: Box<ExprNode>,
        false_value: Box<ExprNode>,
    },
    ClassMemberAccess {
        lhs: Box<ExprNode>,
        member: String,
        member_index: u32,
    },
    FunctionCall {
        function: FunctionId,
        args: Vec<ExprNode>,
    },
    MemberFunctionCall {
        lhs: Box<ExprNode>,
        function: FunctionId,
        args: Vec<ExprNode>,
    },
    /// Call of a sibling member function from inside a method body
    ImplicitMemberFunctionCall {
        function: FunctionId,
        args: Vec<ExprNode>,
    },
    /// `None` default-constructs a class without a user constructor
    ConstructorCall {
        function: Option<FunctionId>,
        args: Vec<ExprNode>,
    },
    AddSubdirectory {
        dir_name: String,
        function: FunctionId,
        args: Vec<ExprNode>,
    },
    AddSubdirectoryWithDeclarativeScript {
        dir_name: String,
        function: FunctionId,
    },
    AddSubdirectoryWithOldScript {
        dir_name: String,
    },
    AddDeclarativeFile {
        file_name: String,
        function: FunctionId,
    },
    CastToReference(Box<ExprNode>),
    CastToReferenceToBase(Box<ExprNode>),
    CastToValue(Box<ExprNode>),
    CastToBaseValue(Box<ExprNode>),
    InitializerList(Vec<ExprNode>),
    /// Member index and value, resolved against the node's type
    DesignatedInitializers(Vec<(u32, ExprNode)>),
    UnresolvedDesignatedInitializers(Vec<UnresolvedInitializer>),
}

#[derive(Debug, Clone)]
pub struct BlockNode {
    pub nodes: Vec<SemaNode>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct VariableDeclarationNode {
    pub ty: TypeId,
    pub name: String,
    pub index: u32,
    pub initialization: Option<ExprNode>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ConditionalNode {
    pub condition: ExprNode,
    pub body: BlockNode,
}

#[derive(Debug, Clone)]
pub struct IfElseNode {
    pub ifs: Vec<ConditionalNode>,
    pub else_body: Option<BlockNode>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct WhileNode {
    pub condition: ExprNode,
    pub body: BlockNode,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ForNode {
    pub init: Option<Box<SemaNode>>,
    pub condition: Option<ExprNode>,
    pub iteration: Option<ExprNode>,
    pub body: BlockNode,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ReturnNode {
    pub value: Option<ExprNode>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FunctionDefinitionNode {
    pub function: FunctionId,
    pub body: Rc<BlockNode>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ClassNode {
    pub ty: TypeId,
    pub functions: Vec<FunctionDefinitionNode>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct NamespaceNode {
    pub name: String,
    pub nodes: Vec<SemaNode>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum SemaNode {
    Expression(ExprNode),
    VariableDeclaration(VariableDeclarationNode),
    Return(ReturnNode),
    /// Appended to bodies that do not end with a `return`
    ImplicitReturn(Span),
    IfElse(IfElseNode),
    While(WhileNode),
    For(ForNode),
    Break(Span),
    Block(BlockNode),
    FunctionDefinition(FunctionDefinitionNode),
    Class(ClassNode),
    Enum { ty: TypeId, span: Span },
    Namespace(NamespaceNode),
    Import { path: String, span: Span },
}

#[derive(Debug, Clone)]
pub struct TranslationUnitNode {
    pub file: String,
    pub nodes: Vec<SemaNode>,
    pub span: Span,
}

impl TranslationUnitNode {
    /// Global variable declarations in source order, namespaces included.
    pub fn global_variables(&self) -> Vec<&VariableDeclarationNode> {
        fn collect<'n>(nodes: &'n [SemaNode], into: &mut Vec<&'n VariableDeclarationNode>) {
            for node in nodes {
                match node {
                    SemaNode::VariableDeclaration(decl) => into.push(decl),
                    SemaNode::Namespace(ns) => collect(&ns.nodes, into),
                    _ => {}
                }
            }
        }

        let mut variables = vec![];
        collect(&self.nodes, &mut variables);
        variables
    }
}
