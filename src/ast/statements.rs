use crate::{lexer::tokens::Token, Span};

use super::{
    ast::{Expr, Stmt},
    types::TypeRepresentation,
};

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStmt {
    pub expression: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    pub ty: TypeRepresentation,
    pub name: Token,
    pub initialization: Option<Expr>,
    pub exported: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalBlock {
    pub condition: Expr,
    pub body: BlockStmt,
}

/// `if`, any number of `else if`, optional `else`.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub ifs: Vec<ConditionalBlock>,
    pub else_body: Option<BlockStmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: BlockStmt,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Option<Box<Stmt>>,
    pub condition: Option<Expr>,
    pub iteration: Option<Expr>,
    pub body: BlockStmt,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakStmt {
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamDecl {
    pub ty: TypeRepresentation,
    pub name: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnDeclStmt {
    pub return_type: TypeRepresentation,
    pub name: Token,
    pub params: Vec<ParamDecl>,
    pub body: BlockStmt,
    pub exported: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    Variable(VarDeclStmt),
    Function(FnDeclStmt),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDeclStmt {
    pub name: Token,
    pub base: Option<TypeRepresentation>,
    pub members: Vec<ClassMember>,
    pub exported: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDeclStmt {
    pub name: Token,
    pub enumerators: Vec<Token>,
    pub exported: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceStmt {
    pub names: Vec<Token>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportStmt {
    pub path: Token,
    pub span: Span,
}
