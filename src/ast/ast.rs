use crate::Span;

use super::{expressions::*, statements::*};

/// Expression kinds. The set is closed so every consumer matches exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Bool(BoolExpr),
    Int(IntExpr),
    Double(DoubleExpr),
    String(StringExpr),
    Id(IdExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Ternary(TernaryExpr),
    MemberAccess(MemberAccessExpr),
    Call(CallExpr),
    MemberCall(MemberCallExpr),
    InitializerList(InitializerListExpr),
    DesignatedInitializers(DesignatedInitializersExpr),
}

impl Expr {
    pub fn get_span(&self) -> &Span {
        match self {
            Expr::Bool(e) => &e.span,
            Expr::Int(e) => &e.span,
            Expr::Double(e) => &e.span,
            Expr::String(e) => &e.span,
            Expr::Id(e) => &e.span,
            Expr::Binary(e) => &e.span,
            Expr::Unary(e) => &e.span,
            Expr::Ternary(e) => &e.span,
            Expr::MemberAccess(e) => &e.span,
            Expr::Call(e) => &e.span,
            Expr::MemberCall(e) => &e.span,
            Expr::InitializerList(e) => &e.span,
            Expr::DesignatedInitializers(e) => &e.span,
        }
    }
}

/// Statement and declaration kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expression(ExpressionStmt),
    VarDecl(VarDeclStmt),
    Block(BlockStmt),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Break(BreakStmt),
    Return(ReturnStmt),
    FnDecl(FnDeclStmt),
    ClassDecl(ClassDeclStmt),
    EnumDecl(EnumDeclStmt),
    Namespace(NamespaceStmt),
    Import(ImportStmt),
}

impl Stmt {
    pub fn get_span(&self) -> &Span {
        match self {
            Stmt::Expression(s) => &s.span,
            Stmt::VarDecl(s) => &s.span,
            Stmt::Block(s) => &s.span,
            Stmt::If(s) => &s.span,
            Stmt::While(s) => &s.span,
            Stmt::For(s) => &s.span,
            Stmt::Break(s) => &s.span,
            Stmt::Return(s) => &s.span,
            Stmt::FnDecl(s) => &s.span,
            Stmt::ClassDecl(s) => &s.span,
            Stmt::EnumDecl(s) => &s.span,
            Stmt::Namespace(s) => &s.span,
            Stmt::Import(s) => &s.span,
        }
    }
}

/// Root of a parsed source file.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationUnit {
    pub body: Vec<Stmt>,
    pub span: Span,
}
