use crate::{lexer::tokens::Token, Span};

use super::{ast::Expr, types::TypeRepresentation};

#[derive(Debug, Clone, PartialEq)]
pub struct BoolExpr {
    pub value: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntExpr {
    pub value: i64,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoubleExpr {
    pub value: f64,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringExpr {
    pub value: String,
    pub span: Span,
}

/// Possibly qualified identifier, `x` or `cmake::visibility::public`.
#[derive(Debug, Clone, PartialEq)]
pub struct IdExpr {
    pub names: Vec<Token>,
    pub span: Span,
}

impl IdExpr {
    pub fn qualified_names(&self) -> Vec<String> {
        self.names.iter().map(|t| t.value.clone()).collect()
    }

    pub fn full_name(&self) -> String {
        self.qualified_names().join("::")
    }
}

/// Every infix operator, assignments included.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub lhs: Box<Expr>,
    pub operator: Token,
    pub rhs: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub operator: Token,
    pub expr: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TernaryExpr {
    pub condition: Box<Expr>,
    pub true_value: Box<Expr>,
    pub false_value: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberAccessExpr {
    pub lhs: Box<Expr>,
    pub member: Token,
    pub span: Span,
}

/// Call of a free function or constructor. Generic constructors such as
/// `extern<int>("X")` keep their generic arguments in the callee.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: TypeRepresentation,
    pub args: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberCallExpr {
    pub lhs: Box<Expr>,
    pub name: Token,
    pub args: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitializerListExpr {
    pub values: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesignatedInitializer {
    pub name: Token,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesignatedInitializersExpr {
    pub initializers: Vec<DesignatedInitializer>,
    pub span: Span,
}
