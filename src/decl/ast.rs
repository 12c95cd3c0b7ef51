use crate::{lexer::tokens::Token, Span};

#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    List(Vec<ValueNode>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueNode {
    pub kind: ValueKind,
    pub span: Span,
}

/// `name = value;`
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyNode {
    pub name: Token,
    pub value: ValueNode,
    pub span: Span,
}

/// `library { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentNode {
    pub name: Token,
    pub properties: Vec<PropertyNode>,
    pub span: Span,
}
