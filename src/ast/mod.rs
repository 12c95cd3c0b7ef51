/// AST (Abstract Syntax Tree) module
/// Contains the untyped tree produced by the parser
///
/// Submodules:
/// - ast: The closed `Expr` and `Stmt` enums and the translation unit
/// - expressions: Payloads of the expression variants
/// - statements: Payloads of the statement and declaration variants
/// - types: Type representations as written in the source
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
