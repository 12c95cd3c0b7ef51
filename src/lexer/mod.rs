//! Lexical analysis.
//!
//! Converts source text into a stream of tokens. It handles:
//!
//! - Tokenization using an ordered table of anchored regex patterns
//! - Recognition of keywords, identifiers, literals, and operators
//! - Token position tracking for error reporting
//! - Comments and whitespace handling
//!
//! The same lexer feeds both the script parser and the declarative parser.

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
