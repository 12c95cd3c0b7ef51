//! Error types and error reporting.
//!
//! - `errors` holds the syntax error (`Error`/`ErrorImpl`) raised by the
//!   lexers and parsers, and `SemaError`, the catalogue of semantic messages
//! - `diagnostics` turns both into severity tagged `Diagnostic`s delivered to
//!   an `ErrorsObserver`

pub mod diagnostics;
pub mod errors;

#[cfg(test)]
mod tests;
