//! Declarative component files.
//!
//! A declarative file describes a single library or executable:
//!
//! ```text
//! library {
//!     name = "foo";
//!     files = ["foo.cpp", "bar.cpp"];
//!     include_dirs = ["include"];
//! }
//! ```
//!
//! It is parsed, checked against the component schema and compiled into a
//! function that, when executed, registers the target with the build system.

pub mod ast;
pub mod compiler;
pub mod parser;
pub mod sema;

#[cfg(test)]
mod tests;
