//! Semantic analysis.
//!
//! Turns the untyped AST into the typed sema tree the interpreter walks:
//!
//! - `registry`: arena of types, functions and contexts, addressed by id
//! - `builtin_context`: builtin types, the `cmake` namespace and their functions
//! - `generic_type_factory`: `list<T>` and `extern<T>` instantiation
//! - `qualified_contexts`: scoped symbol tables for types, functions, ids and enums
//! - `overload_resolution`: picks a function for a call
//! - `builder`: the tree builder, split over the `builder_*` files
//! - `handlers`: callbacks into the module loader (imports, subdirectories)
//! - `dumper`: text rendering of a sema tree

pub mod builder;
mod builder_decl;
mod builder_expr;
mod builder_stmt;
pub mod builtin_context;
pub mod builtin_function_kind;
pub mod context;
pub mod dumper;
pub mod functions;
pub mod generic_type_factory;
pub mod handlers;
pub mod overload_resolution;
pub mod qualified_contexts;
pub mod registry;
pub mod sema_nodes;
pub mod types;

#[cfg(test)]
mod tests;
