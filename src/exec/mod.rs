//! Execution of sema trees.
//!
//! - `instance`: runtime values and references
//! - `facade`: the build-system interface scripts drive, and a recording implementation
//! - `execution`: the interpreter, with expression evaluation in `expression_evaluator`
//! - `builtin_function_caller`: native semantics of builtin functions
//! - `declarative_creator`: targets out of declarative components
//! - `source_executor`: module loading, compilation and the run entry point

pub mod builtin_function_caller;
pub mod declarative_creator;
pub mod execution;
pub mod execution_context;
mod expression_evaluator;
pub mod facade;
pub mod instance;
pub mod source_executor;

#[cfg(test)]
mod tests;
