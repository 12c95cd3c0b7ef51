use std::rc::Rc;

use tracing::debug;

use crate::{
    errors::diagnostics::{Diagnostic, ErrorsObserver},
    lexer::lexer::tokenize,
    sema::{
        builtin_context::BuiltinTypes,
        functions::{FunctionBody, FunctionId, FunctionSignature, SemaFunction},
        registry::Registry,
    },
};

use super::{
    parser::parse_component,
    sema::{check_component, Component, ComponentKind},
};

/// Name of the synthesized function that creates a component's target.
pub const COMPONENT_CREATION_FUNCTION: &str = "__create_component";

/// Compiles a declarative source into a parameterless function returning
/// the library or executable it describes.
pub fn compile_declarative_source(
    source: String,
    file: &str,
    registry: &mut Registry,
    builtins: &BuiltinTypes,
    errs: &dyn ErrorsObserver,
) -> Option<FunctionId> {
    let parsed = tokenize(source, Some(String::from(file)))
        .and_then(|tokens| parse_component(tokens, Rc::new(String::from(file))));

    let node = match parsed {
        Ok(node) => node,
        Err(error) => {
            errs.notify_error(Diagnostic::from(&error));
            return None;
        }
    };

    let component = check_component(&node, errs)?;
    debug!(file = %file, name = %component.name(), "compiled declarative file");

    Some(create_component_function(registry, builtins, component))
}

pub fn create_component_function(
    registry: &mut Registry,
    builtins: &BuiltinTypes,
    component: Component,
) -> FunctionId {
    let return_type = match component.kind {
        ComponentKind::Library => builtins.library,
        ComponentKind::Executable => builtins.executable,
    };

    registry.create_function(SemaFunction {
        signature: FunctionSignature {
            name: String::from(COMPONENT_CREATION_FUNCTION),
            params: vec![],
            span: component.span.clone(),
        },
        return_type: Some(return_type),
        context: builtins.global_context,
        body: FunctionBody::ComponentCreation(Rc::new(component)),
    })
}
