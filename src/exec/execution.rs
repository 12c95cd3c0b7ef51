//! The tree-walking interpreter.
//!
//! Every step returns `Option`: `None` means the facade reported a fatal
//! error and whatever is running has to stop. Scopes and call frames are
//! torn down by guards, so they are left on every path out.

use std::{
    collections::HashMap,
    ops::{Deref, DerefMut},
};

use tracing::{debug, trace};

use crate::sema::{
    builtin_context::BuiltinTypes,
    functions::{FunctionBody, FunctionId, SemaFunction},
    registry::Registry,
    sema_nodes::{
        BlockNode, ForNode, IfElseNode, SemaNode, TranslationUnitNode, VariableDeclarationNode,
        WhileNode,
    },
    types::TypeId,
};

use super::{
    builtin_function_caller::BuiltinFunctionCaller,
    declarative_creator::DeclarativeCreator,
    execution_context::CallFrame,
    facade::CmakeFacade,
    instance::{create_default, Instance},
};

pub struct Execution<'a> {
    pub(super) facade: &'a mut dyn CmakeFacade,
    pub(super) registry: &'a Registry,
    pub(super) builtins: BuiltinTypes,
    pub(super) callstack: Vec<CallFrame>,
    /// Globals of the unit being run
    global_variables: HashMap<u32, Instance>,
    /// Globals of imported and subdirectory units
    static_variables: HashMap<u32, Instance>,
    pub(super) function_return_value: Option<Instance>,
    pub(super) breaking: bool,
    max_call_depth: usize,
}

/// Leaves the innermost variable scope when dropped.
pub(super) struct ScopeGuard<'e, 'a> {
    execution: &'e mut Execution<'a>,
}

impl<'a> Deref for ScopeGuard<'_, 'a> {
    type Target = Execution<'a>;

    fn deref(&self) -> &Self::Target {
        self.execution
    }
}

impl DerefMut for ScopeGuard<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.execution
    }
}

impl Drop for ScopeGuard<'_, '_> {
    fn drop(&mut self) {
        if let Some(frame) = self.execution.callstack.last_mut() {
            frame.leave_scope();
        }
    }
}

/// Pops the call frame when dropped.
struct FrameGuard<'e, 'a> {
    execution: &'e mut Execution<'a>,
}

impl<'a> Deref for FrameGuard<'_, 'a> {
    type Target = Execution<'a>;

    fn deref(&self) -> &Self::Target {
        self.execution
    }
}

impl DerefMut for FrameGuard<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.execution
    }
}

impl Drop for FrameGuard<'_, '_> {
    fn drop(&mut self) {
        self.execution.callstack.pop();
    }
}

impl<'a> Execution<'a> {
    pub fn new(
        facade: &'a mut dyn CmakeFacade,
        registry: &'a Registry,
        builtins: BuiltinTypes,
        max_call_depth: usize,
    ) -> Self {
        Execution {
            facade,
            registry,
            builtins,
            callstack: vec![],
            global_variables: HashMap::new(),
            static_variables: HashMap::new(),
            function_return_value: None,
            breaking: false,
            max_call_depth,
        }
    }

    pub fn fatal_error_occurred(&self) -> bool {
        self.facade.did_fatal_error_occur()
    }

    pub(super) fn fatal(&mut self, message: &str) {
        debug!(message, "runtime fault");
        self.facade.fatal_error(message);
    }

    /// Initialises the globals of the unit about to run, in declaration
    /// order.
    pub fn initialize_globals(&mut self, unit: &TranslationUnitNode) -> Option<()> {
        for decl in unit.global_variables() {
            let value = self.initial_value(decl)?;
            self.global_variables.insert(decl.index, value);
        }
        Some(())
    }

    /// Initialises the globals of an imported or subdirectory unit.
    pub fn initialize_statics(&mut self, unit: &TranslationUnitNode) -> Option<()> {
        trace!(file = %unit.file, "initializing statics");
        for decl in unit.global_variables() {
            let value = self.initial_value(decl)?;
            self.static_variables.insert(decl.index, value);
        }
        Some(())
    }

    fn initial_value(&mut self, decl: &VariableDeclarationNode) -> Option<Instance> {
        let value = match &decl.initialization {
            Some(init) => self.evaluate(init)?,
            None => create_default(self.registry, decl.ty),
        };
        Some(self.bind(decl.ty, value))
    }

    /// Locals, then parameters and members of `this`, then globals and
    /// statics.
    pub(super) fn lookup(&self, index: u32) -> Option<Instance> {
        self.callstack
            .last()
            .and_then(|frame| frame.lookup(index))
            .or_else(|| self.global_variables.get(&index).cloned())
            .or_else(|| self.static_variables.get(&index).cloned())
    }

    /// Storage for a value of type `ty`: references alias, anything else owns
    /// its object.
    pub(super) fn bind(&self, ty: TypeId, instance: Instance) -> Instance {
        if self.registry.ty(ty).is_reference() {
            instance.alias()
        } else {
            instance.into_owned()
        }
    }

    pub(super) fn scope(&mut self) -> ScopeGuard<'_, 'a> {
        if let Some(frame) = self.callstack.last_mut() {
            frame.enter_scope();
        }
        ScopeGuard { execution: self }
    }

    pub fn call(&mut self, function: FunctionId, args: Vec<Instance>) -> Option<Instance> {
        self.call_function(function, None, args)
    }

    pub fn call_member(
        &mut self,
        this: Instance,
        function: FunctionId,
        args: Vec<Instance>,
    ) -> Option<Instance> {
        self.call_function(function, Some(this), args)
    }

    fn call_function(
        &mut self,
        id: FunctionId,
        this: Option<Instance>,
        args: Vec<Instance>,
    ) -> Option<Instance> {
        let registry = self.registry;
        let function = registry.function(id);
        let return_type = function.return_type.unwrap_or(self.builtins.void);

        let result = match &function.body {
            FunctionBody::Builtin(kind) => {
                BuiltinFunctionCaller::new(&mut *self.facade, registry, self.builtins)
                    .call(*kind, this, args, return_type)
            }
            FunctionBody::ComponentCreation(component) => {
                Some(DeclarativeCreator::new(&mut *self.facade, self.builtins).create(component))
            }
            FunctionBody::User(Some(body)) => {
                self.call_user_function(id, function, body, this, args)
            }
            FunctionBody::User(None) => {
                self.fatal(&format!("function '{}' has no body", function.name()));
                None
            }
        };

        if self.facade.did_fatal_error_occur() {
            return None;
        }
        result
    }

    fn call_user_function(
        &mut self,
        id: FunctionId,
        function: &SemaFunction,
        body: &BlockNode,
        this: Option<Instance>,
        args: Vec<Instance>,
    ) -> Option<Instance> {
        if self.callstack.len() >= self.max_call_depth {
            self.fatal("maximum call depth exceeded");
            return None;
        }

        trace!(function = %function.name(), depth = self.callstack.len(), "call");

        let parameters = function
            .params()
            .iter()
            .zip(args)
            .map(|(param, arg)| (param.index, self.bind(param.ty, arg)))
            .collect();
        self.callstack.push(CallFrame::new(id, parameters, this));

        let mut frame = FrameGuard { execution: self };
        let executed = frame.execute_block(body);
        let returned = frame.function_return_value.take();
        drop(frame);
        executed?;

        let return_type = function.return_type.unwrap_or(self.builtins.void);
        let value = returned.unwrap_or_else(|| Instance::void(self.builtins.void));
        Some(self.bind(return_type, value))
    }

    /// Runs the statements of a block in a new scope, stopping at a
    /// `return`, a `break` or a fatal error.
    pub fn execute_block(&mut self, block: &BlockNode) -> Option<()> {
        let mut scope = self.scope();

        for node in &block.nodes {
            scope.execute_node(node)?;
            if scope.function_return_value.is_some() || scope.breaking {
                break;
            }
        }

        Some(())
    }

    fn execute_node(&mut self, node: &SemaNode) -> Option<()> {
        match node {
            SemaNode::Expression(expr) => {
                self.evaluate(expr)?;
            }
            SemaNode::VariableDeclaration(decl) => self.execute_variable_declaration(decl)?,
            SemaNode::Return(ret) => {
                let value = match &ret.value {
                    Some(value) => self.evaluate(value)?,
                    None => Instance::void(self.builtins.void),
                };
                self.function_return_value = Some(value);
            }
            SemaNode::ImplicitReturn(_) => {
                self.function_return_value = Some(Instance::void(self.builtins.void));
            }
            SemaNode::IfElse(node) => self.execute_if_else(node)?,
            SemaNode::While(node) => self.execute_while(node)?,
            SemaNode::For(node) => self.execute_for(node)?,
            SemaNode::Break(_) => self.breaking = true,
            SemaNode::Block(block) => self.execute_block(block)?,
            SemaNode::FunctionDefinition(_)
            | SemaNode::Class(_)
            | SemaNode::Enum { .. }
            | SemaNode::Namespace(_)
            | SemaNode::Import { .. } => {}
        }

        Some(())
    }

    fn execute_variable_declaration(&mut self, decl: &VariableDeclarationNode) -> Option<()> {
        let value = self.initial_value(decl)?;

        match self.callstack.last_mut() {
            Some(frame) => frame.add_variable(decl.index, value),
            None => {
                self.global_variables.insert(decl.index, value);
            }
        }

        Some(())
    }

    fn execute_if_else(&mut self, node: &IfElseNode) -> Option<()> {
        for conditional in &node.ifs {
            if self.evaluate(&conditional.condition)?.as_bool() {
                return self.execute_block(&conditional.body);
            }
        }

        match &node.else_body {
            Some(body) => self.execute_block(body),
            None => Some(()),
        }
    }

    /// Whether the loop has to stop after its body ran. A `break` is
    /// consumed here.
    fn loop_exit(&mut self) -> bool {
        if self.breaking {
            self.breaking = false;
            return true;
        }
        self.function_return_value.is_some()
    }

    fn execute_while(&mut self, node: &WhileNode) -> Option<()> {
        while self.evaluate(&node.condition)?.as_bool() {
            self.execute_block(&node.body)?;
            if self.loop_exit() {
                break;
            }
        }

        Some(())
    }

    fn execute_for(&mut self, node: &ForNode) -> Option<()> {
        let mut scope = self.scope();

        if let Some(init) = &node.init {
            scope.execute_node(init)?;
        }

        loop {
            if let Some(condition) = &node.condition {
                if !scope.evaluate(condition)?.as_bool() {
                    break;
                }
            }

            scope.execute_block(&node.body)?;
            if scope.loop_exit() {
                break;
            }

            if let Some(iteration) = &node.iteration {
                scope.evaluate(iteration)?;
            }
        }

        Some(())
    }
}
