use std::collections::HashMap;

use crate::sema::functions::FunctionId;

use super::instance::Instance;

/// Variables of one function call.
#[derive(Debug)]
pub struct CallFrame {
    pub function: FunctionId,
    scopes: Vec<HashMap<u32, Instance>>,
    parameters: HashMap<u32, Instance>,
    this: Option<Instance>,
}

impl CallFrame {
    pub fn new(function: FunctionId, parameters: HashMap<u32, Instance>, this: Option<Instance>) -> Self {
        CallFrame {
            function,
            scopes: vec![],
            parameters,
            this,
        }
    }

    pub fn this(&self) -> Option<&Instance> {
        self.this.as_ref()
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn leave_scope(&mut self) {
        self.scopes.pop();
    }

    pub fn add_variable(&mut self, index: u32, instance: Instance) {
        match self.scopes.last_mut() {
            Some(scope) => {
                scope.insert(index, instance);
            }
            None => {
                self.parameters.insert(index, instance);
            }
        }
    }

    /// Innermost scope first, then the parameters, then members of `this`.
    pub fn lookup(&self, index: u32) -> Option<Instance> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(&index))
            .or_else(|| self.parameters.get(&index))
            .cloned()
            .or_else(|| self.this.as_ref().and_then(|this| this.member(index)))
    }
}
