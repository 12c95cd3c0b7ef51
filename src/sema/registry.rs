//! Arena owning every type, function and context created while building.
//!
//! Everything else refers to these entities through the copyable
//! [`TypeId`], [`FunctionId`] and [`ContextId`] handles, so the sema tree,
//! the symbol tables and the interpreter never hold pointers into each other.

use std::collections::HashMap;

use tracing::trace;

use crate::Span;

use super::{
    builtin_function_kind::BuiltinFunctionKind,
    context::{ContextId, ContextKind, SemaContext},
    functions::{FunctionBody, FunctionId, FunctionSignature, ParamDeclaration, SemaFunction},
    types::{MemberInfo, SemaType, TypeId, TypeKind},
};

#[derive(Debug, Default)]
pub struct Registry {
    types: Vec<SemaType>,
    functions: Vec<SemaFunction>,
    contexts: Vec<SemaContext>,
    /// Instantiated generics by full name, `list<int>` is created once
    generic_types: HashMap<String, TypeId>,
    reference_types: HashMap<TypeId, TypeId>,
    next_identifier_index: u32,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ty(&self, id: TypeId) -> &SemaType {
        &self.types[id.0 as usize]
    }

    pub fn ty_mut(&mut self, id: TypeId) -> &mut SemaType {
        &mut self.types[id.0 as usize]
    }

    pub fn function(&self, id: FunctionId) -> &SemaFunction {
        &self.functions[id.0 as usize]
    }

    pub fn function_mut(&mut self, id: FunctionId) -> &mut SemaFunction {
        &mut self.functions[id.0 as usize]
    }

    pub fn context(&self, id: ContextId) -> &SemaContext {
        &self.contexts[id.0 as usize]
    }

    pub fn type_name(&self, id: TypeId) -> &str {
        &self.ty(id).name
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Next identifier index. Indices are never reused.
    pub fn generate_index(&mut self) -> u32 {
        let index = self.next_identifier_index;
        self.next_identifier_index += 1;
        index
    }

    pub fn create_context(
        &mut self,
        kind: ContextKind,
        name: &str,
        parent: Option<ContextId>,
    ) -> ContextId {
        let id = ContextId(self.contexts.len() as u32);
        self.contexts.push(SemaContext::new(kind, name, parent));
        id
    }

    pub fn create_type(&mut self, ty: SemaType) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        trace!(name = %ty.name, id = id.0, "creating type");

        let context = ty.context;
        self.types.push(ty);
        self.contexts[context.0 as usize].types.push(id);
        id
    }

    /// `T&` for `T`, created on first request. A reference to a reference is
    /// the reference itself.
    pub fn create_reference(&mut self, referenced: TypeId) -> TypeId {
        if self.ty(referenced).is_reference() {
            return referenced;
        }

        if let Some(existing) = self.reference_types.get(&referenced) {
            return *existing;
        }

        let base = self.ty(referenced);
        let reference = SemaType {
            name: format!("{}&", base.name),
            primary_name: base.primary_name.clone(),
            kind: TypeKind::Reference { referenced },
            context: base.context,
            members: vec![],
            base: None,
            builtin: base.builtin,
            span: base.span.clone(),
        };

        let id = TypeId(self.types.len() as u32);
        self.types.push(reference);
        self.reference_types.insert(referenced, id);
        id
    }

    pub fn generic_type(&self, name: &str) -> Option<TypeId> {
        self.generic_types.get(name).copied()
    }

    pub fn register_generic_type(&mut self, name: &str, id: TypeId) {
        self.generic_types.insert(String::from(name), id);
    }

    pub fn create_function(&mut self, function: SemaFunction) -> FunctionId {
        let id = FunctionId(self.functions.len() as u32);
        let context = function.context;
        self.functions.push(function);
        self.contexts[context.0 as usize].functions.push(id);
        id
    }

    /// Creates a builtin function with generated parameter names.
    pub fn add_builtin_function(
        &mut self,
        context: ContextId,
        name: &str,
        params: &[TypeId],
        return_type: TypeId,
        kind: BuiltinFunctionKind,
    ) -> FunctionId {
        let params = params
            .iter()
            .enumerate()
            .map(|(i, ty)| ParamDeclaration {
                ty: *ty,
                name: format!("p{}", i),
                index: self.generate_index(),
            })
            .collect();

        self.create_function(SemaFunction {
            signature: FunctionSignature {
                name: String::from(name),
                params,
                span: Span::null(),
            },
            return_type: Some(return_type),
            context,
            body: FunctionBody::Builtin(kind),
        })
    }

    /// The referenced type for references, the type itself otherwise.
    pub fn decayed(&self, id: TypeId) -> TypeId {
        self.ty(id).referenced().unwrap_or(id)
    }

    /// Types are equal when their names are.
    pub fn same_type(&self, a: TypeId, b: TypeId) -> bool {
        a == b || self.ty(a).name == self.ty(b).name
    }

    /// Whether `derived` has `base` somewhere up its base chain.
    pub fn is_derived_from(&self, derived: TypeId, base: TypeId) -> bool {
        let mut current = self.ty(self.decayed(derived)).base;
        let base = self.decayed(base);

        while let Some(ty) = current {
            if self.same_type(ty, base) {
                return true;
            }
            current = self.ty(ty).base;
        }

        false
    }

    /// Member lookup through the base chain.
    pub fn find_member(&self, ty: TypeId, name: &str) -> Option<MemberInfo> {
        let mut current = Some(self.decayed(ty));

        while let Some(ty) = current {
            let sema_type = self.ty(ty);
            if let Some(member) = sema_type.members.iter().find(|m| m.name == name) {
                return Some(member.clone());
            }
            current = sema_type.base;
        }

        None
    }

    /// All members, base members first.
    pub fn all_members(&self, ty: TypeId) -> Vec<MemberInfo> {
        let sema_type = self.ty(self.decayed(ty));
        let mut members = match sema_type.base {
            Some(base) => self.all_members(base),
            None => vec![],
        };
        members.extend(sema_type.members.iter().cloned());
        members
    }

    /// Functions named `name` declared directly in a context.
    pub fn functions_in_context(&self, context: ContextId, name: &str) -> Vec<FunctionId> {
        self.context(context)
            .functions
            .iter()
            .copied()
            .filter(|f| self.function(*f).name() == name)
            .collect()
    }

    /// Member functions named `name`, one lookup scope per type of the base
    /// chain, most derived first.
    pub fn find_member_functions(&self, ty: TypeId, name: &str) -> Vec<Vec<FunctionId>> {
        let mut scopes = vec![];
        let mut current = Some(self.decayed(ty));

        while let Some(ty) = current {
            let sema_type = self.ty(ty);
            let found = self.functions_in_context(sema_type.context, name);
            if !found.is_empty() {
                scopes.push(found);
            }
            current = sema_type.base;
        }

        scopes
    }
}
