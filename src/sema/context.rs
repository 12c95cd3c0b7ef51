use super::{functions::FunctionId, types::TypeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    Namespace,
    Class,
    Enum,
}

/// A namespace, class or enum scope. Owns the ids of the functions and types
/// declared directly inside it.
#[derive(Debug, Clone)]
pub struct SemaContext {
    pub kind: ContextKind,
    pub name: String,
    pub parent: Option<ContextId>,
    pub functions: Vec<FunctionId>,
    pub types: Vec<TypeId>,
}

impl SemaContext {
    pub fn new(kind: ContextKind, name: &str, parent: Option<ContextId>) -> Self {
        SemaContext {
            kind,
            name: String::from(name),
            parent,
            functions: vec![],
            types: vec![],
        }
    }
}
