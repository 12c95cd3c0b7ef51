use std::fmt::Display;

use crate::Span;

use super::context::ContextId;

/// Index of a type inside the [`Registry`](super::registry::Registry) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl Display for TypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Target,
    Library,
    Executable,
}

/// What a type is made of. Drives default construction at runtime and the
/// builtin member functions it gets.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Void,
    Bool,
    Int,
    Double,
    String,
    Version,
    Enum { enumerators: Vec<String> },
    List { value: TypeId },
    Extern { value: TypeId },
    Project,
    Target(TargetKind),
    Class,
    /// Placeholder type of `{.a = 1}` until the target type is known
    DesignatedInitializer,
    Reference { referenced: TypeId },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberInfo {
    pub name: String,
    pub ty: TypeId,
    /// Identifier index, also the slot key inside a complex instance
    pub index: u32,
}

#[derive(Debug, Clone)]
pub struct SemaType {
    /// Full name, e.g. `list<int>`, `cmake::library` or `P&`
    pub name: String,
    pub primary_name: String,
    pub kind: TypeKind,
    /// Context holding the member functions
    pub context: ContextId,
    pub members: Vec<MemberInfo>,
    pub base: Option<TypeId>,
    pub builtin: bool,
    pub span: Span,
}

impl SemaType {
    pub fn is_reference(&self) -> bool {
        matches!(self.kind, TypeKind::Reference { .. })
    }

    pub fn referenced(&self) -> Option<TypeId> {
        match self.kind {
            TypeKind::Reference { referenced } => Some(referenced),
            _ => None,
        }
    }

    pub fn is_designated_initializer(&self) -> bool {
        self.kind == TypeKind::DesignatedInitializer
    }

    pub fn is_class(&self) -> bool {
        self.kind == TypeKind::Class
    }

    pub fn is_void(&self) -> bool {
        self.kind == TypeKind::Void
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.kind, TypeKind::Enum { .. })
    }

    /// Types whose instances hold members keyed by index.
    pub fn is_complex(&self) -> bool {
        !self.members.is_empty() || self.is_class()
    }
}
