//! Runtime values.
//!
//! An [`Instance`] is either an owned object or a reference to an object
//! owned elsewhere. Both share the object through `Rc<RefCell<_>>`, so a
//! reference stays valid for as long as anything uses it and writes through
//! it are visible to the owner.

use std::{
    cell::{Ref, RefCell, RefMut},
    collections::BTreeMap,
    fmt::Display,
    rc::Rc,
};

use crate::sema::{
    registry::Registry,
    types::{TypeId, TypeKind},
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: i64,
    pub minor: i64,
    pub patch: i64,
    pub tweak: i64,
}

impl Version {
    pub fn new(major: i64, minor: i64, patch: i64, tweak: i64) -> Self {
        Version {
            major,
            minor,
            patch,
            tweak,
        }
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.patch, self.tweak
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InstanceValue {
    Void,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    Version(Version),
    EnumConstant(u32),
    List(Vec<Instance>),
    Extern(Option<Instance>),
    Project { name: String },
    Target { name: String },
    /// Members of a class instance, keyed by identifier index
    Complex(BTreeMap<u32, Instance>),
}

impl InstanceValue {
    /// Copy that shares no object with `self`.
    pub fn deep_copy(&self) -> InstanceValue {
        match self {
            InstanceValue::List(values) => {
                InstanceValue::List(values.iter().map(Instance::deep_copy).collect())
            }
            InstanceValue::Extern(value) => {
                InstanceValue::Extern(value.as_ref().map(Instance::deep_copy))
            }
            InstanceValue::Complex(members) => InstanceValue::Complex(
                members
                    .iter()
                    .map(|(index, member)| (*index, member.deep_copy()))
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub ty: TypeId,
    pub value: InstanceValue,
}

#[derive(Debug, Clone)]
pub enum Instance {
    Owned(Rc<RefCell<Object>>),
    /// Alias of an object. `base` is set when the alias views a derived
    /// object through one of its base types.
    Reference {
        target: Rc<RefCell<Object>>,
        base: Option<TypeId>,
    },
}

impl PartialEq for Instance {
    /// Instances compare by value.
    fn eq(&self, other: &Self) -> bool {
        *self.object() == *other.object()
    }
}

impl Instance {
    pub fn new(ty: TypeId, value: InstanceValue) -> Self {
        Instance::Owned(Rc::new(RefCell::new(Object { ty, value })))
    }

    pub fn void(ty: TypeId) -> Self {
        Instance::new(ty, InstanceValue::Void)
    }

    fn cell(&self) -> &Rc<RefCell<Object>> {
        match self {
            Instance::Owned(target) | Instance::Reference { target, .. } => target,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Instance::Reference { .. })
    }

    /// Type the instance is seen as.
    pub fn ty(&self) -> TypeId {
        match self {
            Instance::Reference {
                base: Some(base), ..
            } => *base,
            _ => self.object().ty,
        }
    }

    pub fn object(&self) -> Ref<'_, Object> {
        self.cell().borrow()
    }

    pub fn object_mut(&self) -> RefMut<'_, Object> {
        self.cell().borrow_mut()
    }

    pub fn value(&self) -> InstanceValue {
        self.object().value.clone()
    }

    pub fn set_value(&self, value: InstanceValue) {
        self.object_mut().value = value;
    }

    /// A reference to the same object.
    pub fn alias(&self) -> Instance {
        match self {
            Instance::Owned(target) => Instance::Reference {
                target: Rc::clone(target),
                base: None,
            },
            reference => reference.clone(),
        }
    }

    /// A reference viewing the same object as `base`.
    pub fn alias_as(&self, base: TypeId) -> Instance {
        Instance::Reference {
            target: Rc::clone(self.cell()),
            base: Some(base),
        }
    }

    pub fn deep_copy(&self) -> Instance {
        let object = self.object();
        Instance::new(object.ty, object.value.deep_copy())
    }

    /// Owned instances are kept, references are copied.
    pub fn into_owned(self) -> Instance {
        match self {
            Instance::Owned(_) => self,
            reference => reference.deep_copy(),
        }
    }

    /// Copy of the part of a derived object that belongs to `base`.
    pub fn sliced_copy(&self, registry: &Registry, base: TypeId) -> Instance {
        let object = self.object();
        let value = match &object.value {
            InstanceValue::Complex(members) => {
                let kept = registry
                    .all_members(base)
                    .iter()
                    .filter_map(|m| members.get(&m.index).map(|v| (m.index, v.deep_copy())))
                    .collect();
                InstanceValue::Complex(kept)
            }
            other => other.deep_copy(),
        };

        Instance::new(base, value)
    }

    pub fn as_bool(&self) -> bool {
        match self.object().value {
            InstanceValue::Bool(value) => value,
            InstanceValue::Int(value) => value != 0,
            _ => false,
        }
    }

    pub fn as_int(&self) -> i64 {
        match self.object().value {
            InstanceValue::Int(value) => value,
            InstanceValue::Bool(value) => value as i64,
            InstanceValue::Double(value) => value as i64,
            InstanceValue::EnumConstant(value) => value as i64,
            _ => 0,
        }
    }

    pub fn as_double(&self) -> f64 {
        match self.object().value {
            InstanceValue::Double(value) => value,
            InstanceValue::Int(value) => value as f64,
            _ => 0.0,
        }
    }

    pub fn as_string(&self) -> String {
        match &self.object().value {
            InstanceValue::String(value) => value.clone(),
            InstanceValue::Project { name } | InstanceValue::Target { name } => name.clone(),
            _ => String::new(),
        }
    }

    pub fn as_version(&self) -> Version {
        match self.object().value {
            InstanceValue::Version(value) => value,
            _ => Version::default(),
        }
    }

    pub fn as_enum(&self) -> u32 {
        match self.object().value {
            InstanceValue::EnumConstant(value) => value,
            _ => 0,
        }
    }

    /// Elements of a list, sharing objects with it.
    pub fn as_list(&self) -> Vec<Instance> {
        match &self.object().value {
            InstanceValue::List(values) => values.clone(),
            _ => vec![],
        }
    }

    /// Elements of a `list<string>`.
    pub fn as_strings(&self) -> Vec<String> {
        self.as_list().iter().map(Instance::as_string).collect()
    }

    pub fn member(&self, index: u32) -> Option<Instance> {
        match &self.object().value {
            InstanceValue::Complex(members) => members.get(&index).cloned(),
            _ => None,
        }
    }

    pub fn set_member(&self, index: u32, value: Instance) {
        if let InstanceValue::Complex(members) = &mut self.object_mut().value {
            members.insert(index, value);
        }
    }
}

/// Default-initialised instance of `ty`: zero, empty or recursively
/// defaulted members.
pub fn create_default(registry: &Registry, ty: TypeId) -> Instance {
    let ty = registry.decayed(ty);

    let value = match &registry.ty(ty).kind {
        TypeKind::Void | TypeKind::DesignatedInitializer => InstanceValue::Void,
        TypeKind::Bool => InstanceValue::Bool(false),
        TypeKind::Int => InstanceValue::Int(0),
        TypeKind::Double => InstanceValue::Double(0.0),
        TypeKind::String => InstanceValue::String(String::new()),
        TypeKind::Version => InstanceValue::Version(Version::default()),
        TypeKind::Enum { .. } => InstanceValue::EnumConstant(0),
        TypeKind::List { .. } => InstanceValue::List(vec![]),
        TypeKind::Extern { .. } => InstanceValue::Extern(None),
        TypeKind::Project => InstanceValue::Project {
            name: String::new(),
        },
        TypeKind::Target(_) => InstanceValue::Target {
            name: String::new(),
        },
        TypeKind::Class => InstanceValue::Complex(
            registry
                .all_members(ty)
                .iter()
                .map(|m| (m.index, create_default(registry, m.ty)))
                .collect(),
        ),
        TypeKind::Reference { .. } => InstanceValue::Void,
    };

    Instance::new(ty, value)
}
