//! On demand instantiation of the generic families `list<T>` and `extern<T>`.
//!
//! Instantiations are memoized in the registry by full name, so every
//! `list<int>` in a program is the same [`TypeId`].

use tracing::debug;

use crate::{
    ast::types::TypeRepresentation,
    errors::{
        diagnostics::{Diagnostic, ErrorsObserver},
        errors::SemaError,
    },
};

use super::{
    builtin_context::BuiltinTypes,
    builtin_function_kind::BuiltinFunctionKind as K,
    context::ContextKind,
    qualified_contexts::QualifiedContext,
    registry::Registry,
    types::{SemaType, TypeId, TypeKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenericFamily {
    List,
    Extern,
}

impl GenericFamily {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "list" => Some(GenericFamily::List),
            "extern" => Some(GenericFamily::Extern),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GenericFamily::List => "list",
            GenericFamily::Extern => "extern",
        }
    }
}

pub struct GenericTypeFactory<'a> {
    registry: &'a mut Registry,
    builtins: &'a BuiltinTypes,
}

impl<'a> GenericTypeFactory<'a> {
    pub fn new(registry: &'a mut Registry, builtins: &'a BuiltinTypes) -> Self {
        GenericTypeFactory { registry, builtins }
    }

    /// Resolves a generic type representation such as `list<list<string>>`.
    /// Errors are reported to `errs` and yield `None`.
    pub fn create_generic(
        &mut self,
        repr: &TypeRepresentation,
        types: &QualifiedContext<TypeId>,
        errs: &dyn ErrorsObserver,
    ) -> Option<TypeId> {
        let primary = repr.primary_name();
        let family = match GenericFamily::from_name(primary) {
            Some(family) if repr.names.len() == 1 => family,
            _ => {
                let error = if types.find(&repr.qualified_names()).is_some() {
                    SemaError::NotGeneric {
                        name: repr.qualified_names().join("::"),
                    }
                } else {
                    SemaError::TypeNotFound {
                        name: repr.to_string(),
                    }
                };
                errs.notify_error(Diagnostic::error(error, repr.span.clone()));
                return None;
            }
        };

        if repr.generics.len() != 1 {
            errs.notify_error(Diagnostic::error(
                SemaError::GenericParameterCount {
                    name: String::from(family.name()),
                    got: repr.generics.len(),
                },
                repr.span.clone(),
            ));
            return None;
        }

        let value_repr = &repr.generics[0];
        let value = if value_repr.is_generic() {
            self.create_generic(value_repr, types, errs)?
        } else {
            match types.find(&value_repr.qualified_names()) {
                Some(ty) => ty,
                None => {
                    errs.notify_error(Diagnostic::error(
                        SemaError::ValueTypeNotFound,
                        value_repr.span.clone(),
                    ));
                    return None;
                }
            }
        };

        if family == GenericFamily::Extern && !self.is_extern_value_type(value) {
            errs.notify_error(Diagnostic::error(
                SemaError::WrongExternType {
                    got: self.registry.type_name(value).to_string(),
                },
                value_repr.span.clone(),
            ));
            return None;
        }

        Some(self.create_homogeneous_generic(family, value))
    }

    fn is_extern_value_type(&self, value: TypeId) -> bool {
        let b = self.builtins;
        [b.bool, b.int, b.double, b.string]
            .iter()
            .any(|ty| self.registry.same_type(*ty, value))
    }

    /// `family<value>`, created on first request.
    pub fn create_homogeneous_generic(&mut self, family: GenericFamily, value: TypeId) -> TypeId {
        let value = self.registry.decayed(value);
        let name = format!("{}<{}>", family.name(), self.registry.type_name(value));

        if let Some(existing) = self.registry.generic_type(&name) {
            return existing;
        }

        debug!(name = %name, "instantiating generic type");

        let context = self.registry.create_context(
            ContextKind::Class,
            &name,
            Some(self.builtins.global_context),
        );
        let kind = match family {
            GenericFamily::List => TypeKind::List { value },
            GenericFamily::Extern => TypeKind::Extern { value },
        };
        let ty = self.registry.create_type(SemaType {
            name: name.clone(),
            primary_name: String::from(family.name()),
            kind,
            context,
            members: vec![],
            base: None,
            builtin: true,
            span: crate::Span::null(),
        });
        self.registry.register_generic_type(&name, ty);

        match family {
            GenericFamily::List => self.add_list_functions(ty, value),
            GenericFamily::Extern => self.add_extern_functions(ty, value),
        }

        ty
    }

    fn add_list_functions(&mut self, list: TypeId, value: TypeId) {
        let b = *self.builtins;
        let (void, int, bool) = (b.void, b.int, b.bool);
        let value_ref = self.registry.create_reference(value);
        let list_ref = self.registry.create_reference(list);
        let ctx = self.registry.ty(list).context;
        let r = &mut *self.registry;

        r.add_builtin_function(ctx, "list", &[], list, K::ListCtor);
        r.add_builtin_function(ctx, "push_back", &[value], void, K::ListPushBackValue);
        r.add_builtin_function(ctx, "push_back", &[list], void, K::ListPushBackList);
        r.add_builtin_function(ctx, "push_front", &[value], void, K::ListPushFrontValue);
        r.add_builtin_function(ctx, "push_front", &[list], void, K::ListPushFrontList);
        r.add_builtin_function(ctx, "pop_back", &[], void, K::ListPopBack);
        r.add_builtin_function(ctx, "pop_front", &[], void, K::ListPopFront);
        r.add_builtin_function(ctx, "at", &[int], value_ref, K::ListAt);
        r.add_builtin_function(ctx, "front", &[], value_ref, K::ListFront);
        r.add_builtin_function(ctx, "back", &[], value_ref, K::ListBack);
        r.add_builtin_function(ctx, "insert", &[int, value], void, K::ListInsertPosValue);
        r.add_builtin_function(ctx, "insert", &[int, list], void, K::ListInsertPosList);
        r.add_builtin_function(ctx, "erase", &[int], void, K::ListEraseFrom);
        r.add_builtin_function(ctx, "erase", &[int, int], void, K::ListEraseFromCount);
        r.add_builtin_function(ctx, "remove", &[value], int, K::ListRemoveValue);
        r.add_builtin_function(ctx, "remove", &[value, int], int, K::ListRemoveValueCount);
        r.add_builtin_function(ctx, "remove_last", &[value, int], int, K::ListRemoveLastValueCount);
        r.add_builtin_function(ctx, "clear", &[], void, K::ListClear);
        r.add_builtin_function(ctx, "resize", &[int], void, K::ListResize);
        r.add_builtin_function(ctx, "sort", &[], void, K::ListSort);
        r.add_builtin_function(ctx, "reverse", &[], void, K::ListReverse);
        r.add_builtin_function(ctx, "min", &[], value, K::ListMin);
        r.add_builtin_function(ctx, "max", &[], value, K::ListMax);
        r.add_builtin_function(ctx, "sublist", &[int], list, K::ListSublistFrom);
        r.add_builtin_function(ctx, "sublist", &[int, int], list, K::ListSublistFromCount);
        r.add_builtin_function(ctx, "size", &[], int, K::ListSize);
        r.add_builtin_function(ctx, "empty", &[], bool, K::ListEmpty);
        r.add_builtin_function(ctx, "find", &[value], int, K::ListFindValue);
        r.add_builtin_function(ctx, "find", &[value, int], int, K::ListFindValuePos);
        r.add_builtin_function(ctx, "+", &[value], list, K::ListOperatorPlusValue);
        r.add_builtin_function(ctx, "+", &[list], list, K::ListOperatorPlusList);
        r.add_builtin_function(ctx, "+=", &[value], list_ref, K::ListOperatorPlusEqualValue);
        r.add_builtin_function(ctx, "+=", &[list], list_ref, K::ListOperatorPlusEqualList);
        r.add_builtin_function(ctx, "=", &[list], list_ref, K::ListOperatorEqual);
    }

    fn add_extern_functions(&mut self, ext: TypeId, value: TypeId) {
        let b = *self.builtins;
        let ext_ref = self.registry.create_reference(ext);
        let ctx = self.registry.ty(ext).context;
        let r = &mut *self.registry;

        r.add_builtin_function(ctx, "extern", &[b.string], ext, K::ExternCtorName);
        r.add_builtin_function(ctx, "has_value", &[], b.bool, K::ExternHasValue);
        r.add_builtin_function(ctx, "value", &[], value, K::ExternValue);
        r.add_builtin_function(ctx, "=", &[ext], ext_ref, K::ExternOperatorEqual);
    }
}
