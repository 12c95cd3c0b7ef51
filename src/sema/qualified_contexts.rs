//! Scoped symbol tables with namespace support.
//!
//! A [`QualifiedContext`] is a tree of scopes. Named (global) scopes are
//! namespaces, classes and enums; they are children of their parent by name,
//! so entering the same namespace twice lands in the same scope and a
//! qualified name `a::b::c` is resolved by walking the named children.
//! Anonymous (local) scopes are blocks and are dropped when left.
//!
//! [`QualifiedContexts`] keeps the four tables the builder needs in step.

use indexmap::IndexMap;

use super::{
    functions::FunctionId,
    registry::Registry,
    types::TypeId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdInfo {
    pub ty: TypeId,
    pub index: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumValueInfo {
    pub ty: TypeId,
    pub value: u32,
    pub index: u32,
}

/// What to do with an imported entry whose name already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeDecision {
    Add,
    Skip,
    Conflict,
}

#[derive(Debug, Clone)]
struct Entry<T> {
    name: String,
    value: T,
    exported: bool,
}

#[derive(Debug, Clone)]
struct Scope<T> {
    name: Option<String>,
    exported: bool,
    parent: Option<usize>,
    children: IndexMap<String, usize>,
    entries: Vec<Entry<T>>,
}

impl<T> Scope<T> {
    fn new(name: Option<String>, exported: bool, parent: Option<usize>) -> Self {
        Scope {
            name,
            exported,
            parent,
            children: IndexMap::new(),
            entries: vec![],
        }
    }
}

#[derive(Debug, Clone)]
pub struct QualifiedContext<T> {
    scopes: Vec<Scope<T>>,
    current: usize,
}

impl<T: Clone> Default for QualifiedContext<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> QualifiedContext<T> {
    pub fn new() -> Self {
        QualifiedContext {
            scopes: vec![Scope::new(None, true, None)],
            current: 0,
        }
    }

    /// Enters the named child scope of the current scope, creating it on
    /// first use.
    pub fn enter_global_ctx(&mut self, name: &str, exported: bool) {
        if let Some(child) = self.scopes[self.current].children.get(name).copied() {
            self.scopes[child].exported |= exported;
            self.current = child;
            return;
        }

        let child = self.scopes.len();
        self.scopes
            .push(Scope::new(Some(String::from(name)), exported, Some(self.current)));
        self.scopes[self.current]
            .children
            .insert(String::from(name), child);
        self.current = child;
    }

    pub fn enter_local_ctx(&mut self) {
        let child = self.scopes.len();
        self.scopes.push(Scope::new(None, false, Some(self.current)));
        self.current = child;
    }

    pub fn leave_ctx(&mut self) {
        let left = self.current;
        let Some(parent) = self.scopes[left].parent else {
            return;
        };

        self.current = parent;

        // Anonymous scopes are always the most recently created ones
        if self.scopes[left].name.is_none() && left == self.scopes.len() - 1 {
            self.scopes.pop();
        }
    }

    pub fn register(&mut self, name: &str, value: T, exported: bool) {
        self.scopes[self.current].entries.push(Entry {
            name: String::from(name),
            value,
            exported,
        });
    }

    /// True at the root or inside a namespace, false inside any block.
    pub fn is_in_global_ctx(&self) -> bool {
        let mut scope = Some(self.current);
        while let Some(index) = scope {
            if index != 0 && self.scopes[index].name.is_none() {
                return false;
            }
            scope = self.scopes[index].parent;
        }
        true
    }

    pub fn find_in_current_scope(&self, name: &str) -> Option<T> {
        self.find_all_in_current_scope(name).into_iter().next()
    }

    pub fn find_all_in_current_scope(&self, name: &str) -> Vec<T> {
        self.scopes[self.current]
            .entries
            .iter()
            .filter(|e| e.name == name)
            .map(|e| e.value.clone())
            .collect()
    }

    /// Walks from `scope` through the named children in `path`.
    fn navigate(&self, scope: usize, path: &[String]) -> Option<usize> {
        path.iter().try_fold(scope, |scope, name| {
            self.scopes[scope].children.get(name).copied()
        })
    }

    fn matching_in(&self, scope: usize, names: &[String]) -> Vec<T> {
        let Some((last, path)) = names.split_last() else {
            return vec![];
        };

        match self.navigate(scope, path) {
            Some(scope) => self.scopes[scope]
                .entries
                .iter()
                .filter(|e| &e.name == last)
                .map(|e| e.value.clone())
                .collect(),
            None => vec![],
        }
    }

    /// Looks `names` up from the current scope outwards. The innermost match
    /// wins; inside one scope the latest registration wins.
    pub fn find(&self, names: &[String]) -> Option<T> {
        let mut scope = Some(self.current);

        while let Some(index) = scope {
            if let Some(found) = self.matching_in(index, names).pop() {
                return Some(found);
            }
            scope = self.scopes[index].parent;
        }

        None
    }

    /// Every match for `names`, one group per scope, innermost first.
    pub fn find_all(&self, names: &[String]) -> Vec<Vec<T>> {
        let mut result = vec![];
        let mut scope = Some(self.current);

        while let Some(index) = scope {
            let found = self.matching_in(index, names);
            if !found.is_empty() {
                result.push(found);
            }
            scope = self.scopes[index].parent;
        }

        result
    }

    /// A new context holding only the exported entries of this one, with the
    /// named scopes leading to them.
    pub fn collect_exported_stuff(&self) -> QualifiedContext<T> {
        let mut exported = QualifiedContext::new();
        self.collect_scope(0, &mut exported);
        exported
    }

    fn collect_scope(&self, scope: usize, into: &mut QualifiedContext<T>) {
        for entry in self.scopes[scope].entries.iter().filter(|e| e.exported) {
            into.register(&entry.name, entry.value.clone(), true);
        }

        for (name, child) in &self.scopes[scope].children {
            if !self.has_exported_content(*child) {
                continue;
            }
            into.enter_global_ctx(name, true);
            self.collect_scope(*child, into);
            into.leave_ctx();
        }
    }

    fn has_exported_content(&self, scope: usize) -> bool {
        let scope = &self.scopes[scope];
        scope.exported
            || scope.entries.iter().any(|e| e.exported)
            || scope
                .children
                .values()
                .any(|child| self.has_exported_content(*child))
    }

    /// Merges the root of `other` into the root of this context. Imported
    /// entries are not re-exported. Returns the name of the first conflicting
    /// entry.
    pub fn merge_imported_stuff<F>(&mut self, other: &QualifiedContext<T>, decide: F) -> Result<(), String>
    where
        F: Fn(&T, &T) -> MergeDecision,
    {
        self.merge_scope(0, other, 0, &decide)
    }

    fn merge_scope<F>(
        &mut self,
        scope: usize,
        other: &QualifiedContext<T>,
        other_scope: usize,
        decide: &F,
    ) -> Result<(), String>
    where
        F: Fn(&T, &T) -> MergeDecision,
    {
        for entry in &other.scopes[other_scope].entries {
            let mut add = true;

            for existing in self.scopes[scope].entries.iter().filter(|e| e.name == entry.name) {
                match decide(&existing.value, &entry.value) {
                    MergeDecision::Add => {}
                    MergeDecision::Skip => add = false,
                    MergeDecision::Conflict => return Err(entry.name.clone()),
                }
            }

            if add {
                self.scopes[scope].entries.push(Entry {
                    name: entry.name.clone(),
                    value: entry.value.clone(),
                    exported: false,
                });
            }
        }

        for (name, other_child) in &other.scopes[other_scope].children {
            let saved = self.current;
            self.current = scope;
            self.enter_global_ctx(name, false);
            let child = self.current;
            self.current = saved;

            self.merge_scope(child, other, *other_child, decide)?;
        }

        Ok(())
    }
}

/// The four symbol tables of one translation unit.
#[derive(Debug, Clone, Default)]
pub struct QualifiedContexts {
    pub types: QualifiedContext<TypeId>,
    pub functions: QualifiedContext<FunctionId>,
    pub ids: QualifiedContext<IdInfo>,
    pub enums: QualifiedContext<EnumValueInfo>,
}

impl QualifiedContexts {
    pub fn enter_global_ctx(&mut self, name: &str, exported: bool) {
        self.types.enter_global_ctx(name, exported);
        self.functions.enter_global_ctx(name, exported);
        self.ids.enter_global_ctx(name, exported);
        self.enums.enter_global_ctx(name, exported);
    }

    pub fn enter_local_ctx(&mut self) {
        self.types.enter_local_ctx();
        self.functions.enter_local_ctx();
        self.ids.enter_local_ctx();
        self.enums.enter_local_ctx();
    }

    pub fn leave_ctx(&mut self) {
        self.types.leave_ctx();
        self.functions.leave_ctx();
        self.ids.leave_ctx();
        self.enums.leave_ctx();
    }

    pub fn collect_exported_stuff(&self) -> QualifiedContexts {
        QualifiedContexts {
            types: self.types.collect_exported_stuff(),
            functions: self.functions.collect_exported_stuff(),
            ids: self.ids.collect_exported_stuff(),
            enums: self.enums.collect_exported_stuff(),
        }
    }

    /// Merges an imported module's exports. Re-imports of the very same
    /// entity are skipped, a different entity under a taken name is a
    /// conflict, except for function overloads with different parameters.
    pub fn merge_imported_stuff(
        &mut self,
        imported: &QualifiedContexts,
        registry: &Registry,
    ) -> Result<(), String> {
        self.types.merge_imported_stuff(&imported.types, |existing, new| {
            if existing == new {
                MergeDecision::Skip
            } else {
                MergeDecision::Conflict
            }
        })?;

        self.functions
            .merge_imported_stuff(&imported.functions, |existing, new| {
                if existing == new {
                    return MergeDecision::Skip;
                }

                let existing = registry.function(*existing).params();
                let new = registry.function(*new).params();
                let same_params = existing.len() == new.len()
                    && existing
                        .iter()
                        .zip(new)
                        .all(|(a, b)| registry.same_type(a.ty, b.ty));

                if same_params {
                    MergeDecision::Conflict
                } else {
                    MergeDecision::Add
                }
            })?;

        self.ids.merge_imported_stuff(&imported.ids, |existing, new| {
            if existing.index == new.index {
                MergeDecision::Skip
            } else {
                MergeDecision::Conflict
            }
        })?;

        self.enums.merge_imported_stuff(&imported.enums, |existing, new| {
            if existing.index == new.index {
                MergeDecision::Skip
            } else {
                MergeDecision::Conflict
            }
        })
    }
}
