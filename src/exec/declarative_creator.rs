use tracing::debug;

use crate::{
    decl::sema::{Component, ComponentKind},
    sema::builtin_context::BuiltinTypes,
};

use super::{
    facade::{CmakeFacade, Visibility},
    instance::{Instance, InstanceValue},
};

/// Turns a checked declarative component into build-system calls and the
/// target instance they create.
pub struct DeclarativeCreator<'e> {
    facade: &'e mut dyn CmakeFacade,
    builtins: BuiltinTypes,
}

impl<'e> DeclarativeCreator<'e> {
    pub fn new(facade: &'e mut dyn CmakeFacade, builtins: BuiltinTypes) -> Self {
        DeclarativeCreator { facade, builtins }
    }

    pub fn create(&mut self, component: &Component) -> Instance {
        let name = component.name();
        let files = component.strings("files");
        debug!(kind = %component.kind, name, "creating component");

        let ty = match component.kind {
            ComponentKind::Library => {
                self.facade.add_library(name, &files);
                self.builtins.library
            }
            ComponentKind::Executable => {
                self.facade.add_executable(name, &files);
                self.builtins.executable
            }
        };

        let include_dirs = component.strings("include_dirs");
        if !include_dirs.is_empty() {
            self.facade
                .target_include_directories(name, Visibility::Private, &include_dirs);
        }

        let definitions = component.strings("compile_definitions");
        if !definitions.is_empty() {
            self.facade
                .target_compile_definitions(name, Visibility::Private, &definitions);
        }

        let options = component.strings("compile_options");
        if !options.is_empty() {
            self.facade
                .target_compile_options(name, Visibility::Private, &options);
        }

        for library in component.strings("link_to") {
            self.facade
                .target_link_library(name, Visibility::Private, &library);
        }

        Instance::new(
            ty,
            InstanceValue::Target {
                name: String::from(name),
            },
        )
    }
}
