//! Checks a parsed component against the schema of its kind.

use std::fmt::Display;

use indexmap::IndexMap;
use tracing::debug;

use crate::{
    errors::{
        diagnostics::{Diagnostic, ErrorsObserver},
        errors::SemaError,
    },
    Span,
};

use super::ast::{ComponentNode, ValueKind, ValueNode};

#[derive(Debug, Clone, PartialEq)]
pub enum DeclValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    List(Vec<DeclValue>),
}

impl DeclValue {
    /// Type name as the script language spells it.
    pub fn type_name(&self) -> String {
        match self {
            DeclValue::Bool(_) => String::from("bool"),
            DeclValue::Int(_) => String::from("int"),
            DeclValue::Double(_) => String::from("double"),
            DeclValue::String(_) => String::from("string"),
            DeclValue::List(values) => match values.first() {
                Some(first) => format!("list<{}>", first.type_name()),
                None => String::from("list<>"),
            },
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DeclValue::String(value) => Some(value),
            _ => None,
        }
    }

    /// The strings of a `list<string>` value, empty for anything else.
    pub fn strings(&self) -> Vec<String> {
        match self {
            DeclValue::List(values) => values
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect(),
            _ => vec![],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Library,
    Executable,
}

impl ComponentKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "library" => Some(ComponentKind::Library),
            "executable" => Some(ComponentKind::Executable),
            _ => None,
        }
    }
}

impl Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentKind::Library => write!(f, "library"),
            ComponentKind::Executable => write!(f, "executable"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PropertyType {
    String,
    StringList,
}

impl PropertyType {
    fn name(&self) -> &'static str {
        match self {
            PropertyType::String => "string",
            PropertyType::StringList => "list<string>",
        }
    }

    fn accepts(&self, value: &DeclValue) -> bool {
        match (self, value) {
            (PropertyType::String, DeclValue::String(_)) => true,
            (PropertyType::StringList, DeclValue::List(values)) => {
                values.iter().all(|v| matches!(v, DeclValue::String(_)))
            }
            _ => false,
        }
    }
}

struct PropertySchema {
    name: &'static str,
    ty: PropertyType,
    required: bool,
}

/// Properties every component kind understands.
const SCHEMA: &[PropertySchema] = &[
    PropertySchema {
        name: "name",
        ty: PropertyType::String,
        required: true,
    },
    PropertySchema {
        name: "files",
        ty: PropertyType::StringList,
        required: true,
    },
    PropertySchema {
        name: "include_dirs",
        ty: PropertyType::StringList,
        required: false,
    },
    PropertySchema {
        name: "compile_definitions",
        ty: PropertyType::StringList,
        required: false,
    },
    PropertySchema {
        name: "compile_options",
        ty: PropertyType::StringList,
        required: false,
    },
    PropertySchema {
        name: "link_to",
        ty: PropertyType::StringList,
        required: false,
    },
];

/// A checked component, ready to be turned into a target at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub kind: ComponentKind,
    /// Properties in declaration order
    pub properties: IndexMap<String, DeclValue>,
    pub span: Span,
}

impl Component {
    pub fn name(&self) -> &str {
        self.properties
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
    }

    pub fn strings(&self, property: &str) -> Vec<String> {
        self.properties
            .get(property)
            .map(|v| v.strings())
            .unwrap_or_default()
    }
}

fn error(errs: &dyn ErrorsObserver, error: SemaError, span: &Span) {
    errs.notify_error(Diagnostic::error(error, span.clone()));
}

fn check_value(node: &ValueNode, errs: &dyn ErrorsObserver) -> Option<DeclValue> {
    let value = match &node.kind {
        ValueKind::Bool(value) => DeclValue::Bool(*value),
        ValueKind::Int(value) => DeclValue::Int(*value),
        ValueKind::Double(value) => DeclValue::Double(*value),
        ValueKind::String(value) => DeclValue::String(value.clone()),
        ValueKind::List(nodes) => {
            let values = nodes
                .iter()
                .map(|n| check_value(n, errs))
                .collect::<Option<Vec<_>>>()?;

            if let Some(first) = values.first() {
                let first = first.type_name();
                if values.iter().any(|v| v.type_name() != first) {
                    error(errs, SemaError::PropertyListTypeMismatch, &node.span);
                    return None;
                }
            }

            DeclValue::List(values)
        }
    };

    Some(value)
}

pub fn check_component(node: &ComponentNode, errs: &dyn ErrorsObserver) -> Option<Component> {
    let component_name = node.name.value.clone();
    let Some(kind) = ComponentKind::from_name(&component_name) else {
        error(
            errs,
            SemaError::UnknownComponent {
                name: component_name,
            },
            &node.name.span,
        );
        return None;
    };

    let mut properties = IndexMap::new();
    for property in &node.properties {
        let name = &property.name.value;
        let Some(schema) = SCHEMA.iter().find(|s| s.name == name) else {
            error(
                errs,
                SemaError::UnknownProperty {
                    component: component_name,
                    property: name.clone(),
                },
                &property.name.span,
            );
            return None;
        };

        let value = check_value(&property.value, errs)?;
        if !schema.ty.accepts(&value) {
            error(
                errs,
                SemaError::PropertyTypeMismatch {
                    property: name.clone(),
                    expected: String::from(schema.ty.name()),
                    got: value.type_name(),
                },
                &property.value.span,
            );
            return None;
        }

        properties.insert(name.clone(), value);
    }

    for schema in SCHEMA.iter().filter(|s| s.required) {
        if !properties.contains_key(schema.name) {
            error(
                errs,
                SemaError::MissingProperty {
                    component: component_name,
                    property: String::from(schema.name),
                },
                &node.span,
            );
            return None;
        }
    }

    debug!(component = %kind, properties = properties.len(), "checked component");

    Some(Component {
        kind,
        properties,
        span: node.span.clone(),
    })
}
