use std::fmt::Display;

use crate::{lexer::tokens::{Token, TokenKind}, Span};

/// A type as spelled in the source, e.g. `cmake::library`, `list<int>&` or `auto`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRepresentation {
    /// Qualified name segments, `cmake::library` is `[cmake, library]`
    pub names: Vec<Token>,
    pub generics: Vec<TypeRepresentation>,
    pub is_reference: bool,
    pub span: Span,
}

impl TypeRepresentation {
    pub fn is_auto(&self) -> bool {
        self.names.len() == 1 && self.names[0].kind == TokenKind::Auto
    }

    pub fn is_generic(&self) -> bool {
        !self.generics.is_empty()
    }

    /// The last name segment.
    pub fn primary_name(&self) -> &str {
        self.names.last().map(|t| t.str()).unwrap_or("")
    }

    pub fn qualified_names(&self) -> Vec<String> {
        self.names.iter().map(|t| t.value.clone()).collect()
    }

    /// Same type without the trailing `&`.
    pub fn without_reference(&self) -> TypeRepresentation {
        TypeRepresentation {
            is_reference: false,
            ..self.clone()
        }
    }
}

impl Display for TypeRepresentation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.qualified_names().join("::"))?;

        if self.is_generic() {
            let generics = self
                .generics
                .iter()
                .map(|g| g.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, "<{}>", generics)?;
        }

        if self.is_reference {
            write!(f, "&")?;
        }

        Ok(())
    }
}
