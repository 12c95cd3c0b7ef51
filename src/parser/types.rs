//! Type parsing implementation.
//!
//! This module handles parsing of type annotations. It supports:
//!
//! - Qualified names (`cmake::library`)
//! - Generic instantiations (`list<list<string>>`, `extern<int>`)
//! - `auto`
//! - References (`int&`)
//!
//! Similar to expression parsing, it uses NUD/LED handlers with
//! binding powers.

use std::collections::HashMap;

use crate::{
    ast::types::TypeRepresentation,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser};

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<TypeRepresentation, Error>;

/// Type alias for type left denotation handler functions.
pub type TypeLEDHandler =
    fn(&mut Parser, TypeRepresentation, BindingPower) -> Result<TypeRepresentation, Error>;

/// Type alias for type NUD lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Type alias for type LED lookup table.
pub type TypeLEDLookup = HashMap<TokenKind, TypeLEDHandler>;

/// Type alias for type binding power lookup table.
pub type TypeBPLookup = HashMap<TokenKind, BindingPower>;

/// Initializes the type parsing lookup tables.
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Identifier, parse_symbol_type);
    parser.type_nud(TokenKind::Auto, parse_auto_type);
    parser.type_led(TokenKind::Amp, BindingPower::Call, parse_reference_type);
}

pub fn parse_symbol_type(parser: &mut Parser) -> Result<TypeRepresentation, Error> {
    let first = parser.expect(TokenKind::Identifier)?;
    let start = first.span.start.clone();
    let mut names = vec![first];

    while parser.current_token_kind() == TokenKind::ColonColon
        && parser.peek_kind(1) == TokenKind::Identifier
    {
        parser.advance();
        names.push(parser.advance().clone());
    }

    let generics = if parser.current_token_kind() == TokenKind::Less {
        parse_generic_arguments(parser)?
    } else {
        vec![]
    };

    Ok(TypeRepresentation {
        names,
        generics,
        is_reference: false,
        span: parser.span_from(start),
    })
}

pub fn parse_auto_type(parser: &mut Parser) -> Result<TypeRepresentation, Error> {
    let token = parser.expect(TokenKind::Auto)?;

    Ok(TypeRepresentation {
        span: token.span.clone(),
        names: vec![token],
        generics: vec![],
        is_reference: false,
    })
}

/// Parses `<T, U, ...>`.
pub fn parse_generic_arguments(parser: &mut Parser) -> Result<Vec<TypeRepresentation>, Error> {
    parser.expect(TokenKind::Less)?;

    let mut generics = vec![parse_type(parser, BindingPower::Default)?];
    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        generics.push(parse_type(parser, BindingPower::Default)?);
    }

    parser.expect(TokenKind::Greater)?;
    Ok(generics)
}

pub fn parse_reference_type(
    parser: &mut Parser,
    left: TypeRepresentation,
    _bp: BindingPower,
) -> Result<TypeRepresentation, Error> {
    let amp = parser.expect(TokenKind::Amp)?;

    if left.is_reference {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: amp.value,
                message: String::from("reference to reference is not allowed"),
            },
            amp.span.start,
        ));
    }

    Ok(TypeRepresentation {
        is_reference: true,
        span: left.span.to(&amp.span),
        ..left
    })
}

pub fn parse_type(parser: &mut Parser, bp: BindingPower) -> Result<TypeRepresentation, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_type_nud_lookup().get(&token_kind).copied() else {
        return Err(parser.unexpected("expected a type"));
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    while let Some(next_bp) = parser
        .get_type_bp_lookup()
        .get(&parser.current_token_kind())
        .copied()
    {
        if next_bp <= bp {
            break;
        }

        let token_kind = parser.current_token_kind();
        let Some(led) = parser.get_type_led_lookup().get(&token_kind).copied() else {
            return Err(parser.unexpected("unexpected token in type"));
        };

        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}
