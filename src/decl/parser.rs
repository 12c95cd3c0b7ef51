//! Parser of declarative files.
//!
//! The grammar is small enough that it reuses the token cursor of the script
//! [`Parser`] without any of its lookup tables.

use std::rc::Rc;

use crate::{
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    parser::parser::Parser,
};

use super::ast::{ComponentNode, PropertyNode, ValueKind, ValueNode};

/// Parses a whole declarative file, which holds exactly one component.
pub fn parse_component(tokens: Vec<Token>, file: Rc<String>) -> Result<ComponentNode, Error> {
    let mut parser = Parser::new(tokens, file);

    let name = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::OpenCurly)?;

    let mut properties = vec![];
    while parser.current_token_kind() != TokenKind::CloseCurly {
        properties.push(parse_property(&mut parser)?);
    }
    parser.expect(TokenKind::CloseCurly)?;

    if parser.has_tokens() {
        return Err(parser.unexpected("expected end of file after the component"));
    }

    Ok(ComponentNode {
        span: parser.span_from(name.span.start.clone()),
        name,
        properties,
    })
}

fn parse_property(parser: &mut Parser) -> Result<PropertyNode, Error> {
    let name = parser.expect(TokenKind::Identifier)?;

    match parser.current_token_kind() {
        TokenKind::Assignment | TokenKind::Colon => {
            parser.advance();
        }
        _ => return Err(parser.unexpected("expected `=` or `:`")),
    }

    let value = parse_value(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(PropertyNode {
        span: parser.span_from(name.span.start.clone()),
        name,
        value,
    })
}

fn parse_value(parser: &mut Parser) -> Result<ValueNode, Error> {
    let token = parser.advance().clone();

    let kind = match token.kind {
        TokenKind::True => ValueKind::Bool(true),
        TokenKind::False => ValueKind::Bool(false),
        TokenKind::Integer => ValueKind::Int(parse_number(&token)?),
        TokenKind::Double => ValueKind::Double(parse_number(&token)?),
        TokenKind::String => ValueKind::String(token.value.clone()),
        TokenKind::OpenBracket => return parse_list(parser, token),
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: token.value,
                    message: String::from("expected a value"),
                },
                token.span.start,
            ))
        }
    };

    Ok(ValueNode {
        kind,
        span: token.span,
    })
}

fn parse_number<T: std::str::FromStr>(token: &Token) -> Result<T, Error> {
    token.value.parse().map_err(|_| {
        Error::new(
            ErrorImpl::NumberParseError {
                token: token.value.clone(),
            },
            token.span.start.clone(),
        )
    })
}

/// `[a, b, c]`, the opening bracket already consumed.
fn parse_list(parser: &mut Parser, open: Token) -> Result<ValueNode, Error> {
    let mut values = vec![];

    if parser.current_token_kind() != TokenKind::CloseBracket {
        values.push(parse_value(parser)?);

        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            if parser.current_token_kind() == TokenKind::CloseBracket {
                break;
            }
            values.push(parse_value(parser)?);
        }
    }

    parser.expect(TokenKind::CloseBracket)?;

    Ok(ValueNode {
        kind: ValueKind::List(values),
        span: parser.span_from(open.span.start),
    })
}
