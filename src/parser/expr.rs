use crate::{
    ast::{
        ast::Expr,
        expressions::{
            BinaryExpr, BoolExpr, CallExpr, DesignatedInitializer, DesignatedInitializersExpr,
            DoubleExpr, IdExpr, InitializerListExpr, IntExpr, MemberAccessExpr, MemberCallExpr,
            StringExpr, TernaryExpr, UnaryExpr,
        },
        types::TypeRepresentation,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser, types::parse_generic_arguments};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: parser.current_token().value.clone(),
            },
            parser.get_position(),
        ));
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    while let Some(next_bp) = parser
        .get_bp_lookup()
        .get(&parser.current_token_kind())
        .copied()
    {
        if next_bp <= bp {
            break;
        }

        let token_kind = parser.current_token_kind();
        let Some(led) = parser.get_led_lookup().get(&token_kind).copied() else {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: parser.current_token().value.clone(),
                },
                left.get_span().start.clone(),
            ));
        };

        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance().clone();

    match token.kind {
        TokenKind::Integer => match token.value.parse() {
            Ok(value) => Ok(Expr::Int(IntExpr {
                value,
                span: token.span,
            })),
            Err(_) => Err(Error::new(
                ErrorImpl::NumberParseError { token: token.value },
                token.span.start,
            )),
        },
        TokenKind::Double => match token.value.parse() {
            Ok(value) => Ok(Expr::Double(DoubleExpr {
                value,
                span: token.span,
            })),
            Err(_) => Err(Error::new(
                ErrorImpl::NumberParseError { token: token.value },
                token.span.start,
            )),
        },
        TokenKind::String => Ok(Expr::String(StringExpr {
            value: token.value,
            span: token.span,
        })),
        TokenKind::True | TokenKind::False => Ok(Expr::Bool(BoolExpr {
            value: token.kind == TokenKind::True,
            span: token.span,
        })),
        _ => Err(Error::new(
            ErrorImpl::UnexpectedToken { token: token.value },
            token.span.start,
        )),
    }
}

/// Parses `a`, `a::b::c` and generic constructor calls like `extern<int>("X")`.
pub fn parse_identifier_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let first = parser.expect(TokenKind::Identifier)?;
    let start = first.span.start.clone();
    let mut names = vec![first];

    while parser.current_token_kind() == TokenKind::ColonColon
        && parser.peek_kind(1) == TokenKind::Identifier
    {
        parser.advance();
        names.push(parser.advance().clone());
    }

    if parser.current_token_kind() == TokenKind::Less {
        let checkpoint = parser.checkpoint();

        if let Ok(generics) = parse_generic_arguments(parser) {
            if parser.current_token_kind() == TokenKind::OpenParen {
                let callee = TypeRepresentation {
                    names,
                    generics,
                    is_reference: false,
                    span: parser.span_from(start.clone()),
                };
                let args = parse_call_arguments(parser)?;

                return Ok(Expr::Call(CallExpr {
                    callee,
                    args,
                    span: parser.span_from(start),
                }));
            }
        }

        // Plain `<` comparison
        parser.restore(checkpoint);
    }

    Ok(Expr::Id(IdExpr {
        names,
        span: parser.span_from(start),
    }))
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator = parser.advance().clone();
    let right = parse_expr(parser, bp)?;

    Ok(Expr::Binary(BinaryExpr {
        span: left.get_span().to(right.get_span()),
        lhs: Box::new(left),
        operator,
        rhs: Box::new(right),
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator = parser.advance().clone();
    let rhs = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::Unary(UnaryExpr {
        span: operator.span.to(rhs.get_span()),
        operator,
        expr: Box::new(rhs),
    }))
}

pub fn parse_assignment_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    let operator = parser.advance().clone();
    // One below assignment so `a = b = c` nests to the right
    let rhs = parse_expr(parser, BindingPower::Comma)?;

    Ok(Expr::Binary(BinaryExpr {
        span: left.get_span().to(rhs.get_span()),
        lhs: Box::new(left),
        operator,
        rhs: Box::new(rhs),
    }))
}

pub fn parse_ternary_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.expect(TokenKind::Question)?;
    let true_value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Colon)?;
    let false_value = parse_expr(parser, BindingPower::Assignment)?;

    Ok(Expr::Ternary(TernaryExpr {
        span: left.get_span().to(false_value.get_span()),
        condition: Box::new(left),
        true_value: Box::new(true_value),
        false_value: Box::new(false_value),
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

/// Parses `(a, b, c)`, the opening parenthesis included.
pub fn parse_call_arguments(parser: &mut Parser) -> Result<Vec<Expr>, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut args = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        args.push(parse_expr(parser, BindingPower::Default)?);

        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            args.push(parse_expr(parser, BindingPower::Default)?);
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    Ok(args)
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let Expr::Id(id) = left else {
        return Err(parser.unexpected("only named functions can be called"));
    };

    let args = parse_call_arguments(parser)?;
    let span = parser.span_from(id.span.start.clone());

    Ok(Expr::Call(CallExpr {
        callee: TypeRepresentation {
            names: id.names,
            generics: vec![],
            is_reference: false,
            span: id.span,
        },
        args,
        span,
    }))
}

pub fn parse_member_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.expect(TokenKind::Dot)?;
    let name = parser.expect(TokenKind::Identifier)?;
    let start = left.get_span().start.clone();

    if parser.current_token_kind() == TokenKind::OpenParen {
        let args = parse_call_arguments(parser)?;

        return Ok(Expr::MemberCall(MemberCallExpr {
            lhs: Box::new(left),
            name,
            args,
            span: parser.span_from(start),
        }));
    }

    Ok(Expr::MemberAccess(MemberAccessExpr {
        span: parser.span_from(start),
        lhs: Box::new(left),
        member: name,
    }))
}

/// Parses `{1, 2, 3}`, `{.a = 1, .b = 2}` and `{a: 1, b: 2}`.
pub fn parse_brace_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?.span.start;

    let designated = parser.current_token_kind() == TokenKind::Dot
        || (parser.current_token_kind() == TokenKind::Identifier
            && parser.peek_kind(1) == TokenKind::Colon);

    if designated {
        return parse_designated_initializers(parser, start);
    }

    let mut values = vec![];
    if parser.current_token_kind() != TokenKind::CloseCurly {
        values.push(parse_expr(parser, BindingPower::Default)?);

        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            values.push(parse_expr(parser, BindingPower::Default)?);
        }
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(Expr::InitializerList(InitializerListExpr {
        values,
        span: parser.span_from(start),
    }))
}

fn parse_designated_initializers(
    parser: &mut Parser,
    start: crate::Position,
) -> Result<Expr, Error> {
    let mut initializers = vec![];

    loop {
        let name = if parser.current_token_kind() == TokenKind::Dot {
            parser.advance();
            let name = parser.expect(TokenKind::Identifier)?;
            parser.expect(TokenKind::Assignment)?;
            name
        } else {
            let name = parser.expect(TokenKind::Identifier)?;
            parser.expect(TokenKind::Colon)?;
            name
        };

        let value = parse_expr(parser, BindingPower::Default)?;
        initializers.push(DesignatedInitializer { name, value });

        if parser.current_token_kind() != TokenKind::Comma {
            break;
        }
        parser.advance();
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(Expr::DesignatedInitializers(DesignatedInitializersExpr {
        initializers,
        span: parser.span_from(start),
    }))
}
