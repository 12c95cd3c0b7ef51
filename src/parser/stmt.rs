use crate::{
    ast::{
        ast::Stmt,
        statements::{
            BlockStmt, BreakStmt, ClassDeclStmt, ClassMember, ConditionalBlock, EnumDeclStmt,
            ExpressionStmt, FnDeclStmt, ForStmt, IfStmt, ImportStmt, NamespaceStmt, ParamDecl,
            ReturnStmt, VarDeclStmt, WhileStmt,
        },
        types::TypeRepresentation,
    },
    errors::errors::Error,
    lexer::tokens::{Token, TokenKind},
    parser::{expr::parse_expr, lookups::BindingPower},
};

use super::{parser::Parser, types::parse_type};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if let Some(handler) = parser
        .get_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied()
    {
        return handler(parser);
    }

    parse_simple_stmt(parser)
}

/// A declaration or an expression statement, both terminated by `;`
/// (function declarations end with their body instead).
pub fn parse_simple_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if let Some(declaration) = try_parse_declaration(parser)? {
        return Ok(declaration);
    }

    let expression = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Expression(ExpressionStmt {
        span: expression.get_span().clone(),
        expression,
    }))
}

/// Speculatively parses `type name ...`. Rewinds and returns `None` when the
/// tokens do not form a declaration.
pub fn try_parse_declaration(parser: &mut Parser) -> Result<Option<Stmt>, Error> {
    if !matches!(
        parser.current_token_kind(),
        TokenKind::Identifier | TokenKind::Auto
    ) {
        return Ok(None);
    }

    let checkpoint = parser.checkpoint();
    let ty = match parse_type(parser, BindingPower::Default) {
        Ok(ty) => ty,
        Err(_) => {
            parser.restore(checkpoint);
            return Ok(None);
        }
    };

    if parser.current_token_kind() != TokenKind::Identifier {
        parser.restore(checkpoint);
        return Ok(None);
    }

    let name = parser.advance().clone();

    if parser.current_token_kind() == TokenKind::OpenParen {
        return Ok(Some(Stmt::FnDecl(parse_fn_decl_rest(parser, ty, name)?)));
    }

    Ok(Some(Stmt::VarDecl(parse_var_decl_rest(parser, ty, name)?)))
}

fn parse_var_decl_rest(
    parser: &mut Parser,
    ty: TypeRepresentation,
    name: Token,
) -> Result<VarDeclStmt, Error> {
    let initialization = if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(VarDeclStmt {
        span: parser.span_from(ty.span.start.clone()),
        ty,
        name,
        initialization,
        exported: false,
    })
}

fn parse_fn_decl_rest(
    parser: &mut Parser,
    return_type: TypeRepresentation,
    name: Token,
) -> Result<FnDeclStmt, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut params = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            let ty = parse_type(parser, BindingPower::Default)?;
            let name = parser.expect(TokenKind::Identifier)?;
            params.push(ParamDecl { ty, name });

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    let body = parse_block(parser)?;

    Ok(FnDeclStmt {
        span: parser.span_from(return_type.span.start.clone()),
        return_type,
        name,
        params,
        body,
        exported: false,
    })
}

pub fn parse_block(parser: &mut Parser) -> Result<BlockStmt, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?.span.start;

    let mut body = vec![];
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(parser.unexpected("expected `}`"));
        }
        body.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(BlockStmt {
        body,
        span: parser.span_from(start),
    })
}

pub fn parse_block_as_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::Block(parse_block(parser)?))
}

pub fn parse_import_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();
    let path = parser.expect(TokenKind::String)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Import(ImportStmt {
        path,
        span: parser.span_from(start),
    }))
}

pub fn parse_export_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let stmt = match parser.current_token_kind() {
        TokenKind::Class => parse_class_decl_stmt(parser)?,
        TokenKind::Enum => parse_enum_decl_stmt(parser)?,
        _ => match try_parse_declaration(parser)? {
            Some(stmt) => stmt,
            None => return Err(parser.unexpected("expected a declaration after `export`")),
        },
    };

    let span = parser.span_from(start);
    Ok(match stmt {
        Stmt::VarDecl(decl) => Stmt::VarDecl(VarDeclStmt {
            exported: true,
            span,
            ..decl
        }),
        Stmt::FnDecl(decl) => Stmt::FnDecl(FnDeclStmt {
            exported: true,
            span,
            ..decl
        }),
        Stmt::ClassDecl(decl) => Stmt::ClassDecl(ClassDeclStmt {
            exported: true,
            span,
            ..decl
        }),
        Stmt::EnumDecl(decl) => Stmt::EnumDecl(EnumDeclStmt {
            exported: true,
            span,
            ..decl
        }),
        other => other,
    })
}

pub fn parse_namespace_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let mut names = vec![parser.expect(TokenKind::Identifier)?];
    while parser.current_token_kind() == TokenKind::ColonColon {
        parser.advance();
        names.push(parser.expect(TokenKind::Identifier)?);
    }

    let block = parse_block(parser)?;

    Ok(Stmt::Namespace(NamespaceStmt {
        names,
        body: block.body,
        span: parser.span_from(start),
    }))
}

pub fn parse_class_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();
    let name = parser.expect(TokenKind::Identifier)?;

    let base = if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        Some(parse_type(parser, BindingPower::Default)?)
    } else {
        None
    };

    parser.expect(TokenKind::OpenCurly)?;

    let mut members = vec![];
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(parser.unexpected("expected `}`"));
        }
        members.push(parse_class_member(parser, &name)?);
    }

    parser.expect(TokenKind::CloseCurly)?;
    if parser.current_token_kind() == TokenKind::Semicolon {
        parser.advance();
    }

    Ok(Stmt::ClassDecl(ClassDeclStmt {
        name,
        base,
        members,
        exported: false,
        span: parser.span_from(start),
    }))
}

fn parse_class_member(parser: &mut Parser, class_name: &Token) -> Result<ClassMember, Error> {
    // Constructor, `Name(params) { ... }`
    if parser.current_token_kind() == TokenKind::Identifier
        && parser.current_token().value == class_name.value
        && parser.peek_kind(1) == TokenKind::OpenParen
    {
        let name = parser.advance().clone();
        let return_type = TypeRepresentation {
            names: vec![class_name.clone()],
            generics: vec![],
            is_reference: false,
            span: name.span.clone(),
        };
        return Ok(ClassMember::Function(parse_fn_decl_rest(
            parser,
            return_type,
            name,
        )?));
    }

    let ty = parse_type(parser, BindingPower::Default)?;
    let name = parser.expect(TokenKind::Identifier)?;

    if parser.current_token_kind() == TokenKind::OpenParen {
        return Ok(ClassMember::Function(parse_fn_decl_rest(parser, ty, name)?));
    }

    parser.expect(TokenKind::Semicolon)?;
    Ok(ClassMember::Variable(VarDeclStmt {
        span: parser.span_from(ty.span.start.clone()),
        ty,
        name,
        initialization: None,
        exported: false,
    }))
}

pub fn parse_enum_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();
    let name = parser.expect(TokenKind::Identifier)?;

    parser.expect(TokenKind::OpenCurly)?;

    let mut enumerators = vec![parser.expect(TokenKind::Identifier)?];
    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        if parser.current_token_kind() == TokenKind::CloseCurly {
            break;
        }
        enumerators.push(parser.expect(TokenKind::Identifier)?);
    }

    parser.expect(TokenKind::CloseCurly)?;
    if parser.current_token_kind() == TokenKind::Semicolon {
        parser.advance();
    }

    Ok(Stmt::EnumDecl(EnumDeclStmt {
        name,
        enumerators,
        exported: false,
        span: parser.span_from(start),
    }))
}

fn parse_condition(parser: &mut Parser) -> Result<crate::ast::ast::Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;
    Ok(condition)
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_condition(parser)?;
    let body = parse_block(parser)?;
    let mut ifs = vec![ConditionalBlock { condition, body }];
    let mut else_body = None;

    while parser.current_token_kind() == TokenKind::Else {
        parser.advance();

        if parser.current_token_kind() == TokenKind::If {
            parser.advance();
            let condition = parse_condition(parser)?;
            let body = parse_block(parser)?;
            ifs.push(ConditionalBlock { condition, body });
        } else {
            else_body = Some(parse_block(parser)?);
            break;
        }
    }

    Ok(Stmt::If(IfStmt {
        ifs,
        else_body,
        span: parser.span_from(start),
    }))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();
    let condition = parse_condition(parser)?;
    let body = parse_block(parser)?;

    Ok(Stmt::While(WhileStmt {
        condition,
        body,
        span: parser.span_from(start),
    }))
}

pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();
    parser.expect(TokenKind::OpenParen)?;

    // The init statement consumes its own `;`
    let init = if parser.current_token_kind() == TokenKind::Semicolon {
        parser.advance();
        None
    } else {
        Some(Box::new(parse_simple_stmt(parser)?))
    };

    let condition = if parser.current_token_kind() == TokenKind::Semicolon {
        None
    } else {
        Some(parse_expr(parser, BindingPower::Default)?)
    };
    parser.expect(TokenKind::Semicolon)?;

    let iteration = if parser.current_token_kind() == TokenKind::CloseParen {
        None
    } else {
        Some(parse_expr(parser, BindingPower::Default)?)
    };
    parser.expect(TokenKind::CloseParen)?;

    let body = parse_block(parser)?;

    Ok(Stmt::For(ForStmt {
        init,
        condition,
        iteration,
        body,
        span: parser.span_from(start),
    }))
}

pub fn parse_break_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Break(BreakStmt {
        span: parser.span_from(start),
    }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let value = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Return(ReturnStmt {
        value,
        span: parser.span_from(start),
    }))
}
