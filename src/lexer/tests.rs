//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Integer and double literals
//! - String literals with escape sequences
//! - Operators, with longer operators winning over their prefixes
//! - Comments
//! - Error cases

use super::{lexer::tokenize, tokens::TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source.to_string(), Some("test.cmsl".to_string()))
        .unwrap()
        .iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn test_tokenize_keywords() {
    let source = "class enum namespace import export auto return if else while for break true false".to_string();
    let tokens = tokenize(source, Some("test.cmsl".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Class);
    assert_eq!(tokens[1].kind, TokenKind::Enum);
    assert_eq!(tokens[2].kind, TokenKind::Namespace);
    assert_eq!(tokens[3].kind, TokenKind::Import);
    assert_eq!(tokens[4].kind, TokenKind::Export);
    assert_eq!(tokens[5].kind, TokenKind::Auto);
    assert_eq!(tokens[6].kind, TokenKind::Return);
    assert_eq!(tokens[7].kind, TokenKind::If);
    assert_eq!(tokens[8].kind, TokenKind::Else);
    assert_eq!(tokens[9].kind, TokenKind::While);
    assert_eq!(tokens[10].kind, TokenKind::For);
    assert_eq!(tokens[11].kind, TokenKind::Break);
    assert_eq!(tokens[12].kind, TokenKind::True);
    assert_eq!(tokens[13].kind, TokenKind::False);
    assert_eq!(tokens[14].kind, TokenKind::EOF);
}

#[test]
fn test_builtin_type_names_are_identifiers() {
    let source = "int double string list extern version".to_string();
    let tokens = tokenize(source, Some("test.cmsl".to_string())).unwrap();

    assert!(tokens[..6].iter().all(|t| t.kind == TokenKind::Identifier));
    assert_eq!(tokens[3].value, "list");
}

#[test]
fn test_tokenize_numbers() {
    let source = "42 3.14 0 100.5".to_string();
    let tokens = tokenize(source, Some("test.cmsl".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Integer);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].kind, TokenKind::Double);
    assert_eq!(tokens[1].value, "3.14");
    assert_eq!(tokens[2].kind, TokenKind::Integer);
    assert_eq!(tokens[3].kind, TokenKind::Double);
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_strings() {
    let source = r#""hello" "multiple words" "a\"b" "tab\there""#.to_string();
    let tokens = tokenize(source, Some("test.cmsl".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "hello");
    assert_eq!(tokens[1].value, "multiple words");
    assert_eq!(tokens[2].value, "a\"b");
    assert_eq!(tokens[3].value, "tab\there");
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_string_span_covers_quotes() {
    let tokens = tokenize("  \"ab\"".to_string(), Some("test.cmsl".to_string())).unwrap();

    assert_eq!(tokens[0].span.start.0, 2);
    assert_eq!(tokens[0].span.end.0, 6);
}

#[test]
fn test_tokenize_operators() {
    assert_eq!(
        kinds("== != = <= < >= > && & || ! :: : ? ."),
        vec![
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::Assignment,
            TokenKind::LessEquals,
            TokenKind::Less,
            TokenKind::GreaterEquals,
            TokenKind::Greater,
            TokenKind::And,
            TokenKind::Amp,
            TokenKind::Or,
            TokenKind::Not,
            TokenKind::ColonColon,
            TokenKind::Colon,
            TokenKind::Question,
            TokenKind::Dot,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_compound_assignment() {
    assert_eq!(
        kinds("++ -- += -= *= /= %= + - * / %"),
        vec![
            TokenKind::PlusPlus,
            TokenKind::MinusMinus,
            TokenKind::PlusEquals,
            TokenKind::MinusEquals,
            TokenKind::StarEquals,
            TokenKind::SlashEquals,
            TokenKind::PercentEquals,
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_reference_declaration() {
    assert_eq!(
        kinds("int& r = x;"),
        vec![
            TokenKind::Identifier,
            TokenKind::Amp,
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::Identifier,
            TokenKind::Semicolon,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_comments_are_skipped() {
    assert_eq!(
        kinds("a // line comment\n/* block\n comment */ b"),
        vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::EOF]
    );
}

#[test]
fn test_unterminated_block_comment() {
    let result = tokenize("a /* never closed".to_string(), Some("test.cmsl".to_string()));
    let error = result.unwrap_err();
    assert_eq!(error.get_error_name(), "UnterminatedComment");
}

#[test]
fn test_unrecognised_token() {
    let result = tokenize("int x = #;".to_string(), Some("test.cmsl".to_string()));
    let error = result.unwrap_err();

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().0, 8);
}

#[test]
fn test_token_positions() {
    let tokens = tokenize("int value".to_string(), Some("test.cmsl".to_string())).unwrap();

    assert_eq!(tokens[1].span.start.0, 4);
    assert_eq!(tokens[1].span.end.0, 9);
    assert_eq!(*tokens[1].span.start.1, "test.cmsl");
}
