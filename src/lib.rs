#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::errors::diagnostics::{Diagnostic, Severity};

pub mod ast;
pub mod config;
pub mod decl;
pub mod errors;
pub mod exec;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod sema;

extern crate regex;

/// Byte offset into a source file, together with the file's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn null() -> Self {
        Span {
            start: Position::null(),
            end: Position::null(),
        }
    }

    /// Span covering `self` up to the end of `other`.
    pub fn to(&self, other: &Span) -> Span {
        Span {
            start: self.start.clone(),
            end: other.end.clone(),
        }
    }

    pub fn file(&self) -> &str {
        &self.start.1
    }
}

/// Finds the line containing `position`.
///
/// Returns the one based line number, the line text and the offset of
/// `position` inside that line.
pub fn get_line_at_position(content: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    if pos > content.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;

    for line in content.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return Some((line_number, line.to_string(), pos - start));
        }

        start = end;
        line_number += 1;
    }

    // Position right at the end of the content
    if content.is_empty() || content.ends_with('\n') {
        return Some((line_number, String::new(), 0));
    }
    let last = content.rsplit('\n').next().unwrap_or("");
    Some((line_number - 1, last.to_string(), last.len()))
}

/// Renders a diagnostic the same way compilers usually do:
///
/// ```text
/// error: message
/// -> CMakeLists.cmsl
///    |
/// 20 | int a = #;
///    | --------^
/// ```
pub fn format_diagnostic(diagnostic: &Diagnostic, source: &str) -> String {
    let mut out = String::new();

    let header = match diagnostic.severity {
        Severity::Error => "error",
        Severity::Note => "note",
    };
    out.push_str(&format!("{}: {}\n", header, diagnostic.message));
    out.push_str(&format!("-> {}\n", diagnostic.span.file()));

    let Some((line, line_text, line_pos)) =
        get_line_at_position(source, diagnostic.span.start.0)
    else {
        return out;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    out.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;
    out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));

    out
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string.chars().take_while(|c| *c == ' ' || *c == '\t').count();
    (String::from(&string[start..]), start)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::errors::diagnostics::{Diagnostic, Severity};
    use crate::{Position, Span};

    const CONTENT: &str = "Hello, world!\nsecond\n\nTesting { }\n";

    #[test]
    fn test_get_line_at_position() {
        let (line_number, line, line_pos) = super::get_line_at_position(CONTENT, 10).unwrap();
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!\n");
        assert_eq!(line_pos, 10);

        let (line_number, line, line_pos) = super::get_line_at_position(CONTENT, 30).unwrap();
        assert_eq!(line_number, 4);
        assert_eq!(line, "Testing { }\n");
        assert_eq!(line_pos, 8);
    }

    #[test]
    fn test_get_line_past_end() {
        assert!(super::get_line_at_position("abc", 10).is_none());
    }

    #[test]
    fn test_format_diagnostic_points_at_column() {
        let file = Rc::new(String::from("CMakeLists.cmsl"));
        let diagnostic = Diagnostic {
            severity: Severity::Error,
            message: String::from("'x' identifier not found"),
            span: Span {
                start: Position(12, Rc::clone(&file)),
                end: Position(13, file),
            },
        };

        let rendered = super::format_diagnostic(&diagnostic, "    int y = x;\n");
        assert!(rendered.starts_with("error: 'x' identifier not found\n"));
        assert!(rendered.contains("-> CMakeLists.cmsl"));
        assert!(rendered.contains("1 | int y = x;"));
        assert!(rendered.contains("| --------^"));
    }
}
