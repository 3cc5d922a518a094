//! Minimal source reader for the CLI and tests.
//!
//! A real host hands the transform its own AST. Standing alone we only need
//! to find top-level `const`/`let`/`var` declarations: the text is split into
//! top-level statements (newline-terminated, aware of brackets, strings and
//! comments) and every statement that is a simple variable declaration is
//! parsed. Everything else stays verbatim, blank lines included.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::ast::{
    Expression, SourceFile, Statement, VariableDeclaration, VariableKind, VariableStatement,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Code,
    LineComment,
    BlockComment,
    Str(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharKind {
    Code,
    Comment,
    String,
}

#[derive(Debug, Clone, Copy)]
struct CodeChar {
    index: usize,
    ch: char,
    /// Bracket depth after this character.
    depth: u32,
    kind: CharKind,
}

/// Classifies each character as code, comment or string content.
///
/// Template literals are treated as plain strings and regular expression
/// literals are not recognized. A regex holding a quote (`/'/`) or a backtick
/// nested inside `${}` therefore opens a string that runs past the line, and
/// the lines it swallows are merged into one statement. Declarations in such
/// a statement are kept verbatim and never rewritten.
struct CodeScanner<'a> {
    chars: Peekable<CharIndices<'a>>,
    mode: Mode,
    depth: u32,
    escape: bool,
}

impl<'a> CodeScanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.char_indices().peekable(),
            mode: Mode::Code,
            depth: 0,
            escape: false,
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, ch)| *ch)
    }
}

impl Iterator for CodeScanner<'_> {
    type Item = CodeChar;

    fn next(&mut self) -> Option<CodeChar> {
        let (index, ch) = self.chars.next()?;
        let kind = match self.mode {
            Mode::LineComment => {
                if ch == '\n' {
                    self.mode = Mode::Code;
                    CharKind::Code
                } else {
                    CharKind::Comment
                }
            }
            Mode::BlockComment => {
                if ch == '*' && self.peek_char() == Some('/') {
                    self.chars.next();
                    self.mode = Mode::Code;
                }
                CharKind::Comment
            }
            Mode::Str(quote) => {
                if self.escape {
                    self.escape = false;
                } else if ch == '\\' {
                    self.escape = true;
                } else if ch == quote {
                    self.mode = Mode::Code;
                }
                CharKind::String
            }
            Mode::Code => match ch {
                '/' if self.peek_char() == Some('/') => {
                    self.mode = Mode::LineComment;
                    CharKind::Comment
                }
                '/' if self.peek_char() == Some('*') => {
                    self.chars.next();
                    self.mode = Mode::BlockComment;
                    CharKind::Comment
                }
                '"' | '\'' | '`' => {
                    self.mode = Mode::Str(ch);
                    CharKind::String
                }
                '(' | '[' | '{' => {
                    self.depth += 1;
                    CharKind::Code
                }
                ')' | ']' | '}' => {
                    self.depth = self.depth.saturating_sub(1);
                    CharKind::Code
                }
                _ => CharKind::Code,
            },
        };
        Some(CodeChar {
            index,
            ch,
            depth: self.depth,
            kind,
        })
    }
}

const CONTINUES_AFTER: &[char] = &[
    '=', ',', '(', '[', '{', '+', '-', '*', '/', '%', '|', '&', '?', ':', '.', '<', '>', '!', '~',
    '^',
];
const CONTINUES_BEFORE: &[char] = &['.', ',', '?', ':', '+', '*', '=', '|', '&'];

fn continues_on_next_line(last_code: Option<char>, rest: &str) -> bool {
    if last_code.is_some_and(|ch| CONTINUES_AFTER.contains(&ch)) {
        return true;
    }
    let rest = rest.trim_start();
    if rest.starts_with("//") || rest.starts_with("/*") {
        return false;
    }
    rest.chars()
        .next()
        .is_some_and(|ch| CONTINUES_BEFORE.contains(&ch))
}

/// Split source text into top-level statements, one per logical line.
///
/// Statements keep their leading whitespace; the terminating newline (and a
/// `\r` before it) is dropped. Blank lines come back as empty strings.
///
/// Lexing is approximate; see [`CodeScanner`] for the regex and template
/// literal cases that merge lines.
pub fn split_statements(text: &str) -> Vec<&str> {
    let mut statements = Vec::new();
    let mut start = 0;
    let mut last_code: Option<char> = None;

    for code_char in CodeScanner::new(text) {
        if code_char.kind != CharKind::Code {
            if code_char.kind == CharKind::String {
                last_code = Some('"');
            }
            continue;
        }
        if code_char.ch == '\n' {
            if code_char.depth == 0
                && !continues_on_next_line(last_code, &text[code_char.index + 1..])
            {
                let statement = &text[start..code_char.index];
                statements.push(statement.strip_suffix('\r').unwrap_or(statement));
                start = code_char.index + 1;
                last_code = None;
            }
            continue;
        }
        if !code_char.ch.is_whitespace() {
            last_code = Some(code_char.ch);
        }
    }

    if start < text.len() {
        statements.push(&text[start..]);
    }
    statements
}

fn has_comment(text: &str) -> bool {
    CodeScanner::new(text).any(|c| c.kind == CharKind::Comment)
}

/// Whether `text` contains a comment, or a `,`/`;` outside of brackets and
/// strings.
fn has_top_level_separator_or_comment(text: &str) -> bool {
    CodeScanner::new(text).any(|c| {
        c.kind == CharKind::Comment
            || (c.kind == CharKind::Code && c.depth == 0 && matches!(c.ch, ',' | ';'))
    })
}

/// Byte index of the first top-level `=` that is an assignment (not `=>`,
/// `==`, `<=`, ...).
fn find_assignment(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    CodeScanner::new(text)
        .find(|c| {
            c.kind == CharKind::Code
                && c.depth == 0
                && c.ch == '='
                && bytes.get(c.index + 1).is_none_or(|next| !matches!(next, b'=' | b'>'))
                && c.index
                    .checked_sub(1)
                    .and_then(|prev| bytes.get(prev))
                    .is_none_or(|prev| !matches!(prev, b'=' | b'!' | b'<' | b'>'))
        })
        .map(|c| c.index)
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

fn is_identifier_part(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

/// Parse `[export] const|let|var name[: Type] [= init][;]`.
///
/// Returns `None` for anything else: destructuring, several declarators,
/// several statements on a line, or comments in the declaration.
pub fn parse_variable_statement(text: &str) -> Option<VariableStatement> {
    let trimmed = text.trim();
    let body = trimmed.strip_suffix(';').unwrap_or(trimmed).trim_end();

    let (exported, rest) = match body.strip_prefix("export") {
        Some(rest) if rest.starts_with(char::is_whitespace) => (true, rest.trim_start()),
        _ => (false, body),
    };
    let keyword_end = rest.find(char::is_whitespace)?;
    let kind = VariableKind::from_keyword(&rest[..keyword_end])?;
    let rest = rest[keyword_end..].trim_start();

    if !rest.chars().next().is_some_and(is_identifier_start) {
        return None;
    }
    let name_end = rest
        .char_indices()
        .find(|(_, ch)| !is_identifier_part(*ch))
        .map_or(rest.len(), |(index, _)| index);
    let name = &rest[..name_end];
    let rest = rest[name_end..].trim_start();

    let (type_annotation, initializer) = if let Some(after_colon) = rest.strip_prefix(':') {
        match find_assignment(after_colon) {
            Some(index) => (
                Some(after_colon[..index].trim()),
                Some(after_colon[index + 1..].trim()),
            ),
            None => (Some(after_colon.trim()), None),
        }
    } else if let Some(after_equals) = rest.strip_prefix('=') {
        (None, Some(after_equals.trim()))
    } else if rest.is_empty() {
        (None, None)
    } else {
        return None;
    };

    if type_annotation.is_some_and(|annotation| annotation.is_empty() || has_comment(annotation))
        || initializer.is_some_and(|init| init.is_empty() || has_top_level_separator_or_comment(init))
    {
        return None;
    }

    Some(VariableStatement {
        exported,
        kind,
        declarations: vec![VariableDeclaration {
            name: name.to_string(),
            type_annotation: type_annotation.map(str::to_string),
            initializer: initializer.map(|text| Expression::Verbatim(text.to_string())),
        }],
    })
}

/// Read `text` into a [`SourceFile`].
pub fn parse_source_file(file_name: impl Into<String>, text: &str) -> SourceFile {
    let statements = split_statements(text)
        .into_iter()
        .map(|statement| match parse_variable_statement(statement) {
            Some(variable) => Statement::Variable(variable),
            None => Statement::Verbatim(statement.to_string()),
        })
        .collect();
    SourceFile::new(file_name, statements)
}
