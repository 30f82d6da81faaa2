//! Diagnostics and error reporting for declaration sources.

use std::fmt;

use thiserror::Error;

use crate::ast::Span;

/// A compile-time error with location information
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {message}")]
pub struct CompileError {
    pub message: String,
    pub span: Span,
    pub kind: ErrorKind,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl CompileError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            kind: ErrorKind::Error,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self {
            kind: ErrorKind::Syntax,
            ..Self::new(message, span)
        }
    }

    pub fn resolution(message: impl Into<String>, span: Span) -> Self {
        Self {
            kind: ErrorKind::Resolution,
            ..Self::new(message, span)
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Error,
    Syntax,
    Resolution,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Error => write!(f, "error"),
            ErrorKind::Syntax => write!(f, "syntax error"),
            ErrorKind::Resolution => write!(f, "resolution error"),
        }
    }
}

/// Render an error with its source line and a caret underline.
///
/// ```text
/// syntax error: Expected class name, found Colon
///   --> list_test.incn:3:11
///    |
///  3 | pub class : Foo
///    |           ^
/// ```
pub fn format_error(file_name: &str, source: &str, error: &CompileError) -> String {
    let (line_num, col_num, line_text) = get_line_info(source, error.span.start);
    let width = line_num.to_string().len();

    let mut out = String::new();
    out.push_str(&format!("{}: {}\n", error.kind, error.message));
    out.push_str(&format!("{:>width$}--> {}:{}:{}\n", "", file_name, line_num, col_num, width = width + 1));
    out.push_str(&format!("{:>width$} |\n", "", width = width + 1));
    out.push_str(&format!(" {:>width$} | {}\n", line_num, line_text, width = width));

    let underline_len = error
        .span
        .end
        .saturating_sub(error.span.start)
        .min(line_text.len().saturating_sub(col_num - 1))
        .max(1);
    out.push_str(&format!(
        "{:>width$} | {}{}\n",
        "",
        " ".repeat(col_num - 1),
        "^".repeat(underline_len),
        width = width + 1
    ));

    for note in &error.notes {
        out.push_str(&format!("{:>width$} = note: {}\n", "", note, width = width + 1));
    }
    for hint in &error.hints {
        out.push_str(&format!("{:>width$} = hint: {}\n", "", hint, width = width + 1));
    }
    out
}

/// Get line number, column number (both 1-based), and line text for a byte offset
fn get_line_info(source: &str, offset: usize) -> (usize, usize, &str) {
    let offset = offset.min(source.len());
    let mut line_num = 1;
    let mut line_start = 0;

    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line_num += 1;
            line_start = i + 1;
        }
    }

    let line_end = source[line_start..]
        .find('\n')
        .map(|i| line_start + i)
        .unwrap_or(source.len());

    let line_text = source[line_start..line_end].trim_end_matches('\r');
    let col_num = offset - line_start + 1;

    (line_num, col_num, line_text)
}
