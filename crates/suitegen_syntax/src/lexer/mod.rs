//! Lexer for declaration sources
//!
//! Handles tokenization including:
//! - Keywords and identifiers
//! - Punctuation needed by declarations (`(`, `[`, `:`, `->`, `.`, `*`, ...)
//! - Literals and operator runs, so that skipped bodies still tokenize
//! - Indentation-based blocks (INDENT/DEDENT tokens)
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token)

pub mod tokens;

pub use tokens::{Token, TokenKind, keyword_id};

use crate::ast::Span;
use crate::diagnostics::CompileError;

/// Columns a tab advances the indentation width by.
const TAB_WIDTH: usize = 4;

// ============================================================================
// LEXER STATE
// ----------------------------------------------------------------------------
// [Start of line] → measure indentation → [Inside line]
//                                              ↓
//                                   '(' / '[' / '{' → push bracket
//                                              ↓
//                                   '\n' inside brackets → continuation
//                                              ↓
//                                   '\n' outside brackets → NEWLINE, [Start of line]
// ============================================================================

/// Lexer for declaration sources.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    indent_stack: Vec<usize>,
    at_line_start: bool,
    /// Open brackets with their spans, for continuation lines and error reporting
    brackets: Vec<(char, Span)>,
    tokens: Vec<Token>,
    errors: Vec<CompileError>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            indent_stack: vec![0],
            at_line_start: true,
            brackets: Vec::new(),
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source.
    ///
    /// The token stream always ends with `Newline` (unless empty), the pending `Dedent`s, and `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>, Vec<CompileError>> {
        while !self.is_at_end() {
            self.scan_token();
        }

        for (open, span) in self.brackets.drain(..) {
            self.errors.push(CompileError::syntax(format!("unclosed '{open}'"), span));
        }

        let end = self.current_pos;
        self.push_newline(end);
        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            self.tokens.push(Token::new(TokenKind::Dedent, Span::new(end, end)));
        }
        self.tokens.push(Token::new(TokenKind::Eof, Span::new(end, end)));

        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next(&self) -> Option<char> {
        self.source[self.current_pos..].chars().nth(1)
    }

    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.current_pos = pos + c.len_utf8();
        Some(c)
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        self.tokens.push(Token::new(kind, Span::new(start, self.current_pos)));
    }

    /// Emit a NEWLINE unless the previous token already ends a logical line.
    fn push_newline(&mut self, start: usize) {
        let ends_content = self
            .tokens
            .last()
            .is_some_and(|t| !matches!(t.kind, TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent));
        if ends_content {
            self.tokens
                .push(Token::new(TokenKind::Newline, Span::new(start, self.current_pos)));
        }
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) {
        if self.at_line_start {
            self.handle_indentation();
            return;
        }

        while matches!(self.peek(), Some(' ' | '\t' | '\r')) {
            self.advance();
        }

        let start = self.current_pos;
        let Some(c) = self.advance() else {
            return;
        };

        match c {
            '#' => {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
            }
            '\n' => {
                // Implicit line continuation inside brackets
                if !self.brackets.is_empty() {
                    return;
                }
                self.push_newline(start);
                self.at_line_start = true;
            }
            '(' | '[' | '{' => {
                self.brackets.push((c, Span::new(start, self.current_pos)));
                let kind = match c {
                    '(' => TokenKind::LParen,
                    '[' => TokenKind::LBracket,
                    _ => TokenKind::LBrace,
                };
                self.push(kind, start);
            }
            ')' | ']' | '}' => self.close_bracket(c, start),
            ',' => self.push(TokenKind::Comma, start),
            ':' => self.push(TokenKind::Colon, start),
            '.' => {
                if self.peek() == Some('.') && self.peek_next() == Some('.') {
                    self.advance();
                    self.advance();
                    self.push(TokenKind::Ellipsis, start);
                } else {
                    self.push(TokenKind::Dot, start);
                }
            }
            '-' if self.peek() == Some('>') => {
                self.advance();
                self.push(TokenKind::Arrow, start);
            }
            '=' if !self.peek().is_some_and(is_operator_char) => self.push(TokenKind::Eq, start),
            '*' if !self.peek().is_some_and(is_operator_char) => self.push(TokenKind::Star, start),
            '"' | '\'' => self.string(c, start),
            c if c.is_ascii_digit() => self.number(start),
            c if c.is_ascii_alphabetic() || c == '_' => self.identifier(start),
            c if is_operator_char(c) => self.operator(start),
            other => self.errors.push(CompileError::syntax(
                format!("unexpected character '{other}'"),
                Span::new(start, self.current_pos),
            )),
        }
    }

    fn handle_indentation(&mut self) {
        let mut width = 0;
        while let Some(c) = self.peek() {
            match c {
                ' ' => width += 1,
                '\t' => width += TAB_WIDTH,
                _ => break,
            }
            self.advance();
        }
        self.at_line_start = false;

        // Blank and comment-only lines do not affect indentation
        if matches!(self.peek(), None | Some('\n' | '\r' | '#')) {
            return;
        }

        let pos = self.current_pos;
        let current = self.indent_stack.last().copied().unwrap_or(0);
        if width > current {
            self.indent_stack.push(width);
            self.tokens.push(Token::new(TokenKind::Indent, Span::new(pos, pos)));
        } else if width < current {
            while self.indent_stack.last().is_some_and(|&top| top > width) {
                self.indent_stack.pop();
                self.tokens.push(Token::new(TokenKind::Dedent, Span::new(pos, pos)));
            }
            if self.indent_stack.last() != Some(&width) {
                self.errors.push(CompileError::syntax(
                    "unindent does not match any outer indentation level",
                    Span::new(pos.saturating_sub(width), pos),
                ));
                self.indent_stack.push(width);
            }
        }
    }

    fn close_bracket(&mut self, close: char, start: usize) {
        let expected = match close {
            ')' => '(',
            ']' => '[',
            _ => '{',
        };
        let span = Span::new(start, self.current_pos);
        match self.brackets.pop() {
            Some((open, _)) if open == expected => {}
            Some((open, open_span)) => {
                self.errors.push(
                    CompileError::syntax(format!("mismatched '{close}'"), span)
                        .with_note(format!("'{open}' opened at byte {}", open_span.start)),
                );
            }
            None => {
                self.errors.push(CompileError::syntax(format!("unmatched '{close}'"), span));
                return;
            }
        }
        let kind = match close {
            ')' => TokenKind::RParen,
            ']' => TokenKind::RBracket,
            _ => TokenKind::RBrace,
        };
        self.push(kind, start);
    }

    // ========================================================================
    // Literals, identifiers, operators
    // ========================================================================

    fn string(&mut self, quote: char, start: usize) {
        let mut value = String::new();

        if self.peek() == Some(quote) && self.peek_next() == Some(quote) {
            self.advance();
            self.advance();
            loop {
                match self.advance() {
                    None => {
                        self.errors.push(CompileError::syntax(
                            "unterminated triple-quoted string",
                            Span::new(start, self.current_pos),
                        ));
                        return;
                    }
                    Some(c) if c == quote && self.peek() == Some(quote) && self.peek_next() == Some(quote) => {
                        self.advance();
                        self.advance();
                        break;
                    }
                    Some(c) => value.push(c),
                }
            }
            self.push(TokenKind::String(value), start);
            return;
        }

        loop {
            match self.peek() {
                None | Some('\n') => {
                    self.errors.push(CompileError::syntax(
                        "unterminated string literal",
                        Span::new(start, self.current_pos),
                    ));
                    return;
                }
                Some('\\') => {
                    self.advance();
                    if let Some(escaped) = self.advance() {
                        value.push(escaped);
                    }
                }
                Some(c) => {
                    self.advance();
                    if c == quote {
                        break;
                    }
                    value.push(c);
                }
            }
        }
        self.push(TokenKind::String(value), start);
    }

    fn number(&mut self, start: usize) {
        loop {
            match self.peek() {
                Some(c) if c.is_ascii_alphanumeric() || c == '_' => {
                    self.advance();
                }
                Some('.') if self.peek_next().is_some_and(|c| c.is_ascii_digit()) => {
                    self.advance();
                }
                _ => break,
            }
        }
        let text = self.source[start..self.current_pos].to_string();
        self.push(TokenKind::Number(text), start);
    }

    fn identifier(&mut self, start: usize) {
        // ASCII only, matching the segments a `TypeName` accepts
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            self.advance();
        }
        let text = &self.source[start..self.current_pos];
        let kind = match keyword_id(text) {
            Some(id) => TokenKind::Keyword(id),
            None => TokenKind::Ident(text.to_string()),
        };
        self.push(kind, start);
    }

    fn operator(&mut self, start: usize) {
        while self.peek().is_some_and(is_operator_char) {
            self.advance();
        }
        let text = self.source[start..self.current_pos].to_string();
        self.push(TokenKind::Operator(text), start);
    }
}

fn is_operator_char(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/' | '%' | '<' | '>' | '=' | '!' | '&' | '|' | '^' | '~' | '@' | '?')
}

/// Tokenize source text.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, Vec<CompileError>> {
    Lexer::new(source).tokenize()
}
