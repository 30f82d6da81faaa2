//! Token types for the declaration lexer.

use crate::ast::Span;
use suitegen_core::lang::keywords::{self, KeywordId};

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Keyword(KeywordId),
    Ident(String),
    Number(String),
    String(String),

    // ========== Punctuation ==========
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Dot,
    Arrow,    // ->
    Ellipsis, // ...
    Eq,       // =
    Star,     // *
    /// Any other operator run; only meaningful inside skipped bodies.
    Operator(String),

    // ========== Layout ==========
    Newline,
    Indent,
    Dedent,
    Eof,
}

impl TokenKind {
    pub fn is_keyword(&self, id: KeywordId) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == id)
    }
}

/// A token with its kind and source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Resolve an identifier spelling to a keyword id, if reserved.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::from_str(name)
}
