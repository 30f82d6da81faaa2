//! Syntax front end for suitegen declaration sources: lexer, parser, AST, diagnostics.
//!
//! The language is an indentation-based, Python-like surface that only needs to be understood
//! down to the declaration level. Method and function bodies are tokenized (so malformed bodies
//! still fail to compile) but otherwise skipped.
//!
//! ## Notes
//! - This crate is intentionally “syntax-only”: it does not resolve names or build descriptors.
//! - Keyword identity comes from `suitegen_core::lang::keywords`.
//!
//! ## Examples
//! ```rust
//! use suitegen_syntax::{lexer, parser};
//!
//! let tokens = lexer::lex("pub class FooTest extends TestCase\n").unwrap();
//! let program = parser::parse(&tokens).unwrap();
//! assert_eq!(program.declarations.len(), 1);
//! ```

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
