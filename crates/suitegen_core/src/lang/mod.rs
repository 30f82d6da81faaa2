//! Language vocabulary and naming conventions shared by the front end and the assembler.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no AST types, no IO, no side effects.
//! - The lexer/parser enforce syntax; this module only provides spellings and well-known names.
//!
//! ## Examples
//! ```rust
//! use suitegen_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("extends"), Some(KeywordId::Extends));
//! assert_eq!(keywords::as_str(KeywordId::With), "with");
//! ```

pub mod conventions;
pub mod keywords;
