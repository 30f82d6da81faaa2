//! Define the reserved keyword vocabulary of the declaration language.
//!
//! This module is the single source of truth for reserved words: a stable identifier
//! ([`KeywordId`]) plus a const metadata table ([`KEYWORDS`]).
//!
//! ## Notes
//! - Lookup via [`from_str`] is case-sensitive.
//!
//! ## Examples
//! ```rust
//! use suitegen_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("class"), Some(KeywordId::Class));
//! assert_eq!(keywords::from_str("Class"), None);
//! ```

/// Stable identifier for every reserved keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    Abstract,
    As,
    Class,
    Def,
    Extends,
    Import,
    Mut,
    Package,
    Pass,
    Pub,
    SelfKw,
    Trait,
    With,
}

/// Metadata for a reserved keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
}

/// Registry of all reserved keywords.
pub const KEYWORDS: &[KeywordInfo] = &[
    KeywordInfo {
        id: KeywordId::Abstract,
        canonical: "abstract",
    },
    KeywordInfo {
        id: KeywordId::As,
        canonical: "as",
    },
    KeywordInfo {
        id: KeywordId::Class,
        canonical: "class",
    },
    KeywordInfo {
        id: KeywordId::Def,
        canonical: "def",
    },
    KeywordInfo {
        id: KeywordId::Extends,
        canonical: "extends",
    },
    KeywordInfo {
        id: KeywordId::Import,
        canonical: "import",
    },
    KeywordInfo {
        id: KeywordId::Mut,
        canonical: "mut",
    },
    KeywordInfo {
        id: KeywordId::Package,
        canonical: "package",
    },
    KeywordInfo {
        id: KeywordId::Pass,
        canonical: "pass",
    },
    KeywordInfo {
        id: KeywordId::Pub,
        canonical: "pub",
    },
    KeywordInfo {
        id: KeywordId::SelfKw,
        canonical: "self",
    },
    KeywordInfo {
        id: KeywordId::Trait,
        canonical: "trait",
    },
    KeywordInfo {
        id: KeywordId::With,
        canonical: "with",
    },
];

/// Resolve a spelling to its keyword id.
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == s).map(|k| k.id)
}

/// Canonical spelling of a keyword.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Metadata for a keyword.
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    KEYWORDS
        .iter()
        .find(|k| k.id == id)
        .expect("INVARIANT: every KeywordId has a registry entry")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_keyword_round_trips() {
        for info in KEYWORDS {
            assert_eq!(from_str(info.canonical), Some(info.id));
            assert_eq!(as_str(info.id), info.canonical);
        }
    }

    #[test]
    fn test_spellings_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for info in KEYWORDS {
            assert!(seen.insert(info.canonical), "duplicate keyword spelling: {}", info.canonical);
        }
    }
}
