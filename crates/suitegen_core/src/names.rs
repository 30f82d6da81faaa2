//! Canonical type names and their load-time mapping.
//!
//! A declared type has three spellings over its lifetime:
//! - the **canonical** name used for identity (`std.collections.ListTest`),
//! - the **internal** name produced by the back end (`std/collections/ListTest`),
//! - the **binary** name used to materialize the type at load time (`std.collections.ListTest`).
//!
//! ## Notes
//! - Identity comparisons (e.g. marker-contract membership) always use the canonical name, never
//!   object identity: two resolution contexts may hand out distinct representations of one type.
//!
//! ## Examples
//! ```rust
//! use suitegen_core::names::TypeName;
//!
//! let name = TypeName::new("std.collections", "ListTest");
//! assert_eq!(name.internal_name(), "std/collections/ListTest");
//! assert_eq!(name.binary_name(), "std.collections.ListTest");
//! assert_eq!(name.simple_name(), "ListTest");
//! ```

use std::fmt;
use std::str::FromStr;

/// Separator between package segments in canonical and binary names.
pub const PACKAGE_SEPARATOR: char = '.';

/// Separator between package segments in internal (back-end) names.
pub const INTERNAL_SEPARATOR: char = '/';

/// Canonical, fully-qualified name of a declared type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeName(String);

impl TypeName {
    /// Build a name from a (possibly empty) package and a simple name.
    pub fn new(package: &str, simple: &str) -> Self {
        if package.is_empty() {
            Self(simple.to_string())
        } else {
            Self(format!("{package}{PACKAGE_SEPARATOR}{simple}"))
        }
    }

    /// Parse a dotted name, validating every segment.
    ///
    /// Returns `None` for empty names, empty segments, or segments that are not identifiers.
    pub fn parse(dotted: &str) -> Option<Self> {
        let valid = !dotted.is_empty() && dotted.split(PACKAGE_SEPARATOR).all(is_identifier);
        valid.then(|| Self(dotted.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last segment of the name.
    pub fn simple_name(&self) -> &str {
        self.0.rsplit_once(PACKAGE_SEPARATOR).map_or(self.0.as_str(), |(_, simple)| simple)
    }

    /// The package part of the name (empty for the default package).
    pub fn package(&self) -> &str {
        self.0.rsplit_once(PACKAGE_SEPARATOR).map_or("", |(package, _)| package)
    }

    /// Name as emitted by the back end.
    pub fn internal_name(&self) -> String {
        self.0.replace(PACKAGE_SEPARATOR, "/")
    }

    /// Load-time identity derived from the internal name.
    pub fn binary_name(&self) -> String {
        self.internal_name().replace(INTERNAL_SEPARATOR, ".")
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned when a string is not a valid type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTypeName(pub String);

impl fmt::Display for InvalidTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid type name", self.0)
    }
}

impl std::error::Error for InvalidTypeName {}

impl FromStr for TypeName {
    type Err = InvalidTypeName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| InvalidTypeName(s.to_string()))
    }
}

/// Return `true` if `segment` is a valid identifier (`[A-Za-z_][A-Za-z0-9_]*`).
pub fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
        _ => false,
    }
}
