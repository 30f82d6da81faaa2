//! Abstract syntax tree for declaration sources.
//!
//! Only the declaration level is modelled; method and function bodies are not kept.

pub use suitegen_core::types::Visibility;

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// A node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

pub type Ident = String;

/// A source file is a sequence of declarations
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub declarations: Vec<Spanned<Declaration>>,
}

impl Program {
    /// The `package` declaration, if the file has one.
    pub fn package(&self) -> Option<&QualifiedName> {
        self.declarations.iter().find_map(|d| match &d.node {
            Declaration::Package(name) => Some(name),
            _ => None,
        })
    }

    pub fn imports(&self) -> impl Iterator<Item = &ImportDecl> {
        self.declarations.iter().filter_map(|d| match &d.node {
            Declaration::Import(import) => Some(import),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Package(QualifiedName),
    Import(ImportDecl),
    Class(ClassDecl),
    Trait(TraitDecl),
    Function(FunctionDecl),
}

/// Dotted name: `junit.framework.TestCase`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    pub segments: Vec<Ident>,
}

impl QualifiedName {
    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }

    pub fn last(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }
}

// ============================================================================
// Imports
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub path: QualifiedName,
    /// `import a.b.*`
    pub wildcard: bool,
    pub alias: Option<Ident>,
}

impl ImportDecl {
    /// The simple name this import binds, if it binds one.
    pub fn binding(&self) -> Option<&str> {
        if self.wildcard {
            return None;
        }
        Some(self.alias.as_deref().unwrap_or_else(|| self.path.last()))
    }
}

// ============================================================================
// Types
// ============================================================================

/// A type as written: `Map[str, List[int]]`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    pub name: QualifiedName,
    pub args: Vec<Spanned<TypeRef>>,
}

// ============================================================================
// Classes and traits
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub visibility: Visibility,
    pub is_abstract: bool,
    pub name: Ident,
    pub type_params: Vec<Ident>,
    pub extends: Option<Spanned<TypeRef>>,
    pub traits: Vec<Spanned<TypeRef>>,
    pub fields: Vec<Spanned<FieldDecl>>,
    pub methods: Vec<Spanned<MethodDecl>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraitDecl {
    pub visibility: Visibility,
    pub name: Ident,
    pub type_params: Vec<Ident>,
    /// Super-traits listed after `with`.
    pub traits: Vec<Spanned<TypeRef>>,
    pub methods: Vec<Spanned<MethodDecl>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub visibility: Visibility,
    pub name: Ident,
    pub ty: Spanned<TypeRef>,
}

// ============================================================================
// Functions and methods
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub visibility: Visibility,
    pub name: Ident,
    pub params: Vec<Spanned<Param>>,
    pub return_type: Option<Spanned<TypeRef>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub visibility: Visibility,
    pub name: Ident,
    pub has_receiver: bool,
    /// Parameters after the receiver.
    pub params: Vec<Spanned<Param>>,
    pub return_type: Option<Spanned<TypeRef>>,
    /// `false` for signature-only methods.
    pub has_body: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub is_mut: bool,
    pub name: Ident,
    pub ty: Option<Spanned<TypeRef>>,
}
