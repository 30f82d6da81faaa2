//! Declared types (compile-time view) and type descriptors (load-time view).
//!
//! The compilation step produces [`Declaration`]s in source order; the class-like ones carry a
//! [`DeclaredType`] with their direct supertypes. Loading a type by its binary name yields a
//! [`TypeDescriptor`], the reflective metadata the eligibility rules inspect.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use crate::lang::conventions::TEST_METHOD_PREFIX;
use crate::names::TypeName;

/// Visibility of a type or member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Private,
    Public,
}

impl Visibility {
    pub fn is_public(self) -> bool {
        self == Visibility::Public
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Private => write!(f, "private"),
            Visibility::Public => write!(f, "public"),
        }
    }
}

/// Kind of a class-like declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Class,
    /// Behavior-only contract; always abstract.
    Trait,
}

/// A direct supertype edge as written in source, after name resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SupertypeRef {
    Resolved(TypeName),
    /// The front end could not resolve the written name (lenient mode only).
    Unresolved(String),
}

/// A constructor as seen by reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstructorDescriptor {
    pub arity: usize,
    pub visibility: Visibility,
}

impl ConstructorDescriptor {
    pub fn new(arity: usize, visibility: Visibility) -> Self {
        Self { arity, visibility }
    }
}

/// A method as seen by reflection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    pub name: String,
    pub arity: usize,
    pub visibility: Visibility,
}

impl MethodDescriptor {
    /// `true` for public, zero-argument methods following the `test*` naming convention.
    pub fn is_test_method(&self) -> bool {
        self.visibility.is_public() && self.arity == 0 && self.name.starts_with(TEST_METHOD_PREFIX)
    }
}

/// A named, statically-scoped type produced by compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredType {
    pub name: TypeName,
    pub kind: DeclKind,
    pub visibility: Visibility,
    pub is_abstract: bool,
    /// Direct supertypes in declaration order (`extends` first, then `with`).
    pub supertypes: Vec<SupertypeRef>,
    pub constructors: Vec<ConstructorDescriptor>,
    pub methods: Vec<MethodDescriptor>,
}

impl DeclaredType {
    /// A public, concrete class with no supertypes and no members.
    pub fn class(name: TypeName) -> Self {
        Self {
            name,
            kind: DeclKind::Class,
            visibility: Visibility::Public,
            is_abstract: false,
            supertypes: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// A public trait with no supertypes.
    pub fn trait_(name: TypeName) -> Self {
        Self {
            kind: DeclKind::Trait,
            is_abstract: true,
            ..Self::class(name)
        }
    }

    pub fn with_supertype(mut self, name: TypeName) -> Self {
        self.supertypes.push(SupertypeRef::Resolved(name));
        self
    }

    pub fn with_unresolved_supertype(mut self, written: impl Into<String>) -> Self {
        self.supertypes.push(SupertypeRef::Unresolved(written.into()));
        self
    }

    pub fn with_constructor(mut self, arity: usize, visibility: Visibility) -> Self {
        self.constructors.push(ConstructorDescriptor::new(arity, visibility));
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn abstract_(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Reflective metadata for this declaration as it will look once loaded.
    pub fn descriptor(&self, origin: Origin) -> TypeDescriptor {
        TypeDescriptor {
            name: self.name.binary_name(),
            kind: self.kind,
            visibility: self.visibility,
            is_abstract: self.is_abstract || self.kind == DeclKind::Trait,
            constructors: self.constructors.clone(),
            methods: self.methods.clone(),
            origin,
        }
    }
}

/// A top-level function signature. Functions are never test cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSig {
    pub name: String,
    pub arity: usize,
}

/// A top-level declaration in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Type(DeclaredType),
    Function(FunctionSig),
}

impl Declaration {
    pub fn as_type(&self) -> Option<&DeclaredType> {
        match self {
            Declaration::Type(ty) => Some(ty),
            Declaration::Function(_) => None,
        }
    }
}

/// Where a loaded type came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Freshly compiled from the source set.
    Compiled,
    /// A dependency location (archive file or directory).
    Archive(PathBuf),
    /// The ambient parent context.
    Ambient,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Compiled => write!(f, "compiled"),
            Origin::Archive(path) => write!(f, "{}", path.display()),
            Origin::Ambient => write!(f, "ambient"),
        }
    }
}

/// Reflective metadata of a materialized type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// Binary (load-time) name.
    pub name: String,
    pub kind: DeclKind,
    pub visibility: Visibility,
    pub is_abstract: bool,
    pub constructors: Vec<ConstructorDescriptor>,
    pub methods: Vec<MethodDescriptor>,
    pub origin: Origin,
}

impl TypeDescriptor {
    /// Public zero-argument `test*` methods, in declaration order.
    pub fn test_methods(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.methods.iter().filter(|m| m.is_test_method())
    }
}

/// Every declared type visible to one compilation, keyed by canonical name.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    types: HashMap<TypeName, DeclaredType>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a type, returning the one it replaced.
    pub fn insert(&mut self, ty: DeclaredType) -> Option<DeclaredType> {
        self.types.insert(ty.name.clone(), ty)
    }

    pub fn get(&self, name: &TypeName) -> Option<&DeclaredType> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &TypeName) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FromIterator<DeclaredType> for TypeTable {
    fn from_iter<I: IntoIterator<Item = DeclaredType>>(iter: I) -> Self {
        let mut table = TypeTable::new();
        for ty in iter {
            table.insert(ty);
        }
        table
    }
}
