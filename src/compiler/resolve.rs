//! Name resolution for supertype references.
//!
//! A written name is looked up, in order, through:
//! 1. explicit imports (`import a.b.C`, `import a.b.C as D`)
//! 2. the file's own package
//! 3. wildcard imports, in import order
//! 4. the implicit prelude package
//! 5. the name taken as fully qualified
//!
//! Multi-segment names are always fully qualified. Type arguments never take part in identity;
//! callers pass the bare [`QualifiedName`].

use std::collections::{HashMap, HashSet};

use suitegen_core::lang::conventions::PRELUDE_PACKAGE;
use suitegen_core::{DeclKind, TypeName};
use suitegen_syntax::ast::{ImportDecl, QualifiedName};

/// Every type name visible to one compilation, with its kind.
#[derive(Debug, Clone)]
pub(crate) struct KnownTypes {
    kinds: HashMap<TypeName, DeclKind>,
    packages: HashSet<String>,
}

impl KnownTypes {
    /// The universal root is always known, even without a runtime archive.
    pub(crate) fn new(universal_root: &TypeName) -> Self {
        let mut known = Self {
            kinds: HashMap::new(),
            packages: HashSet::new(),
        };
        known.declare(universal_root.clone(), DeclKind::Class);
        known
    }

    /// Declare a type. The first declaration of a name wins; returns `false` for repeats.
    pub(crate) fn declare(&mut self, name: TypeName, kind: DeclKind) -> bool {
        if self.kinds.contains_key(&name) {
            return false;
        }
        self.packages.insert(name.package().to_string());
        self.kinds.insert(name, kind);
        true
    }

    pub(crate) fn kind_of(&self, name: &TypeName) -> Option<DeclKind> {
        self.kinds.get(name).copied()
    }

    pub(crate) fn contains(&self, name: &TypeName) -> bool {
        self.kinds.contains_key(name)
    }

    pub(crate) fn has_package(&self, package: &str) -> bool {
        self.packages.contains(package)
    }
}

/// Names in scope for one source file.
#[derive(Debug)]
pub(crate) struct Scope<'a> {
    package: &'a str,
    explicit: HashMap<String, TypeName>,
    wildcards: Vec<String>,
    known: &'a KnownTypes,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(package: &'a str, known: &'a KnownTypes) -> Self {
        Self {
            package,
            explicit: HashMap::new(),
            wildcards: Vec::new(),
            known,
        }
    }

    /// Bind an import. The binding is kept even when its target is unknown; the returned error
    /// describes the problem.
    pub(crate) fn import(&mut self, import: &ImportDecl) -> Result<(), String> {
        let dotted = import.path.dotted();

        if import.wildcard {
            let known = self.known.has_package(&dotted);
            self.wildcards.push(dotted);
            return if known {
                Ok(())
            } else {
                Err(format!("package '{}' has no known types", import.path.dotted()))
            };
        }

        let target = TypeName::parse(&dotted).ok_or_else(|| format!("'{dotted}' is not a valid type name"))?;
        if let Some(binding) = import.binding() {
            self.explicit.insert(binding.to_string(), target.clone());
        }
        if self.known.contains(&target) {
            Ok(())
        } else {
            Err(format!("unresolved import '{target}'"))
        }
    }

    /// Resolve a written type name to a known canonical name.
    pub(crate) fn resolve(&self, written: &QualifiedName) -> Option<TypeName> {
        if written.segments.len() > 1 {
            return TypeName::parse(&written.dotted()).filter(|name| self.known.contains(name));
        }

        let simple = written.last();
        if let Some(target) = self.explicit.get(simple) {
            // An explicit import shadows everything else, even when its target is unknown
            return self.known.contains(target).then(|| target.clone());
        }

        std::iter::once(self.package)
            .chain(self.wildcards.iter().map(String::as_str))
            .chain([PRELUDE_PACKAGE, ""])
            .map(|package| TypeName::new(package, simple))
            .find(|candidate| self.known.contains(candidate))
    }
}
