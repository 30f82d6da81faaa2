//! Supertype closures over the compiled type table.

use suitegen_core::types::SupertypeRef;
use suitegen_core::{Closure, DeclaredType, TypeName, TypeTable, closure};
use thiserror::Error;

/// A candidate's supertype graph could not be fully resolved.
///
/// Scoped to one candidate: discovery skips it and carries on with the rest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("cannot resolve supertype '{written}' of '{type_name}' (while resolving '{candidate}')")]
    Unresolved {
        candidate: TypeName,
        type_name: TypeName,
        written: String,
    },

    #[error("supertype '{missing}' of '{candidate}' is not a known type")]
    UnknownType { candidate: TypeName, missing: TypeName },
}

impl ResolutionError {
    /// The candidate whose closure was being computed.
    pub fn candidate(&self) -> &TypeName {
        match self {
            ResolutionError::Unresolved { candidate, .. } | ResolutionError::UnknownType { candidate, .. } => {
                candidate
            }
        }
    }
}

/// Computes supertype closures against one compilation's type table.
#[derive(Debug, Clone, Copy)]
pub struct HierarchyResolver<'a> {
    types: &'a TypeTable,
    universal_root: &'a TypeName,
}

impl<'a> HierarchyResolver<'a> {
    pub fn new(types: &'a TypeTable, universal_root: &'a TypeName) -> Self {
        Self { types, universal_root }
    }

    /// Every type transitively reachable from `ty` through its declared supertypes.
    ///
    /// The type itself and the universal root are not members. A type whose only supertype is
    /// the root has an empty closure.
    pub fn closure(&self, ty: &DeclaredType) -> Result<Closure<TypeName>, ResolutionError> {
        closure(&ty.name, |name| self.direct_supertypes(ty, name))
    }

    fn direct_supertypes(&self, candidate: &DeclaredType, name: &TypeName) -> Result<Vec<TypeName>, ResolutionError> {
        let declared = if *name == candidate.name {
            candidate
        } else {
            self.types.get(name).ok_or_else(|| ResolutionError::UnknownType {
                candidate: candidate.name.clone(),
                missing: name.clone(),
            })?
        };

        declared
            .supertypes
            .iter()
            .filter(|supertype| !matches!(supertype, SupertypeRef::Resolved(n) if n == self.universal_root))
            .map(|supertype| match supertype {
                SupertypeRef::Resolved(n) => Ok(n.clone()),
                SupertypeRef::Unresolved(written) => Err(ResolutionError::Unresolved {
                    candidate: candidate.name.clone(),
                    type_name: declared.name.clone(),
                    written: written.clone(),
                }),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> TypeName {
        TypeName::parse(s).unwrap()
    }

    fn root() -> TypeName {
        name("lang.Any")
    }

    fn table() -> TypeTable {
        [
            DeclaredType::trait_(name("junit.framework.Test")),
            DeclaredType::class(name("junit.framework.Assert")).with_supertype(root()),
            DeclaredType::class(name("junit.framework.TestCase"))
                .with_supertype(name("junit.framework.Assert"))
                .with_supertype(name("junit.framework.Test")),
            DeclaredType::class(name("kunit.StdTest")).with_supertype(name("junit.framework.TestCase")),
            DeclaredType::class(name("a.Broken")).with_unresolved_supertype("Nope"),
        ]
        .into_iter()
        .collect()
    }

    fn names(closure: &Closure<TypeName>) -> Vec<&str> {
        closure.iter().map(TypeName::as_str).collect()
    }

    #[test]
    fn test_indirect_supertypes_are_included() {
        let types = table();
        let root = root();
        let resolver = HierarchyResolver::new(&types, &root);
        let ty = DeclaredType::class(name("std.ListTest")).with_supertype(name("kunit.StdTest"));
        let closure = resolver.closure(&ty).unwrap();
        assert_eq!(
            names(&closure),
            vec![
                "kunit.StdTest",
                "junit.framework.TestCase",
                "junit.framework.Assert",
                "junit.framework.Test"
            ]
        );
    }

    #[test]
    fn test_root_only_type_has_empty_closure() {
        let types = table();
        let root = root();
        let resolver = HierarchyResolver::new(&types, &root);
        let ty = DeclaredType::class(name("a.Plain")).with_supertype(root.clone());
        assert!(resolver.closure(&ty).unwrap().is_empty());
    }

    #[test]
    fn test_unresolved_supertype_names_the_candidate() {
        let types = table();
        let root = root();
        let resolver = HierarchyResolver::new(&types, &root);
        let ty = DeclaredType::class(name("a.Child")).with_supertype(name("a.Broken"));
        let err = resolver.closure(&ty).unwrap_err();
        assert_eq!(
            err,
            ResolutionError::Unresolved {
                candidate: name("a.Child"),
                type_name: name("a.Broken"),
                written: "Nope".to_string(),
            }
        );
        assert_eq!(err.candidate(), &name("a.Child"));
    }

    #[test]
    fn test_unknown_supertype_is_an_error() {
        let types = table();
        let root = root();
        let resolver = HierarchyResolver::new(&types, &root);
        let ty = DeclaredType::class(name("a.Child")).with_supertype(name("a.Ghost"));
        assert!(matches!(resolver.closure(&ty), Err(ResolutionError::UnknownType { .. })));
    }

    #[test]
    fn test_cycles_terminate() {
        let types: TypeTable = [
            DeclaredType::class(name("a.A")).with_supertype(name("a.B")),
            DeclaredType::class(name("a.B")).with_supertype(name("a.A")),
        ]
        .into_iter()
        .collect();
        let root = root();
        let resolver = HierarchyResolver::new(&types, &root);
        let a = types.get(&name("a.A")).unwrap();
        assert_eq!(names(&resolver.closure(a).unwrap()), vec!["a.B"]);
    }
}
