//! Property-based tests for supertype resolution and discovery
//!
//! These tests use proptest to generate random (possibly cyclic) supertype graphs and check the
//! closure and discovery invariants on every one of them.

use proptest::prelude::*;
use suitegen::{HierarchyResolver, discover};
use suitegen_core::{DeclaredType, Declaration, SupertypeRef, TypeName, TypeTable};

// =============================================================================
// Graph generation
// =============================================================================

fn root() -> TypeName {
    TypeName::new("lang", "Any")
}

fn node(i: usize) -> TypeName {
    TypeName::new("gen", &format!("T{i}"))
}

/// `(is_trait, supertype indices)` per node. Indices may point anywhere, including back at the
/// node itself.
fn graph() -> impl Strategy<Value = Vec<(bool, Vec<usize>)>> {
    (1usize..10).prop_flat_map(|n| prop::collection::vec((any::<bool>(), prop::collection::vec(0..n, 0..4)), n))
}

fn build(graph: &[(bool, Vec<usize>)]) -> Vec<DeclaredType> {
    graph
        .iter()
        .enumerate()
        .map(|(i, (is_trait, supers))| {
            let ty = if *is_trait {
                DeclaredType::trait_(node(i))
            } else {
                DeclaredType::class(node(i)).with_supertype(root())
            };
            supers.iter().fold(ty, |ty, &s| ty.with_supertype(node(s)))
        })
        .collect()
}

fn resolved(ty: &DeclaredType) -> impl Iterator<Item = &TypeName> {
    ty.supertypes.iter().filter_map(|s| match s {
        SupertypeRef::Resolved(name) => Some(name),
        SupertypeRef::Unresolved(_) => None,
    })
}

// =============================================================================
// Closure properties
// =============================================================================

proptest! {
    /// Every direct supertype other than the type itself and the root is in the closure.
    #[test]
    fn closure_contains_direct_supertypes(graph in graph()) {
        let types = build(&graph);
        let table: TypeTable = types.iter().cloned().collect();
        let root = root();
        let resolver = HierarchyResolver::new(&table, &root);

        for ty in &types {
            let closure = resolver.closure(ty).unwrap();
            for direct in resolved(ty).filter(|n| **n != ty.name && **n != root) {
                prop_assert!(closure.contains(direct));
            }
        }
    }

    /// The closure is closed under the supertype relation.
    #[test]
    fn closure_is_transitive(graph in graph()) {
        let types = build(&graph);
        let table: TypeTable = types.iter().cloned().collect();
        let root = root();
        let resolver = HierarchyResolver::new(&table, &root);

        for ty in &types {
            let closure = resolver.closure(ty).unwrap();
            for member in closure.iter() {
                let declared = table.get(member).unwrap();
                for next in resolved(declared).filter(|n| **n != ty.name && **n != root) {
                    prop_assert!(closure.contains(next), "{} reaches {} through {}", ty.name, next, member);
                }
            }
        }
    }

    /// Neither the start node nor the root is a member, and no member appears twice.
    #[test]
    fn closure_excludes_start_and_root(graph in graph()) {
        let types = build(&graph);
        let table: TypeTable = types.iter().cloned().collect();
        let root = root();
        let resolver = HierarchyResolver::new(&table, &root);

        for ty in &types {
            let closure = resolver.closure(ty).unwrap();
            prop_assert!(!closure.contains(&ty.name));
            prop_assert!(!closure.contains(&root));

            let mut members = closure.into_vec();
            let before = members.len();
            members.sort_by(|a, b| a.as_str().cmp(b.as_str()));
            members.dedup();
            prop_assert_eq!(members.len(), before);
        }
    }
}

// =============================================================================
// Discovery properties
// =============================================================================

proptest! {
    /// Discovery yields exactly the declarations whose closure holds the marker, in order.
    #[test]
    fn discovery_has_no_false_positives_or_misses(graph in graph(), marker in 0usize..10) {
        let types = build(&graph);
        let marker = node(marker % types.len());
        let table: TypeTable = types.iter().cloned().collect();
        let declarations: Vec<Declaration> = types.iter().cloned().map(Declaration::Type).collect();
        let root = root();

        let found: Vec<TypeName> = discover(&declarations, HierarchyResolver::new(&table, &root), &marker)
            .map(|item| item.unwrap().name.clone())
            .collect();

        let resolver = HierarchyResolver::new(&table, &root);
        let expected: Vec<TypeName> = types
            .iter()
            .filter(|ty| resolver.closure(ty).unwrap().contains(&marker))
            .map(|ty| ty.name.clone())
            .collect();
        prop_assert_eq!(found, expected);
    }

    /// Two passes over the same declarations agree.
    #[test]
    fn discovery_is_deterministic(graph in graph(), marker in 0usize..10) {
        let types = build(&graph);
        let marker = node(marker % types.len());
        let table: TypeTable = types.iter().cloned().collect();
        let declarations: Vec<Declaration> = types.iter().cloned().map(Declaration::Type).collect();
        let root = root();

        let run = || -> Vec<TypeName> {
            discover(&declarations, HierarchyResolver::new(&table, &root), &marker)
                .map(|item| item.unwrap().name.clone())
                .collect()
        };
        prop_assert_eq!(run(), run());
    }
}
