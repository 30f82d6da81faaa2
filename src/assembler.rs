//! Suite assembly: load each candidate, filter it, keep the eligible ones in discovery order.
//!
//! ## Failure handling
//!
//! - A candidate that fails eligibility is rejected silently (recorded in the report).
//! - A missing public zero-argument constructor is a rejection, not an error.
//! - Any other reflective failure, and any load failure, aborts the whole assembly.
//! - Resolution failures from discovery only skip their own candidate.

use std::sync::Arc;

use suitegen_core::eligibility;
use suitegen_core::{DeclaredType, Rejection};

use crate::errors::SuiteResult;
use crate::hierarchy::ResolutionError;
use crate::loader::{ReflectError, TypeRegistry};
use crate::suite::{AssemblyReport, RejectedCandidate, Suite, SuiteEntry};

/// Assemble a suite from discovered candidates.
///
/// Either every candidate is processed or the first fatal error is returned; there is no partial
/// suite.
#[tracing::instrument(skip_all, fields(suite = %name))]
pub fn assemble<'a, I>(name: &str, candidates: I, registry: Arc<dyn TypeRegistry>) -> SuiteResult<Suite>
where
    I: IntoIterator<Item = Result<&'a DeclaredType, ResolutionError>>,
{
    let mut entries = Vec::new();
    let mut report = AssemblyReport::default();

    for candidate in candidates {
        let ty = match candidate {
            Ok(ty) => ty,
            Err(err) => {
                tracing::warn!(candidate = %err.candidate(), "skipping candidate: {err}");
                report.skipped.push(err);
                continue;
            }
        };

        let descriptor = registry.resolve(&ty.name.binary_name())?;

        if let Err(reason) = eligibility::check_modifiers(&descriptor) {
            tracing::debug!(candidate = %ty.name, %reason, "rejected");
            report.rejected.push(RejectedCandidate {
                name: ty.name.clone(),
                reason,
            });
            continue;
        }

        match registry.constructor(&descriptor, 0) {
            Ok(_) => entries.push(SuiteEntry::new(descriptor, Arc::clone(&registry))),
            Err(ReflectError::NoSuchConstructor { .. }) => {
                let reason = Rejection::NoAccessibleConstructor;
                tracing::debug!(candidate = %ty.name, %reason, "rejected");
                report.rejected.push(RejectedCandidate {
                    name: ty.name.clone(),
                    reason,
                });
            }
            Err(other) => return Err(other.into()),
        }
    }

    Ok(Suite::new(name, entries, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SuiteError;
    use crate::loader::{AmbientSource, ArtifactLoader, ArtifactSet, LoadError};
    use suitegen_core::types::Origin;
    use suitegen_core::{TypeName, Visibility};

    fn name(s: &str) -> TypeName {
        TypeName::parse(s).unwrap()
    }

    fn registry(types: &[DeclaredType]) -> Arc<dyn TypeRegistry> {
        Arc::new(ArtifactLoader::new(
            ArtifactSet::from_types(types, &Origin::Compiled),
            Vec::new(),
            Box::new(AmbientSource::new(&name("lang.Any"))),
        ))
    }

    fn public_class(n: &str) -> DeclaredType {
        DeclaredType::class(name(n)).with_constructor(0, Visibility::Public)
    }

    #[test]
    fn test_abstract_candidate_is_rejected() {
        let types = vec![public_class("a.Foo"), public_class("a.Bar").abstract_()];
        let suite = assemble("s", types.iter().map(Ok), registry(&types)).unwrap();
        assert_eq!(suite.type_names(), vec!["a.Foo"]);
        assert_eq!(
            suite.report().rejected,
            vec![RejectedCandidate {
                name: name("a.Bar"),
                reason: Rejection::Abstract
            }]
        );
    }

    #[test]
    fn test_unary_constructor_only_is_rejected() {
        let types = vec![DeclaredType::class(name("a.Baz")).with_constructor(1, Visibility::Public)];
        let suite = assemble("s", types.iter().map(Ok), registry(&types)).unwrap();
        assert!(suite.is_empty());
        assert_eq!(suite.report().rejected[0].reason, Rejection::NoAccessibleConstructor);
    }

    #[test]
    fn test_non_public_candidate_is_rejected() {
        let types = vec![public_class("a.Hidden").with_visibility(Visibility::Private)];
        let suite = assemble("s", types.iter().map(Ok), registry(&types)).unwrap();
        assert_eq!(suite.report().rejected[0].reason, Rejection::NotPublic);
    }

    #[test]
    fn test_missing_artifact_aborts() {
        let types = vec![public_class("a.Foo")];
        let orphan = public_class("a.Orphan");
        let candidates = vec![Ok(&types[0]), Ok(&orphan)];
        let err = assemble("s", candidates, registry(&types)).unwrap_err();
        assert!(matches!(err, SuiteError::ArtifactNotFound(LoadError::NotFound { ref name, .. }) if name == "a.Orphan"));
    }

    #[test]
    fn test_ambiguous_constructor_is_fatal() {
        let types = vec![public_class("a.Twice").with_constructor(0, Visibility::Public)];
        let err = assemble("s", types.iter().map(Ok), registry(&types)).unwrap_err();
        assert!(matches!(err, SuiteError::Reflection(ReflectError::AmbiguousConstructor { .. })));
    }

    #[test]
    fn test_resolution_errors_are_skipped() {
        let types = vec![public_class("a.Foo")];
        let broken = ResolutionError::Unresolved {
            candidate: name("a.Broken"),
            type_name: name("a.Broken"),
            written: "Nope".into(),
        };
        let candidates = vec![Err(broken.clone()), Ok(&types[0])];
        let suite = assemble("s", candidates, registry(&types)).unwrap();
        assert_eq!(suite.type_names(), vec!["a.Foo"]);
        assert_eq!(suite.report().skipped, vec![broken]);
    }

    #[test]
    fn test_suite_preserves_candidate_order() {
        let types = vec![public_class("z.Last"), public_class("a.First"), public_class("m.Middle")];
        let suite = assemble("s", types.iter().map(Ok), registry(&types)).unwrap();
        assert_eq!(suite.type_names(), vec!["z.Last", "a.First", "m.Middle"]);
    }
}
