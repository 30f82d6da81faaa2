//! Test discovery: which declared types transitively conform to the marker contract.
//!
//! [`discover`] returns a lazy iterator over the declarations it is given. It is consumed exactly
//! once; the order of its items is the order of the declarations, which is what makes suite
//! ordering deterministic.

use suitegen_core::types::Declaration;
use suitegen_core::{DeclaredType, TypeName};

use crate::hierarchy::{HierarchyResolver, ResolutionError};

/// Lazy, single-pass sequence of candidates.
///
/// Each item is a candidate, or the resolution failure that took one type out of the running.
#[derive(Debug)]
pub struct Discovery<'a, I> {
    declarations: I,
    resolver: HierarchyResolver<'a>,
    marker: &'a TypeName,
}

/// Walk `declarations` and yield the class-like ones whose closure contains `marker`.
pub fn discover<'a, I>(declarations: I, resolver: HierarchyResolver<'a>, marker: &'a TypeName) -> Discovery<'a, I::IntoIter>
where
    I: IntoIterator<Item = &'a Declaration>,
{
    Discovery {
        declarations: declarations.into_iter(),
        resolver,
        marker,
    }
}

impl<'a, I> Iterator for Discovery<'a, I>
where
    I: Iterator<Item = &'a Declaration>,
{
    type Item = Result<&'a DeclaredType, ResolutionError>;

    fn next(&mut self) -> Option<Self::Item> {
        for declaration in self.declarations.by_ref() {
            // Functions are never test cases
            let Some(ty) = declaration.as_type() else {
                continue;
            };

            match self.resolver.closure(ty) {
                Ok(closure) => {
                    if closure.iter().any(|supertype| supertype == self.marker) {
                        tracing::debug!(candidate = %ty.name, "discovered");
                        return Some(Ok(ty));
                    }
                }
                Err(err) => return Some(Err(err)),
            }
        }
        None
    }
}
