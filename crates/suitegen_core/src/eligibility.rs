//! Eligibility rules for test classes, as pure predicates over [`TypeDescriptor`].
//!
//! A candidate becomes a suite entry only if it is concrete, public, and has a public
//! zero-argument constructor. The predicates here do not load anything; the assembler applies
//! them to descriptors produced by whatever registry materialized the type.

use std::fmt;

use crate::types::{ConstructorDescriptor, DeclKind, TypeDescriptor};

/// Why an otherwise discovered candidate was left out of the suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    Abstract,
    NotPublic,
    NoAccessibleConstructor,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Abstract => write!(f, "abstract"),
            Rejection::NotPublic => write!(f, "not public"),
            Rejection::NoAccessibleConstructor => write!(f, "no public zero-argument constructor"),
        }
    }
}

pub fn is_concrete(ty: &TypeDescriptor) -> bool {
    !ty.is_abstract && ty.kind == DeclKind::Class
}

pub fn is_public(ty: &TypeDescriptor) -> bool {
    ty.visibility.is_public()
}

/// Check the type-level modifiers, in the order the assembler applies them.
pub fn check_modifiers(ty: &TypeDescriptor) -> Result<(), Rejection> {
    if !is_concrete(ty) {
        return Err(Rejection::Abstract);
    }
    if !is_public(ty) {
        return Err(Rejection::NotPublic);
    }
    Ok(())
}

/// Public constructors taking exactly `arity` arguments.
pub fn public_constructors(ty: &TypeDescriptor, arity: usize) -> impl Iterator<Item = &ConstructorDescriptor> {
    ty.constructors
        .iter()
        .filter(move |c| c.arity == arity && c.visibility.is_public())
}
