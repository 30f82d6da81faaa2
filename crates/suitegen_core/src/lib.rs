//! Provide the pure type model shared by the suitegen compiler front end, loader and assembler.
//!
//! This crate is intentionally small and dependency-light. It contains:
//! - canonical type names and the source-name → load-name mapping ([`names`]),
//! - declared types and reflective type descriptors ([`types`]),
//! - the generic transitive-closure utility used for supertype resolution ([`closure`]),
//! - data-driven eligibility predicates over descriptors ([`eligibility`]),
//! - the language vocabulary and naming conventions ([`lang`]).
//!
//! ## Notes
//!
//! - This is a “semantic core” crate: **no IO**, no global state, and no compiler-specific types.
//! - Loading, compiling and reporting live in the `suitegen` crate and depend on this one, never the
//!   other way around.

pub mod closure;
pub mod eligibility;
pub mod lang;
pub mod names;
pub mod types;

pub use closure::{Closure, closure};
pub use eligibility::Rejection;
pub use names::TypeName;
pub use types::{
    ConstructorDescriptor, DeclKind, DeclaredType, Declaration, FunctionSig, MethodDescriptor, Origin, SupertypeRef,
    TypeDescriptor, TypeTable, Visibility,
};
