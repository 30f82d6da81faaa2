#![forbid(unsafe_code)]
//! suitegen: a dynamic test-suite assembler
//!
//! Given source roots and dependency locations, suitegen compiles the sources, finds every
//! declared type that transitively conforms to a marker contract, loads the candidates into an
//! isolated resolution context, and keeps the concrete, public ones with a public zero-argument
//! constructor as an ordered [`Suite`].
//!
//! ```text
//! SuiteConfig ─► Compiler ─► Compilation ─► discover ─► assemble ─► Suite
//!                               │              │            │
//!                               │        HierarchyResolver  │
//!                               └──► ArtifactLoader ◄───────┘
//! ```
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a logic error, use `.expect("INVARIANT: reason")` with a clear
//!   explanation.

pub mod assembler;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod discovery;
pub mod errors;
pub mod hierarchy;
pub mod loader;
pub mod pipeline;
pub mod suite;

pub use assembler::assemble;
pub use compiler::{Compilation, CompileRequest, Compiler, DeclCompiler};
pub use config::{ResolutionMode, SuiteConfig};
pub use discovery::discover;
pub use errors::{CompileFailure, FailureKind, SuiteError, SuiteResult};
pub use hierarchy::{HierarchyResolver, ResolutionError};
pub use loader::{ArtifactLoader, ClassSource, LoadError, ReflectError, RunnableInstance, TypeRegistry};
pub use pipeline::{SuiteBuilder, build_suite};
pub use suite::{AssemblyReport, RejectedCandidate, Suite, SuiteEntry};
