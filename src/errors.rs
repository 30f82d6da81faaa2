//! Pipeline-level errors
//!
//! Every fatal condition of [`build_suite`](crate::pipeline::SuiteBuilder::build_suite) surfaces as
//! one [`SuiteError`]. [`SuiteError::kind`] tells a harness whether the suite could not be built
//! because of the environment, the sources, or the assembly pass itself.

use std::fmt;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::loader::{LoadError, ReflectError};

/// Broad failure class, for harness reporting and CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The environment is not set up; nothing was compiled.
    Precondition,
    /// The sources do not compile; no suite was produced.
    Compilation,
    /// Loading or reflection failed while assembling the suite.
    Assembly,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Precondition => write!(f, "precondition failure"),
            FailureKind::Compilation => write!(f, "compilation failure"),
            FailureKind::Assembly => write!(f, "assembly failure"),
        }
    }
}

/// Compilation produced errors. Diagnostics are already rendered with source context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("there were compilation errors ({} diagnostic(s))", diagnostics.len())]
pub struct CompileFailure {
    pub diagnostics: Vec<String>,
}

impl CompileFailure {
    pub fn new(diagnostics: Vec<String>) -> Self {
        Self { diagnostics }
    }

    pub fn single(diagnostic: impl Into<String>) -> Self {
        Self::new(vec![diagnostic.into()])
    }
}

/// Fatal failure of a suite build.
#[derive(Debug, Error, Diagnostic)]
pub enum SuiteError {
    #[error("required dependency does not exist: {}", path.display())]
    #[diagnostic(
        code(suitegen::precondition),
        help("check the dependency locations passed with --dep")
    )]
    MissingDependency { path: PathBuf },

    #[error("source root does not exist: {}", path.display())]
    #[diagnostic(code(suitegen::precondition), help("check the source roots passed with --source"))]
    MissingSourceRoot { path: PathBuf },

    #[error(transparent)]
    #[diagnostic(code(suitegen::compile))]
    Compilation(#[from] CompileFailure),

    #[error(transparent)]
    #[diagnostic(
        code(suitegen::load),
        help("a discovered type could not be loaded; check the dependency list and name mapping")
    )]
    ArtifactNotFound(#[from] LoadError),

    #[error(transparent)]
    #[diagnostic(code(suitegen::reflect))]
    Reflection(#[from] ReflectError),
}

impl SuiteError {
    pub fn kind(&self) -> FailureKind {
        match self {
            SuiteError::MissingDependency { .. } | SuiteError::MissingSourceRoot { .. } => FailureKind::Precondition,
            SuiteError::Compilation(_) => FailureKind::Compilation,
            SuiteError::ArtifactNotFound(_) | SuiteError::Reflection(_) => FailureKind::Assembly,
        }
    }

    /// Rendered compiler diagnostics, if this is a compilation failure.
    pub fn diagnostics(&self) -> &[String] {
        match self {
            SuiteError::Compilation(failure) => &failure.diagnostics,
            _ => &[],
        }
    }
}

/// Result alias used by the pipeline.
pub type SuiteResult<T> = Result<T, SuiteError>;
