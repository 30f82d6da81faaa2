//! Suite-building configuration
//!
//! Everything the pipeline needs is carried by an explicit [`SuiteConfig`] value that is threaded
//! through compilation, loading and discovery. There is no process-wide compiler environment.

use std::fmt;
use std::path::PathBuf;

use suitegen_core::TypeName;
use suitegen_core::lang::conventions::{DEFAULT_MARKER, DEFAULT_SUITE_NAME, SOURCE_EXTENSION, UNIVERSAL_ROOT};

/// How the compiler treats supertype names it cannot resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionMode {
    /// Keep unresolved supertypes; discovery skips the affected candidates.
    #[default]
    Lenient,
    /// Unresolved supertypes and duplicate constructor overloads are compile errors.
    Strict,
}

impl fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionMode::Lenient => write!(f, "lenient"),
            ResolutionMode::Strict => write!(f, "strict"),
        }
    }
}

/// Suite-building configuration
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Name of the assembled suite
    pub suite_name: String,
    /// Source roots compiled and walked by discovery, in traversal order
    pub source_roots: Vec<PathBuf>,
    /// Dependency locations (archives), in resolution order
    pub dependencies: Vec<PathBuf>,
    /// The marker contract a test class must transitively conform to
    pub marker: TypeName,
    /// Implicit supertype of every class, excluded from closures
    pub universal_root: TypeName,
    pub mode: ResolutionMode,
    /// Extension of source files, without the dot
    pub source_extension: String,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            suite_name: DEFAULT_SUITE_NAME.to_string(),
            source_roots: Vec::new(),
            dependencies: Vec::new(),
            marker: well_known(DEFAULT_MARKER),
            universal_root: well_known(UNIVERSAL_ROOT),
            mode: ResolutionMode::default(),
            source_extension: SOURCE_EXTENSION.to_string(),
        }
    }
}

fn well_known(name: &str) -> TypeName {
    TypeName::parse(name).expect("INVARIANT: well-known type names are valid")
}

impl SuiteConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the suite name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.suite_name = name.into();
        self
    }

    /// Append a source root
    pub fn with_source_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.source_roots.push(root.into());
        self
    }

    /// Append a dependency location
    pub fn with_dependency(mut self, location: impl Into<PathBuf>) -> Self {
        self.dependencies.push(location.into());
        self
    }

    /// Set the marker contract
    pub fn with_marker(mut self, marker: TypeName) -> Self {
        self.marker = marker;
        self
    }

    /// Set the resolution mode
    pub fn with_mode(mut self, mode: ResolutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the source file extension (without the dot)
    pub fn with_source_extension(mut self, extension: impl Into<String>) -> Self {
        self.source_extension = extension.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // Default config tests
    // ========================================

    #[test]
    fn test_default_suite_name() {
        assert_eq!(SuiteConfig::default().suite_name, "stdlib_test");
    }

    #[test]
    fn test_default_marker_and_root() {
        let config = SuiteConfig::default();
        assert_eq!(config.marker.as_str(), "junit.framework.Test");
        assert_eq!(config.universal_root.as_str(), "lang.Any");
    }

    #[test]
    fn test_default_mode_is_lenient() {
        assert_eq!(SuiteConfig::default().mode, ResolutionMode::Lenient);
    }

    #[test]
    fn test_default_has_no_roots_or_dependencies() {
        let config = SuiteConfig::default();
        assert!(config.source_roots.is_empty());
        assert!(config.dependencies.is_empty());
        assert_eq!(config.source_extension, "incn");
    }

    // ========================================
    // Builder pattern tests
    // ========================================

    #[test]
    fn test_builder_chain() {
        let config = SuiteConfig::new()
            .with_name("kunit")
            .with_source_root("stdlib")
            .with_source_root("kunit/src")
            .with_dependency("libs/junit.incn")
            .with_marker(TypeName::parse("kunit.Marker").unwrap())
            .with_mode(ResolutionMode::Strict)
            .with_source_extension("decl");
        assert_eq!(config.suite_name, "kunit");
        assert_eq!(config.source_roots, vec![PathBuf::from("stdlib"), PathBuf::from("kunit/src")]);
        assert_eq!(config.dependencies, vec![PathBuf::from("libs/junit.incn")]);
        assert_eq!(config.marker.as_str(), "kunit.Marker");
        assert_eq!(config.mode, ResolutionMode::Strict);
        assert_eq!(config.source_extension, "decl");
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(ResolutionMode::Lenient.to_string(), "lenient");
        assert_eq!(ResolutionMode::Strict.to_string(), "strict");
    }
}
