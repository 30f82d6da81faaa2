//! Shared conventions (well-known identifiers and type names).

/// Method name that declares a constructor.
pub const CONSTRUCTOR_NAME: &str = "__init__";

/// Prefix that marks a public zero-argument method as a test method.
pub const TEST_METHOD_PREFIX: &str = "test";

/// Package whose types are visible without an import.
pub const PRELUDE_PACKAGE: &str = "lang";

/// Implicit root of every supertype graph; never reported as a supertype.
pub const UNIVERSAL_ROOT: &str = "lang.Any";

/// Default marker contract: the base test-case interface.
pub const DEFAULT_MARKER: &str = "junit.framework.Test";

/// Default source file extension.
pub const SOURCE_EXTENSION: &str = "incn";

/// Default name of the assembled suite.
pub const DEFAULT_SUITE_NAME: &str = "stdlib_test";
