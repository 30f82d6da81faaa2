//! End-to-end tests for the suite-building pipeline
//!
//! The fixture tree under `tests/fixtures` mirrors a small standard library: `libs/` holds the
//! dependency archives, `stdlib/` the source roots. Ad-hoc source sets are written to a scratch
//! directory under the system temp dir.
//!
//! Review snapshot changes with: `cargo insta review`

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use suitegen::compiler::{Compilation, CompileRequest, Compiler, DeclCompiler};
use suitegen::loader::{ArtifactSet, ClassSource};
use suitegen::{CompileFailure, FailureKind, ResolutionMode, SuiteBuilder, SuiteConfig, SuiteError, build_suite};

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// The fixture configuration: stdlib sources against the junit and runtime archives.
fn stdlib_config() -> SuiteConfig {
    let root = fixtures();
    SuiteConfig::new()
        .with_source_root(root.join("stdlib"))
        .with_dependency(root.join("libs/junit.incn"))
        .with_dependency(root.join("libs/runtime.incn"))
}

/// A fresh scratch directory holding `files` (relative path, contents).
fn scratch(test: &str, files: &[(&str, &str)]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("suitegen-{}-{test}", std::process::id()));
    if dir.exists() {
        fs::remove_dir_all(&dir).unwrap();
    }
    for (relative, contents) in files {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
    }
    dir
}

/// Sources in `dir` against the junit archive only.
fn config_for(dir: &Path) -> SuiteConfig {
    SuiteConfig::new()
        .with_source_root(dir)
        .with_dependency(fixtures().join("libs/junit.incn"))
}

fn copy_tree(from: &Path, to: &Path) {
    fs::create_dir_all(to).unwrap();
    for entry in fs::read_dir(from).unwrap() {
        let path = entry.unwrap().path();
        let target = to.join(path.file_name().unwrap());
        if path.is_dir() {
            copy_tree(&path, &target);
        } else {
            fs::copy(&path, &target).unwrap();
        }
    }
}

// ============================================================================
// Fixture suite
// ============================================================================

#[test]
fn test_stdlib_suite_snapshot() {
    let suite = build_suite(stdlib_config()).unwrap();
    let rendered = suite.render_text(true);
    insta::assert_snapshot!("stdlib_suite", rendered);
}

#[test]
fn test_stdlib_suite_json_snapshot() {
    let suite = build_suite(stdlib_config()).unwrap();
    let rendered = serde_json::to_string_pretty(&suite.to_json()).unwrap();
    insta::assert_snapshot!("stdlib_suite_json", rendered);
}

#[test]
fn test_stdlib_suite_follows_traversal_order() {
    let suite = build_suite(stdlib_config()).unwrap();
    assert_eq!(suite.name(), "stdlib_test");
    assert_eq!(
        suite.type_names(),
        vec!["std.collections.ListTest", "std.collections.MapTest", "std.strings.StringTest"]
    );
    assert!(suite.report().skipped.is_empty());
}

#[test]
fn test_entries_instantiate_through_their_context() {
    let suite = build_suite(stdlib_config()).unwrap();
    for entry in &suite {
        let instance = entry.instantiate().unwrap();
        assert_eq!(instance.type_name(), entry.type_name());
        assert_eq!(instance.constructor.arity, 0);
    }
}

#[test]
fn test_building_twice_gives_equal_suites() {
    let first = build_suite(stdlib_config()).unwrap();
    let second = build_suite(stdlib_config()).unwrap();
    assert_eq!(first.type_names(), second.type_names());
    assert_eq!(first.render_text(true), second.render_text(true));
}

#[test]
fn test_copies_of_the_same_sources_give_equal_suites() {
    let dir = scratch("copies", &[]);
    let (left, right) = (dir.join("left"), dir.join("right"));
    copy_tree(&fixtures().join("stdlib"), &left);
    copy_tree(&fixtures().join("stdlib"), &right);

    let build = |root: &Path| {
        let config = SuiteConfig::new()
            .with_source_root(root)
            .with_dependency(fixtures().join("libs/junit.incn"))
            .with_dependency(fixtures().join("libs/runtime.incn"));
        build_suite(config).unwrap()
    };
    let (a, b) = (build(&left), build(&right));
    assert_eq!(a.type_names(), b.type_names());
    assert_eq!(a.report().rejected, b.report().rejected);
}

#[test]
fn test_runtime_archive_is_optional() {
    let config = SuiteConfig::new()
        .with_source_root(fixtures().join("stdlib"))
        .with_dependency(fixtures().join("libs/junit.incn"));
    let suite = build_suite(config).unwrap();
    assert_eq!(suite.len(), 3);
}

// ============================================================================
// Assembly scenarios
// ============================================================================

#[test]
fn test_concrete_test_class_is_kept_and_abstract_one_rejected() {
    let dir = scratch(
        "foo-bar",
        &[(
            "demo/foo.incn",
            "package demo\n\nimport junit.framework.Test\n\npub class Foo with Test:\n    pub def test_it(self):\n        pass\n\npub abstract class Bar with Test\n",
        )],
    );
    let suite = build_suite(config_for(&dir)).unwrap();
    assert_eq!(suite.type_names(), vec!["demo.Foo"]);
    assert_eq!(suite.report().rejected.len(), 1);
    assert_eq!(suite.report().rejected[0].name.as_str(), "demo.Bar");
}

#[test]
fn test_class_without_nullary_constructor_gives_empty_suite() {
    let dir = scratch(
        "baz",
        &[(
            "demo/baz.incn",
            "package demo\n\nimport junit.framework.Test\n\npub class Baz with Test:\n    pub def __init__(self, x: int)\n",
        )],
    );
    let suite = build_suite(config_for(&dir)).unwrap();
    assert!(suite.is_empty());
    assert_eq!(suite.report().rejected.len(), 1);
}

#[test]
fn test_class_outside_the_marker_hierarchy_is_not_a_candidate() {
    let dir = scratch(
        "plain",
        &[("demo/plain.incn", "package demo\n\npub class Plain\n\npub def helper() -> int:\n    return 1\n")],
    );
    let suite = build_suite(config_for(&dir)).unwrap();
    assert!(suite.is_empty());
    assert!(suite.report().is_empty());
}

#[test]
fn test_custom_marker() {
    let dir = scratch(
        "marker",
        &[(
            "demo/marker.incn",
            "package demo\n\npub trait Spec\n\npub class ListSpec with Spec\n\npub class Other\n",
        )],
    );
    let config = config_for(&dir).with_marker(suitegen_core::TypeName::parse("demo.Spec").unwrap());
    let suite = build_suite(config).unwrap();
    assert_eq!(suite.type_names(), vec!["demo.ListSpec"]);
}

// ============================================================================
// Failure modes
// ============================================================================

/// Delegates to [`DeclCompiler`] and records whether `compile` ran.
struct WatchedCompiler {
    called: Arc<AtomicBool>,
}

impl Compiler for WatchedCompiler {
    fn compile(&self, request: &CompileRequest) -> Result<Compilation, CompileFailure> {
        self.called.store(true, Ordering::SeqCst);
        DeclCompiler::new().compile(request)
    }

    fn open_archive(&self, location: &Path, request: &CompileRequest) -> Box<dyn ClassSource> {
        DeclCompiler::new().open_archive(location, request)
    }
}

#[test]
fn test_missing_dependency_fails_before_compiling() {
    let called = Arc::new(AtomicBool::new(false));
    let config = stdlib_config().with_dependency(fixtures().join("libs/missing.incn"));
    let builder = SuiteBuilder::new(config).with_compiler(WatchedCompiler { called: called.clone() });

    let err = builder.build_suite().unwrap_err();
    assert_eq!(err.kind(), FailureKind::Precondition);
    assert!(matches!(&err, SuiteError::MissingDependency { path } if path.ends_with("missing.incn")));
    assert!(!called.load(Ordering::SeqCst));
}

#[test]
fn test_missing_source_root_fails_before_compiling() {
    let called = Arc::new(AtomicBool::new(false));
    let config = stdlib_config().with_source_root(fixtures().join("nowhere"));
    let builder = SuiteBuilder::new(config).with_compiler(WatchedCompiler { called: called.clone() });

    let err = builder.build_suite().unwrap_err();
    assert!(matches!(err, SuiteError::MissingSourceRoot { .. }));
    assert!(!called.load(Ordering::SeqCst));
}

#[test]
fn test_watched_compiler_runs_when_preconditions_hold() {
    let called = Arc::new(AtomicBool::new(false));
    let builder = SuiteBuilder::new(stdlib_config()).with_compiler(WatchedCompiler { called: called.clone() });
    assert_eq!(builder.build_suite().unwrap().len(), 3);
    assert!(called.load(Ordering::SeqCst));
}

#[test]
fn test_syntax_error_is_a_compilation_failure() {
    let dir = scratch("syntax", &[("demo/broken.incn", "package demo\n\npub class (Oops\n")]);
    let err = build_suite(config_for(&dir)).unwrap_err();
    assert_eq!(err.kind(), FailureKind::Compilation);
    assert!(!err.diagnostics().is_empty());
    assert!(err.diagnostics().iter().any(|d| d.contains("broken.incn")));
}

#[test]
fn test_broken_dependency_is_a_compilation_failure() {
    let dir = scratch(
        "broken-dep",
        &[("src/demo/ok.incn", "package demo\n\npub class Fine\n"), ("deps/bad.incn", "pub class\n")],
    );
    let config = SuiteConfig::new()
        .with_source_root(dir.join("src"))
        .with_dependency(dir.join("deps/bad.incn"));
    let err = build_suite(config).unwrap_err();
    assert_eq!(err.kind(), FailureKind::Compilation);
}

#[test]
fn test_duplicate_types_in_the_source_set_fail_compilation() {
    let dir = scratch(
        "duplicate",
        &[
            ("a/one.incn", "package demo\n\npub class Twin\n"),
            ("b/two.incn", "package demo\n\npub class Twin\n"),
        ],
    );
    let err = build_suite(config_for(&dir)).unwrap_err();
    assert_eq!(err.kind(), FailureKind::Compilation);
    assert!(err.diagnostics().iter().any(|d| d.contains("duplicate type 'demo.Twin'")));
}

#[cfg(unix)]
#[test]
fn test_symlink_loop_in_a_source_root_is_compiled_once() {
    let dir = scratch(
        "symlink-loop",
        &[(
            "demo/a.incn",
            "package demo\n\nimport junit.framework.Test\n\npub class Foo with Test\n",
        )],
    );
    std::os::unix::fs::symlink(&dir, dir.join("demo/loop")).unwrap();

    let suite = build_suite(config_for(&dir)).unwrap();
    assert_eq!(suite.type_names(), vec!["demo.Foo"]);
}

const ORPHAN: &str = "package demo\n\nimport junit.framework.Test\n\npub class Orphan extends Missing\n\npub class Kept with Test\n";

#[test]
fn test_lenient_mode_skips_unresolvable_candidates() {
    let dir = scratch("lenient", &[("demo/orphan.incn", ORPHAN)]);
    let suite = build_suite(config_for(&dir)).unwrap();
    assert_eq!(suite.type_names(), vec!["demo.Kept"]);
    assert_eq!(suite.report().skipped.len(), 1);
    assert_eq!(suite.report().skipped[0].candidate().as_str(), "demo.Orphan");
}

#[test]
fn test_strict_mode_rejects_unresolved_supertypes_at_compile_time() {
    let dir = scratch("strict", &[("demo/orphan.incn", ORPHAN)]);
    let config = config_for(&dir).with_mode(ResolutionMode::Strict);
    let err = build_suite(config).unwrap_err();
    assert_eq!(err.kind(), FailureKind::Compilation);
    assert!(err.diagnostics().iter().any(|d| d.contains("Missing")));
}

#[test]
fn test_ambiguous_constructor_aborts_assembly() {
    let dir = scratch(
        "ambiguous",
        &[(
            "demo/twice.incn",
            "package demo\n\nimport junit.framework.Test\n\npub class Twice with Test:\n    pub def __init__(self)\n    pub def __init__(self)\n",
        )],
    );
    let err = build_suite(config_for(&dir)).unwrap_err();
    assert_eq!(err.kind(), FailureKind::Assembly);
    assert!(matches!(err, SuiteError::Reflection(_)));
}

/// Compiles normally, then loses every compiled artifact.
struct ForgetfulCompiler;

impl Compiler for ForgetfulCompiler {
    fn compile(&self, request: &CompileRequest) -> Result<Compilation, CompileFailure> {
        let mut compilation = DeclCompiler::new().compile(request)?;
        compilation.artifacts = ArtifactSet::new();
        Ok(compilation)
    }

    fn open_archive(&self, location: &Path, request: &CompileRequest) -> Box<dyn ClassSource> {
        DeclCompiler::new().open_archive(location, request)
    }
}

#[test]
fn test_candidate_missing_from_every_source_aborts_assembly() {
    let builder = SuiteBuilder::new(stdlib_config()).with_compiler(ForgetfulCompiler);
    let err = builder.build_suite().unwrap_err();
    assert_eq!(err.kind(), FailureKind::Assembly);
    assert!(matches!(err, SuiteError::ArtifactNotFound(_)));
    // The first candidate in traversal order is the one reported
    assert!(err.to_string().contains("kunit.StdTest"));
}

#[test]
fn test_loader_prefers_compiled_artifacts_and_records_materialization() {
    use suitegen::loader::TypeRegistry;

    let builder = SuiteBuilder::new(stdlib_config());
    let compilation = builder.compile().unwrap();
    let loader = builder.loader(compilation.artifacts);

    let list = loader.resolve("std.collections.ListTest").unwrap();
    assert_eq!(list.origin, suitegen_core::Origin::Compiled);
    let test_case = loader.resolve("junit.framework.TestCase").unwrap();
    assert!(matches!(test_case.origin, suitegen_core::Origin::Archive(_)));

    // Cached: the second lookup is not materialized again
    loader.resolve("std.collections.ListTest").unwrap();
    assert_eq!(
        loader.materialized(),
        vec!["std.collections.ListTest".to_string(), "junit.framework.TestCase".to_string()]
    );
}
