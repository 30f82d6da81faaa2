//! The compilation collaborator
//!
//! The pipeline only depends on the [`Compiler`] trait: give it source roots and dependency
//! locations, get back either a [`CompileFailure`] or a [`Compilation`] (declarations in traversal
//! order, the full type table, and the compiled artifacts). [`DeclCompiler`] is the default
//! implementation over declaration sources.
//!
//! ## Modules
//!
//! - `resolve` - Import scopes and supertype name resolution
//! - `lower` - Parsed declarations → declared types
//! - `archive` - Lazily opened dependency locations
//!
//! ## Traversal order
//!
//! Roots are compiled in configured order. Inside a directory root, files are taken in sorted path
//! order; hidden directories and `target` are skipped. Declarations keep their order within a file.

pub mod archive;
mod lower;
mod resolve;

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use suitegen_core::names::is_identifier;
use suitegen_core::types::{Declaration, Origin};
use suitegen_core::{DeclKind, TypeName, TypeTable};
use suitegen_syntax::ast::{self, Program, Span};
use suitegen_syntax::diagnostics::{CompileError, format_error};
use suitegen_syntax::{lexer, parser};

pub use archive::ArchiveSource;

use crate::config::{ResolutionMode, SuiteConfig};
use crate::errors::CompileFailure;
use crate::loader::{ArtifactSet, ClassSource};
use lower::{LowerOptions, lower};
use resolve::KnownTypes;

// ============================================================================
// Collaborator interface
// ============================================================================

/// Input to one compilation.
#[derive(Debug, Clone)]
pub struct CompileRequest {
    pub source_roots: Vec<PathBuf>,
    pub dependencies: Vec<PathBuf>,
    pub mode: ResolutionMode,
    /// Source file extension, without the dot
    pub extension: String,
    pub universal_root: TypeName,
}

impl CompileRequest {
    pub fn from_config(config: &SuiteConfig) -> Self {
        Self {
            source_roots: config.source_roots.clone(),
            dependencies: config.dependencies.clone(),
            mode: config.mode,
            extension: config.source_extension.clone(),
            universal_root: config.universal_root.clone(),
        }
    }
}

/// Declarations of one compiled source file.
#[derive(Debug, Clone)]
pub struct CompiledUnit {
    pub path: PathBuf,
    pub package: String,
    /// Top-level declarations in source order
    pub declarations: Vec<Declaration>,
}

/// Output of a successful compilation.
#[derive(Debug, Clone)]
pub struct Compilation {
    /// Compiled source files in traversal order
    pub units: Vec<CompiledUnit>,
    /// Every declared type visible to the compilation, dependencies included
    pub types: TypeTable,
    /// Loadable artifacts for the compiled sources only
    pub artifacts: ArtifactSet,
}

impl Compilation {
    /// All top-level declarations of the source set, in traversal order.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.units.iter().flat_map(|unit| unit.declarations.iter())
    }
}

/// Turns source roots into declarations and loadable artifacts.
pub trait Compiler: Send + Sync {
    fn compile(&self, request: &CompileRequest) -> Result<Compilation, CompileFailure>;

    /// Open a dependency location as a class source for the loader.
    fn open_archive(&self, location: &Path, request: &CompileRequest) -> Box<dyn ClassSource>;
}

// ============================================================================
// Default compiler
// ============================================================================

/// Declaration-level compiler for `.incn`-style sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclCompiler;

impl DeclCompiler {
    pub fn new() -> Self {
        Self
    }
}

impl Compiler for DeclCompiler {
    #[tracing::instrument(skip_all, fields(roots = request.source_roots.len(), deps = request.dependencies.len(), mode = %request.mode))]
    fn compile(&self, request: &CompileRequest) -> Result<Compilation, CompileFailure> {
        let mut diagnostics = Vec::new();
        let sources = read_all(&request.source_roots, &request.extension, &mut diagnostics);
        let archives = read_all(&request.dependencies, &request.extension, &mut diagnostics);
        if !diagnostics.is_empty() {
            return Err(CompileFailure::new(diagnostics));
        }

        // Sources are declared first so they shadow archive types of the same name
        let mut known = KnownTypes::new(&request.universal_root);
        let mut declared_in: HashMap<TypeName, &Path> = HashMap::new();
        for file in &sources {
            for (name, kind, span) in file.type_names() {
                if let Some(first) = declared_in.get(&name) {
                    let err = CompileError::resolution(format!("duplicate type '{name}'"), span)
                        .with_note(format!("first declared in {}", first.display()));
                    diagnostics.push(file.render(&err));
                    continue;
                }
                declared_in.insert(name.clone(), &file.path);
                known.declare(name, kind);
            }
        }
        for file in &archives {
            for (name, kind, _) in file.type_names() {
                known.declare(name, kind);
            }
        }

        let mut types = TypeTable::new();
        let archive_options = LowerOptions {
            mode: ResolutionMode::Lenient,
            universal_root: &request.universal_root,
        };
        for file in &archives {
            let lowered = lower(&file.program, &file.package, &known, &archive_options);
            diagnostics.extend(lowered.errors.iter().map(|e| file.render(e)));
            for ty in lowered.declarations.iter().filter_map(Declaration::as_type) {
                if !types.contains(&ty.name) {
                    types.insert(ty.clone());
                }
            }
        }

        let source_options = LowerOptions {
            mode: request.mode,
            universal_root: &request.universal_root,
        };
        let mut units = Vec::with_capacity(sources.len());
        for file in &sources {
            let lowered = lower(&file.program, &file.package, &known, &source_options);
            diagnostics.extend(lowered.errors.iter().map(|e| file.render(e)));
            for ty in lowered.declarations.iter().filter_map(Declaration::as_type) {
                types.insert(ty.clone());
            }
            units.push(CompiledUnit {
                path: file.path.clone(),
                package: file.package.clone(),
                declarations: lowered.declarations,
            });
        }

        if !diagnostics.is_empty() {
            tracing::debug!(errors = diagnostics.len(), "compilation failed");
            return Err(CompileFailure::new(diagnostics));
        }

        let artifacts = ArtifactSet::from_types(
            units
                .iter()
                .flat_map(|unit| unit.declarations.iter().filter_map(Declaration::as_type)),
            &Origin::Compiled,
        );
        tracing::info!(files = units.len(), types = artifacts.len(), "compiled source set");

        Ok(Compilation {
            units,
            types,
            artifacts,
        })
    }

    fn open_archive(&self, location: &Path, request: &CompileRequest) -> Box<dyn ClassSource> {
        Box::new(ArchiveSource::new(
            location,
            &request.extension,
            request.universal_root.clone(),
        ))
    }
}

// ============================================================================
// Reading sources
// ============================================================================

/// A parsed source file.
#[derive(Debug)]
pub(crate) struct SourceFile {
    pub(crate) path: PathBuf,
    pub(crate) text: String,
    pub(crate) program: Program,
    pub(crate) package: String,
}

impl SourceFile {
    /// Canonical names of the class-like declarations, in source order.
    pub(crate) fn type_names(&self) -> impl Iterator<Item = (TypeName, DeclKind, Span)> + '_ {
        self.program.declarations.iter().filter_map(|decl| match &decl.node {
            ast::Declaration::Class(c) => Some((TypeName::new(&self.package, &c.name), DeclKind::Class, decl.span)),
            ast::Declaration::Trait(t) => Some((TypeName::new(&self.package, &t.name), DeclKind::Trait, decl.span)),
            _ => None,
        })
    }

    pub(crate) fn render(&self, error: &CompileError) -> String {
        format_error(&self.path.display().to_string(), &self.text, error)
    }
}

fn read_all(locations: &[PathBuf], extension: &str, diagnostics: &mut Vec<String>) -> Vec<SourceFile> {
    let mut files = Vec::new();
    for location in locations {
        match read_location(location, extension) {
            Ok(read) => files.extend(read),
            Err(errors) => diagnostics.extend(errors),
        }
    }
    files
}

/// Read and parse every source file of a location (a single file or a directory tree).
///
/// Returns rendered diagnostics for unreadable or malformed files.
pub(crate) fn read_location(location: &Path, extension: &str) -> Result<Vec<SourceFile>, Vec<String>> {
    let (paths, base) = if location.is_file() {
        (vec![location.to_path_buf()], location.parent().unwrap_or(Path::new("")))
    } else {
        let paths = collect_source_files(location, extension)
            .map_err(|e| vec![format!("error: cannot read directory {}: {e}", location.display())])?;
        (paths, location)
    };

    let mut files = Vec::with_capacity(paths.len());
    let mut diagnostics = Vec::new();
    for path in paths {
        match parse_file(&path, base) {
            Ok(file) => files.push(file),
            Err(errors) => diagnostics.extend(errors),
        }
    }

    if diagnostics.is_empty() {
        Ok(files)
    } else {
        Err(diagnostics)
    }
}

fn parse_file(path: &Path, base: &Path) -> Result<SourceFile, Vec<String>> {
    let file_name = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|e| vec![format!("error: cannot read {file_name}: {e}")])?;

    let render = |errors: Vec<CompileError>| -> Vec<String> {
        errors.iter().map(|e| format_error(&file_name, &text, e)).collect()
    };
    let tokens = lexer::lex(&text).map_err(render)?;
    let program = parser::parse(&tokens).map_err(render)?;

    let package = match program.package() {
        Some(name) => name.dotted(),
        None => default_package(path, base).map_err(|message| vec![format!("error: {message}\n  --> {file_name}")])?,
    };
    tracing::trace!(path = %file_name, package = %package, "parsed");

    Ok(SourceFile {
        path: path.to_path_buf(),
        text,
        program,
        package,
    })
}

/// Package implied by a file's directory under its root.
fn default_package(path: &Path, base: &Path) -> Result<String, String> {
    let dir = path.parent().unwrap_or(Path::new(""));
    let relative = dir.strip_prefix(base).unwrap_or(Path::new(""));

    let mut segments = Vec::new();
    for component in relative.components() {
        let segment = component.as_os_str().to_string_lossy();
        if !is_identifier(&segment) {
            return Err(format!(
                "cannot derive a package name from directory '{segment}'; add a 'package' declaration"
            ));
        }
        segments.push(segment.into_owned());
    }
    Ok(segments.join("."))
}

/// Source files under `dir`, sorted.
fn collect_source_files(dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk(dir, extension, &mut files)?;
    files.sort();
    Ok(files)
}

/// Symlinked directories are not descended into, so a link back up the tree cannot loop.
fn walk(dir: &Path, extension: &str, files: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let entry_path = entry.path();
        let name = entry_path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if file_type.is_dir() {
            if !name.starts_with('.') && name != "target" {
                walk(&entry_path, extension, files)?;
            }
        } else if entry_path.is_file() && entry_path.extension().and_then(|e| e.to_str()) == Some(extension) {
            files.push(entry_path);
        }
    }
    Ok(())
}
