//! The suite-building pipeline: preconditions → compile → load → discover → assemble.
//!
//! One [`SuiteBuilder`] runs one sequential pass per call. Every call builds its own loader, so
//! two passes never share a resolution context.

use std::sync::Arc;

use crate::assembler::assemble;
use crate::compiler::{Compilation, CompileRequest, Compiler, DeclCompiler};
use crate::config::SuiteConfig;
use crate::discovery::discover;
use crate::errors::{SuiteError, SuiteResult};
use crate::hierarchy::HierarchyResolver;
use crate::loader::{AmbientSource, ArtifactLoader, ArtifactSet, TypeRegistry};
use crate::suite::Suite;

/// Builds suites from an explicit configuration.
pub struct SuiteBuilder {
    config: SuiteConfig,
    compiler: Box<dyn Compiler>,
}

impl std::fmt::Debug for SuiteBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuiteBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SuiteBuilder {
    /// A builder using the default [`DeclCompiler`].
    pub fn new(config: SuiteConfig) -> Self {
        Self {
            config,
            compiler: Box::new(DeclCompiler::new()),
        }
    }

    /// Replace the compilation collaborator.
    pub fn with_compiler(mut self, compiler: impl Compiler + 'static) -> Self {
        self.compiler = Box::new(compiler);
        self
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Fail fast when a dependency location or source root does not exist.
    ///
    /// Dependencies are checked first, in configured order.
    pub fn check_preconditions(&self) -> SuiteResult<()> {
        if let Some(path) = self.config.dependencies.iter().find(|p| !p.exists()) {
            return Err(SuiteError::MissingDependency { path: path.clone() });
        }
        if let Some(path) = self.config.source_roots.iter().find(|p| !p.exists()) {
            return Err(SuiteError::MissingSourceRoot { path: path.clone() });
        }
        Ok(())
    }

    /// Check preconditions, then compile the source set.
    pub fn compile(&self) -> SuiteResult<Compilation> {
        self.check_preconditions()?;
        let request = CompileRequest::from_config(&self.config);
        Ok(self.compiler.compile(&request)?)
    }

    /// A fresh resolution context: compiled artifacts → dependencies → ambient parent.
    pub fn loader(&self, artifacts: ArtifactSet) -> ArtifactLoader {
        let request = CompileRequest::from_config(&self.config);
        let dependencies = self
            .config
            .dependencies
            .iter()
            .map(|location| self.compiler.open_archive(location, &request))
            .collect();
        ArtifactLoader::new(
            artifacts,
            dependencies,
            Box::new(AmbientSource::new(&self.config.universal_root)),
        )
    }

    /// Run the whole pipeline.
    #[tracing::instrument(skip_all, fields(suite = %self.config.suite_name))]
    pub fn build_suite(&self) -> SuiteResult<Suite> {
        let mut compilation = self.compile()?;
        let registry: Arc<dyn TypeRegistry> = Arc::new(self.loader(std::mem::take(&mut compilation.artifacts)));

        let resolver = HierarchyResolver::new(&compilation.types, &self.config.universal_root);
        let candidates = discover(compilation.declarations(), resolver, &self.config.marker);
        let suite = assemble(&self.config.suite_name, candidates, registry)?;

        tracing::info!(
            tests = suite.len(),
            rejected = suite.report().rejected.len(),
            skipped = suite.report().skipped.len(),
            "suite built"
        );
        Ok(suite)
    }
}

/// Build a suite with the default compiler.
pub fn build_suite(config: SuiteConfig) -> SuiteResult<Suite> {
    SuiteBuilder::new(config).build_suite()
}
