//! Dependency locations as lazily opened class sources.
//!
//! An archive is read and lowered on the first lookup and kept for the lifetime of the loader.
//! A location that fails to read makes every lookup fail with [`LoadError::Archive`]; a miss is
//! only reported for archives that opened cleanly.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use suitegen_core::types::{Declaration, Origin, TypeDescriptor};
use suitegen_core::TypeName;

use super::lower::{LowerOptions, lower};
use super::read_location;
use super::resolve::KnownTypes;
use crate::config::ResolutionMode;
use crate::loader::{ArtifactSet, ClassSource, LoadError};

pub struct ArchiveSource {
    location: PathBuf,
    extension: String,
    universal_root: TypeName,
    artifacts: OnceLock<Result<ArtifactSet, LoadError>>,
}

impl std::fmt::Debug for ArchiveSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveSource")
            .field("location", &self.location)
            .field("opened", &self.artifacts.get().is_some())
            .finish()
    }
}

impl ArchiveSource {
    pub fn new(location: &Path, extension: &str, universal_root: TypeName) -> Self {
        Self {
            location: location.to_path_buf(),
            extension: extension.to_string(),
            universal_root,
            artifacts: OnceLock::new(),
        }
    }

    fn artifacts(&self) -> Result<&ArtifactSet, LoadError> {
        self.artifacts.get_or_init(|| self.open()).as_ref().map_err(Clone::clone)
    }

    fn open(&self) -> Result<ArtifactSet, LoadError> {
        let archive_error = |messages: Vec<String>| LoadError::Archive {
            location: self.location.display().to_string(),
            message: messages.join("\n"),
        };

        let files = read_location(&self.location, &self.extension).map_err(archive_error)?;

        let mut known = KnownTypes::new(&self.universal_root);
        for file in &files {
            for (name, kind, _) in file.type_names() {
                known.declare(name, kind);
            }
        }

        let options = LowerOptions {
            mode: ResolutionMode::Lenient,
            universal_root: &self.universal_root,
        };
        let origin = Origin::Archive(self.location.clone());
        let mut artifacts = ArtifactSet::new();
        let mut errors = Vec::new();
        for file in &files {
            let lowered = lower(&file.program, &file.package, &known, &options);
            errors.extend(lowered.errors.iter().map(|e| file.render(e)));
            for ty in lowered.declarations.iter().filter_map(Declaration::as_type) {
                if artifacts.get(&ty.name.binary_name()).is_none() {
                    artifacts.insert(ty.descriptor(origin.clone()));
                }
            }
        }
        if !errors.is_empty() {
            return Err(archive_error(errors));
        }

        tracing::debug!(location = %self.location.display(), types = artifacts.len(), "opened archive");
        Ok(artifacts)
    }
}

impl ClassSource for ArchiveSource {
    fn describe(&self) -> String {
        self.location.display().to_string()
    }

    fn find(&self, name: &str) -> Result<Option<Arc<TypeDescriptor>>, LoadError> {
        Ok(self.artifacts()?.get(name).cloned())
    }
}
