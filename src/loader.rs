//! Artifact loading: an isolated, on-demand resolution context over compiled artifacts.
//!
//! An [`ArtifactLoader`] chains three kinds of [`ClassSource`]: the freshly compiled
//! [`ArtifactSet`], the dependency locations in configured order, and an ambient parent. The first
//! source that knows a binary name wins. Materialized types are cached, so loading the same name
//! twice yields the same descriptor.
//!
//! Reflection goes through the [`TypeRegistry`] seam. The assembler only sees descriptors and
//! constructor lookups; it never knows which source produced a type.
//!
//! ## Notes
//!
//! - Constructor lookup only sees public constructors, like a public-only reflective lookup.
//! - A name that no source knows is a [`LoadError::NotFound`]; callers treat it as fatal.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use suitegen_core::eligibility::{self, Rejection};
use suitegen_core::types::{ConstructorDescriptor, DeclaredType, MethodDescriptor, Origin, TypeDescriptor};
use suitegen_core::{TypeName, Visibility};
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Failure to materialize a type by name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("type '{name}' not found (searched: {})", searched.join(", "))]
    NotFound { name: String, searched: Vec<String> },

    #[error("cannot read archive {location}: {message}")]
    Archive { location: String, message: String },
}

/// Failure while inspecting or instantiating a materialized type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReflectError {
    #[error("'{type_name}' has no public constructor taking {arity} argument(s)")]
    NoSuchConstructor { type_name: String, arity: usize },

    #[error("'{type_name}' has {count} public constructors taking {arity} argument(s)")]
    AmbiguousConstructor {
        type_name: String,
        arity: usize,
        count: usize,
    },

    #[error("cannot instantiate '{type_name}': {reason}")]
    Instantiation { type_name: String, reason: Rejection },
}

// ============================================================================
// Seams
// ============================================================================

/// One link of the resolution chain.
pub trait ClassSource: Send + Sync {
    /// Human-readable location, used in `NotFound` diagnostics.
    fn describe(&self) -> String;

    /// Look up a type by binary name. `Ok(None)` means "not here, ask the next source".
    fn find(&self, name: &str) -> Result<Option<Arc<TypeDescriptor>>, LoadError>;
}

/// Capability-typed reflection over loaded types.
pub trait TypeRegistry: Send + Sync {
    /// Materialize a type by binary name.
    fn resolve(&self, name: &str) -> Result<Arc<TypeDescriptor>, LoadError>;

    /// The unique public constructor of `ty` taking `arity` arguments.
    fn constructor(&self, ty: &TypeDescriptor, arity: usize) -> Result<ConstructorDescriptor, ReflectError> {
        let mut matches = eligibility::public_constructors(ty, arity);
        match (matches.next(), matches.count()) {
            (Some(found), 0) => Ok(*found),
            (Some(_), rest) => Err(ReflectError::AmbiguousConstructor {
                type_name: ty.name.clone(),
                arity,
                count: rest + 1,
            }),
            (None, _) => Err(ReflectError::NoSuchConstructor {
                type_name: ty.name.clone(),
                arity,
            }),
        }
    }

    /// Build a runnable instance through the public zero-argument constructor.
    fn instantiate(&self, ty: &Arc<TypeDescriptor>) -> Result<RunnableInstance, ReflectError> {
        eligibility::check_modifiers(ty).map_err(|reason| ReflectError::Instantiation {
            type_name: ty.name.clone(),
            reason,
        })?;
        let constructor = self.constructor(ty, 0)?;
        Ok(RunnableInstance {
            descriptor: Arc::clone(ty),
            constructor,
        })
    }
}

/// A test-class instance handed to the external runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnableInstance {
    pub descriptor: Arc<TypeDescriptor>,
    pub constructor: ConstructorDescriptor,
}

impl RunnableInstance {
    pub fn type_name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn test_methods(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.descriptor.test_methods()
    }
}

// ============================================================================
// Sources
// ============================================================================

/// Compiled artifacts keyed by binary name.
#[derive(Debug, Clone, Default)]
pub struct ArtifactSet {
    types: HashMap<String, Arc<TypeDescriptor>>,
}

impl ArtifactSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the artifacts for a set of declared types.
    pub fn from_types<'a>(types: impl IntoIterator<Item = &'a DeclaredType>, origin: &Origin) -> Self {
        let mut set = Self::new();
        for ty in types {
            set.insert(ty.descriptor(origin.clone()));
        }
        set
    }

    /// Insert a descriptor, replacing any artifact with the same binary name.
    pub fn insert(&mut self, descriptor: TypeDescriptor) {
        self.types.insert(descriptor.name.clone(), Arc::new(descriptor));
    }

    pub fn get(&self, name: &str) -> Option<&Arc<TypeDescriptor>> {
        self.types.get(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Binary names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl ClassSource for ArtifactSet {
    fn describe(&self) -> String {
        "compiled artifacts".to_string()
    }

    fn find(&self, name: &str) -> Result<Option<Arc<TypeDescriptor>>, LoadError> {
        Ok(self.types.get(name).cloned())
    }
}

/// Parent context: only knows the universal root type.
#[derive(Debug, Clone)]
pub struct AmbientSource {
    root: Arc<TypeDescriptor>,
}

impl AmbientSource {
    pub fn new(universal_root: &TypeName) -> Self {
        let root = DeclaredType::class(universal_root.clone())
            .with_constructor(0, Visibility::Public)
            .descriptor(Origin::Ambient);
        Self { root: Arc::new(root) }
    }
}

impl ClassSource for AmbientSource {
    fn describe(&self) -> String {
        Origin::Ambient.to_string()
    }

    fn find(&self, name: &str) -> Result<Option<Arc<TypeDescriptor>>, LoadError> {
        Ok((self.root.name == name).then(|| Arc::clone(&self.root)))
    }
}

// ============================================================================
// Loader
// ============================================================================

/// Isolated resolution context: compiled → dependencies → parent.
pub struct ArtifactLoader {
    compiled: ArtifactSet,
    dependencies: Vec<Box<dyn ClassSource>>,
    parent: Box<dyn ClassSource>,
    cache: Mutex<HashMap<String, Arc<TypeDescriptor>>>,
    /// Binary names in materialization order
    materialized: Mutex<Vec<String>>,
}

impl fmt::Debug for ArtifactLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactLoader")
            .field("compiled", &self.compiled.len())
            .field(
                "dependencies",
                &self.dependencies.iter().map(|d| d.describe()).collect::<Vec<_>>(),
            )
            .field("parent", &self.parent.describe())
            .finish()
    }
}

impl ArtifactLoader {
    pub fn new(compiled: ArtifactSet, dependencies: Vec<Box<dyn ClassSource>>, parent: Box<dyn ClassSource>) -> Self {
        Self {
            compiled,
            dependencies,
            parent,
            cache: Mutex::new(HashMap::new()),
            materialized: Mutex::new(Vec::new()),
        }
    }

    /// Load a type by binary name, consulting the chain on first use.
    pub fn materialize(&self, name: &str) -> Result<Arc<TypeDescriptor>, LoadError> {
        if let Some(cached) = self.cache.lock().unwrap_or_else(PoisonError::into_inner).get(name) {
            return Ok(Arc::clone(cached));
        }

        let descriptor = self.lookup(name)?;
        tracing::info!(name, origin = %descriptor.origin, "materialized");
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), Arc::clone(&descriptor));
        self.materialized
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(name.to_string());
        Ok(descriptor)
    }

    fn lookup(&self, name: &str) -> Result<Arc<TypeDescriptor>, LoadError> {
        if let Some(found) = self.compiled.find(name)? {
            return Ok(found);
        }
        for source in &self.dependencies {
            if let Some(found) = source.find(name)? {
                return Ok(found);
            }
        }
        if let Some(found) = self.parent.find(name)? {
            return Ok(found);
        }

        let searched = std::iter::once(self.compiled.describe())
            .chain(self.dependencies.iter().map(|d| d.describe()))
            .chain(std::iter::once(self.parent.describe()))
            .collect();
        Err(LoadError::NotFound {
            name: name.to_string(),
            searched,
        })
    }

    /// Binary names materialized so far, in order.
    pub fn materialized(&self) -> Vec<String> {
        self.materialized.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl TypeRegistry for ArtifactLoader {
    fn resolve(&self, name: &str) -> Result<Arc<TypeDescriptor>, LoadError> {
        self.materialize(name)
    }
}
