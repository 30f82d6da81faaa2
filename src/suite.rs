//! The assembled suite and its renderings.
//!
//! A [`Suite`] is read-only once assembled. Entries keep the loaded type plus a handle to the
//! registry that produced it; instantiation is left to the runner.

use std::fmt;
use std::sync::Arc;

use serde_json::{Value, json};
use suitegen_core::types::{MethodDescriptor, TypeDescriptor};
use suitegen_core::{Rejection, TypeName};

use crate::hierarchy::ResolutionError;
use crate::loader::{ReflectError, RunnableInstance, TypeRegistry};

// ============================================================================
// Entries
// ============================================================================

/// One eligible test class: the loaded type and the factory that can instantiate it.
#[derive(Clone)]
pub struct SuiteEntry {
    descriptor: Arc<TypeDescriptor>,
    registry: Arc<dyn TypeRegistry>,
}

impl fmt::Debug for SuiteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiteEntry")
            .field("type_name", &self.descriptor.name)
            .field("origin", &self.descriptor.origin)
            .finish_non_exhaustive()
    }
}

impl SuiteEntry {
    pub fn new(descriptor: Arc<TypeDescriptor>, registry: Arc<dyn TypeRegistry>) -> Self {
        Self { descriptor, registry }
    }

    /// Binary name of the test class.
    pub fn type_name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// Public zero-argument `test*` methods, in declaration order.
    pub fn test_methods(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.descriptor.test_methods()
    }

    /// Build a fresh instance through the public zero-argument constructor.
    pub fn instantiate(&self) -> Result<RunnableInstance, ReflectError> {
        self.registry.instantiate(&self.descriptor)
    }
}

// ============================================================================
// Report
// ============================================================================

/// A candidate left out of the suite, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedCandidate {
    pub name: TypeName,
    pub reason: Rejection,
}

/// What happened to the candidates that did not make it into the suite, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyReport {
    pub rejected: Vec<RejectedCandidate>,
    /// Types whose supertype graph could not be resolved
    pub skipped: Vec<ResolutionError>,
}

impl AssemblyReport {
    pub fn is_empty(&self) -> bool {
        self.rejected.is_empty() && self.skipped.is_empty()
    }
}

// ============================================================================
// Suite
// ============================================================================

/// Ordered aggregate of eligible test classes.
#[derive(Debug, Clone)]
pub struct Suite {
    name: String,
    entries: Vec<SuiteEntry>,
    report: AssemblyReport,
}

impl Suite {
    pub(crate) fn new(name: impl Into<String>, entries: Vec<SuiteEntry>, report: AssemblyReport) -> Self {
        Self {
            name: name.into(),
            entries,
            report,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[SuiteEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SuiteEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Binary names of the entries, in suite order.
    pub fn type_names(&self) -> Vec<&str> {
        self.entries.iter().map(SuiteEntry::type_name).collect()
    }

    pub fn report(&self) -> &AssemblyReport {
        &self.report
    }

    /// Plain-text listing; `verbose` appends the rejected and skipped candidates.
    pub fn render_text(&self, verbose: bool) -> String {
        let count = self.entries.len();
        let noun = if count == 1 { "test class" } else { "test classes" };
        let mut lines = vec![format!("suite '{}' ({count} {noun})", self.name)];

        for entry in &self.entries {
            let methods: Vec<_> = entry.test_methods().map(|m| m.name.as_str()).collect();
            lines.push(format!("  {} [{}]", entry.type_name(), methods.join(", ")));
        }

        if verbose {
            if !self.report.rejected.is_empty() {
                lines.push("rejected:".to_string());
                for rejected in &self.report.rejected {
                    lines.push(format!("  {}: {}", rejected.name, rejected.reason));
                }
            }
            if !self.report.skipped.is_empty() {
                lines.push("skipped:".to_string());
                for skipped in &self.report.skipped {
                    lines.push(format!("  {}: {}", skipped.candidate(), skipped));
                }
            }
        }

        lines.join("\n")
    }

    pub fn to_json(&self) -> Value {
        json!({
            "name": self.name,
            "tests": self.entries.iter().map(|entry| json!({
                "type": entry.type_name(),
                "origin": entry.descriptor().origin.to_string(),
                "test_methods": entry.test_methods().map(|m| m.name.as_str()).collect::<Vec<_>>(),
            })).collect::<Vec<_>>(),
            "rejected": self.report.rejected.iter().map(|r| json!({
                "type": r.name.as_str(),
                "reason": r.reason.to_string(),
            })).collect::<Vec<_>>(),
            "skipped": self.report.skipped.iter().map(|s| json!({
                "type": s.candidate().as_str(),
                "error": s.to_string(),
            })).collect::<Vec<_>>(),
        })
    }
}

impl<'a> IntoIterator for &'a Suite {
    type Item = &'a SuiteEntry;
    type IntoIter = std::slice::Iter<'a, SuiteEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
