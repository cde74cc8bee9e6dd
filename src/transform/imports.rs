//! Import resolution
//!
//! Two-phase linking of cross-namespace type references. The scan pass
//! needs only reference topology and runs before any renaming: it walks
//! every namespace's types in declaration order, validates that each
//! reference resolves in the model, and records an import requirement per
//! (referencing namespace, target namespace) pair with a stable
//! first-seen index. The finalize pass runs strictly after the sanitizer
//! has committed its rename map, because import statements must carry the
//! final output names of the referenced types.

use crate::error::{Error, ModelError, Result};
use crate::locations::relative_module_path;
use crate::model::{ImportStatement, Spec};
use crate::names;
use crate::transform::sanitize::RenameMap;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;

/// One namespace's requirement to import another
#[derive(Debug, Clone)]
pub struct ImportRequirement {
    /// Stable 1-based index in first-seen order, used to name the binding
    pub index: usize,
    /// Declaration indices of the referenced types, in first-seen order
    pub referenced: IndexSet<usize>,
}

impl ImportRequirement {
    fn new(index: usize) -> Self {
        Self {
            index,
            referenced: IndexSet::new(),
        }
    }
}

/// The scan pass's result: every namespace's import requirements
///
/// Keyed by referencing namespace URI, then by target namespace URI, both
/// in first-seen order. Later phases reuse this without re-scanning.
#[derive(Debug, Clone, Default)]
pub struct ImportsFound {
    namespaces: IndexMap<String, IndexMap<String, ImportRequirement>>,
}

impl ImportsFound {
    /// Requirements recorded for a referencing namespace
    pub fn requirements(&self, namespace_uri: &str) -> Option<&IndexMap<String, ImportRequirement>> {
        self.namespaces.get(namespace_uri)
    }

    /// Total number of (referencing, target) requirement pairs
    pub fn requirement_count(&self) -> usize {
        self.namespaces.values().map(|reqs| reqs.len()).sum()
    }

    /// Whether no requirements were found
    pub fn is_empty(&self) -> bool {
        self.requirement_count() == 0
    }
}

/// The two-phase import resolver
#[derive(Debug)]
pub struct ImportResolver;

impl ImportResolver {
    /// Scan the model for cross-namespace references
    ///
    /// Validates every reference (foreign or local) against the model and
    /// registers an import requirement for each foreign one. Does not
    /// mutate type names.
    pub fn scan(spec: &Spec) -> Result<ImportsFound> {
        let mut found = ImportsFound::default();

        for namespace in spec.namespaces() {
            let requirements = found
                .namespaces
                .entry(namespace.uri.clone())
                .or_default();

            for type_spec in &namespace.types {
                for reference in type_spec.references() {
                    // Integrity check: a dangling reference means the
                    // schema model is malformed and the run aborts.
                    let target_namespace =
                        spec.namespace(&reference.namespace).ok_or_else(|| {
                            ModelError::new("reference to unknown namespace")
                                .with_referencing(type_spec.qualified_name(&namespace.uri))
                                .with_missing(reference.to_string())
                                .with_namespace(namespace.uri.clone())
                        })?;
                    if target_namespace.types.get(reference.index).is_none() {
                        return Err(ModelError::new("reference to unknown type")
                            .with_referencing(type_spec.qualified_name(&namespace.uri))
                            .with_missing(reference.to_string())
                            .with_namespace(namespace.uri.clone())
                            .into());
                    }

                    if reference.is_foreign(&namespace.uri) {
                        let next_index = requirements.len() + 1;
                        let requirement = requirements
                            .entry(reference.namespace.clone())
                            .or_insert_with(|| ImportRequirement::new(next_index));
                        requirement.referenced.insert(reference.index);
                    }
                }
            }
        }

        Ok(found)
    }

    /// Record final import statements on every referencing namespace
    ///
    /// Requires the committed rename map: every import statement names
    /// the referenced types by their final sanitized identifiers.
    pub fn finalize(spec: &mut Spec, found: &ImportsFound, renames: &RenameMap) -> Result<()> {
        // Build all statements against the immutable model first, then
        // attach them; finalize is the only writer at this stage.
        let mut statements_by_namespace: Vec<(String, Vec<ImportStatement>)> = Vec::new();

        for (referencing_uri, requirements) in &found.namespaces {
            let referencing = spec.namespace(referencing_uri).ok_or_else(|| {
                ModelError::new("scanned namespace missing from model")
                    .with_namespace(referencing_uri.clone())
            })?;
            let from_stem = referencing.module_stem();

            let mut statements = Vec::with_capacity(requirements.len());
            let mut used_bindings: HashSet<String> = HashSet::new();

            for (target_uri, requirement) in requirements {
                let target = spec.namespace(target_uri).ok_or_else(|| {
                    ModelError::new("import target namespace missing from model")
                        .with_missing(target_uri.clone())
                        .with_namespace(referencing_uri.clone())
                })?;

                let mut type_names = Vec::with_capacity(requirement.referenced.len());
                for &type_index in &requirement.referenced {
                    let safe = renames.get(target_uri, type_index).ok_or_else(|| {
                        Error::Model(
                            ModelError::new("imported type has no committed name")
                                .with_missing(format!("{{{}}}#{}", target_uri, type_index))
                                .with_namespace(referencing_uri.clone()),
                        )
                    })?;
                    type_names.push(safe.to_string());
                }

                statements.push(ImportStatement {
                    binding: binding_name(
                        target.short.as_deref(),
                        requirement.index,
                        &mut used_bindings,
                    ),
                    target_uri: target_uri.clone(),
                    module_path: relative_module_path(&from_stem, &target.module_stem()),
                    type_names,
                });
            }

            statements_by_namespace.push((referencing_uri.clone(), statements));
        }

        for (uri, statements) in statements_by_namespace {
            // Present in the model: checked above
            spec.namespace_mut(&uri).unwrap().imports = statements;
        }

        Ok(())
    }
}

/// Derive a module-scope binding name for an import
///
/// The target's short name is preferred; the requirement index breaks
/// collisions and names targets with no usable short name.
fn binding_name(short: Option<&str>, index: usize, used: &mut HashSet<String>) -> String {
    let base = short.map(names::candidate_identifier).unwrap_or_default();

    let mut binding = if base.is_empty() || names::is_reserved_word(&base) {
        format!("ns{}", index)
    } else {
        base.clone()
    };
    if used.contains(&binding) {
        binding = format!("{}{}", binding, index);
    }
    while used.contains(&binding) {
        binding.push('_');
    }

    used.insert(binding.clone());
    binding
}
