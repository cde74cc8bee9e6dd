//! Identifier sanitization
//!
//! Rewrites every exported type's name into a valid, collision-free
//! ECMAScript identifier. Candidates are derived by stripping characters
//! the identifier grammar rejects; collisions within a namespace are
//! resolved deterministically in declaration order: a kind-specific prefix
//! first, then numeric suffixes starting at 2.

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::model::{Spec, TypeKind, TypeRef};
use crate::names;
use indexmap::IndexMap;
use std::collections::HashSet;

/// Placeholder for names that sanitize down to nothing
const EMPTY_NAME_PLACEHOLDER: &str = "Type";

/// A computed rename plan, not yet applied to the model
///
/// Holds one entry per exported type, keyed by declaration index so
/// same-named types stay distinct. Applying the plan consumes it, so a
/// plan cannot be committed twice.
#[derive(Debug)]
pub struct RenamePlan {
    entries: Vec<RenameEntry>,
}

#[derive(Debug)]
struct RenameEntry {
    namespace: String,
    index: usize,
    original: String,
    safe: String,
}

impl RenamePlan {
    /// Number of planned renames
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the plan is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the planned name for a declaration index
    pub fn planned_at(&self, namespace: &str, index: usize) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.namespace == namespace && e.index == index)
            .map(|e| e.safe.as_str())
    }

    /// Planned names in declaration order for one namespace
    pub fn planned_names(&self, namespace: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.namespace == namespace)
            .map(|e| e.safe.as_str())
            .collect()
    }
}

/// The committed rename map: original type identity to final output name
///
/// Built by [`Sanitizer::commit`] and immutable afterwards. Keys carry
/// the declaration index, not the original name, so duplicate originals
/// resolve to their own committed names.
#[derive(Debug, Clone, Default)]
pub struct RenameMap {
    map: IndexMap<(String, usize), String>,
}

impl RenameMap {
    /// Look up the committed name for a namespace/index pair
    pub fn get(&self, namespace: &str, index: usize) -> Option<&str> {
        self.map
            .get(&(namespace.to_string(), index))
            .map(|s| s.as_str())
    }

    /// Look up the committed name for a type reference
    pub fn resolve(&self, reference: &TypeRef) -> Option<&str> {
        self.get(&reference.namespace, reference.index)
    }

    /// Number of committed renames
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// The identifier sanitizer
#[derive(Debug)]
pub struct Sanitizer {
    limits: Limits,
}

impl Sanitizer {
    /// Create a sanitizer with default limits
    pub fn new() -> Self {
        Self {
            limits: Limits::default(),
        }
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Compute a collision-free rename plan for every exported type
    ///
    /// Does not mutate the model. Namespaces and types are visited in
    /// declaration order, so the tie-break between colliding names is
    /// stable across runs.
    pub fn compute(&self, spec: &Spec) -> Result<RenamePlan> {
        let mut entries = Vec::with_capacity(spec.type_count());

        for namespace in spec.namespaces() {
            let mut used: HashSet<String> = HashSet::new();

            for (index, type_spec) in namespace.types.iter().enumerate() {
                let safe = self.disambiguate(&type_spec.name, &type_spec.kind, &used)?;
                used.insert(safe.clone());
                entries.push(RenameEntry {
                    namespace: namespace.uri.clone(),
                    index,
                    original: type_spec.name.clone(),
                    safe,
                });
            }
        }

        Ok(RenamePlan { entries })
    }

    /// Commit a rename plan: write names into the model, build the map
    ///
    /// Consumes the plan; call exactly once, before any consumer reads
    /// final names.
    pub fn commit(&self, spec: &mut Spec, plan: RenamePlan) -> Result<RenameMap> {
        let mut map = IndexMap::with_capacity(plan.entries.len());

        for entry in plan.entries {
            let namespace = spec.namespace_mut(&entry.namespace).ok_or_else(|| {
                Error::Sanitize(format!(
                    "Rename plan names unknown namespace '{}'",
                    entry.namespace
                ))
            })?;
            let type_spec = namespace.types.get_mut(entry.index).ok_or_else(|| {
                Error::Sanitize(format!(
                    "Rename plan names unknown type #{} in '{}'",
                    entry.index, entry.namespace
                ))
            })?;
            if type_spec.name != entry.original {
                return Err(Error::Sanitize(format!(
                    "Rename plan is stale: type #{} in '{}' is '{}', plan says '{}'",
                    entry.index, entry.namespace, type_spec.name, entry.original
                )));
            }

            type_spec.safe_name = Some(entry.safe.clone());
            map.insert((entry.namespace, entry.index), entry.safe);
        }

        Ok(RenameMap { map })
    }

    /// Find a free identifier for one type
    fn disambiguate(
        &self,
        original: &str,
        kind: &TypeKind,
        used: &HashSet<String>,
    ) -> Result<String> {
        let mut candidate = names::candidate_identifier(original);
        if candidate.is_empty() {
            candidate = EMPTY_NAME_PLACEHOLDER.to_string();
        }

        if is_free(&candidate, used) {
            return Ok(candidate);
        }

        // Kind prefix first; complex types carry none, so same-kind
        // collisions between them go straight to numeric suffixes.
        let prefixed = format!("{}{}", kind_prefix(kind), capitalize(&candidate));
        if is_free(&prefixed, used) {
            return Ok(prefixed);
        }

        for suffix in 2..(2 + self.limits.max_rename_attempts) {
            let numbered = format!("{}{}", prefixed, suffix);
            if is_free(&numbered, used) {
                return Ok(numbered);
            }
        }

        Err(Error::Sanitize(format!(
            "Could not find a free identifier for '{}' within {} attempts",
            original, self.limits.max_rename_attempts
        )))
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_free(name: &str, used: &HashSet<String>) -> bool {
    !used.contains(name) && !names::is_reserved_word(name)
}

fn kind_prefix(kind: &TypeKind) -> &'static str {
    match kind {
        TypeKind::Primitive(_) => "Xsd",
        TypeKind::Simple => "Simple",
        TypeKind::Enumeration(_) => "Enum",
        TypeKind::Complex => "",
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
