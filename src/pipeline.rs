//! Pipeline orchestration
//!
//! The four-state linear pipeline: `Scanned → Sanitized → Resolved →
//! Emitted`. Each stage value exclusively owns the schema model and is
//! consumed by the transition to the next stage, so a stage cannot run
//! without its predecessor's output and the model is never concurrently
//! mutated. Any failure aborts the run; there is no partial-result
//! recovery.

use crate::emitters::{self, JsEmitter, TsEmitter};
use crate::error::Result;
use crate::limits::Limits;
use crate::model::Spec;
use crate::transform::{ImportResolver, ImportsFound, RenameMap, Sanitizer};
use crate::writers::OutputSink;
use std::path::PathBuf;

/// Scan a schema model for cross-namespace references
///
/// The entry point of the pipeline. Validates every type reference and
/// returns the first stage value.
pub fn scan(spec: Spec) -> Result<Scanned> {
    scan_with(spec, Limits::default())
}

/// Scan with explicit limits
pub fn scan_with(spec: Spec, limits: Limits) -> Result<Scanned> {
    limits.check_namespaces(spec.namespace_count())?;
    limits.check_types(spec.type_count())?;

    let imports = ImportResolver::scan(&spec)?;
    Ok(Scanned {
        spec,
        imports,
        limits,
    })
}

/// Stage 1: references validated, import requirements collected
#[derive(Debug)]
pub struct Scanned {
    spec: Spec,
    imports: ImportsFound,
    limits: Limits,
}

impl Scanned {
    /// The import requirements found by the scan
    pub fn imports(&self) -> &ImportsFound {
        &self.imports
    }

    /// Compute and commit renames, producing the sanitized stage
    pub fn sanitize(mut self) -> Result<Sanitized> {
        let sanitizer = Sanitizer::new().with_limits(self.limits.clone());
        let plan = sanitizer.compute(&self.spec)?;
        let renames = sanitizer.commit(&mut self.spec, plan)?;
        Ok(Sanitized {
            spec: self.spec,
            imports: self.imports,
            renames,
        })
    }
}

/// Stage 2: every type carries its committed output name
#[derive(Debug)]
pub struct Sanitized {
    spec: Spec,
    imports: ImportsFound,
    renames: RenameMap,
}

impl Sanitized {
    /// The committed rename map
    pub fn renames(&self) -> &RenameMap {
        &self.renames
    }

    /// Record final import statements, producing the resolved stage
    pub fn finalize(mut self) -> Result<Resolved> {
        ImportResolver::finalize(&mut self.spec, &self.imports, &self.renames)?;
        Ok(Resolved { spec: self.spec })
    }
}

/// Stage 3: imports finalized, model ready for emission
#[derive(Debug)]
pub struct Resolved {
    spec: Spec,
}

impl Resolved {
    /// The finalized model
    pub fn spec(&self) -> &Spec {
        &self.spec
    }

    /// Emit declaration and implementation modules through the sinks
    ///
    /// Both emitters are read-only over the model and write to disjoint
    /// units; they run in sequence here.
    pub fn emit(
        self,
        declarations: &mut dyn OutputSink,
        implementations: &mut dyn OutputSink,
    ) -> Result<Emitted> {
        let mut units = emitters::emit(&self.spec, &TsEmitter, declarations)?;
        units.extend(emitters::emit(&self.spec, &JsEmitter, implementations)?);
        Ok(Emitted {
            spec: self.spec,
            units,
        })
    }
}

/// Stage 4: every output unit written
#[derive(Debug)]
pub struct Emitted {
    spec: Spec,
    units: Vec<PathBuf>,
}

impl Emitted {
    /// Paths of every written unit, declarations first
    pub fn units(&self) -> &[PathBuf] {
        &self.units
    }

    /// Number of units written
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Recover the (renamed, finalized) model
    pub fn into_spec(self) -> Spec {
        self.spec
    }
}

/// Run the whole pipeline over a model
pub fn generate(
    spec: Spec,
    declarations: &mut dyn OutputSink,
    implementations: &mut dyn OutputSink,
) -> Result<Emitted> {
    generate_with(spec, Limits::default(), declarations, implementations)
}

/// Run the whole pipeline with explicit limits
pub fn generate_with(
    spec: Spec,
    limits: Limits,
    declarations: &mut dyn OutputSink,
    implementations: &mut dyn OutputSink,
) -> Result<Emitted> {
    scan_with(spec, limits)?
        .sanitize()?
        .finalize()?
        .emit(declarations, implementations)
}
