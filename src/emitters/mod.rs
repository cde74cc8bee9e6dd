//! Module emitters
//!
//! Render one output unit per namespace through an output sink. The
//! declaration emitter produces TypeScript `.d.ts` modules, the
//! implementation emitter produces JavaScript `.js` marshaling modules.
//! Both traverse the same finalized model read-only and must run only
//! after renames are committed and imports finalized; the pipeline's
//! staged types enforce that ordering.

pub mod js;
pub mod ts;

pub use js::JsEmitter;
pub use ts::TsEmitter;

use crate::error::{Error, ModelError, Result};
use crate::model::{Namespace, Spec, TypeRef, TypeSpec};
use crate::names;
use crate::writers::{OutputKind, OutputSink};
use std::path::PathBuf;

/// A renderer for one output kind
pub trait Emitter {
    /// Which output this emitter produces
    fn output_kind(&self) -> OutputKind;

    /// Render the module for one namespace
    fn render_module(&self, spec: &Spec, namespace: &Namespace) -> Result<String>;
}

/// Emit every namespace's module through a sink
///
/// Namespaces render in declaration order; the returned paths list every
/// written unit in emission order. Any render or write failure aborts the
/// whole emission.
pub fn emit(spec: &Spec, emitter: &dyn Emitter, sink: &mut dyn OutputSink) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(spec.namespace_count());
    for namespace in spec.namespaces() {
        let content = emitter.render_module(spec, namespace)?;
        written.push(sink.write(namespace, emitter.output_kind(), &content)?);
    }
    Ok(written)
}

/// Resolve a reference to its target type and import binding
///
/// Returns the target and, for foreign references, the binding recorded
/// on the referencing namespace at finalize time.
pub(crate) fn reference_target<'a>(
    spec: &'a Spec,
    namespace: &'a Namespace,
    reference: &TypeRef,
) -> Result<(&'a TypeSpec, Option<&'a str>)> {
    let target = spec.lookup(reference).ok_or_else(|| {
        ModelError::new("reference to unknown type during emission")
            .with_missing(reference.to_string())
            .with_namespace(namespace.uri.clone())
    })?;

    if reference.is_foreign(&namespace.uri) {
        let import = namespace.import_for(&reference.namespace).ok_or_else(|| {
            Error::Emit(format!(
                "No import recorded on '{}' for '{}'",
                namespace.uri, reference.namespace
            ))
        })?;
        Ok((target, Some(import.binding.as_str())))
    } else {
        Ok((target, None))
    }
}

/// TypeScript expression for a reference (`Name` or `binding.Name`)
pub(crate) fn reference_expr(
    spec: &Spec,
    namespace: &Namespace,
    reference: &TypeRef,
) -> Result<String> {
    let (target, binding) = reference_target(spec, namespace, reference)?;
    Ok(match binding {
        Some(binding) => format!("{}.{}", binding, target.output_name()),
        None => target.output_name().to_string(),
    })
}

/// Escape a string for a double-quoted ECMAScript literal
pub(crate) fn escape_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Quote a property name unless it is already a plain identifier
pub(crate) fn quote_property(name: &str) -> String {
    if names::is_valid_identifier(name) {
        name.to_string()
    } else {
        format!("\"{}\"", escape_string(name))
    }
}
