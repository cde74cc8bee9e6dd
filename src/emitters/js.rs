//! JavaScript implementation emitter
//!
//! Renders one CommonJS `.js` module per namespace: the same imports the
//! declaration module carries, then one runtime descriptor per exported
//! type. Descriptors reference other types as `[module, "Name"]` pairs so
//! consumers resolve them lazily and declaration order never matters.

use super::{escape_string, reference_target, Emitter};
use crate::error::Result;
use crate::model::{Member, Namespace, Spec, TypeKind, TypeRef, TypeSpec};
use crate::writers::OutputKind;

/// The implementation emitter
#[derive(Debug, Default)]
pub struct JsEmitter;

impl Emitter for JsEmitter {
    fn output_kind(&self) -> OutputKind {
        OutputKind::Implementation
    }

    fn render_module(&self, spec: &Spec, namespace: &Namespace) -> Result<String> {
        let mut out = String::new();
        out.push_str("\"use strict\";\n");
        out.push_str(&format!("// Source: {}\n", namespace.uri));

        if !namespace.imports.is_empty() {
            out.push('\n');
            for import in &namespace.imports {
                out.push_str(&format!(
                    "var {} = require(\"{}\");\n",
                    import.binding, import.module_path
                ));
            }
        }

        for type_spec in &namespace.types {
            out.push('\n');
            self.render_descriptor(spec, namespace, type_spec, &mut out)?;
        }

        Ok(out)
    }
}

impl JsEmitter {
    fn render_descriptor(
        &self,
        spec: &Spec,
        namespace: &Namespace,
        type_spec: &TypeSpec,
        out: &mut String,
    ) -> Result<()> {
        let name = type_spec.output_name();
        out.push_str(&format!("exports.{} = {{\n", name));
        out.push_str(&format!("  kind: \"{}\",\n", type_spec.kind.label()));

        match &type_spec.kind {
            TypeKind::Primitive(primitive) => {
                out.push_str(&format!("  ctor: {},\n", primitive.js_constructor()));
            }
            TypeKind::Enumeration(values) => {
                let rendered = values
                    .iter()
                    .map(|v| format!("\"{}\"", escape_string(v)))
                    .collect::<Vec<_>>()
                    .join(", ");
                out.push_str(&format!("  values: [{}],\n", rendered));
            }
            TypeKind::Simple => {
                if let Some(ref base) = type_spec.base {
                    let pair = self.reference_pair(spec, namespace, base)?;
                    out.push_str(&format!("  base: {},\n", pair));
                }
            }
            TypeKind::Complex => {
                if let Some(ref base) = type_spec.base {
                    let pair = self.reference_pair(spec, namespace, base)?;
                    out.push_str(&format!("  base: {},\n", pair));
                }
                out.push_str("  members: [\n");
                for member in &type_spec.members {
                    self.render_member(spec, namespace, member, out)?;
                }
                out.push_str("  ],\n");
            }
        }

        out.push_str("};\n");
        Ok(())
    }

    fn render_member(
        &self,
        spec: &Spec,
        namespace: &Namespace,
        member: &Member,
        out: &mut String,
    ) -> Result<()> {
        let pair = self.reference_pair(spec, namespace, &member.type_ref)?;
        let mut flags = String::new();
        if member.is_optional() {
            flags.push_str(", optional: true");
        }
        if member.is_array() {
            flags.push_str(", array: true");
        }
        if member.is_attribute {
            flags.push_str(", attribute: true");
        }
        out.push_str(&format!(
            "    {{ name: \"{}\", type: {}{} }},\n",
            escape_string(&member.name),
            pair,
            flags
        ));
        Ok(())
    }

    /// Render a reference as a lazily-resolvable `[module, "Name"]` pair
    fn reference_pair(
        &self,
        spec: &Spec,
        namespace: &Namespace,
        reference: &TypeRef,
    ) -> Result<String> {
        let (target, binding) = reference_target(spec, namespace, reference)?;
        let module = binding.unwrap_or("exports");
        Ok(format!(
            "[{}, {}]",
            module,
            quoted(target.output_name())
        ))
    }
}

fn quoted(name: &str) -> String {
    format!("\"{}\"", escape_string(name))
}
