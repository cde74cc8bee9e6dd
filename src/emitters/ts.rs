//! TypeScript declaration emitter
//!
//! Renders one `.d.ts` module per namespace: finalized import statements
//! first, then a declaration for every exported type under its committed
//! name. Complex types become interfaces; enumerations and simple types
//! become type aliases.

use super::{quote_property, reference_expr, Emitter};
use crate::error::Result;
use crate::model::{Namespace, Spec, TypeKind, TypeSpec};
use crate::writers::OutputKind;

/// The declaration emitter
#[derive(Debug, Default)]
pub struct TsEmitter;

impl Emitter for TsEmitter {
    fn output_kind(&self) -> OutputKind {
        OutputKind::Declaration
    }

    fn render_module(&self, spec: &Spec, namespace: &Namespace) -> Result<String> {
        let mut out = String::new();
        out.push_str(&format!("// Source: {}\n", namespace.uri));

        if !namespace.imports.is_empty() {
            out.push('\n');
            for import in &namespace.imports {
                out.push_str(&format!(
                    "import * as {} from \"{}\";\n",
                    import.binding, import.module_path
                ));
            }
        }

        for type_spec in &namespace.types {
            out.push('\n');
            self.render_type(spec, namespace, type_spec, &mut out)?;
        }

        Ok(out)
    }
}

impl TsEmitter {
    fn render_type(
        &self,
        spec: &Spec,
        namespace: &Namespace,
        type_spec: &TypeSpec,
        out: &mut String,
    ) -> Result<()> {
        if let Some(ref comment) = type_spec.comment {
            out.push_str(&format!("/** {} */\n", flatten_comment(comment)));
        }

        let name = type_spec.output_name();
        match &type_spec.kind {
            TypeKind::Primitive(primitive) => {
                out.push_str(&format!(
                    "export type {} = {};\n",
                    name,
                    primitive.ts_keyword()
                ));
            }
            TypeKind::Enumeration(values) => {
                let union = if values.is_empty() {
                    "string".to_string()
                } else {
                    values
                        .iter()
                        .map(|v| format!("\"{}\"", super::escape_string(v)))
                        .collect::<Vec<_>>()
                        .join(" | ")
                };
                out.push_str(&format!("export type {} = {};\n", name, union));
            }
            TypeKind::Simple => {
                let alias = match &type_spec.base {
                    Some(base) => reference_expr(spec, namespace, base)?,
                    None => "any".to_string(),
                };
                out.push_str(&format!("export type {} = {};\n", name, alias));
            }
            TypeKind::Complex => {
                self.render_interface(spec, namespace, type_spec, out)?;
            }
        }

        Ok(())
    }

    fn render_interface(
        &self,
        spec: &Spec,
        namespace: &Namespace,
        type_spec: &TypeSpec,
        out: &mut String,
    ) -> Result<()> {
        // Interfaces can only extend other interfaces; a simple or
        // primitive base surfaces as a $value member instead.
        let mut value_member: Option<String> = None;
        let mut heritage = String::new();
        if let Some(ref base) = type_spec.base {
            let expr = reference_expr(spec, namespace, base)?;
            let base_is_complex = spec
                .lookup(base)
                .map(|t| t.kind == TypeKind::Complex)
                .unwrap_or(false);
            if base_is_complex {
                heritage = format!(" extends {}", expr);
            } else {
                value_member = Some(expr);
            }
        }

        out.push_str(&format!(
            "export interface {}{} {{\n",
            type_spec.output_name(),
            heritage
        ));

        if let Some(expr) = value_member {
            out.push_str(&format!("  $value: {};\n", expr));
        }

        for member in &type_spec.members {
            let mut expr = reference_expr(spec, namespace, &member.type_ref)?;
            if member.is_array() {
                expr = format!("{}[]", expr);
            }
            let optional = if member.is_optional() { "?" } else { "" };
            out.push_str(&format!(
                "  {}{}: {};\n",
                quote_property(&member.name),
                optional,
                expr
            ));
        }

        out.push_str("}\n");
        Ok(())
    }
}

fn flatten_comment(comment: &str) -> String {
    comment
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Member, TypeRef};
    use crate::transform::{ImportResolver, Sanitizer};

    const TYPES_NS: &str = "http://example.com/types";
    const BOOKS_NS: &str = "http://example.com/books";

    fn finalized_spec() -> Spec {
        let mut spec = Spec::new();

        let mut types = Namespace::new(TYPES_NS).with_short("types");
        types.add_type(
            TypeSpec::new("Isbn", TypeKind::Simple).with_comment("International Standard Book Number"),
        );
        types.add_type(TypeSpec::new(
            "Status",
            TypeKind::Enumeration(vec!["available".into(), "out-of-print".into()]),
        ));
        spec.add_namespace(types);

        let mut books = Namespace::new(BOOKS_NS).with_short("books");
        books.add_type(
            TypeSpec::new("Book", TypeKind::Complex)
                .with_member(Member::new("isbn", TypeRef::new(TYPES_NS, 0)))
                .with_member(
                    Member::new("status", TypeRef::new(TYPES_NS, 1)).with_occurs(0, Some(1)),
                )
                .with_member(
                    Member::new("chapter", TypeRef::new(BOOKS_NS, 1)).with_occurs(0, None),
                ),
        );
        books.add_type(TypeSpec::new("Chapter", TypeKind::Complex));
        spec.add_namespace(books);

        let found = ImportResolver::scan(&spec).unwrap();
        let sanitizer = Sanitizer::new();
        let plan = sanitizer.compute(&spec).unwrap();
        let renames = sanitizer.commit(&mut spec, plan).unwrap();
        ImportResolver::finalize(&mut spec, &found, &renames).unwrap();
        spec
    }

    #[test]
    fn test_render_imports_first() {
        let spec = finalized_spec();
        let books = spec.namespace(BOOKS_NS).unwrap();
        let content = TsEmitter.render_module(&spec, books).unwrap();

        assert!(content.starts_with("// Source: http://example.com/books\n"));
        assert!(content.contains("import * as types from \"./types\";\n"));
        let import_pos = content.find("import * as").unwrap();
        let interface_pos = content.find("export interface").unwrap();
        assert!(import_pos < interface_pos);
    }

    #[test]
    fn test_render_interface_members() {
        let spec = finalized_spec();
        let books = spec.namespace(BOOKS_NS).unwrap();
        let content = TsEmitter.render_module(&spec, books).unwrap();

        assert!(content.contains("export interface Book {\n"));
        assert!(content.contains("  isbn: types.Isbn;\n"));
        assert!(content.contains("  status?: types.Status;\n"));
        assert!(content.contains("  chapter?: Chapter[];\n"));
    }

    #[test]
    fn test_render_enumeration() {
        let spec = finalized_spec();
        let types = spec.namespace(TYPES_NS).unwrap();
        let content = TsEmitter.render_module(&spec, types).unwrap();

        assert!(content.contains("export type Status = \"available\" | \"out-of-print\";\n"));
    }

    #[test]
    fn test_render_comment() {
        let spec = finalized_spec();
        let types = spec.namespace(TYPES_NS).unwrap();
        let content = TsEmitter.render_module(&spec, types).unwrap();

        assert!(content.contains("/** International Standard Book Number */\n"));
    }

    #[test]
    fn test_render_primitive_aliases() {
        let mut spec = Spec::with_builtins();
        let found = ImportResolver::scan(&spec).unwrap();
        let sanitizer = Sanitizer::new();
        let plan = sanitizer.compute(&spec).unwrap();
        let renames = sanitizer.commit(&mut spec, plan).unwrap();
        ImportResolver::finalize(&mut spec, &found, &renames).unwrap();

        let builtin = spec.namespace(crate::XSD_NAMESPACE).unwrap();
        let content = TsEmitter.render_module(&spec, builtin).unwrap();
        assert!(content.contains("export type XsdString = string;\n"));
        assert!(content.contains("export type decimal = number;\n"));
        assert_eq!(
            TsEmitter.output_kind(),
            OutputKind::Declaration
        );
    }

    #[test]
    fn test_simple_content_base_becomes_value_member() {
        let mut spec = Spec::new();
        let mut ns = Namespace::new(TYPES_NS);
        ns.add_type(TypeSpec::new("Isbn", TypeKind::Simple));
        ns.add_type(
            TypeSpec::new("TaggedIsbn", TypeKind::Complex)
                .with_base(TypeRef::new(TYPES_NS, 0))
                .with_member(
                    Member::new("tag", TypeRef::new(TYPES_NS, 0)).as_attribute(),
                ),
        );
        spec.add_namespace(ns);

        let found = ImportResolver::scan(&spec).unwrap();
        let sanitizer = Sanitizer::new();
        let plan = sanitizer.compute(&spec).unwrap();
        let renames = sanitizer.commit(&mut spec, plan).unwrap();
        ImportResolver::finalize(&mut spec, &found, &renames).unwrap();

        let ns = spec.namespace(TYPES_NS).unwrap();
        let content = TsEmitter.render_module(&spec, ns).unwrap();
        assert!(content.contains("export interface TaggedIsbn {\n"));
        assert!(content.contains("  $value: Isbn;\n"));
    }

    #[test]
    fn test_determinism() {
        let spec = finalized_spec();
        let books = spec.namespace(BOOKS_NS).unwrap();
        let first = TsEmitter.render_module(&spec, books).unwrap();
        let second = TsEmitter.render_module(&spec, books).unwrap();
        assert_eq!(first, second);
    }
}
