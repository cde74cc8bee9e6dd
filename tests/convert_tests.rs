//! End-to-end conversion tests
//!
//! Read fixture schemas from disk, run the full pipeline, and assert on
//! the emitted TypeScript and JavaScript module content.

use std::path::PathBuf;
use xsdgen::locations::Location;
use xsdgen::pipeline;
use xsdgen::writers::MemoryWriter;
use xsdgen::xsd::SchemaReader;

fn fixtures_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path
}

fn convert(fixture: &str) -> (MemoryWriter, MemoryWriter) {
    let reader = SchemaReader::new();
    let spec = reader
        .read(&Location::Path(fixtures_dir().join(fixture)))
        .unwrap();

    let mut declarations = MemoryWriter::new();
    let mut implementations = MemoryWriter::new();
    pipeline::generate(spec, &mut declarations, &mut implementations).unwrap();
    (declarations, implementations)
}

#[test]
fn converts_single_namespace_schema() {
    let (declarations, implementations) = convert("book.xsd");

    let dts = declarations.get("example.com/book.d.ts").unwrap();
    assert!(dts.contains("// Source: http://example.com/book"));
    assert!(dts.contains("export interface Book {"));
    assert!(dts.contains("  title: xsd.XsdString;"));
    assert!(dts.contains("  author: xsd.XsdString[];"));
    assert!(dts.contains("  year?: xsd.int;"));
    // The top-level element exports a type extending its declared type.
    assert!(dts.contains("export interface book extends Book {"));

    let js = implementations.get("example.com/book.js").unwrap();
    assert!(js.starts_with("\"use strict\";"));
    assert!(js.contains("exports.Book = {"));
    assert!(js.contains("{ name: \"author\", type: [xsd, \"XsdString\"], array: true },"));
}

#[test]
fn converts_imported_namespaces_into_separate_modules() {
    let (declarations, implementations) = convert("library.xsd");

    // One declaration module per namespace, builtins included.
    assert!(declarations
        .get("www.w3.org/2001/XMLSchema.d.ts")
        .is_some());
    assert!(declarations.get("example.com/types.d.ts").is_some());
    let library = declarations.get("example.com/library.d.ts").unwrap();

    // Imports precede declarations; bindings derive from prefix hints.
    assert!(library.contains("import * as xsd from \"../www.w3.org/2001/XMLSchema\";"));
    assert!(library.contains("import * as types from \"./types\";"));
    assert!(library.contains("/** A catalogued book. */"));
    assert!(library.contains("  isbn: types.Isbn;"));
    assert!(library.contains("  status?: types.Status;"));
    assert!(library.contains("  id: xsd.XsdString;"));
    assert!(library.contains("  book?: Book[];"));

    let types = declarations.get("example.com/types.d.ts").unwrap();
    assert!(types.contains("export type Isbn = xsd.XsdString;"));
    assert!(types.contains("export type Status = \"available\" | \"checked-out\";"));
    assert!(types.contains("export interface Publisher {"));

    let library_js = implementations.get("example.com/library.js").unwrap();
    assert!(library_js.contains("var types = require(\"./types\");"));
    assert!(library_js.contains("{ name: \"isbn\", type: [types, \"Isbn\"] },"));
    assert!(library_js.contains("{ name: \"id\", type: [xsd, \"XsdString\"], attribute: true },"));
}

#[test]
fn conversion_is_deterministic_across_runs() {
    let (first_ts, first_js) = convert("library.xsd");
    let (second_ts, second_js) = convert("library.xsd");

    assert_eq!(first_ts.files(), second_ts.files());
    assert_eq!(first_js.files(), second_js.files());
}

#[test]
fn primitive_module_declares_aliases() {
    let (declarations, implementations) = convert("book.xsd");

    let dts = declarations.get("www.w3.org/2001/XMLSchema.d.ts").unwrap();
    assert!(dts.contains("export type XsdString = string;"));
    assert!(dts.contains("export type XsdBoolean = boolean;"));
    assert!(dts.contains("export type int = number;"));

    let js = implementations.get("www.w3.org/2001/XMLSchema.js").unwrap();
    assert!(js.contains("exports.XsdString = {"));
    assert!(js.contains("  ctor: String,"));
}
