//! Pipeline integration tests
//!
//! Exercise the linking and emission pipeline through the public API:
//! determinism, name uniqueness and validity, import completeness, and
//! the sink-equivalence guarantees.

use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::fs;
use xsdgen::model::{Member, Namespace, Spec, TypeKind, TypeRef, TypeSpec};
use xsdgen::names;
use xsdgen::pipeline;
use xsdgen::writers::{CacheWriter, MemoryWriter, OutputKind, OutputSink};

const TYPES_NS: &str = "http://example.com/types";
const BOOKS_NS: &str = "http://example.com/books";

/// Two namespaces; the books namespace references the types namespace.
fn cross_namespace_spec() -> Spec {
    let mut spec = Spec::new();

    let mut types = Namespace::new(TYPES_NS).with_short("types");
    types.add_type(TypeSpec::new("Isbn", TypeKind::Simple));
    types.add_type(TypeSpec::new("my-type", TypeKind::Complex));
    spec.add_namespace(types);

    let mut books = Namespace::new(BOOKS_NS).with_short("books");
    books.add_type(
        TypeSpec::new("Book", TypeKind::Complex)
            .with_member(Member::new("isbn", TypeRef::new(TYPES_NS, 0)))
            .with_member(Member::new("extra", TypeRef::new(TYPES_NS, 1))),
    );
    spec.add_namespace(books);

    spec
}

/// The duplicate-name scenario: two `Address` types, the second one
/// referenced from another namespace.
fn duplicate_name_spec() -> Spec {
    let mut spec = Spec::new();

    let mut types = Namespace::new(TYPES_NS).with_short("types");
    types.add_type(TypeSpec::new("Address", TypeKind::Complex));
    let second = types.add_type(TypeSpec::new("Address", TypeKind::Complex));
    spec.add_namespace(types);

    let mut books = Namespace::new(BOOKS_NS).with_short("books");
    books.add_type(
        TypeSpec::new("Order", TypeKind::Complex)
            .with_member(Member::new("shipTo", TypeRef::new(TYPES_NS, second))),
    );
    spec.add_namespace(books);

    spec
}

#[test]
fn determinism_byte_identical_output() {
    let mut first_ts = MemoryWriter::new();
    let mut first_js = MemoryWriter::new();
    pipeline::generate(cross_namespace_spec(), &mut first_ts, &mut first_js).unwrap();

    let mut second_ts = MemoryWriter::new();
    let mut second_js = MemoryWriter::new();
    pipeline::generate(cross_namespace_spec(), &mut second_ts, &mut second_js).unwrap();

    assert_eq!(first_ts.files(), second_ts.files());
    assert_eq!(first_js.files(), second_js.files());
}

#[test]
fn committed_names_unique_and_valid() {
    let mut ts = MemoryWriter::new();
    let mut js = MemoryWriter::new();
    let emitted = pipeline::generate(duplicate_name_spec(), &mut ts, &mut js).unwrap();

    let spec = emitted.into_spec();
    for namespace in spec.namespaces() {
        let mut seen = HashSet::new();
        for type_spec in &namespace.types {
            let name = type_spec.safe_name.as_deref().expect("committed name");
            assert!(
                names::is_valid_identifier(name),
                "invalid identifier: {}",
                name
            );
            assert!(seen.insert(name.to_string()), "duplicate name: {}", name);
        }
    }
}

#[test]
fn import_completeness() {
    let mut ts = MemoryWriter::new();
    let mut js = MemoryWriter::new();
    let emitted = pipeline::generate(cross_namespace_spec(), &mut ts, &mut js).unwrap();

    let spec = emitted.into_spec();
    let books = spec.namespace(BOOKS_NS).unwrap();
    let import = books.import_for(TYPES_NS).expect("import recorded");
    assert_eq!(import.type_names, vec!["Isbn", "mytype"]);
}

#[test]
fn finalize_never_sees_presanitized_names() {
    // "my-type" sanitizes to "mytype"; the foreign reference resolved
    // after renaming must observe only the sanitized form.
    let mut ts = MemoryWriter::new();
    let mut js = MemoryWriter::new();
    pipeline::generate(cross_namespace_spec(), &mut ts, &mut js).unwrap();

    let books_dts = ts.get("example.com/books.d.ts").unwrap();
    assert!(books_dts.contains("types.mytype"));
    assert!(!books_dts.contains("my-type"));

    let books_js = js.get("example.com/books.js").unwrap();
    assert!(books_js.contains("[types, \"mytype\"]"));
    assert!(!books_js.contains("my-type"));
}

#[test]
fn second_declared_duplicate_renamed_and_imported() {
    let mut ts = MemoryWriter::new();
    let mut js = MemoryWriter::new();
    pipeline::generate(duplicate_name_spec(), &mut ts, &mut js).unwrap();

    let types_dts = ts.get("example.com/types.d.ts").unwrap();
    assert!(types_dts.contains("export interface Address {"));
    assert!(types_dts.contains("export interface Address2 {"));

    // The referencing namespace uses the renamed identifier.
    let books_dts = ts.get("example.com/books.d.ts").unwrap();
    assert!(books_dts.contains("shipTo: types.Address2;"));
    assert!(!books_dts.contains("shipTo: types.Address;"));
}

#[test]
fn invalid_characters_importable_after_sanitization() {
    let mut spec = Spec::new();

    let mut types = Namespace::new(TYPES_NS).with_short("types");
    types.add_type(TypeSpec::new("3d-point", TypeKind::Complex));
    spec.add_namespace(types);

    let mut books = Namespace::new(BOOKS_NS).with_short("books");
    books.add_type(
        TypeSpec::new("Scene", TypeKind::Complex)
            .with_member(Member::new("origin", TypeRef::new(TYPES_NS, 0))),
    );
    spec.add_namespace(books);

    let mut ts = MemoryWriter::new();
    let mut js = MemoryWriter::new();
    pipeline::generate(spec, &mut ts, &mut js).unwrap();

    let types_dts = ts.get("example.com/types.d.ts").unwrap();
    assert!(types_dts.contains("export interface _3dpoint {"));

    let books_dts = ts.get("example.com/books.d.ts").unwrap();
    assert!(books_dts.contains("origin: types._3dpoint;"));
}

#[test]
fn empty_model_completes_with_zero_units() {
    let mut ts = MemoryWriter::new();
    let mut js = MemoryWriter::new();
    let emitted = pipeline::generate(Spec::new(), &mut ts, &mut js).unwrap();

    assert_eq!(emitted.unit_count(), 0);
    assert!(ts.is_empty());
    assert!(js.is_empty());
}

#[test]
fn durable_and_volatile_sinks_emit_equivalent_content() {
    let dir = tempfile::tempdir().unwrap();
    let ts_root = dir.path().join("ts");
    let js_root = dir.path().join("js");

    let mut cache_ts = CacheWriter::new(&ts_root);
    let mut cache_js = CacheWriter::new(&js_root);
    pipeline::generate(cross_namespace_spec(), &mut cache_ts, &mut cache_js).unwrap();

    let mut memory_ts = MemoryWriter::new();
    let mut memory_js = MemoryWriter::new();
    pipeline::generate(cross_namespace_spec(), &mut memory_ts, &mut memory_js).unwrap();

    for (path, expected) in memory_ts.files() {
        let on_disk = fs::read_to_string(ts_root.join(path)).unwrap();
        assert_eq!(&on_disk, expected, "mismatch for {}", path);
    }
    for (path, expected) in memory_js.files() {
        let on_disk = fs::read_to_string(js_root.join(path)).unwrap();
        assert_eq!(&on_disk, expected, "mismatch for {}", path);
    }
}

#[test]
fn durable_sink_maintains_directory_index() {
    let dir = tempfile::tempdir().unwrap();
    let mut cache_ts = CacheWriter::new(dir.path());
    let mut cache_js = CacheWriter::new(dir.path());
    pipeline::generate(cross_namespace_spec(), &mut cache_ts, &mut cache_js).unwrap();

    let index = fs::read_to_string(dir.path().join("example.com").join("_index.d.ts")).unwrap();
    assert!(index.contains("export * from \"./types\";"));
    assert!(index.contains("export * from \"./books\";"));
}

#[test]
fn dangling_reference_fails_without_output() {
    let mut spec = Spec::new();
    let mut books = Namespace::new(BOOKS_NS);
    books.add_type(
        TypeSpec::new("Book", TypeKind::Complex)
            .with_member(Member::new("isbn", TypeRef::new(TYPES_NS, 0))),
    );
    spec.add_namespace(books);

    let mut ts = MemoryWriter::new();
    let mut js = MemoryWriter::new();
    let result = pipeline::generate(spec, &mut ts, &mut js);

    assert!(result.is_err());
    assert!(ts.is_empty());
    assert!(js.is_empty());
}

#[test]
fn unit_paths_derive_from_namespace_identity() {
    let mut sink = MemoryWriter::new();
    let namespace = Namespace::new("urn:example:catalog");
    sink.write(&namespace, OutputKind::Declaration, "content")
        .unwrap();
    assert!(sink.get("urn/example/catalog.d.ts").is_some());
}
