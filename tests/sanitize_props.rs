//! Property-based tests for the identifier sanitizer

use proptest::prelude::*;
use std::collections::HashSet;
use xsdgen::model::{Namespace, Spec, TypeKind, TypeSpec};
use xsdgen::names;
use xsdgen::transform::Sanitizer;

const PROP_NS: &str = "http://example.com/prop";

fn spec_from_names(type_names: &[String]) -> Spec {
    let mut spec = Spec::new();
    let mut namespace = Namespace::new(PROP_NS);
    for name in type_names {
        namespace.add_type(TypeSpec::new(name.clone(), TypeKind::Complex));
    }
    spec.add_namespace(namespace);
    spec
}

proptest! {
    /// Every committed name is a valid identifier and unique within its
    /// namespace, whatever the input names look like.
    #[test]
    fn committed_names_unique_and_valid(
        type_names in prop::collection::vec("[a-zA-Z0-9_.:\\- ]{0,12}", 0..24)
    ) {
        let mut spec = spec_from_names(&type_names);
        let sanitizer = Sanitizer::new();
        let plan = sanitizer.compute(&spec).unwrap();
        let map = sanitizer.commit(&mut spec, plan).unwrap();

        prop_assert_eq!(map.len(), type_names.len());

        let mut seen = HashSet::new();
        for type_spec in &spec.namespace(PROP_NS).unwrap().types {
            let name = type_spec.safe_name.as_ref().unwrap();
            prop_assert!(
                names::is_valid_identifier(name),
                "invalid identifier {:?} from {:?}", name, type_spec.name
            );
            prop_assert!(
                seen.insert(name.clone()),
                "duplicate identifier {:?}", name
            );
        }
    }

    /// Identical inputs always plan identical names.
    #[test]
    fn planning_is_deterministic(
        type_names in prop::collection::vec("[a-zA-Z0-9_.:\\- ]{0,12}", 0..24)
    ) {
        let spec = spec_from_names(&type_names);
        let sanitizer = Sanitizer::new();
        let first = sanitizer.compute(&spec).unwrap();
        let second = sanitizer.compute(&spec).unwrap();
        prop_assert_eq!(first.planned_names(PROP_NS), second.planned_names(PROP_NS));
    }

    /// Names that are already valid, collision-free identifiers pass
    /// through unchanged.
    #[test]
    fn valid_unique_names_pass_through(
        type_names in prop::collection::hash_set("[A-Z][a-zA-Z0-9_]{0,10}", 0..16)
    ) {
        let type_names: Vec<String> = type_names.into_iter().collect();
        let mut spec = spec_from_names(&type_names);
        let sanitizer = Sanitizer::new();
        let plan = sanitizer.compute(&spec).unwrap();
        sanitizer.commit(&mut spec, plan).unwrap();

        for type_spec in &spec.namespace(PROP_NS).unwrap().types {
            prop_assert_eq!(type_spec.safe_name.as_ref().unwrap(), &type_spec.name);
        }
    }
}
