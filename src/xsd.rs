//! Simplified XSD document reading
//!
//! Populates the schema model from `.xsd` sources: top-level elements,
//! complex types (sequence/choice/all particles, attributes, complex and
//! simple content), simple types (restriction bases, enumeration facets,
//! list item types) and documentation annotations. `xs:import` and
//! `xs:include` are followed recursively across local files up to the
//! configured depth.
//!
//! Reading happens in two phases: every document contributes type shells
//! in declaration order first, then all recorded QName references are
//! resolved into model type references. Forward and cross-file references
//! need no special handling that way.

use crate::documents::{self, Element};
use crate::error::{Error, ParseError, Result};
use crate::loaders::Loader;
use crate::locations::Location;
use crate::model::{Member, Spec, TypeKind, TypeRef, TypeSpec};
use crate::namespaces::QName;
use std::collections::{HashSet, VecDeque};

/// XSD element local names
mod xsd_elements {
    pub const SCHEMA: &str = "schema";
    pub const ELEMENT: &str = "element";
    pub const COMPLEX_TYPE: &str = "complexType";
    pub const SIMPLE_TYPE: &str = "simpleType";
    pub const ATTRIBUTE: &str = "attribute";
    pub const SEQUENCE: &str = "sequence";
    pub const CHOICE: &str = "choice";
    pub const ALL: &str = "all";
    pub const ANNOTATION: &str = "annotation";
    pub const DOCUMENTATION: &str = "documentation";
    pub const IMPORT: &str = "import";
    pub const INCLUDE: &str = "include";
    pub const RESTRICTION: &str = "restriction";
    pub const EXTENSION: &str = "extension";
    pub const ENUMERATION: &str = "enumeration";
    pub const COMPLEX_CONTENT: &str = "complexContent";
    pub const SIMPLE_CONTENT: &str = "simpleContent";
    pub const LIST: &str = "list";
    pub const UNION: &str = "union";
}

/// XSD attribute names
mod xsd_attrs {
    pub const NAME: &str = "name";
    pub const TYPE: &str = "type";
    pub const REF: &str = "ref";
    pub const TARGET_NAMESPACE: &str = "targetNamespace";
    pub const BASE: &str = "base";
    pub const VALUE: &str = "value";
    pub const MIN_OCCURS: &str = "minOccurs";
    pub const MAX_OCCURS: &str = "maxOccurs";
    pub const USE: &str = "use";
    pub const SCHEMA_LOCATION: &str = "schemaLocation";
    pub const ITEM_TYPE: &str = "itemType";
}

/// A schema document queued for processing
struct PendingDocument {
    location: Location,
    depth: usize,
    /// Namespace forced on the document (chameleon includes)
    parent_namespace: Option<String>,
}

/// Unresolved references recorded for one type shell
struct PendingType {
    namespace: String,
    index: usize,
    base: Option<QName>,
    members: Vec<PendingMember>,
}

struct PendingMember {
    name: String,
    type_ref: QName,
    min_occurs: u32,
    max_occurs: Option<u32>,
    is_attribute: bool,
}

/// Reads XSD documents into a schema model
#[derive(Debug, Default)]
pub struct SchemaReader {
    loader: Loader,
    /// Namespace used when a schema declares no targetNamespace
    fallback_namespace: Option<String>,
}

impl SchemaReader {
    /// Create a reader with default settings
    pub fn new() -> Self {
        Self {
            loader: Loader::new(),
            fallback_namespace: None,
        }
    }

    /// Set the loader
    pub fn with_loader(mut self, loader: Loader) -> Self {
        self.loader = loader;
        self
    }

    /// Set the namespace used for schemas without a targetNamespace
    pub fn with_fallback_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.fallback_namespace = Some(namespace.into());
        self
    }

    /// Read a root schema and everything it imports or includes
    ///
    /// Returns a model seeded with the XSD built-in namespace, populated
    /// with every type the schema set exports, all references resolved.
    pub fn read(&self, location: &Location) -> Result<Spec> {
        let mut spec = Spec::with_builtins();
        let mut pending_types: Vec<PendingType> = Vec::new();
        let mut queue: VecDeque<PendingDocument> = VecDeque::new();
        let mut visited: HashSet<String> = HashSet::new();

        queue.push_back(PendingDocument {
            location: location.clone(),
            depth: 0,
            parent_namespace: None,
        });

        while let Some(work) = queue.pop_front() {
            self.loader.limits().check_schema_depth(work.depth)?;
            if !visited.insert(work.location.as_str()) {
                continue;
            }

            let text = self.loader.load(&work.location)?;
            let root = documents::parse(&text)?;
            self.read_document(&root, &work, &mut spec, &mut pending_types, &mut queue)?;
        }

        self.resolve_pending(&mut spec, pending_types)?;
        Ok(spec)
    }

    /// Process one parsed schema document (phase one)
    fn read_document(
        &self,
        root: &Element,
        work: &PendingDocument,
        spec: &mut Spec,
        pending_types: &mut Vec<PendingType>,
        queue: &mut VecDeque<PendingDocument>,
    ) -> Result<()> {
        if root.tag() != xsd_elements::SCHEMA {
            return Err(ParseError::new(format!(
                "Expected xs:schema root, found '{}'",
                root.tag()
            ))
            .with_location(work.location.as_str())
            .into());
        }

        let target_namespace = match root.attr(xsd_attrs::TARGET_NAMESPACE) {
            Some(tns) => tns.to_string(),
            None => work
                .parent_namespace
                .clone()
                .or_else(|| self.fallback_namespace.clone())
                .ok_or_else(|| {
                    Error::Namespace(format!(
                        "Schema '{}' declares no targetNamespace and no fallback was given",
                        work.location.as_str()
                    ))
                })?,
        };

        {
            let namespace = spec.ensure_namespace(&target_namespace);
            if namespace.short.is_none() {
                if let Some(short) = short_name_hint(root, &target_namespace) {
                    namespace.short = Some(short);
                }
            }
        }

        for child in &root.children {
            match child.tag() {
                xsd_elements::IMPORT | xsd_elements::INCLUDE => {
                    if let Some(schema_location) = child.attr(xsd_attrs::SCHEMA_LOCATION) {
                        let resolved = work.location.resolve(schema_location)?;
                        let parent_namespace = if child.tag() == xsd_elements::INCLUDE {
                            // Chameleon include: the included document
                            // takes the including document's namespace.
                            Some(target_namespace.clone())
                        } else {
                            None
                        };
                        queue.push_back(PendingDocument {
                            location: resolved,
                            depth: work.depth + 1,
                            parent_namespace,
                        });
                    }
                }
                xsd_elements::ELEMENT => {
                    self.read_top_level_element(child, &target_namespace, spec, pending_types)?;
                }
                xsd_elements::COMPLEX_TYPE => {
                    self.read_complex_type(child, None, &target_namespace, spec, pending_types)?;
                }
                xsd_elements::SIMPLE_TYPE => {
                    self.read_simple_type(child, None, &target_namespace, spec, pending_types)?;
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// A top-level element exports a type named after the element
    fn read_top_level_element(
        &self,
        element: &Element,
        target_namespace: &str,
        spec: &mut Spec,
        pending_types: &mut Vec<PendingType>,
    ) -> Result<()> {
        let name = required_name(element, "top-level element")?;

        if let Some(inline) = element.find_child(xsd_elements::COMPLEX_TYPE) {
            return self.read_complex_type(
                inline,
                Some(name),
                target_namespace,
                spec,
                pending_types,
            );
        }
        if let Some(inline) = element.find_child(xsd_elements::SIMPLE_TYPE) {
            return self.read_simple_type(
                inline,
                Some(name),
                target_namespace,
                spec,
                pending_types,
            );
        }

        // Element with a referenced type (or none: anyType)
        let base = match element.qname_attr(xsd_attrs::TYPE)? {
            Some(qname) => qualify(qname, target_namespace),
            None => QName::qualified(crate::XSD_NAMESPACE, "anyType"),
        };

        let mut type_spec = TypeSpec::new(name, TypeKind::Complex);
        if let Some(doc) = documentation_of(element) {
            type_spec = type_spec.with_comment(doc);
        }
        let index = spec.ensure_namespace(target_namespace).add_type(type_spec);
        pending_types.push(PendingType {
            namespace: target_namespace.to_string(),
            index,
            base: Some(base),
            members: Vec::new(),
        });
        Ok(())
    }

    fn read_complex_type(
        &self,
        element: &Element,
        name_override: Option<String>,
        target_namespace: &str,
        spec: &mut Spec,
        pending_types: &mut Vec<PendingType>,
    ) -> Result<()> {
        let name = match name_override {
            Some(name) => name,
            None => required_name(element, "complexType")?,
        };

        let mut base: Option<QName> = None;
        let mut members: Vec<PendingMember> = Vec::new();

        // complexContent/simpleContent extension or restriction carries
        // the base; its body carries particles and attributes.
        let content = element
            .find_child(xsd_elements::COMPLEX_CONTENT)
            .or_else(|| element.find_child(xsd_elements::SIMPLE_CONTENT));
        let body = match content {
            Some(content) => {
                let derivation = content
                    .find_child(xsd_elements::EXTENSION)
                    .or_else(|| content.find_child(xsd_elements::RESTRICTION))
                    .ok_or_else(|| {
                        ParseError::new(format!(
                            "complexType '{}' content has no extension or restriction",
                            name
                        ))
                    })?;
                if let Some(qname) = derivation.qname_attr(xsd_attrs::BASE)? {
                    base = Some(qualify(qname, target_namespace));
                }
                derivation
            }
            None => element,
        };

        self.collect_particles(body, target_namespace, false, &mut members)?;
        self.collect_attributes(body, target_namespace, &mut members)?;

        let mut type_spec = TypeSpec::new(name, TypeKind::Complex);
        if let Some(doc) = documentation_of(element) {
            type_spec = type_spec.with_comment(doc);
        }
        let index = spec.ensure_namespace(target_namespace).add_type(type_spec);
        pending_types.push(PendingType {
            namespace: target_namespace.to_string(),
            index,
            base,
            members,
        });
        Ok(())
    }

    fn read_simple_type(
        &self,
        element: &Element,
        name_override: Option<String>,
        target_namespace: &str,
        spec: &mut Spec,
        pending_types: &mut Vec<PendingType>,
    ) -> Result<()> {
        let name = match name_override {
            Some(name) => name,
            None => required_name(element, "simpleType")?,
        };

        let mut base: Option<QName> = None;
        let mut kind = TypeKind::Simple;

        if let Some(restriction) = element.find_child(xsd_elements::RESTRICTION) {
            let values: Vec<String> = restriction
                .find_children(xsd_elements::ENUMERATION)
                .iter()
                .filter_map(|e| e.attr(xsd_attrs::VALUE))
                .map(|v| v.to_string())
                .collect();
            if values.is_empty() {
                if let Some(qname) = restriction.qname_attr(xsd_attrs::BASE)? {
                    base = Some(qualify(qname, target_namespace));
                }
            } else {
                kind = TypeKind::Enumeration(values);
            }
        } else if let Some(list) = element.find_child(xsd_elements::LIST) {
            // Lists collapse to their item type's alias
            if let Some(qname) = list.qname_attr(xsd_attrs::ITEM_TYPE)? {
                base = Some(qualify(qname, target_namespace));
            }
        } else if element.find_child(xsd_elements::UNION).is_some() {
            // Unions have no single base and alias to any
            base = None;
        }

        let mut type_spec = TypeSpec::new(name, kind);
        if let Some(doc) = documentation_of(element) {
            type_spec = type_spec.with_comment(doc);
        }
        let index = spec.ensure_namespace(target_namespace).add_type(type_spec);
        pending_types.push(PendingType {
            namespace: target_namespace.to_string(),
            index,
            base,
            members: Vec::new(),
        });
        Ok(())
    }

    /// Walk sequence/choice/all containers, collecting element members
    fn collect_particles(
        &self,
        element: &Element,
        target_namespace: &str,
        forced_optional: bool,
        members: &mut Vec<PendingMember>,
    ) -> Result<()> {
        for child in &element.children {
            match child.tag() {
                xsd_elements::SEQUENCE | xsd_elements::ALL => {
                    self.collect_particles(child, target_namespace, forced_optional, members)?;
                }
                xsd_elements::CHOICE => {
                    // Every branch of a choice may be absent
                    self.collect_particles(child, target_namespace, true, members)?;
                }
                xsd_elements::ELEMENT => {
                    let (name, type_ref) = match child.attr(xsd_attrs::NAME) {
                        Some(name) => {
                            let type_ref = match child.qname_attr(xsd_attrs::TYPE)? {
                                Some(qname) => qualify(qname, target_namespace),
                                // Inline or absent type: anyType
                                None => QName::qualified(crate::XSD_NAMESPACE, "anyType"),
                            };
                            (name.to_string(), type_ref)
                        }
                        None => match child.qname_attr(xsd_attrs::REF)? {
                            Some(reference) => {
                                let reference = qualify(reference, target_namespace);
                                (reference.local.clone(), reference)
                            }
                            None => continue,
                        },
                    };

                    let (mut min_occurs, max_occurs) = parse_occurs(child)?;
                    if forced_optional {
                        min_occurs = 0;
                    }
                    members.push(PendingMember {
                        name,
                        type_ref,
                        min_occurs,
                        max_occurs,
                        is_attribute: false,
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Collect attribute members declared directly on a type body
    fn collect_attributes(
        &self,
        element: &Element,
        target_namespace: &str,
        members: &mut Vec<PendingMember>,
    ) -> Result<()> {
        for attribute in element.find_children(xsd_elements::ATTRIBUTE) {
            let name = match attribute.attr(xsd_attrs::NAME) {
                Some(name) => name.to_string(),
                None => continue,
            };
            let type_ref = match attribute.qname_attr(xsd_attrs::TYPE)? {
                Some(qname) => qualify(qname, target_namespace),
                None => QName::qualified(crate::XSD_NAMESPACE, "anySimpleType"),
            };
            let min_occurs = match attribute.attr(xsd_attrs::USE) {
                Some("required") => 1,
                _ => 0,
            };
            members.push(PendingMember {
                name,
                type_ref,
                min_occurs,
                max_occurs: Some(1),
                is_attribute: true,
            });
        }
        Ok(())
    }

    /// Resolve every recorded QName into a model reference (phase two)
    fn resolve_pending(&self, spec: &mut Spec, pending_types: Vec<PendingType>) -> Result<()> {
        let mut resolved: Vec<(String, usize, Option<TypeRef>, Vec<Member>)> =
            Vec::with_capacity(pending_types.len());

        for pending in &pending_types {
            let owner = &pending.namespace;
            let base = match &pending.base {
                Some(qname) => Some(resolve_reference(spec, qname, owner)?),
                None => None,
            };
            let mut members = Vec::with_capacity(pending.members.len());
            for member in &pending.members {
                let type_ref = resolve_reference(spec, &member.type_ref, owner)?;
                let mut resolved_member = Member::new(member.name.clone(), type_ref)
                    .with_occurs(member.min_occurs, member.max_occurs);
                resolved_member.is_attribute = member.is_attribute;
                members.push(resolved_member);
            }
            resolved.push((pending.namespace.clone(), pending.index, base, members));
        }

        for (namespace_uri, index, base, members) in resolved {
            // Namespace and index both come from phase one
            let namespace = spec.namespace_mut(&namespace_uri).unwrap();
            let type_spec = &mut namespace.types[index];
            type_spec.base = base;
            type_spec.members = members;
        }

        Ok(())
    }
}

/// Resolve a parsed QName against the model
fn resolve_reference(spec: &Spec, qname: &QName, owner_uri: &str) -> Result<TypeRef> {
    let uri = qname.namespace.as_deref().unwrap_or(owner_uri);
    let namespace = spec.namespace(uri).ok_or_else(|| {
        ParseError::new(format!(
            "Type reference '{}' points into a namespace that was never loaded",
            qname
        ))
        .with_location(owner_uri.to_string())
    })?;
    let index = namespace.index_of(&qname.local).ok_or_else(|| {
        ParseError::new(format!("Unknown type '{}' in namespace '{}'", qname.local, uri))
            .with_location(owner_uri.to_string())
    })?;
    Ok(TypeRef::new(uri, index))
}

/// Apply the owning namespace to an unqualified QName
fn qualify(qname: QName, target_namespace: &str) -> QName {
    if qname.namespace.is_some() {
        qname
    } else {
        QName::qualified(target_namespace, qname.local)
    }
}

fn required_name(element: &Element, what: &str) -> Result<String> {
    element
        .attr(xsd_attrs::NAME)
        .map(|n| n.to_string())
        .ok_or_else(|| ParseError::new(format!("Unnamed {}", what)).into())
}

/// Extract xs:annotation/xs:documentation text
fn documentation_of(element: &Element) -> Option<String> {
    element
        .find_child(xsd_elements::ANNOTATION)?
        .find_child(xsd_elements::DOCUMENTATION)?
        .text
        .clone()
}

/// Pick the XSD prefix bound to the target namespace as the short name
fn short_name_hint(root: &Element, target_namespace: &str) -> Option<String> {
    let mut candidates: Vec<&str> = root
        .scope
        .bindings()
        .filter(|(_, uri)| *uri == target_namespace)
        .map(|(prefix, _)| prefix)
        .collect();
    candidates.sort_unstable();
    match candidates.first() {
        Some(prefix) => Some((*prefix).to_string()),
        None => {
            // Fall back to the last module-path segment
            crate::locations::module_stem(target_namespace)
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
        }
    }
}

fn parse_occurs(element: &Element) -> Result<(u32, Option<u32>)> {
    let min_occurs = match element.attr(xsd_attrs::MIN_OCCURS) {
        Some(value) => value.parse::<u32>().map_err(|_| {
            Error::Parse(ParseError::new(format!("Invalid minOccurs '{}'", value)))
        })?,
        None => 1,
    };
    let max_occurs = match element.attr(xsd_attrs::MAX_OCCURS) {
        Some("unbounded") => None,
        Some(value) => Some(value.parse::<u32>().map_err(|_| {
            Error::Parse(ParseError::new(format!("Invalid maxOccurs '{}'", value)))
        })?),
        None => Some(1),
    };
    Ok((min_occurs, max_occurs))
}
