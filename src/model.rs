//! Schema model
//!
//! The in-memory model the linking and emission pipeline operates on: an
//! ordered set of namespaces, each owning an ordered sequence of exported
//! types. Type references are fully resolved (namespace plus declaration
//! index), as delivered by the schema reader; a reference that does not
//! resolve against the model is a fatal integrity error in the linker.
//!
//! Ordering matters throughout this module: namespaces and types iterate
//! in insertion (declaration) order so collision tie-breaking and emitted
//! output are reproducible across runs.

use crate::locations;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// ECMAScript mapping for an XSD built-in type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Primitive {
    /// Maps to `string`
    String,
    /// Maps to `number`
    Number,
    /// Maps to `boolean`
    Boolean,
    /// Maps to `any` (anyType, anySimpleType)
    Any,
}

impl Primitive {
    /// The TypeScript keyword this primitive maps to
    pub fn ts_keyword(&self) -> &'static str {
        match self {
            Primitive::String => "string",
            Primitive::Number => "number",
            Primitive::Boolean => "boolean",
            Primitive::Any => "any",
        }
    }

    /// The JavaScript constructor used in runtime marshaling tables
    pub fn js_constructor(&self) -> &'static str {
        match self {
            Primitive::String => "String",
            Primitive::Number => "Number",
            Primitive::Boolean => "Boolean",
            Primitive::Any => "Object",
        }
    }
}

/// Kind tag for an exported type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    /// XSD built-in type with a fixed ECMAScript mapping
    Primitive(Primitive),
    /// Complex type with members
    Complex,
    /// Simple type (alias of its base)
    Simple,
    /// Enumerated simple type
    Enumeration(Vec<String>),
}

impl TypeKind {
    /// Short label used in summaries and diagnostics
    pub fn label(&self) -> &'static str {
        match self {
            TypeKind::Primitive(_) => "primitive",
            TypeKind::Complex => "complex",
            TypeKind::Simple => "simple",
            TypeKind::Enumeration(_) => "enumeration",
        }
    }
}

/// A resolved reference to an exported type
///
/// Identifies the target by owning namespace and declaration index, so
/// two same-named types remain distinguishable to their referencers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    /// Target namespace URI
    pub namespace: String,
    /// Declaration index of the target within its namespace
    pub index: usize,
}

impl TypeRef {
    /// Create a reference
    pub fn new(namespace: impl Into<String>, index: usize) -> Self {
        Self {
            namespace: namespace.into(),
            index,
        }
    }

    /// Check whether this reference crosses out of the given namespace
    pub fn is_foreign(&self, owner_uri: &str) -> bool {
        self.namespace != owner_uri
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}#{}", self.namespace, self.index)
    }
}

/// A member field of a complex type
#[derive(Debug, Clone)]
pub struct Member {
    /// Member name as declared in the schema
    pub name: String,
    /// Reference to the member's type
    pub type_ref: TypeRef,
    /// Minimum occurrences
    pub min_occurs: u32,
    /// Maximum occurrences (None means unbounded)
    pub max_occurs: Option<u32>,
    /// Whether this member came from an XSD attribute
    pub is_attribute: bool,
}

impl Member {
    /// Create a new element member with default cardinality
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            min_occurs: 1,
            max_occurs: Some(1),
            is_attribute: false,
        }
    }

    /// Set the cardinality
    pub fn with_occurs(mut self, min: u32, max: Option<u32>) -> Self {
        self.min_occurs = min;
        self.max_occurs = max;
        self
    }

    /// Mark the member as attribute-derived
    pub fn as_attribute(mut self) -> Self {
        self.is_attribute = true;
        // Attributes never repeat
        self.max_occurs = Some(1);
        self
    }

    /// Whether the member may be absent
    pub fn is_optional(&self) -> bool {
        self.min_occurs == 0
    }

    /// Whether the member may repeat
    pub fn is_array(&self) -> bool {
        match self.max_occurs {
            None => true,
            Some(max) => max > 1,
        }
    }
}

/// An exported schema type
#[derive(Debug, Clone)]
pub struct TypeSpec {
    /// Original (XSD-derived) name
    pub name: String,
    /// Committed output identifier (None until sanitization commits)
    pub safe_name: Option<String>,
    /// Kind tag
    pub kind: TypeKind,
    /// Base type reference (extension/restriction base, alias target)
    pub base: Option<TypeRef>,
    /// Member fields (complex types)
    pub members: Vec<Member>,
    /// Documentation pulled from xs:annotation
    pub comment: Option<String>,
}

impl TypeSpec {
    /// Create a new type
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            safe_name: None,
            kind,
            base: None,
            members: Vec::new(),
            comment: None,
        }
    }

    /// Set the base type reference
    pub fn with_base(mut self, base: TypeRef) -> Self {
        self.base = Some(base);
        self
    }

    /// Append a member
    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    /// Set the documentation comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// All outgoing type references, base first, then members in order
    pub fn references(&self) -> Vec<&TypeRef> {
        let mut refs: Vec<&TypeRef> = Vec::new();
        if let Some(ref base) = self.base {
            refs.push(base);
        }
        for member in &self.members {
            refs.push(&member.type_ref);
        }
        refs
    }

    /// The committed output identifier
    ///
    /// Falls back to the original name before sanitization commits; the
    /// pipeline's staging guarantees emitters only ever see committed
    /// names.
    pub fn output_name(&self) -> &str {
        self.safe_name.as_deref().unwrap_or(&self.name)
    }

    /// Qualified name for diagnostics
    pub fn qualified_name(&self, owner_uri: &str) -> String {
        format!("{{{}}}{}", owner_uri, self.name)
    }
}

/// A finalized import statement for a generated module
#[derive(Debug, Clone)]
pub struct ImportStatement {
    /// Module-scope binding the import is named as
    pub binding: String,
    /// Target namespace URI
    pub target_uri: String,
    /// Relative module specifier (extension-less)
    pub module_path: String,
    /// Final names of the referenced types, in first-seen order
    pub type_names: Vec<String>,
}

/// A namespace: one output module per emitted language
#[derive(Debug, Clone)]
pub struct Namespace {
    /// Namespace URI
    pub uri: String,
    /// Short name hint (XSD prefix or last URI segment)
    pub short: Option<String>,
    /// Exported types in declaration order
    pub types: Vec<TypeSpec>,
    /// Finalized imports (empty until the resolver's finalize pass)
    pub imports: Vec<ImportStatement>,
}

impl Namespace {
    /// Create a new empty namespace
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            short: None,
            types: Vec::new(),
            imports: Vec::new(),
        }
    }

    /// Set the short name hint
    pub fn with_short(mut self, short: impl Into<String>) -> Self {
        self.short = Some(short.into());
        self
    }

    /// Append an exported type, returning its declaration index
    pub fn add_type(&mut self, type_spec: TypeSpec) -> usize {
        self.types.push(type_spec);
        self.types.len() - 1
    }

    /// Find the first exported type with the given original name
    pub fn type_named(&self, name: &str) -> Option<&TypeSpec> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Find the declaration index of the first type with the given name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.types.iter().position(|t| t.name == name)
    }

    /// The output module stem relative to the output root
    pub fn module_stem(&self) -> PathBuf {
        locations::module_stem(&self.uri)
    }

    /// The import recorded against a target namespace, if any
    pub fn import_for(&self, target_uri: &str) -> Option<&ImportStatement> {
        self.imports.iter().find(|i| i.target_uri == target_uri)
    }
}

/// The complete schema model handed through the pipeline
#[derive(Debug, Clone, Default)]
pub struct Spec {
    namespaces: IndexMap<String, Namespace>,
}

impl Spec {
    /// Create an empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a model seeded with the XSD built-in namespace
    pub fn with_builtins() -> Self {
        let mut spec = Self::new();
        spec.add_namespace(builtin_namespace());
        spec
    }

    /// Insert a namespace, replacing any namespace with the same URI
    pub fn add_namespace(&mut self, namespace: Namespace) {
        self.namespaces.insert(namespace.uri.clone(), namespace);
    }

    /// Get or create the namespace for a URI
    pub fn ensure_namespace(&mut self, uri: &str) -> &mut Namespace {
        if !self.namespaces.contains_key(uri) {
            self.namespaces.insert(uri.to_string(), Namespace::new(uri));
        }
        // Just inserted above when absent
        self.namespaces.get_mut(uri).unwrap()
    }

    /// Look up a namespace by URI
    pub fn namespace(&self, uri: &str) -> Option<&Namespace> {
        self.namespaces.get(uri)
    }

    /// Look up a namespace by URI, mutably
    pub fn namespace_mut(&mut self, uri: &str) -> Option<&mut Namespace> {
        self.namespaces.get_mut(uri)
    }

    /// Iterate namespaces in insertion order
    pub fn namespaces(&self) -> impl Iterator<Item = &Namespace> {
        self.namespaces.values()
    }

    /// Iterate namespaces in insertion order, mutably
    pub fn namespaces_mut(&mut self) -> impl Iterator<Item = &mut Namespace> {
        self.namespaces.values_mut()
    }

    /// Number of namespaces
    pub fn namespace_count(&self) -> usize {
        self.namespaces.len()
    }

    /// Total number of exported types
    pub fn type_count(&self) -> usize {
        self.namespaces.values().map(|ns| ns.types.len()).sum()
    }

    /// Whether the model holds no namespaces
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    /// Resolve a type reference against the model
    pub fn lookup(&self, reference: &TypeRef) -> Option<&TypeSpec> {
        self.namespaces
            .get(&reference.namespace)?
            .types
            .get(reference.index)
    }

    /// Build a reference to the first type with the given name
    pub fn ref_to(&self, namespace_uri: &str, name: &str) -> Option<TypeRef> {
        let index = self.namespaces.get(namespace_uri)?.index_of(name)?;
        Some(TypeRef::new(namespace_uri, index))
    }

    /// Build a serializable summary of the model
    pub fn summary(&self) -> SpecSummary {
        SpecSummary {
            namespaces: self
                .namespaces
                .values()
                .map(|ns| NamespaceSummary {
                    uri: ns.uri.clone(),
                    short: ns.short.clone(),
                    types: ns
                        .types
                        .iter()
                        .map(|t| TypeSummary {
                            name: t.name.clone(),
                            safe_name: t.safe_name.clone(),
                            kind: t.kind.label().to_string(),
                            member_count: t.members.len(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Serializable model summary (CLI `inspect --json`)
#[derive(Debug, Clone, Serialize)]
pub struct SpecSummary {
    /// Per-namespace summaries in declaration order
    pub namespaces: Vec<NamespaceSummary>,
}

/// Summary of one namespace
#[derive(Debug, Clone, Serialize)]
pub struct NamespaceSummary {
    /// Namespace URI
    pub uri: String,
    /// Short name hint
    pub short: Option<String>,
    /// Exported type summaries in declaration order
    pub types: Vec<TypeSummary>,
}

/// Summary of one exported type
#[derive(Debug, Clone, Serialize)]
pub struct TypeSummary {
    /// Original name
    pub name: String,
    /// Committed output identifier, if sanitization has run
    pub safe_name: Option<String>,
    /// Kind label
    pub kind: String,
    /// Number of members
    pub member_count: usize,
}

/// Map an XSD built-in type local name onto its ECMAScript primitive
pub fn xsd_primitive(local_name: &str) -> Option<Primitive> {
    match local_name {
        "string" | "normalizedString" | "token" | "language" | "Name" | "NCName" | "ID"
        | "IDREF" | "IDREFS" | "ENTITY" | "ENTITIES" | "NMTOKEN" | "NMTOKENS" | "duration"
        | "dateTime" | "time" | "date" | "gYearMonth" | "gYear" | "gMonthDay" | "gDay"
        | "gMonth" | "hexBinary" | "base64Binary" | "anyURI" | "QName" | "NOTATION" => {
            Some(Primitive::String)
        }
        "decimal" | "integer" | "long" | "int" | "short" | "byte" | "nonNegativeInteger"
        | "positiveInteger" | "unsignedLong" | "unsignedInt" | "unsignedShort"
        | "unsignedByte" | "nonPositiveInteger" | "negativeInteger" | "float" | "double" => {
            Some(Primitive::Number)
        }
        "boolean" => Some(Primitive::Boolean),
        "anyType" | "anySimpleType" => Some(Primitive::Any),
        _ => None,
    }
}

/// All XSD built-in type names in a fixed declaration order
const XSD_BUILTIN_NAMES: &[&str] = &[
    "anyType",
    "anySimpleType",
    "string",
    "normalizedString",
    "token",
    "language",
    "Name",
    "NCName",
    "ID",
    "IDREF",
    "IDREFS",
    "ENTITY",
    "ENTITIES",
    "NMTOKEN",
    "NMTOKENS",
    "boolean",
    "decimal",
    "integer",
    "long",
    "int",
    "short",
    "byte",
    "nonNegativeInteger",
    "positiveInteger",
    "unsignedLong",
    "unsignedInt",
    "unsignedShort",
    "unsignedByte",
    "nonPositiveInteger",
    "negativeInteger",
    "float",
    "double",
    "duration",
    "dateTime",
    "time",
    "date",
    "gYearMonth",
    "gYear",
    "gMonthDay",
    "gDay",
    "gMonth",
    "hexBinary",
    "base64Binary",
    "anyURI",
    "QName",
    "NOTATION",
];

/// Build the XSD built-in namespace (the primitive space)
pub fn builtin_namespace() -> Namespace {
    let mut namespace = Namespace::new(crate::XSD_NAMESPACE).with_short("xsd");
    for name in XSD_BUILTIN_NAMES {
        // Table above covers every listed name
        let primitive = xsd_primitive(name).unwrap();
        namespace.add_type(TypeSpec::new(*name, TypeKind::Primitive(primitive)));
    }
    namespace
}
