//! # xsdgen
//!
//! Convert XML Schema (XSD) definitions into typed ECMAScript modules:
//! one TypeScript declaration file and one JavaScript marshaling module
//! per XML namespace, cross-referencing each other through explicit
//! import statements.
//!
//! The pipeline runs in four strictly ordered stages over an in-memory
//! schema model: import scanning, identifier sanitization, import
//! finalization, and module emission through a pluggable output sink.
//!
//! ## Example
//!
//! ```rust,ignore
//! use xsdgen::locations::Location;
//! use xsdgen::writers::CacheWriter;
//! use xsdgen::xsd::SchemaReader;
//!
//! let spec = SchemaReader::new().read(&Location::from_str("schema.xsd")?)?;
//! let mut declarations = CacheWriter::new("xmlns");
//! let mut implementations = CacheWriter::new("xmlns");
//! let emitted = xsdgen::generate(spec, &mut declarations, &mut implementations)?;
//! println!("{} units written", emitted.unit_count());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;

// Utilities
pub mod locations;
pub mod names;
pub mod namespaces;

// Schema loading
pub mod documents;
pub mod loaders;
pub mod xsd;

// The schema model and linking pipeline
pub mod emitters;
pub mod model;
pub mod pipeline;
pub mod transform;
pub mod writers;

// Re-exports for convenience
pub use error::{Error, Result};
pub use model::Spec;
pub use pipeline::{generate, generate_with};

/// Version of the xsdgen library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// XSD namespace
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// XML namespace
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
