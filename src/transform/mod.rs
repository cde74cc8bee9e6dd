//! Model transforms: import resolution and identifier sanitization
//!
//! The two linking passes that prepare the schema model for emission. The
//! import resolver discovers cross-namespace references (scan) and records
//! final import statements (finalize); the sanitizer rewrites type names
//! into collision-free output identifiers (compute/commit). The finalize
//! pass depends on committed renames, which is why both transforms expose
//! explicit intermediate values instead of mutating behind the scenes:
//! the pipeline cannot run a stage without holding its predecessor's
//! output.

pub mod imports;
pub mod sanitize;

pub use imports::{ImportRequirement, ImportResolver, ImportsFound};
pub use sanitize::{RenameMap, RenamePlan, Sanitizer};
