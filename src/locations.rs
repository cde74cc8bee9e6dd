//! Resource and output location resolution
//!
//! This module handles resolution of schema source locations (URLs, file
//! paths, in-memory strings) and the derivation of output module paths
//! from namespace URIs. Module paths follow the host-then-path layout the
//! generated tree is organized by, so `http://example.com/books` becomes
//! `example.com/books` under the output root.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use url::Url;

/// Resource location - can be a URL, file path, or string identifier
#[derive(Debug, Clone)]
pub enum Location {
    /// File system path
    Path(PathBuf),
    /// URL (http, https, ftp, etc.)
    Url(Url),
    /// String identifier (for in-memory resources)
    String(String),
}

impl Location {
    /// Create a location from a string (auto-detect type)
    pub fn from_str(s: &str) -> Result<Self> {
        // Try to parse as URL first
        if let Ok(url) = Url::parse(s) {
            if url.scheme() != "file" {
                return Ok(Location::Url(url));
            }
        }

        // Try as file path
        let path = PathBuf::from(s);
        if path.exists() || s.starts_with('/') || s.starts_with('.') {
            return Ok(Location::Path(path));
        }

        // Otherwise treat as string identifier
        Ok(Location::String(s.to_string()))
    }

    /// Get the location as a string
    pub fn as_str(&self) -> String {
        match self {
            Location::Path(p) => p.to_string_lossy().to_string(),
            Location::Url(u) => u.to_string(),
            Location::String(s) => s.clone(),
        }
    }

    /// Check if this is a remote location (URL)
    pub fn is_remote(&self) -> bool {
        matches!(self, Location::Url(_))
    }

    /// Resolve a schemaLocation reference relative to this location
    ///
    /// A path base resolves references against its parent directory; a URL
    /// base uses URL join semantics. In-memory bases cannot anchor relative
    /// references, so the reference is resolved standalone.
    pub fn resolve(&self, reference: &str) -> Result<Location> {
        match self {
            Location::Path(base) => {
                let referenced = PathBuf::from(reference);
                if referenced.is_absolute() {
                    return Ok(Location::Path(referenced));
                }
                let dir = base.parent().unwrap_or_else(|| Path::new(""));
                Ok(Location::Path(dir.join(referenced)))
            }
            Location::Url(base) => {
                let joined = base.join(reference)?;
                Ok(Location::Url(joined))
            }
            Location::String(_) => Location::from_str(reference),
        }
    }
}

/// Derive the output module stem for a namespace URI
///
/// URLs map to `host/path/segments`; URIs without a host (URNs, bare
/// identifiers) are split on every non-filename character. Never returns
/// an empty path; a namespace yielding no usable segments maps to `ns`.
pub fn module_stem(namespace_uri: &str) -> PathBuf {
    let mut segments: Vec<String> = Vec::new();

    if let Ok(url) = Url::parse(namespace_uri) {
        if let Some(host) = url.host_str() {
            segments.push(sanitize_segment(host));
            if let Some(path_segments) = url.path_segments() {
                for segment in path_segments {
                    let cleaned = sanitize_segment(segment);
                    if !cleaned.is_empty() {
                        segments.push(cleaned);
                    }
                }
            }
        }
    }

    if segments.is_empty() {
        for raw in namespace_uri
            .split(|c: char| !(c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-'))
        {
            let cleaned = sanitize_segment(raw);
            if !cleaned.is_empty() {
                segments.push(cleaned);
            }
        }
    }

    segments.retain(|s| !s.is_empty());
    if segments.is_empty() {
        segments.push("ns".to_string());
    }

    segments.iter().collect()
}

/// Compute the relative import path from one module stem to another
///
/// Both stems are relative to the same output root. The result is the
/// extension-less specifier written into import/require statements, always
/// starting with `./` or `../`.
pub fn relative_module_path(from: &Path, to: &Path) -> String {
    let from_dir: Vec<&str> = match from.parent() {
        Some(dir) => dir
            .components()
            .map(|c| c.as_os_str().to_str().unwrap_or_default())
            .collect(),
        None => Vec::new(),
    };
    let to_parts: Vec<&str> = to
        .components()
        .map(|c| c.as_os_str().to_str().unwrap_or_default())
        .collect();

    let common = from_dir
        .iter()
        .zip(to_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..from_dir.len() {
        parts.push("..".to_string());
    }
    if parts.is_empty() {
        parts.push(".".to_string());
    }
    for segment in &to_parts[common..] {
        parts.push((*segment).to_string());
    }

    parts.join("/")
}

fn sanitize_segment(segment: &str) -> String {
    segment
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '_' || *c == '-')
        .collect()
}

/// Read a location's content as a string (filesystem only)
pub fn read_to_string(location: &Location) -> Result<String> {
    match location {
        Location::Path(path) => std::fs::read_to_string(path).map_err(|e| {
            Error::Resource(format!("Failed to read file '{}': {}", path.display(), e))
        }),
        Location::Url(url) => Err(Error::Resource(format!(
            "Remote location cannot be read directly: {}",
            url
        ))),
        Location::String(s) => Ok(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_from_str_url() {
        let loc = Location::from_str("http://example.com/schema.xsd").unwrap();
        assert!(loc.is_remote());
    }

    #[test]
    fn test_location_from_str_path() {
        let loc = Location::from_str("./schema.xsd").unwrap();
        assert!(matches!(loc, Location::Path(_)));
        assert!(!loc.is_remote());
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = Location::Path(PathBuf::from("schemas/main.xsd"));
        let resolved = base.resolve("types.xsd").unwrap();
        match resolved {
            Location::Path(p) => assert_eq!(p, PathBuf::from("schemas/types.xsd")),
            other => panic!("expected path, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_relative_url() {
        let base = Location::Url(Url::parse("http://example.com/schemas/main.xsd").unwrap());
        let resolved = base.resolve("types.xsd").unwrap();
        assert_eq!(resolved.as_str(), "http://example.com/schemas/types.xsd");
    }

    #[test]
    fn test_module_stem_http() {
        assert_eq!(
            module_stem("http://example.com/books"),
            PathBuf::from("example.com/books")
        );
        assert_eq!(
            module_stem("http://www.w3.org/2001/XMLSchema"),
            PathBuf::from("www.w3.org/2001/XMLSchema")
        );
    }

    #[test]
    fn test_module_stem_urn() {
        assert_eq!(
            module_stem("urn:example:catalog"),
            PathBuf::from("urn/example/catalog")
        );
    }

    #[test]
    fn test_module_stem_empty() {
        assert_eq!(module_stem(""), PathBuf::from("ns"));
        assert_eq!(module_stem("::"), PathBuf::from("ns"));
    }

    #[test]
    fn test_relative_module_path_sibling() {
        let from = PathBuf::from("example.com/books");
        let to = PathBuf::from("example.com/types");
        assert_eq!(relative_module_path(&from, &to), "./types");
    }

    #[test]
    fn test_relative_module_path_cross_host() {
        let from = PathBuf::from("example.com/books");
        let to = PathBuf::from("www.w3.org/2001/XMLSchema");
        assert_eq!(
            relative_module_path(&from, &to),
            "../www.w3.org/2001/XMLSchema"
        );
    }

    #[test]
    fn test_relative_module_path_nested() {
        let from = PathBuf::from("example.com/deep/nested/books");
        let to = PathBuf::from("example.com/types");
        assert_eq!(relative_module_path(&from, &to), "../../types");
    }
}
