//! Qualified names and prefix scopes
//!
//! Schema documents refer to types through prefixed names
//! (`type="tns:Author"`). A [`QName`] is such a name with its prefix
//! expanded to the bound namespace URI; a [`PrefixScope`] holds the
//! `xmlns` bindings in effect at one element of the document tree.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;

/// A namespace-qualified name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Namespace URI the prefix expanded to (None when unqualified)
    pub namespace: Option<String>,
    /// Local part
    pub local: String,
}

impl QName {
    /// A name carrying an explicit namespace
    pub fn qualified(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local: local.into(),
        }
    }

    /// A name with no namespace
    pub fn unqualified(local: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local: local.into(),
        }
    }
}

impl fmt::Display for QName {
    // Clark notation: {uri}local
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local),
            None => f.write_str(&self.local),
        }
    }
}

/// The `xmlns` bindings in effect at one point of a document
///
/// Scopes nest by cloning: an element starts from its parent's scope and
/// overlays its own declarations, so inner bindings shadow outer ones.
#[derive(Debug, Clone, Default)]
pub struct PrefixScope {
    bindings: HashMap<String, String>,
    default_ns: Option<String>,
}

impl PrefixScope {
    /// An empty scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a prefix to a namespace URI
    pub fn bind(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        self.bindings.insert(prefix.into(), uri.into());
    }

    /// Bind the default (prefix-less) namespace
    pub fn bind_default(&mut self, uri: impl Into<String>) {
        self.default_ns = Some(uri.into());
    }

    /// The URI a prefix is bound to
    pub fn uri_for(&self, prefix: &str) -> Option<&str> {
        self.bindings.get(prefix).map(String::as_str)
    }

    /// The default namespace, if bound
    pub fn default_uri(&self) -> Option<&str> {
        self.default_ns.as_deref()
    }

    /// Iterate the (prefix, uri) bindings
    pub fn bindings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }

    /// Expand a possibly-prefixed name against this scope
    ///
    /// Unprefixed names take the default namespace. An unbound prefix is
    /// an error.
    pub fn expand(&self, raw: &str) -> Result<QName> {
        match raw.split_once(':') {
            Some((prefix, local)) => {
                let uri = self.uri_for(prefix).ok_or_else(|| {
                    Error::Namespace(format!("Prefix '{}' is not bound in scope", prefix))
                })?;
                Ok(QName::qualified(uri, local))
            }
            None => Ok(QName {
                namespace: self.default_ns.clone(),
                local: raw.to_string(),
            }),
        }
    }
}
