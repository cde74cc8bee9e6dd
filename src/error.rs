//! Error types for xsdgen
//!
//! This module defines all error types used throughout the library.
//! The taxonomy follows the pipeline stages: model integrity errors from
//! import resolution, identifier errors from sanitization, and I/O errors
//! from output sinks and schema loading.

use std::fmt;
use thiserror::Error;

/// Result type alias using xsdgen Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for xsdgen operations
#[derive(Error, Debug)]
pub enum Error {
    /// Schema model integrity error (dangling reference, missing namespace)
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// XSD document parsing/building error
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Identifier sanitization error (exhausted disambiguation attempts)
    #[error("sanitize error: {0}")]
    Sanitize(String),

    /// Module emission error
    #[error("emit error: {0}")]
    Emit(String),

    /// Resource loading error
    #[error("resource error: {0}")]
    Resource(String),

    /// Namespace error
    #[error("namespace error: {0}")]
    Namespace(String),

    /// Name error (invalid XML name)
    #[error("name error: {0}")]
    Name(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// URL parsing error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Schema model integrity error with context
///
/// Raised when the linker encounters a reference that cannot be resolved
/// in the schema model. Carries enough context (referencing type, missing
/// target) to diagnose a malformed model; the pipeline aborts rather than
/// emitting partial output.
#[derive(Debug, Clone)]
pub struct ModelError {
    /// Error message
    pub message: String,
    /// Qualified name of the type holding the unresolved reference
    pub referencing: Option<String>,
    /// Qualified name of the missing target
    pub missing: Option<String>,
    /// Namespace being processed when the error was detected
    pub namespace: Option<String>,
}

impl ModelError {
    /// Create a new model error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            referencing: None,
            missing: None,
            namespace: None,
        }
    }

    /// Set the referencing type
    pub fn with_referencing(mut self, referencing: impl Into<String>) -> Self {
        self.referencing = Some(referencing.into());
        self
    }

    /// Set the missing target
    pub fn with_missing(mut self, missing: impl Into<String>) -> Self {
        self.missing = Some(missing.into());
        self
    }

    /// Set the namespace being processed
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref referencing) = self.referencing {
            write!(f, "\n\nReferencing type: {}", referencing)?;
        }

        if let Some(ref missing) = self.missing {
            write!(f, "\n\nMissing target: {}", missing)?;
        }

        if let Some(ref namespace) = self.namespace {
            write!(f, "\n\nNamespace: {}", namespace)?;
        }

        Ok(())
    }
}

impl std::error::Error for ModelError {}

/// XSD document parsing error
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Error message
    pub message: String,
    /// Location in the schema file
    pub location: Option<String>,
    /// Schema source that caused the error
    pub source: Option<String>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
            source: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the source
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref loc) = self.location {
            write!(f, "\n\nLocation: {}", loc)?;
        }

        if let Some(ref src) = self.source {
            write!(f, "\n\nSource:\n{}", src)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}
