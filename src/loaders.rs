//! Schema source loading
//!
//! This module reads XSD source text from resolved locations, enforcing
//! resource limits. Remote retrieval is refused; callers are expected to
//! pre-fetch remote schemas to the local filesystem.

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::locations::{self, Location};

/// Schema source loader
#[derive(Debug)]
pub struct Loader {
    /// Resource limits
    limits: Limits,
    /// Whether to allow remote resources
    allow_remote: bool,
}

impl Loader {
    /// Create a new loader with default settings
    pub fn new() -> Self {
        Self {
            limits: Limits::default(),
            allow_remote: false,
        }
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Set whether to allow remote resources
    pub fn with_allow_remote(mut self, allow: bool) -> Self {
        self.allow_remote = allow;
        self
    }

    /// Get the configured limits
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Load a schema source as a string
    pub fn load(&self, location: &Location) -> Result<String> {
        if location.is_remote() {
            if !self.allow_remote {
                return Err(Error::Resource(format!(
                    "Remote schema locations are not allowed: {}",
                    location.as_str()
                )));
            }
            return Err(Error::Resource(format!(
                "Remote schema retrieval is not supported; fetch '{}' locally first",
                location.as_str()
            )));
        }

        let content = locations::read_to_string(location)?;

        // Check size limits
        self.limits.check_source_size(content.len())?;

        Ok(content)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
