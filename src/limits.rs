//! Limits and constraints for schema processing and code generation
//!
//! This module defines various limits to prevent resource exhaustion when
//! reading schema documents and to bound the sanitizer's disambiguation
//! search (a non-terminating rename loop indicates pathological input).

use crate::error::{Error, Result};

/// Global limits configuration
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum schema source size in bytes
    pub max_source_size: usize,

    /// Maximum schema depth (includes/imports)
    pub max_schema_depth: usize,

    /// Maximum number of types across all namespaces
    pub max_types: usize,

    /// Maximum number of namespaces
    pub max_namespaces: usize,

    /// Maximum numeric-suffix attempts when disambiguating an identifier
    pub max_rename_attempts: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_source_size: 100 * 1024 * 1024, // 100 MB
            max_schema_depth: 100,
            max_types: 100000,
            max_namespaces: 1000,
            max_rename_attempts: 1000,
        }
    }
}

impl Limits {
    /// Create a new Limits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create strict limits (more restrictive)
    pub fn strict() -> Self {
        Self {
            max_source_size: 10 * 1024 * 1024, // 10 MB
            max_schema_depth: 20,
            max_types: 10000,
            max_namespaces: 100,
            max_rename_attempts: 100,
        }
    }

    /// Create permissive limits (less restrictive, use with caution)
    pub fn permissive() -> Self {
        Self {
            max_source_size: 1024 * 1024 * 1024, // 1 GB
            max_schema_depth: 1000,
            max_types: 1000000,
            max_namespaces: 10000,
            max_rename_attempts: 100000,
        }
    }

    /// Check if a schema source size is within limits
    pub fn check_source_size(&self, size: usize) -> Result<()> {
        if size > self.max_source_size {
            Err(Error::LimitExceeded(format!(
                "Schema source size {} bytes exceeds maximum {} bytes",
                size, self.max_source_size
            )))
        } else {
            Ok(())
        }
    }

    /// Check if include/import depth is within limits
    pub fn check_schema_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_schema_depth {
            Err(Error::LimitExceeded(format!(
                "Schema include depth {} exceeds maximum {}",
                depth, self.max_schema_depth
            )))
        } else {
            Ok(())
        }
    }

    /// Check if the total type count is within limits
    pub fn check_types(&self, count: usize) -> Result<()> {
        if count > self.max_types {
            Err(Error::LimitExceeded(format!(
                "Type count {} exceeds maximum {}",
                count, self.max_types
            )))
        } else {
            Ok(())
        }
    }

    /// Check if the namespace count is within limits
    pub fn check_namespaces(&self, count: usize) -> Result<()> {
        if count > self.max_namespaces {
            Err(Error::LimitExceeded(format!(
                "Namespace count {} exceeds maximum {}",
                count, self.max_namespaces
            )))
        } else {
            Ok(())
        }
    }

    /// Check if a disambiguation attempt count is within limits
    pub fn check_rename_attempts(&self, attempts: usize) -> Result<()> {
        if attempts > self.max_rename_attempts {
            Err(Error::LimitExceeded(format!(
                "Identifier disambiguation attempts {} exceed maximum {}",
                attempts, self.max_rename_attempts
            )))
        } else {
            Ok(())
        }
    }
}
