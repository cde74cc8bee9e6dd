//! Output identifier validation and utilities
//!
//! This module provides validation for ECMAScript identifiers as used in
//! the generated TypeScript declarations and JavaScript modules, plus the
//! candidate-name derivation applied to XSD-derived type names.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

// Conservative identifier subset: ASCII only, no `$`. Every name in this
// grammar is valid in both TypeScript and JavaScript.
static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

lazy_static::lazy_static! {
    /// Names a generated type may never take: ECMAScript reserved words
    /// (including strict-mode and future reserved words) plus TypeScript's
    /// predefined type names, which cannot be redeclared as type aliases.
    static ref RESERVED_WORDS: HashSet<&'static str> = {
        let mut words = HashSet::new();
        for word in [
            "await", "break", "case", "catch", "class", "const", "continue",
            "debugger", "default", "delete", "do", "else", "enum", "export",
            "extends", "false", "finally", "for", "function", "if", "implements",
            "import", "in", "instanceof", "interface", "let", "new", "null",
            "package", "private", "protected", "public", "return", "static",
            "super", "switch", "this", "throw", "true", "try", "typeof", "var",
            "void", "while", "with", "yield",
            // TypeScript predefined types
            "any", "bigint", "boolean", "never", "number", "object", "string",
            "symbol", "undefined", "unknown",
        ] {
            words.insert(word);
        }
        words
    };
}

/// Check if a string is a valid output identifier
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name) && !is_reserved_word(name)
}

/// Check if a string is an ECMAScript reserved word
pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(name)
}

/// Derive a candidate identifier from an XSD-derived name
///
/// Strips every character outside `[A-Za-z0-9_]` and prefixes an
/// underscore when the remainder starts with a digit. The result may be
/// empty (a fully-stripped name); callers must substitute a placeholder.
pub fn candidate_identifier(name: &str) -> String {
    let stripped: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    match stripped.chars().next() {
        Some(c) if c.is_ascii_digit() => format!("_{}", stripped),
        _ => stripped,
    }
}

/// Validate an output identifier and return an error if invalid
pub fn validate_identifier(name: &str) -> Result<()> {
    if is_valid_identifier(name) {
        Ok(())
    } else {
        Err(Error::Name(format!("Invalid output identifier: '{}'", name)))
    }
}
