//! Output sinks
//!
//! The abstraction emitters write generated modules through. Two
//! interchangeable implementations: a durable writer that persists units
//! under a root directory and maintains per-directory index files, and a
//! volatile writer that accumulates units in memory for embedding and
//! testing. Emitters depend only on the `write` contract.

use crate::error::{Error, Result};
use crate::model::Namespace;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Which of the two parallel outputs a unit belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    /// TypeScript declaration module (`.d.ts`)
    Declaration,
    /// JavaScript implementation module (`.js`)
    Implementation,
}

impl OutputKind {
    /// File extension for this output kind
    pub fn extension(&self) -> &'static str {
        match self {
            OutputKind::Declaration => ".d.ts",
            OutputKind::Implementation => ".js",
        }
    }

    /// Name of the per-directory index file for this output kind
    pub fn index_name(&self) -> &'static str {
        match self {
            OutputKind::Declaration => "_index.d.ts",
            OutputKind::Implementation => "_index.js",
        }
    }
}

/// Derive the relative unit path for a namespace and output kind
pub fn unit_path(namespace: &Namespace, kind: OutputKind) -> PathBuf {
    let stem = namespace.module_stem();
    PathBuf::from(format!("{}{}", stem.display(), kind.extension()))
}

/// The sink emitters write output units through
pub trait OutputSink {
    /// Write one output unit, returning its derived path
    ///
    /// For durable sinks the content is flushed to storage before this
    /// returns; for volatile sinks it is visible in the in-memory
    /// collection. Failures surface as errors, never partial writes the
    /// caller cannot observe.
    fn write(&mut self, namespace: &Namespace, kind: OutputKind, content: &str) -> Result<PathBuf>;
}

/// Volatile sink: units accumulate in an ordered in-memory map
///
/// For embedding the generator as a library or asserting on output in
/// tests without filesystem side effects.
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    files: IndexMap<String, String>,
}

impl MemoryWriter {
    /// Create an empty memory writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a unit's content by relative path
    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(|s| s.as_str())
    }

    /// All units in write order
    pub fn files(&self) -> &IndexMap<String, String> {
        &self.files
    }

    /// Number of units written
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no units were written
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Consume the writer, yielding its units
    pub fn into_files(self) -> IndexMap<String, String> {
        self.files
    }
}

impl OutputSink for MemoryWriter {
    fn write(&mut self, namespace: &Namespace, kind: OutputKind, content: &str) -> Result<PathBuf> {
        let path = unit_path(namespace, kind);
        self.files
            .insert(path.to_string_lossy().to_string(), content.to_string());
        Ok(path)
    }
}

/// Durable sink: units persist under a root directory
///
/// Paths derive from namespace URIs (`example.com/books.d.ts`). Each
/// directory that receives units also gets an index file re-exporting
/// them, enumerating exactly the units written so far; a failed run never
/// leaves an index naming files that do not exist.
#[derive(Debug)]
pub struct CacheWriter {
    root: PathBuf,
    written: Vec<PathBuf>,
    // Unit stems per (directory, kind), for index maintenance
    directories: HashMap<(PathBuf, OutputKind), IndexSet<String>>,
}

impl CacheWriter {
    /// Create a cache writer rooted at a directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            written: Vec::new(),
            directories: HashMap::new(),
        }
    }

    /// The output root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Relative paths of every unit written so far, in write order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn flush_file(path: &Path, content: &str) -> Result<()> {
        let mut file = File::create(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create '{}': {}", path.display(), e),
            ))
        })?;
        file.write_all(content.as_bytes())?;
        // Durable-sink contract: flushed before the write completes
        file.sync_all()?;
        Ok(())
    }

    fn write_index(&self, directory: &Path, kind: OutputKind) -> Result<()> {
        let stems = match self.directories.get(&(directory.to_path_buf(), kind)) {
            Some(stems) => stems,
            None => return Ok(()),
        };

        let mut content = String::new();
        for stem in stems {
            match kind {
                OutputKind::Declaration => {
                    content.push_str(&format!("export * from \"./{}\";\n", stem));
                }
                OutputKind::Implementation => {
                    content.push_str(&format!(
                        "module.exports[\"{}\"] = require(\"./{}\");\n",
                        stem, stem
                    ));
                }
            }
        }

        let index_path = self.root.join(directory).join(kind.index_name());
        Self::flush_file(&index_path, &content)
    }
}

impl OutputSink for CacheWriter {
    fn write(&mut self, namespace: &Namespace, kind: OutputKind, content: &str) -> Result<PathBuf> {
        let relative = unit_path(namespace, kind);
        let full = self.root.join(&relative);

        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create directory '{}': {}", parent.display(), e),
                ))
            })?;
        }

        Self::flush_file(&full, content)?;

        let directory = relative
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let stem = namespace
            .module_stem()
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "ns".to_string());
        self.directories
            .entry((directory.clone(), kind))
            .or_default()
            .insert(stem);
        self.write_index(&directory, kind)?;

        self.written.push(relative.clone());
        Ok(relative)
    }
}
