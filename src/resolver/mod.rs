//! Source resolution for `include` directives and named reads.
//!
//! A [`SourceResolver`] turns an include name into text. The reader never touches the
//! file system itself; a store is configured with one of:
//! - [`FileResolver`]: names are files relative to a base directory
//! - [`VirtualResolver`]: in-memory sources (tests, embedded defaults)
//! - [`NoResolver`]: every name is missing
//! - any `Fn(&str) -> Option<String>` closure

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::errors::{HoconError, HoconResult};

/// Produces the text of a named source
pub trait SourceResolver {
    fn resolve(&self, name: &str) -> HoconResult<String>;
}

impl<F> SourceResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve(&self, name: &str) -> HoconResult<String> {
        self(name).ok_or_else(|| HoconError::SourceNotFound {
            name: name.to_string(),
        })
    }
}

/// Resolver that knows no sources
#[derive(Debug, Default, Clone, Copy)]
pub struct NoResolver;

impl SourceResolver for NoResolver {
    fn resolve(&self, name: &str) -> HoconResult<String> {
        Err(HoconError::SourceNotFound {
            name: name.to_string(),
        })
    }
}

/// Resolves names as file paths relative to a base directory
#[derive(Debug, Clone)]
pub struct FileResolver {
    base_dir: PathBuf,
}

impl FileResolver {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl SourceResolver for FileResolver {
    fn resolve(&self, name: &str) -> HoconResult<String> {
        let path = self.base_dir.join(name);
        std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => HoconError::SourceNotFound {
                name: path.display().to_string(),
            },
            _ => HoconError::io_error(format!("failed to read {}: {}", path.display(), e)),
        })
    }
}

/// A resolver that works with in-memory sources
#[derive(Debug, Default, Clone)]
pub struct VirtualResolver {
    sources: HashMap<String, String>,
}

impl VirtualResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source, builder style
    pub fn with_source(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.add_source(name, content);
        self
    }

    pub fn add_source(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.sources.insert(name.into(), content.into());
    }
}

impl SourceResolver for VirtualResolver {
    fn resolve(&self, name: &str) -> HoconResult<String> {
        self.sources
            .get(name)
            .cloned()
            .ok_or_else(|| HoconError::SourceNotFound {
                name: name.to_string(),
            })
    }
}
