//! Flat, path-keyed configuration store.
//!
//! [`Store`] keeps every entry in a map ordered by path, which is the order the writer
//! needs to rebuild nested blocks. It implements [`Sink`] so the reader can populate it,
//! and offers typed accessors on top.

mod accessors;
mod sink;
mod value;

pub use accessors::FromValue;
pub use sink::{Sink, DEFAULT_DELIMITER};
pub use value::Value;

use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::ops::Bound;
use std::sync::Arc;

use crate::emitter::{Emitter, HoconWriter, JsonEmitter};
use crate::errors::HoconResult;
use crate::parser::Reader;
use crate::resolver::{NoResolver, SourceResolver};

/// Flat map from delimited path to value
#[derive(Clone)]
pub struct Store {
    entries: BTreeMap<String, Value>,
    delimiter: String,
    resolver: Arc<dyn SourceResolver>,
}

impl Store {
    /// Empty store with the default `.` delimiter and no source resolver
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            delimiter: DEFAULT_DELIMITER.to_string(),
            resolver: Arc::new(NoResolver),
        }
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Resolver used for `include` directives and [`Store::read`]
    pub fn with_resolver(mut self, resolver: impl SourceResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending path order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Paths in ascending order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Parse the named source (resolved through this store's resolver) into the store
    pub fn read(&mut self, name: &str) -> HoconResult<()> {
        Reader::new(self).read(name)
    }

    /// Parse literal text into the store
    pub fn read_str(&mut self, content: &str) -> HoconResult<()> {
        Reader::new(self).read_str(content)
    }

    /// Parse everything from `reader` into the store
    pub fn read_from<R: Read>(&mut self, reader: R) -> HoconResult<()> {
        Reader::new(self).read_from(reader)
    }

    /// Render as configuration text, with an optional `#` comment header.
    /// Fails on arrays holding blocks or arrays, which the text form cannot express.
    pub fn to_hocon(&self, header: Option<&str>) -> HoconResult<String> {
        HoconWriter::new()
            .with_delimiter(&self.delimiter)
            .write_string(self.iter(), header)
    }

    /// Render as nested JSON
    pub fn to_json(&self, pretty: bool) -> HoconResult<String> {
        JsonEmitter::new(pretty).emit(self)
    }

    fn is_under(&self, path: &str, prefix: &str) -> bool {
        path == prefix
            || (path.starts_with(prefix) && path[prefix.len()..].starts_with(&self.delimiter))
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Store {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("delimiter", &self.delimiter)
            .field("entries", &self.entries)
            .finish()
    }
}

impl Sink for Store {
    fn delimiter(&self) -> &str {
        &self.delimiter
    }

    fn create_or_update_value(&mut self, path: &str, value: Value) {
        self.entries.insert(path.to_string(), value);
    }

    fn create_or_update_node(&mut self, path: &str) {
        self.entries.insert(path.to_string(), Value::Node);
    }

    fn remove_node(&mut self, path: &str) {
        self.entries.remove(path);
    }

    fn get_node_or_value(&self, path: &str) -> Option<Value> {
        self.entries.get(path).cloned()
    }

    fn get_subtree(&self, prefix: &str) -> Vec<(String, Value)> {
        self.entries
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(path, _)| path.starts_with(prefix))
            .filter(|(path, _)| self.is_under(path, prefix))
            .map(|(path, value)| (path.clone(), value.clone()))
            .collect()
    }

    fn resolve_source(&self, name: &str) -> HoconResult<String> {
        self.resolver.resolve(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Store {
        let mut store = Store::new();
        store.create_or_update_node("a");
        store.create_or_update_value("a.b", Value::Int(1));
        store.create_or_update_value("a-b", Value::Int(2));
        store.create_or_update_value("ab", Value::Int(3));
        store.create_or_update_node("a.c");
        store.create_or_update_value("a.c.d", Value::from("x"));
        store
    }

    #[test]
    fn test_iteration_is_sorted() {
        let store = sample();
        let paths: Vec<&str> = store.paths().collect();
        assert_eq!(paths, vec!["a", "a-b", "a.b", "a.c", "a.c.d", "ab"]);
    }

    #[test]
    fn test_subtree_respects_delimiter() {
        let store = sample();
        let paths: Vec<String> = store.get_subtree("a").into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["a", "a.b", "a.c", "a.c.d"]);

        let paths: Vec<String> = store.get_subtree("a.c").into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["a.c", "a.c.d"]);

        assert!(store.get_subtree("zzz").is_empty());
    }

    #[test]
    fn test_subtree_custom_delimiter() {
        let mut store = Store::new().with_delimiter(":");
        store.create_or_update_node("a");
        store.create_or_update_value("a:b", Value::Int(1));
        store.create_or_update_value("a.b", Value::Int(2));
        let paths: Vec<String> = store.get_subtree("a").into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["a", "a:b"]);
    }

    #[test]
    fn test_remove_and_lookup() {
        let mut store = sample();
        assert_eq!(store.get_node_or_value("a"), Some(Value::Node));
        store.remove_node("ab");
        assert_eq!(store.get_node_or_value("ab"), None);
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_equality_ignores_resolver() {
        let mut a = Store::new();
        a.create_or_update_value("k", Value::Int(1));
        let mut b = Store::new().with_resolver(crate::resolver::VirtualResolver::new());
        b.create_or_update_value("k", Value::Int(1));
        assert_eq!(a, b);
    }
}
