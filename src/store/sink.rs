use crate::errors::HoconResult;

use super::Value;

/// Default path delimiter
pub const DEFAULT_DELIMITER: &str = ".";

/// The operations the reader drives against a backing store.
///
/// Paths are delimiter-joined strings; there is no tree structure beyond string prefixes.
/// Any type implementing this can be populated by [`crate::Reader`].
pub trait Sink {
    /// Delimiter joining path segments
    fn delimiter(&self) -> &str {
        DEFAULT_DELIMITER
    }

    /// Store a scalar or array at `path`, replacing whatever was there
    fn create_or_update_value(&mut self, path: &str, value: Value);

    /// Mark `path` as a branch
    fn create_or_update_node(&mut self, path: &str);

    /// Remove the entry at exactly `path`
    fn remove_node(&mut self, path: &str);

    /// Current entry at `path`
    fn get_node_or_value(&self, path: &str) -> Option<Value>;

    /// All entries equal to `prefix` or under `prefix` + delimiter, ordered by path
    fn get_subtree(&self, prefix: &str) -> Vec<(String, Value)>;

    /// Text of a named source, for includes and named reads
    fn resolve_source(&self, name: &str) -> HoconResult<String>;
}
