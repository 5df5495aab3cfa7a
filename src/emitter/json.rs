//! JSON emitter for stores
//!
//! Node markers become objects and leaves become members, so `a.b : 1` renders as
//! `{"a":{"b":1}}`. Members keep the store's path order.

use indexmap::IndexMap;
use serde::Serialize;

use super::Emitter;
use crate::errors::{HoconError, HoconResult};
use crate::store::{Store, Value};

/// JSON output emitter
pub struct JsonEmitter {
    /// Whether to pretty-print with indentation
    pretty: bool,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Tree {
    Leaf(serde_json::Value),
    Branch(IndexMap<String, Tree>),
}

impl JsonEmitter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn build(&self, store: &Store) -> IndexMap<String, Tree> {
        let delimiter = store.delimiter();
        let mut root = IndexMap::new();

        'entries: for (path, value) in store.iter() {
            let segments: Vec<&str> = path.split(delimiter).collect();
            let Some((last, parents)) = segments.split_last() else {
                continue;
            };

            let mut branch = &mut root;
            for segment in parents {
                branch = match branch
                    .entry(segment.to_string())
                    .or_insert_with(|| Tree::Branch(IndexMap::new()))
                {
                    Tree::Branch(map) => map,
                    // a leaf hides anything stored beneath it
                    Tree::Leaf(_) => continue 'entries,
                };
            }

            match value {
                Value::Node => {
                    branch
                        .entry(last.to_string())
                        .or_insert_with(|| Tree::Branch(IndexMap::new()));
                }
                leaf => {
                    branch.insert(last.to_string(), Tree::Leaf(leaf.to_serde_json()));
                }
            }
        }
        root
    }
}

impl Emitter for JsonEmitter {
    fn emit(&self, store: &Store) -> HoconResult<String> {
        let tree = self.build(store);
        let rendered = if self.pretty {
            serde_json::to_string_pretty(&tree)
        } else {
            serde_json::to_string(&tree)
        };
        rendered.map_err(|e| HoconError::io_error(format!("failed to render JSON: {}", e)))
    }
}
