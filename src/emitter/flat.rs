//! Flat emitter: one `path = value` line per stored value
//!
//! Node markers are structural and are skipped. Strings are quoted only when they would
//! not read back as a bare string.

use super::Emitter;
use crate::errors::HoconResult;
use crate::store::{Store, Value};

/// Flat `path = value` output emitter
#[derive(Debug, Default)]
pub struct FlatEmitter;

impl FlatEmitter {
    pub fn new() -> Self {
        Self
    }

    fn render(value: &Value) -> String {
        match value {
            Value::String(s) => Self::quote_value(s),
            Value::Array(items) => {
                let items: Vec<String> = items.iter().map(Self::render).collect();
                format!("[{}]", items.join(", "))
            }
            other => other.to_string(),
        }
    }

    /// Quote a string if it contains characters a bare string cannot hold
    fn quote_value(value: &str) -> String {
        let needs_quotes = value.is_empty()
            || value.chars().any(|c| {
                c.is_whitespace()
                    || matches!(
                        c,
                        '"' | '$' | '{' | '}' | '[' | ']' | ':' | '=' | ',' | '+' | '#' | '\''
                            | '^' | '?' | '!' | '@' | '*' | '&'
                    )
            });
        if needs_quotes {
            format!("\"{}\"", value)
        } else {
            value.to_string()
        }
    }
}

impl Emitter for FlatEmitter {
    fn emit(&self, store: &Store) -> HoconResult<String> {
        let mut out = String::new();
        for (path, value) in store.iter().filter(|(_, value)| !value.is_node()) {
            out.push_str(path);
            out.push_str(" = ");
            out.push_str(&Self::render(value));
            out.push('\n');
        }
        Ok(out)
    }
}
