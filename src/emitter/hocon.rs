//! Configuration text writer
//!
//! Rebuilds nested `{ }` blocks from flat, sorted paths by keeping a stack of the blocks
//! currently open and comparing each path against the innermost one.

use std::io::Write;

use super::Emitter;
use crate::errors::{HoconError, HoconResult};
use crate::store::{Store, Value, DEFAULT_DELIMITER};

/// Writes store entries back as configuration text, tab-indented
#[derive(Debug, Clone)]
pub struct HoconWriter {
    delimiter: String,
    header: Option<String>,
}

impl HoconWriter {
    pub fn new() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            header: None,
        }
    }

    /// Delimiter the entry paths are joined with
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Header used by [`Emitter::emit`]
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Render `entries` (in any order) with an optional `#` comment header.
    /// Arrays may only hold scalars; anything else has no text form that reads back.
    pub fn write_string<'v, I>(&self, entries: I, header: Option<&str>) -> HoconResult<String>
    where
        I: IntoIterator<Item = (&'v str, &'v Value)>,
    {
        let mut entries: Vec<(&str, &Value)> = entries.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        let mut out = String::new();
        if let Some(header) = header {
            for line in header.lines().filter(|line| !line.is_empty()) {
                out.push_str("# ");
                out.push_str(line);
                out.push('\n');
            }
        }

        let mut blocks: Vec<&str> = Vec::new();
        for (path, value) in entries {
            if value.is_node() {
                while let Some(top) = blocks.last() {
                    if self.extends(path, top) {
                        break;
                    }
                    blocks.pop();
                    close_block(&mut out, blocks.len());
                }
                if !out.is_empty() {
                    out.push('\n');
                }
                indent(&mut out, blocks.len());
                out.push_str(&self.relative_key(path, blocks.last().copied()));
                out.push_str(" {\n");
                blocks.push(path);
                continue;
            }

            if let Some(top) = blocks.last() {
                if !self.extends(path, top) {
                    while blocks.pop().is_some() {
                        close_block(&mut out, blocks.len());
                    }
                    out.push('\n');
                }
            }

            indent(&mut out, blocks.len());
            out.push_str(&self.relative_key(path, blocks.last().copied()));
            out.push_str(" : ");
            write_value(&mut out, path, value)?;
            out.push('\n');
        }

        while blocks.pop().is_some() {
            close_block(&mut out, blocks.len());
        }
        Ok(out)
    }

    /// Render to an output stream
    pub fn write_to<'v, W, I>(&self, writer: &mut W, entries: I, header: Option<&str>) -> HoconResult<()>
    where
        W: Write,
        I: IntoIterator<Item = (&'v str, &'v Value)>,
    {
        let text = self.write_string(entries, header)?;
        writer.write_all(text.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    fn extends(&self, path: &str, block: &str) -> bool {
        path.len() > block.len()
            && path.starts_with(block)
            && path[block.len()..].starts_with(&self.delimiter)
    }

    /// Key as written inside `block`, in dotted form
    fn relative_key(&self, path: &str, block: Option<&str>) -> String {
        let key = match block {
            Some(block) => &path[block.len() + self.delimiter.len()..],
            None => path,
        };
        if self.delimiter == "." {
            key.to_string()
        } else {
            key.replace(&self.delimiter, ".")
        }
    }
}

impl Default for HoconWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter for HoconWriter {
    fn emit(&self, store: &Store) -> HoconResult<String> {
        let writer = self.clone().with_delimiter(store.delimiter());
        writer.write_string(store.iter(), self.header.as_deref())
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push('\t');
    }
}

fn close_block(out: &mut String, depth: usize) {
    indent(out, depth);
    out.push_str("}\n");
}

fn write_value(out: &mut String, path: &str, value: &Value) -> HoconResult<()> {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                match item {
                    Value::Node => return Err(HoconError::unwritable_value(path, "a block")),
                    Value::Array(_) => return Err(HoconError::unwritable_value(path, "an array")),
                    item => write_scalar(out, item),
                }
            }
            out.push(']');
        }
        Value::Node => return Err(HoconError::unwritable_value(path, "a block")),
        scalar => write_scalar(out, scalar),
    }
    Ok(())
}

fn write_scalar(out: &mut String, value: &Value) {
    match value {
        Value::String(s) => {
            out.push('"');
            out.push_str(s);
            out.push('"');
        }
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Int(n) => out.push_str(&n.to_string()),
        // Keep a fractional part so the literal reads back as a decimal
        Value::Decimal(d) if d.scale() == 0 => out.push_str(&format!("{}.0", d)),
        Value::Decimal(d) => out.push_str(&d.to_string()),
        Value::Array(_) | Value::Node => {}
    }
}
