//! Emitters for configuration stores
//!
//! Renders a [`Store`] back to configuration text, to nested JSON, or to flat
//! `path = value` lines.

mod flat;
mod hocon;
mod json;

pub use flat::FlatEmitter;
pub use hocon::HoconWriter;
pub use json::JsonEmitter;

use crate::errors::HoconResult;
use crate::store::Store;

/// Output format for emission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Hocon,
    Json,
    JsonPretty,
    Flat,
}

impl OutputFormat {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hocon" | "conf" => Some(OutputFormat::Hocon),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "flat" | "properties" => Some(OutputFormat::Flat),
            _ => None,
        }
    }
}

/// Trait for output emitters
pub trait Emitter {
    /// Emit a store to string
    fn emit(&self, store: &Store) -> HoconResult<String>;

    /// Emit a store to a writer
    fn emit_to_writer<W: std::io::Write>(&self, store: &Store, writer: &mut W) -> HoconResult<()> {
        let output = self.emit(store)?;
        writer.write_all(output.as_bytes())?;
        Ok(())
    }
}

/// Emit a store to a string in the specified format
pub fn emit(store: &Store, format: OutputFormat) -> HoconResult<String> {
    match format {
        OutputFormat::Hocon => HoconWriter::new().emit(store),
        OutputFormat::Json => JsonEmitter::new(false).emit(store),
        OutputFormat::JsonPretty => JsonEmitter::new(true).emit(store),
        OutputFormat::Flat => FlatEmitter::new().emit(store),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Sink, Value};

    fn store() -> Store {
        let mut store = Store::new();
        store.create_or_update_node("server");
        store.create_or_update_value("server.name", Value::from("test"));
        store
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(
            OutputFormat::parse("json-pretty"),
            Some(OutputFormat::JsonPretty)
        );
        assert_eq!(OutputFormat::parse("conf"), Some(OutputFormat::Hocon));
        assert_eq!(OutputFormat::parse("flat"), Some(OutputFormat::Flat));
        assert_eq!(OutputFormat::parse("yaml"), None);
    }

    #[test]
    fn test_emit_each_format() {
        let store = store();
        assert_eq!(
            emit(&store, OutputFormat::Json).unwrap(),
            r#"{"server":{"name":"test"}}"#
        );
        assert_eq!(
            emit(&store, OutputFormat::Hocon).unwrap(),
            "server {\n\tname : \"test\"\n}\n"
        );
        assert_eq!(
            emit(&store, OutputFormat::Flat).unwrap(),
            "server.name = test\n"
        );
    }

    #[test]
    fn test_emit_to_writer() {
        let mut buffer = Vec::new();
        JsonEmitter::new(false)
            .emit_to_writer(&store(), &mut buffer)
            .unwrap();
        assert_eq!(buffer, br#"{"server":{"name":"test"}}"#);
    }
}
