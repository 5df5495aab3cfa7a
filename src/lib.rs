// Rust 1.93+ triggers false positives on thiserror/miette derive macro fields
#![allow(unused_assignments)]

//! HOCON-style configuration reader and writer
//!
//! Parses a human-friendly configuration format into a flat store keyed by
//! delimited paths, and writes such a store back out as nested blocks.
//!
//! # Example
//!
//! ```hocon
//! # connection settings
//! ssh {
//!   connection {
//!     host : 127.0.0.1
//!     port : 22
//!   }
//!   status : on
//! }
//!
//! backup : ${ssh} { connection { port : 2222 } }
//! ```
//!
//! parses to `ssh.connection.host = "127.0.0.1"`, `ssh.connection.port = 22`,
//! `ssh.status = true`, and a copy of the `ssh` subtree under `backup` with its port
//! overridden.

pub mod emitter;
pub mod errors;
pub mod lexer;
pub mod parser;
pub mod resolver;
pub mod store;

use std::io::Read;
use std::path::Path;

pub use emitter::{emit, Emitter, FlatEmitter, HoconWriter, JsonEmitter, OutputFormat};
pub use errors::{ErrorKind, HoconError, HoconResult};
pub use lexer::token::{Grammar, Rule, TokenKind, TokenMatch};
pub use lexer::Tokenizer;
pub use parser::{Reader, ReaderOptions};
pub use resolver::{FileResolver, NoResolver, SourceResolver, VirtualResolver};
pub use store::{FromValue, Sink, Store, Value, DEFAULT_DELIMITER};

/// Parse configuration text into a new store. Includes cannot be resolved.
pub fn parse_str(content: &str) -> HoconResult<Store> {
    let mut store = Store::new();
    store.read_str(content)?;
    Ok(store)
}

/// Parse everything from a stream into a new store
pub fn parse_reader<R: Read>(reader: R) -> HoconResult<Store> {
    let mut store = Store::new();
    store.read_from(reader)?;
    Ok(store)
}

/// Parse a file. Includes resolve relative to the file's directory.
pub fn parse_file(path: impl AsRef<Path>) -> HoconResult<Store> {
    let path = path.as_ref();
    let base_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| HoconError::io_error(format!("invalid file path: {}", path.display())))?;

    let mut store = Store::new().with_resolver(FileResolver::new(base_dir));
    store.read(name)?;
    Ok(store)
}
