//! Recursive-descent reader for the configuration grammar.
//!
//! The reader drives a [`Tokenizer`] and turns the token stream into calls against a
//! [`Sink`]: it never builds a tree of its own. Grammar:
//!
//! ```text
//! document    := entry*
//! entry       := include | key ( '{' entry* '}' | assign value )
//! value       := scalar | '[' ( scalar | ',' )* ']' | substitution ( '{' entry* '}' )?
//! ```
//!
//! A key's node marker is written before its value is read, so children can always find
//! their parent registered. Substitutions resolve against the store as it is at the point
//! of use.

use std::io::Read;
use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::errors::{HoconError, HoconResult};
use crate::lexer::token::{Grammar, TokenKind, TokenMatch};
use crate::lexer::Tokenizer;
use crate::store::{Sink, Value};

const IGNORED: [TokenKind; 2] = TokenKind::IGNORED;

const ENTRY_START: [TokenKind; 2] = [TokenKind::Include, TokenKind::Key];

const ENTRY_BODY: [TokenKind; 2] = [TokenKind::BeginScope, TokenKind::Assign];

const VALUE_START: [TokenKind; 8] = [
    TokenKind::String,
    TokenKind::Integer,
    TokenKind::Decimal,
    TokenKind::Double,
    TokenKind::Boolean,
    TokenKind::Substitution,
    TokenKind::SafeSubstitution,
    TokenKind::BeginArray,
];

const ARRAY_ITEM: [TokenKind; 9] = [
    TokenKind::String,
    TokenKind::Integer,
    TokenKind::Decimal,
    TokenKind::Double,
    TokenKind::Boolean,
    TokenKind::Substitution,
    TokenKind::SafeSubstitution,
    TokenKind::ArraySeparator,
    TokenKind::EndArray,
];

/// Words a boolean literal decodes to `true` from; every other boolean literal is `false`
const TRUE_WORDS: [&str; 4] = ["on", "true", "yes", "enabled"];

/// A key's state from before its node markers were written
struct Registered {
    previous: Option<Value>,
    /// Ancestors of a dotted key that were absent or leaves
    ancestors: Vec<(String, Option<Value>)>,
}

/// Reader settings
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    /// Maximum number of nested includes active at once
    pub max_include_depth: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            max_include_depth: 32,
        }
    }
}

/// Parses configuration text into a [`Sink`]
pub struct Reader<'a, S: Sink + ?Sized> {
    sink: &'a mut S,
    grammar: &'a Grammar,
    options: ReaderOptions,
    delimiter: String,
}

impl<'a, S: Sink + ?Sized> Reader<'a, S> {
    /// Create a reader over `sink` using the built-in grammar
    pub fn new(sink: &'a mut S) -> Self {
        let delimiter = sink.delimiter().to_string();
        Self {
            sink,
            grammar: Grammar::standard(),
            options: ReaderOptions::default(),
            delimiter,
        }
    }

    pub fn with_options(mut self, options: ReaderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_grammar(mut self, grammar: &'a Grammar) -> Self {
        self.grammar = grammar;
        self
    }

    /// Parse the named source, resolved through the sink
    pub fn read(&mut self, name: &str) -> HoconResult<()> {
        let content = self.sink.resolve_source(name)?;
        self.read_source(name, &content)
    }

    /// Parse text already loaded for the source `name`. The name seeds the include chain,
    /// so the source cannot include itself.
    pub fn read_source(&mut self, name: &str, content: &str) -> HoconResult<()> {
        let mut tokenizer = Tokenizer::with_source(self.grammar, name, content);
        self.read_document(&mut tokenizer)
    }

    /// Parse literal text
    pub fn read_str(&mut self, content: &str) -> HoconResult<()> {
        let mut tokenizer = Tokenizer::new(self.grammar, content);
        self.read_document(&mut tokenizer)
    }

    /// Parse everything from a stream
    pub fn read_from<R: Read>(&mut self, mut reader: R) -> HoconResult<()> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        self.read_str(&content)
    }

    fn read_document(&mut self, tokenizer: &mut Tokenizer<'_>) -> HoconResult<()> {
        self.read_entries(tokenizer, "")?;
        if !tokenizer.is_eof() {
            return Err(self.unexpected(tokenizer, "a key or include"));
        }
        Ok(())
    }

    /// Read keys and includes at one level until neither comes next
    fn read_entries(&mut self, tokenizer: &mut Tokenizer<'_>, prefix: &str) -> HoconResult<()> {
        while let Some(token) = tokenizer.read_next(&ENTRY_START, &IGNORED) {
            tokenizer.consume();

            if token.kind == TokenKind::Include {
                self.read_include(tokenizer, &token.value)?;
                continue;
            }

            let path = self.join(prefix, &token.value);
            let previous = self.sink.get_node_or_value(&path);
            let ancestors = self.register_key(prefix, &token.value);
            self.read_entry(tokenizer, &path, Registered { previous, ancestors })?;
        }
        Ok(())
    }

    /// Register node markers for a key and, for dotted keys, each of its ancestors.
    /// Returns the ancestors that were not nodes before, outermost first.
    fn register_key(&mut self, prefix: &str, key: &str) -> Vec<(String, Option<Value>)> {
        let segments: Vec<&str> = key.split('.').collect();
        let mut replaced = Vec::new();
        let mut path = prefix.to_string();
        for (i, segment) in segments.iter().enumerate() {
            path = self.join(&path, segment);
            if i + 1 < segments.len() {
                match self.sink.get_node_or_value(&path) {
                    Some(Value::Node) => {}
                    earlier => replaced.push((path.clone(), earlier)),
                }
            }
            self.sink.create_or_update_node(&path);
        }
        replaced
    }

    fn read_include(&mut self, tokenizer: &mut Tokenizer<'_>, name: &str) -> HoconResult<()> {
        let chain: Vec<String> = tokenizer
            .include_chain()
            .into_iter()
            .map(String::from)
            .collect();

        if chain.iter().any(|included| included == name)
            || chain.len() >= self.options.max_include_depth
        {
            let mut links = chain;
            links.push(name.to_string());
            return Err(HoconError::RecursiveInclude {
                name: name.to_string(),
                chain: links.join(" -> "),
            });
        }

        let content = self.sink.resolve_source(name)?;
        tokenizer.include(name, &content);
        Ok(())
    }

    fn read_entry(
        &mut self,
        tokenizer: &mut Tokenizer<'_>,
        path: &str,
        registered: Registered,
    ) -> HoconResult<()> {
        let Some(token) = tokenizer.read_next(&ENTRY_BODY, &IGNORED) else {
            return Err(self.unexpected(tokenizer, "':', '=' or '{'"));
        };
        tokenizer.consume();

        match token.kind {
            TokenKind::Assign => self.read_assignment(tokenizer, path, registered),
            _ => self.read_scope(tokenizer, path),
        }
    }

    /// Body of a `{ ... }` block: entries followed by exactly one `}`
    fn read_scope(&mut self, tokenizer: &mut Tokenizer<'_>, path: &str) -> HoconResult<()> {
        self.read_entries(tokenizer, path)?;
        if tokenizer
            .read_next(&[TokenKind::EndScope], &IGNORED)
            .is_none()
        {
            return Err(self.unexpected(tokenizer, "a key or '}'"));
        }
        tokenizer.consume();
        Ok(())
    }

    fn read_assignment(
        &mut self,
        tokenizer: &mut Tokenizer<'_>,
        path: &str,
        registered: Registered,
    ) -> HoconResult<()> {
        let Some(token) = tokenizer.read_next(&VALUE_START, &IGNORED) else {
            return Err(self.unexpected(tokenizer, "a value"));
        };
        tokenizer.consume();
        let previous = registered.previous.as_ref();

        if token.kind == TokenKind::BeginArray {
            let items = self.read_array(tokenizer, path, previous)?;
            self.assign(path, Value::Array(items));
            return Ok(());
        }

        if token.kind.is_substitution() {
            let target = self.target_path(&token.value);
            if let Some(Value::Node) = self.lookup(&target, path, previous) {
                self.copy_subtree(&target, path);
                if tokenizer
                    .read_next(&[TokenKind::BeginScope], &IGNORED)
                    .is_some()
                {
                    tokenizer.consume();
                    self.read_scope(tokenizer, path)?;
                }
                return Ok(());
            }
        }

        match self.decode(&token, path, previous)? {
            Some(value) => self.assign(path, value),
            None => self.restore(path, registered),
        }
        Ok(())
    }

    /// Elements up to the closing `]`. Separators carry no meaning beyond splitting.
    fn read_array(
        &mut self,
        tokenizer: &mut Tokenizer<'_>,
        path: &str,
        previous: Option<&Value>,
    ) -> HoconResult<Vec<Value>> {
        let mut items = Vec::new();
        loop {
            let Some(token) = tokenizer.read_next(&ARRAY_ITEM, &IGNORED) else {
                return Err(self.unexpected(tokenizer, "an array element, ',' or ']'"));
            };
            tokenizer.consume();

            match token.kind {
                TokenKind::EndArray => return Ok(items),
                TokenKind::ArraySeparator => continue,
                _ => {
                    if let Some(value) = self.decode(&token, path, previous)? {
                        items.push(value);
                    }
                }
            }
        }
    }

    /// Decode a scalar token. `Ok(None)` only for an optional substitution whose target
    /// does not exist.
    fn decode(
        &self,
        token: &TokenMatch,
        path: &str,
        previous: Option<&Value>,
    ) -> HoconResult<Option<Value>> {
        let literal = token.value.as_str();
        let value = match token.kind {
            TokenKind::Substitution => {
                let target = self.target_path(literal);
                match self.lookup(&target, path, previous) {
                    Some(value) => value,
                    None => return Err(HoconError::unresolved_substitution(literal)),
                }
            }
            TokenKind::SafeSubstitution => {
                let target = self.target_path(literal);
                match self.lookup(&target, path, previous) {
                    Some(value) => value,
                    None => {
                        tracing::debug!(substitution = %target, path, "optional substitution missing");
                        return Ok(None);
                    }
                }
            }
            TokenKind::Integer => Value::Int(literal.parse::<i64>().map_err(|e| {
                HoconError::invalid_literal(literal, "integer", e.to_string())
            })?),
            TokenKind::Decimal => Value::Decimal(Decimal::from_str(literal).map_err(|e| {
                HoconError::invalid_literal(literal, "decimal", e.to_string())
            })?),
            TokenKind::Double => {
                let float = literal.parse::<f64>().map_err(|e| {
                    HoconError::invalid_literal(literal, "double", e.to_string())
                })?;
                let decimal = Decimal::from_f64(float).ok_or_else(|| {
                    HoconError::invalid_literal(literal, "double", "out of decimal range")
                })?;
                Value::Decimal(decimal)
            }
            TokenKind::Boolean => Value::Bool(
                TRUE_WORDS
                    .iter()
                    .any(|word| literal.eq_ignore_ascii_case(word)),
            ),
            _ => Value::String(literal.to_string()),
        };
        Ok(Some(value))
    }

    /// Look up a substitution target. A key referring to itself sees the value it had
    /// before this assignment started.
    fn lookup(&self, target: &str, path: &str, previous: Option<&Value>) -> Option<Value> {
        if target == path {
            return previous.cloned();
        }
        self.sink.get_node_or_value(target)
    }

    /// Copy every entry under `source` to the same relative position under `path`
    fn copy_subtree(&mut self, source: &str, path: &str) {
        let entries = self.sink.get_subtree(source);
        tracing::debug!(source, destination = path, entries = entries.len(), "copying subtree");

        for (entry_path, value) in entries {
            let relocated = format!("{}{}", path, &entry_path[source.len()..]);
            match value {
                Value::Node => self.sink.create_or_update_node(&relocated),
                value => self.assign(&relocated, value),
            }
        }
    }

    /// Store a leaf value. A leaf has no children, so anything left under it goes.
    fn assign(&mut self, path: &str, value: Value) {
        for (descendant, _) in self.sink.get_subtree(path) {
            if descendant != path {
                self.sink.remove_node(&descendant);
            }
        }
        self.sink.create_or_update_value(path, value);
    }

    /// Undo the speculative node markers for a key whose value turned out to be absent
    fn restore(&mut self, path: &str, registered: Registered) {
        match registered.previous {
            Some(Value::Node) => self.sink.create_or_update_node(path),
            Some(value) => self.sink.create_or_update_value(path, value),
            None => self.sink.remove_node(path),
        }
        for (ancestor, earlier) in registered.ancestors.into_iter().rev() {
            match earlier {
                Some(value) => self.sink.create_or_update_value(&ancestor, value),
                None => self.sink.remove_node(&ancestor),
            }
        }
    }

    fn join(&self, prefix: &str, key: &str) -> String {
        let key = self.target_path(key);
        if prefix.is_empty() {
            key
        } else {
            format!("{}{}{}", prefix, self.delimiter, key)
        }
    }

    /// Translate a dotted name from the text into a store path
    fn target_path(&self, name: &str) -> String {
        if self.delimiter == "." {
            name.to_string()
        } else {
            name.replace('.', &self.delimiter)
        }
    }

    fn unexpected(&self, tokenizer: &Tokenizer<'_>, expected: &str) -> HoconError {
        let (found, length) = tokenizer.describe_current();
        HoconError::syntax(
            tokenizer.content(),
            tokenizer.offset(),
            length,
            expected,
            found,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::resolver::VirtualResolver;
    use crate::store::Store;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Store {
        let mut store = Store::new();
        store.read_str(source).unwrap();
        store
    }

    fn parse_err(source: &str) -> HoconError {
        let mut store = Store::new();
        store.read_str(source).unwrap_err()
    }

    fn entries(store: &Store) -> Vec<(String, Value)> {
        store
            .iter()
            .map(|(path, value)| (path.to_string(), value.clone()))
            .collect()
    }

    /// Records every sink call, to check the order the reader emits them in
    #[derive(Default)]
    struct RecordingSink {
        store: Store,
        events: Vec<String>,
    }

    impl Sink for RecordingSink {
        fn create_or_update_value(&mut self, path: &str, value: Value) {
            self.events.push(format!("value {} = {}", path, value));
            self.store.create_or_update_value(path, value);
        }

        fn create_or_update_node(&mut self, path: &str) {
            self.events.push(format!("node {}", path));
            self.store.create_or_update_node(path);
        }

        fn remove_node(&mut self, path: &str) {
            self.events.push(format!("remove {}", path));
            self.store.remove_node(path);
        }

        fn get_node_or_value(&self, path: &str) -> Option<Value> {
            self.store.get_node_or_value(path)
        }

        fn get_subtree(&self, prefix: &str) -> Vec<(String, Value)> {
            self.store.get_subtree(prefix)
        }

        fn resolve_source(&self, name: &str) -> HoconResult<String> {
            self.store.resolve_source(name)
        }
    }

    #[test]
    fn test_nested_scopes() {
        let store = parse(
            "ssh {\n  connection {\n    host : 127.0.0.1\n    port : 22\n  }\n  status : on\n}",
        );
        assert_eq!(
            entries(&store),
            vec![
                ("ssh".to_string(), Value::Node),
                ("ssh.connection".to_string(), Value::Node),
                ("ssh.connection.host".to_string(), Value::from("127.0.0.1")),
                ("ssh.connection.port".to_string(), Value::Int(22)),
                ("ssh.status".to_string(), Value::Bool(true)),
            ]
        );
    }

    #[test]
    fn test_single_line_nested_scopes() {
        let store = parse("ssh { connection { host : 127.0.0.1\n port : 22 }\n status : on }");
        assert_eq!(store.get_int("ssh.connection.port").unwrap(), Some(22));
        assert_eq!(store.get_bool("ssh.status").unwrap(), Some(true));
    }

    #[test]
    fn test_node_marker_emitted_before_value() {
        let mut sink = RecordingSink::default();
        Reader::new(&mut sink).read_str("a { b : 1 }").unwrap();
        assert_eq!(sink.events, vec!["node a", "node a.b", "value a.b = 1"]);
    }

    #[test]
    fn test_scalar_kinds() {
        let store = parse(
            "s : \"quoted text\"\nbare : hello\ni : -42\nd : 3.25\ne : 1E3\nb1 : YES\nb2 : off\n",
        );
        assert_eq!(store.get_string("s").unwrap().as_deref(), Some("quoted text"));
        assert_eq!(store.get_string("bare").unwrap().as_deref(), Some("hello"));
        assert_eq!(store.get_int("i").unwrap(), Some(-42));
        assert_eq!(
            store.get_decimal("d").unwrap(),
            Some(Decimal::from_str("3.25").unwrap())
        );
        assert_eq!(store.get_value("e"), Some(&Value::Decimal(Decimal::from(1000))));
        assert_eq!(store.get_bool("b1").unwrap(), Some(true));
        assert_eq!(store.get_bool("b2").unwrap(), Some(false));
    }

    #[test]
    fn test_equals_assign_and_comments() {
        let store = parse("# header\na = 1 // trailing\n// full line\nb : 2\n");
        assert_eq!(store.get_int("a").unwrap(), Some(1));
        assert_eq!(store.get_int("b").unwrap(), Some(2));
    }

    #[test]
    fn test_array() {
        let store = parse("a : [1, 2, 3]");
        assert_eq!(store.get_value("a"), Some(&Value::from(vec![1i64, 2, 3])));
    }

    #[test]
    fn test_array_tolerates_empty_elements() {
        let store = parse("a : [, 1,, two ,]");
        assert_eq!(
            store.get_value("a"),
            Some(&Value::Array(vec![Value::Int(1), Value::from("two")]))
        );
    }

    #[test]
    fn test_array_with_substitutions() {
        let store = parse("x : 1\na : [${x}, ${?missing}, 2]");
        assert_eq!(store.get_int_list("a").unwrap(), Some(vec![1, 2]));
    }

    #[test]
    fn test_unterminated_array() {
        let err = parse_err("a : [1, 2");
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert!(err.to_string().contains("found <eof>"));
    }

    #[test]
    fn test_substitution_is_a_snapshot() {
        let store = parse("a : 1\nb : ${a}\na : 2\n");
        assert_eq!(store.get_int("a").unwrap(), Some(2));
        assert_eq!(store.get_int("b").unwrap(), Some(1));
    }

    #[test]
    fn test_substitution_forms() {
        let store = parse("a { b : x }\nc : $(a.b)\nd : ${a.b}\n");
        assert_eq!(store.get_string("c").unwrap().as_deref(), Some("x"));
        assert_eq!(store.get_string("d").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_unresolved_substitution() {
        let err = parse_err("a : ${missing}");
        assert_eq!(err.kind(), ErrorKind::UnresolvedSubstitution);
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_safe_substitution_miss_leaves_no_entry() {
        let store = parse("a : ${?missing}\nb : 1");
        assert!(!store.has_path("a"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_safe_substitution_miss_keeps_earlier_value() {
        let store = parse("a : 1\na : ${?missing}");
        assert_eq!(store.get_int("a").unwrap(), Some(1));
    }

    #[test]
    fn test_safe_substitution_miss_on_dotted_key_leaves_no_ancestors() {
        let store = parse("a.b : ${?missing}\n");
        assert!(store.is_empty());

        let store = parse("x { y.z : ${?missing} }\n");
        assert_eq!(entries(&store), vec![("x".to_string(), Value::Node)]);
    }

    #[test]
    fn test_safe_substitution_miss_on_dotted_key_keeps_earlier_leaf() {
        let store = parse("a : 1\na.b : ${?missing}\n");
        assert_eq!(entries(&store), vec![("a".to_string(), Value::Int(1))]);
    }

    #[test]
    fn test_self_reference_without_earlier_value() {
        let err = parse_err("a : ${a}");
        assert_eq!(err.kind(), ErrorKind::UnresolvedSubstitution);

        let store = parse("a : 1\na : ${a}\nb : 2\nb : [${b}, 3]\n");
        assert_eq!(store.get_int("a").unwrap(), Some(1));
        assert_eq!(store.get_int_list("b").unwrap(), Some(vec![2, 3]));
    }

    #[test]
    fn test_safe_substitution_hit() {
        let store = parse("a : 5\nb : ${?a}");
        assert_eq!(store.get_int("b").unwrap(), Some(5));
    }

    #[test]
    fn test_subtree_copy_then_override() {
        let store = parse("base { x : 1\n y : 2 }\nderived : ${base} { x : 2 }\n");
        assert_eq!(store.get_int("derived.x").unwrap(), Some(2));
        assert_eq!(store.get_int("derived.y").unwrap(), Some(2));
        assert_eq!(store.get_int("base.x").unwrap(), Some(1));
        assert_eq!(store.get_value("derived"), Some(&Value::Node));
    }

    #[test]
    fn test_subtree_copy_without_override() {
        let store = parse("base { inner { k : v } }\ncopy : ${base}\nafter : 1\n");
        assert_eq!(store.get_value("copy.inner"), Some(&Value::Node));
        assert_eq!(store.get_string("copy.inner.k").unwrap().as_deref(), Some("v"));
        assert_eq!(store.get_int("after").unwrap(), Some(1));
    }

    #[test]
    fn test_subtree_copy_leaf_replaces_existing_block() {
        let store = parse("derived { x { deep : 1 } }\nbase { x : 7 }\nderived : ${base}\n");
        assert_eq!(store.get_int("derived.x").unwrap(), Some(7));
        assert!(!store.has_path("derived.x.deep"));

        let text = store.to_hocon(None).unwrap();
        assert_eq!(parse(&text), store);
    }

    #[test]
    fn test_subtree_copy_does_not_touch_sibling_prefixes() {
        let store = parse("base { x : 1 }\nbase2 { z : 3 }\nd : ${base}\n");
        assert!(!store.has_path("d2.z"));
        assert!(!store.has_path("d.z"));
        assert_eq!(store.get_int("d.x").unwrap(), Some(1));
    }

    #[test]
    fn test_dotted_key_registers_ancestors() {
        let store = parse("a.b.c : 1");
        assert_eq!(store.get_value("a"), Some(&Value::Node));
        assert_eq!(store.get_value("a.b"), Some(&Value::Node));
        assert_eq!(store.get_int("a.b.c").unwrap(), Some(1));
    }

    #[test]
    fn test_leaf_replaces_subtree() {
        let store = parse("a { x : 1 }\na : 5\n");
        assert_eq!(store.get_int("a").unwrap(), Some(5));
        assert!(!store.has_path("a.x"));
    }

    #[test]
    fn test_custom_delimiter() {
        let mut store = Store::new().with_delimiter(":");
        store
            .read_str("ssh { connection { port : 22 } }\nalias : ${ssh.connection.port}\n")
            .unwrap();
        assert_eq!(store.get_int("ssh:connection:port").unwrap(), Some(22));
        assert_eq!(store.get_int("alias").unwrap(), Some(22));
    }

    #[test]
    fn test_missing_assign() {
        let err = parse_err("a 1");
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert_eq!(err.offset(), Some(2));
        assert!(err.to_string().contains("expected ':', '=' or '{'"));
    }

    #[test]
    fn test_missing_value() {
        let err = parse_err("a : }");
        assert!(err.to_string().contains("expected a value"));
    }

    #[test]
    fn test_missing_end_scope() {
        let err = parse_err("a { b : 1");
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert!(err.to_string().contains("expected a key or '}'"));
    }

    #[test]
    fn test_stray_end_scope() {
        let err = parse_err("a : 1\n}");
        assert!(err.to_string().contains("expected a key or include"));
    }

    #[test]
    fn test_scalar_needs_terminator() {
        // `}` is not a valid terminator directly after a bare value
        let err = parse_err("a { b : 1}");
        assert_eq!(err.kind(), ErrorKind::Syntax);
    }

    #[test]
    fn test_integer_overflow() {
        let err = parse_err("a : 99999999999999999999");
        assert_eq!(err.kind(), ErrorKind::InvalidLiteral);
    }

    #[test]
    fn test_include() {
        let resolver = VirtualResolver::new().with_source("db.conf", "host : db.local\nport : 5432");
        let mut store = Store::new().with_resolver(resolver);
        store.read_str("db {\n include \"db.conf\"\n}\nname : app\n").unwrap();
        assert_eq!(store.get_string("db.host").unwrap().as_deref(), Some("db.local"));
        assert_eq!(store.get_int("db.port").unwrap(), Some(5432));
        assert_eq!(store.get_string("name").unwrap().as_deref(), Some("app"));
    }

    #[test]
    fn test_sibling_includes_allowed() {
        let resolver = VirtualResolver::new().with_source("common.conf", "timeout : 30");
        let mut store = Store::new().with_resolver(resolver);
        store
            .read_str("a { include \"common.conf\" }\nb { include \"common.conf\" }\n")
            .unwrap();
        assert_eq!(store.get_int("a.timeout").unwrap(), Some(30));
        assert_eq!(store.get_int("b.timeout").unwrap(), Some(30));
    }

    #[test]
    fn test_recursive_include() {
        let resolver = VirtualResolver::new()
            .with_source("a.conf", "x : 1\ninclude \"b.conf\"")
            .with_source("b.conf", "y : 2\ninclude \"a.conf\"");
        let mut store = Store::new().with_resolver(resolver);
        let err = store.read_str("include \"a.conf\"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RecursiveInclude);
        match err {
            HoconError::RecursiveInclude { name, chain } => {
                assert_eq!(name, "a.conf");
                assert_eq!(chain, "a.conf -> b.conf -> a.conf");
            }
            other => panic!("expected RecursiveInclude, got {:?}", other),
        }
    }

    #[test]
    fn test_named_root_cannot_include_itself() {
        let resolver = VirtualResolver::new().with_source("main.conf", "include \"main.conf\"");
        let mut store = Store::new().with_resolver(resolver);
        let err = store.read("main.conf").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RecursiveInclude);
    }

    #[test]
    fn test_include_depth_limit() {
        let resolver = VirtualResolver::new()
            .with_source("1", "include \"2\"")
            .with_source("2", "include \"3\"")
            .with_source("3", "k : v");
        let mut store = Store::new().with_resolver(resolver);
        let err = Reader::new(&mut store)
            .with_options(ReaderOptions {
                max_include_depth: 2,
            })
            .read_str("include \"1\"")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RecursiveInclude);
    }

    #[test]
    fn test_missing_include_source() {
        let err = parse_err("include \"nowhere.conf\"");
        assert_eq!(err.kind(), ErrorKind::SourceNotFound);
    }

    #[test]
    fn test_read_from_stream() {
        let mut store = Store::new();
        store.read_from("a : 1".as_bytes()).unwrap();
        assert_eq!(store.get_int("a").unwrap(), Some(1));
    }
}
