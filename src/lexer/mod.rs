//! Tokenizer for the configuration grammar.
//!
//! Scans a text buffer at an offset, matching the rules of a [`token::Grammar`] anchored at
//! the current position. Peeking and committing are separate steps: [`Tokenizer::read_next`]
//! finds the next token without moving past it, [`Tokenizer::consume`] commits it.
//!
//! Included sources are spliced into the buffer at the scan position, so an include scans
//! exactly as if its text had been written inline.

pub mod token;

use token::{Grammar, TokenKind, TokenMatch};

/// A spliced include: active while the scan offset is still inside its text
#[derive(Debug, Clone)]
struct IncludeRegion {
    name: String,
    end: usize,
}

/// Tokenizer over a mutable text buffer
pub struct Tokenizer<'g> {
    grammar: &'g Grammar,
    content: String,
    offset: usize,
    /// Last successful match from `read_next`, committed by `consume`
    last: Option<TokenMatch>,
    /// Includes whose text has not been fully scanned yet, outermost first
    includes: Vec<IncludeRegion>,
}

impl<'g> Tokenizer<'g> {
    /// Create a tokenizer over `content`
    pub fn new(grammar: &'g Grammar, content: impl Into<String>) -> Self {
        Self {
            grammar,
            content: content.into(),
            offset: 0,
            last: None,
            includes: Vec::new(),
        }
    }

    /// Create a tokenizer whose whole buffer belongs to the named source
    pub fn with_source(grammar: &'g Grammar, name: &str, content: impl Into<String>) -> Self {
        let mut tokenizer = Self::new(grammar, content);
        tokenizer.includes.push(IncludeRegion {
            name: name.to_string(),
            end: usize::MAX,
        });
        tokenizer
    }

    /// Current scan offset
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The working buffer, including any spliced text
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_eof(&self) -> bool {
        self.offset >= self.content.len()
    }

    /// Skip any run of `ignored` tokens, then try the `requested` kinds at the current
    /// offset in grammar order. Returns `None` at end of input or when nothing requested
    /// matches. The match is not committed until [`Tokenizer::consume`].
    pub fn read_next(
        &mut self,
        requested: &[TokenKind],
        ignored: &[TokenKind],
    ) -> Option<TokenMatch> {
        self.last = None;

        loop {
            if self.is_eof() {
                return None;
            }
            match self.grammar.match_at(&self.content, self.offset, ignored) {
                Some(skipped) => {
                    tracing::trace!(kind = %skipped.kind, offset = skipped.offset, "skip");
                    self.offset = skipped.next_offset;
                }
                None => break,
            }
        }

        let found = self.grammar.match_at(&self.content, self.offset, requested)?;
        self.last = Some(found.clone());
        Some(found)
    }

    /// Commit the last match and move past it
    pub fn consume(&mut self) {
        if let Some(token) = self.last.take() {
            tracing::trace!(kind = %token.kind, value = %token.value, offset = token.offset, "token");
            self.offset = token.next_offset;
        }
    }

    /// Splice `text` (followed by a line break) into the buffer at the current offset
    pub fn include(&mut self, name: &str, text: &str) {
        self.prune_includes();

        let mut spliced = String::with_capacity(text.len() + 1);
        spliced.push_str(text);
        spliced.push('\n');
        let len = spliced.len();

        self.content.insert_str(self.offset, &spliced);
        for region in &mut self.includes {
            region.end = region.end.saturating_add(len);
        }
        self.includes.push(IncludeRegion {
            name: name.to_string(),
            end: self.offset + len,
        });
        self.last = None;

        tracing::debug!(source = name, offset = self.offset, length = len, "spliced include");
    }

    /// Names of the includes enclosing the current offset, outermost first
    pub fn include_chain(&self) -> Vec<&str> {
        self.includes
            .iter()
            .filter(|region| region.end > self.offset)
            .map(|region| region.name.as_str())
            .collect()
    }

    fn prune_includes(&mut self) {
        let offset = self.offset;
        self.includes.retain(|region| region.end > offset);
    }

    /// Describe what sits at the current offset, for error messages: the first grammar
    /// kind that matches, or the raw character. Returns the description and its length.
    pub fn describe_current(&self) -> (String, usize) {
        if self.is_eof() {
            return ("<eof>".to_string(), 0);
        }
        let all: Vec<TokenKind> = self.grammar.rules().iter().map(|rule| rule.kind).collect();
        if let Some(found) = self.grammar.match_at(&self.content, self.offset, &all) {
            let length = found.next_offset - found.offset;
            if found.kind.is_punctuation() {
                return (found.kind.to_string(), length);
            }
            return (format!("{} '{}'", found.kind, found.value), length);
        }
        match self.content[self.offset..].chars().next() {
            Some(ch) => (format!("'{}'", ch), ch.len_utf8()),
            None => ("<eof>".to_string(), 0),
        }
    }
}
