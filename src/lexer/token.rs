use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{HoconError, HoconResult};

/// Token kinds, all possible tokens of the configuration grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Comment,
    Include,
    Key,
    Space,
    Assign,
    BeginArray,
    EndArray,
    ArraySeparator,
    Substitution,
    SafeSubstitution,
    Boolean,
    Decimal,
    Double,
    Integer,
    String,
    BeginScope,
    EndScope,
}

impl TokenKind {
    /// Scalar kinds accepted on the right-hand side of an assignment or inside an array
    pub const SCALARS: [TokenKind; 7] = [
        TokenKind::String,
        TokenKind::Integer,
        TokenKind::Decimal,
        TokenKind::Double,
        TokenKind::Boolean,
        TokenKind::Substitution,
        TokenKind::SafeSubstitution,
    ];

    /// Kinds skipped between meaningful tokens
    pub const IGNORED: [TokenKind; 2] = [TokenKind::Comment, TokenKind::Space];

    /// Kinds whose text is fully described by the kind itself
    pub fn is_punctuation(&self) -> bool {
        matches!(
            self,
            TokenKind::Assign
                | TokenKind::BeginArray
                | TokenKind::EndArray
                | TokenKind::ArraySeparator
                | TokenKind::BeginScope
                | TokenKind::EndScope
        )
    }

    pub fn is_substitution(&self) -> bool {
        matches!(self, TokenKind::Substitution | TokenKind::SafeSubstitution)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Comment => write!(f, "comment"),
            TokenKind::Include => write!(f, "include"),
            TokenKind::Key => write!(f, "key"),
            TokenKind::Space => write!(f, "whitespace"),
            TokenKind::Assign => write!(f, "':' or '='"),
            TokenKind::BeginArray => write!(f, "'['"),
            TokenKind::EndArray => write!(f, "']'"),
            TokenKind::ArraySeparator => write!(f, "','"),
            TokenKind::Substitution => write!(f, "substitution"),
            TokenKind::SafeSubstitution => write!(f, "optional substitution"),
            TokenKind::Boolean => write!(f, "boolean"),
            TokenKind::Decimal => write!(f, "decimal"),
            TokenKind::Double => write!(f, "double"),
            TokenKind::Integer => write!(f, "integer"),
            TokenKind::String => write!(f, "string"),
            TokenKind::BeginScope => write!(f, "'{{'"),
            TokenKind::EndScope => write!(f, "'}}'"),
        }
    }
}

/// A successful anchored match: the decoded token text and where scanning resumes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMatch {
    pub kind: TokenKind,
    /// Captured `value` group if the rule has one, otherwise the whole match
    pub value: String,
    /// Offset where the token starts
    pub offset: usize,
    /// Offset just past the token
    pub next_offset: usize,
}

/// One grammar entry: a pattern plus an optional assertion on the text that follows it
#[derive(Debug)]
pub struct Rule {
    pub kind: TokenKind,
    pattern: Regex,
    stop: Option<Regex>,
}

impl Rule {
    /// Compile a rule. Both patterns are anchored at the scan position.
    pub fn new(kind: TokenKind, pattern: &str, stop: Option<&str>) -> HoconResult<Self> {
        Ok(Self {
            kind,
            pattern: anchored(pattern)?,
            stop: stop.map(anchored).transpose()?,
        })
    }

    /// Match this rule exactly at `offset` in `content`
    pub fn matches_at(&self, content: &str, offset: usize) -> Option<TokenMatch> {
        let rest = content.get(offset..)?;
        let caps = self.pattern.captures(rest)?;
        let whole = caps.get(0)?;
        if whole.is_empty() {
            return None;
        }

        let next_offset = offset + whole.end();
        if let Some(stop) = &self.stop {
            if !stop.is_match(&content[next_offset..]) {
                return None;
            }
        }

        let value = caps
            .name("value")
            .map(|m| m.as_str())
            .unwrap_or_else(|| whole.as_str());

        Some(TokenMatch {
            kind: self.kind,
            value: value.to_string(),
            offset,
            next_offset,
        })
    }
}

fn anchored(pattern: &str) -> HoconResult<Regex> {
    Regex::new(&format!("^(?:{})", pattern)).map_err(|e| HoconError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Scalars must end at end-of-input, whitespace, a comma or a closing bracket
const SCALAR_STOP: &str = r"\z|[ \],\r\n\t]";

/// The lexical grammar, in priority order. The catch-all bare string is last among the
/// scalars so that comments, includes and literals win first.
const STANDARD_RULES: &[(TokenKind, &str, Option<&str>)] = &[
    (TokenKind::Comment, r"(?:#|//).*[\n\r]?", None),
    (TokenKind::Include, r#"include[ ]*"(?P<value>[^"\r\n]+)""#, None),
    (TokenKind::Key, r"[a-zA-Z0-9_-]+(?:\.[a-zA-Z0-9_-]+)*", None),
    (TokenKind::Space, r"[ \r\n\t]+", None),
    (TokenKind::Assign, r"[:=]", None),
    (TokenKind::BeginArray, r"\[", None),
    (TokenKind::EndArray, r"\]", None),
    (TokenKind::ArraySeparator, r",", None),
    (TokenKind::Substitution, r"\$\((?P<value>[\w.-]+)\)", None),
    (TokenKind::Substitution, r"\$\{(?P<value>[\w.-]+)\}", None),
    (TokenKind::SafeSubstitution, r"\$\(\?(?P<value>[\w.-]+)\)", None),
    (TokenKind::SafeSubstitution, r"\$\{\?(?P<value>[\w.-]+)\}", None),
    (
        TokenKind::Boolean,
        r"(?i:on|off|true|false|yes|no|enabled|disabled)",
        Some(SCALAR_STOP),
    ),
    (TokenKind::Decimal, r"(?P<value>-?[0-9]+\.[0-9]+)", Some(SCALAR_STOP)),
    (TokenKind::Double, r"(?P<value>-?[0-9]+[Ee][0-9]+)", Some(SCALAR_STOP)),
    (TokenKind::Integer, r"(?P<value>-?[0-9]+)", Some(SCALAR_STOP)),
    (TokenKind::String, r#""(?P<value>(?:""|[^"])*)""#, Some(SCALAR_STOP)),
    (
        TokenKind::String,
        r#"[^"$\{\}\[\]:=,+#'^?!@*& \r\n\t]+"#,
        Some(SCALAR_STOP),
    ),
    (TokenKind::BeginScope, r"\{", None),
    (TokenKind::EndScope, r"\}", None),
];

static STANDARD: Lazy<Grammar> =
    Lazy::new(|| Grammar::from_rules(STANDARD_RULES).expect("built-in token grammar is valid"));

/// Ordered list of token rules. Built once and shared by reference between tokenizers.
#[derive(Debug)]
pub struct Grammar {
    rules: Vec<Rule>,
}

impl Grammar {
    /// The built-in grammar
    pub fn standard() -> &'static Grammar {
        &STANDARD
    }

    /// Build a grammar from `(kind, pattern, stop)` triples, keeping their order
    pub fn from_rules(specs: &[(TokenKind, &str, Option<&str>)]) -> HoconResult<Self> {
        let rules = specs
            .iter()
            .map(|(kind, pattern, stop)| Rule::new(*kind, pattern, *stop))
            .collect::<HoconResult<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// First rule (in declaration order) among `kinds` that matches at `offset`
    pub fn match_at(&self, content: &str, offset: usize, kinds: &[TokenKind]) -> Option<TokenMatch> {
        self.rules
            .iter()
            .filter(|rule| kinds.contains(&rule.kind))
            .find_map(|rule| rule.matches_at(content, offset))
    }
}
