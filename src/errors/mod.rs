//! Error types, diagnostics, and result aliases for the reader, writer and store.
//!
//! All user-facing errors are variants of [`HoconError`], rendered via `miette` diagnostics.
//! A document either parses completely or the parse aborts with the first error.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Broad classification of a [`HoconError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    InvalidLiteral,
    InvalidPattern,
    UnresolvedSubstitution,
    RecursiveInclude,
    SourceNotFound,
    TypeMismatch,
    UnwritableValue,
    Io,
}

/// Main error type
#[derive(Error, Debug, Diagnostic)]
pub enum HoconError {
    #[error("syntax error: expected {expected}, found {found} at offset {offset}")]
    #[diagnostic(code(H0001), help("{help}"))]
    SyntaxError {
        #[source_code]
        src: String,
        #[label("unexpected: {found}")]
        span: SourceSpan,
        expected: String,
        found: String,
        offset: usize,
        help: String,
    },

    #[error("invalid {kind} literal '{literal}': {reason}")]
    #[diagnostic(code(H0002))]
    InvalidLiteral {
        literal: String,
        kind: String,
        reason: String,
    },

    #[error("invalid token pattern /{pattern}/: {message}")]
    #[diagnostic(code(H0003))]
    InvalidPattern { pattern: String, message: String },

    #[error("substitution not found: '{path}'")]
    #[diagnostic(
        code(H0101),
        help("define '{path}' before it is referenced, or use ${{?{path}}} to make it optional")
    )]
    UnresolvedSubstitution { path: String },

    #[error("already included: '{name}'")]
    #[diagnostic(code(H0201), help("include chain: {chain}"))]
    RecursiveInclude { name: String, chain: String },

    #[error("source not found: '{name}'")]
    #[diagnostic(code(H0202))]
    SourceNotFound { name: String },

    #[error("type mismatch at '{path}': expected {expected}, found {found}")]
    #[diagnostic(code(H0301))]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    #[error("cannot write '{path}': {found} inside an array")]
    #[diagnostic(
        code(H0401),
        help("array elements must be scalars; move the block out of the array")
    )]
    UnwritableValue { path: String, found: String },

    #[error("I/O error: {message}")]
    Io { message: String },
}

impl HoconError {
    /// Create a SyntaxError pointing at `offset` in the working buffer
    pub fn syntax(
        src: impl Into<String>,
        offset: usize,
        length: usize,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        let found = found.into();
        let help = if found == "<eof>" {
            "the document ended early; check for a missing value or closing bracket".to_string()
        } else {
            "bare values must be followed by whitespace, ',' or ']'".to_string()
        };
        HoconError::SyntaxError {
            src: src.into(),
            span: (offset, length).into(),
            expected: expected.into(),
            found,
            offset,
            help,
        }
    }

    pub fn invalid_literal(
        literal: impl Into<String>,
        kind: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        HoconError::InvalidLiteral {
            literal: literal.into(),
            kind: kind.into(),
            reason: reason.into(),
        }
    }

    pub fn unresolved_substitution(path: impl Into<String>) -> Self {
        HoconError::UnresolvedSubstitution { path: path.into() }
    }

    pub fn type_mismatch(
        path: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        HoconError::TypeMismatch {
            path: path.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn unwritable_value(path: impl Into<String>, found: impl Into<String>) -> Self {
        HoconError::UnwritableValue {
            path: path.into(),
            found: found.into(),
        }
    }

    pub fn io_error(message: impl Into<String>) -> Self {
        HoconError::Io {
            message: message.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            HoconError::SyntaxError { .. } => ErrorKind::Syntax,
            HoconError::InvalidLiteral { .. } => ErrorKind::InvalidLiteral,
            HoconError::InvalidPattern { .. } => ErrorKind::InvalidPattern,
            HoconError::UnresolvedSubstitution { .. } => ErrorKind::UnresolvedSubstitution,
            HoconError::RecursiveInclude { .. } => ErrorKind::RecursiveInclude,
            HoconError::SourceNotFound { .. } => ErrorKind::SourceNotFound,
            HoconError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            HoconError::UnwritableValue { .. } => ErrorKind::UnwritableValue,
            HoconError::Io { .. } => ErrorKind::Io,
        }
    }

    /// Buffer offset of a syntax error
    pub fn offset(&self) -> Option<usize> {
        match self {
            HoconError::SyntaxError { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

impl From<std::io::Error> for HoconError {
    fn from(err: std::io::Error) -> Self {
        HoconError::io_error(err.to_string())
    }
}

/// Result type for reader, writer and store operations
pub type HoconResult<T> = Result<T, HoconError>;
