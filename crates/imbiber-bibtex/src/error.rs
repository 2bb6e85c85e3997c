/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for document parsing.

use std::fmt;
use thiserror::Error;

/// Result type alias for imbiber-bibtex operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// What the parser was looking for when it gave up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
    /// A keyword after `@` (`comment`, `string`, `preamble`).
    Keyword(&'static str),
    /// The entry class token after `@`.
    EntryClass,
    /// The citation key token.
    EntryKey,
    /// A field name.
    FieldName,
    /// One of the value alternatives (braced, quoted, bare token).
    FieldValue,
    /// A specific character.
    Char(char),
    /// Either of two characters.
    EitherChar(char, char),
    /// Brace nesting no deeper than the configured limit.
    MaxDepth(usize),
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Keyword(word) => write!(f, "keyword '{}'", word),
            Expected::EntryClass => write!(f, "entry type"),
            Expected::EntryKey => write!(f, "citation key"),
            Expected::FieldName => write!(f, "field name"),
            Expected::FieldValue => write!(f, "field value ('{{', '\"' or a bare token)"),
            Expected::Char(c) => write!(f, "'{}'", c),
            Expected::EitherChar(a, b) => write!(f, "'{}' or '{}'", a, b),
            Expected::MaxDepth(depth) => write!(f, "brace nesting of at most {} levels", depth),
        }
    }
}

/// A structural parse failure.
///
/// Parsing never salvages partial entries: the first failure aborts the
/// whole document. `offset` is the furthest byte offset any grammar
/// alternative reached before failing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error at byte {offset}: expected {expected}")]
pub struct ParseError {
    pub offset: usize,
    pub expected: Expected,
}

impl ParseError {
    pub fn new(offset: usize, expected: Expected) -> Self {
        Self { offset, expected }
    }

    /// Convert the byte offset to a 1-based (line, column) pair.
    ///
    /// Columns count characters, not bytes. Offsets past the end of
    /// `source` are clamped to its length.
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let mut end = self.offset.min(source.len());
        while !source.is_char_boundary(end) {
            end -= 1;
        }
        let before = &source[..end];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        (line, column)
    }

    /// Keep whichever of two failures got further into the input.
    ///
    /// On a tie the receiver wins, so earlier alternatives take precedence.
    pub(crate) fn furthest(self, other: ParseError) -> ParseError {
        if other.offset > self.offset { other } else { self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ParseError::new(12, Expected::Char('}'));
        assert_eq!(err.to_string(), "Parse error at byte 12: expected '}'");
    }

    #[test]
    fn test_line_col() {
        let source = "@article{a,\n  title = {x}\n";
        let err = ParseError::new(source.len(), Expected::Char('}'));
        assert_eq!(err.line_col(source), (3, 1));

        let err = ParseError::new(14, Expected::FieldName);
        assert_eq!(err.line_col(source), (2, 3));
    }

    #[test]
    fn test_furthest_prefers_receiver_on_tie() {
        let a = ParseError::new(4, Expected::Char('{'));
        let b = ParseError::new(4, Expected::EntryKey);
        assert_eq!(a.clone().furthest(b), a);

        let c = ParseError::new(9, Expected::EntryKey);
        assert_eq!(a.furthest(c.clone()), c);
    }
}
