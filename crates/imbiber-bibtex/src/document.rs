/*
 * document.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Document grammar for BibTeX-like sources.
//!
//! The grammar is implemented as a hand-written recursive-descent parser
//! with ordered choice: at every `@` marker the alternatives
//! `comment | string | preamble | entry` are tried in that order, and a
//! failed alternative rolls the cursor back before the next one is tried.
//! Failures are plain values; when every alternative fails, the one that
//! got furthest into the input is reported.
//!
//! ```text
//! document   := (nothing | something)*
//! nothing    := [^@]+
//! something  := comment | string | preamble | entry
//! comment    := '@' ws? "comment" [^\n]* ('\n' | EOF)
//! string     := '@' ws? "string" ws? group
//! preamble   := '@' ws? "preamble" ws? group
//! entry      := '@' ws? token ws? ('{' body '}' | '(' body ')')
//! body       := ws? token ws? (',' (ws? field ws? ',')* (ws? field)? ws?)?
//! field      := token ws? '=' ws? value
//! value      := piece (ws? '#' ws? piece)*
//! piece      := braced | quoted | [A-Za-z0-9]+
//! ```
//!
//! Keywords are matched case-insensitively.

use crate::error::{Expected, ParseError, Result};
use std::fmt;

/// Default limit on brace nesting inside a single value or group.
pub const MAX_NESTING_DEPTH: usize = 64;

/// A field value exactly as written, without its outermost delimiters.
///
/// Inner braces and quotes are preserved; nothing is expanded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawValue(String);

impl RawValue {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single `name = value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: RawValue,
}

/// One `@class{key, field = value, ...}` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Entry class as written (e.g. `article`, `InProceedings`).
    pub class: String,
    /// Citation key.
    pub key: String,
    /// Fields in source order. Names may repeat.
    pub fields: Vec<Field>,
    /// Byte offset of the `@` that starts this entry.
    pub offset: usize,
}

impl Entry {
    /// Look up the first field with this name, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
            .map(|f| &f.value)
    }
}

/// The verbatim content of an `@string` group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringMacro {
    pub content: String,
}

impl StringMacro {
    /// Split the content at its first `=` into a trimmed `(name, value)` pair.
    ///
    /// The value is returned as written; no expansion takes place.
    pub fn definition(&self) -> Option<(&str, &str)> {
        self.content
            .split_once('=')
            .map(|(name, value)| (name.trim(), value.trim()))
    }
}

/// A top-level construct recognized in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Comment(String),
    StringMacro(StringMacro),
    Preamble(String),
    Entry(Entry),
}

/// Everything recognized in one source text, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawDocument {
    pub items: Vec<Item>,
}

impl RawDocument {
    /// Iterate over the entries, skipping comments, strings and preambles.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.items.iter().filter_map(|item| match item {
            Item::Entry(entry) => Some(entry),
            _ => None,
        })
    }

    /// Consume the document, keeping only its entries.
    pub fn into_entries(self) -> Vec<Entry> {
        self.items
            .into_iter()
            .filter_map(|item| match item {
                Item::Entry(entry) => Some(entry),
                _ => None,
            })
            .collect()
    }
}

/// Parse a whole document.
///
/// # Example
///
/// ```rust
/// use imbiber_bibtex::parse;
///
/// let doc = parse("@article{knuth84, title = {Literate Programming}}").unwrap();
/// let entry = doc.entries().next().unwrap();
/// assert_eq!(entry.key, "knuth84");
/// assert_eq!(entry.get("TITLE").unwrap().as_str(), "Literate Programming");
/// ```
///
/// # Errors
///
/// Returns a [`ParseError`] for the first structural problem; nothing of
/// the document is returned in that case.
pub fn parse(text: &str) -> Result<RawDocument> {
    parse_with_max_depth(text, MAX_NESTING_DEPTH)
}

/// Parse a whole document with a custom brace nesting limit.
pub fn parse_with_max_depth(text: &str, max_depth: usize) -> Result<RawDocument> {
    let mut parser = Parser {
        src: text,
        pos: 0,
        max_depth,
    };
    parser.document()
}

/// Characters that end a class, key or field-name token.
fn is_token_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '{' | '}' | '(' | ')' | ',' | '=')
}

/// Internal parser state.
struct Parser<'a> {
    src: &'a str,
    pos: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<()> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error(Expected::Char(c)))
        }
    }

    fn error(&self, expected: Expected) -> ParseError {
        ParseError::new(self.pos, expected)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Run a rule, rewinding the cursor if it fails.
    fn attempt<T>(&mut self, rule: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let start = self.pos;
        let result = rule(self);
        if result.is_err() {
            self.pos = start;
        }
        result
    }

    fn keyword(&mut self, word: &'static str) -> Result<()> {
        let end = self.pos + word.len();
        match self.src.get(self.pos..end) {
            Some(candidate) if candidate.eq_ignore_ascii_case(word) => {
                self.pos = end;
                Ok(())
            }
            _ => Err(self.error(Expected::Keyword(word))),
        }
    }

    fn token(&mut self, expected: Expected) -> Result<&'a str> {
        let start = self.pos;
        while self.peek().is_some_and(is_token_char) {
            self.bump();
        }
        if self.pos == start {
            Err(self.error(expected))
        } else {
            Ok(&self.src[start..self.pos])
        }
    }

    fn document(&mut self) -> Result<RawDocument> {
        let mut items = Vec::new();
        while let Some(skip) = self.src[self.pos..].find('@') {
            self.pos += skip;
            items.push(self.something()?);
        }
        self.pos = self.src.len();
        Ok(RawDocument { items })
    }

    fn something(&mut self) -> Result<Item> {
        let comment = match self.attempt(Self::comment) {
            Ok(text) => return Ok(Item::Comment(text.to_string())),
            Err(err) => err,
        };
        let string = match self.attempt(|p| p.keyword_group("string")) {
            Ok(content) => {
                return Ok(Item::StringMacro(StringMacro {
                    content: content.to_string(),
                }));
            }
            Err(err) => err,
        };
        let preamble = match self.attempt(|p| p.keyword_group("preamble")) {
            Ok(content) => return Ok(Item::Preamble(content.to_string())),
            Err(err) => err,
        };
        let entry = match self.attempt(Self::entry) {
            Ok(entry) => return Ok(Item::Entry(entry)),
            Err(err) => err,
        };
        // The generic entry rule explains a failure best when offsets tie.
        Err(entry.furthest(comment).furthest(string).furthest(preamble))
    }

    fn comment(&mut self) -> Result<&'a str> {
        self.expect('@')?;
        self.skip_whitespace();
        self.keyword("comment")?;
        let start = self.pos;
        let rest = &self.src[start..];
        let (text, consumed) = match rest.find('\n') {
            Some(newline) => (&rest[..newline], newline + 1),
            None => (rest, rest.len()),
        };
        self.pos += consumed;
        Ok(text.trim_end_matches('\r'))
    }

    fn keyword_group(&mut self, word: &'static str) -> Result<&'a str> {
        self.expect('@')?;
        self.skip_whitespace();
        self.keyword(word)?;
        self.skip_whitespace();
        match self.peek() {
            Some('{') => self.braced(),
            Some('(') => self.parenthesised(),
            _ => Err(self.error(Expected::EitherChar('{', '('))),
        }
    }

    /// A balanced `{...}` group; returns the content without the outer braces.
    fn braced(&mut self) -> Result<&'a str> {
        self.expect('{')?;
        let start = self.pos;
        let mut depth = 1;
        while let Some(c) = self.bump() {
            match c {
                '{' => {
                    depth += 1;
                    if depth > self.max_depth {
                        return Err(ParseError::new(
                            self.pos - 1,
                            Expected::MaxDepth(self.max_depth),
                        ));
                    }
                }
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(&self.src[start..self.pos - 1]);
                    }
                }
                _ => {}
            }
        }
        Err(self.error(Expected::Char('}')))
    }

    /// A `(...)` group whose content may hold balanced brace groups.
    fn parenthesised(&mut self) -> Result<&'a str> {
        self.expect('(')?;
        let start = self.pos;
        loop {
            match self.peek() {
                Some(')') => {
                    let content = &self.src[start..self.pos];
                    self.bump();
                    return Ok(content);
                }
                Some('{') => {
                    self.braced()?;
                }
                Some('}') | None => return Err(self.error(Expected::Char(')'))),
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    fn quoted(&mut self) -> Result<&'a str> {
        self.expect('"')?;
        let start = self.pos;
        loop {
            match self.peek() {
                Some('"') => {
                    let content = &self.src[start..self.pos];
                    self.bump();
                    return Ok(content);
                }
                Some('{') => {
                    self.braced()?;
                }
                Some('}') | None => return Err(self.error(Expected::Char('"'))),
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    fn bare(&mut self) -> Result<&'a str> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric()) {
            self.bump();
        }
        if self.pos == start {
            Err(self.error(Expected::FieldValue))
        } else {
            Ok(&self.src[start..self.pos])
        }
    }

    fn entry(&mut self) -> Result<Entry> {
        let offset = self.pos;
        self.expect('@')?;
        self.skip_whitespace();
        let class = self.token(Expected::EntryClass)?;
        self.skip_whitespace();
        let close = match self.peek() {
            Some('{') => '}',
            Some('(') => ')',
            _ => return Err(self.error(Expected::EitherChar('{', '('))),
        };
        self.bump();
        self.skip_whitespace();
        let key = self.token(Expected::EntryKey)?;
        self.skip_whitespace();

        let mut fields = Vec::new();
        if !self.eat(close) {
            if !self.eat(',') {
                return Err(self.error(Expected::EitherChar(',', close)));
            }
            loop {
                self.skip_whitespace();
                if self.eat(close) {
                    break;
                }
                fields.push(self.field()?);
                self.skip_whitespace();
                if self.eat(',') {
                    continue;
                }
                if self.eat(close) {
                    break;
                }
                return Err(self.error(Expected::EitherChar(',', close)));
            }
        }

        Ok(Entry {
            class: class.to_string(),
            key: key.to_string(),
            fields,
            offset,
        })
    }

    fn field(&mut self) -> Result<Field> {
        let name = self.token(Expected::FieldName)?;
        self.skip_whitespace();
        self.expect('=')?;
        self.skip_whitespace();

        let mut value = String::from(self.value_piece()?);
        loop {
            let before = self.pos;
            self.skip_whitespace();
            if !self.eat('#') {
                self.pos = before;
                break;
            }
            self.skip_whitespace();
            value.push_str(self.value_piece()?);
        }

        Ok(Field {
            name: name.to_string(),
            value: RawValue(value),
        })
    }

    /// Ordered choice over the three value forms.
    fn value_piece(&mut self) -> Result<&'a str> {
        let start = self.pos;
        let braced = match self.attempt(Self::braced) {
            Ok(text) => return Ok(text),
            Err(err) => err,
        };
        let quoted = match self.attempt(Self::quoted) {
            Ok(text) => return Ok(text),
            Err(err) => err,
        };
        let bare = match self.attempt(Self::bare) {
            Ok(text) => return Ok(text),
            Err(err) => err,
        };
        let err = braced.furthest(quoted).furthest(bare);
        if err.offset == start {
            Err(ParseError::new(start, Expected::FieldValue))
        } else {
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn single_entry(text: &str) -> Entry {
        let doc = parse(text).unwrap();
        let mut entries = doc.into_entries();
        assert_eq!(entries.len(), 1);
        entries.remove(0)
    }

    #[test]
    fn test_parse_simple_entry() {
        let entry = single_entry(
            "@article{smith2020,\n  author = {John Smith},\n  title = {A Title},\n  year = 2020\n}",
        );
        assert_eq!(entry.class, "article");
        assert_eq!(entry.key, "smith2020");
        assert_eq!(entry.offset, 0);
        let names: Vec<_> = entry.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["author", "title", "year"]);
        assert_eq!(entry.get("year").unwrap().as_str(), "2020");
    }

    #[test]
    fn test_nested_braces_preserved() {
        let entry = single_entry("@misc{k, title = {The {RNA} {W{or}ld}}}");
        assert_eq!(entry.get("title").unwrap().as_str(), "The {RNA} {W{or}ld}");
    }

    #[test]
    fn test_quoted_value_keeps_braces() {
        let entry = single_entry(r#"@misc{k, title = "Caf{\'e} {"}quoted{"}"}"#);
        assert_eq!(
            entry.get("title").unwrap().as_str(),
            r#"Caf{\'e} {"}quoted{"}"#
        );
    }

    #[test]
    fn test_concatenated_value() {
        let entry = single_entry(r#"@misc{k, month = jan # "~1st", note = {a} # {b}}"#);
        assert_eq!(entry.get("month").unwrap().as_str(), "jan~1st");
        assert_eq!(entry.get("note").unwrap().as_str(), "ab");
    }

    #[test]
    fn test_trailing_comma_and_empty_fields() {
        let entry = single_entry("@misc{k, title = {x},\n}");
        assert_eq!(entry.fields.len(), 1);

        let entry = single_entry("@misc{k}");
        assert!(entry.fields.is_empty());

        let entry = single_entry("@misc{k,}");
        assert!(entry.fields.is_empty());
    }

    #[test]
    fn test_parenthesised_entry() {
        let entry = single_entry("@book(key, title = {X (revised)})");
        assert_eq!(entry.class, "book");
        assert_eq!(entry.key, "key");
        assert_eq!(entry.get("title").unwrap().as_str(), "X (revised)");
    }

    #[test]
    fn test_comment_string_and_preamble() {
        let text = "Free text is skipped.\n\
                    @Comment this line is a comment\n\
                    @string{ acm = \"ACM Press\" }\n\
                    @PREAMBLE(\"\\newcommand{\\noop}[1]{}\")\n\
                    @misc{k, title = {x}}\n";
        let doc = parse(text).unwrap();
        assert_eq!(doc.items.len(), 4);
        assert_eq!(
            doc.items[0],
            Item::Comment(" this line is a comment".to_string())
        );
        match &doc.items[1] {
            Item::StringMacro(m) => {
                assert_eq!(m.definition(), Some(("acm", "\"ACM Press\"")));
            }
            other => panic!("expected string macro, got {:?}", other),
        }
        assert_eq!(
            doc.items[2],
            Item::Preamble("\"\\newcommand{\\noop}[1]{}\"".to_string())
        );
        assert_eq!(doc.entries().count(), 1);
    }

    #[test]
    fn test_keyword_prefix_falls_back_to_entry() {
        let entry = single_entry("@stringent{k, a = b}");
        assert_eq!(entry.class, "stringent");
    }

    #[test]
    fn test_entry_offset() {
        let doc = parse("xx\n@misc{a}\n@misc{b}").unwrap();
        let offsets: Vec<_> = doc.entries().map(|e| e.offset).collect();
        assert_eq!(offsets, vec![3, 12]);
    }

    #[test]
    fn test_unbalanced_brace_fails_at_end() {
        let text = "@article{k, title = {unterminated}";
        let err = parse(text).unwrap_err();
        assert_eq!(err.offset, text.len());
        assert_eq!(err.expected, Expected::EitherChar(',', '}'));

        let text = "@article{k, title = {unterminated";
        let err = parse(text).unwrap_err();
        assert_eq!(err.offset, text.len());
        assert_eq!(err.expected, Expected::Char('}'));
    }

    #[test]
    fn test_missing_comma_after_key() {
        let err = parse("@article{key title={x}}").unwrap_err();
        assert_eq!(err.offset, 13);
        assert_eq!(err.expected, Expected::EitherChar(',', '}'));
    }

    #[test]
    fn test_missing_value() {
        let err = parse("@article{key, title = , year = 1}").unwrap_err();
        assert_eq!(err.offset, 22);
        assert_eq!(err.expected, Expected::FieldValue);
    }

    #[test]
    fn test_stray_at_sign_fails() {
        let err = parse("user@example.com").unwrap_err();
        assert_eq!(err.offset, 16);
        assert_eq!(err.expected, Expected::EitherChar('{', '('));
    }

    #[test]
    fn test_nesting_limit() {
        let text = "@misc{k, title={{{x}}}}";
        assert!(parse(text).is_ok());

        let err = parse_with_max_depth(text, 2).unwrap_err();
        assert_eq!(err.offset, 17);
        assert_eq!(err.expected, Expected::MaxDepth(2));
    }
}
