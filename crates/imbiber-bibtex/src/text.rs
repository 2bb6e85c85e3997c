/*
 * text.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Free-text field normalization.
//!
//! A raw field value is lexed into a small tree of [`TextNode`]s, then run
//! through independent passes:
//!
//! 1. [`resolve_escapes`] turns escape sequences into letters,
//! 2. [`apply_case`] applies a [`CasePolicy`] outside protected groups,
//! 3. [`flatten`] produces a single string with collapsed whitespace.
//!
//! Brace groups become [`TextNode::Protected`] nodes. Their content keeps
//! the capitalization the author wrote, whatever the case policy.
//!
//! Output of [`transform`] under [`CasePolicy::Unchanged`] is a fixed point:
//! hyphens that meet across a group boundary form a dash when flattened, so
//! a second pass finds nothing left to resolve.

use crate::escape;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Groups nested deeper than this are merged into their parent.
const MAX_GROUP_DEPTH: usize = 64;

/// A lexical unit of field text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextNode {
    /// A run of ordinary characters.
    Word(String),
    /// One or more whitespace characters.
    Space,
    /// A literal comma.
    Comma,
    /// An escape sequence or dash ligature, not yet resolved.
    Escape(String),
    /// The resolved form of an escape.
    Letter(String),
    /// A brace group whose case must survive untouched.
    Protected(Vec<TextNode>),
}

/// Capitalization applied to a text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CasePolicy {
    /// Reproduce the text as written.
    #[default]
    Unchanged,
    /// Lowercase everything, then capitalize the first letter.
    Sentence,
    /// Capitalize the first letter of every word.
    Title,
}

impl fmt::Display for CasePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CasePolicy::Unchanged => "unchanged",
            CasePolicy::Sentence => "sentence",
            CasePolicy::Title => "title",
        };
        f.write_str(name)
    }
}

impl FromStr for CasePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unchanged" => Ok(CasePolicy::Unchanged),
            "sentence" => Ok(CasePolicy::Sentence),
            "title" => Ok(CasePolicy::Title),
            other => Err(format!(
                "unknown case policy '{}' (expected unchanged, sentence or title)",
                other
            )),
        }
    }
}

/// Lex raw field text.
///
/// Lexing never fails. An unclosed group is closed at the end of the
/// input and a stray `}` is dropped, both with a warning.
pub fn lex(raw: &str) -> Vec<TextNode> {
    let chars: Vec<char> = raw.chars().collect();
    let mut stack: Vec<Vec<TextNode>> = vec![Vec::new()];
    let mut word = String::new();
    // Opening braces beyond MAX_GROUP_DEPTH, matched by the next closing ones.
    let mut flattened_opens = 0usize;
    let mut i = 0;

    fn flush(word: &mut String, stack: &mut [Vec<TextNode>]) {
        if !word.is_empty() {
            if let Some(top) = stack.last_mut() {
                top.push(TextNode::Word(std::mem::take(word)));
            }
        }
    }

    while i < chars.len() {
        let c = chars[i];
        match c {
            '{' => {
                flush(&mut word, &mut stack);
                if stack.len() > MAX_GROUP_DEPTH {
                    flattened_opens += 1;
                } else {
                    stack.push(Vec::new());
                }
                i += 1;
            }
            '}' => {
                flush(&mut word, &mut stack);
                if flattened_opens > 0 {
                    flattened_opens -= 1;
                } else if stack.len() > 1 {
                    let group = stack.pop().unwrap_or_default();
                    if let Some(top) = stack.last_mut() {
                        top.push(TextNode::Protected(group));
                    }
                } else {
                    tracing::warn!(text = %raw, "Dropping unmatched closing brace");
                }
                i += 1;
            }
            ',' => {
                flush(&mut word, &mut stack);
                if let Some(top) = stack.last_mut() {
                    top.push(TextNode::Comma);
                }
                i += 1;
            }
            '\\' => {
                flush(&mut word, &mut stack);
                let len = escape::scan(&chars[i..]);
                let sequence: String = chars[i..i + len].iter().collect();
                if let Some(top) = stack.last_mut() {
                    top.push(TextNode::Escape(sequence));
                }
                i += len;
            }
            '-' if chars.get(i + 1) == Some(&'-') => {
                flush(&mut word, &mut stack);
                let len = if chars.get(i + 2) == Some(&'-') { 3 } else { 2 };
                if let Some(top) = stack.last_mut() {
                    top.push(TextNode::Escape("-".repeat(len)));
                }
                i += len;
            }
            c if c.is_whitespace() => {
                flush(&mut word, &mut stack);
                while i < chars.len() && chars[i].is_whitespace() {
                    i += 1;
                }
                if let Some(top) = stack.last_mut() {
                    if top.last() != Some(&TextNode::Space) {
                        top.push(TextNode::Space);
                    }
                }
            }
            c => {
                word.push(c);
                i += 1;
            }
        }
    }
    flush(&mut word, &mut stack);

    if stack.len() > 1 {
        tracing::warn!(text = %raw, "Closing unterminated brace group at end of text");
    }
    while stack.len() > 1 {
        let group = stack.pop().unwrap_or_default();
        if let Some(top) = stack.last_mut() {
            top.push(TextNode::Protected(group));
        }
    }
    stack.pop().unwrap_or_default()
}

/// Replace every [`TextNode::Escape`] with its resolved [`TextNode::Letter`].
pub fn resolve_escapes(nodes: Vec<TextNode>) -> Vec<TextNode> {
    nodes
        .into_iter()
        .map(|node| match node {
            TextNode::Escape(sequence) => TextNode::Letter(escape::resolve(&sequence).into_owned()),
            TextNode::Protected(children) => TextNode::Protected(resolve_escapes(children)),
            other => other,
        })
        .collect()
}

/// Apply a case policy to every node outside protected groups.
pub fn apply_case(nodes: Vec<TextNode>, policy: CasePolicy) -> Vec<TextNode> {
    match policy {
        CasePolicy::Unchanged => nodes,
        CasePolicy::Sentence => sentence_case(nodes),
        CasePolicy::Title => title_case(nodes),
    }
}

fn sentence_case(nodes: Vec<TextNode>) -> Vec<TextNode> {
    let mut capitalized = false;
    nodes
        .into_iter()
        .map(|node| match node {
            TextNode::Word(text) => TextNode::Word(sentence_piece(&text, &mut capitalized)),
            TextNode::Letter(text) if is_passthrough(&text) => {
                capitalized = true;
                TextNode::Letter(text)
            }
            TextNode::Letter(text) => TextNode::Letter(sentence_piece(&text, &mut capitalized)),
            TextNode::Protected(children) => {
                if !capitalized && flatten(&children).chars().any(char::is_alphabetic) {
                    capitalized = true;
                }
                TextNode::Protected(children)
            }
            other => other,
        })
        .collect()
}

fn sentence_piece(text: &str, capitalized: &mut bool) -> String {
    let lower = text.to_lowercase();
    if *capitalized {
        return lower;
    }
    let (text, found) = capitalize_first_alphabetic(&lower);
    *capitalized = found;
    text
}

fn title_case(nodes: Vec<TextNode>) -> Vec<TextNode> {
    let mut at_word_start = true;
    nodes
        .into_iter()
        .map(|node| match node {
            node @ (TextNode::Space | TextNode::Comma) => {
                at_word_start = true;
                node
            }
            TextNode::Word(text) => {
                if !at_word_start {
                    return TextNode::Word(text);
                }
                let (text, found) = capitalize_first_alphabetic(&text);
                at_word_start = !found;
                TextNode::Word(text)
            }
            TextNode::Letter(text) if is_passthrough(&text) => {
                at_word_start = false;
                TextNode::Letter(text)
            }
            TextNode::Letter(text) => {
                if !at_word_start {
                    return TextNode::Letter(text);
                }
                let (text, found) = capitalize_first_alphabetic(&text);
                at_word_start = !found;
                TextNode::Letter(text)
            }
            TextNode::Protected(children) => {
                at_word_start = false;
                TextNode::Protected(children)
            }
            other => other,
        })
        .collect()
}

/// An escape that resolved to itself stays exactly as written.
fn is_passthrough(letter: &str) -> bool {
    letter.starts_with('\\')
}

/// Uppercase the first alphabetic character; report whether one was found.
fn capitalize_first_alphabetic(text: &str) -> (String, bool) {
    match text.char_indices().find(|(_, c)| c.is_alphabetic()) {
        Some((index, c)) => {
            let mut out = String::with_capacity(text.len());
            out.push_str(&text[..index]);
            out.extend(c.to_uppercase());
            out.push_str(&text[index + c.len_utf8()..]);
            (out, true)
        }
        None => (text.to_string(), false),
    }
}

/// Render nodes to a single string with whitespace collapsed and trimmed.
pub fn flatten(nodes: &[TextNode]) -> String {
    fn write(nodes: &[TextNode], out: &mut String) {
        for node in nodes {
            match node {
                TextNode::Word(text) | TextNode::Escape(text) | TextNode::Letter(text) => {
                    out.push_str(text)
                }
                TextNode::Space => out.push(' '),
                TextNode::Comma => out.push(','),
                TextNode::Protected(children) => write(children, out),
            }
        }
    }

    let mut out = String::new();
    write(nodes, &mut out);
    collapse_whitespace(&join_dashes(&out))
}

/// Turn hyphen runs into dashes, three to an em dash and two to an en dash.
fn join_dashes(text: &str) -> String {
    if !text.contains("--") {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '-' {
            out.push(c);
            continue;
        }
        let mut run = 1;
        while chars.next_if_eq(&'-').is_some() {
            run += 1;
        }
        for _ in 0..run / 3 {
            out.push('\u{2014}');
        }
        match run % 3 {
            2 => out.push('\u{2013}'),
            1 => out.push('-'),
            _ => {}
        }
    }
    out
}

/// Collapse every whitespace run to one space and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize raw field text under a case policy.
///
/// ```rust
/// use imbiber_bibtex::{transform, CasePolicy};
///
/// assert_eq!(transform("the {RNA}   world", CasePolicy::Title), "The RNA World");
/// assert_eq!(transform("Caf\\'e", CasePolicy::Unchanged), "Café");
/// ```
pub fn transform(raw: &str, policy: CasePolicy) -> String {
    let nodes = resolve_escapes(lex(raw));
    flatten(&apply_case(nodes, policy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lex_structure() {
        let nodes = lex("A {B c}, d--e");
        assert_eq!(
            nodes,
            vec![
                TextNode::Word("A".into()),
                TextNode::Space,
                TextNode::Protected(vec![
                    TextNode::Word("B".into()),
                    TextNode::Space,
                    TextNode::Word("c".into()),
                ]),
                TextNode::Comma,
                TextNode::Space,
                TextNode::Word("d".into()),
                TextNode::Escape("--".into()),
                TextNode::Word("e".into()),
            ]
        );
    }

    #[test]
    fn test_lex_is_lenient_about_braces() {
        assert_eq!(
            lex("a}b"),
            vec![TextNode::Word("a".into()), TextNode::Word("b".into())]
        );
        assert_eq!(
            lex("{a"),
            vec![TextNode::Protected(vec![TextNode::Word("a".into())])]
        );
    }

    #[test]
    fn test_deep_nesting_is_merged() {
        let raw = format!("{}x{}", "{".repeat(200), "}".repeat(200));
        assert_eq!(transform(&raw, CasePolicy::Unchanged), "x");
    }

    #[test]
    fn test_unchanged_collapses_whitespace() {
        assert_eq!(
            transform("  A study\n   of {Things}\t", CasePolicy::Unchanged),
            "A study of Things"
        );
    }

    #[test]
    fn test_sentence_case() {
        assert_eq!(
            transform("The Theory of {DNA} Repair", CasePolicy::Sentence),
            "The theory of DNA repair"
        );
        assert_eq!(
            transform("\\'ETUDE of Things", CasePolicy::Sentence),
            "Étude of things"
        );
        assert_eq!(
            transform("{iPhone} Sales", CasePolicy::Sentence),
            "iPhone sales"
        );
    }

    #[test]
    fn test_title_case() {
        assert_eq!(
            transform("the theory of {mRNA} in (living) cells", CasePolicy::Title),
            "The Theory Of mRNA In (Living) Cells"
        );
        assert_eq!(
            transform("\\'etude sur l'eau", CasePolicy::Title),
            "Étude Sur L'eau"
        );
        assert_eq!(
            transform("a {GPU}-based 3d renderer", CasePolicy::Title),
            "A GPU-based 3D Renderer"
        );
    }

    #[test]
    fn test_title_case_keeps_unknown_escapes() {
        assert_eq!(
            transform("\\%x and \\'q", CasePolicy::Title),
            "\\%x And \\'q"
        );
        assert_eq!(transform("foo,bar baz", CasePolicy::Title), "Foo,Bar Baz");
        assert_eq!(
            transform("\\'Q Against", CasePolicy::Sentence),
            "\\'Q against"
        );
    }

    #[test]
    fn test_dotless_i_with_accent() {
        assert_eq!(
            transform("Mart\\'{\\i}nez and Mart\\'\\i{}nez", CasePolicy::Unchanged),
            "Martínez and Martínez"
        );
    }

    #[test]
    fn test_dashes_across_groups() {
        assert_eq!(transform("-{}-", CasePolicy::Unchanged), "\u{2013}");
        assert_eq!(transform("a{-}-b", CasePolicy::Unchanged), "a\u{2013}b");
        assert_eq!(transform("{-}{-}{-}", CasePolicy::Unchanged), "\u{2014}");
        assert_eq!(transform("a-b", CasePolicy::Unchanged), "a-b");
    }

    #[test]
    fn test_escapes_in_text() {
        assert_eq!(
            transform("pages 10--20 and \\&c", CasePolicy::Unchanged),
            "pages 10–20 and &c"
        );
        assert_eq!(transform("\\q", CasePolicy::Unchanged), "q");
    }

    #[test]
    fn test_unchanged_is_idempotent() {
        for raw in [
            "The {RNA} world",
            "Caf\\'e --- au lait",
            "multi\n\nline   text",
            "keep \\'q and \\% as written",
            "-{}-",
            "a{-}-b",
            "\\'{ab}",
            "\\'{}e",
            "\\\"{\\i} and \\'\\index",
            "{\\}a and \\{x}",
            "trailing \\",
        ] {
            let once = transform(raw, CasePolicy::Unchanged);
            let twice = transform(&once, CasePolicy::Unchanged);
            assert_eq!(once, twice, "not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn test_case_policy_from_str() {
        assert_eq!("Title".parse::<CasePolicy>(), Ok(CasePolicy::Title));
        assert!("shouting".parse::<CasePolicy>().is_err());
    }
}
