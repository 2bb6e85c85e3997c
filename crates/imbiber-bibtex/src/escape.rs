/*
 * escape.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Diacritic escapes and dash ligatures.
//!
//! Recognized sequences:
//!
//! | Sequence | Result |
//! |---|---|
//! | `\'a` `\'e` `\'i` `\'o` `\'u` | á é í ó ú |
//! | `\"a` `\"e` `\"i` `\"o` `\"u` | ä ë ï ö ü |
//! | `\^a` `\^e` `\^i` `\^o` `\^u` | â ê î ô û |
//! | `--` / `---` | en dash / em dash |
//! | `\&` | & |
//!
//! Uppercase vowels map to the uppercase accented letter, and the braced
//! form `\'{e}` is accepted as well. The dotless `\i` may carry an accent
//! (`\'{\i}`, `\'\i`). An accent with no letter is dropped. An unknown
//! `\` + letter degrades to the bare letter; anything else is passed
//! through unchanged. These cases log a warning and never fail.

use std::borrow::Cow;

const MODIFIERS: [char; 3] = ['\'', '"', '^'];

/// Length in chars of the escape sequence starting at `chars[0]`, which
/// must be a backslash.
pub(crate) fn scan(chars: &[char]) -> usize {
    debug_assert_eq!(chars.first(), Some(&'\\'));
    match chars.get(1) {
        None => 1,
        Some(modifier) if MODIFIERS.contains(modifier) => match chars.get(2) {
            Some(c) if c.is_alphabetic() => 3,
            Some('\\') if is_dotless_i(&chars[3..]) => 4,
            Some('{') => match (chars.get(3), chars.get(4)) {
                (Some(c), Some('}')) if c.is_alphabetic() => 5,
                (Some('\\'), Some('i')) if chars.get(5) == Some(&'}') => 6,
                _ => 2,
            },
            _ => 2,
        },
        Some(_) => 2,
    }
}

/// `\i` not followed by further letters of a longer command name.
fn is_dotless_i(rest: &[char]) -> bool {
    rest.first() == Some(&'i') && !rest.get(1).is_some_and(|c| c.is_alphabetic())
}

fn accented(modifier: char, letter: char) -> Option<char> {
    let lower = match (modifier, letter.to_ascii_lowercase()) {
        ('\'', 'a') => 'á',
        ('\'', 'e') => 'é',
        ('\'', 'i') => 'í',
        ('\'', 'o') => 'ó',
        ('\'', 'u') => 'ú',
        ('"', 'a') => 'ä',
        ('"', 'e') => 'ë',
        ('"', 'i') => 'ï',
        ('"', 'o') => 'ö',
        ('"', 'u') => 'ü',
        ('^', 'a') => 'â',
        ('^', 'e') => 'ê',
        ('^', 'i') => 'î',
        ('^', 'o') => 'ô',
        ('^', 'u') => 'û',
        _ => return None,
    };
    if letter.is_ascii_uppercase() {
        lower.to_uppercase().next()
    } else {
        Some(lower)
    }
}

/// Resolve one escape sequence as produced by the lexer.
pub fn resolve(sequence: &str) -> Cow<'_, str> {
    match sequence {
        "---" => return Cow::Borrowed("\u{2014}"),
        "--" => return Cow::Borrowed("\u{2013}"),
        "\\&" => return Cow::Borrowed("&"),
        _ => {}
    }

    let chars: Vec<char> = sequence.chars().filter(|c| !matches!(c, '{' | '}')).collect();
    match chars.as_slice() {
        ['\\', modifier, letter] | ['\\', modifier, '\\', letter @ 'i']
            if MODIFIERS.contains(modifier) =>
        {
            if let Some(c) = accented(*modifier, *letter) {
                return Cow::Owned(c.to_string());
            }
        }
        ['\\', modifier] if MODIFIERS.contains(modifier) => {
            tracing::warn!(sequence = %sequence, "Accent without a letter, dropped");
            return Cow::Borrowed("");
        }
        ['\\', letter] if letter.is_alphabetic() => {
            tracing::warn!(sequence = %sequence, "Unsupported escape, using the bare letter");
            return Cow::Owned(letter.to_string());
        }
        _ => {}
    }

    tracing::warn!(sequence = %sequence, "Unsupported escape, kept as written");
    Cow::Borrowed(sequence)
}
