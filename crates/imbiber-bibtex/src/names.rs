/*
 * names.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Author and editor lists.
//!
//! A name-list field is split into individual names with [`split_names`];
//! each one is then parsed into a [`PersonName`] with [`parse_name`].

use crate::text::{TextNode, flatten, lex, resolve_escapes};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SEPARATOR: &str = " and ";

/// Split a name list on ` and ` outside brace groups.
///
/// Pieces are trimmed and empty pieces are dropped.
///
/// ```rust
/// use imbiber_bibtex::split_names;
///
/// assert_eq!(
///     split_names("Ann Lee and {Barnes and Noble}"),
///     vec!["Ann Lee", "{Barnes and Noble}"]
/// );
/// ```
pub fn split_names(raw: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;
    let bytes = raw.as_bytes();

    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b' ' if depth == 0 && raw[i..].starts_with(SEPARATOR) => {
                names.push(&raw[start..i]);
                i += SEPARATOR.len();
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    names.push(&raw[start..]);

    names
        .into_iter()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

/// Order in which the parts of a [`PersonName`] are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameFormat {
    /// `John Smith`
    #[default]
    GivenFamily,
    /// `Smith, John`
    FamilyGiven,
}

impl fmt::Display for NameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameFormat::GivenFamily => f.write_str("given-family"),
            NameFormat::FamilyGiven => f.write_str("family-given"),
        }
    }
}

impl FromStr for NameFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "given-family" => Ok(NameFormat::GivenFamily),
            "family-given" => Ok(NameFormat::FamilyGiven),
            other => Err(format!(
                "unknown name format '{}' (expected given-family or family-given)",
                other
            )),
        }
    }
}

/// A parsed personal name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    pub given: String,
    pub family: String,
}

impl PersonName {
    pub fn new(given: impl Into<String>, family: impl Into<String>) -> Self {
        Self {
            given: given.into(),
            family: family.into(),
        }
    }

    /// True when neither part carries any text.
    pub fn is_empty(&self) -> bool {
        self.given.is_empty() && self.family.is_empty()
    }

    pub fn format(&self, format: NameFormat) -> String {
        if self.given.is_empty() {
            return self.family.clone();
        }
        if self.family.is_empty() {
            return self.given.clone();
        }
        match format {
            NameFormat::GivenFamily => format!("{} {}", self.given, self.family),
            NameFormat::FamilyGiven => format!("{}, {}", self.family, self.given),
        }
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(NameFormat::GivenFamily))
    }
}

/// Parse one name.
///
/// Without a comma the last word is the family name. With one comma the
/// family name comes first. Further commas are kept in the given name, so
/// `Last, Jr, First` yields family `Last` and given `Jr, First`.
///
/// A given-name word that is a single unprotected capital is written as an
/// initial (`J` becomes `J.`).
pub fn parse_name(raw: &str) -> PersonName {
    let nodes = resolve_escapes(lex(raw));

    // parts separated by top-level commas
    let mut parts: Vec<Vec<NameWord>> = vec![Vec::new()];
    let mut word: Vec<TextNode> = Vec::new();

    fn finish_word(word: &mut Vec<TextNode>, parts: &mut [Vec<NameWord>]) {
        if word.is_empty() {
            return;
        }
        let finished = NameWord::new(word);
        word.clear();
        if !finished.text.is_empty() {
            if let Some(part) = parts.last_mut() {
                part.push(finished);
            }
        }
    }

    for node in nodes {
        match node {
            TextNode::Space => finish_word(&mut word, &mut parts),
            TextNode::Comma => {
                finish_word(&mut word, &mut parts);
                parts.push(Vec::new());
            }
            other => word.push(other),
        }
    }
    finish_word(&mut word, &mut parts);

    if parts.len() == 1 {
        let mut words = parts.remove(0);
        let family = words.pop().map(|word| word.text).unwrap_or_default();
        return PersonName::new(given_name(&words), family);
    }

    let family = parts[0]
        .iter()
        .map(|word| word.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let given = parts[1..]
        .iter()
        .filter(|part| !part.is_empty())
        .map(|part| given_name(part))
        .collect::<Vec<_>>()
        .join(", ");
    PersonName::new(given, family)
}

struct NameWord {
    text: String,
    /// A lone unprotected capital letter.
    initial: bool,
}

impl NameWord {
    fn new(nodes: &[TextNode]) -> Self {
        let text = flatten(nodes);
        let initial = matches!(nodes, [TextNode::Word(_) | TextNode::Letter(_)]) && {
            let mut chars = text.chars();
            matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase())
        };
        Self { text, initial }
    }
}

fn given_name(words: &[NameWord]) -> String {
    words
        .iter()
        .map(|word| {
            if word.initial {
                format!("{}.", word.text)
            } else {
                word.text.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_names() {
        assert_eq!(
            split_names("John Smith and Jane Doe and Max Mustermann"),
            vec!["John Smith", "Jane Doe", "Max Mustermann"]
        );
        assert_eq!(split_names("  Solo Author  "), vec!["Solo Author"]);
        assert!(split_names("").is_empty());
    }

    #[test]
    fn test_split_names_respects_braces() {
        assert_eq!(
            split_names("{Procter and Gamble} and Ann Lee"),
            vec!["{Procter and Gamble}", "Ann Lee"]
        );
    }

    #[test]
    fn test_split_names_requires_surrounding_spaces() {
        assert_eq!(split_names("Alexander Sandberg"), vec!["Alexander Sandberg"]);
    }

    #[test]
    fn test_parse_without_comma() {
        assert_eq!(parse_name("John Smith"), PersonName::new("John", "Smith"));
        assert_eq!(
            parse_name("J. R. R. Tolkien"),
            PersonName::new("J. R. R.", "Tolkien")
        );
        assert_eq!(parse_name("Plato"), PersonName::new("", "Plato"));
    }

    #[test]
    fn test_parse_with_comma() {
        assert_eq!(parse_name("Smith, John"), PersonName::new("John", "Smith"));
        assert_eq!(
            parse_name("van der Berg, Anna Maria"),
            PersonName::new("Anna Maria", "van der Berg")
        );
    }

    #[test]
    fn test_parse_with_several_commas() {
        assert_eq!(
            parse_name("Last, Jr, First"),
            PersonName::new("Jr, First", "Last")
        );
    }

    #[test]
    fn test_initials_get_a_period() {
        assert_eq!(parse_name("J R Smith"), PersonName::new("J. R.", "Smith"));
        assert_eq!(parse_name("Smith, J"), PersonName::new("J.", "Smith"));
        // protected and lowercase single letters are left alone
        assert_eq!(parse_name("{J} x Smith"), PersonName::new("J x", "Smith"));
        // family names are never initials
        assert_eq!(parse_name("Malcolm X"), PersonName::new("Malcolm", "X"));
        assert_eq!(parse_name("B"), PersonName::new("", "B"));
    }

    #[test]
    fn test_escapes_and_protected_groups() {
        assert_eq!(
            parse_name("Kurt G\\\"odel"),
            PersonName::new("Kurt", "Gödel")
        );
        assert_eq!(
            parse_name("{World Health Organization}"),
            PersonName::new("", "World Health Organization")
        );
        assert_eq!(parse_name("\\'Eric Rohmer"), PersonName::new("Éric", "Rohmer"));
    }

    #[test]
    fn test_format() {
        let name = PersonName::new("John", "Smith");
        assert_eq!(name.format(NameFormat::GivenFamily), "John Smith");
        assert_eq!(name.format(NameFormat::FamilyGiven), "Smith, John");

        let mononym = PersonName::new("", "Plato");
        assert_eq!(mononym.format(NameFormat::FamilyGiven), "Plato");
    }

    #[test]
    fn test_name_format_from_str() {
        assert_eq!(
            "family-given".parse::<NameFormat>(),
            Ok(NameFormat::FamilyGiven)
        );
        assert!("surname-first".parse::<NameFormat>().is_err());
    }
}
