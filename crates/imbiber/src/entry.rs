/*
 * entry.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Normalized entries.
//!
//! Every raw field value is routed by field name to one normalizer:
//!
//! | Field | Value |
//! |---|---|
//! | `author`, `editor` | [`TypedValue::AuthorList`] |
//! | `title` | [`TypedValue::Text`] under [`NormalizeOptions::title_case`] |
//! | `month` | [`TypedValue::MonthCode`] |
//! | anything else | [`TypedValue::Text`], case unchanged |

use hashlink::LinkedHashMap;
use imbiber_bibtex::{
    CasePolicy, Entry, PersonName, collapse_whitespace, normalize_month, parse_name,
    split_names, transform,
};
use serde::{Deserialize, Serialize};

/// Options that control field normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct NormalizeOptions {
    /// Case policy for `title` fields.
    pub title_case: CasePolicy,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            title_case: CasePolicy::Title,
        }
    }
}

/// A normalized field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    AuthorList(Vec<PersonName>),
    Text(String),
    MonthCode(String),
}

impl TypedValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TypedValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_names(&self) -> Option<&[PersonName]> {
        match self {
            TypedValue::AuthorList(names) => Some(names),
            _ => None,
        }
    }

    pub fn as_month(&self) -> Option<&str> {
        match self {
            TypedValue::MonthCode(code) => Some(code),
            _ => None,
        }
    }
}

/// An entry with every field normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedEntry {
    pub key: String,
    /// Entry class, lowercased.
    pub class: String,
    /// Fields by lowercased name, in source order.
    pub fields: LinkedHashMap<String, TypedValue>,
}

impl NormalizedEntry {
    /// Normalize a raw entry. The first occurrence of a field name wins.
    pub fn from_raw(entry: &Entry, options: &NormalizeOptions) -> Self {
        let mut fields = LinkedHashMap::new();
        for field in &entry.fields {
            let name = field.name.to_lowercase();
            if fields.contains_key(&name) {
                tracing::trace!(key = %entry.key, field = %name, "Ignoring repeated field");
                continue;
            }
            let value = normalize_field(&name, field.value.as_str(), options);
            fields.insert(name, value);
        }

        Self {
            key: entry.key.clone(),
            class: entry.class.to_lowercase(),
            fields,
        }
    }

    pub fn get(&self, field: &str) -> Option<&TypedValue> {
        self.fields.get(field)
    }

    /// A text field, if present and non-empty.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field)
            .and_then(TypedValue::as_text)
            .filter(|text| !text.is_empty())
    }

    /// A name-list field, if present and non-empty.
    pub fn names(&self, field: &str) -> Option<&[PersonName]> {
        self.get(field)
            .and_then(TypedValue::as_names)
            .filter(|names| !names.is_empty())
    }

    pub fn month(&self) -> Option<&str> {
        self.get("month")
            .and_then(TypedValue::as_month)
            .filter(|code| !code.is_empty())
    }
}

fn normalize_field(name: &str, raw: &str, options: &NormalizeOptions) -> TypedValue {
    match name {
        "author" | "editor" => TypedValue::AuthorList(
            split_names(&collapse_whitespace(raw))
                .iter()
                .map(|name| parse_name(name))
                .filter(|name| !name.is_empty())
                .collect(),
        ),
        "title" => TypedValue::Text(transform(raw, options.title_case)),
        "month" => TypedValue::MonthCode(normalize_month(raw)),
        _ => TypedValue::Text(transform(raw, CasePolicy::Unchanged)),
    }
}
