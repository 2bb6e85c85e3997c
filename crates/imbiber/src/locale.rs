/*
 * locale.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Locale tables for the words a rendered citation needs.
//!
//! Tables are YAML files embedded from `locales/`. Each one holds a
//! `connectives` map and a `months` map keyed by canonical month code.

use crate::error::{Error, Result};
use imbiber_bibtex::Month;
use rust_embed::Embed;
use serde::Deserialize;
use std::collections::HashMap;

/// Embedded locale files from the locales/ directory.
#[derive(Embed)]
#[folder = "locales/"]
#[include = "*.yaml"]
struct LocaleFiles;

const DEFAULT_LOCALE: &str = "en";

/// Fixed words placed between rendered fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connective {
    /// Joins the last two names of a list.
    And,
    /// Introduces the containing work.
    In,
    /// Marks an editor list.
    Eds,
    /// Prefix for a page range.
    Pages,
    Chapter,
    PhdThesis,
    MastersThesis,
    TechReport,
}

impl Connective {
    /// Key of this connective in a locale file.
    pub fn key(self) -> &'static str {
        match self {
            Connective::And => "and",
            Connective::In => "in",
            Connective::Eds => "eds",
            Connective::Pages => "pages",
            Connective::Chapter => "chapter",
            Connective::PhdThesis => "phd-thesis",
            Connective::MastersThesis => "masters-thesis",
            Connective::TechReport => "tech-report",
        }
    }

    fn english(self) -> &'static str {
        match self {
            Connective::And => "and",
            Connective::In => "In",
            Connective::Eds => "eds.",
            Connective::Pages => "pp.",
            Connective::Chapter => "chapter",
            Connective::PhdThesis => "PhD thesis",
            Connective::MastersThesis => "Master's thesis",
            Connective::TechReport => "Technical report",
        }
    }
}

/// Source of localized words for rendering.
pub trait Localize {
    /// The word for a connective.
    fn connective(&self, connective: Connective) -> &str;

    /// The display name for a canonical month code, if it is one.
    fn localized_month(&self, code: &str) -> Option<&str>;
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct LocaleTable {
    connectives: HashMap<String, String>,
    months: HashMap<String, String>,
}

impl LocaleTable {
    /// Fill keys missing here from `other`.
    fn merge_missing(&mut self, other: &LocaleTable) {
        for (key, value) in &other.connectives {
            self.connectives
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
        for (key, value) in &other.months {
            self.months.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }
}

/// A loaded locale.
#[derive(Debug, Clone)]
pub struct Locale {
    code: String,
    table: LocaleTable,
}

impl Default for Locale {
    fn default() -> Self {
        Self::english()
    }
}

impl Locale {
    /// English from built-in words only, without reading any table.
    pub fn english() -> Self {
        Self {
            code: DEFAULT_LOCALE.to_string(),
            table: LocaleTable::default(),
        }
    }

    /// Load an embedded locale.
    ///
    /// A regional code falls back to its base language (`es-MX` uses
    /// `es`), and an unknown language falls back to English. Keys missing
    /// from a table are taken from the English one.
    pub fn load(code: &str) -> Result<Self> {
        let requested = code.trim().replace('_', "-").to_lowercase();

        let mut resolved = None;
        for candidate in [requested.as_str(), base_language(&requested)] {
            if let Some(table) = load_embedded(candidate)? {
                resolved = Some((candidate.to_string(), table));
                break;
            }
        }

        let (code, mut table) = match resolved {
            Some(found) => found,
            None => {
                tracing::warn!(locale = %code, "Unknown locale, falling back to English");
                let table = load_embedded(DEFAULT_LOCALE)?.unwrap_or_default();
                (DEFAULT_LOCALE.to_string(), table)
            }
        };

        if code != DEFAULT_LOCALE {
            if let Some(english) = load_embedded(DEFAULT_LOCALE)? {
                table.merge_missing(&english);
            }
        }

        tracing::debug!(locale = %code, "Loaded locale");
        Ok(Self { code, table })
    }

    /// Build a locale from YAML text in the embedded table format.
    pub fn from_yaml(code: &str, text: &str) -> Result<Self> {
        Ok(Self {
            code: code.to_string(),
            table: parse_table(code, text)?,
        })
    }

    /// The language code the locale resolved to.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Codes of every embedded locale, sorted.
    pub fn available() -> Vec<String> {
        let mut codes: Vec<String> = LocaleFiles::iter()
            .filter_map(|file| file.strip_suffix(".yaml").map(str::to_string))
            .collect();
        codes.sort();
        codes
    }
}

impl Localize for Locale {
    fn connective(&self, connective: Connective) -> &str {
        self.table
            .connectives
            .get(connective.key())
            .map(String::as_str)
            .unwrap_or_else(|| connective.english())
    }

    fn localized_month(&self, code: &str) -> Option<&str> {
        match self.table.months.get(code) {
            Some(name) => Some(name.as_str()),
            None => Month::from_code(code).map(Month::name),
        }
    }
}

fn base_language(code: &str) -> &str {
    code.split('-').next().unwrap_or(code)
}

fn parse_table(code: &str, text: &str) -> Result<LocaleTable> {
    serde_yaml::from_str(text).map_err(|e| Error::Locale {
        locale: code.to_string(),
        message: e.to_string(),
    })
}

fn load_embedded(code: &str) -> Result<Option<LocaleTable>> {
    let Some(file) = LocaleFiles::get(&format!("{}.yaml", code)) else {
        return Ok(None);
    };
    let text = String::from_utf8_lossy(&file.data);
    parse_table(code, &text).map(Some)
}
