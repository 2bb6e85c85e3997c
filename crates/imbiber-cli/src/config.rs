/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Rendering settings from a YAML config file and the command line.
//!
//! ```yaml
//! locale: es
//! name-format: family-given
//! title-case: sentence
//! ```

use anyhow::{Context, Result};
use imbiber::NormalizeOptions;
use imbiber_bibtex::{CasePolicy, NameFormat};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_LOCALE: &str = "en";

/// Settings that may be left unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    pub locale: Option<String>,
    pub name_format: Option<NameFormat>,
    pub title_case: Option<CasePolicy>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Keep values set here, filling the rest from `fallback`.
    pub fn or(self, fallback: Config) -> Config {
        Config {
            locale: self.locale.or(fallback.locale),
            name_format: self.name_format.or(fallback.name_format),
            title_case: self.title_case.or(fallback.title_case),
        }
    }

    /// Resolve unset values to their defaults.
    pub fn resolve(self) -> Settings {
        Settings {
            locale: self.locale.unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            name_format: self.name_format.unwrap_or_default(),
            normalize: NormalizeOptions {
                title_case: self
                    .title_case
                    .unwrap_or(NormalizeOptions::default().title_case),
            },
        }
    }
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub locale: String,
    pub name_format: NameFormat,
    pub normalize: NormalizeOptions,
}
