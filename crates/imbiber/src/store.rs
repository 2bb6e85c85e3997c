/*
 * store.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The entry store.

use crate::entry::{NormalizeOptions, NormalizedEntry};
use crate::error::{Error, Result};
use crate::locale::Localize;
use crate::render::CitationRenderer;
use hashlink::LinkedHashMap;
use imbiber_bibtex::parse;
use serde::Serialize;
use std::path::Path;

/// Normalized entries keyed by citation key, in the order they were read.
///
/// Keys are unique: once a key is stored, later entries with the same key
/// are ignored, whether they come from the same source or a later one.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Bibliography {
    /// Entries by key (preserves insertion order).
    entries: LinkedHashMap<String, NormalizedEntry>,

    #[serde(skip)]
    options: NormalizeOptions,
}

impl Bibliography {
    pub fn new(options: NormalizeOptions) -> Self {
        Self {
            entries: LinkedHashMap::new(),
            options,
        }
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Read a source file into the store.
    ///
    /// Returns the number of entries added.
    pub fn read(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let added = self.read_str(&text).map_err(|err| match err {
            Error::Parse { source, .. } => Error::Parse {
                path: Some(path.to_path_buf()),
                source,
            },
            other => other,
        })?;
        tracing::info!(path = %path.display(), added, "Read bibliography");
        Ok(added)
    }

    /// Read source text into the store.
    ///
    /// The whole text is parsed before anything is stored, so a parse
    /// failure leaves the store as it was. Returns the number of entries
    /// added.
    pub fn read_str(&mut self, text: &str) -> Result<usize> {
        let document = parse(text).map_err(|source| Error::Parse { path: None, source })?;

        let mut added = 0;
        for entry in document.entries() {
            if self.entries.contains_key(&entry.key) {
                tracing::trace!(key = %entry.key, "Dropping entry with duplicate key");
                continue;
            }
            let normalized = NormalizedEntry::from_raw(entry, &self.options);
            self.entries.insert(entry.key.clone(), normalized);
            added += 1;
        }
        tracing::debug!(added, total = self.entries.len(), "Stored entries");
        Ok(added)
    }

    pub fn get(&self, key: &str) -> Option<&NormalizedEntry> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &NormalizedEntry> {
        self.entries.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the entry stored under `key`.
    pub fn render<L: Localize>(&self, key: &str, renderer: &CitationRenderer<L>) -> Result<String> {
        let entry = self.get(key).ok_or_else(|| Error::EntryNotFound {
            key: key.to_string(),
        })?;
        Ok(renderer.render(entry))
    }
}
