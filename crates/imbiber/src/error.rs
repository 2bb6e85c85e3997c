/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for bibliography storage and rendering.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for imbiber operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or rendering a bibliography.
#[derive(Debug, Error)]
pub enum Error {
    /// A source file could not be read.
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source did not match the document grammar.
    #[error("{}{source}", path.as_ref().map(|p| format!("{}: ", p.display())).unwrap_or_default())]
    Parse {
        path: Option<PathBuf>,
        #[source]
        source: imbiber_bibtex::ParseError,
    },

    /// No entry is stored under the requested key.
    #[error("Entry '{key}' not found")]
    EntryNotFound { key: String },

    /// A locale table could not be parsed.
    #[error("Failed to parse locale '{locale}': {message}")]
    Locale { locale: String, message: String },
}

impl Error {
    /// The underlying parse failure, if this is one.
    pub fn as_parse_error(&self) -> Option<&imbiber_bibtex::ParseError> {
        match self {
            Error::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imbiber_bibtex::{Expected, ParseError};

    #[test]
    fn test_entry_not_found_display() {
        let err = Error::EntryNotFound {
            key: "smith2020".to_string(),
        };
        assert_eq!(err.to_string(), "Entry 'smith2020' not found");
    }

    #[test]
    fn test_parse_display_with_and_without_path() {
        let source = ParseError::new(3, Expected::EntryKey);
        let err = Error::Parse {
            path: Some(PathBuf::from("refs.bib")),
            source: source.clone(),
        };
        assert_eq!(
            err.to_string(),
            "refs.bib: Parse error at byte 3: expected citation key"
        );
        assert_eq!(err.as_parse_error(), Some(&source));

        let err = Error::Parse { path: None, source };
        assert_eq!(err.to_string(), "Parse error at byte 3: expected citation key");
    }

    #[test]
    fn test_io_display() {
        let err = Error::Io {
            path: PathBuf::from("missing.bib"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(err.to_string(), "Failed to read 'missing.bib': no such file");
    }
}
