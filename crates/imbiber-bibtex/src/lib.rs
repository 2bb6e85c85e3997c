/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Grammar and field normalization for BibTeX-style bibliography files.
//!
//! This crate turns raw bibliography text into structured pieces:
//!
//! - [`parse`] reads a whole document into a [`RawDocument`] of comments,
//!   string macros, preambles and entries, with field values kept verbatim
//! - [`split_names`] and [`parse_name`] turn author/editor lists into
//!   [`PersonName`]s
//! - [`transform`] resolves escapes and applies a [`CasePolicy`] to
//!   free text
//! - [`normalize_month`] maps month tokens to canonical codes
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        document                          │
//! │         raw text → RawDocument { items: [Item] }         │
//! └────────────────────────────┬─────────────────────────────┘
//!                              │ RawValue per field
//!                              ▼
//! ┌────────────────┬───────────┴────────────┬────────────────┐
//! │     names      │          text          │     month      │
//! │ split + parse  │ lex → escapes → case   │ token → code   │
//! │                │       → flatten        │                │
//! └────────────────┴────────────────────────┴────────────────┘
//! ```
//!
//! Storage and rendering of normalized entries live in the `imbiber` crate.
//!
//! # Example
//!
//! ```rust
//! use imbiber_bibtex::{parse, parse_name, split_names, transform, CasePolicy};
//!
//! let doc = parse("@article{knuth84, author = {Donald E. Knuth}, title = {literate programming}}")?;
//! let entry = doc.entries().next().unwrap();
//!
//! let title = transform(entry.get("title").unwrap().as_str(), CasePolicy::Title);
//! assert_eq!(title, "Literate Programming");
//!
//! let authors: Vec<_> = split_names(entry.get("author").unwrap().as_str())
//!     .iter()
//!     .map(|name| parse_name(name))
//!     .collect();
//! assert_eq!(authors[0].family, "Knuth");
//! assert_eq!(authors[0].given, "Donald E.");
//! # Ok::<(), imbiber_bibtex::ParseError>(())
//! ```

pub mod document;
pub mod error;
pub mod escape;
pub mod month;
pub mod names;
pub mod text;

// Re-export main types
pub use document::{
    Entry, Field, Item, MAX_NESTING_DEPTH, RawDocument, RawValue, StringMacro, parse,
    parse_with_max_depth,
};
pub use error::{Expected, ParseError, Result};
pub use month::{Month, normalize_month};
pub use names::{NameFormat, PersonName, parse_name, split_names};
pub use text::{CasePolicy, TextNode, collapse_whitespace, transform};
