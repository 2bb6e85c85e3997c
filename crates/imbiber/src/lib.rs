/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Bibliography store and HTML citation rendering.
//!
//! This crate takes BibTeX-style sources parsed by `imbiber-bibtex` and:
//! - normalizes each entry's fields into a [`NormalizedEntry`]
//! - keeps entries in a [`Bibliography`], first occurrence of a key wins
//! - renders entries as HTML citations with a [`CitationRenderer`]
//!
//! # Example
//!
//! ```rust
//! use imbiber::{Bibliography, CitationRenderer, Locale, NormalizeOptions};
//! use imbiber_bibtex::NameFormat;
//!
//! let mut bib = Bibliography::new(NormalizeOptions::default());
//! bib.read_str("@misc{lee2020, author = {Lee, Ann}, title = {notes on things}, year = 2020}")?;
//!
//! let renderer = CitationRenderer::new(Locale::load("en")?, NameFormat::GivenFamily);
//! assert_eq!(
//!     bib.render("lee2020", &renderer)?,
//!     "<strong>Notes On Things</strong>. Ann Lee. 2020. "
//! );
//! # Ok::<(), imbiber::Error>(())
//! ```

pub mod entry;
pub mod error;
pub mod locale;
pub mod render;
pub mod store;

// Re-export main types
pub use entry::{NormalizeOptions, NormalizedEntry, TypedValue};
pub use error::{Error, Result};
pub use locale::{Connective, Locale, Localize};
pub use render::{CitationRenderer, escape_html, list_to_string};
pub use store::Bibliography;
