/*
 * render.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! HTML citation rendering.
//!
//! A citation is assembled from up to four parts, each followed by `". "`
//! and left out entirely when empty:
//!
//! ```text
//! <strong>title</strong>. authors. venue, segments, date, pages. note.
//! ```
//!
//! The venue segments depend on the entry class. Only `<strong>` and
//! `<em>` tags are produced; all field text is HTML-escaped.

use crate::entry::NormalizedEntry;
use crate::locale::{Connective, Locale, Localize};
use imbiber_bibtex::NameFormat;

/// Join items with commas and a final connective.
///
/// ```rust
/// use imbiber::list_to_string;
///
/// let names = ["A", "B", "C"].map(String::from);
/// assert_eq!(list_to_string(&names[..2], "and"), "A and B");
/// assert_eq!(list_to_string(&names, "and"), "A, B and C");
/// ```
pub fn list_to_string<S: AsRef<str>>(items: &[S], and: &str) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [init @ .., last] => {
            let init: Vec<&str> = init.iter().map(AsRef::as_ref).collect();
            format!("{} {} {}", init.join(", "), and, last.as_ref())
        }
    }
}

/// Escape text for inclusion in HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

/// Entry classes with a citation template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Template {
    Article,
    Book,
    InBook,
    InCollection,
    InProceedings,
    Proceedings,
    Thesis(Connective),
    TechReport,
    Manual,
    Misc,
}

impl Template {
    fn for_class(class: &str) -> Option<Template> {
        let template = match class {
            "article" => Template::Article,
            "book" => Template::Book,
            "inbook" => Template::InBook,
            "incollection" => Template::InCollection,
            "inproceedings" | "conference" => Template::InProceedings,
            "proceedings" => Template::Proceedings,
            "phdthesis" => Template::Thesis(Connective::PhdThesis),
            "mastersthesis" => Template::Thesis(Connective::MastersThesis),
            "techreport" => Template::TechReport,
            "manual" => Template::Manual,
            "misc" | "unpublished" => Template::Misc,
            _ => return None,
        };
        Some(template)
    }
}

/// Renders normalized entries as HTML citations.
#[derive(Debug, Clone)]
pub struct CitationRenderer<L: Localize = Locale> {
    locale: L,
    name_format: NameFormat,
}

impl Default for CitationRenderer<Locale> {
    fn default() -> Self {
        Self::new(Locale::english(), NameFormat::default())
    }
}

impl<L: Localize> CitationRenderer<L> {
    pub fn new(locale: L, name_format: NameFormat) -> Self {
        Self {
            locale,
            name_format,
        }
    }

    pub fn locale(&self) -> &L {
        &self.locale
    }

    /// Render one entry.
    ///
    /// Classes without a template render as an empty string.
    pub fn render(&self, entry: &NormalizedEntry) -> String {
        let Some(template) = Template::for_class(&entry.class) else {
            tracing::debug!(key = %entry.key, class = %entry.class, "No citation template for entry class");
            return String::new();
        };

        let title = entry.text("title").map(escape_html);
        let authors = match template {
            Template::Book | Template::InBook => {
                self.names(entry, "author").or_else(|| self.editors(entry))
            }
            Template::Proceedings => self.editors(entry),
            _ => self.names(entry, "author"),
        };
        let venue = self.venue(template, entry);
        let note = entry.text("note").map(escape_html);

        let mut out = String::new();
        if let Some(title) = title {
            out.push_str(&format!("<strong>{}</strong>. ", title));
        }
        if let Some(authors) = authors {
            out.push_str(&format!("{}. ", authors));
        }
        if !venue.is_empty() {
            out.push_str(&format!("{}. ", venue.join(", ")));
        }
        if let Some(note) = note {
            out.push_str(&format!("{}. ", note));
        }
        out
    }

    fn venue(&self, template: Template, entry: &NormalizedEntry) -> Vec<String> {
        let field = |name: &str| entry.text(name).map(escape_html);
        let segments = match template {
            Template::Article => vec![
                self.journal(entry),
                self.date(entry),
                self.pages(entry),
            ],
            Template::Book => vec![
                self.series(entry),
                field("publisher"),
                field("address"),
                self.date(entry),
            ],
            Template::InBook => vec![
                self.chapter(entry),
                self.series(entry),
                field("publisher"),
                field("address"),
                self.date(entry),
                self.pages(entry),
            ],
            Template::InCollection => vec![
                self.container(entry),
                self.series(entry),
                self.chapter(entry),
                field("publisher"),
                field("address"),
                self.date(entry),
                self.pages(entry),
            ],
            Template::InProceedings => vec![
                self.container(entry),
                self.series(entry),
                field("organization"),
                field("publisher"),
                field("address"),
                self.date(entry),
                self.pages(entry),
            ],
            Template::Proceedings => vec![
                self.series(entry),
                field("organization"),
                field("publisher"),
                field("address"),
                self.date(entry),
            ],
            Template::Thesis(kind) => vec![
                Some(self.locale.connective(kind).to_string()),
                field("school"),
                field("address"),
                self.date(entry),
            ],
            Template::TechReport => vec![
                Some(join_words([
                    Some(self.locale.connective(Connective::TechReport).to_string()),
                    field("number"),
                ])),
                field("institution"),
                field("address"),
                self.date(entry),
            ],
            Template::Manual => vec![
                field("organization"),
                field("address"),
                field("edition"),
                self.date(entry),
            ],
            Template::Misc => vec![field("howpublished"), self.date(entry)],
        };
        segments.into_iter().flatten().collect()
    }

    fn names(&self, entry: &NormalizedEntry, field: &str) -> Option<String> {
        let names: Vec<String> = entry
            .names(field)?
            .iter()
            .map(|name| escape_html(&name.format(self.name_format)))
            .collect();
        Some(list_to_string(&names, self.locale.connective(Connective::And)))
    }

    /// `editors (eds.)`
    fn editors(&self, entry: &NormalizedEntry) -> Option<String> {
        let editors = self.names(entry, "editor")?;
        Some(format!(
            "{} ({})",
            editors,
            self.locale.connective(Connective::Eds)
        ))
    }

    /// `<em>journal</em> volume(number)`
    fn journal(&self, entry: &NormalizedEntry) -> Option<String> {
        let journal = entry
            .text("journal")
            .map(|journal| format!("<em>{}</em>", escape_html(journal)));
        let issue = match (entry.text("volume"), entry.text("number")) {
            (Some(volume), Some(number)) => Some(format!(
                "{}({})",
                escape_html(volume),
                escape_html(number)
            )),
            (Some(volume), None) => Some(escape_html(volume)),
            (None, Some(number)) => Some(format!("({})", escape_html(number))),
            (None, None) => None,
        };
        non_empty(join_words([journal, issue]))
    }

    /// `In editors (eds.), <em>booktitle</em>`
    fn container(&self, entry: &NormalizedEntry) -> Option<String> {
        let parts: Vec<String> = [
            self.editors(entry),
            entry
                .text("booktitle")
                .map(|title| format!("<em>{}</em>", escape_html(title))),
        ]
        .into_iter()
        .flatten()
        .collect();
        if parts.is_empty() {
            return None;
        }
        Some(format!(
            "{} {}",
            self.locale.connective(Connective::In),
            parts.join(", ")
        ))
    }

    /// `series volume`
    fn series(&self, entry: &NormalizedEntry) -> Option<String> {
        non_empty(join_words([
            entry.text("series").map(escape_html),
            entry.text("volume").map(escape_html),
        ]))
    }

    /// `chapter N`
    fn chapter(&self, entry: &NormalizedEntry) -> Option<String> {
        let chapter = entry.text("chapter")?;
        Some(format!(
            "{} {}",
            self.locale.connective(Connective::Chapter),
            escape_html(chapter)
        ))
    }

    /// `pp. X`
    fn pages(&self, entry: &NormalizedEntry) -> Option<String> {
        let pages = entry.text("pages")?;
        Some(format!(
            "{} {}",
            self.locale.connective(Connective::Pages),
            escape_html(pages)
        ))
    }

    /// `Month Year`, either part alone, or nothing.
    fn date(&self, entry: &NormalizedEntry) -> Option<String> {
        let month = entry.month().map(|code| {
            self.locale
                .localized_month(code)
                .map(str::to_string)
                .unwrap_or_else(|| escape_html(code))
        });
        non_empty(join_words([month, entry.text("year").map(escape_html)]))
    }
}

fn join_words<const N: usize>(words: [Option<String>; N]) -> String {
    words.into_iter().flatten().collect::<Vec<_>>().join(" ")
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}
