/*
 * diagnostics.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Source excerpts for parse errors.

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use imbiber_bibtex::ParseError;

/// Render a parse error as an annotated excerpt of `source`.
pub fn render_parse_error(path: &str, source: &str, error: &ParseError, color: bool) -> String {
    // ariadne spans count chars, not bytes
    let mut offset = error.offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    let start = source[..offset].chars().count();
    let end = if offset < source.len() { start + 1 } else { start };
    let (line, column) = error.line_col(source);

    let report = Report::build(ReportKind::Error, path.to_string(), start)
        .with_config(Config::default().with_color(color))
        .with_message(format!("Invalid bibliography at {}:{}", line, column))
        .with_label(
            Label::new((path.to_string(), start..end))
                .with_message(format!("expected {}", error.expected))
                .with_color(Color::Red),
        )
        .finish();

    let mut output = Vec::new();
    match report.write((path.to_string(), Source::from(source)), &mut output) {
        Ok(()) => String::from_utf8_lossy(&output).into_owned(),
        Err(_) => format!("{}: {}\n", path, error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imbiber_bibtex::parse;

    #[test]
    fn test_excerpt_names_file_and_expectation() {
        let source = "@misc{a, note = {ok}}\n@misc{b note = {x}}\n";
        let error = parse(source).unwrap_err();
        let text = render_parse_error("refs.bib", source, &error, false);

        assert!(text.contains("Invalid bibliography at 2:9"), "Got: {}", text);
        assert!(text.contains("refs.bib"), "Got: {}", text);
        assert!(text.contains("expected ',' or '}'"), "Got: {}", text);
        assert!(text.contains("@misc{b note = {x}}"), "Got: {}", text);
    }

    #[test]
    fn test_error_at_end_of_input() {
        let source = "@misc{a, note = {ünïcode";
        let error = parse(source).unwrap_err();
        let text = render_parse_error("tail.bib", source, &error, false);
        assert!(text.contains("expected '}'"), "Got: {}", text);
    }
}
