/*
 * month.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Month field normalization.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

const ALL: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

impl Month {
    /// Month from its 1-based number.
    pub fn from_number(number: u32) -> Option<Month> {
        let index = usize::try_from(number).ok()?.checked_sub(1)?;
        ALL.get(index).copied()
    }

    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    /// Canonical lowercase three-letter code.
    pub fn code(self) -> &'static str {
        match self {
            Month::January => "jan",
            Month::February => "feb",
            Month::March => "mar",
            Month::April => "apr",
            Month::May => "may",
            Month::June => "jun",
            Month::July => "jul",
            Month::August => "aug",
            Month::September => "sep",
            Month::October => "oct",
            Month::November => "nov",
            Month::December => "dec",
        }
    }

    /// English month name.
    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// Recognize a month token: a number from 1 to 12 written with one or
    /// two digits, or a full or three-letter English name in any case.
    pub fn from_token(token: &str) -> Option<Month> {
        let token = token.trim();
        if !token.is_empty() && token.len() <= 2 && token.bytes().all(|b| b.is_ascii_digit()) {
            return token.parse().ok().and_then(Month::from_number);
        }
        let lower = token.to_lowercase();
        ALL.into_iter()
            .find(|month| lower == month.code() || lower == month.name().to_lowercase())
    }

    /// Month for a canonical code as produced by [`normalize_month`].
    pub fn from_code(code: &str) -> Option<Month> {
        ALL.into_iter().find(|month| month.code() == code)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Normalize a raw month value to its canonical code.
///
/// Unrecognized values come back trimmed but otherwise untouched.
pub fn normalize_month(raw: &str) -> String {
    match Month::from_token(raw) {
        Some(month) => month.code().to_string(),
        None => {
            tracing::debug!(month = %raw, "Unrecognized month, keeping it as written");
            raw.trim().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equivalent_forms() {
        for raw in ["3", "03", "March", "march", "MAR", "Mar", " mar "] {
            assert_eq!(normalize_month(raw), "mar", "for {:?}", raw);
        }
        assert_eq!(normalize_month("12"), "dec");
        assert_eq!(normalize_month("september"), "sep");
    }

    #[test]
    fn test_passthrough() {
        assert_eq!(normalize_month("13"), "13");
        assert_eq!(normalize_month("0"), "0");
        assert_eq!(normalize_month("003"), "003");
        assert_eq!(normalize_month(" Spring "), "Spring");
        assert_eq!(normalize_month("Marc"), "Marc");
        assert_eq!(normalize_month(""), "");
    }

    #[test]
    fn test_from_number() {
        assert_eq!(Month::from_number(1), Some(Month::January));
        assert_eq!(Month::from_number(0), None);
        assert_eq!(Month::from_number(13), None);
        assert_eq!(Month::October.number(), 10);
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Month::from_code("feb"), Some(Month::February));
        assert_eq!(Month::from_code("February"), None);
    }
}
