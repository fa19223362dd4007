use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::{Instant, PERSISTED_DATE_FORMAT, PERSISTED_DATE_TIME_FORMAT, SelectorError};

/// Checks that `pattern` only holds strftime specifiers chrono knows.
///
/// # Errors
/// Returns `SelectorError::InvalidFormatPattern` on an unknown specifier.
pub fn validate_pattern(pattern: &str) -> Result<(), SelectorError> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(SelectorError::InvalidFormatPattern(pattern.to_owned()));
    }
    Ok(())
}

/// Renders `instant` with `pattern`, `None` where chrono fails, e.g. an
/// unknown specifier or an offset field on a naive instant.
pub(crate) fn try_format(instant: Instant, pattern: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", instant.format(pattern)).ok()?;
    Some(out)
}

/// Turns instants into display and persisted text, and back.
pub trait Formatter {
    /// Human-facing text shown in the bound input.
    fn display(&self, instant: Instant, is_date_time: bool) -> String;

    /// Canonical text submitted with the form.
    fn persisted(&self, instant: Instant, is_date_time: bool) -> String {
        let pattern = if is_date_time {
            PERSISTED_DATE_TIME_FORMAT
        } else {
            PERSISTED_DATE_FORMAT
        };
        instant.format(pattern).to_string()
    }

    /// Parses a persisted value, date-time or date-only.
    /// Returns `None` for anything malformed.
    fn parse_persisted(&self, raw: &str) -> Option<Instant> {
        let raw = raw.trim();
        NaiveDateTime::parse_from_str(raw, PERSISTED_DATE_TIME_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(raw, PERSISTED_DATE_FORMAT)
                    .ok()
                    .map(|date| date.and_time(NaiveTime::MIN))
            })
    }
}

/// ISO-style formatter with configurable display patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsoFormatter {
    pub date_pattern:      String,
    pub date_time_pattern: String,
}

impl Default for IsoFormatter {
    fn default() -> Self {
        Self {
            date_pattern:      PERSISTED_DATE_FORMAT.to_owned(),
            date_time_pattern: "%Y-%m-%d %H:%M".to_owned(),
        }
    }
}

impl IsoFormatter {
    /// # Errors
    /// Returns `SelectorError::InvalidFormatPattern` if either pattern has an
    /// unknown specifier.
    pub fn new(date_pattern: impl Into<String>, date_time_pattern: impl Into<String>) -> Result<Self, SelectorError> {
        let formatter = Self {
            date_pattern:      date_pattern.into(),
            date_time_pattern: date_time_pattern.into(),
        };
        validate_pattern(&formatter.date_pattern)?;
        validate_pattern(&formatter.date_time_pattern)?;
        Ok(formatter)
    }
}

impl Formatter for IsoFormatter {
    /// Falls back to the persisted form if the pattern cannot be rendered.
    fn display(&self, instant: Instant, is_date_time: bool) -> String {
        let pattern = if is_date_time {
            &self.date_time_pattern
        } else {
            &self.date_pattern
        };
        try_format(instant, pattern).unwrap_or_else(|| self.persisted(instant, is_date_time))
    }
}
