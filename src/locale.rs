use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::{MAX_HOUR, MonthIndex, SelectorError, ValueError, format::try_format, validate_pattern, weekday_from_index};

/// Locale data the picker needs for labels and grid layout.
pub trait LocaleProvider {
    /// First day of week, 0 = Sunday .. 6 = Saturday.
    fn first_day_of_week(&self) -> u8;
    /// Short month names, January first.
    fn month_names(&self) -> &[String; 12];
    /// Short day names, Sunday first.
    fn day_names(&self) -> &[String; 7];
    /// chrono strftime pattern for times of day, e.g. `%H:%M`.
    fn time_format_pattern(&self) -> &str;

    /// First day of week as a chrono weekday.
    ///
    /// # Errors
    /// Returns `ValueError::InvalidWeekday` if the provider reports an index > 6.
    fn first_weekday(&self) -> Result<Weekday, ValueError> {
        weekday_from_index(self.first_day_of_week())
    }

    /// Day names rotated so the configured first day of week leads.
    ///
    /// # Errors
    /// Returns `ValueError::InvalidWeekday` if the provider reports an index > 6.
    fn weekday_labels(&self) -> Result<Vec<String>, ValueError> {
        Ok(self.weekday_labels_from(self.first_weekday()?))
    }

    /// Day names rotated so `first` leads.
    fn weekday_labels_from(&self, first: Weekday) -> Vec<String> {
        let first = first.num_days_from_sunday() as usize;
        let names = self.day_names();
        (0..names.len()).map(|i| names[(first + i) % names.len()].clone()).collect()
    }

    fn month_label(&self, month: MonthIndex) -> &str {
        &self.month_names()[usize::from(month.get())]
    }

    /// One label per hour of day, rendered with the time pattern stripped of
    /// minutes and seconds. A pattern chrono cannot render falls back to `%H`.
    fn hour_labels(&self) -> Vec<String> {
        let pattern = hour_only_pattern(self.time_format_pattern());
        let day = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default();
        (0..=u32::from(MAX_HOUR))
            .map(|hour| {
                let instant = day.and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default());
                try_format(instant, &pattern)
                    .or_else(|| try_format(instant, HOUR_FALLBACK_PATTERN))
                    .unwrap_or_default()
            })
            .collect()
    }
}

const HOUR_FALLBACK_PATTERN: &str = "%H";

fn hour_only_pattern(pattern: &str) -> String {
    let stripped = pattern
        .replacen(":%M", "", 1)
        .replace("%M", "")
        .replace(":%S", "")
        .replace("%S", "");
    let trimmed = stripped.trim();
    if trimmed.is_empty() { HOUR_FALLBACK_PATTERN.to_owned() } else { trimmed.to_owned() }
}

/// Serde-configurable locale, English with Sunday first by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Locale {
    pub first_day_of_week: u8,
    pub month_names:       [String; 12],
    pub day_names:         [String; 7],
    pub time_format:       String,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            first_day_of_week: 0,
            month_names:       [
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
            ]
            .map(String::from),
            day_names:         ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"].map(String::from),
            time_format:       "%H:%M".to_owned(),
        }
    }
}

impl Locale {
    /// # Errors
    /// Returns `SelectorError::Config` for malformed TOML,
    /// `SelectorError::Value` for a first day of week outside 0-6 and
    /// `SelectorError::InvalidFormatPattern` for an unknown time specifier.
    pub fn from_toml_str(s: &str) -> Result<Self, SelectorError> {
        let locale: Self = toml::from_str(s)?;
        weekday_from_index(locale.first_day_of_week)?;
        validate_pattern(&locale.time_format)?;
        Ok(locale)
    }

    #[must_use]
    pub fn with_first_day_of_week(mut self, day: u8) -> Self {
        self.first_day_of_week = day;
        self
    }
}

impl LocaleProvider for Locale {
    fn first_day_of_week(&self) -> u8 {
        self.first_day_of_week
    }

    fn month_names(&self) -> &[String; 12] {
        &self.month_names
    }

    fn day_names(&self) -> &[String; 7] {
        &self.day_names
    }

    fn time_format_pattern(&self) -> &str {
        &self.time_format
    }
}
