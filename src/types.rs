use crate::consts::{
    CENTURY_CYCLE, DAYS_IN_MONTH, FEBRUARY_DAYS_LEAP, FEBRUARY_INDEX, GREGORIAN_CYCLE,
    LEAP_YEAR_CYCLE, MAX_HOUR, MAX_MINUTE, MAX_MONTH_INDEX, MAX_WEEKDAY,
};
use crate::prelude::*;
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error raised when a calendar component is out of its valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("Invalid month index: {0} (must be 0-{MAX_MONTH_INDEX})")]
    InvalidMonth(u8),
    #[error("Invalid hour: {0} (must be 0-{MAX_HOUR})")]
    InvalidHour(u8),
    #[error("Invalid minute: {0} (must be 0-{MAX_MINUTE})")]
    InvalidMinute(u8),
    #[error("Invalid weekday index: {0} (must be 0-{MAX_WEEKDAY})")]
    InvalidWeekday(u8),
}

/// A zero-based month index guaranteed to be in the range `0..=MAX_MONTH_INDEX` (0..=11),
/// January being 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MonthIndex(u8);

impl MonthIndex {
    pub const JANUARY: Self = Self(0);
    pub const DECEMBER: Self = Self(MAX_MONTH_INDEX);

    /// Creates a new month index, validating that it's <= `MAX_MONTH_INDEX`
    ///
    /// # Errors
    /// Returns `ValueError::InvalidMonth` if the value is > `MAX_MONTH_INDEX`.
    pub const fn new(value: u8) -> Result<Self, ValueError> {
        if value > MAX_MONTH_INDEX {
            return Err(ValueError::InvalidMonth(value));
        }
        Ok(Self(value))
    }

    /// Month index of a chrono date.
    pub fn of(date: &impl Datelike) -> Self {
        // month0() is always 0..=11
        Self(u8::try_from(date.month0()).unwrap_or(MAX_MONTH_INDEX))
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// One-based month number as used by chrono constructors.
    #[inline]
    pub const fn number(self) -> u32 {
        self.0 as u32 + 1
    }

    /// Following month, wrapping December to January.
    /// The flag is true when the year rolls over.
    pub const fn succ(self) -> (Self, bool) {
        if self.0 == MAX_MONTH_INDEX {
            (Self::JANUARY, true)
        } else {
            (Self(self.0 + 1), false)
        }
    }

    /// Preceding month, wrapping January to December.
    /// The flag is true when the year rolls back.
    pub const fn pred(self) -> (Self, bool) {
        if self.0 == 0 {
            (Self::DECEMBER, true)
        } else {
            (Self(self.0 - 1), false)
        }
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (0..=MAX_MONTH_INDEX).map(Self)
    }
}

impl TryFrom<u8> for MonthIndex {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MonthIndex> for u8 {
    fn from(month: MonthIndex) -> Self {
        month.0
    }
}

impl fmt::Display for MonthIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hour of day in `0..=MAX_HOUR`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Hour(u8);

impl Hour {
    /// # Errors
    /// Returns `ValueError::InvalidHour` if the value is > `MAX_HOUR`.
    pub const fn new(value: u8) -> Result<Self, ValueError> {
        if value > MAX_HOUR {
            return Err(ValueError::InvalidHour(value));
        }
        Ok(Self(value))
    }

    pub fn of(time: &impl Timelike) -> Self {
        Self(u8::try_from(time.hour()).unwrap_or(MAX_HOUR))
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Hour {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Hour> for u8 {
    fn from(hour: Hour) -> Self {
        hour.0
    }
}

/// Minute of hour in `0..=MAX_MINUTE`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Minute(u8);

impl Minute {
    /// # Errors
    /// Returns `ValueError::InvalidMinute` if the value is > `MAX_MINUTE`.
    pub const fn new(value: u8) -> Result<Self, ValueError> {
        if value > MAX_MINUTE {
            return Err(ValueError::InvalidMinute(value));
        }
        Ok(Self(value))
    }

    pub fn of(time: &impl Timelike) -> Self {
        Self(u8::try_from(time.minute()).unwrap_or(MAX_MINUTE))
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Minute {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Minute> for u8 {
    fn from(minute: Minute) -> Self {
        minute.0
    }
}

// Helper functions

/// Converts a Sunday-based weekday index (0 = Sunday .. 6 = Saturday).
///
/// # Errors
/// Returns `ValueError::InvalidWeekday` if the index is > `MAX_WEEKDAY`.
pub const fn weekday_from_index(index: u8) -> Result<Weekday, ValueError> {
    Ok(match index {
        0 => Weekday::Sun,
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        6 => Weekday::Sat,
        _ => return Err(ValueError::InvalidWeekday(index)),
    })
}

pub const fn is_leap_year(year: i32) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

pub const fn days_in_month(year: i32, month: MonthIndex) -> u8 {
    if month.get() == FEBRUARY_INDEX && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month.get() as usize]
    }
}
