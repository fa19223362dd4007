use std::{fmt, str::FromStr};

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    DATE_SEPARATOR, DEFAULT_MAX_YEAR, DEFAULT_MIN_YEAR, FieldId, Instant, MAX_RELATIVE_YEAR_DIGITS,
    NOW_TOKEN, PEER_PREFIX, prelude::*,
};

/// Which end of a range a spec describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Role {
    #[display(fmt = "min")]
    Min,
    #[display(fmt = "max")]
    Max,
}

impl Role {
    /// Fallback bound used when a spec is unrecognised or a peer holds no value:
    /// 1970-01-01 for the lower bound, 2038-01-01 for the upper.
    pub fn fallback(self) -> Instant {
        let year = match self {
            Self::Min => DEFAULT_MIN_YEAR,
            Self::Max => DEFAULT_MAX_YEAR,
        };
        NaiveDate::from_ymd_opt(year, 1, 1)
            .unwrap_or(NaiveDate::MIN)
            .and_time(chrono::NaiveTime::MIN)
    }
}

/// Configuration string describing how to derive a date boundary.
///
/// Parsing never fails: anything unrecognised becomes [`BoundSpec::Default`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum BoundSpec {
    /// `YYYY-MM-DD`, at local midnight
    IsoDate(NaiveDate),
    /// `now`
    Now,
    /// 1-3 digit year count, backwards for the lower bound, forwards for the upper
    RelativeYears(u16),
    /// `peer-<id>`, the current value of another selector
    Peer(FieldId),
    /// 1970-01-01 for the lower bound, 2038-01-01 for the upper
    #[default]
    Default,
}

/// A boundary after static resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DateBound {
    Absolute(Instant),
    /// Resolved against the peer registry every time the picker opens.
    Peer(FieldId),
}

impl DateBound {
    pub const fn as_absolute(&self) -> Option<Instant> {
        match self {
            Self::Absolute(instant) => Some(*instant),
            Self::Peer(_) => None,
        }
    }
}

impl BoundSpec {
    /// Resolves this spec for `role` against the reference instant `now`.
    ///
    /// Peer references stay deferred.
    pub fn resolve(&self, role: Role, now: Instant) -> DateBound {
        match self {
            Self::IsoDate(date) => DateBound::Absolute(date.and_time(chrono::NaiveTime::MIN)),
            Self::Now => DateBound::Absolute(now),
            Self::RelativeYears(years) => DateBound::Absolute(shift_years(now, *years, role)),
            Self::Peer(id) => DateBound::Peer(id.clone()),
            Self::Default => DateBound::Absolute(role.fallback()),
        }
    }

    fn parse_iso_date(s: &str) -> Option<NaiveDate> {
        // exactly four, two and two digits
        let parts: Vec<&str> = s.split(DATE_SEPARATOR).collect();
        let shape_ok = parts.len() == 3
            && parts[0].len() == 4
            && parts[1].len() == 2
            && parts[2].len() == 2
            && parts.iter().all(|p| p.bytes().all(|b| b.is_ascii_digit()));
        if !shape_ok {
            return None;
        }
        NaiveDate::parse_from_str(s, crate::PERSISTED_DATE_FORMAT).ok()
    }

    fn parse_relative_years(s: &str) -> Option<u16> {
        if s.is_empty() || s.len() > MAX_RELATIVE_YEAR_DIGITS || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        s.parse().ok()
    }
}

/// Shifts the year of `now` by `years`, backwards for [`Role::Min`].
/// Feb 29 rolls forward to Mar 1 when the target year has no leap day.
fn shift_years(now: Instant, years: u16, role: Role) -> Instant {
    let months = Months::new(u32::from(years) * 12);
    let shifted_year = match role {
        Role::Min => now.year() - i32::from(years),
        Role::Max => now.year() + i32::from(years),
    };

    if let Some(shifted) = now.with_year(shifted_year) {
        return shifted;
    }

    // only Feb 29 into a non-leap year lands here
    let shifted = match role {
        Role::Min => now.checked_sub_months(months),
        Role::Max => now.checked_add_months(months),
    };
    shifted.map_or_else(|| role.fallback(), |date| date + chrono::Duration::days(1))
}

impl FromStr for BoundSpec {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if let Some(date) = Self::parse_iso_date(trimmed) {
            return Ok(Self::IsoDate(date));
        }
        if trimmed == NOW_TOKEN {
            return Ok(Self::Now);
        }
        if let Some(years) = Self::parse_relative_years(trimmed) {
            return Ok(Self::RelativeYears(years));
        }
        if let Some(id) = trimmed.strip_prefix(PEER_PREFIX).filter(|id| !id.is_empty()) {
            return Ok(Self::Peer(FieldId::from(id)));
        }

        Ok(Self::Default)
    }
}

impl From<&str> for BoundSpec {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(spec) => spec,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for BoundSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IsoDate(date) => write!(f, "{}", date.format(crate::PERSISTED_DATE_FORMAT)),
            Self::Now => f.write_str(NOW_TOKEN),
            Self::RelativeYears(years) => write!(f, "{years}"),
            Self::Peer(id) => write!(f, "{PEER_PREFIX}{id}"),
            Self::Default => Ok(()),
        }
    }
}

impl Serialize for BoundSpec {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for BoundSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, datetime, midnight};

    #[test]
    fn test_parse_cases() {
        struct TestCase {
            input:    &'static str,
            expected: BoundSpec,
        }

        let cases = [
            TestCase {
                input:    "2024-03-05",
                expected: BoundSpec::IsoDate(date(2024, 3, 5)),
            },
            TestCase {
                input:    " now ",
                expected: BoundSpec::Now,
            },
            TestCase {
                input:    "7",
                expected: BoundSpec::RelativeYears(7),
            },
            TestCase {
                input:    "100",
                expected: BoundSpec::RelativeYears(100),
            },
            TestCase {
                input:    "1000",
                expected: BoundSpec::Default,
            },
            TestCase {
                input:    "peer-startDate",
                expected: BoundSpec::Peer(FieldId::from("startDate")),
            },
            TestCase {
                input:    "peer-",
                expected: BoundSpec::Default,
            },
            TestCase {
                input:    "2024-3-5",
                expected: BoundSpec::Default,
            },
            TestCase {
                input:    "2024-02-30",
                expected: BoundSpec::Default,
            },
            TestCase {
                input:    "",
                expected: BoundSpec::Default,
            },
            TestCase {
                input:    "NOW",
                expected: BoundSpec::Default,
            },
        ];

        for case in &cases {
            assert_eq!(BoundSpec::from(case.input), case.expected, "input {:?}", case.input);
        }
    }

    #[test]
    fn test_display_round_trips() {
        for input in ["2024-03-05", "now", "42", "peer-other", ""] {
            assert_eq!(BoundSpec::from(input).to_string(), input);
        }
    }

    #[test]
    fn test_resolve_now_and_relative() {
        let now = datetime(2024, 6, 15, 10, 30);

        assert_eq!(BoundSpec::Now.resolve(Role::Min, now), DateBound::Absolute(now));
        assert_eq!(
            BoundSpec::RelativeYears(10).resolve(Role::Max, now),
            DateBound::Absolute(datetime(2034, 6, 15, 10, 30))
        );
        assert_eq!(
            BoundSpec::RelativeYears(100).resolve(Role::Min, now),
            DateBound::Absolute(datetime(1924, 6, 15, 10, 30))
        );
    }

    #[test]
    fn test_resolve_leap_day_rolls_forward() {
        let now = datetime(2024, 2, 29, 0, 0);
        assert_eq!(
            BoundSpec::RelativeYears(1).resolve(Role::Max, now),
            DateBound::Absolute(datetime(2025, 3, 1, 0, 0))
        );
        assert_eq!(
            BoundSpec::RelativeYears(4).resolve(Role::Min, now),
            DateBound::Absolute(datetime(2020, 2, 29, 0, 0))
        );
    }

    #[test]
    fn test_resolve_iso_and_fallbacks() {
        let now = datetime(2024, 6, 15, 10, 30);

        assert_eq!(
            BoundSpec::from("2001-09-09").resolve(Role::Max, now),
            DateBound::Absolute(midnight(2001, 9, 9))
        );
        assert_eq!(
            BoundSpec::Default.resolve(Role::Min, now),
            DateBound::Absolute(midnight(1970, 1, 1))
        );
        assert_eq!(
            BoundSpec::Default.resolve(Role::Max, now),
            DateBound::Absolute(midnight(2038, 1, 1))
        );
    }

    #[test]
    fn test_resolve_peer_is_deferred() {
        let bound = BoundSpec::from("peer-A").resolve(Role::Min, datetime(2024, 1, 1, 0, 0));
        assert_eq!(bound, DateBound::Peer(FieldId::from("A")));
        assert_eq!(bound.as_absolute(), None);
    }

    #[test]
    fn test_serde_as_string() {
        let spec = BoundSpec::RelativeYears(18);
        assert_eq!(serde_json::to_string(&spec).unwrap(), "\"18\"");

        let parsed: BoundSpec = serde_json::from_str("\"peer-x\"").unwrap();
        assert_eq!(parsed, BoundSpec::Peer(FieldId::from("x")));
    }
}
