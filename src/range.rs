use std::{collections::HashMap, ops::RangeInclusive};

use chrono::NaiveDate;

use crate::{
    BoundSpec, DateBound, FieldId, Instant, MonthIndex, Role, SelectorConfig, SelectorError,
    days_in_month, prelude::*,
};

/// Resolves another selector's current value by identifier.
pub trait PeerRegistry {
    /// Current value of the peer, `None` if the peer holds no value.
    ///
    /// # Errors
    /// Returns `SelectorError::ReferenceNotFound` if no peer has that identifier.
    fn resolve(&self, id: &FieldId) -> Result<Option<Instant>, SelectorError>;
}

impl PeerRegistry for HashMap<FieldId, Instant> {
    fn resolve(&self, id: &FieldId) -> Result<Option<Instant>, SelectorError> {
        self.get(id)
            .copied()
            .map(Some)
            .ok_or_else(|| SelectorError::ReferenceNotFound(id.clone()))
    }
}

/// Outcome of clamping a date into a [`DateRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clamp {
    Within,
    ToMin,
    ToMax,
}

/// A fully resolved, non-empty range `[min, max]` with `min < max`.
///
/// Day-level checks compare calendar dates, so a bound carrying a time of day
/// still admits its own date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    min: Instant,
    max: Instant,
}

impl DateRange {
    /// Creates a new range with validation.
    ///
    /// # Errors
    /// Returns `SelectorError::InvalidRangeConfig` if `min >= max`.
    pub fn new(min: Instant, max: Instant) -> Result<Self, SelectorError> {
        if min >= max {
            return Err(SelectorError::InvalidRangeConfig {
                min: min.to_string(),
                max: max.to_string(),
            });
        }
        Ok(Self { min, max })
    }

    pub const fn min(&self) -> Instant {
        self.min
    }

    pub const fn max(&self) -> Instant {
        self.max
    }

    pub fn min_date(&self) -> NaiveDate {
        self.min.date()
    }

    pub fn max_date(&self) -> NaiveDate {
        self.max.date()
    }

    /// Checks if the calendar date lies within the range's dates
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.min_date() <= date && date <= self.max_date()
    }

    /// Substitutes the nearest bound's date for a date outside the range.
    pub fn clamp_date(&self, date: NaiveDate) -> (NaiveDate, Clamp) {
        if date < self.min_date() {
            (self.min_date(), Clamp::ToMin)
        } else if date > self.max_date() {
            (self.max_date(), Clamp::ToMax)
        } else {
            (date, Clamp::Within)
        }
    }

    /// Years offered by the year selector.
    pub fn years(&self) -> RangeInclusive<i32> {
        self.min.year()..=self.max.year()
    }

    /// Whether `month` may be chosen while `year` is visible.
    pub fn month_enabled(&self, year: i32, month: MonthIndex) -> bool {
        let before_min = year == self.min.year() && month < MonthIndex::of(&self.min);
        let after_max = year == self.max.year() && month > MonthIndex::of(&self.max);
        !before_min && !after_max
    }

    /// Whether the month after `(year, month)` has at least one day in range.
    pub fn has_next_month(&self, year: i32, month: MonthIndex) -> bool {
        let (next, rolled) = month.succ();
        let year = if rolled { year + 1 } else { year };
        NaiveDate::from_ymd_opt(year, next.number(), 1).is_some_and(|first| first <= self.max_date())
    }

    /// Whether the month before `(year, month)` has at least one day in range.
    pub fn has_previous_month(&self, year: i32, month: MonthIndex) -> bool {
        let (previous, rolled) = month.pred();
        let year = if rolled { year - 1 } else { year };
        let last = u32::from(days_in_month(year, previous));
        NaiveDate::from_ymd_opt(year, previous.number(), last).is_some_and(|last| last >= self.min_date())
    }
}

/// Statically resolved bounds of one selector.
///
/// Absolute bounds are fixed at attach time; peer bounds are looked up on
/// every [`Bounds::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bounds {
    min: DateBound,
    max: DateBound,
}

impl Bounds {
    /// Resolves the config's specs against `now`.
    ///
    /// # Errors
    /// Returns `SelectorError::InvalidRangeConfig` if both bounds resolve to the
    /// same value, or if static bounds are inverted.
    pub fn from_config(config: &SelectorConfig, now: Instant) -> Result<Self, SelectorError> {
        Self::from_specs(&config.min_date, &config.max_date, now)
    }

    /// # Errors
    /// See [`Bounds::from_config`].
    pub fn from_specs(min: &BoundSpec, max: &BoundSpec, now: Instant) -> Result<Self, SelectorError> {
        let min = min.resolve(Role::Min, now);
        let max = max.resolve(Role::Max, now);

        let invalid = match (&min, &max) {
            (DateBound::Absolute(lo), DateBound::Absolute(hi)) => lo >= hi,
            (DateBound::Peer(lo), DateBound::Peer(hi)) => lo == hi,
            _ => false,
        };
        if invalid {
            return Err(SelectorError::InvalidRangeConfig {
                min: describe(&min),
                max: describe(&max),
            });
        }

        Ok(Self { min, max })
    }

    pub const fn min(&self) -> &DateBound {
        &self.min
    }

    pub const fn max(&self) -> &DateBound {
        &self.max
    }

    /// The range when neither bound refers to a peer.
    ///
    /// `None` only for peer bounds: [`Bounds::from_specs`] already rejected
    /// absolute bounds with min not before max.
    pub fn static_range(&self) -> Option<DateRange> {
        let min = self.min.as_absolute()?;
        let max = self.max.as_absolute()?;
        DateRange::new(min, max).ok()
    }

    /// Looks up peer bounds and produces the concrete range.
    /// An empty peer falls back to the role's default bound.
    ///
    /// # Errors
    /// Returns `SelectorError::ReferenceNotFound` for an unknown peer and
    /// `SelectorError::InvalidRangeConfig` if the resolved min is not before max.
    pub fn resolve(&self, peers: &impl PeerRegistry) -> Result<DateRange, SelectorError> {
        let min = resolve_bound(&self.min, Role::Min, peers)?;
        let max = resolve_bound(&self.max, Role::Max, peers)?;
        DateRange::new(min, max)
    }
}

fn resolve_bound(bound: &DateBound, role: Role, peers: &impl PeerRegistry) -> Result<Instant, SelectorError> {
    match bound {
        DateBound::Absolute(instant) => Ok(*instant),
        DateBound::Peer(id) => {
            let value = peers.resolve(id)?;
            if value.is_none() {
                tracing::debug!(peer = %id, %role, "peer holds no value; using fallback bound");
            }
            Ok(value.unwrap_or_else(|| role.fallback()))
        },
    }
}

fn describe(bound: &DateBound) -> String {
    match bound {
        DateBound::Absolute(instant) => instant.to_string(),
        DateBound::Peer(id) => format!("{}{id}", crate::PEER_PREFIX),
    }
}
