//! State and range logic for form date pickers.
//!
//! A [`DatePicker`] manages any number of date (or date-time) fields, each
//! bounded by a min/max [`BoundSpec`]: a fixed date, `now`, a year offset, or
//! another field's current value. It keeps the calendar grid of the one
//! picker that may be open at a time and writes the chosen value back to the
//! field. Rendering is left to the caller through [`PickerView`].
//!
//! ```
//! use bounded_date::{DatePicker, FieldId, FixedClock, FormField, PickerEvent, SelectorConfig};
//! use chrono::NaiveDate;
//!
//! let now = NaiveDate::from_ymd_opt(2024, 6, 15)
//!     .and_then(|date| date.and_hms_opt(10, 0, 0))
//!     .unwrap_or_default();
//! let mut picker: DatePicker = DatePicker::new().with_clock(FixedClock(now));
//! let config = SelectorConfig::birthday();
//! picker.attach("birthday", config.clone(), FormField::new(&config))?;
//!
//! let id = FieldId::from("birthday");
//! picker.open(&id)?;
//! let cell = picker.grid().and_then(|grid| grid.active_cell()).unwrap_or_default();
//! picker.dispatch(PickerEvent::SelectCell(cell))?;
//!
//! assert_eq!(picker.get_value(&id)?, Some(now.date().and_hms_opt(0, 0, 0).unwrap_or_default()));
//! # Ok::<(), bounded_date::SelectorError>(())
//! ```

mod bound;
mod clock;
mod config;
mod consts;
mod field;
mod format;
mod grid;
mod locale;
mod picker;
mod prelude;
mod range;
mod types;
mod view;

pub use bound::{BoundSpec, DateBound, Role};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::SelectorConfig;
pub use consts::*;
pub use field::{FormField, HostField, SelectorValue};
pub use format::{Formatter, IsoFormatter, validate_pattern};
pub use grid::{GridCell, GridState, Navigation, PickerEvent, Transition};
pub use locale::{Locale, LocaleProvider};
pub use picker::{CloseCallback, DatePicker};
pub use range::{Bounds, Clamp, DateRange, PeerRegistry};
pub use types::{Hour, Minute, MonthIndex, ValueError, days_in_month, is_leap_year, weekday_from_index};
pub use view::{MonthOption, PickerView, TimeView};

use crate::prelude::*;
use serde::{Deserialize, Serialize};

/// A point in local wall-clock time. Date-only values sit at midnight.
pub type Instant = chrono::NaiveDateTime;

/// Identifier of a managed field, also used in `peer-<id>` specs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FieldId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SelectorError {
    /// Bounds that cannot form a range: equal, or min after max.
    #[error("Invalid range configuration: min ({min}) must be before max ({max})")]
    InvalidRangeConfig { min: String, max: String },

    /// A `peer-<id>` bound names a field that is not managed.
    #[error("Referenced date selector '{0}' does not exist")]
    ReferenceNotFound(FieldId),

    /// A programmatic call targeted a field that is not managed.
    #[error("Expected a managed date selector, got '{0}'")]
    InvalidFieldReference(FieldId),

    #[error("Date selector '{0}' is already managed")]
    DuplicateField(FieldId),

    #[error("No date picker is open")]
    PickerClosed,

    #[error("Date selector '{0}' requires a value")]
    EmptyValue(FieldId),

    #[error("Value {value} of date selector '{field}' is outside its range")]
    OutOfRange { field: FieldId, value: Instant },

    /// A strftime pattern chrono cannot render.
    #[error("Invalid format pattern '{0}'")]
    InvalidFormatPattern(String),

    #[error(transparent)]
    Value(#[from] ValueError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

#[cfg(test)]
pub(crate) mod test_utils {
    use chrono::{NaiveDate, NaiveTime};

    use crate::{FixedClock, Instant};

    pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("invalid test date")
    }

    pub fn datetime(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Instant {
        let time = NaiveTime::from_hms_opt(hour, minute, 0).expect("invalid test time");
        date(year, month, day).and_time(time)
    }

    pub fn midnight(year: i32, month: u32, day: u32) -> Instant {
        datetime(year, month, day, 0, 0)
    }

    /// 2024-06-15 10:00, a Saturday.
    pub fn fixed_clock() -> FixedClock {
        FixedClock(datetime(2024, 6, 15, 10, 0))
    }
}
