use std::{fmt, rc::Rc};

use serde::{Deserialize, Serialize};

use crate::{Formatter, Instant, IsoFormatter, SelectorConfig};

/// The input a selector is bound to.
///
/// The picker only exchanges instants with it; text is the field's business.
pub trait HostField {
    fn current_instant(&self) -> Option<Instant>;
    fn is_date_time_mode(&self) -> bool;
    /// Stores `instant` as the field's value and clears the empty flag.
    fn commit(&mut self, instant: Instant);
    fn clear_value(&mut self);
    /// True until a value is chosen, and again after [`HostField::clear_value`].
    fn is_empty(&self) -> bool;
}

/// Canonical value of a selector: an instant, or nothing chosen yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectorValue {
    instant:  Option<Instant>,
    is_empty: bool,
}

impl Default for SelectorValue {
    fn default() -> Self {
        Self::empty()
    }
}

impl SelectorValue {
    pub const fn empty() -> Self {
        Self {
            instant:  None,
            is_empty: true,
        }
    }

    pub const fn of(instant: Instant) -> Self {
        Self {
            instant:  Some(instant),
            is_empty: false,
        }
    }

    pub const fn instant(&self) -> Option<Instant> {
        self.instant
    }

    pub const fn is_empty(&self) -> bool {
        self.is_empty
    }
}

/// Standard [`HostField`] keeping display and persisted text in sync with
/// its value.
#[derive(Clone)]
pub struct FormField {
    is_date_time: bool,
    value:        SelectorValue,
    display:      String,
    persisted:    String,
    placeholder:  Option<String>,
    formatter:    Rc<dyn Formatter>,
}

impl FormField {
    pub fn new(config: &SelectorConfig) -> Self {
        Self {
            is_date_time: config.is_date_time,
            value:        SelectorValue::empty(),
            display:      String::new(),
            persisted:    String::new(),
            placeholder:  config.placeholder.clone(),
            formatter:    Rc::new(IsoFormatter::default()),
        }
    }

    /// Creates a field from a stored persisted value.
    ///
    /// A malformed value is dropped and the field starts empty.
    pub fn load(config: &SelectorConfig, raw: Option<&str>) -> Self {
        let mut field = Self::new(config);
        field.restore(raw);
        field
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: Rc<dyn Formatter>) -> Self {
        self.formatter = formatter;
        self.refresh_text();
        self
    }

    fn restore(&mut self, raw: Option<&str>) {
        let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return;
        };
        match self.formatter.parse_persisted(raw) {
            Some(instant) => self.commit(instant),
            None => tracing::warn!(value = raw, "ignoring malformed stored date"),
        }
    }

    fn refresh_text(&mut self) {
        match self.value.instant() {
            Some(instant) => {
                self.display = self.formatter.display(instant, self.is_date_time);
                self.persisted = self.formatter.persisted(instant, self.is_date_time);
            },
            None => {
                self.display.clear();
                self.persisted.clear();
            },
        }
    }

    pub const fn value(&self) -> SelectorValue {
        self.value
    }

    /// Text shown in the input.
    pub fn display_value(&self) -> &str {
        &self.display
    }

    /// Text submitted with the form.
    pub fn persisted_value(&self) -> &str {
        &self.persisted
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// Consumes the field, leaving the plain input text: the persisted value.
    pub fn into_plain_value(self) -> String {
        self.persisted
    }
}

impl HostField for FormField {
    fn current_instant(&self) -> Option<Instant> {
        self.value.instant()
    }

    fn is_date_time_mode(&self) -> bool {
        self.is_date_time
    }

    fn commit(&mut self, instant: Instant) {
        let instant = if self.is_date_time {
            instant
        } else {
            instant.date().and_time(chrono::NaiveTime::MIN)
        };
        self.value = SelectorValue::of(instant);
        self.refresh_text();
    }

    fn clear_value(&mut self) {
        self.value = SelectorValue::empty();
        self.refresh_text();
    }

    fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl fmt::Debug for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormField")
            .field("is_date_time", &self.is_date_time)
            .field("value", &self.value)
            .field("display", &self.display)
            .field("persisted", &self.persisted)
            .field("placeholder", &self.placeholder)
            .finish_non_exhaustive()
    }
}
