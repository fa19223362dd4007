use std::collections::HashMap;

use tracing::{debug, info};

use crate::{
    Bounds, Clock, FieldId, FormField, GridState, HostField, Instant, Locale, LocaleProvider,
    PeerRegistry, PickerEvent, PickerView, SelectorConfig, SelectorError, SystemClock, Transition,
};

/// Invoked with the field's id whenever its picker closes.
pub type CloseCallback = Box<dyn FnMut(&FieldId)>;

struct ManagedField<F> {
    config:   SelectorConfig,
    bounds:   Bounds,
    field:    F,
    on_close: Option<CloseCallback>,
}

/// The picker that currently owns the grid.
struct ActivePicker {
    field: FieldId,
    grid:  GridState,
}

/// Manages date selectors and the single picker overlay shared by them.
///
/// Fields are attached once with their configuration. At most one of them is
/// open at a time: [`DatePicker::open`] acquires the grid for a field,
/// closing whichever field held it, and [`DatePicker::close`] releases it.
/// While open, UI events go through [`DatePicker::dispatch`].
pub struct DatePicker<F: HostField = FormField> {
    fields: HashMap<FieldId, ManagedField<F>>,
    active: Option<ActivePicker>,
    locale: Box<dyn LocaleProvider>,
    clock:  Box<dyn Clock>,
}

impl<F: HostField> Default for DatePicker<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: HostField> DatePicker<F> {
    /// English locale, system clock.
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
            active: None,
            locale: Box::new(Locale::default()),
            clock:  Box::new(SystemClock),
        }
    }

    #[must_use]
    pub fn with_locale(mut self, locale: impl LocaleProvider + 'static) -> Self {
        self.locale = Box::new(locale);
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Puts `field` under management.
    ///
    /// Static bounds are resolved here against the clock's current time.
    ///
    /// # Errors
    /// Returns `SelectorError::DuplicateField` if the id is already managed and
    /// `SelectorError::InvalidRangeConfig` if the bounds cannot form a range.
    pub fn attach(&mut self, id: impl Into<FieldId>, config: SelectorConfig, field: F) -> Result<(), SelectorError> {
        let id = id.into();
        if self.fields.contains_key(&id) {
            return Err(SelectorError::DuplicateField(id));
        }

        let bounds = Bounds::from_config(&config, self.clock.now())?;
        info!(field = %id, min = %config.min_date, max = %config.max_date, "date selector attached");
        self.fields.insert(
            id,
            ManagedField {
                config,
                bounds,
                field,
                on_close: None,
            },
        );
        Ok(())
    }

    /// Opens the picker for `id`.
    ///
    /// Reopening the open field does nothing. Opening another field closes
    /// the current one first, but only once the new range has resolved; on
    /// error the current picker stays open.
    ///
    /// # Errors
    /// Returns `SelectorError::InvalidFieldReference` for an unmanaged id,
    /// `SelectorError::ReferenceNotFound` for a bound naming an unknown peer and
    /// `SelectorError::InvalidRangeConfig` if the resolved min is not before max.
    pub fn open(&mut self, id: &FieldId) -> Result<(), SelectorError> {
        let managed = self.managed(id)?;
        if self.open_field() == Some(id) {
            debug!(field = %id, "picker already open");
            return Ok(());
        }

        let range = managed.bounds.resolve(self)?;
        let first_day = self.locale.first_weekday()?;
        let seed = managed.field.current_instant().unwrap_or_else(|| self.clock.now());

        self.close();
        debug!(field = %id, min = %range.min(), max = %range.max(), %seed, "picker opened");
        self.active = Some(ActivePicker {
            field: id.clone(),
            grid:  GridState::open(range, first_day, seed),
        });
        Ok(())
    }

    /// Closes the open picker, running its close callback. No-op when closed.
    pub fn close(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        debug!(field = %active.field, "picker closed");
        if let Some(callback) = self
            .fields
            .get_mut(&active.field)
            .and_then(|managed| managed.on_close.as_mut())
        {
            callback(&active.field);
        }
    }

    /// Feeds a UI event to the open picker.
    ///
    /// A day selection commits the value and closes the picker. Time changes
    /// commit only once the field holds a value; navigation never commits.
    ///
    /// # Errors
    /// Returns `SelectorError::PickerClosed` when no picker is open.
    pub fn dispatch(&mut self, event: PickerEvent) -> Result<Transition, SelectorError> {
        let active = self.active.as_mut().ok_or(SelectorError::PickerClosed)?;
        let transition = active.grid.apply(event);

        let commit = match transition {
            Transition::DaySelected => true,
            Transition::TimeChanged => self.fields.get(&active.field).is_some_and(|managed| !managed.field.is_empty()),
            Transition::Ignored | Transition::Navigated => false,
        };

        if commit {
            if let Some(managed) = self.fields.get_mut(&active.field) {
                let with_time = managed.field.is_date_time_mode();
                if let Some(instant) = active.grid.selected_instant(with_time) {
                    debug!(field = %active.field, %instant, "value committed");
                    managed.field.commit(instant);
                }
            }
        }

        if transition == Transition::DaySelected {
            self.close();
        }
        Ok(transition)
    }

    pub const fn is_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn open_field(&self) -> Option<&FieldId> {
        self.active.as_ref().map(|active| &active.field)
    }

    /// Grid of the open picker.
    pub fn grid(&self) -> Option<&GridState> {
        self.active.as_ref().map(|active| &active.grid)
    }

    /// Render snapshot of the open picker.
    pub fn view(&self) -> Option<PickerView> {
        let active = self.active.as_ref()?;
        let with_time = self
            .fields
            .get(&active.field)
            .is_some_and(|managed| managed.field.is_date_time_mode());
        Some(PickerView::render(&active.grid, self.locale.as_ref(), with_time))
    }

    /// # Errors
    /// Returns `SelectorError::InvalidFieldReference` for an unmanaged id.
    pub fn get_value(&self, id: &FieldId) -> Result<Option<Instant>, SelectorError> {
        Ok(self.managed(id)?.field.current_instant())
    }

    /// Stores `instant` in the field. Date-only fields drop the time.
    ///
    /// # Errors
    /// Returns `SelectorError::InvalidFieldReference` for an unmanaged id.
    pub fn set_value(&mut self, id: &FieldId, instant: Instant) -> Result<(), SelectorError> {
        self.managed_mut(id)?.field.commit(instant);
        Ok(())
    }

    /// # Errors
    /// Returns `SelectorError::InvalidFieldReference` for an unmanaged id.
    pub fn clear(&mut self, id: &FieldId) -> Result<(), SelectorError> {
        self.managed_mut(id)?.field.clear_value();
        Ok(())
    }

    /// Replaces the field's close callback.
    ///
    /// # Errors
    /// Returns `SelectorError::InvalidFieldReference` for an unmanaged id.
    pub fn register_close_callback(
        &mut self,
        id: &FieldId,
        callback: impl FnMut(&FieldId) + 'static,
    ) -> Result<(), SelectorError> {
        self.managed_mut(id)?.on_close = Some(Box::new(callback));
        Ok(())
    }

    /// Releases the field from management and hands it back.
    /// Closes the picker first if it belongs to this field.
    ///
    /// # Errors
    /// Returns `SelectorError::InvalidFieldReference` for an unmanaged id.
    pub fn detach(&mut self, id: &FieldId) -> Result<F, SelectorError> {
        self.managed(id)?;
        if self.open_field() == Some(id) {
            self.close();
        }
        let managed = self
            .fields
            .remove(id)
            .ok_or_else(|| SelectorError::InvalidFieldReference(id.clone()))?;
        info!(field = %id, "date selector detached");
        Ok(managed.field)
    }

    /// Checks the field's value against its configuration.
    ///
    /// # Errors
    /// Returns `SelectorError::InvalidFieldReference` for an unmanaged id,
    /// `SelectorError::EmptyValue` if empty values are not allowed and none is
    /// set, `SelectorError::OutOfRange` if the value's date lies outside the
    /// resolved range, and any error from resolving peer bounds.
    pub fn validate(&self, id: &FieldId) -> Result<(), SelectorError> {
        let managed = self.managed(id)?;
        let Some(value) = managed.field.current_instant() else {
            if managed.config.allow_empty {
                return Ok(());
            }
            return Err(SelectorError::EmptyValue(id.clone()));
        };

        let range = managed.bounds.resolve(self)?;
        if !range.contains_date(value.date()) {
            return Err(SelectorError::OutOfRange {
                field: id.clone(),
                value,
            });
        }
        Ok(())
    }

    /// # Errors
    /// Returns `SelectorError::InvalidFieldReference` for an unmanaged id.
    pub fn field(&self, id: &FieldId) -> Result<&F, SelectorError> {
        Ok(&self.managed(id)?.field)
    }

    /// # Errors
    /// Returns `SelectorError::InvalidFieldReference` for an unmanaged id.
    pub fn config(&self, id: &FieldId) -> Result<&SelectorConfig, SelectorError> {
        Ok(&self.managed(id)?.config)
    }

    pub fn is_managed(&self, id: &FieldId) -> bool {
        self.fields.contains_key(id)
    }

    fn managed(&self, id: &FieldId) -> Result<&ManagedField<F>, SelectorError> {
        self.fields
            .get(id)
            .ok_or_else(|| SelectorError::InvalidFieldReference(id.clone()))
    }

    fn managed_mut(&mut self, id: &FieldId) -> Result<&mut ManagedField<F>, SelectorError> {
        self.fields
            .get_mut(id)
            .ok_or_else(|| SelectorError::InvalidFieldReference(id.clone()))
    }
}

impl<F: HostField> PeerRegistry for DatePicker<F> {
    fn resolve(&self, id: &FieldId) -> Result<Option<Instant>, SelectorError> {
        self.fields
            .get(id)
            .map(|managed| managed.field.current_instant())
            .ok_or_else(|| SelectorError::ReferenceNotFound(id.clone()))
    }
}
