use serde::Serialize;

use crate::{GridCell, GridState, LocaleProvider, MAX_MINUTE, MonthIndex, Navigation};

/// An entry of the month selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthOption {
    pub month:   MonthIndex,
    pub label:   String,
    pub enabled: bool,
}

/// Time selectors, present for date-time fields only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeView {
    pub hour:          u8,
    pub minute:        u8,
    pub hour_labels:   Vec<String>,
    pub minute_labels: Vec<String>,
}

/// Everything a UI layer needs to draw an open picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickerView {
    pub weekday_labels: Vec<String>,
    pub months:         Vec<MonthOption>,
    pub years:          Vec<i32>,
    pub visible_month:  MonthIndex,
    pub visible_year:   i32,
    pub cells:          Vec<GridCell>,
    pub navigation:     Navigation,
    pub time:           Option<TimeView>,
}

impl PickerView {
    pub fn render(state: &GridState, locale: &dyn LocaleProvider, with_time: bool) -> Self {
        let enabled = state.months_enabled();
        let months = MonthIndex::all()
            .map(|month| MonthOption {
                month,
                label: locale.month_label(month).to_owned(),
                enabled: enabled[usize::from(month.get())],
            })
            .collect();

        let time = with_time.then(|| TimeView {
            hour:          state.hour().get(),
            minute:        state.minute().get(),
            hour_labels:   locale.hour_labels(),
            minute_labels: (0..=MAX_MINUTE).map(|minute| format!("{minute:02}")).collect(),
        });

        Self {
            weekday_labels: locale.weekday_labels_from(state.first_day()),
            months,
            years: state.range().years().collect(),
            visible_month: state.visible_month(),
            visible_year: state.visible_year(),
            cells: state.cells().to_vec(),
            navigation: state.navigation(),
            time,
        }
    }

    /// Indices of cells that render differently from `previous`.
    pub fn changed_cells(&self, previous: &Self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(index, cell)| previous.cells.get(*index) != Some(*cell))
            .map(|(index, _)| index)
            .collect()
    }
}
