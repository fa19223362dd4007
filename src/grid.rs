//! Calendar grid state of an open picker.
//!
//! [`GridState`] is a plain value: events go through [`GridState::apply`],
//! which reports what kind of change happened, and rendering is left to
//! [`crate::PickerView`]. The grid always shows [`GRID_CELLS`] consecutive days,
//! starting on the configured first day of week on or before the first of
//! the visible month.

use chrono::{Days, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::{
    Clamp, DateRange, GRID_CELLS, Hour, Instant, MIN_DAY, MONTHS_PER_YEAR, Minute, MonthIndex,
    days_in_month, prelude::*,
};

/// One day in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub date:             NaiveDate,
    /// Day of month shown in the cell.
    pub day:              u8,
    pub in_visible_month: bool,
    /// In the visible month and within the range.
    pub selectable:       bool,
    /// The selected day.
    pub active:           bool,
}

/// Availability of the month navigation arrows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Navigation {
    pub previous: bool,
    pub next:     bool,
}

/// Input to an open picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickerEvent {
    /// Click on the cell at this grid index.
    SelectCell(usize),
    ChangeMonth(MonthIndex),
    ChangeYear(i32),
    NextMonth,
    PreviousMonth,
    ChangeHour(Hour),
    ChangeMinute(Minute),
}

/// What an event did to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Nothing changed, e.g. a click on an unselectable cell.
    Ignored,
    /// The visible month or year moved.
    Navigated,
    /// Hour or minute changed.
    TimeChanged,
    /// A day was picked.
    DaySelected,
}

/// Grid of the open picker.
///
/// At most one cell is active. A selected day can fall outside the
/// [`GRID_CELLS`] shown, e.g. the 31st of a month whose first lands late in
/// the week. No cell is active then, while [`GridState::selected_date`] still
/// reports the day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridState {
    range:          DateRange,
    first_day:      Weekday,
    year:           i32,
    month:          MonthIndex,
    selected_day:   Option<u8>,
    hour:           Hour,
    minute:         Minute,
    cells:          Vec<GridCell>,
    months_enabled: [bool; MONTHS_PER_YEAR as usize],
    navigation:     Navigation,
}

impl GridState {
    /// Builds the grid for an opening picker, showing the month of `seed`
    /// clamped into `range`.
    pub fn open(range: DateRange, first_day: Weekday, seed: Instant) -> Self {
        let month = MonthIndex::of(&seed);
        let mut state = Self {
            range,
            first_day,
            year: seed.year(),
            month,
            selected_day: None,
            hour: Hour::of(&seed),
            minute: Minute::of(&seed),
            cells: Vec::with_capacity(GRID_CELLS),
            months_enabled: [true; MONTHS_PER_YEAR as usize],
            navigation: Navigation::default(),
        };
        let day = u8::try_from(seed.day()).unwrap_or(MIN_DAY);
        state.render(Some(day), Some(month), Some(seed.year()));
        state
    }

    /// Applies one event.
    pub fn apply(&mut self, event: PickerEvent) -> Transition {
        match event {
            PickerEvent::SelectCell(index) => {
                let Some(cell) = self.cells.get(index).filter(|cell| cell.selectable) else {
                    return Transition::Ignored;
                };
                let day = cell.day;
                self.render(Some(day), None, None);
                Transition::DaySelected
            },
            PickerEvent::ChangeMonth(month) => {
                self.render(None, Some(month), None);
                Transition::Navigated
            },
            PickerEvent::ChangeYear(year) => {
                self.render(None, None, Some(year));
                Transition::Navigated
            },
            PickerEvent::NextMonth => {
                let (month, rolled) = self.month.succ();
                let year = if rolled { self.year + 1 } else { self.year };
                self.render(None, Some(month), Some(year));
                Transition::Navigated
            },
            PickerEvent::PreviousMonth => {
                let (month, rolled) = self.month.pred();
                let year = if rolled { self.year - 1 } else { self.year };
                self.render(None, Some(month), Some(year));
                Transition::Navigated
            },
            PickerEvent::ChangeHour(hour) => {
                self.hour = hour;
                Transition::TimeChanged
            },
            PickerEvent::ChangeMinute(minute) => {
                self.minute = minute;
                Transition::TimeChanged
            },
        }
    }

    /// Updates the grid. `None` keeps the current value.
    ///
    /// Supplying a month or year rebuilds the cells. Without an explicit day
    /// a day past the end of the month is pulled back to the month's last day.
    fn render(&mut self, day: Option<u8>, month: Option<MonthIndex>, year: Option<i32>) {
        let explicit_day = day.is_some();
        let mut day = day.or(self.selected_day).unwrap_or(MIN_DAY);

        if month.is_some() || year.is_some() {
            let mut month = month.unwrap_or(self.month);
            let mut year = year.unwrap_or(self.year);

            let probe_day = day.clamp(MIN_DAY, days_in_month(year, month));
            let (date, clamp) = match NaiveDate::from_ymd_opt(year, month.number(), u32::from(probe_day)) {
                Some(requested) => self.range.clamp_date(requested),
                // year beyond chrono's calendar
                None if year < self.range.min().year() => (self.range.min_date(), Clamp::ToMin),
                None => (self.range.max_date(), Clamp::ToMax),
            };
            if clamp != Clamp::Within {
                tracing::debug!(year, month = month.get(), day, clamped = %date, ?clamp, "selection outside range");
                year = date.year();
                month = MonthIndex::of(&date);
                day = u8::try_from(date.day()).unwrap_or(MIN_DAY);
            }

            self.year = year;
            self.month = month;
            self.rebuild_cells();

            if !explicit_day {
                day = repair_day(year, month, day);
            }

            self.rebuild_month_options();
            tracing::debug!(year, month = month.get(), day, "grid rebuilt");
        }

        self.selected_day = Some(day);
        self.highlight();
    }

    fn rebuild_cells(&mut self) {
        let Some(first) = NaiveDate::from_ymd_opt(self.year, self.month.number(), 1) else {
            return;
        };

        let mut anchor = first;
        while anchor.weekday() != self.first_day {
            match anchor.pred_opt() {
                Some(previous) => anchor = previous,
                None => break,
            }
        }

        let (year, month, range) = (self.year, self.month, self.range);
        self.cells = anchor
            .iter_days()
            .take(GRID_CELLS)
            .map(|date| {
                let in_visible_month = date.year() == year && MonthIndex::of(&date) == month;
                GridCell {
                    date,
                    day: u8::try_from(date.day()).unwrap_or(MIN_DAY),
                    in_visible_month,
                    selectable: in_visible_month && range.contains_date(date),
                    active: false,
                }
            })
            .collect();
    }

    fn rebuild_month_options(&mut self) {
        for month in MonthIndex::all() {
            self.months_enabled[usize::from(month.get())] = self.range.month_enabled(self.year, month);
        }
        self.navigation = Navigation {
            previous: self.range.has_previous_month(self.year, self.month),
            next:     self.range.has_next_month(self.year, self.month),
        };
    }

    fn highlight(&mut self) {
        let selected = self.selected_day;
        for cell in &mut self.cells {
            cell.active = cell.selectable && Some(cell.day) == selected;
        }
    }

    pub const fn range(&self) -> DateRange {
        self.range
    }

    pub const fn first_day(&self) -> Weekday {
        self.first_day
    }

    pub const fn visible_year(&self) -> i32 {
        self.year
    }

    pub const fn visible_month(&self) -> MonthIndex {
        self.month
    }

    pub const fn selected_day(&self) -> Option<u8> {
        self.selected_day
    }

    pub const fn hour(&self) -> Hour {
        self.hour
    }

    pub const fn minute(&self) -> Minute {
        self.minute
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub const fn months_enabled(&self) -> &[bool; MONTHS_PER_YEAR as usize] {
        &self.months_enabled
    }

    pub const fn navigation(&self) -> Navigation {
        self.navigation
    }

    /// Index of the highlighted cell, `None` if the selected day is not shown.
    pub fn active_cell(&self) -> Option<usize> {
        self.cells.iter().position(|cell| cell.active)
    }

    /// Date composed from the visible month and the selected day.
    pub fn selected_date(&self) -> Option<NaiveDate> {
        let day = self.selected_day?;
        NaiveDate::from_ymd_opt(self.year, self.month.number(), u32::from(day))
    }

    /// Selected date at the chosen hour and minute, or at midnight without time.
    pub fn selected_instant(&self, with_time: bool) -> Option<Instant> {
        let date = self.selected_date()?;
        let time = if with_time {
            NaiveTime::from_hms_opt(u32::from(self.hour.get()), u32::from(self.minute.get()), 0)?
        } else {
            NaiveTime::MIN
        };
        Some(date.and_time(time))
    }
}

/// Largest valid day of `(year, month)` not after `day`, found by stepping
/// back from `first + (day - 1)` until the date lands in the month again.
fn repair_day(year: i32, month: MonthIndex, day: u8) -> u8 {
    let Some(first) = NaiveDate::from_ymd_opt(year, month.number(), 1) else {
        return day;
    };
    let Some(mut date) = first.checked_add_days(Days::new(u64::from(day.saturating_sub(1)))) else {
        return day;
    };

    while date.year() != year || MonthIndex::of(&date) != month {
        match date.pred_opt() {
            Some(previous) => date = previous,
            None => return day,
        }
    }

    let repaired = u8::try_from(date.day()).unwrap_or(day);
    if repaired != day {
        tracing::debug!(year, month = month.get(), day, repaired, "day does not exist in month");
    }
    repaired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, datetime, midnight};

    fn month(m: u8) -> MonthIndex {
        MonthIndex::new(m).unwrap()
    }

    fn wide_range() -> DateRange {
        DateRange::new(midnight(1970, 1, 1), midnight(2038, 1, 1)).unwrap()
    }

    #[test]
    fn test_grid_has_35_cells_anchored_on_first_weekday() {
        let weekdays = [
            Weekday::Sun,
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
        ];

        for first_day in weekdays {
            for year in [2023, 2024] {
                for m in 1..=12 {
                    let state = GridState::open(wide_range(), first_day, midnight(year, m, 1));
                    let cells = state.cells();
                    assert_eq!(cells.len(), GRID_CELLS, "{year}-{m} {first_day}");
                    assert_eq!(cells[0].date.weekday(), first_day, "{year}-{m} {first_day}");
                    assert!(cells[0].date <= date(year, m, 1));
                    assert!(cells[0].date > date(year, m, 1) - Days::new(7));
                    assert!(
                        cells.windows(2).all(|w| w[0].date.succ_opt() == Some(w[1].date)),
                        "cells must be consecutive days"
                    );
                }
            }
        }
    }

    #[test]
    fn test_open_selects_seed_day() {
        let state = GridState::open(wide_range(), Weekday::Mon, datetime(2024, 6, 15, 14, 30));

        assert_eq!(state.visible_year(), 2024);
        assert_eq!(state.visible_month(), month(5));
        assert_eq!(state.selected_day(), Some(15));
        assert_eq!(state.hour().get(), 14);
        assert_eq!(state.minute().get(), 30);

        let active = state.active_cell().map(|i| state.cells()[i].date);
        assert_eq!(active, Some(date(2024, 6, 15)));
        assert_eq!(state.cells().iter().filter(|cell| cell.active).count(), 1);
    }

    #[test]
    fn test_other_month_cells_are_not_selectable() {
        // June 2024 starts on a Saturday
        let state = GridState::open(wide_range(), Weekday::Sun, midnight(2024, 6, 10));
        let first = state.cells()[0];
        assert_eq!(first.date, date(2024, 5, 26));
        assert!(!first.in_visible_month);
        assert!(!first.selectable);
        assert!(state.cells()[6].selectable);
    }

    #[test]
    fn test_cells_outside_range_are_not_selectable() {
        let range = DateRange::new(datetime(2024, 6, 10, 9, 0), midnight(2024, 6, 20)).unwrap();
        let state = GridState::open(range, Weekday::Sun, midnight(2024, 6, 15));

        for cell in state.cells() {
            let expected = cell.in_visible_month && (date(2024, 6, 10)..=date(2024, 6, 20)).contains(&cell.date);
            assert_eq!(cell.selectable, expected, "{}", cell.date);
        }
    }

    #[test]
    fn test_february_day_repair() {
        let mut state = GridState::open(wide_range(), Weekday::Sun, midnight(2023, 1, 31));
        assert_eq!(state.apply(PickerEvent::ChangeMonth(month(1))), Transition::Navigated);

        assert_eq!(state.visible_month(), month(1));
        assert_eq!(state.selected_day(), Some(28));
        assert_eq!(state.selected_date(), Some(date(2023, 2, 28)));
    }

    #[test]
    fn test_day_repair_cases() {
        assert_eq!(repair_day(2023, month(1), 31), 28);
        assert_eq!(repair_day(2024, month(1), 31), 29);
        assert_eq!(repair_day(2024, month(3), 31), 30);
        assert_eq!(repair_day(2024, month(3), 12), 12);
    }

    #[test]
    fn test_clamp_before_min() {
        let range = DateRange::new(midnight(2020, 3, 10), midnight(2025, 9, 20)).unwrap();
        let mut state = GridState::open(range, Weekday::Sun, midnight(2021, 1, 5));

        state.apply(PickerEvent::ChangeYear(2020));
        assert_eq!(state.selected_date(), Some(date(2020, 3, 10)));

        state.apply(PickerEvent::ChangeYear(1990));
        assert_eq!(state.selected_date(), Some(date(2020, 3, 10)));
    }

    #[test]
    fn test_clamp_after_max() {
        let range = DateRange::new(midnight(2020, 3, 10), midnight(2025, 9, 20)).unwrap();
        let mut state = GridState::open(range, Weekday::Sun, midnight(2025, 8, 25));

        state.apply(PickerEvent::NextMonth);
        assert_eq!(state.selected_date(), Some(date(2025, 9, 20)));
        assert!(!state.navigation().next);

        state.apply(PickerEvent::NextMonth);
        assert_eq!(state.selected_date(), Some(date(2025, 9, 20)));
    }

    #[test]
    fn test_open_clamps_seed_into_range() {
        let range = DateRange::new(midnight(2020, 3, 10), midnight(2020, 9, 20)).unwrap();
        let state = GridState::open(range, Weekday::Sun, midnight(2024, 1, 1));
        assert_eq!(state.selected_date(), Some(date(2020, 9, 20)));

        let state = GridState::open(range, Weekday::Sun, midnight(2001, 1, 1));
        assert_eq!(state.selected_date(), Some(date(2020, 3, 10)));
    }

    #[test]
    fn test_clamp_property_over_requests() {
        let range = DateRange::new(midnight(2020, 3, 10), midnight(2021, 9, 20)).unwrap();

        for year in 2018..=2023 {
            for m in 0..12 {
                let mut state = GridState::open(range, Weekday::Mon, midnight(2020, 6, 15));
                state.apply(PickerEvent::ChangeYear(year));
                state.apply(PickerEvent::ChangeMonth(month(m)));

                let selected = state.selected_date().unwrap();
                assert!(range.contains_date(selected), "{year}-{m}: {selected}");
                let active = state.active_cell().map(|i| state.cells()[i].date);
                assert_eq!(active, Some(selected), "{year}-{m}");
            }
        }
    }

    #[test]
    fn test_month_options_follow_year() {
        let range = DateRange::new(midnight(2020, 3, 10), midnight(2022, 9, 20)).unwrap();
        let mut state = GridState::open(range, Weekday::Sun, midnight(2020, 5, 1));

        let enabled = state.months_enabled();
        assert!(!enabled[0] && !enabled[1] && enabled[2] && enabled[11]);

        state.apply(PickerEvent::ChangeYear(2021));
        assert!(state.months_enabled().iter().all(|enabled| *enabled));

        state.apply(PickerEvent::ChangeYear(2022));
        let enabled = state.months_enabled();
        assert!(enabled[8] && !enabled[9] && !enabled[11]);
    }

    #[test]
    fn test_navigation_wraps_year() {
        let mut state = GridState::open(wide_range(), Weekday::Sun, midnight(2023, 12, 15));

        state.apply(PickerEvent::NextMonth);
        assert_eq!((state.visible_year(), state.visible_month()), (2024, MonthIndex::JANUARY));
        assert_eq!(state.selected_day(), Some(15));

        state.apply(PickerEvent::PreviousMonth);
        state.apply(PickerEvent::PreviousMonth);
        assert_eq!((state.visible_year(), state.visible_month()), (2023, month(10)));
        assert!(state.navigation().previous && state.navigation().next);
    }

    #[test]
    fn test_navigation_at_range_edges() {
        let range = DateRange::new(midnight(2024, 6, 3), midnight(2024, 8, 1)).unwrap();
        let mut state = GridState::open(range, Weekday::Sun, midnight(2024, 6, 15));
        assert_eq!(state.navigation(), Navigation { previous: false, next: true });

        state.apply(PickerEvent::NextMonth);
        state.apply(PickerEvent::NextMonth);
        assert_eq!(state.visible_month(), month(7));
        assert_eq!(state.selected_date(), Some(date(2024, 8, 1)));
        assert_eq!(state.navigation(), Navigation { previous: true, next: false });
    }

    #[test]
    fn test_select_cell() {
        let mut state = GridState::open(wide_range(), Weekday::Sun, midnight(2024, 6, 15));
        let index = state
            .cells()
            .iter()
            .position(|cell| cell.date == date(2024, 6, 20))
            .unwrap();

        assert_eq!(state.apply(PickerEvent::SelectCell(index)), Transition::DaySelected);
        assert_eq!(state.selected_date(), Some(date(2024, 6, 20)));
        assert_eq!(state.active_cell(), Some(index));
    }

    #[test]
    fn test_select_unselectable_cell_is_ignored() {
        let mut state = GridState::open(wide_range(), Weekday::Sun, midnight(2024, 6, 15));
        let before = state.clone();

        assert_eq!(state.apply(PickerEvent::SelectCell(0)), Transition::Ignored);
        assert_eq!(state.apply(PickerEvent::SelectCell(GRID_CELLS)), Transition::Ignored);
        assert_eq!(state, before);
    }

    #[test]
    fn test_time_events() {
        let mut state = GridState::open(wide_range(), Weekday::Sun, midnight(2024, 6, 15));
        assert_eq!(
            state.apply(PickerEvent::ChangeHour(Hour::new(18).unwrap())),
            Transition::TimeChanged
        );
        state.apply(PickerEvent::ChangeMinute(Minute::new(5).unwrap()));

        assert_eq!(state.selected_instant(true), Some(datetime(2024, 6, 15, 18, 5)));
        assert_eq!(state.selected_instant(false), Some(midnight(2024, 6, 15)));
    }

    #[test]
    fn test_selected_day_outside_grid() {
        // May 2026 starts on a Friday, so a Sunday-first grid ends on May 30
        let state = GridState::open(wide_range(), Weekday::Sun, midnight(2026, 5, 31));

        assert_eq!(state.cells().last().map(|cell| cell.date), Some(date(2026, 5, 30)));
        assert_eq!(state.active_cell(), None);
        assert_eq!(state.selected_date(), Some(date(2026, 5, 31)));
        assert_eq!(state.selected_instant(false), Some(midnight(2026, 5, 31)));
    }
}
