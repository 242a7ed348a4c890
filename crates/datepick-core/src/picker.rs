//! Date picker state machine.
//!
//! Holds everything the widget renders from: the selected date, the month
//! being browsed, whether the popover and year dropdown are open, and where
//! the popover is placed. The GTK widget forwards user input here and redraws
//! from the result.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::calendar::{self, CalendarCursor, MonthGrid, SlideDirection};
use crate::format::DateFormat;
use crate::keyboard::Key;
use crate::placement::{PopoverPlacement, Rect, Viewport, compute_placement};

/// Callback invoked with every newly selected date.
pub type DateChangeCallback = Rc<dyn Fn(NaiveDate)>;

/// Inputs from the host application.
pub struct DatePickerProps {
    pub initial_date: Option<NaiveDate>,
    pub format: DateFormat,
    pub on_date_change: DateChangeCallback,
}

impl DatePickerProps {
    /// Props with the default format and no initial date.
    pub fn new<F>(on_date_change: F) -> Self
    where
        F: Fn(NaiveDate) + 'static,
    {
        Self {
            initial_date: None,
            format: DateFormat::default(),
            on_date_change: Rc::new(on_date_change),
        }
    }

    pub fn with_initial_date(mut self, date: Option<NaiveDate>) -> Self {
        self.initial_date = date;
        self
    }

    pub fn with_format(mut self, format: DateFormat) -> Self {
        self.format = format;
        self
    }
}

/// Where a pointer press or focus change landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Input,
    Popover,
    Outside,
}

pub struct DatePickerState {
    selected: Option<NaiveDate>,
    cursor: CalendarCursor,
    today: NaiveDate,
    format: DateFormat,
    popover_open: bool,
    year_dropdown_open: bool,
    placement: PopoverPlacement,
    direction: SlideDirection,
    on_date_change: DateChangeCallback,
}

impl DatePickerState {
    /// Create the state. `today` seeds the cursor when there is no initial
    /// date and bounds the year dropdown.
    pub fn new(props: DatePickerProps, today: NaiveDate) -> Self {
        let cursor = CalendarCursor::from_date(props.initial_date.unwrap_or(today));
        Self {
            selected: props.initial_date,
            cursor,
            today,
            format: props.format,
            popover_open: false,
            year_dropdown_open: false,
            placement: PopoverPlacement::default(),
            direction: SlideDirection::default(),
            on_date_change: props.on_date_change,
        }
    }

    pub fn selected(&self) -> Option<NaiveDate> {
        self.selected
    }

    pub fn cursor(&self) -> CalendarCursor {
        self.cursor
    }

    pub fn format(&self) -> DateFormat {
        self.format
    }

    /// Change the display format. Only affects rendering.
    pub fn set_format(&mut self, format: DateFormat) {
        self.format = format;
    }

    pub fn is_open(&self) -> bool {
        self.popover_open
    }

    pub fn is_year_dropdown_open(&self) -> bool {
        self.year_dropdown_open
    }

    pub fn placement(&self) -> PopoverPlacement {
        self.placement
    }

    pub fn direction(&self) -> SlideDirection {
        self.direction
    }

    pub fn grid(&self) -> MonthGrid {
        self.cursor.grid()
    }

    /// Text shown in the input; empty until a date is selected.
    pub fn display_text(&self) -> String {
        self.selected
            .map(|date| self.format.format(date))
            .unwrap_or_default()
    }

    /// Placeholder for the empty input: the format token itself.
    pub fn placeholder(&self) -> &'static str {
        self.format.token()
    }

    /// Day to highlight in the visible month: the selection, else today.
    pub fn highlighted_day(&self) -> Option<u32> {
        let date = self.selected.unwrap_or(self.today);
        self.cursor.contains(date).then(|| date.day())
    }

    /// Years offered by the dropdown, newest first.
    pub fn year_options(&self) -> Vec<i32> {
        calendar::year_options(self.today.year())
    }

    /// Open the popover and recompute its placement.
    pub fn open(&mut self, anchor: Rect, popover_width: f64, viewport: Viewport) {
        self.placement = compute_placement(anchor, popover_width, viewport);
        self.popover_open = true;
        debug!(
            "Date picker opened at {:?} (anchor={:?}, viewport={:?})",
            self.placement, anchor, viewport
        );
    }

    /// Input focus toggles the popover. Returns whether it is now open.
    pub fn toggle(&mut self, anchor: Rect, popover_width: f64, viewport: Viewport) -> bool {
        if self.popover_open {
            self.close();
        } else {
            self.open(anchor, popover_width, viewport);
        }
        self.popover_open
    }

    /// Close the popover. The year dropdown never outlives it.
    pub fn close(&mut self) {
        if self.popover_open || self.year_dropdown_open {
            debug!("Date picker closed");
        }
        self.popover_open = false;
        self.year_dropdown_open = false;
    }

    pub fn prev_month(&mut self) {
        self.cursor = self.cursor.prev();
        self.direction = SlideDirection::Backward;
    }

    pub fn next_month(&mut self) {
        self.cursor = self.cursor.next();
        self.direction = SlideDirection::Forward;
    }

    /// Select `day` of the displayed month and close the popover.
    ///
    /// Days that don't exist in the month are ignored. The host is not
    /// notified here; see [`select_day_and_notify`].
    pub fn select_day(&mut self, day: u32) -> Option<NaiveDate> {
        let date = self.cursor.date(day)?;
        self.selected = Some(date);
        debug!("Date selected: {}", date);
        self.close();
        Some(date)
    }

    /// Handle to the host's date change callback.
    pub fn date_change_callback(&self) -> DateChangeCallback {
        self.on_date_change.clone()
    }

    pub fn toggle_year_dropdown(&mut self) {
        self.year_dropdown_open = !self.year_dropdown_open;
    }

    /// Show `year` in the calendar and close the dropdown; the popover stays open.
    ///
    /// Years outside the dropdown's range are ignored.
    pub fn select_year(&mut self, year: i32) -> bool {
        if !(calendar::MIN_YEAR..=self.today.year()).contains(&year) {
            return false;
        }
        self.cursor = self.cursor.with_year(year);
        self.year_dropdown_open = false;
        true
    }

    /// Handle a key press that isn't focus movement. Returns true if consumed.
    pub fn handle_key(&mut self, key: Key) -> bool {
        match key {
            Key::Escape if self.popover_open => {
                self.close();
                true
            }
            _ => false,
        }
    }

    /// Close everything when a click or focus change lands outside.
    pub fn handle_pointer(&mut self, target: ClickTarget) {
        if target == ClickTarget::Outside {
            self.close();
        }
    }

    /// Accessible label for a day button, e.g. `Select 2/29/2024`.
    pub fn day_label(&self, day: u32) -> String {
        format!(
            "Select {}/{}/{}",
            self.cursor.month0() + 1,
            day,
            self.cursor.year()
        )
    }
}

/// Select `day` and notify the host with exactly the constructed date.
///
/// The callback runs after the borrow on `state` is released, so it may read
/// the picker back.
pub fn select_day_and_notify(state: &RefCell<DatePickerState>, day: u32) -> Option<NaiveDate> {
    let (date, callback) = {
        let mut state = state.borrow_mut();
        let date = state.select_day(day)?;
        (date, state.date_change_callback())
    };
    callback(date);
    Some(date)
}

/// Accessible label for a year button.
pub fn year_label(year: i32) -> String {
    format!("Select year {}", year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::{HorizontalAlign, VerticalSide};
    use std::rc::Weak;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        ymd(2026, 10, 19)
    }

    fn recording_picker(
        initial: Option<NaiveDate>,
        format: DateFormat,
    ) -> (DatePickerState, Rc<RefCell<Vec<NaiveDate>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let props = DatePickerProps::new(move |d| sink.borrow_mut().push(d))
            .with_initial_date(initial)
            .with_format(format);
        (DatePickerState::new(props, today()), seen)
    }

    const VIEWPORT: Viewport = Viewport {
        width: 1024.0,
        height: 768.0,
    };

    fn open_default(picker: &mut DatePickerState) {
        picker.open(Rect::new(100.0, 100.0, 256.0, 40.0), 320.0, VIEWPORT);
    }

    /// Select and notify, the way the widget does.
    fn pick(picker: &mut DatePickerState, day: u32) -> Option<NaiveDate> {
        let date = picker.select_day(day)?;
        picker.date_change_callback()(date);
        Some(date)
    }

    #[test]
    fn test_cursor_starts_at_today_without_initial_date() {
        let (picker, _) = recording_picker(None, DateFormat::default());
        assert_eq!(picker.cursor().year(), 2026);
        assert_eq!(picker.cursor().month0(), 9);
        assert_eq!(picker.selected(), None);
    }

    #[test]
    fn test_cursor_starts_at_initial_date() {
        let (picker, _) = recording_picker(Some(ymd(1999, 3, 5)), DateFormat::default());
        assert_eq!((picker.cursor().year(), picker.cursor().month0()), (1999, 2));
        assert_eq!(picker.display_text(), "05-03-1999");
    }

    #[test]
    fn test_placeholder_is_format_token() {
        let (picker, _) = recording_picker(None, DateFormat::MonthDayYearSlashTime);
        assert_eq!(picker.display_text(), "");
        assert_eq!(picker.placeholder(), "MM/dd/yyyy HH:mm:ss");
    }

    #[test]
    fn test_select_day_notifies_and_closes() {
        let (mut picker, seen) = recording_picker(None, DateFormat::default());
        open_default(&mut picker);
        picker.toggle_year_dropdown();

        let date = pick(&mut picker, 7).unwrap();

        assert_eq!(date, ymd(2026, 10, 7));
        assert_eq!(*seen.borrow(), vec![ymd(2026, 10, 7)]);
        assert_eq!(picker.selected(), Some(date));
        assert!(!picker.is_open());
        assert!(!picker.is_year_dropdown_open());
    }

    #[test]
    fn test_select_day_without_notify_leaves_host_alone() {
        let (mut picker, seen) = recording_picker(None, DateFormat::default());
        assert_eq!(picker.select_day(7), Some(ymd(2026, 10, 7)));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_callback_can_read_picker_back() {
        let handle: Rc<RefCell<Weak<RefCell<DatePickerState>>>> = Rc::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let props = {
            let handle = handle.clone();
            let seen = seen.clone();
            DatePickerProps::new(move |date| {
                let Some(state) = handle.borrow().upgrade() else {
                    return;
                };
                let state = state.borrow();
                seen.borrow_mut().push((date, state.selected(), state.is_open()));
            })
        };
        let state = Rc::new(RefCell::new(DatePickerState::new(props, today())));
        *handle.borrow_mut() = Rc::downgrade(&state);
        open_default(&mut state.borrow_mut());

        assert_eq!(select_day_and_notify(&state, 7), Some(ymd(2026, 10, 7)));
        assert_eq!(select_day_and_notify(&state, 32), None);

        let date = ymd(2026, 10, 7);
        assert_eq!(*seen.borrow(), vec![(date, Some(date), false)]);
    }

    #[test]
    fn test_select_day_in_browsed_month() {
        let (mut picker, seen) = recording_picker(None, DateFormat::default());
        for _ in 0..5 {
            picker.prev_month();
        }
        pick(&mut picker, 31).unwrap();
        assert_eq!(seen.borrow()[0], ymd(2026, 5, 31));
    }

    #[test]
    fn test_select_leap_day_displays_exactly() {
        let (mut picker, seen) = recording_picker(None, DateFormat::YearMonthDayDash);
        assert!(picker.select_year(2024));
        while picker.cursor().month0() != 1 {
            picker.prev_month();
        }
        pick(&mut picker, 29).unwrap();
        assert_eq!(picker.display_text(), "2024-02-29");
        assert_eq!(seen.borrow()[0], ymd(2024, 2, 29));
    }

    #[test]
    fn test_select_nonexistent_day_is_noop() {
        let (mut picker, seen) = recording_picker(None, DateFormat::default());
        picker.select_year(2023);
        while picker.cursor().month0() != 1 {
            picker.prev_month();
        }
        assert_eq!(picker.cursor().year(), 2023);
        open_default(&mut picker);
        assert_eq!(pick(&mut picker, 29), None);
        assert!(seen.borrow().is_empty());
        assert!(picker.is_open());
    }

    #[test]
    fn test_month_navigation_records_direction() {
        let (mut picker, _) = recording_picker(Some(ymd(2024, 1, 10)), DateFormat::default());
        picker.prev_month();
        assert_eq!(picker.direction(), SlideDirection::Backward);
        assert_eq!((picker.cursor().year(), picker.cursor().month0()), (2023, 11));
        picker.next_month();
        picker.next_month();
        assert_eq!(picker.direction(), SlideDirection::Forward);
        assert_eq!((picker.cursor().year(), picker.cursor().month0()), (2024, 1));
    }

    #[test]
    fn test_browsing_does_not_change_selection() {
        let (mut picker, seen) = recording_picker(Some(ymd(2024, 1, 10)), DateFormat::default());
        picker.next_month();
        picker.select_year(2000);
        assert_eq!(picker.selected(), Some(ymd(2024, 1, 10)));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_select_year_keeps_popover_open() {
        let (mut picker, _) = recording_picker(None, DateFormat::default());
        open_default(&mut picker);
        picker.toggle_year_dropdown();
        assert!(picker.select_year(1984));
        assert_eq!(picker.cursor().year(), 1984);
        assert_eq!(picker.cursor().month0(), 9);
        assert!(picker.is_open());
        assert!(!picker.is_year_dropdown_open());
    }

    #[test]
    fn test_select_year_out_of_range_ignored() {
        let (mut picker, _) = recording_picker(None, DateFormat::default());
        picker.toggle_year_dropdown();
        assert!(!picker.select_year(1899));
        assert!(!picker.select_year(2027));
        assert_eq!(picker.cursor().year(), 2026);
        assert!(picker.is_year_dropdown_open());
    }

    #[test]
    fn test_year_options_span() {
        let (picker, _) = recording_picker(None, DateFormat::default());
        let years = picker.year_options();
        assert_eq!(years[0], 2026);
        assert_eq!(*years.last().unwrap(), 1900);
    }

    #[test]
    fn test_open_near_bottom_places_above() {
        let (mut picker, _) = recording_picker(None, DateFormat::default());
        picker.open(Rect::new(100.0, 600.0, 256.0, 40.0), 320.0, VIEWPORT);
        assert_eq!(picker.placement().vertical, VerticalSide::Above);
        assert_eq!(picker.placement().horizontal, HorizontalAlign::Start);
    }

    #[test]
    fn test_placement_recomputed_on_every_open() {
        let (mut picker, _) = recording_picker(None, DateFormat::default());
        picker.open(Rect::new(900.0, 600.0, 100.0, 40.0), 320.0, VIEWPORT);
        assert_eq!(picker.placement().horizontal, HorizontalAlign::End);
        picker.close();
        open_default(&mut picker);
        assert_eq!(picker.placement(), PopoverPlacement::default());
    }

    #[test]
    fn test_toggle_flips_open_state() {
        let anchor = Rect::new(100.0, 100.0, 256.0, 40.0);
        let (mut picker, _) = recording_picker(None, DateFormat::default());
        assert!(picker.toggle(anchor, 320.0, VIEWPORT));
        assert!(!picker.toggle(anchor, 320.0, VIEWPORT));
    }

    #[test]
    fn test_escape_closes_only_when_open() {
        let (mut picker, _) = recording_picker(None, DateFormat::default());
        assert!(!picker.handle_key(Key::Escape));
        open_default(&mut picker);
        assert!(!picker.handle_key(Key::Left));
        assert!(picker.handle_key(Key::Escape));
        assert!(!picker.is_open());
    }

    #[test]
    fn test_outside_click_closes_popover_and_dropdown() {
        let (mut picker, _) = recording_picker(None, DateFormat::default());
        open_default(&mut picker);
        picker.toggle_year_dropdown();

        picker.handle_pointer(ClickTarget::Popover);
        picker.handle_pointer(ClickTarget::Input);
        assert!(picker.is_open());
        assert!(picker.is_year_dropdown_open());

        picker.handle_pointer(ClickTarget::Outside);
        assert!(!picker.is_open());
        assert!(!picker.is_year_dropdown_open());
    }

    #[test]
    fn test_highlighted_day_prefers_selection_then_today() {
        let (mut picker, _) = recording_picker(None, DateFormat::default());
        assert_eq!(picker.highlighted_day(), Some(19));
        pick(&mut picker, 3);
        assert_eq!(picker.highlighted_day(), Some(3));
        picker.next_month();
        assert_eq!(picker.highlighted_day(), None);
    }

    #[test]
    fn test_labels() {
        let (picker, _) = recording_picker(Some(ymd(2024, 2, 1)), DateFormat::default());
        assert_eq!(picker.day_label(29), "Select 2/29/2024");
        assert_eq!(year_label(1990), "Select year 1990");
    }

    #[test]
    fn test_set_format_changes_rendering_only() {
        let (mut picker, _) = recording_picker(Some(ymd(2024, 1, 15)), DateFormat::default());
        assert_eq!(picker.display_text(), "15-01-2024");
        picker.set_format(DateFormat::YearMonthDaySlash);
        assert_eq!(picker.display_text(), "2024/01/15");
        assert_eq!(picker.selected(), Some(ymd(2024, 1, 15)));
    }
}
