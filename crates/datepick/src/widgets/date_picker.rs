//! Date picker widget: a read-only input that opens a calendar popover.
//!
//! All decisions (what is selected, which month is shown, where the popover
//! goes, how focus moves) live in [`DatePickerState`]; this module owns the
//! GTK widgets and redraws them from that state.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::{Local, NaiveDate};
use gtk4::prelude::*;
use gtk4::{
    Align, Box as GtkBox, Button, Entry, EntryIconPosition, EventControllerFocus,
    EventControllerKey, GestureClick, Grid, Label, Orientation, Overlay, PickFlags, Popover,
    PropagationPhase, ScrolledWindow, Stack, StackTransitionType, Widget, glib,
};
use tracing::debug;

use datepick_core::calendar::WEEKDAY_LABELS;
use datepick_core::keyboard::{
    Key, YEAR_GRID_COLUMNS, day_grid_target, focus_trap_target, year_grid_target,
};
use datepick_core::picker::{select_day_and_notify, year_label};
use datepick_core::{
    ClickTarget, DateFormat, DatePickerProps, DatePickerState, SlideDirection,
};

use crate::styles::picker;
use crate::widgets::base::{
    anchor_geometry, apply_placement, configure_popover, map_key, popover_width,
};

/// Month slide duration in milliseconds.
const SLIDE_DURATION_MS: u32 = 200;

/// Height of the year dropdown before it scrolls.
const YEAR_DROPDOWN_HEIGHT: i32 = 200;

const CALENDAR_ICON: &str = "x-office-calendar-symbolic";

/// Input width in characters for date-only and date-time formats.
const INPUT_WIDTH_CHARS: i32 = 14;
const INPUT_WIDTH_CHARS_WITH_TIME: i32 = 22;

pub fn input_width_chars(format: DateFormat) -> i32 {
    if format.has_time() {
        INPUT_WIDTH_CHARS_WITH_TIME
    } else {
        INPUT_WIDTH_CHARS
    }
}

/// Arrow keys are consumed whenever focus is in a grid, including at an edge
/// with nowhere to go, so focus never leaves the grid.
pub fn grid_arrow_propagation(focus_in_grid: bool) -> glib::Propagation {
    if focus_in_grid {
        glib::Propagation::Stop
    } else {
        glib::Propagation::Proceed
    }
}

/// Map the month slide direction to a stack transition.
pub fn transition_for(direction: SlideDirection) -> StackTransitionType {
    match direction {
        SlideDirection::Forward => StackTransitionType::SlideLeft,
        SlideDirection::Backward => StackTransitionType::SlideRight,
    }
}

/// Handle to a date picker. Cloning shares the same widget.
#[derive(Clone)]
pub struct DatePicker {
    inner: Rc<Inner>,
}

struct Inner {
    state: RefCell<DatePickerState>,
    root: GtkBox,
    entry: Entry,
    popover: Popover,
    content: GtkBox,
    prev_button: Button,
    next_button: Button,
    month_label: Label,
    year_button: Button,
    days_stack: Stack,
    day_buttons: RefCell<Vec<Button>>,
    year_scroller: ScrolledWindow,
    year_buttons: RefCell<Vec<(i32, Button)>>,
    page_serial: Cell<u32>,
    /// Set until the next idle after a pointer press on the input or a
    /// popover close, so the resulting focus-in does not toggle again.
    suppress_focus_toggle: Cell<bool>,
}

impl DatePicker {
    /// Build the widget. `props.on_date_change` runs on every selection.
    pub fn new(props: DatePickerProps) -> Self {
        let today: NaiveDate = Local::now().date_naive();
        let state = DatePickerState::new(props, today);

        let root = GtkBox::new(Orientation::Horizontal, 0);
        root.add_css_class(picker::ROOT);
        root.set_halign(Align::Start);

        let entry = Entry::new();
        entry.add_css_class(picker::INPUT);
        entry.set_editable(false);
        entry.set_width_chars(input_width_chars(state.format()));
        entry.set_secondary_icon_name(Some(CALENDAR_ICON));
        entry.set_secondary_icon_activatable(true);
        root.append(&entry);

        // Header: prev, month name, year toggle, next
        let header = GtkBox::new(Orientation::Horizontal, 4);
        header.add_css_class(picker::HEADER);

        let prev_button = Button::from_icon_name("go-previous-symbolic");
        prev_button.add_css_class(picker::NAV_BUTTON);
        prev_button.update_property(&[gtk4::accessible::Property::Label("Previous month")]);

        let month_label = Label::new(None);
        month_label.add_css_class(picker::MONTH_LABEL);

        let year_button = Button::new();
        year_button.add_css_class(picker::YEAR_TOGGLE);

        let title = GtkBox::new(Orientation::Horizontal, 4);
        title.set_hexpand(true);
        title.set_halign(Align::Center);
        title.append(&month_label);
        title.append(&year_button);

        let next_button = Button::from_icon_name("go-next-symbolic");
        next_button.add_css_class(picker::NAV_BUTTON);
        next_button.update_property(&[gtk4::accessible::Property::Label("Next month")]);

        header.append(&prev_button);
        header.append(&title);
        header.append(&next_button);

        // Weekday labels stay put while the day grid slides
        let weekdays = Grid::new();
        weekdays.set_column_homogeneous(true);
        for (col, name) in WEEKDAY_LABELS.iter().enumerate() {
            let label = Label::new(Some(name));
            label.add_css_class(picker::WEEKDAY);
            weekdays.attach(&label, col as i32, 0, 1, 1);
        }

        let days_stack = Stack::new();
        days_stack.set_transition_duration(SLIDE_DURATION_MS);
        days_stack.set_hhomogeneous(true);
        days_stack.set_vhomogeneous(false);

        let year_scroller = ScrolledWindow::new();
        year_scroller.add_css_class(picker::YEARS);
        year_scroller.set_policy(gtk4::PolicyType::Never, gtk4::PolicyType::Automatic);
        year_scroller.set_min_content_height(YEAR_DROPDOWN_HEIGHT);
        year_scroller.set_max_content_height(YEAR_DROPDOWN_HEIGHT);
        year_scroller.set_valign(Align::Start);
        year_scroller.set_visible(false);

        let body = Overlay::new();
        let days_column = GtkBox::new(Orientation::Vertical, 4);
        days_column.append(&weekdays);
        days_column.append(&days_stack);
        body.set_child(Some(&days_column));
        body.add_overlay(&year_scroller);

        let content = GtkBox::new(Orientation::Vertical, 8);
        content.append(&header);
        content.append(&body);

        let popover = Popover::new();
        configure_popover(&popover);
        popover.set_child(Some(&content));
        popover.set_parent(&root);

        let picker = Self {
            inner: Rc::new(Inner {
                state: RefCell::new(state),
                root,
                entry,
                popover,
                content,
                prev_button,
                next_button,
                month_label,
                year_button,
                days_stack,
                day_buttons: RefCell::new(Vec::new()),
                year_scroller,
                year_buttons: RefCell::new(Vec::new()),
                page_serial: Cell::new(0),
                suppress_focus_toggle: Cell::new(false),
            }),
        };

        picker.build_year_grid();
        picker.connect_signals();
        picker.refresh_input();
        picker.refresh_header();
        picker.render_month();

        picker
    }

    pub fn widget(&self) -> &GtkBox {
        &self.inner.root
    }

    pub fn selected(&self) -> Option<NaiveDate> {
        self.inner.state.borrow().selected()
    }

    /// Switch display format; used on config reload.
    pub fn set_format(&self, format: DateFormat) {
        self.inner.state.borrow_mut().set_format(format);
        self.refresh_input();
        debug!("Date picker format set to {}", format);
    }

    fn connect_signals(&self) {
        let inner = &self.inner;

        // Pointer press on the input opens. Capture phase runs before the
        // entry grabs focus.
        let click = GestureClick::new();
        click.set_propagation_phase(PropagationPhase::Capture);
        {
            let this = self.clone();
            click.connect_pressed(move |_, _, _, _| {
                this.inner.state.borrow_mut().handle_pointer(ClickTarget::Input);
                this.suppress_focus_toggle_until_idle();
                this.open();
            });
        }
        inner.entry.add_controller(click);

        {
            let this = self.clone();
            inner.entry.connect_icon_press(move |_, position| {
                if position == EntryIconPosition::Secondary {
                    this.open();
                }
            });
        }

        // Keyboard focus arriving on the input toggles
        let focus = EventControllerFocus::new();
        {
            let this = self.clone();
            focus.connect_enter(move |_| {
                if this.inner.suppress_focus_toggle.get() {
                    return;
                }
                this.toggle();
            });
        }
        inner.entry.add_controller(focus);

        {
            let this = self.clone();
            inner.prev_button.connect_clicked(move |_| {
                this.inner.state.borrow_mut().prev_month();
                this.refresh_header();
                this.render_month();
            });
        }
        {
            let this = self.clone();
            inner.next_button.connect_clicked(move |_| {
                this.inner.state.borrow_mut().next_month();
                this.refresh_header();
                this.render_month();
            });
        }
        {
            let this = self.clone();
            inner.year_button.connect_clicked(move |_| {
                this.inner.state.borrow_mut().toggle_year_dropdown();
                this.refresh_year_dropdown();
            });
        }

        // Autohide covers presses outside; any close path funnels through here
        {
            let this = self.clone();
            inner.popover.connect_closed(move |_| {
                this.inner.state.borrow_mut().handle_pointer(ClickTarget::Outside);
                this.refresh_year_dropdown();
                this.suppress_focus_toggle_until_idle();
            });
        }

        // Presses inside the popover but outside the dropdown close the dropdown
        let inside_click = GestureClick::new();
        inside_click.set_propagation_phase(PropagationPhase::Capture);
        {
            let this = self.clone();
            inside_click.connect_pressed(move |_, _, x, y| {
                this.inner.state.borrow_mut().handle_pointer(ClickTarget::Popover);
                this.close_dropdown_unless_hit(x, y);
            });
        }
        inner.content.add_controller(inside_click);

        let keys = EventControllerKey::new();
        {
            let this = self.clone();
            keys.connect_key_pressed(move |_, keyval, _keycode, modifiers| {
                this.handle_key(map_key(keyval, modifiers))
            });
        }
        inner.popover.add_controller(keys);
    }

    fn suppress_focus_toggle_until_idle(&self) {
        self.inner.suppress_focus_toggle.set(true);
        let this = self.clone();
        glib::idle_add_local_once(move || {
            this.inner.suppress_focus_toggle.set(false);
        });
    }

    fn open(&self) {
        let inner = &self.inner;
        if inner.state.borrow().is_open() {
            return;
        }
        let Some((anchor, viewport)) = anchor_geometry(&inner.entry) else {
            debug!("Date picker not realized yet, ignoring open");
            return;
        };
        let width = popover_width(&inner.popover);
        inner.state.borrow_mut().open(anchor, width, viewport);
        self.show_popover();
    }

    fn toggle(&self) {
        let inner = &self.inner;
        let Some((anchor, viewport)) = anchor_geometry(&inner.entry) else {
            return;
        };
        let width = popover_width(&inner.popover);
        let open = inner.state.borrow_mut().toggle(anchor, width, viewport);
        if open {
            self.show_popover();
        } else {
            inner.popover.popdown();
        }
    }

    fn show_popover(&self) {
        let inner = &self.inner;
        apply_placement(&inner.popover, inner.state.borrow().placement());
        self.refresh_year_dropdown();
        inner.popover.popup();
    }

    fn select_day(&self, day: u32) {
        if select_day_and_notify(&self.inner.state, day).is_some() {
            self.refresh_input();
            self.refresh_highlight();
            self.inner.popover.popdown();
        }
    }

    fn select_year(&self, year: i32) {
        if self.inner.state.borrow_mut().select_year(year) {
            self.refresh_header();
            self.render_month();
            self.refresh_year_dropdown();
            self.inner.year_button.grab_focus();
        }
    }

    fn close_dropdown_unless_hit(&self, x: f64, y: f64) {
        let inner = &self.inner;
        if !inner.state.borrow().is_year_dropdown_open() {
            return;
        }
        let Some(hit) = inner.content.pick(x, y, PickFlags::DEFAULT) else {
            return;
        };
        let in_dropdown = hit.is_ancestor(&inner.year_scroller)
            || hit == *inner.year_scroller.upcast_ref::<Widget>();
        let on_toggle = hit.is_ancestor(&inner.year_button)
            || hit == *inner.year_button.upcast_ref::<Widget>();
        if !in_dropdown && !on_toggle {
            inner.state.borrow_mut().toggle_year_dropdown();
            self.refresh_year_dropdown();
        }
    }

    fn handle_key(&self, key: Key) -> glib::Propagation {
        match key {
            Key::Escape => {
                if self.inner.state.borrow_mut().handle_key(key) {
                    self.inner.popover.popdown();
                    self.inner.entry.grab_focus();
                    return glib::Propagation::Stop;
                }
                glib::Propagation::Proceed
            }
            Key::Tab { backward } => {
                let focusables = self.focusables();
                let active = focusables.iter().find(|w| w.has_focus()).cloned();
                match focus_trap_target(&focusables, active.as_ref(), backward) {
                    Some(target) => {
                        target.grab_focus();
                        glib::Propagation::Stop
                    }
                    None => glib::Propagation::Proceed,
                }
            }
            Key::Up | Key::Down | Key::Left | Key::Right => self.move_grid_focus(key),
            Key::Other => glib::Propagation::Proceed,
        }
    }

    /// Arrow keys move between days, or between years while the dropdown is open.
    fn move_grid_focus(&self, key: Key) -> glib::Propagation {
        let inner = &self.inner;

        if inner.state.borrow().is_year_dropdown_open() {
            let buttons = inner.year_buttons.borrow();
            let current = buttons.iter().position(|(_, b)| b.has_focus());
            if let Some(target) =
                current.and_then(|idx| year_grid_target(buttons.len(), idx, key))
            {
                buttons[target].1.grab_focus();
            }
            return grid_arrow_propagation(current.is_some());
        }

        let grid = inner.state.borrow().grid();
        let buttons = inner.day_buttons.borrow();
        let current = buttons.iter().position(|b| b.has_focus());
        if let Some(target) = current.and_then(|idx| day_grid_target(grid, idx, key)) {
            buttons[target].grab_focus();
        }
        grid_arrow_propagation(current.is_some())
    }

    /// Controls that Tab cycles through, in visual order.
    fn focusables(&self) -> Vec<Widget> {
        let inner = &self.inner;
        let mut widgets: Vec<Widget> = vec![
            inner.prev_button.clone().upcast(),
            inner.year_button.clone().upcast(),
            inner.next_button.clone().upcast(),
        ];
        if inner.state.borrow().is_year_dropdown_open() {
            widgets.extend(
                inner
                    .year_buttons
                    .borrow()
                    .iter()
                    .map(|(_, b)| b.clone().upcast::<Widget>()),
            );
        } else {
            widgets.extend(
                inner
                    .day_buttons
                    .borrow()
                    .iter()
                    .map(|b| b.clone().upcast::<Widget>()),
            );
        }
        widgets
    }

    fn refresh_input(&self) {
        let state = self.inner.state.borrow();
        self.inner.entry.set_text(&state.display_text());
        self.inner.entry.set_placeholder_text(Some(state.placeholder()));
        self.inner
            .entry
            .set_width_chars(input_width_chars(state.format()));
    }

    fn refresh_header(&self) {
        let cursor = self.inner.state.borrow().cursor();
        self.inner.month_label.set_label(cursor.month_name());
        self.inner.year_button.set_label(&cursor.year().to_string());

        for (year, button) in self.inner.year_buttons.borrow().iter() {
            if *year == cursor.year() {
                button.add_css_class(picker::CURRENT);
            } else {
                button.remove_css_class(picker::CURRENT);
            }
        }
    }

    /// Build a grid page for the displayed month and slide it in.
    fn render_month(&self) {
        let inner = &self.inner;
        let (grid_layout, direction, cursor) = {
            let state = inner.state.borrow();
            (state.grid(), state.direction(), state.cursor())
        };

        let grid = Grid::new();
        grid.add_css_class(picker::DAYS);
        grid.set_column_homogeneous(true);
        grid.set_row_spacing(2);
        grid.set_column_spacing(2);

        let mut buttons = Vec::with_capacity(grid_layout.days as usize);
        for day in 1..=grid_layout.days {
            let (row, col) = grid_layout.cell(day);
            let button = Button::with_label(&day.to_string());
            button.add_css_class(picker::DAY_BUTTON);
            let label = inner.state.borrow().day_label(day);
            button.update_property(&[gtk4::accessible::Property::Label(&label)]);
            {
                let this = self.clone();
                button.connect_clicked(move |_| this.select_day(day));
            }
            grid.attach(&button, col as i32, row as i32, 1, 1);
            buttons.push(button);
        }
        *inner.day_buttons.borrow_mut() = buttons;
        self.refresh_highlight();

        // Keep only the page currently on screen so it can slide out
        let visible = inner.days_stack.visible_child();
        let mut child = inner.days_stack.first_child();
        while let Some(page) = child {
            child = page.next_sibling();
            if Some(&page) != visible.as_ref() {
                inner.days_stack.remove(&page);
            }
        }

        let serial = inner.page_serial.get().wrapping_add(1);
        inner.page_serial.set(serial);
        let name = format!("{}-{}-{}", cursor.year(), cursor.month0(), serial);
        inner.days_stack.add_named(&grid, Some(&name));
        inner
            .days_stack
            .set_visible_child_full(&name, transition_for(direction));
        debug!(
            "Rendered {} {} ({:?})",
            cursor.month_name(),
            cursor.year(),
            direction
        );
    }

    fn refresh_highlight(&self) {
        let highlighted = self.inner.state.borrow().highlighted_day();
        for (idx, button) in self.inner.day_buttons.borrow().iter().enumerate() {
            if highlighted == Some(idx as u32 + 1) {
                button.add_css_class(picker::SELECTED);
            } else {
                button.remove_css_class(picker::SELECTED);
            }
        }
    }

    fn build_year_grid(&self) {
        let inner = &self.inner;
        let grid = Grid::new();
        grid.set_column_homogeneous(true);
        grid.set_row_spacing(2);
        grid.set_column_spacing(2);

        let years = inner.state.borrow().year_options();
        let mut buttons = Vec::with_capacity(years.len());
        for (idx, year) in years.into_iter().enumerate() {
            let button = Button::with_label(&year.to_string());
            button.add_css_class(picker::YEAR_BUTTON);
            button.update_property(&[gtk4::accessible::Property::Label(&year_label(year))]);
            {
                let this = self.clone();
                button.connect_clicked(move |_| this.select_year(year));
            }
            let col = (idx % YEAR_GRID_COLUMNS) as i32;
            let row = (idx / YEAR_GRID_COLUMNS) as i32;
            grid.attach(&button, col, row, 1, 1);
            buttons.push((year, button));
        }
        *inner.year_buttons.borrow_mut() = buttons;
        inner.year_scroller.set_child(Some(&grid));
    }

    fn refresh_year_dropdown(&self) {
        let inner = &self.inner;
        let open = inner.state.borrow().is_year_dropdown_open();
        inner.year_scroller.set_visible(open);
        if !open {
            return;
        }

        let year = inner.state.borrow().cursor().year();
        let buttons = inner.year_buttons.borrow();
        if let Some((_, button)) = buttons.iter().find(|(y, _)| *y == year) {
            button.grab_focus();
        }
    }
}
