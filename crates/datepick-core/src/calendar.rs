//! Calendar arithmetic for the month view.
//!
//! Months are zero-based (0 = January) throughout this module, matching the
//! indices GTK's own calendar uses. Weeks start on Sunday.

use chrono::{Datelike, NaiveDate};

/// Earliest year offered by the year dropdown.
pub const MIN_YEAR: i32 = 1900;

/// Short weekday headers, Sunday first.
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Direction of the last month change, used for the slide transition only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlideDirection {
    #[default]
    Forward,
    Backward,
}

/// The month/year currently shown in the popover.
///
/// Independent of the selected date: browsing months never changes the
/// selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarCursor {
    month0: u32,
    year: i32,
}

impl CalendarCursor {
    /// Create a cursor. Returns `None` if `month0` is not in `0..=11`.
    pub fn new(year: i32, month0: u32) -> Option<Self> {
        (month0 < 12).then_some(Self { month0, year })
    }

    /// Cursor showing the month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            month0: date.month0(),
            year: date.year(),
        }
    }

    pub fn month0(&self) -> u32 {
        self.month0
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Move to the next month, rolling December over into January.
    pub fn next(self) -> Self {
        if self.month0 == 11 {
            Self {
                month0: 0,
                year: self.year + 1,
            }
        } else {
            Self {
                month0: self.month0 + 1,
                year: self.year,
            }
        }
    }

    /// Move to the previous month, rolling January back into December.
    pub fn prev(self) -> Self {
        if self.month0 == 0 {
            Self {
                month0: 11,
                year: self.year - 1,
            }
        } else {
            Self {
                month0: self.month0 - 1,
                year: self.year,
            }
        }
    }

    /// Same month in another year.
    pub fn with_year(self, year: i32) -> Self {
        Self { year, ..self }
    }

    /// Build the date for `day` in this month, if it exists.
    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month0 + 1, day)
    }

    /// Whether `date` falls inside this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month0() == self.month0
    }

    /// Full English month name, e.g. "February".
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.month0 as usize]
    }

    pub fn days_in_month(&self) -> u32 {
        days_in_month(self.year, self.month0)
    }

    pub fn grid(&self) -> MonthGrid {
        MonthGrid::new(*self)
    }
}

/// Number of days in a zero-based month.
pub fn days_in_month(year: i32, month0: u32) -> u32 {
    let (next_year, next_month) = if month0 >= 11 {
        (year + 1, 1)
    } else {
        (year, month0 + 2)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

/// Weekday of the first of the month, Sunday = 0.
pub fn first_weekday(year: i32, month0: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month0 + 1, 1)
        .map(|d| d.weekday().num_days_from_sunday())
        .unwrap_or(0)
}

/// Layout of one month in a 7-column grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthGrid {
    /// Empty cells before day 1 (the weekday of the first, Sunday = 0).
    pub leading_blanks: u32,
    pub days: u32,
}

impl MonthGrid {
    pub fn new(cursor: CalendarCursor) -> Self {
        Self {
            leading_blanks: first_weekday(cursor.year, cursor.month0),
            days: days_in_month(cursor.year, cursor.month0),
        }
    }

    /// Grid cell (row, column) for a 1-based day.
    pub fn cell(&self, day: u32) -> (u32, u32) {
        let slot = self.leading_blanks + day - 1;
        (slot / 7, slot % 7)
    }

    /// Number of rows needed to show every day.
    pub fn rows(&self) -> u32 {
        (self.leading_blanks + self.days).div_ceil(7)
    }
}

/// Years offered by the dropdown, newest first, down to [`MIN_YEAR`].
pub fn year_options(current_year: i32) -> Vec<i32> {
    (MIN_YEAR.min(current_year)..=current_year).rev().collect()
}
