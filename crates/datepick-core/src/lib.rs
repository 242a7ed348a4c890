//! Core logic for datepick.
//!
//! Everything here is free of GTK so it can be unit tested directly: calendar
//! arithmetic, display formats, keyboard focus movement, popover placement,
//! the date picker state machine, theme state and its persistence, and the
//! configuration schema.

pub mod calendar;
pub mod config;
pub mod error;
pub mod format;
pub mod keyboard;
pub mod logging;
pub mod picker;
pub mod placement;
pub mod storage;
pub mod theme;

pub use calendar::{CalendarCursor, MonthGrid, SlideDirection};
pub use config::Config;
pub use error::{Error, Result};
pub use format::{DateFormat, format_for_backend};
pub use picker::{ClickTarget, DatePickerProps, DatePickerState};
pub use placement::{HorizontalAlign, PopoverPlacement, Rect, VerticalSide, Viewport};
pub use storage::{FileStore, MemoryStore, PreferenceStore};
pub use theme::{Theme, ThemeMode, ThemePalette, ThemeProvider, ThemeState};
