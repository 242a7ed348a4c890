//! Shared CSS class constants for datepick.
//!
//! This module centralizes all CSS class names used across the codebase,
//! making them discoverable and avoiding typos.
//!
//! # Usage
//!
//! ```ignore
//! use crate::styles::{class, picker};
//!
//! window.add_css_class(class::APP_WINDOW);
//! button.add_css_class(picker::DAY_BUTTON);
//! ```

/// Core structural/layout CSS classes.
pub mod class {
    /// Main application window (`.app-window`).
    pub const APP_WINDOW: &str = "app-window";

    /// Page body below the navbar (`.app-body`).
    pub const APP_BODY: &str = "app-body";

    /// Host status line under the picker (`.host-status`).
    pub const HOST_STATUS: &str = "host-status";

    /// Dark theme marker on every window. Mirrors `datepick_core::theme::DARK_CLASS`.
    pub const DARK: &str = datepick_core::theme::DARK_CLASS;
}

/// Date picker classes.
pub mod picker {
    /// Root container around input and icon (`.date-picker`).
    pub const ROOT: &str = "date-picker";

    /// Read-only text input (`.date-picker-input`).
    pub const INPUT: &str = "date-picker-input";

    /// Popover surface (`.date-picker-popover`).
    pub const POPOVER: &str = "date-picker-popover";

    /// Header row with month navigation (`.date-picker-header`).
    pub const HEADER: &str = "date-picker-header";

    /// Month name label (`.date-picker-month`).
    pub const MONTH_LABEL: &str = "date-picker-month";

    /// Year toggle button in the header (`.date-picker-year`).
    pub const YEAR_TOGGLE: &str = "date-picker-year";

    /// Round previous/next month buttons (`.date-picker-nav`).
    pub const NAV_BUTTON: &str = "date-picker-nav";

    /// Weekday header labels (`.date-picker-weekday`).
    pub const WEEKDAY: &str = "date-picker-weekday";

    /// Day grid (`.date-picker-days`).
    pub const DAYS: &str = "date-picker-days";

    /// Day buttons (`.day-button`).
    pub const DAY_BUTTON: &str = "day-button";

    /// Highlighted (selected or today) day (`.selected`).
    pub const SELECTED: &str = "selected";

    /// Year dropdown grid (`.date-picker-years`).
    pub const YEARS: &str = "date-picker-years";

    /// Year buttons (`.year-button`).
    pub const YEAR_BUTTON: &str = "year-button";

    /// Year matching the displayed year (`.current`).
    pub const CURRENT: &str = "current";
}

/// Navbar classes.
pub mod navbar {
    /// Navbar container (`.navbar`).
    pub const ROOT: &str = "navbar";

    /// App title (`.navbar-title`).
    pub const TITLE: &str = "navbar-title";

    /// Theme toggle button (`.theme-toggle`).
    pub const THEME_TOGGLE: &str = "theme-toggle";
}
