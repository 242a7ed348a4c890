//! Widget implementations for the datepick window.
//!
//! Each widget is a self-contained GTK4 component that owns its child
//! widgets and redraws them from state kept in `datepick_core`.

mod base;
mod date_picker;
mod navbar;

pub mod css;

pub use date_picker::DatePicker;
pub use navbar::Navbar;
