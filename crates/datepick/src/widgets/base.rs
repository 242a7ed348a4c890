//! Shared helpers for popovers and keyboard input.
//!
//! Geometry is measured here and handed to `datepick_core::placement`, which
//! decides where the popover goes; these helpers then translate the decision
//! back into GTK terms.

use gtk4::gdk;
use gtk4::prelude::*;
use gtk4::{Align, Popover, PositionType};
use tracing::debug;

use datepick_core::keyboard::Key;
use datepick_core::placement::POPOVER_DEFAULT_WIDTH_ESTIMATE;
use datepick_core::{HorizontalAlign, PopoverPlacement, Rect, VerticalSide, Viewport};

use crate::styles::picker;

/// Gap between the input and the popover (in pixels).
const POPOVER_OFFSET: i32 = 4;

/// Configure a popover with standard settings used across the application.
///
/// This applies:
/// - No arrow
/// - Autohide enabled, so presses outside close it
/// - `date-picker-popover` CSS class
/// - Below the anchor, left edges aligned (adjusted on every open)
pub fn configure_popover(popover: &Popover) {
    popover.set_has_arrow(false);
    popover.set_autohide(true);
    popover.add_css_class(picker::POPOVER);
    popover.set_position(PositionType::Bottom);
    popover.set_halign(Align::Start);
    popover.set_offset(0, POPOVER_OFFSET);
}

pub fn position_for(side: VerticalSide) -> PositionType {
    match side {
        VerticalSide::Below => PositionType::Bottom,
        VerticalSide::Above => PositionType::Top,
    }
}

pub fn align_for(align: HorizontalAlign) -> Align {
    match align {
        HorizontalAlign::Start => Align::Start,
        HorizontalAlign::End => Align::End,
    }
}

/// Apply a computed placement to a popover.
pub fn apply_placement(popover: &Popover, placement: PopoverPlacement) {
    let position = position_for(placement.vertical);
    let offset = match placement.vertical {
        VerticalSide::Below => POPOVER_OFFSET,
        VerticalSide::Above => -POPOVER_OFFSET,
    };
    popover.set_position(position);
    popover.set_halign(align_for(placement.horizontal));
    popover.set_offset(0, offset);
    debug!("Popover placed: {:?}", placement);
}

/// Measure `widget` relative to its window, and the window itself.
///
/// Returns None before the widget is realized inside a window.
pub fn anchor_geometry(widget: &impl IsA<gtk4::Widget>) -> Option<(Rect, Viewport)> {
    let widget = widget.upcast_ref::<gtk4::Widget>();
    let root = widget.root()?;
    let window = root.downcast_ref::<gtk4::Window>()?;
    let bounds = widget.compute_bounds(window)?;

    let anchor = Rect::new(
        bounds.x() as f64,
        bounds.y() as f64,
        bounds.width() as f64,
        bounds.height() as f64,
    );
    let viewport = Viewport {
        width: window.width() as f64,
        height: window.height() as f64,
    };
    Some((anchor, viewport))
}

/// Width the popover will occupy. Falls back to an estimate before the
/// first layout.
pub fn popover_width(popover: &Popover) -> f64 {
    let measured = popover.width();
    if measured > 0 {
        return measured as f64;
    }
    let (_, natural, _, _) = popover.measure(gtk4::Orientation::Horizontal, -1);
    if natural > 0 {
        natural as f64
    } else {
        POPOVER_DEFAULT_WIDTH_ESTIMATE
    }
}

/// Translate a GDK key press into the picker's key vocabulary.
pub fn map_key(keyval: gdk::Key, state: gdk::ModifierType) -> Key {
    match keyval {
        gdk::Key::Up | gdk::Key::KP_Up => Key::Up,
        gdk::Key::Down | gdk::Key::KP_Down => Key::Down,
        gdk::Key::Left | gdk::Key::KP_Left => Key::Left,
        gdk::Key::Right | gdk::Key::KP_Right => Key::Right,
        gdk::Key::Escape => Key::Escape,
        gdk::Key::ISO_Left_Tab => Key::Tab { backward: true },
        gdk::Key::Tab | gdk::Key::KP_Tab => Key::Tab {
            backward: state.contains(gdk::ModifierType::SHIFT_MASK),
        },
        _ => Key::Other,
    }
}
