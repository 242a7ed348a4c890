//! Popover placement relative to the trigger input.
//!
//! Pure geometry with no toolkit dependencies. Coordinates are window-local
//! pixels with the origin at the top-left corner.

/// Minimum free space below the input before the popover flips above it.
pub const MIN_SPACE_BELOW: f64 = 300.0;

/// Estimated popover width when the real width is not yet measured.
pub const POPOVER_DEFAULT_WIDTH_ESTIMATE: f64 = 320.0;

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Size of the visible area the popover must fit in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Which side of the input the popover opens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalSide {
    #[default]
    Below,
    Above,
}

/// Horizontal alignment of the popover against the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlign {
    /// Left edges aligned; the popover extends to the right.
    #[default]
    Start,
    /// Right edges aligned; the popover extends to the left.
    End,
}

/// Where the popover is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PopoverPlacement {
    pub vertical: VerticalSide,
    pub horizontal: HorizontalAlign,
}

/// Compute placement from the space left around the input.
///
/// - Less than [`MIN_SPACE_BELOW`] pixels under the input: open above.
/// - Less than `popover_width` pixels right of the input: align right edges.
pub fn compute_placement(anchor: Rect, popover_width: f64, viewport: Viewport) -> PopoverPlacement {
    let space_below = viewport.height - anchor.bottom();
    let space_right = viewport.width - anchor.right();

    let vertical = if space_below < MIN_SPACE_BELOW {
        VerticalSide::Above
    } else {
        VerticalSide::Below
    };

    let horizontal = if popover_width > space_right {
        HorizontalAlign::End
    } else {
        HorizontalAlign::Start
    };

    PopoverPlacement {
        vertical,
        horizontal,
    }
}
