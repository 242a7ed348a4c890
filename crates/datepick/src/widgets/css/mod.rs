//! CSS for the datepick window and widgets.
//!
//! CSS is organized into submodules by component:
//! - `base` - Window background, page body, focus rings
//! - `navbar` - Title bar and theme toggle
//! - `picker` - Date picker input, popover, day and year grids
//!
//! Colors come from CSS variables that [`ThemePalette::stylesheet`] declares
//! on `window` (light) and `window.dark` (dark), so switching theme is a
//! single class change on each window.

mod base;
mod navbar;
mod picker;

use datepick_core::ThemePalette;

/// Selector the palette variables are declared on.
pub const PALETTE_SELECTOR: &str = "window";

/// Generate the full application stylesheet.
pub fn app_css() -> String {
    let vars = ThemePalette::stylesheet(PALETTE_SELECTOR);
    format!(
        "{vars}\n{}\n{}\n{}",
        base::css(),
        navbar::css(),
        picker::css()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles;

    #[test]
    fn test_app_css_declares_both_palettes() {
        let css = app_css();
        assert!(css.contains("window {"));
        assert!(css.contains("window.dark {"));
        assert!(css.contains("--color-accent:"));
    }

    #[test]
    fn test_app_css_covers_style_classes() {
        let css = app_css();
        for class in [
            styles::class::APP_BODY,
            styles::class::HOST_STATUS,
            styles::picker::INPUT,
            styles::picker::POPOVER,
            styles::picker::DAY_BUTTON,
            styles::picker::YEAR_BUTTON,
            styles::picker::SELECTED,
            styles::navbar::ROOT,
            styles::navbar::THEME_TOGGLE,
        ] {
            assert!(
                css.contains(&format!(".{}", class)),
                "stylesheet is missing .{}",
                class
            );
        }
    }
}
