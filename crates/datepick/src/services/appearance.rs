//! Light/dark appearance glue between the theme provider and GTK.
//!
//! Reads the desktop's dark preference, installs the global
//! [`ThemeProvider`] with a file-backed store, and mirrors the active theme
//! onto every application window as the `dark` CSS class.

use std::rc::Rc;

use gtk4::prelude::*;
use tracing::{debug, info, warn};

use datepick_core::{
    Config, FileStore, MemoryStore, PreferenceStore, Theme, ThemeProvider, ThemeState,
};

use crate::styles::class;

/// Whether a `GTK_THEME` value requests the dark variant, e.g. `Adwaita:dark`.
pub fn gtk_theme_is_dark(value: &str) -> bool {
    value.trim().to_ascii_lowercase().ends_with(":dark")
}

/// Dark preference from the environment alone. Usable without a display.
pub fn env_prefers_dark() -> bool {
    std::env::var("GTK_THEME")
        .map(|value| gtk_theme_is_dark(&value))
        .unwrap_or(false)
}

/// Dark preference from GTK settings, falling back to the environment.
///
/// Must be read before [`apply_theme`] writes the setting back.
pub fn system_prefers_dark() -> bool {
    if env_prefers_dark() {
        return true;
    }
    match gtk4::Settings::default() {
        Some(settings) => settings.is_gtk_application_prefer_dark_theme(),
        None => false,
    }
}

/// Open the store the theme preference is persisted to.
///
/// Uses `theme.state_file` when set, otherwise the XDG state directory. When
/// neither is available the preference lives in memory for this run only.
pub fn open_store(config: &Config) -> Box<dyn PreferenceStore> {
    if let Some(path) = &config.theme.state_file {
        debug!("Theme preference stored at {}", path.display());
        return Box::new(FileStore::new(path));
    }
    match FileStore::at_default_location() {
        Some(store) => {
            debug!("Theme preference stored at {}", store.path().display());
            Box::new(store)
        }
        None => {
            warn!("No state directory available; theme preference will not persist");
            Box::new(MemoryStore::new())
        }
    }
}

/// Install the global theme provider for the GTK main thread.
pub fn init_theme_provider(config: &Config) -> Rc<ThemeProvider> {
    let system_dark = system_prefers_dark();
    let state = ThemeState::initialize(open_store(config), config.theme.mode, system_dark);
    info!(
        "Theme: {} (mode={}, system_dark={})",
        state.theme(),
        config.theme.mode.as_str(),
        system_dark
    );
    ThemeProvider::init_global(state)
}

/// Mirror `theme` onto every window of `app` and GTK's own dark setting.
pub fn apply_theme(app: &gtk4::Application, theme: Theme) {
    for window in app.windows() {
        apply_theme_to_window(&window, theme);
    }
    if let Some(settings) = gtk4::Settings::default() {
        settings.set_gtk_application_prefer_dark_theme(theme.is_dark());
    }
    debug!("Applied {} theme to {} window(s)", theme, app.windows().len());
}

pub fn apply_theme_to_window(window: &gtk4::Window, theme: Theme) {
    if theme.is_dark() {
        window.add_css_class(class::DARK);
    } else {
        window.remove_css_class(class::DARK);
    }
}
