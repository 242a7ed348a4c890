//! Light/dark theme state.
//!
//! `ThemeState` holds the active theme and writes it through to a
//! [`PreferenceStore`]. `ThemeProvider` wraps it in the single per-thread
//! scope the UI reads from, and notifies subscribers on every change.
//! `ThemePalette` turns a theme into CSS variables.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::storage::PreferenceStore;

/// Storage key for the persisted theme.
pub const THEME_KEY: &str = "theme";

/// CSS class applied to every window while the dark theme is active.
pub const DARK_CLASS: &str = "dark";

// Default colors
const LIGHT_BACKGROUND: &str = "#ffffff";
const LIGHT_SURFACE: &str = "#ffffff";
const LIGHT_HEADER: &str = "#f4f4f5";
const LIGHT_FOREGROUND: &str = "#000000";
const LIGHT_NAVBAR: &str = "#6366f1";
const DARK_BACKGROUND: &str = "#09090b";
const DARK_SURFACE: &str = "#111827";
const DARK_HEADER: &str = "#030712";
const DARK_FOREGROUND: &str = "#ffffff";
const DARK_NAVBAR: &str = "#4f46e5";
const ACCENT: &str = "#3b82f6";

// Overlay opacities for hover/selected states
const HOVER_OPACITY_LIGHT: f64 = 0.10;
const HOVER_OPACITY_DARK: f64 = 0.12;
const BORDER_OPACITY_LIGHT: f64 = 0.15;
const BORDER_OPACITY_DARK: f64 = 0.10;
const SHADOW_OPACITY_LIGHT: f64 = 0.15;
const SHADOW_OPACITY_DARK: f64 = 0.40;
const FOREGROUND_MUTED_OPACITY: f64 = 0.7;

/// The active color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Label for a control that switches away from this theme.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Light => "Switch to Dark Mode",
            Theme::Dark => "Switch to Light Mode",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(Error::UnknownTheme(other.to_string())),
        }
    }
}

/// How the initial theme is chosen when nothing is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Follow the desktop's dark preference.
    #[default]
    System,
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::System => "system",
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

/// Pick the starting theme.
///
/// A valid persisted value always wins. Otherwise a forced mode applies,
/// and `System` falls back to the desktop preference.
pub fn resolve_initial_theme(
    persisted: Option<&str>,
    mode: ThemeMode,
    system_prefers_dark: bool,
) -> Theme {
    if let Some(value) = persisted {
        match value.parse::<Theme>() {
            Ok(theme) => return theme,
            Err(e) => debug!("Ignoring persisted theme: {}", e),
        }
    }

    match mode {
        ThemeMode::Light => Theme::Light,
        ThemeMode::Dark => Theme::Dark,
        ThemeMode::System if system_prefers_dark => Theme::Dark,
        ThemeMode::System => Theme::Light,
    }
}

/// Active theme plus the store it is written through to.
pub struct ThemeState {
    theme: Theme,
    store: Box<dyn PreferenceStore>,
}

impl ThemeState {
    /// Read the persisted preference and resolve the starting theme.
    ///
    /// The resolved value is written back immediately so the store always
    /// reflects what is on screen.
    pub fn initialize(
        store: Box<dyn PreferenceStore>,
        mode: ThemeMode,
        system_prefers_dark: bool,
    ) -> Self {
        let persisted = store.get(THEME_KEY);
        let theme = resolve_initial_theme(persisted.as_deref(), mode, system_prefers_dark);
        debug!(
            "Initial theme {} (persisted={:?}, mode={}, system_dark={})",
            theme,
            persisted,
            mode.as_str(),
            system_prefers_dark
        );

        let mut state = Self { theme, store };
        state.persist();
        state
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Flip the theme and persist it. Returns the new theme.
    pub fn toggle(&mut self) -> Theme {
        self.set(self.theme.toggled());
        self.theme
    }

    pub fn set(&mut self, theme: Theme) {
        self.theme = theme;
        self.persist();
    }

    /// Persisted value as currently stored.
    pub fn persisted(&self) -> Option<String> {
        self.store.get(THEME_KEY)
    }

    fn persist(&mut self) {
        // Storage failures leave the in-memory theme authoritative.
        if let Err(e) = self.store.set(THEME_KEY, self.theme.as_str()) {
            warn!("Failed to persist theme preference: {}", e);
        }
    }
}

type ThemeListener = Rc<dyn Fn(Theme)>;

thread_local! {
    static THEME_PROVIDER_INSTANCE: RefCell<Option<Rc<ThemeProvider>>> = const { RefCell::new(None) };
}

/// The tab-wide theme scope.
///
/// Created once at startup with [`ThemeProvider::init_global`] and never torn
/// down. Reading it before that is a programming error.
pub struct ThemeProvider {
    state: RefCell<ThemeState>,
    listeners: RefCell<Vec<ThemeListener>>,
}

impl ThemeProvider {
    fn new(state: ThemeState) -> Rc<Self> {
        Rc::new(Self {
            state: RefCell::new(state),
            listeners: RefCell::new(Vec::new()),
        })
    }

    /// Install the provider for this thread.
    ///
    /// Returns the existing provider if one is already installed.
    pub fn init_global(state: ThemeState) -> Rc<Self> {
        THEME_PROVIDER_INSTANCE.with(|cell| {
            let mut opt = cell.borrow_mut();
            if let Some(existing) = opt.as_ref() {
                warn!("ThemeProvider already initialized, ignoring init_global call");
                return existing.clone();
            }
            let provider = ThemeProvider::new(state);
            *opt = Some(provider.clone());
            provider
        })
    }

    /// Get the provider.
    ///
    /// Panics if `init_global` hasn't been called.
    pub fn global() -> Rc<Self> {
        match Self::try_global() {
            Ok(provider) => provider,
            Err(e) => panic!("{}", e),
        }
    }

    /// Get the provider, or [`Error::ThemeProviderMissing`] outside its scope.
    pub fn try_global() -> Result<Rc<Self>> {
        THEME_PROVIDER_INSTANCE.with(|cell| cell.borrow().clone().ok_or(Error::ThemeProviderMissing))
    }

    pub fn theme(&self) -> Theme {
        self.state.borrow().theme()
    }

    /// Flip the theme, persist it and notify subscribers.
    pub fn toggle(&self) -> Theme {
        let theme = self.state.borrow_mut().toggle();
        self.notify(theme);
        theme
    }

    /// Switch to `theme`, persist it and notify subscribers if it changed.
    pub fn set(&self, theme: Theme) {
        let changed = {
            let mut state = self.state.borrow_mut();
            let changed = state.theme() != theme;
            state.set(theme);
            changed
        };
        if changed {
            self.notify(theme);
        }
    }

    /// Subscribe to theme changes. The callback also runs once immediately
    /// with the current theme so subscribers can apply initial state.
    pub fn connect_changed<F>(&self, callback: F)
    where
        F: Fn(Theme) + 'static,
    {
        let callback: ThemeListener = Rc::new(callback);
        self.listeners.borrow_mut().push(callback.clone());
        callback(self.theme());
    }

    fn notify(&self, theme: Theme) {
        // Clone the list first so callbacks may read the provider or subscribe.
        let listeners: Vec<ThemeListener> = self.listeners.borrow().clone();
        debug!("Theme changed to {}, notifying {} listener(s)", theme, listeners.len());
        for listener in listeners {
            listener(theme);
        }
    }
}

/// Parse a hex color string to RGB tuple. Returns None if invalid.
pub fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let color = color.trim().trim_start_matches('#');

    // Expand shorthand (e.g., "fff" -> "ffffff")
    let color = if color.len() == 3 {
        color.chars().flat_map(|c| [c, c]).collect::<String>()
    } else {
        color.to_string()
    };

    if color.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(&color[0..2], 16).ok()?;
    let g = u8::from_str_radix(&color[2..4], 16).ok()?;
    let b = u8::from_str_radix(&color[4..6], 16).ok()?;

    Some((r, g, b))
}

/// Calculate relative luminance per WCAG formula (0.0 = black, 1.0 = white).
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    fn channel(c: u8) -> f64 {
        let c_srgb = c as f64 / 255.0;
        if c_srgb <= 0.03928 {
            c_srgb / 12.92
        } else {
            ((c_srgb + 0.055) / 1.055).powf(2.4)
        }
    }

    0.2126 * channel(r) + 0.7152 * channel(g) + 0.0722 * channel(b)
}

/// Return true if the color is considered dark (low luminance).
pub fn is_dark_color(color: &str) -> bool {
    match parse_hex_color(color) {
        Some((r, g, b)) => relative_luminance(r, g, b) < 0.179,
        None => true,
    }
}

/// Format an RGBA color string.
pub fn rgba_str(r: u8, g: u8, b: u8, a: f64) -> String {
    format!("rgba({}, {}, {}, {:.2})", r, g, b, a)
}

/// `color` at the given opacity, or the color unchanged if it can't be parsed.
fn with_opacity(color: &str, opacity: f64) -> String {
    match parse_hex_color(color) {
        Some((r, g, b)) => rgba_str(r, g, b, opacity),
        None => color.to_string(),
    }
}

/// Colors for one theme.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemePalette {
    pub theme: Theme,
    pub background: String,
    pub surface: String,
    pub surface_header: String,
    pub foreground: String,
    pub foreground_muted: String,
    pub navbar_background: String,
    pub accent: String,
    pub accent_text: String,
    pub hover_overlay: String,
    pub border: String,
    pub shadow: String,
}

impl ThemePalette {
    pub fn for_theme(theme: Theme) -> Self {
        let (background, surface, header, foreground, navbar) = match theme {
            Theme::Light => (
                LIGHT_BACKGROUND,
                LIGHT_SURFACE,
                LIGHT_HEADER,
                LIGHT_FOREGROUND,
                LIGHT_NAVBAR,
            ),
            Theme::Dark => (
                DARK_BACKGROUND,
                DARK_SURFACE,
                DARK_HEADER,
                DARK_FOREGROUND,
                DARK_NAVBAR,
            ),
        };
        let (hover, border, shadow) = match theme {
            Theme::Light => (HOVER_OPACITY_LIGHT, BORDER_OPACITY_LIGHT, SHADOW_OPACITY_LIGHT),
            Theme::Dark => (HOVER_OPACITY_DARK, BORDER_OPACITY_DARK, SHADOW_OPACITY_DARK),
        };

        let accent_text = if is_dark_color(ACCENT) {
            "#ffffff"
        } else {
            "#000000"
        };

        Self {
            theme,
            background: background.to_string(),
            surface: surface.to_string(),
            surface_header: header.to_string(),
            foreground: foreground.to_string(),
            foreground_muted: with_opacity(foreground, FOREGROUND_MUTED_OPACITY),
            navbar_background: navbar.to_string(),
            accent: ACCENT.to_string(),
            accent_text: accent_text.to_string(),
            hover_overlay: with_opacity(foreground, hover),
            border: with_opacity(foreground, border),
            shadow: rgba_str(0, 0, 0, shadow),
        }
    }

    /// CSS variable declarations scoped to `selector`.
    pub fn css_vars_block(&self, selector: &str) -> String {
        format!(
            r#"{selector} {{
    --color-background: {background};
    --color-surface: {surface};
    --color-surface-header: {header};
    --color-foreground: {foreground};
    --color-foreground-muted: {muted};
    --color-navbar: {navbar};
    --color-accent: {accent};
    --color-accent-text: {accent_text};
    --color-hover: {hover};
    --color-border: {border};
    --shadow-popover: 0 4px 12px {shadow};
}}
"#,
            selector = selector,
            background = self.background,
            surface = self.surface,
            header = self.surface_header,
            foreground = self.foreground,
            muted = self.foreground_muted,
            navbar = self.navbar_background,
            accent = self.accent,
            accent_text = self.accent_text,
            hover = self.hover_overlay,
            border = self.border,
            shadow = self.shadow,
        )
    }

    /// Variables for both themes: light on `base`, dark on `base.dark`.
    pub fn stylesheet(base: &str) -> String {
        let light = Self::for_theme(Theme::Light).css_vars_block(base);
        let dark = Self::for_theme(Theme::Dark).css_vars_block(&format!("{}.{}", base, DARK_CLASS));
        format!("{light}\n{dark}")
    }
}
