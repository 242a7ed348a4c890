//! Configuration types and parsing.
//!
//! This module defines the application configuration schema. The Config type
//! is intended to be a stable, serialization-friendly schema; derived values
//! (theme palettes, picker state) live in their own modules.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use toml::Table;

use crate::error::{Error, Result};
use crate::format::{DateFormat, parse_backend_date};
use crate::theme::ThemeMode;
use chrono::NaiveDate;

/// Embedded default configuration TOML, compiled into the binary.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../../config.toml");

/// Smallest window the picker popover fits into.
const MIN_WINDOW_WIDTH: u32 = 360;
const MIN_WINDOW_HEIGHT: u32 = 240;

/// Result of loading a configuration file.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Path where config was found, if any.
    pub source: Option<PathBuf>,
    /// Whether defaults were used (no config file found).
    pub used_defaults: bool,
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Date picker configuration.
    pub picker: PickerConfig,

    /// Theme configuration.
    pub theme: ThemeConfig,

    /// Host window configuration.
    pub window: WindowConfig,
}

impl Config {
    /// Load configuration from the embedded default TOML string.
    pub fn from_default_toml() -> Result<Self> {
        let config: Config = toml::from_str(DEFAULT_CONFIG_TOML)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, merging with embedded defaults.
    ///
    /// Returns an error if the file doesn't exist or can't be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::load_with_defaults(&content)
    }

    /// Parse a TOML string, deep-merged over the embedded defaults (user values win).
    pub fn load_with_defaults(user_toml: &str) -> Result<Self> {
        let mut base: Table = toml::from_str(DEFAULT_CONFIG_TOML)?;
        let user: Table = toml::from_str(user_toml)?;

        deep_merge_toml(&mut base, user);

        let config: Config = base.try_into()?;
        Ok(config)
    }

    /// Find and load configuration using the XDG lookup chain.
    ///
    /// If `explicit_path` is `Some`, that path is used directly and an error
    /// is returned if it doesn't exist or can't be parsed (no fallback).
    ///
    /// If `explicit_path` is `None`, searches in order:
    /// 1. `$XDG_CONFIG_HOME/datepick/config.toml`
    /// 2. `~/.config/datepick/config.toml`
    /// 3. `./config.toml` (current working directory)
    ///
    /// If no config file is found, the embedded defaults are used. A file that
    /// exists but fails to load is an error, never a silent fallback.
    pub fn find_and_load(explicit_path: Option<&Path>) -> Result<ConfigLoadResult> {
        if let Some(path) = explicit_path {
            let config = Self::load(path)?;
            return Ok(ConfigLoadResult {
                config,
                source: Some(path.to_path_buf()),
                used_defaults: false,
            });
        }

        let search_paths = Self::config_search_paths();

        for path in &search_paths {
            if path.exists() {
                return match Self::load(path) {
                    Ok(config) => Ok(ConfigLoadResult {
                        config,
                        source: Some(path.clone()),
                        used_defaults: false,
                    }),
                    Err(e) => {
                        tracing::error!("Config file {:?} exists but failed to load: {}", path, e);
                        Err(e)
                    }
                };
            }
        }

        tracing::info!("No config file found, using built-in default config");
        tracing::debug!(
            "Searched: {}",
            search_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(ConfigLoadResult {
            config: Self::from_default_toml()?,
            source: None,
            used_defaults: true,
        })
    }

    /// Get the list of paths to search for config files.
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg_config).join("datepick/config.toml"));
        }

        if let Ok(home) = env::var("HOME") {
            paths.push(PathBuf::from(home).join(".config/datepick/config.toml"));
        }

        paths.push(PathBuf::from("config.toml"));

        paths
    }

    /// Validate the configuration, collecting every invalid value.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if let Some(ref initial) = self.picker.initial_date
            && let Err(e) = parse_backend_date(initial)
        {
            errors.push(format!(
                "picker.initial_date: {}, expected YYYY-MM-DD",
                e
            ));
        }

        if self.window.width < MIN_WINDOW_WIDTH {
            errors.push(format!(
                "window.width: {} is too small, must be at least {}",
                self.window.width, MIN_WINDOW_WIDTH
            ));
        }

        if self.window.height < MIN_WINDOW_HEIGHT {
            errors.push(format!(
                "window.height: {} is too small, must be at least {}",
                self.window.height, MIN_WINDOW_HEIGHT
            ));
        }

        if self.window.title.trim().is_empty() {
            errors.push("window.title: must not be empty".to_string());
        }

        if let Some(ref path) = self.theme.state_file
            && path.as_os_str().is_empty()
        {
            errors.push("theme.state_file: must not be empty when set".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::ConfigValidation(errors))
        }
    }

    /// Human-readable summary of the configuration.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        lines.push("Picker:".to_string());
        lines.push(format!("  format: {}", self.picker.format));
        match self.picker.initial_date {
            Some(ref date) => lines.push(format!("  initial_date: {}", date)),
            None => lines.push("  initial_date: (none)".to_string()),
        }

        lines.push("\nTheme:".to_string());
        lines.push(format!("  mode: {}", self.theme.mode.as_str()));
        match self.theme.state_file {
            Some(ref path) => lines.push(format!("  state_file: {}", path.display())),
            None => lines.push("  state_file: (default)".to_string()),
        }

        lines.push("\nWindow:".to_string());
        lines.push(format!("  title: {}", self.window.title));
        lines.push(format!("  size: {}x{}", self.window.width, self.window.height));

        lines.join("\n")
    }
}

/// Deep merge two TOML tables, with `overlay` values taking precedence.
///
/// For nested tables, recursively merges. For arrays and other values,
/// the overlay value completely replaces the base value.
fn deep_merge_toml(base: &mut Table, overlay: Table) {
    for (key, overlay_value) in overlay {
        match (base.get_mut(&key), overlay_value) {
            (Some(toml::Value::Table(base_table)), toml::Value::Table(overlay_table)) => {
                deep_merge_toml(base_table, overlay_table);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Date picker configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PickerConfig {
    /// Display format token, e.g. "dd/MM/yyyy".
    pub format: DateFormat,

    /// Date preselected at startup, as YYYY-MM-DD.
    pub initial_date: Option<String>,
}

impl PickerConfig {
    /// The initial date, if set and valid. `validate()` reports invalid values.
    pub fn initial_date(&self) -> Option<NaiveDate> {
        self.initial_date
            .as_deref()
            .and_then(|value| parse_backend_date(value).ok())
    }
}

/// Theme configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Initial theme when no preference is persisted: "system", "light" or "dark".
    pub mode: ThemeMode,

    /// Where the theme preference is persisted. Defaults to the XDG state dir.
    pub state_file: Option<PathBuf>,
}

/// Host window configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    /// Title shown in the navbar and the window decoration.
    pub title: String,

    pub width: u32,

    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "My App".to_string(),
            width: 720,
            height: 640,
        }
    }
}
