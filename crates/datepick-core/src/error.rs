//! Error types shared across datepick.

use std::path::PathBuf;

/// Errors produced by datepick-core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("invalid configuration:\n  {}", .0.join("\n  "))]
    ConfigValidation(Vec<String>),

    #[error("unknown date format '{0}'")]
    UnknownFormat(String),

    #[error("unknown theme '{0}', expected 'light' or 'dark'")]
    UnknownTheme(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("theme requested outside of the theme provider; call ThemeProvider::init_global first")]
    ThemeProviderMissing,
}

/// Result alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
