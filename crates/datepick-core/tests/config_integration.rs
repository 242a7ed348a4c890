//! Integration tests for config parsing against the real config.toml.

use std::io::Write;
use std::path::PathBuf;

use datepick_core::{Config, DateFormat, ThemeMode};

fn project_root() -> PathBuf {
    // Navigate from crates/datepick-core/ up to project root
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent() // crates/
        .unwrap()
        .parent() // datepick/
        .unwrap()
        .to_path_buf()
}

#[test]
fn test_load_real_config() {
    let config_path = project_root().join("config.toml");

    let config = Config::load(&config_path).expect("Failed to load config.toml");

    assert_eq!(config.picker.format, DateFormat::DayMonthYearSlash);
    assert_eq!(config.theme.mode, ThemeMode::System);
    assert!(config.window.width > 0, "Window width should be positive");
}

#[test]
fn test_real_config_validates() {
    let config_path = project_root().join("config.toml");
    let config = Config::load(&config_path).unwrap();

    config.validate().expect("Real config.toml should be valid");
}

#[test]
fn test_config_summary() {
    let config_path = project_root().join("config.toml");
    let config = Config::load(&config_path).unwrap();

    let summary = config.summary();

    assert!(summary.contains("Picker:"));
    assert!(summary.contains("Theme:"));
    assert!(summary.contains("Window:"));
    assert!(summary.contains("format: dd/MM/yyyy"));
}

#[test]
fn test_find_and_load_with_explicit_path() {
    let config_path = project_root().join("config.toml");

    let result = Config::find_and_load(Some(&config_path)).unwrap();

    assert!(!result.used_defaults);
    assert_eq!(result.source, Some(config_path));
    result
        .config
        .validate()
        .expect("Loaded config should be valid");
}

#[test]
fn test_find_and_load_explicit_missing_fails() {
    let missing_path = PathBuf::from("/nonexistent/config.toml");

    let result = Config::find_and_load(Some(&missing_path));
    assert!(result.is_err());
}

#[test]
fn test_broken_config_returns_error_not_defaults() {
    let temp_dir = tempfile::tempdir().unwrap();
    let broken_config_path = temp_dir.path().join("config.toml");

    let mut file = std::fs::File::create(&broken_config_path).unwrap();
    writeln!(file, "this is not valid toml {{{{").unwrap();
    drop(file);

    let result = Config::load(&broken_config_path);
    assert!(result.is_err(), "Broken config should fail to load");
}

#[test]
fn test_partial_user_config_merges_with_defaults() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
        [picker]
        format = "yyyy-MM-dd HH:mm:ss"
        initial_date = "2024-02-29"
        "#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    config.validate().unwrap();

    assert_eq!(config.picker.format, DateFormat::YearMonthDayDashTime);
    assert_eq!(
        config.picker.initial_date(),
        chrono::NaiveDate::from_ymd_opt(2024, 2, 29)
    );
    // Untouched sections come from the embedded defaults
    assert_eq!(config.window.title, "My App");
}

#[test]
fn test_validation_rejects_bad_initial_date() {
    let config = Config::load_with_defaults(
        r#"
        [picker]
        initial_date = "15/01/2024"
        "#,
    )
    .unwrap();

    let err = config.validate().unwrap_err().to_string();
    assert!(
        err.contains("picker.initial_date"),
        "Error should mention picker.initial_date"
    );
}

#[test]
fn test_default_config_toml_parses_without_error() {
    let config =
        Config::from_default_toml().expect("DEFAULT_CONFIG_TOML should parse without error");

    config
        .validate()
        .expect("DEFAULT_CONFIG_TOML should pass validation");
}
