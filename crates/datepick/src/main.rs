//! datepick - A date picker with a light/dark theme toggle
//!
//! This is the main entry point for the datepick application.

mod services;
pub mod styles;
mod widgets;
mod window;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use gtk4::Application;
use gtk4::prelude::*;
use tracing::{debug, error, info, warn};

use datepick_core::format::parse_backend_date;
use datepick_core::theme::{THEME_KEY, resolve_initial_theme};
use datepick_core::{
    Config, DateFormat, PreferenceStore, Theme, ThemeProvider, ThemeState, logging,
};

use crate::services::appearance;
use crate::services::config_manager::ConfigManager;

/// datepick - A date picker with a light/dark theme toggle
#[derive(Parser, Debug)]
#[command(name = "datepick", version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (uses XDG lookup if not specified)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print example configuration and exit
    #[arg(long)]
    print_example_config: bool,

    /// Validate configuration and exit (returns non-zero on errors)
    #[arg(long)]
    check_config: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read or change the saved light/dark preference
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
    /// Render a YYYY-MM-DD date the way the picker input shows it
    Format {
        /// Date in YYYY-MM-DD form
        date: String,
        /// Display format token (defaults to picker.format from config)
        #[arg(short, long)]
        format: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum ThemeAction {
    /// Print the theme the app would start with
    Get,
    /// Flip the saved theme and print the new one
    Toggle,
    /// Save a specific theme
    Set {
        /// "light" or "dark"
        theme: String,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    logging::init(args.verbose);

    // --print-example-config: print the example config with comments
    if args.print_example_config {
        print!("{}", datepick_core::config::DEFAULT_CONFIG_TOML);
        return ExitCode::SUCCESS;
    }

    // Load configuration using XDG lookup chain
    // If --config is specified, it must exist and be valid (no fallback)
    let load_result = match Config::find_and_load(args.config.as_deref()) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(ref source) = load_result.source {
        info!("Loaded configuration from {:?}", source);
    } else if load_result.used_defaults {
        warn!("Using default configuration (no config file found)");
    }

    let config = load_result.config;

    // Validate configuration (strict - fail on invalid values)
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    debug!("Configuration validated successfully");

    // --check-config: just validate and exit
    if args.check_config {
        if let Some(ref source) = load_result.source {
            println!("Configuration valid: {}", source.display());
        } else {
            println!("Configuration valid (using defaults)");
        }
        print!("{}", config.summary());
        return ExitCode::SUCCESS;
    }

    // Subcommands need config (state file, default format) but not GTK
    if let Some(command) = args.command {
        return match handle_command(command, &config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                ExitCode::FAILURE
            }
        };
    }

    run_gtk_app(config, load_result.source)
}

/// Handle CLI subcommands.
fn handle_command(command: Command, config: &Config) -> anyhow::Result<()> {
    match command {
        Command::Theme { action } => handle_theme_command(action, config),
        Command::Format { date, format } => handle_format_command(&date, format.as_deref(), config),
    }
}

/// Handle theme subcommands against the persisted preference.
fn handle_theme_command(action: ThemeAction, config: &Config) -> anyhow::Result<()> {
    // No display here; only GTK_THEME can express a system preference
    let system_dark = appearance::env_prefers_dark();

    match action {
        ThemeAction::Get => {
            let store = appearance::open_store(config);
            let persisted = store.get(THEME_KEY);
            let theme = resolve_initial_theme(persisted.as_deref(), config.theme.mode, system_dark);
            println!("{}", theme);
        }
        ThemeAction::Toggle => {
            let mut state =
                ThemeState::initialize(appearance::open_store(config), config.theme.mode, system_dark);
            println!("{}", state.toggle());
            verify_persisted(&state)?;
        }
        ThemeAction::Set { theme } => {
            let theme: Theme = theme
                .parse()
                .with_context(|| format!("cannot set theme to '{}'", theme))?;
            let mut state =
                ThemeState::initialize(appearance::open_store(config), config.theme.mode, system_dark);
            state.set(theme);
            verify_persisted(&state)?;
        }
    }
    Ok(())
}

/// The store logs and swallows write failures; the CLI should not.
fn verify_persisted(state: &ThemeState) -> anyhow::Result<()> {
    let expected = state.theme().as_str();
    match state.persisted() {
        Some(value) if value == expected => Ok(()),
        _ => bail!("failed to save theme preference '{}'", expected),
    }
}

/// Handle the format subcommand.
fn handle_format_command(date: &str, format: Option<&str>, config: &Config) -> anyhow::Result<()> {
    let date = parse_backend_date(date).context("invalid date")?;
    let format = match format {
        Some(token) => token.parse::<DateFormat>()?,
        None => config.picker.format,
    };
    println!("{}", format.format(date));
    Ok(())
}

/// Initialize and run the GTK4 application.
fn run_gtk_app(config: Config, config_source: Option<PathBuf>) -> ExitCode {
    // Log the config source for diagnostics
    if let Some(ref source) = config_source {
        info!("Running with configuration file: {}", source.display());
    } else {
        info!("Running with default configuration (no file found)");
    }

    // Initialize the config manager singleton (before GTK, so it's ready for hot-reload)
    ConfigManager::init_global(config.clone(), config_source);

    let app = Application::builder()
        .application_id("io.github.datepick")
        .flags(gtk4::gio::ApplicationFlags::NON_UNIQUE)
        .build();

    app.connect_startup(|_| {
        info!("GTK application starting up");
    });

    let config_for_activate = config;
    app.connect_activate(move |app| {
        info!("GTK application activated");

        // Load CSS styling
        window::load_css();

        // The theme provider must exist before any widget reads it
        let provider = appearance::init_theme_provider(&config_for_activate);

        let main_window = window::create_main_window(app, &config_for_activate);

        {
            let app = app.clone();
            provider.connect_changed(move |theme| {
                appearance::apply_theme(&app, theme);
            });
        }

        main_window.present();
        debug!("Main window presented (theme={})", ThemeProvider::global().theme());

        // Start config file watcher for live reload
        ConfigManager::global().start_watching();
    });

    app.connect_shutdown(|_| {
        info!("GTK application shutting down");
        // Stop config watcher
        ConfigManager::global().stop_watching();
    });

    // Run the application with empty args (we already parsed with clap)
    let empty_args: Vec<String> = vec![];
    let status = app.run_with_args(&empty_args);

    if status == gtk4::glib::ExitCode::SUCCESS {
        ExitCode::SUCCESS
    } else {
        error!("GTK application exited with error");
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datepick_core::FileStore;

    fn config_with_state_file(dir: &tempfile::TempDir) -> Config {
        let mut config = Config::default();
        config.theme.state_file = Some(dir.path().join("state.toml"));
        config
    }

    #[test]
    fn test_cli_parses_theme_set() {
        let args = Args::try_parse_from(["datepick", "theme", "set", "dark"]).unwrap();
        match args.command {
            Some(Command::Theme {
                action: ThemeAction::Set { theme },
            }) => assert_eq!(theme, "dark"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_verbosity_counts() {
        let args = Args::try_parse_from(["datepick", "-vv", "--check-config"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert!(args.check_config);
        assert!(args.command.is_none());
    }

    #[test]
    fn test_theme_set_then_toggle_persists() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_state_file(&dir);

        handle_theme_command(
            ThemeAction::Set {
                theme: "dark".to_string(),
            },
            &config,
        )
        .unwrap();
        let store = FileStore::new(dir.path().join("state.toml"));
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));

        handle_theme_command(ThemeAction::Toggle, &config).unwrap();
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("light"));
    }

    #[test]
    fn test_theme_set_rejects_unknown_value() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_state_file(&dir);

        let err = handle_theme_command(
            ThemeAction::Set {
                theme: "sepia".to_string(),
            },
            &config,
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("sepia"));
    }

    #[test]
    fn test_format_command_rejects_bad_input() {
        let config = Config::default();
        assert!(handle_format_command("2024-02-30", None, &config).is_err());
        assert!(handle_format_command("2024-02-29", Some("dd.MM.yyyy"), &config).is_err());
        assert!(handle_format_command("2024-02-29", Some("yyyy/MM/dd"), &config).is_ok());
    }
}
