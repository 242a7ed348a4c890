//! Configuration manager with live reload support.
//!
//! This service watches the configuration file for changes and hands new
//! configurations to the widgets that care about them.
//!
//! ## Architecture
//!
//! - A file watcher thread monitors `config.toml` for modifications.
//! - On change, the new config is parsed and validated.
//! - If valid, it is dispatched to the GTK main thread via glib::idle_add_once.
//! - The main thread stores it and calls every registered reload listener.
//!
//! ## Supported Live Reload
//!
//! - `picker.format`: re-renders the input text and placeholder
//! - `window.*`: updates the window title, navbar title and default size
//! - `theme.*`: only read at startup; a change is logged and ignored

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use gtk4::glib;
use notify_debouncer_mini::{DebounceEventResult, new_debouncer, notify::RecursiveMode};
use tracing::{debug, error, info, warn};

use datepick_core::Config;

/// Debounce interval (in ms) for file change events. Editors often trigger
/// multiple events for a single save; this batches them into one reload.
const FILE_CHANGE_DEBOUNCE_MS: u64 = 300;

/// Messages sent from the file watcher thread to the GTK main thread.
#[derive(Debug)]
pub enum ConfigMessage {
    /// A new valid config was loaded.
    Reloaded(Box<Config>),
    /// Config file changed but failed to load/validate.
    Error(String),
}

/// Send a config message to the main thread via glib::idle_add_once.
fn send_config_message(msg: ConfigMessage) {
    glib::idle_add_once(move || {
        ConfigManager::global().handle_config_message(msg);
    });
}

type ReloadListener = Rc<dyn Fn(&Config, &ConfigChanges)>;

/// Which parts of the config differ between two versions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigChanges {
    pub picker: bool,
    pub window: bool,
    pub theme: bool,
}

impl ConfigChanges {
    pub fn between(old: &Config, new: &Config) -> Self {
        Self {
            picker: config_picker_changed(old, new),
            window: config_window_changed(old, new),
            theme: config_theme_changed(old, new),
        }
    }

    pub fn any(&self) -> bool {
        self.picker || self.window || self.theme
    }
}

/// Manages configuration state and live reload.
///
/// This is a singleton service that:
/// - Holds the current configuration
/// - Watches the config file for changes
/// - Notifies reload listeners when the config changes
pub struct ConfigManager {
    /// Current configuration.
    config: RefCell<Config>,
    /// Path to the config file being watched (if any).
    config_path: RefCell<Option<PathBuf>>,
    /// Shutdown flag for the file watcher thread.
    shutdown_flag: Arc<AtomicBool>,
    listeners: RefCell<Vec<ReloadListener>>,
}

// Thread-local singleton storage
thread_local! {
    static CONFIG_MANAGER_INSTANCE: RefCell<Option<Rc<ConfigManager>>> = const { RefCell::new(None) };
}

impl ConfigManager {
    /// Create a new ConfigManager with the given initial config.
    fn new(config: Config, config_path: Option<PathBuf>) -> Rc<Self> {
        Rc::new(Self {
            config: RefCell::new(config),
            config_path: RefCell::new(config_path),
            shutdown_flag: Arc::new(AtomicBool::new(false)),
            listeners: RefCell::new(Vec::new()),
        })
    }

    /// Get the global ConfigManager singleton.
    ///
    /// Panics if `init_global` hasn't been called.
    pub fn global() -> Rc<Self> {
        CONFIG_MANAGER_INSTANCE.with(|cell| {
            cell.borrow()
                .as_ref()
                .expect("ConfigManager not initialized; call init_global first")
                .clone()
        })
    }

    /// Initialize the global ConfigManager singleton.
    ///
    /// Must be called once during application startup, before `global()` is used.
    pub fn init_global(config: Config, config_path: Option<PathBuf>) {
        CONFIG_MANAGER_INSTANCE.with(|cell| {
            let mut opt = cell.borrow_mut();
            if opt.is_some() {
                warn!("ConfigManager already initialized, ignoring init_global call");
                return;
            }
            *opt = Some(ConfigManager::new(config, config_path));
        });
    }

    /// Register a callback run after each successful reload.
    pub fn connect_reloaded<F>(&self, callback: F)
    where
        F: Fn(&Config, &ConfigChanges) + 'static,
    {
        self.listeners.borrow_mut().push(Rc::new(callback));
    }

    /// Start watching the config file for changes.
    ///
    /// This spawns a background thread that monitors the config file. When changes
    /// are detected, the new config is parsed and sent to the GTK main thread.
    ///
    /// Does nothing if no config file path is set (using defaults).
    pub fn start_watching(self: &Rc<Self>) {
        let config_path = self.config_path.borrow().clone();
        let Some(path) = config_path else {
            info!("No config file to watch (using defaults)");
            return;
        };

        if !path.exists() {
            warn!(
                "Config file does not exist, cannot watch: {}",
                path.display()
            );
            return;
        }

        info!("Starting config file watcher for: {}", path.display());

        let shutdown_flag = self.shutdown_flag.clone();
        thread::spawn(move || {
            Self::run_file_watcher(path, shutdown_flag);
        });
    }

    /// Run the file watcher loop (called on a background thread).
    fn run_file_watcher(path: PathBuf, shutdown_flag: Arc<AtomicBool>) {
        let debounce_duration = Duration::from_millis(FILE_CHANGE_DEBOUNCE_MS);

        // Canonicalize the path so we can compare with absolute paths from notify
        let canonical_path = match path.canonicalize() {
            Ok(p) => p,
            Err(e) => {
                error!("Failed to canonicalize config path: {}", e);
                return;
            }
        };

        let path_for_handler = canonical_path.clone();
        let mut debouncer =
            match new_debouncer(debounce_duration, move |res: DebounceEventResult| {
                match res {
                    Ok(events) => {
                        if events.iter().any(|e| e.path == path_for_handler) {
                            debug!("Config file change detected");
                            Self::reload_and_send(&path_for_handler);
                        }
                    }
                    Err(err) => {
                        error!("File watcher error: {}", err);
                    }
                }
            }) {
                Ok(d) => d,
                Err(e) => {
                    error!("Failed to create file watcher: {}", e);
                    return;
                }
            };

        // Watch the parent directory; editors often replace the file on save
        let watch_dir = canonical_path.parent().unwrap_or(&canonical_path);
        if let Err(e) = debouncer
            .watcher()
            .watch(watch_dir, RecursiveMode::NonRecursive)
        {
            error!("Failed to watch config directory: {}", e);
            return;
        }

        info!("File watcher started, watching: {}", watch_dir.display());

        while !shutdown_flag.load(Ordering::Relaxed) {
            thread::sleep(Duration::from_millis(500));
        }

        debug!("Config file watcher thread shutting down");
    }

    /// Reload config from file and send result to GTK thread via idle_add_once.
    fn reload_and_send(path: &std::path::Path) {
        match Config::load(path) {
            Ok(new_config) => {
                if let Err(e) = new_config.validate() {
                    let msg = format!("Config validation failed: {}", e);
                    warn!("{}", msg);
                    send_config_message(ConfigMessage::Error(msg));
                    return;
                }

                info!("Config reloaded successfully from: {}", path.display());
                send_config_message(ConfigMessage::Reloaded(Box::new(new_config)));
            }
            Err(e) => {
                let msg = format!("Failed to reload config: {}", e);
                warn!("{}", msg);
                send_config_message(ConfigMessage::Error(msg));
            }
        }
    }

    /// Handle a config message from the file watcher.
    /// Called via glib::idle_add_once from send_config_message.
    pub(crate) fn handle_config_message(&self, msg: ConfigMessage) {
        match msg {
            ConfigMessage::Reloaded(new_config) => {
                self.apply_config(*new_config);
            }
            ConfigMessage::Error(err) => {
                // Keep using the old config
                error!("Config reload error: {}", err);
            }
        }
    }

    /// Store a new configuration and fan it out to listeners.
    fn apply_config(&self, new_config: Config) {
        let changes = ConfigChanges::between(&self.config.borrow(), &new_config);
        if !changes.any() {
            debug!("Config file changed but no settings differ");
            return;
        }

        info!("Applying new configuration ({:?})", changes);

        if changes.theme {
            info!("Theme settings changed; they take effect on next start");
        }

        *self.config.borrow_mut() = new_config.clone();

        // Listeners may call back into the manager
        let listeners: Vec<ReloadListener> = self.listeners.borrow().clone();
        for listener in listeners {
            listener(&new_config, &changes);
        }

        info!("Configuration applied successfully");
    }

    /// Stop watching the config file.
    pub fn stop_watching(&self) {
        self.shutdown_flag.store(true, Ordering::Relaxed);
        debug!("Config watcher stopped");
    }
}

fn config_picker_changed(old: &Config, new: &Config) -> bool {
    if old.picker.format != new.picker.format {
        debug!(
            "picker.format changed ({} -> {})",
            old.picker.format, new.picker.format
        );
        return true;
    }
    // initial_date only matters at startup but still counts as a change
    old.picker.initial_date != new.picker.initial_date
}

fn config_window_changed(old: &Config, new: &Config) -> bool {
    old.window.title != new.window.title
        || old.window.width != new.window.width
        || old.window.height != new.window.height
}

fn config_theme_changed(old: &Config, new: &Config) -> bool {
    old.theme.mode != new.theme.mode || old.theme.state_file != new.theme.state_file
}
