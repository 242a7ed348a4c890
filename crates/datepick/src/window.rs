//! Host window: navbar on top, date picker in the page body.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;
use gtk4::prelude::*;
use gtk4::{Align, Application, ApplicationWindow, Box as GtkBox, Label, Orientation};
use tracing::{debug, info, warn};

use datepick_core::{Config, DatePickerProps, format_for_backend};

use crate::services::config_manager::{ConfigChanges, ConfigManager};
use crate::styles::class;
use crate::widgets::{self, DatePicker, Navbar};

/// Status line text for the host's current date.
pub fn host_status_text(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => format!("Backend value: {}", format_for_backend(date)),
        None => "No date selected".to_string(),
    }
}

/// Build the main window and register it for config reloads.
pub fn create_main_window(app: &Application, config: &Config) -> ApplicationWindow {
    let window = ApplicationWindow::builder()
        .application(app)
        .title(config.window.title.as_str())
        .default_width(config.window.width as i32)
        .default_height(config.window.height as i32)
        .build();
    window.add_css_class(class::APP_WINDOW);

    let navbar = Navbar::new(&config.window.title);

    // The host owns the selected date; the picker only reports changes
    let host_date: Rc<RefCell<Option<NaiveDate>>> = Rc::new(RefCell::new(None));
    let status = Label::new(None);
    status.add_css_class(class::HOST_STATUS);
    status.set_halign(Align::Center);

    let initial_date = config.picker.initial_date();
    *host_date.borrow_mut() = initial_date;
    status.set_label(&host_status_text(initial_date));

    let props = {
        let host_date = host_date.clone();
        let status = status.clone();
        DatePickerProps::new(move |date| {
            *host_date.borrow_mut() = Some(date);
            status.set_label(&host_status_text(Some(date)));
            info!("Host received date {}", format_for_backend(date));
        })
        .with_initial_date(initial_date)
        .with_format(config.picker.format)
    };
    let picker = DatePicker::new(props);
    picker.widget().set_halign(Align::Center);

    let body = GtkBox::new(Orientation::Vertical, 12);
    body.add_css_class(class::APP_BODY);
    body.set_vexpand(true);
    body.append(picker.widget());
    body.append(&status);

    let page = GtkBox::new(Orientation::Vertical, 0);
    page.append(navbar.widget());
    page.append(&body);
    window.set_child(Some(&page));

    let navbar = Rc::new(navbar);
    {
        let window = window.clone();
        let picker = picker.clone();
        let navbar = navbar.clone();
        ConfigManager::global().connect_reloaded(move |config, changes| {
            apply_reload(&window, &picker, &navbar, config, changes);
        });
    }

    debug!(
        "Main window created ({}x{}, initial date {:?})",
        config.window.width, config.window.height, picker.selected()
    );
    window
}

fn apply_reload(
    window: &ApplicationWindow,
    picker: &DatePicker,
    navbar: &Navbar,
    config: &Config,
    changes: &ConfigChanges,
) {
    if changes.picker {
        picker.set_format(config.picker.format);
    }
    if changes.window {
        window.set_title(Some(&config.window.title));
        navbar.set_title(&config.window.title);
        window.set_default_size(config.window.width as i32, config.window.height as i32);
    }
}

/// Load and apply CSS styling to the application.
pub fn load_css() {
    let provider = gtk4::CssProvider::new();
    provider.load_from_string(&widgets::css::app_css());

    // Apply to default display with USER priority to override GTK themes
    if let Some(display) = gtk4::gdk::Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_USER,
        );
        debug!("CSS loaded and applied");
    } else {
        warn!("No default display available, CSS styling not applied");
    }
}
