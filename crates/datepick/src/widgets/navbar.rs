//! Top bar with the app title and the light/dark toggle.

use gtk4::prelude::*;
use gtk4::{Align, Box as GtkBox, Button, Label, Orientation};

use datepick_core::ThemeProvider;

use crate::styles::navbar;

pub struct Navbar {
    root: GtkBox,
    title: Label,
}

impl Navbar {
    /// Build the navbar. The toggle button talks to the global
    /// [`ThemeProvider`], so it must be installed first.
    pub fn new(title: &str) -> Self {
        let root = GtkBox::new(Orientation::Horizontal, 12);
        root.add_css_class(navbar::ROOT);

        let title_label = Label::new(Some(title));
        title_label.add_css_class(navbar::TITLE);
        title_label.set_hexpand(true);
        title_label.set_halign(Align::Start);
        root.append(&title_label);

        let toggle = Button::new();
        toggle.add_css_class(navbar::THEME_TOGGLE);
        toggle.set_valign(Align::Center);
        root.append(&toggle);

        let provider = ThemeProvider::global();
        {
            let toggle = toggle.clone();
            provider.connect_changed(move |theme| {
                toggle.set_label(theme.toggle_label());
            });
        }
        toggle.connect_clicked(|_| {
            ThemeProvider::global().toggle();
        });

        Self {
            root,
            title: title_label,
        }
    }

    pub fn widget(&self) -> &GtkBox {
        &self.root
    }

    pub fn set_title(&self, title: &str) {
        self.title.set_label(title);
    }
}
