//! Navbar CSS.

/// Return navbar CSS.
pub fn css() -> &'static str {
    r#"
/* ===== NAVBAR ===== */

.navbar {
    background-color: var(--color-navbar);
    padding: 12px 24px;
    box-shadow: 0 1px 3px rgba(0, 0, 0, 0.1);
}

.navbar-title {
    font-size: 1.25em;
    font-weight: bold;
    color: var(--color-accent-text);
}

.theme-toggle {
    background: rgba(255, 255, 255, 0.15);
    color: var(--color-accent-text);
    border: none;
    border-radius: 8px;
    padding: 6px 14px;
    box-shadow: none;
}

.theme-toggle:hover {
    background: rgba(255, 255, 255, 0.25);
}
"#
}
