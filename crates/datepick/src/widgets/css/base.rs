//! Window and page CSS shared by every view.

/// Return base CSS.
pub fn css() -> &'static str {
    r#"
/* ===== BASE ===== */

window.app-window {
    background-color: var(--color-background);
    color: var(--color-foreground);
    transition: background-color 200ms ease, color 200ms ease;
}

.app-body {
    padding: 32px 24px;
}

.host-status {
    color: var(--color-foreground-muted);
    font-size: 0.9em;
}

button:focus-visible {
    outline: 2px solid var(--color-accent);
    outline-offset: 1px;
}
"#
}
