//! Date picker CSS.

/// Return date picker CSS.
pub fn css() -> &'static str {
    r#"
/* ===== DATE PICKER ===== */

.date-picker-input {
    min-width: 256px;
    background-color: var(--color-surface);
    color: var(--color-foreground);
    border: 1px solid var(--color-border);
    border-radius: 8px;
    padding: 4px 8px;
}

.date-picker-input:focus-within {
    border-color: var(--color-accent);
}

/* Popover surface */
popover.date-picker-popover > contents {
    background-color: var(--color-surface);
    color: var(--color-foreground);
    border: 1px solid var(--color-border);
    border-radius: 8px;
    box-shadow: var(--shadow-popover);
    padding: 8px;
    min-width: 288px;
}

.date-picker-header {
    background-color: var(--color-surface-header);
    border-radius: 6px;
    padding: 4px;
}

.date-picker-month {
    font-weight: bold;
}

.date-picker-year {
    background: transparent;
    border: none;
    box-shadow: none;
    font-weight: bold;
    padding: 2px 6px;
}

.date-picker-year:hover,
.date-picker-nav:hover {
    background-color: var(--color-hover);
}

.date-picker-nav {
    background: transparent;
    border: none;
    box-shadow: none;
    border-radius: 9999px;
    min-width: 28px;
    min-height: 28px;
    padding: 2px;
}

.date-picker-weekday {
    color: var(--color-foreground-muted);
    font-size: 0.8em;
    font-weight: bold;
    padding: 4px 0;
}

.day-button,
.year-button {
    background: transparent;
    border: none;
    box-shadow: none;
    border-radius: 9999px;
    min-width: 32px;
    min-height: 32px;
    padding: 0;
    color: var(--color-foreground);
}

.day-button:hover,
.year-button:hover {
    background-color: var(--color-hover);
}

.day-button.selected,
.year-button.current {
    background-color: var(--color-accent);
    color: var(--color-accent-text);
}

/* Year dropdown floats over the day grid */
.date-picker-years {
    background-color: var(--color-surface);
    border: 1px solid var(--color-border);
    border-radius: 6px;
    box-shadow: var(--shadow-popover);
    padding: 4px;
}

.year-button {
    border-radius: 6px;
}
"#
}
