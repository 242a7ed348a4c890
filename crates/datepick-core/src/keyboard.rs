//! Keyboard focus movement inside the calendar popover.
//!
//! These functions work on indices into "the currently rendered interactive
//! elements in document order" and know nothing about the widget toolkit.
//! A `None` result means the key press is a no-op.

use crate::calendar::MonthGrid;

/// Columns in the year dropdown grid.
pub const YEAR_GRID_COLUMNS: usize = 4;

const WEEK: usize = 7;

/// Keys the popover reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Escape,
    Tab { backward: bool },
    Other,
}

/// Target day index (0-based, day 1 = index 0) for an arrow key in the day grid.
///
/// Left/Right move one day and stop at the month bounds. Up/Down move one
/// week; when no day exists a week away, focus wraps to the opposite edge of
/// the same weekday column.
pub fn day_grid_target(grid: MonthGrid, current: usize, key: Key) -> Option<usize> {
    let days = grid.days as usize;
    if current >= days {
        return None;
    }
    let offset = grid.leading_blanks as usize;

    match key {
        Key::Left => current.checked_sub(1),
        Key::Right => (current + 1 < days).then_some(current + 1),
        Key::Up => {
            if current >= WEEK {
                return Some(current - WEEK);
            }
            let column = (offset + current) % WEEK;
            let last_slot = offset + days - 1;
            let mut slot = (grid.rows() as usize - 1) * WEEK + column;
            if slot > last_slot {
                slot -= WEEK;
            }
            let target = slot - offset;
            (target != current).then_some(target)
        }
        Key::Down => {
            if current + WEEK < days {
                return Some(current + WEEK);
            }
            let column = (offset + current) % WEEK;
            let slot = if column >= offset {
                column
            } else {
                column + WEEK
            };
            let target = slot - offset;
            (target != current).then_some(target)
        }
        _ => None,
    }
}

/// Target index for an arrow key in the year dropdown.
///
/// The grid has [`YEAR_GRID_COLUMNS`] columns and does not wrap: a move that
/// would leave the list is ignored.
pub fn year_grid_target(len: usize, current: usize, key: Key) -> Option<usize> {
    let target = match key {
        Key::Up => current.checked_sub(YEAR_GRID_COLUMNS)?,
        Key::Down => current + YEAR_GRID_COLUMNS,
        Key::Left => current.checked_sub(1)?,
        Key::Right => current + 1,
        _ => return None,
    };
    (target < len).then_some(target)
}

/// Where Tab should send focus to keep it inside the popover.
///
/// Returns the element to focus when Tab would leave the trap (forward from
/// the last element, backward from the first). Returns `None` when normal
/// Tab handling should proceed.
pub fn focus_trap_target<T: PartialEq + Clone>(
    focusables: &[T],
    active: Option<&T>,
    backward: bool,
) -> Option<T> {
    let first = focusables.first()?;
    let last = focusables.last()?;
    let active = active?;

    if backward && active == first {
        Some(last.clone())
    } else if !backward && active == last {
        Some(first.clone())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CalendarCursor;

    fn grid(year: i32, month0: u32) -> MonthGrid {
        CalendarCursor::new(year, month0).unwrap().grid()
    }

    #[test]
    fn test_left_right_linear_no_wrap() {
        let g = grid(2024, 1);
        assert_eq!(day_grid_target(g, 0, Key::Left), None);
        assert_eq!(day_grid_target(g, 0, Key::Right), Some(1));
        assert_eq!(day_grid_target(g, 5, Key::Left), Some(4));
        assert_eq!(day_grid_target(g, 28, Key::Right), None);
    }

    #[test]
    fn test_up_down_within_grid() {
        let g = grid(2024, 1);
        assert_eq!(day_grid_target(g, 10, Key::Up), Some(3));
        assert_eq!(day_grid_target(g, 10, Key::Down), Some(17));
    }

    #[test]
    fn test_up_from_first_row_wraps_to_last_row_same_column() {
        // February 2024: day 1 is Thursday (col 4), 29 days, last day (29) is Thursday.
        let g = grid(2024, 1);
        // Day 1 (Thu) -> day 29 (Thu)
        assert_eq!(day_grid_target(g, 0, Key::Up), Some(28));
        // Day 3 (Sat) -> last Saturday is day 24
        assert_eq!(day_grid_target(g, 2, Key::Up), Some(23));
        let (_, col_from) = g.cell(3);
        let (row_to, col_to) = g.cell(24);
        assert_eq!(col_from, col_to);
        assert_eq!(row_to, g.rows() - 2);
    }

    #[test]
    fn test_up_from_below_blank_cell_wraps() {
        // February 2024: day 4 is Sunday in row 1, the cell above it is blank.
        let g = grid(2024, 1);
        // Last Sunday is day 25
        assert_eq!(day_grid_target(g, 3, Key::Up), Some(24));
    }

    #[test]
    fn test_down_from_last_row_wraps_to_first_row_same_column() {
        let g = grid(2024, 1);
        // Day 29 (Thu) -> day 1 (Thu)
        assert_eq!(day_grid_target(g, 28, Key::Down), Some(0));
        // Day 25 (Sun): nothing a week later, first Sunday is day 4 (row 0 is blank there)
        assert_eq!(day_grid_target(g, 24, Key::Down), Some(3));
    }

    #[test]
    fn test_up_then_down_round_trips_column_edge() {
        for (year, month0) in [(2024, 0), (2024, 1), (2015, 1), (2023, 9)] {
            let g = grid(year, month0);
            for day in 0..7.min(g.days as usize) {
                let Some(up) = day_grid_target(g, day, Key::Up) else {
                    continue;
                };
                assert_eq!(g.cell(up as u32 + 1).1, g.cell(day as u32 + 1).1);
                assert_eq!(day_grid_target(g, up, Key::Down), Some(day));
            }
        }
    }

    #[test]
    fn test_out_of_range_current_is_noop() {
        let g = grid(2024, 1);
        assert_eq!(day_grid_target(g, 29, Key::Up), None);
        assert_eq!(day_grid_target(g, 0, Key::Escape), None);
    }

    #[test]
    fn test_year_grid_moves() {
        assert_eq!(year_grid_target(10, 5, Key::Up), Some(1));
        assert_eq!(year_grid_target(10, 5, Key::Down), Some(9));
        assert_eq!(year_grid_target(10, 5, Key::Left), Some(4));
        assert_eq!(year_grid_target(10, 5, Key::Right), Some(6));
    }

    #[test]
    fn test_year_grid_bounds_are_noop() {
        assert_eq!(year_grid_target(10, 2, Key::Up), None);
        assert_eq!(year_grid_target(10, 7, Key::Down), None);
        assert_eq!(year_grid_target(10, 0, Key::Left), None);
        assert_eq!(year_grid_target(10, 9, Key::Right), None);
    }

    #[test]
    fn test_focus_trap_wraps_at_edges() {
        let items = ["prev", "year", "next", "day1"];
        assert_eq!(
            focus_trap_target(&items, Some(&"day1"), false),
            Some("prev")
        );
        assert_eq!(focus_trap_target(&items, Some(&"prev"), true), Some("day1"));
    }

    #[test]
    fn test_focus_trap_passes_through_in_middle() {
        let items = ["prev", "year", "next"];
        assert_eq!(focus_trap_target(&items, Some(&"year"), false), None);
        assert_eq!(focus_trap_target(&items, Some(&"year"), true), None);
        assert_eq!(focus_trap_target(&items, Some(&"prev"), false), None);
    }

    #[test]
    fn test_focus_trap_empty_or_unfocused() {
        let empty: [&str; 0] = [];
        assert_eq!(focus_trap_target(&empty, Some(&"x"), false), None);
        assert_eq!(focus_trap_target(&["a", "b"], None, false), None);
    }
}
