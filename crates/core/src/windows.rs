//! Interval algebra over free minute windows inside a timetable slot.
//!
//! Windows are half-open `[start, end)` minute-of-day intervals, kept
//! disjoint and sorted ascending by start. The planner threads window sets
//! through the allocation loop as values; nothing here mutates in place.

/// One free interval inside a slot, in minutes of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: i32,
    pub end: i32,
}

impl Window {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> i32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Remove `[block_start, block_end)` from a disjoint, ordered window set.
///
/// A window overlapped in the middle splits into up to two remainders; a
/// non-overlapping block leaves the set unchanged. Order is preserved.
pub fn subtract_interval(windows: &[Window], block_start: i32, block_end: i32) -> Vec<Window> {
    let mut next = Vec::with_capacity(windows.len() + 1);
    for window in windows {
        if block_end <= window.start || block_start >= window.end {
            next.push(*window);
            continue;
        }
        if block_start > window.start {
            next.push(Window::new(window.start, block_start));
        }
        if block_end < window.end {
            next.push(Window::new(block_end, window.end));
        }
    }
    next
}

/// Raise every window start to at least `cutoff`, dropping windows that
/// become empty. Used only when planning "today", so nothing is allocated
/// into the past.
pub fn clip_from(windows: &[Window], cutoff: i32) -> Vec<Window> {
    windows
        .iter()
        .map(|window| Window::new(window.start.max(cutoff), window.end))
        .filter(|window| !window.is_empty())
        .collect()
}

/// Total free minutes across a window set.
pub fn total_minutes(windows: &[Window]) -> i32 {
    windows.iter().map(Window::len).sum()
}
