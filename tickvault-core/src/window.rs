//! Date-range partitioning — the chunk walk over a bounded lookback.
//!
//! A resolved plan covers one contiguous lookback range. The provider
//! only serves small spans at fine granularity, so the range is walked
//! as consecutive half-open windows of at most `chunk_days` each; the
//! final window takes whatever remainder is left.

use std::fmt;

use chrono::{Duration, NaiveDateTime};

use crate::policy::FetchPlan;

/// Half-open range `[start, end)` handed to the provider as one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateWindow {
    /// Build a window anchored at `now`: a future `end` is pulled back to
    /// `now` (with a warning), and `start` is pulled down to `end` so the
    /// range is never inverted.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, now: NaiveDateTime) -> Self {
        let end = if end > now {
            eprintln!("WARNING: end date {end} lies in the future; clamping to {now}");
            now
        } else {
            end
        };
        let start = start.min(end);
        Self { start, end }
    }

    /// Whole days spanned by this window.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// A window that no longer covers any time.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start.date(), self.end.date())
    }
}

/// The lookback range for a plan: `[now - historical_days + 1 day, now)`.
///
/// The one-day add keeps the oldest requested day fully inside the range;
/// without it the range would open mid-day and shave the first day to a
/// partial.
pub fn lookback_window(plan: &FetchPlan, now: NaiveDateTime) -> DateWindow {
    let start = now - Duration::days(i64::from(plan.historical_days)) + Duration::days(1);
    DateWindow::new(start, now, now)
}

/// Iterator over the chunk windows tiling a range.
///
/// Windows are emitted oldest-first, each starting exactly where the
/// previous one ended. The iterator holds only a cursor, so it is cheap
/// to clone and re-walk.
#[derive(Debug, Clone)]
pub struct Windows {
    cursor: NaiveDateTime,
    end: NaiveDateTime,
    step: Duration,
}

impl Windows {
    pub fn new(range: DateWindow, chunk_days: u32) -> Self {
        Self {
            cursor: range.start,
            end: range.end,
            // a zero step would never advance the cursor
            step: Duration::days(i64::from(chunk_days.max(1))),
        }
    }
}

impl Iterator for Windows {
    type Item = DateWindow;

    fn next(&mut self) -> Option<DateWindow> {
        if self.cursor >= self.end {
            return None;
        }
        let window_end = (self.cursor + self.step).min(self.end);
        let window = DateWindow {
            start: self.cursor,
            end: window_end,
        };
        self.cursor = window_end;
        Some(window)
    }
}
