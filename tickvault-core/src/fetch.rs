//! The windowed fetch — walk the lookback, collect fragments, stitch.
//!
//! One provider request per chunk window, strictly in order, oldest
//! first. A window that fails or comes back empty contributes nothing
//! and the walk moves on; only frame-level plumbing errors abort a
//! plan. The surviving fragments are normalized and aggregated into a
//! single result set.

use chrono::{Local, NaiveDateTime};
use polars::prelude::DataFrame;

use crate::fragment;
use crate::interval::{Interval, Period};
use crate::policy::FetchPlan;
use crate::provider::{DataError, FetchProgress, HistoryProvider};
use crate::window::{lookback_window, DateWindow, Windows};

/// Fetch a plan's full lookback in chunks, evaluated against the
/// current local time. `Ok(None)` when every window came back empty.
pub fn fetch_ranged(
    provider: &dyn HistoryProvider,
    plan: &FetchPlan,
    progress: &dyn FetchProgress,
) -> Result<Option<DataFrame>, DataError> {
    fetch_ranged_at(provider, plan, Local::now().naive_local(), progress)
}

/// Same as [`fetch_ranged`] with an explicit evaluation time.
pub fn fetch_ranged_at(
    provider: &dyn HistoryProvider,
    plan: &FetchPlan,
    now: NaiveDateTime,
    progress: &dyn FetchProgress,
) -> Result<Option<DataFrame>, DataError> {
    let range = lookback_window(plan, now);

    let mut fragments = Vec::new();
    for window in Windows::new(range, plan.chunk_days) {
        progress.on_window(&window);
        if let Some(raw) = fetch_chunk(provider, plan, &window, progress) {
            fragments.push(fragment::normalize(raw)?);
        }
    }

    fragment::aggregate(fragments)
}

/// One chunk request. Provider errors and empty responses both collapse
/// to `None` — the window is reported and skipped, never fatal.
fn fetch_chunk(
    provider: &dyn HistoryProvider,
    plan: &FetchPlan,
    window: &DateWindow,
    progress: &dyn FetchProgress,
) -> Option<DataFrame> {
    match provider.fetch_range(&plan.symbol, plan.interval, window) {
        Ok(Some(raw)) if raw.height() > 0 => Some(raw),
        Ok(_) => {
            progress.on_window_skipped(window, "no rows returned");
            None
        }
        Err(e) => {
            progress.on_window_skipped(window, &e.to_string());
            None
        }
    }
}

/// Single period-bounded fetch (no chunk walk), normalized. Unlike the
/// windowed path there is nothing to fall back on here, so provider
/// errors propagate to the caller.
pub fn fetch_named_period(
    provider: &dyn HistoryProvider,
    symbol: &str,
    interval: Interval,
    period: Period,
) -> Result<Option<DataFrame>, DataError> {
    match provider.fetch_period(symbol, interval, period)? {
        Some(raw) if raw.height() > 0 => fragment::normalize(raw).map(Some),
        _ => Ok(None),
    }
}
