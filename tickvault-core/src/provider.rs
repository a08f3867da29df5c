//! Provider trait, structured errors, and progress reporting.
//!
//! The HistoryProvider trait abstracts over the upstream market-data
//! source so the fetch core can run against the real Yahoo client or a
//! scripted double in tests.

use std::path::PathBuf;

use polars::prelude::DataFrame;
use thiserror::Error;

use crate::interval::{Interval, Period};
use crate::window::DateWindow;

/// Structured error types for fetch, load, and persist operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("frame operation failed: {0}")]
    Frame(String),

    #[error("ticker list {path}: {message}")]
    TickerList { path: String, message: String },

    #[error("output {path}: {message}")]
    Output { path: String, message: String },
}

/// A source of historical OHLCV bars.
///
/// Both calls return `Ok(None)` when the provider responded but had no
/// rows for the request — a real condition (weekends, young listings),
/// not an error. Raw frames come back in provider schema; normalization
/// is the caller's job.
pub trait HistoryProvider {
    /// Fetch bars over the half-open range `[window.start, window.end)`.
    fn fetch_range(
        &self,
        symbol: &str,
        interval: Interval,
        window: &DateWindow,
    ) -> Result<Option<DataFrame>, DataError>;

    /// Fetch bars over a named trailing span (`7d`, `730d`, `max`, ...).
    fn fetch_period(
        &self,
        symbol: &str,
        interval: Interval,
        period: Period,
    ) -> Result<Option<DataFrame>, DataError>;
}

/// What a finished (symbol, interval) pair produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairOutcome {
    /// Rows were fetched and persisted to `path`.
    Written { path: PathBuf, rows: usize },
    /// Every request came back empty; nothing was persisted.
    Empty,
}

/// Progress callbacks for a batch run.
pub trait FetchProgress {
    /// Called when a (symbol, interval) pair starts.
    fn on_pair_start(&self, symbol: &str, interval: Interval, index: usize, total: usize);

    /// Called before each chunk window is fetched.
    fn on_window(&self, window: &DateWindow);

    /// Called when a window contributed no rows (empty or failed).
    fn on_window_skipped(&self, window: &DateWindow, reason: &str);

    /// Called when a (symbol, interval) pair finishes.
    fn on_pair_complete(
        &self,
        symbol: &str,
        interval: Interval,
        result: &Result<PairOutcome, DataError>,
    );

    /// Called when the entire batch is done.
    fn on_batch_complete(&self, written: usize, empty: usize, failed: usize);
}

/// Simple progress reporter that prints to stdout.
pub struct StdoutProgress;

impl FetchProgress for StdoutProgress {
    fn on_pair_start(&self, symbol: &str, interval: Interval, index: usize, total: usize) {
        println!("[{}/{}] {symbol} {interval}", index + 1, total);
    }

    fn on_window(&self, window: &DateWindow) {
        println!("  fetching {window}");
    }

    fn on_window_skipped(&self, window: &DateWindow, reason: &str) {
        println!("  no data for {window}: {reason}");
    }

    fn on_pair_complete(
        &self,
        symbol: &str,
        interval: Interval,
        result: &Result<PairOutcome, DataError>,
    ) {
        match result {
            Ok(PairOutcome::Written { path, rows }) => {
                println!("  {rows} rows -> {}", path.display());
            }
            Ok(PairOutcome::Empty) => println!("  nothing to write for {symbol} {interval}"),
            Err(e) => println!("  FAIL: {symbol} {interval}: {e}"),
        }
    }

    fn on_batch_complete(&self, written: usize, empty: usize, failed: usize) {
        println!("\nBatch complete: {written} written, {empty} empty, {failed} failed");
    }
}
