//! Source adapters — what differs between the crypto and equities runs.
//!
//! Both run the same fetch core against the same provider. An adapter
//! contributes the parts that differ: how a listed symbol maps to the
//! provider's symbol, which intervals to sweep and how far back each
//! one reaches, and where the CSV for a pair lands on disk.

use std::path::{Path, PathBuf};

use crate::interval::{Interval, Period};

/// Crypto sweep: chunked range fetches over the intraday intervals.
///
/// Listed symbols may be bare (`BTC`) or already quoted (`BTC-USD`);
/// bare ones get the quote suffix appended before hitting the provider.
#[derive(Debug, Clone)]
pub struct CryptoSource {
    /// Appended to bare symbols (`BTC` -> `BTC-USD`).
    pub quote_suffix: String,
    /// Sweep order and per-interval lookback, in days.
    pub lookback_days: Vec<(Interval, u32)>,
}

impl Default for CryptoSource {
    fn default() -> Self {
        Self {
            quote_suffix: "-USD".to_string(),
            lookback_days: vec![
                (Interval::Minute1, 30),
                (Interval::Minute2, 30),
                (Interval::Minute5, 30),
                (Interval::Minute15, 30),
                (Interval::Minute30, 30),
                (Interval::Minute60, 90),
                (Interval::Minute90, 60),
                (Interval::Hour1, 90),
            ],
        }
    }
}

impl CryptoSource {
    /// Provider symbol for a listed symbol.
    pub fn provider_symbol(&self, listed: &str) -> String {
        if listed.contains('-') {
            listed.to_string()
        } else {
            format!("{listed}{}", self.quote_suffix)
        }
    }

    /// Dataset directory for one symbol: `<base>/intraday/short-term/`,
    /// where `base` is the symbol's prefix before the quote suffix,
    /// lowercased (`BTC-USD` -> `btc/`).
    pub fn output_dir(&self, root: &Path, provider_symbol: &str) -> PathBuf {
        let base = match provider_symbol.split_once('-') {
            Some((base, _quote)) => base,
            None => provider_symbol,
        };
        root.join(base.to_lowercase())
            .join("intraday")
            .join("short-term")
    }
}

/// Equities sweep: one period-bounded fetch per interval, intraday
/// through monthly. Listed symbols go to the provider unchanged.
#[derive(Debug, Clone)]
pub struct StockSource {
    /// Sweep order and the trailing period requested for each interval.
    pub periods: Vec<(Interval, Period)>,
}

impl Default for StockSource {
    fn default() -> Self {
        Self {
            periods: vec![
                (Interval::Minute1, Period::Days(7)),
                (Interval::Minute2, Period::Days(60)),
                (Interval::Minute5, Period::Days(60)),
                (Interval::Minute15, Period::Days(60)),
                (Interval::Minute30, Period::Days(60)),
                (Interval::Minute60, Period::Days(730)),
                (Interval::Minute90, Period::Days(60)),
                (Interval::Hour1, Period::Days(730)),
                (Interval::Day1, Period::Max),
                (Interval::Day5, Period::Max),
                (Interval::Week1, Period::Max),
                (Interval::Month1, Period::Max),
                (Interval::Month3, Period::Max),
            ],
        }
    }
}

impl StockSource {
    /// Dataset directory for one ticker: a flat `<TICKER>/` folder.
    pub fn output_dir(&self, root: &Path, ticker: &str) -> PathBuf {
        root.join(ticker)
    }
}
