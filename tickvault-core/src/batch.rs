//! Batch driver — sweeps a ticker list across its interval table.
//!
//! Pairs run strictly one after another, never in parallel: the
//! provider tolerates a polite sequential crawl and nothing here is
//! latency-sensitive. A pair that fails is tallied and the sweep moves
//! on; only a missing ticker list aborts the whole run.

use std::path::Path;

use polars::prelude::DataFrame;

use crate::fetch;
use crate::interval::Interval;
use crate::output;
use crate::policy::IntervalPolicy;
use crate::provider::{DataError, FetchProgress, HistoryProvider, PairOutcome};
use crate::source::{CryptoSource, StockSource};
use crate::tickers;

/// Summary of a batch run.
#[derive(Debug)]
pub struct BatchSummary {
    pub pairs: usize,
    pub written: usize,
    pub empty: usize,
    pub failed: usize,
    pub errors: Vec<(String, Interval, DataError)>,
}

impl BatchSummary {
    fn new(pairs: usize) -> Self {
        Self {
            pairs,
            written: 0,
            empty: 0,
            failed: 0,
            errors: Vec::new(),
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Run the crypto sweep: for every listed symbol, a chunked range fetch
/// per interval in the source's lookback table.
pub fn run_crypto(
    provider: &dyn HistoryProvider,
    source: &CryptoSource,
    policy: &IntervalPolicy,
    list_path: &Path,
    out_root: &Path,
    progress: &dyn FetchProgress,
) -> Result<BatchSummary, DataError> {
    let listed = tickers::load_json_list(list_path)?;

    let total = listed.len() * source.lookback_days.len();
    let mut summary = BatchSummary::new(total);
    let mut index = 0;

    for ticker in &listed {
        let symbol = source.provider_symbol(ticker);
        let dir = source.output_dir(out_root, &symbol);

        for &(interval, lookback) in &source.lookback_days {
            progress.on_pair_start(&symbol, interval, index, total);
            index += 1;

            let plan = policy.resolve(&symbol, interval, Some(lookback), None);
            let result = persist(
                fetch::fetch_ranged(provider, &plan, progress),
                &dir,
                &symbol,
                interval,
            );
            record(&mut summary, &symbol, interval, result, progress);
        }
    }

    progress.on_batch_complete(summary.written, summary.empty, summary.failed);
    Ok(summary)
}

/// Run the equities sweep: one period-bounded fetch per (ticker,
/// interval) in the source's period table.
pub fn run_stocks(
    provider: &dyn HistoryProvider,
    source: &StockSource,
    list_path: &Path,
    out_root: &Path,
    progress: &dyn FetchProgress,
) -> Result<BatchSummary, DataError> {
    let listed = tickers::load_text_list(list_path)?;

    let total = listed.len() * source.periods.len();
    let mut summary = BatchSummary::new(total);
    let mut index = 0;

    for ticker in &listed {
        let dir = source.output_dir(out_root, ticker);

        for &(interval, period) in &source.periods {
            progress.on_pair_start(ticker, interval, index, total);
            index += 1;

            let result = persist(
                fetch::fetch_named_period(provider, ticker, interval, period),
                &dir,
                ticker,
                interval,
            );
            record(&mut summary, ticker, interval, result, progress);
        }
    }

    progress.on_batch_complete(summary.written, summary.empty, summary.failed);
    Ok(summary)
}

/// Persist a fetched result set, mapping it to the pair's outcome.
fn persist(
    fetched: Result<Option<DataFrame>, DataError>,
    dir: &Path,
    symbol: &str,
    interval: Interval,
) -> Result<PairOutcome, DataError> {
    match fetched {
        Ok(Some(mut df)) => {
            let rows = df.height();
            let path = output::write_csv(&mut df, dir, symbol, interval)?;
            Ok(PairOutcome::Written { path, rows })
        }
        Ok(None) => Ok(PairOutcome::Empty),
        Err(e) => Err(e),
    }
}

/// Tally one finished pair and report it.
fn record(
    summary: &mut BatchSummary,
    symbol: &str,
    interval: Interval,
    result: Result<PairOutcome, DataError>,
    progress: &dyn FetchProgress,
) {
    progress.on_pair_complete(symbol, interval, &result);
    match result {
        Ok(PairOutcome::Written { .. }) => summary.written += 1,
        Ok(PairOutcome::Empty) => summary.empty += 1,
        Err(e) => {
            summary.failed += 1;
            summary.errors.push((symbol.to_string(), interval, e));
        }
    }
}
