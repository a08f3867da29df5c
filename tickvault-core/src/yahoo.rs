//! Yahoo Finance history provider.
//!
//! Fetches OHLCV history from Yahoo's v8 chart API over a blocking
//! client. Each request gets exactly one attempt: a failed chunk simply
//! contributes no rows, and recovery happens a level up in the window
//! walk.
//!
//! Yahoo has no official API and changes response formats without
//! notice. Shapes the parser does not recognize map to
//! `DataError::ResponseFormatChanged` rather than panicking.

use std::time::Duration;

use polars::prelude::*;
use serde::Deserialize;

use crate::fragment;
use crate::interval::{Interval, Period};
use crate::provider::{DataError, HistoryProvider};
use crate::window::DateWindow;

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

/// Yahoo Finance chart API client.
pub struct YahooChart {
    client: reqwest::blocking::Client,
}

impl YahooChart {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("failed to build HTTP client");

        Self { client }
    }

    /// Chart URL for a range-bounded request. Window bounds are truncated
    /// to their calendar date and sent as UTC-midnight epoch seconds,
    /// matching the half-open `[start, end)` contract.
    fn range_url(symbol: &str, interval: Interval, window: &DateWindow) -> String {
        let period1 = window.start.date().and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp();
        let period2 = window.end.date().and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp();
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{symbol}\
             ?period1={period1}&period2={period2}&interval={}\
             &includeAdjustedClose=true",
            interval.as_str()
        )
    }

    /// Chart URL for a period-bounded request (`range=7d`, `range=max`, ...).
    fn period_url(symbol: &str, interval: Interval, period: Period) -> String {
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{symbol}\
             ?range={period}&interval={}\
             &includeAdjustedClose=true",
            interval.as_str()
        )
    }

    /// Execute one HTTP request and peel the response down to its chart
    /// payload. `Ok(None)` when the payload carries no data block.
    fn get_chart(&self, symbol: &str, url: &str) -> Result<Option<ChartData>, DataError> {
        let resp = self.client.get(url).send().map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                DataError::NetworkUnreachable(e.to_string())
            } else {
                DataError::Provider(e.to_string())
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DataError::Provider(format!("HTTP {status} for {symbol}")));
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })?;

        Self::extract_chart(symbol, chart)
    }

    /// Split the chart envelope into data or a structured error.
    fn extract_chart(symbol: &str, resp: ChartResponse) -> Result<Option<ChartData>, DataError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    DataError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    }
                } else {
                    DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
                }
            } else {
                DataError::ResponseFormatChanged("empty result with no error".into())
            }
        })?;

        Ok(result.into_iter().next())
    }

    /// Build a raw fragment from a chart payload.
    ///
    /// Timestamps become formatted strings — time-of-day kept for
    /// intraday intervals, calendar date only for daily and coarser.
    /// With `qualified` set, value columns carry `Field:SYMBOL` labels
    /// the way range responses do. Bars where every OHLCV slot is null
    /// (holidays, non-trading spans) are dropped; `Ok(None)` when no
    /// bar survives.
    fn chart_to_frame(
        symbol: &str,
        interval: Interval,
        data: ChartData,
        qualified: bool,
    ) -> Result<Option<DataFrame>, DataError> {
        let Some(timestamps) = data.timestamp else {
            return Ok(None);
        };

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let adj_closes = data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
            .map(|a| a.adjclose);

        let time_format = if interval.is_intraday() {
            "%Y-%m-%d %H:%M:%S"
        } else {
            "%Y-%m-%d"
        };

        let n = timestamps.len();
        let mut times: Vec<String> = Vec::with_capacity(n);
        let mut opens: Vec<Option<f64>> = Vec::with_capacity(n);
        let mut highs: Vec<Option<f64>> = Vec::with_capacity(n);
        let mut lows: Vec<Option<f64>> = Vec::with_capacity(n);
        let mut closes: Vec<Option<f64>> = Vec::with_capacity(n);
        let mut adjs: Vec<Option<f64>> = Vec::with_capacity(n);
        let mut volumes: Vec<Option<u64>> = Vec::with_capacity(n);

        for (i, &ts) in timestamps.iter().enumerate() {
            let time = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.naive_utc().format(time_format).to_string())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            let open = quote.open.get(i).copied().flatten();
            let high = quote.high.get(i).copied().flatten();
            let low = quote.low.get(i).copied().flatten();
            let close = quote.close.get(i).copied().flatten();
            let volume = quote.volume.get(i).copied().flatten();
            let adj_close = adj_closes.as_ref().and_then(|v| v.get(i).copied().flatten());

            // Skip bars where all OHLCV are None (holidays/non-trading spans)
            if open.is_none()
                && high.is_none()
                && low.is_none()
                && close.is_none()
                && volume.is_none()
            {
                continue;
            }

            times.push(time);
            opens.push(open);
            highs.push(high);
            lows.push(low);
            closes.push(close);
            adjs.push(adj_close);
            volumes.push(volume);
        }

        if times.is_empty() {
            return Ok(None);
        }

        let time_column = if interval.is_intraday() {
            fragment::DATETIME_COLUMN
        } else {
            fragment::DATE_COLUMN
        };
        let label = |field: &str| -> String {
            if qualified {
                fragment::qualify(field, symbol)
            } else {
                field.to_string()
            }
        };

        DataFrame::new(vec![
            Column::new(time_column.into(), times),
            Column::new(label("Open").into(), opens),
            Column::new(label("High").into(), highs),
            Column::new(label("Low").into(), lows),
            Column::new(label("Close").into(), closes),
            Column::new(label("Adj Close").into(), adjs),
            Column::new(label("Volume").into(), volumes),
        ])
        .map(Some)
        .map_err(|e| DataError::Frame(format!("dataframe creation: {e}")))
    }
}

impl Default for YahooChart {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryProvider for YahooChart {
    fn fetch_range(
        &self,
        symbol: &str,
        interval: Interval,
        window: &DateWindow,
    ) -> Result<Option<DataFrame>, DataError> {
        if window.is_empty() {
            return Ok(None);
        }
        let url = Self::range_url(symbol, interval, window);
        let Some(data) = self.get_chart(symbol, &url)? else {
            return Ok(None);
        };
        Self::chart_to_frame(symbol, interval, data, true)
    }

    fn fetch_period(
        &self,
        symbol: &str,
        interval: Interval,
        period: Period,
    ) -> Result<Option<DataFrame>, DataError> {
        let url = Self::period_url(symbol, interval, period);
        let Some(data) = self.get_chart(symbol, &url)? else {
            return Ok(None);
        };
        Self::chart_to_frame(symbol, interval, data, false)
    }
}
