//! TickVault Core — chunked historical price downloads into CSV datasets.
//!
//! The pipeline, in order:
//! - Interval policy: resolve a (symbol, interval) request against
//!   provider lookback and chunk limits
//! - Window partitioning: tile the lookback range into chunk windows
//! - Windowed fetch: one provider call per window, failures isolated
//! - Fragment normalization and aggregation: flatten labels, stitch,
//!   dedupe keeping first occurrence
//! - Output: one atomic CSV per (symbol, interval)
//!
//! The crypto and equities sweeps share all of the above and differ
//! only in their source adapters ([`source`]) and ticker list formats
//! ([`tickers`]).

pub mod batch;
pub mod fetch;
pub mod fragment;
pub mod interval;
pub mod output;
pub mod policy;
pub mod provider;
pub mod source;
pub mod tickers;
pub mod window;
pub mod yahoo;
