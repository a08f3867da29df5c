//! Interval policy — provider lookback limits and chunk sizing.
//!
//! Yahoo serves minute-scale bars only for a short trailing window and
//! rejects `1m` queries spanning more than a few days, so every request
//! is resolved against a policy table before it touches the network.
//! Out-of-range inputs are clamped, not rejected: the resolver always
//! produces a plan the provider will accept, and prints a warning when
//! it had to shrink something.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::interval::Interval;

/// Lookback and chunking limits, overridable from a TOML file.
///
/// The minute and 1m-chunk fields double as defaults and caps: the
/// provider limit is also the most useful request size.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntervalPolicy {
    /// Default and maximum lookback for sub-hourly intervals.
    pub minute_lookback_cap: u32,
    /// Default lookback for hour-scale intervals (no cap).
    pub hourly_lookback_days: u32,
    /// Default lookback for everything else.
    pub default_lookback_days: u32,
    /// Default and maximum chunk span for `1m` requests.
    pub minute_chunk_cap: u32,
    /// Default chunk span for all other intervals.
    pub default_chunk_days: u32,
}

impl Default for IntervalPolicy {
    fn default() -> Self {
        Self {
            minute_lookback_cap: 30,
            hourly_lookback_days: 90,
            default_lookback_days: 30,
            minute_chunk_cap: 8,
            default_chunk_days: 15,
        }
    }
}

/// Failure to load policy overrides.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("read policy file {path}: {message}")]
    Read { path: String, message: String },

    #[error("parse policy TOML: {0}")]
    Parse(String),
}

impl IntervalPolicy {
    /// Load policy overrides from a TOML file. Missing keys keep their
    /// defaults; unknown keys are an error.
    pub fn from_file(path: &Path) -> Result<Self, PolicyError> {
        let content = std::fs::read_to_string(path).map_err(|e| PolicyError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Parse policy overrides from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, PolicyError> {
        toml::from_str(content).map_err(|e| PolicyError::Parse(e.to_string()))
    }

    /// Resolve caller inputs into a plan the provider will accept.
    ///
    /// `None` inputs take the per-interval defaults; inputs past a cap
    /// are clamped to it with a warning on stderr. The result always has
    /// `historical_days >= 1` and `chunk_days >= 1`.
    pub fn resolve(
        &self,
        symbol: &str,
        interval: Interval,
        historical_days: Option<u32>,
        chunk_days: Option<u32>,
    ) -> FetchPlan {
        let historical_days = if interval.is_minute() {
            match historical_days {
                Some(days) if days > self.minute_lookback_cap => {
                    eprintln!(
                        "WARNING: {symbol} {interval}: {days} days of history requested, \
                         but {interval} data only reaches back {} days; clamping",
                        self.minute_lookback_cap
                    );
                    self.minute_lookback_cap
                }
                Some(days) => days,
                None => self.minute_lookback_cap,
            }
        } else if interval.is_hourly() {
            historical_days.unwrap_or(self.hourly_lookback_days)
        } else {
            historical_days.unwrap_or(self.default_lookback_days)
        };

        let chunk_days = if interval == Interval::Minute1 {
            match chunk_days {
                Some(days) if days > self.minute_chunk_cap => {
                    eprintln!(
                        "WARNING: {symbol} {interval}: chunks of {days} days requested, \
                         but 1m queries are limited to {} days; clamping",
                        self.minute_chunk_cap
                    );
                    self.minute_chunk_cap
                }
                Some(days) => days,
                None => self.minute_chunk_cap,
            }
        } else {
            chunk_days.unwrap_or(self.default_chunk_days)
        };

        FetchPlan {
            symbol: symbol.to_string(),
            interval,
            // zero-day inputs would make the walk degenerate
            historical_days: historical_days.max(1),
            chunk_days: chunk_days.max(1),
        }
    }
}

/// A fully-resolved (symbol, interval) fetch: immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    pub symbol: String,
    pub interval: Interval,
    pub historical_days: u32,
    pub chunk_days: u32,
}
