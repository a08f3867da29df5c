//! Sampling intervals and named lookback periods.
//!
//! Both types round-trip the token strings Yahoo's chart API expects
//! (`1m`, `1h`, `1wk`, `7d`, `max`, ...). The interval set is closed:
//! a token outside it fails to parse rather than being passed upstream.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Sampling granularity of a history request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interval {
    Minute1,
    Minute2,
    Minute5,
    Minute15,
    Minute30,
    Minute60,
    Minute90,
    Hour1,
    Day1,
    Day5,
    Week1,
    Month1,
    Month3,
}

impl Interval {
    /// The API token for this interval.
    pub fn as_str(self) -> &'static str {
        match self {
            Interval::Minute1 => "1m",
            Interval::Minute2 => "2m",
            Interval::Minute5 => "5m",
            Interval::Minute15 => "15m",
            Interval::Minute30 => "30m",
            Interval::Minute60 => "60m",
            Interval::Minute90 => "90m",
            Interval::Hour1 => "1h",
            Interval::Day1 => "1d",
            Interval::Day5 => "5d",
            Interval::Week1 => "1wk",
            Interval::Month1 => "1mo",
            Interval::Month3 => "3mo",
        }
    }

    /// Sub-hourly granularity (1m through 30m). These carry the tightest
    /// provider lookback limits.
    pub fn is_minute(self) -> bool {
        matches!(
            self,
            Interval::Minute1
                | Interval::Minute2
                | Interval::Minute5
                | Interval::Minute15
                | Interval::Minute30
        )
    }

    /// Hour-scale granularity (60m, 90m, 1h). `60m` and `1h` are distinct
    /// tokens upstream and are kept distinct here.
    pub fn is_hourly(self) -> bool {
        matches!(
            self,
            Interval::Minute60 | Interval::Minute90 | Interval::Hour1
        )
    }

    /// Anything finer than a day. Intraday bars carry a time-of-day
    /// component, so their fragments label the time column `Datetime`
    /// rather than `Date`.
    pub fn is_intraday(self) -> bool {
        self.is_minute() || self.is_hourly()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An interval token outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown interval token: {0}")]
pub struct ParseIntervalError(pub String);

impl FromStr for Interval {
    type Err = ParseIntervalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1m" => Ok(Interval::Minute1),
            "2m" => Ok(Interval::Minute2),
            "5m" => Ok(Interval::Minute5),
            "15m" => Ok(Interval::Minute15),
            "30m" => Ok(Interval::Minute30),
            "60m" => Ok(Interval::Minute60),
            "90m" => Ok(Interval::Minute90),
            "1h" => Ok(Interval::Hour1),
            "1d" => Ok(Interval::Day1),
            "5d" => Ok(Interval::Day5),
            "1wk" => Ok(Interval::Week1),
            "1mo" => Ok(Interval::Month1),
            "3mo" => Ok(Interval::Month3),
            other => Err(ParseIntervalError(other.to_string())),
        }
    }
}

/// A named trailing span for period-bounded fetches.
///
/// `Days(n)` renders as `{n}d`; `Max` asks the provider for everything
/// it has for the symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Days(u32),
    Max,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Days(n) => write!(f, "{n}d"),
            Period::Max => f.write_str("max"),
        }
    }
}
