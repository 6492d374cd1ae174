//! Timeframe utilities for resampling candles into coarser UTC buckets.
//!
//! A [`Timeframe`] pairs a non-zero amount with a [`TimeframeUnit`] (minute, hour or
//! day). Buckets are fixed-width and aligned to the Unix epoch, so a `5m` bucket
//! always starts at a minute divisible by five.
//!
//! ```
//! use market_indicators::models::timeframe::{Timeframe, TimeframeUnit};
//!
//! let tf: Timeframe = "15m".parse().unwrap();
//! assert_eq!(tf.amount().get(), 15);
//! assert_eq!(tf.unit(), TimeframeUnit::Minute);
//! assert_eq!(tf.to_string(), "15m");
//! ```

use std::{fmt, num::NonZeroU32, str::FromStr};

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

/// Number of seconds in a minute.
pub const SECS_PER_MINUTE: i64 = 60;
/// Number of seconds in an hour.
pub const SECS_PER_HOUR: i64 = 60 * SECS_PER_MINUTE;
/// Number of seconds in a day.
pub const SECS_PER_DAY: i64 = 24 * SECS_PER_HOUR;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimeframeError {
    #[error("empty timeframe")]
    Empty,

    #[error("invalid amount in timeframe `{0}`")]
    InvalidAmount(String),

    #[error("unknown timeframe unit `{0}` (expected m, h or d)")]
    UnknownUnit(String),
}

/// Timeframe granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeframeUnit {
    /// UTC minute
    Minute,
    /// UTC hour
    Hour,
    /// UTC day
    Day,
}

impl TimeframeUnit {
    const fn secs(self) -> i64 {
        match self {
            TimeframeUnit::Minute => SECS_PER_MINUTE,
            TimeframeUnit::Hour => SECS_PER_HOUR,
            TimeframeUnit::Day => SECS_PER_DAY,
        }
    }
}

/// A timeframe = amount × unit (e.g., 1-Minute, 4-Hour, 1-Day).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeframe {
    amount: NonZeroU32,
    unit: TimeframeUnit,
}

impl Timeframe {
    pub const fn new(amount: NonZeroU32, unit: TimeframeUnit) -> Self {
        Self { amount, unit }
    }

    pub const fn amount(&self) -> NonZeroU32 {
        self.amount
    }

    pub const fn unit(&self) -> TimeframeUnit {
        self.unit
    }

    /// Width of one bucket in seconds.
    pub const fn width_secs(&self) -> i64 {
        self.unit.secs() * self.amount.get() as i64
    }

    /// Epoch-aligned bucket id containing `ts`.
    pub fn bucket_id(&self, ts: DateTime<Utc>) -> i64 {
        ts.timestamp().div_euclid(self.width_secs())
    }

    /// UTC start instant of the bucket with the given id.
    pub fn bucket_start(&self, id: i64) -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(id * self.width_secs())
    }
}

/// Display/parse for wire ergonomics (`"1m"`, `"4h"`, `"1d"`).
impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let u = match self.unit {
            TimeframeUnit::Minute => "m",
            TimeframeUnit::Hour => "h",
            TimeframeUnit::Day => "d",
        };
        write!(f, "{}{u}", self.amount.get())
    }
}

impl FromStr for Timeframe {
    type Err = TimeframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let Some((unit_at, _)) = s.char_indices().last() else {
            return Err(TimeframeError::Empty);
        };
        let (digits, unit) = s.split_at(unit_at);
        let amount = digits
            .parse::<u32>()
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| TimeframeError::InvalidAmount(s.to_string()))?;
        let unit = match unit {
            "m" => TimeframeUnit::Minute,
            "h" | "H" => TimeframeUnit::Hour,
            "d" | "D" => TimeframeUnit::Day,
            other => return Err(TimeframeError::UnknownUnit(other.to_string())),
        };
        Ok(Timeframe::new(amount, unit))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn parses_and_displays() {
        let tf: Timeframe = "4h".parse().unwrap();
        assert_eq!(tf.unit(), TimeframeUnit::Hour);
        assert_eq!(tf.width_secs(), 4 * SECS_PER_HOUR);
        assert_eq!("1D".parse::<Timeframe>().unwrap().to_string(), "1d");
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!("".parse::<Timeframe>(), Err(TimeframeError::Empty));
        assert!(matches!("0m".parse::<Timeframe>(), Err(TimeframeError::InvalidAmount(_))));
        assert!(matches!("m".parse::<Timeframe>(), Err(TimeframeError::InvalidAmount(_))));
        assert!(matches!("5w".parse::<Timeframe>(), Err(TimeframeError::UnknownUnit(_))));
    }

    #[test]
    fn bucket_roundtrip_is_epoch_aligned() {
        let tf: Timeframe = "5m".parse().unwrap();
        let t = Utc.with_ymd_and_hms(2025, 1, 2, 3, 7, 45).unwrap();
        let start = tf.bucket_start(tf.bucket_id(t));
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 1, 2, 3, 5, 0).unwrap());
        assert_eq!(tf.bucket_id(start), tf.bucket_id(t));
    }
}
