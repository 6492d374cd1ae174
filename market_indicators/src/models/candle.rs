//! Canonical in-memory representation of a single OHLCV candle.
//!
//! Every indicator and distribution in this crate reads candles through a
//! [`CandleSeries`](crate::models::candle_series::CandleSeries); raw exchange
//! records are turned into candles by the [`adapter`](crate::adapter).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One time-bucketed trading summary for a symbol and interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bucket open time (UTC).
    pub time: DateTime<Utc>,

    /// Opening price.
    pub open: f64,

    /// Highest price during the interval.
    pub high: f64,

    /// Lowest price during the interval.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Base-asset volume traded during the interval.
    pub volume: f64,
}

impl Candle {
    /// Creates a candle without validating it. See [`Candle::check`].
    pub fn new(time: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Checks the structural invariants of a candle.
    ///
    /// All fields must be finite, `low <= min(open, close) <= max(open, close) <= high`
    /// and `volume >= 0`. Returns a human-readable reason on failure.
    pub fn check(&self) -> Result<(), String> {
        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(format!("{name} is not finite ({value})"));
        }
        if self.high < self.low {
            return Err(format!("high {} is below low {}", self.high, self.low));
        }
        let body_low = self.open.min(self.close);
        let body_high = self.open.max(self.close);
        if body_low < self.low || body_high > self.high {
            return Err(format!(
                "open/close [{body_low}, {body_high}] outside high/low [{}, {}]",
                self.low, self.high
            ));
        }
        if self.volume < 0.0 {
            return Err(format!("negative volume {}", self.volume));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn accepts_consistent_candle() {
        assert!(Candle::new(t0(), 100.0, 105.0, 99.0, 104.0, 12.5).check().is_ok());
        // doji with zero range and zero volume is still valid
        assert!(Candle::new(t0(), 100.0, 100.0, 100.0, 100.0, 0.0).check().is_ok());
    }

    #[test]
    fn rejects_inverted_range() {
        let err = Candle::new(t0(), 100.0, 98.0, 101.0, 100.0, 1.0).check().unwrap_err();
        assert!(err.contains("below low"));
    }

    #[test]
    fn rejects_body_outside_range() {
        let err = Candle::new(t0(), 100.0, 101.0, 99.0, 102.0, 1.0).check().unwrap_err();
        assert!(err.contains("outside"));
    }

    #[test]
    fn rejects_negative_volume_and_nan() {
        assert!(Candle::new(t0(), 1.0, 1.0, 1.0, 1.0, -0.1).check().is_err());
        assert!(Candle::new(t0(), f64::NAN, 1.0, 1.0, 1.0, 1.0).check().is_err());
    }
}
