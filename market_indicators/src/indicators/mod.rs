//! Indicator Engine.
//!
//! Pure functions from a candle series (or a slice of closes) to a derived series that
//! is exactly as long as the input and aligned one-to-one by position. Warm-up
//! positions hold `None`.
//!
//! A series shorter than an indicator's minimum length is not an error: the result is
//! all `None` and a `debug!` event records the degradation. Parameters that make the
//! computation undefined (a zero period, a non-finite multiplier) fail fast with
//! [`Error::InvalidParameter`](crate::errors::Error::InvalidParameter).

pub mod atr;
pub mod bollinger;
pub mod correlation;
pub mod macd;
pub mod moving_average;
pub mod rsi;

use tracing::debug;

use crate::errors::{Error, Result};

pub use atr::atr;
pub use bollinger::bollinger;
pub use correlation::{CorrelationBasis, correlation};
pub use macd::macd;
pub use moving_average::{ema, sma};
pub use rsi::rsi;

/// Rejects window lengths that would make a computation undefined.
pub(crate) fn check_period(indicator: &'static str, key: &str, period: usize) -> Result<()> {
    if period == 0 {
        return Err(Error::invalid_param(indicator, key, "must be at least 1"));
    }
    Ok(())
}

/// Returns `true` (and logs) when `len` is below the `need` candles required for the
/// first defined value.
pub(crate) fn insufficient(indicator: &'static str, len: usize, need: usize) -> bool {
    if len < need {
        debug!(indicator, len, need, "series shorter than warm-up; output is all null");
        true
    } else {
        false
    }
}
