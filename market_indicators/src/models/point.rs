//! Derived-series point types.
//!
//! Every indicator returns one point per input candle. Warm-up positions hold
//! `None`, which serializes as `null` and is never confused with a computed zero.

use serde::Serialize;

/// Scalar indicator value; `None` during warm-up.
pub type Value = Option<f64>;

/// One MACD output point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MacdPoint {
    pub macd: Value,
    pub signal: Value,
    pub histogram: Value,
}

/// One Bollinger Bands output point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BandPoint {
    pub upper: Value,
    pub middle: Value,
    pub lower: Value,
}

/// Rolling correlation of the base series against two comparison series.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CorrelationPoint {
    pub first: Value,
    pub second: Value,
}
