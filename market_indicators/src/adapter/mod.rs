//! Chart Data Adapter.
//!
//! Converts raw exchange candle records into a validated [`CandleSeries`] and raw
//! order-book levels into snapshots ([`build_order_book`]), resamples
//! series into coarser timeframes, and (in [`wire`]) shapes engine output into the
//! JSON structures the presentation layer consumes.
//!
//! Corrupt batches are rejected as a whole rather than silently filtered, so a chart
//! never renders from a partially-dropped series.

pub mod order_book;
pub mod raw;
pub mod resample;
pub mod wire;

use tracing::warn;

use crate::{
    errors::{Error, Result},
    models::{candle::Candle, candle_series::CandleSeries},
};

pub use order_book::build_order_book;
pub use raw::{RawBookLevel, RawCandle, RawNumber, RawTime};
pub use resample::resample;

/// Fewest candles a batch may contain after validation.
pub const MIN_SERIES_LEN: usize = 2;

/// Builds a candle series from raw records.
///
/// Numeric fields may be JSON numbers or numeric strings. Records are sorted ascending
/// by time. The whole batch fails with [`Error::MalformedData`] if any record cannot be
/// parsed, violates the OHLCV invariants, shares a timestamp with another record, or if
/// fewer than [`MIN_SERIES_LEN`] candles remain.
pub fn build_series(symbol: &str, records: &[RawCandle]) -> Result<CandleSeries> {
    let mut candles = records
        .iter()
        .enumerate()
        .map(|(i, raw)| parse_record(raw).map_err(|reason| Error::malformed(format!("record {i}: {reason}"))))
        .collect::<Result<Vec<_>>>()
        .inspect_err(|e| warn!(symbol, error = %e, "rejected candle batch"))?;

    if candles.len() < MIN_SERIES_LEN {
        let err = Error::malformed(format!(
            "need at least {MIN_SERIES_LEN} candles, got {}",
            candles.len()
        ));
        warn!(symbol, error = %err, "rejected candle batch");
        return Err(err);
    }

    candles.sort_by_key(|c| c.time);
    CandleSeries::new(symbol, candles).inspect_err(|e| warn!(symbol, error = %e, "rejected candle batch"))
}

fn parse_record(raw: &RawCandle) -> std::result::Result<Candle, String> {
    Ok(Candle::new(
        raw.time.parse()?,
        raw.open.parse()?,
        raw.high.parse()?,
        raw.low.parse()?,
        raw.close.parse()?,
        raw.volume.parse()?,
    ))
}
