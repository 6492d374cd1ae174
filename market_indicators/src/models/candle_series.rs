//! A validated, time-ascending sequence of candles for one symbol.

use chrono::{DateTime, Utc};

use crate::{
    errors::{Error, Result},
    models::candle::Candle,
};

/// Represents a complete candle set for a single symbol.
///
/// Construction goes through [`CandleSeries::new`], which enforces that times are
/// strictly ascending (hence unique) and that every candle passes [`Candle::check`].
/// A series is immutable once built; a refresh builds a fresh one.
#[derive(Debug, Clone, PartialEq)]
pub struct CandleSeries {
    symbol: String,
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// Validates and wraps an already time-sorted candle vector.
    ///
    /// An empty vector is allowed here; the adapter imposes the two-candle minimum
    /// for batches coming from the ingestion pipeline.
    pub fn new(symbol: impl Into<String>, candles: Vec<Candle>) -> Result<Self> {
        for (i, candle) in candles.iter().enumerate() {
            candle
                .check()
                .map_err(|reason| Error::malformed(format!("candle {i} at {}: {reason}", candle.time)))?;
        }
        if let Some(pair) = candles.windows(2).find(|w| w[1].time <= w[0].time) {
            return Err(Error::malformed(format!(
                "candle times not strictly ascending: {} followed by {}",
                pair[0].time, pair[1].time
            )));
        }
        Ok(Self {
            symbol: symbol.into(),
            candles,
        })
    }

    /// Symbol this series belongs to (e.g. "BTCUSDT").
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn times(&self) -> Vec<DateTime<Utc>> {
        self.candles.iter().map(|c| c.time).collect()
    }

    pub fn opens(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.open).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.low).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.volume).collect()
    }
}
