#![allow(dead_code)]

use chrono::{Duration, TimeZone, Utc};
use market_indicators::{Candle, CandleSeries};

/// One-minute candles starting 2024-01-01T00:00:00Z, each spanning ±1% around its close.
pub fn series_from(symbol: &str, rows: &[(f64, f64)]) -> CandleSeries {
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let candles = rows
        .iter()
        .enumerate()
        .map(|(i, &(close, volume))| {
            Candle::new(
                t0 + Duration::minutes(i as i64),
                close,
                close * 1.01,
                close * 0.99,
                close,
                volume,
            )
        })
        .collect();
    CandleSeries::new(symbol, candles).expect("valid test series")
}

pub fn closes_series(symbol: &str, closes: &[f64]) -> CandleSeries {
    let rows: Vec<(f64, f64)> = closes.iter().map(|&c| (c, 1.0)).collect();
    series_from(symbol, &rows)
}
