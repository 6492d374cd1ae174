//! Market summary card: trailing 24h price statistics and the latest value of the
//! headline indicators.
//!
//! Price statistics and moving averages cover the candles within
//! [`STATS_WINDOW_HOURS`] of the last candle. RSI, MACD, Bollinger Bands and the
//! volatility read the whole series with their default parameters.

use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    distribution::stats,
    errors::Result,
    indicators,
    models::{
        candle_series::CandleSeries,
        point::{BandPoint, MacdPoint, Value},
    },
};

pub const STATS_WINDOW_HOURS: i64 = 24;
/// Moving averages reported when the window holds enough closes.
pub const MA_PERIODS: [usize; 3] = [5, 20, 50];
/// Closes in the trailing sample standard deviation reported as `volatility`.
pub const VOLATILITY_PERIOD: usize = 20;

const RSI_PERIOD: usize = 14;
const MACD_PERIODS: (usize, usize, usize) = (12, 26, 9);
const BOLLINGER_PERIOD: usize = 20;
const BOLLINGER_STD_DEV: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketStats {
    pub symbol: String,
    pub current_price: Value,
    /// Percent change of the last close against the first open of the window; 0 when
    /// that open is 0.
    pub change_24h: Value,
    pub high_24h: Value,
    pub low_24h: Value,
    pub volume_24h: f64,
    pub data_points: usize,
    /// `"MA5"`, `"MA20"`, `"MA50"`, each present only when defined.
    pub moving_averages: IndexMap<String, f64>,
    pub rsi: Value,
    pub macd: MacdPoint,
    pub bollinger_bands: BandPoint,
    pub volatility: Value,
    /// Time of the last candle.
    pub last_updated: Option<DateTime<Utc>>,
}

pub fn market_stats(series: &CandleSeries) -> Result<MarketStats> {
    let candles = series.candles();
    let last_updated = candles.last().map(|c| c.time);
    let window = match last_updated {
        Some(end) => {
            let cutoff = end - Duration::hours(STATS_WINDOW_HOURS);
            &candles[candles.partition_point(|c| c.time <= cutoff)..]
        }
        None => candles,
    };

    let current_price = window.last().map(|c| c.close);
    let change_24h = window.first().zip(current_price).map(|(first, current)| {
        if first.open == 0.0 {
            0.0
        } else {
            (current - first.open) / first.open * 100.0
        }
    });

    let window_closes: Vec<f64> = window.iter().map(|c| c.close).collect();
    let mut moving_averages = IndexMap::new();
    for period in MA_PERIODS {
        if let Some(ma) = latest(indicators::sma(&window_closes, period)?) {
            moving_averages.insert(format!("MA{period}"), ma);
        }
    }

    let closes = series.closes();
    let (fast, slow, signal) = MACD_PERIODS;
    let volatility = closes
        .len()
        .checked_sub(VOLATILITY_PERIOD)
        .and_then(|start| stats::sample_std_dev(&closes[start..]));

    Ok(MarketStats {
        symbol: series.symbol().to_string(),
        current_price,
        change_24h,
        high_24h: window.iter().map(|c| c.high).reduce(f64::max),
        low_24h: window.iter().map(|c| c.low).reduce(f64::min),
        volume_24h: window.iter().map(|c| c.volume).sum(),
        data_points: window.len(),
        moving_averages,
        rsi: latest(indicators::rsi(&closes, RSI_PERIOD)?),
        macd: indicators::macd(&closes, fast, slow, signal)?
            .last()
            .copied()
            .unwrap_or_default(),
        bollinger_bands: indicators::bollinger(&closes, BOLLINGER_PERIOD, BOLLINGER_STD_DEV)?
            .last()
            .copied()
            .unwrap_or_default(),
        volatility,
        last_updated,
    })
}

fn latest(values: Vec<Value>) -> Value {
    values.last().copied().flatten()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::models::candle::Candle;

    fn series(step: Duration, closes: &[f64]) -> CandleSeries {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let candles = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Candle::new(t0 + step * i as i32, c, c + 1.0, c - 1.0, c, 2.0))
            .collect();
        CandleSeries::new("BTCUSDT", candles).unwrap()
    }

    #[test]
    fn rising_hour_of_minutes() {
        let closes: Vec<f64> = (1..=60).map(f64::from).collect();
        let s = market_stats(&series(Duration::minutes(1), &closes)).unwrap();

        assert_eq!(s.symbol, "BTCUSDT");
        assert_eq!(s.current_price, Some(60.0));
        assert_eq!(s.change_24h, Some(5900.0));
        assert_eq!((s.high_24h, s.low_24h), (Some(61.0), Some(0.0)));
        assert_eq!(s.volume_24h, 120.0);
        assert_eq!(s.data_points, 60);
        assert_eq!(s.moving_averages["MA5"], 58.0);
        assert_eq!(s.moving_averages["MA20"], 50.5);
        assert_eq!(s.moving_averages["MA50"], 35.5);
        assert_eq!(s.rsi, Some(100.0));
        assert!(s.macd.macd.unwrap() > 0.0);
        assert_eq!(s.bollinger_bands.middle, Some(50.5));
        assert!((s.volatility.unwrap() - 35.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn window_keeps_the_last_day() {
        let s = market_stats(&series(Duration::hours(6), &[10.0, 20.0, 40.0, 30.0, 50.0, 60.0])).unwrap();
        // 12h, 18h, 24h and 30h fall within a day of the 30h candle
        assert_eq!(s.data_points, 4);
        assert_eq!(s.change_24h, Some(50.0));
        assert_eq!(s.volume_24h, 8.0);
        assert_eq!(s.low_24h, Some(29.0));
        assert!(s.moving_averages.is_empty());
    }

    #[test]
    fn short_and_empty_series_degrade_to_nulls() {
        let s = market_stats(&series(Duration::minutes(1), &[1.0, 2.0, 3.0])).unwrap();
        assert_eq!(s.rsi, None);
        assert_eq!(s.macd, MacdPoint::default());
        assert_eq!(s.volatility, None);

        let empty = market_stats(&CandleSeries::new("ETHUSDT", Vec::new()).unwrap()).unwrap();
        assert_eq!(empty.data_points, 0);
        assert_eq!(empty.current_price, None);
        assert_eq!(empty.change_24h, None);
        assert_eq!(empty.last_updated, None);
        let json = serde_json::to_value(&empty).unwrap();
        assert!(json["rsi"].is_null());
        assert!(json["bollinger_bands"]["upper"].is_null());
    }
}
