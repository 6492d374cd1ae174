use serde::Serialize;

use crate::{
    distribution::{
        histogram::{DistributionBin, check_bins, histogram},
        stats,
    },
    errors::Result,
    models::{candle_series::CandleSeries, point::Value},
};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Percentiles {
    pub p5: Value,
    pub p25: Value,
    pub p50: Value,
    pub p75: Value,
    pub p95: Value,
}

/// Risk metrics of the percentage returns.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RiskMetrics {
    pub mean: Value,
    /// Sample standard deviation.
    pub std_dev: Value,
    pub skewness: Value,
    /// Excess kurtosis.
    pub kurtosis: Value,
    pub min: Value,
    pub max: Value,
    pub percentiles: Percentiles,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnDistribution {
    pub bins: Vec<DistributionBin>,
    pub risk_metrics: RiskMetrics,
}

/// Simple percentage returns `(close[i] - close[i-1]) / close[i-1] * 100`.
///
/// Steps whose previous close is zero have no defined return and are skipped.
pub fn percentage_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0] * 100.0)
        .collect()
}

/// Histogram and risk metrics of candle-to-candle percentage returns.
pub fn return_distribution(series: &CandleSeries, bins: usize) -> Result<ReturnDistribution> {
    check_bins("return_distribution", bins)?;
    let returns = percentage_returns(&series.closes());
    let sorted = stats::sorted(&returns);
    let pct = |p| stats::percentile_sorted(&sorted, p);

    Ok(ReturnDistribution {
        bins: histogram(&returns, bins),
        risk_metrics: RiskMetrics {
            mean: stats::mean(&returns),
            std_dev: stats::sample_std_dev(&returns),
            skewness: stats::skewness(&returns),
            kurtosis: stats::excess_kurtosis(&returns),
            min: sorted.first().copied(),
            max: sorted.last().copied(),
            percentiles: Percentiles {
                p5: pct(5.0),
                p25: pct(25.0),
                p50: pct(50.0),
                p75: pct(75.0),
                p95: pct(95.0),
            },
        },
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::models::candle::Candle;

    fn series(closes: &[f64]) -> CandleSeries {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let candles = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Candle::new(t0 + Duration::minutes(i as i64), c, c, c, c, 1.0))
            .collect();
        CandleSeries::new("BTCUSDT", candles).unwrap()
    }

    #[test]
    fn returns_are_percentages() {
        assert_eq!(percentage_returns(&[100.0, 110.0, 99.0]), vec![10.0, -10.0]);
        assert_eq!(percentage_returns(&[0.0, 5.0, 10.0]), vec![100.0]);
    }

    #[test]
    fn metrics_over_returns() {
        let dist = return_distribution(&series(&[100.0, 110.0, 99.0, 99.0, 108.9]), 30).unwrap();
        assert_eq!(dist.bins.iter().map(|b| b.count).sum::<usize>(), 4);
        let m = dist.risk_metrics;
        assert!((m.mean.unwrap() - 2.5).abs() < 1e-9);
        assert!((m.min.unwrap() + 10.0).abs() < 1e-9);
        assert!((m.max.unwrap() - 10.0).abs() < 1e-9);
        assert!((m.percentiles.p50.unwrap() - 5.0).abs() < 1e-9);
        assert!(m.std_dev.unwrap() > 0.0);
        assert!(m.skewness.is_some() && m.kurtosis.is_some());
    }

    #[test]
    fn flat_prices_have_undefined_moments() {
        let m = return_distribution(&series(&[5.0, 5.0, 5.0]), 10).unwrap().risk_metrics;
        assert_eq!(m.mean, Some(0.0));
        assert_eq!(m.std_dev, Some(0.0));
        assert_eq!(m.skewness, None);
        assert_eq!(m.kurtosis, None);
    }
}
