use serde::Serialize;

use crate::{
    distribution::{
        histogram::{DistributionBin, check_bins, histogram},
        stats,
    },
    errors::Result,
    models::{candle_series::CandleSeries, point::Value},
};

/// Summary statistics of the closes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PriceStatistics {
    pub mean: Value,
    pub median: Value,
    /// Sample standard deviation.
    pub std_dev: Value,
    pub min: Value,
    pub max: Value,
    pub range: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceDistribution {
    pub bins: Vec<DistributionBin>,
    pub statistics: PriceStatistics,
}

/// Histogram of closing prices plus their summary statistics.
pub fn price_distribution(series: &CandleSeries, bins: usize) -> Result<PriceDistribution> {
    check_bins("price_distribution", bins)?;
    let closes = series.closes();
    let sorted = stats::sorted(&closes);
    let min = sorted.first().copied();
    let max = sorted.last().copied();

    Ok(PriceDistribution {
        bins: histogram(&closes, bins),
        statistics: PriceStatistics {
            mean: stats::mean(&closes),
            median: stats::percentile_sorted(&sorted, 50.0),
            std_dev: stats::sample_std_dev(&closes),
            min,
            max,
            range: min.zip(max).map(|(lo, hi)| hi - lo),
        },
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::models::candle::Candle;

    #[test]
    fn statistics_and_counts() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let candles = [100.0, 102.0, 101.0, 105.0, 103.0]
            .iter()
            .enumerate()
            .map(|(i, &c)| Candle::new(t0 + Duration::minutes(i as i64), c, c, c, c, 1.0))
            .collect();
        let series = CandleSeries::new("BTCUSDT", candles).unwrap();

        let dist = price_distribution(&series, 40).unwrap();
        assert_eq!(dist.bins.len(), 40);
        assert_eq!(dist.bins.iter().map(|b| b.count).sum::<usize>(), 5);
        assert_eq!(dist.statistics.mean, Some(102.2));
        assert_eq!(dist.statistics.median, Some(102.0));
        assert_eq!(dist.statistics.min, Some(100.0));
        assert_eq!(dist.statistics.max, Some(105.0));
        assert_eq!(dist.statistics.range, Some(5.0));
        assert!(price_distribution(&series, 0).is_err());
    }
}
