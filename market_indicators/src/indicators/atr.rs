use crate::{
    errors::Result,
    indicators::{check_period, insufficient},
    models::{candle_series::CandleSeries, point::Value},
};

/// True range per candle. The first candle has no prior close and uses `high - low`.
pub fn true_range(series: &CandleSeries) -> Vec<f64> {
    let candles = series.candles();
    candles
        .iter()
        .enumerate()
        .map(|(i, c)| match i.checked_sub(1).map(|p| candles[p].close) {
            Some(prev) => (c.high - c.low)
                .max((c.high - prev).abs())
                .max((c.low - prev).abs()),
            None => c.high - c.low,
        })
        .collect()
}

/// Average True Range with Wilder's smoothing.
///
/// Seeded with the mean of the true ranges at indices `1..=period` (the ones that see a
/// prior close), so the first value sits at index `period`.
pub fn atr(series: &CandleSeries, period: usize) -> Result<Vec<Value>> {
    check_period("atr", "period", period)?;
    let mut out = vec![None; series.len()];
    if insufficient("atr", series.len(), period + 1) {
        return Ok(out);
    }

    let tr = true_range(series);
    let p = period as f64;
    let mut avg = tr[1..=period].iter().sum::<f64>() / p;
    out[period] = Some(avg);
    for i in period + 1..tr.len() {
        avg = (avg * (p - 1.0) + tr[i]) / p;
        out[i] = Some(avg);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::models::candle::Candle;

    fn series(rows: &[(f64, f64, f64)]) -> CandleSeries {
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let candles = rows
            .iter()
            .enumerate()
            .map(|(i, &(h, l, c))| Candle::new(t0 + Duration::minutes(i as i64), c, h, l, c, 1.0))
            .collect();
        CandleSeries::new("BTCUSDT", candles).unwrap()
    }

    #[test]
    fn true_range_uses_prior_close() {
        let s = series(&[(10.0, 8.0, 9.0), (12.0, 11.0, 11.5), (11.0, 7.0, 8.0)]);
        assert_eq!(true_range(&s), vec![2.0, 3.0, 4.5]);
    }

    #[test]
    fn wilder_smoothing_after_seed() {
        let s = series(&[
            (10.0, 8.0, 9.0),
            (12.0, 11.0, 11.5),
            (11.0, 7.0, 8.0),
            (9.0, 8.0, 8.5),
        ]);
        let out = atr(&s, 2).unwrap();
        assert_eq!(out[..2], [None, None]);
        // seed = (3 + 4.5) / 2, then (3.75 * 1 + 1) / 2
        assert_eq!(out[2], Some(3.75));
        assert_eq!(out[3], Some(2.375));
    }

    #[test]
    fn needs_period_plus_one_candles() {
        let s = series(&[(10.0, 8.0, 9.0), (12.0, 11.0, 11.5)]);
        assert_eq!(atr(&s, 2).unwrap(), vec![None, None]);
    }
}
