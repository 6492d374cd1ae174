use std::{collections::HashMap, fmt, str::FromStr};

use chrono::{DateTime, Utc};

use crate::{
    errors::{Error, Result},
    indicators::insufficient,
    models::{
        candle_series::CandleSeries,
        point::{CorrelationPoint, Value},
    },
};

/// What the rolling window correlates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorrelationBasis {
    /// Simple percentage returns; the first `window` points are `None`.
    #[default]
    Returns,
    /// Raw close levels; the first `window - 1` points are `None`.
    Prices,
}

impl CorrelationBasis {
    pub const fn as_str(self) -> &'static str {
        match self {
            CorrelationBasis::Returns => "returns",
            CorrelationBasis::Prices => "prices",
        }
    }
}

impl fmt::Display for CorrelationBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CorrelationBasis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "returns" => Ok(CorrelationBasis::Returns),
            "prices" => Ok(CorrelationBasis::Prices),
            other => Err(Error::invalid_param(
                "correlation",
                "basis",
                format!("`{other}` is not one of returns, prices"),
            )),
        }
    }
}

/// Rolling Pearson correlation of `base` against two comparison series.
///
/// Comparison closes are aligned to the base series by candle time; a base candle with
/// no matching comparison candle leaves every window containing it undefined, as does
/// a window in which either side has zero variance.
pub fn correlation(
    base: &CandleSeries,
    first: &CandleSeries,
    second: &CandleSeries,
    window: usize,
    basis: CorrelationBasis,
) -> Result<Vec<CorrelationPoint>> {
    if window < 2 {
        return Err(Error::invalid_param("correlation", "window", "must be at least 2"));
    }

    let need = match basis {
        CorrelationBasis::Returns => window + 1,
        CorrelationBasis::Prices => window,
    };
    if insufficient("correlation", base.len(), need) {
        return Ok(vec![CorrelationPoint::default(); base.len()]);
    }

    let times = base.times();
    let x = observations(&base.closes().into_iter().map(Some).collect::<Vec<_>>(), basis);
    let y1 = observations(&aligned_closes(&times, first), basis);
    let y2 = observations(&aligned_closes(&times, second), basis);

    let r1 = rolling_pearson(&x, &y1, window);
    let r2 = rolling_pearson(&x, &y2, window);
    Ok(r1
        .into_iter()
        .zip(r2)
        .map(|(first, second)| CorrelationPoint { first, second })
        .collect())
}

fn aligned_closes(times: &[DateTime<Utc>], other: &CandleSeries) -> Vec<Value> {
    let by_time: HashMap<DateTime<Utc>, f64> =
        other.candles().iter().map(|c| (c.time, c.close)).collect();
    times.iter().map(|t| by_time.get(t).copied()).collect()
}

fn observations(closes: &[Value], basis: CorrelationBasis) -> Vec<Value> {
    match basis {
        CorrelationBasis::Prices => closes.to_vec(),
        CorrelationBasis::Returns => std::iter::once(None)
            .chain(closes.windows(2).map(|w| match (w[0], w[1]) {
                (Some(prev), Some(cur)) if prev != 0.0 => Some((cur - prev) / prev * 100.0),
                _ => None,
            }))
            .take(closes.len())
            .collect(),
    }
}

fn rolling_pearson(x: &[Value], y: &[Value], window: usize) -> Vec<Value> {
    let mut out = vec![None; x.len()];
    for end in window - 1..x.len() {
        let range = end + 1 - window..=end;
        let pairs: Option<Vec<(f64, f64)>> = x[range.clone()]
            .iter()
            .zip(&y[range])
            .map(|(a, b)| Some(((*a)?, (*b)?)))
            .collect();
        out[end] = pairs.and_then(|p| pearson(&p));
    }
    out
}

/// Pearson r of paired samples, or `None` when either side has zero variance.
pub(crate) fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in pairs {
        let (dx, dy) = (x - mean_x, y - mean_y);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0))
}
