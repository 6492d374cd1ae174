use crate::{errors::Result, indicators::check_period, models::point::Value};

use super::insufficient;

/// Simple moving average over a trailing window of `period` values.
///
/// The first `period - 1` points are `None`.
pub fn sma(values: &[f64], period: usize) -> Result<Vec<Value>> {
    check_period("sma", "period", period)?;
    let mut out = vec![None; values.len()];
    if insufficient("sma", values.len(), period) {
        return Ok(out);
    }

    let mut sum: f64 = values[..period - 1].iter().sum();
    for i in period - 1..values.len() {
        sum += values[i];
        out[i] = Some(sum / period as f64);
        sum -= values[i + 1 - period];
    }
    Ok(out)
}

/// Exponential moving average with `k = 2 / (period + 1)`, seeded with the SMA of the
/// first `period` values at index `period - 1`.
pub fn ema(values: &[f64], period: usize) -> Result<Vec<Value>> {
    check_period("ema", "period", period)?;
    let mut out = vec![None; values.len()];
    if insufficient("ema", values.len(), period) {
        return Ok(out);
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut prev = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(prev);
    for i in period..values.len() {
        prev = values[i] * k + prev * (1.0 - k);
        out[i] = Some(prev);
    }
    Ok(out)
}
