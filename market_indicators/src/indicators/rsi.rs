use crate::{
    errors::Result,
    indicators::{check_period, insufficient},
    models::point::Value,
};

/// Relative Strength Index with Wilder's smoothing.
///
/// The seed averages are simple means of the first `period` gains and losses, giving
/// the first value at index `period`. After that each average follows
/// `avg = (avg * (period - 1) + current) / period`. A zero average loss yields 100.
pub fn rsi(closes: &[f64], period: usize) -> Result<Vec<Value>> {
    check_period("rsi", "period", period)?;
    let mut out = vec![None; closes.len()];
    if insufficient("rsi", closes.len(), period + 1) {
        return Ok(out);
    }

    let p = period as f64;
    let (mut avg_gain, mut avg_loss) = (0.0, 0.0);
    for w in closes[..=period].windows(2) {
        let delta = w[1] - w[0];
        avg_gain += delta.max(0.0);
        avg_loss += (-delta).max(0.0);
    }
    avg_gain /= p;
    avg_loss /= p;
    out[period] = Some(strength(avg_gain, avg_loss));

    for i in period + 1..closes.len() {
        let delta = closes[i] - closes[i - 1];
        avg_gain = (avg_gain * (p - 1.0) + delta.max(0.0)) / p;
        avg_loss = (avg_loss * (p - 1.0) + (-delta).max(0.0)) / p;
        out[i] = Some(strength(avg_gain, avg_loss));
    }
    Ok(out)
}

fn strength(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}
