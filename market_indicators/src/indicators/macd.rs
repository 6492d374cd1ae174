use crate::{
    errors::Result,
    indicators::{check_period, insufficient, moving_average::ema},
    models::point::MacdPoint,
};

/// Fewest closes that give a defined MACD point.
pub fn min_len(fast: usize, slow: usize, signal: usize) -> usize {
    fast.max(slow) + signal - 1
}

/// Moving Average Convergence Divergence.
///
/// `macd = EMA(fast) - EMA(slow)`, `signal = EMA(signal)` of the MACD line and
/// `histogram = macd - signal`. A point is defined only once the signal EMA has been
/// seeded; every earlier point is entirely `None`.
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Result<Vec<MacdPoint>> {
    check_period("macd", "fast_period", fast)?;
    check_period("macd", "slow_period", slow)?;
    check_period("macd", "signal_period", signal)?;

    let mut out = vec![MacdPoint::default(); closes.len()];
    if insufficient("macd", closes.len(), min_len(fast, slow, signal)) {
        return Ok(out);
    }

    let fast_ema = ema(closes, fast)?;
    let slow_ema = ema(closes, slow)?;

    // both EMAs are defined from here on
    let start = fast.max(slow) - 1;
    let line: Vec<f64> = fast_ema[start..]
        .iter()
        .zip(&slow_ema[start..])
        .filter_map(|(f, s)| Some((*f)? - (*s)?))
        .collect();
    let signal_line = ema(&line, signal)?;

    for (offset, (m, s)) in line.iter().zip(signal_line).enumerate() {
        if let Some(s) = s {
            out[start + offset] = MacdPoint {
                macd: Some(*m),
                signal: Some(s),
                histogram: Some(m - s),
            };
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    #[test]
    fn first_defined_point_follows_signal_seed() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let out = macd(&closes, 12, 26, 9).unwrap();
        assert_eq!(out.len(), 40);
        let first = out.iter().position(|p| p.macd.is_some()).unwrap();
        assert_eq!(first, min_len(12, 26, 9) - 1);
        assert!(out[first..].iter().all(|p| p.signal.is_some() && p.histogram.is_some()));
        assert!(out[..first].iter().all(|p| *p == MacdPoint::default()));
    }

    #[test]
    fn histogram_is_macd_minus_signal() {
        let closes: Vec<f64> = (0..20).map(|i| (i * i) as f64).collect();
        for p in macd(&closes, 3, 6, 4).unwrap().into_iter().filter(|p| p.macd.is_some()) {
            let (m, s, h) = (p.macd.unwrap(), p.signal.unwrap(), p.histogram.unwrap());
            assert!((m - s - h).abs() < 1e-12);
        }
    }

    #[test]
    fn constant_prices_converge_to_zero() {
        let out = macd(&[50.0; 10], 2, 4, 3).unwrap();
        assert!(out[4].macd.is_none());
        assert!(out[5].macd.unwrap().abs() < 1e-9);
        assert!(out[9].histogram.unwrap().abs() < 1e-9);
    }

    #[test]
    fn short_series_and_bad_periods() {
        assert!(macd(&[1.0; 30], 12, 26, 9).unwrap().iter().all(|p| p.macd.is_none()));
        assert!(matches!(macd(&[1.0; 30], 12, 0, 9), Err(Error::InvalidParameter { .. })));
    }
}
