use crate::{
    errors::{Error, Result},
    indicators::{check_period, insufficient},
    models::point::BandPoint,
};

/// Bollinger Bands: an SMA middle band with upper and lower bands `std_dev` population
/// standard deviations away. The first `period - 1` points are `None`.
pub fn bollinger(closes: &[f64], period: usize, std_dev: f64) -> Result<Vec<BandPoint>> {
    check_period("bollinger", "period", period)?;
    if !std_dev.is_finite() {
        return Err(Error::invalid_param("bollinger", "std_dev", "must be a finite number"));
    }

    let mut out = vec![BandPoint::default(); closes.len()];
    if insufficient("bollinger", closes.len(), period) {
        return Ok(out);
    }

    let n = period as f64;
    for (i, window) in closes.windows(period).enumerate() {
        let mean = window.iter().sum::<f64>() / n;
        let variance = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let width = std_dev * variance.sqrt();
        out[i + period - 1] = BandPoint {
            upper: Some(mean + width),
            middle: Some(mean),
            lower: Some(mean - width),
        };
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_use_population_deviation() {
        let out = bollinger(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 8, 2.0).unwrap();
        // mean 5, population std 2
        assert_eq!(
            out[7],
            BandPoint {
                upper: Some(9.0),
                middle: Some(5.0),
                lower: Some(1.0)
            }
        );
        assert!(out[..7].iter().all(|p| p.middle.is_none()));
    }

    #[test]
    fn zero_multiplier_collapses_bands() {
        let closes = [10.0, 11.5, 9.25, 12.0, 13.0, 8.5];
        for p in bollinger(&closes, 3, 0.0).unwrap().iter().skip(2) {
            assert_eq!(p.upper, p.middle);
            assert_eq!(p.lower, p.middle);
        }
    }

    #[test]
    fn rejects_non_finite_multiplier() {
        assert!(bollinger(&[1.0, 2.0], 2, f64::NAN).is_err());
    }
}
