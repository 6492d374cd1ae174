//! Sample statistics shared by the distribution builders.
//!
//! Every function returns `None` where the statistic is undefined (empty input, a
//! single observation for sample deviation, zero variance for the standardized
//! moments).

use crate::models::point::Value;

pub fn mean(values: &[f64]) -> Value {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Standard deviation with the `n - 1` denominator.
pub fn sample_std_dev(values: &[f64]) -> Value {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss = values.iter().map(|x| (x - m).powi(2)).sum::<f64>();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Population central moment of order `k`.
fn central_moment(values: &[f64], m: f64, k: i32) -> f64 {
    values.iter().map(|x| (x - m).powi(k)).sum::<f64>() / values.len() as f64
}

/// Third standardized moment (population).
pub fn skewness(values: &[f64]) -> Value {
    let m = mean(values)?;
    let m2 = central_moment(values, m, 2);
    if m2 == 0.0 {
        return None;
    }
    Some(central_moment(values, m, 3) / m2.powf(1.5))
}

/// Fourth standardized moment minus 3 (population).
pub fn excess_kurtosis(values: &[f64]) -> Value {
    let m = mean(values)?;
    let m2 = central_moment(values, m, 2);
    if m2 == 0.0 {
        return None;
    }
    Some(central_moment(values, m, 4) / (m2 * m2) - 3.0)
}

/// Percentile `p` (0..=100) of ascending-sorted values by linear interpolation between
/// closest ranks, rank = `p / 100 * (n - 1)`.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> Value {
    let last = sorted.len().checked_sub(1)?;
    let rank = (p / 100.0).clamp(0.0, 1.0) * last as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Ascending copy of `values`. Callers only pass finite values.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(f64::total_cmp);
    out
}
