use crate::errors::{Error, Result};

/// Most buckets any histogram or profile may hold.
pub const MAX_BINS: usize = 1_000;

/// One equal-width bucket of a histogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistributionBin {
    pub range_min: f64,
    pub range_max: f64,
    pub center: f64,
    pub count: usize,
    /// Share of all observations, in percent.
    pub percentage: f64,
}

/// Equal-width partition of `[min, max]` into a fixed number of bins.
///
/// A zero-width range collapses to a single bin holding every observation. The bin
/// count never exceeds [`MAX_BINS`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Binning {
    pub min: f64,
    pub max: f64,
    pub bins: usize,
}

impl Binning {
    /// Spans the observed values. `None` for an empty input.
    pub fn spanning(values: &[f64], bins: usize) -> Option<Self> {
        let min = values.iter().copied().reduce(f64::min)?;
        let max = values.iter().copied().reduce(f64::max)?;
        let bins = if max > min { bins.clamp(1, MAX_BINS) } else { 1 };
        Some(Self { min, max, bins })
    }

    /// Bucket of `value`: `floor((value - min) / range * bins)` clipped to the last bin.
    pub fn index_of(&self, value: f64) -> usize {
        let range = self.max - self.min;
        if range <= 0.0 {
            return 0;
        }
        let raw = ((value - self.min) / range * self.bins as f64).floor();
        (raw.max(0.0) as usize).min(self.bins - 1)
    }

    /// Lower and upper edge of bucket `i`. The last upper edge is exactly `max`.
    pub fn edges(&self, i: usize) -> (f64, f64) {
        let width = (self.max - self.min) / self.bins as f64;
        let lo = self.min + width * i as f64;
        let hi = if i + 1 == self.bins {
            self.max
        } else {
            self.min + width * (i + 1) as f64
        };
        (lo, hi)
    }
}

pub(crate) fn check_bins(indicator: &'static str, bins: usize) -> Result<()> {
    match bins {
        0 => Err(Error::invalid_param(indicator, "bins", "must be at least 1")),
        n if n > MAX_BINS => Err(Error::invalid_param(
            indicator,
            "bins",
            format!("{n} exceeds the limit of {MAX_BINS}"),
        )),
        _ => Ok(()),
    }
}

/// Counts `values` into `bins` equal-width buckets spanning their range.
///
/// `sum(count)` always equals `values.len()`. An empty input yields no bins.
pub fn histogram(values: &[f64], bins: usize) -> Vec<DistributionBin> {
    let Some(binning) = Binning::spanning(values, bins) else {
        return Vec::new();
    };

    let mut counts = vec![0usize; binning.bins];
    for &v in values {
        counts[binning.index_of(v)] += 1;
    }

    let total = values.len() as f64;
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let (range_min, range_max) = binning.edges(i);
            DistributionBin {
                range_min,
                range_max,
                center: (range_min + range_max) / 2.0,
                count,
                percentage: count as f64 / total * 100.0,
            }
        })
        .collect()
}
