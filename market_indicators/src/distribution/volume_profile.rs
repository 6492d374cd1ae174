use serde::Serialize;

use crate::{
    distribution::histogram::{Binning, check_bins},
    errors::Result,
    models::candle_series::CandleSeries,
};

/// Share of total volume the value area must reach.
pub const VALUE_AREA_SHARE: f64 = 0.70;

/// Volume accumulated in one price bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileBin {
    pub index: usize,
    pub price_min: f64,
    pub price_max: f64,
    /// Bucket center.
    pub price_level: f64,
    pub volume: f64,
    /// Share of total volume, in percent; 0 when nothing traded.
    pub volume_percentage: f64,
}

/// Point of control: the bucket holding the most volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointOfControl {
    pub price: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueArea {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VolumeProfile {
    pub bins: Vec<ProfileBin>,
    /// `None` only for an empty series.
    pub poc: Option<PointOfControl>,
    pub value_area: Option<ValueArea>,
    pub total_volume: f64,
}

/// Buckets closing prices into `bins` equal-width levels and accumulates each candle's
/// volume into the bucket of its close.
///
/// The value area starts at the point of control and grows one bucket at a time
/// towards the neighbour with more volume (alternating sides on ties) until it holds
/// [`VALUE_AREA_SHARE`] of the total. Its bounds are bucket edges.
pub fn volume_profile(series: &CandleSeries, bins: usize) -> Result<VolumeProfile> {
    check_bins("volume_profile", bins)?;
    let closes = series.closes();
    let Some(binning) = Binning::spanning(&closes, bins) else {
        return Ok(VolumeProfile {
            bins: Vec::new(),
            poc: None,
            value_area: None,
            total_volume: 0.0,
        });
    };

    let mut volumes = vec![0.0; binning.bins];
    for c in series.candles() {
        volumes[binning.index_of(c.close)] += c.volume;
    }
    let total_volume: f64 = volumes.iter().sum();

    let profile: Vec<ProfileBin> = volumes
        .iter()
        .enumerate()
        .map(|(index, &volume)| {
            let (price_min, price_max) = binning.edges(index);
            ProfileBin {
                index,
                price_min,
                price_max,
                price_level: (price_min + price_max) / 2.0,
                volume,
                volume_percentage: if total_volume > 0.0 {
                    volume / total_volume * 100.0
                } else {
                    0.0
                },
            }
        })
        .collect();

    let poc_index = point_of_control(&volumes);
    let (lo, hi) = value_area_span(&volumes, poc_index, total_volume * VALUE_AREA_SHARE);

    Ok(VolumeProfile {
        poc: Some(PointOfControl {
            price: profile[poc_index].price_level,
            volume: volumes[poc_index],
        }),
        value_area: Some(ValueArea {
            min: profile[lo].price_min,
            max: profile[hi].price_max,
        }),
        bins: profile,
        total_volume,
    })
}

/// Index of the largest volume; ties go to the lowest price.
fn point_of_control(volumes: &[f64]) -> usize {
    volumes
        .iter()
        .enumerate()
        .fold(0, |best, (i, &v)| if v > volumes[best] { i } else { best })
}

/// Inclusive bucket span around `poc` holding at least `target` volume.
fn value_area_span(volumes: &[f64], poc: usize, target: f64) -> (usize, usize) {
    let (mut lo, mut hi) = (poc, poc);
    let mut acc = volumes[poc];
    let mut prefer_above = true;

    while acc < target {
        let below = lo.checked_sub(1).map(|i| volumes[i]);
        let above = volumes.get(hi + 1).copied();
        let take_above = match (below, above) {
            (None, None) => break,
            (None, Some(_)) => true,
            (Some(_), None) => false,
            (Some(b), Some(a)) if a == b => {
                prefer_above = !prefer_above;
                !prefer_above
            }
            (Some(b), Some(a)) => a > b,
        };
        if take_above {
            hi += 1;
            acc += volumes[hi];
        } else {
            lo -= 1;
            acc += volumes[lo];
        }
    }
    (lo, hi)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::models::candle::Candle;

    fn series(rows: &[(f64, f64)]) -> CandleSeries {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let candles = rows
            .iter()
            .enumerate()
            .map(|(i, &(c, v))| Candle::new(t0 + Duration::minutes(i as i64), c, c, c, c, v))
            .collect();
        CandleSeries::new("BTCUSDT", candles).unwrap()
    }

    #[test]
    fn poc_and_value_area() {
        // unit-wide bins over [0, 5]
        let s = series(&[(0.0, 5.0), (1.0, 10.0), (2.0, 40.0), (3.0, 30.0), (5.0, 15.0)]);
        let vp = volume_profile(&s, 5).unwrap();
        assert_eq!(vp.total_volume, 100.0);
        let poc = vp.poc.unwrap();
        assert_eq!(poc.volume, 40.0);
        assert_eq!(poc.price, 2.5);
        // 40 -> +30 (above) = 70
        let va = vp.value_area.unwrap();
        assert_eq!((va.min, va.max), (2.0, 4.0));
        assert_eq!(vp.bins[2].volume_percentage, 40.0);
    }

    #[test]
    fn ties_alternate_sides() {
        assert_eq!(value_area_span(&[10.0, 10.0, 20.0, 10.0, 10.0], 2, 35.0), (1, 3));
        assert_eq!(value_area_span(&[1.0, 5.0, 1.0], 1, 7.0), (0, 2));
        assert_eq!(value_area_span(&[0.0, 0.0], 0, 0.0), (0, 0));
    }

    #[test]
    fn poc_prefers_lowest_price_on_ties() {
        assert_eq!(point_of_control(&[1.0, 3.0, 3.0]), 1);
    }

    #[test]
    fn zero_volume_profile() {
        let vp = volume_profile(&series(&[(1.0, 0.0), (2.0, 0.0)]), 4).unwrap();
        assert_eq!(vp.total_volume, 0.0);
        assert!(vp.bins.iter().all(|b| b.volume_percentage == 0.0));
        let va = vp.value_area.unwrap();
        assert_eq!(va.min, vp.bins[0].price_min);
        assert_eq!(va.max, vp.bins[0].price_max);
    }
}
