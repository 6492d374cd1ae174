use crate::{
    errors::Result,
    models::{candle::Candle, candle_series::CandleSeries, timeframe::Timeframe},
};

/// Aggregates a series into epoch-aligned buckets of `tf`.
///
/// Each output candle takes the first open, highest high, lowest low, last close and
/// summed volume of its bucket, stamped with the bucket start. Empty buckets produce
/// no candle.
pub fn resample(series: &CandleSeries, tf: Timeframe) -> Result<CandleSeries> {
    let mut out: Vec<Candle> = Vec::new();
    let mut current: Option<(i64, Candle)> = None;

    for c in series.candles() {
        let id = tf.bucket_id(c.time);
        match current.as_mut() {
            Some((bucket, agg)) if *bucket == id => {
                agg.high = agg.high.max(c.high);
                agg.low = agg.low.min(c.low);
                agg.close = c.close;
                agg.volume += c.volume;
            }
            _ => {
                if let Some((_, done)) = current.take() {
                    out.push(done);
                }
                let mut first = *c;
                first.time = tf.bucket_start(id);
                current = Some((id, first));
            }
        }
    }
    if let Some((_, done)) = current {
        out.push(done);
    }

    CandleSeries::new(series.symbol(), out)
}
