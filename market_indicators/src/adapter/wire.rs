//! JSON response shapes consumed by the chart layer, one per indicator id.
//!
//! Series responses are arrays exactly as long as the input candles. Warm-up values
//! are `None` and serialize as `null`; nothing is omitted. Times serialize as RFC 3339
//! UTC strings with a `Z` suffix.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    distribution::{
        DistributionBin, PointOfControl, PriceDistribution, PriceStatistics, ReturnDistribution,
        RiskMetrics, ValueArea, VolumeProfile,
    },
    depth::{OrderBookDepth, SpreadPoint},
    models::{
        candle_series::CandleSeries,
        point::{BandPoint, CorrelationPoint, MacdPoint, Value},
    },
    summary::MarketStats,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RsiPoint {
    pub time: DateTime<Utc>,
    pub rsi: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtrPoint {
    pub time: DateTime<Utc>,
    pub atr: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmaPoint {
    pub time: DateTime<Utc>,
    pub sma: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmaPoint {
    pub time: DateTime<Utc>,
    pub ema: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdWirePoint {
    pub time: DateTime<Utc>,
    pub macd: Value,
    pub signal: Value,
    pub histogram: Value,
}

/// Bollinger point with the close echoed as `price` for the overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BollingerWirePoint {
    pub time: DateTime<Utc>,
    pub upper: Value,
    pub middle: Value,
    pub lower: Value,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationWirePoint {
    pub time: DateTime<Utc>,
    pub correlation1: Value,
    pub correlation2: Value,
    pub symbol1: String,
    pub symbol2: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandlestickPoint {
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumePoint {
    pub time: DateTime<Utc>,
    pub volume: f64,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileLevel {
    pub price_level: f64,
    pub volume: f64,
    pub volume_percentage: f64,
    pub bin_index: usize,
    pub price_min: f64,
    pub price_max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeProfileResponse {
    pub profile: Vec<ProfileLevel>,
    pub poc: Option<PointOfControl>,
    pub value_area: Option<ValueArea>,
    pub total_volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnBin {
    pub return_min: f64,
    pub return_max: f64,
    pub return_center: f64,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnDistributionResponse {
    pub histogram: Vec<ReturnBin>,
    pub risk_metrics: RiskMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBin {
    pub price_min: f64,
    pub price_max: f64,
    pub price_center: f64,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceDistributionResponse {
    pub histogram: Vec<PriceBin>,
    pub statistics: PriceStatistics,
}

/// Any response the registry can produce. Serializes without a tag: series as arrays;
/// distributions, the volume profile, market statistics and order-book depth as objects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IndicatorResponse {
    Candlestick(Vec<CandlestickPoint>),
    Volume(Vec<VolumePoint>),
    Sma(Vec<SmaPoint>),
    Ema(Vec<EmaPoint>),
    Rsi(Vec<RsiPoint>),
    Macd(Vec<MacdWirePoint>),
    Bollinger(Vec<BollingerWirePoint>),
    Atr(Vec<AtrPoint>),
    Correlation(Vec<CorrelationWirePoint>),
    VolumeProfile(VolumeProfileResponse),
    ReturnDistribution(ReturnDistributionResponse),
    PriceDistribution(PriceDistributionResponse),
    MarketStats(MarketStats),
    OrderBook(OrderBookDepth),
    Spread(Vec<SpreadPoint>),
}

impl IndicatorResponse {
    /// Number of points for series responses; `None` for object responses.
    pub fn series_len(&self) -> Option<usize> {
        match self {
            IndicatorResponse::Candlestick(v) => Some(v.len()),
            IndicatorResponse::Volume(v) => Some(v.len()),
            IndicatorResponse::Sma(v) => Some(v.len()),
            IndicatorResponse::Ema(v) => Some(v.len()),
            IndicatorResponse::Rsi(v) => Some(v.len()),
            IndicatorResponse::Macd(v) => Some(v.len()),
            IndicatorResponse::Bollinger(v) => Some(v.len()),
            IndicatorResponse::Atr(v) => Some(v.len()),
            IndicatorResponse::Correlation(v) => Some(v.len()),
            IndicatorResponse::Spread(v) => Some(v.len()),
            IndicatorResponse::VolumeProfile(_)
            | IndicatorResponse::ReturnDistribution(_)
            | IndicatorResponse::PriceDistribution(_)
            | IndicatorResponse::MarketStats(_)
            | IndicatorResponse::OrderBook(_) => None,
        }
    }
}

fn timed<T, P>(series: &CandleSeries, values: Vec<T>, point: impl Fn(DateTime<Utc>, T) -> P) -> Vec<P> {
    series
        .candles()
        .iter()
        .zip(values)
        .map(|(c, v)| point(c.time, v))
        .collect()
}

pub fn candlestick(series: &CandleSeries) -> Vec<CandlestickPoint> {
    series
        .candles()
        .iter()
        .map(|c| CandlestickPoint {
            time: c.time,
            open: c.open,
            high: c.high,
            low: c.low,
            close: c.close,
            volume: c.volume,
        })
        .collect()
}

pub fn volume(series: &CandleSeries) -> Vec<VolumePoint> {
    series
        .candles()
        .iter()
        .map(|c| VolumePoint {
            time: c.time,
            volume: c.volume,
            price: c.close,
        })
        .collect()
}

pub fn sma_series(series: &CandleSeries, values: Vec<Value>) -> Vec<SmaPoint> {
    timed(series, values, |time, sma| SmaPoint { time, sma })
}

pub fn ema_series(series: &CandleSeries, values: Vec<Value>) -> Vec<EmaPoint> {
    timed(series, values, |time, ema| EmaPoint { time, ema })
}

pub fn rsi_series(series: &CandleSeries, values: Vec<Value>) -> Vec<RsiPoint> {
    timed(series, values, |time, rsi| RsiPoint { time, rsi })
}

pub fn atr_series(series: &CandleSeries, values: Vec<Value>) -> Vec<AtrPoint> {
    timed(series, values, |time, atr| AtrPoint { time, atr })
}

pub fn macd_series(series: &CandleSeries, points: Vec<MacdPoint>) -> Vec<MacdWirePoint> {
    timed(series, points, |time, p| MacdWirePoint {
        time,
        macd: p.macd,
        signal: p.signal,
        histogram: p.histogram,
    })
}

pub fn bollinger_series(series: &CandleSeries, bands: Vec<BandPoint>) -> Vec<BollingerWirePoint> {
    let priced: Vec<(BandPoint, f64)> = bands.into_iter().zip(series.closes()).collect();
    timed(series, priced, |time, (b, price)| BollingerWirePoint {
        time,
        upper: b.upper,
        middle: b.middle,
        lower: b.lower,
        price,
    })
}

pub fn correlation_series(
    series: &CandleSeries,
    points: Vec<CorrelationPoint>,
    symbol1: &str,
    symbol2: &str,
) -> Vec<CorrelationWirePoint> {
    timed(series, points, |time, p| CorrelationWirePoint {
        time,
        correlation1: p.first,
        correlation2: p.second,
        symbol1: symbol1.to_string(),
        symbol2: symbol2.to_string(),
    })
}

impl From<VolumeProfile> for VolumeProfileResponse {
    fn from(vp: VolumeProfile) -> Self {
        Self {
            profile: vp
                .bins
                .into_iter()
                .map(|b| ProfileLevel {
                    price_level: b.price_level,
                    volume: b.volume,
                    volume_percentage: b.volume_percentage,
                    bin_index: b.index,
                    price_min: b.price_min,
                    price_max: b.price_max,
                })
                .collect(),
            poc: vp.poc,
            value_area: vp.value_area,
            total_volume: vp.total_volume,
        }
    }
}

impl From<&DistributionBin> for ReturnBin {
    fn from(b: &DistributionBin) -> Self {
        Self {
            return_min: b.range_min,
            return_max: b.range_max,
            return_center: b.center,
            count: b.count,
            percentage: b.percentage,
        }
    }
}

impl From<&DistributionBin> for PriceBin {
    fn from(b: &DistributionBin) -> Self {
        Self {
            price_min: b.range_min,
            price_max: b.range_max,
            price_center: b.center,
            count: b.count,
            percentage: b.percentage,
        }
    }
}

impl From<ReturnDistribution> for ReturnDistributionResponse {
    fn from(d: ReturnDistribution) -> Self {
        Self {
            histogram: d.bins.iter().map(ReturnBin::from).collect(),
            risk_metrics: d.risk_metrics,
        }
    }
}

impl From<PriceDistribution> for PriceDistributionResponse {
    fn from(d: PriceDistribution) -> Self {
        Self {
            histogram: d.bins.iter().map(PriceBin::from).collect(),
            statistics: d.statistics,
        }
    }
}
