//! Parameter Resolution & Registry.
//!
//! Every chart the dashboard can render is an [`IndicatorKind`]. Each kind maps to a
//! static [`RegistryEntry`] holding its parameter schema, its declared minimum input
//! length and the function that computes its wire response. The mapping is a `match`,
//! so adding a kind without registering it does not compile.
//!
//! Order-book charts live in [`order_book`]; [`ChartKind`] covers both tables.

pub mod order_book;
pub mod params;
pub mod schema;

use std::{fmt, str::FromStr};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, debug_span};

use crate::{
    adapter::wire::{self, IndicatorResponse},
    distribution::{price_distribution, return_distribution, volume_profile},
    errors::{Error, Result},
    indicators::{self, macd::min_len},
    models::candle_series::CandleSeries,
    summary::market_stats,
};

use params::{
    BinParams, BollingerParams, CorrelationParams, MacdParams, ParameterSet, PeriodParams,
    ResolvedParams, resolve,
};
use order_book::OrderBookKind;
use schema::ParamSpec;

/// The requested indicator id is not registered.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown indicator: {0}")]
pub struct UnknownIndicatorError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    Candlestick,
    Volume,
    Sma,
    Ema,
    Rsi,
    Macd,
    Bollinger,
    Atr,
    Correlation,
    VolumeProfile,
    ReturnDistribution,
    PriceDistribution,
    MarketStats,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 13] = [
        IndicatorKind::Candlestick,
        IndicatorKind::Volume,
        IndicatorKind::Sma,
        IndicatorKind::Ema,
        IndicatorKind::Rsi,
        IndicatorKind::Macd,
        IndicatorKind::Bollinger,
        IndicatorKind::Atr,
        IndicatorKind::Correlation,
        IndicatorKind::VolumeProfile,
        IndicatorKind::ReturnDistribution,
        IndicatorKind::PriceDistribution,
        IndicatorKind::MarketStats,
    ];

    pub fn entry(self) -> &'static RegistryEntry {
        match self {
            IndicatorKind::Candlestick => &CANDLESTICK,
            IndicatorKind::Volume => &VOLUME,
            IndicatorKind::Sma => &SMA,
            IndicatorKind::Ema => &EMA,
            IndicatorKind::Rsi => &RSI,
            IndicatorKind::Macd => &MACD,
            IndicatorKind::Bollinger => &BOLLINGER,
            IndicatorKind::Atr => &ATR,
            IndicatorKind::Correlation => &CORRELATION,
            IndicatorKind::VolumeProfile => &VOLUME_PROFILE,
            IndicatorKind::ReturnDistribution => &RETURN_DISTRIBUTION,
            IndicatorKind::PriceDistribution => &PRICE_DISTRIBUTION,
            IndicatorKind::MarketStats => &MARKET_STATS,
        }
    }

    /// Wire id, e.g. `"volume_profile"`.
    pub fn id(self) -> &'static str {
        self.entry().id
    }

    pub fn schema(self) -> &'static [ParamSpec] {
        self.entry().schema
    }

    /// Applies schema defaults to `params`.
    pub fn resolve(self, params: &ParameterSet) -> ResolvedParams {
        let entry = self.entry();
        resolve(entry.id, entry.schema, params)
    }

    /// Describes this indicator for the chart layer's parameter controls.
    pub fn metadata(self) -> IndicatorMetadata {
        let entry = self.entry();
        IndicatorMetadata {
            id: entry.id,
            title: entry.title,
            description: entry.description,
            category: entry.category,
            parameters: entry.schema,
            data_format: entry.data_format,
            refresh_secs: entry.refresh_secs,
            min_candles: (entry.min_candles)(&self.resolve(&ParameterSet::new())).ok(),
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for IndicatorKind {
    type Err = UnknownIndicatorError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let id = s.trim().to_ascii_lowercase();
        IndicatorKind::ALL
            .into_iter()
            .find(|k| k.id() == id)
            .ok_or_else(|| UnknownIndicatorError(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Primary,
    Indicator,
    Distribution,
    Summary,
    OrderBook,
}

/// Any chart id the dashboard can request: a candle-based indicator or an order-book
/// view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Candles(IndicatorKind),
    OrderBook(OrderBookKind),
}

impl ChartKind {
    pub fn id(self) -> &'static str {
        match self {
            ChartKind::Candles(kind) => kind.id(),
            ChartKind::OrderBook(kind) => kind.id(),
        }
    }

    pub fn refresh_secs(self) -> u64 {
        match self {
            ChartKind::Candles(kind) => kind.entry().refresh_secs,
            ChartKind::OrderBook(kind) => kind.entry().refresh_secs,
        }
    }

    pub fn metadata(self) -> IndicatorMetadata {
        match self {
            ChartKind::Candles(kind) => kind.metadata(),
            ChartKind::OrderBook(kind) => kind.metadata(),
        }
    }
}

impl From<IndicatorKind> for ChartKind {
    fn from(kind: IndicatorKind) -> Self {
        ChartKind::Candles(kind)
    }
}

impl From<OrderBookKind> for ChartKind {
    fn from(kind: OrderBookKind) -> Self {
        ChartKind::OrderBook(kind)
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ChartKind {
    type Err = UnknownIndicatorError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse::<IndicatorKind>()
            .map(ChartKind::Candles)
            .or_else(|_| s.parse::<OrderBookKind>().map(ChartKind::OrderBook))
    }
}

/// Inputs of one computation: the base series and any comparison series.
#[derive(Debug, Clone, Copy)]
pub struct ComputeContext<'a> {
    pub series: &'a CandleSeries,
    /// Comparison series, looked up by symbol. Only correlation reads them.
    pub peers: &'a [CandleSeries],
}

impl<'a> ComputeContext<'a> {
    pub fn new(series: &'a CandleSeries) -> Self {
        Self { series, peers: &[] }
    }

    pub fn with_peers(series: &'a CandleSeries, peers: &'a [CandleSeries]) -> Self {
        Self { series, peers }
    }

    fn peer(&self, symbol: &str) -> Option<&'a CandleSeries> {
        self.peers.iter().find(|p| p.symbol().eq_ignore_ascii_case(symbol))
    }
}

pub type ComputeFn = fn(&ComputeContext<'_>, &ResolvedParams) -> Result<IndicatorResponse>;
pub type MinCandlesFn = fn(&ResolvedParams) -> Result<usize>;

/// Static description of one registered indicator.
pub struct RegistryEntry {
    pub kind: IndicatorKind,
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: Category,
    pub data_format: &'static str,
    /// Default refresh interval of the chart, in seconds.
    pub refresh_secs: u64,
    pub schema: &'static [ParamSpec],
    /// Candles needed for the first defined output value.
    pub min_candles: MinCandlesFn,
    pub compute: ComputeFn,
}

/// Serializable view of a [`RegistryEntry`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorMetadata {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: Category,
    pub parameters: &'static [ParamSpec],
    pub data_format: &'static str,
    pub refresh_secs: u64,
    /// Minimum candles under default parameters.
    pub min_candles: Option<usize>,
}

/// Metadata of every registered chart: candle indicators in registry order, then the
/// order-book views.
pub fn list_indicators() -> Vec<IndicatorMetadata> {
    IndicatorKind::ALL
        .iter()
        .map(|k| k.metadata())
        .chain(OrderBookKind::ALL.iter().map(|k| k.metadata()))
        .collect()
}

/// Resolves `params` against the schema of `kind` and runs its computation.
///
/// Series responses are always as long as `ctx.series`. A series shorter than the
/// declared minimum yields all-null values, not an error.
pub fn compute_indicator(
    kind: IndicatorKind,
    ctx: &ComputeContext<'_>,
    params: &ParameterSet,
) -> Result<IndicatorResponse> {
    let entry = kind.entry();
    let span = debug_span!("compute_indicator", indicator = entry.id, candles = ctx.series.len());
    let _guard = span.enter();

    let resolved = kind.resolve(params);
    let need = (entry.min_candles)(&resolved)?;
    if ctx.series.len() < need {
        debug!(need, "insufficient data");
    }
    (entry.compute)(ctx, &resolved)
}

const SERIES_REFRESH_SECS: u64 = 15;
const DISTRIBUTION_REFRESH_SECS: u64 = 60;

fn one_candle(_: &ResolvedParams) -> Result<usize> {
    Ok(1)
}

fn period_candles(p: &ResolvedParams) -> Result<usize> {
    Ok(PeriodParams::try_from(p)?.period)
}

fn period_plus_one(p: &ResolvedParams) -> Result<usize> {
    Ok(PeriodParams::try_from(p)?.period + 1)
}

fn bin_candles(p: &ResolvedParams) -> Result<usize> {
    BinParams::try_from(p).map(|_| 1)
}

static CANDLESTICK: RegistryEntry = RegistryEntry {
    kind: IndicatorKind::Candlestick,
    id: "candlestick",
    title: "Price Chart",
    description: "OHLCV candlestick chart with volume",
    category: Category::Primary,
    data_format: "Array of {time, open, high, low, close, volume}",
    refresh_secs: SERIES_REFRESH_SECS,
    schema: &[],
    min_candles: one_candle,
    compute: |ctx, _| Ok(IndicatorResponse::Candlestick(wire::candlestick(ctx.series))),
};

static VOLUME: RegistryEntry = RegistryEntry {
    kind: IndicatorKind::Volume,
    id: "volume",
    title: "Volume",
    description: "Trading volume over time",
    category: Category::Indicator,
    data_format: "Array of {time, volume, price}",
    refresh_secs: SERIES_REFRESH_SECS,
    schema: &[],
    min_candles: one_candle,
    compute: |ctx, _| Ok(IndicatorResponse::Volume(wire::volume(ctx.series))),
};

static SMA: RegistryEntry = RegistryEntry {
    kind: IndicatorKind::Sma,
    id: "sma",
    title: "SMA",
    description: "Simple moving average of closes",
    category: Category::Indicator,
    data_format: "Array of {time, sma}",
    refresh_secs: SERIES_REFRESH_SECS,
    schema: schema::MOVING_AVERAGE,
    min_candles: period_candles,
    compute: |ctx, p| {
        let PeriodParams { period } = p.try_into()?;
        let values = indicators::sma(&ctx.series.closes(), period)?;
        Ok(IndicatorResponse::Sma(wire::sma_series(ctx.series, values)))
    },
};

static EMA: RegistryEntry = RegistryEntry {
    kind: IndicatorKind::Ema,
    id: "ema",
    title: "EMA",
    description: "Exponential moving average of closes",
    category: Category::Indicator,
    data_format: "Array of {time, ema}",
    refresh_secs: SERIES_REFRESH_SECS,
    schema: schema::MOVING_AVERAGE,
    min_candles: period_candles,
    compute: |ctx, p| {
        let PeriodParams { period } = p.try_into()?;
        let values = indicators::ema(&ctx.series.closes(), period)?;
        Ok(IndicatorResponse::Ema(wire::ema_series(ctx.series, values)))
    },
};

static RSI: RegistryEntry = RegistryEntry {
    kind: IndicatorKind::Rsi,
    id: "rsi",
    title: "RSI (14)",
    description: "Relative Strength Index - momentum indicator",
    category: Category::Indicator,
    data_format: "Array of {time, rsi}",
    refresh_secs: SERIES_REFRESH_SECS,
    schema: schema::RSI,
    min_candles: period_plus_one,
    compute: |ctx, p| {
        let PeriodParams { period } = p.try_into()?;
        let values = indicators::rsi(&ctx.series.closes(), period)?;
        Ok(IndicatorResponse::Rsi(wire::rsi_series(ctx.series, values)))
    },
};

static MACD: RegistryEntry = RegistryEntry {
    kind: IndicatorKind::Macd,
    id: "macd",
    title: "MACD",
    description: "Moving Average Convergence Divergence - trend indicator",
    category: Category::Indicator,
    data_format: "Array of {time, macd, signal, histogram}",
    refresh_secs: SERIES_REFRESH_SECS,
    schema: schema::MACD,
    min_candles: |p| {
        let m = MacdParams::try_from(p)?;
        Ok(min_len(m.fast_period, m.slow_period, m.signal_period))
    },
    compute: |ctx, p| {
        let m = MacdParams::try_from(p)?;
        let points = indicators::macd(
            &ctx.series.closes(),
            m.fast_period,
            m.slow_period,
            m.signal_period,
        )?;
        Ok(IndicatorResponse::Macd(wire::macd_series(ctx.series, points)))
    },
};

static BOLLINGER: RegistryEntry = RegistryEntry {
    kind: IndicatorKind::Bollinger,
    id: "bollinger",
    title: "Bollinger Bands",
    description: "Volatility indicator",
    category: Category::Indicator,
    data_format: "Array of {time, upper, middle, lower, price}",
    refresh_secs: SERIES_REFRESH_SECS,
    schema: schema::BOLLINGER,
    min_candles: |p| Ok(BollingerParams::try_from(p)?.period),
    compute: |ctx, p| {
        let b = BollingerParams::try_from(p)?;
        let bands = indicators::bollinger(&ctx.series.closes(), b.period, b.std_dev)?;
        Ok(IndicatorResponse::Bollinger(wire::bollinger_series(ctx.series, bands)))
    },
};

static ATR: RegistryEntry = RegistryEntry {
    kind: IndicatorKind::Atr,
    id: "atr",
    title: "ATR",
    description: "Average True Range - volatility indicator",
    category: Category::Indicator,
    data_format: "Array of {time, atr}",
    refresh_secs: SERIES_REFRESH_SECS,
    schema: schema::ATR,
    min_candles: period_plus_one,
    compute: |ctx, p| {
        let PeriodParams { period } = p.try_into()?;
        let values = indicators::atr(ctx.series, period)?;
        Ok(IndicatorResponse::Atr(wire::atr_series(ctx.series, values)))
    },
};

static CORRELATION: RegistryEntry = RegistryEntry {
    kind: IndicatorKind::Correlation,
    id: "correlation",
    title: "Correlation",
    description: "Rolling correlation against two comparison symbols",
    category: Category::Indicator,
    data_format: "Array of {time, correlation1, correlation2, symbol1, symbol2}",
    refresh_secs: SERIES_REFRESH_SECS,
    schema: schema::CORRELATION,
    min_candles: |p| {
        let c = CorrelationParams::try_from(p)?;
        Ok(match c.basis {
            indicators::CorrelationBasis::Returns => c.window + 1,
            indicators::CorrelationBasis::Prices => c.window,
        })
    },
    compute: compute_correlation,
};

fn compute_correlation(ctx: &ComputeContext<'_>, p: &ResolvedParams) -> Result<IndicatorResponse> {
    let c = CorrelationParams::try_from(p)?;
    let first = comparison(ctx, "compare_symbol1", c.compare_symbol1.as_deref(), 0)?;
    let second = comparison(ctx, "compare_symbol2", c.compare_symbol2.as_deref(), 1)?;

    let points = indicators::correlation(ctx.series, first, second, c.window, c.basis)?;
    Ok(IndicatorResponse::Correlation(wire::correlation_series(
        ctx.series,
        points,
        first.symbol(),
        second.symbol(),
    )))
}

/// The named comparison series, or the peer at `fallback` (then the first peer) when no
/// symbol was given.
fn comparison<'a>(
    ctx: &ComputeContext<'a>,
    key: &'static str,
    symbol: Option<&str>,
    fallback: usize,
) -> Result<&'a CandleSeries> {
    let found = match symbol {
        Some(symbol) => ctx.peer(symbol),
        None => ctx.peers.get(fallback).or_else(|| ctx.peers.first()),
    };
    found.ok_or_else(|| {
        Error::invalid_param(
            "correlation",
            key,
            format!("no candles supplied for {}", symbol.unwrap_or("a comparison symbol")),
        )
    })
}

static VOLUME_PROFILE: RegistryEntry = RegistryEntry {
    kind: IndicatorKind::VolumeProfile,
    id: "volume_profile",
    title: "Volume Profile",
    description: "Volume distribution across price levels",
    category: Category::Distribution,
    data_format: "Object with profile array, POC, value area, and total volume",
    refresh_secs: DISTRIBUTION_REFRESH_SECS,
    schema: schema::VOLUME_PROFILE,
    min_candles: bin_candles,
    compute: |ctx, p| {
        let BinParams { bins } = p.try_into()?;
        Ok(IndicatorResponse::VolumeProfile(volume_profile(ctx.series, bins)?.into()))
    },
};

static RETURN_DISTRIBUTION: RegistryEntry = RegistryEntry {
    kind: IndicatorKind::ReturnDistribution,
    id: "return_distribution",
    title: "Return Distribution",
    description: "Histogram and risk metrics of candle returns",
    category: Category::Distribution,
    data_format: "Object with histogram array and risk_metrics",
    refresh_secs: DISTRIBUTION_REFRESH_SECS,
    schema: schema::RETURN_DISTRIBUTION,
    min_candles: |p| BinParams::try_from(p).map(|_| 2),
    compute: |ctx, p| {
        let BinParams { bins } = p.try_into()?;
        Ok(IndicatorResponse::ReturnDistribution(return_distribution(ctx.series, bins)?.into()))
    },
};

static PRICE_DISTRIBUTION: RegistryEntry = RegistryEntry {
    kind: IndicatorKind::PriceDistribution,
    id: "price_distribution",
    title: "Price Distribution",
    description: "Histogram and summary statistics of closing prices",
    category: Category::Distribution,
    data_format: "Object with histogram array and statistics",
    refresh_secs: DISTRIBUTION_REFRESH_SECS,
    schema: schema::PRICE_DISTRIBUTION,
    min_candles: bin_candles,
    compute: |ctx, p| {
        let BinParams { bins } = p.try_into()?;
        Ok(IndicatorResponse::PriceDistribution(price_distribution(ctx.series, bins)?.into()))
    },
};

static MARKET_STATS: RegistryEntry = RegistryEntry {
    kind: IndicatorKind::MarketStats,
    id: "market_stats",
    title: "Market Statistics",
    description: "24h price statistics and the latest indicator readings",
    category: Category::Summary,
    data_format: "Object with 24h price statistics and latest indicator values",
    refresh_secs: SERIES_REFRESH_SECS,
    schema: &[],
    min_candles: one_candle,
    compute: |ctx, _| Ok(IndicatorResponse::MarketStats(market_stats(ctx.series)?)),
};
