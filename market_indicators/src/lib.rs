//! Technical indicators and chart-data shaping for crypto candle series.
//!
//! Raw exchange candles enter through [`adapter::build_series`], indicators and
//! distributions are computed by [`registry::compute_indicator`], and the result is a
//! serializable [`adapter::wire::IndicatorResponse`]. Order-book snapshots take the
//! parallel path through [`adapter::build_order_book`] and
//! [`registry::order_book::compute_order_book`].

pub mod adapter;
pub mod depth;
pub mod distribution;
pub mod errors;
pub mod indicators;
pub mod models;
pub mod registry;
pub mod summary;

pub use adapter::{build_order_book, build_series, resample, wire::IndicatorResponse};
pub use errors::{Error, Result};
pub use models::{
    candle::Candle, candle_series::CandleSeries, order_book::OrderBookHistory, timeframe::Timeframe,
};
pub use registry::{
    ChartKind, ComputeContext, IndicatorKind, compute_indicator, list_indicators,
    order_book::{OrderBookKind, compute_order_book},
    params::{ParamValue, ParameterSet},
};
