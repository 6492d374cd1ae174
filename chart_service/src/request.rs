//! Request handling: raw request JSON in, wire response out.

use indexmap::IndexMap;
use market_indicators::{
    CandleSeries, ChartKind, ComputeContext, IndicatorKind, IndicatorResponse, OrderBookKind,
    ParamValue, ParameterSet, Timeframe,
    adapter::{RawBookLevel, RawCandle},
    build_order_book, build_series, compute_indicator, compute_order_book, resample,
};
use serde::Deserialize;
use tracing::{debug, info, info_span};

use crate::{
    config::DashboardConfig,
    error::{Result, ServiceError},
};

/// One chart computation, as sent by the presentation layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComputeRequest {
    pub indicator: String,
    pub symbol: String,
    /// Target candle interval. When absent the candles are used at their own interval.
    #[serde(default)]
    pub interval: Option<String>,
    /// Candles of `symbol`. Order-book charts ignore them.
    #[serde(default)]
    pub candles: Vec<RawCandle>,
    /// Candles of comparison symbols, keyed by symbol. Only correlation reads them.
    #[serde(default)]
    pub peers: IndexMap<String, Vec<RawCandle>>,
    /// Order-book levels of `symbol`. Only order-book charts read them.
    #[serde(default)]
    pub orderbook: Vec<RawBookLevel>,
    #[serde(default)]
    pub params: ParameterSet,
}

/// Computes chart responses against one dashboard configuration.
#[derive(Debug, Clone, Default)]
pub struct ChartService {
    config: DashboardConfig,
}

impl ChartService {
    pub fn new(config: DashboardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn handle(&self, req: &ComputeRequest) -> Result<IndicatorResponse> {
        let kind: ChartKind = req
            .indicator
            .parse()
            .map_err(|_| ServiceError::UnknownIndicator(req.indicator.clone()))?;
        let symbol = req.symbol.trim().to_uppercase();
        let span = info_span!("handle", indicator = kind.id(), symbol = %symbol);
        let _guard = span.enter();

        match kind {
            ChartKind::Candles(kind) => self.handle_candles(kind, &symbol, req),
            ChartKind::OrderBook(kind) => self.handle_order_book(kind, &symbol, req),
        }
    }

    fn handle_candles(
        &self,
        kind: IndicatorKind,
        symbol: &str,
        req: &ComputeRequest,
    ) -> Result<IndicatorResponse> {
        let interval = req.interval.as_deref().map(parse_interval).transpose()?;
        let series = at_interval(build_series(symbol, &req.candles)?, interval)?;

        let mut params = self.config.layered_params(kind, &req.params);
        let mut peers: Vec<CandleSeries> = Vec::new();
        if kind == IndicatorKind::Correlation {
            let (first, second) = self.comparison_symbols(symbol, &mut params)?;
            for peer in [first, second] {
                if peers.iter().any(|p| p.symbol() == peer) {
                    continue;
                }
                if let Some(records) = peer_records(&req.peers, &peer) {
                    peers.push(at_interval(build_series(&peer, records)?, interval)?);
                }
            }
        }

        let ctx = ComputeContext::with_peers(&series, &peers);
        let response = compute_indicator(kind, &ctx, &params)?;
        info!(candles = series.len(), points = ?response.series_len(), "computed chart data");
        Ok(response)
    }

    fn handle_order_book(
        &self,
        kind: OrderBookKind,
        symbol: &str,
        req: &ComputeRequest,
    ) -> Result<IndicatorResponse> {
        let book = build_order_book(symbol, &req.orderbook)?;
        let params = self.config.layered_params(kind, &req.params);
        let response = compute_order_book(kind, &book, &params)?;
        info!(snapshots = book.len(), points = ?response.series_len(), "computed order book data");
        Ok(response)
    }

    /// Fills absent comparison symbols from the configured symbols and returns both.
    fn comparison_symbols(&self, base: &str, params: &mut ParameterSet) -> Result<(String, String)> {
        let named = |params: &ParameterSet, key: &str| match params.get(key) {
            Some(ParamValue::Text(s)) if !s.trim().is_empty() => Some(s.trim().to_uppercase()),
            _ => None,
        };
        let (first, second) = match (named(params, "compare_symbol1"), named(params, "compare_symbol2")) {
            (Some(first), Some(second)) => (first, second),
            (first, second) => {
                let (auto1, auto2) = self
                    .config
                    .comparison_symbols(base)
                    .ok_or_else(|| ServiceError::MissingComparison(base.to_string()))?;
                debug!(%auto1, %auto2, "selected comparison symbols");
                (first.unwrap_or(auto1), second.unwrap_or(auto2))
            }
        };
        params.insert("compare_symbol1".into(), ParamValue::Text(first.clone()));
        params.insert("compare_symbol2".into(), ParamValue::Text(second.clone()));
        Ok((first, second))
    }
}

fn parse_interval(interval: &str) -> Result<Timeframe> {
    let interval = interval.trim();
    interval.parse().map_err(|source| ServiceError::InvalidInterval {
        interval: interval.to_string(),
        source,
    })
}

/// Resamples `series` to `interval`, or passes it through when none was requested.
fn at_interval(series: CandleSeries, interval: Option<Timeframe>) -> Result<CandleSeries> {
    match interval {
        Some(interval) => Ok(resample(&series, interval)?),
        None => Ok(series),
    }
}

fn peer_records<'a>(peers: &'a IndexMap<String, Vec<RawCandle>>, symbol: &str) -> Option<&'a [RawCandle]> {
    peers
        .iter()
        .find(|(k, _)| k.trim().eq_ignore_ascii_case(symbol))
        .map(|(_, v)| v.as_slice())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn candles(closes: &[f64]) -> serde_json::Value {
        closes
            .iter()
            .enumerate()
            .map(|(i, c)| {
                json!({
                    "time": 1_704_067_200_000_i64 + i as i64 * 60_000,
                    "open": c, "high": c + 1.0, "low": c - 1.0, "close": c, "volume": 2.0
                })
            })
            .collect()
    }

    fn request(value: serde_json::Value) -> ComputeRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn unknown_indicator() {
        let req = request(json!({"indicator": "stochastic", "symbol": "BTCUSDT", "candles": candles(&[1.0, 2.0])}));
        let err = ChartService::default().handle(&req).unwrap_err();
        assert!(matches!(err, ServiceError::UnknownIndicator(id) if id == "stochastic"));
    }

    #[test]
    fn bad_interval() {
        let req = request(json!({
            "indicator": "sma", "symbol": "BTCUSDT", "interval": "3w", "candles": candles(&[1.0, 2.0])
        }));
        let err = ChartService::default().handle(&req).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInterval { interval, .. } if interval == "3w"));
    }

    #[test]
    fn request_interval_resamples() {
        let req = request(json!({
            "indicator": "candlestick", "symbol": "btcusdt", "interval": "2m",
            "candles": candles(&[1.0, 2.0, 3.0, 4.0, 5.0])
        }));
        let resp = ChartService::default().handle(&req).unwrap();
        assert_eq!(resp.series_len(), Some(3));
    }

    #[test]
    fn absent_interval_keeps_candles_as_given() {
        let service = ChartService::new(DashboardConfig {
            default_interval: "1h".into(),
            ..DashboardConfig::default()
        });
        let seconds: serde_json::Value = (0..4)
            .map(|i: i64| {
                json!({
                    "time": 1_704_067_200_000_i64 + i * 15_000,
                    "open": 1.0, "high": 2.0, "low": 1.0, "close": 2.0, "volume": 1.0
                })
            })
            .collect();
        let req = request(json!({"indicator": "candlestick", "symbol": "BTCUSDT", "candles": seconds}));
        let resp = service.handle(&req).unwrap();
        assert_eq!(resp.series_len(), Some(4));
    }

    #[test]
    fn order_book_requests_need_no_candles() {
        let level = |side: &str, price: f64| {
            json!({"captured_at": "2024-01-01T00:00:00Z", "side": side, "price": price, "quantity": 1.0})
        };
        let req = request(json!({
            "indicator": "orderbook", "symbol": "btcusdt", "params": {"limit": 1},
            "orderbook": [level("bid", 99.0), level("bid", 100.0), level("ask", 101.0), level("ask", 102.0)]
        }));
        let value = serde_json::to_value(ChartService::default().handle(&req).unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "bids": [{"price": 100.0, "quantity": 1.0}],
                "asks": [{"price": 101.0, "quantity": 1.0}],
                "timestamp": "2024-01-01T00:00:00Z"
            })
        );
    }

    #[test]
    fn comparison_symbols_fill_from_config() {
        let service = ChartService::default();
        let mut params = ParameterSet::new();
        params.insert("compare_symbol2".into(), ParamValue::from("solusdt"));
        let picked = service.comparison_symbols("BTCUSDT", &mut params).unwrap();
        assert_eq!(picked, ("ETHUSDT".to_string(), "SOLUSDT".to_string()));
        assert_eq!(params["compare_symbol1"], ParamValue::from("ETHUSDT"));
    }

    #[test]
    fn lone_symbol_has_no_comparison() {
        let service = ChartService::new(DashboardConfig {
            symbols: vec!["BTCUSDT".into()],
            ..DashboardConfig::default()
        });
        let req = request(json!({"indicator": "correlation", "symbol": "BTCUSDT", "candles": candles(&[1.0, 2.0])}));
        assert!(matches!(service.handle(&req), Err(ServiceError::MissingComparison(s)) if s == "BTCUSDT"));
    }
}
