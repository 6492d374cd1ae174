//! Order-book charts. They read snapshots of the book instead of candles, so they have
//! their own kind and entry table next to [`IndicatorKind`](super::IndicatorKind).

use std::{fmt, str::FromStr};

use tracing::{debug, debug_span};

use crate::{
    adapter::wire::IndicatorResponse,
    depth::{order_book_depth, spread_history},
    errors::Result,
    models::order_book::OrderBookHistory,
};

use super::{
    Category, IndicatorMetadata, SERIES_REFRESH_SECS, UnknownIndicatorError,
    params::{LimitParams, ParameterSet, ResolvedParams, resolve},
    schema::{self, ParamSpec},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderBookKind {
    OrderBook,
    Spread,
}

pub type BookComputeFn = fn(&OrderBookHistory, &ResolvedParams) -> Result<IndicatorResponse>;

pub struct OrderBookEntry {
    pub kind: OrderBookKind,
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub data_format: &'static str,
    pub refresh_secs: u64,
    pub schema: &'static [ParamSpec],
    pub compute: BookComputeFn,
}

impl OrderBookKind {
    pub const ALL: [OrderBookKind; 2] = [OrderBookKind::OrderBook, OrderBookKind::Spread];

    pub fn entry(self) -> &'static OrderBookEntry {
        match self {
            OrderBookKind::OrderBook => &ORDER_BOOK,
            OrderBookKind::Spread => &SPREAD,
        }
    }

    pub fn id(self) -> &'static str {
        self.entry().id
    }

    pub fn resolve(self, params: &ParameterSet) -> ResolvedParams {
        let entry = self.entry();
        resolve(entry.id, entry.schema, params)
    }

    pub fn metadata(self) -> IndicatorMetadata {
        let entry = self.entry();
        IndicatorMetadata {
            id: entry.id,
            title: entry.title,
            description: entry.description,
            category: Category::OrderBook,
            parameters: entry.schema,
            data_format: entry.data_format,
            refresh_secs: entry.refresh_secs,
            min_candles: None,
        }
    }
}

impl fmt::Display for OrderBookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for OrderBookKind {
    type Err = UnknownIndicatorError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let id = s.trim().to_ascii_lowercase();
        OrderBookKind::ALL
            .into_iter()
            .find(|k| k.id() == id)
            .ok_or_else(|| UnknownIndicatorError(s.to_string()))
    }
}

/// Resolves `params` against the schema of `kind` and shapes `book` into its response.
///
/// An empty history is not an error: depth comes back with no levels and a `null`
/// timestamp, spread as an empty array.
pub fn compute_order_book(
    kind: OrderBookKind,
    book: &OrderBookHistory,
    params: &ParameterSet,
) -> Result<IndicatorResponse> {
    let entry = kind.entry();
    let span = debug_span!("compute_order_book", chart = entry.id, snapshots = book.len());
    let _guard = span.enter();

    if book.is_empty() {
        debug!("no order book snapshots");
    }
    (entry.compute)(book, &kind.resolve(params))
}

static ORDER_BOOK: OrderBookEntry = OrderBookEntry {
    kind: OrderBookKind::OrderBook,
    id: "orderbook",
    title: "Order Book",
    description: "Market depth with bid/ask price levels",
    data_format: "{bids: [{price, quantity}], asks: [{price, quantity}], timestamp}",
    refresh_secs: SERIES_REFRESH_SECS,
    schema: schema::ORDER_BOOK,
    compute: |book, p| {
        let LimitParams { limit } = p.try_into()?;
        Ok(IndicatorResponse::OrderBook(order_book_depth(book, limit)))
    },
};

static SPREAD: OrderBookEntry = OrderBookEntry {
    kind: OrderBookKind::Spread,
    id: "spread",
    title: "Spread History",
    description: "Best ask minus best bid over time",
    data_format: "Array of {time, spread_value, spread_bps}",
    refresh_secs: SERIES_REFRESH_SECS,
    schema: schema::SPREAD,
    compute: |book, p| {
        let LimitParams { limit } = p.try_into()?;
        Ok(IndicatorResponse::Spread(spread_history(book, limit)))
    },
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Error,
        adapter::{RawBookLevel, RawNumber, RawTime, build_order_book},
        models::order_book::BookSide,
        registry::params::ParamValue,
    };

    fn book() -> OrderBookHistory {
        let level = |second: i64, side, price: f64| RawBookLevel {
            time: RawTime::EpochMillis(1_704_067_200_000 + second * 1_000),
            side,
            price: RawNumber::Number(price),
            quantity: RawNumber::Number(1.0),
        };
        let mut records = Vec::new();
        for second in 0..3 {
            let mid = 100.0 + second as f64;
            for step in 1..=30 {
                records.push(level(second, BookSide::Bid, mid - step as f64 * 0.1));
                records.push(level(second, BookSide::Ask, mid + step as f64 * 0.1));
            }
        }
        build_order_book("BTCUSDT", &records).unwrap()
    }

    #[test]
    fn every_kind_round_trips_through_its_id() {
        for kind in OrderBookKind::ALL {
            assert_eq!(kind.entry().kind, kind);
            assert_eq!(kind.id().parse::<OrderBookKind>().unwrap(), kind);
        }
        assert!("depth".parse::<OrderBookKind>().is_err());
    }

    #[test]
    fn default_limits_apply() {
        let resp = compute_order_book(OrderBookKind::OrderBook, &book(), &ParameterSet::new()).unwrap();
        let IndicatorResponse::OrderBook(depth) = resp else {
            panic!("expected order book depth");
        };
        assert_eq!((depth.bids.len(), depth.asks.len()), (20, 20));
        assert!((depth.bids[0].price - 101.9).abs() < 1e-9);

        let spread = compute_order_book(OrderBookKind::Spread, &book(), &ParameterSet::new()).unwrap();
        assert_eq!(spread.series_len(), Some(3));
    }

    #[test]
    fn limit_must_be_positive() {
        let params: ParameterSet = [("limit".to_string(), ParamValue::Number(0.0))].into_iter().collect();
        let err = compute_order_book(OrderBookKind::Spread, &book(), &params).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { indicator: "spread", .. }));
    }

    #[test]
    fn metadata_has_no_candle_minimum() {
        let meta = OrderBookKind::OrderBook.metadata();
        assert_eq!(meta.min_candles, None);
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["category"], "orderbook");
        assert_eq!(json["parameters"][0]["default"], 20.0);
    }
}
