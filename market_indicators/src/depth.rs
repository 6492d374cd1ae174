//! Market depth views over order-book snapshots: the top of the latest book and the
//! bid/ask spread over time.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::order_book::{BookLevel, OrderBookHistory};

pub const DEFAULT_DEPTH_LIMIT: usize = 20;
pub const DEFAULT_SPREAD_LIMIT: usize = 100;

/// Top levels of the latest snapshot. `timestamp` is `None` for an empty history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderBookDepth {
    pub bids: Vec<BookLevel>,
    pub asks: Vec<BookLevel>,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpreadPoint {
    pub time: DateTime<Utc>,
    /// Best ask minus best bid.
    pub spread_value: f64,
    /// Spread in basis points of the best ask.
    pub spread_bps: f64,
}

/// Up to `limit` bids (price descending) and asks (price ascending) of the latest
/// snapshot.
pub fn order_book_depth(book: &OrderBookHistory, limit: usize) -> OrderBookDepth {
    match book.latest() {
        Some(snapshot) => OrderBookDepth {
            bids: snapshot.bids.iter().take(limit).copied().collect(),
            asks: snapshot.asks.iter().take(limit).copied().collect(),
            timestamp: Some(snapshot.time),
        },
        None => OrderBookDepth {
            bids: Vec::new(),
            asks: Vec::new(),
            timestamp: None,
        },
    }
}

/// The last `limit` snapshots with a positive spread, in ascending time.
///
/// Snapshots missing a side, or whose book is crossed or locked, are skipped.
pub fn spread_history(book: &OrderBookHistory, limit: usize) -> Vec<SpreadPoint> {
    let mut points: Vec<SpreadPoint> = book
        .snapshots()
        .iter()
        .rev()
        .filter_map(|s| {
            let ask = s.best_ask()?.price;
            let spread_value = ask - s.best_bid()?.price;
            (spread_value > 0.0).then(|| SpreadPoint {
                time: s.time,
                spread_value,
                spread_bps: spread_value / ask * 10_000.0,
            })
        })
        .take(limit)
        .collect();
    points.reverse();
    points
}
