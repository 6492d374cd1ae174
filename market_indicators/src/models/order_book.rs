//! Order-book snapshots: price levels captured at one instant, grouped per side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookSide {
    Bid,
    Ask,
}

/// One resting price level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BookLevel {
    pub price: f64,
    pub quantity: f64,
}

/// All levels captured at one time. Bids are sorted by price descending, asks ascending,
/// so the best quote of each side comes first.
#[derive(Debug, Clone, PartialEq)]
pub struct BookSnapshot {
    pub time: DateTime<Utc>,
    pub bids: Vec<BookLevel>,
    pub asks: Vec<BookLevel>,
}

impl BookSnapshot {
    pub fn best_bid(&self) -> Option<BookLevel> {
        self.bids.first().copied()
    }

    pub fn best_ask(&self) -> Option<BookLevel> {
        self.asks.first().copied()
    }
}

/// Snapshots of one symbol's book in ascending time order. Built by
/// [`build_order_book`](crate::adapter::build_order_book).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderBookHistory {
    symbol: String,
    snapshots: Vec<BookSnapshot>,
}

impl OrderBookHistory {
    pub(crate) fn new(symbol: impl Into<String>, snapshots: Vec<BookSnapshot>) -> Self {
        Self {
            symbol: symbol.into(),
            snapshots,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn snapshots(&self) -> &[BookSnapshot] {
        &self.snapshots
    }

    pub fn latest(&self) -> Option<&BookSnapshot> {
        self.snapshots.last()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
