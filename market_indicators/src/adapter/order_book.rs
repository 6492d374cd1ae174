use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::{
    adapter::raw::RawBookLevel,
    errors::{Error, Result},
    models::order_book::{BookLevel, BookSide, BookSnapshot, OrderBookHistory},
};

/// Groups raw order-book levels into time-ordered snapshots.
///
/// Prices must be finite and positive and quantities finite and non-negative; any
/// violation rejects the whole batch with [`Error::MalformedData`]. An empty batch
/// yields an empty history.
pub fn build_order_book(symbol: &str, records: &[RawBookLevel]) -> Result<OrderBookHistory> {
    let mut by_time: BTreeMap<DateTime<Utc>, (Vec<BookLevel>, Vec<BookLevel>)> = BTreeMap::new();
    for (i, raw) in records.iter().enumerate() {
        let (time, side, level) = parse_level(raw)
            .map_err(|reason| Error::malformed(format!("level {i}: {reason}")))
            .inspect_err(|e| warn!(symbol, error = %e, "rejected order book batch"))?;
        let (bids, asks) = by_time.entry(time).or_default();
        match side {
            BookSide::Bid => bids.push(level),
            BookSide::Ask => asks.push(level),
        }
    }

    let snapshots = by_time
        .into_iter()
        .map(|(time, (mut bids, mut asks))| {
            bids.sort_by(|a, b| b.price.total_cmp(&a.price));
            asks.sort_by(|a, b| a.price.total_cmp(&b.price));
            BookSnapshot { time, bids, asks }
        })
        .collect();
    Ok(OrderBookHistory::new(symbol, snapshots))
}

fn parse_level(raw: &RawBookLevel) -> std::result::Result<(DateTime<Utc>, BookSide, BookLevel), String> {
    let price = raw.price.parse()?;
    let quantity = raw.quantity.parse()?;
    if !price.is_finite() || price <= 0.0 {
        return Err(format!("price {price} must be positive"));
    }
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(format!("quantity {quantity} must be non-negative"));
    }
    Ok((raw.time.parse()?, raw.side, BookLevel { price, quantity }))
}
