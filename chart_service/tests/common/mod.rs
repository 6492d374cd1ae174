#![allow(dead_code)]

use serde_json::{Value, json};

/// Raw one-minute candle records starting 2024-01-01T00:00:00Z, in exchange wire form.
pub fn raw_candles(closes: &[f64]) -> Value {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            json!({
                "open_time": 1_704_067_200_000_i64 + i as i64 * 60_000,
                "open_price": close.to_string(),
                "high_price": close + 1.0,
                "low_price": close - 1.0,
                "close_price": close.to_string(),
                "volume": "3"
            })
        })
        .collect()
}

/// Order-book rows in warehouse form: one snapshot per `(bid, ask)` pair, ten seconds
/// apart, each side a single level.
pub fn raw_book(quotes: &[(f64, f64)]) -> Value {
    quotes
        .iter()
        .enumerate()
        .flat_map(|(i, &(bid, ask))| {
            let captured_at = 1_704_067_200_000_i64 + i as i64 * 10_000;
            [
                json!({"captured_at": captured_at, "side": "bid", "price": bid.to_string(), "quantity": "1.5"}),
                json!({"captured_at": captured_at, "side": "ask", "price": ask, "quantity": 2.0}),
            ]
        })
        .collect()
}
