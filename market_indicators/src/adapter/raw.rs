use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::models::order_book::BookSide;

/// A numeric field as the ingestion pipeline delivers it: a JSON number or a
/// numeric string (exchange REST payloads quote prices to keep precision).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    pub(crate) fn parse(&self) -> Result<f64, String> {
        match self {
            RawNumber::Number(n) => Ok(*n),
            RawNumber::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("`{s}` is not a number")),
        }
    }
}

impl From<f64> for RawNumber {
    fn from(value: f64) -> Self {
        RawNumber::Number(value)
    }
}

/// A candle open time: RFC 3339 string or epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTime {
    EpochMillis(i64),
    Text(String),
}

impl RawTime {
    pub(crate) fn parse(&self) -> Result<DateTime<Utc>, String> {
        match self {
            RawTime::EpochMillis(ms) => Utc
                .timestamp_millis_opt(*ms)
                .single()
                .ok_or_else(|| format!("epoch millis {ms} out of range")),
            RawTime::Text(s) => DateTime::parse_from_rfc3339(s.trim())
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| format!("`{s}` is not an RFC 3339 timestamp: {e}")),
        }
    }
}

impl From<DateTime<Utc>> for RawTime {
    fn from(value: DateTime<Utc>) -> Self {
        RawTime::Text(value.to_rfc3339())
    }
}

/// One candle record as supplied by the ingestion pipeline.
///
/// Accepts both the chart wire names (`time`, `open`, ...) and the warehouse
/// column names (`open_time`, `open_price`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCandle {
    #[serde(alias = "open_time")]
    pub time: RawTime,
    #[serde(alias = "open_price")]
    pub open: RawNumber,
    #[serde(alias = "high_price")]
    pub high: RawNumber,
    #[serde(alias = "low_price")]
    pub low: RawNumber,
    #[serde(alias = "close_price")]
    pub close: RawNumber,
    pub volume: RawNumber,
}

/// One order-book level as captured by the ingestion pipeline (`fact_orderbook` rows).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBookLevel {
    #[serde(alias = "captured_at")]
    pub time: RawTime,
    pub side: BookSide,
    pub price: RawNumber,
    pub quantity: RawNumber,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_strings_numbers_and_aliases() {
        let json = r#"[
            {"time": "2024-01-01T00:00:00Z", "open": "100.5", "high": 101, "low": "99", "close": 100, "volume": "12.25"},
            {"open_time": 1704067260000, "open_price": 100, "high_price": 102, "low_price": 99.5, "close_price": "101.5", "volume": 3}
        ]"#;
        let raw: Vec<RawCandle> = serde_json::from_str(json).unwrap();
        assert_eq!(raw[0].open.parse().unwrap(), 100.5);
        assert_eq!(raw[0].volume.parse().unwrap(), 12.25);
        assert_eq!(raw[1].close.parse().unwrap(), 101.5);
        assert_eq!(
            raw[1].time.parse().unwrap().to_rfc3339(),
            "2024-01-01T00:01:00+00:00"
        );
    }

    #[test]
    fn deserializes_book_levels() {
        let json = r#"{"captured_at": "2024-01-01T00:00:00Z", "side": "ask", "price": "42000.5", "quantity": 0.25}"#;
        let level: RawBookLevel = serde_json::from_str(json).unwrap();
        assert_eq!(level.side, BookSide::Ask);
        assert_eq!(level.price.parse().unwrap(), 42000.5);
        assert!(serde_json::from_str::<RawBookLevel>(&json.replace("ask", "mid")).is_err());
    }

    #[test]
    fn reports_unparseable_fields() {
        assert!(RawNumber::Text("abc".into()).parse().is_err());
        assert!(RawTime::Text("yesterday".into()).parse().is_err());
    }
}
