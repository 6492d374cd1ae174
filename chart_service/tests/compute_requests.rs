mod common;
use common::{raw_book, raw_candles};

use chart_service::{ChartService, ComputeRequest, ServiceError, load_config_path, load_config_str};
use market_indicators::Error;
use serde_json::{Value, json};
use std::io::Write;
use tempfile::NamedTempFile;

fn handle(service: &ChartService, request: Value) -> Result<Value, ServiceError> {
    let req: ComputeRequest = serde_json::from_value(request).unwrap();
    service
        .handle(&req)
        .map(|resp| serde_json::to_value(resp).unwrap())
}

#[test]
fn config_file_params_sit_between_defaults_and_request() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
symbols = ["BTCUSDT"]

[charts.SMA]
params = {{ period = 2 }}
"#
    )
    .unwrap();
    let service = ChartService::new(load_config_path(file.path()).unwrap());

    let out = handle(
        &service,
        json!({"indicator": "sma", "symbol": "BTCUSDT", "candles": raw_candles(&[1.0, 2.0, 3.0])}),
    )
    .unwrap();
    assert_eq!(
        out,
        json!([
            {"time": "2024-01-01T00:00:00Z", "sma": null},
            {"time": "2024-01-01T00:01:00Z", "sma": 1.5},
            {"time": "2024-01-01T00:02:00Z", "sma": 2.5}
        ])
    );

    let out = handle(
        &service,
        json!({
            "indicator": "sma", "symbol": "BTCUSDT",
            "candles": raw_candles(&[1.0, 2.0, 3.0]), "params": {"period": "3"}
        }),
    )
    .unwrap();
    assert_eq!(out[1]["sma"], Value::Null);
    assert_eq!(out[2]["sma"], json!(2.0));
}

#[test]
fn missing_config_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_config_path(dir.path().join("dashboard.toml")).unwrap_err();
    assert!(format!("{err:#}").contains("dashboard.toml"));
}

#[test]
fn correlation_uses_configured_comparison_symbols() {
    let service = ChartService::default();
    let out = handle(
        &service,
        json!({
            "indicator": "correlation",
            "symbol": "ethusdt",
            "candles": raw_candles(&[10.0, 11.0, 12.5, 12.0, 13.0]),
            "peers": {
                "BTCUSDT": raw_candles(&[20.0, 22.0, 25.0, 24.0, 26.0]),
                "bnbusdt": raw_candles(&[5.0, 4.0, 3.0, 3.5, 2.0])
            },
            "params": {"window": 3}
        }),
    )
    .unwrap();

    let points = out.as_array().unwrap();
    assert_eq!(points.len(), 5);
    assert!(points.iter().all(|p| p["symbol1"] == "BTCUSDT" && p["symbol2"] == "BNBUSDT"));
    // returns basis: a window of returns needs window + 1 closes
    assert!(points[..3].iter().all(|p| p["correlation1"].is_null()));
    assert!(points[3]["correlation1"].is_number());
}

#[test]
fn correlation_without_peer_candles_is_invalid_parameter() {
    let service = ChartService::new(load_config_str(r#"symbols = ["BTCUSDT", "ETHUSDT"]"#).unwrap());
    let err = handle(
        &service,
        json!({"indicator": "correlation", "symbol": "BTCUSDT", "candles": raw_candles(&[1.0, 2.0, 3.0])}),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Indicator(Error::InvalidParameter { indicator: "correlation", .. })
    ));
}

#[test]
fn corrupt_batch_is_malformed_data() {
    let mut candles = raw_candles(&[1.0, 2.0, 3.0]);
    candles[1]["high_price"] = json!(0.5);
    let err = handle(
        &ChartService::default(),
        json!({"indicator": "rsi", "symbol": "BTCUSDT", "candles": candles}),
    )
    .unwrap_err();
    assert!(matches!(err, ServiceError::Indicator(Error::MalformedData { .. })));
}

#[test]
fn volume_profile_is_an_object() {
    let out = handle(
        &ChartService::default(),
        json!({
            "indicator": "volume_profile", "symbol": "BTCUSDT",
            "candles": raw_candles(&[1.0, 2.0, 3.0, 4.0, 5.0]), "params": {"bins": 4}
        }),
    )
    .unwrap();
    assert_eq!(out["profile"].as_array().unwrap().len(), 4);
    assert_eq!(out["total_volume"], json!(15.0));
    assert!(out["poc"].is_object());
}

#[test]
fn spread_keeps_recent_positive_quotes() {
    let config = r#"
symbols = ["BTCUSDT"]

[charts.spread]
params = { limit = 2 }
"#;
    let service = ChartService::new(load_config_str(config).unwrap());
    let out = handle(
        &service,
        json!({
            "indicator": "spread", "symbol": "BTCUSDT",
            "orderbook": raw_book(&[(100.0, 100.5), (100.0, 100.0), (100.0, 101.0), (99.0, 100.0)])
        }),
    )
    .unwrap();
    assert_eq!(
        out,
        json!([
            {"time": "2024-01-01T00:00:20Z", "spread_value": 1.0, "spread_bps": 1.0 / 101.0 * 10_000.0},
            {"time": "2024-01-01T00:00:30Z", "spread_value": 1.0, "spread_bps": 100.0}
        ])
    );
}

#[test]
fn corrupt_order_book_is_malformed_data() {
    let mut book = raw_book(&[(100.0, 101.0)]);
    book[1]["price"] = json!("n/a");
    let err = handle(
        &ChartService::default(),
        json!({"indicator": "orderbook", "symbol": "BTCUSDT", "orderbook": book}),
    )
    .unwrap_err();
    assert!(matches!(err, ServiceError::Indicator(Error::MalformedData { .. })));
}

#[test]
fn market_stats_summarize_the_request_candles() {
    let out = handle(
        &ChartService::default(),
        json!({
            "indicator": "market_stats", "symbol": "ethusdt",
            "candles": raw_candles(&[100.0, 102.0, 101.0, 105.0])
        }),
    )
    .unwrap();
    assert_eq!(out["symbol"], json!("ETHUSDT"));
    assert_eq!(out["current_price"], json!(105.0));
    assert_eq!(out["change_24h"], json!(5.0));
    assert_eq!(out["volume_24h"], json!(12.0));
    assert_eq!(out["last_updated"], json!("2024-01-01T00:03:00Z"));
    assert_eq!(out["moving_averages"], json!({}));
}

#[test]
fn huge_bin_count_fails_the_request_only() {
    let err = handle(
        &ChartService::default(),
        json!({
            "indicator": "volume_profile", "symbol": "BTCUSDT",
            "candles": raw_candles(&[1.0, 2.0, 3.0]), "params": {"bins": 1e13}
        }),
    )
    .unwrap_err();
    assert!(matches!(err, ServiceError::Indicator(Error::InvalidParameter { .. })));
}
