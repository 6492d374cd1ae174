//! Dashboard configuration: parsing, normalization, and loading.
//!
//! A TOML file describes:
//! - The symbols the dashboard tracks (also the pool correlation draws comparison
//!   symbols from)
//! - The default candle interval
//! - Per-chart settings keyed by indicator id: refresh interval, enabled flag and
//!   parameter overrides
//!
//! Key behaviors:
//! - Symbols are trimmed, upper-cased and de-duplicated preserving first occurrence.
//! - Chart ids are trimmed and lower-cased; ids that name no registered chart (candle
//!   indicator or order-book view) are dropped or rejected via [`UnknownChartPolicy`].
//! - Missing `refresh_secs` / `enabled` are filled from the indicator registry.
//!
//! Entrypoints:
//! - Parse + normalize from a TOML string: [`load_config_str`]
//! - Parse + normalize from a file path: [`load_config_path`]
//! - Normalization with explicit policy: [`normalize_config_with_policy`]

use std::{collections::HashSet, mem, path::Path};

use anyhow::{Context, bail};
use indexmap::IndexMap;
use market_indicators::{ChartKind, ParameterSet, Timeframe};
use serde::{Deserialize, Serialize};
use toml::from_str;
use tracing::info;

/// Symbols tracked when no configuration file is given.
pub const DEFAULT_SYMBOLS: [&str; 3] = ["BTCUSDT", "ETHUSDT", "BNBUSDT"];

fn default_interval() -> String {
    "1m".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    /// Trading pairs shown on the dashboard (e.g. "BTCUSDT").
    pub symbols: Vec<String>,
    /// Candle interval of the dashboard's charts (e.g. "1m", "4h"). Validated at load;
    /// requests that name no interval are computed at the interval of their candles.
    #[serde(default = "default_interval")]
    pub default_interval: String,
    /// Indicator id -> chart settings.
    #[serde(default)]
    pub charts: IndexMap<String, ChartCfg>,
}

/// Settings for one chart.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChartCfg {
    /// Refresh interval used by the external scheduler, in seconds.
    pub refresh_secs: Option<u64>,
    pub enabled: Option<bool>,
    /// Overrides of the schema defaults; request parameters override these in turn.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub params: ParameterSet,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            default_interval: default_interval(),
            charts: IndexMap::new(),
        }
    }
}

impl DashboardConfig {
    pub fn chart(&self, kind: impl Into<ChartKind>) -> Option<&ChartCfg> {
        self.charts.get(kind.into().id())
    }

    /// Parsed [`DashboardConfig::default_interval`].
    pub fn interval(&self) -> anyhow::Result<Timeframe> {
        self.default_interval
            .parse()
            .with_context(|| format!("invalid default_interval `{}`", self.default_interval))
    }

    /// Layers chart-level overrides under the request's own parameters.
    pub fn layered_params(&self, kind: impl Into<ChartKind>, request: &ParameterSet) -> ParameterSet {
        let mut params = self
            .chart(kind)
            .map(|c| c.params.clone())
            .unwrap_or_default();
        for (key, value) in request {
            params.insert(key.clone(), value.clone());
        }
        params
    }

    /// Comparison symbols for correlation against `base`: the first two configured
    /// symbols other than `base`, or the only one twice.
    pub fn comparison_symbols(&self, base: &str) -> Option<(String, String)> {
        let mut others = self
            .symbols
            .iter()
            .filter(|s| !s.eq_ignore_ascii_case(base));
        let first = others.next()?.clone();
        let second = others.next().cloned().unwrap_or_else(|| first.clone());
        Some((first, second))
    }
}

/// Summary of changes performed during normalization.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct NormalizationReport {
    /// Count of removed duplicate symbols after upper-casing.
    pub symbols_deduped: usize,
    /// Number of chart ids that changed when lowercasing/trimming.
    pub charts_renamed: usize,
    /// Count of charts dropped because their id names no chart (Drop policy).
    pub unknown_charts_dropped: usize,
}

/// Policy for chart ids that name no registered chart.
#[derive(Copy, Clone, Debug)]
pub enum UnknownChartPolicy {
    /// Drop the chart entry
    Drop,
    /// Treat as an error
    Error,
}

/// Normalize a config in-place with an explicit policy for unknown chart ids.
///
/// Errors:
/// - No symbols, or an empty symbol after trimming
/// - A default interval that does not parse (e.g. "5w")
/// - Duplicate chart ids after normalization
/// - Unknown chart ids when policy is [`UnknownChartPolicy::Error`]
pub fn normalize_config_with_policy(
    cfg: &mut DashboardConfig,
    policy: UnknownChartPolicy,
) -> anyhow::Result<NormalizationReport> {
    let mut report = NormalizationReport::default();

    // --- symbols (dedupe, preserve order)
    let before_len = cfg.symbols.len();
    let mut seen = HashSet::new();
    let mut symbols = Vec::with_capacity(before_len);
    for raw in mem::take(&mut cfg.symbols) {
        let symbol = raw.trim().to_uppercase();
        if symbol.is_empty() {
            bail!("symbol cannot be empty after trimming");
        }
        if seen.insert(symbol.clone()) {
            symbols.push(symbol);
        }
    }
    if symbols.is_empty() {
        bail!("at least one symbol must be configured");
    }
    report.symbols_deduped = before_len - symbols.len();
    cfg.symbols = symbols;

    cfg.default_interval = cfg.default_interval.trim().to_string();
    cfg.interval()?;

    // --- charts
    let mut rebuilt: IndexMap<String, ChartCfg> = IndexMap::new();
    for (raw_id, mut chart) in mem::take(&mut cfg.charts) {
        let id = raw_id.trim().to_lowercase();
        if id != raw_id {
            report.charts_renamed += 1;
        }
        let kind = match id.parse::<ChartKind>() {
            Ok(kind) => kind,
            Err(_) => match policy {
                UnknownChartPolicy::Drop => {
                    report.unknown_charts_dropped += 1;
                    continue;
                }
                UnknownChartPolicy::Error => bail!("chart '{id}' names no registered chart"),
            },
        };
        if rebuilt.contains_key(&id) {
            bail!("duplicate chart id after normalization: {id}");
        }

        chart.refresh_secs.get_or_insert(kind.refresh_secs());
        chart.enabled.get_or_insert(true);
        rebuilt.insert(id, chart);
    }
    cfg.charts = rebuilt;

    Ok(report)
}

/// Calls [`normalize_config_with_policy`] with [`UnknownChartPolicy::Drop`].
pub fn normalize_config(cfg: &mut DashboardConfig) -> anyhow::Result<NormalizationReport> {
    normalize_config_with_policy(cfg, UnknownChartPolicy::Drop)
}

/// Parse and normalize a dashboard config from a TOML string.
pub fn load_config_str(toml_str: &str) -> anyhow::Result<DashboardConfig> {
    let mut cfg: DashboardConfig = from_str(toml_str).context("failed to parse dashboard TOML")?;
    let report = normalize_config(&mut cfg).context("normalize_config failed")?;
    info!(?report, symbols = cfg.symbols.len(), charts = cfg.charts.len(), "loaded dashboard config");
    Ok(cfg)
}

/// Read a dashboard TOML file from disk, parse, and normalize it.
pub fn load_config_path(path: impl AsRef<Path>) -> anyhow::Result<DashboardConfig> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read dashboard config {}", path.as_ref().display()))?;
    load_config_str(&text)
}
