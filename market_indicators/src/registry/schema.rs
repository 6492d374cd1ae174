//! Static parameter schemas, one per indicator.
//!
//! The schema drives both parameter resolution (defaults for missing keys) and the
//! parameter controls the chart layer renders. Bounds are advisory: they are published
//! to the UI but never clamp a value during computation.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    /// Whole number; fractional values are rejected.
    Integer,
    Number,
    /// One of [`ParamSpec::options`].
    Select,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamDefault {
    /// No default; the key stays absent after resolution.
    Unset,
    Number(f64),
    Text(&'static str),
}

/// Schema of one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamSpec {
    pub key: &'static str,
    pub label: &'static str,
    #[serde(rename = "type")]
    pub kind: ParamKind,
    pub default: ParamDefault,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
    #[serde(skip_serializing_if = "no_options")]
    pub options: &'static [&'static str],
    pub description: &'static str,
}

fn no_options(options: &&'static [&'static str]) -> bool {
    options.is_empty()
}

impl ParamSpec {
    const fn integer(key: &'static str, label: &'static str, default: f64, min: f64, max: f64) -> Self {
        Self {
            key,
            label,
            kind: ParamKind::Integer,
            default: ParamDefault::Number(default),
            min: Some(min),
            max: Some(max),
            step: Some(1.0),
            options: &[],
            description: "",
        }
    }

    const fn text(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            kind: ParamKind::Text,
            default: ParamDefault::Unset,
            min: None,
            max: None,
            step: None,
            options: &[],
            description: "",
        }
    }

    const fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }
}

pub const MOVING_AVERAGE: &[ParamSpec] = &[ParamSpec::integer("period", "Period", 20.0, 1.0, 500.0)
    .describe("Number of closes in the averaging window")];

pub const RSI: &[ParamSpec] =
    &[ParamSpec::integer("period", "Period", 14.0, 2.0, 100.0).describe("RSI calculation period")];

pub const MACD: &[ParamSpec] = &[
    ParamSpec::integer("fast_period", "Fast Period", 12.0, 2.0, 100.0).describe("Fast EMA period"),
    ParamSpec::integer("slow_period", "Slow Period", 26.0, 2.0, 200.0).describe("Slow EMA period"),
    ParamSpec::integer("signal_period", "Signal Period", 9.0, 2.0, 100.0)
        .describe("Signal line period"),
];

pub const BOLLINGER: &[ParamSpec] = &[
    ParamSpec::integer("period", "Period", 20.0, 5.0, 100.0).describe("Moving average period"),
    ParamSpec {
        key: "std_dev",
        label: "Std Dev",
        kind: ParamKind::Number,
        default: ParamDefault::Number(2.0),
        min: Some(0.5),
        max: Some(5.0),
        step: Some(0.5),
        options: &[],
        description: "Band width in standard deviations",
    },
];

pub const ATR: &[ParamSpec] =
    &[ParamSpec::integer("period", "Period", 14.0, 2.0, 100.0).describe("ATR smoothing period")];

pub const CORRELATION: &[ParamSpec] = &[
    ParamSpec::integer("window", "Window", 30.0, 5.0, 200.0).describe("Rolling window size"),
    ParamSpec::text("compare_symbol1", "Compare Symbol 1")
        .describe("First comparison symbol; picked from the configured symbols when absent"),
    ParamSpec::text("compare_symbol2", "Compare Symbol 2")
        .describe("Second comparison symbol; picked from the configured symbols when absent"),
    ParamSpec {
        key: "basis",
        label: "Basis",
        kind: ParamKind::Select,
        default: ParamDefault::Text("returns"),
        min: None,
        max: None,
        step: None,
        options: &["returns", "prices"],
        description: "Correlate percentage returns or raw price levels",
    },
];

pub const VOLUME_PROFILE: &[ParamSpec] =
    &[ParamSpec::integer("bins", "Bins", 20.0, 5.0, 100.0).describe("Number of price bins")];

pub const RETURN_DISTRIBUTION: &[ParamSpec] =
    &[ParamSpec::integer("bins", "Bins", 30.0, 10.0, 100.0).describe("Number of return bins")];

pub const PRICE_DISTRIBUTION: &[ParamSpec] =
    &[ParamSpec::integer("bins", "Bins", 40.0, 10.0, 100.0).describe("Number of price bins")];

pub const ORDER_BOOK: &[ParamSpec] =
    &[ParamSpec::integer("limit", "Levels", 20.0, 1.0, 100.0).describe("Number of price levels per side")];

pub const SPREAD: &[ParamSpec] =
    &[ParamSpec::integer("limit", "Points", 100.0, 1.0, 1000.0).describe("Number of most recent snapshots")];
