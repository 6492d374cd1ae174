//! Parameter sets and their resolution against a schema.
//!
//! On the wire a parameter set is a loose JSON object. [`resolve`] fills schema defaults
//! and drops keys the schema does not know; the typed structs below then validate the
//! resolved values at the registry boundary, so compute functions only ever see typed
//! parameters.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    distribution::histogram::MAX_BINS,
    errors::{Error, Result},
    indicators::CorrelationBasis,
    registry::schema::{ParamDefault, ParamKind, ParamSpec},
};

/// One parameter value as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

/// Parameter name -> value, in insertion order.
pub type ParameterSet = IndexMap<String, ParamValue>;

/// Parameters after defaulting, restricted to the keys of one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParams {
    indicator: &'static str,
    schema: &'static [ParamSpec],
    values: IndexMap<&'static str, ParamValue>,
}

/// Fills missing keys with schema defaults and ignores keys outside the schema.
///
/// Values are not clamped to the advisory bounds.
pub fn resolve(
    indicator: &'static str,
    schema: &'static [ParamSpec],
    candidate: &ParameterSet,
) -> ResolvedParams {
    let values = schema
        .iter()
        .filter_map(|spec| {
            let value = match (candidate.get(spec.key), spec.default) {
                (Some(v), _) => v.clone(),
                (None, ParamDefault::Number(n)) => ParamValue::Number(n),
                (None, ParamDefault::Text(t)) => ParamValue::Text(t.to_string()),
                (None, ParamDefault::Unset) => return None,
            };
            Some((spec.key, value))
        })
        .collect();
    ResolvedParams {
        indicator,
        schema,
        values,
    }
}

impl ResolvedParams {
    pub fn values(&self) -> &IndexMap<&'static str, ParamValue> {
        &self.values
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key)
    }

    fn invalid(&self, key: &str, message: impl Into<String>) -> Error {
        Error::invalid_param(self.indicator, key, message)
    }

    fn required(&self, key: &str) -> Result<&ParamValue> {
        self.get(key).ok_or_else(|| self.invalid(key, "missing"))
    }

    /// Finite numeric value; numeric strings are accepted.
    pub fn number(&self, key: &str) -> Result<f64> {
        let n = match self.required(key)? {
            ParamValue::Number(n) => *n,
            ParamValue::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| self.invalid(key, format!("`{s}` is not a number")))?,
        };
        if !n.is_finite() {
            return Err(self.invalid(key, "must be a finite number"));
        }
        Ok(n)
    }

    /// Whole-number value.
    pub fn integer(&self, key: &str) -> Result<i64> {
        let n = self.number(key)?;
        if n.fract() != 0.0 || n.abs() > i64::MAX as f64 {
            return Err(self.invalid(key, format!("{n} is not a whole number")));
        }
        Ok(n as i64)
    }

    /// Window length or bin count: a whole number of at least 1.
    pub fn count(&self, key: &str) -> Result<usize> {
        let n = self.integer(key)?;
        usize::try_from(n)
            .ok()
            .filter(|&n| n >= 1)
            .ok_or_else(|| self.invalid(key, format!("{n} is not a positive integer")))
    }

    /// Text value, if present. Numbers are rendered back to text.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            ParamValue::Text(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            ParamValue::Number(n) => Some(n.to_string()),
        }
    }

    /// Select value, checked against the schema options.
    pub fn choice(&self, key: &str) -> Result<&'static str> {
        let options = self
            .schema
            .iter()
            .find(|s| s.key == key && s.kind == ParamKind::Select)
            .map(|s| s.options)
            .unwrap_or_default();
        let raw = self.text(key).ok_or_else(|| self.invalid(key, "missing"))?;
        options
            .iter()
            .copied()
            .find(|o| o.eq_ignore_ascii_case(&raw))
            .ok_or_else(|| {
                self.invalid(key, format!("`{raw}` is not one of {}", options.join(", ")))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodParams {
    pub period: usize,
}

impl TryFrom<&ResolvedParams> for PeriodParams {
    type Error = Error;

    fn try_from(p: &ResolvedParams) -> Result<Self> {
        Ok(Self {
            period: p.count("period")?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacdParams {
    pub fast_period: usize,
    pub slow_period: usize,
    pub signal_period: usize,
}

impl TryFrom<&ResolvedParams> for MacdParams {
    type Error = Error;

    fn try_from(p: &ResolvedParams) -> Result<Self> {
        Ok(Self {
            fast_period: p.count("fast_period")?,
            slow_period: p.count("slow_period")?,
            signal_period: p.count("signal_period")?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerParams {
    pub period: usize,
    pub std_dev: f64,
}

impl TryFrom<&ResolvedParams> for BollingerParams {
    type Error = Error;

    fn try_from(p: &ResolvedParams) -> Result<Self> {
        Ok(Self {
            period: p.count("period")?,
            std_dev: p.number("std_dev")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationParams {
    pub window: usize,
    pub basis: CorrelationBasis,
    pub compare_symbol1: Option<String>,
    pub compare_symbol2: Option<String>,
}

impl TryFrom<&ResolvedParams> for CorrelationParams {
    type Error = Error;

    fn try_from(p: &ResolvedParams) -> Result<Self> {
        let window = p.count("window")?;
        if window < 2 {
            return Err(p.invalid("window", "must be at least 2"));
        }
        Ok(Self {
            window,
            basis: p.choice("basis")?.parse()?,
            compare_symbol1: p.text("compare_symbol1").map(|s| s.to_uppercase()),
            compare_symbol2: p.text("compare_symbol2").map(|s| s.to_uppercase()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinParams {
    pub bins: usize,
}

impl TryFrom<&ResolvedParams> for BinParams {
    type Error = Error;

    fn try_from(p: &ResolvedParams) -> Result<Self> {
        let bins = p.count("bins")?;
        if bins > MAX_BINS {
            return Err(p.invalid("bins", format!("{bins} exceeds the limit of {MAX_BINS}")));
        }
        Ok(Self { bins })
    }
}

/// Number of order-book levels or spread points to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitParams {
    pub limit: usize,
}

impl TryFrom<&ResolvedParams> for LimitParams {
    type Error = Error;

    fn try_from(p: &ResolvedParams) -> Result<Self> {
        Ok(Self {
            limit: p.count("limit")?,
        })
    }
}
