//! Value transform pipeline.
//!
//! Converts the raw text of a resolved element into a numeric sample.
//! `None` always means "drop this metric"; nothing here is an error.

pub mod string_maps;
pub mod timestamp;

use std::collections::BTreeMap;

pub use string_maps::{builtin, parse_definition};
pub use timestamp::parse_timestamp;

/// How a raw value becomes a number. At most one transform per metric.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TransformSpec {
    /// Plain float parse.
    #[default]
    None,
    /// Enum string lookup; values outside the map become `0.0`.
    StringMap(BTreeMap<String, i64>),
    /// Date/time string to Unix epoch seconds.
    Timestamp,
    /// Plain float parse, then scaled.
    Multiplier(f64),
}

impl TransformSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            TransformSpec::None => "none",
            TransformSpec::StringMap(_) => "string_map",
            TransformSpec::Timestamp => "timestamp",
            TransformSpec::Multiplier(_) => "multiplier",
        }
    }
}

/// Parses a float the way device values are usually written.
///
/// Surrounding whitespace is ignored. Non-finite results are rejected.
pub fn parse_float(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Applies `spec` to `raw`.
///
/// The raw value is trimmed first. The result is always finite.
pub fn transform(raw: &str, spec: &TransformSpec) -> Option<f64> {
    let raw = raw.trim();
    let value = match spec {
        TransformSpec::None => parse_float(raw),
        TransformSpec::StringMap(map) => Some(map.get(raw).map_or(0.0, |v| *v as f64)),
        TransformSpec::Timestamp => parse_timestamp(raw),
        TransformSpec::Multiplier(factor) => parse_float(raw).map(|v| v * factor),
    };
    value.filter(|v| v.is_finite())
}
