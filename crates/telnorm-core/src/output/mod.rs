//! Wire encoders.
//!
//! - [`line::discovery_lines`]: `id##name##description####auto.k=v&...`
//! - [`line::collection_lines`]: `id.metric=value`
//! - [`json::collection_json`]: `{"data": {id: {"values": {metric: value}}}}`
//! - [`json::discovery_json`]: `[{"instance_id": …, "properties": {…}}, …]`
//! - [`table`]: aligned ASCII tables for terminals
//!
//! Encoders are total. Non-finite values are filtered out, never encoded.

pub mod json;
pub mod line;
pub mod table;

pub use json::{
    CollectionJson, InstanceValues, collection_json, discovery_json, parse_collection_json,
};
pub use line::{collection_line, collection_lines, discovery_line, discovery_lines};
pub use table::{collection_table, discovery_table};

/// Pseudo-instance carrying chassis metrics by default.
pub const CHASSIS_INSTANCE_ID: &str = "_chassis_";

/// How metrics without an instance are encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChassisEmission {
    /// Encoded under a pseudo-instance id.
    Instance(String),
    /// Flat `metric=value`; JSON key `""`.
    Bare,
    /// Left out.
    Omit,
}

impl Default for ChassisEmission {
    fn default() -> Self {
        ChassisEmission::Instance(CHASSIS_INSTANCE_ID.to_string())
    }
}

impl ChassisEmission {
    /// Key used for chassis metrics, `None` when they are omitted.
    pub fn key(&self) -> Option<&str> {
        match self {
            ChassisEmission::Instance(id) => Some(id),
            ChassisEmission::Bare => Some(""),
            ChassisEmission::Omit => None,
        }
    }
}

/// Renders a float the way Python's `repr` does.
///
/// Shortest round-trip digits; scientific notation with a signed two-digit
/// exponent below `1e-4` and from `1e16` up; integral values keep `.0`.
///
/// ```
/// use telnorm_core::output::format_value;
///
/// assert_eq!(format_value(1.0), "1.0");
/// assert_eq!(format_value(-12.5), "-12.5");
/// assert_eq!(format_value(1e16), "1e+16");
/// assert_eq!(format_value(1.5e-7), "1.5e-07");
/// ```
pub fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let sci = format!("{value:e}");
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    if value != 0.0 && !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{:02}", exponent.abs());
    }
    let plain = value.to_string();
    if plain.contains('.') {
        plain
    } else {
        format!("{plain}.0")
    }
}
