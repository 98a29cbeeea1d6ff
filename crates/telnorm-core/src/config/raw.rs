//! Serde shapes of the profile file, before validation.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::Protocol;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawProfile {
    #[serde(default)]
    pub protocol: Protocol,
    #[serde(default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub namespaces: BTreeMap<String, String>,
    #[serde(default)]
    pub chassis: Option<RawChassis>,
    #[serde(default)]
    pub interfaces: BTreeMap<String, RawInterface>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawChassis {
    #[serde(default, alias = "xpath", alias = "oid")]
    pub path: Option<String>,
    #[serde(default)]
    pub metrics: Vec<RawMetric>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawInterface {
    #[serde(default, alias = "xpath", alias = "oid")]
    pub path: Option<String>,
    #[serde(default, alias = "instance_key")]
    pub primary_key: Option<String>,
    #[serde(default, alias = "fallback_id_key")]
    pub fallback_key: Option<String>,
    #[serde(default, alias = "instance_name_key")]
    pub name_key: Option<String>,
    #[serde(default)]
    pub description_key: Option<String>,
    #[serde(default)]
    pub properties: RawProperties,
    #[serde(default)]
    pub metrics: Vec<RawMetric>,
}

/// `properties: [fiber-type]` or `properties: {fiber: fiber-type}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawProperties {
    List(Vec<String>),
    Map(BTreeMap<String, String>),
}

impl Default for RawProperties {
    fn default() -> Self {
        RawProperties::List(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawMetric {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "xpath", alias = "oid")]
    pub path: Option<String>,
    #[serde(default)]
    pub string_map: Option<RawStringMap>,
    #[serde(default)]
    pub parse_timestamp: bool,
    #[serde(default)]
    pub multiplier: Option<f64>,
    #[serde(default, alias = "help_text")]
    pub help: String,
    /// Accepted for compatibility; every metric is a gauge.
    #[serde(default)]
    #[allow(dead_code)]
    pub metric_type: Option<String>,
}

/// Inline table, built-in name (`status`) or definition (`"down:0,up:1"`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawStringMap {
    Inline(BTreeMap<String, i64>),
    Named(String),
}
