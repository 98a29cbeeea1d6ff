//! JSON encoders for discovery and collection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{DiscoveredInstance, MetricValue};
use crate::output::ChassisEmission;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceValues {
    pub values: BTreeMap<String, f64>,
}

/// `{"data": {instance_id: {"values": {metric: value}}}}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionJson {
    pub data: BTreeMap<String, InstanceValues>,
}

impl CollectionJson {
    /// Groups metrics by instance; later values win on repeated `(instance_id, name)`.
    pub fn from_metrics(metrics: &[MetricValue], chassis: &ChassisEmission) -> Self {
        let mut data: BTreeMap<String, InstanceValues> = BTreeMap::new();
        for metric in metrics.iter().filter(|m| m.value.is_finite() && !m.name.is_empty()) {
            let key = match metric.instance_id.as_deref() {
                Some(id) => id,
                None => match chassis.key() {
                    Some(key) => key,
                    None => continue,
                },
            };
            data.entry(key.to_string())
                .or_default()
                .values
                .insert(metric.name.clone(), metric.value);
        }
        Self { data }
    }

    pub fn value(&self, instance_id: &str, metric: &str) -> Option<f64> {
        self.data.get(instance_id)?.values.get(metric).copied()
    }
}

/// Pretty-printed JSON with sorted keys and a trailing newline.
pub fn collection_json(metrics: &[MetricValue], chassis: &ChassisEmission) -> String {
    let doc = CollectionJson::from_metrics(metrics, chassis);
    // String-keyed maps of finite floats always serialize.
    let mut out = serde_json::to_string_pretty(&doc).unwrap_or_default();
    out.push('\n');
    out
}

/// Instances as a pretty-printed JSON array with a trailing newline.
///
/// Each element carries `instance_id`, `instance_name`, `description` and
/// `properties`.
pub fn discovery_json(instances: &[DiscoveredInstance]) -> String {
    let mut out = serde_json::to_string_pretty(instances).unwrap_or_default();
    out.push('\n');
    out
}

pub fn parse_collection_json(text: &str) -> Result<CollectionJson, serde_json::Error> {
    serde_json::from_str(text)
}
