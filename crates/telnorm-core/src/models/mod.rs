//! Instance and metric records produced by one collection run.

mod stats;

use std::collections::BTreeMap;

use serde::Serialize;

pub use stats::CollectionStats;

/// Label attached to every instance metric and discovered instance.
pub const INTERFACE_TYPE_LABEL: &str = "interface_type";

/// One per-device sub-resource (an interface, a BGP peer, an optical port).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredInstance {
    /// Sanitized, never empty.
    pub instance_id: String,
    pub instance_name: String,
    pub description: String,
    /// `auto.*` properties, including `interface_type`.
    pub properties: BTreeMap<String, String>,
}

impl DiscoveredInstance {
    pub fn interface_type(&self) -> Option<&str> {
        self.properties.get(INTERFACE_TYPE_LABEL).map(String::as_str)
    }
}

/// A single numeric sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricValue {
    pub name: String,
    /// Always finite.
    pub value: f64,
    /// `None` for chassis/global metrics.
    pub instance_id: Option<String>,
    pub labels: BTreeMap<String, String>,
}

impl MetricValue {
    pub fn chassis(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            instance_id: None,
            labels: BTreeMap::new(),
        }
    }

    pub fn for_instance(
        name: impl Into<String>,
        value: f64,
        instance_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value,
            instance_id: Some(instance_id.into()),
            labels: BTreeMap::new(),
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn is_chassis(&self) -> bool {
        self.instance_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_constructors() {
        let m = MetricValue::for_instance("rx_power", -12.5, "OMS-1")
            .with_label("interface_type", "oms");
        assert!(!m.is_chassis());
        assert_eq!(m.labels["interface_type"], "oms");
        assert!(MetricValue::chassis("temperature", 28.5).is_chassis());
    }

    #[test]
    fn test_instance_serializes() {
        let instance = DiscoveredInstance {
            instance_id: "OTS-1".to_string(),
            instance_name: "Line".to_string(),
            description: String::new(),
            properties: BTreeMap::from([("interface_type".to_string(), "ots".to_string())]),
        };
        assert_eq!(instance.interface_type(), Some("ots"));
        let json = serde_json::to_value(&instance).unwrap();
        assert_eq!(json["properties"]["interface_type"], "ots");
    }
}
