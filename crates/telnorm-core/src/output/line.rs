//! Line-oriented encoders for discovery and collection.

use crate::models::{DiscoveredInstance, INTERFACE_TYPE_LABEL, MetricValue};
use crate::output::{ChassisEmission, format_value};

const SEPARATOR: &str = "##";

fn join_lines(lines: Vec<String>) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Properties in key order, `interface_type` last.
pub(crate) fn ordered_properties(
    instance: &DiscoveredInstance,
) -> impl Iterator<Item = (&String, &String)> {
    let (kind, rest): (Vec<_>, Vec<_>) = instance
        .properties
        .iter()
        .partition(|(k, _)| k.as_str() == INTERFACE_TYPE_LABEL);
    rest.into_iter().chain(kind)
}

/// `id##name`, then `##description` when present; with properties an empty
/// description placeholder and an empty field precede `auto.k=v&...`.
pub fn discovery_line(instance: &DiscoveredInstance) -> String {
    let mut parts = vec![instance.instance_id.as_str(), instance.instance_name.as_str()];
    let has_properties = !instance.properties.is_empty();
    if !instance.description.is_empty() || has_properties {
        parts.push(&instance.description);
    }
    let properties;
    if has_properties {
        properties = ordered_properties(instance)
            .map(|(k, v)| format!("auto.{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        parts.push("");
        parts.push(&properties);
    }
    parts.join(SEPARATOR)
}

/// One discovery line per instance, newline-terminated when non-empty.
pub fn discovery_lines(instances: &[DiscoveredInstance]) -> String {
    join_lines(instances.iter().map(discovery_line).collect())
}

pub fn collection_line(instance_id: &str, metric: &str, value: f64) -> String {
    format!("{instance_id}.{metric}={}", format_value(value))
}

/// One `id.metric=value` line per finite metric.
pub fn collection_lines(metrics: &[MetricValue], chassis: &ChassisEmission) -> String {
    let lines = metrics
        .iter()
        .filter(|m| m.value.is_finite() && !m.name.is_empty())
        .filter_map(|m| match (m.instance_id.as_deref(), chassis) {
            (Some(id), _) => Some(collection_line(id, &m.name, m.value)),
            (None, ChassisEmission::Instance(id)) => Some(collection_line(id, &m.name, m.value)),
            (None, ChassisEmission::Bare) => Some(format!("{}={}", m.name, format_value(m.value))),
            (None, ChassisEmission::Omit) => None,
        })
        .collect();
    join_lines(lines)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn instance(description: &str, properties: &[(&str, &str)]) -> DiscoveredInstance {
        DiscoveredInstance {
            instance_id: "OTS-1-1-1".to_string(),
            instance_name: "Line-East-OTS".to_string(),
            description: description.to_string(),
            properties: properties
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn test_discovery_line_minimal() {
        assert_eq!(discovery_line(&instance("", &[])), "OTS-1-1-1##Line-East-OTS");
    }

    #[test]
    fn test_discovery_line_description_only() {
        assert_eq!(
            discovery_line(&instance("span", &[])),
            "OTS-1-1-1##Line-East-OTS##span"
        );
    }

    #[test]
    fn test_discovery_line_with_properties() {
        let props = [("interface_type", "ots"), ("fiber_type", "SMF-28")];
        assert_eq!(
            discovery_line(&instance("", &props)),
            "OTS-1-1-1##Line-East-OTS######auto.fiber_type=SMF-28&auto.interface_type=ots"
        );
        let props = [("interface_type", "osc"), ("osc_mode", "bidirectional"), ("a", "1")];
        assert_eq!(
            discovery_line(&instance("", &props)),
            "OTS-1-1-1##Line-East-OTS######auto.a=1&auto.osc_mode=bidirectional&auto.interface_type=osc"
        );
        assert_eq!(
            discovery_line(&instance("span", &props[..1])),
            "OTS-1-1-1##Line-East-OTS##span####auto.interface_type=ots"
        );
    }

    #[test]
    fn test_discovery_lines_terminated() {
        assert_eq!(discovery_lines(&[]), "");
        let out = discovery_lines(&[instance("", &[]), instance("", &[])]);
        assert_eq!(out, "OTS-1-1-1##Line-East-OTS\nOTS-1-1-1##Line-East-OTS\n");
    }

    #[test]
    fn test_collection_lines() {
        let metrics = vec![
            MetricValue::for_instance("admin_status", 1.0, "Line-East-OTS"),
            MetricValue::for_instance("rx_power", -12.5, "OMS-1"),
            MetricValue::for_instance("bad", f64::NAN, "OMS-1"),
            MetricValue::chassis("temperature", 28.5),
        ];
        assert_eq!(
            collection_lines(&metrics, &ChassisEmission::default()),
            "Line-East-OTS.admin_status=1.0\nOMS-1.rx_power=-12.5\n_chassis_.temperature=28.5\n"
        );
        assert_eq!(
            collection_lines(&metrics, &ChassisEmission::Bare),
            "Line-East-OTS.admin_status=1.0\nOMS-1.rx_power=-12.5\ntemperature=28.5\n"
        );
        assert_eq!(
            collection_lines(&metrics, &ChassisEmission::Omit),
            "Line-East-OTS.admin_status=1.0\nOMS-1.rx_power=-12.5\n"
        );
        assert_eq!(collection_lines(&[], &ChassisEmission::default()), "");
    }
}
