//! Aligned ASCII tables for reading results in a terminal.
//!
//! Not a wire format: the monitoring platform only consumes the line and
//! JSON encoders.

use crate::models::{DiscoveredInstance, MetricValue};
use crate::output::line::ordered_properties;
use crate::output::{ChassisEmission, format_value};

/// Widest of `header` and `cells`, in characters.
fn column_width<'a>(header: &str, cells: impl Iterator<Item = &'a str>) -> usize {
    cells
        .map(|cell| cell.chars().count())
        .fold(header.chars().count(), usize::max)
}

fn render(header: String, rows: Vec<String>) -> String {
    let rule = "-".repeat(header.chars().count());
    let mut out = String::new();
    for line in [header, rule].into_iter().chain(rows) {
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// `Instance ID  Name  Description [Properties]`, one row per instance.
pub fn discovery_table(instances: &[DiscoveredInstance], show_properties: bool) -> String {
    if instances.is_empty() {
        return "No instances discovered.\n".to_string();
    }

    let id_w = column_width("Instance ID", instances.iter().map(|i| i.instance_id.as_str()));
    let name_w = column_width("Name", instances.iter().map(|i| i.instance_name.as_str()));
    let desc_w = column_width("Description", instances.iter().map(|i| i.description.as_str()));

    let mut header = format!(
        "{:<id_w$}  {:<name_w$}  {:<desc_w$}",
        "Instance ID", "Name", "Description"
    );
    if show_properties {
        header.push_str("  Properties");
    }

    let rows = instances
        .iter()
        .map(|instance| {
            let mut row = format!(
                "{:<id_w$}  {:<name_w$}  {:<desc_w$}",
                instance.instance_id, instance.instance_name, instance.description
            );
            if show_properties && !instance.properties.is_empty() {
                let properties: Vec<_> = ordered_properties(instance)
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect();
                row.push_str("  ");
                row.push_str(&properties.join(", "));
            }
            row
        })
        .collect();

    render(header, rows)
}

/// `Instance  Metric  Value`, values right-aligned.
///
/// Chassis metrics show under the pseudo-instance id, or `-` when bare.
pub fn collection_table(metrics: &[MetricValue], chassis: &ChassisEmission) -> String {
    let cells: Vec<(&str, &str, String)> = metrics
        .iter()
        .filter(|m| m.value.is_finite() && !m.name.is_empty())
        .filter_map(|m| {
            let instance = match (m.instance_id.as_deref(), chassis) {
                (Some(id), _) => id,
                (None, ChassisEmission::Instance(id)) => id.as_str(),
                (None, ChassisEmission::Bare) => "-",
                (None, ChassisEmission::Omit) => return None,
            };
            Some((instance, m.name.as_str(), format_value(m.value)))
        })
        .collect();
    if cells.is_empty() {
        return "No metrics collected.\n".to_string();
    }

    let inst_w = column_width("Instance", cells.iter().map(|c| c.0));
    let name_w = column_width("Metric", cells.iter().map(|c| c.1));
    let value_w = column_width("Value", cells.iter().map(|c| c.2.as_str()));

    let header = format!("{:<inst_w$}  {:<name_w$}  {:>value_w$}", "Instance", "Metric", "Value");
    let rows = cells
        .iter()
        .map(|(instance, name, value)| {
            format!("{instance:<inst_w$}  {name:<name_w$}  {value:>value_w$}")
        })
        .collect();

    render(header, rows)
}
