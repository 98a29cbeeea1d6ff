//! Metric extraction for discovered instances and the chassis scope.

use std::collections::BTreeMap;

use crate::config::{ChassisSpec, InterfaceSpec, MetricDefinition};
use crate::discovery::Discovery;
use crate::models::{CollectionStats, INTERFACE_TYPE_LABEL, MetricValue};
use crate::resolve::Document;
use crate::trace::{Trace, TraceEvent};
use crate::transform::transform;

/// Evaluates `definitions` against one context node.
///
/// A metric is emitted only when its raw value resolves and converts.
#[allow(clippy::too_many_arguments)]
fn extract_from_node<D: Document>(
    doc: &D,
    node: &D::Node,
    definitions: &[MetricDefinition<D::Path>],
    instance_id: Option<&str>,
    labels: &BTreeMap<String, String>,
    trace: &dyn Trace,
    stats: &mut CollectionStats,
    out: &mut Vec<MetricValue>,
) {
    for def in definitions {
        let Some(raw) = doc.text(node, &def.path, trace) else {
            trace.event(&TraceEvent::MetricDropped {
                instance_id: instance_id.map(str::to_string),
                metric: def.name.clone(),
                raw: None,
            });
            stats.misses += 1;
            continue;
        };
        match transform(&raw, &def.transform) {
            Some(value) => {
                trace.event(&TraceEvent::MetricExtracted {
                    instance_id: instance_id.map(str::to_string),
                    metric: def.name.clone(),
                    raw,
                    value,
                });
                stats.metrics += 1;
                out.push(MetricValue {
                    name: def.name.clone(),
                    value,
                    instance_id: instance_id.map(str::to_string),
                    labels: labels.clone(),
                });
            }
            None => {
                trace.event(&TraceEvent::MetricDropped {
                    instance_id: instance_id.map(str::to_string),
                    metric: def.name.clone(),
                    raw: Some(raw),
                });
                stats.dropped += 1;
            }
        }
    }
}

/// Per-instance metrics with counts.
pub fn extract_with_stats<D: Document>(
    doc: &D,
    discoveries: &[Discovery<D::Node>],
    specs: &BTreeMap<String, InterfaceSpec<D::Path>>,
    trace: &dyn Trace,
) -> (Vec<MetricValue>, CollectionStats) {
    let mut stats = CollectionStats::default();
    let mut out = Vec::new();
    for discovery in discoveries {
        let Some(spec) = specs.get(&discovery.interface_type) else {
            continue;
        };
        let labels = BTreeMap::from([(INTERFACE_TYPE_LABEL.to_string(), spec.type_name.clone())]);
        extract_from_node(
            doc,
            &discovery.node,
            &spec.metrics,
            Some(&discovery.instance.instance_id),
            &labels,
            trace,
            &mut stats,
            &mut out,
        );
    }
    (out, stats)
}

/// Resolves each instance's metric definitions against its own node.
pub fn extract<D: Document>(
    doc: &D,
    discoveries: &[Discovery<D::Node>],
    specs: &BTreeMap<String, InterfaceSpec<D::Path>>,
    trace: &dyn Trace,
) -> Vec<MetricValue> {
    extract_with_stats(doc, discoveries, specs, trace).0
}

/// Chassis metrics with counts.
pub fn extract_chassis_with_stats<D: Document>(
    doc: &D,
    chassis: &ChassisSpec<D::Path>,
    trace: &dyn Trace,
) -> (Vec<MetricValue>, CollectionStats) {
    let mut stats = CollectionStats::default();
    let mut out = Vec::new();

    let root = doc.root();
    let scope = match &chassis.path {
        Some(path) => doc.select(&root, path, trace).into_iter().next(),
        None => Some(root),
    };
    let Some(scope) = scope else {
        stats.misses += chassis.metrics.len();
        return (out, stats);
    };

    extract_from_node(
        doc,
        &scope,
        &chassis.metrics,
        None,
        &BTreeMap::new(),
        trace,
        &mut stats,
        &mut out,
    );
    (out, stats)
}

/// Global-scope metrics; every result has `instance_id == None`.
pub fn extract_chassis<D: Document>(
    doc: &D,
    chassis: &ChassisSpec<D::Path>,
    trace: &dyn Trace,
) -> Vec<MetricValue> {
    extract_chassis_with_stats(doc, chassis, trace).0
}
