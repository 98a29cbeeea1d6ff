//! Instance discovery.
//!
//! Each node matched by an interface path becomes one instance. The identifier
//! comes from the first non-empty of the primary key, the fallback key and the
//! type-derived key `{type}-name`. Nodes where all three come back empty are
//! skipped and counted, never exposed.
//!
//! Duplicate identifiers are kept: both records are returned and a
//! [`TraceEvent::DuplicateInstance`] is emitted. The JSON encoder collapses
//! their metrics last-value-wins.

use std::collections::{BTreeMap, HashSet};

use crate::config::InterfaceSpec;
use crate::models::{CollectionStats, DiscoveredInstance, INTERFACE_TYPE_LABEL};
use crate::resolve::{Document, resolve};
use crate::sanitize::sanitize_instance_id;
use crate::trace::{IdentitySource, Trace, TraceEvent};

/// A discovered instance with the node it was found at.
#[derive(Debug, Clone)]
pub struct Discovery<N> {
    pub instance: DiscoveredInstance,
    pub node: N,
    pub interface_type: String,
}

/// Result of scanning one interface spec.
#[derive(Debug, Clone)]
pub struct Scan<N> {
    pub discoveries: Vec<Discovery<N>>,
    pub stats: CollectionStats,
}

impl<N> Scan<N> {
    pub fn instances(&self) -> impl Iterator<Item = &DiscoveredInstance> {
        self.discoveries.iter().map(|d| &d.instance)
    }
}

/// Resolves the identifier of one node; sanitized and non-empty.
fn resolve_identity<D: Document>(
    doc: &D,
    node: &D::Node,
    spec: &InterfaceSpec<D::Path>,
    trace: &dyn Trace,
) -> Option<(String, IdentitySource)> {
    let tiers = [
        (Some(&spec.primary_key), IdentitySource::Primary),
        (spec.fallback_key.as_ref(), IdentitySource::Fallback),
        (spec.derived_key.as_ref(), IdentitySource::TypeDerived),
    ];
    tiers.into_iter().find_map(|(key, source)| {
        let raw = doc.text(node, key?, trace)?;
        let id = sanitize_instance_id(&raw);
        (!id.is_empty()).then_some((id, source))
    })
}

/// Discovers the instances of one interface spec.
pub fn discover<D: Document>(
    doc: &D,
    spec: &InterfaceSpec<D::Path>,
    trace: &dyn Trace,
) -> Scan<D::Node> {
    let candidates = resolve(doc, &spec.path, trace);
    trace.event(&TraceEvent::InterfaceScan {
        interface_type: spec.type_name.clone(),
        path: spec.path.to_string(),
        candidates: candidates.len(),
    });

    let mut stats = CollectionStats {
        candidates: candidates.len(),
        ..Default::default()
    };
    let mut seen = HashSet::new();
    let mut discoveries = Vec::with_capacity(candidates.len());

    for (position, node) in candidates.into_iter().enumerate() {
        let Some((instance_id, source)) = resolve_identity(doc, &node, spec, trace) else {
            trace.event(&TraceEvent::InstanceSkipped {
                interface_type: spec.type_name.clone(),
                position,
            });
            stats.skipped += 1;
            continue;
        };
        trace.event(&TraceEvent::IdentityResolved {
            interface_type: spec.type_name.clone(),
            instance_id: instance_id.clone(),
            source,
        });
        if !seen.insert(instance_id.clone()) {
            trace.event(&TraceEvent::DuplicateInstance {
                interface_type: spec.type_name.clone(),
                instance_id: instance_id.clone(),
            });
            stats.duplicates += 1;
        }

        let instance_name = spec
            .name_key
            .as_ref()
            .and_then(|key| doc.text(&node, key, trace))
            .unwrap_or_else(|| instance_id.clone());
        let description = spec
            .description_key
            .as_ref()
            .and_then(|key| doc.text(&node, key, trace))
            .unwrap_or_default();

        let mut properties: BTreeMap<String, String> = spec
            .property_keys
            .iter()
            .filter_map(|prop| Some((prop.name.clone(), doc.text(&node, &prop.path, trace)?)))
            .collect();
        properties.insert(INTERFACE_TYPE_LABEL.to_string(), spec.type_name.clone());

        discoveries.push(Discovery {
            instance: DiscoveredInstance {
                instance_id,
                instance_name,
                description,
                properties,
            },
            node,
            interface_type: spec.type_name.clone(),
        });
    }

    stats.instances = discoveries.len();
    Scan { discoveries, stats }
}

/// Discovers every interface spec in key order.
pub fn discover_all<D: Document>(
    doc: &D,
    specs: &BTreeMap<String, InterfaceSpec<D::Path>>,
    trace: &dyn Trace,
) -> Scan<D::Node> {
    let mut all = Scan {
        discoveries: Vec::new(),
        stats: CollectionStats::default(),
    };
    for spec in specs.values() {
        let scan = discover(doc, spec, trace);
        all.stats.merge(&scan.stats);
        all.discoveries.extend(scan.discoveries);
    }
    all
}

/// Instance records only, for callers that do not extract metrics.
pub fn discover_instances<D: Document>(
    doc: &D,
    spec: &InterfaceSpec<D::Path>,
    trace: &dyn Trace,
) -> Vec<DiscoveredInstance> {
    discover(doc, spec, trace)
        .discoveries
        .into_iter()
        .map(|d| d.instance)
        .collect()
}
