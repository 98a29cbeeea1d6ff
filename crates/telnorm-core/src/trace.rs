//! Structured trace events emitted by the engine.
//!
//! Every entry point takes a `&dyn Trace`. [`TracingTrace`] forwards events to
//! `tracing`; [`RecordingTrace`] keeps them for assertions in tests.

use std::cell::RefCell;
use std::fmt;

use tracing::{debug, warn};

/// Which resolution strategy produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Prefixes bound to namespace URIs.
    Namespaced,
    /// Local names only, same axes.
    LocalName,
    /// Recursive descent over all descendants.
    Descent,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::Namespaced => "namespaced",
            Tier::LocalName => "local-name",
            Tier::Descent => "descent",
        };
        f.write_str(name)
    }
}

/// Which key produced an instance identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    Primary,
    Fallback,
    TypeDerived,
}

impl fmt::Display for IdentitySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IdentitySource::Primary => "primary",
            IdentitySource::Fallback => "fallback",
            IdentitySource::TypeDerived => "type-derived",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    /// A path matched at the given tier.
    PathResolved {
        path: String,
        tier: Tier,
        matches: usize,
    },
    /// Every strategy came back empty.
    PathMiss { path: String },
    /// The namespaced tier could not bind a prefix.
    UnknownPrefix { path: String, prefix: String },
    /// Candidate nodes found for an interface type.
    InterfaceScan {
        interface_type: String,
        path: String,
        candidates: usize,
    },
    IdentityResolved {
        interface_type: String,
        instance_id: String,
        source: IdentitySource,
    },
    /// A candidate node produced no usable identifier.
    InstanceSkipped {
        interface_type: String,
        position: usize,
    },
    /// An identifier already seen in this run.
    DuplicateInstance {
        interface_type: String,
        instance_id: String,
    },
    MetricExtracted {
        instance_id: Option<String>,
        metric: String,
        raw: String,
        value: f64,
    },
    /// Raw value missing (`raw == None`) or not convertible.
    MetricDropped {
        instance_id: Option<String>,
        metric: String,
        raw: Option<String>,
    },
}

/// Sink for engine trace events.
pub trait Trace {
    fn event(&self, event: &TraceEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTrace;

impl Trace for TracingTrace {
    fn event(&self, event: &TraceEvent) {
        match event {
            TraceEvent::PathResolved {
                path,
                tier,
                matches,
            } => debug!(path = %path, tier = %tier, matches, "Path resolved"),
            TraceEvent::PathMiss { path } => debug!(path = %path, "Path matched nothing"),
            TraceEvent::UnknownPrefix { path, prefix } => {
                debug!(path = %path, prefix = %prefix, "Namespace prefix not bound")
            }
            TraceEvent::InterfaceScan {
                interface_type,
                path,
                candidates,
            } => debug!(
                interface_type = %interface_type,
                path = %path,
                candidates,
                "Interface scan"
            ),
            TraceEvent::IdentityResolved {
                interface_type,
                instance_id,
                source,
            } => debug!(
                interface_type = %interface_type,
                instance_id = %instance_id,
                source = %source,
                "Instance discovered"
            ),
            TraceEvent::InstanceSkipped {
                interface_type,
                position,
            } => warn!(
                interface_type = %interface_type,
                position,
                "No instance ID found, skipping"
            ),
            TraceEvent::DuplicateInstance {
                interface_type,
                instance_id,
            } => debug!(
                interface_type = %interface_type,
                instance_id = %instance_id,
                "Duplicate instance ID"
            ),
            TraceEvent::MetricExtracted {
                instance_id,
                metric,
                raw,
                value,
            } => debug!(
                instance_id = instance_id.as_deref().unwrap_or("-"),
                metric = %metric,
                raw = %raw,
                value,
                "Metric extracted"
            ),
            TraceEvent::MetricDropped {
                instance_id,
                metric,
                raw,
            } => debug!(
                instance_id = instance_id.as_deref().unwrap_or("-"),
                metric = %metric,
                raw = raw.as_deref().unwrap_or("<missing>"),
                "Metric dropped"
            ),
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTrace;

impl Trace for NoopTrace {
    fn event(&self, _event: &TraceEvent) {}
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingTrace {
    events: RefCell<Vec<TraceEvent>>,
}

impl RecordingTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TraceEvent> {
        self.events.borrow().clone()
    }

    /// Number of recorded events matching `pred`.
    pub fn count(&self, pred: impl Fn(&TraceEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| pred(e)).count()
    }

    /// Identity sources in discovery order.
    pub fn identity_sources(&self) -> Vec<IdentitySource> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                TraceEvent::IdentityResolved { source, .. } => Some(*source),
                _ => None,
            })
            .collect()
    }
}

impl Trace for RecordingTrace {
    fn event(&self, event: &TraceEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
