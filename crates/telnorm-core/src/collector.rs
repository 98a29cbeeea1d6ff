//! One collection run over one retrieved document.
//!
//! The `Collector` drives discovery for every interface spec of a profile,
//! extracts the per-instance metrics, then the chassis metrics, and reports
//! counts and phase timings alongside the records.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::{Profile, ProfileSpec};
use crate::discovery::discover_all;
use crate::error::DocumentError;
use crate::extract::{extract_chassis_with_stats, extract_with_stats};
use crate::models::{CollectionStats, DiscoveredInstance, MetricValue};
use crate::resolve::{Document, RawDocument, XmlResolver};
use crate::trace::{NoopTrace, Trace};

/// Timing information for each collection phase.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectorTiming {
    /// Total run time.
    pub total: Duration,
    /// Time to discover instances of all interface specs.
    pub discovery: Duration,
    /// Time to extract per-instance metrics.
    pub extraction: Duration,
    /// Time to extract chassis metrics.
    pub chassis: Duration,
}

/// Everything one run produced.
#[derive(Debug, Clone, Default)]
pub struct CollectionRun {
    pub instances: Vec<DiscoveredInstance>,
    /// Instance metrics in discovery order, then chassis metrics.
    pub metrics: Vec<MetricValue>,
    pub stats: CollectionStats,
    pub timing: CollectorTiming,
}

/// Runs discovery and extraction with an injected tracer.
#[derive(Clone, Copy)]
pub struct Collector<'t> {
    trace: &'t dyn Trace,
}

impl Default for Collector<'static> {
    fn default() -> Self {
        Self { trace: &NoopTrace }
    }
}

impl<'t> Collector<'t> {
    pub fn new(trace: &'t dyn Trace) -> Self {
        Self { trace }
    }

    /// Runs a compiled profile against a document of the same path language.
    pub fn run<D: Document>(&self, doc: &D, spec: &ProfileSpec<D::Path>) -> CollectionRun {
        let total_start = Instant::now();
        let mut timing = CollectorTiming::default();

        let start = Instant::now();
        let scan = discover_all(doc, &spec.interfaces, self.trace);
        timing.discovery = start.elapsed();
        let mut stats = scan.stats;

        let start = Instant::now();
        let (mut metrics, extracted) =
            extract_with_stats(doc, &scan.discoveries, &spec.interfaces, self.trace);
        stats.merge(&extracted);
        timing.extraction = start.elapsed();

        let start = Instant::now();
        if let Some(chassis) = &spec.chassis {
            let (chassis_metrics, chassis_stats) =
                extract_chassis_with_stats(doc, chassis, self.trace);
            metrics.extend(chassis_metrics);
            stats.merge(&chassis_stats);
        }
        timing.chassis = start.elapsed();

        timing.total = total_start.elapsed();
        debug!(
            instances = stats.instances,
            metrics = stats.metrics,
            total_us = timing.total.as_micros() as u64,
            "Collection run finished"
        );

        CollectionRun {
            instances: scan.discoveries.into_iter().map(|d| d.instance).collect(),
            metrics,
            stats,
            timing,
        }
    }

    /// Runs a profile against a retrieved document.
    ///
    /// NETCONF profiles need an XML document and SNMP profiles an OID table;
    /// any other pairing is rejected before resolution starts.
    pub fn run_raw(
        &self,
        doc: &RawDocument<'_>,
        profile: &Profile,
    ) -> Result<CollectionRun, DocumentError> {
        match (doc, profile) {
            (RawDocument::Xml(xml), Profile::Netconf(spec)) => {
                Ok(self.run(&XmlResolver::new(xml, &spec.namespaces), spec))
            }
            (RawDocument::Snmp(table), Profile::Snmp(spec)) => Ok(self.run(table, spec)),
            (doc, profile) => Err(DocumentError::ProtocolMismatch {
                expected: expected_kind(profile),
                found: doc.kind(),
            }),
        }
    }

    /// Discovery only, grouped by interface type.
    pub fn discover_raw(
        &self,
        doc: &RawDocument<'_>,
        profile: &Profile,
    ) -> Result<BTreeMap<String, Vec<DiscoveredInstance>>, DocumentError> {
        let run = match (doc, profile) {
            (RawDocument::Xml(xml), Profile::Netconf(spec)) => discover_all(
                &XmlResolver::new(xml, &spec.namespaces),
                &spec.interfaces,
                self.trace,
            )
            .discoveries
            .into_iter()
            .map(|d| d.instance)
            .collect::<Vec<_>>(),
            (RawDocument::Snmp(table), Profile::Snmp(spec)) => {
                discover_all(table, &spec.interfaces, self.trace)
                    .discoveries
                    .into_iter()
                    .map(|d| d.instance)
                    .collect()
            }
            (doc, profile) => {
                return Err(DocumentError::ProtocolMismatch {
                    expected: expected_kind(profile),
                    found: doc.kind(),
                });
            }
        };

        let mut grouped: BTreeMap<String, Vec<DiscoveredInstance>> = BTreeMap::new();
        for instance in run {
            let key = instance.interface_type().unwrap_or_default().to_string();
            grouped.entry(key).or_default().push(instance);
        }
        Ok(grouped)
    }
}

fn expected_kind(profile: &Profile) -> &'static str {
    match profile {
        Profile::Netconf(_) => "xml",
        Profile::Snmp(_) => "snmp",
    }
}
