//! End-to-end runs: profile + document in, wire format out.

use std::collections::BTreeMap;

use telnorm_core::adapter::{load_document, netconf, snmp};
use telnorm_core::config::{InterfaceSpec, MetricDefinition, Profile};
use telnorm_core::discovery::{discover, discover_instances};
use telnorm_core::extract::extract;
use telnorm_core::fixtures;
use telnorm_core::output::{
    ChassisEmission, collection_json, collection_lines, discovery_lines, parse_collection_json,
};
use telnorm_core::resolve::{PathExpression, RawDocument, XmlDocument, XmlPath, XmlResolver};
use telnorm_core::sanitize::sanitize_instance_id;
use telnorm_core::trace::{IdentitySource, TraceEvent};
use telnorm_core::transform::{TransformSpec, transform};
use telnorm_core::{Collector, NoopTrace, RecordingTrace};

const OTS_XML: &str = "<data><ots>\
    <alias-name>Line-East-OTS</alias-name>\
    <ots-name>OTS-1-1-1</ots-name>\
    <admin-status>up</admin-status>\
    </ots></data>";

fn p(raw: &str) -> XmlPath {
    XmlPath::parse(raw).unwrap()
}

fn up_down() -> TransformSpec {
    TransformSpec::StringMap(BTreeMap::from([
        ("down".to_string(), 0),
        ("up".to_string(), 1),
    ]))
}

fn ots_spec() -> InterfaceSpec<XmlPath> {
    InterfaceSpec::new("ots", p("ots"), p("alias-name"))
        .with_fallback_key(p("ots-name"))
        .with_metric(
            MetricDefinition::new("admin_status", p("admin-status")).with_transform(up_down()),
        )
}

fn specs(spec: InterfaceSpec<XmlPath>) -> BTreeMap<String, InterfaceSpec<XmlPath>> {
    BTreeMap::from([(spec.type_name.clone(), spec)])
}

#[test]
fn test_scenario_primary_key_and_string_map() {
    let doc = XmlDocument::parse(OTS_XML).unwrap();
    let ns = BTreeMap::new();
    let resolver = XmlResolver::new(&doc, &ns);
    let specs = specs(ots_spec());

    let scan = discover(&resolver, &specs["ots"], &NoopTrace);
    assert_eq!(scan.discoveries.len(), 1);
    assert_eq!(scan.discoveries[0].instance.instance_id, "Line-East-OTS");

    let metrics = extract(&resolver, &scan.discoveries, &specs, &NoopTrace);
    assert_eq!(metrics.len(), 1);
    assert_eq!(metrics[0].name, "admin_status");
    assert_eq!(metrics[0].value, 1.0);
    assert_eq!(metrics[0].instance_id.as_deref(), Some("Line-East-OTS"));
}

#[test]
fn test_scenario_fallback_key() {
    let xml = OTS_XML.replace("Line-East-OTS", "");
    let doc = XmlDocument::parse(&xml).unwrap();
    let ns = BTreeMap::new();
    let resolver = XmlResolver::new(&doc, &ns);
    let trace = RecordingTrace::new();

    let found = discover_instances(&resolver, &ots_spec(), &trace);
    assert_eq!(found[0].instance_id, "OTS-1-1-1");
    assert_eq!(trace.identity_sources(), vec![IdentitySource::Fallback]);
}

#[test]
fn test_scenario_null_timestamp_dropped() {
    assert_eq!(transform("0000-01-01T00:00:00.000Z", &TransformSpec::Timestamp), None);

    let xml = "<data><ots><alias-name>A</alias-name>\
        <last-change>0000-01-01T00:00:00.000Z</last-change>\
        </ots></data>";
    let doc = XmlDocument::parse(xml).unwrap();
    let ns = BTreeMap::new();
    let resolver = XmlResolver::new(&doc, &ns);
    let last_change = MetricDefinition::new("last_change", p("last-change"))
        .with_transform(TransformSpec::Timestamp);
    let spec = InterfaceSpec::new("ots", p("ots"), p("alias-name")).with_metric(last_change);
    let specs = specs(spec);
    let scan = discover(&resolver, &specs["ots"], &NoopTrace);
    assert!(extract(&resolver, &scan.discoveries, &specs, &NoopTrace).is_empty());
}

#[test]
fn test_scenario_unmapped_status_is_zero() {
    assert_eq!(transform("testing", &up_down()), Some(0.0));

    let xml = OTS_XML.replace(">up<", ">testing<");
    let doc = XmlDocument::parse(&xml).unwrap();
    let ns = BTreeMap::new();
    let resolver = XmlResolver::new(&doc, &ns);
    let specs = specs(ots_spec());
    let scan = discover(&resolver, &specs["ots"], &NoopTrace);
    let metrics = extract(&resolver, &scan.discoveries, &specs, &NoopTrace);
    assert_eq!(metrics[0].value, 0.0);
}

#[test]
fn test_scenario_sanitized_snmp_alias() {
    assert_eq!(sanitize_instance_id("ae100:3 uplink"), "ae100_3_uplink");

    let profile: Profile = fixtures::SNMP_PROFILE.parse().unwrap();
    let table = snmp::parse_walk(fixtures::SNMP_WALK).unwrap();
    let run = Collector::default()
        .run_raw(&RawDocument::Snmp(table), &profile)
        .unwrap();
    let ids: Vec<_> = run.instances.iter().map(|i| i.instance_id.as_str()).collect();
    assert_eq!(ids, vec!["core_uplink_to_PE1", "ge-0/0/1", "ae100_3_uplink"]);
}

#[test]
fn test_primary_key_never_consults_fallback() {
    let doc = XmlDocument::parse(fixtures::CORIANT_REPLY).unwrap();
    let ns = BTreeMap::new();
    let resolver = XmlResolver::new(&doc, &ns);
    let spec = InterfaceSpec::new("ots", p(".//ots"), p("alias-name"))
        .with_fallback_key(p("ots-name"));
    let trace = RecordingTrace::new();

    discover_instances(&resolver, &spec, &trace);
    let sources = trace.identity_sources();
    assert!(!sources.is_empty());
    assert!(sources.iter().all(|s| *s == IdentitySource::Primary));
    // The fallback path is never evaluated.
    let fallback_lookups = trace.count(|e| match e {
        TraceEvent::PathResolved { path, .. } | TraceEvent::PathMiss { path } => {
            path.contains("ots-name")
        }
        _ => false,
    });
    assert_eq!(fallback_lookups, 0);
}

#[test]
fn test_nested_key_is_not_the_instance_key() {
    let xml = "<data><ots>\
        <ots-name>OTS-1-1-1</ots-name>\
        <neighbor><alias-name>Peer-West</alias-name></neighbor>\
        </ots></data>";
    let doc = XmlDocument::parse(xml).unwrap();
    let ns = BTreeMap::new();
    let resolver = XmlResolver::new(&doc, &ns);
    let trace = RecordingTrace::new();

    let found = discover_instances(&resolver, &ots_spec(), &trace);
    let ids: Vec<_> = found.iter().map(|i| i.instance_id.as_str()).collect();
    assert_eq!(ids, vec!["OTS-1-1-1"]);
    assert_eq!(trace.identity_sources(), vec![IdentitySource::Fallback]);
}

#[test]
fn test_metric_leaf_in_sub_entity_is_ignored() {
    let xml = "<data>\
        <ots><alias-name>A</alias-name>\
          <neighbor><admin-status>down</admin-status><loss>9.0</loss></neighbor>\
          <loss>18.5</loss>\
        </ots>\
        <ots><alias-name>B</alias-name>\
          <neighbor><admin-status>up</admin-status></neighbor>\
        </ots>\
        </data>";
    let doc = XmlDocument::parse(xml).unwrap();
    let ns = BTreeMap::new();
    let resolver = XmlResolver::new(&doc, &ns);
    let specs = specs(ots_spec().with_metric(MetricDefinition::new("span_loss", p("loss"))));

    let scan = discover(&resolver, &specs["ots"], &NoopTrace);
    let metrics = extract(&resolver, &scan.discoveries, &specs, &NoopTrace);
    let flat: Vec<_> = metrics
        .iter()
        .map(|m| (m.instance_id.as_deref().unwrap_or(""), m.name.as_str(), m.value))
        .collect();
    assert_eq!(flat, vec![("A", "span_loss", 18.5)]);
}

#[test]
fn test_position_predicate_per_shelf() {
    let xml = "<data>\
        <shelf><port><name>1/1</name></port><port><name>1/2</name></port></shelf>\
        <shelf><port><name>2/1</name></port></shelf>\
        </data>";
    let doc = XmlDocument::parse(xml).unwrap();
    let ns = BTreeMap::new();
    let resolver = XmlResolver::new(&doc, &ns);
    let spec = InterfaceSpec::new("port", p(".//port[1]"), p("name"));

    let ids: Vec<_> = discover_instances(&resolver, &spec, &NoopTrace)
        .into_iter()
        .map(|i| i.instance_id)
        .collect();
    assert_eq!(ids, vec!["1/1", "2/1"]);
}

#[test]
fn test_coriant_collection_lines() {
    let profile: Profile = fixtures::CORIANT_PROFILE.parse().unwrap();
    let doc = load_document(fixtures::CORIANT_REPLY, profile.protocol()).unwrap();
    let run = Collector::default().run_raw(&doc, &profile).unwrap();

    let text = collection_lines(&run.metrics, &ChassisEmission::default());
    for line in [
        "Line-East-OTS.admin_status=1.0",
        "Line-East-OTS.span_loss=18.5",
        "Line-East-OTS.last_change=1732631400.0",
        "C-Band-East-OMS.rx_power=-12.5",
        "C-Band-East-OMS.in_power_instant=-12.3",
        "OSC-East.oper_status=0.0",
        "OSC-East.wavelength=1510.0",
        "_chassis_.temperature=28.5",
        "_chassis_.altitude=152.0",
    ] {
        assert!(text.lines().any(|l| l == line), "missing {line}:\n{text}");
    }
    // The zero timestamp on the OSC is dropped, not reported.
    assert!(!text.contains("OSC-East.last_change"));
    assert!(text.ends_with('\n'));
    assert_eq!(run.stats.dropped, 1);
}

#[test]
fn test_coriant_discovery_lines() {
    let profile: Profile = fixtures::CORIANT_PROFILE.parse().unwrap();
    let doc = load_document(fixtures::CORIANT_REPLY, profile.protocol()).unwrap();
    let run = Collector::default().run_raw(&doc, &profile).unwrap();

    let text = discovery_lines(&run.instances);
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "C-Band-East-OMS##C-Band-East-OMS######auto.grid_mode=flexible&auto.interface_type=oms",
            "OSC-East##OSC-East######auto.osc_mode=bidirectional&auto.interface_type=osc",
            "Line-East-OTS##Line-East-OTS##OTS-1-1-1####auto.fiber_length_tx_derived=85.2\
             &auto.fiber_type=SMF-28&auto.interface_type=ots",
        ]
    );
}

#[test]
fn test_ciena_reply_through_adapter() {
    let profile: Profile = fixtures::CIENA_PROFILE.parse().unwrap();
    let xml = netconf::parse_reply(fixtures::CIENA_REPLY).unwrap();
    let run = Collector::default()
        .run_raw(&RawDocument::Xml(xml), &profile)
        .unwrap();

    let ids: Vec<_> = run.instances.iter().map(|i| i.instance_id.as_str()).collect();
    assert_eq!(ids, vec!["1/1", "1/2", "2/1"]);
    assert_eq!(run.instances[0].description, "WaveLogic 5e");
    assert_eq!(run.instances[0].properties["kind"], "line");

    let encoded = collection_json(&run.metrics, &ChassisEmission::default());
    let json = parse_collection_json(&encoded).unwrap();
    assert_eq!(json.value("1/1", "pre_fec_ber"), Some(1.5e-7));
    assert_eq!(json.value("1/1", "tx_frequency_hz"), Some(193_100_000_000.0));
    assert_eq!(json.value("2/1", "admin_state"), Some(0.0));
    // -Inf and n/a are not finite numbers.
    assert_eq!(json.value("2/1", "rx_power"), None);
    assert_eq!(json.value("2/1", "tx_power"), None);
    assert!(!json.data.contains_key("_chassis_"));
}

#[test]
fn test_json_round_trip_last_value_wins() {
    let profile: Profile = fixtures::CORIANT_PROFILE.parse().unwrap();
    let doc = load_document(fixtures::CORIANT_REPLY, profile.protocol()).unwrap();
    let mut run = Collector::default().run_raw(&doc, &profile).unwrap();
    // A duplicate sample for an existing key.
    let mut repeat = run.metrics[0].clone();
    repeat.value = 42.0;
    run.metrics.push(repeat.clone());

    let chassis = ChassisEmission::default();
    let parsed = parse_collection_json(&collection_json(&run.metrics, &chassis)).unwrap();

    let mut expected = BTreeMap::new();
    for m in &run.metrics {
        let id = m.instance_id.clone().unwrap_or_else(|| "_chassis_".to_string());
        expected.insert((id, m.name.clone()), m.value);
    }
    let mut actual = BTreeMap::new();
    for (id, values) in &parsed.data {
        for (name, value) in &values.values {
            actual.insert((id.clone(), name.clone()), *value);
        }
    }
    assert_eq!(actual, expected);
    assert_eq!(
        parsed.value(repeat.instance_id.as_deref().unwrap(), &repeat.name),
        Some(42.0)
    );
}

#[test]
fn test_discovery_never_yields_empty_ids() {
    let xml = "<data>\
        <ots><alias-name>::</alias-name></ots>\
        <ots><alias-name> </alias-name><ots-name>#</ots-name></ots>\
        <ots><ots-name>\\ \\</ots-name></ots>\
        <ots><ots-name>OTS 2</ots-name></ots>\
        </data>";
    let doc = XmlDocument::parse(xml).unwrap();
    let ns = BTreeMap::new();
    let resolver = XmlResolver::new(&doc, &ns);
    let scan = discover(&resolver, &ots_spec(), &NoopTrace);
    let ids: Vec<_> = scan.instances().map(|i| i.instance_id.as_str()).collect();
    assert_eq!(ids, vec!["OTS_2"]);
    assert_eq!(scan.stats.skipped, 3);
}

#[test]
fn test_profile_document_mismatch() {
    let profile: Profile = fixtures::CORIANT_PROFILE.parse().unwrap();
    let doc = load_document(fixtures::SNMP_WALK, telnorm_core::config::Protocol::Snmp).unwrap();
    assert!(Collector::default().run_raw(&doc, &profile).is_err());
}
