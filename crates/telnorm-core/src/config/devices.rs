//! Namespace presets per protocol and device family.

use std::collections::BTreeMap;

pub const NETCONF_BASE_NS: &str = "urn:ietf:params:xml:ns:netconf:base:1.0";
pub const CORIANT_NE_NS: &str = "http://coriant.com/yang/os/ne";

/// Bound for every NETCONF profile.
const NETCONF_DEFAULTS: &[(&str, &str)] = &[("nc", NETCONF_BASE_NS), ("ne", CORIANT_NE_NS)];

const CORIANT: &[(&str, &str)] = &[("ne", CORIANT_NE_NS)];

const CIENA: &[(&str, &str)] = &[
    ("ws-ptps", "urn:ciena:params:xml:ns:yang:ciena-ws-ptps"),
    ("ws-ptp", "urn:ciena:params:xml:ns:yang:ciena-ws-ptp"),
    ("ws-port", "urn:ciena:params:xml:ns:yang:ciena-ws-port"),
    ("ws-xcvr", "urn:ciena:params:xml:ns:yang:ciena-ws-xcvr"),
];

const JUNIPER: &[(&str, &str)] = &[("junos", "http://xml.juniper.net/junos/*/junos")];

/// Known `device_type` values.
pub const DEVICE_TYPES: &[&str] = &["coriant", "ciena", "juniper"];

/// Namespace preset for a device family, matched case-insensitively.
pub fn device_namespaces(device_type: &str) -> Option<&'static [(&'static str, &'static str)]> {
    match device_type.to_ascii_lowercase().as_str() {
        "coriant" => Some(CORIANT),
        "ciena" => Some(CIENA),
        "juniper" => Some(JUNIPER),
        _ => None,
    }
}

/// NETCONF defaults, then the device preset, then the profile's own entries.
pub fn merged_namespaces(
    device: Option<&[(&str, &str)]>,
    profile: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut merged: BTreeMap<String, String> = NETCONF_DEFAULTS
        .iter()
        .chain(device.unwrap_or_default())
        .map(|(prefix, uri)| (prefix.to_string(), uri.to_string()))
        .collect();
    merged.extend(profile.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}
