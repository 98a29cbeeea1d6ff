//! Device profiles.
//!
//! A profile declares which tables ("interfaces") to discover and which
//! metrics to extract. It is loaded from YAML or JSON and compiled into typed
//! specs once; every path is parsed here so a typo fails the load instead of
//! silently matching nothing at collection time.
//!
//! ```yaml
//! protocol: netconf
//! device_type: coriant
//! chassis:
//!   metrics:
//!     - name: temperature
//!       xpath: ne:ne/ne:ne-temperature
//! interfaces:
//!   ots:
//!     xpath: ne:ne/ne:services/ne:optical-interfaces/ne:ots
//!     instance_key: alias-name
//!     fallback_id_key: ots-name
//!     properties: [fiber-type]
//!     metrics:
//!       - name: admin_status
//!         xpath: admin-status
//!         string_map: status
//! ```

mod devices;
mod raw;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::resolve::{Oid, PathExpression, XmlPath};
use crate::sanitize::sanitize_metric_name;
use crate::transform::{TransformSpec, builtin, parse_definition};

pub use devices::{DEVICE_TYPES, device_namespaces, merged_namespaces};
use raw::{RawChassis, RawInterface, RawMetric, RawProfile, RawProperties, RawStringMap};

/// Primary key used by NETCONF interfaces that do not name one.
pub const DEFAULT_PRIMARY_KEY: &str = "alias-name";

/// Management protocol of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Netconf,
    Snmp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Netconf => f.write_str("netconf"),
            Protocol::Snmp => f.write_str("snmp"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricDefinition<P> {
    pub name: String,
    pub path: P,
    pub transform: TransformSpec,
    pub help: String,
}

impl<P: PathExpression> MetricDefinition<P> {
    pub fn new(name: impl Into<String>, path: P) -> Self {
        Self {
            name: name.into(),
            path,
            transform: TransformSpec::None,
            help: String::new(),
        }
    }

    pub fn with_transform(mut self, transform: TransformSpec) -> Self {
        self.transform = transform;
        self
    }
}

/// A property resolved per instance and published as `auto.<name>`.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyKey<P> {
    pub name: String,
    pub path: P,
}

/// One discoverable table.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceSpec<P> {
    pub type_name: String,
    pub path: P,
    pub primary_key: P,
    pub fallback_key: Option<P>,
    pub name_key: Option<P>,
    pub description_key: Option<P>,
    pub property_keys: Vec<PropertyKey<P>>,
    pub metrics: Vec<MetricDefinition<P>>,
    /// `{type_name}-name`, when that is a valid path for `P`.
    pub derived_key: Option<P>,
}

impl<P: PathExpression> InterfaceSpec<P> {
    pub fn new(type_name: impl Into<String>, path: P, primary_key: P) -> Self {
        let type_name = type_name.into();
        let derived_key = P::parse(&format!("{type_name}-name")).ok();
        Self {
            type_name,
            path,
            primary_key,
            fallback_key: None,
            name_key: None,
            description_key: None,
            property_keys: Vec::new(),
            metrics: Vec::new(),
            derived_key,
        }
    }

    pub fn with_fallback_key(mut self, key: P) -> Self {
        self.fallback_key = Some(key);
        self
    }

    pub fn with_name_key(mut self, key: P) -> Self {
        self.name_key = Some(key);
        self
    }

    pub fn with_description_key(mut self, key: P) -> Self {
        self.description_key = Some(key);
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, path: P) -> Self {
        self.property_keys.push(PropertyKey {
            name: name.into(),
            path,
        });
        self
    }

    pub fn with_metric(mut self, metric: MetricDefinition<P>) -> Self {
        self.metrics.push(metric);
        self
    }
}

/// Global-scope metrics. Without a path the document root is the scope,
/// otherwise the first match.
#[derive(Debug, Clone, PartialEq)]
pub struct ChassisSpec<P> {
    pub path: Option<P>,
    pub metrics: Vec<MetricDefinition<P>>,
}

/// A compiled profile for one path language.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSpec<P> {
    pub device_type: Option<String>,
    /// Defaults, device preset and profile entries, merged.
    pub namespaces: BTreeMap<String, String>,
    pub chassis: Option<ChassisSpec<P>>,
    /// Processed in key order.
    pub interfaces: BTreeMap<String, InterfaceSpec<P>>,
}

impl<P> ProfileSpec<P> {
    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty() && self.chassis.as_ref().is_none_or(|c| c.metrics.is_empty())
    }
}

/// A validated device profile.
#[derive(Debug, Clone, PartialEq)]
pub enum Profile {
    Netconf(ProfileSpec<XmlPath>),
    Snmp(ProfileSpec<Oid>),
}

impl Profile {
    /// Loads a profile file; `.json` files are parsed as JSON, everything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let profile = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_yaml_str(&content)?
        };
        debug!(
            path = %path.display(),
            protocol = %profile.protocol(),
            interfaces = profile.interface_types().len(),
            "Profile loaded"
        );
        Ok(profile)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let raw: RawProfile = serde_yml::from_str(content)?;
        Self::compile(raw)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let raw: RawProfile = serde_json::from_str(content)?;
        Self::compile(raw)
    }

    fn compile(raw: RawProfile) -> Result<Self> {
        let profile = match raw.protocol {
            Protocol::Netconf => Profile::Netconf(compile_spec(raw, Some(DEFAULT_PRIMARY_KEY))?),
            Protocol::Snmp => Profile::Snmp(compile_spec(raw, None)?),
        };
        if profile.is_empty() {
            return Err(ConfigError::EmptyProfile);
        }
        Ok(profile)
    }

    pub fn protocol(&self) -> Protocol {
        match self {
            Profile::Netconf(_) => Protocol::Netconf,
            Profile::Snmp(_) => Protocol::Snmp,
        }
    }

    pub fn device_type(&self) -> Option<&str> {
        match self {
            Profile::Netconf(spec) => spec.device_type.as_deref(),
            Profile::Snmp(spec) => spec.device_type.as_deref(),
        }
    }

    pub fn interface_types(&self) -> Vec<&str> {
        match self {
            Profile::Netconf(spec) => spec.interfaces.keys().map(String::as_str).collect(),
            Profile::Snmp(spec) => spec.interfaces.keys().map(String::as_str).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Profile::Netconf(spec) => spec.is_empty(),
            Profile::Snmp(spec) => spec.is_empty(),
        }
    }
}

impl FromStr for Profile {
    type Err = ConfigError;

    /// YAML is a superset of JSON, so both formats parse.
    fn from_str(s: &str) -> Result<Self> {
        Self::from_yaml_str(s)
    }
}

fn compile_spec<P: PathExpression>(
    raw: RawProfile,
    default_primary: Option<&str>,
) -> Result<ProfileSpec<P>> {
    let device = match raw.device_type.as_deref() {
        Some(name) => Some(device_namespaces(name).ok_or_else(|| {
            ConfigError::invalid_value(
                "profile",
                name,
                "device_type",
                format!("expected one of {}", DEVICE_TYPES.join(", ")),
            )
        })?),
        None => None,
    };
    let namespaces = match raw.protocol {
        Protocol::Netconf => merged_namespaces(device, &raw.namespaces),
        Protocol::Snmp => raw.namespaces,
    };

    let chassis = raw.chassis.map(compile_chassis).transpose()?;

    let interfaces = raw
        .interfaces
        .into_iter()
        .map(|(name, iface)| {
            let spec = compile_interface(&name, iface, default_primary)?;
            Ok((name, spec))
        })
        .collect::<Result<BTreeMap<_, _>>>()?;

    Ok(ProfileSpec {
        device_type: raw.device_type,
        namespaces,
        chassis,
        interfaces,
    })
}

fn parse_path<P: PathExpression>(context: impl FnOnce() -> String, raw: &str) -> Result<P> {
    P::parse(raw).map_err(|e| ConfigError::path(context(), e))
}

fn compile_chassis<P: PathExpression>(raw: RawChassis) -> Result<ChassisSpec<P>> {
    let path = raw
        .path
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .map(|p| parse_path(|| "chassis path".to_string(), p))
        .transpose()?;
    let metrics = raw
        .metrics
        .into_iter()
        .map(|m| compile_metric("chassis", m))
        .collect::<Result<Vec<_>>>()?;
    Ok(ChassisSpec { path, metrics })
}

fn compile_interface<P: PathExpression>(
    type_name: &str,
    raw: RawInterface,
    default_primary: Option<&str>,
) -> Result<InterfaceSpec<P>> {
    if type_name.trim().is_empty() {
        return Err(ConfigError::invalid_value(
            "interface",
            type_name,
            "name",
            "interface type must not be empty",
        ));
    }
    let ctx = |field: &str| format!("interface '{type_name}' {field}");

    let path = raw
        .path
        .ok_or_else(|| ConfigError::missing_field("interface", type_name, "path"))?;
    let primary = raw
        .primary_key
        .as_deref()
        .or(default_primary)
        .ok_or_else(|| ConfigError::missing_field("interface", type_name, "primary_key"))?;

    let mut spec = InterfaceSpec::new(
        type_name,
        parse_path(|| ctx("path"), &path)?,
        parse_path(|| ctx("primary_key"), primary)?,
    );
    spec.fallback_key = optional_path(raw.fallback_key, || ctx("fallback_key"))?;
    spec.name_key = optional_path(raw.name_key, || ctx("name_key"))?;
    spec.description_key = optional_path(raw.description_key, || ctx("description_key"))?;

    let properties: Vec<(String, String)> = match raw.properties {
        RawProperties::List(paths) => paths
            .into_iter()
            .map(|p| (sanitize_metric_name(&p), p))
            .collect(),
        RawProperties::Map(map) => map.into_iter().collect(),
    };
    for (name, path) in properties {
        if name.is_empty() {
            return Err(ConfigError::invalid_value(
                "interface",
                type_name,
                "properties",
                format!("property '{path}' has no usable name"),
            ));
        }
        let path = parse_path(|| ctx(&format!("property '{name}'")), &path)?;
        spec.property_keys.push(PropertyKey { name, path });
    }

    spec.metrics = raw
        .metrics
        .into_iter()
        .map(|m| compile_metric(type_name, m))
        .collect::<Result<Vec<_>>>()?;
    Ok(spec)
}

fn optional_path<P: PathExpression>(
    raw: Option<String>,
    context: impl FnOnce() -> String,
) -> Result<Option<P>> {
    raw.filter(|p| !p.trim().is_empty())
        .map(|p| parse_path(context, &p))
        .transpose()
}

fn compile_metric<P: PathExpression>(scope: &str, raw: RawMetric) -> Result<MetricDefinition<P>> {
    let name = raw
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ConfigError::missing_field("metric", format!("{scope}[?]"), "name"))?;
    let path = raw
        .path
        .ok_or_else(|| ConfigError::missing_field("metric", &name, "path"))?;
    let path = parse_path(|| format!("{scope} metric '{name}'"), &path)?;

    let declared = [
        raw.string_map.is_some(),
        raw.parse_timestamp,
        raw.multiplier.is_some(),
    ]
    .iter()
    .filter(|set| **set)
    .count();
    if declared > 1 {
        return Err(ConfigError::invalid_value(
            "metric",
            &name,
            "transform",
            "at most one of string_map, parse_timestamp, multiplier",
        ));
    }

    let transform = if let Some(map) = raw.string_map {
        TransformSpec::StringMap(compile_string_map(&name, map)?)
    } else if raw.parse_timestamp {
        TransformSpec::Timestamp
    } else if let Some(factor) = raw.multiplier {
        if !factor.is_finite() {
            return Err(ConfigError::invalid_value(
                "metric",
                &name,
                "multiplier",
                "must be finite",
            ));
        }
        TransformSpec::Multiplier(factor)
    } else {
        TransformSpec::None
    };

    Ok(MetricDefinition {
        name,
        path,
        transform,
        help: raw.help,
    })
}

fn compile_string_map(metric: &str, raw: RawStringMap) -> Result<BTreeMap<String, i64>> {
    let map = match raw {
        RawStringMap::Inline(map) => map,
        RawStringMap::Named(def) if def.contains(':') => parse_definition(&def),
        RawStringMap::Named(name) => {
            builtin(name.trim()).ok_or_else(|| ConfigError::UnknownStringMap {
                metric: metric.to_string(),
                map: name.clone(),
            })?
        }
    };
    if map.is_empty() {
        return Err(ConfigError::invalid_value(
            "metric",
            metric,
            "string_map",
            "map is empty",
        ));
    }
    Ok(map)
}
