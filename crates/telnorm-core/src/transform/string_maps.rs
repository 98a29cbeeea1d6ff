//! Enum-to-integer lookup tables.

use std::collections::BTreeMap;

use tracing::warn;

const STATUS: &[(&str, i64)] = &[("down", 0), ("up", 1)];

const ENABLED: &[(&str, i64)] = &[("disabled", 0), ("enabled", 1)];

const ACTIVE: &[(&str, i64)] = &[
    ("Inactive", 0),
    ("inactive", 0),
    ("Active", 1),
    ("active", 1),
];

const BOOL: &[(&str, i64)] = &[
    ("false", 0),
    ("true", 1),
    ("False", 0),
    ("True", 1),
    ("no", 0),
    ("yes", 1),
    ("No", 0),
    ("Yes", 1),
];

const OPER_STATE: &[(&str, i64)] = &[
    ("down", 0),
    ("up", 1),
    ("unknown", -1),
    ("testing", 2),
    ("dormant", 3),
    ("notPresent", 4),
    ("lowerLayerDown", 5),
];

const ADMIN_STATE: &[(&str, i64)] = &[("down", 0), ("up", 1), ("testing", 2)];

const ALARM_SEVERITY: &[(&str, i64)] = &[
    ("cleared", 0),
    ("indeterminate", 1),
    ("warning", 2),
    ("minor", 3),
    ("major", 4),
    ("critical", 5),
];

/// Names accepted by [`builtin`].
pub const BUILTIN_NAMES: &[&str] = &[
    "status",
    "enabled",
    "active",
    "bool",
    "oper_state",
    "admin_state",
    "alarm_severity",
];

/// Returns a built-in string map by name.
pub fn builtin(name: &str) -> Option<BTreeMap<String, i64>> {
    let entries = match name {
        "status" => STATUS,
        "enabled" => ENABLED,
        "active" => ACTIVE,
        "bool" => BOOL,
        "oper_state" => OPER_STATE,
        "admin_state" => ADMIN_STATE,
        "alarm_severity" => ALARM_SEVERITY,
        _ => return None,
    };
    Some(entries.iter().map(|(k, v)| (k.to_string(), *v)).collect())
}

/// Parses an inline definition such as `"down:0,up:1"`.
///
/// Values may be written as floats (`"up:1.0"`) and are truncated. Items
/// without a `key:value` shape or with a non-numeric value are skipped with
/// a warning; the rest of the definition still applies.
pub fn parse_definition(definition: &str) -> BTreeMap<String, i64> {
    let mut map = BTreeMap::new();
    for item in definition.split(',') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        let Some((key, value)) = item.split_once(':') else {
            warn!(item, "Skipping string_map item without key:value");
            continue;
        };
        let value = value.trim();
        let parsed = value.parse::<i64>().ok().or_else(|| {
            value
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| v.trunc() as i64)
        });
        match parsed {
            Some(parsed) => {
                map.insert(key.trim().to_string(), parsed);
            }
            None => warn!(item, "Invalid string_map value"),
        }
    }
    map
}
