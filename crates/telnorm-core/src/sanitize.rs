//! Identifier normalization.
//!
//! Monitoring platforms reject instance identifiers containing `:`, `#`, `\`
//! or whitespace. Both functions here are total and idempotent.

/// Collapses `_` runs and trims leading/trailing `_`.
fn collapse_underscores(input: impl Iterator<Item = char>) -> String {
    let mut out = String::new();
    let mut pending = false;
    for c in input {
        if c == '_' {
            pending = true;
            continue;
        }
        if pending && !out.is_empty() {
            out.push('_');
        }
        pending = false;
        out.push(c);
    }
    out
}

/// Produces a platform-safe instance identifier.
///
/// Every `:`, `#`, `\` and whitespace character becomes `_`, runs of `_` are
/// collapsed and leading/trailing `_` are removed.
///
/// ```
/// use telnorm_core::sanitize::sanitize_instance_id;
///
/// assert_eq!(sanitize_instance_id("ae100:3 uplink"), "ae100_3_uplink");
/// assert_eq!(sanitize_instance_id("  "), "");
/// ```
pub fn sanitize_instance_id(raw: &str) -> String {
    collapse_underscores(raw.chars().map(|c| {
        if matches!(c, ':' | '#' | '\\') || c.is_whitespace() {
            '_'
        } else {
            c
        }
    }))
}

/// Turns an element name or key path into a metric/property name.
///
/// Strips `{uri}` qualifiers and a `prefix:`, lowercases, maps everything that
/// is not `[a-z0-9]` to `_` and collapses the result like
/// [`sanitize_instance_id`]. `fiber-type` becomes `fiber_type`.
pub fn sanitize_metric_name(raw: &str) -> String {
    let mut unqualified = String::with_capacity(raw.len());
    let mut in_uri = false;
    for c in raw.chars() {
        match c {
            '{' if !in_uri => in_uri = true,
            '}' if in_uri => in_uri = false,
            _ if !in_uri => unqualified.push(c),
            _ => {}
        }
    }
    // An unterminated `{` is kept verbatim.
    if in_uri {
        unqualified = raw.to_string();
    }

    let local = match unqualified.rsplit_once(':') {
        Some((_, local)) => local,
        None => unqualified.as_str(),
    };

    collapse_underscores(local.chars().map(|c| {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            c
        } else {
            '_'
        }
    }))
}
