//! `snmpwalk -On` output adapter.
//!
//! ```text
//! .1.3.6.1.2.1.1.3.0 = Timeticks: (123456789) 14 days, 6:56:07.89
//! .1.3.6.1.2.1.2.2.1.2.513 = STRING: "ge-0/0/0"
//! .1.3.6.1.2.1.2.2.1.8.513 = INTEGER: up(1)
//! ```
//!
//! Values are stored without their type tag. Quoted strings are unquoted and
//! may span lines, `Timeticks: (n) …` keeps `n`, enumerations `name(n)` keep
//! `name`, and unquoted continuation lines are appended with `\n`. Entries
//! reported as `No Such Object`, `No Such Instance` or end-of-view are left out.

use crate::error::DocumentError;
use crate::resolve::{Oid, PathExpression, SnmpDocument};

const ABSENT_MARKERS: [&str; 3] = ["No Such Object", "No Such Instance", "No more variables"];

struct Pending {
    oid: Oid,
    value: String,
    open_quote: bool,
}

fn closes_quote(text: &str) -> bool {
    text.ends_with('"') && !text.ends_with("\\\"")
}

fn unescape(text: &str) -> String {
    text.replace("\\\"", "\"")
}

/// Splits `TYPE: value`; untyped values (`""`, bare text) come back whole.
fn split_type(rest: &str) -> (Option<&str>, &str) {
    let typed = rest
        .split_once(": ")
        .or_else(|| rest.strip_suffix(':').map(|ty| (ty, "")));
    match typed {
        Some((ty, value))
            if !ty.is_empty()
                && ty.starts_with(|c: char| c.is_ascii_uppercase())
                && ty.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == ' ') =>
        {
            (Some(ty), value.trim())
        }
        _ => (None, rest),
    }
}

/// `up(1)` → `up`.
fn enum_label(value: &str) -> Option<&str> {
    let (label, rest) = value.split_once('(')?;
    let number = rest.strip_suffix(')')?;
    (!label.is_empty() && number.parse::<i64>().is_ok()).then_some(label)
}

/// `(123456789) 14 days, 6:56:07.89` → `123456789`.
fn timeticks(value: &str) -> Option<&str> {
    let (ticks, _) = value.strip_prefix('(')?.split_once(')')?;
    ticks.parse::<u64>().is_ok().then_some(ticks)
}

/// Parses the value side of one entry.
fn parse_value(rest: &str) -> (String, bool) {
    let (ty, value) = split_type(rest.trim());
    if let Some(quoted) = value.strip_prefix('"') {
        if closes_quote(quoted) {
            let inner = &quoted[..quoted.len() - 1];
            return (unescape(inner), false);
        }
        return (unescape(quoted), true);
    }
    let value = match ty {
        Some("Timeticks") => timeticks(value).unwrap_or(value),
        Some(_) => enum_label(value).unwrap_or(value),
        None => value,
    };
    (value.to_string(), false)
}

/// Parses `OID = value` when the left side is an OID.
fn parse_entry(line: &str) -> Option<Result<(Oid, &str), String>> {
    let (lhs, rhs) = line.split_once(" = ").or_else(|| {
        line.trim_end()
            .strip_suffix(" =")
            .map(|lhs| (lhs, ""))
    })?;
    let lhs = lhs.trim();
    if !lhs.starts_with(|c: char| c == '.' || c.is_ascii_digit()) {
        return None;
    }
    Some(
        Oid::parse(lhs)
            .map(|oid| (oid, rhs))
            .map_err(|e| e.message),
    )
}

/// Parses a numeric-OID walk dump into an [`SnmpDocument`].
pub fn parse_walk(text: &str) -> Result<SnmpDocument, DocumentError> {
    let mut doc = SnmpDocument::new();
    let mut pending: Option<Pending> = None;
    let mut quote_started = 0;

    let flush = |doc: &mut SnmpDocument, pending: Option<Pending>| {
        if let Some(entry) = pending {
            doc.insert(entry.oid, entry.value);
        }
    };

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;

        if let Some(entry) = pending.as_mut().filter(|p| p.open_quote) {
            entry.value.push('\n');
            if closes_quote(line) {
                entry.value.push_str(&unescape(&line[..line.len() - 1]));
                entry.open_quote = false;
            } else {
                entry.value.push_str(&unescape(line));
            }
            continue;
        }

        match parse_entry(line) {
            Some(Ok((oid, rest))) => {
                flush(&mut doc, pending.take());
                if ABSENT_MARKERS.iter().any(|m| rest.trim_start().starts_with(m)) {
                    continue;
                }
                let (value, open_quote) = parse_value(rest);
                if open_quote {
                    quote_started = line_no;
                }
                pending = Some(Pending {
                    oid,
                    value,
                    open_quote,
                });
            }
            Some(Err(message)) => {
                return Err(DocumentError::SnmpLine {
                    line: line_no,
                    message,
                });
            }
            None if line.trim().is_empty() => {}
            None => match pending.as_mut() {
                Some(entry) => {
                    entry.value.push('\n');
                    entry.value.push_str(line.trim_end());
                }
                None => {
                    return Err(DocumentError::SnmpLine {
                        line: line_no,
                        message: "expected 'OID = value'".to_string(),
                    });
                }
            },
        }
    }

    if pending.as_ref().is_some_and(|p| p.open_quote) {
        return Err(DocumentError::SnmpLine {
            line: quote_started,
            message: "unterminated quoted string".to_string(),
        });
    }
    flush(&mut doc, pending);
    Ok(doc)
}
