//! SNMP resolution over an already retrieved OID table.
//!
//! OIDs are unambiguous, so there are no fallback tiers. Tables are addressed
//! by column OID: walking a column yields one row per index suffix, and the
//! same column resolved against a row reads `column.index`.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Bound;

use crate::error::PathError;
use crate::resolve::{Document, PathExpression};
use crate::trace::{Trace, TraceEvent};

/// Default page size for [`SnmpDocument::bulk_walk`].
pub const DEFAULT_MAX_REPETITIONS: usize = 25;

/// A dotted numeric object identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Oid(Vec<u32>);

impl Oid {
    pub fn new(arcs: Vec<u32>) -> Self {
        Self(arcs)
    }

    pub fn arcs(&self) -> &[u32] {
        &self.0
    }

    pub fn last_arc(&self) -> Option<u32> {
        self.0.last().copied()
    }

    /// True when `self` lies strictly below `prefix`.
    pub fn is_under(&self, prefix: &Oid) -> bool {
        self.0.len() > prefix.0.len() && self.0.starts_with(&prefix.0)
    }

    /// Arcs following `prefix`, if `self` lies below it.
    pub fn suffix(&self, prefix: &Oid) -> Option<&[u32]> {
        self.is_under(prefix).then(|| &self.0[prefix.0.len()..])
    }

    /// `self` extended with `index`.
    pub fn child(&self, index: &[u32]) -> Oid {
        let mut arcs = self.0.clone();
        arcs.extend_from_slice(index);
        Oid(arcs)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arc) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{arc}")?;
        }
        Ok(())
    }
}

impl PathExpression for Oid {
    /// Parses `1.3.6.1.2.1.2.2.1.2`; a leading `.` is accepted.
    fn parse(raw: &str) -> Result<Self, PathError> {
        let trimmed = raw.trim();
        let dotted = trimmed.strip_prefix('.').unwrap_or(trimmed);
        if dotted.is_empty() {
            return Err(PathError::new(raw, "empty OID"));
        }
        dotted
            .split('.')
            .map(|arc| {
                arc.parse::<u32>()
                    .map_err(|_| PathError::new(raw, format!("invalid arc '{arc}'")))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Oid)
    }
}

/// Context for SNMP resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnmpNode {
    /// Whole-device scope; paths are exact OIDs.
    Scalar,
    /// One table row; paths are column OIDs.
    Row(Vec<u32>),
}

/// Retrieved OID → pretty-printed value pairs, kept in OID order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnmpDocument {
    entries: BTreeMap<Oid, String>,
}

impl SnmpDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, oid: Oid, value: impl Into<String>) {
        self.entries.insert(oid, value.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact lookup. `noSuchObject`/`noSuchInstance` values count as absent.
    pub fn get(&self, oid: &Oid) -> Option<&str> {
        self.entries
            .get(oid)
            .map(String::as_str)
            .filter(|v| !v.contains("noSuch"))
    }

    /// The first entry strictly after `oid`.
    pub fn get_next(&self, oid: &Oid) -> Option<(&Oid, &str)> {
        self.entries
            .range((Bound::Excluded(oid), Bound::Unbounded))
            .next()
            .map(|(k, v)| (k, v.as_str()))
    }

    fn subtree<'a>(&'a self, prefix: &'a Oid) -> impl Iterator<Item = (&'a Oid, &'a str)> + 'a {
        self.entries
            .range((Bound::Excluded(prefix), Bound::Unbounded))
            .take_while(move |(oid, _)| oid.is_under(prefix))
            .map(|(k, v)| (k, v.as_str()))
    }

    /// GETNEXT walk of the subtree below `prefix`, keyed by last arc.
    pub fn walk(&self, prefix: &Oid) -> BTreeMap<u32, String> {
        self.subtree(prefix)
            .filter_map(|(oid, value)| Some((oid.last_arc()?, value.to_string())))
            .collect()
    }

    /// GETBULK walk: pages of `max_repetitions` GETNEXT steps.
    ///
    /// Returns the same map as [`SnmpDocument::walk`].
    pub fn bulk_walk(&self, prefix: &Oid, max_repetitions: usize) -> BTreeMap<u32, String> {
        let page_size = max_repetitions.max(1);
        let mut results = BTreeMap::new();
        let mut cursor = prefix.clone();

        'pages: loop {
            let page: Vec<(&Oid, &str)> = self
                .entries
                .range((Bound::Excluded(&cursor), Bound::Unbounded))
                .take(page_size)
                .map(|(k, v)| (k, v.as_str()))
                .collect();
            if page.is_empty() {
                break;
            }
            for (oid, value) in &page {
                if !oid.is_under(prefix) {
                    break 'pages;
                }
                if let Some(arc) = oid.last_arc() {
                    results.insert(arc, value.to_string());
                }
            }
            match page.last() {
                Some((last, _)) => cursor = (*last).clone(),
                None => break,
            }
        }
        results
    }

    /// Rows below a column OID as `(index suffix, value)`.
    pub fn walk_rows(&self, column: &Oid) -> Vec<(Vec<u32>, &str)> {
        self.entries
            .range((Bound::Excluded(column), Bound::Unbounded))
            .take_while(|(oid, _)| oid.is_under(column))
            .filter_map(|(oid, value)| Some((oid.suffix(column)?.to_vec(), value.as_str())))
            .collect()
    }
}

impl FromIterator<(Oid, String)> for SnmpDocument {
    fn from_iter<I: IntoIterator<Item = (Oid, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Document for SnmpDocument {
    type Node = SnmpNode;
    type Path = Oid;

    fn root(&self) -> SnmpNode {
        SnmpNode::Scalar
    }

    fn select(&self, ctx: &SnmpNode, path: &Oid, trace: &dyn Trace) -> Vec<SnmpNode> {
        let nodes: Vec<SnmpNode> = match ctx {
            SnmpNode::Scalar => self
                .walk_rows(path)
                .into_iter()
                .map(|(index, _)| SnmpNode::Row(index))
                .collect(),
            SnmpNode::Row(index) => {
                if self.get(&path.child(index)).is_some() {
                    vec![ctx.clone()]
                } else {
                    Vec::new()
                }
            }
        };
        if nodes.is_empty() {
            trace.event(&TraceEvent::PathMiss {
                path: path.to_string(),
            });
        }
        nodes
    }

    fn text(&self, ctx: &SnmpNode, path: &Oid, trace: &dyn Trace) -> Option<String> {
        let value = match ctx {
            SnmpNode::Scalar => self.get(path),
            SnmpNode::Row(index) => self.get(&path.child(index)),
        }
        .map(str::trim)
        .filter(|v| !v.is_empty());

        if value.is_none() {
            trace.event(&TraceEvent::PathMiss {
                path: path.to_string(),
            });
        }
        value.map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{NoopTrace, RecordingTrace};

    fn oid(raw: &str) -> Oid {
        Oid::parse(raw).unwrap()
    }

    fn if_table() -> SnmpDocument {
        [
            ("1.3.6.1.2.1.1.5.0", "edge-router-1"),
            ("1.3.6.1.2.1.2.2.1.2.1", "ge-0/0/0"),
            ("1.3.6.1.2.1.2.2.1.2.2", "ge-0/0/1"),
            ("1.3.6.1.2.1.2.2.1.2.10", "ae100:3 uplink"),
            ("1.3.6.1.2.1.2.2.1.8.1", "1"),
            ("1.3.6.1.2.1.2.2.1.8.2", "2"),
            ("1.3.6.1.2.1.2.2.1.8.10", "1"),
            ("1.3.6.1.2.1.31.1.1.1.18.2", "noSuchInstance"),
        ]
        .into_iter()
        .map(|(o, v)| (oid(o), v.to_string()))
        .collect()
    }

    #[test]
    fn test_parse_oid() {
        assert_eq!(oid(".1.3.6.1").arcs(), &[1, 3, 6, 1]);
        assert_eq!(oid("1.3.6.1").to_string(), "1.3.6.1");
        assert!(Oid::parse("").is_err());
        assert!(Oid::parse(".").is_err());
        assert!(Oid::parse("1..3").is_err());
        assert!(Oid::parse("1.3.x").unwrap_err().message.contains("'x'"));
    }

    #[test]
    fn test_oid_order_is_numeric() {
        assert!(oid("1.3.6.1.2") < oid("1.3.6.1.10"));
        assert!(oid("1.3.6") < oid("1.3.6.0"));
    }

    #[test]
    fn test_get_filters_no_such() {
        let doc = if_table();
        assert_eq!(doc.get(&oid("1.3.6.1.2.1.1.5.0")), Some("edge-router-1"));
        assert_eq!(doc.get(&oid("1.3.6.1.2.1.31.1.1.1.18.2")), None);
        assert_eq!(doc.get(&oid("1.3.6.1.2.1.1.6.0")), None);
    }

    #[test]
    fn test_get_next() {
        let doc = if_table();
        let (next, value) = doc.get_next(&oid("1.3.6.1.2.1.2.2.1.2.2")).unwrap();
        assert_eq!(next.to_string(), "1.3.6.1.2.1.2.2.1.2.10");
        assert_eq!(value, "ae100:3 uplink");
        assert!(doc.get_next(&oid("1.3.6.1.2.1.31.1.1.1.18.2")).is_none());
    }

    #[test]
    fn test_walk_keys_by_last_arc() {
        let doc = if_table();
        let names = doc.walk(&oid("1.3.6.1.2.1.2.2.1.2"));
        assert_eq!(names.len(), 3);
        assert_eq!(names[&1], "ge-0/0/0");
        assert_eq!(names[&10], "ae100:3 uplink");
        assert!(doc.walk(&oid("1.3.6.1.4")).is_empty());
    }

    #[test]
    fn test_bulk_walk_matches_walk() {
        let doc = if_table();
        let prefix = oid("1.3.6.1.2.1.2.2.1");
        let walked = doc.walk(&oid("1.3.6.1.2.1.2.2.1.8"));
        for page in [1, 2, 3, DEFAULT_MAX_REPETITIONS] {
            assert_eq!(doc.bulk_walk(&oid("1.3.6.1.2.1.2.2.1.8"), page), walked);
        }
        assert_eq!(doc.bulk_walk(&prefix, 0), doc.walk(&prefix));
    }

    #[test]
    fn test_walk_rows_keep_full_index() {
        let mut doc = SnmpDocument::new();
        doc.insert(oid("1.3.6.1.4.1.9.1.1.5"), "a");
        doc.insert(oid("1.3.6.1.4.1.9.1.2.5"), "b");
        let rows = doc.walk_rows(&oid("1.3.6.1.4.1.9"));
        assert_eq!(rows, vec![(vec![1, 1, 5], "a"), (vec![1, 2, 5], "b")]);
    }

    #[test]
    fn test_document_rows_and_columns() {
        let doc = if_table();
        let root = doc.root();
        let rows = doc.select(&root, &oid("1.3.6.1.2.1.2.2.1.2"), &NoopTrace);
        assert_eq!(
            rows,
            vec![
                SnmpNode::Row(vec![1]),
                SnmpNode::Row(vec![2]),
                SnmpNode::Row(vec![10])
            ]
        );
        let status = doc.text(&rows[1], &oid("1.3.6.1.2.1.2.2.1.8"), &NoopTrace);
        assert_eq!(status.as_deref(), Some("2"));
        let scalar = doc.text(&root, &oid("1.3.6.1.2.1.1.5.0"), &NoopTrace);
        assert_eq!(scalar.as_deref(), Some("edge-router-1"));
    }

    #[test]
    fn test_document_miss_is_traced() {
        let doc = if_table();
        let trace = RecordingTrace::new();
        let row = SnmpNode::Row(vec![2]);
        assert_eq!(doc.text(&row, &oid("1.3.6.1.2.1.31.1.1.1.18"), &trace), None);
        assert!(doc.select(&row, &oid("1.3.6.1.2.1.2.2.1.99"), &trace).is_empty());
        assert_eq!(trace.count(|e| matches!(e, TraceEvent::PathMiss { .. })), 2);
    }
}
