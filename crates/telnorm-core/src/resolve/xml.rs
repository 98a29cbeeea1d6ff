//! Three-tier XML resolution over a `roxmltree` document.
//!
//! 1. Namespaced: prefixes are bound through the namespace map; unprefixed
//!    names match only elements without a namespace.
//! 2. Local-name: the same steps, comparing local names only.
//! 3. Descent: every named step collects all descendants with that local name.
//!    Single child steps (`alias-name`) never descend, so a key missing on the
//!    instance is never read from a nested sub-entity.
//!
//! The first tier with a non-empty result wins. `[n]` counts per parent.

use std::collections::BTreeMap;

use roxmltree::{Node, NodeId};

use crate::error::DocumentError;
use crate::resolve::Document;
use crate::resolve::path::{Axis, Predicate, PredicateKey, QName, Segment, Step, XmlPath};
use crate::trace::{Tier, Trace, TraceEvent};

const TIERS: [Tier; 3] = [Tier::Namespaced, Tier::LocalName, Tier::Descent];

/// A parsed XML reply scoped to its payload element.
#[derive(Debug)]
pub struct XmlDocument<'input> {
    tree: roxmltree::Document<'input>,
    scope: NodeId,
}

impl<'input> XmlDocument<'input> {
    /// Parses `text`; the scope is the root element.
    pub fn parse(text: &'input str) -> Result<Self, DocumentError> {
        let tree = roxmltree::Document::parse(text)?;
        let scope = tree.root_element().id();
        Ok(Self { tree, scope })
    }

    pub fn tree(&self) -> &roxmltree::Document<'input> {
        &self.tree
    }

    /// Moves the default scope to another element of the same tree.
    pub fn rescope(&mut self, id: NodeId) {
        if self.tree.get_node(id).is_some_and(|n| n.is_element()) {
            self.scope = id;
        }
    }

    /// The element relative paths start from by default.
    pub fn scope(&self) -> Node<'_, 'input> {
        self.tree
            .get_node(self.scope)
            .unwrap_or_else(|| self.tree.root_element())
    }
}

/// Trimmed text of the first text child; empty counts as absent.
pub fn node_text(node: Node<'_, '_>) -> Option<String> {
    node.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// An [`XmlDocument`] bound to the namespace map of one profile.
#[derive(Debug, Clone, Copy)]
pub struct XmlResolver<'a, 'input> {
    doc: &'a XmlDocument<'input>,
    namespaces: &'a BTreeMap<String, String>,
}

impl<'a, 'input> XmlResolver<'a, 'input> {
    pub fn new(doc: &'a XmlDocument<'input>, namespaces: &'a BTreeMap<String, String>) -> Self {
        Self { doc, namespaces }
    }

    /// Evaluates `path` with a single strategy.
    pub fn evaluate(
        &self,
        ctx: Node<'a, 'input>,
        path: &XmlPath,
        tier: Tier,
        trace: &dyn Trace,
    ) -> Vec<Node<'a, 'input>> {
        if tier == Tier::Namespaced {
            if let Some(prefix) = path.prefixes().find(|p| !self.namespaces.contains_key(*p)) {
                trace.event(&TraceEvent::UnknownPrefix {
                    path: path.to_string(),
                    prefix: prefix.to_string(),
                });
                return Vec::new();
            }
        }

        let start = if path.is_absolute() {
            ctx.document().root()
        } else {
            ctx
        };

        let mut current = vec![start];
        for step in path.steps() {
            let mut next = Vec::new();
            for node in &current {
                let candidates = self.step_candidates(*node, step, tier);
                next.extend(self.apply_predicates(candidates, &step.predicates, tier));
            }
            next.sort_by_key(|n| n.id().get());
            next.dedup_by_key(|n| n.id().get());
            if next.is_empty() {
                return next;
            }
            current = next;
        }

        if let Some(attr) = path.attribute() {
            current.retain(|n| self.attribute_value(*n, attr, tier).is_some());
        }
        current.retain(|n| n.is_element());
        current
    }

    fn step_candidates(
        &self,
        node: Node<'a, 'input>,
        step: &Step,
        tier: Tier,
    ) -> Vec<Node<'a, 'input>> {
        match &step.segment {
            Segment::SelfNode if step.axis == Axis::Descendant => {
                node.descendants().filter(Node::is_element).collect()
            }
            Segment::SelfNode => vec![node],
            Segment::Parent => node.parent().filter(Node::is_element).into_iter().collect(),
            Segment::Wildcard => match (tier, step.axis) {
                (Tier::Descent, _) | (_, Axis::Descendant) => {
                    node.descendants().skip(1).filter(Node::is_element).collect()
                }
                (_, Axis::Child) => node.children().filter(Node::is_element).collect(),
            },
            Segment::Name(name) => match (tier, step.axis) {
                (Tier::Descent, _) | (_, Axis::Descendant) => node
                    .descendants()
                    .skip(1)
                    .filter(|n| self.name_matches(*n, name, tier))
                    .collect(),
                (_, Axis::Child) => node
                    .children()
                    .filter(|n| self.name_matches(*n, name, tier))
                    .collect(),
            },
        }
    }

    fn apply_predicates(
        &self,
        mut nodes: Vec<Node<'a, 'input>>,
        predicates: &[Predicate],
        tier: Tier,
    ) -> Vec<Node<'a, 'input>> {
        for predicate in predicates {
            nodes = match predicate {
                Predicate::Position(n) => {
                    let mut seen = BTreeMap::new();
                    nodes
                        .into_iter()
                        .filter(|node| {
                            let parent = node.parent().map(|p| p.id().get());
                            let count = seen.entry(parent).or_insert(0);
                            *count += 1;
                            *count == *n
                        })
                        .collect()
                }
                Predicate::Equals { key, value } => nodes
                    .into_iter()
                    .filter(|n| self.predicate_holds(*n, key, value, tier))
                    .collect(),
            };
        }
        nodes
    }

    fn predicate_holds(
        &self,
        node: Node<'_, '_>,
        key: &PredicateKey,
        value: &str,
        tier: Tier,
    ) -> bool {
        match key {
            PredicateKey::Child(name) => node
                .children()
                .filter(|c| self.name_matches(*c, name, tier))
                .any(|c| node_text(c).as_deref() == Some(value)),
            PredicateKey::Attribute(name) => self.attribute_value(node, name, tier) == Some(value),
            PredicateKey::LocalName => node.tag_name().name() == value,
        }
    }

    fn name_matches(&self, node: Node<'_, '_>, name: &QName, tier: Tier) -> bool {
        if !node.is_element() || node.tag_name().name() != name.local {
            return false;
        }
        match tier {
            Tier::Namespaced => {
                let ns = node.tag_name().namespace();
                match &name.prefix {
                    Some(prefix) => self
                        .namespaces
                        .get(prefix)
                        .is_some_and(|uri| ns == Some(uri.as_str())),
                    None => ns.is_none(),
                }
            }
            Tier::LocalName | Tier::Descent => true,
        }
    }

    fn attribute_value<'n>(&self, node: Node<'n, '_>, name: &QName, tier: Tier) -> Option<&'n str> {
        node.attributes()
            .find(|a| {
                a.name() == name.local
                    && match (tier, &name.prefix) {
                        (Tier::Namespaced, Some(prefix)) => self
                            .namespaces
                            .get(prefix)
                            .is_some_and(|uri| a.namespace() == Some(uri.as_str())),
                        (Tier::Namespaced, None) => a.namespace().is_none(),
                        _ => true,
                    }
            })
            .map(|a| a.value())
    }
}

impl<'a, 'input> Document for XmlResolver<'a, 'input> {
    type Node = Node<'a, 'input>;
    type Path = XmlPath;

    fn root(&self) -> Self::Node {
        self.doc.scope()
    }

    fn select(&self, ctx: &Self::Node, path: &XmlPath, trace: &dyn Trace) -> Vec<Self::Node> {
        let tiers = TIERS
            .into_iter()
            .filter(|tier| *tier != Tier::Descent || !path.is_direct_child());
        for tier in tiers {
            let nodes = self.evaluate(*ctx, path, tier, trace);
            if !nodes.is_empty() {
                let shown = match tier {
                    Tier::LocalName => path.local_name_form(),
                    _ => path.to_string(),
                };
                trace.event(&TraceEvent::PathResolved {
                    path: shown,
                    tier,
                    matches: nodes.len(),
                });
                return nodes;
            }
        }
        trace.event(&TraceEvent::PathMiss {
            path: path.to_string(),
        });
        Vec::new()
    }

    fn text(&self, ctx: &Self::Node, path: &XmlPath, trace: &dyn Trace) -> Option<String> {
        let first = *self.select(ctx, path, trace).first()?;
        match path.attribute() {
            Some(attr) => self
                .attribute_value(first, attr, Tier::LocalName)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
            None => node_text(first),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::resolve::PathExpression;
    use crate::trace::{NoopTrace, RecordingTrace};

    fn coriant_namespaces() -> BTreeMap<String, String> {
        BTreeMap::from([
            (
                "nc".to_string(),
                "urn:ietf:params:xml:ns:netconf:base:1.0".to_string(),
            ),
            ("ne".to_string(), "http://coriant.com/yang/os/ne".to_string()),
        ])
    }

    fn path(raw: &str) -> XmlPath {
        XmlPath::parse(raw).unwrap()
    }

    fn names<'a>(nodes: &[Node<'a, '_>]) -> Vec<&'a str> {
        nodes.iter().map(|n| n.tag_name().name()).collect()
    }

    #[test]
    fn test_namespaced_tier_wins() {
        let doc = XmlDocument::parse(fixtures::CORIANT_REPLY).unwrap();
        let ns = coriant_namespaces();
        let resolver = XmlResolver::new(&doc, &ns);
        let trace = RecordingTrace::new();

        let root = resolver.root();
        let ots = path("ne:ne/ne:services/ne:optical-interfaces/ne:ots");
        let nodes = resolver.select(&root, &ots, &trace);
        assert_eq!(names(&nodes), vec!["ots"]);
        assert!(matches!(
            trace.events().last(),
            Some(TraceEvent::PathResolved {
                tier: Tier::Namespaced,
                matches: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_unprefixed_path_falls_to_local_name() {
        let doc = XmlDocument::parse(fixtures::CORIANT_REPLY).unwrap();
        let ns = coriant_namespaces();
        let resolver = XmlResolver::new(&doc, &ns);
        let trace = RecordingTrace::new();

        let root = resolver.root();
        let nodes = resolver.select(&root, &path("ne/services/optical-interfaces/oms"), &trace);
        assert_eq!(names(&nodes), vec!["oms"]);
        assert!(matches!(
            trace.events().last(),
            Some(TraceEvent::PathResolved {
                tier: Tier::LocalName,
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_prefix_falls_through() {
        let doc = XmlDocument::parse(fixtures::CORIANT_REPLY).unwrap();
        let ns = BTreeMap::new();
        let resolver = XmlResolver::new(&doc, &ns);
        let trace = RecordingTrace::new();

        let root = resolver.root();
        let osc = path("ne:ne/ne:services/ne:optical-interfaces/ne:osc");
        let nodes = resolver.select(&root, &osc, &trace);
        assert_eq!(names(&nodes), vec!["osc"]);
        let unknown = trace.count(|e| {
            matches!(e, TraceEvent::UnknownPrefix { prefix, .. } if prefix == "ne")
        });
        assert_eq!(unknown, 1);
    }

    #[test]
    fn test_wrong_namespace_uri_uses_local_name() {
        let doc = XmlDocument::parse(fixtures::CORIANT_REPLY).unwrap();
        let ns = BTreeMap::from([("ne".to_string(), "urn:other".to_string())]);
        let resolver = XmlResolver::new(&doc, &ns);
        let root = resolver.root();
        let nodes = resolver.select(&root, &path("ne:ne/ne:ne-temperature"), &NoopTrace);
        assert_eq!(names(&nodes), vec!["ne-temperature"]);
    }

    #[test]
    fn test_descent_tier_finds_nested_elements() {
        let doc = XmlDocument::parse(fixtures::CORIANT_REPLY).unwrap();
        let ns = coriant_namespaces();
        let resolver = XmlResolver::new(&doc, &ns);
        let trace = RecordingTrace::new();

        // `services` is not a child of the scope, only a descendant.
        let root = resolver.root();
        let nodes = resolver.select(&root, &path("services/optical-interfaces/ots"), &trace);
        assert_eq!(names(&nodes), vec!["ots"]);
        assert!(matches!(
            trace.events().last(),
            Some(TraceEvent::PathResolved {
                tier: Tier::Descent,
                ..
            })
        ));
    }

    #[test]
    fn test_descendant_axis() {
        let doc = XmlDocument::parse(fixtures::CORIANT_REPLY).unwrap();
        let ns = coriant_namespaces();
        let resolver = XmlResolver::new(&doc, &ns);
        let root = resolver.root();

        let nodes = resolver.select(&root, &path(".//ne:instant"), &NoopTrace);
        assert_eq!(nodes.len(), 1);
        assert_eq!(node_text(nodes[0]).as_deref(), Some("-12.3"));

        let nodes = resolver.select(&root, &path("//ne:optical-interfaces/*"), &NoopTrace);
        assert_eq!(names(&nodes), vec!["ots", "oms", "osc"]);
    }

    #[test]
    fn test_equality_predicate() {
        let doc = XmlDocument::parse(fixtures::CIENA_REPLY).unwrap();
        let ns = BTreeMap::new();
        let resolver = XmlResolver::new(&doc, &ns);
        let root = resolver.root();

        let p = path("//ptp[name='1/2']");
        let nodes = resolver.select(&root, &p, &NoopTrace);
        assert_eq!(nodes.len(), 1);
        let id = resolver.text(&nodes[0], &path("name"), &NoopTrace);
        assert_eq!(id.as_deref(), Some("1/2"));

        let none = resolver.select(&root, &path("//ptp[name='9/9']"), &NoopTrace);
        assert!(none.is_empty());
    }

    #[test]
    fn test_position_predicate_is_per_context() {
        let doc = XmlDocument::parse(fixtures::CIENA_REPLY).unwrap();
        let ns = BTreeMap::new();
        let resolver = XmlResolver::new(&doc, &ns);
        let root = resolver.root();

        let nodes = resolver.select(&root, &path("//ptp[2]/name"), &NoopTrace);
        assert_eq!(nodes.len(), 1);
        assert_eq!(node_text(nodes[0]).as_deref(), Some("1/2"));
    }

    #[test]
    fn test_position_counts_per_parent() {
        let doc = XmlDocument::parse("<r><a><x>1</x><x>3</x></a><b><x>2</x></b></r>").unwrap();
        let ns = BTreeMap::new();
        let resolver = XmlResolver::new(&doc, &ns);
        let root = resolver.root();

        let first = resolver.select(&root, &path(".//x[1]"), &NoopTrace);
        let texts: Vec<_> = first.iter().filter_map(|n| node_text(*n)).collect();
        assert_eq!(texts, vec!["1", "2"]);

        let second = resolver.select(&root, &path(".//x[2]"), &NoopTrace);
        assert_eq!(second.len(), 1);
        assert_eq!(node_text(second[0]).as_deref(), Some("3"));
    }

    #[test]
    fn test_single_step_reads_direct_children_only() {
        let xml = "<ots><ots-name>OTS-1</ots-name>\
            <neighbor><alias-name>Peer</alias-name></neighbor></ots>";
        let doc = XmlDocument::parse(xml).unwrap();
        let ns = BTreeMap::new();
        let resolver = XmlResolver::new(&doc, &ns);
        let trace = RecordingTrace::new();
        let root = resolver.root();

        assert_eq!(resolver.text(&root, &path("alias-name"), &trace), None);
        assert_eq!(
            trace.count(|e| matches!(e, TraceEvent::PathResolved { tier: Tier::Descent, .. })),
            0
        );
        // Asking for descent explicitly still reaches it.
        let nested = resolver.text(&root, &path(".//alias-name"), &NoopTrace);
        assert_eq!(nested.as_deref(), Some("Peer"));
        let nested = resolver.text(&root, &path("neighbor/alias-name"), &NoopTrace);
        assert_eq!(nested.as_deref(), Some("Peer"));
    }

    #[test]
    fn test_attribute_text() {
        let doc = XmlDocument::parse(fixtures::CIENA_REPLY).unwrap();
        let ns = BTreeMap::new();
        let resolver = XmlResolver::new(&doc, &ns);
        let root = resolver.root();

        let ptps = resolver.select(&root, &path("//ptp"), &NoopTrace);
        let kind = resolver.text(&ptps[0], &path("@kind"), &NoopTrace);
        assert_eq!(kind.as_deref(), Some("line"));
        let missing = resolver.text(&ptps[0], &path("@absent"), &NoopTrace);
        assert_eq!(missing, None);
    }

    #[test]
    fn test_parent_and_self_steps() {
        let doc = XmlDocument::parse(fixtures::CORIANT_REPLY).unwrap();
        let ns = coriant_namespaces();
        let resolver = XmlResolver::new(&doc, &ns);
        let root = resolver.root();

        let osc = resolver.select(&root, &path(".//ne:osc"), &NoopTrace);
        let parent = resolver.select(&osc[0], &path(".."), &NoopTrace);
        assert_eq!(names(&parent), vec!["optical-interfaces"]);
        let itself = resolver.select(&osc[0], &path("."), &NoopTrace);
        assert_eq!(itself, osc);
    }

    #[test]
    fn test_empty_text_is_absent() {
        let doc = XmlDocument::parse("<a><b>  </b><c/><d> 7 </d></a>").unwrap();
        let ns = BTreeMap::new();
        let resolver = XmlResolver::new(&doc, &ns);
        let root = resolver.root();
        assert_eq!(resolver.text(&root, &path("b"), &NoopTrace), None);
        assert_eq!(resolver.text(&root, &path("c"), &NoopTrace), None);
        assert_eq!(resolver.text(&root, &path("d"), &NoopTrace).as_deref(), Some("7"));
    }

    #[test]
    fn test_miss_is_empty_and_traced() {
        let doc = XmlDocument::parse(fixtures::CORIANT_REPLY).unwrap();
        let ns = coriant_namespaces();
        let resolver = XmlResolver::new(&doc, &ns);
        let trace = RecordingTrace::new();
        let root = resolver.root();

        assert!(resolver.select(&root, &path("ne:nothing/here"), &trace).is_empty());
        assert_eq!(resolver.text(&root, &path("missing"), &trace), None);
        assert_eq!(trace.count(|e| matches!(e, TraceEvent::PathMiss { .. })), 2);
    }

    #[test]
    fn test_results_are_deduplicated() {
        let doc = XmlDocument::parse("<r><a><a><b>1</b></a></a></r>").unwrap();
        let ns = BTreeMap::new();
        let resolver = XmlResolver::new(&doc, &ns);
        let root = resolver.root();
        // Both `a` elements reach the same `b` through the descendant axis.
        let nodes = resolver.select(&root, &path(".//a//b"), &NoopTrace);
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_rescope() {
        let mut doc = XmlDocument::parse("<reply><data><x>1</x></data></reply>").unwrap();
        let data = doc.tree().descendants().find(|n| n.has_tag_name("data")).unwrap().id();
        doc.rescope(data);
        assert_eq!(doc.scope().tag_name().name(), "data");
    }
}
