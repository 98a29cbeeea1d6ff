//! Tree/OID resolution engine.
//!
//! A [`Document`] answers path queries relative to a context node. Discovery
//! and extraction are generic over it, so the same code drives XML replies
//! ([`XmlResolver`]) and SNMP tables ([`SnmpDocument`]).
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                       RawDocument                         │
//! │  ┌──────────────────────┐    ┌─────────────────────────┐  │
//! │  │  XmlDocument         │    │  SnmpDocument           │  │
//! │  │  (roxmltree tree)    │    │  (OID -> value, sorted) │  │
//! │  └──────────┬───────────┘    └────────────┬────────────┘  │
//! │             │ + namespaces                │               │
//! │  ┌──────────▼───────────┐                 │               │
//! │  │  XmlResolver         │                 │               │
//! │  │  namespaced          │                 │               │
//! │  │  -> local-name       │                 │               │
//! │  │  -> descent          │                 │               │
//! │  └──────────┬───────────┘                 │               │
//! │             └───────────┬─────────────────┘               │
//! │                  ┌──────▼──────┐                          │
//! │                  │  Document   │ (trait)                  │
//! │                  └─────────────┘                          │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! Resolution never fails at run time: a path that matches nothing yields an
//! empty result. Malformed paths are rejected by [`PathExpression::parse`]
//! when the profile is loaded.

pub mod path;
pub mod snmp;
pub mod xml;

use std::fmt;

use crate::error::PathError;
use crate::trace::Trace;

pub use path::XmlPath;
pub use snmp::{Oid, SnmpDocument, SnmpNode};
pub use xml::{XmlDocument, XmlResolver};

/// A locator parsed once at profile load.
pub trait PathExpression: Sized + Clone + fmt::Debug + fmt::Display + Send + Sync {
    fn parse(raw: &str) -> Result<Self, PathError>;
}

/// A queryable document.
pub trait Document {
    /// Context handle returned by [`Document::select`].
    type Node: Clone;
    type Path: PathExpression;

    /// Default scope for chassis metrics and interface scans.
    fn root(&self) -> Self::Node;

    /// All nodes matching `path` relative to `ctx`, in document order.
    fn select(&self, ctx: &Self::Node, path: &Self::Path, trace: &dyn Trace) -> Vec<Self::Node>;

    /// Text of the first match, trimmed. Empty text counts as absent.
    fn text(&self, ctx: &Self::Node, path: &Self::Path, trace: &dyn Trace) -> Option<String>;
}

/// All nodes matching `path` from the document's default scope.
pub fn resolve<D: Document>(doc: &D, path: &D::Path, trace: &dyn Trace) -> Vec<D::Node> {
    doc.select(&doc.root(), path, trace)
}

/// A retrieved document, ready for one collection run.
#[derive(Debug)]
pub enum RawDocument<'input> {
    Xml(XmlDocument<'input>),
    Snmp(SnmpDocument),
}

impl RawDocument<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            RawDocument::Xml(_) => "xml",
            RawDocument::Snmp(_) => "snmp",
        }
    }
}
