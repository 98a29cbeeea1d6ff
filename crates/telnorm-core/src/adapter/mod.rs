//! Turning retrieved text into a typed [`RawDocument`].
//!
//! Transport (NETCONF sessions, SNMP polling) happens elsewhere; a
//! [`DocumentSource`] only hands over the retrieved text, and the protocol
//! adapters parse it:
//!
//! | Protocol | Adapter                 | Input                          |
//! |----------|-------------------------|--------------------------------|
//! | NETCONF  | [`netconf::parse_reply`] | `<rpc-reply>` or bare `<data>` |
//! | SNMP     | [`snmp::parse_walk`]     | `snmpwalk -On` output          |

pub mod netconf;
pub mod snmp;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Protocol;
use crate::error::{DocumentError, SourceError};
use crate::resolve::RawDocument;

/// Something that hands over one retrieved document.
pub trait DocumentSource {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    fn fetch(&self) -> Result<String, SourceError>;
}

/// A document saved to disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> Result<String, SourceError> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.name.clone(),
            source,
        })?;
        if text.trim().is_empty() {
            return Err(SourceError::Empty(self.name.clone()));
        }
        debug!(path = %self.name, bytes = text.len(), "Document read");
        Ok(text)
    }
}

/// An in-memory document.
#[derive(Debug, Clone)]
pub struct StaticSource {
    name: String,
    text: String,
}

impl StaticSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

impl DocumentSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> Result<String, SourceError> {
        if self.text.trim().is_empty() {
            return Err(SourceError::Empty(self.name.clone()));
        }
        Ok(self.text.clone())
    }
}

/// Parses retrieved text with the adapter of `protocol`.
pub fn load_document(text: &str, protocol: Protocol) -> Result<RawDocument<'_>, DocumentError> {
    match protocol {
        Protocol::Netconf => netconf::parse_reply(text).map(RawDocument::Xml),
        Protocol::Snmp => snmp::parse_walk(text).map(RawDocument::Snmp),
    }
}
