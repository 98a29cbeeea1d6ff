//! Error types shared by the engine.
//!
//! Only configuration errors and document parse failures abort a run.
//! Resolution misses and transform failures never surface here; they are
//! absorbed by the engine and reported through [`crate::trace`] events and
//! [`crate::models::CollectionStats`].

use std::io;

use thiserror::Error;

/// Result type for profile loading.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// A structurally invalid path expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid path expression '{path}': {message}")]
pub struct PathError {
    pub path: String,
    pub message: String,
}

impl PathError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Errors raised while loading or validating a device profile.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the profile file.
    #[error("failed to read profile '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Failed to parse YAML.
    #[error("failed to parse profile: {0}")]
    Yaml(#[from] serde_yml::Error),

    /// Failed to parse JSON.
    #[error("failed to parse profile: {0}")]
    Json(#[from] serde_json::Error),

    /// A path expression in the profile does not parse.
    #[error("{context}: {source}")]
    Path {
        context: String,
        #[source]
        source: PathError,
    },

    /// A required field is missing.
    #[error("{component} '{name}' is missing required field '{field}'")]
    MissingField {
        component: &'static str,
        name: String,
        field: &'static str,
    },

    /// A field carries an unusable value.
    #[error("{component} '{name}' has invalid {field}: {message}")]
    InvalidValue {
        component: &'static str,
        name: String,
        field: &'static str,
        message: String,
    },

    /// A metric refers to a string map that is not built in.
    #[error("metric '{metric}' references unknown string map '{map}'")]
    UnknownStringMap { metric: String, map: String },

    /// The profile declares neither interfaces nor chassis metrics.
    #[error("profile declares no interfaces and no chassis metrics")]
    EmptyProfile,
}

impl ConfigError {
    /// Create a Path error with the location of the offending expression.
    pub fn path(context: impl Into<String>, source: PathError) -> Self {
        Self::Path {
            context: context.into(),
            source,
        }
    }

    /// Create a MissingField error
    pub fn missing_field(
        component: &'static str,
        name: impl Into<String>,
        field: &'static str,
    ) -> Self {
        Self::MissingField {
            component,
            name: name.into(),
            field,
        }
    }

    /// Create an InvalidValue error
    pub fn invalid_value(
        component: &'static str,
        name: impl Into<String>,
        field: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            component,
            name: name.into(),
            field,
            message: message.into(),
        }
    }
}

/// Errors raised while turning retrieved text into a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The reply is not well-formed XML.
    #[error("malformed XML reply: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The device answered with an `rpc-error`.
    #[error("device returned rpc-error: {0}")]
    RpcError(String),

    /// A line of an SNMP walk dump could not be parsed.
    #[error("line {line} of SNMP walk: {message}")]
    SnmpLine { line: usize, message: String },

    /// The document kind does not match the profile protocol.
    #[error("profile expects a {expected} document, got {found}")]
    ProtocolMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

/// Errors raised by a [`crate::adapter::DocumentSource`].
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to read the retrieved document.
    #[error("failed to read document '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The source produced no data.
    #[error("document source '{0}' returned no data")]
    Empty(String),
}
